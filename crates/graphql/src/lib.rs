//! Public GraphQL surface for the help center.
//!
//! Read-only queries over categories, guides and media, plus the
//! `submitFeedback` mutation. Served at `/graphql`; a GET opens GraphiQL.

mod error;
mod handlers;
mod mutation;
mod query;
mod schema;
mod types;

pub use handlers::router;
pub use mutation::Mutation;
pub use query::Query;
pub use schema::{HelpCenterSchema, build_schema};
pub use types::{Category, Feedback, Media, UserGuide};
