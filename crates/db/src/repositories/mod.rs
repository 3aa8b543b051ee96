//! Database repositories.
//!
//! Repositories are stateless; each method takes the connection to run on,
//! which is either the shared pool or a transaction opened by a service.

mod association;
pub mod base;
mod category;
mod feedback;
mod guide;
mod media;

pub use association::AssociationRepository;
pub use category::CategoryRepository;
pub use feedback::FeedbackRepository;
pub use guide::GuideRepository;
pub use media::MediaRepository;
