//! Schema assembly.

use std::sync::Arc;

use async_graphql::{EmptySubscription, Schema};
use helpcenter_core::{CatalogService, FeedbackService};
use sea_orm::DatabaseConnection;

use crate::{mutation::Mutation, query::Query};

/// The complete GraphQL schema.
pub type HelpCenterSchema = Schema<Query, Mutation, EmptySubscription>;

/// Build the schema with its services registered as context data.
#[must_use]
pub fn build_schema(db: Arc<DatabaseConnection>) -> HelpCenterSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(CatalogService::new(db.clone()))
        .data(FeedbackService::new(db))
        .finish()
}
