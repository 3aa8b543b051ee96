//! Root mutation object.

use async_graphql::{Context, Object, Result};
use helpcenter_core::{FeedbackService, SubmitFeedbackInput};

use crate::error::gql_error;
use crate::types::Feedback;

/// Root mutation object for GraphQL.
pub struct Mutation;

#[Object]
impl Mutation {
    /// Submit feedback from a reader.
    async fn submit_feedback(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
        message: String,
        #[graphql(default)] expect_reply: bool,
    ) -> Result<Feedback> {
        let feedback = ctx.data::<FeedbackService>()?;
        let stored = feedback
            .submit(SubmitFeedbackInput {
                name,
                email,
                message,
                expect_reply,
            })
            .await
            .map_err(gql_error)?;
        Ok(stored.into())
    }
}
