//! Root query object.

use async_graphql::{Context, Object, Result};
use helpcenter_core::CatalogService;

use crate::error::gql_error;
use crate::types::{Category, Media, UserGuide};

/// Root query object for GraphQL.
pub struct Query;

#[Object]
impl Query {
    /// Fetch all categories.
    async fn categories(&self, ctx: &Context<'_>) -> Result<Vec<Category>> {
        let catalog = ctx.data::<CatalogService>()?;
        let nodes = catalog.categories().await.map_err(gql_error)?;
        Ok(nodes.into_iter().map(Into::into).collect())
    }

    /// Fetch a single category by slug.
    async fn category(&self, ctx: &Context<'_>, slug: String) -> Result<Option<Category>> {
        let catalog = ctx.data::<CatalogService>()?;
        let node = catalog.category(&slug).await.map_err(gql_error)?;
        Ok(node.map(Into::into))
    }

    /// Fetch all guides, optionally only those in one category.
    async fn guides(
        &self,
        ctx: &Context<'_>,
        category_slug: Option<String>,
    ) -> Result<Vec<UserGuide>> {
        let catalog = ctx.data::<CatalogService>()?;
        let nodes = catalog
            .guides(category_slug.as_deref())
            .await
            .map_err(gql_error)?;
        Ok(nodes.into_iter().map(Into::into).collect())
    }

    /// Fetch a single guide by slug.
    async fn guide(&self, ctx: &Context<'_>, slug: String) -> Result<Option<UserGuide>> {
        let catalog = ctx.data::<CatalogService>()?;
        let node = catalog.guide(&slug).await.map_err(gql_error)?;
        Ok(node.map(Into::into))
    }

    /// Fetch all media.
    async fn media(&self, ctx: &Context<'_>) -> Result<Vec<Media>> {
        let catalog = ctx.data::<CatalogService>()?;
        let nodes = catalog.media().await.map_err(gql_error)?;
        Ok(nodes.into_iter().map(Into::into).collect())
    }
}
