//! Association (join table) repository.
//!
//! Association rows have no identity of their own; they are created and
//! removed by id pair. Deletes of guides, categories and media call the
//! `remove_*` helpers here before removing the row itself.

use helpcenter_common::{AppResult, db_err};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};
use uuid::Uuid;

use crate::entities::{GuideCategoryLink, GuideMediaLink, guide_category_link, guide_media_link};

/// Repository for guide/category and guide/media association rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssociationRepository;

impl AssociationRepository {
    /// Create a new association repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    // ==================== Guide <-> Category ====================

    /// Category links for any of the given guides, by ascending category id.
    pub async fn category_links_for_guides<C: ConnectionTrait>(
        &self,
        conn: &C,
        guide_ids: &[Uuid],
    ) -> AppResult<Vec<guide_category_link::Model>> {
        if guide_ids.is_empty() {
            return Ok(Vec::new());
        }

        GuideCategoryLink::find()
            .filter(guide_category_link::Column::GuideId.is_in(guide_ids.iter().copied()))
            .order_by(guide_category_link::Column::CategoryId, Order::Asc)
            .all(conn)
            .await
            .map_err(db_err)
    }

    /// Guide links for any of the given categories.
    pub async fn guide_links_for_categories<C: ConnectionTrait>(
        &self,
        conn: &C,
        category_ids: &[Uuid],
    ) -> AppResult<Vec<guide_category_link::Model>> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        GuideCategoryLink::find()
            .filter(guide_category_link::Column::CategoryId.is_in(category_ids.iter().copied()))
            .order_by(guide_category_link::Column::GuideId, Order::Asc)
            .all(conn)
            .await
            .map_err(db_err)
    }

    /// Replace the category set of a guide.
    pub async fn replace_guide_categories<C: ConnectionTrait>(
        &self,
        conn: &C,
        guide_id: Uuid,
        category_ids: &[Uuid],
    ) -> AppResult<()> {
        self.remove_guide_category_links(conn, guide_id).await?;

        if category_ids.is_empty() {
            return Ok(());
        }

        let rows = dedup(category_ids)
            .into_iter()
            .map(|category_id| guide_category_link::ActiveModel {
                guide_id: Set(guide_id),
                category_id: Set(category_id),
            });

        GuideCategoryLink::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    /// Remove every category link of a guide.
    pub async fn remove_guide_category_links<C: ConnectionTrait>(
        &self,
        conn: &C,
        guide_id: Uuid,
    ) -> AppResult<u64> {
        let result = GuideCategoryLink::delete_many()
            .filter(guide_category_link::Column::GuideId.eq(guide_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    /// Remove every guide link of a category.
    pub async fn remove_category_links<C: ConnectionTrait>(
        &self,
        conn: &C,
        category_id: Uuid,
    ) -> AppResult<u64> {
        let result = GuideCategoryLink::delete_many()
            .filter(guide_category_link::Column::CategoryId.eq(category_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    // ==================== Guide <-> Media ====================

    /// Media links for any of the given guides, by ascending media id.
    pub async fn media_links_for_guides<C: ConnectionTrait>(
        &self,
        conn: &C,
        guide_ids: &[Uuid],
    ) -> AppResult<Vec<guide_media_link::Model>> {
        if guide_ids.is_empty() {
            return Ok(Vec::new());
        }

        GuideMediaLink::find()
            .filter(guide_media_link::Column::GuideId.is_in(guide_ids.iter().copied()))
            .order_by(guide_media_link::Column::MediaId, Order::Asc)
            .all(conn)
            .await
            .map_err(db_err)
    }

    /// Guide links for any of the given media.
    pub async fn guide_links_for_media<C: ConnectionTrait>(
        &self,
        conn: &C,
        media_ids: &[Uuid],
    ) -> AppResult<Vec<guide_media_link::Model>> {
        if media_ids.is_empty() {
            return Ok(Vec::new());
        }

        GuideMediaLink::find()
            .filter(guide_media_link::Column::MediaId.is_in(media_ids.iter().copied()))
            .order_by(guide_media_link::Column::GuideId, Order::Asc)
            .all(conn)
            .await
            .map_err(db_err)
    }

    /// Attach a media item to a guide.
    ///
    /// Returns `false` when the pair was already attached; no duplicate row
    /// is written and no error is raised.
    pub async fn attach_media<C: ConnectionTrait>(
        &self,
        conn: &C,
        guide_id: Uuid,
        media_id: Uuid,
    ) -> AppResult<bool> {
        let row = guide_media_link::ActiveModel {
            guide_id: Set(guide_id),
            media_id: Set(media_id),
        };

        let inserted = GuideMediaLink::insert(row)
            .on_conflict(
                OnConflict::columns([
                    guide_media_link::Column::GuideId,
                    guide_media_link::Column::MediaId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(db_err)?;

        Ok(inserted > 0)
    }

    /// Detach a media item from a guide. Returns whether a link existed.
    pub async fn detach_media<C: ConnectionTrait>(
        &self,
        conn: &C,
        guide_id: Uuid,
        media_id: Uuid,
    ) -> AppResult<bool> {
        let result = GuideMediaLink::delete_many()
            .filter(guide_media_link::Column::GuideId.eq(guide_id))
            .filter(guide_media_link::Column::MediaId.eq(media_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    /// Replace the media set of a guide.
    pub async fn replace_guide_media<C: ConnectionTrait>(
        &self,
        conn: &C,
        guide_id: Uuid,
        media_ids: &[Uuid],
    ) -> AppResult<()> {
        self.remove_guide_media_links(conn, guide_id).await?;

        if media_ids.is_empty() {
            return Ok(());
        }

        let rows = dedup(media_ids)
            .into_iter()
            .map(|media_id| guide_media_link::ActiveModel {
                guide_id: Set(guide_id),
                media_id: Set(media_id),
            });

        GuideMediaLink::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    /// Remove every media link of a guide.
    pub async fn remove_guide_media_links<C: ConnectionTrait>(
        &self,
        conn: &C,
        guide_id: Uuid,
    ) -> AppResult<u64> {
        let result = GuideMediaLink::delete_many()
            .filter(guide_media_link::Column::GuideId.eq(guide_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    /// Remove every guide link of a media item.
    pub async fn remove_media_links<C: ConnectionTrait>(
        &self,
        conn: &C,
        media_id: Uuid,
    ) -> AppResult<u64> {
        let result = GuideMediaLink::delete_many()
            .filter(guide_media_link::Column::MediaId.eq(media_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}

/// Drop repeated ids, keeping first-seen order.
fn dedup(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
