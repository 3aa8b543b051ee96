//! Generic repository operations.
//!
//! Every function takes the connection explicitly so callers can pass either
//! the pool or an open transaction. Nothing here commits.

use helpcenter_common::{AppResult, db_err};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, Order, PrimaryKeyTrait, QueryFilter, QueryOrder, Value,
};
use uuid::Uuid;

/// Find a row by its UUID primary key.
pub async fn find_by_id<E, C>(conn: &C, id: Uuid) -> AppResult<Option<E::Model>>
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
    C: ConnectionTrait,
{
    E::find_by_id(id).one(conn).await.map_err(db_err)
}

/// List every row, ordered by `order_by` ascending.
pub async fn find_all<E, C>(conn: &C, order_by: E::Column) -> AppResult<Vec<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    E::find()
        .order_by(order_by, Order::Asc)
        .all(conn)
        .await
        .map_err(db_err)
}

/// Find the first row whose `column` equals `value`.
pub async fn find_one_by<E, C, V>(conn: &C, column: E::Column, value: V) -> AppResult<Option<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
    V: Into<Value>,
{
    E::find()
        .filter(column.eq(value))
        .one(conn)
        .await
        .map_err(db_err)
}

/// Find all rows whose primary key is in `ids`. Skips the query for an empty list.
pub async fn find_by_ids<E, C>(conn: &C, id_column: E::Column, ids: &[Uuid]) -> AppResult<Vec<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    E::find()
        .filter(id_column.is_in(ids.iter().copied()))
        .all(conn)
        .await
        .map_err(db_err)
}

/// Stage an insert and return the stored row.
pub async fn insert<A, C>(conn: &C, model: A) -> AppResult<<A::Entity as EntityTrait>::Model>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    model.insert(conn).await.map_err(db_err)
}

/// Apply the set fields of `model` and return the updated row.
pub async fn update<A, C>(conn: &C, model: A) -> AppResult<<A::Entity as EntityTrait>::Model>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    C: ConnectionTrait,
{
    model.update(conn).await.map_err(db_err)
}

/// Delete a row by primary key. Returns whether a row existed.
pub async fn delete_by_id<E, C>(conn: &C, id: Uuid) -> AppResult<bool>
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
    C: ConnectionTrait,
{
    let result = E::delete_by_id(id).exec(conn).await.map_err(db_err)?;
    Ok(result.rows_affected > 0)
}
