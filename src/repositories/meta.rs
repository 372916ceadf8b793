//! Store revision bookkeeping.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use crate::constants::STORE_META_KEY;
use crate::entities::store_meta;

/// Repository for the `store_meta` revision counter.
pub struct MetaTable;

impl MetaTable {
    /// Create the revision row if it does not exist yet.
    pub async fn ensure<C>(conn: &C) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        conn.execute_unprepared(&format!(
            "INSERT OR IGNORE INTO store_meta (key, revision) VALUES ('{}', 0)",
            STORE_META_KEY
        ))
        .await?;
        Ok(())
    }

    /// Current revision, zero when the row is missing.
    pub async fn revision<C>(conn: &C) -> Result<i64, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(store_meta::Entity::find_by_id(STORE_META_KEY.to_string())
            .one(conn)
            .await?
            .map(|meta| meta.revision)
            .unwrap_or(0))
    }

    /// Increment the revision and return the new value.
    pub async fn bump<C>(conn: &C) -> Result<i64, DbErr>
    where
        C: ConnectionTrait,
    {
        store_meta::Entity::update_many()
            .col_expr(
                store_meta::Column::Revision,
                Expr::col(store_meta::Column::Revision).add(1),
            )
            .filter(store_meta::Column::Key.eq(STORE_META_KEY))
            .exec(conn)
            .await?;
        Self::revision(conn).await
    }
}
