//! Entry table queries.

use sea_orm::sea_query::{Condition, Expr, SimpleExpr};
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, Order, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::entry;
use crate::query::{EntryField, EntryQuery, Predicate, SortDirection};

/// Repository for entry-related database operations.
pub struct EntryTable;

impl EntryTable {
    /// Run a query, declared sort keys first, then insertion order.
    pub async fn find<C>(conn: &C, query: &EntryQuery) -> Result<Vec<entry::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut select = entry::Entity::find();
        if let Some(predicate) = query.predicate() {
            select = select.filter(condition(predicate));
        }
        for key in query.sort_keys() {
            select = select.order_by(column(key.field), order(key.direction));
        }
        select.order_by_asc(Expr::cust("rowid")).all(conn).await
    }

    /// Get a single entry by UUID.
    pub async fn get_by_id<C>(conn: &C, uuid: &Uuid) -> Result<Option<entry::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        entry::Entity::find_by_id(*uuid).one(conn).await
    }

    /// Insert a new entry.
    pub async fn insert<C>(conn: &C, model: entry::Model) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let active: entry::ActiveModel = model.into();
        entry::Entity::insert(active).exec_without_returning(conn).await?;
        Ok(())
    }

    /// Delete an entry, returning the number of rows removed.
    pub async fn delete<C>(conn: &C, uuid: &Uuid) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = entry::Entity::delete_many()
            .filter(entry::Column::Uuid.eq(*uuid))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Set the enabled flag, returning the number of rows touched.
    pub async fn set_enabled<C>(conn: &C, uuid: &Uuid, enabled: bool) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = entry::Entity::update_many()
            .col_expr(entry::Column::IsEnabled, Expr::value(enabled))
            .filter(entry::Column::Uuid.eq(*uuid))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }
}

fn column(field: EntryField) -> entry::Column {
    match field {
        EntryField::CreatedAt => entry::Column::CreatedAt,
        EntryField::Enabled => entry::Column::IsEnabled,
    }
}

fn order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Ascending => Order::Asc,
        SortDirection::Descending => Order::Desc,
    }
}

fn never() -> SimpleExpr {
    Expr::cust("0 = 1")
}

fn condition(predicate: &Predicate) -> Condition {
    match predicate {
        Predicate::IsEnabled(enabled) => Condition::all().add(entry::Column::IsEnabled.eq(*enabled)),
        Predicate::CreatedBefore(t) => Condition::all().add(entry::Column::CreatedAt.lt(*t)),
        Predicate::CreatedAtOrAfter(t) => Condition::all().add(entry::Column::CreatedAt.gte(*t)),
        Predicate::All(inner) => inner
            .iter()
            .fold(Condition::all(), |acc, p| acc.add(condition(p))),
        Predicate::Any(inner) if inner.is_empty() => Condition::all().add(never()),
        Predicate::Any(inner) => inner
            .iter()
            .fold(Condition::any(), |acc, p| acc.add(condition(p))),
        Predicate::Not(inner) => condition(inner).not(),
    }
}
