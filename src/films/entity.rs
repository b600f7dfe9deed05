//! `SeaORM` entity for a film.
//!
//! The table keeps the soft-delete layout: `created_at`, `updated_at`, and a
//! nullable `deleted_at` that marks a row as removed without deleting it.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// Longest plot the column accepts.
pub const MAX_PLOT_LEN: usize = 2048;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "film_models")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    #[sea_orm(indexed)]
    pub deleted_at: Option<DateTimeUtc>,
    #[sea_orm(unique)]
    pub title: String,
    /// Stored as text, e.g. "2018"
    pub year: String,
    #[sea_orm(column_type = "String(StringLen::N(2048))")]
    pub plot: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

impl Model {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
