//! Film persistence.
//!
//! [`FilmRepository`] is the only component that queries the film table.
//! Reads skip soft-deleted rows.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::entity::{self, Column, Entity as Film, Model, MAX_PLOT_LEN};
use crate::error::FilmError;
use crate::storage::{disconnected_err, Storage};

/// Id of the film served by the list endpoint.
pub const LISTED_FILM_ID: i32 = 1;

/// Fields supplied when creating a film.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFilm {
    pub title: String,
    pub year: String,
    pub plot: String,
}

impl NewFilm {
    pub fn new(title: impl Into<String>, year: impl Into<String>, plot: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
            plot: plot.into(),
        }
    }
}

impl Default for NewFilm {
    /// The film inserted at startup.
    fn default() -> Self {
        Self::new("AAAAAAAAAAAAAAAA", "2018", "hehddeda")
    }
}

/// Reads and writes films through the shared [`Storage`].
#[derive(Debug, Clone)]
pub struct FilmRepository {
    storage: Storage,
}

impl FilmRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Fetch the film with id 1.
    ///
    /// The read runs inside a transaction that is always committed.
    pub async fn find_one(&self) -> Result<Model, FilmError> {
        self.find_by_id(LISTED_FILM_ID).await
    }

    /// Fetch a live film by id.
    pub async fn find_by_id(&self, id: i32) -> Result<Model, FilmError> {
        self.ensure_connected()?;
        let txn = self.storage.handle().begin().await?;

        let film = Film::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&txn)
            .await?;

        txn.commit().await?;

        film.ok_or(FilmError::NotFound { id })
    }

    /// Look up a live film by its title.
    pub async fn find_by_title(&self, title: &str) -> Result<Option<Model>, FilmError> {
        self.ensure_connected()?;

        let film = Film::find()
            .filter(Column::Title.eq(title))
            .filter(Column::DeletedAt.is_null())
            .one(self.storage.handle())
            .await?;
        Ok(film)
    }

    /// Insert a new film. Timestamps are set by the entity.
    pub async fn create(&self, film: NewFilm) -> Result<Model, FilmError> {
        let len = film.plot.chars().count();
        if len > MAX_PLOT_LEN {
            return Err(FilmError::PlotTooLong {
                len,
                max: MAX_PLOT_LEN,
            });
        }

        self.ensure_connected()?;
        let txn = self.storage.handle().begin().await?;
        let model = entity::ActiveModel {
            title: Set(film.title),
            year: Set(film.year),
            plot: Set(film.plot),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        debug!(id = model.id, title = %model.title, "Film created");
        Ok(model)
    }

    /// Insert `film` unless a film with the same title already exists.
    ///
    /// Returns the stored film either way.
    pub async fn seed(&self, film: NewFilm) -> Result<Model, FilmError> {
        if let Some(existing) = self.find_by_title(&film.title).await? {
            debug!(id = existing.id, "Seed film already present");
            return Ok(existing);
        }

        let model = self.create(film).await?;
        info!(id = model.id, title = %model.title, "Seed film inserted");
        Ok(model)
    }

    fn ensure_connected(&self) -> Result<(), FilmError> {
        if self.storage.is_connected() {
            Ok(())
        } else {
            Err(FilmError::Database(disconnected_err()))
        }
    }
}
