//! Public JSON shape of a film.

use serde::Serialize;

use super::entity::Model;

/// What clients see of a film. Only the title is exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilmResponse {
    #[serde(skip)]
    pub id: i32,

    pub title: String,
}

impl From<&Model> for FilmResponse {
    fn from(film: &Model) -> Self {
        Self {
            id: film.id,
            title: film.title.clone(),
        }
    }
}

impl From<Model> for FilmResponse {
    fn from(film: Model) -> Self {
        Self {
            id: film.id,
            title: film.title,
        }
    }
}

/// Body of `GET /api/films/`: `{"films": {"title": ...}}`.
///
/// The key is plural but wraps a single film.
#[derive(Debug, Clone, Serialize)]
pub struct FilmsEnvelope {
    pub films: FilmResponse,
}

impl FilmsEnvelope {
    pub fn new(film: impl Into<FilmResponse>) -> Self {
        Self { films: film.into() }
    }
}
