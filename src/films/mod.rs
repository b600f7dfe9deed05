//! The film resource: persisted entity, repository, and response shape.

pub mod entity;
pub mod repository;
pub mod serializer;

pub use entity::{Model as Film, MAX_PLOT_LEN};
pub use repository::{FilmRepository, NewFilm, LISTED_FILM_ID};
pub use serializer::{FilmResponse, FilmsEnvelope};
