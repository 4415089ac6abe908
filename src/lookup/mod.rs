pub mod age;
pub mod cast;
pub mod models;
pub mod theaters;

pub use age::{AgeResolver, WikipediaAgeResolver, extract_birth_year, normalize_actor_name};
pub use cast::{CastResolver, OmdbCastResolver};
pub use theaters::TheaterListing;
