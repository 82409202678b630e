pub mod api;

pub use api::PlexHttpClient;
