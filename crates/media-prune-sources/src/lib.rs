pub mod error;
pub mod plex;
pub mod radarr;
pub mod traits;

pub use error::SourceError;
pub use plex::PlexHttpClient;
pub use radarr::RadarrHttpClient;
pub use traits::MovieLibrary;
