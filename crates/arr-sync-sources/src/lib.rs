pub mod traits;
pub mod error;
pub mod factory;
pub mod http;
pub mod radarr;
pub mod sonarr;
pub mod sheets;

pub use traits::{AddOutcome, MovieLibrary, MovieMetadata, SeriesLibrary, SeriesMetadata, SheetStore, TrackedMovie, TrackedSeries};
pub use error::SourceError;
pub use factory::SourceSet;
pub use radarr::RadarrClient;
pub use sonarr::SonarrClient;
pub use sheets::GoogleSheetsClient;
