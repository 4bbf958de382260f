//! Builds the three external clients from configuration.
//!
//! The spreadsheet client authenticates first, so unusable sheet credentials
//! abort the run before any library is touched.

use crate::error::SourceError;
use crate::radarr::RadarrClient;
use crate::sheets::GoogleSheetsClient;
use crate::sonarr::SonarrClient;
use crate::traits::{MovieLibrary, SeriesLibrary, SheetStore};
use arr_sync_config::Config;
use tracing::debug;

pub struct SourceSet {
    pub sheet: Box<dyn SheetStore>,
    pub movies: Box<dyn MovieLibrary>,
    pub series: Box<dyn SeriesLibrary>,
}

impl SourceSet {
    pub async fn from_config(config: &Config) -> Result<Self, SourceError> {
        let sheet = GoogleSheetsClient::connect(config).await?;
        debug!("Spreadsheet client ready (write access: {})", sheet.can_write());

        let movies = RadarrClient::from_config(&config.radarr, &config.http)?;
        let series = SonarrClient::from_config(&config.sonarr, &config.http)?;

        Ok(Self {
            sheet: Box::new(sheet),
            movies: Box::new(movies),
            series: Box::new(series),
        })
    }
}
