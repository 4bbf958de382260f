use arr_sync_models::{ExternalId, MediaKind};

const MOVIE_SEGMENT: &str = "themoviedb.org/movie/";
const SERIES_SEGMENT: &str = "themoviedb.org/tv/";

/// Extract the TMDb id from a detail page URL
///
/// `https://www.themoviedb.org/movie/603-the-matrix` → movie 603,
/// `https://www.themoviedb.org/tv/1399?language=en` → series 1399.
/// Anything else, including a detail segment without a leading number,
/// returns `None`.
pub fn extract_external_id(url: &str) -> Option<ExternalId> {
    if let Some(id) = id_after(url, MOVIE_SEGMENT) {
        return Some(ExternalId { kind: MediaKind::Movie, tmdb_id: id });
    }
    if let Some(id) = id_after(url, SERIES_SEGMENT) {
        return Some(ExternalId { kind: MediaKind::Series, tmdb_id: id });
    }
    None
}

fn id_after(url: &str, segment: &str) -> Option<u32> {
    let start = url.find(segment)? + segment.len();
    let digits: String = url[start..].chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
