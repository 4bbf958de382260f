pub mod media;
pub mod output_row;
pub mod release_date;
pub mod sheet_range;
pub mod status;
pub mod watchlist;

pub use media::{ExternalId, MediaKind};
pub use output_row::OutputRow;
pub use release_date::truncate_date;
pub use sheet_range::{RangeError, SheetRange};
pub use status::{LibraryEntry, SyncStatus};
pub use watchlist::WatchListRow;
