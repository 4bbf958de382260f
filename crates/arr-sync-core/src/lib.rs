pub mod id_extraction;
pub mod movie;
pub mod outcome;
pub mod series;
pub mod sync;

#[cfg(test)]
mod fakes;

pub use id_extraction::extract_external_id;
pub use movie::MovieReconciler;
pub use outcome::Reconciliation;
pub use series::SeriesReconciler;
pub use sync::{ProgressCallback, ReportRow, SyncOrchestrator, SyncReport, WriteBack};
