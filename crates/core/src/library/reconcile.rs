//! One-directional merge of scanner output into the catalog.
//!
//! Files that disappear from disk keep their entries; only additions flow.

use tracing::{debug, info, warn};

use super::{Catalog, MediaScanner, ReconcileReport, ScanError};
use crate::metrics::RECONCILE_FILES;

/// Add a placeholder for every newly discovered file.
///
/// Existing entries are left untouched, so running this repeatedly against
/// an unchanged directory leaves the catalog unchanged.
pub fn reconcile(
    catalog: &Catalog,
    scanner: &dyn MediaScanner,
) -> Result<ReconcileReport, ScanError> {
    info!("Beginning video search in {}", scanner.directory().display());
    let basenames = scanner.list_media_files()?;

    let mut report = ReconcileReport::default();
    for name in basenames {
        match catalog.ensure_placeholder(&name) {
            Ok(true) => {
                debug!("New file: {}", name);
                report.added.push(name);
            }
            Ok(false) => {
                debug!("Known file: {}", name);
                report.known.push(name);
            }
            Err(e) => warn!("Skipping unusable file name {:?}: {}", name, e),
        }
    }

    RECONCILE_FILES
        .with_label_values(&["new"])
        .inc_by(report.added.len() as u64);
    RECONCILE_FILES
        .with_label_values(&["known"])
        .inc_by(report.known.len() as u64);

    info!(
        "Video search complete: {} new, {} known",
        report.added.len(),
        report.known.len()
    );
    Ok(report)
}
