pub mod compose;
pub mod fonts;
pub mod header;
pub mod model;
pub mod paint;
pub mod snapshot;

use std::path::Path;

use chrono::Local;
use log::info;

pub use model::DocModel;
pub use snapshot::ReportSnapshot;

use crate::error::Result;

/// `expense-report-<YYYY-MM-DD>.pdf`, dated today.
pub fn default_filename() -> String {
    format!("expense-report-{}.pdf", Local::now().format("%Y-%m-%d"))
}

/// Lay out the snapshot and write the finished PDF to `path`.
pub fn export_report(snapshot: &ReportSnapshot, metrics_dir: &Path, path: &Path) -> Result<()> {
    let catalog = fonts::catalog(metrics_dir);
    let model = compose::compose(snapshot, catalog);
    paint::paint(&model, &snapshot.settings.labels.report_title, path)?;
    info!(
        "wrote {} page(s) to {}",
        model.pages.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filename_is_dated() {
        let name = default_filename();
        assert!(name.starts_with("expense-report-"));
        assert!(name.ends_with(".pdf"));
        // expense-report-YYYY-MM-DD.pdf
        assert_eq!(name.len(), "expense-report-0000-00-00.pdf".len());
    }
}
