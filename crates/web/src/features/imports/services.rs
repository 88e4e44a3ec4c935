use importer::{BulkImporter, ImportFile, ImportOutcome, ImporterError, PgBookStore, Result};
use storage::Database;

use crate::state::ImportState;

/// Run one import of `file` under the shared latch, reporting to the shared progress channel.
///
/// The import runs on its own task, so a client that disconnects mid-upload
/// does not stop the batch.
pub async fn run_import(
    db: &Database,
    imports: &ImportState,
    file: Option<ImportFile>,
) -> Result<ImportOutcome> {
    let importer = BulkImporter::new(PgBookStore::new(db.pool().clone()))
        .with_options(imports.options)
        .with_latch(imports.latch.clone());

    importer
        .spawn(file, imports.progress.clone())
        .await
        .map_err(|e| ImporterError::ImportError(format!("import task failed: {}", e)))?
}
