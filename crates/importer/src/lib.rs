pub mod error;
pub mod intake;
pub mod latch;
pub mod pipeline;
pub mod progress;
pub mod record;
pub mod store;
pub mod traits;
pub mod validator;

pub use error::{ImporterError, Result};
pub use intake::ImportFile;
pub use latch::{ImportLatch, ImportPermit};
pub use pipeline::{BenefitResolution, BulkImporter, ImportOptions, ImportOutcome, RelationPolicy};
pub use progress::{ImportStatus, LogProgress, ProgressSink, WatchProgress};
pub use store::PgBookStore;
pub use traits::BookStore;
