use std::fmt;
use tokio::sync::watch;
use tracing::{error, info};

/// Current state of an import. Each report replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportStatus {
    Idle,
    NoFileSelected,
    ProcessingFile,
    ProcessingBook { current: usize, total: usize },
    Complete { successful: usize, failed: usize },
    Failed { message: String },
}

impl ImportStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::ProcessingFile | Self::ProcessingBook { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Short machine-readable name of the state
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::NoFileSelected => "no_file_selected",
            Self::ProcessingFile => "processing_file",
            Self::ProcessingBook { .. } => "processing_book",
            Self::Complete { .. } => "complete",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("No import has been started."),
            Self::NoFileSelected => f.write_str("Please select a file to upload."),
            Self::ProcessingFile => f.write_str("Processing file..."),
            Self::ProcessingBook { current, total } => {
                write!(f, "Processing book {} of {}...", current, total)
            }
            Self::Complete { successful, failed } => write!(
                f,
                "Upload complete: {} books added, {} failed.",
                successful, failed
            ),
            Self::Failed { message } => f.write_str(message),
        }
    }
}

/// Receives every status change of one import.
pub trait ProgressSink: Send + Sync {
    fn report(&self, status: ImportStatus);
}

/// Writes each status to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, status: ImportStatus) {
        if status.is_error() {
            error!("{}", status);
        } else {
            info!("{}", status);
        }
    }
}

/// Latest status, observable through `subscribe`.
#[derive(Debug, Clone)]
pub struct WatchProgress {
    tx: watch::Sender<ImportStatus>,
}

impl WatchProgress {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ImportStatus::Idle);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<ImportStatus> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> ImportStatus {
        self.tx.borrow().clone()
    }
}

impl Default for WatchProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for WatchProgress {
    fn report(&self, status: ImportStatus) {
        // send_replace keeps the value even with no receiver alive
        self.tx.send_replace(status);
    }
}
