use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use storage::models::{BenefitAssociation, ImageAssociation};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::intake::ImportFile;
use crate::latch::ImportLatch;
use crate::progress::{ImportStatus, ProgressSink};
use crate::record::{ImportRecord, ResolvedRecord};
use crate::traits::BookStore;
use crate::{ImporterError, Result};

/// How entries of a record's `benefits` array become benefit IDs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BenefitResolution {
    /// Entries already are benefit IDs
    #[default]
    PassThrough,
    /// Entries are benefit names, looked up in the store
    NameLookup,
}

impl FromStr for BenefitResolution {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pass-through" | "passthrough" | "id" | "ids" => Ok(Self::PassThrough),
            "name-lookup" | "lookup" | "name" | "names" => Ok(Self::NameLookup),
            other => Err(format!(
                "unknown benefit resolution '{}', expected 'pass-through' or 'name-lookup'",
                other
            )),
        }
    }
}

impl fmt::Display for BenefitResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassThrough => f.write_str("pass-through"),
            Self::NameLookup => f.write_str("name-lookup"),
        }
    }
}

/// What a failed benefit or image insert means for the book itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelationPolicy {
    /// The book stays and counts as imported
    #[default]
    BestEffort,
    /// The book is deleted again and counts as failed
    Strict,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    pub benefit_resolution: BenefitResolution,
    pub relation_policy: RelationPolicy,
}

/// Counters of one finished import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl ImportOutcome {
    fn attempted(&self) -> usize {
        self.successful + self.failed
    }

    pub fn status(&self) -> ImportStatus {
        ImportStatus::Complete {
            successful: self.successful,
            failed: self.failed,
        }
    }
}

/// Imports an uploaded JSON array of books, one record at a time.
pub struct BulkImporter<S> {
    store: S,
    options: ImportOptions,
    latch: ImportLatch,
}

impl<S: BookStore> BulkImporter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            options: ImportOptions::default(),
            latch: ImportLatch::new(),
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Share the latch with other importers writing to the same store.
    pub fn with_latch(mut self, latch: ImportLatch) -> Self {
        self.latch = latch;
        self
    }

    /// Run a full import of `file`. Batch-level failures are reported to
    /// `progress` and returned; per-record failures only show up in the counts.
    pub async fn run(
        &self,
        file: Option<&ImportFile>,
        progress: &dyn ProgressSink,
    ) -> Result<ImportOutcome> {
        let _permit = self
            .latch
            .try_acquire()
            .ok_or(ImporterError::ImportInProgress)?;

        let Some(file) = file else {
            progress.report(ImportStatus::NoFileSelected);
            return Err(ImporterError::NoFileSelected);
        };

        progress.report(ImportStatus::ProcessingFile);
        info!("Importing books from {}", file.name());

        let records = match read_batch(file).await {
            Ok(records) => records,
            Err(e) => {
                error!("Error reading or parsing {}: {}", file.name(), e);
                progress.report(ImportStatus::Failed {
                    message: e.user_message(),
                });
                return Err(e);
            }
        };

        let outcome = self.import_records(&records, progress).await;
        info!(
            "Summary: {} of {} book(s) imported, {} failed",
            outcome.successful, outcome.total, outcome.failed
        );

        Ok(outcome)
    }

    async fn import_records(
        &self,
        records: &[Value],
        progress: &dyn ProgressSink,
    ) -> ImportOutcome {
        let mut outcome = ImportOutcome {
            total: records.len(),
            ..Default::default()
        };

        for raw in records {
            progress.report(ImportStatus::ProcessingBook {
                current: outcome.attempted() + 1,
                total: outcome.total,
            });

            let title = ImportRecord::title_of(raw);
            match self.import_record(raw).await {
                Ok(book_id) => {
                    debug!("Imported '{}' as {}", title, book_id);
                    outcome.successful += 1;
                }
                Err(e) => {
                    error!("Error inserting book '{}': {}", title, e);
                    outcome.failed += 1;
                }
            }
        }

        progress.report(outcome.status());
        outcome
    }

    async fn import_record(&self, raw: &Value) -> Result<Uuid> {
        let record = ImportRecord::from_value(raw)?.resolve()?;
        let book_id = self.store.insert_book(&record.book).await?;

        let relations = self.insert_relations(book_id, &record).await;

        match (relations, self.options.relation_policy) {
            (Ok(()), _) => Ok(book_id),
            (Err(_), RelationPolicy::BestEffort) => Ok(book_id),
            (Err(e), RelationPolicy::Strict) => {
                if let Err(delete_err) = self.store.delete_book(book_id).await {
                    error!(
                        "Failed to remove '{}' after relation error: {}",
                        record.book.title, delete_err
                    );
                }
                Err(ImporterError::ImportError(format!(
                    "relations of '{}' failed: {}",
                    record.book.title, e
                )))
            }
        }
    }

    /// Benefits and image are attempted independently; the first error is returned.
    async fn insert_relations(&self, book_id: Uuid, record: &ResolvedRecord) -> Result<()> {
        let mut first_error = None;

        if !record.benefits.is_empty() {
            if let Err(e) = self.link_benefits(book_id, &record.benefits).await {
                warn!("Error inserting benefits for book '{}': {}", record.book.title, e);
                first_error.get_or_insert(e);
            }
        }

        if let Some(url) = &record.img_link {
            let image = ImageAssociation::cover(book_id, url.as_str());
            if let Err(e) = self.store.insert_book_image(&image).await {
                warn!("Error inserting image for book '{}': {}", record.book.title, e);
                first_error.get_or_insert(e.into());
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn link_benefits(&self, book_id: Uuid, entries: &[String]) -> Result<()> {
        let mut associations = Vec::with_capacity(entries.len());
        let mut unresolved = Vec::new();

        for entry in entries {
            match self.resolve_benefit(entry).await? {
                Some(benefit_id) => associations.push(BenefitAssociation {
                    book_id,
                    benefit_id,
                }),
                None => unresolved.push(entry.as_str()),
            }
        }

        if !associations.is_empty() {
            self.store.insert_book_benefits(&associations).await?;
        }

        if unresolved.is_empty() {
            Ok(())
        } else {
            Err(ImporterError::InvalidRecord(format!(
                "unresolved benefit(s) under {}: {}",
                self.options.benefit_resolution,
                unresolved.join(", ")
            )))
        }
    }

    async fn resolve_benefit(&self, entry: &str) -> Result<Option<Uuid>> {
        match self.options.benefit_resolution {
            BenefitResolution::PassThrough => Ok(Uuid::parse_str(entry.trim()).ok()),
            BenefitResolution::NameLookup => {
                Ok(self.store.find_benefit_id(entry.trim()).await?)
            }
        }
    }
}

impl<S: BookStore + 'static> BulkImporter<S> {
    /// Run the import on its own task. Dropping the returned handle detaches
    /// the task; the batch still runs to completion.
    pub fn spawn<P>(
        self,
        file: Option<ImportFile>,
        progress: P,
    ) -> JoinHandle<Result<ImportOutcome>>
    where
        P: ProgressSink + 'static,
    {
        tokio::spawn(async move { self.run(file.as_ref(), &progress).await })
    }
}

/// Read the file and check it holds a JSON array.
pub async fn read_batch(file: &ImportFile) -> Result<Vec<Value>> {
    let text = file.read_text().await?;
    parse_batch(&text)
}

pub fn parse_batch(text: &str) -> Result<Vec<Value>> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(records) => Ok(records),
        _ => Err(ImporterError::ShapeError),
    }
}
