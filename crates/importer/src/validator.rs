use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;
use uuid::Uuid;

use crate::pipeline::BenefitResolution;
use crate::record::ImportRecord;
use crate::{ImporterError, Result};

/// Dry-run checks for a parsed batch. Nothing is written.
pub struct BatchValidator;

impl BatchValidator {
    pub fn validate(records: &[Value], resolution: BenefitResolution) -> ValidationReport {
        let mut report = ValidationReport {
            total: records.len(),
            ..Default::default()
        };

        if records.is_empty() {
            report.warnings.push("File contains no books".to_string());
        }

        let mut titles = HashSet::new();

        for (idx, raw) in records.iter().enumerate() {
            let label = format!("{}. {}", idx + 1, ImportRecord::title_of(raw));

            let resolved = match ImportRecord::from_value(raw).and_then(ImportRecord::resolve) {
                Ok(resolved) => resolved,
                Err(e) => {
                    report.errors.push(format!("Book '{}': {}", label, e));
                    continue;
                }
            };
            report.valid += 1;

            if !titles.insert(resolved.book.title.clone()) {
                report.warnings.push(format!(
                    "Book '{}' repeats a title earlier in the file and will be rejected",
                    label
                ));
            }

            if resolved.img_link.is_none() {
                report
                    .warnings
                    .push(format!("Book '{}' has no img_link", label));
            }

            match raw.get("benefits") {
                None | Some(Value::Null) => report
                    .warnings
                    .push(format!("Book '{}' has no benefits", label)),
                Some(Value::Array(entries)) => {
                    if entries.iter().any(|e| !e.is_string()) {
                        report.warnings.push(format!(
                            "Book '{}' has non-text benefit entries that will be ignored",
                            label
                        ));
                    }
                }
                Some(_) => report.warnings.push(format!(
                    "Book '{}' has benefits that are not an array and will be ignored",
                    label
                )),
            }

            if resolution == BenefitResolution::PassThrough {
                for entry in &resolved.benefits {
                    if Uuid::parse_str(entry.trim()).is_err() {
                        report.warnings.push(format!(
                            "Book '{}': benefit '{}' is not an ID; use name lookup to resolve names",
                            label, entry
                        ));
                    }
                }
            }
        }

        report
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub total: usize,
    pub valid: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }

    pub fn into_result(self) -> Result<Self> {
        if self.errors.is_empty() {
            Ok(self)
        } else {
            Err(ImporterError::ImportError(format!(
                "Validation failed with {} error(s): {}",
                self.errors.len(),
                self.errors.join("; ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_batch_has_no_errors() {
        let records = vec![json!({
            "title": "Goodnight Moon",
            "author": "Margaret Wise Brown",
            "description": "A bedtime classic.",
            "benefits": ["6f1c1d1e-8d53-4c7e-9d7a-0a4f2b1c3d4e"],
            "img_link": "https://img.example/moon.jpg"
        })];

        let report = BatchValidator::validate(&records, BenefitResolution::PassThrough);
        assert_eq!(report.valid, 1);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_unresolvable_records_are_errors() {
        let records = vec![json!({ "title": "No author" }), json!(3)];

        let report = BatchValidator::validate(&records, BenefitResolution::PassThrough);
        assert_eq!(report.total, 2);
        assert_eq!(report.valid, 0);
        assert_eq!(report.errors.len(), 2);
        assert!(report.into_result().is_err());
    }

    #[test]
    fn test_warnings_for_missing_relations_and_duplicates() {
        let record = json!({
            "title": "Corduroy",
            "author": "Don Freeman",
            "description": "A bear and his button."
        });
        let records = vec![record.clone(), record];

        let report = BatchValidator::validate(&records, BenefitResolution::NameLookup);
        assert!(report.errors.is_empty());
        assert!(report.warnings.iter().any(|w| w.contains("repeats a title")));
        assert!(report.warnings.iter().any(|w| w.contains("no img_link")));
        assert!(report.warnings.iter().any(|w| w.contains("no benefits")));
    }

    #[test]
    fn test_benefit_names_flagged_only_for_pass_through() {
        let records = vec![json!({
            "title": "Corduroy",
            "author": "Don Freeman",
            "description": "A bear and his button.",
            "benefits": ["Social Skills"],
            "img_link": "https://img.example/c.jpg"
        })];

        let pass = BatchValidator::validate(&records, BenefitResolution::PassThrough);
        assert!(pass.warnings.iter().any(|w| w.contains("is not an ID")));

        let lookup = BatchValidator::validate(&records, BenefitResolution::NameLookup);
        assert!(lookup.warnings.is_empty());
    }
}
