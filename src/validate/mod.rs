// src/validate/mod.rs

pub mod duplicates;
pub mod rules;
pub mod tokenize;

use tracing::{debug, info, instrument};

use crate::config::ValidatorConfig;
use crate::report::{Problem, ProblemKind, ValidationResult};
use duplicates::DuplicateIndex;
use rules::{check_field_count, check_image_url, check_required, field_at};
use tokenize::tokenize;

/// Structural checker for product catalog CSVs. Holds only configuration, so
/// one instance can be shared across threads and calls.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Check `text` and report every anomaly as a problem. Never fails.
    ///
    /// Problems come out row by row; within a row the order is field count,
    /// name, brand, duplicate key, image URL.
    #[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    pub fn validate(&self, text: &str) -> ValidationResult {
        let cfg = &self.config;
        let table = tokenize(text, cfg.delimiter, cfg.tokenizer);
        let headers = table.headers();
        let image_col = headers
            .iter()
            .position(|h| h.trim() == cfg.image_column);

        let mut problems: Vec<Problem> = Vec::new();
        let mut dups = DuplicateIndex::new();

        if cfg.require_data_rows && table.rows.len() <= 1 {
            problems.push(Problem::new(
                1,
                ProblemKind::NoDataRows,
                "no data rows below the header",
            ));
        }

        for (row, fields) in table.data_rows() {
            check_field_count(row, fields, headers.len(), &mut problems);
            check_required(row, fields, headers, cfg, &mut problems);

            let name = field_at(fields, cfg.name_index).trim();
            let brand = field_at(fields, cfg.brand_index).trim();
            if let Some(first) = dups.check(row, name, brand) {
                problems.push(
                    Problem::new(
                        row,
                        ProblemKind::DuplicateKey,
                        format!(
                            "duplicate of row {} (nombre='{}', marca='{}')",
                            first, name, brand
                        ),
                    )
                    .with_related_row(first),
                );
            }

            if let Some(col) = image_col {
                check_image_url(row, field_at(fields, col), cfg, &mut problems);
            }
        }

        for p in &problems {
            debug!(row = p.row, kind = %p.kind, "{}", p.message);
        }

        let result = ValidationResult::new(
            table.rows.len(),
            headers.iter().map(|h| h.to_string()).collect(),
            problems,
        );
        info!(
            lines = result.total_lines,
            columns = result.headers.len(),
            problems = result.problems.len(),
            valid = result.is_valid,
            "validated catalog"
        );
        result
    }
}

/// Validate with the default settings: comma delimiter, naive split, `imagen_url` prefix check.
pub fn validate(text: &str) -> ValidationResult {
    Validator::default().validate(text)
}
