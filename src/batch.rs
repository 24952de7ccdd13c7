// src/batch.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use glob::glob;
use rayon::prelude::*;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{error, info};

use crate::report::{ProblemKind, ValidationResult};
use crate::source::read_file;
use crate::validate::Validator;

/// Outcome for one file of a batch run.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<ValidationResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub file: String,
    pub report: Option<String>,
    pub is_valid: bool,
    pub total_lines: usize,
    pub problems: usize,
    pub by_kind: BTreeMap<ProblemKind, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub checked_at: DateTime<Utc>,
    pub files: Vec<FileSummary>,
    pub valid_files: usize,
    pub invalid_files: usize,
}

impl BatchSummary {
    pub fn all_valid(&self) -> bool {
        self.invalid_files == 0
    }
}

pub fn find_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = glob(pattern)
        .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();
    Ok(paths)
}

/// Validate every file on the rayon pool. Output keeps the input order.
pub fn check_files(paths: &[PathBuf], validator: &Validator) -> Vec<FileOutcome> {
    paths
        .par_iter()
        .map(|path| {
            let result = read_file(path).map(|text| validator.validate(&text));
            if let Err(e) = &result {
                error!(path = %path.display(), error = %e, "could not check file");
            }
            FileOutcome {
                path: path.clone(),
                result,
            }
        })
        .collect()
}

/// Write `<stem>.report.json` per checked file and `summary.json` into `out_dir`.
pub fn write_reports(out_dir: &Path, outcomes: &[FileOutcome]) -> Result<BatchSummary> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating report directory {}", out_dir.display()))?;

    let mut files = Vec::with_capacity(outcomes.len());
    for o in outcomes {
        let file = o.path.display().to_string();
        match &o.result {
            Ok(r) => {
                let stem = o
                    .path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "catalog".to_string());
                let report_path = out_dir.join(format!("{}.report.json", stem));
                fs::write(&report_path, r.to_json()?)
                    .with_context(|| format!("writing {}", report_path.display()))?;
                files.push(FileSummary {
                    file,
                    report: Some(report_path.display().to_string()),
                    is_valid: r.is_valid,
                    total_lines: r.total_lines,
                    problems: r.problems.len(),
                    by_kind: r.counts_by_kind(),
                    error: None,
                });
            }
            Err(e) => files.push(FileSummary {
                file,
                report: None,
                is_valid: false,
                total_lines: 0,
                problems: 0,
                by_kind: BTreeMap::new(),
                error: Some(format!("{:#}", e)),
            }),
        }
    }

    let valid_files = files.iter().filter(|f| f.is_valid).count();
    let summary = BatchSummary {
        checked_at: Utc::now(),
        invalid_files: files.len() - valid_files,
        valid_files,
        files,
    };

    let summary_path = out_dir.join("summary.json");
    let json = serde_json::to_string_pretty(&summary).context("serializing batch summary")?;
    fs::write(&summary_path, json)
        .with_context(|| format!("writing {}", summary_path.display()))?;
    info!(
        valid = summary.valid_files,
        invalid = summary.invalid_files,
        summary = %summary_path.display(),
        "batch finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn checks_matching_files_and_writes_reports() -> Result<()> {
        crate::logging::init_test_logging();
        let input = tempdir()?;
        fs::write(input.path().join("ok.csv"), "nombre,marca\nA,X\nB,Y\n")?;
        fs::write(input.path().join("dup.csv"), "nombre,marca\nA,X\nA,X\n")?;
        fs::write(input.path().join("notes.txt"), "not a catalog")?;

        let pattern = format!("{}/*.csv", input.path().display());
        let paths = find_files(&pattern)?;
        assert_eq!(paths.len(), 2);

        let outcomes = check_files(&paths, &Validator::default());
        let out = tempdir()?;
        let summary = write_reports(out.path(), &outcomes)?;

        assert_eq!(summary.valid_files, 1);
        assert_eq!(summary.invalid_files, 1);
        assert!(!summary.all_valid());
        // sorted: dup.csv before ok.csv
        assert_eq!(summary.files[0].by_kind.get(&ProblemKind::DuplicateKey), Some(&1));
        assert!(out.path().join("dup.report.json").is_file());
        assert!(out.path().join("ok.report.json").is_file());

        let v: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.path().join("summary.json"))?)?;
        assert_eq!(v["invalidFiles"], 1);
        assert!(v["checkedAt"].is_string());
        assert_eq!(v["files"][0]["byKind"]["DuplicateKey"], 1);
        Ok(())
    }

    #[test]
    fn unreadable_file_is_reported_not_fatal() -> Result<()> {
        let out = tempdir()?;
        let outcomes = check_files(&[PathBuf::from("/no/such/file.csv")], &Validator::default());
        let summary = write_reports(out.path(), &outcomes)?;
        assert_eq!(summary.invalid_files, 1);
        assert!(summary.files[0].error.is_some());
        assert!(summary.files[0].report.is_none());
        Ok(())
    }
}
