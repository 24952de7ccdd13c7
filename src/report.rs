// src/report.rs

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, fmt::Write as _, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProblemKind {
    FieldCountMismatch,
    EmptyRequiredField,
    DuplicateKey,
    #[serde(rename = "InvalidURL")]
    InvalidUrl,
    NoDataRows,
}

impl ProblemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProblemKind::FieldCountMismatch => "FieldCountMismatch",
            ProblemKind::EmptyRequiredField => "EmptyRequiredField",
            ProblemKind::DuplicateKey => "DuplicateKey",
            ProblemKind::InvalidUrl => "InvalidURL",
            ProblemKind::NoDataRows => "NoDataRows",
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation failure. `row` is 1-based and counts the header as row 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub row: usize,
    pub message: String,
    pub kind: ProblemKind,
    /// Earlier row a `DuplicateKey` collides with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_row: Option<usize>,
}

impl Problem {
    pub fn new(row: usize, kind: ProblemKind, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
            kind,
            related_row: None,
        }
    }

    pub fn with_related_row(mut self, row: usize) -> Self {
        self.related_row = Some(row);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub total_lines: usize,
    pub headers: Vec<String>,
    pub problems: Vec<Problem>,
    pub is_valid: bool,
}

impl ValidationResult {
    pub fn new(total_lines: usize, headers: Vec<String>, problems: Vec<Problem>) -> Self {
        let is_valid = problems.is_empty();
        Self {
            total_lines,
            headers,
            problems,
            is_valid,
        }
    }

    /// Rows below the header.
    pub fn data_rows(&self) -> usize {
        self.total_lines.saturating_sub(1)
    }

    pub fn problems_of(&self, kind: ProblemKind) -> impl Iterator<Item = &Problem> {
        self.problems.iter().filter(move |p| p.kind == kind)
    }

    pub fn counts_by_kind(&self) -> BTreeMap<ProblemKind, usize> {
        let mut counts = BTreeMap::new();
        for p in &self.problems {
            *counts.entry(p.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing result to JSON")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("serializing result to YAML")
    }

    /// Console report: a summary, then one line per problem.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} lines, {} columns, {} data rows",
            self.total_lines,
            self.headers.len(),
            self.data_rows()
        );
        if self.is_valid {
            out.push_str("OK: no problems found\n");
            return out;
        }

        let breakdown = self
            .counts_by_kind()
            .iter()
            .map(|(k, n)| format!("{k}: {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "INVALID: {} problem(s) ({})",
            self.problems.len(),
            breakdown
        );
        for p in &self.problems {
            let _ = writeln!(out, "  row {} [{}] {}", p.row, p.kind, p.message);
        }
        out
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => self.to_json(),
            OutputFormat::Yaml => self.to_yaml(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            other => Err(anyhow!("unknown output format: {}", other)),
        }
    }
}
