// src/validate/rules.rs

use std::borrow::Cow;
use url::Url;

use crate::config::{UrlCheck, ValidatorConfig};
use crate::report::{Problem, ProblemKind};

/// Field at `idx`, or `""` when the row is too short.
pub fn field_at<'r>(fields: &'r [Cow<'_, str>], idx: usize) -> &'r str {
    fields.get(idx).map(|f| &**f).unwrap_or("")
}

fn column_label(headers: &[Cow<'_, str>], idx: usize) -> String {
    match headers.get(idx).map(|h| h.trim()) {
        Some(h) if !h.is_empty() => format!("'{}'", h),
        _ => format!("#{}", idx + 1),
    }
}

pub fn check_field_count(
    row: usize,
    fields: &[Cow<'_, str>],
    expected: usize,
    out: &mut Vec<Problem>,
) {
    if fields.len() != expected {
        out.push(Problem::new(
            row,
            ProblemKind::FieldCountMismatch,
            format!("found {} fields, expected {}", fields.len(), expected),
        ));
    }
}

/// Name first, then brand; one problem per empty field.
pub fn check_required(
    row: usize,
    fields: &[Cow<'_, str>],
    headers: &[Cow<'_, str>],
    cfg: &ValidatorConfig,
    out: &mut Vec<Problem>,
) {
    for idx in [cfg.name_index, cfg.brand_index] {
        if field_at(fields, idx).trim().is_empty() {
            out.push(Problem::new(
                row,
                ProblemKind::EmptyRequiredField,
                format!("required field {} is empty", column_label(headers, idx)),
            ));
        }
    }
}

pub fn check_image_url(row: usize, value: &str, cfg: &ValidatorConfig, out: &mut Vec<Problem>) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    if !value.starts_with(cfg.url_prefix.as_str()) {
        out.push(Problem::new(
            row,
            ProblemKind::InvalidUrl,
            format!(
                "{} '{}' does not start with '{}'",
                cfg.image_column, value, cfg.url_prefix
            ),
        ));
        return;
    }
    if cfg.url_check == UrlCheck::Strict {
        let reason = match Url::parse(value) {
            Ok(u) if matches!(u.scheme(), "http" | "https") && u.has_host() => return,
            Ok(u) => format!("unsupported scheme '{}'", u.scheme()),
            Err(e) => e.to_string(),
        };
        out.push(Problem::new(
            row,
            ProblemKind::InvalidUrl,
            format!("{} '{}' is not a valid URL: {}", cfg.image_column, value, reason),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cows<'a>(v: &[&'a str]) -> Vec<Cow<'a, str>> {
        v.iter().map(|s| Cow::Borrowed(*s)).collect()
    }

    #[test]
    fn missing_fields_read_as_empty() {
        let f = cows(&["only"]);
        assert_eq!(field_at(&f, 0), "only");
        assert_eq!(field_at(&f, 5), "");
    }

    #[test]
    fn required_checks_name_before_brand() {
        let headers = cows(&["nombre", "marca"]);
        let mut out = Vec::new();
        check_required(7, &cows(&["  ", ""]), &headers, &ValidatorConfig::default(), &mut out);
        assert_eq!(out.len(), 2);
        assert!(out[0].message.contains("'nombre'"));
        assert!(out[1].message.contains("'marca'"));
        assert!(out.iter().all(|p| p.row == 7));
    }

    #[test]
    fn unnamed_column_uses_position() {
        let mut out = Vec::new();
        check_required(2, &cows(&["x"]), &cows(&["nombre"]), &ValidatorConfig::default(), &mut out);
        assert_eq!(out.len(), 1);
        assert!(out[0].message.contains("#2"));
    }

    #[test]
    fn field_count_message_has_both_counts() {
        let mut out = Vec::new();
        check_field_count(3, &cows(&["a", "b"]), 4, &mut out);
        assert_eq!(out[0].message, "found 2 fields, expected 4");
    }

    #[test]
    fn strict_mode_rejects_what_prefix_accepts() {
        let strict = ValidatorConfig {
            url_check: UrlCheck::Strict,
            ..ValidatorConfig::default()
        };
        let mut out = Vec::new();
        check_image_url(2, "http//broken", &ValidatorConfig::default(), &mut out);
        assert!(out.is_empty());
        check_image_url(2, "http//broken", &strict, &mut out);
        assert_eq!(out.len(), 1);
        check_image_url(3, "https://cdn.example.com/a.png", &strict, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn prefix_mode_accepts_http_lookalikes() {
        let mut out = Vec::new();
        check_image_url(2, "httpfoo", &ValidatorConfig::default(), &mut out);
        check_image_url(2, "   ", &ValidatorConfig::default(), &mut out);
        assert!(out.is_empty());
        check_image_url(2, "ftp://x.com/a.png", &ValidatorConfig::default(), &mut out);
        assert_eq!(out[0].kind, ProblemKind::InvalidUrl);
    }
}
