// src/validate/tokenize.rs

use csv::ReaderBuilder;
use std::borrow::Cow;
use tracing::warn;

use crate::config::TokenizerMode;

/// Header row followed by data rows, fields borrowed from the input where possible.
#[derive(Debug, Default)]
pub struct Table<'a> {
    pub rows: Vec<Vec<Cow<'a, str>>>,
}

impl<'a> Table<'a> {
    pub fn headers(&self) -> &[Cow<'a, str>] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Data rows paired with their 1-based row number (header is row 1).
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[Cow<'a, str>])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, r)| (i + 1, r.as_slice()))
    }
}

pub fn tokenize(text: &str, delimiter: char, mode: TokenizerMode) -> Table<'_> {
    match mode {
        TokenizerMode::Naive => naive(text, delimiter),
        TokenizerMode::Quoted => match u8::try_from(delimiter) {
            Ok(d) if d.is_ascii() => quoted(text, d),
            _ => {
                warn!(%delimiter, "quoted tokenizer needs an ASCII delimiter; splitting naively");
                naive(text, delimiter)
            }
        },
    }
}

/// Lines split on `\n` with a trailing `\r` removed. The empty piece after a
/// terminating newline is not a line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Plain delimiter split; quotes are ordinary characters.
pub fn split_fields(line: &str, delimiter: char) -> Vec<Cow<'_, str>> {
    line.split(delimiter).map(Cow::Borrowed).collect()
}

fn naive(text: &str, delimiter: char) -> Table<'_> {
    Table {
        rows: split_lines(text)
            .into_iter()
            .map(|l| split_fields(l, delimiter))
            .collect(),
    }
}

// csv skips blank lines, so they never become rows in this mode.
fn quoted(text: &str, delimiter: u8) -> Table<'static> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for rec in rdr.byte_records() {
        match rec {
            Ok(rec) => rows.push(
                rec.iter()
                    .map(|f| Cow::Owned(String::from_utf8_lossy(f).into_owned()))
                    .collect(),
            ),
            Err(e) => {
                warn!(error = %e, records = rows.len(), "stopping quoted tokenizer early");
                break;
            }
        }
    }
    Table { rows }
}
