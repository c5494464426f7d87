//! Raw delimited rows and column selection.
//!
//! Splitting is deliberately naive: lines on `'\n'`, fields on the
//! delimiter. Quoted fields and embedded delimiters are not handled here;
//! callers that need them should build a `RawTable` from a real CSV reader.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::BenfordError;
use crate::BenfordResult;

/// A header row plus data rows, all as unparsed text fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Which column of a `RawTable` to analyse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSelector {
    /// Zero-based column position
    Index(usize),
    /// Header text, matched after trimming
    Name(String),
}

impl ColumnSelector {
    /// An all-digit string selects by position, anything else by header name.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(index) = trimmed.parse::<usize>() {
                return ColumnSelector::Index(index);
            }
        }
        ColumnSelector::Name(trimmed.to_string())
    }
}

impl Default for ColumnSelector {
    fn default() -> Self {
        ColumnSelector::Index(0)
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Index(i) => write!(f, "#{}", i),
            ColumnSelector::Name(name) => write!(f, "'{}'", name),
        }
    }
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Split `text` into a table.
    ///
    /// Blank lines are skipped and a trailing `\r` is dropped from each line.
    /// Without a header line, headers are synthesised as `column_1`,
    /// `column_2`, ... sized to the widest row.
    pub fn from_delimited(text: &str, delimiter: char, has_headers: bool) -> Self {
        let mut lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.split(delimiter)
                    .map(|field| field.to_string())
                    .collect::<Vec<String>>()
            });

        let headers = if has_headers {
            lines
                .next()
                .map(|h| h.into_iter().map(|s| s.trim().to_string()).collect())
                .unwrap_or_default()
        } else {
            Vec::new()
        };
        let rows: Vec<Vec<String>> = lines.collect();

        if has_headers {
            Self { headers, rows }
        } else {
            Self::headerless(rows)
        }
    }

    /// Wrap header-less rows, naming columns `column_1`, `column_2`, ...
    pub fn headerless(rows: Vec<Vec<String>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let headers = (1..=width).map(|i| format!("column_{}", i)).collect();
        Self { headers, rows }
    }

    /// Resolve a selector to a column position and its display title.
    pub fn resolve(&self, selector: &ColumnSelector) -> BenfordResult<(usize, String)> {
        match selector {
            ColumnSelector::Index(index) => match self.headers.get(*index) {
                Some(title) => Ok((*index, title.clone())),
                None => Err(BenfordError::ColumnNotFound(format!(
                    "index {} is out of range ({} columns)",
                    index,
                    self.headers.len()
                ))),
            },
            ColumnSelector::Name(name) => {
                let wanted = name.trim();
                self.headers
                    .iter()
                    .position(|h| h.trim() == wanted)
                    .map(|index| (index, self.headers[index].clone()))
                    .ok_or_else(|| {
                        BenfordError::ColumnNotFound(format!(
                            "no header named '{}' (available: {})",
                            wanted,
                            self.headers.join(", ")
                        ))
                    })
            }
        }
    }

    /// Field values of column `index`, one per row. Short rows yield `None`.
    pub fn column(&self, index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows.iter().map(move |row| row.get(index).map(String::as_str))
    }
}
