//! Dataset pair discovery and CSV parsing.
//!
//! The export writes every tabular dataset twice: `<base>.csv` holds the rows
//! as constrained by the saved view, `<base>_all.csv` the complete row set.
//! Given either file this module locates the sibling and loads both.
//!
//! ## Pairing contract
//!
//! The pair is derived from the base name alone — strip a trailing `_all`
//! marker if present, then look for `<base>.csv` and `<base>_all.csv` next to
//! each other. Resolving from either variant therefore yields the same pair.
//! When the sibling is missing, the variant that does exist serves both sides
//! of the pair rather than reporting an absent half; partial exports stay
//! usable and the caller never sees an empty `all`.
//!
//! ## Parsing
//!
//! Quoted fields may contain the delimiter, doubled quotes, and line breaks.
//! The two variants are parsed independently: their column sets and row
//! counts may differ. Short rows are padded with empty strings; cells beyond
//! the header are dropped.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::paths;
use crate::types::{CsvPair, CsvTable};

/// Marker distinguishing the complete export from the view-filtered one.
pub const ALL_MARKER: &str = "_all";

#[derive(Error, Debug)]
pub enum DatasetError {
    /// The path escapes the data root or points at nothing. Treated as
    /// not-found by callers.
    #[error("no dataset at {0}")]
    NotFound(String),
    /// The file exists but could not be read.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    /// The file exists but is not parseable as delimited text.
    #[error("malformed dataset {path}: {reason}")]
    Malformed { path: String, reason: String },
}

/// Derive the root-relative paths of both variants from either one.
///
/// Returns `(filtered, all)`. Purely lexical — existence is checked by
/// [`load_pair`].
pub fn pair_paths(rel_path: &Path) -> (PathBuf, PathBuf) {
    let stem = rel_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = stem.strip_suffix(ALL_MARKER).unwrap_or(&stem);
    let parent = rel_path.parent().unwrap_or(Path::new(""));
    (
        parent.join(format!("{base}.csv")),
        parent.join(format!("{base}{ALL_MARKER}.csv")),
    )
}

/// Load both variants of the dataset that `rel_path` belongs to.
///
/// `rel_path` may point at either variant. The requested file must exist and
/// parse; a missing sibling degrades to the present variant serving both
/// sides, which keeps resolution idempotent across the two entry points.
pub fn load_pair(data_root: &Path, rel_path: &Path) -> Result<CsvPair, DatasetError> {
    let (filtered_rel, all_rel) = pair_paths(rel_path);

    let filtered_abs = resolve_existing(data_root, &filtered_rel);
    let all_abs = resolve_existing(data_root, &all_rel);

    let filtered = match (&filtered_abs, &all_abs) {
        (Some(path), _) => load_table(path, &filtered_rel)?,
        // Filtered export missing: the complete one stands in.
        (None, Some(path)) => load_table(path, &all_rel)?,
        // Neither variant resolves — there is no dataset here.
        (None, None) => return Err(DatasetError::NotFound(rel_path.display().to_string())),
    };
    let all = match &all_abs {
        Some(path) => load_table(path, &all_rel)?,
        None => filtered.clone(),
    };

    Ok(CsvPair { filtered, all })
}

fn resolve_existing(data_root: &Path, rel: &Path) -> Option<PathBuf> {
    let abs = paths::resolve_under_root(data_root, rel)?;
    abs.is_file().then_some(abs)
}

fn load_table(abs: &Path, rel: &Path) -> Result<CsvTable, DatasetError> {
    let text = fs::read_to_string(abs).map_err(|source| DatasetError::Io {
        path: rel.display().to_string(),
        source,
    })?;
    parse_csv(&text).map_err(|reason| DatasetError::Malformed {
        path: rel.display().to_string(),
        reason,
    })
}

/// Parse delimited text with a header row into a [`CsvTable`].
///
/// Handles quoted fields containing commas, doubled quotes, and embedded
/// line breaks. CRLF line endings are tolerated. A trailing newline does not
/// produce a phantom row.
pub fn parse_csv(text: &str) -> Result<CsvTable, String> {
    let records = parse_records(text)?;
    let mut iter = records.into_iter();
    let columns = match iter.next() {
        Some(header) => header,
        None => return Err("missing header row".to_string()),
    };

    let rows = iter
        .map(|record| {
            columns
                .iter()
                .enumerate()
                .map(|(i, col)| {
                    let value = record.get(i).cloned().unwrap_or_default();
                    (col.clone(), value)
                })
                .collect::<BTreeMap<String, String>>()
        })
        .collect();

    Ok(CsvTable { columns, rows })
}

/// Split text into records of fields, honoring RFC-4180 quoting.
fn parse_records(text: &str) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // True once the current record has any content, so a file ending in a
    // newline doesn't yield a trailing empty record.
    let mut record_started = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                record_started = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                record_started = true;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if record_started || !field.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                    record_started = false;
                }
            }
            '\n' => {
                if record_started || !field.is_empty() {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                    record_started = false;
                }
            }
            _ => {
                field.push(c);
                record_started = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    if record_started || !field.is_empty() {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn row_value<'a>(table: &'a CsvTable, row: usize, col: &str) -> &'a str {
        table.rows[row].get(col).map(String::as_str).unwrap_or("")
    }

    // =========================================================================
    // Parser
    // =========================================================================

    #[test]
    fn header_becomes_columns() {
        let table = parse_csv("Name,Status\nAlpha,Open\n").unwrap();
        assert_eq!(table.columns, vec!["Name", "Status"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(row_value(&table, 0, "Name"), "Alpha");
    }

    #[test]
    fn quoted_field_with_delimiter() {
        let table = parse_csv("Name,Note\nAlpha,\"one, two\"\n").unwrap();
        assert_eq!(row_value(&table, 0, "Note"), "one, two");
    }

    #[test]
    fn quoted_field_with_line_break() {
        let table = parse_csv("Name,Note\nAlpha,\"line one\nline two\"\n").unwrap();
        assert_eq!(row_value(&table, 0, "Note"), "line one\nline two");
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn doubled_quotes_unescape() {
        let table = parse_csv("Name\n\"say \"\"hi\"\"\"\n").unwrap();
        assert_eq!(row_value(&table, 0, "Name"), "say \"hi\"");
    }

    #[test]
    fn crlf_endings_tolerated() {
        let table = parse_csv("Name,Status\r\nAlpha,Open\r\n").unwrap();
        assert_eq!(table.columns, vec!["Name", "Status"]);
        assert_eq!(row_value(&table, 0, "Status"), "Open");
    }

    #[test]
    fn short_rows_pad_with_empty() {
        let table = parse_csv("A,B,C\n1,2\n").unwrap();
        assert_eq!(row_value(&table, 0, "C"), "");
    }

    #[test]
    fn extra_cells_are_dropped() {
        let table = parse_csv("A,B\n1,2,3\n").unwrap();
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn trailing_newline_adds_no_row() {
        let table = parse_csv("A\n1\n").unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let table = parse_csv("A,B\n").unwrap();
        assert_eq!(table.columns, vec!["A", "B"]);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn empty_input_is_malformed() {
        assert!(parse_csv("").is_err());
    }

    #[test]
    fn unterminated_quote_is_malformed() {
        assert!(parse_csv("A\n\"broken\n").is_err());
    }

    #[test]
    fn empty_cells_survive() {
        let table = parse_csv("A,B\n,2\n").unwrap();
        assert_eq!(row_value(&table, 0, "A"), "");
        assert_eq!(row_value(&table, 0, "B"), "2");
    }

    // =========================================================================
    // Pairing
    // =========================================================================

    #[test]
    fn pair_paths_from_filtered_variant() {
        let (filtered, all) = pair_paths(Path::new("Board abc123.csv"));
        assert_eq!(filtered, Path::new("Board abc123.csv"));
        assert_eq!(all, Path::new("Board abc123_all.csv"));
    }

    #[test]
    fn pair_paths_from_all_variant() {
        let (filtered, all) = pair_paths(Path::new("sub/Board abc123_all.csv"));
        assert_eq!(filtered, Path::new("sub/Board abc123.csv"));
        assert_eq!(all, Path::new("sub/Board abc123_all.csv"));
    }

    fn write_board(dir: &Path) {
        fs::write(
            dir.join("Board abc123de.csv"),
            "Name,Status\nAlpha,Open\n",
        )
        .unwrap();
        fs::write(
            dir.join("Board abc123de_all.csv"),
            "Name,Status,Hidden\nAlpha,Open,x\nBeta,Done,y\n",
        )
        .unwrap();
    }

    #[test]
    fn both_variants_parsed_independently() {
        let tmp = TempDir::new().unwrap();
        write_board(tmp.path());

        let pair = load_pair(tmp.path(), Path::new("Board abc123de.csv")).unwrap();
        assert_eq!(pair.filtered.columns, vec!["Name", "Status"]);
        assert_eq!(pair.all.columns, vec!["Name", "Status", "Hidden"]);
        assert_eq!(pair.filtered.rows.len(), 1);
        assert_eq!(pair.all.rows.len(), 2);
    }

    #[test]
    fn pairing_is_idempotent_from_either_variant() {
        let tmp = TempDir::new().unwrap();
        write_board(tmp.path());

        let from_filtered = load_pair(tmp.path(), Path::new("Board abc123de.csv")).unwrap();
        let from_all = load_pair(tmp.path(), Path::new("Board abc123de_all.csv")).unwrap();
        assert_eq!(from_filtered, from_all);
    }

    #[test]
    fn missing_sibling_degrades_all_to_filtered() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Solo ffee0011.csv"), "A\n1\n").unwrap();

        let pair = load_pair(tmp.path(), Path::new("Solo ffee0011.csv")).unwrap();
        assert_eq!(pair.filtered, pair.all);
        assert_eq!(pair.filtered.rows.len(), 1);
    }

    #[test]
    fn lone_all_variant_serves_both_sides() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Solo ffee0011_all.csv"), "A\n1\n2\n").unwrap();

        let pair = load_pair(tmp.path(), Path::new("Solo ffee0011_all.csv")).unwrap();
        assert_eq!(pair.filtered, pair.all);
        assert_eq!(pair.all.rows.len(), 2);
    }

    #[test]
    fn missing_dataset_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = load_pair(tmp.path(), Path::new("Nope 99999999.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(_)));
    }

    #[test]
    fn escaping_path_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = load_pair(tmp.path(), Path::new("../outside.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(_)));
    }

    #[test]
    fn malformed_file_is_distinguished_from_missing() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Bad 12345678.csv"), "A\n\"open quote\n").unwrap();

        let err = load_pair(tmp.path(), Path::new("Bad 12345678.csv")).unwrap_err();
        assert!(matches!(err, DatasetError::Malformed { .. }));
    }
}
