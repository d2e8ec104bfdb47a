//! Columns dictionary page parsing.
//!
//! The columns page lists one row per documented identifier. The qualifying
//! table is located by its header labels; rows whose identifier cell does
//! not parse are skipped rather than failing the whole page.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use ukb_model::{DataDictionary, Udi, UdiRecord};

use crate::SHOWCASE_BASE;
use crate::doc::{Document, Table};
use crate::error::{DictionaryError, Result};

/// Case-insensitive substrings identifying the qualifying table's headers.
const IDENTIFIER_LABEL: &str = "udi";
const DESCRIPTION_LABEL: &str = "description";

/// Minimum cell count for a data row on the columns page.
const MIN_ROW_CELLS: usize = 5;

/// Cell positions of the identifier and its description.
const UDI_CELL: usize = 1;
const DESCRIPTION_CELL: usize = 4;

static CODING_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*uses\s+data-coding\s+\d+\s*$").expect("valid pattern"));

static CODING_LINK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"coding\.cgi\?id=(\d+)").expect("valid pattern"));

/// Parse a columns dictionary page from disk.
pub fn parse_columns_file(path: &Path) -> Result<DataDictionary> {
    let markup = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_columns_page(&markup)
}

/// Parse a columns dictionary page into per-identifier records, field-level
/// fallbacks, and coding URL hints.
pub fn parse_columns_page(markup: &str) -> Result<DataDictionary> {
    let document = Document::parse(markup);
    let tables = document.tables();
    let table = find_columns_table(&tables).ok_or(DictionaryError::NoColumnsTable)?;

    let mut dictionary = DataDictionary::new();
    for row in table.rows() {
        if row.is_header() {
            continue;
        }
        let cells = row.cells();
        if cells.len() < MIN_ROW_CELLS {
            continue;
        }
        let Some(udi) = Udi::parse_header(&cells[UDI_CELL].text()) else {
            // Summary and spacer rows carry no identifier.
            continue;
        };
        let description_cell = &cells[DESCRIPTION_CELL];
        let description = strip_coding_clause(&description_cell.text());

        let mut coding_id = None;
        for link in description_cell.links() {
            if let Some(id) = coding_link_id(&link.href) {
                coding_id = Some(id);
                dictionary.set_coding_url(id, absolutize(&link.href));
                break;
            }
        }

        dictionary.insert(UdiRecord {
            udi,
            description,
            coding_id,
        });
    }
    debug!(records = dictionary.len(), "parsed columns dictionary");
    Ok(dictionary)
}

/// Locate the table whose headers mention both an identifier and a
/// description label; fall back to the first table on the page.
fn find_columns_table<'t, 'a>(tables: &'t [Table<'a>]) -> Option<&'t Table<'a>> {
    for table in tables {
        let headers = table.header_texts();
        if headers.is_empty() {
            continue;
        }
        let has_identifier = headers.iter().any(|h| h.contains(IDENTIFIER_LABEL));
        let has_description = headers.iter().any(|h| h.contains(DESCRIPTION_LABEL));
        if has_identifier && has_description {
            return Some(table);
        }
    }
    tables.first()
}

/// Strip a trailing `Uses data-coding N` clause from a description.
fn strip_coding_clause(description: &str) -> String {
    CODING_CLAUSE.replace(description, "").trim().to_string()
}

fn coding_link_id(href: &str) -> Option<u32> {
    let captures = CODING_LINK_ID.captures(href)?;
    captures.get(1)?.as_str().parse().ok()
}

fn absolutize(href: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    format!("{SHOWCASE_BASE}{}", href.trim_start_matches('/'))
}
