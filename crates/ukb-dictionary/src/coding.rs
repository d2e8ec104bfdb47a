//! Coding-table extraction from fetched pages and downloaded payloads.
//!
//! All functions here are pure content parsers: fetched text in, optional
//! mapping out. The resolution order and networking live in the resolver
//! crate.

use ukb_ingest::detect_delimiter;
use ukb_model::CodingMap;

use crate::doc::{Document, Table};
use crate::{CRYSTAL_BASE, SHOWCASE_BASE};

/// Case-insensitive labels identifying a coding table's code column.
const CODE_LABELS: [&str; 3] = ["coding", "value", "code"];

/// Case-insensitive labels identifying a coding table's meaning column.
const MEANING_LABELS: [&str; 2] = ["meaning", "description"];

/// Leading bytes sampled when sniffing a downloaded payload's delimiter.
const PAYLOAD_SAMPLE_LEN: usize = 1000;

/// Extract a code-to-meaning mapping from a coding page.
///
/// Prefers the table whose headers mention both a code and a meaning label,
/// else takes the first table on the page. Returns an empty map when the
/// page yields nothing usable.
pub fn parse_coding_page(markup: &str) -> CodingMap {
    let document = Document::parse(markup);
    let tables = document.tables();
    let Some(table) = find_coding_table(&tables) else {
        return CodingMap::new();
    };

    let mut mapping = CodingMap::new();
    for row in table.rows() {
        if row.is_header() {
            continue;
        }
        let cells = row.cells();
        if cells.len() < 2 {
            continue;
        }
        let code = cells[0].text();
        let meaning = cells[1].text();
        if code.is_empty() || meaning.is_empty() {
            continue;
        }
        mapping.insert(code, meaning);
    }
    mapping
}

fn find_coding_table<'t, 'a>(tables: &'t [Table<'a>]) -> Option<&'t Table<'a>> {
    for table in tables {
        let headers = table.header_texts();
        if headers.is_empty() {
            continue;
        }
        let has_code = headers
            .iter()
            .any(|h| CODE_LABELS.iter().any(|label| h.contains(label)));
        let has_meaning = headers
            .iter()
            .any(|h| MEANING_LABELS.iter().any(|label| h.contains(label)));
        if has_code && has_meaning {
            return Some(table);
        }
    }
    tables.first()
}

/// First anchor on the page whose visible text mentions "download".
pub fn find_download_link(markup: &str) -> Option<String> {
    let document = Document::parse(markup);
    document
        .links()
        .into_iter()
        .find(|link| link.text.to_lowercase().contains("download"))
        .map(|link| link.href)
}

/// Absolutize a download href against the base of the page it was found on.
pub fn absolutize_download(href: &str, page_url: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    let base = if page_url.contains("ctsu.ox.ac.uk") {
        CRYSTAL_BASE
    } else {
        SHOWCASE_BASE
    };
    format!("{base}{}", href.trim_start_matches('/'))
}

/// Parse a downloaded delimited payload into a code-to-meaning mapping.
///
/// The delimiter is sniffed from a leading sample (tab default). The first
/// row is skipped as a header only when it mentions coding/meaning
/// keywords; otherwise it is data and kept.
pub fn parse_delimited_coding(text: &str) -> CodingMap {
    let sample_len = text.len().min(PAYLOAD_SAMPLE_LEN);
    let delimiter = detect_delimiter(&text.as_bytes()[..sample_len], b'\t');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut mapping = CodingMap::new();
    let mut first = true;
    for record in reader.records() {
        let Ok(record) = record else {
            return CodingMap::new();
        };
        if first {
            first = false;
            if is_keyword_header(&record) {
                continue;
            }
        }
        let Some((code, meaning)) = record_pair(&record) else {
            continue;
        };
        mapping.insert(code, meaning);
    }
    mapping
}

fn record_pair(record: &csv::StringRecord) -> Option<(String, String)> {
    if record.len() < 2 {
        return None;
    }
    let code = record.get(0)?.trim();
    let meaning = record.get(1)?.trim();
    if code.is_empty() || meaning.is_empty() {
        return None;
    }
    Some((code.to_string(), meaning.to_string()))
}

fn is_keyword_header(record: &csv::StringRecord) -> bool {
    let joined = record.iter().collect::<Vec<_>>().join(" ").to_lowercase();
    CODE_LABELS
        .iter()
        .chain(MEANING_LABELS.iter())
        .any(|keyword| joined.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODING_PAGE: &str = r#"
        <html><body>
        <p><a href="codown.cgi?id=9">Download</a></p>
        <table>
          <tr><th>Coding</th><th>Meaning</th></tr>
          <tr><td>0</td><td>Female</td></tr>
          <tr><td>1</td><td>Male</td></tr>
          <tr><td></td><td>orphan meaning</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn parses_coding_table() {
        let mapping = parse_coding_page(CODING_PAGE);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("0").map(String::as_str), Some("Female"));
        assert_eq!(mapping.get("1").map(String::as_str), Some("Male"));
    }

    #[test]
    fn header_row_never_becomes_an_entry() {
        let mapping = parse_coding_page(CODING_PAGE);
        assert!(!mapping.contains_key("Coding"));
    }

    #[test]
    fn falls_back_to_first_table_without_labels() {
        let page = r#"
            <table>
              <tr><td>0</td><td>No</td></tr>
              <tr><td>1</td><td>Yes</td></tr>
            </table>
        "#;
        let mapping = parse_coding_page(page);
        assert_eq!(mapping.get("1").map(String::as_str), Some("Yes"));
    }

    #[test]
    fn empty_page_yields_empty_map() {
        assert!(parse_coding_page("<html><body></body></html>").is_empty());
    }

    #[test]
    fn finds_download_link_by_text() {
        assert_eq!(
            find_download_link(CODING_PAGE),
            Some("codown.cgi?id=9".to_string())
        );
        assert_eq!(find_download_link("<a href=\"x\">elsewhere</a>"), None);
    }

    #[test]
    fn absolutizes_against_the_page_base() {
        assert_eq!(
            absolutize_download("codown.cgi?id=9", "https://biobank.ndph.ox.ac.uk/ukb/coding.cgi?id=9"),
            "https://biobank.ndph.ox.ac.uk/ukb/codown.cgi?id=9"
        );
        assert_eq!(
            absolutize_download("/codown.cgi?id=9", "https://biobank.ctsu.ox.ac.uk/crystal/coding.cgi?id=9"),
            "https://biobank.ctsu.ox.ac.uk/crystal/codown.cgi?id=9"
        );
        assert_eq!(
            absolutize_download("https://host.test/file.tsv", "https://biobank.ndph.ox.ac.uk/ukb/"),
            "https://host.test/file.tsv"
        );
    }

    #[test]
    fn parses_tab_payload_with_keyword_header() {
        let mapping = parse_delimited_coding("Coding\tMeaning\n0\tFemale\n1\tMale\n");
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("0").map(String::as_str), Some("Female"));
    }

    #[test]
    fn keeps_first_row_when_it_looks_like_data() {
        let mapping = parse_delimited_coding("0\tFemale\n1\tMale\n");
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("0").map(String::as_str), Some("Female"));
    }

    #[test]
    fn sniffs_comma_and_semicolon_payloads() {
        let comma = parse_delimited_coding("code,meaning\n0,No\n1,Yes\n");
        assert_eq!(comma.get("1").map(String::as_str), Some("Yes"));

        let semicolon = parse_delimited_coding("0;No\n1;Yes\n");
        assert_eq!(semicolon.get("0").map(String::as_str), Some("No"));
    }

    #[test]
    fn skips_rows_missing_either_side() {
        let mapping = parse_delimited_coding("0\tFemale\n\t\n2\t\n");
        assert_eq!(mapping.len(), 1);
    }
}
