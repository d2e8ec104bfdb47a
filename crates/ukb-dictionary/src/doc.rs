//! Narrow document-query interface over the HTML parser.
//!
//! Everything the page parsers need from markup goes through this module:
//! find tables, read header and data cells, follow links. Keeping the HTML
//! library behind this seam keeps the parsers testable against small
//! hand-written fixtures and independent of selector details.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static HEADER_CELL: LazyLock<Selector> = LazyLock::new(|| selector("th"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td, th"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static css selector")
}

/// A parsed document.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Every table in the document, in document order.
    pub fn tables(&self) -> Vec<Table<'_>> {
        self.html.select(&TABLE).map(Table).collect()
    }

    /// Every anchor in the document with a non-empty `href`.
    pub fn links(&self) -> Vec<Link> {
        self.html.select(&ANCHOR).filter_map(link_of).collect()
    }
}

/// One table element.
pub struct Table<'a>(ElementRef<'a>);

impl<'a> Table<'a> {
    /// Lowercased, whitespace-collapsed text of every header cell.
    pub fn header_texts(&self) -> Vec<String> {
        self.0
            .select(&HEADER_CELL)
            .map(|cell| collapse_text(cell).to_lowercase())
            .collect()
    }

    pub fn rows(&self) -> Vec<Row<'a>> {
        self.0.select(&ROW).map(Row).collect()
    }
}

/// One table row.
pub struct Row<'a>(ElementRef<'a>);

impl<'a> Row<'a> {
    pub fn cells(&self) -> Vec<Cell<'a>> {
        self.0.select(&CELL).map(Cell).collect()
    }

    /// True when every cell is a header cell (the row labels columns rather
    /// than carrying data).
    pub fn is_header(&self) -> bool {
        self.0
            .select(&CELL)
            .all(|cell| cell.value().name().eq_ignore_ascii_case("th"))
    }
}

/// One table cell.
pub struct Cell<'a>(ElementRef<'a>);

impl Cell<'_> {
    /// Whitespace-collapsed cell text, links included.
    pub fn text(&self) -> String {
        collapse_text(self.0)
    }

    /// Every anchor inside the cell with a non-empty `href`.
    pub fn links(&self) -> Vec<Link> {
        self.0.select(&ANCHOR).filter_map(link_of).collect()
    }
}

/// An anchor's visible text and target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: String,
}

fn link_of(element: ElementRef<'_>) -> Option<Link> {
    let href = element.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }
    Some(Link {
        text: collapse_text(element),
        href: href.to_string(),
    })
}

fn collapse_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
