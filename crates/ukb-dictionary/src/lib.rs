pub mod coding;
pub mod columns;
pub mod doc;
pub mod error;
pub mod instances;

pub use coding::{absolutize_download, find_download_link, parse_coding_page, parse_delimited_coding};
pub use columns::{parse_columns_file, parse_columns_page};
pub use error::{DictionaryError, Result};
pub use instances::{load_instance_map, parse_instance_map};

/// Primary showcase base URL, used to absolutize relative links.
pub const SHOWCASE_BASE: &str = "https://biobank.ndph.ox.ac.uk/ukb/";

/// Mirror base URL queried as a fallback source.
pub const CRYSTAL_BASE: &str = "https://biobank.ctsu.ox.ac.uk/crystal/";
