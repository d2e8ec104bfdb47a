//! Candidate source URLs for a coding id.

use std::collections::BTreeSet;

use ukb_dictionary::{CRYSTAL_BASE, SHOWCASE_BASE};

/// Endpoint bases queried for every coding id, in preference order.
const FALLBACK_BASES: [&str; 2] = [SHOWCASE_BASE, CRYSTAL_BASE];

/// Query flag requesting the plain structured rendering of a coding table.
const PLAIN_FLAG: &str = "&nl=1";

/// Ordered, deduplicated candidate URLs for one coding id: flagged
/// endpoints first, then the discovered hint URL, then unflagged endpoints.
pub fn candidate_urls(coding_id: u32, hint: Option<&str>) -> Vec<String> {
    let mut urls = Vec::new();
    for base in FALLBACK_BASES {
        urls.push(format!("{base}coding.cgi?id={coding_id}{PLAIN_FLAG}"));
    }
    if let Some(hint) = hint {
        urls.push(hint.to_string());
    }
    for base in FALLBACK_BASES {
        urls.push(format!("{base}coding.cgi?id={coding_id}"));
    }

    let mut seen = BTreeSet::new();
    urls.retain(|url| seen.insert(url.clone()));
    urls
}

/// True when a candidate URL requested the plain structured rendering.
pub fn is_plain_rendering(url: &str) -> bool {
    url.contains(PLAIN_FLAG)
}
