//! Coding-map resolution with an ordered fallback chain.
//!
//! Each required id goes through the cache first, then the network: fetch
//! every plausible candidate page once, then run an explicit ordered list
//! of extraction strategies over the fetched content, returning on the
//! first non-empty mapping. Strategies themselves are pure parsers from
//! `ukb-dictionary`; this module only sequences them.

use std::collections::{BTreeMap, BTreeSet};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use ukb_dictionary::{
    absolutize_download, find_download_link, parse_coding_page, parse_delimited_coding,
};
use ukb_model::{CodingMap, CodingMaps};

use crate::cache::CodingCache;
use crate::fetch::{FetchedPage, PageFetcher};
use crate::sources::{candidate_urls, is_plain_rendering};

/// Politeness delay between successive network resolutions.
const RESOLUTION_DELAY: Duration = Duration::from_millis(300);

/// Extraction strategies in the order they are attempted.
const STRATEGIES: [Strategy; 3] = [
    Strategy::PlainTable,
    Strategy::DelimitedDownload,
    Strategy::AnyTable,
];

/// One way of turning fetched pages into a coding map.
#[derive(Debug, Clone, Copy)]
enum Strategy {
    /// Table extraction over pages served with the plain-rendering flag.
    PlainTable,
    /// Download-link discovery and delimited-payload parsing.
    DelimitedDownload,
    /// Table extraction over every fetched page, flag or not.
    AnyTable,
}

/// Resolves coding maps for a set of coding ids.
pub struct CodingMapBuilder<'a, F: PageFetcher> {
    fetcher: &'a F,
    delay: Duration,
}

impl<'a, F: PageFetcher> CodingMapBuilder<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self {
            fetcher,
            delay: RESOLUTION_DELAY,
        }
    }

    /// Override the politeness delay (tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Resolve every id in ascending order. Ids with no resolvable mapping
    /// are logged and absent from the result; the pipeline treats absence
    /// as "leave values raw". Resolved maps are persisted through the cache
    /// at the end, best-effort.
    pub fn build(
        &self,
        ids: &BTreeSet<u32>,
        hints: &BTreeMap<u32, String>,
        cache: &mut dyn CodingCache,
    ) -> CodingMaps {
        let mut maps = CodingMaps::new();
        let mut fetched_any = false;
        for &id in ids {
            if let Some(map) = cache.get(id) {
                debug!(coding_id = id, entries = map.len(), "coding cache hit");
                maps.insert(id, map);
                continue;
            }
            if fetched_any {
                thread::sleep(self.delay);
            }
            fetched_any = true;
            match self.resolve_one(id, hints.get(&id).map(String::as_str)) {
                Some(map) => {
                    info!(coding_id = id, entries = map.len(), "resolved coding map");
                    cache.put(id, map.clone());
                    maps.insert(id, map);
                }
                None => warn!(coding_id = id, "no mapping resolved, values kept raw"),
            }
        }
        if let Err(error) = cache.flush() {
            warn!(%error, "failed to persist coding cache");
        }
        maps
    }

    fn resolve_one(&self, coding_id: u32, hint: Option<&str>) -> Option<CodingMap> {
        let pages = self.fetch_candidates(coding_id, hint);
        if pages.is_empty() {
            debug!(coding_id, "no candidate source responded");
            return None;
        }
        STRATEGIES
            .iter()
            .find_map(|strategy| self.apply(*strategy, &pages))
    }

    /// Fetch every candidate URL once, keeping responses that plausibly
    /// carry tabular coding content.
    fn fetch_candidates(&self, coding_id: u32, hint: Option<&str>) -> Vec<FetchedPage> {
        candidate_urls(coding_id, hint)
            .into_iter()
            .filter_map(|url| {
                let body = self.fetcher.fetch(&url)?;
                if !is_plausible_coding_page(&body) {
                    debug!(url, "response lacks coding content");
                    return None;
                }
                Some(FetchedPage { url, body })
            })
            .collect()
    }

    fn apply(&self, strategy: Strategy, pages: &[FetchedPage]) -> Option<CodingMap> {
        match strategy {
            Strategy::PlainTable => pages
                .iter()
                .filter(|page| is_plain_rendering(&page.url))
                .map(|page| parse_coding_page(&page.body))
                .find(|mapping| !mapping.is_empty()),
            Strategy::DelimitedDownload => {
                pages.iter().find_map(|page| self.try_download(page))
            }
            Strategy::AnyTable => pages
                .iter()
                .map(|page| parse_coding_page(&page.body))
                .find(|mapping| !mapping.is_empty()),
        }
    }

    fn try_download(&self, page: &FetchedPage) -> Option<CodingMap> {
        let href = find_download_link(&page.body)?;
        let url = absolutize_download(&href, &page.url);
        debug!(url, "following download link");
        let body = self.fetcher.fetch(&url)?;
        let mapping = parse_delimited_coding(&body);
        if mapping.is_empty() { None } else { Some(mapping) }
    }
}

fn is_plausible_coding_page(body: &str) -> bool {
    let lowered = body.to_lowercase();
    lowered.contains("<table") || lowered.contains("coding")
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    use crate::cache::MemoryCache;

    use super::*;

    /// Canned fetcher that records every URL it is asked for.
    struct StubFetcher {
        pages: BTreeMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| ((*url).to_string(), (*body).to_string()))
                    .collect(),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requests.borrow().clone()
        }
    }

    impl PageFetcher for StubFetcher {
        fn fetch(&self, url: &str) -> Option<String> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned()
        }
    }

    const PLAIN_URL: &str = "https://biobank.ndph.ox.ac.uk/ukb/coding.cgi?id=9&nl=1";
    const RAW_URL: &str = "https://biobank.ndph.ox.ac.uk/ukb/coding.cgi?id=9";

    const SEX_TABLE: &str = r#"
        <table>
          <tr><th>Coding</th><th>Meaning</th></tr>
          <tr><td>0</td><td>Female</td></tr>
          <tr><td>1</td><td>Male</td></tr>
        </table>
    "#;

    fn build_one(fetcher: &StubFetcher) -> CodingMaps {
        let mut cache = MemoryCache::default();
        CodingMapBuilder::new(fetcher)
            .with_delay(Duration::ZERO)
            .build(&BTreeSet::from([9]), &BTreeMap::new(), &mut cache)
    }

    #[test]
    fn plain_rendering_resolves_first() {
        let fetcher = StubFetcher::new(&[(PLAIN_URL, SEX_TABLE)]);
        let maps = build_one(&fetcher);
        assert_eq!(maps[&9].get("0").map(String::as_str), Some("Female"));
    }

    #[test]
    fn download_link_is_followed_when_tables_fail() {
        let page = r#"<p>coding</p><a href="codown.cgi?id=9">Download</a>"#;
        let fetcher = StubFetcher::new(&[
            (PLAIN_URL, page),
            (
                "https://biobank.ndph.ox.ac.uk/ukb/codown.cgi?id=9",
                "0\tFemale\n1\tMale\n",
            ),
        ]);
        let maps = build_one(&fetcher);
        assert_eq!(maps[&9].get("1").map(String::as_str), Some("Male"));
    }

    #[test]
    fn unflagged_page_resolves_as_last_resort() {
        let fetcher = StubFetcher::new(&[(RAW_URL, SEX_TABLE)]);
        let maps = build_one(&fetcher);
        assert_eq!(maps[&9].len(), 2);
    }

    #[test]
    fn unresolvable_id_is_absent() {
        let fetcher = StubFetcher::new(&[]);
        let maps = build_one(&fetcher);
        assert!(maps.is_empty());
    }

    #[test]
    fn implausible_bodies_are_discarded() {
        let fetcher = StubFetcher::new(&[(PLAIN_URL, "<html><body>error page</body></html>")]);
        let maps = build_one(&fetcher);
        assert!(maps.is_empty());
    }

    #[test]
    fn cache_hit_short_circuits_the_network() {
        let fetcher = StubFetcher::new(&[(PLAIN_URL, SEX_TABLE)]);
        let mut cache = MemoryCache::default();
        cache.put(
            9,
            CodingMap::from([("0".to_string(), "Female".to_string())]),
        );

        let maps = CodingMapBuilder::new(&fetcher)
            .with_delay(Duration::ZERO)
            .build(&BTreeSet::from([9]), &BTreeMap::new(), &mut cache);

        assert_eq!(maps[&9].len(), 1);
        assert!(fetcher.requested().is_empty());
    }

    #[test]
    fn resolved_maps_are_put_back_into_the_cache() {
        let fetcher = StubFetcher::new(&[(PLAIN_URL, SEX_TABLE)]);
        let mut cache = MemoryCache::default();
        CodingMapBuilder::new(&fetcher)
            .with_delay(Duration::ZERO)
            .build(&BTreeSet::from([9]), &BTreeMap::new(), &mut cache);
        assert_eq!(cache.get(9).map(|m| m.len()), Some(2));
    }

    #[test]
    fn hint_url_is_queried_between_flagged_and_plain_endpoints() {
        let hint = "https://host.test/hinted.cgi?id=9";
        let fetcher = StubFetcher::new(&[(hint, SEX_TABLE)]);
        let mut cache = MemoryCache::default();
        let maps = CodingMapBuilder::new(&fetcher)
            .with_delay(Duration::ZERO)
            .build(
                &BTreeSet::from([9]),
                &BTreeMap::from([(9, hint.to_string())]),
                &mut cache,
            );

        assert_eq!(maps[&9].len(), 2);
        let requested = fetcher.requested();
        assert_eq!(requested[2], hint);
    }

    #[test]
    fn ids_resolve_in_ascending_order() {
        let fetcher = StubFetcher::new(&[]);
        let mut cache = MemoryCache::default();
        CodingMapBuilder::new(&fetcher)
            .with_delay(Duration::ZERO)
            .build(&BTreeSet::from([100, 9]), &BTreeMap::new(), &mut cache);

        let requested = fetcher.requested();
        let first_for_100 = requested.iter().position(|u| u.contains("id=100")).unwrap();
        let first_for_9 = requested.iter().position(|u| u.contains("id=9&")).unwrap();
        assert!(first_for_9 < first_for_100);
    }
}
