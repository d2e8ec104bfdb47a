//! End-to-end decode pipeline with explicit stages.
//!
//! 1. **Dictionary**: parse the columns documentation page
//! 2. **Ingest**: read the input table, sniffing its dialect
//! 3. **Plan**: compute output names and per-column coding ids
//! 4. **Resolve**: build coding maps (cache first, then network)
//! 5. **Decode**: rewrite rows and stream them to the output
//!
//! Fatal errors (unrecognized dictionary, empty input) surface before the
//! output file is created, so a failed run never leaves partial output.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use ukb_coding::{CodingCache, CodingMapBuilder, HttpFetcher, JsonFileCache, MemoryCache, PageFetcher};
use ukb_dictionary::{load_instance_map, parse_columns_file};
use ukb_ingest::{TableWriter, read_table};
use ukb_map::{NamingStyle, plan_headers};
use ukb_model::InstanceMap;
use ukb_transform::DecodeEngine;

use crate::types::{CodingSummary, DecodeResult};

/// Inputs and outputs of a decode run.
pub struct DecodeOptions {
    pub dictionary: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
    pub cache: Option<PathBuf>,
    pub instance_map: Option<PathBuf>,
    pub style: NamingStyle,
}

/// Run the pipeline with the default HTTP fetcher and the configured cache.
pub fn run(options: &DecodeOptions) -> Result<DecodeResult> {
    let fetcher = HttpFetcher::new().context("build HTTP client")?;
    let mut cache: Box<dyn CodingCache> = match &options.cache {
        Some(path) => Box::new(JsonFileCache::open(path)),
        None => Box::new(MemoryCache::default()),
    };
    run_with(options, &fetcher, cache.as_mut())
}

/// Run the pipeline against injected fetcher and cache implementations.
pub fn run_with(
    options: &DecodeOptions,
    fetcher: &impl PageFetcher,
    cache: &mut dyn CodingCache,
) -> Result<DecodeResult> {
    let start = Instant::now();

    let dictionary = info_span!("dictionary")
        .in_scope(|| parse_columns_file(&options.dictionary))
        .with_context(|| format!("parse dictionary {}", options.dictionary.display()))?;
    debug!(records = dictionary.len(), "dictionary parsed");

    let table = info_span!("ingest")
        .in_scope(|| read_table(&options.input))
        .with_context(|| format!("read {}", options.input.display()))?;
    info!(
        rows = table.rows.len(),
        columns = table.headers.len(),
        "input table read"
    );

    let instances = match &options.instance_map {
        Some(path) => load_instance_map(path),
        None => InstanceMap::default(),
    };

    let plans = info_span!("plan")
        .in_scope(|| plan_headers(&table.headers, &dictionary, &instances, options.style));
    let mut columns_per_coding: BTreeMap<u32, usize> = BTreeMap::new();
    for plan in &plans {
        if let Some(coding_id) = plan.coding_id {
            *columns_per_coding.entry(coding_id).or_insert(0) += 1;
        }
    }
    let needed: BTreeSet<u32> = columns_per_coding.keys().copied().collect();
    info!(
        columns = plans.len(),
        codings = needed.len(),
        "header plan computed"
    );

    let maps = info_span!("resolve").in_scope(|| {
        CodingMapBuilder::new(fetcher).build(&needed, dictionary.coding_urls(), cache)
    });

    let engine = DecodeEngine::new(&plans, &maps);
    let mut writer = TableWriter::create(&options.output, table.delimiter)
        .with_context(|| format!("create {}", options.output.display()))?;
    writer.write_row(plans.iter().map(|plan| plan.name.as_str()))?;
    let mut rows_written = 0usize;
    for row in &table.rows {
        writer.write_row(&engine.decode_row(row))?;
        rows_written += 1;
    }
    writer.finish()?;
    info!(rows = rows_written, output = %options.output.display(), "decode complete");

    let codings = columns_per_coding
        .into_iter()
        .map(|(coding_id, columns)| {
            let entries = maps.get(&coding_id).map_or(0, |map| map.len());
            CodingSummary {
                coding_id,
                columns,
                entries,
                resolved: maps.contains_key(&coding_id),
            }
        })
        .collect();

    Ok(DecodeResult {
        output: options.output.clone(),
        rows_read: table.rows.len(),
        rows_written,
        columns: plans.len(),
        renamed: plans.iter().filter(|plan| plan.sequence.is_some()).count(),
        codings,
        elapsed: start.elapsed(),
    })
}
