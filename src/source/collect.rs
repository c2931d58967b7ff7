use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::parse::{Repository, WeightMetric, embedded_query, parse_search_response};
use crate::store::Weighted;

#[derive(Clone, Debug)]
pub struct LoadedSeries {
    pub label: String,
    pub path: PathBuf,
    pub items: Vec<Weighted<Repository>>,
}

/// Reads one saved search response from disk.
///
/// Without an explicit `label` the series is named after the response's
/// `query` field, falling back to the file stem.
pub fn load_series(
    path: &Path,
    label: Option<&str>,
    metric: WeightMetric,
) -> Result<LoadedSeries> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read search results from {}", path.display()))?;
    let items = parse_search_response(&raw, metric)
        .with_context(|| format!("failed to parse search results in {}", path.display()))?;

    let label = label
        .map(str::to_owned)
        .or_else(|| embedded_query(&raw))
        .unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        });

    Ok(LoadedSeries {
        label,
        path: path.to_path_buf(),
        items,
    })
}
