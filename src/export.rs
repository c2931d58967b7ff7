use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use serde::Serialize;

use crate::pack::{PlacedCircle, pack_with_rng};
use crate::store::{LegendEntry, ResultStore};

/// Everything a renderer needs to draw one packing: canvas, circles in paint
/// order and the legend.
#[derive(Debug, Serialize)]
pub struct LayoutDocument<'a, P> {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub cap: usize,
    pub legend: Vec<LegendEntry<'a>>,
    pub circles: Vec<PlacedCircle<P>>,
}

pub fn layout_document<'a, P: Clone, R: Rng + ?Sized>(
    store: &'a ResultStore<P>,
    width: f64,
    height: f64,
    padding: f64,
    rng: &mut R,
) -> LayoutDocument<'a, P> {
    let items = store.flatten();
    LayoutDocument {
        width,
        height,
        padding,
        cap: store.cap(),
        legend: store.legend(),
        circles: pack_with_rng(&items, width, height, padding, rng),
    }
}

pub fn write_layout<P: Serialize>(document: &LayoutDocument<'_, P>, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(document).context("failed to serialize layout")?;
    fs::write(path, json).with_context(|| format!("failed to write layout to {}", path.display()))
}
