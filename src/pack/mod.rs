//! Circle packing for weighted items.
//!
//! Items are packed as siblings in their input order, scaled so the enclosing
//! circle fits the canvas, and returned in a random draw order.

mod enclose;
mod siblings;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::debug;

use crate::store::Item;
use siblings::pack_siblings;

/// Packing radius, relative to the largest item, reserved for zero-weight items
/// so they still get a slot of their own.
const MIN_PACK_RADIUS: f64 = 1e-3;
const MAX_PADDING_PASSES: usize = 12;
const PADDING_CONVERGENCE: f64 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Circle {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) r: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedCircle<P> {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub series_index: usize,
    /// Position of the source item in the slice handed to [`pack`].
    pub item_index: usize,
    pub payload: P,
}

impl<P> PlacedCircle<P> {
    pub fn distance_to<Q>(&self, other: &PlacedCircle<Q>) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.x - x).hypot(self.y - y) <= self.r
    }
}

/// Packs `items` into a `width` x `height` canvas with at least `padding`
/// between circle edges, using the thread-local RNG for the draw order.
pub fn pack<P: Clone>(
    items: &[Item<P>],
    width: f64,
    height: f64,
    padding: f64,
) -> Vec<PlacedCircle<P>> {
    pack_with_rng(items, width, height, padding, &mut rand::rng())
}

/// Same as [`pack`] with a caller-supplied random source for the draw order.
///
/// Geometry does not depend on `rng`; only the order of the returned circles
/// does. Radii are proportional to `sqrt(weight)`, so circle area tracks
/// weight. A canvas with a non-positive or non-finite side yields no circles.
pub fn pack_with_rng<P: Clone, R: Rng + ?Sized>(
    items: &[Item<P>],
    width: f64,
    height: f64,
    padding: f64,
    rng: &mut R,
) -> Vec<PlacedCircle<P>> {
    if items.is_empty() {
        return Vec::new();
    }

    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        debug!(width, height, "degenerate canvas, nothing to lay out");
        return Vec::new();
    }

    let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
    let geometry = layout_geometry(items, width, height, padding);

    let mut order = (0..items.len()).collect::<Vec<_>>();
    order.shuffle(rng);

    order
        .into_iter()
        .map(|index| {
            let (x, y, r) = geometry[index];
            PlacedCircle {
                x,
                y,
                r,
                series_index: items[index].series_index(),
                item_index: index,
                payload: items[index].payload().clone(),
            }
        })
        .collect()
}

/// Center and radius per item, in input order.
fn layout_geometry<P>(
    items: &[Item<P>],
    width: f64,
    height: f64,
    padding: f64,
) -> Vec<(f64, f64, f64)> {
    let center_x = width / 2.0;
    let center_y = height / 2.0;
    let fit = width.min(height) / 2.0;

    let magnitudes = items
        .iter()
        .map(|item| item.weight().get().sqrt())
        .collect::<Vec<_>>();
    let largest = magnitudes.iter().copied().fold(0.0, f64::max);
    let relative = magnitudes
        .iter()
        .map(|&magnitude| if largest > 0.0 { magnitude / largest } else { 0.0 })
        .collect::<Vec<_>>();

    if let [only] = relative.as_slice() {
        let r = if *only > 0.0 { fit } else { 0.0 };
        return vec![(center_x, center_y, r)];
    }

    let base_radii = relative
        .iter()
        .map(|&radius| radius.max(MIN_PACK_RADIUS))
        .collect::<Vec<_>>();

    let mut inflation = 0.0;
    let (mut circles, mut enclosing) = pack_inflated(&base_radii, inflation);
    let mut scale = fit / enclosing;

    if padding > 0.0 {
        // Padding lives in canvas units but packing happens before scaling, so
        // repack until the inflation matches the scale it produces.
        for pass in 0..MAX_PADDING_PASSES {
            inflation = padding / (2.0 * scale);
            (circles, enclosing) = pack_inflated(&base_radii, inflation);
            let fitted = fit / enclosing;
            let converged = (fitted - scale).abs() <= scale * PADDING_CONVERGENCE;
            scale = fitted;
            if converged {
                debug!(passes = pass + 1, "padding inflation converged");
                break;
            }
        }
        // Derive the scale from the inflation actually packed with, so the
        // edge gap is exactly `padding`; any residual shows up as overflow.
        scale = padding / (2.0 * inflation);
    }

    debug!(
        items = items.len(),
        scale,
        enclosing = enclosing * scale,
        fit,
        "packed circles"
    );

    circles
        .iter()
        .zip(&relative)
        .map(|(circle, &radius)| {
            (
                center_x + circle.x * scale,
                center_y + circle.y * scale,
                radius * scale,
            )
        })
        .collect()
}

fn pack_inflated(base_radii: &[f64], inflation: f64) -> (Vec<Circle>, f64) {
    let mut circles = base_radii
        .iter()
        .map(|&radius| Circle {
            x: 0.0,
            y: 0.0,
            r: radius + inflation,
        })
        .collect::<Vec<_>>();
    let enclosing = pack_siblings(&mut circles);
    (circles, enclosing)
}
