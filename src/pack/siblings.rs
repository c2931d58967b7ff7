use super::Circle;
use super::enclose::enclose;

const INTERSECT_TOLERANCE: f64 = 1e-6;

/// Places `circles` around the origin so that no two overlap, keeping each
/// radius and assigning new centers. Circles are placed in slice order, each
/// one tangent to two neighbours on the current front chain.
///
/// The result is translated so the smallest enclosing circle sits at the
/// origin; its radius is returned (0 for an empty slice).
pub(super) fn pack_siblings(circles: &mut [Circle]) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return circles[0].r;
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles[0].r + circles[1].r;
    }

    place_tangent(circles, 1, 0, 2);

    // Front chain as a doubly linked ring over circle indices.
    let mut next = vec![usize::MAX; n];
    let mut previous = vec![usize::MAX; n];
    let (mut a, mut b) = (0usize, 1usize);
    next[0] = 1;
    previous[1] = 0;
    next[1] = 2;
    previous[2] = 1;
    next[2] = 0;
    previous[0] = 2;

    let mut index = 3;
    'placing: while index < n {
        place_tangent(circles, a, b, index);

        let (mut j, mut k) = (next[b], previous[a]);
        let (mut sj, mut sk) = (circles[b].r, circles[a].r);
        loop {
            if sj <= sk {
                if intersects(circles[j], circles[index]) {
                    b = j;
                    next[a] = b;
                    previous[b] = a;
                    continue 'placing;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(circles[k], circles[index]) {
                    a = k;
                    next[a] = b;
                    previous[b] = a;
                    continue 'placing;
                }
                sk += circles[k].r;
                k = previous[k];
            }

            if j == next[k] {
                break;
            }
        }

        previous[index] = a;
        next[index] = b;
        next[a] = index;
        previous[b] = index;

        // Continue from the chain pair closest to the origin.
        let mut best = a;
        let mut best_score = pair_score(circles[a], circles[next[a]]);
        let mut cursor = next[index];
        while cursor != index {
            let score = pair_score(circles[cursor], circles[next[cursor]]);
            if score < best_score {
                best = cursor;
                best_score = score;
            }
            cursor = next[cursor];
        }
        a = best;
        b = next[a];
        index += 1;
    }

    let mut chain = vec![circles[b]];
    let mut cursor = next[b];
    while cursor != b {
        chain.push(circles[cursor]);
        cursor = next[cursor];
    }

    let Some(enclosing) = enclose(&chain) else {
        return 0.0;
    };
    for circle in circles.iter_mut() {
        circle.x -= enclosing.x;
        circle.y -= enclosing.y;
    }

    enclosing.r
}

/// Moves circle `c` so it touches both `a` and `b`, on the side that keeps the
/// front chain turning counter-clockwise.
fn place_tangent(circles: &mut [Circle], a: usize, b: usize, c: usize) {
    let (first, second) = (circles[a], circles[b]);
    let radius = circles[c].r;
    let dx = first.x - second.x;
    let dy = first.y - second.y;
    let d2 = dx * dx + dy * dy;

    let (x, y) = if d2 > 0.0 {
        let a2 = (second.r + radius).powi(2);
        let b2 = (first.r + radius).powi(2);
        if a2 > b2 {
            let along = (d2 + b2 - a2) / (2.0 * d2);
            let across = (b2 / d2 - along * along).max(0.0).sqrt();
            (
                first.x - along * dx - across * dy,
                first.y - along * dy + across * dx,
            )
        } else {
            let along = (d2 + a2 - b2) / (2.0 * d2);
            let across = (a2 / d2 - along * along).max(0.0).sqrt();
            (
                second.x + along * dx - across * dy,
                second.y + along * dy + across * dx,
            )
        }
    } else {
        (second.x + radius, second.y)
    };

    circles[c].x = x;
    circles[c].y = y;
}

fn intersects(a: Circle, b: Circle) -> bool {
    let dr = a.r + b.r - INTERSECT_TOLERANCE;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

/// Squared distance from the origin to the weighted midpoint of a chain pair.
fn pair_score(a: Circle, b: Circle) -> f64 {
    let ab = a.r + b.r;
    if ab <= 0.0 {
        return a.x * a.x + a.y * a.y;
    }
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}
