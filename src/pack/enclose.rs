use super::Circle;

const ENCLOSE_EPSILON: f64 = 1e-9;

/// Smallest circle enclosing every circle in `circles` (move-to-front Welzl).
///
/// Returns `None` for an empty slice.
pub(super) fn enclose(circles: &[Circle]) -> Option<Circle> {
    let mut basis: Vec<Circle> = Vec::with_capacity(3);
    let mut enclosing: Option<Circle> = None;
    let mut index = 0;
    let mut restarts = 0usize;
    let restart_budget = circles.len().saturating_mul(circles.len()).max(16);

    while index < circles.len() {
        let candidate = circles[index];
        if enclosing.is_some_and(|circle| encloses_weak(circle, candidate)) {
            index += 1;
            continue;
        }

        restarts += 1;
        match extend_basis(&basis, candidate) {
            Some(next) if restarts <= restart_budget => {
                basis = next;
                enclosing = Some(enclose_basis(&basis));
                index = 0;
            }
            _ => return Some(bounding_enclosure(circles)),
        }
    }

    enclosing
}

/// Conservative enclosure used when the exact solver cannot make progress.
fn bounding_enclosure(circles: &[Circle]) -> Circle {
    let count = circles.len() as f64;
    let cx = circles.iter().map(|circle| circle.x).sum::<f64>() / count;
    let cy = circles.iter().map(|circle| circle.y).sum::<f64>() / count;
    let r = circles
        .iter()
        .map(|circle| (circle.x - cx).hypot(circle.y - cy) + circle.r)
        .fold(0.0, f64::max);
    Circle { x: cx, y: cy, r }
}

fn extend_basis(basis: &[Circle], p: Circle) -> Option<Vec<Circle>> {
    if encloses_weak_all(p, basis) {
        return Some(vec![p]);
    }

    for &b in basis {
        if encloses_not(p, b) && encloses_weak_all(enclose_basis2(b, p), basis) {
            return Some(vec![b, p]);
        }
    }

    for i in 0..basis.len().saturating_sub(1) {
        for j in (i + 1)..basis.len() {
            let (bi, bj) = (basis[i], basis[j]);
            if encloses_not(enclose_basis2(bi, bj), p)
                && encloses_not(enclose_basis2(bi, p), bj)
                && encloses_not(enclose_basis2(bj, p), bi)
                && encloses_weak_all(enclose_basis3(bi, bj, p), basis)
            {
                return Some(vec![bi, bj, p]);
            }
        }
    }

    None
}

fn encloses_not(a: Circle, b: Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: Circle, b: Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * ENCLOSE_EPSILON;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|&b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis {
        [a] => *a,
        [a, b] => enclose_basis2(*a, *b),
        [a, b, c] => enclose_basis3(*a, *b, *c),
        _ => bounding_enclosure(basis),
    }
}

fn enclose_basis2(a: Circle, b: Circle) -> Circle {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dr = b.r - a.r;
    let distance = dx.hypot(dy);
    if distance <= f64::EPSILON {
        return if a.r >= b.r { a } else { b };
    }

    Circle {
        x: (a.x + b.x + dx / distance * dr) / 2.0,
        y: (a.y + b.y + dy / distance * dr) / 2.0,
        r: (distance + a.r + b.r) / 2.0,
    }
}

fn enclose_basis3(a: Circle, b: Circle, c: Circle) -> Circle {
    let a2 = a.x - b.x;
    let a3 = a.x - c.x;
    let b2 = a.y - b.y;
    let b3 = a.y - c.y;
    let c2 = b.r - a.r;
    let c3 = c.r - a.r;
    let d1 = a.x * a.x + a.y * a.y - a.r * a.r;
    let d2 = d1 - b.x * b.x - b.y * b.y + b.r * b.r;
    let d3 = d1 - c.x * c.x - c.y * c.y + c.r * c.r;
    let ab = a3 * b2 - a2 * b3;
    if ab.abs() <= f64::EPSILON {
        // Collinear centers: the pairwise enclosure of the outermost two wins.
        return [enclose_basis2(a, b), enclose_basis2(a, c), enclose_basis2(b, c)]
            .into_iter()
            .max_by(|left, right| left.r.total_cmp(&right.r))
            .unwrap_or(a);
    }

    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - a.x;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - a.y;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (a.r + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - a.r * a.r;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).max(0.0).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });

    Circle {
        x: a.x + xa + xb * r,
        y: a.y + ya + yb * r,
        r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(x: f64, y: f64, r: f64) -> Circle {
        Circle { x, y, r }
    }

    fn contains(outer: Circle, inner: Circle) -> bool {
        (inner.x - outer.x).hypot(inner.y - outer.y) + inner.r <= outer.r + 1e-6
    }

    #[test]
    fn empty_input_has_no_enclosure() {
        assert!(enclose(&[]).is_none());
    }

    #[test]
    fn single_circle_encloses_itself() {
        let only = circle(3.0, -2.0, 1.5);
        assert_eq!(enclose(&[only]), Some(only));
    }

    #[test]
    fn two_touching_circles() {
        let result = enclose(&[circle(-1.0, 0.0, 1.0), circle(1.0, 0.0, 1.0)]).unwrap();
        assert!(result.x.abs() < 1e-9);
        assert!(result.y.abs() < 1e-9);
        assert!((result.r - 2.0).abs() < 1e-9);
    }

    #[test]
    fn small_circle_inside_large_one_is_ignored() {
        let large = circle(0.0, 0.0, 10.0);
        let result = enclose(&[circle(1.0, 1.0, 1.0), large]).unwrap();
        assert!((result.r - 10.0).abs() < 1e-6);
    }

    #[test]
    fn triangle_of_circles_is_fully_contained() {
        let circles = [
            circle(0.0, 0.0, 1.0),
            circle(4.0, 0.0, 1.0),
            circle(2.0, 3.0, 1.0),
            circle(2.0, 1.0, 0.5),
        ];
        let result = enclose(&circles).unwrap();
        for inner in circles {
            assert!(contains(result, inner), "{inner:?} escapes {result:?}");
        }
        assert!(result.r < 4.0);
    }

    #[test]
    fn collinear_circles_are_contained() {
        let circles = [
            circle(0.0, 0.0, 1.0),
            circle(3.0, 0.0, 1.0),
            circle(6.0, 0.0, 1.0),
        ];
        let result = enclose(&circles).unwrap();
        for inner in circles {
            assert!(contains(result, inner));
        }
        assert!((result.r - 4.0).abs() < 1e-6);
    }
}
