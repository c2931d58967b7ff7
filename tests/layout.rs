use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

use query_bubbles::{PlacedCircle, ResultStore, Weight, Weighted, pack, pack_with_rng};

fn weighted(weights: &[f64]) -> Vec<Weighted<String>> {
    weights
        .iter()
        .enumerate()
        .map(|(index, &weight)| Weighted::new(Weight::new(weight).unwrap(), format!("item-{index}")))
        .collect()
}

fn assert_no_overlap<P>(circles: &[PlacedCircle<P>], padding: f64) {
    for (i, a) in circles.iter().enumerate() {
        for b in &circles[i + 1..] {
            let gap = a.distance_to(b) - a.r - b.r;
            assert!(
                gap >= padding - 1e-3,
                "items {} and {} are {gap} apart, expected at least {padding}",
                a.item_index,
                b.item_index
            );
        }
    }
}

#[test]
fn every_item_is_placed_exactly_once() {
    let mut store = ResultStore::new();
    store.set_cap(100);
    store.add_series("one", weighted(&[5.0, 0.0, 13.0, 2.0, 2.0, 8.0, 1.0]));
    store.add_series("two", weighted(&[40.0, 3.0, 3.0]));
    let items = store.flatten();

    let placed = pack(&items, 1024.0, 768.0, 6.0);
    assert_eq!(placed.len(), items.len());

    let mut seen = placed.iter().map(|circle| circle.item_index).collect::<Vec<_>>();
    seen.sort_unstable();
    assert_eq!(seen, (0..items.len()).collect::<Vec<_>>());

    for circle in &placed {
        let source = &items[circle.item_index];
        assert_eq!(circle.series_index, source.series_index());
        assert_eq!(&circle.payload, source.payload());
    }
}

#[test]
fn circles_never_overlap_across_paddings() {
    let weights = (0..60)
        .map(|i| ((i * 7919) % 101) as f64 + if i % 9 == 0 { 0.0 } else { 1.0 })
        .collect::<Vec<_>>();
    let mut store = ResultStore::new();
    store.set_cap(100);
    store.add_series("mixed", weighted(&weights));
    let items = store.flatten();

    for padding in [0.0, 1.0, 8.0, 40.0, 100.0] {
        let placed = pack_with_rng(&items, 1400.0, 900.0, padding, &mut StdRng::seed_from_u64(11));
        assert_eq!(placed.len(), items.len());
        assert_no_overlap(&placed, padding);
    }
}

#[test]
fn radius_order_follows_weight_order() {
    let mut store = ResultStore::new();
    store.set_cap(100);
    store.add_series("ranked", weighted(&[3.0, 50.0, 0.0, 12.0, 12.0, 1.0]));
    let items = store.flatten();

    let placed = pack(&items, 800.0, 800.0, 4.0);
    for a in &placed {
        for b in &placed {
            let (wa, wb) = (
                items[a.item_index].weight().get(),
                items[b.item_index].weight().get(),
            );
            if wa > wb {
                assert!(a.r >= b.r, "weight {wa} got r {} but weight {wb} got r {}", a.r, b.r);
            }
        }
        if items[a.item_index].weight().get() == 0.0 {
            assert_eq!(a.r, 0.0);
        }
    }
}

#[test]
fn two_items_keep_radius_order() {
    let mut store = ResultStore::new();
    store.add_series("pair", weighted(&[9.0, 4.0]));
    let placed = pack(&store.flatten(), 600.0, 400.0, 0.0);
    let heavy = placed.iter().find(|circle| circle.item_index == 0).unwrap();
    let light = placed.iter().find(|circle| circle.item_index == 1).unwrap();
    assert!(heavy.r > light.r);
    assert!((heavy.r / light.r - 1.5).abs() < 1e-9);
}

#[test]
fn flatten_feeds_capped_series_in_order() {
    let mut store = ResultStore::new();
    store.add_series("L1", weighted(&[1.0, 2.0, 3.0, 4.0, 5.0]));
    store.add_series("L2", weighted(&[6.0]));
    store.set_cap(2);

    let flat = store
        .flatten()
        .into_iter()
        .map(|item| (item.payload().clone(), item.series_index()))
        .collect::<Vec<_>>();
    assert_eq!(
        flat,
        vec![
            ("item-0".to_owned(), 0),
            ("item-1".to_owned(), 0),
            ("item-0".to_owned(), 1),
        ]
    );
}

#[test]
fn clear_makes_next_series_index_zero() {
    let mut store = ResultStore::new();
    store.add_series("a", weighted(&[1.0]));
    store.add_series("b", weighted(&[1.0]));
    store.clear();
    store.add_series("x", weighted(&[2.0, 3.0]));

    assert!(store.flatten().iter().all(|item| item.series_index() == 0));
    assert_eq!(store.legend().len(), 1);
}

#[test]
fn set_cap_clamps_high_then_falls_back() {
    let mut store = ResultStore::<String>::new();
    store.set_cap(500);
    assert_eq!(store.cap(), 100);
    store.set_cap(-3);
    assert_eq!(store.cap(), 5);
}

#[test]
fn degenerate_inputs_return_empty_layouts() {
    assert!(pack::<String>(&[], 800.0, 600.0, 10.0).is_empty());

    let mut store = ResultStore::new();
    store.add_series("a", weighted(&[1.0, 2.0]));
    assert!(pack(&store.flatten(), 0.0, 600.0, 10.0).is_empty());
}

#[test]
fn crowded_canvas_overflows_instead_of_overlapping() {
    let mut store = ResultStore::new();
    store.set_cap(100);
    store.add_series("crowd", weighted(&[1.0; 50]));
    let items = store.flatten();

    let placed = pack(&items, 100.0, 100.0, 30.0);
    assert_eq!(placed.len(), 50);
    assert_no_overlap(&placed, 30.0);
}
