// Host tests for the masonry packer, column sizing and the expansion set.

use asterisk_core::constants::*;
use asterisk_core::{
    decide_cols, default_ratio, focus_scroll_target, AspectRatio, ColumnGrid, ExpansionSet,
    GalleryItem, LayoutError, MasonryConfig, MasonryEngine, RatioError, Tier,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn item(ratio: &str) -> GalleryItem {
    GalleryItem::new(AspectRatio::parse_or_square(ratio), Tier::Standard)
}

fn no_measure(_: usize, _: f64) -> Option<f64> {
    None
}

#[test]
fn ratio_parses_common_separators() {
    assert_eq!("16:9".parse::<AspectRatio>(), Ok(AspectRatio::new(16.0, 9.0)));
    assert_eq!(" 16/9 ".parse::<AspectRatio>(), Ok(AspectRatio::new(16.0, 9.0)));
    assert_eq!("4x3".parse::<AspectRatio>(), Ok(AspectRatio::new(4.0, 3.0)));
    assert!(matches!("wide".parse::<AspectRatio>(), Err(RatioError::Malformed(_))));
    assert!(matches!("1:2:3".parse::<AspectRatio>(), Err(RatioError::Malformed(_))));
    assert!(matches!("0:9".parse::<AspectRatio>(), Err(RatioError::NonPositive(_))));
    assert_eq!(AspectRatio::parse_or_square("nope"), AspectRatio::SQUARE);
}

#[test]
fn tiers_and_default_ratios() {
    assert_eq!(Tier::from_attr(Some(" main ")), Tier::Main);
    assert_eq!(Tier::from_attr(Some("secondary")), Tier::Standard);
    assert_eq!(Tier::from_attr(None), Tier::Standard);

    let featured = AspectRatio::parse_or_square(FEATURED_RATIO);
    for i in 0..FEATURED_COUNT {
        assert_eq!(default_ratio(i, false), featured);
    }
    assert_eq!(default_ratio(0, true), AspectRatio::parse_or_square(DEFAULT_RATIOS[0]));
}

#[test]
fn column_count_respects_bounds() {
    let config = MasonryConfig::default();
    assert_eq!(decide_cols(100.0, &config), MIN_COLS);
    assert_eq!(decide_cols(1000.0, &config), 3);
    assert_eq!(decide_cols(100_000.0, &config), MAX_COLS);
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let cols = decide_cols(rng.gen_range(0.0..5000.0), &config);
        assert!((MIN_COLS..=MAX_COLS).contains(&cols));
    }
}

#[test]
fn zero_column_bounds_still_give_one_column() {
    let config = MasonryConfig {
        min_cols: 0,
        max_cols: 0,
        ..MasonryConfig::default()
    };
    assert_eq!(decide_cols(0.0, &config), 1);
    assert_eq!(decide_cols(5000.0, &config), 1);
    let grid = ColumnGrid::for_width(0.0, 0.0, &config);
    assert_eq!(grid.cols, 1);
    assert!(grid.col_width >= MIN_COL_WIDTH);

    let open_low = MasonryConfig {
        min_cols: 0,
        ..MasonryConfig::default()
    };
    assert!(decide_cols(10.0, &open_low) >= 1);
}

#[test]
fn grid_falls_back_to_viewport_width() {
    let config = MasonryConfig::default();
    let from_zero = ColumnGrid::for_width(0.0, 1000.0, &config);
    let direct = ColumnGrid::for_width(1000.0, 0.0, &config);
    assert_eq!(from_zero, direct);
    let nan = ColumnGrid::for_width(f64::NAN, f64::NAN, &config);
    assert_eq!(nan.cols, 1);
    assert!(nan.col_width >= MIN_COL_WIDTH);
}

#[test]
fn two_item_grid_uses_ratio_heights() {
    let engine = MasonryEngine::new(2, MasonryConfig::default());
    let grid = ColumnGrid::new(2, 200.0, GAP);
    let items = vec![item("1:1"), item("16:9")];
    let layout = engine.pack(&items, &grid, &mut no_measure).unwrap();
    let wide = layout.placement_for(1).unwrap();
    assert_eq!(wide.height, (wide.width * 9.0 / 16.0).round());
    let square = layout.placement_for(0).unwrap();
    assert_eq!(square.height, square.width);
    assert_eq!(layout.container_width, 2.0 * 200.0 + GAP);
}

#[test]
fn packing_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(11);
    let ratios = ["1:1", "3:2", "16:9", "9:16", "4:5"];
    let items: Vec<GalleryItem> = (0..24)
        .map(|i| {
            let mut it = item(ratios[rng.gen_range(0..ratios.len())]);
            if i % 7 == 0 {
                it.tier = Tier::Main;
            }
            it
        })
        .collect();
    let engine = MasonryEngine::new(items.len(), MasonryConfig::default());
    let grid = engine.grid_for_width(1600.0, 1600.0);
    let a = engine.pack(&items, &grid, &mut no_measure).unwrap();
    let b = engine.pack(&items, &grid, &mut no_measure).unwrap();
    assert_eq!(a, b);
    // a fresh engine with the same seed agrees too
    let again = MasonryEngine::new(items.len(), MasonryConfig::default());
    assert_eq!(a, again.pack(&items, &grid, &mut no_measure).unwrap());
}

#[test]
fn placements_never_overlap() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..30 {
        let n = rng.gen_range(1..40);
        let items: Vec<GalleryItem> = (0..n)
            .map(|_| {
                let r = AspectRatio::new(rng.gen_range(0.5..3.0), rng.gen_range(0.5..3.0));
                let tier = if rng.gen_bool(0.2) { Tier::Main } else { Tier::Standard };
                GalleryItem::new(r, tier)
            })
            .collect();
        let engine = MasonryEngine::new(n, MasonryConfig::default());
        let grid = engine.grid_for_width(rng.gen_range(200.0..2600.0), 1024.0);
        let layout = engine.pack(&items, &grid, &mut no_measure).unwrap();
        assert_eq!(layout.placements.len(), n);
        for (i, a) in layout.placements.iter().enumerate() {
            assert!(a.right() <= layout.container_width + 1e-9);
            assert!(a.bottom() <= layout.container_height);
            for b in &layout.placements[i + 1..] {
                assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }
}

#[test]
fn expanded_item_spans_container_and_flattens_others() {
    let n = 12;
    let mut items: Vec<GalleryItem> = (0..n).map(|_| item("3:2")).collect();
    items[0].tier = Tier::Main;
    items[5].tier = Tier::Main;
    let mut expansion = ExpansionSet::default();
    expansion.toggle(3);
    expansion.apply_to(&mut items);

    let engine = MasonryEngine::new(n, MasonryConfig::default());
    let grid = ColumnGrid::new(6, 220.0, GAP);
    let mut measure = |i: usize, w: f64| -> Option<f64> {
        assert_eq!(i, 3);
        assert_eq!(w, grid.container_width());
        Some(480.4)
    };
    let layout = engine.pack(&items, &grid, &mut measure).unwrap();
    for p in &layout.placements {
        if p.item == 3 {
            assert_eq!(p.span, 6);
            assert_eq!(p.width, 6.0 * 220.0 + 5.0 * GAP);
            assert_eq!(p.height, 481.0);
            assert_eq!(p.x, 0.0);
        } else {
            assert_eq!(p.span, 1, "item {} kept span {}", p.item, p.span);
        }
    }
}

#[test]
fn expanded_main_card_gets_extra_height() {
    let mut items = vec![item("1:1"), item("1:1")];
    items[1].tier = Tier::Main;
    items[1].expanded = true;
    let engine = MasonryEngine::new(2, MasonryConfig::default());
    let grid = ColumnGrid::new(3, 200.0, GAP);
    let layout = engine
        .pack(&items, &grid, &mut |_: usize, _: f64| -> Option<f64> { Some(300.0) })
        .unwrap();
    assert_eq!(layout.placement_for(1).unwrap().height, 300.0 + MAIN_EXTRA_HEIGHT);
}

#[test]
fn unmeasurable_expanded_item_is_retryable() {
    let mut items = vec![item("1:1"), item("1:1"), item("1:1")];
    items[2].expanded = true;
    let engine = MasonryEngine::new(3, MasonryConfig::default());
    let grid = ColumnGrid::new(2, 200.0, GAP);
    assert_eq!(
        engine.pack(&items, &grid, &mut no_measure),
        Err(LayoutError::PendingMeasurement { item: 2 })
    );
    assert_eq!(
        engine.pack(&items, &grid, &mut |_: usize, _: f64| -> Option<f64> { Some(0.0) }),
        Err(LayoutError::PendingMeasurement { item: 2 })
    );
}

#[test]
fn item_count_must_match_engine() {
    let engine = MasonryEngine::new(3, MasonryConfig::default());
    let grid = ColumnGrid::new(2, 200.0, GAP);
    let err = engine
        .pack(&[item("1:1")], &grid, &mut no_measure)
        .unwrap_err();
    assert_eq!(err, LayoutError::ItemCountMismatch { expected: 3, actual: 1 });
}

#[test]
fn z_index_tracks_row_position() {
    let items: Vec<GalleryItem> = (0..6).map(|_| item("1:1")).collect();
    let engine = MasonryEngine::new(6, MasonryConfig::default());
    let grid = ColumnGrid::new(2, 200.0, GAP);
    let layout = engine.pack(&items, &grid, &mut no_measure).unwrap();
    for p in &layout.placements {
        assert_eq!(p.z_index, Z_INDEX_BASE + p.y.floor() as i64);
    }
}

#[test]
fn expansion_set_keeps_a_single_card_open() {
    let mut set = ExpansionSet::default();
    let c = set.toggle(2);
    assert_eq!((c.expanded, c.collapsed), (Some(2), None));
    let c = set.toggle(4);
    assert_eq!((c.expanded, c.collapsed), (Some(4), Some(2)));
    let c = set.toggle(4);
    assert_eq!((c.expanded, c.collapsed), (None, Some(4)));
    assert!(!set.is_any_expanded());
    set.toggle(1);
    assert_eq!(set.collapse_all(), Some(1));
    assert_eq!(set.collapse_all(), None);
}

#[test]
fn focus_target_centres_and_clamps() {
    assert_eq!(focus_scroll_target(500.0, 10.0, 600.0, 2000.0, 600.0), None);
    assert_eq!(focus_scroll_target(500.0, f64::NAN, 600.0, 2000.0, 600.0), None);
    assert_eq!(focus_scroll_target(500.0, 200.0, 600.0, 2000.0, 600.0), Some(300.0));
    assert_eq!(focus_scroll_target(50.0, 200.0, 600.0, 2000.0, 600.0), Some(0.0));
    assert_eq!(focus_scroll_target(1900.0, 200.0, 600.0, 2000.0, 600.0), Some(1400.0));
    // taller than the viewport: align the top
    assert_eq!(focus_scroll_target(500.0, 900.0, 600.0, 2000.0, 600.0), Some(500.0));
}
