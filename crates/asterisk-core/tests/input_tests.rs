// Host tests for key mapping, tap/click detection, viewport profile and entry mode.

use asterisk_core::constants::*;
use asterisk_core::{ClickTracker, EntryMode, Key, TapDetector, Viewport};
use glam::Vec2;

#[test]
fn dom_keys_map_to_navigation_keys() {
    assert_eq!(Key::from_dom("ArrowUp", "ArrowUp"), Some(Key::ArrowUp));
    assert_eq!(Key::from_dom("PageDown", "PageDown"), Some(Key::PageDown));
    assert_eq!(Key::from_dom("Esc", ""), Some(Key::Escape));
    assert_eq!(Key::from_dom(" ", "Space"), Some(Key::Space));
    assert_eq!(Key::from_dom("Unidentified", "Space"), Some(Key::Space));
    assert_eq!(Key::from_dom("a", "KeyA"), None);
    assert!(Key::ArrowUp.is_backward() && Key::PageUp.is_backward());
    assert!(Key::ArrowDown.is_forward() && Key::PageDown.is_forward());
    assert!(!Key::Space.is_forward() && !Key::Space.is_backward());
}

#[test]
fn double_tap_needs_time_and_proximity() {
    let mut t = TapDetector::default();
    let p = Some(Vec2::new(100.0, 100.0));
    assert!(!t.tap(0.0, p));
    assert!(t.tap(DOUBLE_TAP_MS - 1.0, p));

    let mut t = TapDetector::default();
    t.tap(0.0, p);
    assert!(!t.tap(DOUBLE_TAP_MS + 1.0, p));

    let mut t = TapDetector::default();
    t.tap(0.0, p);
    assert!(!t.tap(50.0, Some(Vec2::new(200.0, 100.0))));

    // no coordinates: only the window counts
    let mut t = TapDetector::default();
    t.tap(0.0, None);
    assert!(t.tap(100.0, p));
}

#[test]
fn click_is_short_pointer_travel() {
    let mut c = ClickTracker::default();
    assert!(!c.up(Vec2::ZERO));
    c.down(Vec2::new(10.0, 10.0));
    assert!(c.up(Vec2::new(12.0, 13.0)));
    c.down(Vec2::new(10.0, 10.0));
    assert!(!c.up(Vec2::new(40.0, 10.0)));
}

#[test]
fn mobile_portrait_profile() {
    assert!(Viewport::new(390.0, 844.0, false).is_mobile_portrait());
    assert!(Viewport::new(1024.0, 1366.0, true).is_mobile_portrait());
    assert!(!Viewport::new(1024.0, 1366.0, false).is_mobile_portrait());
    assert!(!Viewport::new(700.0, 500.0, false).is_mobile_portrait());
    assert_eq!(Viewport::new(1600.0, 0.0, false).aspect(), 1600.0);
}

#[test]
fn entry_mode_from_query() {
    assert_eq!(EntryMode::from_query("?from=nav"), EntryMode::FromNav);
    assert_eq!(EntryMode::from_query("a=1&from=nav"), EntryMode::FromNav);
    assert_eq!(EntryMode::from_query("?from=navigation"), EntryMode::Fresh);
    assert_eq!(EntryMode::from_query(""), EntryMode::Fresh);
    assert_eq!(EntryMode::from_query("?nav"), EntryMode::Fresh);
}
