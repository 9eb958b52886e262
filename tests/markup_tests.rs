// Host-side tests for the inline-style and attribute string helpers.

#![allow(dead_code)]
#[path = "../src/markup.rs"]
mod markup;

use markup::*;

#[test]
fn poster_swaps_directory_and_extension() {
    assert_eq!(
        poster_for("/videoSmallLoad/ton1.mp4", "/videoSmallLoad/", "/thumbs/"),
        "/thumbs/ton1.png"
    );
    assert_eq!(
        poster_for("public/videoSmallLoad/clip.WEBM", "/videoSmallLoad/", "/thumbs/"),
        "public/thumbs/clip.png"
    );
}

#[test]
fn poster_keeps_unknown_extensions() {
    assert_eq!(
        poster_for("/videoSmallLoad/still.jpg", "/videoSmallLoad/", "/thumbs/"),
        "/thumbs/still.jpg"
    );
    assert_eq!(
        poster_for("/other/clip", "/videoSmallLoad/", "/thumbs/"),
        "/other/clip"
    );
}

#[test]
fn parse_px_accepts_lengths_and_bare_numbers() {
    assert_eq!(parse_px("16px"), Some(16.0));
    assert_eq!(parse_px(" 12.5px "), Some(12.5));
    assert_eq!(parse_px("40"), Some(40.0));
    assert_eq!(parse_px(""), None);
    assert_eq!(parse_px("auto"), None);
    assert_eq!(parse_px("NaNpx"), None);
}

#[test]
fn style_strings() {
    assert_eq!(px(18.0), "18px");
    assert_eq!(px(0.5), "0.5px");
    assert_eq!(translate(10.0, 236.0), "translate(10px, 236px)");
    assert_eq!(translate_y_pct(100.0), "translateY(100.000%)");
    assert_eq!(translate_y_pct(0.0), "translateY(0.000%)");
}

#[test]
fn ratio_normalization() {
    assert_eq!(normalize_ratio("16/9").as_deref(), Some("16:9"));
    assert_eq!(normalize_ratio(" 3:2 ").as_deref(), Some("3:2"));
    assert_eq!(normalize_ratio("   "), None);
}

#[test]
fn page_attribute_matching() {
    assert!(page_matches(Some("4"), 4));
    assert!(page_matches(Some(" 8 "), 8));
    assert!(!page_matches(Some("4"), 5));
    assert!(!page_matches(Some("four"), 4));
    assert!(!page_matches(None, 1));
}

#[test]
fn nav_tilt_is_formatted_in_degrees() {
    assert_eq!(rotate_deg(-4.999), "-5.00deg");
    assert_eq!(rotate_deg(0.0), "0.00deg");
    assert_eq!(rotate_deg(2.346), "2.35deg");
}

#[test]
fn about_page_is_recognised_by_path() {
    assert!(is_about_page("/about.html"));
    assert!(is_about_page("/site/About.HTML"));
    assert!(!is_about_page("/index.html"));
    assert!(!is_about_page("/"));
    assert!(!is_about_page("/about.html.bak"));
}
