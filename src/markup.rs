//! String helpers for the values written into inline styles and attributes.
//! Kept free of web-sys so they can be tested on the host.

const VIDEO_EXTENSIONS: [&str; 4] = ["mp4", "mov", "webm", "m4v"];

/// Thumbnail path for a preview clip: `/videoSmallLoad/x.mp4` becomes
/// `/thumbs/x.png`.
pub fn poster_for(src: &str, video_dir: &str, thumb_dir: &str) -> String {
    let swapped = src.replacen(video_dir, thumb_dir, 1);
    match swapped.rsplit_once('.') {
        Some((stem, ext))
            if VIDEO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known)) =>
        {
            format!("{}.png", stem)
        }
        _ => swapped,
    }
}

#[inline]
pub fn px(v: f64) -> String {
    format!("{}px", v)
}

/// Parse a computed length such as `"16px"`; anything else is `None`.
pub fn parse_px(s: &str) -> Option<f64> {
    let s = s.trim();
    let n = s.strip_suffix("px").unwrap_or(s).trim();
    n.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[inline]
pub fn translate(x: f64, y: f64) -> String {
    format!("translate({}px, {}px)", x, y)
}

#[inline]
pub fn translate_y_pct(pct: f64) -> String {
    format!("translateY({:.3}%)", pct)
}

/// `--card-ar` values come as `16/9`; data attributes use `16:9`.
pub fn normalize_ratio(ar: &str) -> Option<String> {
    let ar = ar.trim();
    if ar.is_empty() {
        return None;
    }
    Some(ar.replacen('/', ":", 1))
}

/// Whether a `data-page` attribute names `page`.
pub fn page_matches(attr: Option<&str>, page: u32) -> bool {
    attr.and_then(|a| a.trim().parse::<u32>().ok()) == Some(page)
}

/// Value for the `--rand-rotate` custom property.
#[inline]
pub fn rotate_deg(angle: f64) -> String {
    format!("{:.2}deg", angle)
}

/// The about page keeps its menu and hints visible from the start.
pub fn is_about_page(path: &str) -> bool {
    path.trim_end_matches('/')
        .to_ascii_lowercase()
        .ends_with("about.html")
}
