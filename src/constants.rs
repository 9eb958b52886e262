/// Page wiring and rendering constants for the browser front-end.
///
/// Behavioural tuning (scroll, reveal, playback) lives in
/// `asterisk_core::constants`; this file only names DOM hooks and values
/// that exist because of the browser.

// DOM hooks
pub const CANVAS_ID: &str = "app-canvas";
pub const INTRO_OVERLAY_ID: &str = "introOverlay";
pub const INTRO_VIDEO_ID: &str = "introVideo";
pub const INTRO_SKIP_ID: &str = "introSkipBtn";
pub const INTRO_MUTE_ID: &str = "introMuteToggle";
pub const ROTATION_TOGGLE_ID: &str = "toggle-rotation-btn";
pub const GALLERY_OVERLAY_ID: &str = "galleryOverlay";
pub const GALLERY_SCROLL_ID: &str = "galleryScroll";
pub const GALLERY_LIST_ID: &str = "galleryList";
pub const GALLERY_CTA_ID: &str = "galleryCTA";
pub const GALLERY_CLOSE_ID: &str = "closeGalleryBtn";
pub const CASE_OVERLAY_ID: &str = "caseOverlay";
pub const INSTRUCTIONS_ID: &str = "instructions";
pub const HAMBURGER_ID: &str = "hamburgerBtn";

// Navigation menu
pub const NAVIGATION_SELECTOR: &str = ".navigation";
pub const HAMBURGER_SELECTOR: &str = ".hamburger";
pub const NAV_LINK_SELECTOR: &str = ".navigation ul li a";
pub const NAV_TILT_DEG: f64 = 5.0; // hover tilt range is +/- this
pub const CHROME_REVEAL_DELAY_MS: f64 = 5000.0;

// Gallery markup
pub const CARD_SELECTOR: &str = ".projectCard";
pub const CARD_PREVIEW_SELECTOR: &str = ".cardPreview";
pub const PREVIEW_VIDEO_SELECTOR: &str = ".cardPreview .previewVideo";
pub const CARD_DETAILS_SELECTOR: &str = ".cardDetails";
pub const DETAIL_VIDEO_SELECTOR: &str = ".cardDetails video";
pub const CARD_COLLAPSE_SELECTOR: &str = ".cardCollapse";
pub const CASE_CONTENT_SELECTOR: &str = ".caseOverlay-content";
pub const CASE_VIDEO_SELECTOR: &str = ".caseVideo";
pub const CASE_CLOSE_SELECTOR: &str = ".caseCloseBtn";
pub const CASE_FULLSCREEN_SELECTOR: &str = ".caseFullscreenBtn";
pub const CASE_MUTE_SELECTOR: &str = ".caseMuteBtn";
pub const CASE_VIDEO_WRAP_SELECTOR: &str = ".caseVideoWrap";
pub const VIDEO_WRAPPER_SELECTOR: &str = ".videoWrapper";
pub const DETAIL_HOVER_WRAP_SELECTOR: &str = ".detailVideoInner";
pub const DETAIL_HOVER_VIDEO_SELECTOR: &str = ".detailVideoHover";
pub const GALLERY_HEADER_SELECTOR: &str = ".galleryHeaderRow";
pub const CASE_BACKDROP_CLASS: &str = "caseOverlay-backdrop";

// Classes toggled on the page
pub const CLASS_HIDDEN: &str = "hidden";
pub const CLASS_FADE_OUT: &str = "fade-out";
pub const CLASS_EXPANDED: &str = "expanded";
pub const CLASS_IS_OPEN: &str = "is-open";
pub const CLASS_VISIBLE: &str = "is-visible";
pub const CLASS_MASONRY_ON: &str = "masonry-on";
pub const CLASS_CASE_OPEN: &str = "case-overlay-open";
pub const CLASS_ROTATION_ON: &str = "is-active";
pub const CLASS_MUTED: &str = "muted";
pub const CLASS_CASE_CARD: &str = "caseOverlay-card";
pub const CLASS_MENU_ACTIVE: &str = "is-active";
pub const CLASS_MENU_OPENED: &str = "is-opened";
pub const CLASS_REVEALED: &str = "visible";

// Canvas backing store
pub const MAX_PIXEL_RATIO: f64 = 1.5; // the scene is soft enough that more is wasted fill

// Scene colors and lighting
pub const ASTERISK_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
pub const CORNER_COLOR: [f32; 4] = [1.0, 0.133, 0.133, 1.0];
pub const AMBIENT_LIGHT: f32 = 0.7;
pub const DIRECTIONAL_LIGHT: f32 = 0.5;
pub const LIGHT_DIR: [f32; 3] = [1.0, 1.0, 1.0];

// Outline post-effect
pub const OUTLINE_STRENGTH: f32 = 3.0;
pub const OUTLINE_THICKNESS: f32 = 1.5; // in pixels
pub const OUTLINE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

// Preview thumbnails
pub const PREVIEW_VIDEO_DIR: &str = "/videoSmallLoad/";
pub const PREVIEW_THUMB_DIR: &str = "/thumbs/";
pub const PREVIEW_INTERSECTION_THRESHOLD: f64 = 0.1;

// Gallery sizing
pub const GALLERY_VERTICAL_PADDING: f64 = 32.0; // scroller padding, top + bottom
pub const GALLERY_CHROME_FALLBACK: f64 = 140.0; // header and padding when the CSS var is missing
