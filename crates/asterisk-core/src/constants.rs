// Shared tuning constants for the scroll/scene/gallery state machines.

// Scroll range
pub const MAX_OVERLAY_SCROLL: f64 = 100.0; // accumulator span owned by the intro overlay
pub const MAX_ZOOM_SCROLL: f64 = 400.0; // accumulator span owned by the camera zoom
pub const INITIAL_SCROLL: f64 = 100.0; // start just past the overlay
pub const FRAME_MS: f64 = 16.67; // nominal frame used to normalise dt
pub const SPRING_K: f64 = 0.16;
pub const SCROLL_DAMPING: f64 = 0.68; // velocity multiplier per tick
pub const SCROLL_NUDGE: f64 = 8.0; // one wheel/touch/key step
pub const ZOOM_END_SLACK: f64 = 10.0; // "at zoom end" tolerance

// Intro overlay
pub const OVERLAY_SHOW_THRESHOLD: f64 = 0.94;
pub const OVERLAY_HIDE_THRESHOLD: f64 = 0.98;
pub const INTRO_RESUME_WINDOW_MS: f64 = 10_000.0; // re-show within this resumes instead of restarting
pub const SKIP_NUDGE_FRACTION: f64 = 0.25; // of MAX_OVERLAY_SCROLL
pub const POST_END_EPSILON: f64 = 2.0;
pub const POST_END_FRACTION: f64 = 0.6;
pub const POST_END_DURATION_MS: f64 = 3000.0;
pub const MOBILE_POST_END_SNAP_MS: f64 = 900.0;

// Entry choreography
pub const ENTRY_DELAY_MS: f64 = 100.0;
pub const ENTRY_FRACTION: f64 = 0.62;
pub const ENTRY_DURATION_MS: f64 = 3500.0;
pub const MOBILE_ENTRY_DURATION_MS: f64 = 2000.0;
pub const FROM_NAV_FRACTION: f64 = 0.9;
pub const NAVIGATE_DELAY_MS: f64 = 300.0; // lets the fade-out play
pub const NAVIGATE_BACK_URL: &str = "index.html?from=nav";

// Camera zoom
pub const MIN_CAMERA_Z: f32 = 0.35;
pub const MAX_CAMERA_Z: f32 = 5.5;
pub const ZOOM_OUT_FACTOR: f32 = 2.2; // distance multiplier while the user orbits
pub const ZOOM_LERP: f32 = 0.08;
pub const ZOOM_EPSILON: f32 = 0.01;
pub const GESTURE_START_DEBOUNCE_MS: f64 = 180.0;
pub const CAMERA_RESET_PROGRESS: f32 = 0.05; // below this the camera snaps home

// Asterisk orientation
pub const ORIENT_PROGRESS: f32 = 0.5;
pub const ORIENT_LERP: f32 = 0.18;
pub const ORIENT_EPSILON: f32 = 0.03; // radians
pub const ASTERISK_SPIN_X: f32 = 0.007;
pub const ASTERISK_SPIN_Y: f32 = 0.01;

// Camera and orbit controls
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const INITIAL_CAMERA_POS: [f32; 3] = [0.0, 0.0, 0.5];
pub const ORBIT_DAMPING: f32 = 0.18;
pub const ORBIT_ROTATE_SPEED: f32 = 0.9;
pub const ORBIT_POLAR_EPSILON: f32 = 1e-3;
pub const CLICK_MAX_TRAVEL_PX: f32 = 5.0;

// Gallery reveal
pub const GALLERY_DEAD_SPACE: f64 = 800.0;
pub const GALLERY_LIFT: f64 = 1.0;
pub const REVEAL_SMOOTHING: f64 = 0.18;
pub const REVEAL_SNAP_EPSILON: f64 = 0.001;
pub const REVEAL_OPEN_THRESHOLD: f64 = 0.98;
pub const REVEAL_FULLY_OPEN: f64 = 0.999; // input goes to the card list from here
pub const REVEAL_CTA_EPSILON: f64 = 0.001;
pub const PLAY_ALL_MAX_REVEAL: f64 = 0.01;
pub const GALLERY_KEY_SCROLL_PX: f64 = 120.0;

// Masonry
pub const GAP: f64 = 18.0;
pub const MIN_COL_WIDTH: f64 = 200.0;
pub const MAX_COL_WIDTH: f64 = 300.0;
pub const MIN_COLS: usize = 1;
pub const MAX_COLS: usize = 8;
pub const SHUFFLE_SEED: u64 = 2025;
pub const SPAN_SEED_BASE: u64 = 1000;
pub const CHANCE_WIDE: f64 = 0.2;
pub const CHANCE_MEDIUM: f64 = 0.1;
pub const MAIN_EXTRA_HEIGHT: f64 = 18.0;
pub const Z_INDEX_BASE: i64 = 100;
pub const FOCUS_MIN_HEIGHT: f64 = 40.0; // below this the card has not settled
pub const FOCUS_RETRY_MS: f64 = 60.0;
pub const RESIZE_DEBOUNCE_MS: f64 = 60.0;
pub const DEFAULT_RATIOS: [&str; 3] = ["1:1", "3:2", "16:9"];
pub const FEATURED_RATIO: &str = "16:9";
pub const FEATURED_COUNT: usize = 3;

// Playback
pub const MAX_ACTIVE_VIDEOS: usize = 3;
pub const PLAYBACK_FRAME_STRIDE: u32 = 2;
pub const TEXTURE_UPDATE_STRIDE: u32 = 2;
pub const FACING_THRESHOLD: f32 = 0.05;
pub const PLAY_RETRY_DELAY_MS: f64 = 120.0;
pub const PLAY_RETRY_LIMIT: u8 = 1;
pub const PREVIEW_DETACH_MS: f64 = 300.0;

// Preloading
pub const ASTERISK_PRELOAD_GAP_MS: f64 = 50.0;
pub const DETAIL_PRELOAD_GAP_MS: f64 = 150.0;

// Orbiting surfaces
pub const ORBIT_RADIUS: f32 = 2.2;
pub const SURFACE_AREA: f32 = 1.44; // every surface covers the same area
pub const RADIAL_MIN: f32 = 1.1; // of ORBIT_RADIUS
pub const RADIAL_MAX: f32 = 1.22;
pub const RADIAL_JITTER: f32 = 0.22; // total spread, centred on zero
pub const SCENE_SEED: u64 = 8;
pub const GROUP_SPIN_X: f32 = 0.005;
pub const GROUP_SPIN_Y: f32 = 0.01;
pub const CORNER_SQUARE: f32 = 0.13;
pub const CORNER_Z: f32 = 0.02;

// Asterisk geometry
pub const ASTERISK_SIZE: f32 = 1.5;
pub const ASTERISK_ARMS: usize = 6;
pub const ARM_LENGTH: f32 = 1.6; // of ASTERISK_SIZE
pub const ARM_WIDTH: f32 = 0.35;
pub const ARM_DEPTH: f32 = 0.45;

// Frame pacing
pub const TARGET_FPS: f64 = 30.0;

// Touch
pub const DOUBLE_TAP_MS: f64 = 300.0;
pub const DOUBLE_TAP_DIST_SQ: f32 = 400.0;
pub const MOBILE_MAX_WIDTH: f64 = 768.0;
