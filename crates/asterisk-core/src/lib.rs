pub mod camera;
pub mod command;
pub mod constants;
pub mod director;
pub mod easing;
pub mod error;
pub mod input;
pub mod masonry;
pub mod orbit;
pub mod overlay;
pub mod playback;
pub mod preload;
pub mod reveal;
pub mod schedule;
pub mod scroll;
pub mod zoom;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
pub static POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub use camera::*;
pub use command::*;
pub use director::*;
pub use error::*;
pub use input::*;
pub use masonry::*;
pub use orbit::*;
pub use overlay::*;
pub use playback::*;
pub use preload::*;
pub use reveal::*;
pub use schedule::*;
pub use scroll::*;
pub use zoom::*;
