#![forbid(unsafe_code)]

pub mod badge;
pub mod decode;
pub mod error;
pub mod export;
pub mod geometry;
pub mod placement;
pub mod raster;
pub mod render;
#[cfg(feature = "serve")]
pub mod serve;
pub mod state;

pub use decode::{PreparedImage, decode_image, read_image};
pub use error::{AfficheError, AfficheResult};
pub use export::{EXPORT_FILENAME, EXPORT_QUALITY_FACTOR, encode_png, export_hd};
pub use geometry::{
    FRAME_CORNER_RADIUS, FrameRect, REFERENCE_HEIGHT, REFERENCE_WIDTH, Viewport,
};
pub use placement::{
    BUTTON_ZOOM_STEP, FramePx, MAX_ZOOM_FACTOR, Placement, WHEEL_ZOOM_INTENSITY, min_cover_scale,
};
pub use render::{FrameRgba, RenderTarget, render_composite, render_state};
pub use state::{CompositorState, LoadTicket, PointerEvent, Snapshot};
