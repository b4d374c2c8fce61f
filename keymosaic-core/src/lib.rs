//! keymosaic reconstructs a frame sequence as a mosaic of its own keyframes.
//!
//! # Pipeline overview
//!
//! 1. **Select**: scan the sequence once and keep a frame whenever its sampled distance to the
//!    last kept frame exceeds a threshold ([`KeyframeSelector`]).
//! 2. **Build**: resize every keyframe once to a small reference size (for matching) and a
//!    larger render size (for output) ([`KeyframeBank`]).
//! 3. **Render**: cut each frame into a fixed grid, find the closest keyframe for every cell and
//!    paste the matching region of its render image ([`MosaicRenderer`]).
//!
//! [`MosaicSession`] drives all three phases over a [`FrameSource`], persisting keyframes and
//! outputs through [`FrameSink`]s.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: selection and rendering are pure functions of their inputs; parallel cell
//!   matching produces the same bytes as the sequential path.
//! - **No ambient state**: the bank and the sources are explicit parameters of every call.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Dual-resolution keyframe cache.
pub mod bank;
/// Frame sources, sinks and PNG helpers.
pub mod io;
/// Scene-change metric and channel distances.
pub mod metric;
/// Grid geometry, tile matching and mosaic compositing.
pub mod render;
/// Keyframe selection.
pub mod select;
/// Session-oriented pipeline API.
pub mod session;

pub use crate::foundation::config::MosaicConfig;
pub use crate::foundation::core::{Extent, FrameIndex, FrameRange};
pub use crate::foundation::error::{MosaicError, MosaicResult};

pub use crate::bank::store::{Keyframe, KeyframeBank};
pub use crate::io::decode::{decode_rgb, load_rgb, save_png};
pub use crate::io::sink::{DirSink, FrameSink, InMemorySink, clear_dir};
pub use crate::io::source::{DirFrameSource, FrameSource, InMemoryFrames};
pub use crate::metric::sample::{ChannelDistance, SampleMetric};
pub use crate::render::grid::{Cell, grid_cells};
pub use crate::render::matcher::TileMatcher;
pub use crate::render::mosaic::{MosaicRenderer, RenderThreading};
pub use crate::select::keyframes::{KeyframeSelector, SelectedFrame};
pub use crate::session::mosaic_session::{MosaicSession, RenderStats};
