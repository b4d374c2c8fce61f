//! Frame sources and sinks consumed by the pipeline.
//!
//! The core algorithms only see the [`source::FrameSource`] and [`sink::FrameSink`] traits; the
//! directory-backed implementations here are the PNG adapters used by the CLI.

/// PNG decode/encode helpers.
pub mod decode;
/// Frame sink trait and built-in sinks.
pub mod sink;
/// Frame source trait and built-in sources.
pub mod source;
