//! Session-oriented pipeline API.

/// Three-phase select/build/render driver.
pub mod mosaic_session;
