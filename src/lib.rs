//! Tiling geometry for a window manager.
//!
//! Given a screen rectangle and a changing set of tiles, a [`layout_engine::Layout`]
//! keeps the tiles covering the screen without overlaps using one of several
//! strategies, and [`layout_engine::TilingEngine`] wraps that with gaps and
//! host-facing events.

pub mod common;
pub mod layout_engine;
pub mod model;
pub mod sys;
