//! Reusable PPU (Picture Processing Unit) components for tile-based video systems.
//!
//! Most retro consoles store character data as bit-planes and look colors up
//! in a small palette RAM. This module provides the decode and resolve steps
//! shared by the debugger's tile-sheet and tilemap views.

pub mod palette;
pub mod tile;

pub use palette::{resolve_color, to_argb};
pub use tile::{decode_planar_pixel, DecodeError};
