//! SNES PPU debug visualization core.
//!
//! This crate decodes the console's bit-planar video memory into viewable
//! ARGB bitmaps for two debugger views, and schedules when those views
//! refresh:
//!
//! - **Tile sheet**: an arbitrary memory window (VRAM, cartridge ROM or
//!   work RAM) shown as a grid of decoded 8x8 tiles in any tile format.
//! - **Tilemap**: one background layer assembled from the live layer
//!   configuration, with optional grid and scroll-viewport overlays.
//! - **Viewer scheduler**: maps viewer ids to a target raster position and
//!   emits refresh notifications when the emulation reaches it.
//!
//! Rendering is a pure transform: given a [`PpuSnapshot`] (or a
//! [`tile_sheet::MemorySlices`] bundle) and a request, it fully overwrites a
//! caller-owned 512x512 [`Frame`]. The emulation core, the event bus and
//! the UI are external collaborators.

pub mod state;
pub mod tile_sheet;
pub mod tilemap;
pub mod viewer;

pub use dbg_core::types::Frame;
pub use state::{BgMode, LayerConfig, LayerDepth, PpuSnapshot, CGRAM_SIZE, VRAM_SIZE};
pub use tile_sheet::{
    render_tile_sheet, MemorySlices, MemorySource, TileFormat, TileSheetRequest,
};
pub use tilemap::{render_tilemap, TilemapRequest};
pub use viewer::{RasterPos, ViewerNotifier, ViewerScheduler};

use dbg_core::ppu::tile::DecodeError;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("tile sheet width must be at least one tile per row")]
    InvalidTileWidth,
    #[error("background layer index out of range: {0}")]
    InvalidLayer(usize),
}
