//! Tilemap view: one background layer assembled from live hardware state.
//!
//! The bit depth of the requested layer comes from the background mode; an
//! inactive (mode, layer) pairing renders as backdrop only. Tilemaps are
//! 32x32 entry grids, doubled to 64 per axis by the layer's screen-size
//! flags, with 16x16 tiles built out of four 8x8 sub-tiles when the layer
//! uses large tiles.

use dbg_core::graphics::ColorOps;
use dbg_core::ppu::palette::{resolve_color, to_argb};
use dbg_core::ppu::tile::decode_planar_pixel;
use dbg_core::types::Frame;
use serde::{Deserialize, Serialize};

use crate::state::{PpuSnapshot, VRAM_SIZE};

const GRID_COLOR: u32 = 0xA0AAAAFF;
/// Translucent tint over the interior of the visible viewport.
const SCROLL_OVERLAY_COLOR: u32 = 0x40FFFFFF;
/// Near-opaque white drawn on the viewport border.
const SCROLL_BORDER_COLOR: u32 = 0xAFFFFFFF;

/// Parameters of a tilemap render, chosen by the debugger UI.
///
/// The background mode and layer configuration are not part of the request;
/// they come from the [`PpuSnapshot`] so the view always reflects what the
/// hardware would actually draw.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TilemapRequest {
    /// Background layer index, 0-3
    pub layer: usize,
    pub show_grid: bool,
    pub show_scroll_overlay: bool,
}

/// One decoded 2-byte tilemap entry.
struct TilemapEntry {
    tile_index: u16,
    palette: u8,
    h_mirror: bool,
    v_mirror: bool,
    // The priority bit is part of the entry but irrelevant to this view.
    #[allow(dead_code)]
    priority: bool,
}

impl TilemapEntry {
    fn decode(low: u8, high: u8) -> Self {
        Self {
            tile_index: (u16::from(high & 0x03) << 8) | u16::from(low),
            palette: (high >> 2) & 0x07,
            h_mirror: (high & 0x40) != 0,
            v_mirror: (high & 0x80) != 0,
            priority: (high & 0x20) != 0,
        }
    }
}

/// Render one background layer's full tilemap into `frame`.
///
/// `frame` is the caller-owned 512x512 output buffer; it is fully
/// overwritten starting from a backdrop fill with CGRAM color 0. A layer
/// that is inactive in the current background mode renders as backdrop
/// only; that is not an error.
pub fn render_tilemap(
    req: &TilemapRequest,
    snapshot: &PpuSnapshot,
    frame: &mut Frame,
) -> Result<(), crate::RenderError> {
    let vram = snapshot.vram;
    let cgram = snapshot.cgram;
    let mask = VRAM_SIZE - 1;
    let layer = *snapshot
        .layers
        .get(req.layer)
        .ok_or(crate::RenderError::InvalidLayer(req.layer))?;

    let backdrop = u16::from(cgram[0]) | (u16::from(cgram[1]) << 8);
    frame.fill(to_argb(backdrop));

    let bpp = match snapshot.bg_mode.layer_depth(req.layer).bits_per_pixel() {
        Some(bpp) => bpp,
        None => {
            log::debug!(
                "tilemap render: layer {} inactive in {:?}, backdrop only",
                req.layer,
                snapshot.bg_mode
            );
            return Ok(());
        }
    };

    log::trace!(
        "tilemap render: layer {} at {}bpp in {:?}",
        req.layer,
        bpp,
        snapshot.bg_mode
    );

    // In mode 0 each layer gets its own 32-color bank of CGRAM.
    let base_palette_offset = if snapshot.bg_mode == crate::BgMode::Mode0 {
        (req.layer as u16) * 64
    } else {
        0
    };

    let large_tile_width = layer.large_tiles || snapshot.bg_mode.forces_wide_tiles();
    let large_tile_height = layer.large_tiles;

    let row_count = if layer.double_height { 64 } else { 32 };
    let column_count = if layer.double_width { 64 } else { 32 };

    for row in 0..row_count {
        // Rows 32-63 live in a separate tilemap bank; its stride depends on
        // whether the horizontal bank exists too.
        let vertical_bank = if layer.double_height {
            (row & 0x20) << (if layer.double_width { 6 } else { 5 })
        } else {
            0
        };
        let base_offset = usize::from(layer.tilemap_addr >> 1) + vertical_bank + ((row & 0x1F) << 5);

        for column in 0..column_count {
            let horizontal_bank = if layer.double_width {
                (column & 0x20) << 5
            } else {
                0
            };
            let addr = ((base_offset + (column & 0x1F) + horizontal_bank) << 1) & mask;

            let entry = TilemapEntry::decode(vram[addr], vram[(addr + 1) & mask]);

            // 16x16 tiles select one of four consecutive-ish 8x8 sub-tiles
            // by row/column parity; mirroring swaps which sub-tile is used.
            let mut tile_index = entry.tile_index;
            if large_tile_width || large_tile_height {
                if large_tile_height && (((row & 0x01) != 0) != entry.v_mirror) {
                    tile_index += 16;
                }
                if large_tile_width && (((column & 0x01) != 0) != entry.h_mirror) {
                    tile_index += 1;
                }
                tile_index &= 0x3FF;
            }

            let tile_start =
                usize::from(layer.chr_addr) + usize::from(tile_index) * 8 * usize::from(bpp);

            for y in 0..8usize {
                let y_offset = if entry.v_mirror { 7 - y } else { y };
                let pixel_start = tile_start + y_offset * 2;

                for x in 0..8usize {
                    let shift = (if entry.h_mirror { x } else { 7 - x }) as u8;
                    let color = decode_planar_pixel(vram, mask, bpp, pixel_start, shift)?;
                    if color == 0 {
                        continue;
                    }

                    let palette = if bpp == 8 { 0 } else { entry.palette };
                    frame.pixels[(row * 8 + y) * 512 + column * 8 + x] =
                        resolve_color(cgram, color, palette, bpp, false, base_palette_offset);
                }
            }
        }
    }

    if req.show_grid {
        draw_grid(frame);
    }

    if req.show_scroll_overlay {
        draw_scroll_overlay(frame, &layer);
    }

    Ok(())
}

/// Blend grid lines over every 8th pixel row and column of the full buffer
/// (the `i & 7` test also paints the boundary line at the far edge).
fn draw_grid(frame: &mut Frame) {
    for (i, pixel) in frame.pixels.iter_mut().enumerate() {
        if (i & 0x07) == 0x07 || (i & 0x0E00) == 0x0E00 {
            *pixel = ColorOps::blend_overlay(*pixel, GRID_COLOR);
        }
    }
}

/// Highlight the 256x240 area the scroll registers make visible, wrapped
/// into the layer's actual tilemap extent.
fn draw_scroll_overlay(frame: &mut Frame, layer: &crate::LayerConfig) {
    let h_mask = if layer.double_width { 0x1FF } else { 0xFF };
    let v_mask = if layer.double_height { 0x1FF } else { 0xFF };

    for y in 0..240usize {
        for x in 0..256usize {
            let x_pos = (usize::from(layer.h_scroll) + x) & h_mask;
            let y_pos = (usize::from(layer.v_scroll) + y) & v_mask;
            let pixel = &mut frame.pixels[(y_pos << 9) | x_pos];

            if x == 0 || y == 0 || x == 255 || y == 239 {
                *pixel = SCROLL_BORDER_COLOR;
            } else {
                *pixel = ColorOps::blend_overlay(*pixel, SCROLL_OVERLAY_COLOR);
            }
        }
    }
}
