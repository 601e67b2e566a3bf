//! Tile sheet view: an arbitrary memory window rendered as a grid of tiles.
//!
//! The view always covers a fixed 64KB window starting at the request's
//! address offset, laid out as `width` tiles per row. Whatever the chosen
//! format, every addressable tile in the window is decoded; addresses wrap
//! through the backing buffer's power-of-two mask instead of clamping.

use dbg_core::graphics::ColorOps;
use dbg_core::ppu::palette::{resolve_color, to_argb};
use dbg_core::ppu::tile::decode_planar_pixel;
use dbg_core::types::Frame;
use serde::{Deserialize, Serialize};

use crate::RenderError;

/// Translucent color blended over tile boundaries when the grid is shown.
const GRID_COLOR: u32 = 0xA0AAAAFF;

/// Tile data format selectable in the tile sheet view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileFormat {
    /// 2 bits per pixel, planar (modes 0/1 BG3, mode 4/5 BG2...)
    Bpp2,
    /// 4 bits per pixel, planar
    Bpp4,
    /// 8 bits per pixel, planar
    Bpp8,
    /// 8 bits per pixel, planar, interpreted as direct color
    DirectColor,
    /// Mode 7 chunky layout: 16 bytes per tile row, one color byte per pixel
    Mode7,
    /// Mode 7 chunky layout with direct color interpretation
    Mode7DirectColor,
}

impl TileFormat {
    pub fn bits_per_pixel(self) -> u8 {
        match self {
            TileFormat::Bpp2 => 2,
            TileFormat::Bpp4 => 4,
            TileFormat::Bpp8 | TileFormat::DirectColor => 8,
            TileFormat::Mode7 | TileFormat::Mode7DirectColor => 16,
        }
    }

    pub fn is_direct_color(self) -> bool {
        matches!(self, TileFormat::DirectColor | TileFormat::Mode7DirectColor)
    }

    fn is_mode7(self) -> bool {
        matches!(self, TileFormat::Mode7 | TileFormat::Mode7DirectColor)
    }
}

/// Which memory bank the tile sheet reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemorySource {
    VideoRam,
    CartridgeRom,
    WorkRam,
}

/// The backing memories supplied by the emulation core's collaborators.
///
/// Every slice must have a power-of-two length; the addressing mask for a
/// source is simply `len - 1`.
#[derive(Debug, Clone, Copy)]
pub struct MemorySlices<'a> {
    pub vram: &'a [u8],
    pub cart_rom: &'a [u8],
    pub work_ram: &'a [u8],
}

impl<'a> MemorySlices<'a> {
    fn select(&self, source: MemorySource) -> &'a [u8] {
        match source {
            MemorySource::VideoRam => self.vram,
            MemorySource::CartridgeRom => self.cart_rom,
            MemorySource::WorkRam => self.work_ram,
        }
    }
}

/// Parameters of a tile sheet render, chosen by the debugger UI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TileSheetRequest {
    pub format: TileFormat,
    pub source: MemorySource,
    /// Tiles per row; must be at least 1
    pub width: usize,
    /// Byte offset of the 64KB viewing window into the backing memory
    pub address_offset: u32,
    /// Palette select applied to every tile
    pub palette: u8,
    pub show_grid: bool,
}

/// Render a tile sheet into `frame`.
///
/// `frame` is the caller-owned 512x512 output buffer; it is fully
/// overwritten starting from a backdrop fill with CGRAM color 0. Rows are
/// packed at a stride of `width * 8` pixels, which is how the UI reads the
/// buffer back.
pub fn render_tile_sheet(
    req: &TileSheetRequest,
    mem: &MemorySlices,
    cgram: &[u8],
    frame: &mut Frame,
) -> Result<(), RenderError> {
    if req.width == 0 {
        return Err(RenderError::InvalidTileWidth);
    }

    let ram = mem.select(req.source);
    let mask = ram.len() - 1;
    let bpp = req.format.bits_per_pixel();
    let direct_color = req.format.is_direct_color();

    log::trace!(
        "tile sheet render: {:?} from {:?} ({} bytes), {} tiles/row",
        req.format,
        req.source,
        ram.len(),
        req.width
    );

    let backdrop = u16::from(cgram[0]) | (u16::from(cgram[1]) << 8);
    frame.fill(to_argb(backdrop));

    let bytes_per_tile = 64 * bpp as usize / 8;
    let tile_count = 0x10000 / bytes_per_tile;
    let row_count = tile_count / req.width;
    let stride = req.width * 8;

    for row in 0..row_count {
        let base_offset = row * bytes_per_tile * req.width + req.address_offset as usize;

        for column in 0..req.width {
            let addr = base_offset + bytes_per_tile * column;

            for y in 0..8 {
                for x in 0..8 {
                    let color = if req.format.is_mode7() {
                        // Chunky layout: the color byte is the high byte of
                        // each 16-bit pixel word.
                        ram[(addr + y * 16 + x * 2 + 1) & mask]
                    } else {
                        let pixel_start = addr + y * 2;
                        decode_planar_pixel(ram, mask, bpp, pixel_start, 7 - x as u8)?
                    };

                    // Color 0 is transparent; the backdrop shows through.
                    if color == 0 {
                        continue;
                    }

                    let rgb = if req.format.is_mode7() {
                        mode7_pixel_color(cgram, color, direct_color)
                    } else {
                        resolve_color(cgram, color, req.palette, bpp, direct_color, 0)
                    };
                    frame.pixels[(row * 8 + y) * stride + column * 8 + x] = rgb;
                }
            }
        }
    }

    if req.show_grid {
        for j in 0..row_count * 8 {
            for i in 0..stride {
                if (i & 0x07) == 0x07 || (j & 0x07) == 0x07 {
                    let pixel = &mut frame.pixels[j * stride + i];
                    *pixel = ColorOps::blend_overlay(*pixel, GRID_COLOR);
                }
            }
        }
    }

    Ok(())
}

/// Mode 7 color bytes carry a full 8-bit index: direct color spreads the
/// byte's BBGGGRRR bits over the 15-bit channels, otherwise the byte indexes
/// the first 256-color palette.
fn mode7_pixel_color(cgram: &[u8], color: u8, direct_color: bool) -> u32 {
    if direct_color {
        let c = u16::from(color);
        to_argb(((c & 0x07) << 2) | ((c & 0x38) << 4) | ((c & 0xC0) << 7))
    } else {
        resolve_color(cgram, color, 0, 8, false, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKDROP_15: [u8; 2] = [0xE3, 0x1C]; // 0x1CE3

    fn test_cgram() -> Vec<u8> {
        let mut cgram = vec![0u8; crate::CGRAM_SIZE];
        cgram[0] = BACKDROP_15[0];
        cgram[1] = BACKDROP_15[1];
        cgram
    }

    fn request(format: TileFormat, width: usize) -> TileSheetRequest {
        TileSheetRequest {
            format,
            source: MemorySource::VideoRam,
            width,
            address_offset: 0,
            palette: 0,
            show_grid: false,
        }
    }

    fn slices<'a>(vram: &'a [u8], rom: &'a [u8], wram: &'a [u8]) -> MemorySlices<'a> {
        MemorySlices {
            vram,
            cart_rom: rom,
            work_ram: wram,
        }
    }

    #[test]
    fn test_zero_memory_renders_uniform_backdrop() {
        let _ = env_logger::builder().is_test(true).try_init();
        let vram = vec![0u8; crate::VRAM_SIZE];
        let cgram = test_cgram();
        let mut frame = Frame::new(512, 512);

        render_tile_sheet(
            &request(TileFormat::Bpp2, 16),
            &slices(&vram, &vram, &vram),
            &cgram,
            &mut frame,
        )
        .unwrap();

        let backdrop = to_argb(0x1CE3);
        assert!(frame.pixels.iter().all(|&p| p == backdrop));
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let vram = vec![0u8; crate::VRAM_SIZE];
        let cgram = test_cgram();
        let mut frame = Frame::new(512, 512);

        assert_eq!(
            render_tile_sheet(
                &request(TileFormat::Bpp4, 0),
                &slices(&vram, &vram, &vram),
                &cgram,
                &mut frame,
            ),
            Err(RenderError::InvalidTileWidth)
        );
    }

    #[test]
    fn test_2bpp_pixel_lands_at_packed_stride() {
        let mut vram = vec![0u8; crate::VRAM_SIZE];
        let mut cgram = test_cgram();

        // Tile 17 (second row, second column at width 16), row 3: leftmost
        // pixel gets color index 1.
        let tile_addr = 17 * 16;
        vram[tile_addr + 3 * 2] = 0x80;
        cgram[2] = 0x1F; // color 1 = pure red
        cgram[3] = 0x00;

        let mut frame = Frame::new(512, 512);
        let req = request(TileFormat::Bpp2, 16);
        render_tile_sheet(&req, &slices(&vram, &vram, &vram), &cgram, &mut frame).unwrap();

        let stride = 16 * 8;
        let idx = (1 * 8 + 3) * stride + 1 * 8;
        assert_eq!(frame.pixels[idx], 0xFFF80000);
        // The neighboring pixel stays at the backdrop.
        assert_eq!(frame.pixels[idx + 1], to_argb(0x1CE3));
    }

    #[test]
    fn test_mirrored_bit_order_puts_high_bit_left() {
        let mut vram = vec![0u8; crate::VRAM_SIZE];
        let mut cgram = test_cgram();

        vram[0] = 0x01; // only bit 0 set: rightmost pixel of the top row
        cgram[2] = 0xFF;
        cgram[3] = 0x7F;

        let mut frame = Frame::new(512, 512);
        render_tile_sheet(
            &request(TileFormat::Bpp2, 16),
            &slices(&vram, &vram, &vram),
            &cgram,
            &mut frame,
        )
        .unwrap();

        let stride = 16 * 8;
        assert_eq!(frame.pixels[7], 0xFFF8F8F8); // x = 7
        assert_eq!(frame.pixels[0], to_argb(0x1CE3)); // x = 0 untouched
        assert_eq!(frame.pixels[stride - 1], to_argb(0x1CE3));
    }

    #[test]
    fn test_mode7_reads_odd_bytes() {
        let mut vram = vec![0u8; crate::VRAM_SIZE];
        let mut cgram = test_cgram();

        // Tile 0, row 0, pixel 2: color byte at offset 2*2+1.
        vram[5] = 9;
        cgram[18] = 0xE0; // color 9 = 0x03E0, pure green
        cgram[19] = 0x03;

        let mut frame = Frame::new(512, 512);
        render_tile_sheet(
            &request(TileFormat::Mode7, 16),
            &slices(&vram, &vram, &vram),
            &cgram,
            &mut frame,
        )
        .unwrap();

        assert_eq!(frame.pixels[2], 0xFF00F800);
        // The even byte below the color byte is ignored.
        assert_eq!(frame.pixels[1], to_argb(0x1CE3));
    }

    #[test]
    fn test_mode7_direct_color_spreads_tile_bits() {
        let mut vram = vec![0u8; crate::VRAM_SIZE];
        let cgram = test_cgram();

        vram[1] = 0xFF; // tile 0, pixel 0
        let mut frame = Frame::new(512, 512);
        render_tile_sheet(
            &request(TileFormat::Mode7DirectColor, 16),
            &slices(&vram, &vram, &vram),
            &cgram,
            &mut frame,
        )
        .unwrap();

        // 0xFF -> 15-bit ((7)<<2)|((0x38)<<4)|((0xC0)<<7) = 0x639C.
        assert_eq!(frame.pixels[0], to_argb(0x639C));
    }

    #[test]
    fn test_memory_source_selection_and_mask() {
        let vram = vec![0u8; crate::VRAM_SIZE];
        // A small power-of-two work RAM with one visible pixel.
        let mut wram = vec![0u8; 0x8000];
        wram[0] = 0x80;
        let mut cgram = test_cgram();
        cgram[2] = 0x1F;
        cgram[3] = 0x00;

        let mut frame = Frame::new(512, 512);
        let mut req = request(TileFormat::Bpp2, 16);
        req.source = MemorySource::WorkRam;
        render_tile_sheet(&req, &slices(&vram, &vram, &wram), &cgram, &mut frame).unwrap();

        // The 64KB window wraps the 32KB buffer twice, so the pixel shows
        // up again half-way down the sheet.
        let stride = 16 * 8;
        assert_eq!(frame.pixels[0], 0xFFF80000);
        let second = (0x8000 / 16 / 16 * 8) * stride;
        assert_eq!(frame.pixels[second], 0xFFF80000);
    }

    #[test]
    fn test_grid_overlay_marks_tile_boundaries() {
        let vram = vec![0u8; crate::VRAM_SIZE];
        let cgram = test_cgram();
        let mut frame = Frame::new(512, 512);

        let mut req = request(TileFormat::Bpp2, 16);
        req.show_grid = true;
        render_tile_sheet(&req, &slices(&vram, &vram, &vram), &cgram, &mut frame).unwrap();

        let backdrop = to_argb(0x1CE3);
        let expected = dbg_core::graphics::ColorOps::blend_overlay(backdrop, GRID_COLOR);
        let stride = 16 * 8;
        assert_eq!(frame.pixels[7], expected); // column boundary
        assert_eq!(frame.pixels[7 * stride], expected); // row boundary
        assert_eq!(frame.pixels[0], backdrop); // interior untouched
    }
}
