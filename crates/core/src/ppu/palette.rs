//! 15-bit palette color resolution.
//!
//! Palette RAM (CGRAM on the SNES) stores colors as little-endian 15-bit
//! BGR words: R in bits 0-4, G in bits 5-9, B in bits 10-14. Direct color
//! mode bypasses the palette RAM entirely and rebuilds a 15-bit color from
//! bits of the tile data and palette select instead.

/// Convert a 15-bit hardware color to ARGB8888.
///
/// Each 5-bit channel is left-shifted by 3 to fill 8 bits (so channel 0x1F
/// becomes 0xF8, not 0xFF); alpha is forced fully opaque.
pub fn to_argb(color: u16) -> u32 {
    let r = ((color & 0x1F) << 3) as u32;
    let g = (((color >> 5) & 0x1F) << 3) as u32;
    let b = (((color >> 10) & 0x1F) << 3) as u32;

    0xFF00_0000 | (r << 16) | (g << 8) | b
}

/// Resolve a decoded color index to an ARGB8888 color.
///
/// With `direct_color` set at 8bpp the 15-bit color is synthesized from the
/// index and palette bits directly (the hardware's direct color mode); in
/// every other case the color is read from `cgram` at
/// `base_palette_offset + (palette * 2^bpp + color_index) * 2`.
pub fn resolve_color(
    cgram: &[u8],
    color_index: u8,
    palette: u8,
    bpp: u8,
    direct_color: bool,
    base_palette_offset: u16,
) -> u32 {
    let palette_color = if bpp == 8 && direct_color {
        // Direct color: tile bits are BBGGGRRR and the palette select
        // contributes one low bit per channel (palette = 0b00000bgr).
        (u16::from((color_index & 0x07) | (palette & 0x01)) << 1)
            | (u16::from((color_index & 0x38) | ((palette & 0x02) << 1)) << 3)
            | (u16::from((color_index & 0xC0) | ((palette & 0x04) << 3)) << 7)
    } else {
        // Palette RAM is a power-of-two buffer; out-of-range entries wrap
        // like every other address in this crate.
        let mask = cgram.len() - 1;
        let offset = usize::from(base_palette_offset)
            + (usize::from(palette) * (1usize << bpp) + usize::from(color_index)) * 2;
        u16::from(cgram[offset & mask]) | (u16::from(cgram[(offset + 1) & mask]) << 8)
    };
    to_argb(palette_color)
}
