//! Planar tile pixel decoding.
//!
//! SNES-style character data stores each 8x8 tile as bit-planes interleaved
//! in pairs: a tile row is two bytes (planes 0 and 1), with planes 2/3 at
//! byte offsets +16/+17 and planes 4-7 at +32/+33/+48/+49. Each plane
//! contributes one bit of the pixel's color index, least-significant plane
//! first.
//!
//! All addressing wraps through a power-of-two mask, so a pixel offset past
//! the end of the backing memory reads from the start again rather than
//! failing.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unsupported bit depth: {0}bpp (expected 2, 4 or 8)")]
    InvalidFormat(u8),
}

/// Byte offsets of the bit-plane pairs relative to a tile row's first byte.
const PLANE_PAIR_OFFSETS: [usize; 4] = [0, 16, 32, 48];

/// Decode one pixel's color index from planar tile data.
///
/// # Arguments
/// * `ram` - backing memory holding the character data
/// * `mask` - addressing mask, `ram.len() - 1` for a power-of-two buffer
/// * `bpp` - bits per pixel; must be 2, 4 or 8
/// * `pixel_start` - byte address of the tile row's first plane byte
/// * `shift` - bit position of the pixel within each plane byte (7 = leftmost)
///
/// # Returns
/// The color index, always `< 2^bpp`, or `DecodeError::InvalidFormat` for
/// any other depth.
pub fn decode_planar_pixel(
    ram: &[u8],
    mask: usize,
    bpp: u8,
    pixel_start: usize,
    shift: u8,
) -> Result<u8, DecodeError> {
    if bpp != 2 && bpp != 4 && bpp != 8 {
        return Err(DecodeError::InvalidFormat(bpp));
    }

    let mut color = 0u8;
    for (pair, &plane_offset) in PLANE_PAIR_OFFSETS[..(bpp / 2) as usize].iter().enumerate() {
        let lo = ram[(pixel_start + plane_offset) & mask];
        let hi = ram[(pixel_start + plane_offset + 1) & mask];
        color |= ((lo >> shift) & 0x01) << (pair * 2);
        color |= ((hi >> shift) & 0x01) << (pair * 2 + 1);
    }
    Ok(color)
}
