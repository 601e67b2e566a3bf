//! Color operation utilities for debugger overlays.
//!
//! Colors are in ARGB8888 format (0xAARRGGBB).

/// Color operation utilities
pub struct ColorOps;

impl ColorOps {
    /// Blend a translucent overlay pixel onto an existing pixel.
    ///
    /// The overlay's alpha byte acts as a blend weight of `alpha + 1`
    /// (1..=256), computed in u8 arithmetic: an alpha of 0xFF wraps the
    /// weight to 0 and leaves the existing color untouched. Grid lines and
    /// scroll tints rely on this exact arithmetic, so it is kept as-is.
    /// The result is always fully opaque.
    ///
    /// # Arguments
    ///
    /// * `existing` - pixel already in the framebuffer
    /// * `overlay` - translucent decoration pixel
    #[inline]
    pub fn blend_overlay(existing: u32, overlay: u32) -> u32 {
        let overlay_alpha = (overlay >> 24) as u8;
        let weight = u32::from(overlay_alpha.wrapping_add(1));
        let inverse = 256 - weight;

        let mut blended = 0xFF00_0000;
        for channel_shift in [16, 8, 0] {
            let over = (overlay >> channel_shift) & 0xFF;
            let under = (existing >> channel_shift) & 0xFF;
            blended |= (((weight * over + inverse * under) >> 8) & 0xFF) << channel_shift;
        }
        blended
    }
}
