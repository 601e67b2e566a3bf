//! Reusable building blocks for tile-based video debugging tools.
//!
//! This crate holds the pieces that are not specific to any one console:
//! planar tile decoding, indexed/direct palette resolution and ARGB color
//! operations. System crates (e.g. the SNES debugger) combine these into
//! complete tile-sheet and tilemap views.

pub mod graphics;
pub mod ppu;

pub mod types {
    use serde::{Deserialize, Serialize};

    /// An ARGB8888 framebuffer (0xAARRGGBB), row-major.
    ///
    /// Debug views render into a caller-owned `Frame`; every render call
    /// fully overwrites the pixel data starting from a backdrop fill.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Frame {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u32>,
    }

    impl Frame {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![0; (width * height) as usize],
            }
        }

        /// Overwrite every pixel with a solid color.
        pub fn fill(&mut self, color: u32) {
            for pixel in &mut self.pixels {
                *pixel = color;
            }
        }
    }
}
