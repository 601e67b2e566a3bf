//! Read-only snapshot of the PPU state the debug views render from.
//!
//! The emulation core owns VRAM, CGRAM and the layer registers and mutates
//! them continuously. Rendering therefore never reaches into the live
//! console; the caller hands over a `PpuSnapshot` of borrowed slices and
//! decoded layer configuration, taken while emulation is paused (or copied
//! out at a known-good point). Snapshot freshness is the caller's
//! responsibility.

use serde::{Deserialize, Serialize};

/// VRAM size in bytes (64KB for tiles and tilemaps)
pub const VRAM_SIZE: usize = 0x10000;
/// CGRAM size in bytes (256 colors * 2 bytes per color)
pub const CGRAM_SIZE: usize = 512;

/// Background mode selected by the low 3 bits of the BGMODE register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BgMode {
    Mode0,
    Mode1,
    Mode2,
    Mode3,
    Mode4,
    Mode5,
    Mode6,
    Mode7,
}

/// Bit depth of one background layer in a given mode.
///
/// `Inactive` means the hardware does not drive the layer at all in that
/// mode; rendering it is a defined no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerDepth {
    Inactive,
    Bpp2,
    Bpp4,
    Bpp8,
}

impl LayerDepth {
    pub fn bits_per_pixel(self) -> Option<u8> {
        match self {
            LayerDepth::Inactive => None,
            LayerDepth::Bpp2 => Some(2),
            LayerDepth::Bpp4 => Some(4),
            LayerDepth::Bpp8 => Some(8),
        }
    }
}

impl BgMode {
    /// Decode the BGMODE register value (only the low 3 bits matter).
    pub fn from_register(value: u8) -> Self {
        match value & 0x07 {
            0 => BgMode::Mode0,
            1 => BgMode::Mode1,
            2 => BgMode::Mode2,
            3 => BgMode::Mode3,
            4 => BgMode::Mode4,
            5 => BgMode::Mode5,
            6 => BgMode::Mode6,
            _ => BgMode::Mode7,
        }
    }

    /// Per-mode bit depth of each of the four background layers.
    pub fn layer_depth(self, layer: usize) -> LayerDepth {
        use LayerDepth::{Bpp2, Bpp4, Bpp8, Inactive};

        const TABLE: [[LayerDepth; 4]; 8] = [
            [Bpp2, Bpp2, Bpp2, Bpp2],         // Mode 0
            [Bpp4, Bpp4, Bpp2, Inactive],     // Mode 1
            [Bpp4, Bpp4, Inactive, Inactive], // Mode 2
            [Bpp8, Bpp4, Inactive, Inactive], // Mode 3
            [Bpp8, Bpp2, Inactive, Inactive], // Mode 4
            [Bpp4, Bpp2, Inactive, Inactive], // Mode 5
            [Bpp4, Inactive, Inactive, Inactive], // Mode 6
            [Bpp8, Inactive, Inactive, Inactive], // Mode 7
        ];

        TABLE[self as usize][layer]
    }

    /// Modes 5 and 6 always fetch 16-pixel-wide tiles regardless of the
    /// per-layer large-tile flag.
    pub fn forces_wide_tiles(self) -> bool {
        matches!(self, BgMode::Mode5 | BgMode::Mode6)
    }
}

/// Configuration of a single background layer, decoded from the PPU's
/// BGnSC/BGnNBA/scroll registers by the emulation core.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Tilemap base address in VRAM (byte address)
    pub tilemap_addr: u16,
    /// Character data base address in VRAM (byte address)
    pub chr_addr: u16,
    /// 16x16 tiles instead of 8x8
    pub large_tiles: bool,
    /// 64-tile-wide tilemap
    pub double_width: bool,
    /// 64-tile-tall tilemap
    pub double_height: bool,
    /// Horizontal scroll offset
    pub h_scroll: u16,
    /// Vertical scroll offset
    pub v_scroll: u16,
}

/// A moment-in-time view of everything the tilemap renderer needs.
#[derive(Debug, Clone, Copy)]
pub struct PpuSnapshot<'a> {
    pub bg_mode: BgMode,
    pub layers: [LayerConfig; 4],
    /// VRAM contents; `VRAM_SIZE` bytes
    pub vram: &'a [u8],
    /// CGRAM contents; `CGRAM_SIZE` bytes
    pub cgram: &'a [u8],
}
