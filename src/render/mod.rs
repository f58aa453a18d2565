//! Presentation interface
//!
//! The kernel never touches pixels. Each simulation step produces a [`Snapshot`]:
//! an ordered list of draw commands (polygons, circles, rectangles, text) that a
//! [`PresentationSink`] turns into whatever the platform draws with.

pub mod shapes;
pub mod snapshot;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use shapes::{DrawCommand, DrawItem};
pub use snapshot::{Snapshot, SnapshotPublisher};

/// 32-bit ARGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const YELLOW: Color = Color(0xFFFF_FF00);
    pub const GREEN: Color = Color(0xFF00_FF00);

    /// Opaque colour from a 0xRRGGBB value
    #[inline]
    pub const fn rgb(rgb: u32) -> Self {
        Color(0xFF00_0000 | (rgb & 0x00FF_FFFF))
    }

    /// Colour from 0xRRGGBB plus an alpha channel
    #[inline]
    pub const fn rgba(rgb: u32, alpha: u8) -> Self {
        Color(((alpha as u32) << 24) | (rgb & 0x00FF_FFFF))
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self::rgba(self.0, alpha)
    }

    /// Add `amount` to each colour channel, saturating at 255
    pub fn brighten(self, amount: u8) -> Self {
        let channel = |shift: u32| {
            let value = ((self.0 >> shift) & 0xFF) as u8;
            (value.saturating_add(amount) as u32) << shift
        };
        Color((self.0 & 0xFF00_0000) | channel(16) | channel(8) | channel(0))
    }
}

/// Failure reported by a presentation backend
#[derive(Debug, Error)]
pub enum PresentError {
    #[error("presentation surface lost")]
    SurfaceLost,
    #[error("presentation backend failed: {0}")]
    Backend(String),
}

/// Receives finished frames
pub trait PresentationSink: Send {
    fn present(&mut self, frame: &Snapshot) -> Result<(), PresentError>;
}
