//! Per-rasterizer configuration.
//!
//! [`RenderState`] is passed to, and owned by, a
//! [`Poly3dRasterizer`](crate::poly3d::Poly3dRasterizer); nothing here is
//! process-wide. [`ScanParams`] is the per-draw-call snapshot the edge
//! builder and span set-up read.

use std::sync::Arc;

use crate::basics::RectI;
use crate::color_map::{ColorMap, RgbMap};
use crate::filler_registry::FillerTier;
use crate::pixfmt::PixelFormat;
use crate::poly_type::InterpFlags;

// ============================================================================
// RenderState
// ============================================================================

/// Rasterizer settings.
#[derive(Debug, Clone)]
pub struct RenderState {
    /// Correct interpolation start values to the first sampled scanline
    /// and pixel instead of the vertex position.
    pub subpixel_accuracy: bool,
    /// Best filler tier to use when one is registered.
    pub preferred_tier: FillerTier,
    /// Blend target of truecolor lit modes, packed in the target format.
    pub light_color: u32,
    /// Light table for 8-bit lit modes.
    pub color_map: Option<Arc<ColorMap>>,
    /// Inverse palette for 8-bit RGB gouraud. Falls back to 3-3-2.
    pub rgb_map: Option<Arc<RgbMap>>,
}

impl RenderState {
    pub fn new() -> Self {
        Self {
            subpixel_accuracy: true,
            preferred_tier: FillerTier::Accelerated,
            light_color: 0,
            color_map: None,
            rgb_map: None,
        }
    }

    pub fn with_subpixel_accuracy(mut self, on: bool) -> Self {
        self.subpixel_accuracy = on;
        self
    }

    pub fn with_tier(mut self, tier: FillerTier) -> Self {
        self.preferred_tier = tier;
        self
    }

    pub fn with_light_color(mut self, c: u32) -> Self {
        self.light_color = c;
        self
    }

    pub fn with_color_map(mut self, map: Arc<ColorMap>) -> Self {
        self.color_map = Some(map);
        self
    }

    pub fn with_rgb_map(mut self, map: Arc<RgbMap>) -> Self {
        self.rgb_map = Some(map);
        self
    }

    /// Scalar settings, without the lookup tables.
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            subpixel_accuracy: self.subpixel_accuracy,
            preferred_tier: self.preferred_tier,
            light_color: self.light_color,
        }
    }

    pub fn apply_options(&mut self, opts: &RenderOptions) {
        self.subpixel_accuracy = opts.subpixel_accuracy;
        self.preferred_tier = opts.preferred_tier;
        self.light_color = opts.light_color;
    }
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable subset of [`RenderState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderOptions {
    pub subpixel_accuracy: bool,
    pub preferred_tier: FillerTier,
    pub light_color: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderState::new().options()
    }
}

// ============================================================================
// ScanParams
// ============================================================================

/// Values fixed for the duration of one draw call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScanParams {
    pub flags: InterpFlags,
    pub clip: RectI,
    pub format: PixelFormat,
    pub subpixel: bool,
}

impl ScanParams {
    #[inline]
    pub fn has(&self, f: InterpFlags) -> bool {
        self.flags.contains(f)
    }
}

// ============================================================================
// Tests
// ============================================================================
