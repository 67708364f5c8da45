//! Error types.
//!
//! Fixed-point operations return [`FixedError`] instead of setting a
//! side-channel error code. Each variant carries the sentinel value the
//! operation settles on, so rendering code can keep going with it via
//! [`OrSentinel::or_sentinel`].

use thiserror::Error;

// ============================================================================
// FixedError
// ============================================================================

/// Failure of a fixed-point arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FixedError {
    /// The mathematical result does not fit in 16.16 (or the division was
    /// by zero). Carries the saturated result.
    #[error("fixed-point result out of range (saturated to {0:#x})")]
    Range(i32),
    /// The input lies outside the function's domain. Carries the value
    /// returned in its place.
    #[error("fixed-point argument outside the function domain (returned {0})")]
    Domain(i32),
}

impl FixedError {
    /// The raw value substituted for the failed result.
    #[inline]
    pub fn sentinel(self) -> i32 {
        match self {
            FixedError::Range(v) | FixedError::Domain(v) => v,
        }
    }

    pub fn is_domain(self) -> bool {
        matches!(self, FixedError::Domain(_))
    }

    pub fn is_range(self) -> bool {
        matches!(self, FixedError::Range(_))
    }
}

/// Continue with the sentinel value of a failed fixed-point operation.
pub trait OrSentinel {
    fn or_sentinel(self) -> i32;
}

impl OrSentinel for Result<i32, FixedError> {
    #[inline]
    fn or_sentinel(self) -> i32 {
        match self {
            Ok(v) => v,
            Err(e) => e.sentinel(),
        }
    }
}

// ============================================================================
// DrawError
// ============================================================================

/// Reasons a draw call wrote no pixels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    #[error("no span fillers registered for {0:?}")]
    UnsupportedFormat(crate::pixfmt::PixelFormat),
    #[error("polygon type {0:?} needs a texture")]
    MissingTexture(crate::poly_type::PolyType),
    #[error("texture is {width}x{height}; both dimensions must be powers of two")]
    TextureNotPowerOfTwo { width: u32, height: u32 },
    #[error("texture is {width}x{height}; at most {} texels are addressable", i32::MAX)]
    TextureTooLarge { width: u32, height: u32 },
    #[error("texture format {texture:?} does not match target format {target:?}")]
    TextureFormatMismatch {
        texture: crate::pixfmt::PixelFormat,
        target: crate::pixfmt::PixelFormat,
    },
    #[error("lit 8-bit polygon type {0:?} needs a color map")]
    MissingColorMap(crate::poly_type::PolyType),
    #[error("primitive has no drawable area")]
    Degenerate,
    #[error("primitive lies entirely outside the clip rectangle")]
    Clipped,
}

impl DrawError {
    /// `true` for errors caused by geometry rather than configuration.
    pub fn is_geometric(&self) -> bool {
        matches!(self, DrawError::Degenerate | DrawError::Clipped)
    }
}

// ============================================================================
// BitmapError
// ============================================================================

/// Construction failure of a [`Bitmap`](crate::rendering_buffer::Bitmap).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitmapError {
    #[error("bitmap dimensions {width}x{height} are invalid")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("stride {stride} is smaller than one row ({row_bytes} bytes)")]
    StrideTooSmall { stride: usize, row_bytes: usize },
    #[error("pixel buffer holds {len} bytes, {needed} required")]
    BufferTooSmall { len: usize, needed: usize },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel() {
        assert_eq!(FixedError::Range(0x7FFF_FFFF).sentinel(), 0x7FFF_FFFF);
        assert_eq!(FixedError::Domain(0).sentinel(), 0);
        assert!(FixedError::Domain(0).is_domain());
        assert!(FixedError::Range(1).is_range());
    }

    #[test]
    fn test_or_sentinel() {
        let ok: Result<i32, FixedError> = Ok(5);
        let err: Result<i32, FixedError> = Err(FixedError::Range(-0x7FFF_FFFF));
        assert_eq!(ok.or_sentinel(), 5);
        assert_eq!(err.or_sentinel(), -0x7FFF_FFFF);
    }

    #[test]
    fn test_draw_error_display() {
        let e = DrawError::TextureNotPowerOfTwo {
            width: 3,
            height: 4,
        };
        assert!(e.to_string().contains("3x4"));
        assert!(DrawError::Clipped.is_geometric());
        assert!(!e.is_geometric());
    }
}
