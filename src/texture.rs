//! Texture sampling set-up.
//!
//! Textures are tiled: coordinates wrap at the texture size, which must be
//! a power of two in both directions. The texel at 16.16 coordinates
//! `(u, v)` is found by masking alone:
//!
//! ```text
//! index = ((v >> (16 - vshift)) & (vmask << vshift)) + ((u >> 16) & umask)
//! ```
//!
//! with `umask = width - 1`, `vmask = height - 1` and `1 << vshift >= width`.

use crate::error::DrawError;
use crate::pixfmt::PixelFormat;
use crate::rendering_buffer::Bitmap;

/// Largest supported texture width (`vshift` must not exceed 16).
pub const MAX_TEXTURE_WIDTH: u32 = 1 << 16;

/// Largest texel count. Texel indices are computed in `i32`.
pub const MAX_TEXTURE_TEXELS: u64 = i32::MAX as u64;

// ============================================================================
// Texture
// ============================================================================

/// A validated, tightly packed, power-of-two texture.
#[derive(Debug, Clone, Copy)]
pub struct Texture<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    format: PixelFormat,
}

impl<'a> Texture<'a> {
    pub fn new(bmp: &'a Bitmap) -> Result<Self, DrawError> {
        let (width, height) = (bmp.width(), bmp.height());
        check_size(width, height)?;
        if !bmp.is_tightly_packed() {
            return Err(DrawError::TextureNotPowerOfTwo { width, height });
        }
        Ok(Self {
            data: bmp.as_bytes(),
            width,
            height,
            format: bmp.format(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn masks(&self) -> TextureMasks {
        TextureMasks::new(self.width, self.height)
    }
}

/// Checks the dimensions a texture may have.
pub fn check_size(width: u32, height: u32) -> Result<(), DrawError> {
    if !width.is_power_of_two() || !height.is_power_of_two() || width > MAX_TEXTURE_WIDTH {
        return Err(DrawError::TextureNotPowerOfTwo { width, height });
    }
    if width as u64 * height as u64 > MAX_TEXTURE_TEXELS {
        return Err(DrawError::TextureTooLarge { width, height });
    }
    Ok(())
}

// ============================================================================
// TextureMasks
// ============================================================================

/// Wrap masks and row shift of a texture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureMasks {
    pub umask: i32,
    pub vmask: i32,
    pub vshift: u32,
}

impl TextureMasks {
    pub fn new(width: u32, height: u32) -> Self {
        let mut vshift = 0;
        while (1u32 << vshift) < width {
            vshift += 1;
        }
        Self {
            umask: width as i32 - 1,
            vmask: height as i32 - 1,
            vshift,
        }
    }

    /// Texel index of 16.16 coordinates, wrapped to the texture.
    #[inline]
    pub fn index(&self, u: i32, v: i32) -> usize {
        (((v >> (16 - self.vshift)) & (self.vmask << self.vshift)) + ((u >> 16) & self.umask))
            as usize
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::itofix;

    #[test]
    fn test_masks() {
        let m = TextureMasks::new(64, 32);
        assert_eq!(m.umask, 63);
        assert_eq!(m.vmask, 31);
        assert_eq!(m.vshift, 6);
        assert_eq!(TextureMasks::new(1, 1).vshift, 0);
    }

    #[test]
    fn test_index_wraps() {
        let m = TextureMasks::new(8, 4);
        assert_eq!(m.index(itofix(3), itofix(2)), 2 * 8 + 3);
        assert_eq!(m.index(itofix(11), itofix(6)), 2 * 8 + 3);
        assert_eq!(m.index(itofix(-1), itofix(-1)), 3 * 8 + 7);
        // Fractions are truncated.
        assert_eq!(m.index(itofix(1) + 0xFFFF, 0x8000), 1);
    }

    #[test]
    fn test_new_validates() {
        let ok = Bitmap::new(16, 8, PixelFormat::Argb8888).unwrap();
        let tex = Texture::new(&ok).unwrap();
        assert_eq!(tex.masks().vshift, 4);
        assert_eq!(tex.data().len(), 16 * 8 * 4);

        let bad = Bitmap::new(12, 8, PixelFormat::Argb8888).unwrap();
        assert_eq!(
            Texture::new(&bad).unwrap_err(),
            DrawError::TextureNotPowerOfTwo {
                width: 12,
                height: 8
            }
        );

        let padded = Bitmap::from_vec(vec![0; 64], 4, 4, 16, PixelFormat::Indexed8).unwrap();
        assert!(Texture::new(&padded).is_err());
    }

    #[test]
    fn test_size_limit() {
        assert_eq!(check_size(1 << 16, 1 << 14), Ok(()));
        assert_eq!(
            check_size(1 << 16, 1 << 15),
            Err(DrawError::TextureTooLarge {
                width: 1 << 16,
                height: 1 << 15
            })
        );
        assert_eq!(
            check_size(1 << 15, 1 << 17),
            Err(DrawError::TextureTooLarge {
                width: 1 << 15,
                height: 1 << 17
            })
        );
        assert!(matches!(
            check_size(1 << 17, 1),
            Err(DrawError::TextureNotPowerOfTwo { .. })
        ));

        // Largest accepted texture: the last row still indexes in range.
        let m = TextureMasks::new(1 << 16, 1 << 14);
        let last = m.index(itofix(-1), itofix(-1));
        assert_eq!(last as u64, MAX_TEXTURE_TEXELS / 2);
    }
}
