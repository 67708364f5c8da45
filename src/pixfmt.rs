//! Pixel formats.
//!
//! [`PixelFormat`] names the memory layouts a [`Bitmap`](crate::rendering_buffer::Bitmap)
//! can hold. The zero-sized [`PixelOps`] implementors give the span fillers
//! monomorphized read/write/pack routines for each layout.
//!
//! Packed colors are always in the destination format: a palette index for
//! `Indexed8`, `0bRRRRRGGGGGBBBBB` for `Rgb555`, `0xRRGGBB` for the 24 and
//! 32 bit formats, and so on.

// ============================================================================
// PixelFormat
// ============================================================================

/// Memory layout of one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    /// 8-bit palette index.
    Indexed8,
    /// 15-bit 5-5-5, stored in a little-endian `u16`.
    Rgb555,
    /// 16-bit 5-6-5, stored in a little-endian `u16`.
    Rgb565,
    /// 24-bit, 3 bytes per pixel, blue first.
    Rgb888,
    /// 32-bit `0xAARRGGBB`, little-endian.
    Argb8888,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 5] = [
        PixelFormat::Indexed8,
        PixelFormat::Rgb555,
        PixelFormat::Rgb565,
        PixelFormat::Rgb888,
        PixelFormat::Argb8888,
    ];

    /// Color depth in bits (15 for `Rgb555`).
    pub fn bits(self) -> u32 {
        match self {
            PixelFormat::Indexed8 => 8,
            PixelFormat::Rgb555 => 15,
            PixelFormat::Rgb565 => 16,
            PixelFormat::Rgb888 => 24,
            PixelFormat::Argb8888 => 32,
        }
    }

    pub fn from_depth(depth: u32) -> Option<Self> {
        match depth {
            8 => Some(PixelFormat::Indexed8),
            15 => Some(PixelFormat::Rgb555),
            16 => Some(PixelFormat::Rgb565),
            24 => Some(PixelFormat::Rgb888),
            32 => Some(PixelFormat::Argb8888),
            _ => None,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Indexed8 => 1,
            PixelFormat::Rgb555 | PixelFormat::Rgb565 => 2,
            PixelFormat::Rgb888 => 3,
            PixelFormat::Argb8888 => 4,
        }
    }

    /// `false` only for the palette format.
    pub fn is_truecolor(self) -> bool {
        self != PixelFormat::Indexed8
    }

    /// Texel value treated as transparent by masked fillers.
    pub fn mask_color(self) -> u32 {
        match self {
            PixelFormat::Indexed8 => Pix8::MASK,
            PixelFormat::Rgb555 => Pix15::MASK,
            PixelFormat::Rgb565 => Pix16::MASK,
            PixelFormat::Rgb888 => Pix24::MASK,
            PixelFormat::Argb8888 => Pix32::MASK,
        }
    }

    /// Pack 8-bit channels. `Indexed8` packs to a 3-3-2 index.
    pub fn makecol(self, r: u32, g: u32, b: u32) -> u32 {
        match self {
            PixelFormat::Indexed8 => Pix8::pack(r, g, b),
            PixelFormat::Rgb555 => Pix15::pack(r, g, b),
            PixelFormat::Rgb565 => Pix16::pack(r, g, b),
            PixelFormat::Rgb888 => Pix24::pack(r, g, b),
            PixelFormat::Argb8888 => Pix32::pack(r, g, b),
        }
    }

    /// Unpack to 8-bit channels.
    pub fn unpack(self, c: u32) -> (u32, u32, u32) {
        match self {
            PixelFormat::Indexed8 => Pix8::unpack(c),
            PixelFormat::Rgb555 => Pix15::unpack(c),
            PixelFormat::Rgb565 => Pix16::unpack(c),
            PixelFormat::Rgb888 => Pix24::unpack(c),
            PixelFormat::Argb8888 => Pix32::unpack(c),
        }
    }

    pub fn getr(self, c: u32) -> u32 {
        self.unpack(c).0
    }

    pub fn getg(self, c: u32) -> u32 {
        self.unpack(c).1
    }

    pub fn getb(self, c: u32) -> u32 {
        self.unpack(c).2
    }

    /// Read the packed pixel at the start of `p`.
    pub fn read(self, p: &[u8]) -> u32 {
        match self {
            PixelFormat::Indexed8 => Pix8::read(p),
            PixelFormat::Rgb555 => Pix15::read(p),
            PixelFormat::Rgb565 => Pix16::read(p),
            PixelFormat::Rgb888 => Pix24::read(p),
            PixelFormat::Argb8888 => Pix32::read(p),
        }
    }

    /// Write a packed pixel to the start of `p`.
    pub fn write(self, p: &mut [u8], c: u32) {
        match self {
            PixelFormat::Indexed8 => Pix8::write(p, c),
            PixelFormat::Rgb555 => Pix15::write(p, c),
            PixelFormat::Rgb565 => Pix16::write(p, c),
            PixelFormat::Rgb888 => Pix24::write(p, c),
            PixelFormat::Argb8888 => Pix32::write(p, c),
        }
    }
}

/// Expand a 5-bit channel to 8 bits.
#[inline]
fn scale5(x: u32) -> u32 {
    (x * 255 + 15) / 31
}

/// Expand a 6-bit channel to 8 bits.
#[inline]
fn scale6(x: u32) -> u32 {
    (x * 255 + 31) / 63
}

// ============================================================================
// PixelOps
// ============================================================================

/// Static per-format pixel access, used to monomorphize span fillers.
pub trait PixelOps {
    const FORMAT: PixelFormat;
    const BPP: usize;
    const MASK: u32;

    fn read(p: &[u8]) -> u32;
    fn write(p: &mut [u8], c: u32);
    fn pack(r: u32, g: u32, b: u32) -> u32;
    fn unpack(c: u32) -> (u32, u32, u32);
}

/// 8-bit indexed.
pub struct Pix8;
/// 15-bit 5-5-5.
pub struct Pix15;
/// 16-bit 5-6-5.
pub struct Pix16;
/// 24-bit packed.
pub struct Pix24;
/// 32-bit.
pub struct Pix32;

impl PixelOps for Pix8 {
    const FORMAT: PixelFormat = PixelFormat::Indexed8;
    const BPP: usize = 1;
    const MASK: u32 = 0;

    #[inline]
    fn read(p: &[u8]) -> u32 {
        p[0] as u32
    }

    #[inline]
    fn write(p: &mut [u8], c: u32) {
        p[0] = c as u8;
    }

    // 3-3-2 palette layout.
    #[inline]
    fn pack(r: u32, g: u32, b: u32) -> u32 {
        (r & 0xE0) | ((g >> 3) & 0x1C) | (b >> 6)
    }

    #[inline]
    fn unpack(c: u32) -> (u32, u32, u32) {
        let r = (c >> 5) & 7;
        let g = (c >> 2) & 7;
        let b = c & 3;
        (r * 255 / 7, g * 255 / 7, b * 255 / 3)
    }
}

impl PixelOps for Pix15 {
    const FORMAT: PixelFormat = PixelFormat::Rgb555;
    const BPP: usize = 2;
    const MASK: u32 = 0x7C1F;

    #[inline]
    fn read(p: &[u8]) -> u32 {
        u16::from_le_bytes([p[0], p[1]]) as u32
    }

    #[inline]
    fn write(p: &mut [u8], c: u32) {
        p[..2].copy_from_slice(&(c as u16).to_le_bytes());
    }

    #[inline]
    fn pack(r: u32, g: u32, b: u32) -> u32 {
        ((r >> 3) << 10) | ((g >> 3) << 5) | (b >> 3)
    }

    #[inline]
    fn unpack(c: u32) -> (u32, u32, u32) {
        (
            scale5((c >> 10) & 0x1F),
            scale5((c >> 5) & 0x1F),
            scale5(c & 0x1F),
        )
    }
}

impl PixelOps for Pix16 {
    const FORMAT: PixelFormat = PixelFormat::Rgb565;
    const BPP: usize = 2;
    const MASK: u32 = 0xF81F;

    #[inline]
    fn read(p: &[u8]) -> u32 {
        u16::from_le_bytes([p[0], p[1]]) as u32
    }

    #[inline]
    fn write(p: &mut [u8], c: u32) {
        p[..2].copy_from_slice(&(c as u16).to_le_bytes());
    }

    #[inline]
    fn pack(r: u32, g: u32, b: u32) -> u32 {
        ((r >> 3) << 11) | ((g >> 2) << 5) | (b >> 3)
    }

    #[inline]
    fn unpack(c: u32) -> (u32, u32, u32) {
        (
            scale5((c >> 11) & 0x1F),
            scale6((c >> 5) & 0x3F),
            scale5(c & 0x1F),
        )
    }
}

impl PixelOps for Pix24 {
    const FORMAT: PixelFormat = PixelFormat::Rgb888;
    const BPP: usize = 3;
    const MASK: u32 = 0xFF00FF;

    #[inline]
    fn read(p: &[u8]) -> u32 {
        p[0] as u32 | (p[1] as u32) << 8 | (p[2] as u32) << 16
    }

    #[inline]
    fn write(p: &mut [u8], c: u32) {
        p[0] = c as u8;
        p[1] = (c >> 8) as u8;
        p[2] = (c >> 16) as u8;
    }

    #[inline]
    fn pack(r: u32, g: u32, b: u32) -> u32 {
        (r << 16) | (g << 8) | b
    }

    #[inline]
    fn unpack(c: u32) -> (u32, u32, u32) {
        ((c >> 16) & 0xFF, (c >> 8) & 0xFF, c & 0xFF)
    }
}

impl PixelOps for Pix32 {
    const FORMAT: PixelFormat = PixelFormat::Argb8888;
    const BPP: usize = 4;
    const MASK: u32 = 0xFF00FF;

    #[inline]
    fn read(p: &[u8]) -> u32 {
        u32::from_le_bytes([p[0], p[1], p[2], p[3]])
    }

    #[inline]
    fn write(p: &mut [u8], c: u32) {
        p[..4].copy_from_slice(&c.to_le_bytes());
    }

    #[inline]
    fn pack(r: u32, g: u32, b: u32) -> u32 {
        (r << 16) | (g << 8) | b
    }

    #[inline]
    fn unpack(c: u32) -> (u32, u32, u32) {
        ((c >> 16) & 0xFF, (c >> 8) & 0xFF, c & 0xFF)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_roundtrip() {
        for f in PixelFormat::ALL {
            assert_eq!(PixelFormat::from_depth(f.bits()), Some(f));
        }
        assert_eq!(PixelFormat::from_depth(12), None);
    }

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(PixelFormat::Indexed8.bytes_per_pixel(), 1);
        assert_eq!(PixelFormat::Rgb555.bytes_per_pixel(), 2);
        assert_eq!(PixelFormat::Rgb565.bytes_per_pixel(), 2);
        assert_eq!(PixelFormat::Rgb888.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::Argb8888.bytes_per_pixel(), 4);
    }

    #[test]
    fn test_makecol_565() {
        assert_eq!(PixelFormat::Rgb565.makecol(255, 0, 0), 0xF800);
        assert_eq!(PixelFormat::Rgb565.makecol(0, 255, 0), 0x07E0);
        assert_eq!(PixelFormat::Rgb565.makecol(0, 0, 255), 0x001F);
        assert_eq!(PixelFormat::Rgb565.unpack(0xFFFF), (255, 255, 255));
    }

    #[test]
    fn test_makecol_555() {
        assert_eq!(PixelFormat::Rgb555.makecol(255, 0, 255), 0x7C1F);
        assert_eq!(PixelFormat::Rgb555.unpack(0x7C1F), (255, 0, 255));
        assert_eq!(PixelFormat::Rgb555.getg(0x03E0), 255);
    }

    #[test]
    fn test_mask_colors_are_magenta() {
        for f in [
            PixelFormat::Rgb555,
            PixelFormat::Rgb565,
            PixelFormat::Rgb888,
            PixelFormat::Argb8888,
        ] {
            assert_eq!(f.mask_color(), f.makecol(255, 0, 255));
        }
        assert_eq!(PixelFormat::Indexed8.mask_color(), 0);
    }

    #[test]
    fn test_read_write_24() {
        let mut p = [0u8; 3];
        PixelFormat::Rgb888.write(&mut p, 0x123456);
        assert_eq!(p, [0x56, 0x34, 0x12]);
        assert_eq!(PixelFormat::Rgb888.read(&p), 0x123456);
    }

    #[test]
    fn test_indexed_332() {
        assert_eq!(Pix8::pack(255, 255, 255), 0xFF);
        assert_eq!(Pix8::unpack(0xFF), (255, 255, 255));
        assert_eq!(Pix8::pack(0, 0, 0), 0);
    }
}
