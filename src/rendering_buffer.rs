//! Rendering buffer: owned pixel memory with a clip rectangle.
//!
//! A [`Bitmap`] stores rows of packed pixels top-down with a fixed stride.
//! Draw calls take an exclusive [`BitmapLock`] for their duration; the
//! guard derefs to the bitmap and releases it on drop.

use core::ops::{Deref, DerefMut};

use crate::basics::RectI;
use crate::error::BitmapError;
use crate::pixfmt::PixelFormat;

// ============================================================================
// Bitmap
// ============================================================================

/// Row-oriented pixel buffer.
#[derive(Clone)]
pub struct Bitmap {
    data: Vec<u8>,
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    clip: RectI,
    locked: bool,
}

impl Bitmap {
    /// Allocate a zeroed, tightly packed bitmap.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, BitmapError> {
        let stride = width as usize * format.bytes_per_pixel();
        Self::from_vec(
            vec![0u8; stride * height as usize],
            width,
            height,
            stride,
            format,
        )
    }

    /// Wrap existing pixel memory.
    pub fn from_vec(
        data: Vec<u8>,
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(BitmapError::InvalidDimensions { width, height });
        }
        let row_bytes = width as usize * format.bytes_per_pixel();
        if stride < row_bytes {
            return Err(BitmapError::StrideTooSmall { stride, row_bytes });
        }
        let needed = stride * (height as usize - 1) + row_bytes;
        if data.len() < needed {
            return Err(BitmapError::BufferTooSmall {
                len: data.len(),
                needed,
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
            clip: RectI::new(0, 0, width as i32, height as i32),
            locked: false,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// `true` when rows are contiguous with no padding.
    pub fn is_tightly_packed(&self) -> bool {
        self.stride == self.width as usize * self.format.bytes_per_pixel()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    // ------------------------------------------------------------------------
    // Clipping
    // ------------------------------------------------------------------------

    /// Clip rectangle; left/top inclusive, right/bottom exclusive.
    pub fn clip_rect(&self) -> RectI {
        self.clip
    }

    /// Set the clip rectangle, clamped to the bitmap. An empty result
    /// clips everything.
    pub fn set_clip(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.clip = RectI::new(x1, y1, x2, y2)
            .normalized()
            .intersect(&self.full_rect())
            .unwrap_or_default();
    }

    pub fn reset_clip(&mut self) {
        self.clip = self.full_rect();
    }

    fn full_rect(&self) -> RectI {
        RectI::new(0, 0, self.width as i32, self.height as i32)
    }

    // ------------------------------------------------------------------------
    // Row and pixel access
    // ------------------------------------------------------------------------

    /// The `width * bpp` bytes of row `y`.
    pub fn row_slice(&self, y: u32) -> &[u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let start = y as usize * self.stride;
        &self.data[start..start + self.row_bytes()]
    }

    pub fn row_slice_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(
            y < self.height,
            "row {} out of bounds (height={})",
            y,
            self.height
        );
        let start = y as usize * self.stride;
        let len = self.row_bytes();
        &mut self.data[start..start + len]
    }

    fn row_bytes(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Packed pixel at (x, y), or `None` outside the bitmap.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        Some(self.format.read(&self.row_slice(y as u32)[x as usize * bpp..]))
    }

    /// Write a packed pixel, honoring the clip rectangle.
    pub fn put_pixel(&mut self, x: i32, y: i32, c: u32) {
        if !self.clip.contains(x, y) {
            return;
        }
        let bpp = self.format.bytes_per_pixel();
        let format = self.format;
        format.write(&mut self.row_slice_mut(y as u32)[x as usize * bpp..], c);
    }

    /// Fill the whole bitmap, ignoring the clip rectangle.
    pub fn clear_to_color(&mut self, c: u32) {
        let format = self.format;
        let bpp = format.bytes_per_pixel();
        for y in 0..self.height {
            for px in self.row_slice_mut(y).chunks_exact_mut(bpp) {
                format.write(px, c);
            }
        }
    }

    /// Horizontal line from `x1` to `x2` inclusive, clipped.
    pub fn hline(&mut self, x1: i32, y: i32, x2: i32, c: u32) {
        let (mut x1, mut x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        if y < self.clip.y1 || y >= self.clip.y2 {
            return;
        }
        x1 = x1.max(self.clip.x1);
        x2 = x2.min(self.clip.x2 - 1);
        if x1 > x2 {
            return;
        }
        let format = self.format;
        let bpp = format.bytes_per_pixel();
        let row = self.row_slice_mut(y as u32);
        for px in row[x1 as usize * bpp..(x2 as usize + 1) * bpp].chunks_exact_mut(bpp) {
            format.write(px, c);
        }
    }

    // ------------------------------------------------------------------------
    // Locking
    // ------------------------------------------------------------------------

    /// Acquire exclusive write access for a draw call.
    pub fn lock(&mut self) -> BitmapLock<'_> {
        self.locked = true;
        BitmapLock { bmp: self }
    }

    /// `true` while a [`BitmapLock`] is alive.
    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl core::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("format", &self.format)
            .field("clip", &self.clip)
            .finish()
    }
}

// ============================================================================
// BitmapLock
// ============================================================================

/// Exclusive access to a bitmap for the duration of a draw call.
pub struct BitmapLock<'a> {
    bmp: &'a mut Bitmap,
}

impl Deref for BitmapLock<'_> {
    type Target = Bitmap;

    fn deref(&self) -> &Bitmap {
        self.bmp
    }
}

impl DerefMut for BitmapLock<'_> {
    fn deref_mut(&mut self) -> &mut Bitmap {
        self.bmp
    }
}

impl Drop for BitmapLock<'_> {
    fn drop(&mut self) {
        self.bmp.locked = false;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let bmp = Bitmap::new(10, 5, PixelFormat::Argb8888).unwrap();
        assert_eq!(bmp.width(), 10);
        assert_eq!(bmp.height(), 5);
        assert_eq!(bmp.stride(), 40);
        assert_eq!(bmp.as_bytes().len(), 200);
        assert_eq!(bmp.clip_rect(), RectI::new(0, 0, 10, 5));
        assert!(bmp.is_tightly_packed());
    }

    #[test]
    fn test_invalid() {
        assert_eq!(
            Bitmap::new(0, 5, PixelFormat::Indexed8).unwrap_err(),
            BitmapError::InvalidDimensions {
                width: 0,
                height: 5
            }
        );
        assert!(matches!(
            Bitmap::from_vec(vec![0; 16], 4, 4, 3, PixelFormat::Indexed8),
            Err(BitmapError::StrideTooSmall { .. })
        ));
        assert!(matches!(
            Bitmap::from_vec(vec![0; 15], 4, 4, 4, PixelFormat::Indexed8),
            Err(BitmapError::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn test_padded_stride() {
        let bmp = Bitmap::from_vec(vec![0; 8 * 3], 3, 3, 8, PixelFormat::Rgb565).unwrap();
        assert!(!bmp.is_tightly_packed());
        assert_eq!(bmp.row_slice(2).len(), 6);
    }

    #[test]
    fn test_put_get_pixel() {
        let mut bmp = Bitmap::new(4, 4, PixelFormat::Rgb888).unwrap();
        bmp.put_pixel(2, 1, 0xABCDEF);
        assert_eq!(bmp.get_pixel(2, 1), Some(0xABCDEF));
        assert_eq!(bmp.get_pixel(4, 1), None);
        assert_eq!(bmp.get_pixel(-1, 1), None);
    }

    #[test]
    fn test_put_pixel_clipped() {
        let mut bmp = Bitmap::new(4, 4, PixelFormat::Indexed8).unwrap();
        bmp.set_clip(1, 1, 3, 3);
        bmp.put_pixel(0, 0, 9);
        bmp.put_pixel(3, 3, 9);
        bmp.put_pixel(2, 2, 9);
        assert_eq!(bmp.get_pixel(0, 0), Some(0));
        assert_eq!(bmp.get_pixel(3, 3), Some(0));
        assert_eq!(bmp.get_pixel(2, 2), Some(9));
    }

    #[test]
    fn test_set_clip_clamped() {
        let mut bmp = Bitmap::new(8, 6, PixelFormat::Indexed8).unwrap();
        bmp.set_clip(-4, 2, 100, 4);
        assert_eq!(bmp.clip_rect(), RectI::new(0, 2, 8, 4));
        bmp.set_clip(20, 20, 30, 30);
        assert!(bmp.clip_rect().is_empty());
        bmp.reset_clip();
        assert_eq!(bmp.clip_rect(), RectI::new(0, 0, 8, 6));
    }

    #[test]
    fn test_hline() {
        let mut bmp = Bitmap::new(8, 2, PixelFormat::Argb8888).unwrap();
        bmp.set_clip(0, 0, 6, 2);
        bmp.hline(7, 1, 3, 0x112233);
        for x in 0..8 {
            let expected = if (3..6).contains(&x) { 0x112233 } else { 0 };
            assert_eq!(bmp.get_pixel(x, 1), Some(expected), "x={}", x);
        }
        assert_eq!(bmp.get_pixel(4, 0), Some(0));
    }

    #[test]
    fn test_clear_to_color() {
        let mut bmp = Bitmap::new(3, 3, PixelFormat::Rgb555).unwrap();
        bmp.set_clip(1, 1, 2, 2);
        bmp.clear_to_color(0x7FFF);
        assert_eq!(bmp.get_pixel(0, 0), Some(0x7FFF));
        assert_eq!(bmp.get_pixel(2, 2), Some(0x7FFF));
    }

    #[test]
    fn test_lock_guard() {
        let mut bmp = Bitmap::new(2, 2, PixelFormat::Indexed8).unwrap();
        {
            let mut lock = bmp.lock();
            assert!(lock.is_locked());
            lock.put_pixel(1, 1, 5);
        }
        assert!(!bmp.is_locked());
        assert_eq!(bmp.get_pixel(1, 1), Some(5));
    }
}
