//! Image comparison for rasterizer output.
//!
//! Converts [`Bitmap`]s of any pixel format to RGBA, compares two images
//! channel by channel, builds diff and side-by-side images, and reads and
//! writes 32-bit BMP and raw RGBA files.

use std::fs::File;
use std::io::{self, Read as IoRead, Write as IoWrite};
use std::path::Path;

use poly3d_rust::Bitmap;

pub mod render;

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA pixels, row-major, top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width * height * 4) as usize],
        }
    }

    /// Expand a bitmap to opaque RGBA. Indexed pixels are read as 3-3-2.
    pub fn from_bitmap(bmp: &Bitmap) -> Self {
        let format = bmp.format();
        let mut out = Self::new(bmp.width(), bmp.height());
        for (i, px) in out.data.chunks_exact_mut(4).enumerate() {
            let x = (i as u32 % bmp.width()) as i32;
            let y = (i as u32 / bmp.width()) as i32;
            let (r, g, b) = format.unpack(bmp.get_pixel(x, y).unwrap_or(0));
            px.copy_from_slice(&[r as u8, g as u8, b as u8, 255]);
        }
        out
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y * self.width + x) * 4) as usize
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    fn same_size(&self, other: &PixelBuffer) -> io::Result<()> {
        if self.width != other.width || self.height != other.height {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "size mismatch: {}x{} vs {}x{}",
                    self.width, self.height, other.width, other.height
                ),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// CompareResult
// ============================================================================

#[derive(Debug, Clone)]
pub struct DiffInfo {
    pub x: u32,
    pub y: u32,
    pub pixel_a: [u8; 4],
    pub pixel_b: [u8; 4],
}

#[derive(Debug, Clone)]
pub struct CompareResult {
    pub identical: bool,
    pub total_pixels: u64,
    /// Pixels differing in at least one channel.
    pub different_pixels: u64,
    pub max_channel_diff: u8,
    /// Mean over differing channels only.
    pub mean_channel_diff: f64,
    /// First difference in scan order.
    pub first_diff: Option<DiffInfo>,
    /// Count of differing channels by absolute difference.
    pub diff_histogram: [u64; 256],
}

impl std::fmt::Display for CompareResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.identical {
            return write!(f, "IDENTICAL: {} pixels", self.total_pixels);
        }
        write!(
            f,
            "DIFFERENT: {}/{} pixels ({:.2}%), max_diff={}, mean_diff={:.4}",
            self.different_pixels,
            self.total_pixels,
            self.different_pixels as f64 / self.total_pixels as f64 * 100.0,
            self.max_channel_diff,
            self.mean_channel_diff,
        )?;
        if let Some(d) = &self.first_diff {
            write!(
                f,
                "\n  first diff at ({}, {}): A={:?} B={:?}",
                d.x, d.y, d.pixel_a, d.pixel_b
            )?;
        }
        Ok(())
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// Compare two buffers of equal size channel by channel.
pub fn compare_buffers(a: &PixelBuffer, b: &PixelBuffer) -> io::Result<CompareResult> {
    a.same_size(b)?;

    let mut result = CompareResult {
        identical: true,
        total_pixels: a.width as u64 * a.height as u64,
        different_pixels: 0,
        max_channel_diff: 0,
        mean_channel_diff: 0.0,
        first_diff: None,
        diff_histogram: [0; 256],
    };
    let mut sum = 0u64;
    let mut channels = 0u64;

    for (i, (pa, pb)) in a.data.chunks_exact(4).zip(b.data.chunks_exact(4)).enumerate() {
        if pa == pb {
            continue;
        }
        for (&ca, &cb) in pa.iter().zip(pb) {
            let d = ca.abs_diff(cb);
            if d > 0 {
                result.max_channel_diff = result.max_channel_diff.max(d);
                result.diff_histogram[d as usize] += 1;
                sum += d as u64;
                channels += 1;
            }
        }
        result.different_pixels += 1;
        if result.first_diff.is_none() {
            result.first_diff = Some(DiffInfo {
                x: i as u32 % a.width,
                y: i as u32 / a.width,
                pixel_a: [pa[0], pa[1], pa[2], pa[3]],
                pixel_b: [pb[0], pb[1], pb[2], pb[3]],
            });
        }
    }

    result.identical = result.different_pixels == 0;
    if channels > 0 {
        result.mean_channel_diff = sum as f64 / channels as f64;
    }
    Ok(result)
}

/// Dark gray where the images agree, red scaled by the largest color
/// channel difference (amplified 10x) where they do not.
pub fn generate_diff_image(a: &PixelBuffer, b: &PixelBuffer) -> io::Result<PixelBuffer> {
    a.same_size(b)?;
    let mut diff = PixelBuffer::new(a.width, a.height);
    for ((out, pa), pb) in diff
        .data
        .chunks_exact_mut(4)
        .zip(a.data.chunks_exact(4))
        .zip(b.data.chunks_exact(4))
    {
        let d = (0..3).map(|c| pa[c].abs_diff(pb[c])).max().unwrap_or(0);
        let px = if d == 0 {
            [40, 40, 40, 255]
        } else {
            [(d as u16 * 10).min(255) as u8, 0, 0, 255]
        };
        out.copy_from_slice(&px);
    }
    Ok(diff)
}

/// `[A | diff | B]` in one image.
pub fn generate_sidebyside(a: &PixelBuffer, b: &PixelBuffer) -> io::Result<PixelBuffer> {
    let diff = generate_diff_image(a, b)?;
    let row = (a.width * 4) as usize;
    let mut out = PixelBuffer::new(a.width * 3, a.height);
    for (y, dst) in out.data.chunks_exact_mut(row * 3).enumerate() {
        let src = y * row..(y + 1) * row;
        dst[..row].copy_from_slice(&a.data[src.clone()]);
        dst[row..row * 2].copy_from_slice(&diff.data[src.clone()]);
        dst[row * 2..].copy_from_slice(&b.data[src]);
    }
    Ok(out)
}

// ============================================================================
// BMP I/O
// ============================================================================

/// Write a top-down 32-bit BGRA BMP.
pub fn save_bmp(path: &Path, buf: &PixelBuffer) -> io::Result<()> {
    let image_size = buf.width * buf.height * 4;
    let mut f = File::create(path)?;

    // File header.
    f.write_all(b"BM")?;
    f.write_all(&(14 + 40 + image_size).to_le_bytes())?;
    f.write_all(&[0u8; 4])?;
    f.write_all(&(14u32 + 40).to_le_bytes())?;

    // BITMAPINFOHEADER, negative height for top-down rows.
    f.write_all(&40u32.to_le_bytes())?;
    f.write_all(&buf.width.to_le_bytes())?;
    f.write_all(&(-(buf.height as i32)).to_le_bytes())?;
    f.write_all(&1u16.to_le_bytes())?;
    f.write_all(&32u16.to_le_bytes())?;
    f.write_all(&0u32.to_le_bytes())?;
    f.write_all(&image_size.to_le_bytes())?;
    f.write_all(&[0u8; 16])?;

    let bgra: Vec<u8> = buf
        .data
        .chunks_exact(4)
        .flat_map(|p| [p[2], p[1], p[0], p[3]])
        .collect();
    f.write_all(&bgra)
}

/// Read a 24- or 32-bit uncompressed BMP.
pub fn load_bmp(path: &Path) -> io::Result<PixelBuffer> {
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;

    if data.len() < 54 || &data[0..2] != b"BM" {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "not a BMP file"));
    }

    let le32 = |i: usize| [data[i], data[i + 1], data[i + 2], data[i + 3]];
    let pixel_offset = u32::from_le_bytes(le32(10)) as usize;
    let w = i32::from_le_bytes(le32(18));
    let h = i32::from_le_bytes(le32(22));
    let bytes_pp = u16::from_le_bytes([data[28], data[29]]) as usize / 8;
    if bytes_pp != 3 && bytes_pp != 4 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unsupported BMP depth: {} bits", bytes_pp * 8),
        ));
    }

    let width = w.unsigned_abs();
    let height = h.unsigned_abs();
    let stride = (width as usize * bytes_pp + 3) / 4 * 4;
    let mut buf = PixelBuffer::new(width, height);

    for y in 0..height as usize {
        let src_y = if h < 0 { y } else { height as usize - 1 - y };
        let row = pixel_offset + src_y * stride;
        for x in 0..width as usize {
            let si = row + x * bytes_pp;
            let Some(src) = data.get(si..si + bytes_pp) else {
                continue;
            };
            let alpha = if bytes_pp == 4 { src[3] } else { 255 };
            let di = (y * width as usize + x) * 4;
            buf.data[di..di + 4].copy_from_slice(&[src[2], src[1], src[0], alpha]);
        }
    }

    Ok(buf)
}

// ============================================================================
// Raw RGBA I/O
// ============================================================================

/// `[width:u32][height:u32][rgba...]`, little endian.
pub fn save_raw(path: &Path, buf: &PixelBuffer) -> io::Result<()> {
    let mut f = File::create(path)?;
    f.write_all(&buf.width.to_le_bytes())?;
    f.write_all(&buf.height.to_le_bytes())?;
    f.write_all(&buf.data)
}

pub fn load_raw(path: &Path) -> io::Result<PixelBuffer> {
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;

    if data.len() < 8 {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "raw file too small"));
    }
    let width = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let height = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
    let expected = (width * height * 4) as usize + 8;
    if data.len() < expected {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("raw file too small: expected {} bytes, got {}", expected, data.len()),
        ));
    }

    data.truncate(expected);
    data.drain(..8);
    Ok(PixelBuffer { width, height, data })
}

/// Load by extension: `.bmp`, `.raw` or `.rgba`.
pub fn load_image(path: &Path) -> io::Result<PixelBuffer> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("bmp") => load_bmp(path),
        Some("raw") | Some("rgba") => load_raw(path),
        _ => Err(unsupported(path)),
    }
}

/// Save by extension: `.bmp`, `.raw` or `.rgba`.
pub fn save_image(path: &Path, buf: &PixelBuffer) -> io::Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("bmp") => save_bmp(path, buf),
        Some("raw") | Some("rgba") => save_raw(path, buf),
        _ => Err(unsupported(path)),
    }
}

fn unsupported(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("unsupported image format: {}", path.display()),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use poly3d_rust::PixelFormat;

    fn filled(w: u32, h: u32, px: [u8; 4]) -> PixelBuffer {
        PixelBuffer {
            width: w,
            height: h,
            data: px.repeat((w * h) as usize),
        }
    }

    #[test]
    fn test_compare_identical() {
        let a = filled(4, 3, [1, 2, 3, 255]);
        let r = compare_buffers(&a, &a.clone()).unwrap();
        assert!(r.identical);
        assert_eq!(r.total_pixels, 12);
        assert!(r.first_diff.is_none());
    }

    #[test]
    fn test_compare_reports_first_diff() {
        let a = filled(4, 3, [10, 10, 10, 255]);
        let mut b = a.clone();
        let i = b.offset(2, 1);
        b.data[i] = 13;
        b.data[i + 2] = 4;
        let r = compare_buffers(&a, &b).unwrap();
        assert!(!r.identical);
        assert_eq!(r.different_pixels, 1);
        assert_eq!(r.max_channel_diff, 6);
        assert_eq!(r.mean_channel_diff, 4.5);
        let d = r.first_diff.unwrap();
        assert_eq!((d.x, d.y), (2, 1));
        assert_eq!(r.diff_histogram[3], 1);
        assert_eq!(r.diff_histogram[6], 1);
    }

    #[test]
    fn test_size_mismatch_is_error() {
        assert!(compare_buffers(&PixelBuffer::new(2, 2), &PixelBuffer::new(2, 3)).is_err());
    }

    #[test]
    fn test_sidebyside_layout() {
        let a = filled(2, 2, [200, 0, 0, 255]);
        let b = filled(2, 2, [200, 0, 0, 255]);
        let s = generate_sidebyside(&a, &b).unwrap();
        assert_eq!(s.width, 6);
        assert_eq!(s.pixel(0, 1), [200, 0, 0, 255]);
        assert_eq!(s.pixel(3, 1), [40, 40, 40, 255]);
        assert_eq!(s.pixel(5, 0), [200, 0, 0, 255]);
    }

    #[test]
    fn test_from_bitmap_unpacks_format() {
        let mut bmp = Bitmap::new(2, 1, PixelFormat::Rgb565).unwrap();
        bmp.put_pixel(1, 0, PixelFormat::Rgb565.makecol(255, 255, 255));
        let buf = PixelBuffer::from_bitmap(&bmp);
        assert_eq!(buf.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(buf.pixel(1, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_bmp_and_raw_files() {
        let dir = std::env::temp_dir();
        let mut buf = PixelBuffer::new(3, 2);
        buf.data.copy_from_slice(&[
            1, 2, 3, 255, 4, 5, 6, 255, 7, 8, 9, 255, //
            10, 11, 12, 255, 13, 14, 15, 255, 16, 17, 18, 255,
        ]);
        for name in ["pixel_compare_test.bmp", "pixel_compare_test.raw"] {
            let path = dir.join(format!("{}_{name}", std::process::id()));
            save_image(&path, &buf).unwrap();
            let back = load_image(&path).unwrap();
            let _ = std::fs::remove_file(&path);
            assert_eq!(back, buf, "{name}");
        }
        assert!(save_image(&dir.join("x.png"), &buf).is_err());
    }
}
