//! Lookup tables for 8-bit indexed rendering.
//!
//! [`ColorMap`] maps `(light level, palette index)` to a palette index and
//! drives the lit texture modes. [`RgbMap`] maps a 5-5-5 color to its
//! nearest palette index and drives RGB gouraud shading.

// ============================================================================
// Palette
// ============================================================================

/// A palette entry with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaletteColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PaletteColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    fn dist2(&self, r: i32, g: i32, b: i32) -> i32 {
        let dr = self.r as i32 - r;
        let dg = self.g as i32 - g;
        let db = self.b as i32 - b;
        dr * dr + dg * dg + db * db
    }
}

pub type Palette = [PaletteColor; 256];

/// Palette whose index is a 3-3-2 packed color.
pub fn palette_332() -> Palette {
    let mut pal = [PaletteColor::default(); 256];
    for (i, p) in pal.iter_mut().enumerate() {
        let r = (i >> 5) & 7;
        let g = (i >> 2) & 7;
        let b = i & 3;
        *p = PaletteColor::new((r * 255 / 7) as u8, (g * 255 / 7) as u8, (b * 255 / 3) as u8);
    }
    pal
}

fn nearest(pal: &Palette, r: i32, g: i32, b: i32) -> u8 {
    let mut best = 0usize;
    let mut best_d = i32::MAX;
    for (i, p) in pal.iter().enumerate() {
        let d = p.dist2(r, g, b);
        if d < best_d {
            best_d = d;
            best = i;
            if d == 0 {
                break;
            }
        }
    }
    best as u8
}

// ============================================================================
// RgbMap
// ============================================================================

/// 32x32x32 inverse palette.
#[derive(Clone)]
pub struct RgbMap {
    data: Vec<u8>,
}

impl RgbMap {
    pub fn from_palette(pal: &Palette) -> Self {
        let mut data = vec![0u8; 32 * 32 * 32];
        for (i, d) in data.iter_mut().enumerate() {
            let r = ((i >> 10) & 0x1F) as i32;
            let g = ((i >> 5) & 0x1F) as i32;
            let b = (i & 0x1F) as i32;
            *d = nearest(pal, r * 255 / 31, g * 255 / 31, b * 255 / 31);
        }
        Self { data }
    }

    /// Palette index for 8-bit channels.
    #[inline]
    pub fn lookup(&self, r: u32, g: u32, b: u32) -> u8 {
        self.data[(((r >> 3) << 10) | ((g >> 3) << 5) | (b >> 3)) as usize]
    }
}

impl core::fmt::Debug for RgbMap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RgbMap").finish_non_exhaustive()
    }
}

// ============================================================================
// ColorMap
// ============================================================================

/// 256x256 light table: `data[level][index]`.
#[derive(Clone)]
pub struct ColorMap {
    data: Vec<u8>,
}

impl ColorMap {
    /// Build from a function of `(level, index)`.
    pub fn from_fn(mut f: impl FnMut(u8, u8) -> u8) -> Self {
        let mut data = vec![0u8; 256 * 256];
        for level in 0..256usize {
            for index in 0..256usize {
                data[level * 256 + index] = f(level as u8, index as u8);
            }
        }
        Self { data }
    }

    /// Table where level 0 is the light color `(r, g, b)` and level 255
    /// is the unmodified palette color, with linear steps between.
    pub fn light_table(pal: &Palette, rgb_map: &RgbMap, r: u8, g: u8, b: u8) -> Self {
        Self::from_fn(|level, index| {
            let p = pal[index as usize];
            let n = level as i32;
            let mix = |target: u8, src: u8| {
                let t = target as i32;
                (t + (src as i32 - t) * n / 255) as u32
            };
            rgb_map.lookup(mix(r, p.r), mix(g, p.g), mix(b, p.b))
        })
    }

    /// Every level maps each index to itself.
    pub fn identity() -> Self {
        Self::from_fn(|_, index| index)
    }

    #[inline]
    pub fn lookup(&self, level: u8, index: u8) -> u8 {
        self.data[((level as usize) << 8) | index as usize]
    }
}

impl core::fmt::Debug for ColorMap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ColorMap").finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
