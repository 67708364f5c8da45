//! Scanline fillers.
//!
//! A filler writes `w` pixels at the start of `dst` from the per-pixel
//! interpolation state of a span. Fillers are monomorphized over the pixel
//! layout ([`PixelOps`]) and, for textured modes, over masking and
//! lighting, then registered as plain function pointers.
//!
//! Lighting on truecolor targets blends each channel toward the light
//! color: `y + (((x - y) * n) >> 8)` with `x` the texel, `y` the light
//! color and `n` the intensity clamped to `0..=255`. On 8-bit targets the
//! [`ColorMap`] is indexed by intensity and texel.

use crate::color_map::{ColorMap, RgbMap};
use crate::pixfmt::{PixelFormat, PixelOps, Pix8};
use crate::segment::PolygonSegment;
use crate::texture::TextureMasks;

/// Filler entry point: destination row from the first pixel, span width,
/// per-pixel state, shared context.
pub type ScanlineFiller = for<'a> fn(&mut [u8], i32, &PolygonSegment, &SpanContext<'a>);

// ============================================================================
// SpanContext
// ============================================================================

/// Read-only data shared by every span of a draw call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpanContext<'a> {
    /// Texture pixels, tightly packed in the target format. Empty for
    /// untextured modes.
    pub texture: &'a [u8],
    pub masks: TextureMasks,
    /// Blend target of truecolor lighting, in the target format.
    pub light_color: u32,
    pub color_map: Option<&'a ColorMap>,
    pub rgb_map: Option<&'a RgbMap>,
}

impl<'a> SpanContext<'a> {
    #[inline]
    fn texel<P: PixelOps>(&self, u: i32, v: i32) -> u32 {
        P::read(&self.texture[self.masks.index(u, v) * P::BPP..])
    }
}

// ============================================================================
// Shading helpers
// ============================================================================

#[inline]
fn channel(x: i32) -> u32 {
    (x >> 16).clamp(0, 255) as u32
}

/// Blend `x` toward `y` by `n / 256`.
#[inline]
pub(crate) fn blend<P: PixelOps>(x: u32, y: u32, n: i32) -> u32 {
    let (xr, xg, xb) = P::unpack(x);
    let (yr, yg, yb) = P::unpack(y);
    let mix = |a: u32, b: u32| (b as i32 + (((a as i32 - b as i32) * n) >> 8)) as u32;
    P::pack(mix(xr, yr), mix(xg, yg), mix(xb, yb))
}

/// Apply the intensity `c` (16.16) to a texel.
#[inline]
pub(crate) fn light<P: PixelOps>(texel: u32, c: i32, ctx: &SpanContext<'_>) -> u32 {
    let n = (c >> 16).clamp(0, 255);
    if P::FORMAT == PixelFormat::Indexed8 {
        match ctx.color_map {
            Some(map) => map.lookup(n as u8, texel as u8) as u32,
            None => texel,
        }
    } else {
        blend::<P>(texel, ctx.light_color, n)
    }
}

/// Write one textured pixel, honoring the mask and lighting options.
#[inline]
pub(crate) fn put_texel<P: PixelOps, const MASKED: bool, const LIT: bool>(
    px: &mut [u8],
    texel: u32,
    c: i32,
    ctx: &SpanContext<'_>,
) {
    if MASKED && texel == P::MASK {
        return;
    }
    let color = if LIT { light::<P>(texel, c, ctx) } else { texel };
    P::write(px, color);
}

// ============================================================================
// Fillers
// ============================================================================

/// Filler for modes drawn with horizontal lines. Never called.
pub fn fill_dummy(_dst: &mut [u8], _w: i32, _info: &PolygonSegment, _ctx: &SpanContext<'_>) {}

/// Single-channel gouraud on an 8-bit target: the intensity is the
/// palette index.
pub fn gcol8(dst: &mut [u8], w: i32, info: &PolygonSegment, _ctx: &SpanContext<'_>) {
    let mut c = info.c;
    for px in dst.iter_mut().take(w.max(0) as usize) {
        *px = (c >> 16) as u8;
        c = c.wrapping_add(info.dc);
    }
}

/// RGB gouraud on an 8-bit target through the inverse palette.
pub fn grgb8(dst: &mut [u8], w: i32, info: &PolygonSegment, ctx: &SpanContext<'_>) {
    let (mut r, mut g, mut b) = (info.r, info.g, info.b);
    for px in dst.iter_mut().take(w.max(0) as usize) {
        let (cr, cg, cb) = (channel(r), channel(g), channel(b));
        *px = match ctx.rgb_map {
            Some(map) => map.lookup(cr, cg, cb),
            None => Pix8::pack(cr, cg, cb) as u8,
        };
        r = r.wrapping_add(info.dr);
        g = g.wrapping_add(info.dg);
        b = b.wrapping_add(info.db);
    }
}

/// RGB gouraud on a truecolor target.
pub fn grgb<P: PixelOps>(dst: &mut [u8], w: i32, info: &PolygonSegment, _ctx: &SpanContext<'_>) {
    let (mut r, mut g, mut b) = (info.r, info.g, info.b);
    for px in dst.chunks_exact_mut(P::BPP).take(w.max(0) as usize) {
        P::write(px, P::pack(channel(r), channel(g), channel(b)));
        r = r.wrapping_add(info.dr);
        g = g.wrapping_add(info.dg);
        b = b.wrapping_add(info.db);
    }
}

/// Affine texture mapping.
pub fn atex<P: PixelOps, const MASKED: bool, const LIT: bool>(
    dst: &mut [u8],
    w: i32,
    info: &PolygonSegment,
    ctx: &SpanContext<'_>,
) {
    let (mut u, mut v, mut c) = (info.u, info.v, info.c);
    for px in dst.chunks_exact_mut(P::BPP).take(w.max(0) as usize) {
        put_texel::<P, MASKED, LIT>(px, ctx.texel::<P>(u, v), c, ctx);
        u = u.wrapping_add(info.du);
        v = v.wrapping_add(info.dv);
        if LIT {
            c = c.wrapping_add(info.dc);
        }
    }
}

/// Perspective-correct texture mapping, one division per pixel.
pub fn ptex<P: PixelOps, const MASKED: bool, const LIT: bool>(
    dst: &mut [u8],
    w: i32,
    info: &PolygonSegment,
    ctx: &SpanContext<'_>,
) {
    let (mut fu, mut fv, mut z) = (info.fu, info.fv, info.z);
    let mut c = info.c;
    for px in dst.chunks_exact_mut(P::BPP).take(w.max(0) as usize) {
        let u = (fu / z) as i32;
        let v = (fv / z) as i32;
        put_texel::<P, MASKED, LIT>(px, ctx.texel::<P>(u, v), c, ctx);
        fu += info.dfu;
        fv += info.dfv;
        z += info.dz;
        if LIT {
            c = c.wrapping_add(info.dc);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::itofix;
    use crate::pixfmt::{Pix16, Pix24, Pix32};

    fn checker_2x2() -> Vec<u8> {
        // 0x112233 0x445566 / 0xFF00FF 0x778899
        let mut tex = Vec::new();
        for c in [0x112233u32, 0x445566, 0xFF00FF, 0x778899] {
            tex.extend_from_slice(&c.to_le_bytes());
        }
        tex
    }

    fn read32(dst: &[u8], i: usize) -> u32 {
        Pix32::read(&dst[i * 4..])
    }

    #[test]
    fn test_gcol8_ramp() {
        let info = PolygonSegment {
            c: itofix(10),
            dc: itofix(2),
            ..Default::default()
        };
        let mut dst = [0u8; 5];
        gcol8(&mut dst, 4, &info, &SpanContext::default());
        assert_eq!(dst, [10, 12, 14, 16, 0]);
    }

    #[test]
    fn test_grgb32_ramp_and_clamp() {
        let info = PolygonSegment {
            r: itofix(250),
            dr: itofix(4),
            g: itofix(1),
            dg: -itofix(1),
            ..Default::default()
        };
        let mut dst = [0u8; 12];
        grgb::<Pix32>(&mut dst, 3, &info, &SpanContext::default());
        assert_eq!(read32(&dst, 0), 0xFA0100);
        assert_eq!(read32(&dst, 1), 0xFE0000);
        assert_eq!(read32(&dst, 2), 0xFF0000);
    }

    #[test]
    fn test_grgb8_uses_332_without_map() {
        let info = PolygonSegment {
            r: itofix(255),
            g: itofix(255),
            b: itofix(255),
            ..Default::default()
        };
        let mut dst = [0u8; 2];
        grgb8(&mut dst, 2, &info, &SpanContext::default());
        assert_eq!(dst, [0xFF, 0xFF]);
    }

    #[test]
    fn test_grgb16_packs() {
        let info = PolygonSegment {
            r: itofix(255),
            ..Default::default()
        };
        let mut dst = [0u8; 2];
        grgb::<Pix16>(&mut dst, 1, &info, &SpanContext::default());
        assert_eq!(Pix16::read(&dst), 0xF800);
    }

    #[test]
    fn test_atex_wraps_and_masks() {
        let tex = checker_2x2();
        let ctx = SpanContext {
            texture: &tex,
            masks: TextureMasks::new(2, 2),
            ..Default::default()
        };
        let info = PolygonSegment {
            u: 0,
            v: 0,
            du: itofix(1),
            ..Default::default()
        };
        let mut dst = [0u8; 12];
        atex::<Pix32, false, false>(&mut dst, 3, &info, &ctx);
        assert_eq!(read32(&dst, 0), 0x112233);
        assert_eq!(read32(&dst, 1), 0x445566);
        assert_eq!(read32(&dst, 2), 0x112233);

        let row1 = PolygonSegment {
            v: itofix(1),
            ..info
        };
        let mut dst = [0xAAu8; 8];
        atex::<Pix32, true, false>(&mut dst, 2, &row1, &ctx);
        assert_eq!(read32(&dst, 0), 0xAAAAAAAA);
        assert_eq!(read32(&dst, 1), 0x778899);
    }

    #[test]
    fn test_lit_blend_ends() {
        let tex = checker_2x2();
        let ctx = SpanContext {
            texture: &tex,
            masks: TextureMasks::new(2, 2),
            light_color: 0x000000,
            ..Default::default()
        };
        let dark = PolygonSegment::default();
        let mut dst = [0u8; 4];
        atex::<Pix32, false, true>(&mut dst, 1, &dark, &ctx);
        assert_eq!(read32(&dst, 0), 0);

        let full = PolygonSegment {
            c: itofix(256),
            ..Default::default()
        };
        atex::<Pix32, false, true>(&mut dst, 1, &full, &ctx);
        // n clamps to 255, just short of the texel.
        assert_eq!(read32(&dst, 0), 0x102132);
    }

    #[test]
    fn test_lit8_uses_color_map() {
        let tex = [7u8, 7, 7, 7];
        let map = ColorMap::from_fn(|level, index| level.wrapping_add(index));
        let ctx = SpanContext {
            texture: &tex,
            masks: TextureMasks::new(2, 2),
            color_map: Some(&map),
            ..Default::default()
        };
        let info = PolygonSegment {
            c: itofix(3),
            ..Default::default()
        };
        let mut dst = [0u8; 1];
        atex::<Pix8, false, true>(&mut dst, 1, &info, &ctx);
        assert_eq!(dst[0], 10);
    }

    #[test]
    fn test_ptex_matches_atex_at_unit_depth() {
        let mut tex = Vec::new();
        for i in 0..16u32 {
            tex.extend_from_slice(&Pix24::pack(i * 10, i, 0).to_le_bytes()[..3]);
        }
        let ctx = SpanContext {
            texture: &tex,
            masks: TextureMasks::new(4, 4),
            ..Default::default()
        };
        let info = PolygonSegment {
            u: itofix(1),
            v: itofix(2),
            du: 0x8000,
            dv: 0x4000,
            z: 1.0,
            fu: itofix(1) as f32,
            fv: itofix(2) as f32,
            dfu: 32768.0,
            dfv: 16384.0,
            ..Default::default()
        };
        let mut a = [0u8; 18];
        let mut p = [0u8; 18];
        atex::<Pix24, false, false>(&mut a, 6, &info, &ctx);
        ptex::<Pix24, false, false>(&mut p, 6, &info, &ctx);
        assert_eq!(a, p);
    }
}
