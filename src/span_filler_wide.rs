//! Four-pixel fillers for truecolor targets.
//!
//! These produce exactly the pixels of their counterparts in
//! [`span_filler`](crate::span_filler) but compute four lanes of the
//! interpolants per iteration, which lets the compiler vectorize the
//! channel arithmetic. The last `w % 4` pixels go through the scalar loop.

use crate::pixfmt::PixelOps;
use crate::segment::PolygonSegment;
use crate::span_filler::{put_texel, SpanContext};

const LANES: usize = 4;

#[inline]
fn lanes(start: i32, delta: i32) -> [i32; LANES] {
    [
        start,
        start.wrapping_add(delta),
        start.wrapping_add(delta.wrapping_mul(2)),
        start.wrapping_add(delta.wrapping_mul(3)),
    ]
}

#[inline]
fn channel(x: i32) -> u32 {
    (x >> 16).clamp(0, 255) as u32
}

/// RGB gouraud, four pixels per step.
pub fn grgb_x4<P: PixelOps>(dst: &mut [u8], w: i32, info: &PolygonSegment, _ctx: &SpanContext<'_>) {
    let w = w.max(0) as usize;
    let span = &mut dst[..w * P::BPP];
    let (mut r, mut g, mut b) = (info.r, info.g, info.b);
    let step = LANES as i32;

    let mut chunks = span.chunks_exact_mut(LANES * P::BPP);
    for chunk in &mut chunks {
        let (rs, gs, bs) = (lanes(r, info.dr), lanes(g, info.dg), lanes(b, info.db));
        for (k, px) in chunk.chunks_exact_mut(P::BPP).enumerate() {
            P::write(px, P::pack(channel(rs[k]), channel(gs[k]), channel(bs[k])));
        }
        r = r.wrapping_add(info.dr.wrapping_mul(step));
        g = g.wrapping_add(info.dg.wrapping_mul(step));
        b = b.wrapping_add(info.db.wrapping_mul(step));
    }

    for px in chunks.into_remainder().chunks_exact_mut(P::BPP) {
        P::write(px, P::pack(channel(r), channel(g), channel(b)));
        r = r.wrapping_add(info.dr);
        g = g.wrapping_add(info.dg);
        b = b.wrapping_add(info.db);
    }
}

/// Lit affine texture mapping, four pixels per step.
pub fn atex_lit_x4<P: PixelOps, const MASKED: bool>(
    dst: &mut [u8],
    w: i32,
    info: &PolygonSegment,
    ctx: &SpanContext<'_>,
) {
    let w = w.max(0) as usize;
    let span = &mut dst[..w * P::BPP];
    let (mut u, mut v, mut c) = (info.u, info.v, info.c);
    let step = LANES as i32;

    let fetch = |u: i32, v: i32| P::read(&ctx.texture[ctx.masks.index(u, v) * P::BPP..]);

    let mut chunks = span.chunks_exact_mut(LANES * P::BPP);
    for chunk in &mut chunks {
        let (us, vs, cs) = (lanes(u, info.du), lanes(v, info.dv), lanes(c, info.dc));
        let texels = [
            fetch(us[0], vs[0]),
            fetch(us[1], vs[1]),
            fetch(us[2], vs[2]),
            fetch(us[3], vs[3]),
        ];
        for (k, px) in chunk.chunks_exact_mut(P::BPP).enumerate() {
            put_texel::<P, MASKED, true>(px, texels[k], cs[k], ctx);
        }
        u = u.wrapping_add(info.du.wrapping_mul(step));
        v = v.wrapping_add(info.dv.wrapping_mul(step));
        c = c.wrapping_add(info.dc.wrapping_mul(step));
    }

    for px in chunks.into_remainder().chunks_exact_mut(P::BPP) {
        put_texel::<P, MASKED, true>(px, fetch(u, v), c, ctx);
        u = u.wrapping_add(info.du);
        v = v.wrapping_add(info.dv);
        c = c.wrapping_add(info.dc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::itofix;
    use crate::pixfmt::{Pix15, Pix24, Pix32};
    use crate::span_filler::{atex, grgb};
    use crate::texture::TextureMasks;

    fn ramp() -> PolygonSegment {
        PolygonSegment {
            r: itofix(3),
            dr: 0x1_2345,
            g: itofix(200),
            dg: -0x2_8000,
            b: 0,
            db: 0x7FFF,
            u: 0x8000,
            du: 0x1_4000,
            v: itofix(1),
            dv: 0x6000,
            c: itofix(40),
            dc: 0x3_3333,
            ..Default::default()
        }
    }

    fn texture(bpp: usize) -> Vec<u8> {
        (0..8 * 8 * bpp).map(|i| (i * 37 % 251) as u8).collect()
    }

    #[test]
    fn test_grgb_x4_matches_scalar() {
        let info = ramp();
        for w in [0, 1, 3, 4, 7, 13] {
            let mut a = vec![0u8; 16 * 4];
            let mut b = vec![0u8; 16 * 4];
            grgb::<Pix32>(&mut a, w, &info, &SpanContext::default());
            grgb_x4::<Pix32>(&mut b, w, &info, &SpanContext::default());
            assert_eq!(a, b, "w = {w}");
        }
    }

    #[test]
    fn test_atex_lit_x4_matches_scalar() {
        let tex = texture(3);
        let ctx = SpanContext {
            texture: &tex,
            masks: TextureMasks::new(8, 8),
            light_color: 0x102030,
            ..Default::default()
        };
        let info = ramp();
        for w in [1, 4, 6, 11] {
            let mut a = vec![0u8; 16 * 3];
            let mut b = vec![0u8; 16 * 3];
            atex::<Pix24, false, true>(&mut a, w, &info, &ctx);
            atex_lit_x4::<Pix24, false>(&mut b, w, &info, &ctx);
            assert_eq!(a, b, "w = {w}");
        }
    }

    #[test]
    fn test_masked_x4_matches_scalar_15() {
        let mut tex = texture(2);
        // Plant mask pixels.
        for i in (0..tex.len()).step_by(6) {
            tex[i] = 0x1F;
            tex[i + 1] = 0x7C;
        }
        let ctx = SpanContext {
            texture: &tex,
            masks: TextureMasks::new(8, 8),
            ..Default::default()
        };
        let info = ramp();
        let mut a = vec![0x55u8; 16 * 2];
        let mut b = a.clone();
        atex::<Pix15, true, true>(&mut a, 9, &info, &ctx);
        atex_lit_x4::<Pix15, true>(&mut b, 9, &info, &ctx);
        assert_eq!(a, b);
    }
}
