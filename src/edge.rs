//! Polygon edges.
//!
//! An edge covers the scanlines `top..=bottom` between two vertices. `x`
//! is the 16.16 crossing of the current scanline and `dx` the per-row
//! step; `dat` holds the interpolated attributes with per-row deltas.
//!
//! Depth and perspective texture coordinates are stored as `1/z`, `u/z`
//! and `v/z`, which vary linearly in screen space.

use crate::fixed::{fceil, fdiv, fixtof, fmul, itofix};
use crate::pixfmt::PixelFormat;
use crate::poly_type::InterpFlags;
use crate::render_state::ScanParams;
use crate::segment::PolygonSegment;
use crate::vertex::Vertex3d;

/// Sentinel link for edges outside any ring.
pub const NO_EDGE: usize = usize::MAX;

// ============================================================================
// PolygonEdge
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonEdge {
    /// First scanline, inclusive.
    pub top: i32,
    /// Last scanline, inclusive.
    pub bottom: i32,
    pub x: i32,
    pub dx: i32,
    pub dat: PolygonSegment,
    /// Ring links, as indices into the owning edge table.
    pub prev: usize,
    pub next: usize,
}

impl Default for PolygonEdge {
    fn default() -> Self {
        Self {
            top: 0,
            bottom: -1,
            x: 0,
            dx: 0,
            dat: PolygonSegment::default(),
            prev: NO_EDGE,
            next: NO_EDGE,
        }
    }
}

impl PolygonEdge {
    /// Build the edge between `a` and `b`, in either order, clipped to the
    /// vertical clip range. The result may have `bottom < top`, in which
    /// case it covers no scanline.
    pub(crate) fn build<V: Vertex3d>(a: &V, b: &V, p: &ScanParams) -> Self {
        let (v1, v2) = if b.y_key() < a.y_key() { (b, a) } else { (a, b) };

        let y1 = v1.y_fixed();
        let mut e = PolygonEdge {
            top: fceil(y1),
            bottom: fceil(v2.y_fixed()) - 1,
            ..Default::default()
        };

        let h = v1.height_to(v2);
        let step = itofix(e.top).wrapping_sub(y1);
        let recip_h = v1.recip_height_to(v2, h);

        e.dx = v1.x_slope_to(v2, h, recip_h);
        e.x = v1.x_fixed();
        if p.subpixel {
            e.x = e.x.wrapping_add(fmul(step, e.dx));
        }

        if p.has(InterpFlags::FLAT) {
            e.clip_vertical(p);
            return e;
        }

        let d = &mut e.dat;

        if p.has(InterpFlags::COL1) {
            let (c1, c2) = (v1.color(), v2.color());
            d.dc = fdiv(itofix(c2.wrapping_sub(c1)), h);
            d.c = itofix(c1);
            if p.subpixel {
                d.c = d.c.wrapping_add(fmul(step, d.dc));
            }
        }

        if p.has(InterpFlags::COL3) {
            let (r1, g1, b1) = vertex_rgb(v1.color(), p.flags, p.format);
            let (r2, g2, b2) = vertex_rgb(v2.color(), p.flags, p.format);
            d.dr = fdiv(itofix(r2 - r1), h);
            d.dg = fdiv(itofix(g2 - g1), h);
            d.db = fdiv(itofix(b2 - b1), h);
            d.r = itofix(r1);
            d.g = itofix(g1);
            d.b = itofix(b1);
            if p.subpixel {
                d.r = d.r.wrapping_add(fmul(step, d.dr));
                d.g = d.g.wrapping_add(fmul(step, d.dg));
                d.b = d.b.wrapping_add(fmul(step, d.db));
            }
        }

        if p.has(InterpFlags::FIX_UV) {
            let (du, dv) = v1.uv_slope_to(v2, h, recip_h);
            d.du = du;
            d.dv = dv;
            d.u = v1.u_fixed();
            d.v = v1.v_fixed();
            if p.subpixel {
                d.u = d.u.wrapping_add(fmul(step, d.du));
                d.v = d.v.wrapping_add(fmul(step, d.dv));
            }
        }

        if p.has(InterpFlags::Z) {
            let step_f = fixtof(step) as f32;
            let z1 = v1.recip_z();
            let z2 = v2.recip_z();

            d.dz = (z2 - z1) * recip_h;
            d.z = if p.subpixel { z1 + d.dz * step_f } else { z1 };

            if p.has(InterpFlags::FLOAT_UV) {
                let fu1 = v1.u_over_z(z1);
                let fv1 = v1.v_over_z(z1);
                let fu2 = v2.u_over_z(z2);
                let fv2 = v2.v_over_z(z2);

                d.dfu = (fu2 - fu1) * recip_h;
                d.dfv = (fv2 - fv1) * recip_h;
                d.fu = fu1;
                d.fv = fv1;
                if p.subpixel {
                    d.fu += d.dfu * step_f;
                    d.fv += d.dfv * step_f;
                }
            }
        }

        e.clip_vertical(p);
        e
    }

    /// Skip rows above the clip top and stop at the clip bottom.
    fn clip_vertical(&mut self, p: &ScanParams) {
        let ct = p.clip.y1;
        let cb = p.clip.y2;

        if self.top < ct {
            let gap = ct - self.top;
            self.top = ct;
            self.x = self.x.wrapping_add(gap.wrapping_mul(self.dx));
            if !p.has(InterpFlags::FLAT) {
                self.dat.clip(gap, p.flags);
            }
        }

        if self.bottom >= cb {
            self.bottom = cb - 1;
        }
    }

    /// `true` if the edge covers at least one scanline.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.bottom >= self.top
    }

    /// Move `x` to the next scanline.
    #[inline]
    pub fn advance_x(&mut self) {
        self.x = self.x.wrapping_add(self.dx);
    }
}

/// 8-bit channels of a vertex color. Packed target colors are unpacked
/// when `COLOR_TO_RGB` is set, otherwise the color is `0xRRGGBB`.
#[inline]
pub(crate) fn vertex_rgb(c: i32, flags: InterpFlags, format: PixelFormat) -> (i32, i32, i32) {
    if flags.contains(InterpFlags::COLOR_TO_RGB) {
        let (r, g, b) = format.unpack(c as u32);
        (r as i32, g as i32, b as i32)
    } else {
        ((c >> 16) & 0xFF, (c >> 8) & 0xFF, c & 0xFF)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::RectI;
    use crate::fixed::Fixed;
    use crate::vertex::{V3d, V3dF};

    fn params(flags: InterpFlags) -> ScanParams {
        ScanParams {
            flags,
            clip: RectI::new(0, 0, 100, 100),
            format: PixelFormat::Argb8888,
            subpixel: true,
        }
    }

    #[test]
    fn test_integer_edge() {
        let a = V3d::at(0, 0, 0);
        let b = V3d::at(4, 8, 0);
        let e = PolygonEdge::build(&a, &b, &params(InterpFlags::FLAT));
        assert_eq!(e.top, 0);
        assert_eq!(e.bottom, 7);
        assert_eq!(e.dx, 0x8000);
        assert_eq!(e.x, 0);
        assert_eq!(e.prev, NO_EDGE);
    }

    #[test]
    fn test_vertex_order_irrelevant() {
        let a = V3d::at(1, 2, 0);
        let b = V3d::at(9, 6, 0);
        let p = params(InterpFlags::FLAT);
        assert_eq!(PolygonEdge::build(&a, &b, &p), PolygonEdge::build(&b, &a, &p));
    }

    #[test]
    fn test_subpixel_start() {
        let a = V3dF::at(0.0, 0.5, 0);
        let b = V3dF::at(4.0, 4.5, 0);
        let e = PolygonEdge::build(&a, &b, &params(InterpFlags::FLAT));
        assert_eq!(e.top, 1);
        assert_eq!(e.bottom, 4);
        assert_eq!(e.dx, 0x10000);
        assert_eq!(e.x, 0x8000);

        let mut p = params(InterpFlags::FLAT);
        p.subpixel = false;
        assert_eq!(PolygonEdge::build(&a, &b, &p).x, 0);
    }

    #[test]
    fn test_clip_top_bottom() {
        let a = V3d::at(0, 0, 0);
        let mut p = params(InterpFlags::COL1);
        p.clip = RectI::new(0, 3, 100, 6);
        let e = PolygonEdge::build(&a, &V3d::at(10, 10, 100), &p);
        assert_eq!(e.top, 3);
        assert_eq!(e.bottom, 5);
        assert_eq!(e.x, itofix(3));
        assert_eq!(e.dat.c, itofix(30));
    }

    #[test]
    fn test_fully_clipped_edge_invisible() {
        let a = V3d::at(0, 0, 0);
        let b = V3d::at(0, 5, 0);
        let mut p = params(InterpFlags::FLAT);
        p.clip = RectI::new(0, 20, 100, 30);
        assert!(!PolygonEdge::build(&a, &b, &p).is_visible());
    }

    #[test]
    fn test_rgb_deltas() {
        let a = V3d::at(0, 0, 0x000000);
        let b = V3d::at(0, 4, 0xFF4000);
        let e = PolygonEdge::build(&a, &b, &params(InterpFlags::COL3));
        assert_eq!(e.dat.r, 0);
        assert_eq!(e.dat.dr, fdiv(itofix(255), itofix(4)));
        assert_eq!(e.dat.dg, itofix(16));
        assert_eq!(e.dat.db, 0);
    }

    #[test]
    fn test_color_to_rgb_unpacks_target_format() {
        let mut p = params(InterpFlags::COL3 | InterpFlags::COLOR_TO_RGB);
        p.format = PixelFormat::Rgb565;
        let a = V3d::at(0, 0, 0);
        let b = V3d::at(0, 1, 0xF800);
        let e = PolygonEdge::build(&a, &b, &p);
        assert_eq!(e.dat.dr, itofix(255));
        assert_eq!(e.dat.dg, 0);
    }

    #[test]
    fn test_perspective_state_fixed_and_float_agree() {
        let flags = InterpFlags::Z | InterpFlags::FLOAT_UV;
        let fa = V3dF::at(0.0, 0.0, 0).with_z(2.0).with_uv(0.0, 0.0);
        let fb = V3dF::at(0.0, 8.0, 0).with_z(4.0).with_uv(16.0, 8.0);
        let ef = PolygonEdge::build(&fa, &fb, &params(flags));
        let ex = PolygonEdge::build(&V3d::from(fa), &V3d::from(fb), &params(flags));
        assert!((ef.dat.z - 0.5).abs() < 1e-6);
        assert!((ef.dat.dz - ex.dat.dz).abs() < 1e-6);
        assert!((ef.dat.dfu - ex.dat.dfu).abs() < 1e-2);
        // u/z at the far end: 16 * 65536 / 4.
        let end_fu = ef.dat.fu + ef.dat.dfu * 8.0;
        assert!((end_fu - 262144.0).abs() < 1.0);
    }

    #[test]
    fn test_affine_uv() {
        let a = V3d::at(0, 0, 0).with_uv(Fixed::ZERO, Fixed::ZERO);
        let b = V3d::at(0, 4, 0).with_uv(Fixed::from_int(8), Fixed::from_int(-4));
        let e = PolygonEdge::build(&a, &b, &params(InterpFlags::FIX_UV));
        assert_eq!(e.dat.du, itofix(2));
        assert_eq!(e.dat.dv, itofix(-1));
    }
}
