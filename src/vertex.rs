//! Screen-space vertices.
//!
//! [`V3d`] holds 16.16 fixed-point coordinates, [`V3dF`] holds `f32`
//! coordinates. Both carry a packed color `c` (palette index, 8-bit light
//! level, or `0xRRGGBB` depending on the polygon type) and texture
//! coordinates `u, v` in texels.
//!
//! The [`Vertex3d`] trait exposes exactly what the edge builder and the
//! triangle set-up need, so the scan converter is written once for both.

use crate::fixed::{fceil, fdiv, fixtoi, fmul, ftofix, Fixed};
use crate::error::OrSentinel;

// ============================================================================
// V3d / V3dF
// ============================================================================

/// Vertex with fixed-point coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct V3d {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub u: Fixed,
    pub v: Fixed,
    pub c: i32,
}

impl V3d {
    /// Vertex at integer screen coordinates with depth 1 and no texture.
    pub fn at(x: i32, y: i32, c: i32) -> Self {
        Self {
            x: Fixed::from_int(x),
            y: Fixed::from_int(y),
            z: Fixed::ONE,
            u: Fixed::ZERO,
            v: Fixed::ZERO,
            c,
        }
    }

    pub fn with_uv(mut self, u: Fixed, v: Fixed) -> Self {
        self.u = u;
        self.v = v;
        self
    }

    pub fn with_z(mut self, z: Fixed) -> Self {
        self.z = z;
        self
    }
}

/// Vertex with floating-point coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct V3dF {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub u: f32,
    pub v: f32,
    pub c: i32,
}

impl V3dF {
    /// Vertex at (x, y) with depth 1 and no texture.
    pub fn at(x: f32, y: f32, c: i32) -> Self {
        Self {
            x,
            y,
            z: 1.0,
            u: 0.0,
            v: 0.0,
            c,
        }
    }

    pub fn with_uv(mut self, u: f32, v: f32) -> Self {
        self.u = u;
        self.v = v;
        self
    }

    pub fn with_z(mut self, z: f32) -> Self {
        self.z = z;
        self
    }
}

impl From<V3dF> for V3d {
    fn from(v: V3dF) -> Self {
        Self {
            x: Fixed::from_f32(v.x),
            y: Fixed::from_f32(v.y),
            z: Fixed::from_f32(v.z),
            u: Fixed::from_f32(v.u),
            v: Fixed::from_f32(v.v),
            c: v.c,
        }
    }
}

impl From<V3d> for V3dF {
    fn from(v: V3d) -> Self {
        Self {
            x: v.x.to_f32(),
            y: v.y.to_f32(),
            z: v.z.to_f32(),
            u: v.u.to_f32(),
            v: v.v.to_f32(),
            c: v.c,
        }
    }
}

// ============================================================================
// Winding
// ============================================================================

/// Z component of the normal of the plane through three fixed-point
/// vertices: `(v2 - v1) x (v3 - v2)`. Negative means counterclockwise on
/// screen (y down).
pub fn polygon_z_normal(v1: &V3d, v2: &V3d, v3: &V3d) -> Fixed {
    Fixed(
        fmul((v2.x - v1.x).0, (v3.y - v2.y).0)
            .wrapping_sub(fmul((v3.x - v2.x).0, (v2.y - v1.y).0)),
    )
}

/// Floating-point version of [`polygon_z_normal`].
pub fn polygon_z_normal_f(v1: &V3dF, v2: &V3dF, v3: &V3dF) -> f32 {
    (v2.x - v1.x) * (v3.y - v2.y) - (v3.x - v2.x) * (v2.y - v1.y)
}

// ============================================================================
// Vertex3d
// ============================================================================

/// Vertex representation accepted by the scan converter.
///
/// Depth-related values are in real units: `recip_z` is `1/z`, and
/// `u_over_z` is the 16.16 texture coordinate divided by `z`, so dividing
/// it by the interpolated `recip_z` gives back a 16.16 coordinate.
pub trait Vertex3d: Copy {
    fn x_fixed(&self) -> i32;
    fn y_fixed(&self) -> i32;
    fn u_fixed(&self) -> i32;
    fn v_fixed(&self) -> i32;
    fn color(&self) -> i32;

    /// Key for sorting vertices top to bottom.
    fn y_key(&self) -> f64;

    fn recip_z(&self) -> f32;
    fn u_over_z(&self, recip_z: f32) -> f32;
    fn v_over_z(&self, recip_z: f32) -> f32;

    /// 16.16 height of the edge from `self` down to `lower`.
    fn height_to(&self, lower: &Self) -> i32;

    /// Reciprocal of the edge height in real units, used for the
    /// floating-point per-row deltas.
    fn recip_height_to(&self, lower: &Self, h: i32) -> f32;

    /// Per-row x step of the edge from `self` to `lower`.
    fn x_slope_to(&self, lower: &Self, h: i32, recip_h: f32) -> i32;

    /// Per-row (u, v) steps of the edge from `self` to `lower`.
    fn uv_slope_to(&self, lower: &Self, h: i32, recip_h: f32) -> (i32, i32);

    /// Winding test on the first three polygon vertices.
    fn polygon_is_ccw(v0: &Self, v1: &Self, v2: &Self) -> bool;

    /// Winding test on y-sorted triangle vertices with ceiled rows.
    fn triangle_is_ccw(vt1: &Self, vt2: &Self, vt3: &Self, rows: (i32, i32, i32)) -> bool;

    /// First scanline at or below the vertex.
    #[inline]
    fn row(&self) -> i32 {
        fceil(self.y_fixed())
    }
}

impl Vertex3d for V3d {
    #[inline]
    fn x_fixed(&self) -> i32 {
        self.x.0
    }

    #[inline]
    fn y_fixed(&self) -> i32 {
        self.y.0
    }

    #[inline]
    fn u_fixed(&self) -> i32 {
        self.u.0
    }

    #[inline]
    fn v_fixed(&self) -> i32 {
        self.v.0
    }

    #[inline]
    fn color(&self) -> i32 {
        self.c
    }

    fn y_key(&self) -> f64 {
        self.y.0 as f64
    }

    #[inline]
    fn recip_z(&self) -> f32 {
        65536.0 / self.z.0 as f32
    }

    #[inline]
    fn u_over_z(&self, recip_z: f32) -> f32 {
        self.u.0 as f32 * recip_z
    }

    #[inline]
    fn v_over_z(&self, recip_z: f32) -> f32 {
        self.v.0 as f32 * recip_z
    }

    #[inline]
    fn height_to(&self, lower: &Self) -> i32 {
        lower.y.0.wrapping_sub(self.y.0)
    }

    #[inline]
    fn recip_height_to(&self, _lower: &Self, h: i32) -> f32 {
        65536.0 / h as f32
    }

    #[inline]
    fn x_slope_to(&self, lower: &Self, h: i32, _recip_h: f32) -> i32 {
        fdiv(lower.x.0.wrapping_sub(self.x.0), h)
    }

    #[inline]
    fn uv_slope_to(&self, lower: &Self, h: i32, _recip_h: f32) -> (i32, i32) {
        (
            fdiv(lower.u.0.wrapping_sub(self.u.0), h),
            fdiv(lower.v.0.wrapping_sub(self.v.0), h),
        )
    }

    fn polygon_is_ccw(v0: &Self, v1: &Self, v2: &Self) -> bool {
        let test = fixtoi((v2.y - v1.y).0)
            .wrapping_mul(fixtoi((v1.x - v0.x).0))
            .wrapping_sub(fixtoi((v1.y - v0.y).0).wrapping_mul(fixtoi((v2.x - v1.x).0)));
        test < 0
    }

    fn triangle_is_ccw(vt1: &Self, vt2: &Self, vt3: &Self, rows: (i32, i32, i32)) -> bool {
        let (y1, y2, y3) = rows;
        let test = (y3 - y2)
            .wrapping_mul(fixtoi((vt2.x - vt1.x).0))
            .wrapping_sub((y2 - y1).wrapping_mul(fixtoi((vt3.x - vt2.x).0)));
        test < 0
    }
}

impl Vertex3d for V3dF {
    #[inline]
    fn x_fixed(&self) -> i32 {
        ftofix(self.x as f64).or_sentinel()
    }

    #[inline]
    fn y_fixed(&self) -> i32 {
        ftofix(self.y as f64).or_sentinel()
    }

    #[inline]
    fn u_fixed(&self) -> i32 {
        ftofix(self.u as f64).or_sentinel()
    }

    #[inline]
    fn v_fixed(&self) -> i32 {
        ftofix(self.v as f64).or_sentinel()
    }

    #[inline]
    fn color(&self) -> i32 {
        self.c
    }

    fn y_key(&self) -> f64 {
        self.y as f64
    }

    #[inline]
    fn recip_z(&self) -> f32 {
        1.0 / self.z
    }

    #[inline]
    fn u_over_z(&self, recip_z: f32) -> f32 {
        self.u * recip_z * 65536.0
    }

    #[inline]
    fn v_over_z(&self, recip_z: f32) -> f32 {
        self.v * recip_z * 65536.0
    }

    #[inline]
    fn height_to(&self, lower: &Self) -> i32 {
        ftofix((lower.y - self.y) as f64).or_sentinel()
    }

    #[inline]
    fn recip_height_to(&self, lower: &Self, _h: i32) -> f32 {
        1.0 / (lower.y - self.y)
    }

    #[inline]
    fn x_slope_to(&self, lower: &Self, _h: i32, recip_h: f32) -> i32 {
        ftofix(((lower.x - self.x) * recip_h) as f64).or_sentinel()
    }

    #[inline]
    fn uv_slope_to(&self, lower: &Self, _h: i32, recip_h: f32) -> (i32, i32) {
        (
            ftofix(((lower.u - self.u) * recip_h) as f64).or_sentinel(),
            ftofix(((lower.v - self.v) * recip_h) as f64).or_sentinel(),
        )
    }

    fn polygon_is_ccw(v0: &Self, v1: &Self, v2: &Self) -> bool {
        polygon_z_normal_f(v0, v1, v2) < 0.0
    }

    fn triangle_is_ccw(vt1: &Self, vt2: &Self, vt3: &Self, _rows: (i32, i32, i32)) -> bool {
        polygon_z_normal_f(vt1, vt2, vt3) < 0.0
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
    fn test_at() {
        let v = V3d::at(3, 4, 7);
        assert_eq!(v.x_fixed(), itofix(3));
        assert_eq!(v.y_fixed(), itofix(4));
        assert_eq!(v.color(), 7);
        assert_eq!(v.row(), 4);
        assert_eq!(V3dF::at(3.0, 4.5, 0).row(), 5);
    }

    #[test]
    fn test_conversion() {
        let f = V3dF::at(1.5, -2.25, 9).with_uv(4.0, 8.0).with_z(2.0);
        let v: V3d = f.into();
        assert_eq!(v.x, Fixed::from_f64(1.5));
        assert_eq!(v.y, Fixed::from_f64(-2.25));
        assert_eq!(v.z, Fixed::from_int(2));
        assert_eq!(V3dF::from(v), f);
    }

    #[test]
    fn test_z_normal_sign() {
        // Clockwise on screen (y down): positive.
        let a = V3dF::at(0.0, 0.0, 0);
        let b = V3dF::at(10.0, 0.0, 0);
        let c = V3dF::at(0.0, 10.0, 0);
        assert!(polygon_z_normal_f(&a, &b, &c) > 0.0);
        assert!(polygon_z_normal_f(&a, &c, &b) < 0.0);

        let fa = V3d::from(a);
        let fb = V3d::from(b);
        let fc = V3d::from(c);
        assert_eq!(polygon_z_normal(&fa, &fb, &fc), Fixed::from_int(100));
        assert!(V3d::polygon_is_ccw(&fa, &fc, &fb));
        assert!(!V3d::polygon_is_ccw(&fa, &fb, &fc));
        assert!(V3dF::polygon_is_ccw(&a, &c, &b));
    }

    #[test]
    fn test_recip_depth_units_agree() {
        let f = V3dF::at(0.0, 0.0, 0).with_uv(3.0, 5.0).with_z(4.0);
        let x = V3d::from(f);
        assert!((f.recip_z() - 0.25).abs() < 1e-6);
        assert!((x.recip_z() - 0.25).abs() < 1e-6);
        let rz = f.recip_z();
        assert!((f.u_over_z(rz) - x.u_over_z(rz)).abs() < 1.0);
        assert!((f.v_over_z(rz) - 5.0 * 65536.0 / 4.0).abs() < 1.0);
    }

    #[test]
    fn test_slopes() {
        let a = V3d::at(0, 0, 0).with_uv(Fixed::ZERO, Fixed::from_int(8));
        let b = V3d::at(4, 8, 0).with_uv(Fixed::from_int(16), Fixed::ZERO);
        let h = a.height_to(&b);
        assert_eq!(h, itofix(8));
        assert_eq!(a.x_slope_to(&b, h, 0.0), 0x8000);
        assert_eq!(a.uv_slope_to(&b, h, 0.0), (itofix(2), itofix(-1)));

        let fa = V3dF::from(a);
        let fb = V3dF::from(b);
        let fh = fa.height_to(&fb);
        let rh = fa.recip_height_to(&fb, fh);
        assert_eq!(fa.x_slope_to(&fb, fh, rh), 0x8000);
        assert_eq!(fa.uv_slope_to(&fb, fh, rh), (itofix(2), itofix(-1)));
    }
}
