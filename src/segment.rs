//! Interpolation state.
//!
//! A [`PolygonSegment`] holds the current value and the per-step delta of
//! every interpolated attribute. Edges keep one whose deltas are per
//! scanline; the span set-up fills a second whose deltas are per pixel.
//! Only the attributes named by the active [`InterpFlags`] are meaningful.

use crate::fixed::fmul;
use crate::poly_type::InterpFlags;

// ============================================================================
// PolygonSegment
// ============================================================================

/// Attribute values and deltas for one edge or one span.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolygonSegment {
    /// Affine texture coordinates, 16.16.
    pub u: i32,
    pub v: i32,
    pub du: i32,
    pub dv: i32,
    /// Single intensity, 16.16.
    pub c: i32,
    pub dc: i32,
    /// RGB channels, 16.16.
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub dr: i32,
    pub dg: i32,
    pub db: i32,
    /// Reciprocal depth.
    pub z: f32,
    pub dz: f32,
    /// Texture coordinates over depth.
    pub fu: f32,
    pub fv: f32,
    pub dfu: f32,
    pub dfv: f32,
}

impl PolygonSegment {
    /// Skip `gap` whole steps.
    pub fn clip(&mut self, gap: i32, flags: InterpFlags) {
        if flags.contains(InterpFlags::COL1) {
            self.c = self.c.wrapping_add(self.dc.wrapping_mul(gap));
        }

        if flags.contains(InterpFlags::COL3) {
            self.r = self.r.wrapping_add(self.dr.wrapping_mul(gap));
            self.g = self.g.wrapping_add(self.dg.wrapping_mul(gap));
            self.b = self.b.wrapping_add(self.db.wrapping_mul(gap));
        }

        if flags.contains(InterpFlags::FIX_UV) {
            self.u = self.u.wrapping_add(self.du.wrapping_mul(gap));
            self.v = self.v.wrapping_add(self.dv.wrapping_mul(gap));
        }

        if flags.contains(InterpFlags::Z) {
            let gap_f = gap as f32;
            self.z += self.dz * gap_f;

            if flags.contains(InterpFlags::FLOAT_UV) {
                self.fu += self.dfu * gap_f;
                self.fv += self.dfv * gap_f;
            }
        }
    }

    /// Skip a fractional distance `gap` given in 16.16.
    pub fn clip_fixed(&mut self, gap: i32, flags: InterpFlags) {
        if flags.contains(InterpFlags::COL1) {
            self.c = self.c.wrapping_add(fmul(self.dc, gap));
        }

        if flags.contains(InterpFlags::COL3) {
            self.r = self.r.wrapping_add(fmul(self.dr, gap));
            self.g = self.g.wrapping_add(fmul(self.dg, gap));
            self.b = self.b.wrapping_add(fmul(self.db, gap));
        }

        if flags.contains(InterpFlags::FIX_UV) {
            self.u = self.u.wrapping_add(fmul(self.du, gap));
            self.v = self.v.wrapping_add(fmul(self.dv, gap));
        }

        if flags.contains(InterpFlags::Z) {
            let gap_f = gap as f32 / 65536.0;
            self.z += self.dz * gap_f;

            if flags.contains(InterpFlags::FLOAT_UV) {
                self.fu += self.dfu * gap_f;
                self.fv += self.dfv * gap_f;
            }
        }
    }

    /// Advance one step.
    #[inline]
    pub fn step(&mut self, flags: InterpFlags) {
        if flags.contains(InterpFlags::COL1) {
            self.c = self.c.wrapping_add(self.dc);
        }

        if flags.contains(InterpFlags::COL3) {
            self.r = self.r.wrapping_add(self.dr);
            self.g = self.g.wrapping_add(self.dg);
            self.b = self.b.wrapping_add(self.db);
        }

        if flags.contains(InterpFlags::FIX_UV) {
            self.u = self.u.wrapping_add(self.du);
            self.v = self.v.wrapping_add(self.dv);
        }

        if flags.contains(InterpFlags::Z) {
            self.z += self.dz;

            if flags.contains(InterpFlags::FLOAT_UV) {
                self.fu += self.dfu;
                self.fv += self.dfv;
            }
        }
    }

    /// Replace the perspective state by its affine equivalent. Valid when
    /// `dz == 0` across the span, so `z` is constant.
    pub fn perspective_to_affine(&mut self) {
        self.u = (self.fu / self.z) as i32;
        self.v = (self.fv / self.z) as i32;
        self.du = (self.dfu / self.z) as i32;
        self.dv = (self.dfv / self.z) as i32;
    }
}

// ============================================================================
// Tests
// ============================================================================
