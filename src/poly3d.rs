//! 3D polygon and triangle scan conversion.
//!
//! A draw call resolves its filler and interpolation flags once, builds
//! clipped edges, then walks scanlines top to bottom. Each scanline span
//! gets per-pixel deltas from its left and right edges, is clipped
//! horizontally and handed to the filler.
//!
//! Polygons keep their edges in a ring (indices into an [`EdgeTable`])
//! ordered so that walking `prev` follows the left side and walking `next`
//! follows the right side. Triangles skip the ring: one long edge spans
//! the whole height and a short edge is built for each half, and the
//! per-pixel deltas are computed once since they are constant over a
//! triangle.
//!
//! Only convex polygons are supported.

use std::cell::RefCell;

use crate::edge::{vertex_rgb, PolygonEdge};
use crate::edge_table::EdgeTable;
use crate::error::DrawError;
use crate::filler_registry::{FillerEntry, FillerRegistry, FillerTier};
use crate::fixed::{fceil, fdiv, fixtof, fmul, itofix};
use crate::poly_type::{InterpFlags, PolyType};
use crate::render_state::{RenderState, ScanParams};
use crate::rendering_buffer::Bitmap;
use crate::segment::PolygonSegment;
use crate::span_filler::SpanContext;
use crate::texture::Texture;
use crate::vertex::{V3d, V3dF, Vertex3d};

// ============================================================================
// Draw set-up
// ============================================================================

/// Everything resolved before the first pixel is touched.
struct DrawSetup<'a> {
    params: ScanParams,
    entry: FillerEntry,
    tier: FillerTier,
    ctx: SpanContext<'a>,
}

impl<'a> DrawSetup<'a> {
    fn resolve(
        state: &'a RenderState,
        registry: &FillerRegistry,
        target: &Bitmap,
        ty: PolyType,
        texture: Option<&'a Bitmap>,
    ) -> Result<Self, DrawError> {
        let format = target.format();
        let truecolor = format.is_truecolor();

        let (tier, entry) = registry
            .lookup(format, ty, state.preferred_tier)
            .ok_or(DrawError::UnsupportedFormat(format))?;

        let mut ctx = SpanContext {
            light_color: state.light_color,
            color_map: state.color_map.as_deref(),
            rgb_map: state.rgb_map.as_deref(),
            ..Default::default()
        };

        if ty.is_textured() {
            let tex = Texture::new(texture.ok_or(DrawError::MissingTexture(ty))?)?;
            if tex.format() != format {
                return Err(DrawError::TextureFormatMismatch {
                    texture: tex.format(),
                    target: format,
                });
            }
            ctx.texture = tex.data();
            ctx.masks = tex.masks();
        }

        if ty.is_lit() && !truecolor && ctx.color_map.is_none() {
            return Err(DrawError::MissingColorMap(ty));
        }

        Ok(Self {
            params: ScanParams {
                flags: ty.interp_flags(truecolor),
                clip: target.clip_rect(),
                format,
                subpixel: state.subpixel_accuracy,
            },
            entry,
            tier,
            ctx,
        })
    }

    /// Spans are solid horizontal lines in the flat color.
    #[inline]
    fn draws_hline(&self) -> bool {
        self.entry.draws_hline && self.params.has(InterpFlags::FLAT)
    }

    /// Clip the span `x..x + w` on row `y` horizontally and fill it.
    fn fill_span(
        &self,
        target: &mut Bitmap,
        y: i32,
        mut x: i32,
        mut w: i32,
        info: &mut PolygonSegment,
        affine: bool,
    ) {
        let clip = self.params.clip;
        if w <= 0 || x + w <= clip.x1 || x >= clip.x2 {
            return;
        }

        if x < clip.x1 {
            let gap = clip.x1 - x;
            x = clip.x1;
            w -= gap;
            info.clip(gap, self.params.flags);
        }

        if x + w > clip.x2 {
            w = clip.x2 - x;
        }

        let mut filler = self.entry.filler;
        if affine {
            if let Some(alt) = self.entry.alternative {
                info.perspective_to_affine();
                filler = alt;
            }
        }

        let bpp = self.params.format.bytes_per_pixel();
        let row = target.row_slice_mut(y as u32);
        filler(&mut row[x as usize * bpp..], w, info, &self.ctx);
    }
}

// ============================================================================
// Poly3dRasterizer
// ============================================================================

/// Software rasterizer for 3D polygons, triangles and quads.
///
/// Owns its configuration, its filler registry and a scratch edge table
/// that is reused across draw calls. Separate rasterizers share nothing.
///
/// The `try_*` entry points report why nothing was drawn; the plain ones
/// log it and return.
#[derive(Debug, Clone, Default)]
pub struct Poly3dRasterizer {
    state: RenderState,
    registry: FillerRegistry,
    edges: EdgeTable,
}

impl Poly3dRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: RenderState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    pub fn with_registry(mut self, registry: FillerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RenderState {
        &mut self.state
    }

    pub fn registry(&self) -> &FillerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FillerRegistry {
        &mut self.registry
    }

    /// Edge slots held by the scratch table.
    pub fn edge_capacity(&self) -> usize {
        self.edges.capacity()
    }

    // ------------------------------------------------------------------------
    // Entry points
    // ------------------------------------------------------------------------

    /// Draw a convex polygon with fixed-point vertices.
    pub fn polygon3d(&mut self, bmp: &mut Bitmap, ty: PolyType, texture: Option<&Bitmap>, vtx: &[V3d]) {
        report("polygon3d", self.try_polygon3d(bmp, ty, texture, vtx));
    }

    /// Draw a convex polygon with floating-point vertices.
    pub fn polygon3d_f(&mut self, bmp: &mut Bitmap, ty: PolyType, texture: Option<&Bitmap>, vtx: &[V3dF]) {
        report("polygon3d_f", self.try_polygon3d_f(bmp, ty, texture, vtx));
    }

    pub fn triangle3d(
        &mut self,
        bmp: &mut Bitmap,
        ty: PolyType,
        texture: Option<&Bitmap>,
        v1: &V3d,
        v2: &V3d,
        v3: &V3d,
    ) {
        report("triangle3d", self.try_triangle3d(bmp, ty, texture, v1, v2, v3));
    }

    pub fn triangle3d_f(
        &mut self,
        bmp: &mut Bitmap,
        ty: PolyType,
        texture: Option<&Bitmap>,
        v1: &V3dF,
        v2: &V3dF,
        v3: &V3dF,
    ) {
        report("triangle3d_f", self.try_triangle3d_f(bmp, ty, texture, v1, v2, v3));
    }

    /// Same as [`polygon3d`](Self::polygon3d) with the four vertices in order.
    #[allow(clippy::too_many_arguments)]
    pub fn quad3d(
        &mut self,
        bmp: &mut Bitmap,
        ty: PolyType,
        texture: Option<&Bitmap>,
        v1: &V3d,
        v2: &V3d,
        v3: &V3d,
        v4: &V3d,
    ) {
        report("quad3d", self.try_quad3d(bmp, ty, texture, v1, v2, v3, v4));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn quad3d_f(
        &mut self,
        bmp: &mut Bitmap,
        ty: PolyType,
        texture: Option<&Bitmap>,
        v1: &V3dF,
        v2: &V3dF,
        v3: &V3dF,
        v4: &V3dF,
    ) {
        report("quad3d_f", self.try_quad3d_f(bmp, ty, texture, v1, v2, v3, v4));
    }

    pub fn try_polygon3d(
        &mut self,
        bmp: &mut Bitmap,
        ty: PolyType,
        texture: Option<&Bitmap>,
        vtx: &[V3d],
    ) -> Result<(), DrawError> {
        self.draw_polygon("polygon3d", bmp, ty, texture, vtx)
    }

    pub fn try_polygon3d_f(
        &mut self,
        bmp: &mut Bitmap,
        ty: PolyType,
        texture: Option<&Bitmap>,
        vtx: &[V3dF],
    ) -> Result<(), DrawError> {
        self.draw_polygon("polygon3d_f", bmp, ty, texture, vtx)
    }

    pub fn try_triangle3d(
        &mut self,
        bmp: &mut Bitmap,
        ty: PolyType,
        texture: Option<&Bitmap>,
        v1: &V3d,
        v2: &V3d,
        v3: &V3d,
    ) -> Result<(), DrawError> {
        self.draw_triangle("triangle3d", bmp, ty, texture, v1, v2, v3)
    }

    pub fn try_triangle3d_f(
        &mut self,
        bmp: &mut Bitmap,
        ty: PolyType,
        texture: Option<&Bitmap>,
        v1: &V3dF,
        v2: &V3dF,
        v3: &V3dF,
    ) -> Result<(), DrawError> {
        self.draw_triangle("triangle3d_f", bmp, ty, texture, v1, v2, v3)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn try_quad3d(
        &mut self,
        bmp: &mut Bitmap,
        ty: PolyType,
        texture: Option<&Bitmap>,
        v1: &V3d,
        v2: &V3d,
        v3: &V3d,
        v4: &V3d,
    ) -> Result<(), DrawError> {
        self.draw_polygon("quad3d", bmp, ty, texture, &[*v1, *v2, *v3, *v4])
    }

    #[allow(clippy::too_many_arguments)]
    pub fn try_quad3d_f(
        &mut self,
        bmp: &mut Bitmap,
        ty: PolyType,
        texture: Option<&Bitmap>,
        v1: &V3dF,
        v2: &V3dF,
        v3: &V3dF,
        v4: &V3dF,
    ) -> Result<(), DrawError> {
        self.draw_polygon("quad3d_f", bmp, ty, texture, &[*v1, *v2, *v3, *v4])
    }

    // ------------------------------------------------------------------------
    // Shared drivers
    // ------------------------------------------------------------------------

    fn draw_polygon<V: Vertex3d>(
        &mut self,
        kind: &str,
        bmp: &mut Bitmap,
        ty: PolyType,
        texture: Option<&Bitmap>,
        vtx: &[V],
    ) -> Result<(), DrawError> {
        if vtx.len() < 3 {
            return Err(DrawError::Degenerate);
        }

        let Self {
            state,
            registry,
            edges,
        } = self;
        let setup = DrawSetup::resolve(state, registry, bmp, ty, texture)?;
        log::debug!(
            "{kind}: {} vertices, {ty:?} on {:?}, {:?} fillers",
            vtx.len(),
            setup.params.format,
            setup.tier
        );

        let mut target = bmp.lock();
        rasterize_polygon(&mut target, &setup, edges, vtx)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_triangle<V: Vertex3d>(
        &mut self,
        kind: &str,
        bmp: &mut Bitmap,
        ty: PolyType,
        texture: Option<&Bitmap>,
        v1: &V,
        v2: &V,
        v3: &V,
    ) -> Result<(), DrawError> {
        let setup = DrawSetup::resolve(&self.state, &self.registry, bmp, ty, texture)?;
        log::debug!(
            "{kind}: {ty:?} on {:?}, {:?} fillers",
            setup.params.format,
            setup.tier
        );

        let mut target = bmp.lock();
        rasterize_triangle(&mut target, &setup, v1, v2, v3)
    }
}

fn report(kind: &str, result: Result<(), DrawError>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_geometric() => log::trace!("{kind}: nothing drawn: {e}"),
        Err(e) => log::warn!("{kind}: draw rejected: {e}"),
    }
}

// ============================================================================
// Polygons
// ============================================================================

fn rasterize_polygon<V: Vertex3d>(
    target: &mut Bitmap,
    setup: &DrawSetup<'_>,
    table: &mut EdgeTable,
    vtx: &[V],
) -> Result<(), DrawError> {
    let p = &setup.params;
    let (ct, cb) = (p.clip.y1, p.clip.y2);
    let vc = vtx.len();
    let ring = table.allocate(vc);

    // Walk the vertices so the ring runs clockwise on screen.
    let ccw = V::polygon_is_ccw(&vtx[0], &vtx[1], &vtx[2]);
    let vertex_at = |k: usize| if ccw { vtx[vc - 1 - k] } else { vtx[k] };

    let mut v2 = if ccw { vtx[0] } else { vtx[vc - 1] };
    let mut count = 0usize;
    let mut top = i32::MAX;
    let mut bottom = i32::MIN;
    let mut start = 0usize;
    let mut sloped = false;

    for k in 0..vc {
        let v1 = v2;
        v2 = vertex_at(k);
        let (v1y, v2y) = (v1.row(), v2.row());
        if v1y == v2y {
            continue;
        }
        sloped = true;

        if (v1y >= ct || v2y >= ct) && (v1y < cb || v2y < cb) {
            let mut edge = PolygonEdge::build(&v1, &v2, p);
            if edge.is_visible() {
                if edge.top < top {
                    top = edge.top;
                    start = count;
                }
                bottom = bottom.max(edge.bottom);
                if count > 0 {
                    ring[count - 1].next = count;
                    edge.prev = count - 1;
                }
                ring[count] = edge;
                count += 1;
            }
        }
    }

    if count < 2 {
        return Err(if count == 0 && sloped {
            DrawError::Clipped
        } else {
            DrawError::Degenerate
        });
    }

    ring[0].prev = count - 1;
    ring[count - 1].next = 0;

    let color = vtx[0].color() as u32;
    walk_ring(target, setup, &mut ring[..count], top, bottom, start, color);
    Ok(())
}

/// Scan the ring from `top` to `bottom`, one segment per run of rows
/// where the left and right edges stay the same.
fn walk_ring(
    target: &mut Bitmap,
    setup: &DrawSetup<'_>,
    ring: &mut [PolygonEdge],
    top: i32,
    bottom: i32,
    start: usize,
    color: u32,
) {
    let mut left = start;
    let (prev, next) = (ring[left].prev, ring[left].next);
    if prev != next {
        if ring[prev].top == top {
            left = prev;
        }
    } else if ring[left].x.wrapping_add(ring[left].dx) > ring[next].x.wrapping_add(ring[next].dx) {
        left = prev;
    }
    let mut right = ring[left].next;

    let mut info = PolygonSegment::default();
    let mut ytop = top;
    // Every pass retires at least one edge.
    let mut passes = ring.len();

    while ytop <= bottom && passes > 0 {
        passes -= 1;
        let ybottom = ring[left].bottom.min(ring[right].bottom);

        let (mut l, mut r) = (ring[left], ring[right]);
        draw_polygon_segment(target, setup, ytop, ybottom, &mut l, &mut r, color, &mut info);
        ring[left] = l;
        ring[right] = r;

        if ybottom >= ring[left].bottom {
            left = ring[left].prev;
        }
        if ybottom >= ring[right].bottom {
            right = ring[right].next;
        }
        ytop = ybottom + 1;
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_polygon_segment(
    target: &mut Bitmap,
    setup: &DrawSetup<'_>,
    ytop: i32,
    ybottom: i32,
    e1: &mut PolygonEdge,
    e2: &mut PolygonEdge,
    color: u32,
    info: &mut PolygonSegment,
) {
    let p = &setup.params;
    let hline = setup.draws_hline();

    for y in ytop..=ybottom {
        let x = fceil(e1.x);
        let mut w = fceil(e2.x) - x;
        let step = itofix(x).wrapping_sub(e1.x);

        if hline {
            if w > 0 {
                target.hline(x, y, x + w - 1, color);
            }
        } else {
            // A zero-width span still steps the edge attributes; -1 keeps
            // the delta divisions defined and skips the fill.
            if w == 0 {
                w = -1;
            }
            span_deltas(info, &e1.dat, &e2.dat, w, step, p);
            e1.dat.step(p.flags);
            e2.dat.step(p.flags);

            let affine = p.has(InterpFlags::OPT_FLOAT_UV_TO_FIX) && info.dz == 0.0;
            setup.fill_span(target, y, x, w, info, affine);
        }

        e1.advance_x();
        e2.advance_x();
    }
}

/// Per-pixel start values and deltas between two edge states.
fn span_deltas(
    info: &mut PolygonSegment,
    s1: &PolygonSegment,
    s2: &PolygonSegment,
    w: i32,
    step: i32,
    p: &ScanParams,
) {
    let sub = p.subpixel;

    if p.has(InterpFlags::COL1) {
        info.dc = s2.c.wrapping_sub(s1.c).wrapping_div(w);
        info.c = s1.c;
        if sub {
            info.c = info.c.wrapping_add(fmul(step, info.dc));
        }
    }

    if p.has(InterpFlags::COL3) {
        info.dr = s2.r.wrapping_sub(s1.r).wrapping_div(w);
        info.dg = s2.g.wrapping_sub(s1.g).wrapping_div(w);
        info.db = s2.b.wrapping_sub(s1.b).wrapping_div(w);
        info.r = s1.r;
        info.g = s1.g;
        info.b = s1.b;
        if sub {
            info.r = info.r.wrapping_add(fmul(step, info.dr));
            info.g = info.g.wrapping_add(fmul(step, info.dg));
            info.b = info.b.wrapping_add(fmul(step, info.db));
        }
    }

    if p.has(InterpFlags::FIX_UV) {
        info.du = s2.u.wrapping_sub(s1.u).wrapping_div(w);
        info.dv = s2.v.wrapping_sub(s1.v).wrapping_div(w);
        info.u = s1.u;
        info.v = s1.v;
        if sub {
            info.u = info.u.wrapping_add(fmul(step, info.du));
            info.v = info.v.wrapping_add(fmul(step, info.dv));
        }
    }

    if p.has(InterpFlags::Z) {
        let step_f = fixtof(step) as f32;
        let w1 = 1.0 / w as f32;

        info.dz = (s2.z - s1.z) * w1;
        info.z = if sub { s1.z + info.dz * step_f } else { s1.z };

        if p.has(InterpFlags::FLOAT_UV) {
            info.dfu = (s2.fu - s1.fu) * w1;
            info.dfv = (s2.fv - s1.fv) * w1;
            info.fu = s1.fu;
            info.fv = s1.fv;
            if sub {
                info.fu += info.dfu * step_f;
                info.fv += info.dfv * step_f;
            }
        }
    }
}

// ============================================================================
// Triangles
// ============================================================================

fn rasterize_triangle<V: Vertex3d>(
    target: &mut Bitmap,
    setup: &DrawSetup<'_>,
    v1: &V,
    v2: &V,
    v3: &V,
) -> Result<(), DrawError> {
    let p = &setup.params;
    let (ct, cb) = (p.clip.y1, p.clip.y2);
    let color = v1.color() as u32;

    // Sort so that vt1.y <= vt2.y <= vt3.y.
    let (mut vt1, mut vt2) = if v1.y_key() > v2.y_key() { (v2, v1) } else { (v1, v2) };
    let mut vt3 = v3;
    if vt1.y_key() > v3.y_key() {
        vt3 = vt1;
        vt1 = v3;
    }
    if vt2.y_key() > vt3.y_key() {
        core::mem::swap(&mut vt2, &mut vt3);
    }

    let (y1, y2, y3) = (vt1.row(), vt2.row(), vt3.row());
    if y1 == y3 {
        return Err(DrawError::Degenerate);
    }
    if y1 >= cb || y3 < ct {
        return Err(DrawError::Clipped);
    }

    let mut long_edge = PolygonEdge::build(vt1, vt3, p);
    let ccw = V::triangle_is_ccw(vt1, vt2, vt3, (y1, y2, y3));

    // Deltas are constant over the triangle: take them across the widest
    // span, through the middle vertex.
    let mut info = PolygonSegment::default();
    if !p.has(InterpFlags::FLAT) {
        let mut s1 = long_edge.dat;
        let h = vt2.y_fixed().wrapping_sub(itofix(long_edge.top));
        s1.clip_fixed(h, p.flags);

        let w = long_edge
            .x
            .wrapping_add(fmul(h, long_edge.dx))
            .wrapping_sub(vt2.x_fixed());
        if w != 0 {
            triangle_deltas(&mut info, &s1, vt2, w, p);
        }
    }

    if y1 != y2 && y2 >= ct {
        let mut short_edge = PolygonEdge::build(vt1, vt2, p);
        let (ytop, ybottom) = (long_edge.top, short_edge.bottom);
        let (left, right) = if ccw {
            (&mut short_edge, &mut long_edge)
        } else {
            (&mut long_edge, &mut short_edge)
        };
        draw_triangle_part(target, setup, ytop, ybottom, left, right, color, &mut info);
    }

    if y2 != y3 && y2 < cb {
        let mut short_edge = PolygonEdge::build(vt2, vt3, p);
        let (ytop, ybottom) = (short_edge.top, long_edge.bottom);
        let (left, right) = if ccw {
            (&mut short_edge, &mut long_edge)
        } else {
            (&mut long_edge, &mut short_edge)
        };
        draw_triangle_part(target, setup, ytop, ybottom, left, right, color, &mut info);
    }

    Ok(())
}

/// Per-pixel deltas from the long edge state `s1` at the height of `v` to
/// the vertex `v`, `w` (16.16) pixels away.
fn triangle_deltas<V: Vertex3d>(
    info: &mut PolygonSegment,
    s1: &PolygonSegment,
    v: &V,
    w: i32,
    p: &ScanParams,
) {
    if p.has(InterpFlags::COL1) {
        info.dc = fdiv(s1.c.wrapping_sub(itofix(v.color())), w);
    }

    if p.has(InterpFlags::COL3) {
        let (r, g, b) = vertex_rgb(v.color(), p.flags, p.format);
        info.dr = fdiv(s1.r.wrapping_sub(itofix(r)), w);
        info.dg = fdiv(s1.g.wrapping_sub(itofix(g)), w);
        info.db = fdiv(s1.b.wrapping_sub(itofix(b)), w);
    }

    if p.has(InterpFlags::FIX_UV) {
        info.du = fdiv(s1.u.wrapping_sub(v.u_fixed()), w);
        info.dv = fdiv(s1.v.wrapping_sub(v.v_fixed()), w);
    }

    if p.has(InterpFlags::Z) {
        let w1 = 65536.0 / w as f32;
        let z1 = v.recip_z();
        info.dz = (s1.z - z1) * w1;

        if p.has(InterpFlags::FLOAT_UV) {
            info.dfu = (s1.fu - v.u_over_z(z1)) * w1;
            info.dfv = (s1.fv - v.v_over_z(z1)) * w1;
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_triangle_part(
    target: &mut Bitmap,
    setup: &DrawSetup<'_>,
    ytop: i32,
    ybottom: i32,
    left: &mut PolygonEdge,
    right: &mut PolygonEdge,
    color: u32,
    info: &mut PolygonSegment,
) {
    let p = &setup.params;
    let sub = p.subpixel;
    let hline = setup.draws_hline();
    let affine = p.has(InterpFlags::OPT_FLOAT_UV_TO_FIX) && info.dz == 0.0;

    for y in ytop..=ybottom {
        let x = fceil(left.x);
        let w = fceil(right.x) - x;
        let step = itofix(x).wrapping_sub(left.x);

        if hline {
            if w > 0 {
                target.hline(x, y, x + w - 1, color);
            }
        } else {
            let s1 = &mut left.dat;

            if p.has(InterpFlags::COL1) {
                info.c = s1.c;
                if sub {
                    info.c = info.c.wrapping_add(fmul(step, info.dc));
                }
            }

            if p.has(InterpFlags::COL3) {
                info.r = s1.r;
                info.g = s1.g;
                info.b = s1.b;
                if sub {
                    info.r = info.r.wrapping_add(fmul(step, info.dr));
                    info.g = info.g.wrapping_add(fmul(step, info.dg));
                    info.b = info.b.wrapping_add(fmul(step, info.db));
                }
            }

            if p.has(InterpFlags::FIX_UV) {
                info.u = s1.u;
                info.v = s1.v;
                if sub {
                    info.u = info.u.wrapping_add(fmul(step, info.du));
                    info.v = info.v.wrapping_add(fmul(step, info.dv));
                }
            }

            if p.has(InterpFlags::Z) {
                let step_f = fixtof(step) as f32;
                info.z = if sub { s1.z + info.dz * step_f } else { s1.z };

                if p.has(InterpFlags::FLOAT_UV) {
                    info.fu = s1.fu;
                    info.fv = s1.fv;
                    if sub {
                        info.fu += info.dfu * step_f;
                        info.fv += info.dfv * step_f;
                    }
                }
            }

            s1.step(p.flags);
            setup.fill_span(target, y, x, w, info, affine);
        }

        left.advance_x();
        right.advance_x();
    }
}

// ============================================================================
// Thread-local entry points
// ============================================================================

thread_local! {
    static RASTERIZER: RefCell<Poly3dRasterizer> = RefCell::new(Poly3dRasterizer::new());
    // Render state of the shared rasterizer while it is borrowed.
    static BUSY_STATE: RefCell<Option<RenderState>> = const { RefCell::new(None) };
}

/// Run `f` with this thread's shared rasterizer, e.g. to change its
/// [`RenderState`] for the free drawing functions.
///
/// The shared rasterizer is held for the duration of `f`. A nested call
/// (a free drawing function inside `f`, or `with_rasterizer` itself) gets a
/// temporary rasterizer with a copy of the shared render state as it was
/// when the outer call began, so changes made through it do not persist.
pub fn with_rasterizer<R>(f: impl FnOnce(&mut Poly3dRasterizer) -> R) -> R {
    RASTERIZER.with(|r| match r.try_borrow_mut() {
        Ok(mut ras) => {
            BUSY_STATE.with(|s| *s.borrow_mut() = Some(ras.state.clone()));
            let out = f(&mut ras);
            BUSY_STATE.with(|s| *s.borrow_mut() = None);
            out
        }
        Err(_) => {
            log::debug!("shared rasterizer in use; drawing with a temporary one");
            let state = BUSY_STATE.with(|s| s.borrow().clone()).unwrap_or_default();
            f(&mut Poly3dRasterizer::with_state(state))
        }
    })
}

/// [`Poly3dRasterizer::polygon3d`] on this thread's rasterizer.
pub fn polygon3d(bmp: &mut Bitmap, ty: PolyType, texture: Option<&Bitmap>, vtx: &[V3d]) {
    with_rasterizer(|r| r.polygon3d(bmp, ty, texture, vtx));
}

pub fn polygon3d_f(bmp: &mut Bitmap, ty: PolyType, texture: Option<&Bitmap>, vtx: &[V3dF]) {
    with_rasterizer(|r| r.polygon3d_f(bmp, ty, texture, vtx));
}

pub fn triangle3d(
    bmp: &mut Bitmap,
    ty: PolyType,
    texture: Option<&Bitmap>,
    v1: &V3d,
    v2: &V3d,
    v3: &V3d,
) {
    with_rasterizer(|r| r.triangle3d(bmp, ty, texture, v1, v2, v3));
}

pub fn triangle3d_f(
    bmp: &mut Bitmap,
    ty: PolyType,
    texture: Option<&Bitmap>,
    v1: &V3dF,
    v2: &V3dF,
    v3: &V3dF,
) {
    with_rasterizer(|r| r.triangle3d_f(bmp, ty, texture, v1, v2, v3));
}

#[allow(clippy::too_many_arguments)]
pub fn quad3d(
    bmp: &mut Bitmap,
    ty: PolyType,
    texture: Option<&Bitmap>,
    v1: &V3d,
    v2: &V3d,
    v3: &V3d,
    v4: &V3d,
) {
    with_rasterizer(|r| r.quad3d(bmp, ty, texture, v1, v2, v3, v4));
}

#[allow(clippy::too_many_arguments)]
pub fn quad3d_f(
    bmp: &mut Bitmap,
    ty: PolyType,
    texture: Option<&Bitmap>,
    v1: &V3dF,
    v2: &V3dF,
    v3: &V3dF,
    v4: &V3dF,
) {
    with_rasterizer(|r| r.quad3d_f(bmp, ty, texture, v1, v2, v3, v4));
}

// ============================================================================
// Tests
// ============================================================================
