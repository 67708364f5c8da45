//! A checkered ground plane receding into the distance, fading toward the
//! light color with depth.
//!
//! Params: `[far_depth, horizon_fraction]`.

use poly3d_rust::{Bitmap, Poly3dRasterizer, PolyType, V3dF};

use super::{checker_texture, param};

pub fn render(bmp: &mut Bitmap, ras: &mut Poly3dRasterizer, params: &[f64]) {
    let format = bmp.format();
    bmp.clear_to_color(format.makecol(0x10, 0x10, 0x30));
    let Some(tex) = checker_texture(format, 64, 8) else {
        return;
    };

    let far = param(params, 0, 4.0).max(1.0) as f32;
    let horizon = param(params, 1, 0.35).clamp(0.0, 0.95) as f32;
    let (w, h) = (bmp.width() as f32, bmp.height() as f32);
    let inset = w * 0.5 * (1.0 - 1.0 / far);
    let reps = 64.0 * 4.0;

    let near_left = V3dF::at(0.0, h, 255).with_uv(0.0, reps * far).with_z(1.0);
    let near_right = V3dF::at(w, h, 255).with_uv(reps, reps * far).with_z(1.0);
    let far_right = V3dF::at(w - inset, h * horizon, 48)
        .with_uv(reps, 0.0)
        .with_z(far);
    let far_left = V3dF::at(inset, h * horizon, 48).with_uv(0.0, 0.0).with_z(far);

    ras.quad3d_f(
        bmp,
        PolyType::PtexLit,
        Some(&tex),
        &near_left,
        &near_right,
        &far_right,
        &far_left,
    );

    // Affine copy of the same plane in the top band, for comparison.
    let band = h * horizon * 0.8;
    let strip = |x: f32, y: f32, u: f32, v: f32| V3dF::at(x, y, 0).with_uv(u, v);
    ras.quad3d_f(
        bmp,
        PolyType::Atex,
        Some(&tex),
        &strip(w * 0.1, 2.0, 0.0, 0.0),
        &strip(w * 0.9, 2.0, 127.0, 0.0),
        &strip(w * 0.9, band, 127.0, 31.0),
        &strip(w * 0.1, band, 0.0, 31.0),
    );
}
