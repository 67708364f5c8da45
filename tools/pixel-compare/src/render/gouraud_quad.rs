//! RGB gouraud quad with a single-color gouraud triangle on top.

use poly3d_rust::{Bitmap, Poly3dRasterizer, PolyType, V3dF};

pub fn render(bmp: &mut Bitmap, ras: &mut Poly3dRasterizer, _params: &[f64]) {
    let format = bmp.format();
    bmp.clear_to_color(0);

    let (w, h) = (bmp.width() as f32, bmp.height() as f32);
    ras.quad3d_f(
        bmp,
        PolyType::Grgb,
        None,
        &V3dF::at(w * 0.05, h * 0.1, 0xFF0000),
        &V3dF::at(w * 0.95, h * 0.05, 0x00FF00),
        &V3dF::at(w * 0.9, h * 0.95, 0x0000FF),
        &V3dF::at(w * 0.1, h * 0.85, 0xFFFFFF),
    );

    // Gcol takes colors already packed for the target.
    let dark = format.makecol(0x10, 0x10, 0x10) as i32;
    let light = format.makecol(0xF0, 0xF0, 0xF0) as i32;
    ras.triangle3d_f(
        bmp,
        PolyType::Gcol,
        None,
        &V3dF::at(w * 0.5, h * 0.3, light),
        &V3dF::at(w * 0.7, h * 0.7, dark),
        &V3dF::at(w * 0.3, h * 0.7, dark),
    );
}
