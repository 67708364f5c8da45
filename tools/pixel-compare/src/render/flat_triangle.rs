//! Three flat-shaded triangles rotated about the image center.
//!
//! Params: `[angle_degrees]`.

use poly3d_rust::{Bitmap, Fixed, Poly3dRasterizer, PolyType, V3d};

use super::param;

pub fn render(bmp: &mut Bitmap, ras: &mut Poly3dRasterizer, params: &[f64]) {
    let format = bmp.format();
    bmp.clear_to_color(format.makecol(0x20, 0x20, 0x20));

    let (cx, cy) = (bmp.width() as f64 / 2.0, bmp.height() as f64 / 2.0);
    let radius = cx.min(cy) * 0.9;
    // 256 angle units per turn.
    let base = param(params, 0, 0.0) * 256.0 / 360.0;
    let colors = [(0xE0, 0x40, 0x30), (0x40, 0xC0, 0x50), (0x30, 0x60, 0xE0)];

    for (i, &(r, g, b)) in colors.iter().enumerate() {
        let c = format.makecol(r, g, b) as i32;
        let scale = radius * (1.0 - i as f64 * 0.25);
        let vertex = |k: f64| {
            let a = Fixed::from_f64(base + i as f64 * 20.0 + k * 256.0 / 3.0);
            V3d {
                x: Fixed::from_f64(cx + scale * a.cos().to_f64()),
                y: Fixed::from_f64(cy + scale * a.sin().to_f64()),
                c,
                ..V3d::default()
            }
        };
        ras.triangle3d(bmp, PolyType::Flat, None, &vertex(0.0), &vertex(1.0), &vertex(2.0));
    }
}
