//! A twelve-sided polygon larger than the clip rectangle, with the clip
//! rectangle outlined.
//!
//! Params: `[angle_degrees]`.

use poly3d_rust::{Bitmap, Fixed, Poly3dRasterizer, PolyType, V3d};

use super::param;

const SIDES: usize = 12;

pub fn render(bmp: &mut Bitmap, ras: &mut Poly3dRasterizer, params: &[f64]) {
    let format = bmp.format();
    bmp.clear_to_color(0);

    let (w, h) = (bmp.width() as i32, bmp.height() as i32);
    let (x1, y1, x2, y2) = (w / 8, h / 8, w - w / 8, h - h / 8);
    let frame = format.makecol(0xFF, 0xFF, 0x00);
    bmp.hline(x1 - 1, y1 - 1, x2, frame);
    bmp.hline(x1 - 1, y2, x2, frame);

    let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);
    let radius = cx.max(cy) * 0.95;
    let base = param(params, 0, 10.0) * 256.0 / 360.0;
    let vtx: Vec<V3d> = (0..SIDES)
        .map(|i| {
            let a = Fixed::from_f64(base + i as f64 * 256.0 / SIDES as f64);
            let hue = i * 0xFF / SIDES;
            V3d {
                x: Fixed::from_f64(cx + radius * a.cos().to_f64()),
                y: Fixed::from_f64(cy + radius * a.sin().to_f64()),
                c: ((hue << 16) | ((0xFF - hue) << 8) | 0x80) as i32,
                ..V3d::default()
            }
        })
        .collect();

    bmp.set_clip(x1, y1, x2, y2);
    ras.polygon3d(bmp, PolyType::Grgb, None, &vtx);
    bmp.reset_clip();
}
