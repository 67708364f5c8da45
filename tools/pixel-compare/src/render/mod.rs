//! Named rasterizer scenes.
//!
//! Each scene draws into a [`Bitmap`] of the requested format through a
//! caller-configured [`Poly3dRasterizer`], so the same scene can be rendered
//! with different pixel formats or filler tiers and compared.

mod clipped_polygon;
mod flat_triangle;
mod gouraud_quad;
mod perspective_plane;

use std::sync::Arc;

use poly3d_rust::color_map::{palette_332, ColorMap, RgbMap};
use poly3d_rust::{Bitmap, FillerTier, PixelFormat, Poly3dRasterizer, RenderState};

use crate::PixelBuffer;

type SceneFn = fn(&mut Bitmap, &mut Poly3dRasterizer, &[f64]);

const SCENES: &[(&str, SceneFn)] = &[
    ("flat_triangle", flat_triangle::render),
    ("gouraud_quad", gouraud_quad::render),
    ("perspective_plane", perspective_plane::render),
    ("clipped_polygon", clipped_polygon::render),
];

/// Render settings shared by all scenes.
#[derive(Debug, Clone, Copy)]
pub struct SceneOptions {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub tier: FillerTier,
    pub subpixel: bool,
}

/// Render a scene by name. `None` if the name is unknown or the bitmap
/// cannot be created.
pub fn render_scene(name: &str, opts: &SceneOptions, params: &[f64]) -> Option<PixelBuffer> {
    let (_, scene) = SCENES.iter().find(|(n, _)| *n == name)?;

    let mut bmp = match Bitmap::new(opts.width, opts.height, opts.format) {
        Ok(bmp) => bmp,
        Err(e) => {
            log::error!("cannot create {}x{} target: {e}", opts.width, opts.height);
            return None;
        }
    };

    let mut state = RenderState::new()
        .with_tier(opts.tier)
        .with_subpixel_accuracy(opts.subpixel)
        .with_light_color(opts.format.makecol(0x10, 0x10, 0x30));
    if !opts.format.is_truecolor() {
        let pal = palette_332();
        let rgb_map = Arc::new(RgbMap::from_palette(&pal));
        let shade = ColorMap::light_table(&pal, &rgb_map, 0x10, 0x10, 0x30);
        state = state.with_rgb_map(rgb_map).with_color_map(Arc::new(shade));
    }
    let mut ras = Poly3dRasterizer::with_state(state);

    log::info!("rendering '{name}' at {}x{} {:?}", opts.width, opts.height, opts.format);
    scene(&mut bmp, &mut ras, params);
    Some(PixelBuffer::from_bitmap(&bmp))
}

pub fn available_scenes() -> impl Iterator<Item = &'static str> {
    SCENES.iter().map(|(n, _)| *n)
}

/// Parameter `i`, or `default` when absent.
fn param(params: &[f64], i: usize, default: f64) -> f64 {
    params.get(i).copied().unwrap_or(default)
}

/// Checkerboard texture of `size` x `size` texels in `format`.
fn checker_texture(format: PixelFormat, size: u32, cell: u32) -> Option<Bitmap> {
    let mut tex = match Bitmap::new(size, size, format) {
        Ok(tex) => tex,
        Err(e) => {
            log::error!("cannot create {size}x{size} texture: {e}");
            return None;
        }
    };
    let light = format.makecol(0xE8, 0xD8, 0xA0);
    let dark = format.makecol(0x30, 0x48, 0x80);
    for y in 0..size {
        for x in 0..size {
            let c = if (x / cell + y / cell) % 2 == 0 { light } else { dark };
            tex.put_pixel(x as i32, y as i32, c);
        }
    }
    Some(tex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_scene_renders() {
        let names: Vec<_> = available_scenes().collect();
        assert_eq!(names.len(), 4);
        for format in PixelFormat::ALL {
            for name in &names {
                let opts = SceneOptions {
                    width: 64,
                    height: 48,
                    format,
                    tier: FillerTier::Generic,
                    subpixel: true,
                };
                let buf = render_scene(name, &opts, &[]).unwrap();
                assert_eq!((buf.width, buf.height), (64, 48));
                assert!(buf.data.chunks_exact(4).any(|p| p[..3] != [0, 0, 0]), "{name}");
            }
        }
    }

    #[test]
    fn test_unknown_scene() {
        let opts = SceneOptions {
            width: 8,
            height: 8,
            format: PixelFormat::Argb8888,
            tier: FillerTier::Generic,
            subpixel: true,
        };
        assert!(render_scene("lion", &opts, &[]).is_none());
    }
}
