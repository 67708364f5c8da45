//! Triangle throughput on a 320x200 32-bit target.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use poly3d_rust::{Bitmap, FillerTier, PixelFormat, Poly3dRasterizer, PolyType, RenderState, V3dF};

const W: u32 = 320;
const H: u32 = 200;

fn screen_triangle() -> [V3dF; 3] {
    [
        V3dF::at(12.5, 8.25, 0xFF2040).with_uv(0.0, 0.0).with_z(1.0),
        V3dF::at(305.75, 40.5, 0x20FF40).with_uv(63.0, 0.0).with_z(3.5),
        V3dF::at(90.0, 191.0, 0x4020FF).with_uv(0.0, 63.0).with_z(1.5),
    ]
}

fn checker_texture() -> Bitmap {
    let mut tex = Bitmap::new(64, 64, PixelFormat::Argb8888).unwrap();
    for y in 0..64 {
        for x in 0..64 {
            let c = if (x / 8 + y / 8) % 2 == 0 { 0xE0C080 } else { 0x304050 };
            tex.put_pixel(x, y, c);
        }
    }
    tex
}

fn bench_mode(c: &mut Criterion, name: &str, ty: PolyType, tier: FillerTier) {
    let mut bmp = Bitmap::new(W, H, PixelFormat::Argb8888).unwrap();
    let tex = checker_texture();
    let v = screen_triangle();
    let mut ras = Poly3dRasterizer::with_state(RenderState::new().with_tier(tier));

    c.bench_function(name, |b| {
        b.iter(|| {
            ras.triangle3d_f(
                &mut bmp,
                ty,
                Some(&tex),
                black_box(&v[0]),
                black_box(&v[1]),
                black_box(&v[2]),
            );
        })
    });
}

fn bench_triangles(c: &mut Criterion) {
    bench_mode(c, "flat_320x200", PolyType::Flat, FillerTier::Generic);
    bench_mode(c, "grgb_320x200_generic", PolyType::Grgb, FillerTier::Generic);
    bench_mode(c, "grgb_320x200_accelerated", PolyType::Grgb, FillerTier::Accelerated);
    bench_mode(c, "atex_320x200", PolyType::Atex, FillerTier::Generic);
    bench_mode(c, "ptex_320x200", PolyType::Ptex, FillerTier::Generic);
    bench_mode(c, "ptex_lit_320x200_accelerated", PolyType::PtexLit, FillerTier::Accelerated);
}

criterion_group!(benches, bench_triangles);
criterion_main!(benches);
