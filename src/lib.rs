//! # poly3d-rust
//!
//! Software rasterizer for 3D polygons and triangles with a 16.16
//! fixed-point math layer.
//!
//! Screen-space vertices (position, color, texture coordinates, depth) are
//! scan-converted into pixel spans of an in-memory [`Bitmap`]. Supported
//! modes:
//!
//! - Flat fill
//! - Gouraud shading of a single channel or of RGB colors
//! - Affine and perspective-correct texture mapping
//! - Masked and lit variants of each texture mode
//!
//! Targets can be 8-bit indexed, 15-, 16-, 24- or 32-bit truecolor.
//!
//! ## Architecture
//!
//! A draw call runs in four stages:
//!
//! 1. **Filler dispatch**: the [`FillerRegistry`] picks a scanline filler
//!    for the target format and polygon type
//! 2. **Edge building**: each polygon side becomes a clipped edge with
//!    per-scanline attribute deltas
//! 3. **Scan conversion**: edges are walked top to bottom, pairing a left
//!    and a right edge per run of scanlines
//! 4. **Span filling**: per scanline, per-pixel deltas are derived, the
//!    span is clipped horizontally and the filler writes the pixels
//!
//! ## Example
//!
//! ```
//! use poly3d_rust::{Bitmap, PixelFormat, Poly3dRasterizer, PolyType, V3d};
//!
//! let mut bmp = Bitmap::new(10, 10, PixelFormat::Argb8888).unwrap();
//! let mut ras = Poly3dRasterizer::new();
//! ras.triangle3d(
//!     &mut bmp,
//!     PolyType::Flat,
//!     None,
//!     &V3d::at(1, 1, 0xFF0000),
//!     &V3d::at(8, 1, 0xFF0000),
//!     &V3d::at(1, 8, 0xFF0000),
//! );
//! assert_eq!(bmp.get_pixel(2, 2), Some(0xFF0000));
//! ```

// Foundation: fixed point, errors, geometry
pub mod basics;
pub mod error;
pub mod fixed;
pub mod fixed_trig;

// Pixels and buffers
pub mod color_map;
pub mod pixfmt;
pub mod rendering_buffer;
pub mod texture;

// Scan conversion
pub mod edge;
pub mod edge_table;
pub mod poly3d;
pub mod poly_type;
pub mod render_state;
pub mod segment;
pub mod vertex;

// Scanline fillers
pub mod filler_registry;
pub mod span_filler;
pub mod span_filler_wide;

pub use error::{BitmapError, DrawError, FixedError, OrSentinel};
pub use filler_registry::{FillerEntry, FillerRegistry, FillerTier};
pub use fixed::Fixed;
pub use pixfmt::PixelFormat;
pub use poly3d::{
    polygon3d, polygon3d_f, quad3d, quad3d_f, triangle3d, triangle3d_f, with_rasterizer,
    Poly3dRasterizer,
};
pub use poly_type::{InterpFlags, PolyType};
pub use render_state::{RenderOptions, RenderState};
pub use rendering_buffer::{Bitmap, BitmapLock};
pub use texture::Texture;
pub use vertex::{polygon_z_normal, polygon_z_normal_f, V3d, V3dF, Vertex3d};
