//! Polygon rendering modes and interpolation flags.
//!
//! A [`PolyType`] selects the shading/texturing mode of a draw call. It
//! maps to an [`InterpFlags`] set telling the edge builder and the span
//! set-up which attributes to interpolate. The mapping differs between
//! indexed and truecolor targets only for single-color gouraud, which on
//! truecolor targets interpolates the three channels of the vertex color.

use core::ops::{BitAnd, BitOr, BitOrAssign};

// ============================================================================
// InterpFlags
// ============================================================================

/// Set of interpolated attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InterpFlags(u32);

impl InterpFlags {
    pub const NONE: InterpFlags = InterpFlags(0);
    /// Solid color; no attributes.
    pub const FLAT: InterpFlags = InterpFlags(1);
    /// One intensity channel.
    pub const COL1: InterpFlags = InterpFlags(2);
    /// Red, green and blue channels.
    pub const COL3: InterpFlags = InterpFlags(4);
    /// Affine texture coordinates.
    pub const FIX_UV: InterpFlags = InterpFlags(8);
    /// Reciprocal depth.
    pub const Z: InterpFlags = InterpFlags(16);
    /// Perspective-correct texture coordinates (`u/z`, `v/z`).
    pub const FLOAT_UV: InterpFlags = InterpFlags(32);
    /// Switch to the affine filler when depth is constant across a span.
    pub const OPT_FLOAT_UV_TO_FIX: InterpFlags = InterpFlags(64);
    /// Vertex colors are packed in the target format and need unpacking.
    pub const COLOR_TO_RGB: InterpFlags = InterpFlags(128);

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        InterpFlags(bits)
    }

    /// `true` if every flag of `other` is set.
    #[inline]
    pub const fn contains(self, other: InterpFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn union(self, other: InterpFlags) -> Self {
        InterpFlags(self.0 | other.0)
    }
}

impl BitOr for InterpFlags {
    type Output = InterpFlags;
    fn bitor(self, rhs: InterpFlags) -> InterpFlags {
        InterpFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for InterpFlags {
    fn bitor_assign(&mut self, rhs: InterpFlags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for InterpFlags {
    type Output = InterpFlags;
    fn bitand(self, rhs: InterpFlags) -> InterpFlags {
        InterpFlags(self.0 & rhs.0)
    }
}

// ============================================================================
// PolyType
// ============================================================================

/// Rendering mode of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PolyType {
    /// Solid fill with the first vertex's color.
    Flat = 0,
    /// Gouraud shading of one channel (palette index ramp on 8-bit
    /// targets, packed vertex colors on truecolor targets).
    Gcol = 1,
    /// Gouraud shading of `0xRRGGBB` vertex colors.
    Grgb = 2,
    /// Affine texture mapping.
    Atex = 3,
    /// Perspective-correct texture mapping.
    Ptex = 4,
    AtexMask = 5,
    PtexMask = 6,
    /// Affine texture blended toward the light color by vertex intensity.
    AtexLit = 7,
    PtexLit = 8,
    AtexMaskLit = 9,
    PtexMaskLit = 10,
}

impl PolyType {
    pub const COUNT: usize = 11;

    pub const ALL: [PolyType; PolyType::COUNT] = [
        PolyType::Flat,
        PolyType::Gcol,
        PolyType::Grgb,
        PolyType::Atex,
        PolyType::Ptex,
        PolyType::AtexMask,
        PolyType::PtexMask,
        PolyType::AtexLit,
        PolyType::PtexLit,
        PolyType::AtexMaskLit,
        PolyType::PtexMaskLit,
    ];

    /// Mode for a raw selector, clamped into range.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.clamp(0, Self::COUNT as i32 - 1) as usize]
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_textured(self) -> bool {
        self.index() >= PolyType::Atex.index()
    }

    pub fn is_perspective(self) -> bool {
        matches!(
            self,
            PolyType::Ptex | PolyType::PtexMask | PolyType::PtexLit | PolyType::PtexMaskLit
        )
    }

    pub fn is_masked(self) -> bool {
        matches!(
            self,
            PolyType::AtexMask | PolyType::PtexMask | PolyType::AtexMaskLit | PolyType::PtexMaskLit
        )
    }

    pub fn is_lit(self) -> bool {
        matches!(
            self,
            PolyType::AtexLit | PolyType::PtexLit | PolyType::AtexMaskLit | PolyType::PtexMaskLit
        )
    }

    /// Affine counterpart of a perspective mode.
    pub fn affine(self) -> Self {
        match self {
            PolyType::Ptex => PolyType::Atex,
            PolyType::PtexMask => PolyType::AtexMask,
            PolyType::PtexLit => PolyType::AtexLit,
            PolyType::PtexMaskLit => PolyType::AtexMaskLit,
            other => other,
        }
    }

    /// Interpolation flags for this mode on an indexed or truecolor target.
    pub fn interp_flags(self, truecolor: bool) -> InterpFlags {
        if truecolor {
            INTERP_TRUECOLOR[self.index()]
        } else {
            INTERP_PALETTE[self.index()]
        }
    }
}

impl From<i32> for PolyType {
    fn from(index: i32) -> Self {
        PolyType::from_index(index)
    }
}

const PTEX_FLAGS: InterpFlags = InterpFlags::Z
    .union(InterpFlags::FLOAT_UV)
    .union(InterpFlags::OPT_FLOAT_UV_TO_FIX);
const PTEX_LIT_FLAGS: InterpFlags = PTEX_FLAGS.union(InterpFlags::COL1);
const ATEX_LIT_FLAGS: InterpFlags = InterpFlags::FIX_UV.union(InterpFlags::COL1);

static INTERP_PALETTE: [InterpFlags; PolyType::COUNT] = [
    InterpFlags::FLAT,
    InterpFlags::COL1,
    InterpFlags::COL3,
    InterpFlags::FIX_UV,
    PTEX_FLAGS,
    InterpFlags::FIX_UV,
    PTEX_FLAGS,
    ATEX_LIT_FLAGS,
    PTEX_LIT_FLAGS,
    ATEX_LIT_FLAGS,
    PTEX_LIT_FLAGS,
];

static INTERP_TRUECOLOR: [InterpFlags; PolyType::COUNT] = [
    InterpFlags::FLAT,
    InterpFlags::COL3.union(InterpFlags::COLOR_TO_RGB),
    InterpFlags::COL3,
    InterpFlags::FIX_UV,
    PTEX_FLAGS,
    InterpFlags::FIX_UV,
    PTEX_FLAGS,
    ATEX_LIT_FLAGS,
    PTEX_LIT_FLAGS,
    ATEX_LIT_FLAGS,
    PTEX_LIT_FLAGS,
];

// ============================================================================
// Tests
// ============================================================================
