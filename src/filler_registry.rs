//! Filler selection.
//!
//! Fillers are registered per (target format, polygon type, tier). The
//! rasterizer asks for its preferred tier and falls back to
//! [`FillerTier::Generic`], which the default registry populates for every
//! combination. Which tier is used never changes the pixels produced.

use std::collections::HashMap;

use crate::pixfmt::{Pix15, Pix16, Pix24, Pix32, Pix8, PixelFormat, PixelOps};
use crate::poly_type::PolyType;
use crate::span_filler::{atex, fill_dummy, gcol8, grgb, grgb8, ptex, ScanlineFiller};
use crate::span_filler_wide::{atex_lit_x4, grgb_x4};

// ============================================================================
// FillerTier
// ============================================================================

/// Implementation tier of a filler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillerTier {
    /// Portable per-pixel loops. Always available.
    #[default]
    Generic,
    /// Multi-pixel loops, registered for a subset of modes.
    Accelerated,
}

// ============================================================================
// FillerEntry
// ============================================================================

/// A registered filler.
#[derive(Clone, Copy)]
pub struct FillerEntry {
    pub filler: ScanlineFiller,
    /// Affine filler used when depth is constant across a span.
    pub alternative: Option<ScanlineFiller>,
    /// The mode is drawn with solid horizontal lines; `filler` is unused.
    pub draws_hline: bool,
}

impl FillerEntry {
    pub fn new(filler: ScanlineFiller) -> Self {
        Self {
            filler,
            alternative: None,
            draws_hline: false,
        }
    }

    pub fn hline() -> Self {
        Self {
            filler: fill_dummy,
            alternative: None,
            draws_hline: true,
        }
    }

    pub fn with_alternative(mut self, alt: ScanlineFiller) -> Self {
        self.alternative = Some(alt);
        self
    }
}

impl core::fmt::Debug for FillerEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FillerEntry")
            .field("filler", &(self.filler as usize as *const ()))
            .field("has_alternative", &self.alternative.is_some())
            .field("draws_hline", &self.draws_hline)
            .finish()
    }
}

// ============================================================================
// FillerRegistry
// ============================================================================

type Key = (PixelFormat, PolyType, FillerTier);

#[derive(Debug, Clone)]
pub struct FillerRegistry {
    entries: HashMap<Key, FillerEntry>,
}

impl FillerRegistry {
    /// Registry with no fillers.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry with the built-in fillers of both tiers.
    pub fn new() -> Self {
        let mut reg = Self::empty();
        reg.register_indexed();
        reg.register_truecolor::<Pix15>();
        reg.register_truecolor::<Pix16>();
        reg.register_truecolor::<Pix24>();
        reg.register_truecolor::<Pix32>();
        reg.register_wide::<Pix15>();
        reg.register_wide::<Pix16>();
        reg.register_wide::<Pix24>();
        reg.register_wide::<Pix32>();
        reg
    }

    /// Add or replace a filler. Returns the previous entry.
    pub fn register(
        &mut self,
        format: PixelFormat,
        ty: PolyType,
        tier: FillerTier,
        entry: FillerEntry,
    ) -> Option<FillerEntry> {
        self.entries.insert((format, ty, tier), entry)
    }

    /// Exact lookup, without fallback.
    pub fn get(&self, format: PixelFormat, ty: PolyType, tier: FillerTier) -> Option<&FillerEntry> {
        self.entries.get(&(format, ty, tier))
    }

    /// Filler for the preferred tier, else the generic one.
    pub fn lookup(
        &self,
        format: PixelFormat,
        ty: PolyType,
        preferred: FillerTier,
    ) -> Option<(FillerTier, FillerEntry)> {
        self.get(format, ty, preferred)
            .map(|e| (preferred, *e))
            .or_else(|| {
                self.get(format, ty, FillerTier::Generic)
                    .map(|e| (FillerTier::Generic, *e))
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn put(&mut self, format: PixelFormat, tier: FillerTier, ty: PolyType, entry: FillerEntry) {
        self.entries.insert((format, ty, tier), entry);
    }

    fn register_indexed(&mut self) {
        let f = PixelFormat::Indexed8;
        let t = FillerTier::Generic;
        self.put(f, t, PolyType::Flat, FillerEntry::hline());
        self.put(f, t, PolyType::Gcol, FillerEntry::new(gcol8));
        self.put(f, t, PolyType::Grgb, FillerEntry::new(grgb8));
        self.register_textured::<Pix8>();
    }

    fn register_truecolor<P: PixelOps>(&mut self) {
        let f = P::FORMAT;
        let t = FillerTier::Generic;
        self.put(f, t, PolyType::Flat, FillerEntry::hline());
        self.put(f, t, PolyType::Gcol, FillerEntry::new(grgb::<P>));
        self.put(f, t, PolyType::Grgb, FillerEntry::new(grgb::<P>));
        self.register_textured::<P>();
    }

    fn register_textured<P: PixelOps>(&mut self) {
        let f = P::FORMAT;
        let t = FillerTier::Generic;
        self.put(f, t, PolyType::Atex, FillerEntry::new(atex::<P, false, false>));
        self.put(
            f,
            t,
            PolyType::Ptex,
            FillerEntry::new(ptex::<P, false, false>).with_alternative(atex::<P, false, false>),
        );
        self.put(f, t, PolyType::AtexMask, FillerEntry::new(atex::<P, true, false>));
        self.put(
            f,
            t,
            PolyType::PtexMask,
            FillerEntry::new(ptex::<P, true, false>).with_alternative(atex::<P, true, false>),
        );
        self.put(f, t, PolyType::AtexLit, FillerEntry::new(atex::<P, false, true>));
        self.put(
            f,
            t,
            PolyType::PtexLit,
            FillerEntry::new(ptex::<P, false, true>).with_alternative(atex::<P, false, true>),
        );
        self.put(f, t, PolyType::AtexMaskLit, FillerEntry::new(atex::<P, true, true>));
        self.put(
            f,
            t,
            PolyType::PtexMaskLit,
            FillerEntry::new(ptex::<P, true, true>).with_alternative(atex::<P, true, true>),
        );
    }

    fn register_wide<P: PixelOps>(&mut self) {
        let f = P::FORMAT;
        let t = FillerTier::Accelerated;
        self.put(f, t, PolyType::Gcol, FillerEntry::new(grgb_x4::<P>));
        self.put(f, t, PolyType::Grgb, FillerEntry::new(grgb_x4::<P>));
        self.put(f, t, PolyType::AtexLit, FillerEntry::new(atex_lit_x4::<P, false>));
        self.put(
            f,
            t,
            PolyType::PtexLit,
            FillerEntry::new(ptex::<P, false, true>).with_alternative(atex_lit_x4::<P, false>),
        );
        self.put(f, t, PolyType::AtexMaskLit, FillerEntry::new(atex_lit_x4::<P, true>));
        self.put(
            f,
            t,
            PolyType::PtexMaskLit,
            FillerEntry::new(ptex::<P, true, true>).with_alternative(atex_lit_x4::<P, true>),
        );
    }
}

impl Default for FillerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_tier_complete() {
        let reg = FillerRegistry::new();
        for format in PixelFormat::ALL {
            for ty in PolyType::ALL {
                assert!(
                    reg.get(format, ty, FillerTier::Generic).is_some(),
                    "{format:?} {ty:?}"
                );
            }
        }
    }

    #[test]
    fn test_perspective_modes_have_alternative() {
        let reg = FillerRegistry::new();
        for format in PixelFormat::ALL {
            for ty in PolyType::ALL {
                let (_, e) = reg.lookup(format, ty, FillerTier::Accelerated).unwrap();
                assert_eq!(e.alternative.is_some(), ty.is_perspective(), "{format:?} {ty:?}");
                assert_eq!(e.draws_hline, ty == PolyType::Flat);
            }
        }
    }

    #[test]
    fn test_lookup_falls_back_to_generic() {
        let reg = FillerRegistry::new();
        let (tier, _) = reg
            .lookup(PixelFormat::Argb8888, PolyType::Grgb, FillerTier::Accelerated)
            .unwrap();
        assert_eq!(tier, FillerTier::Accelerated);

        let (tier, _) = reg
            .lookup(PixelFormat::Argb8888, PolyType::Atex, FillerTier::Accelerated)
            .unwrap();
        assert_eq!(tier, FillerTier::Generic);

        let (tier, _) = reg
            .lookup(PixelFormat::Indexed8, PolyType::Grgb, FillerTier::Accelerated)
            .unwrap();
        assert_eq!(tier, FillerTier::Generic);
    }

    #[test]
    fn test_register_replaces() {
        let mut reg = FillerRegistry::empty();
        assert!(reg.is_empty());
        let key = (PixelFormat::Rgb565, PolyType::Atex, FillerTier::Generic);
        assert!(reg.register(key.0, key.1, key.2, FillerEntry::hline()).is_none());
        let prev = reg.register(key.0, key.1, key.2, FillerEntry::new(fill_dummy));
        assert!(prev.unwrap().draws_hline);
        assert_eq!(reg.len(), 1);
        assert!(reg.lookup(PixelFormat::Rgb888, PolyType::Atex, FillerTier::Generic).is_none());
    }
}
