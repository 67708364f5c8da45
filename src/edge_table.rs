//! Reusable edge storage.
//!
//! Polygon edges live in one contiguous buffer and refer to each other by
//! index. The buffer grows to the largest polygon seen and never shrinks,
//! so steady-state drawing does not allocate.

use crate::edge::PolygonEdge;

// ============================================================================
// EdgeTable
// ============================================================================

/// Scratch arena for the edges of one polygon at a time.
#[derive(Debug, Clone, Default)]
pub struct EdgeTable {
    edges: Vec<PolygonEdge>,
}

impl EdgeTable {
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    /// Slots for `count` edges. Contents are left over from earlier
    /// polygons; callers overwrite every slot they read.
    pub fn allocate(&mut self, count: usize) -> &mut [PolygonEdge] {
        if count > self.edges.len() {
            // Round up to 16 edges to reduce reallocations.
            let new_size = (count + 15) & !15;
            self.edges.resize(new_size, PolygonEdge::default());
        }
        &mut self.edges[..count]
    }

    /// Number of edge slots currently held.
    pub fn capacity(&self) -> usize {
        self.edges.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_empty() {
        assert_eq!(EdgeTable::new().capacity(), 0);
    }

    #[test]
    fn test_allocate_grows_aligned() {
        let mut t = EdgeTable::new();
        assert_eq!(t.allocate(3).len(), 3);
        assert_eq!(t.capacity(), 16);
        assert_eq!(t.allocate(17).len(), 17);
        assert_eq!(t.capacity(), 32);
    }

    #[test]
    fn test_never_shrinks() {
        let mut t = EdgeTable::new();
        t.allocate(40);
        t.allocate(4)[0].top = 7;
        assert_eq!(t.capacity(), 48);
        assert_eq!(t.allocate(4)[0].top, 7);
    }
}
