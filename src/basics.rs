//! Geometry shared by the buffer and the rasterizer.

/// Integer rectangle, half open: `x1`/`y1` inclusive, `x2`/`y2` exclusive.
///
/// Used as the clip rectangle of a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectI {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl RectI {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Same area with the corners ordered.
    pub fn normalized(self) -> Self {
        Self {
            x1: self.x1.min(self.x2),
            y1: self.y1.min(self.y2),
            x2: self.x1.max(self.x2),
            y2: self.y1.max(self.y2),
        }
    }

    /// Overlap with `other`, or `None` when they share no pixel.
    pub fn intersect(self, other: &RectI) -> Option<RectI> {
        let r = Self {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        };
        (!r.is_empty()).then_some(r)
    }

    pub fn is_empty(&self) -> bool {
        self.x1 >= self.x2 || self.y1 >= self.y2
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.x1..self.x2).contains(&x) && (self.y1..self.y2).contains(&y)
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_half_open() {
        let r = RectI::new(0, 0, 10, 10);
        assert!(r.contains(0, 0));
        assert!(r.contains(9, 9));
        assert!(!r.contains(10, 5));
        assert!(!r.contains(5, 10));
        assert!(!r.contains(-1, 5));
    }

    #[test]
    fn test_intersect() {
        let r = RectI::new(-5, 2, 20, 8).intersect(&RectI::new(0, 0, 10, 10));
        assert_eq!(r, Some(RectI::new(0, 2, 10, 8)));
        assert_eq!(r.map(|r| (r.width(), r.height())), Some((10, 6)));
        assert_eq!(RectI::new(12, 0, 15, 4).intersect(&RectI::new(0, 0, 10, 10)), None);
    }

    #[test]
    fn test_normalized() {
        assert_eq!(RectI::new(8, 9, 1, 2).normalized(), RectI::new(1, 2, 8, 9));
    }
}
