/// Abstract size, used for both source images and the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A point in either source or display space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point::new(0.0, 0.0);
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(f64::from(x), f64::from(y))
    }
}

/// Rectangle with origin and (possibly signed) extent.
///
/// Width and height are only negative while a drag is in progress; anything
/// stored as "the selection" has been through [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// True if width and height are both non-negative.
    #[inline]
    pub fn is_normalized(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    /// Half-open containment: the left/top edges are inside, right/bottom are not.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Snap each edge to the nearest whole unit.
    ///
    /// Edges are rounded, not the extent, so an edge that sits on a whole unit
    /// stays there whatever happens to the opposite one.
    #[inline]
    pub fn round(&self) -> Self {
        let left = self.x.round();
        let top = self.y.round();
        Self::new(left, top, self.right().round() - left, self.bottom().round() - top)
    }

    #[inline]
    pub fn normalize(&self) -> Self {
        normalize(*self)
    }
}

/// Flip negative extents so the rectangle covers the same region with width and height >= 0.
pub fn normalize(rect: Rect) -> Rect {
    let Rect {
        mut x,
        mut y,
        mut width,
        mut height,
    } = rect;

    if width < 0.0 {
        width = -width;
        x -= width;
    }
    if height < 0.0 {
        height = -height;
        y -= height;
    }

    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_flips_negative_width_and_height() {
        let r = normalize(Rect::new(100.0, 100.0, -50.0, -40.0));
        assert_eq!(r, Rect::new(50.0, 60.0, 50.0, 40.0));
    }

    #[test]
    fn normalize_keeps_positive_rect() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(normalize(r), r);
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            Rect::new(0.0, 0.0, -1.0, 0.0),
            Rect::new(10.0, -5.0, 0.0, -7.5),
            Rect::new(-3.0, 4.0, -2.0, 9.0),
            Rect::new(5.0, 5.0, 5.0, 5.0),
        ];

        for r in samples {
            let once = normalize(r);
            assert!(once.is_normalized());
            assert_eq!(normalize(once), once);
        }
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(29.9, 29.9)));
        assert!(!r.contains(Point::new(30.0, 15.0)));
        assert!(!r.contains(Point::new(15.0, 30.0)));
        assert!(!r.contains(Point::new(9.0, 15.0)));
    }

    #[test]
    fn round_snaps_edges_not_extent() {
        let r = Rect::new(102.5, 10.0, 197.5, 20.25).round();
        assert_eq!(r, Rect::new(103.0, 10.0, 197.0, 20.0));
        assert_eq!(r.right(), 300.0);

        let r = Rect::new(0.4, 0.6, 0.4, 0.3).round();
        assert_eq!(r, Rect::new(0.0, 1.0, 1.0, 0.0));
    }

    #[test]
    fn degenerate_extent() {
        assert!(Extent::new(0, 10).is_degenerate());
        assert!(Extent::new(10, 0).is_degenerate());
        assert!(!Extent::new(1, 1).is_degenerate());
    }
}
