//! Inclusive screen areas
//!
//! A flush request names the pixels it covers by their first and last
//! coordinates on each axis, both inclusive. `x2 - x1 + 1` is therefore the
//! width, which is the quantity the panel's address window and pixel count
//! are derived from.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::primitives::Rectangle;

/// Rectangular screen region with inclusive corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    /// First column
    pub x1: u16,
    /// First row
    pub y1: u16,
    /// Last column (inclusive)
    pub x2: u16,
    /// Last row (inclusive)
    pub y2: u16,
}

impl Area {
    /// Create an area from its inclusive corners
    pub const fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Area covering a whole screen of the given size
    ///
    /// `size` must be non-zero on both axes.
    pub const fn full_screen(size: Size) -> Self {
        Self::new(0, 0, size.width as u16 - 1, size.height as u16 - 1)
    }

    /// Whether the corners are ordered (x1 <= x2, y1 <= y2)
    pub const fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Width in pixels, 0 when `x1 > x2`
    pub const fn width(&self) -> u32 {
        if self.x1 > self.x2 {
            0
        } else {
            (self.x2 - self.x1) as u32 + 1
        }
    }

    /// Height in pixels, 0 when `y1 > y2`
    pub const fn height(&self) -> u32 {
        if self.y1 > self.y2 {
            0
        } else {
            (self.y2 - self.y1) as u32 + 1
        }
    }

    /// Number of pixels in the area
    pub const fn pixel_count(&self) -> usize {
        (self.width() * self.height()) as usize
    }

    /// Convert from an embedded-graphics rectangle
    ///
    /// Returns `None` for zero-sized rectangles and for rectangles lying
    /// entirely at negative coordinates. Negative parts are cut off.
    pub fn from_rectangle(rect: &Rectangle) -> Option<Self> {
        let bottom_right = rect.bottom_right()?;
        if bottom_right.x < 0 || bottom_right.y < 0 {
            return None;
        }
        let top_left = rect.top_left;
        let clamp = |v: i32| v.clamp(0, u16::MAX as i32) as u16;
        Some(Self::new(
            clamp(top_left.x),
            clamp(top_left.y),
            clamp(bottom_right.x),
            clamp(bottom_right.y),
        ))
    }

    /// Convert to an embedded-graphics rectangle
    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle::new(
            Point::new(self.x1 as i32, self.y1 as i32),
            Size::new(self.width(), self.height()),
        )
    }

    /// Whether `point` lies inside the area
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x1 as i32
            && point.x <= self.x2 as i32
            && point.y >= self.y1 as i32
            && point.y <= self.y2 as i32
    }

    /// Overlapping part of two areas
    pub fn intersection(&self, other: &Area) -> Option<Area> {
        let area = Area::new(
            self.x1.max(other.x1),
            self.y1.max(other.y1),
            self.x2.min(other.x2),
            self.y2.min(other.y2),
        );
        area.is_valid().then_some(area)
    }

    /// Smallest area containing both
    pub fn union(&self, other: &Area) -> Area {
        Area::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// Whether the areas overlap or share an edge
    pub fn touches(&self, other: &Area) -> bool {
        self.x1 as u32 <= other.x2 as u32 + 1
            && other.x1 as u32 <= self.x2 as u32 + 1
            && self.y1 as u32 <= other.y2 as u32 + 1
            && other.y1 as u32 <= self.y2 as u32 + 1
    }

    /// Clip the area to a screen of `size`
    pub fn clip_to(&self, size: Size) -> Option<Area> {
        if size.width == 0 || size.height == 0 {
            return None;
        }
        self.intersection(&Area::full_screen(size))
    }

    /// Split the area into horizontal strips of at most `lines` rows
    ///
    /// Strips are returned top to bottom and cover the area exactly.
    pub fn rows(&self, lines: u16) -> AreaRows {
        AreaRows {
            area: *self,
            lines: lines.max(1),
            next_y: Some(self.y1),
        }
    }
}

/// Iterator over horizontal strips of an [`Area`]
#[derive(Debug, Clone)]
pub struct AreaRows {
    area: Area,
    lines: u16,
    next_y: Option<u16>,
}

impl Iterator for AreaRows {
    type Item = Area;

    fn next(&mut self) -> Option<Area> {
        let y1 = self.next_y?;
        let y2 = y1.saturating_add(self.lines - 1).min(self.area.y2);
        self.next_y = if y2 >= self.area.y2 { None } else { Some(y2 + 1) };
        Some(Area::new(self.area.x1, y1, self.area.x2, y2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dimensions_are_inclusive() {
        let area = Area::new(0, 0, 127, 9);
        assert_eq!(area.width(), 128);
        assert_eq!(area.height(), 10);
        assert_eq!(area.pixel_count(), 1280);

        let single = Area::new(5, 5, 5, 5);
        assert_eq!(single.pixel_count(), 1);
    }

    #[test]
    fn test_inverted_area_is_empty() {
        let area = Area::new(5, 0, 3, 0);
        assert!(!area.is_valid());
        assert_eq!(area.width(), 0);
        assert_eq!(area.height(), 1);
        assert_eq!(area.pixel_count(), 0);
        assert_eq!(Area::new(0, 9, 0, 2).height(), 0);
    }

    #[test]
    fn test_rectangle_conversion() {
        let rect = Rectangle::new(Point::new(10, 20), Size::new(30, 5));
        let area = Area::from_rectangle(&rect).unwrap();
        assert_eq!(area, Area::new(10, 20, 39, 24));
        assert_eq!(area.to_rectangle(), rect);

        // Zero-sized and fully negative rectangles have no area
        assert!(Area::from_rectangle(&Rectangle::zero()).is_none());
        let off = Rectangle::new(Point::new(-20, -20), Size::new(5, 5));
        assert!(Area::from_rectangle(&off).is_none());

        // Partially negative is cut at zero
        let partial = Rectangle::new(Point::new(-3, 2), Size::new(5, 1));
        assert_eq!(Area::from_rectangle(&partial), Some(Area::new(0, 2, 1, 2)));
    }

    #[test]
    fn test_intersection_and_union() {
        let a = Area::new(0, 0, 9, 9);
        let b = Area::new(5, 5, 14, 14);
        assert_eq!(a.intersection(&b), Some(Area::new(5, 5, 9, 9)));
        assert_eq!(a.union(&b), Area::new(0, 0, 14, 14));

        let far = Area::new(20, 20, 30, 30);
        assert_eq!(a.intersection(&far), None);
        assert!(!a.touches(&far));

        // Adjacent areas touch but do not intersect
        let right = Area::new(10, 0, 12, 9);
        assert!(a.touches(&right));
        assert_eq!(a.intersection(&right), None);
    }

    #[test]
    fn test_clip_to_screen() {
        let screen = Size::new(128, 160);
        let area = Area::new(100, 150, 200, 300);
        assert_eq!(area.clip_to(screen), Some(Area::new(100, 150, 127, 159)));
        assert_eq!(Area::new(128, 0, 130, 5).clip_to(screen), None);
        assert_eq!(area.clip_to(Size::zero()), None);
    }

    #[test]
    fn test_rows_split() {
        let area = Area::new(0, 0, 127, 159);
        let strips: heapless::Vec<Area, 32> = area.rows(10).collect();
        assert_eq!(strips.len(), 16);
        assert_eq!(strips[0], Area::new(0, 0, 127, 9));
        assert_eq!(strips[15], Area::new(0, 150, 127, 159));

        // Remainder strip is shorter
        let strips: heapless::Vec<Area, 8> = Area::new(3, 4, 10, 8).rows(2).collect();
        assert_eq!(strips.len(), 3);
        assert_eq!(strips[2], Area::new(3, 8, 10, 8));
    }

    #[test]
    fn test_rows_at_coordinate_limit() {
        let area = Area::new(0, u16::MAX - 1, 0, u16::MAX);
        let strips: heapless::Vec<Area, 4> = area.rows(10).collect();
        assert_eq!(strips.len(), 1);
        assert_eq!(strips[0], area);
    }

    fn arb_area() -> impl Strategy<Value = Area> {
        (0u16..200, 0u16..200, 0u16..60, 0u16..60)
            .prop_map(|(x, y, w, h)| Area::new(x, y, x + w, y + h))
    }

    proptest! {
        #[test]
        fn rows_cover_area_exactly(area in arb_area(), lines in 1u16..24) {
            let mut expected_y = area.y1;
            let mut pixels = 0usize;
            for strip in area.rows(lines) {
                prop_assert_eq!(strip.y1, expected_y);
                prop_assert_eq!(strip.x1, area.x1);
                prop_assert_eq!(strip.x2, area.x2);
                prop_assert!(strip.height() <= lines as u32);
                pixels += strip.pixel_count();
                expected_y = strip.y2 + 1;
            }
            prop_assert_eq!(expected_y, area.y2 + 1);
            prop_assert_eq!(pixels, area.pixel_count());
        }

        #[test]
        fn union_contains_both(a in arb_area(), b in arb_area()) {
            let u = a.union(&b);
            prop_assert_eq!(u.intersection(&a), Some(a));
            prop_assert_eq!(u.intersection(&b), Some(b));
        }
    }
}
