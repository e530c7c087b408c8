//! Rectangle math shared by every layout.
//!
//! All functions are pure. Coordinates are `f64` so that rotated layouts can
//! carry half-pixel origins without losing exactness; layouts themselves only
//! ever produce whole-pixel sizes.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Point { x, y } }
}

/// Axis-aligned rectangle. Width and height are never negative once built
/// through [`Rect::from_edges`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

bitflags! {
    /// Edges of a rectangle, used to remember which sides sit on the screen border.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct Edges: u8 {
        const LEFT   = 1 << 0;
        const TOP    = 1 << 1;
        const RIGHT  = 1 << 2;
        const BOTTOM = 1 << 3;
    }
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    /// Builds a rectangle from its four edge coordinates. Inverted edges
    /// collapse to a zero size instead of going negative.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Rect {
            x: left,
            y: top,
            width: (right - left).max(0.0),
            height: (bottom - top).max(0.0),
        }
    }

    pub fn from_corners(a: Point, b: Point) -> Self {
        Rect::from_edges(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
    }

    pub fn left(&self) -> f64 { self.x }

    pub fn top(&self) -> f64 { self.y }

    pub fn right(&self) -> f64 { self.x + self.width }

    pub fn bottom(&self) -> f64 { self.y + self.height }

    pub fn origin(&self) -> Point { Point::new(self.x, self.y) }

    pub fn max(&self) -> Point { Point::new(self.right(), self.bottom()) }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 { self.width * self.height }

    pub fn is_empty(&self) -> bool { self.width <= 0.0 || self.height <= 0.0 }

    /// The overlapping part of two rectangles.
    ///
    /// Returns `None` when the ranges on either axis are disjoint. Rectangles
    /// that merely touch produce a zero-area intersection, not `None`.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());
        if left > right || top > bottom {
            return None;
        }
        Some(Rect::from_edges(left, top, right, bottom))
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_edges(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        (self.left()..=self.right()).contains(&point.x)
            && (self.top()..=self.bottom()).contains(&point.y)
    }

    pub fn contains_rect(&self, other: Rect) -> bool {
        self.left() <= other.left()
            && self.top() <= other.top()
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    /// True when the rectangles share interior area (touching is not overlapping).
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.intersection(other).is_some_and(|r| !r.is_empty())
    }

    /// Shrinks each side by the given amount. Negative amounts grow the rectangle.
    pub fn inset(&self, left: f64, top: f64, right: f64, bottom: f64) -> Rect {
        Rect::from_edges(
            self.left() + left,
            self.top() + top,
            self.right() - right,
            self.bottom() - bottom,
        )
    }

    /// Which of our edges lie exactly on the matching edge of `area`.
    pub fn edges_on(&self, area: &Rect) -> Edges {
        let mut edges = Edges::empty();
        edges.set(Edges::LEFT, self.left().same_as(area.left()));
        edges.set(Edges::TOP, self.top().same_as(area.top()));
        edges.set(Edges::RIGHT, self.right().same_as(area.right()));
        edges.set(Edges::BOTTOM, self.bottom().same_as(area.bottom()));
        edges
    }
}

pub trait Round {
    fn round(&self) -> Self;
}

impl Round for Rect {
    fn round(&self) -> Self {
        let min = self.origin().round();
        let max = self.max().round();
        Rect::from_edges(min.x, min.y, max.x, max.y)
    }
}

impl Round for Point {
    fn round(&self) -> Self { Point::new(self.x.round(), self.y.round()) }
}

pub trait IsWithin {
    fn is_within(&self, how_much: f64, other: Self) -> bool;
}

impl IsWithin for Rect {
    fn is_within(&self, how_much: f64, other: Self) -> bool {
        self.origin().is_within(how_much, other.origin())
            && self.width.is_within(how_much, other.width)
            && self.height.is_within(how_much, other.height)
    }
}

impl IsWithin for Point {
    fn is_within(&self, how_much: f64, other: Self) -> bool {
        self.x.is_within(how_much, other.x) && self.y.is_within(how_much, other.y)
    }
}

impl IsWithin for f64 {
    fn is_within(&self, how_much: f64, other: Self) -> bool { (self - other).abs() < how_much }
}

pub trait SameAs: IsWithin + Sized {
    fn same_as(&self, other: Self) -> bool { self.is_within(0.1, other) }
}

impl SameAs for Rect {}
impl SameAs for Point {}
impl SameAs for f64 {}
