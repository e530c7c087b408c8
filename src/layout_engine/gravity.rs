//! Rotating layouts so that every algorithm can assume bottom gravity.
//!
//! A layout with gravity other than [`Gravity::Bottom`] rotates its screen and
//! tiles into "bottom" space, runs the layout math, and rotates the result
//! back. Rotation happens around the screen centre, so rotated coordinates may
//! land on half pixels; those are exact in `f64` and come back as whole pixels.

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::sys::geometry::{Point, Rect};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(IntoPrimitive, TryFromPrimitive)]
#[derive(strum_macros::Display, strum_macros::EnumString, strum_macros::EnumIter)]
#[repr(u8)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Gravity {
    #[default]
    Bottom = 0,
    Right = 1,
    Top = 2,
    Left = 3,
}

impl Gravity {
    pub fn quarter_turns(self) -> u8 { self.into() }

    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Gravity::Bottom,
            1 => Gravity::Right,
            2 => Gravity::Top,
            _ => Gravity::Left,
        }
    }

    pub fn rotated_cw(self) -> Self { Self::from_quarter_turns(self.quarter_turns() + 1) }

    pub fn rotated_ccw(self) -> Self { Self::from_quarter_turns(self.quarter_turns() + 3) }
}

/// A clockwise rotation by a number of quarter turns around a fixed centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    quarter_turns: u8,
    center: Point,
}

impl Rotation {
    pub fn around(area: Rect, quarter_turns: u8) -> Self {
        Rotation {
            quarter_turns: quarter_turns % 4,
            center: area.center(),
        }
    }

    pub fn quarter_turns(&self) -> u8 { self.quarter_turns }

    pub fn is_identity(&self) -> bool { self.quarter_turns == 0 }

    pub fn inverse(&self) -> Self {
        Rotation {
            quarter_turns: (4 - self.quarter_turns) % 4,
            center: self.center,
        }
    }

    pub fn apply_point(&self, p: Point) -> Point {
        let Point { x: cx, y: cy } = self.center;
        let (dx, dy) = (p.x - cx, p.y - cy);
        // y grows downwards, so (1, 0) -> (0, 1) is a clockwise turn.
        let (dx, dy) = match self.quarter_turns {
            0 => (dx, dy),
            1 => (-dy, dx),
            2 => (-dx, -dy),
            _ => (dy, -dx),
        };
        Point::new(cx + dx, cy + dy)
    }

    pub fn apply(&self, rect: Rect) -> Rect {
        if self.is_identity() {
            return rect;
        }
        Rect::from_corners(self.apply_point(rect.origin()), self.apply_point(rect.max()))
    }
}
