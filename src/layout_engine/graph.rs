use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum_macros::Display, strum_macros::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    /// Children are laid out side by side.
    #[default]
    Horizontal,
    /// Children are stacked top to bottom.
    Vertical,
}

/// The layout algorithms a screen can be tiled with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(strum_macros::Display, strum_macros::EnumString, strum_macros::EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LayoutKind {
    /// Master area on the left, the rest stacked on the right.
    #[default]
    Half,
    /// Master area on the left, the rest in a square-ish grid.
    Grid,
    /// Every new tile takes half of the previous one.
    Spiral,
    /// Equal-width full-height columns.
    Blade,
    /// Manual splits driven by the tile under the cursor.
    I3,
}

impl LayoutKind {
    /// The kind after `self` in `enabled`, wrapping around. Falls back to the
    /// first enabled kind when `self` is not in the list.
    pub fn next_in(self, enabled: &[LayoutKind]) -> Option<LayoutKind> {
        let pos = enabled.iter().position(|&k| k == self);
        match pos {
            Some(pos) => enabled.get((pos + 1) % enabled.len()).copied(),
            None => enabled.first().copied(),
        }
    }

    pub fn prev_in(self, enabled: &[LayoutKind]) -> Option<LayoutKind> {
        let pos = enabled.iter().position(|&k| k == self);
        match pos {
            Some(pos) => enabled.get((pos + enabled.len() - 1) % enabled.len()).copied(),
            None => enabled.last().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn names_round_trip_through_strings() {
        for kind in LayoutKind::iter() {
            assert_eq!(LayoutKind::from_str(&kind.to_string()).unwrap(), kind);
        }
        assert_eq!(LayoutKind::I3.to_string(), "i3");
        assert_eq!(Orientation::from_str("vertical").unwrap(), Orientation::Vertical);
    }

    #[test]
    fn cycling_wraps_around() {
        let enabled = [LayoutKind::Half, LayoutKind::Spiral, LayoutKind::Blade];
        assert_eq!(LayoutKind::Half.next_in(&enabled), Some(LayoutKind::Spiral));
        assert_eq!(LayoutKind::Blade.next_in(&enabled), Some(LayoutKind::Half));
        assert_eq!(LayoutKind::Half.prev_in(&enabled), Some(LayoutKind::Blade));
        assert_eq!(LayoutKind::Grid.next_in(&enabled), Some(LayoutKind::Half));
        assert_eq!(LayoutKind::Grid.prev_in(&enabled), Some(LayoutKind::Blade));
        assert_eq!(LayoutKind::Grid.next_in(&[]), None);
    }
}
