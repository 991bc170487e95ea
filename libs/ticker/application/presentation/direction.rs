//! Sign-based direction indicator
//!
//! Derived from the current value only, recomputed on every render.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn from_value(value: f64) -> Self {
        if value > 0.0 {
            Direction::Up
        } else if value < 0.0 {
            Direction::Down
        } else {
            Direction::Flat
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
            Direction::Flat => "•",
        }
    }
}
