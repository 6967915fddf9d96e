//! Snooker ball data: kinds, values, spots, and layout positions.

use std::fmt;
use std::str::FromStr;

use baize_engine::{keys, Rgba};
use glam::Vec2;
use rand::Rng;
use thiserror::Error;

use crate::table::{BALL_DIAMETER, BALL_RADIUS, CENTRE_Y, LAYOUT_BOUNDS, TABLE_LENGTH, TABLE_ORIGIN};

pub const RED_COUNT: usize = 15;
pub const RED_VALUE: i32 = 1;

/// The six coloured balls, in ascending value order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Colour {
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
}

impl Colour {
    pub const ALL: [Colour; 6] = [
        Colour::Yellow,
        Colour::Green,
        Colour::Brown,
        Colour::Blue,
        Colour::Pink,
        Colour::Black,
    ];

    pub fn value(self) -> i32 {
        match self {
            Colour::Yellow => 2,
            Colour::Green => 3,
            Colour::Brown => 4,
            Colour::Blue => 5,
            Colour::Pink => 6,
            Colour::Black => 7,
        }
    }

    /// Canonical spot: initial placement and where a potted colour returns.
    pub fn spot(self) -> Vec2 {
        let baulk = TABLE_ORIGIN.x + TABLE_LENGTH / 5.0;
        match self {
            Colour::Yellow => Vec2::new(baulk, 185.0),
            Colour::Green => Vec2::new(baulk, 335.0),
            Colour::Brown => Vec2::new(baulk, CENTRE_Y),
            Colour::Blue => Vec2::new(TABLE_ORIGIN.x + TABLE_LENGTH / 2.0, CENTRE_Y),
            Colour::Pink => Vec2::new(750.0, CENTRE_Y),
            Colour::Black => Vec2::new(TABLE_ORIGIN.x + TABLE_LENGTH - TABLE_LENGTH / 12.0, CENTRE_Y),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Colour::Yellow => "Yellow Ball",
            Colour::Green => "Green Ball",
            Colour::Brown => "Brown Ball",
            Colour::Blue => "Blue Ball",
            Colour::Pink => "Pink Ball",
            Colour::Black => "Black Ball",
        }
    }

    pub fn rgba(self) -> Rgba {
        match self {
            Colour::Yellow => Rgba::rgb8(255, 255, 0),
            Colour::Green => Rgba::rgb8(0, 128, 0),
            Colour::Brown => Rgba::rgb8(150, 75, 0),
            Colour::Blue => Rgba::rgb8(70, 0, 255),
            Colour::Pink => Rgba::rgb8(241, 156, 187),
            Colour::Black => Rgba::rgb8(0, 0, 0),
        }
    }
}

/// Object ball identity. The cue ball is not an object ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BallKind {
    Red,
    Colour(Colour),
}

impl BallKind {
    pub fn value(self) -> i32 {
        match self {
            BallKind::Red => RED_VALUE,
            BallKind::Colour(c) => c.value(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BallKind::Red => "Red Ball",
            BallKind::Colour(c) => c.label(),
        }
    }

    pub fn rgba(self) -> Rgba {
        match self {
            BallKind::Red => Rgba::rgb8(200, 0, 0),
            BallKind::Colour(c) => c.rgba(),
        }
    }

    pub fn is_red(self) -> bool {
        matches!(self, BallKind::Red)
    }
}

/// How the object balls are set out at the start of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Triangle rack of reds, colours on their spots.
    Standard,
    /// Reds scattered, colours on their spots.
    PartiallyOrdered,
    /// Everything scattered.
    Random,
}

impl LayoutMode {
    pub fn name(self) -> &'static str {
        match self {
            LayoutMode::Standard => "standard",
            LayoutMode::PartiallyOrdered => "unordered",
            LayoutMode::Random => "random",
        }
    }

    /// Mode bound to a number key, if any.
    pub fn from_key(key_code: u32) -> Option<Self> {
        match key_code {
            keys::DIGIT_1 => Some(LayoutMode::Standard),
            keys::DIGIT_2 => Some(LayoutMode::PartiallyOrdered),
            keys::DIGIT_3 => Some(LayoutMode::Random),
            _ => None,
        }
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown layout mode '{0}'")]
pub struct UnknownLayout(pub String);

impl FromStr for LayoutMode {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(LayoutMode::Standard),
            "unordered" | "partially_ordered" | "partially-ordered" => Ok(LayoutMode::PartiallyOrdered),
            "random" => Ok(LayoutMode::Random),
            _ => Err(UnknownLayout(s.to_string())),
        }
    }
}

/// Triangle rack of the reds.
///
/// The apex sits one ball diameter beyond the pink spot. Row `i` (1..=5)
/// holds `i` reds, rows step away from the apex by `radius + 7`, and reds in
/// a row are two diameters apart, centred on the long axis.
pub fn rack_positions() -> [Vec2; RED_COUNT] {
    let apex_x = Colour::Pink.spot().x + BALL_DIAMETER;
    let row_step = BALL_RADIUS + 7.0;
    let in_row = 2.0 * BALL_DIAMETER;

    let mut positions = [Vec2::ZERO; RED_COUNT];
    let mut n = 0;
    for row in 1..=5usize {
        let x = apex_x + row as f32 * row_step;
        let first_y = CENTRE_Y - (row - 1) as f32 * in_row / 2.0;
        for j in 0..row {
            positions[n] = Vec2::new(x, first_y + j as f32 * in_row);
            n += 1;
        }
    }
    positions
}

/// Every object ball and where it starts for `mode`.
pub fn layout_positions(mode: LayoutMode, rng: &mut impl Rng) -> Vec<(BallKind, Vec2)> {
    let mut out = Vec::with_capacity(RED_COUNT + Colour::ALL.len());
    match mode {
        LayoutMode::Standard => {
            out.extend(rack_positions().into_iter().map(|p| (BallKind::Red, p)));
        }
        LayoutMode::PartiallyOrdered | LayoutMode::Random => {
            out.extend((0..RED_COUNT).map(|_| (BallKind::Red, LAYOUT_BOUNDS.sample(rng))));
        }
    }
    for colour in Colour::ALL {
        let pos = match mode {
            LayoutMode::Random => LAYOUT_BOUNDS.sample(rng),
            _ => colour.spot(),
        };
        out.push((BallKind::Colour(colour), pos));
    }
    out
}
