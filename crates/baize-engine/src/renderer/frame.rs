//! Per-tick draw list.
//!
//! The engine never touches a canvas. Each tick the game fills a [`Frame`]
//! with shape commands in world units; the host serialises it to JSON and
//! paints it however it likes.
//!
//! ```ignore
//! let frame = &mut ctx.frame;
//! frame.circle(Vec2::new(310.0, 260.0), 5.5, Rgba::WHITE);
//! frame.text("Score: 12", Vec2::new(10.0, 30.0), 18.0, Rgba::WHITE);
//! let json = frame.to_json()?;
//! ```

use glam::Vec2;
use serde::Serialize;

/// RGBA colour with components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque colour from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Fully opaque colour from 0-255 channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Same colour with alpha taken from a 0-255 fade level.
    pub fn with_alpha8(self, alpha: u8) -> Self {
        Self {
            a: alpha as f32 / 255.0,
            ..self
        }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
}

/// One drawing command. Positions are world units, y down.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Circle {
        center: [f32; 2],
        radius: f32,
        fill: Rgba,
    },
    Polygon {
        points: Vec<[f32; 2]>,
        fill: Rgba,
    },
    Rect {
        origin: [f32; 2],
        size: [f32; 2],
        fill: Rgba,
    },
    Line {
        from: [f32; 2],
        to: [f32; 2],
        width: f32,
        color: Rgba,
    },
    Text {
        text: String,
        position: [f32; 2],
        size: f32,
        color: Rgba,
    },
    /// Filled gauge. `percent` is 0-100; `tier` is a free-form label the host
    /// maps to styling.
    PowerBar {
        origin: [f32; 2],
        size: [f32; 2],
        percent: u32,
        tier: String,
        color: Rgba,
    },
}

/// Draw list for a single tick. Commands are painted in push order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, fill: Rgba) {
        self.push(DrawCommand::Circle {
            center: center.to_array(),
            radius,
            fill,
        });
    }

    pub fn polygon(&mut self, points: &[Vec2], fill: Rgba) {
        self.push(DrawCommand::Polygon {
            points: points.iter().map(|p| p.to_array()).collect(),
            fill,
        });
    }

    pub fn rect(&mut self, origin: Vec2, size: Vec2, fill: Rgba) {
        self.push(DrawCommand::Rect {
            origin: origin.to_array(),
            size: size.to_array(),
            fill,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.push(DrawCommand::Line {
            from: from.to_array(),
            to: to.to_array(),
            width,
            color,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, position: Vec2, size: f32, color: Rgba) {
        self.push(DrawCommand::Text {
            text: text.into(),
            position: position.to_array(),
            size,
            color,
        });
    }

    pub fn power_bar(
        &mut self,
        origin: Vec2,
        size: Vec2,
        percent: u32,
        tier: impl Into<String>,
        color: Rgba,
    ) {
        self.push(DrawCommand::PowerBar {
            origin: origin.to_array(),
            size: size.to_array(),
            percent: percent.min(100),
            tier: tier.into(),
            color,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text commands, in push order. Handy for asserting on HUD output.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
