//! Plain geometry types used by the indicator state machine.
//!
//! All values are in host units. The terminal renderer treats one unit as one
//! column horizontally; other hosts can pick their own scale.

use crate::animation::Lerp;
use serde::{Deserialize, Serialize};

/// Width and height of a container
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The same size with its axes swapped
    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

/// Device orientation derived from a container size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Landscape when wider than tall, portrait otherwise
    pub fn of(size: Size) -> Self {
        if size.width > size.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub const ZERO: Frame = Frame {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }
}

impl Lerp for Frame {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        Frame {
            x: self.x.lerp(&to.x, t),
            y: self.y.lerp(&to.y, t),
            width: self.width.lerp(&to.width, t),
            height: self.height.lerp(&to.height, t),
        }
    }
}

impl Lerp for Size {
    fn lerp(&self, to: &Self, t: f64) -> Self {
        Size {
            width: self.width.lerp(&to.width, t),
            height: self.height.lerp(&to.height, t),
        }
    }
}
