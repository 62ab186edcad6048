//! Stars and their colors
//!
//! A logical star exists once as a *master* in the home quadrant and once more
//! as a *replica* in every neighboring quadrant. Replicas never own their
//! master: they hold its [`StarId`] and the field resolves it.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::quadrant::QuadrantId;
use crate::core::error::{ChartError, Result};

/// Arena index of a star inside one [`super::SkyField`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StarId(pub usize);

impl fmt::Display for StarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position in global tile-space coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub w: f64,
    pub h: f64,
}

impl Point {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Euclidean distance
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.w - other.w).powi(2) + (self.h - other.h).powi(2)).sqrt()
    }

    pub fn offset(&self, by: &Point) -> Point {
        Point::new(self.w + by.w, self.h + by.h)
    }

    /// Mean of a set of points, `None` when empty
    pub fn centroid<I: IntoIterator<Item = Point>>(points: I) -> Option<Point> {
        let mut count = 0usize;
        let mut sum = Point::default();
        for p in points {
            sum.w += p.w;
            sum.h += p.h;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        Some(Point::new(sum.w / count as f64, sum.h / count as f64))
    }

    /// Polar angle of `self` around `center`, in degrees (-180, 180]
    pub fn angle_around(&self, center: &Point) -> f64 {
        (self.h - center.h).atan2(self.w - center.w).to_degrees()
    }
}

// =============================================================================
// Colors
// =============================================================================

/// An RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Rgba {
    /// Parse `#RRGGBB` or `#RRGGBBAA`
    pub fn parse(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#')?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self {
            red: channel(0)?,
            green: channel(2)?,
            blue: channel(4)?,
            alpha: if hex.len() == 8 { channel(6)? } else { 0xFF },
        })
    }

    pub fn to_hex(&self) -> String {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

/// The color reference carried by a star
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StarColor {
    /// A fixed color
    Rgba(Rgba),
    /// A B-V color index, resolved to a color by the renderer
    ColorIndex(f64),
}

/// How the star field assigns colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorMode {
    Fixed(Rgba),
    RandomColorIndex,
}

impl ColorMode {
    pub const RANDOM_COLOR_INDEX: &'static str = "random_color_index";

    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text == Self::RANDOM_COLOR_INDEX {
            return Ok(ColorMode::RandomColorIndex);
        }
        Rgba::parse(text)
            .map(ColorMode::Fixed)
            .ok_or_else(|| ChartError::configuration(format!("invalid star color: {}", text)))
    }
}

// =============================================================================
// Star
// =============================================================================

/// Whether a star is the canonical instance or a positional copy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StarKind {
    /// Originally generated; `base` is relative to the home quadrant origin
    Master { base: Point },
    /// Copy of `master` placed in a neighboring quadrant
    Replica { master: StarId },
}

/// A point light source
#[derive(Debug, Clone)]
pub struct Star {
    pub id: StarId,
    /// Global position: base offset plus quadrant origin
    pub position: Point,
    pub size: f64,
    pub color: StarColor,
    pub quadrant: QuadrantId,
    pub kind: StarKind,
    pub(crate) taken: bool,
    pub(crate) constellation: Option<usize>,
}

impl Star {
    pub fn is_master(&self) -> bool {
        matches!(self.kind, StarKind::Master { .. })
    }

    /// Id of the master of this star's peer group (itself for masters)
    pub fn master_id(&self) -> StarId {
        match self.kind {
            StarKind::Master { .. } => self.id,
            StarKind::Replica { master } => master,
        }
    }

    pub fn is_taken(&self) -> bool {
        self.taken
    }

    /// Index of the constellation this exact star instance was added to
    pub fn constellation(&self) -> Option<usize> {
        self.constellation
    }
}

impl fmt::Display for Star {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Star {} ({}, {}) at {:.0},{:.0}, size {:.3}",
            self.id,
            if self.is_master() { "master" } else { "replica" },
            if self.taken { "taken" } else { "free" },
            self.position.w,
            self.position.h,
            self.size
        )
    }
}
