use eframe::egui::Color32;
use palette::{IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::{PlayerYearAggregate, StatField, extent};

// ---------------------------------------------------------------------------
// Linear scale: data domain → output range
// ---------------------------------------------------------------------------

/// Maps a numeric domain linearly onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    lo: f64,
    hi: f64,
}

impl LinearScale {
    pub fn new(lo: f64, hi: f64) -> Self {
        LinearScale { lo, hi }
    }

    /// Scale over the extent of `field` in one year's players.
    pub fn over(players: &[PlayerYearAggregate], field: StatField) -> Option<Self> {
        extent(players, field).map(|(lo, hi)| LinearScale::new(lo, hi))
    }

    /// Position of `value` in the domain, clamped to `[0, 1]`.
    /// A degenerate domain maps everything to the midpoint.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.hi - self.lo;
        if span.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.lo) / span).clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Colour: true-shooting → blue..red
// ---------------------------------------------------------------------------

/// Colours points from blue (lowest TS% of the year) to red (highest).
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    scale: Option<LinearScale>,
    low: LinSrgb,
    high: LinSrgb,
}

impl ColorScale {
    pub fn new(players: &[PlayerYearAggregate]) -> Self {
        ColorScale {
            scale: LinearScale::over(players, StatField::TrueShooting),
            low: LinSrgb::new(0.0, 0.0, 1.0),
            high: LinSrgb::new(1.0, 0.0, 0.0),
        }
    }

    pub fn color_for(&self, player: &PlayerYearAggregate) -> Color32 {
        let t = match (self.scale, player.stat(StatField::TrueShooting)) {
            (Some(scale), Some(ts)) => scale.normalize(ts),
            _ => 0.5,
        };
        let mixed = self.low.mix(self.high, t as f32);
        let rgb: Srgb = mixed.into_color();
        Color32::from_rgb(
            (rgb.red * 255.0) as u8,
            (rgb.green * 255.0) as u8,
            (rgb.blue * 255.0) as u8,
        )
    }
}

// ---------------------------------------------------------------------------
// Radius: minutes played → 5..30 px
// ---------------------------------------------------------------------------

pub const MIN_RADIUS: f32 = 5.0;
pub const MAX_RADIUS: f32 = 30.0;

#[derive(Debug, Clone, Copy)]
pub struct RadiusScale {
    scale: Option<LinearScale>,
}

impl RadiusScale {
    pub fn new(players: &[PlayerYearAggregate]) -> Self {
        RadiusScale {
            scale: LinearScale::over(players, StatField::Minutes),
        }
    }

    pub fn radius_for(&self, player: &PlayerYearAggregate) -> f32 {
        let t = match (self.scale, player.stat(StatField::Minutes)) {
            (Some(scale), Some(mp)) => scale.normalize(mp) as f32,
            _ => 0.0,
        };
        MIN_RADIUS + t * (MAX_RADIUS - MIN_RADIUS)
    }
}
