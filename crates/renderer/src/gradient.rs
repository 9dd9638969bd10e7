//! Intensity-to-color gradients.
//!
//! A [`GradientTable`] maps normalized intensity in [0, 1] to a color through
//! an ordered list of stops. [`GradientBuilder`] places the stops for a color
//! scale using one of two interval strategies:
//!
//! - [`IntervalType::Continuous`]: evenly spaced stops `i / k`, independent of
//!   the data.
//! - [`IntervalType::Quantiles`]: stops at the measures found at each `i / k`
//!   quantile of the point set, normalized by the largest measure, so color
//!   transitions follow the distribution of the data.

use std::fmt;
use std::str::FromStr;

use heatmap_common::{Color, HeatmapError, HeatmapResult, WeightedPoint};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Stop placement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalType {
    #[default]
    Continuous,
    Quantiles,
}

impl IntervalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalType::Continuous => "continuous",
            IntervalType::Quantiles => "quantiles",
        }
    }
}

impl FromStr for IntervalType {
    type Err = HeatmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuous" => Ok(IntervalType::Continuous),
            "quantiles" | "quantile" => Ok(IntervalType::Quantiles),
            _ => Err(HeatmapError::InvalidInterval(s.to_string())),
        }
    }
}

impl fmt::Display for IntervalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single color stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Normalized intensity in [0, 1]
    pub offset: f64,
    pub color: Color,
}

/// Stops ordered strictly ascending by offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientTable {
    stops: Vec<GradientStop>,
}

impl GradientTable {
    /// Build a table from stops in any order.
    ///
    /// Stops sharing an offset collapse into one; the one given last keeps its
    /// color. Offsets are clamped to [0, 1].
    pub fn from_stops(stops: impl IntoIterator<Item = GradientStop>) -> HeatmapResult<Self> {
        let mut stops: Vec<GradientStop> = stops
            .into_iter()
            .map(|s| GradientStop {
                offset: s.offset.clamp(0.0, 1.0),
                color: s.color,
            })
            .collect();

        if let Some(bad) = stops.iter().find(|s| s.offset.is_nan()) {
            return Err(HeatmapError::InvalidScale(format!(
                "stop offset {} is not a number",
                bad.offset
            )));
        }
        if stops.is_empty() {
            return Err(HeatmapError::InvalidScale("no color stops".to_string()));
        }

        // Stable sort keeps insertion order among equal offsets
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));

        let mut merged: Vec<GradientStop> = Vec::with_capacity(stops.len());
        for stop in stops {
            match merged.last_mut() {
                Some(last) if last.offset == stop.offset => last.color = stop.color,
                _ => merged.push(stop),
            }
        }

        Ok(Self { stops: merged })
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn offsets(&self) -> Vec<f64> {
        self.stops.iter().map(|s| s.offset).collect()
    }

    /// Color for normalized intensity `t`.
    ///
    /// Below the first stop the first color is returned, above the last stop
    /// the last color; in between colors are interpolated linearly.
    pub fn color_at(&self, t: f64) -> Color {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Color::transparent(),
        };

        if t.is_nan() || t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }

        // First stop with offset > t; always in 1..len here
        let upper = self.stops.partition_point(|s| s.offset <= t);
        let lo = &self.stops[upper - 1];
        let hi = &self.stops[upper];
        let span = hi.offset - lo.offset;
        lo.color.lerp(hi.color, (t - lo.offset) / span)
    }

    /// Sample the gradient into an `n`-entry lookup table over [0, 1].
    pub fn palette(&self, n: usize) -> Vec<Color> {
        match n {
            0 => Vec::new(),
            1 => vec![self.color_at(0.0)],
            _ => {
                let last = (n - 1) as f64;
                (0..n).map(|i| self.color_at(i as f64 / last)).collect()
            }
        }
    }
}

/// Places gradient stops for a color scale.
pub struct GradientBuilder;

impl GradientBuilder {
    /// Build the gradient for `scale` with the given interval strategy.
    ///
    /// Quantile placement needs the point set and falls back to continuous
    /// placement when there are fewer points than colors or every measure is
    /// zero.
    pub fn build(
        scale: &[Color],
        interval: IntervalType,
        points: Option<&[WeightedPoint]>,
    ) -> HeatmapResult<GradientTable> {
        if scale.is_empty() {
            return Err(HeatmapError::InvalidScale(
                "color scale must contain at least one color".to_string(),
            ));
        }

        let table = match interval {
            IntervalType::Continuous => Self::continuous(scale)?,
            IntervalType::Quantiles => {
                let points = points.ok_or(HeatmapError::MissingPoints)?;
                Self::quantiles(scale, points)?
            }
        };

        info!(
            interval = %interval,
            colors = scale.len(),
            stops = table.len(),
            "Built gradient table"
        );
        Ok(table)
    }

    fn continuous(scale: &[Color]) -> HeatmapResult<GradientTable> {
        let k = scale.len() as f64;
        GradientTable::from_stops(scale.iter().enumerate().map(|(i, &color)| GradientStop {
            offset: i as f64 / k,
            color,
        }))
    }

    fn quantiles(scale: &[Color], points: &[WeightedPoint]) -> HeatmapResult<GradientTable> {
        let k = scale.len();
        if points.len() < k {
            warn!(
                points = points.len(),
                colors = k,
                "Too few points for quantile stops, using continuous intervals"
            );
            return Self::continuous(scale);
        }

        let mut measures: Vec<f64> = points.iter().map(|p| p.measure).collect();
        measures.sort_by(|a, b| a.total_cmp(b));

        let max = measures[measures.len() - 1];
        if !(max > 0.0) || !max.is_finite() {
            warn!(max, "Quantile stops need a positive maximum measure, using continuous intervals");
            return Self::continuous(scale);
        }

        let len = measures.len();
        GradientTable::from_stops(scale.iter().enumerate().map(|(i, &color)| {
            let idx = (i * len) / k;
            GradientStop {
                offset: measures[idx] / max,
                color,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(offset: f64, color: Color) -> GradientStop {
        GradientStop { offset, color }
    }

    #[test]
    fn test_interval_parsing() {
        assert_eq!("continuous".parse::<IntervalType>().unwrap(), IntervalType::Continuous);
        assert_eq!("QUANTILES".parse::<IntervalType>().unwrap(), IntervalType::Quantiles);
        assert!(matches!(
            "log".parse::<IntervalType>(),
            Err(HeatmapError::InvalidInterval(_))
        ));
    }

    #[test]
    fn test_duplicate_offsets_keep_last_color() {
        let table = GradientTable::from_stops(vec![
            stop(0.5, Color::rgb(1, 1, 1)),
            stop(0.0, Color::rgb(0, 0, 0)),
            stop(0.5, Color::rgb(2, 2, 2)),
        ])
        .unwrap();
        assert_eq!(table.offsets(), vec![0.0, 0.5]);
        assert_eq!(table.stops()[1].color, Color::rgb(2, 2, 2));
    }

    #[test]
    fn test_empty_stops_rejected() {
        assert!(GradientTable::from_stops(Vec::new()).is_err());
    }

    #[test]
    fn test_color_at_interpolates() {
        let table = GradientTable::from_stops(vec![
            stop(0.0, Color::rgb(0, 0, 0)),
            stop(1.0, Color::rgb(200, 100, 0)),
        ])
        .unwrap();
        assert_eq!(table.color_at(0.5), Color::rgb(100, 50, 0));
        assert_eq!(table.color_at(-1.0), Color::rgb(0, 0, 0));
        assert_eq!(table.color_at(2.0), Color::rgb(200, 100, 0));
    }

    #[test]
    fn test_quantile_index_uses_floor() {
        // 5 points, 2 colors: indices 0 and floor(0.5 * 5) = 2
        let points: Vec<WeightedPoint> = [4.0, 1.0, 10.0, 2.0, 5.0]
            .iter()
            .map(|&m| WeightedPoint::new(0.0, 0.0, m))
            .collect();
        let scale = [Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)];
        let table = GradientBuilder::build(&scale, IntervalType::Quantiles, Some(&points)).unwrap();
        assert_eq!(table.offsets(), vec![0.1, 0.4]);
    }
}
