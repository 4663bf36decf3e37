//! Chart domain: candle series, trend colouring, themes.

use crate::domain::market::wire::CandleResponse;
use crate::domain::market::Trend;
use crate::shared::serde_util::from_unix_seconds;
use crate::shared::Symbol;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Theme ───────────────────────────────────────────────────────────────────

/// Colour theme. The trend rule is identical in both; only the colours differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn palette(&self) -> ChartPalette {
        match self {
            Self::Dark => ChartPalette {
                positive: "#26a69a",
                negative: "#ef5350",
            },
            Self::Light => ChartPalette {
                positive: "#00897b",
                negative: "#e53935",
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

/// Trend colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPalette {
    pub positive: &'static str,
    pub negative: &'static str,
}

impl ChartPalette {
    pub fn color_for(&self, trend: Trend) -> &'static str {
        match trend {
            Trend::Positive => self.positive,
            Trend::Negative => self.negative,
        }
    }
}

// ─── InvalidChartResponse ────────────────────────────────────────────────────

/// Why a candle response cannot be charted. Never propagated past
/// [`ChartSeries::build`], which degrades to an empty series.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidChartResponse {
    #[error("status is {0:?}, expected \"ok\"")]
    Status(Option<String>),
    #[error("missing timestamps")]
    MissingTimes,
    #[error("missing close prices")]
    MissingCloses,
}

impl CandleResponse {
    /// Paired timestamps and closes, or why they are unusable.
    pub fn series_data(&self) -> Result<(&[i64], &[Decimal]), InvalidChartResponse> {
        if !self.is_ok() {
            return Err(InvalidChartResponse::Status(self.status.clone()));
        }
        let times = self.times.as_deref().ok_or(InvalidChartResponse::MissingTimes)?;
        let closes = self.closes.as_deref().ok_or(InvalidChartResponse::MissingCloses)?;
        Ok((times, closes))
    }
}

// ─── ChartSeries ─────────────────────────────────────────────────────────────

/// A single plotted point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Decimal,
}

/// A chronological close-price series plus its trend colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub symbol: Symbol,
    pub points: Vec<ChartPoint>,
    pub trend: Trend,
    pub color: String,
}

impl ChartSeries {
    pub fn empty(symbol: Symbol, theme: Theme) -> Self {
        Self {
            symbol,
            points: Vec::new(),
            trend: Trend::Positive,
            color: theme.palette().positive.to_string(),
        }
    }

    /// Build a series from a candle response.
    ///
    /// Invalid responses yield an empty series. Points keep the source's
    /// index order; mismatched array lengths are truncated to the shorter.
    pub fn build(symbol: Symbol, response: &CandleResponse, theme: Theme) -> Self {
        let (times, closes) = match response.series_data() {
            Ok(data) => data,
            Err(reason) => {
                tracing::debug!(%symbol, %reason, "Invalid chart data, drawing nothing");
                return Self::empty(symbol, theme);
            }
        };

        if times.len() != closes.len() {
            tracing::warn!(
                %symbol,
                times = times.len(),
                closes = closes.len(),
                "Candle arrays differ in length, truncating"
            );
        }

        let points: Vec<ChartPoint> = times
            .iter()
            .zip(closes)
            .filter_map(|(&t, &value)| {
                from_unix_seconds(t).map(|timestamp| ChartPoint { timestamp, value })
            })
            .collect();

        let trend = trend_of(&points);
        Self {
            symbol,
            points,
            trend,
            color: theme.palette().color_for(trend).to_string(),
        }
    }

    pub fn first_value(&self) -> Option<Decimal> {
        self.points.first().map(|p| p.value)
    }

    /// Latest close; the portfolio uses it as the live quote.
    pub fn last_value(&self) -> Option<Decimal> {
        self.points.last().map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Last vs first point; empty and single-point series are positive.
pub fn trend_of(points: &[ChartPoint]) -> Trend {
    match (points.first(), points.last()) {
        (Some(first), Some(last)) => Trend::between(first.value, last.value),
        _ => Trend::Positive,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles(status: &str, times: Vec<i64>, closes: Vec<i64>) -> CandleResponse {
        CandleResponse {
            status: Some(status.to_string()),
            times: Some(times),
            closes: Some(closes.into_iter().map(Decimal::from).collect()),
        }
    }

    #[test]
    fn test_build_zips_in_order() {
        let series = ChartSeries::build(
            Symbol::from("AAPL"),
            &candles("ok", vec![1, 2, 3], vec![10, 9, 11]),
            Theme::Dark,
        );
        let values: Vec<Decimal> = series.points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![Decimal::from(10), Decimal::from(9), Decimal::from(11)]);
        assert_eq!(series.points[0].timestamp.timestamp(), 1);
        assert_eq!(series.points[2].timestamp.timestamp(), 3);
        assert_eq!(series.trend, Trend::Positive);
        assert_eq!(series.color, "#26a69a");
    }

    #[test]
    fn test_build_negative_trend_uses_theme() {
        let response = candles("ok", vec![1, 2], vec![10, 8]);
        let dark = ChartSeries::build(Symbol::from("X"), &response, Theme::Dark);
        let light = ChartSeries::build(Symbol::from("X"), &response, Theme::Light);
        assert_eq!(dark.trend, Trend::Negative);
        assert_eq!(light.trend, Trend::Negative);
        assert_eq!(dark.color, "#ef5350");
        assert_eq!(light.color, "#e53935");
    }

    #[test]
    fn test_build_error_status_is_empty() {
        let response = CandleResponse {
            status: Some("error".into()),
            times: None,
            closes: None,
        };
        let series = ChartSeries::build(Symbol::from("X"), &response, Theme::Dark);
        assert!(series.is_empty());
        assert_eq!(series.trend, Trend::Positive);
    }

    #[test]
    fn test_build_missing_array_is_empty() {
        let response = CandleResponse {
            status: Some("ok".into()),
            times: Some(vec![1, 2]),
            closes: None,
        };
        assert_eq!(response.series_data().unwrap_err(), InvalidChartResponse::MissingCloses);
        assert!(ChartSeries::build(Symbol::from("X"), &response, Theme::Light).is_empty());
    }

    #[test]
    fn test_build_truncates_mismatched_lengths() {
        let series = ChartSeries::build(
            Symbol::from("X"),
            &candles("ok", vec![1, 2, 3], vec![5, 6]),
            Theme::Dark,
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series.last_value(), Some(Decimal::from(6)));
    }

    #[test]
    fn test_single_point_is_positive() {
        let series = ChartSeries::build(
            Symbol::from("X"),
            &candles("ok", vec![1], vec![5]),
            Theme::Dark,
        );
        assert_eq!(series.trend, Trend::Positive);
        assert_eq!(series.first_value(), series.last_value());
    }

    #[test]
    fn test_theme_toggle_and_parse() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!("LIGHT".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
    }
}
