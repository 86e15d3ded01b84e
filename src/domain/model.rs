use serde::{Deserialize, Serialize};
use std::fmt;

/// Census geocoder coordinates, which arrive as `{"x": lon, "y": lat}`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coordinates {
    #[serde(rename = "y")]
    pub latitude: f64,
    #[serde(rename = "x")]
    pub longitude: f64,
}

/// One period of a weather.gov forecast.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub number: i64,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub is_daytime: bool,
    pub temperature: i64,
    pub temperature_unit: String,
    #[serde(default)]
    pub temperature_trend: Option<String>,
    #[serde(default)]
    pub probability_of_precipitation: Option<Measurement>,
    #[serde(default)]
    pub dewpoint: Option<Measurement>,
    #[serde(default)]
    pub relative_humidity: Option<Measurement>,
    pub wind_speed: String,
    pub wind_direction: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub short_forecast: String,
    pub detailed_forecast: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub unit_code: String,
    pub value: Option<f64>,
}

/// The trimmed-down period handed to the language model.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifiedForecastPeriod {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub temperature: String,
    pub detailed_forecast: String,
    pub relative_humidity: String,
    pub wind_speed: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A worked input/output pair shown to the model before the real query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FewShotExample {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Geocode,
    ForecastUrl,
    Periods,
    Summarize,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Geocode => "geocode",
            Stage::ForecastUrl => "forecast_url",
            Stage::Periods => "periods",
            Stage::Summarize => "summarize",
        }
    }

    /// Message returned to API clients when this stage fails.
    pub fn public_message(&self) -> &'static str {
        match self {
            Stage::Geocode => "error geocoding address",
            Stage::ForecastUrl => "error getting forecast URL",
            Stage::Periods => "error getting forecast periods",
            Stage::Summarize => "error summarizing forecast",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
