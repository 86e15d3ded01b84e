use crate::domain::model::{Coordinates, ForecastSummary, Period, SimplifiedForecastPeriod};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinates>;
}

#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Resolves the gridpoint forecast URL for a location.
    async fn forecast_url(&self, coordinates: &Coordinates) -> Result<String>;
    async fn periods(&self, forecast_url: &str) -> Result<Vec<Period>>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, periods: &[SimplifiedForecastPeriod]) -> Result<ForecastSummary>;
}
