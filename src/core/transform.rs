use crate::domain::model::{Period, SimplifiedForecastPeriod};

/// Drops the fields the model does not need and pre-formats the rest.
pub fn simplify_periods(periods: &[Period]) -> Vec<SimplifiedForecastPeriod> {
    periods.iter().map(simplify_period).collect()
}

pub fn simplify_period(period: &Period) -> SimplifiedForecastPeriod {
    let relative_humidity = match period.relative_humidity.as_ref().and_then(|h| h.value) {
        Some(value) => format!("{}%", value.round()),
        None => "n/a".to_string(),
    };

    SimplifiedForecastPeriod {
        name: period.name.clone(),
        start_time: period.start_time.clone(),
        end_time: period.end_time.clone(),
        temperature: format!("{}{}", period.temperature, period.temperature_unit),
        detailed_forecast: period.detailed_forecast.clone(),
        relative_humidity,
        wind_speed: format!("{} {}", period.wind_speed, period.wind_direction),
    }
}
