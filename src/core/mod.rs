pub mod forecast;
pub mod prompt;
pub mod transform;

pub use forecast::ForecastEngine;
