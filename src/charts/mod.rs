//! Charts module - series projections and chart rendering

mod plotter;
mod series;

pub use plotter::WineCharts;
pub use series::{quantity_series, value_series, CountrySeries};
