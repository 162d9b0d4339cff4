//! Data module - CSV loading and the reshape pipeline

mod loader;
pub mod pipeline;

pub use loader::{country_names, read_export_csv, ExportLoader, LoaderError};
pub use pipeline::{
    normalize, reshape_to_long, tidy_rows, top5_by_total_value, PipelineError, TidyRow,
};
