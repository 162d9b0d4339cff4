//! Export Table Loader
//! Reads the semicolon-delimited wine export CSV with Polars and holds the
//! normalized table, immutable for the rest of the process lifetime.

use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use super::pipeline::{self, PipelineError, COUNTRY_COL};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("No data loaded")]
    NoData,
}

/// Read and normalize an export CSV. The source uses `;` as separator and
/// UTF-8 encoding; the first row is the header.
pub fn read_export_csv(file_path: &str) -> Result<DataFrame, LoaderError> {
    let raw = LazyCsvReader::new(file_path)
        .with_separator(b';')
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    let df = pipeline::normalize(&raw)?;
    info!(
        rows = df.height(),
        columns = df.width(),
        path = file_path,
        "loaded export table"
    );
    Ok(df)
}

/// Holds the normalized export table loaded once at startup.
pub struct ExportLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for ExportLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load and normalize a CSV file.
    pub fn load_csv(&mut self, file_path: &str) -> Result<&DataFrame, LoaderError> {
        self.file_path = Some(PathBuf::from(file_path));
        let df = read_export_csv(file_path)?;
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Distinct country names in first-appearance order.
    pub fn countries(&self) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };
        country_names(df)
    }

    /// Get the number of rows in the normalized table.
    pub fn row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the normalized table.
    pub fn dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Set the normalized table directly (used by the async load path).
    pub fn set_dataframe(&mut self, df: DataFrame, file_path: PathBuf) {
        self.df = Some(df);
        self.file_path = Some(file_path);
    }
}

/// Distinct values of the country column in first-appearance order.
/// An absent country column yields an empty list here; the hard failure is
/// deferred to the reshape call, as in the original pipeline.
pub fn country_names(df: &DataFrame) -> Vec<String> {
    let Ok(country) = df.column(COUNTRY_COL) else {
        return Vec::new();
    };

    let mut seen: Vec<String> = Vec::new();
    for i in 0..df.height() {
        let Ok(v) = country.get(i) else { continue };
        if v.is_null() {
            continue;
        }
        let name = v.to_string().trim_matches('"').to_string();
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::pipeline::{reshape_to_long, tidy_rows, TidyRow};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    const SAMPLE: &str = "\
Id;País;2010;2010.1;2011;2011.1
1;Brasil;100;1000;110;1100
2;Argentina;200;2000;210;2100
";

    #[test]
    fn loads_and_normalizes_semicolon_csv() {
        let f = write_csv(SAMPLE);
        let mut loader = ExportLoader::new();
        let df = loader.load_csv(f.path().to_str().unwrap()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            loader.countries(),
            vec!["Brasil".to_string(), "Argentina".to_string()]
        );
    }

    #[test]
    fn end_to_end_two_countries_two_years() {
        let f = write_csv(SAMPLE);
        let mut loader = ExportLoader::new();
        loader.load_csv(f.path().to_str().unwrap()).unwrap();

        let selected = vec!["Brasil".to_string(), "Argentina".to_string()];
        let tidy = reshape_to_long(loader.dataframe().unwrap(), &selected).unwrap();
        let rows = tidy_rows(&tidy).unwrap();

        let expected = vec![
            TidyRow {
                pais: "Argentina".to_string(),
                ano: 2010,
                quantidade: 200.0,
                valor: 2000.0,
            },
            TidyRow {
                pais: "Argentina".to_string(),
                ano: 2011,
                quantidade: 210.0,
                valor: 2100.0,
            },
            TidyRow {
                pais: "Brasil".to_string(),
                ano: 2010,
                quantidade: 100.0,
                valor: 1000.0,
            },
            TidyRow {
                pais: "Brasil".to_string(),
                ano: 2011,
                quantidade: 110.0,
                valor: 1100.0,
            },
        ];
        assert_eq!(rows, expected);
    }

    #[test]
    fn missing_file_is_fatal_for_the_load() {
        let mut loader = ExportLoader::new();
        assert!(loader.load_csv("does/not/exist.csv").is_err());
        assert!(loader.dataframe().is_none());
    }
}
