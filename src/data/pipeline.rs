//! Tabular Reshape Pipeline
//! Normalizes raw export-table headers and reshapes the wide table
//! (one column per year/metric) into a tidy long format.

use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Canonical column names after normalization.
pub const COUNTRY_COL: &str = "País";
pub const ID_COL: &str = "Id";
pub const YEAR_COL: &str = "Ano";
pub const QTY_LONG_COL: &str = "Quantidade (kg)";
pub const VALUE_LONG_COL: &str = "Valor";

/// Header suffixes for the two metrics.
pub const QTY_SUFFIX: &str = "qtde (kg)";
pub const VALUE_SUFFIX: &str = "valor";

/// Year window kept by the normalization pass.
pub const FIRST_YEAR: i32 = 2009;
pub const LAST_YEAR: i32 = 2024;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("No 4-digit year in column label: {0}")]
    YearExtraction(String),
}

/// One row of the tidy table: a single (country, year) observation.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyRow {
    pub pais: String,
    pub ano: i32,
    pub quantidade: f64,
    pub valor: f64,
}

/// Rewrite raw headers to canonical form and project the columns of interest.
///
/// Header conventions in the source export: a bare year ("2010") is the
/// quantity in kg, a year with a numeric suffix ("2010.1") is the monetary
/// value. Key columns are matched by substring ("pais"/"id", case and
/// accent insensitive) when not already canonically named. Headers are
/// scanned in original file order so the first match wins deterministically.
pub fn normalize(raw: &DataFrame) -> Result<DataFrame, PipelineError> {
    let mut df = raw.clone();

    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for name in &names {
        if let Some((year, _)) = name.split_once('.') {
            df.rename(name, format!("{year} {VALUE_SUFFIX}").into())?;
        } else if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) {
            df.rename(name, format!("{name} {QTY_SUFFIX}").into())?;
        }
    }

    rename_key_column(&mut df, COUNTRY_COL, "pais")?;
    rename_key_column(&mut df, ID_COL, "id")?;

    // Columns of interest, in fixed year order. Absent columns are omitted.
    let current: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut keep: Vec<String> = Vec::new();
    for key in [ID_COL, COUNTRY_COL] {
        if current.iter().any(|c| c == key) {
            keep.push(key.to_string());
        }
    }
    for year in FIRST_YEAR..=LAST_YEAR {
        for name in [
            format!("{year} {QTY_SUFFIX}"),
            format!("{year} {VALUE_SUFFIX}"),
        ] {
            if current.iter().any(|c| c == &name) {
                keep.push(name);
            }
        }
    }

    debug!(columns = keep.len(), "normalized export table");
    Ok(df.select(keep)?)
}

/// Rename the first header containing `needle` (case/accent folded) to
/// `canonical`, unless a column with the canonical name already exists.
fn rename_key_column(
    df: &mut DataFrame,
    canonical: &str,
    needle: &str,
) -> Result<(), PipelineError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    if names.iter().any(|n| n == canonical) {
        return Ok(());
    }
    if let Some(found) = names.iter().find(|n| fold_header(n).contains(needle)) {
        df.rename(found, canonical.into())?;
    }
    Ok(())
}

/// Lowercase and strip the accents that appear in export headers, so
/// "PAIS" and "País" both match "pais".
fn fold_header(name: &str) -> String {
    name.to_lowercase()
        .replace(['á', 'à', 'â', 'ã'], "a")
        .replace(['í', 'ì'], "i")
}

/// Extract the first run of 4 consecutive ASCII digits as a year.
fn extract_year(label: &str) -> Result<i32, PipelineError> {
    let mut run = 0usize;
    for (i, b) in label.bytes().enumerate() {
        if b.is_ascii_digit() {
            run += 1;
            if run == 4 {
                let start = i + 1 - 4;
                return label[start..=i]
                    .parse()
                    .map_err(|_| PipelineError::YearExtraction(label.to_string()));
            }
        } else {
            run = 0;
        }
    }
    Err(PipelineError::YearExtraction(label.to_string()))
}

/// All column names carrying the given metric suffix, in table order.
fn metric_columns(df: &DataFrame, suffix: &str) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .filter(|name| name.contains(suffix))
        .collect()
}

/// Keep only rows whose country is in `selected`. Unknown names simply
/// match nothing; a missing country column is the first point of failure.
fn filter_countries(df: &DataFrame, selected: &[String]) -> Result<DataFrame, PipelineError> {
    let country = df.column(COUNTRY_COL)?;
    let mask: Vec<bool> = (0..df.height())
        .map(|i| {
            country.get(i).ok().is_some_and(|v| {
                !v.is_null()
                    && selected
                        .iter()
                        .any(|s| s == v.to_string().trim_matches('"'))
            })
        })
        .collect();
    let mask = BooleanChunked::from_slice("mask".into(), &mask);
    Ok(df.filter(&mask)?)
}

/// Unpivot the given metric columns into (País, Ano, value) long format.
/// Emits one row per (input row, metric column).
fn melt_metric(
    df: &DataFrame,
    metric_cols: &[String],
    value_name: &str,
) -> Result<DataFrame, PipelineError> {
    let country = df.column(COUNTRY_COL)?;

    let mut paises: Vec<String> = Vec::new();
    let mut anos: Vec<i32> = Vec::new();
    let mut values: Vec<f64> = Vec::new();

    for name in metric_cols {
        let ano = extract_year(name)?;
        let value_f64 = df.column(name)?.cast(&DataType::Float64)?;
        let value_ca = value_f64.f64()?;

        for i in 0..df.height() {
            if let Ok(p) = country.get(i) {
                if p.is_null() {
                    continue;
                }
                paises.push(p.to_string().trim_matches('"').to_string());
                anos.push(ano);
                values.push(value_ca.get(i).unwrap_or(f64::NAN));
            }
        }
    }

    let df = DataFrame::new(vec![
        Column::new(COUNTRY_COL.into(), paises),
        Column::new(YEAR_COL.into(), anos),
        Column::new(value_name.into(), values),
    ])?;

    Ok(df)
}

/// Reshape the normalized wide table into the tidy long format for the
/// selected countries.
///
/// Quantity and value columns are melted independently, then inner-joined
/// on (País, Ano); years present in only one metric are dropped silently.
/// Pure function of its inputs. The result is sorted by (País, Ano).
pub fn reshape_to_long(
    df: &DataFrame,
    selected: &[String],
) -> Result<DataFrame, PipelineError> {
    let filtered = filter_countries(df, selected)?;

    let qty_cols = metric_columns(df, QTY_SUFFIX);
    let value_cols = metric_columns(df, VALUE_SUFFIX);

    let qty_long = melt_metric(&filtered, &qty_cols, QTY_LONG_COL)?;
    let value_long = melt_metric(&filtered, &value_cols, VALUE_LONG_COL)?;

    let joined = qty_long
        .lazy()
        .join(
            value_long.lazy(),
            [col(COUNTRY_COL), col(YEAR_COL)],
            [col(COUNTRY_COL), col(YEAR_COL)],
            JoinArgs::new(JoinType::Inner),
        )
        .sort([COUNTRY_COL, YEAR_COL], SortMultipleOptions::default())
        .collect()?;

    debug!(rows = joined.height(), "reshaped to long format");
    Ok(joined)
}

/// Rank countries by the sum of all their value columns, descending,
/// keeping the top 5. Ties keep first-encounter order (stable sort).
pub fn top5_by_total_value(df: &DataFrame) -> Result<Vec<(String, f64)>, PipelineError> {
    let country = df.column(COUNTRY_COL)?;
    let value_cols = metric_columns(df, VALUE_SUFFIX);

    let mut casts: Vec<Column> = Vec::with_capacity(value_cols.len());
    for name in &value_cols {
        casts.push(df.column(name)?.cast(&DataType::Float64)?);
    }

    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, f64> = HashMap::new();

    for i in 0..df.height() {
        let Ok(p) = country.get(i) else { continue };
        if p.is_null() {
            continue;
        }
        let pais = p.to_string().trim_matches('"').to_string();

        let mut row_total = 0.0;
        for cast in &casts {
            if let Some(v) = cast.f64()?.get(i) {
                if !v.is_nan() {
                    row_total += v;
                }
            }
        }

        if !totals.contains_key(&pais) {
            order.push(pais.clone());
        }
        *totals.entry(pais).or_insert(0.0) += row_total;
    }

    let mut ranked: Vec<(String, f64)> = order
        .into_iter()
        .map(|pais| {
            let total = totals[&pais];
            (pais, total)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(5);

    Ok(ranked)
}

/// Materialize the joined tidy frame into rows for the grid and charts.
pub fn tidy_rows(df: &DataFrame) -> Result<Vec<TidyRow>, PipelineError> {
    let pais = df.column(COUNTRY_COL)?.str()?;
    let ano = df.column(YEAR_COL)?.i32()?;
    let quantidade = df.column(QTY_LONG_COL)?.f64()?;
    let valor = df.column(VALUE_LONG_COL)?.f64()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let (Some(p), Some(a)) = (pais.get(i), ano.get(i)) else {
            continue;
        };
        rows.push(TidyRow {
            pais: p.to_string(),
            ano: a,
            quantidade: quantidade.get(i).unwrap_or(f64::NAN),
            valor: valor.get(i).unwrap_or(f64::NAN),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_wide() -> DataFrame {
        df!(
            "id" => &[1i64, 2],
            "PAIS" => &["Brasil", "Argentina"],
            "2010" => &[100i64, 200],
            "2010.1" => &[1000i64, 2000],
            "2011" => &[110i64, 210],
            "2011.1" => &[1100i64, 2100],
        )
        .unwrap()
    }

    #[test]
    fn normalize_rewrites_year_headers() {
        let df = normalize(&sample_wide()).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(names.contains(&"2010 qtde (kg)".to_string()));
        assert!(names.contains(&"2010 valor".to_string()));
        assert!(names.contains(&"2011 qtde (kg)".to_string()));
        assert!(names.contains(&"2011 valor".to_string()));
    }

    #[test]
    fn normalize_renames_unaccented_country_header() {
        let df = normalize(&sample_wide()).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(names.contains(&COUNTRY_COL.to_string()));
        assert!(names.contains(&ID_COL.to_string()));
        assert!(!names.contains(&"PAIS".to_string()));
    }

    #[test]
    fn normalize_keeps_fixed_column_order_and_year_window() {
        let df = df!(
            "Id" => &[1i64],
            "País" => &["Brasil"],
            "2008" => &[5i64],
            "2010.1" => &[1000i64],
            "2010" => &[100i64],
        )
        .unwrap();
        let out = normalize(&df).unwrap();
        let names: Vec<String> = out
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        // 2008 is outside the 2009-2024 window; qtde precedes valor per year
        assert_eq!(
            names,
            vec!["Id", "País", "2010 qtde (kg)", "2010 valor"]
        );
    }

    #[test]
    fn reshape_produces_one_row_per_country_year() {
        let norm = normalize(&sample_wide()).unwrap();
        let selected = vec!["Brasil".to_string(), "Argentina".to_string()];
        let tidy = reshape_to_long(&norm, &selected).unwrap();
        assert_eq!(tidy.height(), 4);

        let rows = tidy_rows(&tidy).unwrap();
        assert_eq!(
            rows[0],
            TidyRow {
                pais: "Argentina".to_string(),
                ano: 2010,
                quantidade: 200.0,
                valor: 2000.0,
            }
        );
        assert_eq!(
            rows[3],
            TidyRow {
                pais: "Brasil".to_string(),
                ano: 2011,
                quantidade: 110.0,
                valor: 1100.0,
            }
        );
    }

    #[test]
    fn reshape_inner_join_drops_unmatched_years() {
        // 2012 has a quantity column but no value column
        let df = df!(
            "País" => &["Brasil"],
            "2011 qtde (kg)" => &[110i64],
            "2011 valor" => &[1100i64],
            "2012 qtde (kg)" => &[120i64],
        )
        .unwrap();
        let tidy = reshape_to_long(&df, &["Brasil".to_string()]).unwrap();
        assert_eq!(tidy.height(), 1);
        let rows = tidy_rows(&tidy).unwrap();
        assert_eq!(rows[0].ano, 2011);
    }

    #[test]
    fn reshape_is_pure() {
        let norm = normalize(&sample_wide()).unwrap();
        let selected = vec!["Brasil".to_string()];
        let a = reshape_to_long(&norm, &selected).unwrap();
        let b = reshape_to_long(&norm, &selected).unwrap();
        assert!(a.equals(&b));
    }

    #[test]
    fn empty_selection_yields_empty_table() {
        let norm = normalize(&sample_wide()).unwrap();
        let tidy = reshape_to_long(&norm, &[]).unwrap();
        assert_eq!(tidy.height(), 0);
    }

    #[test]
    fn unknown_country_yields_zero_rows() {
        let norm = normalize(&sample_wide()).unwrap();
        let tidy = reshape_to_long(&norm, &["Atlântida".to_string()]).unwrap();
        assert_eq!(tidy.height(), 0);
    }

    #[test]
    fn year_extraction_failure_fails_the_reshape() {
        let df = df!(
            "País" => &["Brasil"],
            "sem ano qtde (kg)" => &[100i64],
            "sem ano valor" => &[1000i64],
        )
        .unwrap();
        let err = reshape_to_long(&df, &["Brasil".to_string()]).unwrap_err();
        assert!(matches!(err, PipelineError::YearExtraction(_)));
    }

    #[test]
    fn top5_orders_by_total_value_descending() {
        let df = df!(
            "País" => &["A", "B", "C", "D", "E", "F"],
            "2009 valor" => &[300i64, 500, 100, 50, 10, 5],
        )
        .unwrap();
        let ranked = top5_by_total_value(&df).unwrap();
        let names: Vec<&str> = ranked.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C", "D", "E"]);
        assert_eq!(ranked[0].1, 500.0);
    }

    #[test]
    fn top5_sums_across_years_and_rows() {
        let df = df!(
            "País" => &["A", "B", "A"],
            "2009 valor" => &[100i64, 50, 25],
            "2010 valor" => &[100i64, 50, 25],
        )
        .unwrap();
        let ranked = top5_by_total_value(&df).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0], ("A".to_string(), 250.0));
        assert_eq!(ranked[1], ("B".to_string(), 100.0));
    }

    #[test]
    fn missing_country_column_fails_at_first_use() {
        let df = df!("2010 valor" => &[100i64]).unwrap();
        assert!(reshape_to_long(&df, &["Brasil".to_string()]).is_err());
        assert!(top5_by_total_value(&df).is_err());
    }

    #[test]
    fn extract_year_takes_first_four_digit_run() {
        assert_eq!(extract_year("2010 qtde (kg)").unwrap(), 2010);
        assert_eq!(extract_year("valor 2015").unwrap(), 2015);
        assert!(extract_year("qtde (kg)").is_err());
        assert!(extract_year("ano 201").is_err());
    }
}
