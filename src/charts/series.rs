//! Chart series projections
//! Turns the tidy table into the per-country point series consumed by the
//! line charts and the ranked bars for the top-5 chart.

use crate::data::TidyRow;

/// Line-chart series for one country: points are (year, metric value).
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySeries {
    pub pais: String,
    pub points: Vec<[f64; 2]>,
}

/// Per-country quantity-by-year series.
pub fn quantity_series(rows: &[TidyRow]) -> Vec<CountrySeries> {
    series_by(rows, |r| r.quantidade)
}

/// Per-country value-by-year series.
pub fn value_series(rows: &[TidyRow]) -> Vec<CountrySeries> {
    series_by(rows, |r| r.valor)
}

/// Group tidy rows into one series per country, in first-appearance order.
/// Rows arrive sorted by (country, year), so points are year-ordered.
fn series_by(rows: &[TidyRow], metric: impl Fn(&TidyRow) -> f64) -> Vec<CountrySeries> {
    let mut series: Vec<CountrySeries> = Vec::new();
    for row in rows {
        let point = [f64::from(row.ano), metric(row)];
        match series.iter_mut().find(|s| s.pais == row.pais) {
            Some(s) => s.points.push(point),
            None => series.push(CountrySeries {
                pais: row.pais.clone(),
                points: vec![point],
            }),
        }
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pais: &str, ano: i32, quantidade: f64, valor: f64) -> TidyRow {
        TidyRow {
            pais: pais.to_string(),
            ano,
            quantidade,
            valor,
        }
    }

    #[test]
    fn groups_rows_into_one_series_per_country() {
        let rows = vec![
            row("Angola", 2009, 10.0, 100.0),
            row("Angola", 2010, 20.0, 200.0),
            row("China", 2009, 30.0, 300.0),
        ];

        let qty = quantity_series(&rows);
        assert_eq!(qty.len(), 2);
        assert_eq!(qty[0].pais, "Angola");
        assert_eq!(qty[0].points, vec![[2009.0, 10.0], [2010.0, 20.0]]);
        assert_eq!(qty[1].points, vec![[2009.0, 30.0]]);

        let val = value_series(&rows);
        assert_eq!(val[0].points, vec![[2009.0, 100.0], [2010.0, 200.0]]);
    }

    #[test]
    fn empty_rows_give_no_series() {
        assert!(quantity_series(&[]).is_empty());
        assert!(value_series(&[]).is_empty());
    }
}
