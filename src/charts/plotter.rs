//! Chart Plotter Module
//! Interactive visualizations for the wine export dashboard using egui_plot:
//! two line charts (quantity and value over time) and a horizontal bar
//! chart for the top-5 countries by total value.

use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::charts::series::CountrySeries;

/// Color palette for countries
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(121, 85, 72),   // Brown
];

const CHART_HEIGHT: f32 = 300.0;
const BAR_COLOR: Color32 = Color32::from_rgb(142, 68, 173);

/// Draws the dashboard charts.
pub struct WineCharts;

impl WineCharts {
    /// Get color for a country series.
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Line chart of exported quantity (kg) by year, one line per country.
    pub fn draw_quantity_chart(ui: &mut egui::Ui, series: &[CountrySeries]) {
        Self::draw_year_lines(ui, "quantity_chart", "Quantidade (kg)", series);
    }

    /// Line chart of exported value by year, one line per country.
    pub fn draw_value_chart(ui: &mut egui::Ui, series: &[CountrySeries]) {
        Self::draw_year_lines(ui, "value_chart", "Valor (US$)", series);
    }

    fn draw_year_lines(ui: &mut egui::Ui, id: &str, y_label: &str, series: &[CountrySeries]) {
        Plot::new(id)
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .x_axis_label("Ano")
            .y_axis_label(y_label)
            .allow_scroll(false)
            // Years are discrete; only label whole-year grid marks
            .x_axis_formatter(|mark, _range| {
                let year = mark.value.round();
                if (mark.value - year).abs() < 1e-6 {
                    format!("{}", year as i64)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                for (i, s) in series.iter().enumerate() {
                    let color = Self::series_color(i);

                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(s.points.iter().copied()))
                            .color(color)
                            .width(1.5)
                            .name(&s.pais),
                    );

                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(s.points.iter().copied()))
                            .radius(3.0)
                            .color(color)
                            .name(&s.pais),
                    );
                }
            });
    }

    /// Horizontal bar chart of the top-5 countries by total export value,
    /// largest at the top.
    pub fn draw_top5_chart(ui: &mut egui::Ui, ranked: &[(String, f64)]) {
        let labels: Vec<String> = ranked.iter().map(|(pais, _)| pais.clone()).collect();
        let n = ranked.len();

        let bars: Vec<Bar> = ranked
            .iter()
            .enumerate()
            .map(|(i, (pais, total))| {
                // Rank 0 gets the highest y position so it renders on top
                Bar::new((n - 1 - i) as f64, *total)
                    .width(0.6)
                    .fill(BAR_COLOR)
                    .name(pais)
            })
            .collect();

        Plot::new("top5_chart")
            .height(CHART_HEIGHT)
            .x_axis_label("Valor Total")
            .allow_scroll(false)
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                let rank = n as isize - 1 - idx as isize;
                if rank >= 0 && (rank as usize) < labels.len() {
                    labels[rank as usize].clone()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal());
            });
    }
}
