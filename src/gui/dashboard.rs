//! Dashboard Widget
//! Central scrollable panel: tidy data grid, the two evolution line charts
//! and the top-5 bar chart.

use egui::{Color32, RichText, ScrollArea};

use crate::charts::{quantity_series, value_series, CountrySeries, WineCharts};
use crate::data::TidyRow;

const SECTION_SPACING: f32 = 15.0;
const GRID_MAX_HEIGHT: f32 = 280.0;

/// Central dashboard fed from the tidy table on every selection change.
pub struct Dashboard {
    rows: Vec<TidyRow>,
    quantity: Vec<CountrySeries>,
    value: Vec<CountrySeries>,
    top5: Vec<(String, f64)>,
    has_data: bool,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            quantity: Vec::new(),
            value: Vec::new(),
            top5: Vec::new(),
            has_data: false,
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all dashboard content
    pub fn clear(&mut self) {
        self.rows.clear();
        self.quantity.clear();
        self.value.clear();
        self.top5.clear();
        self.has_data = false;
    }

    /// Replace the dashboard content from a fresh reshape.
    /// An empty row set is valid (degenerate selection) and shows empty
    /// charts rather than an error.
    pub fn set_data(&mut self, rows: Vec<TidyRow>, top5: Vec<(String, f64)>) {
        self.quantity = quantity_series(&rows);
        self.value = value_series(&rows);
        self.rows = rows;
        self.top5 = top5;
        self.has_data = true;
    }

    /// Draw the dashboard
    pub fn show(&mut self, ui: &mut egui::Ui) {
        if !self.has_data {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.draw_table_card(ui);
                ui.add_space(SECTION_SPACING);

                Self::draw_chart_card(ui, "Evolução da Quantidade Exportada", |ui| {
                    WineCharts::draw_quantity_chart(ui, &self.quantity);
                });
                ui.add_space(SECTION_SPACING);

                Self::draw_chart_card(ui, "Evolução do Valor Exportado", |ui| {
                    WineCharts::draw_value_chart(ui, &self.value);
                });
                ui.add_space(SECTION_SPACING);

                Self::draw_chart_card(ui, "Top 5 Países Importadores de Vinho", |ui| {
                    WineCharts::draw_top5_chart(ui, &self.top5);
                });
            });
    }

    fn draw_table_card(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .rounding(8.0)
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new("Exportações por País e Ano")
                        .size(16.0)
                        .strong(),
                );
                ui.add_space(8.0);

                if self.rows.is_empty() {
                    ui.label(RichText::new("No rows for the current selection").color(Color32::GRAY));
                    return;
                }

                ScrollArea::vertical()
                    .id_salt("tidy_grid_scroll")
                    .max_height(GRID_MAX_HEIGHT)
                    .show(ui, |ui| {
                        egui::Grid::new("tidy_grid")
                            .striped(true)
                            .min_col_width(110.0)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                ui.label(RichText::new("País").strong().size(12.0));
                                ui.label(RichText::new("Ano").strong().size(12.0));
                                ui.label(RichText::new("Quantidade (kg)").strong().size(12.0));
                                ui.label(RichText::new("Valor").strong().size(12.0));
                                ui.end_row();

                                for row in &self.rows {
                                    ui.label(RichText::new(&row.pais).size(12.0));
                                    ui.label(RichText::new(row.ano.to_string()).size(12.0));
                                    ui.label(
                                        RichText::new(format!("{}", row.quantidade)).size(12.0),
                                    );
                                    ui.label(RichText::new(format!("{}", row.valor)).size(12.0));
                                    ui.end_row();
                                }
                            });
                    });
            });
    }

    fn draw_chart_card(ui: &mut egui::Ui, title: &str, draw: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(16.0).strong());
                ui.add_space(8.0);
                draw(ui);
            });
    }
}
