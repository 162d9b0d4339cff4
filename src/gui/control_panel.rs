//! Control Panel Widget
//! Left side panel: data source, country multi-select and status.

use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;

/// Left side control panel with file selection and the country filter.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub countries: Vec<String>,
    pub selected: Vec<bool>,
    pub progress: f32,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            countries: Vec::new(),
            selected: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the country list after a load, pre-selecting the defaults.
    pub fn update_countries(&mut self, countries: Vec<String>, defaults: &[String]) {
        self.selected = countries
            .iter()
            .map(|c| defaults.iter().any(|d| d == c))
            .collect();
        self.countries = countries;
    }

    /// Currently selected country names, in list order.
    pub fn selected_countries(&self) -> Vec<String> {
        self.countries
            .iter()
            .zip(self.selected.iter())
            .filter(|(_, &on)| on)
            .map(|(c, _)| c.clone())
            .collect()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🍇 Wine Export Analysis")
                    .size(20.0)
                    .color(Color32::from_rgb(142, 68, 173)),
            );
            ui.label(
                RichText::new("Exports by country and year")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file loaded".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Country Selection Section =====
        ui.label(RichText::new("🌍 Countries").size(14.0).strong());
        ui.add_space(5.0);

        if self.countries.is_empty() {
            ui.label(RichText::new("Load a file to list countries").color(Color32::GRAY));
        } else {
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                        for (i, country) in self.countries.iter().enumerate() {
                            if i < self.selected.len()
                                && ui.checkbox(&mut self.selected[i], country).changed()
                            {
                                action = ControlPanelAction::SelectionChanged;
                            }
                        }
                    });
                });

            ui.add_space(5.0);
            ui.horizontal(|ui| {
                if ui.small_button("Select All").clicked() {
                    self.selected.iter_mut().for_each(|v| *v = true);
                    action = ControlPanelAction::SelectionChanged;
                }
                if ui.small_button("Clear All").clicked() {
                    self.selected.iter_mut().for_each(|v| *v = false);
                    action = ControlPanelAction::SelectionChanged;
                }
            });
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    SelectionChanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_preselect_matching_countries() {
        let mut panel = ControlPanel::new();
        panel.update_countries(
            vec![
                "Angola".to_string(),
                "Brasil".to_string(),
                "China".to_string(),
            ],
            &["China".to_string(), "Angola".to_string()],
        );
        assert_eq!(
            panel.selected_countries(),
            vec!["Angola".to_string(), "China".to_string()]
        );
    }

    #[test]
    fn absent_defaults_select_nothing() {
        let mut panel = ControlPanel::new();
        panel.update_countries(
            vec!["Brasil".to_string()],
            &["Estados Unidos".to_string()],
        );
        assert!(panel.selected_countries().is_empty());
    }
}
