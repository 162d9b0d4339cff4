//! Wine Export Dashboard Application
//! Main window wiring the control panel, the loader and the dashboard.

use crate::config::DashboardConfig;
use crate::data::{
    country_names, read_export_csv, reshape_to_long, tidy_rows, top5_by_total_value, ExportLoader,
};
use crate::gui::{ControlPanel, ControlPanelAction, Dashboard};
use egui::SidePanel;
use polars::prelude::DataFrame;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{info, warn};

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete {
        df: DataFrame,
        countries: Vec<String>,
        row_count: usize,
        path: PathBuf,
    },
    Error(String),
}

/// Main application window.
pub struct WineExportApp {
    config: DashboardConfig,
    loader: ExportLoader,
    control_panel: ControlPanel,
    dashboard: Dashboard,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,

    // Selection changed; tidy table must be recomputed
    needs_refresh: bool,
}

impl WineExportApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            config,
            loader: ExportLoader::new(),
            control_panel: ControlPanel::new(),
            dashboard: Dashboard::new(),
            load_rx: None,
            is_loading: false,
            needs_refresh: false,
        };
        // Load the configured export table once at startup
        app.start_load(app.config.data_path.clone());
        app
    }

    /// Kick off a CSV load on a background thread so the UI stays live.
    fn start_load(&mut self, path: PathBuf) {
        if self.is_loading {
            return;
        }

        self.dashboard.clear();
        self.control_panel.csv_path = Some(path.clone());
        self.control_panel.set_progress(0.0, "Loading export table...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading export table...".to_string()));

            let path_str = path.to_string_lossy().to_string();
            match read_export_csv(&path_str) {
                Ok(df) => {
                    let countries = country_names(&df);
                    let row_count = df.height();
                    let _ = tx.send(LoadResult::Complete {
                        df,
                        countries,
                        row_count,
                        path,
                    });
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Handle CSV file selection via the file dialog.
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_progress(0.0, &status);
                    }
                    LoadResult::Complete {
                        df,
                        countries,
                        row_count,
                        path,
                    } => {
                        info!(rows = row_count, countries = countries.len(), "load complete");
                        self.loader.set_dataframe(df, path);
                        self.control_panel
                            .update_countries(countries.clone(), &self.config.default_countries);
                        self.control_panel.set_progress(
                            100.0,
                            &format!("Loaded {} rows, {} countries", row_count, countries.len()),
                        );
                        self.is_loading = false;
                        self.needs_refresh = true;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        warn!(%error, "load failed");
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", error));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    /// Recompute the tidy table and chart projections for the current
    /// selection. Synchronous; pure function of the loaded table and the
    /// selected countries.
    fn refresh_dashboard(&mut self) {
        let Some(df) = self.loader.dataframe() else {
            return;
        };
        let selected = self.control_panel.selected_countries();

        let result = reshape_to_long(df, &selected)
            .and_then(|tidy| tidy_rows(&tidy))
            .and_then(|rows| top5_by_total_value(df).map(|top5| (rows, top5)));

        match result {
            Ok((rows, top5)) => {
                self.dashboard.set_data(rows, top5);
            }
            Err(e) => {
                warn!(error = %e, "reshape failed");
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
                self.dashboard.clear();
            }
        }
    }
}

impl eframe::App for WineExportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::SelectionChanged => {
                            self.needs_refresh = true;
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        if self.needs_refresh && !self.is_loading {
            self.refresh_dashboard();
            self.needs_refresh = false;
        }

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.dashboard.show(ui);
        });
    }
}
