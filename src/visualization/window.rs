// src/visualization/window.rs

use super::{SharedChart, VisualizationConfig};
use eframe::egui;
use std::time::Duration;

pub struct VisualizationWindow {
    chart: SharedChart,
    config: VisualizationConfig,
}

impl VisualizationWindow {
    pub fn new(chart: SharedChart, config: VisualizationConfig) -> Self {
        Self { chart, config }
    }

    /// Blocks on the native event loop until the window is closed. Must be
    /// called from the main thread.
    pub fn run(chart: SharedChart, config: VisualizationConfig) -> Result<(), eframe::Error> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([config.window_width as f32, config.window_height as f32])
                .with_title("Webcam PPG - Real-Time Signal"),
            ..Default::default()
        };

        eframe::run_native(
            "Webcam PPG",
            options,
            Box::new(|_cc| Ok(Box::new(VisualizationWindow::new(chart, config)))),
        )
    }
}

impl eframe::App for VisualizationWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // the chart only changes every redraw interval
        ctx.request_repaint_after(Duration::from_millis(50));

        let (points, is_signal_present) = match self.chart.lock() {
            Ok(snapshot) => (snapshot.points.clone(), snapshot.is_signal_present),
            Err(_) => return,
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("PPG Signal");
            if self.config.show_signal_flag {
                let (label, color) = if is_signal_present {
                    ("signal present", egui::Color32::LIGHT_GREEN)
                } else {
                    ("holding baseline", egui::Color32::YELLOW)
                };
                ui.colored_label(color, label);
            }
            ui.separator();

            if points.is_empty() {
                ui.label("Waiting for data...");
                return;
            }

            // Import from egui_plot crate, not egui::plot
            use egui_plot::{Line, Plot, PlotPoints};

            let line_points: PlotPoints = points.iter().map(|p| [p.time, p.value]).collect();
            let line = Line::new(line_points)
                .color(egui::Color32::LIGHT_RED)
                .width(1.5)
                .name("detrended");

            Plot::new("ppg_signal")
                .height(self.config.plot_height as f32)
                .show_axes([true, true])
                .show_grid([true, true])
                .allow_zoom(true)
                .allow_drag(true)
                .allow_scroll(true)
                .show(ui, |plot_ui| {
                    plot_ui.line(line);
                });
        });
    }
}
