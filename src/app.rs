use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ShotScatterApp {
    pub state: AppState,
}

impl ShotScatterApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ShotScatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: year slider ----
        egui::TopBottomPanel::bottom("year_slider").show(ctx, |ui| {
            panels::year_slider(ui, &mut self.state);
        });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::shooting_plot(ui, &self.state);
        });
    }
}
