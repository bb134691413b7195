use eframe::egui::{self, Color32, RichText, Ui};

use crate::config::Preset;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let current = state
            .preset
            .map(|p| p.label().to_string())
            .unwrap_or_else(|| "Custom config".to_string());
        egui::ComboBox::from_id_salt("preset")
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for preset in Preset::ALL {
                    if ui
                        .selectable_label(state.preset == Some(preset), preset.label())
                        .clicked()
                    {
                        state.set_preset(preset);
                    }
                }
            });

        ui.separator();

        if let Some(index) = &state.index {
            ui.label(format!(
                "{} rows loaded, {} seasons, {} player seasons",
                state.rows.len(),
                index.len(),
                index.aggregate_count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Bottom panel – year slider
// ---------------------------------------------------------------------------

/// Render the year slider. Hidden until an index with data exists.
pub fn year_slider(ui: &mut Ui, state: &mut AppState) {
    let Some((min, max)) = state.year_bounds() else {
        ui.label("No seasons loaded.");
        return;
    };

    let mut year = state.selected_year;
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Season");
        let width = (ui.available_width() - 80.0).max(100.0);
        ui.spacing_mut().slider_width = width;
        let response = ui.add(egui::Slider::new(&mut year, min..=max).step_by(1.0));
        if response.changed() {
            state.set_year(year);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open season stats")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
