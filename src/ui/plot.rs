use std::collections::HashMap;
use std::ops::RangeInclusive;

use eframe::egui::{RichText, Ui};
use egui_plot::{GridMark, MarkerShape, Plot, PlotPoint, Points};

use crate::color::{ColorScale, RadiusScale};
use crate::config::PipelineConfig;
use crate::data::model::{PlayerYearAggregate, StatField};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shooting scatter (central panel)
// ---------------------------------------------------------------------------

/// Render the 2PT% vs 3PT% scatter for the selected year.
pub fn shooting_plot(ui: &mut Ui, state: &AppState) {
    let Some(index) = &state.index else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a season stats CSV  (File → Open…)");
        });
        return;
    };
    if index.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No complete player seasons for this threshold");
        });
        return;
    }

    let config = &state.config;
    let year = state.selected_year;
    let players = state.selected_players();

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new(format!("NBA 2PT% vs 3PT% ({year})")).strong());
        ui.label(config.threshold.describe());
    });

    let colors = ColorScale::new(players);
    let radii = RadiusScale::new(players);

    // Keyed by player name, which is the series name the hover label receives.
    let tooltips: HashMap<String, String> = players
        .iter()
        .map(|p| (p.player.clone(), tooltip_text(p, config)))
        .collect();

    let scale = config.percent_scale;
    Plot::new("shooting_plot")
        .x_axis_label("2PT%")
        .y_axis_label("3PT%")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            scale.format(mark.value)
        })
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            scale.format(mark.value)
        })
        .label_formatter(move |name: &str, _value: &PlotPoint| {
            tooltips.get(name).cloned().unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for p in players {
                let (Some(x), Some(y)) = (p.stat(StatField::TwoPct), p.stat(StatField::ThreePct))
                else {
                    continue;
                };
                let points = Points::new(vec![[x, y]])
                    .name(&p.player)
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(radii.radius_for(p))
                    .color(colors.color_for(p));
                plot_ui.points(points);
            }
        });
}

/// Multi-line hover description of one player season.
pub fn tooltip_text(player: &PlayerYearAggregate, config: &PipelineConfig) -> String {
    let mut lines = vec![format!("Player: {}", player.player)];
    for spec in &config.fields {
        let Some(value) = player.stat(spec.field) else {
            continue;
        };
        let text = if spec.field.is_percentage() {
            config.percent_scale.format(value)
        } else {
            format!("{value:.0}")
        };
        lines.push(format!("{}: {text}", spec.field.label()));
    }
    lines.join("\n")
}
