use std::path::PathBuf;

use eframe::egui;
use shot_scatter::app::ShotScatterApp;
use shot_scatter::config::PipelineConfig;
use shot_scatter::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = PipelineConfig::from_env_or_default();
    let preset = config.preset();
    let mut state = AppState::with_config(config, preset);

    // Optional CSV path on the command line, loaded before the first frame.
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        state.open(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 900.0])
            .with_min_inner_size([500.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Shot Scatter – NBA 2PT% vs 3PT%",
        options,
        Box::new(|_cc| Ok(Box::new(ShotScatterApp::new(state)))),
    )
}
