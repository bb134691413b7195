use std::path::Path;

use anyhow::Result;

use crate::config::{PipelineConfig, Preset};
use crate::data::build_index;
use crate::data::loader::load_file;
use crate::data::model::{PlayerYearAggregate, RawRow, YearIndex};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Raw rows of the last successful load, kept so a preset change can
    /// re-run the pipeline without touching the file again.
    pub rows: Vec<RawRow>,

    /// Active pipeline configuration.
    pub config: PipelineConfig,

    /// Preset the config came from, `None` for a config file.
    pub preset: Option<Preset>,

    /// Built index (None until a file is loaded).
    pub index: Option<YearIndex>,

    /// Year picked on the slider.
    pub selected_year: i32,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(PipelineConfig::default(), Some(Preset::default()))
    }
}

impl AppState {
    pub fn with_config(config: PipelineConfig, preset: Option<Preset>) -> Self {
        Self {
            rows: Vec::new(),
            config,
            preset,
            index: None,
            selected_year: 0,
            status_message: None,
        }
    }

    /// Load a CSV and rebuild the index. On failure the previous data stays
    /// and the error is reported in the status line.
    pub fn open(&mut self, path: &Path) {
        if let Err(e) = self.try_open(path) {
            log::error!("Failed to load file: {e:#}");
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }

    fn try_open(&mut self, path: &Path) -> Result<()> {
        let rows = load_file(path)?;
        log::info!("Loaded {} rows from {}", rows.len(), path.display());
        self.set_rows(rows);
        Ok(())
    }

    /// Ingest freshly loaded rows.
    pub fn set_rows(&mut self, rows: Vec<RawRow>) {
        self.rows = rows;
        self.status_message = None;
        self.rebuild();
    }

    /// Switch to a preset and re-run the pipeline.
    pub fn set_preset(&mut self, preset: Preset) {
        self.preset = Some(preset);
        self.config = preset.config();
        self.rebuild();
    }

    /// Re-run filter + aggregate over the stored rows and reset the slider
    /// to the earliest year.
    pub fn rebuild(&mut self) {
        if self.rows.is_empty() {
            self.index = None;
            return;
        }
        let index = build_index(&self.rows, &self.config);
        match index.bounds() {
            Some((min, _)) => {
                self.selected_year = min;
                self.status_message = None;
            }
            None => {
                self.status_message =
                    Some("No player met the threshold with complete data.".to_string())
            }
        }
        self.index = Some(index);
    }

    /// Move the slider; snaps to the nearest year that has data.
    pub fn set_year(&mut self, year: i32) {
        if let Some(index) = &self.index {
            if let Some(present) = index.nearest_year(year) {
                self.selected_year = present;
            }
        }
    }

    /// Players of the selected year.
    pub fn selected_players(&self) -> &[PlayerYearAggregate] {
        self.index
            .as_ref()
            .and_then(|index| index.get(self.selected_year))
            .unwrap_or(&[])
    }

    /// `(min, max)` year of the loaded index.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.index.as_ref().and_then(YearIndex::bounds)
    }
}
