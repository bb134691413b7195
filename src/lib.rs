//! NBA 2PT% vs 3PT% season scatter viewer.
//!
//! The data layer (`data`, `config`) is UI-independent; `app`, `state`, `ui`
//! and `color` make up the egui front end.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
