//! refline crate root: re-exports and module wiring.
//!
//! This crate draws "infinite" reference lines on an egui_plot canvas and
//! keeps them clipped to whatever part of the plane is currently visible.
//!
//! Modules:
//! - `data`: line equations, the view-rectangle solver, and line styling
//! - `host`: the interface a plotting host exposes (lines, bounds, notifications)
//! - `tracker`: keeps one host line in sync with the view
//! - `ref_lines`: `draw_infinite_line` and the horizontal/vertical wrappers
//! - `canvas`: an egui_plot-backed host
//! - `events`: view-change kinds and channel subscriptions
//! - `config` / `persistence`: startup configuration and its JSON/YAML files

pub mod canvas;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod host;
pub mod persistence;
pub mod ref_lines;
pub mod tracker;

// Public re-exports for a compact external API
pub use canvas::{CanvasLine, LineKind, PlotCanvas};
pub use config::RefLineConfig;
pub use data::geometry::{intersect, LineEquation, Segment, ViewRect};
pub use data::line_look::LineLook;
pub use error::{RefLineError, Result};
pub use events::{ViewChange, ViewChangeKind, ViewEventController, ViewEventFilter};
pub use host::{BoundsSource, LineId, LineSurface, PlotHost, SubscriptionId};
pub use persistence::{load_config, save_config};
pub use ref_lines::{
    draw_equation, draw_horizontal_line, draw_infinite_line, draw_vertical_line, draw_with_params,
    RefLineDef, RefLineKind,
};
pub use tracker::TrackerHandle;
