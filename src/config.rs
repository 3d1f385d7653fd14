//! Configuration for a reference-line canvas.

use crate::data::geometry::ViewRect;
use crate::data::line_look::LineLook;
use crate::ref_lines::RefLineDef;

/// Settings used to build a [`PlotCanvas`](crate::canvas::PlotCanvas) and
/// the reference lines drawn on it at startup.
///
/// Load from disk with [`load_config`](crate::persistence::load_config).
#[derive(Debug, Clone, PartialEq)]
pub struct RefLineConfig {
    /// Window title used by the demo binary.
    pub title: String,
    /// egui id of the plot widget.
    pub plot_id: String,
    /// View rectangle before any user interaction.
    pub initial_view: ViewRect,
    /// Start in auto-range mode.
    pub auto_range: bool,
    /// Show the plot legend.
    pub show_legend: bool,
    /// Look used for reference lines without their own.
    pub default_look: LineLook,
    /// Reference lines to draw at startup.
    pub lines: Vec<RefLineDef>,
}

impl Default for RefLineConfig {
    fn default() -> Self {
        Self {
            title: "refline".to_string(),
            plot_id: "refline_canvas".to_string(),
            initial_view: ViewRect::new((-10.0, 10.0), (-5.0, 5.0)),
            auto_range: false,
            show_legend: true,
            default_look: LineLook::default(),
            lines: Vec::new(),
        }
    }
}
