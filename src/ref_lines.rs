//! Drawing entry points for infinite, horizontal and vertical reference lines.
//!
//! Each function creates one host line, keeps it out of the legend and
//! attaches a tracker so the line stays clipped to the view.  The returned
//! [`LineId`] is the only handle; removing the line from the host also stops
//! the tracking.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::geometry::LineEquation;
use crate::data::line_look::LineLook;
use crate::error::{RefLineError, Result};
use crate::host::{LineId, PlotHost};
use crate::tracker;

/// Draw the line through `(bx, by)` with `slope` (`f64::INFINITY` for vertical).
pub fn draw_infinite_line<H>(
    host: &mut H,
    slope: f64,
    bx: f64,
    by: f64,
    look: &LineLook,
) -> Result<LineId>
where
    H: PlotHost + ?Sized,
{
    let equation = LineEquation::new(slope, bx, by)?;
    draw_equation(host, equation, look)
}

/// Draw the horizontal line `y = y`.
pub fn draw_horizontal_line<H>(host: &mut H, y: f64, look: &LineLook) -> Result<LineId>
where
    H: PlotHost + ?Sized,
{
    draw_infinite_line(host, 0.0, 0.0, y, look)
}

/// Draw the vertical line `x = x`.
pub fn draw_vertical_line<H>(host: &mut H, x: f64, look: &LineLook) -> Result<LineId>
where
    H: PlotHost + ?Sized,
{
    draw_infinite_line(host, f64::INFINITY, x, 0.0, look)
}

/// Draw an already validated line equation.
///
/// If the line cannot be tracked it is destroyed again before the error is
/// returned.
pub fn draw_equation<H>(host: &mut H, equation: LineEquation, look: &LineLook) -> Result<LineId>
where
    H: PlotHost + ?Sized,
{
    let line = host.create_line(&[], &[], look);
    if let Err(e) = track_line(host, equation, line) {
        if let Err(cleanup) = host.destroy_line(line) {
            warn!(%line, error = %cleanup, "failed to remove untracked reference line");
        }
        return Err(e);
    }
    debug!(
        %line,
        slope = equation.slope(),
        point = ?equation.point(),
        "reference line drawn"
    );
    Ok(line)
}

fn track_line<H>(host: &mut H, equation: LineEquation, line: LineId) -> Result<()>
where
    H: PlotHost + ?Sized,
{
    host.exclude_from_legend(line)?;
    tracker::attach(host, equation, line)?;
    Ok(())
}

/// Which entry point a positional parameter list is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefLineKind {
    /// `[slope, bx, by]`
    Infinite,
    /// `[y]`, y defaults to 0
    Horizontal,
    /// `[x]`, x defaults to 0
    Vertical,
}

impl RefLineKind {
    pub fn required_params(self) -> usize {
        match self {
            RefLineKind::Infinite => 3,
            RefLineKind::Horizontal | RefLineKind::Vertical => 0,
        }
    }

    pub fn max_params(self) -> usize {
        match self {
            RefLineKind::Infinite => 3,
            RefLineKind::Horizontal | RefLineKind::Vertical => 1,
        }
    }

    /// Build the line equation from a positional parameter list.
    pub fn equation(self, params: &[f64]) -> Result<LineEquation> {
        if params.len() < self.required_params() {
            return Err(RefLineError::invalid_argument(format!(
                "{self:?} line needs at least {} parameter(s), got {}",
                self.required_params(),
                params.len()
            )));
        }
        if params.len() > self.max_params() {
            return Err(RefLineError::invalid_argument(format!(
                "{self:?} line takes at most {} parameter(s), got {}",
                self.max_params(),
                params.len()
            )));
        }
        let coord = params.first().copied().unwrap_or(0.0);
        match self {
            RefLineKind::Infinite => LineEquation::new(params[0], params[1], params[2]),
            RefLineKind::Horizontal => LineEquation::horizontal(coord),
            RefLineKind::Vertical => LineEquation::vertical(coord),
        }
    }
}

/// Draw a line from a positional parameter list.
pub fn draw_with_params<H>(
    host: &mut H,
    kind: RefLineKind,
    params: &[f64],
    look: &LineLook,
) -> Result<LineId>
where
    H: PlotHost + ?Sized,
{
    let equation = kind.equation(params)?;
    draw_equation(host, equation, look)
}

/// A reference line described by configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RefLineDef {
    pub kind: RefLineKind,
    pub params: Vec<f64>,
    /// Falls back to the configured default look when unset.
    pub look: Option<LineLook>,
}

impl RefLineDef {
    pub fn horizontal(y: f64) -> Self {
        Self {
            kind: RefLineKind::Horizontal,
            params: vec![y],
            look: None,
        }
    }

    pub fn vertical(x: f64) -> Self {
        Self {
            kind: RefLineKind::Vertical,
            params: vec![x],
            look: None,
        }
    }

    pub fn infinite(slope: f64, bx: f64, by: f64) -> Self {
        Self {
            kind: RefLineKind::Infinite,
            params: vec![slope, bx, by],
            look: None,
        }
    }

    pub fn with_look(mut self, look: LineLook) -> Self {
        self.look = Some(look);
        self
    }

    pub fn draw<H>(&self, host: &mut H, default_look: &LineLook) -> Result<LineId>
    where
        H: PlotHost + ?Sized,
    {
        let look = self.look.as_ref().unwrap_or(default_look);
        draw_with_params(host, self.kind, &self.params, look)
    }
}
