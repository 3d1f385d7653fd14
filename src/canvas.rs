//! `PlotCanvas`: an egui_plot-backed [`PlotHost`].
//!
//! The canvas owns every line it shows and the current view rectangle.  It
//! fires bounds listeners whenever the view changes, whether through the
//! explicit setters below, auto-range, or user pan/zoom inside [`PlotCanvas::show`].
//!
//! Lines come in two flavours:
//! - data lines ([`PlotCanvas::add_data_line`]) take part in auto-range fitting
//!   and show up in the legend;
//! - overlay lines ([`LineSurface::create_line`]) are ignored by auto-range,
//!   since reference lines always span the view they are clipped to.

use std::collections::{BTreeMap, HashMap};

use egui::PointerButton;
use egui_plot::{Legend, Line, Plot, PlotBounds};
use tracing::{debug, trace, warn};

use crate::config::RefLineConfig;
use crate::data::geometry::ViewRect;
use crate::data::line_look::LineLook;
use crate::error::{RefLineError, Result};
use crate::events::{ViewChange, ViewChangeKind, ViewEventController};
use crate::host::{
    BoundsListener, BoundsSource, DestroyListener, LineId, LineSurface, PlotHost, SubscriptionId,
};

/// Padding added on each side when auto-range fits the data.
const AUTO_RANGE_PADDING: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Data,
    Overlay,
}

/// A line stored by the canvas.
#[derive(Debug, Clone)]
pub struct CanvasLine {
    pub name: String,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub look: LineLook,
    pub in_legend: bool,
    pub kind: LineKind,
}

impl CanvasLine {
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.xs.iter().zip(self.ys.iter()).map(|(x, y)| [*x, *y]).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

pub struct PlotCanvas {
    plot_id: String,
    lines: BTreeMap<LineId, CanvasLine>,
    bounds: ViewRect,
    auto_range: bool,
    pub show_legend: bool,
    next_line: u64,
    next_subscription: u64,
    listeners: Vec<(SubscriptionId, BoundsListener)>,
    destroy_listeners: HashMap<LineId, Vec<DestroyListener>>,
    events: Option<ViewEventController>,
    last_size: Option<[f32; 2]>,
}

impl Default for PlotCanvas {
    fn default() -> Self {
        Self::new("refline_canvas")
    }
}

impl PlotCanvas {
    pub fn new(plot_id: impl Into<String>) -> Self {
        Self {
            plot_id: plot_id.into(),
            lines: BTreeMap::new(),
            bounds: ViewRect::default(),
            auto_range: false,
            show_legend: true,
            next_line: 0,
            next_subscription: 0,
            listeners: Vec::new(),
            destroy_listeners: HashMap::new(),
            events: None,
            last_size: None,
        }
    }

    /// Create a canvas with the view and legend settings from `cfg`.
    pub fn from_config(cfg: &RefLineConfig) -> Self {
        let mut canvas = Self::new(cfg.plot_id.clone());
        canvas.bounds = cfg.initial_view;
        canvas.auto_range = cfg.auto_range;
        canvas.show_legend = cfg.show_legend;
        canvas
    }

    /// Forward every view change to `ctrl` as well as to bounds listeners.
    pub fn set_event_controller(&mut self, ctrl: ViewEventController) {
        self.events = Some(ctrl);
    }

    pub fn bounds(&self) -> ViewRect {
        self.bounds
    }

    pub fn auto_range(&self) -> bool {
        self.auto_range
    }

    pub fn line(&self, id: LineId) -> Option<&CanvasLine> {
        self.lines.get(&id)
    }

    pub fn line_mut(&mut self, id: LineId) -> Option<&mut CanvasLine> {
        self.lines.get_mut(&id)
    }

    pub fn lines(&self) -> impl Iterator<Item = (LineId, &CanvasLine)> {
        self.lines.iter().map(|(id, l)| (*id, l))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.listeners.len()
    }

    // ── View changes ────────────────────────────────────────────────────

    /// Set both ranges. Turns auto-range off.
    pub fn set_bounds(&mut self, rect: ViewRect) -> Result<()> {
        self.apply_bounds(rect, ViewChangeKind::LIMITS)
    }

    /// Set the X range, keeping the Y range. Turns auto-range off.
    pub fn set_x_limits(&mut self, x0: f64, x1: f64) -> Result<()> {
        let rect = ViewRect::new((x0, x1), self.bounds.y_range());
        self.apply_bounds(rect, ViewChangeKind::X_LIMITS)
    }

    /// Set the Y range, keeping the X range. Turns auto-range off.
    pub fn set_y_limits(&mut self, y0: f64, y1: f64) -> Result<()> {
        let rect = ViewRect::new(self.bounds.x_range(), (y0, y1));
        self.apply_bounds(rect, ViewChangeKind::Y_LIMITS)
    }

    /// Switch auto-range on or off.
    ///
    /// Switching on refits the view to the data lines. Either way listeners
    /// are notified once.
    pub fn set_auto_range(&mut self, on: bool) -> Result<()> {
        self.auto_range = on;
        if on {
            if let Some(rect) = self.fit_rect() {
                self.bounds = rect;
            }
        }
        self.notify(ViewChangeKind::AUTO_RANGE)
    }

    fn apply_bounds(&mut self, rect: ViewRect, kinds: ViewChangeKind) -> Result<()> {
        if !rect.is_finite() {
            return Err(RefLineError::invalid_argument(format!(
                "view bounds must be finite, got {rect:?}"
            )));
        }
        self.auto_range = false;
        self.bounds = rect;
        self.notify(kinds)
    }

    /// Rectangle enclosing all visible data lines, padded; `None` without data.
    fn fit_rect(&self) -> Option<ViewRect> {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for line in self.lines.values() {
            if line.kind != LineKind::Data || !line.look.visible {
                continue;
            }
            for (x, y) in line.xs.iter().zip(line.ys.iter()) {
                if !x.is_finite() || !y.is_finite() {
                    continue;
                }
                min_x = min_x.min(*x);
                max_x = max_x.max(*x);
                min_y = min_y.min(*y);
                max_y = max_y.max(*y);
            }
        }
        if min_x > max_x || min_y > max_y {
            return None;
        }
        // a single value still needs a non-empty range
        if min_x == max_x {
            min_x -= 0.5;
            max_x += 0.5;
        }
        if min_y == max_y {
            min_y -= 0.5;
            max_y += 0.5;
        }
        Some(ViewRect::new((min_x, max_x), (min_y, max_y)).padded(AUTO_RANGE_PADDING))
    }

    /// Run every bounds listener once with the current view.
    ///
    /// All listeners run even if one fails; the first error is returned.
    fn notify(&mut self, kinds: ViewChangeKind) -> Result<()> {
        let change = ViewChange::new(kinds, self.bounds);
        trace!(%kinds, rect = ?change.rect, listeners = self.listeners.len(), "view changed");
        if let Some(ctrl) = &self.events {
            ctrl.emit(change);
        }

        let mut listeners = std::mem::take(&mut self.listeners);
        let mut result = Ok(());
        for (id, listener) in listeners.iter_mut() {
            let surface: &mut dyn LineSurface = &mut *self;
            if let Err(e) = listener(&change, surface) {
                warn!(?id, error = %e, "bounds listener failed");
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        // keep anything registered while listeners were running
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
        result
    }

    // ── Lines ───────────────────────────────────────────────────────────

    /// Add a named data line. Refits the view when auto-range is on.
    pub fn add_data_line(
        &mut self,
        name: impl Into<String>,
        points: &[[f64; 2]],
        look: LineLook,
    ) -> Result<LineId> {
        let id = self.alloc_line_id();
        self.lines.insert(
            id,
            CanvasLine {
                name: name.into(),
                xs: points.iter().map(|p| p[0]).collect(),
                ys: points.iter().map(|p| p[1]).collect(),
                look,
                in_legend: true,
                kind: LineKind::Data,
            },
        );
        if self.auto_range {
            if let Some(rect) = self.fit_rect() {
                if rect != self.bounds {
                    self.bounds = rect;
                    self.notify(ViewChangeKind::LIMITS)?;
                }
            }
        }
        Ok(id)
    }

    /// Remove a line, firing its destroy listeners.
    pub fn remove_line(&mut self, id: LineId) -> Result<CanvasLine> {
        let line = self.lines.remove(&id).ok_or(RefLineError::UnknownLine(id))?;
        let listeners = self.destroy_listeners.remove(&id).unwrap_or_default();
        debug!(%id, listeners = listeners.len(), "line removed");
        for listener in listeners {
            let source: &mut dyn BoundsSource = &mut *self;
            listener(source);
        }
        Ok(line)
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        let ids: Vec<LineId> = self.lines.keys().copied().collect();
        for id in ids {
            // ids come from the map itself
            let _ = self.remove_line(id);
        }
    }

    fn alloc_line_id(&mut self) -> LineId {
        let id = LineId(self.next_line);
        self.next_line += 1;
        id
    }

    // ── Rendering ───────────────────────────────────────────────────────

    /// Render the canvas and feed user pan/zoom back into the view.
    ///
    /// Lines are drawn with the data computed for the previous view; when the
    /// view changes a repaint is requested so the next frame shows the
    /// updated endpoints.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Result<()> {
        let mut plot = Plot::new(self.plot_id.as_str()).allow_boxed_zoom(true);
        if self.show_legend {
            plot = plot.legend(Legend::default());
        }

        let bounds = self.bounds;
        let lines = &self.lines;
        let plot_resp = plot.show(ui, |plot_ui| {
            let resp = plot_ui.response();
            let mut kinds = ViewChangeKind(0);
            if resp.dragged_by(PointerButton::Primary) {
                kinds |= ViewChangeKind::PAN;
            }
            let scroll = resp.ctx.input(|i| i.raw_scroll_delta);
            if (scroll.x != 0.0 || scroll.y != 0.0) && resp.hovered() {
                kinds |= ViewChangeKind::ZOOM;
            }
            if resp.drag_stopped_by(PointerButton::Secondary) {
                kinds |= ViewChangeKind::ZOOM;
            }

            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [bounds.x_min, bounds.y_min],
                [bounds.x_max, bounds.y_max],
            ));

            for line in lines.values() {
                if !line.look.visible || line.is_empty() {
                    continue;
                }
                // an empty name keeps the line out of the legend
                let name = if line.in_legend {
                    line.name.clone()
                } else {
                    String::new()
                };
                plot_ui.line(
                    Line::new(name, line.points())
                        .color(line.look.color)
                        .width(line.look.width.max(0.1))
                        .style(line.look.style),
                );
            }
            kinds
        });

        let size = [
            plot_resp.response.rect.width(),
            plot_resp.response.rect.height(),
        ];
        let mut kinds = plot_resp.inner;
        if self.last_size.is_some_and(|s| s != size) {
            kinds |= ViewChangeKind::RESIZE;
        }
        self.last_size = Some(size);

        let b = plot_resp.transform.bounds();
        let shown = ViewRect::new((b.min()[0], b.max()[0]), (b.min()[1], b.max()[1]));
        if shown.is_finite() && !same_view(&shown, &self.bounds) {
            self.auto_range = false;
            self.bounds = shown;
            ui.ctx().request_repaint();
            return self.notify(kinds | ViewChangeKind::LIMITS);
        }
        Ok(())
    }
}

/// Bounds equal up to rounding noise relative to the view size.
fn same_view(a: &ViewRect, b: &ViewRect) -> bool {
    let tol_x = b.width().abs().max(f64::MIN_POSITIVE) * 1e-9;
    let tol_y = b.height().abs().max(f64::MIN_POSITIVE) * 1e-9;
    (a.x_min - b.x_min).abs() <= tol_x
        && (a.x_max - b.x_max).abs() <= tol_x
        && (a.y_min - b.y_min).abs() <= tol_y
        && (a.y_max - b.y_max).abs() <= tol_y
}

impl LineSurface for PlotCanvas {
    fn create_line(&mut self, xs: &[f64], ys: &[f64], look: &LineLook) -> LineId {
        let id = self.alloc_line_id();
        self.lines.insert(
            id,
            CanvasLine {
                name: id.to_string(),
                xs: xs.to_vec(),
                ys: ys.to_vec(),
                look: look.clone(),
                in_legend: true,
                kind: LineKind::Overlay,
            },
        );
        id
    }

    fn set_line_data(&mut self, id: LineId, xs: &[f64], ys: &[f64]) -> Result<()> {
        let line = self.lines.get_mut(&id).ok_or(RefLineError::UnknownLine(id))?;
        line.xs.clear();
        line.xs.extend_from_slice(xs);
        line.ys.clear();
        line.ys.extend_from_slice(ys);
        Ok(())
    }

    fn exclude_from_legend(&mut self, id: LineId) -> Result<()> {
        let line = self.lines.get_mut(&id).ok_or(RefLineError::UnknownLine(id))?;
        line.in_legend = false;
        Ok(())
    }
}

impl BoundsSource for PlotCanvas {
    fn current_bounds(&self) -> ViewRect {
        self.bounds
    }

    fn on_bounds_changed(&mut self, listener: BoundsListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }
}

impl PlotHost for PlotCanvas {
    fn on_destroyed(&mut self, id: LineId, listener: DestroyListener) -> Result<()> {
        if !self.lines.contains_key(&id) {
            return Err(RefLineError::UnknownLine(id));
        }
        self.destroy_listeners.entry(id).or_default().push(listener);
        Ok(())
    }

    fn destroy_line(&mut self, id: LineId) -> Result<()> {
        self.remove_line(id).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn listeners_fire_once_per_change() {
        let mut canvas = PlotCanvas::default();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        canvas.on_bounds_changed(Box::new(move |_: &ViewChange, _: &mut dyn LineSurface| {
            c.set(c.get() + 1);
            Ok(())
        }));

        canvas.set_x_limits(0.0, 4.0).unwrap();
        canvas.set_y_limits(-1.0, 1.0).unwrap();
        canvas.set_auto_range(true).unwrap();
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut canvas = PlotCanvas::default();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let id = canvas.on_bounds_changed(Box::new(move |_: &ViewChange, _: &mut dyn LineSurface| {
            c.set(c.get() + 1);
            Ok(())
        }));
        assert!(canvas.unsubscribe(id));
        assert!(!canvas.unsubscribe(id));
        canvas.set_bounds(ViewRect::new((0.0, 1.0), (0.0, 1.0))).unwrap();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn listener_error_propagates_after_all_listeners_ran() {
        let mut canvas = PlotCanvas::default();
        let count = Rc::new(Cell::new(0));
        canvas.on_bounds_changed(Box::new(|_: &ViewChange, _: &mut dyn LineSurface| {
            Err(RefLineError::GeometryInvariantViolation { hits: 1 })
        }));
        let c = count.clone();
        canvas.on_bounds_changed(Box::new(move |_: &ViewChange, _: &mut dyn LineSurface| {
            c.set(c.get() + 1);
            Ok(())
        }));
        let err = canvas.set_x_limits(0.0, 2.0).unwrap_err();
        assert!(matches!(err, RefLineError::GeometryInvariantViolation { hits: 1 }));
        assert_eq!(count.get(), 1);
        assert_eq!(canvas.subscription_count(), 2);
    }

    #[test]
    fn auto_range_fits_data_lines_only() {
        let mut canvas = PlotCanvas::default();
        canvas
            .add_data_line("data", &[[0.0, 0.0], [10.0, 20.0]], LineLook::default())
            .unwrap();
        canvas.create_line(&[-100.0, 100.0], &[-100.0, 100.0], &LineLook::default());
        canvas.set_auto_range(true).unwrap();
        let b = canvas.bounds();
        assert_eq!(b.x_range(), (-0.5, 10.5));
        assert_eq!(b.y_range(), (-1.0, 21.0));
    }

    #[test]
    fn auto_range_without_data_keeps_view() {
        let mut canvas = PlotCanvas::default();
        canvas.set_bounds(ViewRect::new((2.0, 3.0), (4.0, 5.0))).unwrap();
        canvas.set_auto_range(true).unwrap();
        assert!(canvas.auto_range());
        assert_eq!(canvas.bounds(), ViewRect::new((2.0, 3.0), (4.0, 5.0)));
    }

    #[test]
    fn explicit_limits_turn_auto_range_off() {
        let mut canvas = PlotCanvas::default();
        canvas.set_auto_range(true).unwrap();
        canvas.set_x_limits(0.0, 1.0).unwrap();
        assert!(!canvas.auto_range());
    }

    #[test]
    fn non_finite_bounds_are_rejected() {
        let mut canvas = PlotCanvas::default();
        let err = canvas
            .set_bounds(ViewRect::new((0.0, f64::INFINITY), (0.0, 1.0)))
            .unwrap_err();
        assert!(matches!(err, RefLineError::InvalidArgument(_)));
    }

    #[test]
    fn remove_line_fires_destroy_listeners_once() {
        let mut canvas = PlotCanvas::default();
        let id = canvas.create_line(&[], &[], &LineLook::default());
        let fired = Rc::new(Cell::new(0));
        let f = fired.clone();
        canvas
            .on_destroyed(id, Box::new(move |_: &mut dyn BoundsSource| f.set(f.get() + 1)))
            .unwrap();
        canvas.remove_line(id).unwrap();
        assert_eq!(fired.get(), 1);
        assert!(matches!(
            canvas.remove_line(id),
            Err(RefLineError::UnknownLine(_))
        ));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn destroy_line_goes_through_remove() {
        let mut canvas = PlotCanvas::default();
        let id = canvas.create_line(&[], &[], &LineLook::default());
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        canvas
            .on_destroyed(id, Box::new(move |_: &mut dyn BoundsSource| f.set(true)))
            .unwrap();
        canvas.destroy_line(id).unwrap();
        assert!(fired.get());
        assert_eq!(canvas.line_count(), 0);
        assert!(canvas.destroy_line(id).is_err());
    }

    #[test]
    fn unknown_line_updates_fail() {
        let mut canvas = PlotCanvas::default();
        assert!(canvas.set_line_data(LineId(42), &[0.0], &[0.0]).is_err());
        assert!(canvas.exclude_from_legend(LineId(42)).is_err());
        assert!(canvas
            .on_destroyed(LineId(42), Box::new(|_: &mut dyn BoundsSource| {}))
            .is_err());
    }

    #[test]
    fn event_controller_sees_changes() {
        let mut canvas = PlotCanvas::default();
        let ctrl = ViewEventController::new();
        let rx = ctrl.subscribe_all();
        canvas.set_event_controller(ctrl);
        canvas.set_y_limits(-2.0, 2.0).unwrap();
        let change = rx.try_recv().unwrap();
        assert_eq!(change.kinds, ViewChangeKind::Y_LIMITS);
        assert_eq!(change.rect.y_range(), (-2.0, 2.0));
    }
}
