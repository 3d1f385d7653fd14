//! Interfaces a plotting host exposes to reference lines.
//!
//! A host owns the displayed lines and the view rectangle.  Reference lines
//! never own either: they read the current bounds, write endpoint data into
//! a line, and keep one bounds subscription alive for as long as that line
//! exists.
//!
//! Listeners run synchronously on the thread that changed the bounds.  A
//! bounds listener is handed the host's [`LineSurface`] so it can update line
//! data without holding a second borrow of the host.

use crate::data::geometry::ViewRect;
use crate::data::line_look::LineLook;
use crate::error::Result;
use crate::events::ViewChange;

/// Handle of a line owned by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub u64);

impl std::fmt::Display for LineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line#{}", self.0)
    }
}

/// Token for a bounds-changed subscription, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Called on every view change with the host's line surface.
pub type BoundsListener = Box<dyn FnMut(&ViewChange, &mut dyn LineSurface) -> Result<()>>;

/// Called once when a line is destroyed, with the host's bounds source.
pub type DestroyListener = Box<dyn FnOnce(&mut dyn BoundsSource)>;

/// Line creation and mutation.
pub trait LineSurface {
    /// Create a line through the given points.
    fn create_line(&mut self, xs: &[f64], ys: &[f64], look: &LineLook) -> LineId;

    /// Replace a line's point data. Empty slices hide the line.
    fn set_line_data(&mut self, id: LineId, xs: &[f64], ys: &[f64]) -> Result<()>;

    /// Keep the line out of the legend.
    fn exclude_from_legend(&mut self, id: LineId) -> Result<()>;
}

/// The visible rectangle and its change notifications.
pub trait BoundsSource {
    /// Current visible x/y ranges.
    fn current_bounds(&self) -> ViewRect;

    /// Register a listener for view changes.
    fn on_bounds_changed(&mut self, listener: BoundsListener) -> SubscriptionId;

    /// Cancel a subscription. Returns `false` if it was not registered.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// A complete plotting host.
pub trait PlotHost: LineSurface + BoundsSource {
    /// Register a listener fired once when `id` is destroyed.
    fn on_destroyed(&mut self, id: LineId, listener: DestroyListener) -> Result<()>;

    /// Destroy a line, firing its destroy listeners.
    fn destroy_line(&mut self, id: LineId) -> Result<()>;
}
