//! Keeps a displayed line's endpoints on the view boundary.
//!
//! A tracker ties one [`LineEquation`] to one host line.  It pushes the
//! clipped segment once on attach, again on every bounds change, and drops
//! its bounds subscription when the host destroys the line.  There is no
//! explicit detach: the line's lifetime is the tracker's lifetime.

use tracing::{debug, trace};

use crate::data::geometry::{LineEquation, ViewRect};
use crate::error::Result;
use crate::events::ViewChange;
use crate::host::{BoundsSource, LineId, LineSurface, PlotHost, SubscriptionId};

/// What [`attach`] registered with the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerHandle {
    pub line: LineId,
    pub subscription: SubscriptionId,
    pub equation: LineEquation,
}

/// Start tracking `line` so it always shows `equation` clipped to the view.
pub fn attach<H>(host: &mut H, equation: LineEquation, line: LineId) -> Result<TrackerHandle>
where
    H: PlotHost + ?Sized,
{
    let rect = host.current_bounds();
    sync_line(host, line, &equation, &rect)?;

    let subscription = host.on_bounds_changed(Box::new(
        move |change: &ViewChange, surface: &mut dyn LineSurface| {
            sync_line(surface, line, &equation, &change.rect)
        },
    ));

    let teardown = host.on_destroyed(
        line,
        Box::new(move |source: &mut dyn BoundsSource| {
            let removed = source.unsubscribe(subscription);
            trace!(%line, ?subscription, removed, "reference line destroyed");
        }),
    );
    if let Err(e) = teardown {
        host.unsubscribe(subscription);
        return Err(e);
    }

    trace!(%line, ?subscription, "tracking reference line");
    Ok(TrackerHandle {
        line,
        subscription,
        equation,
    })
}

/// Recompute the visible segment and write it into `line`.
///
/// Lines with no visible part get empty data.
pub fn sync_line<S>(
    surface: &mut S,
    line: LineId,
    equation: &LineEquation,
    rect: &ViewRect,
) -> Result<()>
where
    S: LineSurface + ?Sized,
{
    match equation.clip(rect)? {
        Some(seg) => {
            debug!(%line, start = ?seg.start, end = ?seg.end, "reference line clipped");
            surface.set_line_data(line, &seg.xs(), &seg.ys())
        }
        None => {
            debug!(%line, "reference line outside view");
            surface.set_line_data(line, &[], &[])
        }
    }
}
