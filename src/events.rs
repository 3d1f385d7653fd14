//! View-change events.
//!
//! Every time the visible rectangle of a [`PlotCanvas`](crate::canvas::PlotCanvas)
//! changes, a [`ViewChange`] is produced.  Its [`ViewChangeKind`] flags
//! (bitflags-style) say *why* the view changed; a single change may carry
//! several flags (a box zoom moves both X and Y limits *and* is a `ZOOM`).
//!
//! Bounds listeners registered through [`BoundsSource`](crate::host::BoundsSource)
//! receive every change synchronously.  Code outside the UI thread can instead
//! subscribe to a [`ViewEventController`] and read changes from an `mpsc`
//! channel, filtered by a [`ViewEventFilter`].

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

use crate::data::geometry::ViewRect;

// ─────────────────────────────────────────────────────────────────────────────
// ViewChangeKind – bitflags
// ─────────────────────────────────────────────────────────────────────────────

/// Bitflags describing why the view rectangle changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewChangeKind(pub u32);

impl ViewChangeKind {
    /// The X limits were set explicitly.
    pub const X_LIMITS: Self = Self(1 << 0);
    /// The Y limits were set explicitly.
    pub const Y_LIMITS: Self = Self(1 << 1);
    /// Auto-range mode was switched on or off.
    pub const AUTO_RANGE: Self = Self(1 << 2);
    /// The view was panned.
    pub const PAN: Self = Self(1 << 3);
    /// The view was zoomed (scroll-wheel, box-zoom, or programmatic).
    pub const ZOOM: Self = Self(1 << 4);
    /// The plot widget was resized.
    pub const RESIZE: Self = Self(1 << 5);

    /// Both axes changed.
    pub const LIMITS: Self = Self(Self::X_LIMITS.0 | Self::Y_LIMITS.0);

    /// Wildcard: matches every kind.
    pub const ALL: Self = Self(u32::MAX);

    /// Combine two kinds (bitwise OR).
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check whether `self` contains all bits in `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether `self` shares at least one bit with `other`.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Returns `true` if no bits are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for ViewChangeKind {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ViewChangeKind {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for ViewChangeKind {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl std::fmt::Display for ViewChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "EMPTY");
        }
        if *self == ViewChangeKind::ALL {
            return write!(f, "ALL");
        }

        let pairs: &[(ViewChangeKind, &str)] = &[
            (ViewChangeKind::X_LIMITS, "X_LIMITS"),
            (ViewChangeKind::Y_LIMITS, "Y_LIMITS"),
            (ViewChangeKind::AUTO_RANGE, "AUTO_RANGE"),
            (ViewChangeKind::PAN, "PAN"),
            (ViewChangeKind::ZOOM, "ZOOM"),
            (ViewChangeKind::RESIZE, "RESIZE"),
        ];

        let mut names = Vec::new();
        let mut known_bits: u32 = 0;
        for (kind, name) in pairs {
            known_bits |= kind.0;
            if self.contains(*kind) {
                names.push((*name).to_string());
            }
        }

        let extra = self.0 & !known_bits;
        if extra != 0 {
            names.push(format!("0x{:x}", extra));
        }
        write!(f, "{}", names.join("|"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ViewChange
// ─────────────────────────────────────────────────────────────────────────────

/// One change of the visible rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewChange {
    /// Why the view changed.
    pub kinds: ViewChangeKind,
    /// The view rectangle after the change.
    pub rect: ViewRect,
}

impl ViewChange {
    pub fn new(kinds: ViewChangeKind, rect: ViewRect) -> Self {
        Self { kinds, rect }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ViewEventFilter / ViewEventController
// ─────────────────────────────────────────────────────────────────────────────

/// OR-mask selecting which view changes a subscriber receives.
#[derive(Debug, Clone, Copy)]
pub struct ViewEventFilter {
    pub mask: ViewChangeKind,
}

impl ViewEventFilter {
    /// Accept all changes.
    pub const fn all() -> Self {
        Self {
            mask: ViewChangeKind::ALL,
        }
    }

    /// Accept only the given kinds.
    pub const fn only(mask: ViewChangeKind) -> Self {
        Self { mask }
    }

    #[inline]
    pub fn matches(&self, change: &ViewChange) -> bool {
        change.kinds.intersects(self.mask)
    }
}

impl Default for ViewEventFilter {
    fn default() -> Self {
        Self::all()
    }
}

struct Subscriber {
    filter: ViewEventFilter,
    sender: Sender<ViewChange>,
}

/// Broadcasts view changes to channel subscribers.
///
/// Clones share the same subscriber list, so one clone can live in the
/// canvas while another is handed to worker threads.
#[derive(Clone, Default)]
pub struct ViewEventController {
    inner: Arc<Mutex<Vec<Subscriber>>>,
}

impl ViewEventController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to view changes matching `filter`.
    pub fn subscribe(&self, filter: ViewEventFilter) -> Receiver<ViewChange> {
        let (tx, rx) = std::sync::mpsc::channel();
        if let Ok(mut subs) = self.inner.lock() {
            subs.push(Subscriber { filter, sender: tx });
        }
        rx
    }

    /// Subscribe to every view change.
    pub fn subscribe_all(&self) -> Receiver<ViewChange> {
        self.subscribe(ViewEventFilter::all())
    }

    /// Send `change` to every matching subscriber, dropping closed channels.
    pub fn emit(&self, change: ViewChange) {
        let Ok(mut subs) = self.inner.lock() else {
            return;
        };
        subs.retain(|sub| {
            if sub.filter.matches(&change) {
                sub.sender.send(change).is_ok()
            } else {
                true
            }
        });
    }

    /// Number of live subscribers (closed channels are pruned on the next matching emit).
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().map(|s| s.len()).unwrap_or(0)
    }
}
