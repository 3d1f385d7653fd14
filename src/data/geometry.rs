//! Line equations, view rectangles, and the rectangle-intersection solver.
//!
//! An "infinite" line is stored as a slope plus one point it passes through.
//! [`intersect`] finds where such a line enters and leaves an axis-aligned
//! rectangle, which is all that is needed to draw the visible part of it.

use serde::{Deserialize, Serialize};

use crate::error::{RefLineError, Result};

/// Axis-aligned rectangle in plot coordinates, usually the current view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewRect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for ViewRect {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
        }
    }
}

impl ViewRect {
    /// Build a rectangle from two ranges. Each pair may be given in either order.
    pub fn new(x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self {
            x_min: x_range.0.min(x_range.1),
            x_max: x_range.0.max(x_range.1),
            y_min: y_range.0.min(y_range.1),
            y_max: y_range.0.max(y_range.1),
        }
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.y_min, self.y_max)
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Whether all four bounds are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x_min.is_finite()
            && self.x_max.is_finite()
            && self.y_min.is_finite()
            && self.y_max.is_finite()
    }

    /// Grow the rectangle by `fraction` of its size on every side.
    pub fn padded(&self, fraction: f64) -> Self {
        let dx = self.width() * fraction;
        let dy = self.height() * fraction;
        Self {
            x_min: self.x_min - dx,
            x_max: self.x_max + dx,
            y_min: self.y_min - dy,
            y_max: self.y_max + dy,
        }
    }
}

/// The visible part of a line: two points on the boundary of a [`ViewRect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: [f64; 2],
    pub end: [f64; 2],
}

impl Segment {
    /// X coordinates of both endpoints, ready for a line's x data.
    pub fn xs(&self) -> [f64; 2] {
        [self.start[0], self.end[0]]
    }

    /// Y coordinates of both endpoints, ready for a line's y data.
    pub fn ys(&self) -> [f64; 2] {
        [self.start[1], self.end[1]]
    }
}

/// An infinite line through `point` with the given `slope`.
///
/// `slope` is either a finite number or `f64::INFINITY` for a vertical line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineEquation {
    slope: f64,
    point: [f64; 2],
}

impl LineEquation {
    /// Create a line, rejecting NaN slopes and non-finite anchor points.
    ///
    /// Negative infinity is accepted and stored as positive infinity; both
    /// describe the same vertical line.
    pub fn new(slope: f64, bx: f64, by: f64) -> Result<Self> {
        if slope.is_nan() {
            return Err(RefLineError::invalid_argument("slope must not be NaN"));
        }
        if !bx.is_finite() || !by.is_finite() {
            return Err(RefLineError::invalid_argument(format!(
                "anchor point ({bx}, {by}) must be finite"
            )));
        }
        let slope = if slope.is_infinite() {
            f64::INFINITY
        } else {
            slope
        };
        Ok(Self {
            slope,
            point: [bx, by],
        })
    }

    /// Horizontal line `y = y`.
    pub fn horizontal(y: f64) -> Result<Self> {
        Self::new(0.0, 0.0, y)
    }

    /// Vertical line `x = x`.
    pub fn vertical(x: f64) -> Result<Self> {
        Self::new(f64::INFINITY, x, 0.0)
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn point(&self) -> [f64; 2] {
        self.point
    }

    pub fn is_horizontal(&self) -> bool {
        self.slope == 0.0
    }

    pub fn is_vertical(&self) -> bool {
        self.slope.is_infinite()
    }

    /// Visible segment of this line inside `rect`, if any.
    pub fn clip(&self, rect: &ViewRect) -> Result<Option<Segment>> {
        intersect(
            self.slope,
            self.point[0],
            self.point[1],
            rect.x_range(),
            rect.y_range(),
        )
    }
}

/// Relative slack for accepting an edge hit that rounding put just outside
/// the rectangle. Accepted hits are snapped onto the bound they are near.
const EDGE_TOLERANCE: f64 = 1e-12;

/// Intersect the line through `(bx, by)` with `slope` against a rectangle.
///
/// Ranges may be given in either order. Horizontal and vertical lines use
/// strict bounds so a line lying exactly on an edge is not drawn; every other
/// slope uses inclusive bounds so lines through a corner are kept.
///
/// Edge hits are collected in the order left, right, bottom, top. A corner
/// lies on two edges and is counted once, so a line through two opposite
/// corners yields one hit on each vertical edge. A line that only touches a
/// single corner, or a rectangle with zero width or height, shows nothing.
pub fn intersect(
    slope: f64,
    bx: f64,
    by: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> Result<Option<Segment>> {
    if slope.is_nan() {
        return Err(RefLineError::invalid_argument("slope must not be NaN"));
    }
    if !bx.is_finite() || !by.is_finite() {
        return Err(RefLineError::invalid_argument(format!(
            "anchor point ({bx}, {by}) must be finite"
        )));
    }
    let (x0, x1) = (x_range.0.min(x_range.1), x_range.0.max(x_range.1));
    let (y0, y1) = (y_range.0.min(y_range.1), y_range.0.max(y_range.1));
    if ![x0, x1, y0, y1].iter().all(|v| v.is_finite()) {
        return Err(RefLineError::invalid_argument(format!(
            "view ranges must be finite, got {x_range:?} x {y_range:?}"
        )));
    }

    if slope == 0.0 {
        if y0 < by && by < y1 {
            return Ok(Some(Segment {
                start: [x0, by],
                end: [x1, by],
            }));
        }
        return Ok(None);
    }

    if slope.is_infinite() {
        if x0 < bx && bx < x1 {
            return Ok(Some(Segment {
                start: [bx, y0],
                end: [bx, y1],
            }));
        }
        return Ok(None);
    }

    // no interior, same as a horizontal line on an edge
    if x0 == x1 || y0 == y1 {
        return Ok(None);
    }

    let tol_x = EDGE_TOLERANCE * (x1 - x0).max(x0.abs()).max(x1.abs());
    let tol_y = EDGE_TOLERANCE * (y1 - y0).max(y0.abs()).max(y1.abs());
    let y_at = |x: f64| slope * (x - bx) + by;
    let x_at = |y: f64| (y - by) / slope + bx;

    let candidates = [
        snap_to_range(y_at(x0), (y0, y1), tol_y).map(|y| [x0, y]),
        snap_to_range(y_at(x1), (y0, y1), tol_y).map(|y| [x1, y]),
        snap_to_range(x_at(y0), (x0, x1), tol_x).map(|x| [x, y0]),
        snap_to_range(x_at(y1), (x0, x1), tol_x).map(|x| [x, y1]),
    ];
    let mut hits: Vec<[f64; 2]> = Vec::with_capacity(4);
    for p in candidates.into_iter().flatten() {
        // corners arrive once per adjacent edge
        if !hits.contains(&p) {
            hits.push(p);
        }
    }
    segment_from_hits(&hits)
}

/// `v` if it lies in `range`, give or take `tol`; values within `tol` of a
/// bound become that bound.
fn snap_to_range(v: f64, range: (f64, f64), tol: f64) -> Option<f64> {
    let (lo, hi) = range;
    if v < lo - tol || v > hi + tol {
        None
    } else if (v - lo).abs() <= tol {
        Some(lo)
    } else if (v - hi).abs() <= tol {
        Some(hi)
    } else {
        Some(v)
    }
}

/// Turn distinct boundary hits into the visible segment.
fn segment_from_hits(hits: &[[f64; 2]]) -> Result<Option<Segment>> {
    match hits {
        // a single point is a corner touched from outside
        [] | [_] => Ok(None),
        [start, end] => Ok(Some(Segment {
            start: *start,
            end: *end,
        })),
        _ => Err(RefLineError::GeometryInvariantViolation { hits: hits.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: [f64; 2], b: [f64; 2]) -> Option<Segment> {
        Some(Segment { start: a, end: b })
    }

    #[test]
    fn diagonal_through_square() {
        let s = intersect(1.0, 0.0, 0.0, (-5.0, 5.0), (-5.0, 5.0)).unwrap();
        assert_eq!(s, seg([-5.0, -5.0], [5.0, 5.0]));
    }

    #[test]
    fn horizontal_outside_view() {
        let s = intersect(0.0, 0.0, 10.0, (0.0, 2.0), (0.0, 5.0)).unwrap();
        assert_eq!(s, None);
    }

    #[test]
    fn vertical_inside_view() {
        let s = intersect(f64::INFINITY, 3.0, 0.0, (0.0, 5.0), (0.0, 5.0)).unwrap();
        assert_eq!(s, seg([3.0, 0.0], [3.0, 5.0]));
    }

    #[test]
    fn horizontal_on_edge_is_hidden() {
        assert_eq!(intersect(0.0, 0.0, 0.0, (0.0, 1.0), (0.0, 1.0)).unwrap(), None);
        assert_eq!(intersect(0.0, 0.0, 1.0, (0.0, 1.0), (0.0, 1.0)).unwrap(), None);
    }

    #[test]
    fn vertical_on_edge_is_hidden() {
        let v = f64::INFINITY;
        assert_eq!(intersect(v, 0.0, 0.0, (0.0, 1.0), (0.0, 1.0)).unwrap(), None);
        assert_eq!(intersect(v, 1.0, 0.0, (0.0, 1.0), (0.0, 1.0)).unwrap(), None);
    }

    #[test]
    fn reversed_ranges_give_same_result() {
        let a = intersect(0.5, 1.0, 1.0, (-4.0, 4.0), (-2.0, 2.0)).unwrap();
        let b = intersect(0.5, 1.0, 1.0, (4.0, -4.0), (2.0, -2.0)).unwrap();
        assert_eq!(a, b);
        assert!(a.is_some());
    }

    #[test]
    fn steep_line_hits_bottom_and_top() {
        // y = 4x through the origin in [-10,10] x [-4,4]
        let s = intersect(4.0, 0.0, 0.0, (-10.0, 10.0), (-4.0, 4.0)).unwrap();
        assert_eq!(s, seg([-1.0, -4.0], [1.0, 4.0]));
    }

    #[test]
    fn line_missing_the_view() {
        let s = intersect(1.0, 0.0, 100.0, (0.0, 1.0), (0.0, 1.0)).unwrap();
        assert_eq!(s, None);
    }

    #[test]
    fn opposite_corners_return_two_points() {
        let rects = [
            ((0.0, 2.0), (0.0, 4.0)),
            ((-1.0, 1.0), (-1.0, 1.0)),
            ((-8.0, 8.0), (-2.0, 2.0)),
            ((1.0, 5.0), (10.0, 18.0)),
        ];
        for (xr, yr) in rects {
            let (x0, x1) = xr;
            let (y0, y1) = yr;

            // bottom-left to top-right
            let slope = (y1 - y0) / (x1 - x0);
            let s = intersect(slope, x0, y0, xr, yr).unwrap();
            assert_eq!(s, seg([x0, y0], [x1, y1]), "rising diagonal of {xr:?} x {yr:?}");

            // top-left to bottom-right
            let s = intersect(-slope, x0, y1, xr, yr).unwrap();
            assert_eq!(s, seg([x0, y1], [x1, y0]), "falling diagonal of {xr:?} x {yr:?}");
        }
    }

    #[test]
    fn corner_plus_opposite_edge() {
        // (0,2) x (0,1): enter through each corner, leave through a far edge
        let (xr, yr) = ((0.0, 2.0), (0.0, 1.0));
        let cases = [
            (1.0, [0.0, 0.0], seg([0.0, 0.0], [1.0, 1.0])),
            (-1.0, [0.0, 1.0], seg([0.0, 1.0], [1.0, 0.0])),
            (-1.0, [2.0, 0.0], seg([2.0, 0.0], [1.0, 1.0])),
            (1.0, [2.0, 1.0], seg([2.0, 1.0], [1.0, 0.0])),
        ];
        for (slope, [bx, by], expected) in cases {
            let s = intersect(slope, bx, by, xr, yr).unwrap();
            assert_eq!(s, expected, "slope {slope} through ({bx}, {by})");
        }

        // tall view: corner plus the opposite vertical edge
        let s = intersect(1.0, 0.0, 0.0, (0.0, 1.0), (0.0, 2.0)).unwrap();
        assert_eq!(s, seg([0.0, 0.0], [1.0, 1.0]));
        let s = intersect(-1.0, 0.0, 2.0, (0.0, 1.0), (0.0, 2.0)).unwrap();
        assert_eq!(s, seg([0.0, 2.0], [1.0, 1.0]));
    }

    #[test]
    fn inexact_diagonal_hits_both_corners() {
        let slope = 0.7 / 0.3;
        let s = intersect(slope, 0.0, 0.0, (0.0, 0.3), (0.0, 0.7)).unwrap();
        assert_eq!(s, seg([0.0, 0.0], [0.3, 0.7]));

        let s = intersect(-slope, 0.0, 0.7, (0.0, 0.3), (0.0, 0.7)).unwrap();
        assert_eq!(s, seg([0.0, 0.7], [0.3, 0.0]));
    }

    #[test]
    fn single_corner_touch_is_not_visible() {
        // y = -x only touches (0,0) of [0,1] x [0,1]
        let s = intersect(-1.0, 0.0, 0.0, (0.0, 1.0), (0.0, 1.0)).unwrap();
        assert_eq!(s, None);
        let s = intersect(1.0, 0.0, 1.0, (-1.0, 0.0), (-1.0, 0.0)).unwrap();
        assert_eq!(s, None);
    }

    #[test]
    fn view_without_interior_shows_nothing() {
        assert_eq!(intersect(1.0, 0.0, 0.0, (0.0, 0.0), (-1.0, 0.0)).unwrap(), None);
        assert_eq!(intersect(1.0, 0.0, 0.0, (-1.0, 1.0), (0.0, 0.0)).unwrap(), None);
    }

    #[test]
    fn general_slopes_land_on_the_boundary() {
        let slopes = [-50.0, -7.5, -2.0, -1.0, -0.3, -1e-3, 1e-3, 0.25, 0.7 / 0.3, 1.0, 3.0, 50.0];
        let rects = [
            ((0.0, 2.0), (0.0, 1.0)),
            ((-1.0, 1.0), (-1.0, 1.0)),
            ((0.0, 0.3), (0.0, 0.7)),
            ((-8.0, 8.0), (-2.0, 2.0)),
            ((1.0, 5.0), (10.0, 18.0)),
        ];
        for ((x0, x1), (y0, y1)) in rects {
            let center = [(x0 + x1) / 2.0, (y0 + y1) / 2.0];
            let anchors = [[x0, y0], [x0, y1], [x1, y0], [x1, y1], center, [x1 + 1.0, y0]];
            let scale = [x0, x1, y0, y1].iter().fold(1.0_f64, |m, v: &f64| m.max(v.abs()));
            for slope in slopes {
                for [bx, by] in anchors {
                    let label =
                        format!("slope {slope} through ({bx}, {by}) in {x0}..{x1} x {y0}..{y1}");
                    let s = intersect(slope, bx, by, (x0, x1), (y0, y1)).unwrap();
                    let Some(s) = s else {
                        assert_ne!([bx, by], center, "{label}");
                        continue;
                    };
                    assert_ne!(s.start, s.end, "{label}");
                    for [x, y] in [s.start, s.end] {
                        assert!(x0 <= x && x <= x1 && y0 <= y && y <= y1, "{label}");
                        assert!(x == x0 || x == x1 || y == y0 || y == y1, "{label}");
                        let residual = (y - by) - slope * (x - bx);
                        assert!(residual.abs() <= 1e-9 * (1.0 + slope.abs()) * scale, "{label}");
                    }
                }
            }
        }
    }

    #[test]
    fn more_than_two_distinct_hits_is_an_error() {
        let hits = [[0.0, 0.0], [1.0, 1.0], [0.5, 1.0]];
        let err = segment_from_hits(&hits).unwrap_err();
        assert!(matches!(err, RefLineError::GeometryInvariantViolation { hits: 3 }));
    }

    #[test]
    fn intersect_rejects_malformed_input() {
        let r = (0.0, 1.0);
        assert!(matches!(
            intersect(f64::NAN, 0.0, 0.0, r, r),
            Err(RefLineError::InvalidArgument(_))
        ));
        assert!(intersect(1.0, f64::NAN, 0.0, r, r).is_err());
        assert!(intersect(1.0, 0.0, 0.0, (0.0, f64::INFINITY), r).is_err());
    }

    #[test]
    fn equation_rejects_nan() {
        assert!(matches!(
            LineEquation::new(f64::NAN, 0.0, 0.0),
            Err(RefLineError::InvalidArgument(_))
        ));
        assert!(LineEquation::new(1.0, f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn negative_infinity_is_vertical() {
        let l = LineEquation::new(f64::NEG_INFINITY, 2.0, 0.0).unwrap();
        assert!(l.is_vertical());
        assert_eq!(l.slope(), f64::INFINITY);
    }

    #[test]
    fn view_rect_normalizes_and_pads() {
        let r = ViewRect::new((3.0, -1.0), (2.0, 0.0));
        assert_eq!(r.x_range(), (-1.0, 3.0));
        assert_eq!(r.y_range(), (0.0, 2.0));
        let p = r.padded(0.25);
        assert_eq!(p.x_range(), (-2.0, 4.0));
        assert_eq!(p.y_range(), (-0.5, 2.5));
    }
}
