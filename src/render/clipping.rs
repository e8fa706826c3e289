//! Cohen-Sutherland clipping for polylines drawn inside the plot area.

use crate::core::types::{PlotRect, ScreenPoint};

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

/// Clips a segment to `rect`; `None` when it lies entirely outside.
#[must_use]
pub fn clip_segment(
    mut start: ScreenPoint,
    mut end: ScreenPoint,
    rect: PlotRect,
) -> Option<(ScreenPoint, ScreenPoint)> {
    let mut out_start = region_code(start, rect);
    let mut out_end = region_code(end, rect);

    // Each pass moves one endpoint onto a boundary; four passes suffice.
    for _ in 0..8 {
        if (out_start | out_end) == 0 {
            return Some((start, end));
        }
        if (out_start & out_end) != 0 {
            return None;
        }

        let out_code = if out_start != 0 { out_start } else { out_end };
        let (x, y) = if (out_code & TOP) != 0 {
            (
                start.x + (end.x - start.x) * (rect.top - start.y) / (end.y - start.y),
                rect.top,
            )
        } else if (out_code & BOTTOM) != 0 {
            (
                start.x + (end.x - start.x) * (rect.bottom() - start.y) / (end.y - start.y),
                rect.bottom(),
            )
        } else if (out_code & RIGHT) != 0 {
            (
                rect.right(),
                start.y + (end.y - start.y) * (rect.right() - start.x) / (end.x - start.x),
            )
        } else {
            (
                rect.left,
                start.y + (end.y - start.y) * (rect.left - start.x) / (end.x - start.x),
            )
        };

        let new_point = ScreenPoint::new(x, y);
        if out_code == out_start {
            start = new_point;
            out_start = region_code(start, rect);
        } else {
            end = new_point;
            out_end = region_code(end, rect);
        }
    }
    None
}

fn region_code(point: ScreenPoint, rect: PlotRect) -> u8 {
    let mut code = 0;
    if point.x < rect.left {
        code |= LEFT;
    } else if point.x > rect.right() {
        code |= RIGHT;
    }
    if point.y < rect.top {
        code |= TOP;
    } else if point.y > rect.bottom() {
        code |= BOTTOM;
    }
    code
}

/// Clips a polyline to `rect`, splitting it where it leaves the rectangle.
///
/// Every returned piece has at least two points.
#[must_use]
pub fn clip_polyline(points: &[ScreenPoint], rect: PlotRect) -> Vec<Vec<ScreenPoint>> {
    let mut pieces = Vec::new();
    let mut current: Vec<ScreenPoint> = Vec::new();

    for pair in points.windows(2) {
        match clip_segment(pair[0], pair[1], rect) {
            Some((start, end)) => {
                let continues = current.last().is_some_and(|last| *last == start);
                if !continues {
                    flush(&mut pieces, &mut current);
                    current.push(start);
                }
                current.push(end);
            }
            None => flush(&mut pieces, &mut current),
        }
    }
    flush(&mut pieces, &mut current);
    pieces
}

fn flush(pieces: &mut Vec<Vec<ScreenPoint>>, current: &mut Vec<ScreenPoint>) {
    if current.len() >= 2 {
        pieces.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> PlotRect {
        PlotRect::new(0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn segment_inside_is_unchanged() {
        let start = ScreenPoint::new(2.0, 2.0);
        let end = ScreenPoint::new(8.0, 8.0);
        let clipped = clip_segment(start, end, rect()).expect("segment should clip");
        assert_eq!(clipped, (start, end));
    }

    #[test]
    fn crossing_segment_is_cut_at_boundary() {
        let clipped = clip_segment(ScreenPoint::new(-5.0, 5.0), ScreenPoint::new(5.0, 5.0), rect())
            .expect("segment should clip");
        assert_eq!(clipped.0, ScreenPoint::new(0.0, 5.0));
        assert!(clip_segment(ScreenPoint::new(-5.0, -5.0), ScreenPoint::new(-1.0, 20.0), rect()).is_none());
    }

    #[test]
    fn polyline_leaving_the_area_is_split() {
        let points = [
            ScreenPoint::new(1.0, 5.0),
            ScreenPoint::new(5.0, 5.0),
            ScreenPoint::new(5.0, 20.0),
            ScreenPoint::new(8.0, 20.0),
            ScreenPoint::new(8.0, 5.0),
        ];
        let pieces = clip_polyline(&points, rect());
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].first(), Some(&ScreenPoint::new(1.0, 5.0)));
        assert_eq!(pieces[1].last(), Some(&ScreenPoint::new(8.0, 5.0)));
    }
}
