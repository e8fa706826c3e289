use crate::core::types::{DataPoint, ScreenPoint};

use super::{Axis, AxisKind};

impl Axis {
    /// Polar midpoint; only meaningful for magnitude axes after
    /// [`Axis::update_transform`].
    #[must_use]
    pub fn mid_point(&self) -> ScreenPoint {
        self.state.mid_point
    }

    /// Screen radius of the outer end of a magnitude axis.
    #[must_use]
    pub fn outer_radius(&self) -> f64 {
        self.state.screen_start.abs().max(self.state.screen_end.abs())
    }

    pub(super) fn angle_bounds(&self) -> (f64, f64) {
        match &self.kind {
            AxisKind::Angle(options) => (options.start_angle, options.end_angle),
            _ => (0.0, 360.0),
        }
    }

    /// Maps `(magnitude, angle)` to screen space around the midpoint.
    ///
    /// `self` must be the magnitude axis and `angle_axis` the angle axis.
    #[must_use]
    pub fn transform_polar(&self, magnitude: f64, angle: f64, angle_axis: &Axis) -> ScreenPoint {
        let radius = self.transform(magnitude);
        let theta = angle_axis.transform(angle).to_radians();
        let mid = self.state.mid_point;
        ScreenPoint::new(mid.x + radius * theta.cos(), mid.y - radius * theta.sin())
    }

    /// Inverse of [`Axis::transform_polar`].
    ///
    /// The screen angle is normalized into the angle axis' configured
    /// revolution before it is mapped back to a data value.
    #[must_use]
    pub fn inverse_transform_polar(&self, point: ScreenPoint, angle_axis: &Axis) -> DataPoint {
        let mid = self.state.mid_point;
        let dx = point.x - mid.x;
        let dy = mid.y - point.y;
        let radius = dx.hypot(dy);
        let mut theta = dy.atan2(dx).to_degrees();

        let (start, end) = angle_axis.angle_bounds();
        let low = start.min(end);
        while theta < low {
            theta += 360.0;
        }
        while theta >= low + 360.0 {
            theta -= 360.0;
        }

        DataPoint::new(self.inverse_transform(radius), angle_axis.inverse_transform(theta))
    }
}
