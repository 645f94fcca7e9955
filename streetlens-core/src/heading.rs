//! Compass heading normalization.
//!
//! Raw device-orientation events differ by platform: some carry a dedicated
//! compass heading field calibrated against magnetic north, others only the
//! standard `alpha` angle. This module reduces both shapes to a single
//! integer heading in `[0, 360)` and maps headings onto the 8 compass points.

use serde::{Deserialize, Serialize};

/// A raw device-orientation event, as delivered by the platform.
///
/// `alpha` is the standard orientation angle (counterclockwise from north);
/// `webkit_compass_heading` is the platform-specific compass heading
/// (clockwise from north), present only on some devices. Either or both
/// fields may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOrientation {
    pub alpha: Option<f64>,
    pub webkit_compass_heading: Option<f64>,
}

impl RawOrientation {
    /// Event carrying only the standard `alpha` angle.
    pub fn from_alpha(alpha: f64) -> Self {
        Self {
            alpha: Some(alpha),
            webkit_compass_heading: None,
        }
    }

    /// Event carrying a platform compass heading (and optionally `alpha`).
    pub fn from_compass(heading: f64) -> Self {
        Self {
            alpha: None,
            webkit_compass_heading: Some(heading),
        }
    }
}

/// Reduce a raw orientation event to an integer heading in `[0, 360)`.
///
/// The platform compass field wins when present (it is calibrated against
/// magnetic north); otherwise the heading is derived from `alpha`, which
/// runs counterclockwise, so the compass heading is `360 - alpha`. Returns
/// `None` when the event carries neither field.
pub fn normalize_heading(event: &RawOrientation) -> Option<u16> {
    let degrees = match (event.webkit_compass_heading, event.alpha) {
        (Some(compass), _) => compass,
        (None, Some(alpha)) => 360.0 - alpha,
        (None, None) => return None,
    };
    Some(degrees.round().rem_euclid(360.0) as u16)
}

/// The 8 compass points, in clockwise order from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

const POINTS: [CompassPoint; 8] = [
    CompassPoint::N,
    CompassPoint::NE,
    CompassPoint::E,
    CompassPoint::SE,
    CompassPoint::S,
    CompassPoint::SW,
    CompassPoint::W,
    CompassPoint::NW,
];

impl CompassPoint {
    /// Map a heading in degrees onto its compass point.
    ///
    /// Buckets are 45 degrees wide and centered on the points, so each point
    /// owns the 22.5 degrees either side of it; a boundary value such as
    /// 22.5 rounds up to the clockwise neighbor. Periodic: any multiple of
    /// 360 added to the heading yields the same point.
    pub fn from_degrees(degrees: f64) -> Self {
        let bucket = (degrees.rem_euclid(360.0) / 45.0).round() as usize % 8;
        POINTS[bucket]
    }

    /// Map an already-normalized integer heading onto its compass point.
    pub fn from_heading(heading: u16) -> Self {
        Self::from_degrees(f64::from(heading))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

impl std::fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compass_field_wins_over_alpha() {
        let event = RawOrientation {
            alpha: Some(90.0),
            webkit_compass_heading: Some(123.4),
        };
        assert_eq!(normalize_heading(&event), Some(123));
    }

    #[test]
    fn test_alpha_runs_counterclockwise() {
        // alpha = 90 means the device turned 90 degrees counterclockwise,
        // which is a compass heading of 270.
        assert_eq!(normalize_heading(&RawOrientation::from_alpha(90.0)), Some(270));
        assert_eq!(normalize_heading(&RawOrientation::from_alpha(0.0)), Some(0));
    }

    #[test]
    fn test_rounding_wraps_at_north() {
        // 359.6 rounds to 360, which must wrap to 0, not clamp to 359.
        assert_eq!(
            normalize_heading(&RawOrientation::from_compass(359.6)),
            Some(0)
        );
        assert_eq!(
            normalize_heading(&RawOrientation::from_compass(359.4)),
            Some(359)
        );
    }

    #[test]
    fn test_empty_event_has_no_heading() {
        assert_eq!(normalize_heading(&RawOrientation::default()), None);
    }

    #[test]
    fn test_compass_point_centers() {
        assert_eq!(CompassPoint::from_heading(0), CompassPoint::N);
        assert_eq!(CompassPoint::from_heading(45), CompassPoint::NE);
        assert_eq!(CompassPoint::from_heading(90), CompassPoint::E);
        assert_eq!(CompassPoint::from_heading(135), CompassPoint::SE);
        assert_eq!(CompassPoint::from_heading(180), CompassPoint::S);
        assert_eq!(CompassPoint::from_heading(225), CompassPoint::SW);
        assert_eq!(CompassPoint::from_heading(270), CompassPoint::W);
        assert_eq!(CompassPoint::from_heading(315), CompassPoint::NW);
    }

    #[test]
    fn test_compass_point_periodic() {
        for h in 0..360u16 {
            assert_eq!(
                CompassPoint::from_heading(h),
                CompassPoint::from_degrees(f64::from(h) + 360.0),
                "heading {h} not periodic"
            );
        }
    }

    #[test]
    fn test_boundary_rounds_up() {
        // 22.5 is exactly between N and NE; ties round to the clockwise side.
        assert_eq!(CompassPoint::from_degrees(22.5), CompassPoint::NE);
        assert_eq!(CompassPoint::from_degrees(22.4), CompassPoint::N);
        // The last boundary wraps back to N.
        assert_eq!(CompassPoint::from_degrees(337.5), CompassPoint::N);
        assert_eq!(CompassPoint::from_degrees(337.4), CompassPoint::NW);
    }

    #[test]
    fn test_buckets_are_45_degrees_wide() {
        let mut counts = [0usize; 8];
        for h in 0..360u16 {
            let point = CompassPoint::from_heading(h);
            counts[POINTS.iter().position(|p| *p == point).unwrap()] += 1;
        }
        assert_eq!(counts, [45usize; 8]);
    }
}
