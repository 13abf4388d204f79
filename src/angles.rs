//! Angle extraction
//!
//! Signed angles between two joints relative to a reference plane. All angles
//! are in degrees within `[-90, 90]`; the axis left out of the plane decides
//! the sign. With plane XZ, a hand above its shoulder is positive and a hand
//! below it is negative.

use crate::types::{Plane, Point3D, Skeleton};
use serde::{Deserialize, Serialize};

/// Angle of `end_point` seen from `origin`, relative to `plane` (degrees).
///
/// `atan2` keeps this total: a zero tangent length yields exactly ±90 (or 0
/// when the points coincide).
///
/// The YZ plane uses the z delta for both the tangent length and the sign.
/// Only the XZ plane feeds scoring.
pub fn angle(end_point: &Point3D, origin: &Point3D, plane: Plane) -> f64 {
    let (dx, dy, dz) = end_point.delta_from(origin);

    let (tangent, signed) = match plane {
        Plane::XY => (dx.hypot(dy), dz),
        Plane::XZ => (dx.hypot(dz), dy),
        Plane::YZ => (dy.hypot(dz), dz),
    };

    signed.atan2(tangent).to_degrees()
}

/// Angles shown next to the live skeleton. Feet are not scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    pub right_hand: f64,
    pub left_hand: f64,
    pub right_foot: f64,
    pub left_foot: f64,
}

impl JointAngles {
    pub fn from_skeleton(skeleton: &Skeleton) -> Self {
        Self {
            right_hand: angle(&skeleton.right_hand, &skeleton.right_shoulder, Plane::XZ),
            left_hand: angle(&skeleton.left_hand, &skeleton.left_shoulder, Plane::XZ),
            right_foot: angle(&skeleton.right_foot, &skeleton.hip, Plane::XZ),
            left_foot: angle(&skeleton.left_foot, &skeleton.hip, Plane::XZ),
        }
    }
}

/// Display form of an angle, floored to one decimal: `"12.3 degrees"`
pub fn format_degrees(degrees: f64) -> String {
    let floored = (10.0 * degrees).floor() / 10.0;
    format!("{floored:.1} degrees")
}
