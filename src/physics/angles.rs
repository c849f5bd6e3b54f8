//! Joint angle calculation using the atan2 difference
//!
//! Calculates the interior angle at a middle landmark B formed by A-B-C,
//! e.g. shoulder-elbow-wrist for the elbow or shoulder-hip-knee for the hip.

/// Calculate the interior angle at `b` in whole degrees
///
/// All three points must share one coordinate space (pixels or normalized).
/// The result is folded into `[0, 180]` and rounded to the nearest degree:
/// - 90 = joint bent at a right angle
/// - 180 = joint fully straight
///
/// `b` coincident with `a` or `c` has no meaningful angle; callers must not
/// feed such triples.
pub fn calculate_angle_deg(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> i32 {
    let rad = (c.1 - b.1).atan2(c.0 - b.0) - (a.1 - b.1).atan2(a.0 - b.0);

    let mut deg = rad.abs().to_degrees();
    if deg > 180.0 {
        deg = 360.0 - deg;
    }

    deg.round() as i32
}
