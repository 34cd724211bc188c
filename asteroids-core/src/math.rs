//! Toroidal playfield math.
//!
//! Positions live in `[0, width) x [0, height)`. Every helper here tolerates
//! zero velocities, zero `dt` and degenerate extents without producing NaN.

/// Wraps `value` into `[0, extent)`. A value exactly at `extent` maps to 0.
#[inline]
pub fn wrap(value: f32, extent: f32) -> f32 {
    if !(extent > 0.0) || !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs.
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

/// Signed shortest displacement from `from` to `to` on a ring of size `extent`.
#[inline]
pub fn shortest_delta(from: f32, to: f32, extent: f32) -> f32 {
    let mut delta = to - from;
    if extent <= 0.0 {
        return delta;
    }
    let half = extent * 0.5;
    if delta > half {
        delta -= extent;
    } else if delta < -half {
        delta += extent;
    }
    delta
}

/// Euclidean distance between two points taking the shortest path on the torus.
#[inline]
pub fn wrapped_distance(ax: f32, ay: f32, bx: f32, by: f32, width: f32, height: f32) -> f32 {
    let dx = wrapped_axis_delta(ax, bx, width);
    let dy = wrapped_axis_delta(ay, by, height);
    (dx * dx + dy * dy).sqrt()
}

#[inline]
fn wrapped_axis_delta(a: f32, b: f32, extent: f32) -> f32 {
    let direct = (a - b).abs();
    if extent > 0.0 {
        direct.min((extent - direct).abs())
    } else {
        direct
    }
}

/// Circle overlap on the torus. A radius of zero treats that side as a point.
#[inline]
pub fn circles_overlap(
    ax: f32,
    ay: f32,
    ar: f32,
    bx: f32,
    by: f32,
    br: f32,
    width: f32,
    height: f32,
) -> bool {
    wrapped_distance(ax, ay, bx, by, width, height) < ar + br
}

/// Rescales `(vx, vy)` uniformly so its length is at most `max_speed`.
#[inline]
pub fn clamp_speed(vx: f32, vy: f32, max_speed: f32) -> (f32, f32) {
    let speed = (vx * vx + vy * vy).sqrt();
    if speed > max_speed && speed > 0.0 {
        let scale = max_speed / speed;
        (vx * scale, vy * scale)
    } else {
        (vx, vy)
    }
}

#[inline]
pub fn velocity(angle: f32, speed: f32) -> (f32, f32) {
    (angle.cos() * speed, angle.sin() * speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_stays_in_range() {
        let extents = [800.0f32, 600.0, 1.0, 1234.5];
        let values = [
            -10_000.0f32,
            -800.0,
            -0.0001,
            0.0,
            0.5,
            799.999,
            800.0,
            800.0001,
            1_600.0,
            12_345.6,
        ];
        for extent in extents {
            for value in values {
                let wrapped = wrap(value, extent);
                assert!(
                    (0.0..extent).contains(&wrapped),
                    "wrap({value}, {extent}) = {wrapped}"
                );
            }
        }
    }

    #[test]
    fn wrap_boundary_maps_to_zero() {
        assert_eq!(wrap(800.0, 800.0), 0.0);
        assert_eq!(wrap(0.0, 800.0), 0.0);
        assert_eq!(wrap(-1.0, 800.0), 799.0);
        assert_eq!(wrap(801.0, 800.0), 1.0);
    }

    #[test]
    fn wrap_handles_degenerate_inputs() {
        assert_eq!(wrap(f32::NAN, 800.0), 0.0);
        assert_eq!(wrap(f32::INFINITY, 800.0), 0.0);
        assert_eq!(wrap(10.0, 0.0), 0.0);
    }

    #[test]
    fn wrapped_distance_takes_the_short_way() {
        let d = wrapped_distance(10.0, 10.0, 790.0, 790.0, 800.0, 800.0);
        assert!((d - 28.284_27).abs() < 1e-3, "got {d}");
    }

    #[test]
    fn wrapped_distance_never_exceeds_straight_line() {
        let points = [
            (0.0f32, 0.0f32),
            (10.0, 590.0),
            (400.0, 300.0),
            (799.0, 1.0),
            (123.4, 456.7),
        ];
        for (ax, ay) in points {
            for (bx, by) in points {
                let wrapped = wrapped_distance(ax, ay, bx, by, 800.0, 600.0);
                let straight = ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt();
                assert!(wrapped <= straight + 1e-3);

                // Minimum over the image grid.
                let mut best = f32::MAX;
                for sx in [-800.0f32, 0.0, 800.0] {
                    for sy in [-600.0f32, 0.0, 600.0] {
                        let d = ((ax - (bx + sx)).powi(2) + (ay - (by + sy)).powi(2)).sqrt();
                        best = best.min(d);
                    }
                }
                assert!((wrapped - best).abs() < 1e-2);
            }
        }
    }

    #[test]
    fn shortest_delta_crosses_the_seam() {
        assert_eq!(shortest_delta(790.0, 10.0, 800.0), 20.0);
        assert_eq!(shortest_delta(10.0, 790.0, 800.0), -20.0);
        assert_eq!(shortest_delta(100.0, 150.0, 800.0), 50.0);
    }

    #[test]
    fn clamp_speed_rescales_uniformly() {
        let (vx, vy) = clamp_speed(300.0, 400.0, 400.0);
        assert!(((vx * vx + vy * vy).sqrt() - 400.0).abs() < 1e-3);
        assert!((vx / vy - 0.75).abs() < 1e-5);
    }

    #[test]
    fn clamp_speed_leaves_zero_velocity_alone() {
        assert_eq!(clamp_speed(0.0, 0.0, 400.0), (0.0, 0.0));
        assert_eq!(clamp_speed(0.0, 0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn circles_overlap_treats_zero_radius_as_point() {
        assert!(circles_overlap(
            795.0, 300.0, 0.0, 5.0, 300.0, 20.0, 800.0, 600.0
        ));
        assert!(!circles_overlap(
            100.0, 100.0, 0.0, 200.0, 100.0, 40.0, 800.0, 600.0
        ));
    }
}
