//! World bounds.
//!
//! The world is the square `[WORLD_MIN, WORLD_MAX]²`. Every position write
//! goes through [`clamp_coordinate`].

/// Lower bound of both axes.
pub const WORLD_MIN: f64 = 0.0;

/// Upper bound of both axes.
pub const WORLD_MAX: f64 = 2000.0;

/// Clamp a single axis value into the world.
///
/// NaN collapses to `WORLD_MIN` so a bad value can never escape the bounds.
#[inline]
pub fn clamp_coordinate(value: f64) -> f64 {
    if value.is_nan() {
        return WORLD_MIN;
    }
    value.clamp(WORLD_MIN, WORLD_MAX)
}

/// Check that a position lies inside the world.
#[inline]
pub fn in_world(x: f64, y: f64) -> bool {
    (WORLD_MIN..=WORLD_MAX).contains(&x) && (WORLD_MIN..=WORLD_MAX).contains(&y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inside_is_identity() {
        assert_eq!(clamp_coordinate(0.0), 0.0);
        assert_eq!(clamp_coordinate(1234.5), 1234.5);
        assert_eq!(clamp_coordinate(2000.0), 2000.0);
    }

    #[test]
    fn test_clamp_outside() {
        assert_eq!(clamp_coordinate(-0.5), WORLD_MIN);
        assert_eq!(clamp_coordinate(-1e12), WORLD_MIN);
        assert_eq!(clamp_coordinate(2000.1), WORLD_MAX);
        assert_eq!(clamp_coordinate(f64::INFINITY), WORLD_MAX);
        assert_eq!(clamp_coordinate(f64::NEG_INFINITY), WORLD_MIN);
    }

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_coordinate(f64::NAN), WORLD_MIN);
    }

    #[test]
    fn test_in_world() {
        assert!(in_world(0.0, 2000.0));
        assert!(!in_world(-1.0, 5.0));
        assert!(!in_world(5.0, 2001.0));
    }
}
