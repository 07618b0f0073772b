//! Integer and rounding helpers shared by the mappers.

/// Greatest common divisor of two `u64` values. `gcd_u64(0, 0)` is 0.
///
/// # Examples
///
/// ```
/// # use tunemap::math;
/// assert_eq!(math::gcd_u64(0, 0), 0);
/// assert_eq!(math::gcd_u64(81, 64), 1);
/// assert_eq!(math::gcd_u64(27, 36), 9);
/// assert_eq!(math::gcd_u64(5, 0), 5);
/// ```
pub fn gcd_u64(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Reduces the fraction `numer/denom` and converts it back to `u32`s if possible.
///
/// # Examples
///
/// ```
/// # use tunemap::math;
/// assert_eq!(math::simplify_u64(30, 24), Some((5, 4)));
/// assert_eq!(math::simplify_u64(1 << 40, 1 << 39), Some((2, 1)));
/// assert_eq!(math::simplify_u64(1 << 40, 3), None);
/// ```
pub fn simplify_u64(numer: u64, denom: u64) -> Option<(u32, u32)> {
    let gcd = gcd_u64(numer, denom).max(1);
    let numer = u32::try_from(numer / gcd).ok()?;
    let denom = u32::try_from(denom / gcd).ok()?;
    Some((numer, denom))
}

/// Direction in which a value lying in an ambiguity band is rounded.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RoundingDirection {
    Down,
    Up,
}

impl RoundingDirection {
    pub fn opposite(self) -> Self {
        match self {
            RoundingDirection::Down => RoundingDirection::Up,
            RoundingDirection::Up => RoundingDirection::Down,
        }
    }
}

/// Rounds `value` to the nearest integer unless its fractional part lies within `[0.5 - half_tolerance, 0.5 + half_tolerance]`.
/// Inside that band, `direction` decides.
///
/// # Examples
///
/// ```
/// # use tunemap::math::{self, RoundingDirection};
/// assert_eq!(math::round_with_tolerance(3.44, 0.05, RoundingDirection::Up), 3);
/// assert_eq!(math::round_with_tolerance(3.46, 0.05, RoundingDirection::Up), 4);
/// assert_eq!(math::round_with_tolerance(3.54, 0.05, RoundingDirection::Down), 3);
/// assert_eq!(math::round_with_tolerance(3.56, 0.05, RoundingDirection::Down), 4);
/// assert_eq!(math::round_with_tolerance(-0.5, 0.05, RoundingDirection::Down), -1);
/// assert_eq!(math::round_with_tolerance(-0.5, 0.05, RoundingDirection::Up), 0);
/// ```
pub fn round_with_tolerance(value: f64, half_tolerance: f64, direction: RoundingDirection) -> i32 {
    if is_within_half_band(value, half_tolerance) {
        match direction {
            RoundingDirection::Down => value.floor() as i32,
            RoundingDirection::Up => value.ceil() as i32,
        }
    } else {
        value.round() as i32
    }
}

/// Checks whether the fractional part of `value` lies within `[0.5 - half_tolerance, 0.5 + half_tolerance]`.
pub fn is_within_half_band(value: f64, half_tolerance: f64) -> bool {
    let fract = value - value.floor();
    (0.5 - half_tolerance..=0.5 + half_tolerance).contains(&fract)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn band_edges_are_inclusive() {
        assert!(is_within_half_band(7.45, 0.05 + 1e-12));
        assert!(is_within_half_band(7.55, 0.05 + 1e-12));
        assert!(!is_within_half_band(7.44, 0.05));
        assert!(!is_within_half_band(7.56, 0.05));
        assert!(is_within_half_band(-2.5, 0.0));
    }

    #[test]
    fn zero_tolerance_only_affects_exact_halves() {
        assert_eq!(round_with_tolerance(2.5, 0.0, RoundingDirection::Down), 2);
        assert_eq!(round_with_tolerance(2.5, 0.0, RoundingDirection::Up), 3);
        assert_eq!(round_with_tolerance(2.49, 0.0, RoundingDirection::Up), 2);
        assert_eq!(round_with_tolerance(2.51, 0.0, RoundingDirection::Down), 3);
    }

    #[test]
    fn opposite_direction() {
        assert_eq!(RoundingDirection::Down.opposite(), RoundingDirection::Up);
        assert_eq!(RoundingDirection::Up.opposite(), RoundingDirection::Down);
    }
}
