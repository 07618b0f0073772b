//! Musical intervals in their different notations.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Add;
use std::ops::Sub;
use std::str::FromStr;

use crate::math;
use crate::parse;

/// The relative distance between two pitches.
///
/// Every variant can be converted into the others via [`Interval::cents`] or [`Interval::as_float`].
/// Adding or subtracting two intervals of the same variant keeps the variant, e.g. ratios stay exact fractions.
/// Mixing variants falls back to [`Interval::Real`]. EDO step counts that do not fit into an `i32` fall back to [`Interval::Cents`].
///
/// # Examples
///
/// ```
/// # use assert_approx_eq::assert_approx_eq;
/// # use tunemap::interval::Interval;
/// assert_approx_eq!(Interval::from_ratio(3, 2).cents(), 701.955, 1e-3);
/// assert_approx_eq!(Interval::from_cents(400.0).as_float(), 1.259921);
/// assert_approx_eq!(Interval::from_edo_steps(72, 21).cents(), 350.0);
/// assert_approx_eq!(Interval::from_float(2.0).cents(), 1200.0);
///
/// assert_eq!(Interval::from_ratio(3, 2) + Interval::from_ratio(4, 3), Interval::from_ratio(2, 1));
/// assert_eq!(Interval::from_ratio(3, 2) - Interval::from_ratio(5, 4), Interval::from_ratio(6, 5));
/// assert_eq!(Interval::from_cents(100.0) + Interval::from_cents(50.0), Interval::from_cents(150.0));
/// assert_eq!(Interval::from_edo_steps(53, 9) + Interval::from_edo_steps(53, 8), Interval::from_edo_steps(53, 17));
/// assert!(matches!(Interval::from_ratio(3, 2) + Interval::from_cents(1.0), Interval::Real(_)));
/// ```
///
/// # Panics
///
/// The constructors panic if the resulting frequency ratio is not a finite positive number.
///
/// ```should_panic
/// # use tunemap::interval::Interval;
/// Interval::from_ratio(0, 1);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Interval {
    /// Exact fraction `numer/denom` in lowest terms.
    Ratio { numer: u32, denom: u32 },
    /// Logarithmic value in cents.
    Cents(f64),
    /// `steps` steps of the equal division of the octave into `edo` parts.
    Edo { edo: u32, steps: i32 },
    /// Arbitrary linear frequency ratio.
    Real(f64),
}

impl Interval {
    pub fn from_ratio(numer: u32, denom: u32) -> Self {
        assert!(
            numer > 0 && denom > 0,
            "Ratio must be positive but was {}/{}",
            numer,
            denom
        );
        Self::from_fraction_u64(u64::from(numer), u64::from(denom))
    }

    pub fn from_cents(cents_value: f64) -> Self {
        assert!(
            cents_value.is_finite(),
            "Cents value must be finite but was {}",
            cents_value
        );
        Interval::Cents(cents_value)
    }

    pub fn from_edo_steps(edo: u32, steps: i32) -> Self {
        assert!(edo > 0, "EDO must be positive");
        Interval::Edo { edo, steps }
    }

    /// Creates an [`Interval::Edo`] from a 12-EDO semitone count refined by `offset` steps of the finer division.
    ///
    /// Only divisions that are a multiple of 12 contain the 12-EDO semitones, so `None` is returned otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tunemap::interval::Interval;
    /// assert_eq!(Interval::edo_with_offset(72, 4, -1), Some(Interval::from_edo_steps(72, 23)));
    /// assert_eq!(Interval::edo_with_offset(24, 3, 1), Some(Interval::from_edo_steps(24, 7)));
    /// assert_eq!(Interval::edo_with_offset(53, 4, 0), None);
    /// ```
    pub fn edo_with_offset(edo: u32, semitones: i32, offset: i32) -> Option<Self> {
        if edo == 0 || edo % 12 != 0 {
            return None;
        }
        let steps_per_semitone = i32::try_from(edo / 12).ok()?;
        let steps = semitones
            .checked_mul(steps_per_semitone)?
            .checked_add(offset)?;
        Some(Self::from_edo_steps(edo, steps))
    }

    pub fn from_float(float_value: f64) -> Self {
        assert!(
            float_value.is_finite() && float_value > 0.0,
            "Ratio must be finite and positive but was {}",
            float_value
        );
        Interval::Real(float_value)
    }

    pub fn unison() -> Self {
        Interval::Ratio { numer: 1, denom: 1 }
    }

    pub fn octave() -> Self {
        Interval::Ratio { numer: 2, denom: 1 }
    }

    fn from_fraction_u64(numer: u64, denom: u64) -> Self {
        match math::simplify_u64(numer, denom) {
            Some((numer, denom)) => Interval::Ratio { numer, denom },
            None => Interval::Real(numer as f64 / denom as f64),
        }
    }

    pub fn cents(self) -> f64 {
        match self {
            Interval::Ratio { numer, denom } => {
                1200.0 * (f64::from(numer) / f64::from(denom)).log2()
            }
            Interval::Cents(cents_value) => cents_value,
            Interval::Edo { edo, steps } => 1200.0 * f64::from(steps) / f64::from(edo),
            Interval::Real(float_value) => 1200.0 * float_value.log2(),
        }
    }

    pub fn as_float(self) -> f64 {
        match self {
            Interval::Ratio { numer, denom } => f64::from(numer) / f64::from(denom),
            Interval::Real(float_value) => float_value,
            Interval::Cents(_) | Interval::Edo { .. } => (self.cents() / 1200.0).exp2(),
        }
    }

    /// Checks for the exact neutral element of the respective variant.
    ///
    /// ```
    /// # use tunemap::interval::Interval;
    /// assert!(Interval::from_ratio(3, 3).is_unison());
    /// assert!(Interval::from_cents(0.0).is_unison());
    /// assert!(Interval::from_edo_steps(72, 0).is_unison());
    /// assert!(!Interval::from_cents(0.001).is_unison());
    /// ```
    pub fn is_unison(self) -> bool {
        match self {
            Interval::Ratio { numer, denom } => numer == denom,
            Interval::Cents(cents_value) => cents_value == 0.0,
            Interval::Edo { steps, .. } => steps == 0,
            Interval::Real(float_value) => float_value == 1.0,
        }
    }

    /// The interval pointing into the opposite direction.
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use tunemap::interval::Interval;
    /// assert_eq!(Interval::from_ratio(3, 2).inv(), Interval::from_ratio(2, 3));
    /// assert_eq!(Interval::from_edo_steps(12, 7).inv(), Interval::from_edo_steps(12, -7));
    /// assert_approx_eq!(Interval::from_float(4.0).inv().as_float(), 0.25);
    /// ```
    pub fn inv(self) -> Self {
        match self {
            Interval::Ratio { numer, denom } => Interval::Ratio {
                numer: denom,
                denom: numer,
            },
            Interval::Cents(cents_value) => Interval::Cents(-cents_value),
            Interval::Edo { edo, steps } => Interval::Edo { edo, steps: -steps },
            Interval::Real(float_value) => Interval::Real(1.0 / float_value),
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::unison()
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Self) -> Self::Output {
        if rhs.is_unison() {
            return self;
        }
        if self.is_unison() {
            return rhs;
        }
        match (self, rhs) {
            (
                Interval::Ratio {
                    numer: numer_a,
                    denom: denom_a,
                },
                Interval::Ratio {
                    numer: numer_b,
                    denom: denom_b,
                },
            ) => Self::from_fraction_u64(
                u64::from(numer_a) * u64::from(numer_b),
                u64::from(denom_a) * u64::from(denom_b),
            ),
            (Interval::Cents(cents_a), Interval::Cents(cents_b)) => {
                Interval::Cents(cents_a + cents_b)
            }
            (
                Interval::Edo {
                    edo: edo_a,
                    steps: steps_a,
                },
                Interval::Edo {
                    edo: edo_b,
                    steps: steps_b,
                },
            ) if edo_a == edo_b => match steps_a.checked_add(steps_b) {
                Some(steps) => Interval::Edo { edo: edo_a, steps },
                None => Interval::Cents(self.cents() + rhs.cents()),
            },
            (a, b) => Interval::Real(a.as_float() * b.as_float()),
        }
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Self) -> Self::Output {
        self + rhs.inv()
    }
}

/// ```
/// # use tunemap::interval::Interval;
/// assert_eq!(Interval::from_ratio(81, 64).to_string(), "81/64");
/// assert_eq!(Interval::from_cents(150.5).to_string(), "150.5c");
/// assert_eq!(Interval::from_edo_steps(72, 21).to_string(), "21\\72");
/// assert_eq!(Interval::from_float(1.5).to_string(), "1.5");
/// ```
impl Display for Interval {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let formatted = match self {
            Interval::Ratio { numer, denom } => format!("{}/{}", numer, denom),
            Interval::Cents(cents_value) => format!("{}c", cents_value),
            Interval::Edo { edo, steps } => format!("{}\\{}", steps, edo),
            Interval::Real(float_value) => format!("{}", float_value),
        };
        f.pad(&formatted)
    }
}

/// [`Interval`]s can be parsed from ratios (`5/4`), cents values (`386.3c`), EDO steps (`21\72`) or floats (`1.25`).
///
/// Nested fractions divide the numerator by the denominator interval.
///
/// # Examples
///
/// ```
/// # use assert_approx_eq::assert_approx_eq;
/// # use tunemap::interval::Interval;
/// assert_eq!("5/4".parse::<Interval>().unwrap(), Interval::from_ratio(5, 4));
/// assert_eq!("2".parse::<Interval>().unwrap(), Interval::from_ratio(2, 1));
/// assert_eq!("386.3c".parse::<Interval>().unwrap(), Interval::from_cents(386.3));
/// assert_eq!("21\\72".parse::<Interval>().unwrap(), Interval::from_edo_steps(72, 21));
/// assert_eq!("(3/2)/(5/4)".parse::<Interval>().unwrap(), Interval::from_ratio(6, 5));
/// assert_approx_eq!("1.25".parse::<Interval>().unwrap().as_float(), 1.25);
/// assert_eq!(
///     "0/1".parse::<Interval>().unwrap_err(),
///     "Invalid interval '0/1': Must be a positive fraction"
/// );
/// ```
impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        parse_interval(s).map_err(|e| format!("Invalid interval '{}': {}", s, e))
    }
}

fn parse_interval(s: &str) -> Result<Interval, String> {
    let s = s.trim();
    if let [steps, edo] = parse::split_balanced(s, '\\').as_slice() {
        let steps = steps
            .trim()
            .parse::<i32>()
            .map_err(|_| format!("Invalid step count '{}'", steps.trim()))?;
        let edo = edo
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|&edo| edo > 0)
            .ok_or_else(|| format!("Invalid EDO '{}'", edo.trim()))?;
        Ok(Interval::from_edo_steps(edo, steps))
    } else if let [numer, denom] = parse::split_balanced(s, '/').as_slice() {
        match (numer.trim().parse::<u32>(), denom.trim().parse::<u32>()) {
            (Ok(numer), Ok(denom)) if numer > 0 && denom > 0 => Ok(Interval::from_ratio(numer, denom)),
            (Ok(_), Ok(_)) => Err("Must be a positive fraction".to_owned()),
            _ => Ok(parse_interval(numer)? - parse_interval(denom)?),
        }
    } else if let [cents_value, ""] = parse::split_balanced(s, 'c').as_slice() {
        let cents_value = cents_value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|cents_value| cents_value.is_finite())
            .ok_or_else(|| format!("Invalid cents value '{}'", cents_value.trim()))?;
        Ok(Interval::from_cents(cents_value))
    } else if s.starts_with('(') && s.ends_with(')') {
        parse_interval(&s[1..s.len() - 1])
    } else if let Ok(int_value) = s.parse::<u32>() {
        if int_value > 0 {
            Ok(Interval::from_ratio(int_value, 1))
        } else {
            Err("Must be positive".to_owned())
        }
    } else {
        let float_value = s.parse::<f64>().map_err(|_| {
            "Must be a fraction (e.g. 5/4), cents value (e.g. 386.3c), EDO step (e.g. 21\\72) or float (e.g. 1.25)"
                .to_owned()
        })?;
        if float_value.is_finite() && float_value > 0.0 {
            Ok(Interval::from_float(float_value))
        } else {
            Err(format!("Evaluates to {} but should be positive", float_value))
        }
    }
}
