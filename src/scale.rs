//! Named sequences of scale degrees.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::interval::Interval;

/// Declares how the interval values of a scale are notated.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IntonationStandard {
    /// Degrees are cents values.
    Cents,
    /// Degrees are frequency ratios.
    Just,
    /// Degrees are step counts of the given equal division of the octave.
    Edo(u32),
}

impl IntonationStandard {
    /// Reads a single degree notated in `self`.
    ///
    /// Explicitly notated intervals (e.g. `702c` or `3/2`) are accepted by every standard.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tunemap::interval::Interval;
    /// # use tunemap::scale::IntonationStandard;
    /// assert_eq!(IntonationStandard::Cents.parse_degree("150").unwrap(), Interval::from_cents(150.0));
    /// assert_eq!(IntonationStandard::Just.parse_degree("5/4").unwrap(), Interval::from_ratio(5, 4));
    /// assert_eq!(IntonationStandard::Edo(72).parse_degree("21").unwrap(), Interval::from_edo_steps(72, 21));
    /// assert_eq!(IntonationStandard::Edo(72).parse_degree("386c").unwrap(), Interval::from_cents(386.0));
    /// ```
    pub fn parse_degree(self, s: &str) -> Result<Interval, String> {
        let s = s.trim();
        match self {
            IntonationStandard::Cents => match s.parse::<f64>() {
                Ok(cents_value) if cents_value.is_finite() => Ok(Interval::from_cents(cents_value)),
                _ => s.parse(),
            },
            IntonationStandard::Just => s.parse(),
            IntonationStandard::Edo(edo) => match s.parse::<i32>() {
                Ok(steps) if edo > 0 => Ok(Interval::from_edo_steps(edo, steps)),
                _ => s.parse(),
            },
        }
    }
}

impl Display for IntonationStandard {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            IntonationStandard::Cents => write!(f, "cents"),
            IntonationStandard::Just => write!(f, "just"),
            IntonationStandard::Edo(edo) => write!(f, "{}-EDO", edo),
        }
    }
}

/// ```
/// # use tunemap::scale::IntonationStandard;
/// assert_eq!("just".parse::<IntonationStandard>().unwrap(), IntonationStandard::Just);
/// assert_eq!("Cents".parse::<IntonationStandard>().unwrap(), IntonationStandard::Cents);
/// assert_eq!("72-EDO".parse::<IntonationStandard>().unwrap(), IntonationStandard::Edo(72));
/// assert_eq!("edo53".parse::<IntonationStandard>().unwrap(), IntonationStandard::Edo(53));
/// assert!("edo0".parse::<IntonationStandard>().is_err());
/// ```
impl FromStr for IntonationStandard {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowercase = s.trim().to_lowercase();
        match lowercase.as_str() {
            "cents" => Ok(IntonationStandard::Cents),
            "just" => Ok(IntonationStandard::Just),
            other => other
                .strip_suffix("-edo")
                .or_else(|| other.strip_prefix("edo"))
                .and_then(|edo| edo.parse::<u32>().ok())
                .filter(|&edo| edo > 0)
                .map(IntonationStandard::Edo)
                .ok_or_else(|| {
                    format!(
                        "Invalid intonation standard '{}': Must be cents, just or an EDO (e.g. edo72)",
                        s.trim()
                    )
                }),
        }
    }
}

/// A name plus a non-empty, ordered sequence of scale degrees.
///
/// The degrees are relative to the scale's reference point. A scale may or may not start with a unison.
#[derive(Clone, Debug, PartialEq)]
pub struct Scale {
    name: String,
    intervals: Vec<Interval>,
    intonation_standard: IntonationStandard,
}

impl Scale {
    pub fn builder(name: impl Into<String>) -> ScaleBuilder {
        ScaleBuilder {
            name: name.into(),
            intervals: Vec::new(),
            intonation_standard: None,
        }
    }

    /// ```
    /// # use tunemap::scale::Scale;
    /// let scale = Scale::from_ratios("maj-4", &[(1, 1), (9, 8), (5, 4), (4, 3)]).unwrap();
    /// assert_eq!(scale.size(), 4);
    /// assert!(scale.starts_with_unison());
    ///
    /// assert!(Scale::from_ratios("empty", &[]).is_err());
    /// ```
    pub fn from_ratios(name: impl Into<String>, ratios: &[(u32, u32)]) -> Result<Scale, ScaleBuildError> {
        ratios
            .iter()
            .fold(Scale::builder(name), |builder, &(numer, denom)| {
                builder.push_ratio(numer, denom)
            })
            .build()
    }

    pub fn from_cents(name: impl Into<String>, cents_values: &[f64]) -> Result<Scale, ScaleBuildError> {
        cents_values
            .iter()
            .fold(Scale::builder(name), |builder, &cents_value| {
                builder.push_cents(cents_value)
            })
            .build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn size(&self) -> usize {
        self.intervals.len()
    }

    pub fn degree(&self, index: usize) -> Option<Interval> {
        self.intervals.get(index).copied()
    }

    pub fn intonation_standard(&self) -> IntonationStandard {
        self.intonation_standard
    }

    pub fn starts_with_unison(&self) -> bool {
        self.intervals
            .first()
            .is_some_and(|interval| interval.is_unison())
    }

    /// Shifts every degree by `transposition`.
    ///
    /// ```
    /// # use tunemap::interval::Interval;
    /// # use tunemap::scale::Scale;
    /// let scale = Scale::from_ratios("fifths", &[(1, 1), (3, 2)]).unwrap();
    /// let transposed = scale.transposed(Interval::from_ratio(4, 3));
    /// assert_eq!(transposed.intervals(), [Interval::from_ratio(4, 3), Interval::from_ratio(2, 1)]);
    /// assert_eq!(transposed.name(), "fifths");
    /// ```
    pub fn transposed(&self, transposition: Interval) -> Scale {
        Scale {
            name: self.name.clone(),
            intervals: self
                .intervals
                .iter()
                .map(|&interval| interval + transposition)
                .collect(),
            intonation_standard: self.intonation_standard,
        }
    }
}

/// Builder created by [`Scale::builder`].
pub struct ScaleBuilder {
    name: String,
    intervals: Vec<Interval>,
    intonation_standard: Option<IntonationStandard>,
}

impl ScaleBuilder {
    pub fn push(mut self, interval: Interval) -> Self {
        self.intervals.push(interval);
        self
    }

    pub fn push_ratio(self, numer: u32, denom: u32) -> Self {
        self.push(Interval::from_ratio(numer, denom))
    }

    pub fn push_cents(self, cents_value: f64) -> Self {
        self.push(Interval::from_cents(cents_value))
    }

    pub fn push_edo_steps(self, edo: u32, steps: i32) -> Self {
        self.push(Interval::from_edo_steps(edo, steps))
    }

    /// Overrides the intonation standard which would otherwise be derived from the first degree.
    pub fn intonation_standard(mut self, intonation_standard: IntonationStandard) -> Self {
        self.intonation_standard = Some(intonation_standard);
        self
    }

    pub fn build(self) -> Result<Scale, ScaleBuildError> {
        let first = *self.intervals.first().ok_or(ScaleBuildError::ScaleIsEmpty)?;
        let intonation_standard = self.intonation_standard.unwrap_or(match first {
            Interval::Ratio { .. } | Interval::Real(_) => IntonationStandard::Just,
            Interval::Cents(_) => IntonationStandard::Cents,
            Interval::Edo { edo, .. } => IntonationStandard::Edo(edo),
        });

        Ok(Scale {
            name: self.name,
            intervals: self.intervals,
            intonation_standard,
        })
    }
}

/// Error reported when building a [`Scale`] fails.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScaleBuildError {
    /// The scale contains no degrees.
    ScaleIsEmpty,
}

impl Display for ScaleBuildError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ScaleBuildError::ScaleIsEmpty => write!(f, "Scale must contain at least one degree"),
        }
    }
}

impl std::error::Error for ScaleBuildError {}
