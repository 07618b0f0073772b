//! Per-key deviations from 12-EDO and the operations to combine them.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::pitch_class::{PitchClass, NUM_PITCH_CLASSES};

/// The resolved target of one scale degree: a key of the keyboard plus a deviation in cents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TuningPitch {
    pub pitch_class: PitchClass,
    pub deviation: f64,
}

/// A named table of 12 optional deviations in cents, one per [`PitchClass`].
///
/// Unset slots are keys that the tuning does not care about. All combination operations return new instances.
///
/// # Examples
///
/// ```
/// # use tunemap::pitch_class::PitchClass;
/// # use tunemap::tuning::Tuning;
/// let tuning = Tuning::new(
///     "C maj",
///     [Some(0.0), None, Some(3.91), None, Some(-13.69), Some(-1.96), None, Some(1.96), None, Some(-15.64), None, Some(-11.73)],
/// );
///
/// assert_eq!(tuning.get(PitchClass::D), Some(3.91));
/// assert_eq!(tuning.get(PitchClass::D_SHARP), None);
/// assert_eq!(tuning.completed_count(), 7);
/// assert!(!tuning.is_complete());
/// assert_eq!(
///     tuning.to_string(),
///     "C maj: [+0.00, -, +3.91, -, -13.69, -1.96, -, +1.96, -, -15.64, -, -11.73]"
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Tuning {
    name: String,
    deviations: [Option<f64>; NUM_PITCH_CLASSES],
}

impl Tuning {
    pub fn new(name: impl Into<String>, deviations: [Option<f64>; NUM_PITCH_CLASSES]) -> Self {
        Self {
            name: name.into(),
            deviations,
        }
    }

    /// An unnamed tuning with no slot set.
    pub fn empty() -> Self {
        Self::new("", [None; NUM_PITCH_CLASSES])
    }

    /// The complete 12-EDO tuning, i.e. all slots set to 0 cents.
    pub fn standard() -> Self {
        Self::new("12-EDO", [Some(0.0); NUM_PITCH_CLASSES])
    }

    /// Collects the given [`TuningPitch`]es into a tuning. Later pitches replace earlier ones on the same key.
    pub fn from_tuning_pitches(
        name: impl Into<String>,
        tuning_pitches: impl IntoIterator<Item = TuningPitch>,
    ) -> Self {
        let mut deviations = [None; NUM_PITCH_CLASSES];
        for tuning_pitch in tuning_pitches {
            deviations[tuning_pitch.pitch_class.index()] = Some(tuning_pitch.deviation);
        }
        Self::new(name, deviations)
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deviations(&self) -> &[Option<f64>; NUM_PITCH_CLASSES] {
        &self.deviations
    }

    pub fn get(&self, pitch_class: PitchClass) -> Option<f64> {
        self.deviations[pitch_class.index()]
    }

    pub fn is_complete(&self) -> bool {
        self.deviations.iter().all(Option::is_some)
    }

    pub fn is_empty(&self) -> bool {
        self.deviations.iter().all(Option::is_none)
    }

    pub fn completed_count(&self) -> usize {
        self.deviations.iter().flatten().count()
    }

    /// Takes the deviations of `other` wherever `self` has no value, without any conflict checking.
    ///
    /// The name of `self` is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tunemap::pitch_class::PitchClass;
    /// # use tunemap::tuning::Tuning;
    /// let mut deviations = [None; 12];
    /// deviations[0] = Some(-5.0);
    /// let tuning = Tuning::new("partial", deviations);
    ///
    /// let filled = tuning.fill(&Tuning::standard());
    /// assert!(filled.is_complete());
    /// assert_eq!(filled.name(), "partial");
    /// assert_eq!(filled.get(PitchClass::C), Some(-5.0));
    /// assert_eq!(filled.get(PitchClass::D), Some(0.0));
    /// ```
    pub fn fill(&self, other: &Tuning) -> Tuning {
        let mut deviations = self.deviations;
        for (deviation, &other_deviation) in deviations.iter_mut().zip(&other.deviations) {
            if deviation.is_none() {
                *deviation = other_deviation;
            }
        }
        Tuning::new(self.name.clone(), deviations)
    }

    /// Combines `self` and `other` if they agree within `tolerance` cents on every key that both of them set.
    ///
    /// On a shared key, the deviation of `self` wins. Non-empty names are joined with `" + "` unless `other`'s name is already the last joined part.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tunemap::pitch_class::PitchClass;
    /// # use tunemap::tuning::Tuning;
    /// let mut lower = [None; 12];
    /// lower[0] = Some(0.0);
    /// lower[2] = Some(3.9);
    /// let mut upper = [None; 12];
    /// upper[2] = Some(4.2);
    /// upper[4] = Some(-13.7);
    ///
    /// let merged = Tuning::new("lower", lower).merge(&Tuning::new("upper", upper), 0.5).unwrap();
    /// assert_eq!(merged.name(), "lower + upper");
    /// assert_eq!(merged.get(PitchClass::D), Some(3.9));
    /// assert_eq!(merged.get(PitchClass::E), Some(-13.7));
    /// assert_eq!(merged.completed_count(), 3);
    ///
    /// assert!(Tuning::new("lower", lower).merge(&Tuning::new("upper", upper), 0.2).is_none());
    /// ```
    pub fn merge(&self, other: &Tuning, tolerance: f64) -> Option<Tuning> {
        let mut deviations = [None; NUM_PITCH_CLASSES];
        for (deviation, (&own, &others)) in deviations
            .iter_mut()
            .zip(self.deviations.iter().zip(&other.deviations))
        {
            *deviation = match (own, others) {
                (Some(own), Some(others)) => {
                    if (own - others).abs() > tolerance {
                        return None;
                    }
                    Some(own)
                }
                (own, others) => own.or(others),
            };
        }
        Some(Tuning::new(join_names(&self.name, &other.name), deviations))
    }

    /// Returns a complete tuning where every unset slot is 0 cents, i.e. the 12-EDO value.
    pub fn resolve(&self) -> Tuning {
        Tuning::new(self.name.clone(), self.resolved_deviations().map(Some))
    }

    pub fn resolved_deviations(&self) -> [f64; NUM_PITCH_CLASSES] {
        self.deviations.map(|deviation| deviation.unwrap_or(0.0))
    }

    /// Checks that both tunings set the same keys to deviations no more than `tolerance` cents apart.
    ///
    /// Names are ignored.
    pub fn almost_equals(&self, other: &Tuning, tolerance: f64) -> bool {
        self.deviations
            .iter()
            .zip(&other.deviations)
            .all(|pair| match pair {
                (Some(own), Some(others)) => (own - others).abs() <= tolerance,
                (None, None) => true,
                _ => false,
            })
    }

    /// The largest absolute deviation of all set slots or `None` if no slot is set.
    pub fn max_abs_deviation(&self) -> Option<f64> {
        self.deviations
            .iter()
            .flatten()
            .map(|deviation| deviation.abs())
            .reduce(f64::max)
    }
}

/// Joins names with ` + `, skipping `second` if it is empty or already the last joined part of `first`.
fn join_names(first: &str, second: &str) -> String {
    let ends_with_second = first == second || first.ends_with(&format!(" + {}", second));
    match (first.is_empty(), second.is_empty()) {
        (true, _) => second.to_owned(),
        (false, true) => first.to_owned(),
        (false, false) if ends_with_second => first.to_owned(),
        (false, false) => format!("{} + {}", first, second),
    }
}

impl Display for Tuning {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if !self.name.is_empty() {
            write!(f, "{}: ", self.name)?;
        }
        write!(f, "[")?;
        for (slot, deviation) in self.deviations.iter().enumerate() {
            if slot > 0 {
                write!(f, ", ")?;
            }
            match deviation {
                Some(deviation) => write!(f, "{:+.2}", deviation)?,
                None => write!(f, "-")?,
            }
        }
        write!(f, "]")
    }
}
