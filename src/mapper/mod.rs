//! Mapping of whole scales onto the 12 keys of a keyboard.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::interval::Interval;
use crate::pitch_class::PitchClass;
use crate::reference::TuningReference;
use crate::scale::Scale;
use crate::tuning::{Tuning, TuningPitch};

pub use self::auto::{AutoTuningMapper, AutoTuningMapperBuildError, AutoTuningMapperBuilder};
pub use self::genus::SoftChromaticGenusMapping;
pub use self::manual::ManualTuningMapper;

mod auto;
mod genus;
mod manual;

/// Forced deviations beyond this limit cannot be expressed around their key.
pub const MAX_FORCED_DEVIATION: f64 = 50.0;

/// Degrees further away from C are rejected before they are rounded to keys.
pub const MAX_ABSOLUTE_CENTS: f64 = 1e9;

/// Converts a [`Scale`] anchored at a [`TuningReference`] into a [`Tuning`].
pub trait TuningMapper {
    fn map_scale(
        &self,
        scale: &Scale,
        tuning_reference: &TuningReference,
    ) -> Result<Tuning, TuningMapperError>;
}

/// Error reported when a scale cannot be mapped onto the keyboard.
#[derive(Clone, Debug, PartialEq)]
pub enum TuningMapperError {
    /// Several non-equivalent scale degrees ended up on the same key.
    Conflict {
        pitch_class: PitchClass,
        degrees: Vec<usize>,
    },
    /// A scale degree forced onto a key deviates more than 50 cents from it.
    Overflow {
        pitch_class: PitchClass,
        degree: usize,
        deviation: f64,
    },
    /// A keyboard mapping refers to a scale degree the scale does not have.
    IndexOutOfRange {
        pitch_class: PitchClass,
        degree: usize,
        scale_size: usize,
    },
    /// A scale degree lies too far away from C or is not a finite number.
    OutOfKeyboardRange { degree: usize, absolute_cents: f64 },
}

impl Display for TuningMapperError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TuningMapperError::Conflict {
                pitch_class,
                degrees,
            } => {
                let degrees = degrees
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "Scale degrees {} are mapped to the same key {}",
                    degrees, pitch_class
                )
            }
            TuningMapperError::Overflow {
                pitch_class,
                degree,
                deviation,
            } => write!(
                f,
                "Scale degree {} deviates {:+.2}c from key {} (limit is ±{}c)",
                degree, deviation, pitch_class, MAX_FORCED_DEVIATION
            ),
            TuningMapperError::IndexOutOfRange {
                pitch_class,
                degree,
                scale_size,
            } => write!(
                f,
                "Key {} refers to scale degree {} but the scale has {} degrees",
                pitch_class, degree, scale_size
            ),
            TuningMapperError::OutOfKeyboardRange {
                degree,
                absolute_cents,
            } => write!(
                f,
                "Scale degree {} lies at {}c which is outside of the range of ±{}c around C",
                degree, absolute_cents, MAX_ABSOLUTE_CENTS
            ),
        }
    }
}

impl std::error::Error for TuningMapperError {}

/// Position of `interval` in cents above C, restricted to [`MAX_ABSOLUTE_CENTS`].
fn absolute_cents_of(
    tuning_reference: &TuningReference,
    degree: usize,
    interval: Interval,
) -> Result<f64, TuningMapperError> {
    let absolute_cents = tuning_reference.absolute_cents(interval);
    if absolute_cents.abs() <= MAX_ABSOLUTE_CENTS {
        Ok(absolute_cents)
    } else {
        Err(TuningMapperError::OutOfKeyboardRange {
            degree,
            absolute_cents,
        })
    }
}

/// Places `absolute_cents` on the nearest instance of `pitch_class`, failing if the deviation gets too large.
fn force_onto_key(
    pitch_class: PitchClass,
    degree: usize,
    absolute_cents: f64,
) -> Result<TuningPitch, TuningMapperError> {
    let semitones = pitch_class.nearest_semitones(absolute_cents / 100.0);
    let deviation = absolute_cents - f64::from(semitones) * 100.0;
    if deviation.abs() > MAX_FORCED_DEVIATION {
        return Err(TuningMapperError::Overflow {
            pitch_class,
            degree,
            deviation,
        });
    }
    Ok(TuningPitch {
        pitch_class,
        deviation,
    })
}

/// Prefixes the scale's name with the base pitch class of the reference if the scale starts with a unison, e.g. `C maj`.
fn tuning_name(scale: &Scale, tuning_reference: &TuningReference) -> String {
    if scale.starts_with_unison() {
        format!("{} {}", tuning_reference.base_pitch_class(), scale.name())
    } else {
        scale.name().to_owned()
    }
}

fn check_degree_in_range(
    scale: &Scale,
    pitch_class: PitchClass,
    degree: usize,
) -> Result<(), TuningMapperError> {
    if degree < scale.size() {
        Ok(())
    } else {
        Err(TuningMapperError::IndexOutOfRange {
            pitch_class,
            degree,
            scale_size: scale.size(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            TuningMapperError::Conflict {
                pitch_class: PitchClass::E,
                degrees: vec![2, 3],
            }
            .to_string(),
            "Scale degrees 2, 3 are mapped to the same key E"
        );
        assert_eq!(
            TuningMapperError::Overflow {
                pitch_class: PitchClass::C_SHARP,
                degree: 1,
                deviation: -61.5,
            }
            .to_string(),
            "Scale degree 1 deviates -61.50c from key C# (limit is ±50c)"
        );
        assert_eq!(
            TuningMapperError::IndexOutOfRange {
                pitch_class: PitchClass::B,
                degree: 7,
                scale_size: 7,
            }
            .to_string(),
            "Key B refers to scale degree 7 but the scale has 7 degrees"
        );
        assert_eq!(
            TuningMapperError::OutOfKeyboardRange {
                degree: 0,
                absolute_cents: -1e12,
            }
            .to_string(),
            "Scale degree 0 lies at -1000000000000c which is outside of the range of ±1000000000c around C"
        );
    }

    #[test]
    fn absolute_cents_must_be_within_range() {
        let reference = TuningReference::standard(PitchClass::D);
        assert!(absolute_cents_of(&reference, 1, Interval::from_cents(1e8)).is_ok());
        assert_eq!(
            absolute_cents_of(&reference, 1, Interval::from_cents(1e12)),
            Err(TuningMapperError::OutOfKeyboardRange {
                degree: 1,
                absolute_cents: 1e12 + 200.0,
            })
        );
    }

    #[test]
    fn force_onto_nearest_instance_of_key() {
        let tuning_pitch = force_onto_key(PitchClass::C, 7, 1194.0).unwrap();
        assert_eq!(tuning_pitch.pitch_class, PitchClass::C);
        assert!((tuning_pitch.deviation - -6.0).abs() < 1e-9);

        // Exactly 50 cents is still allowed
        assert!(force_onto_key(PitchClass::D, 1, 150.0).is_ok());
        assert_eq!(
            force_onto_key(PitchClass::D, 1, 140.0),
            Err(TuningMapperError::Overflow {
                pitch_class: PitchClass::D,
                degree: 1,
                deviation: -60.0,
            })
        );
    }
}
