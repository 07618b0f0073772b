//! Anchoring a scale's reference degree in absolute pitch space.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::interval::Interval;
use crate::note::{self, Note};
use crate::pitch::{ConcertPitch, Pitch};
use crate::pitch_class::PitchClass;
use crate::tuning::TuningPitch;

/// Resolves where degree zero of a scale sits on the keyboard: a [`PitchClass`] plus an offset in cents.
///
/// # Examples
///
/// ```
/// # use assert_approx_eq::assert_approx_eq;
/// # use tunemap::interval::Interval;
/// # use tunemap::note::Note;
/// # use tunemap::pitch_class::PitchClass;
/// # use tunemap::reference::TuningReference;
/// let standard = TuningReference::standard(PitchClass::D);
/// assert_eq!(standard.base_pitch_class(), PitchClass::D);
/// assert_approx_eq!(standard.base_offset(), 0.0);
///
/// // A4 = 440 Hz transposed by a just minor third gives a slightly flat C5
/// let concert_pitch = TuningReference::concert_pitch(Interval::from_ratio(32, 27), Note::from_midi_number(72));
/// assert_eq!(concert_pitch.base_pitch_class(), PitchClass::C);
/// assert_approx_eq!(concert_pitch.base_offset(), -5.865, 1e-3);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TuningReference {
    /// Degree zero is `base_offset` cents above `base_pitch_class`.
    Standard {
        base_pitch_class: PitchClass,
        base_offset: f64,
    },
    /// Degree zero is the concert pitch (the frequency of A4) transposed by `concert_pitch_to_base_interval`, landing near `base_note`.
    ConcertPitch {
        concert_pitch_to_base_interval: Interval,
        base_note: Note,
        concert_pitch: ConcertPitch,
    },
}

impl TuningReference {
    pub fn standard(base_pitch_class: PitchClass) -> Self {
        Self::standard_with_offset(base_pitch_class, 0.0)
    }

    pub fn standard_with_offset(base_pitch_class: PitchClass, base_offset: f64) -> Self {
        TuningReference::Standard {
            base_pitch_class,
            base_offset,
        }
    }

    /// Creates a [`TuningReference::ConcertPitch`] with A4 sounding at 440 Hz.
    pub fn concert_pitch(concert_pitch_to_base_interval: Interval, base_note: Note) -> Self {
        Self::concert_pitch_at(
            concert_pitch_to_base_interval,
            base_note,
            ConcertPitch::default(),
        )
    }

    pub fn concert_pitch_at(
        concert_pitch_to_base_interval: Interval,
        base_note: Note,
        concert_pitch: ConcertPitch,
    ) -> Self {
        TuningReference::ConcertPitch {
            concert_pitch_to_base_interval,
            base_note,
            concert_pitch,
        }
    }

    pub fn base_pitch_class(&self) -> PitchClass {
        match self {
            TuningReference::Standard {
                base_pitch_class, ..
            } => *base_pitch_class,
            TuningReference::ConcertPitch { base_note, .. } => base_note.pitch_class(),
        }
    }

    /// The distance in cents between degree zero and the equal-tempered position of [`TuningReference::base_pitch_class`].
    ///
    /// For [`TuningReference::ConcertPitch`], the equal-tempered position is the one of the base note itself, i.e. in the same octave.
    /// The result does not depend on the concert pitch frequency since both pitches are derived from it.
    pub fn base_offset(&self) -> f64 {
        match self {
            TuningReference::Standard { base_offset, .. } => *base_offset,
            TuningReference::ConcertPitch {
                concert_pitch_to_base_interval,
                base_note,
                ..
            } => {
                let equal_tempered_semitones = note::A4_NOTE.num_semitones_before(*base_note);
                concert_pitch_to_base_interval.cents() - 100.0 * f64::from(equal_tempered_semitones)
            }
        }
    }

    pub fn base_tuning_pitch(&self) -> TuningPitch {
        TuningPitch {
            pitch_class: self.base_pitch_class(),
            deviation: self.base_offset(),
        }
    }

    /// Position of `interval` above degree zero in cents, measured from C.
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use tunemap::interval::Interval;
    /// # use tunemap::pitch_class::PitchClass;
    /// # use tunemap::reference::TuningReference;
    /// let reference = TuningReference::standard_with_offset(PitchClass::D, 10.0);
    /// assert_approx_eq!(reference.absolute_cents(Interval::from_cents(150.0)), 360.0);
    /// ```
    pub fn absolute_cents(&self, interval: Interval) -> f64 {
        f64::from(self.base_pitch_class().number()) * 100.0 + self.base_offset() + interval.cents()
    }

    /// The frequency of degree zero, assuming the given concert pitch for [`TuningReference::Standard`] references.
    ///
    /// The octave of a [`TuningReference::Standard`] reference is the one starting at C4.
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use tunemap::interval::Interval;
    /// # use tunemap::note::Note;
    /// # use tunemap::pitch::ConcertPitch;
    /// # use tunemap::pitch_class::PitchClass;
    /// # use tunemap::reference::TuningReference;
    /// let a4 = TuningReference::standard(PitchClass::A);
    /// assert_approx_eq!(a4.base_frequency(ConcertPitch::default()).as_hz(), 440.0);
    ///
    /// let c5 = TuningReference::concert_pitch(Interval::from_ratio(32, 27), Note::from_midi_number(72));
    /// assert_approx_eq!(c5.base_frequency(ConcertPitch::default()).as_hz(), 521.4815, 1e-3);
    /// ```
    pub fn base_frequency(&self, default_concert_pitch: ConcertPitch) -> Pitch {
        match self {
            TuningReference::Standard {
                base_pitch_class,
                base_offset,
            } => {
                let note = Note::from_pitch_class_and_octave(*base_pitch_class, 4);
                default_concert_pitch.equal_tempered_pitch_of(note)
                    * Interval::from_cents(*base_offset)
            }
            TuningReference::ConcertPitch {
                concert_pitch_to_base_interval,
                concert_pitch,
                ..
            } => concert_pitch.a4_pitch() * *concert_pitch_to_base_interval,
        }
    }
}

/// ```
/// # use tunemap::interval::Interval;
/// # use tunemap::note::Note;
/// # use tunemap::pitch_class::PitchClass;
/// # use tunemap::reference::TuningReference;
/// assert_eq!(TuningReference::standard(PitchClass::C).to_string(), "C");
/// assert_eq!(TuningReference::standard_with_offset(PitchClass::F_SHARP, -12.5).to_string(), "F# -12.50c");
/// assert_eq!(
///     TuningReference::concert_pitch(Interval::from_ratio(32, 27), Note::from_midi_number(72)).to_string(),
///     "C 5 = A 4 (440.000 Hz) + 32/27"
/// );
/// ```
impl Display for TuningReference {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TuningReference::Standard {
                base_pitch_class,
                base_offset,
            } => {
                write!(f, "{}", base_pitch_class)?;
                if *base_offset != 0.0 {
                    write!(f, " {:+.2}c", base_offset)?;
                }
                Ok(())
            }
            TuningReference::ConcertPitch {
                concert_pitch_to_base_interval,
                base_note,
                concert_pitch,
            } => write!(
                f,
                "{} = {} ({}) + {}",
                base_note,
                note::A4_NOTE,
                concert_pitch.a4_pitch(),
                concert_pitch_to_base_interval
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn concert_pitch_offset_does_not_depend_on_frequency() {
        let interval = Interval::from_ratio(32, 27);
        let c5 = Note::from_midi_number(72);
        let at_440 = TuningReference::concert_pitch(interval, c5);
        let at_432 = TuningReference::concert_pitch_at(
            interval,
            c5,
            ConcertPitch::from_a4_pitch(Pitch::from_hz(432.0)),
        );

        assert_approx_eq!(at_440.base_offset(), at_432.base_offset());
        assert_approx_eq!(
            ConcertPitch::from_a4_pitch(Pitch::from_hz(432.0))
                .equal_tempered_pitch_of(c5)
                .cents_until(at_432.base_frequency(ConcertPitch::default())),
            at_432.base_offset(),
            1e-9
        );
    }

    #[test]
    fn concert_pitch_below_a4() {
        let reference =
            TuningReference::concert_pitch(Interval::from_ratio(3, 4), Note::from_midi_number(64));
        assert_eq!(reference.base_pitch_class(), PitchClass::E);
        // 3/4 is -498.04c, E4 is 500c below A4
        assert_approx_eq!(reference.base_offset(), 1.955, 1e-3);
    }

    #[test]
    fn base_tuning_pitch() {
        let reference = TuningReference::standard_with_offset(PitchClass::G, 3.0);
        let base = reference.base_tuning_pitch();
        assert_eq!(base.pitch_class, PitchClass::G);
        assert_approx_eq!(base.deviation, 3.0);
        assert_approx_eq!(reference.absolute_cents(Interval::unison()), 703.0);
    }
}
