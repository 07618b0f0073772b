use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Mul;
use std::str::FromStr;

use crate::interval::Interval;
use crate::note::{self, Note};

/// An absolute frequency.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Pitch {
    hz: f64,
}

impl Pitch {
    pub fn from_hz(hz: f64) -> Pitch {
        Pitch { hz }
    }

    pub fn as_hz(self) -> f64 {
        self.hz
    }

    /// The distance from `self` up to `other` in cents.
    pub fn cents_until(self, other: Pitch) -> f64 {
        1200.0 * (other.hz / self.hz).log2()
    }
}

impl Mul<Interval> for Pitch {
    type Output = Pitch;

    fn mul(self, rhs: Interval) -> Self::Output {
        Pitch::from_hz(self.as_hz() * rhs.as_float())
    }
}

/// ```
/// # use tunemap::pitch::Pitch;
/// assert_eq!(Pitch::from_hz(440.0).to_string(), "440.000 Hz");
/// ```
impl Display for Pitch {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:.3} Hz", self.hz)
    }
}

/// ```
/// # use tunemap::pitch::Pitch;
/// assert_eq!("432Hz".parse::<Pitch>().unwrap().as_hz(), 432.0);
/// assert_eq!("440 hz".parse::<Pitch>().unwrap().as_hz(), 440.0);
/// assert_eq!("440".parse::<Pitch>().unwrap_err(), "Must end with Hz or hz");
/// ```
impl FromStr for Pitch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(freq) = s.strip_suffix("Hz").or_else(|| s.strip_suffix("hz")) {
            let freq = freq.trim();
            freq.parse::<f64>()
                .ok()
                .filter(|freq| freq.is_finite() && *freq > 0.0)
                .map(Pitch::from_hz)
                .ok_or_else(|| format!("Invalid frequency: '{}'", freq))
        } else {
            Err("Must end with Hz or hz".to_string())
        }
    }
}

/// The frequency of A4, the note all equal-tempered pitches are derived from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConcertPitch {
    a4_pitch: Pitch,
}

impl ConcertPitch {
    pub fn from_a4_pitch(a4_pitch: Pitch) -> Self {
        Self { a4_pitch }
    }

    pub fn a4_pitch(self) -> Pitch {
        self.a4_pitch
    }

    /// The 12-EDO pitch of `note`.
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use tunemap::note::Note;
    /// # use tunemap::pitch::{ConcertPitch, Pitch};
    /// let c5 = Note::from_midi_number(72);
    ///
    /// assert_approx_eq!(ConcertPitch::default().equal_tempered_pitch_of(c5).as_hz(), 523.2511, 1e-3);
    /// assert_approx_eq!(
    ///     ConcertPitch::from_a4_pitch(Pitch::from_hz(432.0)).equal_tempered_pitch_of(c5).as_hz(),
    ///     513.7375,
    ///     1e-3
    /// );
    /// ```
    pub fn equal_tempered_pitch_of(self, note: Note) -> Pitch {
        let semitones = note::A4_NOTE.num_semitones_before(note);
        self.a4_pitch * Interval::from_edo_steps(12, semitones)
    }
}

/// The default [`ConcertPitch`] is A4 sounding at 440 Hz.
impl Default for ConcertPitch {
    fn default() -> Self {
        Self::from_a4_pitch(Pitch::from_hz(440.0))
    }
}
