//! The 12 pitch classes of the piano keyboard.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;


/// Number of keys per octave of the physical keyboard.
pub const NUM_PITCH_CLASSES: usize = 12;

/// One of the 12 equal divisions of the octave, `C` being 0 and `B` being 11.
///
/// The only ways to create a [`PitchClass`] are the named constants, the validating
/// [`PitchClass::from_number`] and the total [`PitchClass::from_semitones`], so the contained number is always in `0..12`.
///
/// # Examples
///
/// ```
/// # use tunemap::pitch_class::PitchClass;
/// assert_eq!(PitchClass::from_number(2), Some(PitchClass::D));
/// assert_eq!(PitchClass::from_number(12), None);
/// assert_eq!(PitchClass::from_semitones(-1), PitchClass::B);
/// assert_eq!(PitchClass::from_semitones(26), PitchClass::D);
/// assert_eq!(PitchClass::G.number(), 7);
/// ```
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PitchClass {
    number: u8,
}

impl PitchClass {
    pub const C: PitchClass = PitchClass { number: 0 };
    pub const C_SHARP: PitchClass = PitchClass { number: 1 };
    pub const D: PitchClass = PitchClass { number: 2 };
    pub const D_SHARP: PitchClass = PitchClass { number: 3 };
    pub const E: PitchClass = PitchClass { number: 4 };
    pub const F: PitchClass = PitchClass { number: 5 };
    pub const F_SHARP: PitchClass = PitchClass { number: 6 };
    pub const G: PitchClass = PitchClass { number: 7 };
    pub const G_SHARP: PitchClass = PitchClass { number: 8 };
    pub const A: PitchClass = PitchClass { number: 9 };
    pub const A_SHARP: PitchClass = PitchClass { number: 10 };
    pub const B: PitchClass = PitchClass { number: 11 };

    pub fn from_number(number: u8) -> Option<Self> {
        (usize::from(number) < NUM_PITCH_CLASSES).then_some(Self { number })
    }

    /// Reduces an arbitrary number of 12-EDO semitones (relative to C) to its pitch class.
    pub fn from_semitones(semitones: i32) -> Self {
        Self {
            number: semitones.rem_euclid(NUM_PITCH_CLASSES as i32) as u8,
        }
    }

    pub fn number(self) -> u8 {
        self.number
    }

    /// Position of `self` in a 12-slot table.
    pub fn index(self) -> usize {
        usize::from(self.number)
    }

    /// Iterates over all pitch classes from `C` to `B`.
    pub fn all() -> impl Iterator<Item = PitchClass> + Clone {
        (0..NUM_PITCH_CLASSES as u8).map(|number| PitchClass { number })
    }

    /// Finds the number of semitones `s` with `s ≡ self (mod 12)` that lies closest to `semitones`.
    ///
    /// Results beyond the range of `i32` saturate.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tunemap::pitch_class::PitchClass;
    /// assert_eq!(PitchClass::D.nearest_semitones(1.4), 2);
    /// assert_eq!(PitchClass::B.nearest_semitones(0.2), -1);
    /// assert_eq!(PitchClass::C.nearest_semitones(11.9), 12);
    /// assert_eq!(PitchClass::C.nearest_semitones(-25.0), -24);
    /// ```
    pub fn nearest_semitones(self, semitones: f64) -> i32 {
        let number = f64::from(self.number);
        let num_octaves = ((semitones - number) / 12.0).round();
        (num_octaves * 12.0 + number) as i32
    }
}

impl Display for PitchClass {
    /// ```
    /// # use tunemap::pitch_class::PitchClass;
    /// assert_eq!(PitchClass::C.to_string(), "C");
    /// assert_eq!(PitchClass::C_SHARP.to_string(), "C#");
    /// assert_eq!(format!("{:-}", PitchClass::C_SHARP), "Db");
    /// assert_eq!(format!("{:-}", PitchClass::E), "E");
    /// assert_eq!(format!("{:<3}|", PitchClass::A_SHARP), "A# |");
    /// ```
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let note_name = match (self.number, f.sign_minus()) {
            (0, _) => "C",
            (1, false) => "C#",
            (1, true) => "Db",
            (2, _) => "D",
            (3, false) => "D#",
            (3, true) => "Eb",
            (4, _) => "E",
            (5, _) => "F",
            (6, false) => "F#",
            (6, true) => "Gb",
            (7, _) => "G",
            (8, false) => "G#",
            (8, true) => "Ab",
            (9, _) => "A",
            (10, false) => "A#",
            (10, true) => "Bb",
            (11, _) => "B",
            (other, _) => unreachable!("value was {}", other),
        };
        f.pad(note_name)
    }
}

/// Parses note letters with an optional accidental, e.g. `C`, `f#` or `Bb`.
///
/// # Examples
///
/// ```
/// # use tunemap::pitch_class::PitchClass;
/// assert_eq!("C".parse::<PitchClass>().unwrap(), PitchClass::C);
/// assert_eq!("Db".parse::<PitchClass>().unwrap(), PitchClass::C_SHARP);
/// assert_eq!("e#".parse::<PitchClass>().unwrap(), PitchClass::F);
/// assert_eq!("Cb".parse::<PitchClass>().unwrap(), PitchClass::B);
/// assert_eq!("H".parse::<PitchClass>().unwrap_err(), "Invalid pitch class 'H': Must be a note letter (A-G) followed by an optional # or b");
/// ```
impl FromStr for PitchClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let error = || {
            format!(
                "Invalid pitch class '{}': Must be a note letter (A-G) followed by an optional # or b",
                s
            )
        };

        let mut chars = s.chars();
        let letter_semitones = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            _ => return Err(error()),
        };
        let accidental = match chars.as_str() {
            "" => 0,
            "#" => 1,
            "b" => -1,
            _ => return Err(error()),
        };

        Ok(PitchClass::from_semitones(letter_semitones + accidental))
    }
}
