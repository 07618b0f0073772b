use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use crate::pitch_class::PitchClass;

pub const A4_NOTE: Note = Note { midi_number: 69 };

/// A MIDI note number, the octave being counted such that A4 is MIDI number 69 and C5 is MIDI number 72.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Note {
    midi_number: i32,
}

impl Note {
    pub fn from_midi_number(midi_number: i32) -> Self {
        Self { midi_number }
    }

    pub fn from_pitch_class_and_octave(pitch_class: PitchClass, octave: i32) -> Self {
        Self::from_midi_number((octave + 1) * 12 + i32::from(pitch_class.number()))
    }

    pub fn midi_number(self) -> i32 {
        self.midi_number
    }

    pub fn pitch_class(self) -> PitchClass {
        PitchClass::from_semitones(self.midi_number)
    }

    pub fn octave(self) -> i32 {
        self.midi_number.div_euclid(12) - 1
    }

    /// Counts the number of semitones [left inclusive, right exclusive) between `self` and `other`.
    pub fn num_semitones_before(self, other: Note) -> i32 {
        other.midi_number - self.midi_number
    }
}

impl Display for Note {
    /// ```
    /// # use tunemap::note::Note;
    /// assert_eq!(Note::from_midi_number(0).to_string(), "C -1");
    /// assert_eq!(Note::from_midi_number(69).to_string(), "A 4");
    /// assert_eq!(Note::from_midi_number(70).to_string(), "A# 4");
    /// assert_eq!(Note::from_midi_number(72).to_string(), "C 5");
    ///
    /// // Format flags
    /// assert_eq!(format!("{:-}", Note::from_midi_number(70)), "Bb 4");
    /// assert_eq!(format!("{:>6}", Note::from_midi_number(70)), "  A# 4");
    /// ```
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let pitch_class = if f.sign_minus() {
            format!("{:-}", self.pitch_class())
        } else {
            self.pitch_class().to_string()
        };
        f.pad(&format!("{} {}", pitch_class, self.octave()))
    }
}

/// Notes can be written as pitch class and octave or as plain MIDI number.
///
/// # Examples
///
/// ```
/// # use tunemap::note::Note;
/// assert_eq!("C5".parse::<Note>().unwrap().midi_number(), 72);
/// assert_eq!("A4".parse::<Note>().unwrap().midi_number(), 69);
/// assert_eq!("Bb-1".parse::<Note>().unwrap().midi_number(), 10);
/// assert_eq!("c#4".parse::<Note>().unwrap().midi_number(), 61);
/// assert_eq!("60".parse::<Note>().unwrap().midi_number(), 60);
/// assert!("X4".parse::<Note>().is_err());
/// ```
impl FromStr for Note {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(midi_number) = s.parse() {
            return Ok(Note::from_midi_number(midi_number));
        }

        let octave_start = s
            .find(|c: char| c == '-' || c.is_ascii_digit())
            .ok_or_else(|| {
                format!(
                    "Invalid note '{}': Must be a MIDI number (e.g. 72) or a pitch class followed by an octave (e.g. C5)",
                    s
                )
            })?;
        let (pitch_class, octave) = s.split_at(octave_start);
        let pitch_class = pitch_class
            .parse()
            .map_err(|e| format!("Invalid note '{}': {}", s, e))?;
        let octave = octave
            .parse()
            .map_err(|_| format!("Invalid note '{}': Invalid octave '{}'", s, octave))?;

        Ok(Note::from_pitch_class_and_octave(pitch_class, octave))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn octave_and_pitch_class() {
        let c5 = Note::from_pitch_class_and_octave(PitchClass::C, 5);
        assert_eq!(c5.midi_number(), 72);
        assert_eq!(c5.octave(), 5);
        assert_eq!(c5.pitch_class(), PitchClass::C);

        let b4 = Note::from_midi_number(71);
        assert_eq!(b4.octave(), 4);
        assert_eq!(b4.pitch_class(), PitchClass::B);

        assert_eq!(A4_NOTE.num_semitones_before(c5), 3);
    }

    #[test]
    fn negative_midi_numbers() {
        let note = Note::from_midi_number(-1);
        assert_eq!(note.octave(), -2);
        assert_eq!(note.pitch_class(), PitchClass::B);
        assert_eq!(note.to_string(), "B -2");
    }
}
