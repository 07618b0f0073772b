//! Assignment of scale degrees to the 12 keys of an octave.

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use crate::pitch_class::{PitchClass, NUM_PITCH_CLASSES};

/// A fixed table of 12 slots, one per [`PitchClass`], each optionally naming the scale degree that sounds there.
///
/// # Examples
///
/// ```
/// # use tunemap::keyboard_mapping::KeyboardMapping;
/// # use tunemap::pitch_class::PitchClass;
/// let mapping = KeyboardMapping::from_indexes(&[
///     Some(0), None, Some(1), None, Some(2), Some(3), None, Some(4), None, Some(5), None, Some(6),
/// ])
/// .unwrap();
///
/// assert_eq!(mapping.get(PitchClass::E), Some(2));
/// assert_eq!(mapping.get(PitchClass::C_SHARP), None);
/// assert_eq!(mapping.pitch_class_of(6), Some(PitchClass::B));
/// assert_eq!(mapping.to_string(), "[0, -, 1, -, 2, 3, -, 4, -, 5, -, 6]");
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct KeyboardMapping {
    degrees: [Option<usize>; NUM_PITCH_CLASSES],
}

impl KeyboardMapping {
    /// A mapping without any assignment.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(degrees: [Option<usize>; NUM_PITCH_CLASSES]) -> Self {
        Self { degrees }
    }

    /// Validates an untyped list of degree indexes, e.g. read from a composition file.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tunemap::keyboard_mapping::{KeyboardMapping, KeyboardMappingError};
    /// assert_eq!(
    ///     KeyboardMapping::from_indexes(&[Some(0); 11]),
    ///     Err(KeyboardMappingError::WrongLength(11))
    /// );
    ///
    /// let mut indexes = [None; 12];
    /// indexes[3] = Some(-1);
    /// assert_eq!(
    ///     KeyboardMapping::from_indexes(&indexes),
    ///     Err(KeyboardMappingError::NegativeIndex { slot: 3, index: -1 })
    /// );
    /// ```
    pub fn from_indexes(indexes: &[Option<i64>]) -> Result<Self, KeyboardMappingError> {
        if indexes.len() != NUM_PITCH_CLASSES {
            return Err(KeyboardMappingError::WrongLength(indexes.len()));
        }

        let mut degrees = [None; NUM_PITCH_CLASSES];
        for (slot, (degree, &index)) in degrees.iter_mut().zip(indexes).enumerate() {
            if let Some(index) = index {
                *degree = Some(
                    usize::try_from(index)
                        .map_err(|_| KeyboardMappingError::NegativeIndex { slot, index })?,
                );
            }
        }

        Ok(Self { degrees })
    }

    pub fn get(&self, pitch_class: PitchClass) -> Option<usize> {
        self.degrees[pitch_class.index()]
    }

    /// The lowest [`PitchClass`] that `degree` is assigned to.
    pub fn pitch_class_of(&self, degree: usize) -> Option<PitchClass> {
        self.iter()
            .find(|&(_, assigned)| assigned == Some(degree))
            .map(|(pitch_class, _)| pitch_class)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PitchClass, Option<usize>)> + '_ {
        PitchClass::all().zip(self.degrees.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.iter().all(Option::is_none)
    }

    pub fn degrees(&self) -> &[Option<usize>; NUM_PITCH_CLASSES] {
        &self.degrees
    }
}

impl Display for KeyboardMapping {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (slot, degree) in self.degrees.iter().enumerate() {
            if slot > 0 {
                write!(f, ", ")?;
            }
            match degree {
                Some(degree) => write!(f, "{}", degree)?,
                None => write!(f, "-")?,
            }
        }
        write!(f, "]")
    }
}

/// Error reported when a [`KeyboardMapping`] is constructed from invalid data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum KeyboardMappingError {
    /// The number of slots is not 12.
    WrongLength(usize),
    /// A slot refers to a negative scale degree.
    NegativeIndex { slot: usize, index: i64 },
}

impl Display for KeyboardMappingError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            KeyboardMappingError::WrongLength(len) => write!(
                f,
                "Keyboard mapping must have exactly {} slots but has {}",
                NUM_PITCH_CLASSES, len
            ),
            KeyboardMappingError::NegativeIndex { slot, index } => write!(
                f,
                "Keyboard mapping slot {} refers to negative scale degree {}",
                slot, index
            ),
        }
    }
}

impl std::error::Error for KeyboardMappingError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_mapping() {
        let mapping = KeyboardMapping::empty();
        assert!(mapping.is_empty());
        assert_eq!(mapping.to_string(), "[-, -, -, -, -, -, -, -, -, -, -, -]");
        assert_eq!(mapping.pitch_class_of(0), None);
    }

    #[test]
    fn degree_on_several_keys_resolves_to_lowest_key() {
        let mut degrees = [None; 12];
        degrees[9] = Some(1);
        degrees[2] = Some(1);
        let mapping = KeyboardMapping::new(degrees);

        assert!(!mapping.is_empty());
        assert_eq!(mapping.pitch_class_of(1), Some(PitchClass::D));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            KeyboardMappingError::WrongLength(13).to_string(),
            "Keyboard mapping must have exactly 12 slots but has 13"
        );
        assert_eq!(
            KeyboardMappingError::NegativeIndex { slot: 4, index: -2 }.to_string(),
            "Keyboard mapping slot 4 refers to negative scale degree -2"
        );
    }
}
