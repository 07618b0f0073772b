use log::debug;

use crate::keyboard_mapping::KeyboardMapping;
use crate::reference::TuningReference;
use crate::scale::Scale;
use crate::tuning::Tuning;

use super::{TuningMapper, TuningMapperError};

/// Maps scale degrees to the keys given by a fixed [`KeyboardMapping`].
///
/// # Examples
///
/// ```
/// # use assert_approx_eq::assert_approx_eq;
/// # use tunemap::keyboard_mapping::KeyboardMapping;
/// # use tunemap::mapper::{ManualTuningMapper, TuningMapper};
/// # use tunemap::pitch_class::PitchClass;
/// # use tunemap::reference::TuningReference;
/// # use tunemap::scale::Scale;
/// let scale = Scale::from_cents("rast", &[0.0, 204.0, 350.0, 498.0]).unwrap();
/// let keyboard_mapping = KeyboardMapping::from_indexes(&[
///     Some(0), None, Some(1), None, Some(2), Some(3), None, None, None, None, None, None,
/// ])
/// .unwrap();
///
/// let tuning = ManualTuningMapper::new(keyboard_mapping)
///     .map_scale(&scale, &TuningReference::standard(PitchClass::C))
///     .unwrap();
///
/// assert_eq!(tuning.name(), "C rast");
/// assert_approx_eq!(tuning.get(PitchClass::E).unwrap(), -50.0);
/// assert_eq!(tuning.completed_count(), 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ManualTuningMapper {
    keyboard_mapping: KeyboardMapping,
}

impl ManualTuningMapper {
    pub fn new(keyboard_mapping: KeyboardMapping) -> Self {
        Self { keyboard_mapping }
    }

    pub fn keyboard_mapping(&self) -> &KeyboardMapping {
        &self.keyboard_mapping
    }
}

impl TuningMapper for ManualTuningMapper {
    fn map_scale(
        &self,
        scale: &Scale,
        tuning_reference: &TuningReference,
    ) -> Result<Tuning, TuningMapperError> {
        let mut tuning_pitches = Vec::new();
        for (pitch_class, degree) in self.keyboard_mapping.iter() {
            let Some(degree) = degree else {
                continue;
            };
            super::check_degree_in_range(scale, pitch_class, degree)?;
            let absolute_cents =
                super::absolute_cents_of(tuning_reference, degree, scale.intervals()[degree])?;
            tuning_pitches.push(super::force_onto_key(pitch_class, degree, absolute_cents)?);
        }

        let name = super::tuning_name(scale, tuning_reference);
        debug!("Mapped {} onto {} keys", name, tuning_pitches.len());

        Ok(Tuning::from_tuning_pitches(name, tuning_pitches))
    }
}

#[cfg(test)]
mod test {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;

    use crate::interval::Interval;
    use crate::mapper::AutoTuningMapper;
    use crate::pitch_class::PitchClass;

    use super::*;

    fn just_major() -> Scale {
        Scale::from_ratios(
            "maj",
            &[(1, 1), (9, 8), (5, 4), (4, 3), (3, 2), (5, 3), (15, 8)],
        )
        .unwrap()
    }

    #[test]
    fn reproduces_auto_mapping() {
        let reference = TuningReference::standard_with_offset(PitchClass::F, 2.0);
        let auto_mapper = AutoTuningMapper::builder().build().unwrap();

        let keyboard_mapping = auto_mapper
            .keyboard_mapping_of(&just_major(), &reference)
            .unwrap();
        let manual = ManualTuningMapper::new(keyboard_mapping)
            .map_scale(&just_major(), &reference)
            .unwrap();
        let auto = auto_mapper.map_scale(&just_major(), &reference).unwrap();

        assert_eq!(manual.name(), "F maj");
        assert_eq!(manual.name(), auto.name());
        assert!(manual.almost_equals(&auto, 1e-9));
    }

    #[test]
    fn same_degree_on_several_keys() {
        let mut degrees = [None; 12];
        degrees[PitchClass::D_SHARP.index()] = Some(1);
        degrees[PitchClass::E.index()] = Some(1);
        let scale = Scale::from_cents("neutral", &[0.0, 350.0]).unwrap();

        let tuning = ManualTuningMapper::new(KeyboardMapping::new(degrees))
            .map_scale(&scale, &TuningReference::standard(PitchClass::C))
            .unwrap();

        assert_eq!(tuning.completed_count(), 2);
        assert_approx_eq!(tuning.get(PitchClass::D_SHARP).unwrap(), 50.0);
        assert_approx_eq!(tuning.get(PitchClass::E).unwrap(), -50.0);
        assert_eq!(tuning.name(), "C neutral");
    }

    #[test]
    fn name_follows_reference_instead_of_mapped_key() {
        let mut degrees = [None; 12];
        degrees[PitchClass::C_SHARP.index()] = Some(0);
        let scale = Scale::from_cents("maj", &[0.0, 200.0]).unwrap();

        let tuning = ManualTuningMapper::new(KeyboardMapping::new(degrees))
            .map_scale(
                &scale,
                &TuningReference::standard_with_offset(PitchClass::C, 60.0),
            )
            .unwrap();
        assert_eq!(tuning.name(), "C maj");
        assert_approx_eq!(tuning.get(PitchClass::C_SHARP).unwrap(), -40.0);
    }

    #[test]
    fn reject_degrees_outside_of_keyboard_range() {
        let mut degrees = [None; 12];
        degrees[PitchClass::C.index()] = Some(0);
        let mapper = ManualTuningMapper::new(KeyboardMapping::new(degrees));
        let reference = TuningReference::standard(PitchClass::C);

        for cents_value in [1e12, -1e12] {
            let scale = Scale::from_cents("extreme", &[cents_value]).unwrap();
            assert_eq!(
                mapper.map_scale(&scale, &reference),
                Err(TuningMapperError::OutOfKeyboardRange {
                    degree: 0,
                    absolute_cents: cents_value,
                })
            );
        }
    }

    #[test]
    fn overflow() {
        let mut degrees = [None; 12];
        degrees[PitchClass::F.index()] = Some(2);

        match ManualTuningMapper::new(KeyboardMapping::new(degrees))
            .map_scale(&just_major(), &TuningReference::standard(PitchClass::C))
        {
            Err(TuningMapperError::Overflow {
                pitch_class,
                degree,
                deviation,
            }) => {
                assert_eq!(pitch_class, PitchClass::F);
                assert_eq!(degree, 2);
                assert_approx_eq!(deviation, -113.69, 0.01);
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn index_out_of_range() {
        let mut degrees = [None; 12];
        degrees[PitchClass::C.index()] = Some(0);
        degrees[PitchClass::A_SHARP.index()] = Some(7);

        assert_eq!(
            ManualTuningMapper::new(KeyboardMapping::new(degrees))
                .map_scale(&just_major(), &TuningReference::standard(PitchClass::C)),
            Err(TuningMapperError::IndexOutOfRange {
                pitch_class: PitchClass::A_SHARP,
                degree: 7,
                scale_size: 7,
            })
        );
    }

    #[test]
    fn no_transposition_or_rounding() {
        let scale = Scale::builder("fifth")
            .push(Interval::from_ratio(3, 2))
            .build()
            .unwrap();
        let mut degrees = [None; 12];
        degrees[PitchClass::G.index()] = Some(0);
        degrees[PitchClass::G_SHARP.index()] = Some(0);

        assert!(ManualTuningMapper::new(KeyboardMapping::new(degrees))
            .map_scale(&scale, &TuningReference::standard(PitchClass::C))
            .is_err());

        degrees[PitchClass::G_SHARP.index()] = None;
        let tuning = ManualTuningMapper::new(KeyboardMapping::new(degrees))
            .map_scale(&scale, &TuningReference::standard(PitchClass::C))
            .unwrap();
        assert_eq!(tuning.name(), "fifth");
        assert_approx_eq!(tuning.get(PitchClass::G).unwrap(), 1.955, 1e-3);
    }
}
