use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

use log::debug;

use crate::interval::Interval;
use crate::keyboard_mapping::KeyboardMapping;
use crate::math::{self, RoundingDirection};
use crate::pitch_class::{PitchClass, NUM_PITCH_CLASSES};
use crate::reference::TuningReference;
use crate::scale::Scale;
use crate::tuning::{Tuning, TuningPitch};

use super::genus::SoftChromaticGenusMapping;
use super::{TuningMapper, TuningMapperError, MAX_FORCED_DEVIATION};

/// Deviations closer than this are considered the same pitch, e.g. a degree and its octave.
const EQUIVALENCE_THRESHOLD: f64 = 1e-6;

/// Maps scale degrees to the nearest key, with a configurable policy for quarter tones.
///
/// Degrees whose position lies within [`AutoTuningMapperBuilder::quarter_tone_tolerance`] cents of the boundary between two keys are considered quarter tones.
/// Quarter tones go to the lower or the upper key depending on [`AutoTuningMapperBuilder::map_quarter_tones_low`].
/// When two non-equivalent degrees land on the same key, quarter tones are moved to their other key where possible.
///
/// # Examples
///
/// ```
/// # use assert_approx_eq::assert_approx_eq;
/// # use tunemap::interval::Interval;
/// # use tunemap::mapper::{AutoTuningMapper, TuningMapper};
/// # use tunemap::note::Note;
/// # use tunemap::pitch_class::PitchClass;
/// # use tunemap::reference::TuningReference;
/// # use tunemap::scale::Scale;
/// let scale = Scale::from_ratios(
///     "maj",
///     &[(1, 1), (9, 8), (5, 4), (4, 3), (3, 2), (5, 3), (15, 8), (2, 1)],
/// )
/// .unwrap();
/// let reference = TuningReference::concert_pitch(Interval::from_ratio(32, 27), Note::from_midi_number(72));
/// let mapper = AutoTuningMapper::builder().map_quarter_tones_low(true).build().unwrap();
///
/// let tuning = mapper.map_scale(&scale, &reference).unwrap();
/// assert_eq!(tuning.name(), "C maj");
/// assert_eq!(tuning.completed_count(), 7);
/// assert_approx_eq!(tuning.get(PitchClass::C).unwrap(), -5.87, 0.01);
/// assert_approx_eq!(tuning.get(PitchClass::D).unwrap(), -1.96, 0.01);
/// assert_approx_eq!(tuning.get(PitchClass::E).unwrap(), -19.56, 0.01);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct AutoTuningMapper {
    map_quarter_tones_low: bool,
    quarter_tone_tolerance: f64,
    soft_chromatic_genus_mapping: SoftChromaticGenusMapping,
    override_keyboard_mapping: KeyboardMapping,
}

impl AutoTuningMapper {
    pub fn builder() -> AutoTuningMapperBuilder {
        AutoTuningMapperBuilder {
            map_quarter_tones_low: false,
            quarter_tone_tolerance: 5.0,
            soft_chromatic_genus_mapping: SoftChromaticGenusMapping::default(),
            override_keyboard_mapping: KeyboardMapping::empty(),
        }
    }

    pub fn maps_quarter_tones_low(&self) -> bool {
        self.map_quarter_tones_low
    }

    pub fn quarter_tone_tolerance(&self) -> f64 {
        self.quarter_tone_tolerance
    }

    pub fn soft_chromatic_genus_mapping(&self) -> SoftChromaticGenusMapping {
        self.soft_chromatic_genus_mapping
    }

    pub fn override_keyboard_mapping(&self) -> &KeyboardMapping {
        &self.override_keyboard_mapping
    }

    /// Finds the key and deviation of a single interval above the reference.
    ///
    /// # Examples
    ///
    /// ```
    /// # use assert_approx_eq::assert_approx_eq;
    /// # use tunemap::interval::Interval;
    /// # use tunemap::mapper::AutoTuningMapper;
    /// # use tunemap::pitch_class::PitchClass;
    /// # use tunemap::reference::TuningReference;
    /// let reference = TuningReference::standard(PitchClass::C);
    /// let low = AutoTuningMapper::builder().map_quarter_tones_low(true).build().unwrap();
    /// let high = AutoTuningMapper::builder().map_quarter_tones_low(false).build().unwrap();
    ///
    /// // Neutral third
    /// let interval = Interval::from_cents(347.0);
    /// let mapped_low = low.map_interval(interval, &reference);
    /// assert_eq!(mapped_low.pitch_class, PitchClass::D_SHARP);
    /// assert_approx_eq!(mapped_low.deviation, 47.0);
    /// let mapped_high = high.map_interval(interval, &reference);
    /// assert_eq!(mapped_high.pitch_class, PitchClass::E);
    /// assert_approx_eq!(mapped_high.deviation, -53.0);
    ///
    /// // Outside of the quarter-tone band
    /// let interval = Interval::from_cents(340.0);
    /// assert_eq!(low.map_interval(interval, &reference), high.map_interval(interval, &reference));
    /// ```
    pub fn map_interval(
        &self,
        interval: Interval,
        tuning_reference: &TuningReference,
    ) -> TuningPitch {
        let absolute_cents = tuning_reference.absolute_cents(interval);
        let semitones = math::round_with_tolerance(
            absolute_cents / 100.0,
            self.half_tolerance(),
            self.rounding_direction(),
        );
        TuningPitch {
            pitch_class: PitchClass::from_semitones(semitones),
            deviation: absolute_cents - f64::from(semitones) * 100.0,
        }
    }

    /// Maps `scale` transposed by `transposition`.
    ///
    /// The name of the resulting tuning is derived from the untransposed scale and the base pitch class of `tuning_reference`.
    pub fn map_scale_transposed(
        &self,
        scale: &Scale,
        tuning_reference: &TuningReference,
        transposition: Interval,
    ) -> Result<Tuning, TuningMapperError> {
        let degree_mappings = self.resolve_degrees(scale, tuning_reference, transposition)?;

        // Mappings are sorted by degree, so the lowest degree of each key is written last when iterating in reverse
        let tuning_pitches = degree_mappings
            .iter()
            .rev()
            .map(DegreeMapping::tuning_pitch);

        Ok(Tuning::from_tuning_pitches(
            super::tuning_name(scale, tuning_reference),
            tuning_pitches,
        ))
    }

    /// Captures which scale degree each key is assigned to, e.g. for reuse in a [`ManualTuningMapper`](super::ManualTuningMapper).
    ///
    /// Keys of the override mapping are kept verbatim. Where equivalent degrees share a key, the lowest degree is reported.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tunemap::mapper::AutoTuningMapper;
    /// # use tunemap::pitch_class::PitchClass;
    /// # use tunemap::reference::TuningReference;
    /// # use tunemap::scale::Scale;
    /// let scale = Scale::from_ratios("maj", &[(1, 1), (9, 8), (5, 4), (4, 3), (3, 2), (5, 3), (15, 8), (2, 1)]).unwrap();
    /// let mapper = AutoTuningMapper::builder().build().unwrap();
    ///
    /// let keyboard_mapping = mapper
    ///     .keyboard_mapping_of(&scale, &TuningReference::standard(PitchClass::C))
    ///     .unwrap();
    /// assert_eq!(keyboard_mapping.to_string(), "[0, -, 1, -, 2, 3, -, 4, -, 5, -, 6]");
    /// ```
    pub fn keyboard_mapping_of(
        &self,
        scale: &Scale,
        tuning_reference: &TuningReference,
    ) -> Result<KeyboardMapping, TuningMapperError> {
        let degree_mappings = self.resolve_degrees(scale, tuning_reference, Interval::unison())?;

        let mut degrees = [None; NUM_PITCH_CLASSES];
        for degree_mapping in degree_mappings.iter().rev() {
            degrees[degree_mapping.pitch_class().index()] = Some(degree_mapping.degree);
        }
        Ok(KeyboardMapping::new(degrees))
    }

    /// Assigns a key to every degree and makes sure that each key holds at most one distinct pitch.
    ///
    /// The result is sorted by degree and then by key.
    fn resolve_degrees(
        &self,
        scale: &Scale,
        tuning_reference: &TuningReference,
        transposition: Interval,
    ) -> Result<Vec<DegreeMapping>, TuningMapperError> {
        let mut degree_mappings = Vec::new();

        for (pitch_class, degree) in self.override_keyboard_mapping.iter() {
            if let Some(degree) = degree {
                super::check_degree_in_range(scale, pitch_class, degree)?;
            }
        }

        for (degree, &interval) in scale.intervals().iter().enumerate() {
            let absolute_cents =
                super::absolute_cents_of(tuning_reference, degree, interval + transposition)?;

            let mut is_overridden = false;
            for (pitch_class, _) in self
                .override_keyboard_mapping
                .iter()
                .filter(|&(_, assigned)| assigned == Some(degree))
            {
                let forced = super::force_onto_key(pitch_class, degree, absolute_cents)?;
                degree_mappings.push(DegreeMapping::forced(degree, absolute_cents, forced));
                is_overridden = true;
            }

            if !is_overridden {
                degree_mappings.push(self.map_degree(degree, absolute_cents));
            }
        }

        self.soft_chromatic_genus_mapping.apply(&mut degree_mappings);

        resolve_conflicts(&mut degree_mappings)?;

        Ok(degree_mappings)
    }

    fn map_degree(&self, degree: usize, absolute_cents: f64) -> DegreeMapping {
        let semitones_value = absolute_cents / 100.0;
        let direction = self.rounding_direction();
        let semitones =
            math::round_with_tolerance(semitones_value, self.half_tolerance(), direction);
        let alternative = math::is_within_half_band(semitones_value, self.half_tolerance())
            .then(|| {
                math::round_with_tolerance(
                    semitones_value,
                    self.half_tolerance(),
                    direction.opposite(),
                )
            });

        DegreeMapping {
            degree,
            absolute_cents,
            semitones,
            alternative,
            is_forced: false,
        }
    }

    fn rounding_direction(&self) -> RoundingDirection {
        if self.map_quarter_tones_low {
            RoundingDirection::Down
        } else {
            RoundingDirection::Up
        }
    }

    fn half_tolerance(&self) -> f64 {
        self.quarter_tone_tolerance / 100.0
    }
}

impl TuningMapper for AutoTuningMapper {
    fn map_scale(
        &self,
        scale: &Scale,
        tuning_reference: &TuningReference,
    ) -> Result<Tuning, TuningMapperError> {
        self.map_scale_transposed(scale, tuning_reference, Interval::unison())
    }
}

/// Builder created by [`AutoTuningMapper::builder`].
pub struct AutoTuningMapperBuilder {
    map_quarter_tones_low: bool,
    quarter_tone_tolerance: f64,
    soft_chromatic_genus_mapping: SoftChromaticGenusMapping,
    override_keyboard_mapping: KeyboardMapping,
}

impl AutoTuningMapperBuilder {
    /// Round quarter tones down instead of up. Default: `false`.
    pub fn map_quarter_tones_low(mut self, map_quarter_tones_low: bool) -> Self {
        self.map_quarter_tones_low = map_quarter_tones_low;
        self
    }

    /// Half-width of the quarter-tone band around the 50c boundary between two keys. Default: `5.0`.
    pub fn quarter_tone_tolerance(mut self, quarter_tone_tolerance: f64) -> Self {
        self.quarter_tone_tolerance = quarter_tone_tolerance;
        self
    }

    pub fn soft_chromatic_genus_mapping(
        mut self,
        soft_chromatic_genus_mapping: SoftChromaticGenusMapping,
    ) -> Self {
        self.soft_chromatic_genus_mapping = soft_chromatic_genus_mapping;
        self
    }

    /// Pins scale degrees to keys, bypassing the rounding. Default: empty.
    pub fn override_keyboard_mapping(mut self, override_keyboard_mapping: KeyboardMapping) -> Self {
        self.override_keyboard_mapping = override_keyboard_mapping;
        self
    }

    pub fn build(self) -> Result<AutoTuningMapper, AutoTuningMapperBuildError> {
        if !(0.0..MAX_FORCED_DEVIATION).contains(&self.quarter_tone_tolerance) {
            return Err(AutoTuningMapperBuildError::ToleranceOutOfRange(
                self.quarter_tone_tolerance,
            ));
        }

        Ok(AutoTuningMapper {
            map_quarter_tones_low: self.map_quarter_tones_low,
            quarter_tone_tolerance: self.quarter_tone_tolerance,
            soft_chromatic_genus_mapping: self.soft_chromatic_genus_mapping,
            override_keyboard_mapping: self.override_keyboard_mapping,
        })
    }
}

/// Error reported when building an [`AutoTuningMapper`] fails.
#[derive(Clone, Debug, PartialEq)]
pub enum AutoTuningMapperBuildError {
    /// The quarter-tone tolerance is not in the range [0c, 50c).
    ToleranceOutOfRange(f64),
}

impl Display for AutoTuningMapperBuildError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            AutoTuningMapperBuildError::ToleranceOutOfRange(tolerance) => write!(
                f,
                "Quarter-tone tolerance must be at least 0c and less than {}c but was {}c",
                MAX_FORCED_DEVIATION, tolerance
            ),
        }
    }
}

impl std::error::Error for AutoTuningMapperBuildError {}

/// The key currently chosen for one scale degree.
#[derive(Clone, Debug)]
pub(super) struct DegreeMapping {
    pub degree: usize,
    pub absolute_cents: f64,
    /// 12-EDO semitones above C.
    pub semitones: i32,
    /// The other key of a quarter tone which has not been moved yet.
    pub alternative: Option<i32>,
    pub is_forced: bool,
}

impl DegreeMapping {
    fn forced(degree: usize, absolute_cents: f64, forced: TuningPitch) -> Self {
        Self {
            degree,
            absolute_cents,
            semitones: forced
                .pitch_class
                .nearest_semitones(absolute_cents / 100.0),
            alternative: None,
            is_forced: true,
        }
    }

    pub fn pitch_class(&self) -> PitchClass {
        PitchClass::from_semitones(self.semitones)
    }

    pub fn deviation(&self) -> f64 {
        self.absolute_cents - f64::from(self.semitones) * 100.0
    }

    fn tuning_pitch(&self) -> TuningPitch {
        TuningPitch {
            pitch_class: self.pitch_class(),
            deviation: self.deviation(),
        }
    }

    /// Moves the degree to its alternative key. The move cannot be undone.
    pub fn relocate(&mut self) -> bool {
        match self.alternative.take() {
            Some(alternative) => {
                self.semitones = alternative;
                true
            }
            None => false,
        }
    }

    fn is_equivalent_to(&self, other: &DegreeMapping) -> bool {
        self.pitch_class() == other.pitch_class()
            && (self.deviation() - other.deviation()).abs() < EQUIVALENCE_THRESHOLD
    }
}

/// Moves quarter tones away from occupied keys until every key holds at most one distinct pitch.
fn resolve_conflicts(degree_mappings: &mut [DegreeMapping]) -> Result<(), TuningMapperError> {
    // Every relocation consumes an alternative, so there are at most as many rounds as mappings
    for _ in 0..=degree_mappings.len() {
        let Some((pitch_class, conflicting)) = find_conflict(degree_mappings) else {
            return Ok(());
        };
        if try_relocate(degree_mappings, &conflicting).is_none() {
            return Err(conflict_error(degree_mappings, pitch_class, &conflicting));
        }
    }

    match find_conflict(degree_mappings) {
        None => Ok(()),
        Some((pitch_class, conflicting)) => {
            Err(conflict_error(degree_mappings, pitch_class, &conflicting))
        }
    }
}

/// Returns the lowest key holding non-equivalent degrees together with the positions of those degrees.
fn find_conflict(degree_mappings: &[DegreeMapping]) -> Option<(PitchClass, Vec<usize>)> {
    PitchClass::all().find_map(|pitch_class| {
        let on_key = positions_on_key(degree_mappings, pitch_class, None);
        let first = *on_key.first()?;
        on_key
            .iter()
            .any(|&position| !degree_mappings[position].is_equivalent_to(&degree_mappings[first]))
            .then_some((pitch_class, on_key))
    })
}

fn positions_on_key(
    degree_mappings: &[DegreeMapping],
    pitch_class: PitchClass,
    excluded: Option<usize>,
) -> Vec<usize> {
    degree_mappings
        .iter()
        .enumerate()
        .filter(|&(position, mapping)| {
            Some(position) != excluded && mapping.pitch_class() == pitch_class
        })
        .map(|(position, _)| position)
        .collect()
}

/// Relocates the first conflicting quarter tone whose alternative key is free or holds an equivalent pitch.
fn try_relocate(degree_mappings: &mut [DegreeMapping], conflicting: &[usize]) -> Option<()> {
    let position = conflicting.iter().copied().find(|&position| {
        let mapping = &degree_mappings[position];
        let Some(alternative) = mapping.alternative.filter(|_| !mapping.is_forced) else {
            return false;
        };

        let mut relocated = mapping.clone();
        relocated.semitones = alternative;
        positions_on_key(
            degree_mappings,
            relocated.pitch_class(),
            Some(position),
        )
        .iter()
        .all(|&other| degree_mappings[other].is_equivalent_to(&relocated))
    })?;

    let mapping = &mut degree_mappings[position];
    let from = mapping.pitch_class();
    mapping.relocate();
    debug!(
        "Relocated quarter tone of degree {} from {} to {}",
        mapping.degree,
        from,
        mapping.pitch_class()
    );

    Some(())
}

fn conflict_error(
    degree_mappings: &[DegreeMapping],
    pitch_class: PitchClass,
    conflicting: &[usize],
) -> TuningMapperError {
    let mut degrees = conflicting
        .iter()
        .map(|&position| degree_mappings[position].degree)
        .collect::<Vec<_>>();
    degrees.dedup();
    TuningMapperError::Conflict {
        pitch_class,
        degrees,
    }
}

#[cfg(test)]
mod test {
    use assert_approx_eq::assert_approx_eq;
    use pretty_assertions::assert_eq;

    use crate::note::Note;

    use super::*;

    fn just_major() -> Scale {
        Scale::from_ratios(
            "maj",
            &[(1, 1), (9, 8), (5, 4), (4, 3), (3, 2), (5, 3), (15, 8), (2, 1)],
        )
        .unwrap()
    }

    fn mapper(map_quarter_tones_low: bool) -> AutoTuningMapper {
        AutoTuningMapper::builder()
            .map_quarter_tones_low(map_quarter_tones_low)
            .build()
            .unwrap()
    }

    #[test]
    fn map_just_major_against_concert_pitch() {
        let reference = TuningReference::concert_pitch(
            Interval::from_ratio(32, 27),
            Note::from_midi_number(72),
        );

        let tuning = mapper(true).map_scale(&just_major(), &reference).unwrap();

        assert_eq!(tuning.name(), "C maj");
        assert_eq!(tuning.completed_count(), 7);
        assert_approx_eq!(tuning.get(PitchClass::C).unwrap(), -5.87, 0.01);
        assert_approx_eq!(tuning.get(PitchClass::D).unwrap(), -1.96, 0.01);
        assert_approx_eq!(tuning.get(PitchClass::E).unwrap(), -19.56, 0.01);
        assert_approx_eq!(tuning.get(PitchClass::F).unwrap(), -7.82, 0.01);
        assert_approx_eq!(tuning.get(PitchClass::G).unwrap(), -3.91, 0.01);
        assert_approx_eq!(tuning.get(PitchClass::A).unwrap(), -21.51, 0.01);
        assert_approx_eq!(tuning.get(PitchClass::B).unwrap(), -17.6, 0.01);
    }

    #[test]
    fn map_just_major_against_standard_reference() {
        let tuning = mapper(false)
            .map_scale(&just_major(), &TuningReference::standard(PitchClass::C))
            .unwrap();

        assert_eq!(
            tuning.to_string(),
            "C maj: [+0.00, -, +3.91, -, -13.69, -1.96, -, +1.96, -, -15.64, -, -11.73]"
        );
    }

    #[test]
    fn pythagorean_and_just_thirds_conflict() {
        let scale =
            Scale::from_ratios("conflict", &[(1, 1), (9, 8), (5, 4), (81, 64), (4, 3)]).unwrap();

        for map_quarter_tones_low in [false, true] {
            assert_eq!(
                mapper(map_quarter_tones_low)
                    .map_scale(&scale, &TuningReference::standard(PitchClass::C)),
                Err(TuningMapperError::Conflict {
                    pitch_class: PitchClass::E,
                    degrees: vec![2, 3],
                })
            );
        }
    }

    #[test]
    fn quarter_tone_direction_only_matters_inside_the_band() {
        let reference = TuningReference::standard_with_offset(PitchClass::D, 3.0);
        let low = mapper(true);
        let high = mapper(false);

        for cents_value in (0..2400).map(|cents_value| f64::from(cents_value) * 0.5) {
            let interval = Interval::from_cents(cents_value);
            let semitones_value = reference.absolute_cents(interval) / 100.0;
            let mapped_low = low.map_interval(interval, &reference);
            let mapped_high = high.map_interval(interval, &reference);

            if math::is_within_half_band(semitones_value, 0.05) {
                assert_eq!(
                    mapped_low.pitch_class,
                    PitchClass::from_semitones(semitones_value.floor() as i32)
                );
                assert_eq!(
                    mapped_high.pitch_class,
                    PitchClass::from_semitones(semitones_value.ceil() as i32)
                );
            } else {
                let scale = Scale::from_cents("single", &[cents_value]).unwrap();
                let tuning_low = low.map_scale(&scale, &reference).unwrap();
                let tuning_high = high.map_scale(&scale, &reference).unwrap();
                assert!(tuning_low.almost_equals(&tuning_high, 1e-9));
                assert!(mapped_low.deviation.abs() < 45.0 + 1e-9);
            }
        }
    }

    #[test]
    fn octave_duplicates_collapse_onto_lowest_degree() {
        let scale = Scale::from_cents("octaves", &[0.0, 700.0, 1200.0, 1900.0, 2400.0]).unwrap();
        let mapper = mapper(false);
        let reference = TuningReference::standard_with_offset(PitchClass::A, -4.0);

        let tuning = mapper.map_scale(&scale, &reference).unwrap();
        assert_eq!(tuning.completed_count(), 2);
        assert_approx_eq!(tuning.get(PitchClass::A).unwrap(), -4.0);
        assert_approx_eq!(tuning.get(PitchClass::E).unwrap(), -4.0);

        let keyboard_mapping = mapper.keyboard_mapping_of(&scale, &reference).unwrap();
        assert_eq!(keyboard_mapping.get(PitchClass::A), Some(0));
        assert_eq!(keyboard_mapping.get(PitchClass::E), Some(1));
    }

    #[test]
    fn conflicting_quarter_tone_moves_to_free_key() {
        let scale = Scale::from_cents("neutral", &[0.0, 300.0, 350.0]).unwrap();

        let tuning = mapper(true)
            .map_scale(&scale, &TuningReference::standard(PitchClass::C))
            .unwrap();

        assert_eq!(tuning.completed_count(), 3);
        assert_approx_eq!(tuning.get(PitchClass::D_SHARP).unwrap(), 0.0);
        assert_approx_eq!(tuning.get(PitchClass::E).unwrap(), -50.0);
    }

    #[test]
    fn conflicting_quarter_tone_cannot_move_to_occupied_key() {
        let scale = Scale::from_cents("crowded", &[0.0, 300.0, 350.0, 400.0]).unwrap();

        assert_eq!(
            mapper(true).map_scale(&scale, &TuningReference::standard(PitchClass::C)),
            Err(TuningMapperError::Conflict {
                pitch_class: PitchClass::D_SHARP,
                degrees: vec![1, 2],
            })
        );
    }

    #[test]
    fn override_forces_key() {
        let scale = Scale::from_ratios("neutral", &[(1, 1), (11, 9), (3, 2)]).unwrap();
        let reference = TuningReference::standard(PitchClass::C);

        // High quarter-tone mapping sends 11/9 to E
        let tuning = mapper(false).map_scale(&scale, &reference).unwrap();
        assert_approx_eq!(tuning.get(PitchClass::E).unwrap(), -52.59, 0.01);
        assert_eq!(tuning.get(PitchClass::D_SHARP), None);

        let mut degrees = [None; 12];
        degrees[PitchClass::D_SHARP.index()] = Some(1);
        let mapper = AutoTuningMapper::builder()
            .override_keyboard_mapping(KeyboardMapping::new(degrees))
            .build()
            .unwrap();

        let tuning = mapper.map_scale(&scale, &reference).unwrap();
        assert_eq!(tuning.get(PitchClass::E), None);
        assert_approx_eq!(tuning.get(PitchClass::D_SHARP).unwrap(), 47.41, 0.01);

        let keyboard_mapping = mapper.keyboard_mapping_of(&scale, &reference).unwrap();
        assert_eq!(keyboard_mapping.to_string(), "[0, -, -, 1, -, -, -, 2, -, -, -, -]");
    }

    #[test]
    fn override_within_limit() {
        let scale = Scale::from_cents("quarter", &[0.0, 150.0, 400.0]).unwrap();
        let mut degrees = [None; 12];
        degrees[PitchClass::C_SHARP.index()] = Some(1);
        let mapper = AutoTuningMapper::builder()
            .override_keyboard_mapping(KeyboardMapping::new(degrees))
            .build()
            .unwrap();
        let reference = TuningReference::standard(PitchClass::C);

        let tuning = mapper.map_scale(&scale, &reference).unwrap();
        assert_approx_eq!(tuning.get(PitchClass::C_SHARP).unwrap(), 50.0);
        assert_eq!(tuning.get(PitchClass::D), None);

        let keyboard_mapping = mapper.keyboard_mapping_of(&scale, &reference).unwrap();
        assert_eq!(keyboard_mapping.to_string(), "[0, 1, -, -, 2, -, -, -, -, -, -, -]");
    }

    #[test]
    fn override_overflow_and_out_of_range() {
        let reference = TuningReference::standard(PitchClass::C);

        let mut degrees = [None; 12];
        degrees[PitchClass::D_SHARP.index()] = Some(2);
        let overflowing = AutoTuningMapper::builder()
            .override_keyboard_mapping(KeyboardMapping::new(degrees))
            .build()
            .unwrap();
        let scale = Scale::from_cents("wide", &[0.0, 200.0, 420.0]).unwrap();
        match overflowing.map_scale(&scale, &reference) {
            Err(TuningMapperError::Overflow {
                pitch_class,
                degree,
                deviation,
            }) => {
                assert_eq!(pitch_class, PitchClass::D_SHARP);
                assert_eq!(degree, 2);
                assert_approx_eq!(deviation, 120.0);
            }
            other => panic!("Unexpected result: {:?}", other),
        }

        let mut degrees = [None; 12];
        degrees[PitchClass::B.index()] = Some(8);
        let out_of_range = AutoTuningMapper::builder()
            .override_keyboard_mapping(KeyboardMapping::new(degrees))
            .build()
            .unwrap();
        assert_eq!(
            out_of_range.map_scale(&just_major(), &reference),
            Err(TuningMapperError::IndexOutOfRange {
                pitch_class: PitchClass::B,
                degree: 8,
                scale_size: 8,
            })
        );
    }

    #[test]
    fn degree_on_several_keys() {
        let scale = Scale::from_cents("split", &[0.0, 350.0]).unwrap();
        let mut degrees = [None; 12];
        degrees[PitchClass::D_SHARP.index()] = Some(1);
        degrees[PitchClass::E.index()] = Some(1);
        let mapper = AutoTuningMapper::builder()
            .override_keyboard_mapping(KeyboardMapping::new(degrees))
            .build()
            .unwrap();

        let tuning = mapper
            .map_scale(&scale, &TuningReference::standard(PitchClass::C))
            .unwrap();
        assert_approx_eq!(tuning.get(PitchClass::D_SHARP).unwrap(), 50.0);
        assert_approx_eq!(tuning.get(PitchClass::E).unwrap(), -50.0);
    }

    #[test]
    fn transposition_and_naming() {
        let mapper = mapper(false);
        let reference = TuningReference::standard(PitchClass::C);

        let tuning = mapper
            .map_scale_transposed(&just_major(), &reference, Interval::from_ratio(3, 2))
            .unwrap();
        assert_eq!(tuning.name(), "C maj");
        assert_approx_eq!(tuning.get(PitchClass::G).unwrap(), 1.96, 0.01);
        assert_approx_eq!(tuning.get(PitchClass::F_SHARP).unwrap(), -9.78, 0.01);

        let without_unison = Scale::from_ratios("upper", &[(9, 8), (5, 4)]).unwrap();
        let tuning = mapper.map_scale(&without_unison, &reference).unwrap();
        assert_eq!(tuning.name(), "upper");

        // Degree zero lands on C# but the reference still names the tuning
        let shifted = TuningReference::standard_with_offset(PitchClass::C, 60.0);
        let scale = Scale::from_cents("maj", &[0.0, 200.0]).unwrap();
        let tuning = mapper.map_scale(&scale, &shifted).unwrap();
        assert_eq!(tuning.name(), "C maj");
        assert_approx_eq!(tuning.get(PitchClass::C_SHARP).unwrap(), -40.0);
    }

    #[test]
    fn reject_degrees_outside_of_keyboard_range() {
        let reference = TuningReference::standard(PitchClass::C);
        let scale = Scale::from_cents("low", &[0.0, -1e12]).unwrap();

        assert_eq!(
            mapper(false).map_scale(&scale, &reference),
            Err(TuningMapperError::OutOfKeyboardRange {
                degree: 1,
                absolute_cents: -1e12,
            })
        );
        assert!(mapper(true)
            .keyboard_mapping_of(&scale, &reference)
            .is_err());

        let scale = Scale::from_cents("high", &[1e12]).unwrap();
        assert!(matches!(
            mapper(false).map_scale(&scale, &reference),
            Err(TuningMapperError::OutOfKeyboardRange { degree: 0, .. })
        ));
    }

    #[test]
    fn overridden_degree_is_never_relocated() {
        let scale = Scale::from_cents("crowded", &[0.0, 300.0, 350.0]).unwrap();
        let mut degrees = [None; 12];
        degrees[PitchClass::D_SHARP.index()] = Some(2);
        let mapper = AutoTuningMapper::builder()
            .override_keyboard_mapping(KeyboardMapping::new(degrees))
            .build()
            .unwrap();

        assert_eq!(
            mapper.map_scale(&scale, &TuningReference::standard(PitchClass::C)),
            Err(TuningMapperError::Conflict {
                pitch_class: PitchClass::D_SHARP,
                degrees: vec![1, 2],
            })
        );
    }

    #[test]
    fn quarter_tone_moves_away_from_overridden_key() {
        let scale = Scale::from_cents("neutral", &[0.0, 300.0, 350.0]).unwrap();
        let reference = TuningReference::standard(PitchClass::C);
        let mut degrees = [None; 12];
        degrees[PitchClass::D_SHARP.index()] = Some(1);
        let mapper = AutoTuningMapper::builder()
            .map_quarter_tones_low(true)
            .override_keyboard_mapping(KeyboardMapping::new(degrees))
            .build()
            .unwrap();

        let tuning = mapper.map_scale(&scale, &reference).unwrap();
        assert_eq!(tuning.completed_count(), 3);
        assert_approx_eq!(tuning.get(PitchClass::D_SHARP).unwrap(), 0.0);
        assert_approx_eq!(tuning.get(PitchClass::E).unwrap(), -50.0);

        let keyboard_mapping = mapper.keyboard_mapping_of(&scale, &reference).unwrap();
        assert_eq!(keyboard_mapping.to_string(), "[0, -, -, 1, 2, -, -, -, -, -, -, -]");
    }

    #[test]
    fn tolerance_validation() {
        assert_eq!(
            AutoTuningMapper::builder()
                .quarter_tone_tolerance(50.0)
                .build(),
            Err(AutoTuningMapperBuildError::ToleranceOutOfRange(50.0))
        );
        assert_eq!(
            AutoTuningMapper::builder()
                .quarter_tone_tolerance(-1.0)
                .build()
                .unwrap_err()
                .to_string(),
            "Quarter-tone tolerance must be at least 0c and less than 50c but was -1c"
        );
        let mapper = AutoTuningMapper::builder()
            .quarter_tone_tolerance(0.0)
            .build()
            .unwrap();
        assert_eq!(mapper.quarter_tone_tolerance(), 0.0);
        assert!(!mapper.maps_quarter_tones_low());
    }
}
