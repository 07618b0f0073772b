use std::{fs::File, io::Read, path::Path};

use serde::Deserialize;
use tunemap::{
    interval::Interval,
    keyboard_mapping::KeyboardMapping,
    mapper::{AutoTuningMapper, ManualTuningMapper, SoftChromaticGenusMapping},
    note::Note,
    pitch::{ConcertPitch, Pitch},
    pitch_class::{PitchClass, NUM_PITCH_CLASSES},
    reducer::{DirectTuningReducer, MergeTuningReducer, TuningReducer},
    reference::TuningReference,
    scale::{IntonationStandard, Scale},
    tuning::Tuning,
};

use crate::{
    composition::{Composition, Mapper, ScaleEntry},
    error::ResultExt,
    CliError, CliResult,
};

#[derive(Debug, Deserialize)]
pub struct CompositionDto {
    pub reference: ReferenceDto,
    pub mapper: MapperDto,
    #[serde(default)]
    pub reducer: ReducerDto,
    #[serde(default)]
    pub global_fill: Option<Vec<Option<f64>>>,
    pub scales: Vec<ScaleDto>,
}

impl CompositionDto {
    pub fn read(input: impl Read) -> CliResult<CompositionDto> {
        serde_yaml::from_reader(input).handle_error::<CliError>("Could not parse composition file")
    }

    pub fn load(location: &Path) -> CliResult<CompositionDto> {
        let file = File::open(location).handle_error::<CliError>(&format!(
            "Could not open composition file {}",
            location.display()
        ))?;
        Self::read(file)
    }

    pub fn build(self) -> CliResult<Composition> {
        let global_fill = self
            .global_fill
            .map(|global_fill| {
                <[Option<f64>; NUM_PITCH_CLASSES]>::try_from(global_fill.as_slice())
                    .map(|deviations| Tuning::new("global fill", deviations))
                    .map_err(|_| {
                        format!(
                            "Global fill must have exactly {} slots but has {}",
                            NUM_PITCH_CLASSES,
                            global_fill.len()
                        )
                    })
            })
            .transpose()?;

        Ok(Composition {
            reference: self.reference.build()?,
            mapper: self.mapper.build()?,
            reducer: self.reducer.build(),
            global_fill,
            scales: self
                .scales
                .into_iter()
                .map(ScaleDto::build)
                .collect::<CliResult<_>>()?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ReferenceDto {
    Standard {
        base_pitch_class: String,
        #[serde(default)]
        base_offset: f64,
    },
    ConcertPitch {
        interval: String,
        base_note: String,
        #[serde(default = "default_concert_pitch_frequency")]
        frequency: f64,
    },
}

fn default_concert_pitch_frequency() -> f64 {
    ConcertPitch::default().a4_pitch().as_hz()
}

impl ReferenceDto {
    fn build(self) -> CliResult<TuningReference> {
        Ok(match self {
            ReferenceDto::Standard {
                base_pitch_class,
                base_offset,
            } => TuningReference::standard_with_offset(
                base_pitch_class.parse::<PitchClass>()?,
                base_offset,
            ),
            ReferenceDto::ConcertPitch {
                interval,
                base_note,
                frequency,
            } => {
                if !(frequency.is_finite() && frequency > 0.0) {
                    return Err(CliError::CommandError(format!(
                        "Invalid concert pitch frequency: {}",
                        frequency
                    )));
                }
                TuningReference::concert_pitch_at(
                    interval.parse::<Interval>()?,
                    base_note.parse::<Note>()?,
                    ConcertPitch::from_a4_pitch(Pitch::from_hz(frequency)),
                )
            }
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum MapperDto {
    Auto {
        #[serde(default)]
        map_quarter_tones_low: bool,
        #[serde(default = "default_quarter_tone_tolerance")]
        quarter_tone_tolerance: f64,
        #[serde(default)]
        soft_chromatic_genus_mapping: GenusDto,
        #[serde(default)]
        override_keyboard_mapping: Option<Vec<Option<i64>>>,
    },
    Manual {
        keyboard_mapping: Vec<Option<i64>>,
    },
}

fn default_quarter_tone_tolerance() -> f64 {
    5.0
}

impl MapperDto {
    fn build(self) -> CliResult<Mapper> {
        Ok(match self {
            MapperDto::Auto {
                map_quarter_tones_low,
                quarter_tone_tolerance,
                soft_chromatic_genus_mapping,
                override_keyboard_mapping,
            } => {
                let override_keyboard_mapping = match override_keyboard_mapping {
                    Some(indexes) => KeyboardMapping::from_indexes(&indexes)?,
                    None => KeyboardMapping::empty(),
                };
                Mapper::Auto(
                    AutoTuningMapper::builder()
                        .map_quarter_tones_low(map_quarter_tones_low)
                        .quarter_tone_tolerance(quarter_tone_tolerance)
                        .soft_chromatic_genus_mapping(soft_chromatic_genus_mapping.into())
                        .override_keyboard_mapping(override_keyboard_mapping)
                        .build()?,
                )
            }
            MapperDto::Manual { keyboard_mapping } => Mapper::Manual(ManualTuningMapper::new(
                KeyboardMapping::from_indexes(&keyboard_mapping)?,
            )),
        })
    }
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
pub enum GenusDto {
    #[default]
    Off,
    Strict,
    PseudoChromatic,
}

impl From<GenusDto> for SoftChromaticGenusMapping {
    fn from(dto: GenusDto) -> Self {
        match dto {
            GenusDto::Off => SoftChromaticGenusMapping::Off,
            GenusDto::Strict => SoftChromaticGenusMapping::Strict,
            GenusDto::PseudoChromatic => SoftChromaticGenusMapping::PseudoChromatic,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(tag = "type")]
pub enum ReducerDto {
    #[default]
    Direct,
    Merge {
        #[serde(default = "default_equality_tolerance")]
        equality_tolerance: f64,
    },
}

fn default_equality_tolerance() -> f64 {
    MergeTuningReducer::default().equality_tolerance()
}

impl ReducerDto {
    fn build(self) -> Box<dyn TuningReducer> {
        match self {
            ReducerDto::Direct => Box::new(DirectTuningReducer),
            ReducerDto::Merge { equality_tolerance } => {
                Box::new(MergeTuningReducer::new(equality_tolerance))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScaleDto {
    pub name: String,
    #[serde(default = "default_intonation_standard")]
    pub intonation_standard: String,
    pub intervals: Vec<DegreeDto>,
    #[serde(default)]
    pub transposition: Option<String>,
}

fn default_intonation_standard() -> String {
    IntonationStandard::Just.to_string()
}

/// Degrees can be written as plain YAML numbers or as interval expressions.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DegreeDto {
    Number(f64),
    Expression(String),
}

impl ScaleDto {
    fn build(self) -> CliResult<ScaleEntry> {
        let intonation_standard = self.intonation_standard.parse::<IntonationStandard>()?;

        let mut builder = Scale::builder(&self.name).intonation_standard(intonation_standard);
        for degree in &self.intervals {
            let degree = match degree {
                DegreeDto::Number(number) => number.to_string(),
                DegreeDto::Expression(expression) => expression.clone(),
            };
            builder = builder.push(
                intonation_standard
                    .parse_degree(&degree)
                    .handle_error::<CliError>(&format!("Invalid degree in scale {}", self.name))?,
            );
        }

        Ok(ScaleEntry {
            scale: builder.build()?,
            transposition: self
                .transposition
                .map(|transposition| transposition.parse::<Interval>())
                .transpose()?,
        })
    }
}
