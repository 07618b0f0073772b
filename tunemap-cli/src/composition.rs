use std::path::Path;

use log::{info, warn};
use tunemap::{
    interval::Interval,
    keyboard_mapping::KeyboardMapping,
    mapper::{AutoTuningMapper, ManualTuningMapper, TuningMapper, TuningMapperError},
    reducer::TuningReducer,
    reference::TuningReference,
    scale::Scale,
    tuning::Tuning,
};

use crate::{dto::CompositionDto, error::ResultExt, CliError, CliResult};

/// A validated composition file: scales plus everything needed to turn them into keyboard tunings.
pub struct Composition {
    pub reference: TuningReference,
    pub mapper: Mapper,
    pub reducer: Box<dyn TuningReducer>,
    pub global_fill: Option<Tuning>,
    pub scales: Vec<ScaleEntry>,
}

pub enum Mapper {
    Auto(AutoTuningMapper),
    Manual(ManualTuningMapper),
}

pub struct ScaleEntry {
    pub scale: Scale,
    pub transposition: Option<Interval>,
}

impl Composition {
    pub fn load(location: &Path) -> CliResult<Composition> {
        let composition = CompositionDto::load(location)?.build()?;
        info!(
            "Loaded {} scales from {} (reference: {})",
            composition.scales.len(),
            location.display(),
            composition.reference
        );
        Ok(composition)
    }

    /// Maps every scale in file order.
    pub fn map_scales(&self) -> CliResult<Vec<Tuning>> {
        self.scales
            .iter()
            .map(|entry| {
                self.mapper
                    .map_scale(entry, &self.reference)
                    .handle_error::<CliError>(&format!(
                        "Could not map scale {}",
                        entry.scale.name()
                    ))
            })
            .collect()
    }

    pub fn reduce(&self, tunings: &[Tuning]) -> Vec<Tuning> {
        self.reducer.reduce(tunings, self.global_fill.as_ref())
    }

    pub fn keyboard_mappings(&self) -> CliResult<Vec<(&str, KeyboardMapping)>> {
        self.scales
            .iter()
            .map(|entry| {
                self.mapper
                    .keyboard_mapping_of(entry, &self.reference)
                    .map(|keyboard_mapping| (entry.scale.name(), keyboard_mapping))
                    .handle_error::<CliError>(&format!(
                        "Could not find keyboard mapping of scale {}",
                        entry.scale.name()
                    ))
            })
            .collect()
    }
}

impl Mapper {
    fn map_scale(
        &self,
        entry: &ScaleEntry,
        reference: &TuningReference,
    ) -> Result<Tuning, TuningMapperError> {
        match self {
            Mapper::Auto(mapper) => mapper.map_scale_transposed(
                &entry.scale,
                reference,
                entry.transposition.unwrap_or_default(),
            ),
            Mapper::Manual(mapper) => {
                if entry.transposition.is_some() {
                    warn!(
                        "Transposition of scale {} is ignored by the manual mapper",
                        entry.scale.name()
                    );
                }
                mapper.map_scale(&entry.scale, reference)
            }
        }
    }

    fn keyboard_mapping_of(
        &self,
        entry: &ScaleEntry,
        reference: &TuningReference,
    ) -> Result<KeyboardMapping, TuningMapperError> {
        match self {
            Mapper::Auto(mapper) => mapper.keyboard_mapping_of(&entry.scale, reference),
            Mapper::Manual(mapper) => mapper
                .map_scale(&entry.scale, reference)
                .map(|_| *mapper.keyboard_mapping()),
        }
    }
}
