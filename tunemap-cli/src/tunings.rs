use std::path::PathBuf;

use clap::Parser;
use log::warn;

use crate::{composition::Composition, App, CliResult};

/// Deviations beyond this limit cannot be expressed by single-note tuning messages around their key.
const MAX_EXPRESSIBLE_DEVIATION: f64 = 100.0;

#[derive(Parser)]
pub(crate) struct TuningsOptions {
    /// Location of the composition file (YAML)
    composition_file: PathBuf,

    /// Print complete tunings with unset keys tuned to 12-EDO
    #[arg(long = "resolve")]
    resolve: bool,
}

impl TuningsOptions {
    pub fn run(self, app: &mut App) -> CliResult {
        let composition = Composition::load(&self.composition_file)?;

        let tunings = composition.map_scales()?;
        let reduced = composition.reduce(&tunings);

        for tuning in &reduced {
            if let Some(max_abs_deviation) = tuning
                .max_abs_deviation()
                .filter(|&deviation| deviation > MAX_EXPRESSIBLE_DEVIATION)
            {
                warn!(
                    "Tuning {} deviates up to {:.2}c from 12-EDO",
                    tuning.name(),
                    max_abs_deviation
                );
            }

            if self.resolve {
                app.writeln(tuning.resolve())?;
            } else {
                app.writeln(tuning)?;
            }
        }

        app.errln(format_args!(
            "Number of scales: {}, number of keyboard tunings: {}",
            tunings.len(),
            reduced.len()
        ))?;

        Ok(())
    }
}
