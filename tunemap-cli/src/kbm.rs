use std::path::PathBuf;

use clap::Parser;

use crate::{composition::Composition, App, CliResult};

#[derive(Parser)]
pub(crate) struct KbmOptions {
    /// Location of the composition file (YAML)
    composition_file: PathBuf,
}

impl KbmOptions {
    pub fn run(self, app: &mut App) -> CliResult {
        let composition = Composition::load(&self.composition_file)?;

        for (name, keyboard_mapping) in composition.keyboard_mappings()? {
            app.writeln(format_args!("{}: {}", name, keyboard_mapping))?;
        }

        Ok(())
    }
}
