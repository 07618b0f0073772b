mod composition;
mod dto;
mod error;
mod kbm;
mod tunings;

use std::{
    fmt::{self, Debug, Display},
    fs::File,
    io::{self, Write},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use kbm::KbmOptions;
use tunemap::{
    keyboard_mapping::KeyboardMappingError, mapper::AutoTuningMapperBuildError,
    scale::ScaleBuildError,
};
use tunings::TuningsOptions;

#[derive(Parser)]
#[command(
    name = "tunemap",
    version,
    about = "Map microtonal scales onto the 12 keys of a keyboard"
)]
struct MainOptions {
    /// Write output to a file instead of stdout
    #[arg(long = "of")]
    output_file: Option<PathBuf>,

    #[command(subcommand)]
    command: MainCommand,
}

#[derive(Subcommand)]
enum MainCommand {
    /// Map the scales of a composition file and print the reduced keyboard tunings
    #[command(name = "tunings")]
    Tunings(TuningsOptions),

    /// Print the keyboard mapping found for each scale of a composition file
    #[command(name = "kbm")]
    Kbm(KbmOptions),
}

impl MainOptions {
    fn run(self) -> CliResult {
        let stdout = io::stdout();
        let output: Box<dyn Write> = match self.output_file {
            Some(output_file) => Box::new(File::create(output_file)?),
            None => Box::new(stdout.lock()),
        };

        let stderr = io::stderr();
        let error = Box::new(stderr.lock());

        let mut app = App { output, error };

        self.command.run(&mut app)
    }
}

impl MainCommand {
    fn run(self, app: &mut App) -> CliResult {
        match self {
            MainCommand::Tunings(options) => options.run(app),
            MainCommand::Kbm(options) => options.run(app),
        }
    }
}

pub fn run_in_shell_env(args: impl IntoIterator<Item = String>) -> CliResult {
    let options = match MainOptions::try_parse_from(args) {
        Err(err) => {
            return if err.use_stderr() {
                Err(CliError::CommandError(err.to_string()))
            } else {
                println!("{}", err);
                Ok(())
            };
        }
        Ok(options) => options,
    };

    options.run()
}

struct App<'a> {
    output: Box<dyn 'a + Write>,
    error: Box<dyn 'a + Write>,
}

impl App<'_> {
    pub fn writeln(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(&mut self.output, "{}", message)
    }

    pub fn errln(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(&mut self.error, "{}", message)
    }
}

pub type CliResult<T = ()> = Result<T, CliError>;

pub enum CliError {
    IoError(io::Error),
    CommandError(String),
}

impl Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::IoError(err) => write!(f, "IO error / {}", err),
            CliError::CommandError(err) => write!(f, "The command failed / {}", err),
        }
    }
}

impl From<String> for CliError {
    fn from(v: String) -> Self {
        CliError::CommandError(v)
    }
}

impl From<ScaleBuildError> for CliError {
    fn from(v: ScaleBuildError) -> Self {
        CliError::CommandError(format!("Could not create scale ({})", v))
    }
}

impl From<KeyboardMappingError> for CliError {
    fn from(v: KeyboardMappingError) -> Self {
        CliError::CommandError(format!("Could not create keyboard mapping ({})", v))
    }
}

impl From<AutoTuningMapperBuildError> for CliError {
    fn from(v: AutoTuningMapperBuildError) -> Self {
        CliError::CommandError(format!("Could not create auto mapper ({})", v))
    }
}

impl From<io::Error> for CliError {
    fn from(v: io::Error) -> Self {
        CliError::IoError(v)
    }
}
