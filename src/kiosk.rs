use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use voting_kiosk::*;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::args::Args;
use crate::kiosk::config_reader::*;
use crate::kiosk::console::Console;
use crate::kiosk::io_json::JsonFilePersistence;

pub mod config_reader;
pub mod console;
pub mod display;
pub mod io_csv;
pub mod io_json;

#[derive(Debug, Snafu)]
pub enum KioskCliError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the ballot store"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error replacing file {path}"))]
    ReplacingFile {
        source: tempfile::PersistError,
        path: String,
    },
    #[snafu(display("Error opening reference file {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading or writing the console"))]
    ConsoleIo { source: std::io::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type KResult<T> = Result<T, KioskCliError>;

fn dir_or_current(dir: &Option<String>) -> PathBuf {
    match dir {
        Some(d) if !d.is_empty() => PathBuf::from(d),
        _ => PathBuf::from("."),
    }
}

/// Opens the kiosk described by the arguments and runs the console on the
/// standard input until it is closed or `quit` is entered.
pub fn run_kiosk(args: &Args) -> KResult<()> {
    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => {
            info!("No configuration provided, using the demonstration parties and voters");
            KioskConfig::default()
        }
    };
    let setup = validate_config(&config)?;
    debug!("setup: {:?}", setup);

    let persistence = JsonFilePersistence::new(&dir_or_current(&args.state_dir), &setup.storage_key);
    info!("Ballot store: {}", persistence.path().display());
    let kiosk = Kiosk::open(setup.candidates, setup.directory, persistence);

    let mut console = Console::new(
        kiosk,
        dir_or_current(&args.out_dir),
        args.reference.clone(),
    );
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    console.run(stdin.lock(), &mut stdout)
}
