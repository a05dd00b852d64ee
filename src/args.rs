use clap::Parser;

/// This is the operator console of a demonstration voting kiosk.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the candidates, the registered voters and the storage key.
    /// Without it, the demonstration parties and voters are used.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory, default '.') Where the tally is stored between runs.
    #[clap(short, long, value_parser)]
    pub state_dir: Option<String>,

    /// (directory, default '.') Where the CSV exports are written.
    #[clap(short, long, value_parser)]
    pub out_dir: Option<String>,

    /// (file path) A reference CSV file. If provided, every export is compared with it and the
    /// differences are printed.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
