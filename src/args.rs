use clap::Parser;

/// This is the Teampower voting kiosk, replaying a scripted session.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON file describing the session: the kiosk variant, the start time and the
    /// list of actions. See the manual of kiosk_core for the format.
    #[clap(short, long, value_parser)]
    pub script: String,

    /// (full or reduced) The kiosk variant. Setting this option overrides the variant in the script.
    #[clap(long, value_parser)]
    pub variant: Option<String>,

    /// (directory path, 'stdout' or empty) If specified, the downloaded reports are written to this location.
    /// Setting this option overrides the outputDirectory of the script.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference report. If provided, teampower will check that the last downloaded
    /// report matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
