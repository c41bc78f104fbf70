use std::ffi::OsString;
use std::path::PathBuf;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Profile name
    /// Optional. Profile section to read connection settings from. Default is 'default'.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    /// Verbose mode
    /// Optional. Log at debug level unless JOBLINE_LOG_LEVEL says otherwise.
    #[clap(
        short = 'v',
        long,
        help = "Print verbose log messages",
        default_value = "false"
    )]
    verbose: bool,

    /// Log file
    /// Optional. Write logs here instead of stderr, which the menu draws over.
    #[clap(long, value_name = "PATH", help = "write logs to a file")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    profile: String,
    verbose: bool,
    log_file: Option<PathBuf>,
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        ClapArgs::parse().into()
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::parse_from(itr).into()
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn log_file(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            profile: args.profile,
            verbose: args.verbose,
            log_file: args.log_file,
        }
    }
}
