use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "charm-bundle")]
#[command(version)]
#[command(about = "Inspect and expand charm bundles", long_about = None)]
#[command(after_help = "Examples:\n  \
  charm-bundle mysql.charm              show the charm's metadata and options\n  \
  charm-bundle -l -v mysql.charm        list archive entries with sizes\n  \
  charm-bundle mysql.charm -d ./mysql   expand the bundle into ./mysql")]
pub struct Cli {
    /// Charm bundle path
    #[arg(value_name = "FILE")]
    pub file: String,

    /// List archive entries
    #[arg(short = 'l')]
    pub list: bool,

    /// Verbose listing and debug logging
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Expand the bundle into DIR
    #[arg(short = 'd', value_name = "DIR")]
    pub expand_dir: Option<String>,

    /// Quiet mode: print nothing but errors
    #[arg(short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }

    pub fn prints_listing(&self) -> bool {
        self.list && !self.quiet
    }

    /// Describe the charm when nothing else was asked for.
    pub fn prints_description(&self) -> bool {
        !self.list && self.expand_dir.is_none() && !self.quiet
    }
}
