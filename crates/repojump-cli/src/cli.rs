use clap::{ArgAction, Parser, Subcommand, ValueHint};
use repojump_config::link_mode::LinkMode;

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List saved repositories
    #[clap(name = "list", visible_alias = "ls")]
    List {
        /// Only show repositories whose name or tag contains every word
        #[arg(required = false)]
        query: Vec<String>,
    },

    /// Add a repository
    #[command(arg_required_else_help = true)]
    Add {
        /// Repository URL, e.g. https://github.com/<owner>/<repo>
        #[arg(required = true)]
        url: String,

        /// Tag to search the repository by
        #[arg(required = false, short, long)]
        tag: Option<String>,
    },

    /// Remove repositories by URL or name
    #[command(arg_required_else_help = true)]
    #[clap(name = "remove", visible_alias = "rm")]
    Remove {
        /// URLs or names of the repositories to remove
        #[arg(required = true)]
        repos: Vec<String>,
    },

    /// Replace the repository list with rows of `<url> [tag]`
    ///
    /// Invalid rows are reported and left out; valid rows are saved.
    Edit {
        /// File to read rows from (default: stdin)
        #[arg(required = false, value_hint = ValueHint::FilePath)]
        file: Option<String>,
    },

    /// Export the settings as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(required = false, short, long, value_hint = ValueHint::FilePath)]
        output: Option<String>,
    },

    /// Import settings exported earlier, replacing the current ones
    #[command(arg_required_else_help = true)]
    Import {
        /// Exported settings file, or `-` for stdin
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        file: String,
    },

    /// Resolve the destination URL for a search
    ///
    /// Start the query with a hotkey and a space to pick a link mode:
    /// `p` pull requests (default), `l` commits, `s` source, `c` new pull request.
    #[clap(name = "open", visible_alias = "o")]
    Open {
        /// Search text, as typed in the search box
        #[arg(required = false)]
        query: Vec<String>,

        /// Link mode, same as typing its hotkey first (pr, log, src, c-pr)
        #[arg(required = false, short, long)]
        mode: Option<LinkMode>,

        /// Move the highlight down this many times
        #[arg(required = false, short, long, default_value_t = 0)]
        down: usize,

        /// Move the highlight up this many times
        #[arg(required = false, short, long, default_value_t = 0)]
        up: usize,

        /// Replace the current tab instead of opening a new one
        #[arg(required = false, short, long)]
        replace: bool,

        /// Open the new tab in the background
        #[arg(required = false, short, long, conflicts_with = "replace")]
        background: bool,
    },

    /// Print the configuration file to stdout
    Config {
        /// Save a new settings storage location to the configuration file
        #[arg(required = false, long, value_hint = ValueHint::FilePath)]
        storage_path: Option<String>,
    },

    /// Generate default config
    #[clap(name = "defconfig")]
    DefConfig,
}
