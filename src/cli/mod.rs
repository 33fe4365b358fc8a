mod completions;
mod count;
mod create;
mod list;
mod root;
mod tenants;

pub use root::Cli;

/// Output format for commands that print data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
