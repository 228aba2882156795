use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "gab-cli")]
#[command(about = "Play gab dialogue scripts")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Interactive line player on stdin/stdout.
    Play(PlayArgs),
    /// Replays choices and prints the line protocol.
    Agent(AgentArgs),
}

#[derive(Debug, Args)]
pub(crate) struct PlayArgs {
    #[arg(long = "file")]
    pub(crate) file: String,
    #[arg(long = "start")]
    pub(crate) start: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct AgentArgs {
    #[arg(long = "file")]
    pub(crate) file: String,
    #[arg(long = "start")]
    pub(crate) start: Option<String>,
    #[arg(long = "choice")]
    pub(crate) choices: Vec<usize>,
}
