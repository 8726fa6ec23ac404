use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Parser, Debug)]
#[command(version, about = "Convert an ansible-playbook transcript into YAML", long_about = None)]
pub struct Cli {
    /// scanner options file (YAML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// fail on unrecognized lines and on outcomes outside a task
    #[arg(long, action)]
    pub strict: bool,

    /// record unparseable inline values as text
    #[arg(long, action)]
    pub lenient_values: bool,

    /// count `fatal:` lines as failed outcomes
    #[arg(long, action)]
    pub fatal_as_failed: bool,

    #[arg(long, value_name = "TEXT")]
    pub recap_marker: Option<String>,

    #[arg(long, value_name = "TEXT")]
    pub play_marker: Option<String>,

    #[arg(long, value_name = "TEXT")]
    pub task_marker: Option<String>,

    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: OutputFormat,

    /// write the document here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// transcript to read, `-` or nothing for stdin
    pub transcript: Option<PathBuf>,
}
