use clap::{Args, Parser};
use cuetrack::cue::config::ParserConfig;
use std::path::PathBuf;

/// Options shared by every command that parses a CUE sheet.
#[derive(Args, Debug, Clone, Eq, PartialEq)]
pub struct SheetOptions {
    /// Path to the .cue file
    #[arg(value_name = "INPUT_CUE")]
    pub input_cue: PathBuf,

    /// Fail on the first malformed line instead of skipping it
    #[arg(long, short = 's', default_value_t = false)]
    pub strict: bool,

    /// Do not look at referenced file sizes when a new FILE starts
    #[arg(long, default_value_t = false)]
    pub no_hints: bool,
}

impl SheetOptions {
    pub fn parser_config(&self) -> ParserConfig {
        if self.strict {
            ParserConfig::strict()
        } else {
            ParserConfig::lenient()
        }
    }
}

/// Lists every track with its file offset and logical disc position.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
pub struct TracksCommand {
    #[command(flatten)]
    pub sheet: SheetOptions,
}

/// Shows which file and byte offset back a logical disc sector.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
pub struct LocateCommand {
    #[command(flatten)]
    pub sheet: SheetOptions,

    /// Logical sector address (LBA)
    #[arg(value_name = "LBA")]
    pub lba: u32,
}
