use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Rendered Markdown in the scrolling viewer.
    #[default]
    View,
    /// Raw text, word-wrapped, in the scrolling viewer.
    Plain,
    /// Token stream printed to stdout.
    Tokens,
}

/// View a Markdown document in the terminal.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "mdview", version, about)]
#[command(
    group(
        ArgGroup::new("mode")
            .args(["tokens", "plain"])
            .multiple(false)
    )
)]
pub struct Args {
    /// Print the token stream and line count instead of opening the viewer.
    #[arg(long)]
    pub tokens: bool,

    /// Show the file as word-wrapped plain text.
    #[arg(long)]
    pub plain: bool,

    /// Wrap width in columns (defaults to the terminal width).
    #[arg(long, value_name = "N", value_parser = parse_width)]
    pub width: Option<usize>,

    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Document to view (defaults to `document` from the config).
    pub file: Option<PathBuf>,
}

impl Args {
    pub fn mode(&self) -> Mode {
        if self.tokens {
            Mode::Tokens
        } else if self.plain {
            Mode::Plain
        } else {
            Mode::View
        }
    }
}

fn parse_width(s: &str) -> Result<usize, String> {
    let width: usize = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if width == 0 {
        return Err("width must be at least 1".to_string());
    }
    Ok(width)
}
