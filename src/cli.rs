use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Ambient {
    /// The host reports a light (or unknown) color-scheme preference.
    Light,
    /// The host reports a dark color-scheme preference.
    Dark,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProgressMode {
    /// Enable progress UI when stderr is a TTY.
    Auto,
    /// Always enable progress UI (even when piped).
    Always,
    /// Never show progress UI.
    Never,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Rendered HTML page, or a directory of rendered pages.
    #[arg(long)]
    pub input: PathBuf,

    /// Output path. For a directory input: an output directory (default `out`).
    /// For a single page: an HTML file path (default `<stem>-enhanced.html`
    /// next to the input).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// JSON file holding the visitor's persisted theme choice. Read before the
    /// first page and updated when the resolved theme is applied. Omitting it
    /// behaves like a first visit with nothing persisted.
    #[arg(long)]
    pub theme_state: Option<PathBuf>,

    /// Ambient color-scheme assumed when no theme has been persisted.
    #[arg(long, value_enum, default_value = "light")]
    pub ambient: Ambient,

    /// Inject the built-in stylesheet (theme palettes, copy-button and sidebar
    /// styling) into each page's <head>.
    #[arg(long)]
    pub builtin_css: bool,

    /// Progress display: `auto`, `always`, or `never`.
    #[arg(long, value_enum, default_value = "auto")]
    pub progress: ProgressMode,
}
