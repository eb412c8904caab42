//! Command-line options shared by every command.

use std::path::Path;

use plet_diagnostic::ColorMode;
use plet_eval::Mode;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub file: Option<String>,
    pub color: ColorMode,
    pub max_loops: Option<u64>,
    /// Forced reading mode; otherwise chosen from the file extension.
    pub mode: Option<Mode>,
}

impl Options {
    /// Parse everything after the command name. Flags may come before or
    /// after the file.
    pub fn parse(args: &[String]) -> Result<Options, String> {
        let mut options = Options::default();
        for arg in args {
            if arg == "--no-color" {
                options.color = ColorMode::Never;
            } else if arg == "--color" {
                options.color = ColorMode::Always;
            } else if let Some(limit) = arg.strip_prefix("--max-loops=") {
                let limit = limit
                    .parse()
                    .map_err(|_| format!("invalid loop limit '{limit}'"))?;
                options.max_loops = Some(limit);
            } else if arg == "--template" {
                options.mode = Some(Mode::Template);
            } else if arg == "--script" {
                options.mode = Some(Mode::Script);
            } else if arg.starts_with('-') {
                return Err(format!("unknown option '{arg}'"));
            } else if options.file.is_none() {
                options.file = Some(arg.clone());
            } else {
                return Err(format!("unexpected argument '{arg}'"));
            }
        }
        Ok(options)
    }

    /// `.tss` files are scripts, everything else is a template.
    pub fn mode_for(&self, path: &Path) -> Mode {
        self.mode.unwrap_or_else(|| {
            if path.extension().is_some_and(|ext| ext == "tss") {
                Mode::Script
            } else {
                Mode::Template
            }
        })
    }
}
