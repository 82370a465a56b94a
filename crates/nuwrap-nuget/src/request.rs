//! Options shared by every NuGet operation.

use crate::quote::quote_if_needed;

/// Options accepted by all NuGet commands.
///
/// `-NonInteractive` is always on: a build must never stall on a credential
/// or confirmation prompt, so there is no way to turn it off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonOptions {
    verbosity: Option<String>,
    non_interactive: bool,
    config_file: Option<String>,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            verbosity: None,
            non_interactive: true,
            config_file: None,
        }
    }
}

impl CommonOptions {
    /// Create options with only `-NonInteractive` set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output verbosity (`quiet`, `normal`, `detailed`).
    pub fn verbosity(mut self, verbosity: &str) -> Self {
        self.verbosity = Some(verbosity.to_owned());
        self
    }

    /// Set the NuGet configuration file to use.
    pub fn config_file(mut self, path: &str) -> Self {
        self.config_file = Some(path.to_owned());
        self
    }

    /// Whether `-NonInteractive` will be emitted.
    pub fn is_non_interactive(&self) -> bool {
        self.non_interactive
    }

    /// Tokens for the shared options, in fixed order: verbosity,
    /// non-interactive, config file. Blank values are skipped.
    pub fn base_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        // -Verbose also exists but is deprecated in favor of -Verbosity.
        if let Some(verbosity) = non_blank(self.verbosity.as_deref()) {
            args.push(format!("-Verbosity {verbosity}"));
        }

        if self.non_interactive {
            args.push("-NonInteractive".to_owned());
        }

        if let Some(config_file) = non_blank(self.config_file.as_deref()) {
            args.push(format!("-ConfigFile {}", quote_if_needed(config_file)));
        }

        args
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
