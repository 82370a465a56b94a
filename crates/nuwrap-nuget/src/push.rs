//! Options for `nuget push`.

use crate::quote::quote_if_needed;

/// Options for publishing a package to a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushOptions {
    package: String,
    source: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u32>,
    disable_buffering: bool,
}

impl PushOptions {
    /// Push the package at `package` (a `.nupkg` path).
    pub fn new(package: &str) -> Self {
        Self {
            package: package.to_owned(),
            ..Self::default()
        }
    }

    /// Feed URL or directory to push to (`-Source`).
    pub fn source(mut self, source: &str) -> Self {
        self.source = Some(source.to_owned());
        self
    }

    /// API key for the feed (`-ApiKey`).
    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_owned());
        self
    }

    /// Upload timeout in seconds (`-Timeout`).
    pub fn timeout_secs(mut self, secs: u32) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Stream the upload instead of buffering it (`-DisableBuffering`).
    pub fn disable_buffering(mut self, enabled: bool) -> Self {
        self.disable_buffering = enabled;
        self
    }

    /// The package being pushed.
    pub fn targets(&self) -> &[String] {
        std::slice::from_ref(&self.package)
    }

    /// Push-specific tokens, after the common ones.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(source) = &self.source {
            args.push(format!("-Source {}", quote_if_needed(source)));
        }
        if let Some(key) = &self.api_key {
            args.push(format!("-ApiKey {}", quote_if_needed(key)));
        }
        if let Some(secs) = self.timeout_secs {
            args.push(format!("-Timeout {secs}"));
        }
        if self.disable_buffering {
            args.push("-DisableBuffering".to_owned());
        }

        args
    }
}
