//! Options for `nuget restore`.

use indexmap::IndexSet;

use crate::quote::quote_if_needed;

/// Options for restoring the packages of a solution or `packages.config`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreOptions {
    targets: Vec<String>,
    require_consent: bool,
    packages_directory: Option<String>,
    solution_directory: Option<String>,
    sources: IndexSet<String>,
    no_cache: bool,
    disable_parallel_processing: bool,
}

impl RestoreOptions {
    /// Create an empty set of restore options. With no targets NuGet looks
    /// for a solution in the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append solution or `packages.config` files to restore.
    pub fn files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets.extend(files.into_iter().map(Into::into));
        self
    }

    /// Require package restore consent (`-RequireConsent`).
    pub fn require_consent(mut self, enabled: bool) -> Self {
        self.require_consent = enabled;
        self
    }

    /// Directory packages are installed into (`-PackagesDirectory`).
    pub fn packages_directory(mut self, dir: &str) -> Self {
        self.packages_directory = Some(dir.to_owned());
        self
    }

    /// Solution directory (`-SolutionDirectory`).
    pub fn solution_directory(mut self, dir: &str) -> Self {
        self.solution_directory = Some(dir.to_owned());
        self
    }

    /// Add package sources; duplicates are ignored.
    pub fn sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    /// Bypass the machine cache (`-NoCache`).
    pub fn no_cache(mut self, enabled: bool) -> Self {
        self.no_cache = enabled;
        self
    }

    /// Restore packages one at a time (`-DisableParallelProcessing`).
    pub fn disable_parallel_processing(mut self, enabled: bool) -> Self {
        self.disable_parallel_processing = enabled;
        self
    }

    /// The files to restore, in the order they were added.
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Restore-specific tokens, after the common ones.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.require_consent {
            args.push("-RequireConsent".to_owned());
        }
        if let Some(dir) = &self.packages_directory {
            args.push(format!("-PackagesDirectory {}", quote_if_needed(dir)));
        }
        if let Some(dir) = &self.solution_directory {
            args.push(format!("-SolutionDirectory {}", quote_if_needed(dir)));
        }
        for source in &self.sources {
            args.push(format!("-Source {}", quote_if_needed(source)));
        }
        if self.no_cache {
            args.push("-NoCache".to_owned());
        }
        if self.disable_parallel_processing {
            args.push("-DisableParallelProcessing".to_owned());
        }

        args
    }
}
