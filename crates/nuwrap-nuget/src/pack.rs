//! Options for `nuget pack`.

use indexmap::{IndexMap, IndexSet};

use crate::quote::{quote, quote_if_needed};

/// Options for creating a package from `.nuspec` or project files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackOptions {
    files: Vec<String>,
    output_directory: Option<String>,
    base_path: Option<String>,
    version: Option<String>,
    exclusions: IndexSet<String>,
    symbols: bool,
    tool: bool,
    build: bool,
    no_default_excludes: bool,
    no_package_analysis: bool,
    exclude_empty_directories: bool,
    include_referenced_projects: bool,
    properties: IndexMap<String, String>,
    min_client_version: Option<String>,
}

impl PackOptions {
    /// Create an empty set of pack options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `.nuspec` or project files to pack.
    pub fn files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files.extend(files.into_iter().map(Into::into));
        self
    }

    /// Directory the package is written to (`-OutputDirectory`).
    pub fn output_directory(mut self, dir: &str) -> Self {
        self.output_directory = Some(dir.to_owned());
        self
    }

    /// Base path of the files listed in the nuspec (`-BasePath`).
    pub fn base_path(mut self, path: &str) -> Self {
        self.base_path = Some(path.to_owned());
        self
    }

    /// Override the package version (`-Version`).
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_owned());
        self
    }

    /// Add exclusion patterns; duplicates are ignored.
    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Also create a symbols package (`-Symbols`).
    pub fn symbols(mut self, enabled: bool) -> Self {
        self.symbols = enabled;
        self
    }

    /// Place the output files in the tools folder (`-Tool`).
    pub fn tool(mut self, enabled: bool) -> Self {
        self.tool = enabled;
        self
    }

    /// Build the project before packing (`-Build`).
    pub fn build(mut self, enabled: bool) -> Self {
        self.build = enabled;
        self
    }

    /// Do not apply NuGet's default exclusions (`-NoDefaultExcludes`).
    pub fn no_default_excludes(mut self, enabled: bool) -> Self {
        self.no_default_excludes = enabled;
        self
    }

    /// Skip package analysis (`-NoPackageAnalysis`).
    pub fn no_package_analysis(mut self, enabled: bool) -> Self {
        self.no_package_analysis = enabled;
        self
    }

    /// Leave empty directories out of the package (`-ExcludeEmptyDirectories`).
    pub fn exclude_empty_directories(mut self, enabled: bool) -> Self {
        self.exclude_empty_directories = enabled;
        self
    }

    /// Pack referenced projects too (`-IncludeReferencedProjects`).
    pub fn include_referenced_projects(mut self, enabled: bool) -> Self {
        self.include_referenced_projects = enabled;
        self
    }

    /// Set a project property. Keys compare case-insensitively; setting an
    /// existing key replaces its value in place and keeps the first spelling.
    pub fn property(mut self, key: &str, value: &str) -> Self {
        self.set_property(key, value);
        self
    }

    /// Set several properties, in iteration order.
    pub fn properties<'a, I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in pairs {
            self.set_property(key, value);
        }
        self
    }

    /// Minimum NuGet client version required to install the package
    /// (`-MinClientVersion`).
    pub fn min_client_version(mut self, version: &str) -> Self {
        self.min_client_version = Some(version.to_owned());
        self
    }

    /// The files to pack, in the order they were added.
    pub fn targets(&self) -> &[String] {
        &self.files
    }

    fn set_property(&mut self, key: &str, value: &str) {
        let existing = self
            .properties
            .keys()
            .find(|k| k.eq_ignore_ascii_case(key))
            .cloned();
        match existing {
            Some(k) => {
                self.properties.insert(k, value.to_owned());
            }
            None => {
                self.properties.insert(key.to_owned(), value.to_owned());
            }
        }
    }

    /// Pack-specific tokens, after the common ones.
    ///
    /// Property keys and values are joined as `k=v;k=v` without escaping, so
    /// a `;` or `=` inside either one corrupts the list.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(dir) = &self.output_directory {
            args.push(format!("-OutputDirectory {}", quote_if_needed(dir)));
        }
        if let Some(path) = &self.base_path {
            args.push(format!("-BasePath {}", quote_if_needed(path)));
        }
        if let Some(version) = &self.version {
            args.push(format!("-Version {}", quote_if_needed(version)));
        }

        for exclusion in &self.exclusions {
            args.push(format!("-Exclude {}", quote_if_needed(exclusion)));
        }

        let flags = [
            (self.symbols, "-Symbols"),
            (self.tool, "-Tool"),
            (self.build, "-Build"),
            (self.no_default_excludes, "-NoDefaultExcludes"),
            (self.no_package_analysis, "-NoPackageAnalysis"),
            (self.exclude_empty_directories, "-ExcludeEmptyDirectories"),
            (self.include_referenced_projects, "-IncludeReferencedProjects"),
        ];
        args.extend(
            flags
                .into_iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, flag)| flag.to_owned()),
        );

        if !self.properties.is_empty() {
            let joined = self
                .properties
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(";");
            args.push(format!("-Properties {}", quote(&joined)));
        }

        if let Some(version) = &self.min_client_version {
            args.push(format!("-MinClientVersion {}", quote_if_needed(version)));
        }

        args
    }
}
