//! Discovery of an installed `NuGet.exe` under package-cache directories.
//!
//! Starting from one or more directories, the search climbs toward the
//! filesystem root. At every level it looks for sibling directories whose
//! name ends in `packages`, and inside each of those for a
//! `NuGet.CommandLine.*` version directory containing `tools/NuGet.exe`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use nuwrap_util::fs::{dir_name, ends_with_ignore_case, starts_with_ignore_case};

use crate::error::NuGetError;

/// Name suffix identifying a package-cache directory.
pub const PACKAGE_CACHE_SUFFIX: &str = "packages";

/// Name prefix of a NuGet command-line version directory.
pub const VERSION_DIR_PREFIX: &str = "NuGet.CommandLine.";

/// Location of the executable relative to a version directory.
pub const EXECUTABLE_RELATIVE_PATH: [&str; 2] = ["tools", "NuGet.exe"];

/// A resolved `NuGet.exe` together with its content fingerprint.
#[derive(Debug, Clone)]
pub struct NuGetInfo {
    /// Absolute path to `NuGet.exe`.
    pub path: PathBuf,
    /// SHA-256 hex digest of the binary.
    pub fingerprint: String,
}

impl NuGetInfo {
    /// Fingerprint the executable at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, NuGetError> {
        let fingerprint =
            nuwrap_util::hash::sha256_file(path).map_err(|source| NuGetError::Fingerprint {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            fingerprint,
        })
    }
}

/// Searches the filesystem for `NuGet.exe`.
///
/// The default lookup is computed on first use of [`NuGetLocator::nuget_path`]
/// and reused for the lifetime of the instance. Construct one locator and
/// share it rather than building a new one per request.
#[derive(Debug, Default)]
pub struct NuGetLocator {
    start_dirs: Option<Vec<PathBuf>>,
    resolved: OnceLock<Option<PathBuf>>,
    scans: AtomicUsize,
}

impl NuGetLocator {
    /// Create a locator that searches from [`default_start_dirs`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a locator that searches from the given directories, in order.
    pub fn with_start_dirs(dirs: Vec<PathBuf>) -> Self {
        Self {
            start_dirs: Some(dirs),
            ..Self::default()
        }
    }

    /// Path to `NuGet.exe`, searching on the first call only.
    pub fn nuget_path(&self) -> Option<&Path> {
        self.resolved
            .get_or_init(|| match &self.start_dirs {
                Some(dirs) => self.find_executable(dirs),
                None => self.find_executable(&default_start_dirs()),
            })
            .as_deref()
    }

    /// Like [`NuGetLocator::nuget_path`], but absence is an error.
    ///
    /// # Errors
    /// Returns [`NuGetError::NotFound`] if no executable was found.
    pub fn require(&self) -> Result<&Path, NuGetError> {
        self.nuget_path().ok_or(NuGetError::NotFound)
    }

    /// Number of directory listings performed by this locator so far.
    pub fn directory_scans(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    /// Search upward from each start directory in turn; first hit wins.
    pub fn find_executable(&self, start_dirs: &[PathBuf]) -> Option<PathBuf> {
        start_dirs.iter().find_map(|dir| self.find_from(dir))
    }

    /// Search `start` and each of its ancestors up to the filesystem root.
    pub fn find_from(&self, start: &Path) -> Option<PathBuf> {
        let start = match nuwrap_util::fs::absolute(start) {
            Ok(p) => p,
            Err(e) => {
                log::debug!("skipping start directory: {e}");
                return None;
            }
        };

        for level in start.ancestors() {
            log::debug!("searching {} for package caches", level.display());
            let found = self
                .subdirs(level)
                .into_iter()
                .filter(|d| dir_name(d).is_some_and(|n| ends_with_ignore_case(n, PACKAGE_CACHE_SUFFIX)))
                .find_map(|cache| self.find_in_package_cache(&cache));
            if let Some(exe) = found {
                log::info!("found NuGet.exe at {}", exe.display());
                return Some(exe);
            }
        }
        None
    }

    /// Look for `NuGet.CommandLine.*/tools/NuGet.exe` inside one package cache.
    ///
    /// Version directories are visited in filesystem enumeration order, so
    /// when several versions are installed which one wins is up to the OS.
    pub fn find_in_package_cache(&self, cache_dir: &Path) -> Option<PathBuf> {
        log::debug!("scanning package cache {}", cache_dir.display());
        self.subdirs(cache_dir)
            .into_iter()
            .filter(|d| dir_name(d).is_some_and(|n| starts_with_ignore_case(n, VERSION_DIR_PREFIX)))
            .map(|d| EXECUTABLE_RELATIVE_PATH.iter().fold(d, |p, seg| p.join(seg)))
            .find(|exe| exe.is_file())
    }

    fn subdirs(&self, dir: &Path) -> Vec<PathBuf> {
        self.scans.fetch_add(1, Ordering::Relaxed);
        match nuwrap_util::fs::list_dirs(dir) {
            Ok(dirs) => dirs,
            Err(e) => {
                log::debug!("{e}");
                Vec::new()
            }
        }
    }
}

/// Absolute path of the running binary.
///
/// Uses the OS-reported executable path when it resolves to a real file and
/// falls back to the path the process was launched with (`argv[0]`), made
/// absolute against the working directory.
pub fn locate_self_path() -> Option<PathBuf> {
    self_path_from(std::env::current_exe().ok(), std::env::args_os().next())
}

fn self_path_from(exe: Option<PathBuf>, launched: Option<OsString>) -> Option<PathBuf> {
    if let Some(p) = exe.and_then(|p| p.canonicalize().ok()) {
        return Some(p);
    }

    log::debug!("executable path unavailable, falling back to argv[0]");
    let abs = nuwrap_util::fs::absolute(Path::new(&launched?)).ok()?;
    abs.is_file().then_some(abs)
}

/// The directory containing the running binary, then the working directory
/// if it is a different one.
pub fn default_start_dirs() -> Vec<PathBuf> {
    let self_dir = locate_self_path().and_then(|p| p.parent().map(Path::to_path_buf));
    let cwd = std::env::current_dir().ok();
    start_dirs_from(self_dir, cwd)
}

fn start_dirs_from(self_dir: Option<PathBuf>, cwd: Option<PathBuf>) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = self_dir.into_iter().collect();
    if let Some(cwd) = cwd {
        if !dirs.contains(&cwd) {
            dirs.push(cwd);
        }
    }
    dirs
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;
    use std::path::Component;

    use super::*;

    fn install_nuget(cache: &Path, version_dir: &str) -> PathBuf {
        let tools = cache.join(version_dir).join("tools");
        fs::create_dir_all(&tools).unwrap();
        let exe = tools.join("NuGet.exe");
        fs::write(&exe, b"MZ").unwrap();
        exe
    }

    #[test]
    fn finds_cache_in_ancestor() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let exe = install_nuget(&root.join("packages"), "NuGet.CommandLine.2.8.3");
        let start = root.join("sub").join("sub2");
        fs::create_dir_all(&start).unwrap();

        let locator = NuGetLocator::new();
        assert_eq!(locator.find_executable(&[start]), Some(exe));
    }

    #[test]
    fn finds_cache_at_start_level() {
        let tmp = tempfile::tempdir().unwrap();
        let exe = install_nuget(&tmp.path().join("packages"), "NuGet.CommandLine.2.8.3");

        let locator = NuGetLocator::new();
        assert_eq!(locator.find_from(tmp.path()), Some(exe));
    }

    #[test]
    fn cache_name_only_needs_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        let exe = install_nuget(&tmp.path().join("build-packages"), "NuGet.CommandLine.3.4.4");

        let locator = NuGetLocator::new();
        assert_eq!(locator.find_from(tmp.path()), Some(exe));
    }

    #[test]
    fn nearest_level_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        install_nuget(&root.join("packages"), "NuGet.CommandLine.2.8.3");
        let inner = root.join("src");
        let near = install_nuget(&inner.join("packages"), "NuGet.CommandLine.2.8.6");

        let locator = NuGetLocator::new();
        assert_eq!(locator.find_from(&inner), Some(near));
    }

    #[test]
    fn start_dirs_searched_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        let first_exe = install_nuget(&first.join("packages"), "NuGet.CommandLine.2.8.3");
        install_nuget(&second.join("packages"), "NuGet.CommandLine.2.8.6");

        let locator = NuGetLocator::new();
        assert_eq!(locator.find_executable(&[first, second]), Some(first_exe));
    }

    #[test]
    fn version_dir_without_binary_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = tmp.path().join("packages");
        fs::create_dir_all(cache.join("NuGet.CommandLine.1.0.0").join("tools")).unwrap();

        let locator = NuGetLocator::new();
        assert_eq!(locator.find_in_package_cache(&cache), None);

        let exe = install_nuget(&cache, "NuGet.CommandLine.2.8.3");
        assert_eq!(locator.find_in_package_cache(&cache), Some(exe));
    }

    #[test]
    fn other_packages_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = tmp.path().join("packages");
        install_nuget(&cache, "NuGet.Core.2.8.3");

        let locator = NuGetLocator::new();
        assert_eq!(locator.find_in_package_cache(&cache), None);
    }

    #[test]
    fn directory_named_like_binary_is_not_a_match() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = tmp.path().join("packages");
        fs::create_dir_all(
            cache
                .join("NuGet.CommandLine.2.8.3")
                .join("tools")
                .join("NuGet.exe"),
        )
        .unwrap();

        let locator = NuGetLocator::new();
        assert_eq!(locator.find_in_package_cache(&cache), None);
    }

    #[test]
    fn missing_start_dir_does_not_fail() {
        let tmp = tempfile::tempdir().unwrap();
        let exe = install_nuget(&tmp.path().join("packages"), "NuGet.CommandLine.2.8.3");
        let ghost = tmp.path().join("not").join("created");

        let locator = NuGetLocator::new();
        assert_eq!(locator.find_from(&ghost), Some(exe));
    }

    #[test]
    fn nothing_installed_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("packages").join("Newtonsoft.Json.6.0.8")).unwrap();
        let start = tmp.path().join("a").join("b");
        fs::create_dir_all(&start).unwrap();

        let locator = NuGetLocator::with_start_dirs(vec![start]);
        assert_eq!(locator.nuget_path(), None);
        assert!(matches!(locator.require(), Err(NuGetError::NotFound)));
    }

    #[test]
    fn nuget_path_is_memoized() {
        let tmp = tempfile::tempdir().unwrap();
        let exe = install_nuget(&tmp.path().join("packages"), "NuGet.CommandLine.2.8.3");
        let locator = NuGetLocator::with_start_dirs(vec![tmp.path().join("sub")]);

        let first = locator.nuget_path().map(Path::to_path_buf);
        let scans = locator.directory_scans();
        assert!(scans > 0);

        let second = locator.nuget_path().map(Path::to_path_buf);
        assert_eq!(first, Some(exe));
        assert_eq!(first, second);
        assert_eq!(locator.directory_scans(), scans);
    }

    #[test]
    fn memoized_result_survives_removal() {
        let tmp = tempfile::tempdir().unwrap();
        let exe = install_nuget(&tmp.path().join("packages"), "NuGet.CommandLine.2.8.3");
        let locator = NuGetLocator::with_start_dirs(vec![tmp.path().to_path_buf()]);

        assert_eq!(locator.nuget_path(), Some(exe.as_path()));
        fs::remove_file(&exe).unwrap();
        assert_eq!(locator.nuget_path(), Some(exe.as_path()));
    }

    #[test]
    fn self_path_is_an_existing_file() {
        let path = locate_self_path().unwrap();
        assert!(path.is_absolute());
        assert!(path.is_file());
    }

    #[test]
    fn self_path_falls_back_to_launch_path() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = tmp.path().join("nuwrap");
        fs::write(&bin, b"").unwrap();

        let gone = tmp.path().join("deleted").join("nuwrap");
        assert_eq!(
            self_path_from(Some(gone), Some(bin.clone().into_os_string())),
            Some(bin)
        );
    }

    #[test]
    fn self_path_without_exe_uses_launch_path() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = tmp.path().join("nuwrap");
        fs::write(&bin, b"").unwrap();

        assert_eq!(
            self_path_from(None, Some(bin.clone().into_os_string())),
            Some(bin)
        );
    }

    #[test]
    fn self_path_relative_launch_path_is_made_absolute() {
        // Reach the test binary from the working directory via `..` hops.
        let exe = std::env::current_exe().unwrap().canonicalize().unwrap();
        let cwd = std::env::current_dir().unwrap();

        let mut relative = PathBuf::new();
        for c in cwd.components() {
            if matches!(c, Component::Normal(_)) {
                relative.push("..");
            }
        }
        for c in exe.components() {
            if matches!(c, Component::Normal(_)) {
                relative.push(c);
            }
        }
        assert!(relative.is_relative());

        let resolved = self_path_from(None, Some(relative.into_os_string())).unwrap();
        assert_eq!(resolved, exe);
    }

    #[test]
    fn self_path_missing_launch_path_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let ghost = tmp.path().join("nuwrap");

        assert_eq!(self_path_from(None, Some(ghost.into_os_string())), None);
        assert_eq!(self_path_from(Some(tmp.path().join("gone")), None), None);
    }

    #[test]
    fn walk_does_not_visit_lexical_siblings() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        install_nuget(&root.join("build").join("packages"), "NuGet.CommandLine.1.0.0");
        fs::create_dir_all(root.join("shared")).unwrap();

        let locator = NuGetLocator::new();
        let winding = root.join("build").join("..").join("shared");
        assert_eq!(locator.find_from(&winding), None);
    }

    #[test]
    fn walk_through_parent_component_reaches_real_ancestor() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let exe = install_nuget(&root.join("packages"), "NuGet.CommandLine.2.8.3");
        fs::create_dir_all(root.join("build")).unwrap();
        fs::create_dir_all(root.join("shared")).unwrap();

        let locator = NuGetLocator::new();
        let winding = root.join("build").join("..").join("shared");
        assert_eq!(locator.find_from(&winding), Some(exe));
    }

    #[test]
    fn start_dirs_skip_duplicate_cwd() {
        let dir = PathBuf::from("/work/tools");
        assert_eq!(
            start_dirs_from(Some(dir.clone()), Some(dir.clone())),
            vec![dir]
        );
    }

    #[test]
    fn start_dirs_keep_distinct_cwd_last() {
        let bin = PathBuf::from("/opt/nuwrap");
        let cwd = PathBuf::from("/work/repo");
        assert_eq!(
            start_dirs_from(Some(bin.clone()), Some(cwd.clone())),
            vec![bin, cwd]
        );
    }

    #[test]
    fn start_dirs_without_self_path() {
        let cwd = PathBuf::from("/work/repo");
        assert_eq!(start_dirs_from(None, Some(cwd.clone())), vec![cwd]);
    }

    #[test]
    fn info_fingerprints_binary() {
        let tmp = tempfile::tempdir().unwrap();
        let exe = install_nuget(&tmp.path().join("packages"), "NuGet.CommandLine.2.8.3");

        let info = NuGetInfo::from_path(&exe).unwrap();
        assert_eq!(info.path, exe);
        assert_eq!(info.fingerprint.len(), 64);
    }

    #[test]
    fn info_missing_binary_errors() {
        let err = NuGetInfo::from_path(Path::new("/nonexistent/NuGet.exe")).unwrap_err();
        assert!(err.to_string().contains("fingerprint"));
    }
}
