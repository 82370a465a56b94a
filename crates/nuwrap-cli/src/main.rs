#![forbid(unsafe_code)]

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use nuwrap_config::Config;
use nuwrap_nuget::{
    CommonOptions, Invocation, NuGetCommand, NuGetError, NuGetInfo, NuGetLocator, Operation,
    PackOptions, PushOptions, RestoreOptions,
};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(name = "nuwrap", about = "Locate NuGet.exe and run it with well-formed arguments")]
#[command(version)]
struct Cli {
    /// Log search and invocation details
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the path of the NuGet.exe that would be used
    Locate {
        /// Also print the SHA-256 of the executable
        #[arg(long)]
        fingerprint: bool,
    },
    /// Create a package from .nuspec or project files
    Pack {
        /// .nuspec or project files to pack
        files: Vec<String>,
        /// Directory the package is written to
        #[arg(long)]
        output_directory: Option<String>,
        /// Base path of the files listed in the nuspec
        #[arg(long)]
        base_path: Option<String>,
        /// Override the package version
        #[arg(long = "package-version")]
        package_version: Option<String>,
        /// Exclusion pattern (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
        /// Also create a symbols package
        #[arg(long)]
        symbols: bool,
        /// Place output files in the tools folder
        #[arg(long)]
        tool: bool,
        /// Build the project before packing
        #[arg(long)]
        build: bool,
        /// Do not apply NuGet's default exclusions
        #[arg(long)]
        no_default_excludes: bool,
        /// Skip package analysis
        #[arg(long)]
        no_package_analysis: bool,
        /// Leave empty directories out of the package
        #[arg(long)]
        exclude_empty_directories: bool,
        /// Pack referenced projects too
        #[arg(long)]
        include_referenced_projects: bool,
        /// Project property as KEY=VALUE (repeatable)
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
        /// Minimum NuGet client version required by the package
        #[arg(long)]
        min_client_version: Option<String>,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Publish a package to a feed
    Push {
        /// The .nupkg to push
        package: String,
        /// Feed URL or directory
        #[arg(long)]
        source: Option<String>,
        /// API key for the feed
        #[arg(long)]
        api_key: Option<String>,
        /// Upload timeout in seconds
        #[arg(long)]
        timeout: Option<u32>,
        /// Stream the upload instead of buffering it
        #[arg(long)]
        disable_buffering: bool,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Restore the packages of a solution or packages.config
    Restore {
        /// Solution or packages.config files
        files: Vec<String>,
        /// Require package restore consent
        #[arg(long)]
        require_consent: bool,
        /// Directory packages are installed into
        #[arg(long)]
        packages_directory: Option<String>,
        /// Solution directory
        #[arg(long)]
        solution_directory: Option<String>,
        /// Package source (repeatable)
        #[arg(long)]
        source: Vec<String>,
        /// Bypass the machine cache
        #[arg(long)]
        no_cache: bool,
        /// Restore packages one at a time
        #[arg(long)]
        disable_parallel_processing: bool,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Check configuration and NuGet.exe discovery
    Doctor,
}

/// Options shared by every NuGet verb.
#[derive(Debug, Args)]
struct RunArgs {
    /// NuGet output verbosity (quiet, normal, detailed)
    #[arg(long)]
    verbosity: Option<String>,
    /// NuGet configuration file
    #[arg(long)]
    config_file: Option<String>,
    /// Directory to run NuGet.exe in; also where nuwrap.toml is read from
    /// and the first place searched for NuGet.exe
    #[arg(long)]
    working_dir: Option<PathBuf>,
    /// Print the command line instead of running it
    #[arg(long)]
    dry_run: bool,
    /// Print the argument tokens as JSON instead of running
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Locate { fingerprint } => cmd_locate(fingerprint),
        Command::Pack {
            files,
            output_directory,
            base_path,
            package_version,
            exclude,
            symbols,
            tool,
            build,
            no_default_excludes,
            no_package_analysis,
            exclude_empty_directories,
            include_referenced_projects,
            properties,
            min_client_version,
            run,
        } => {
            let mut opts = PackOptions::new()
                .files(files)
                .exclude(exclude)
                .symbols(symbols)
                .tool(tool)
                .build(build)
                .no_default_excludes(no_default_excludes)
                .no_package_analysis(no_package_analysis)
                .exclude_empty_directories(exclude_empty_directories)
                .include_referenced_projects(include_referenced_projects)
                .properties(properties.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            if let Some(dir) = &output_directory {
                opts = opts.output_directory(dir);
            }
            if let Some(path) = &base_path {
                opts = opts.base_path(path);
            }
            if let Some(version) = &package_version {
                opts = opts.version(version);
            }
            if let Some(version) = &min_client_version {
                opts = opts.min_client_version(version);
            }
            cmd_operation(Operation::Pack(opts), &run)
        }
        Command::Push {
            package,
            source,
            api_key,
            timeout,
            disable_buffering,
            run,
        } => {
            let mut opts = PushOptions::new(&package).disable_buffering(disable_buffering);
            if let Some(source) = &source {
                opts = opts.source(source);
            }
            if let Some(key) = &api_key {
                opts = opts.api_key(key);
            }
            if let Some(secs) = timeout {
                opts = opts.timeout_secs(secs);
            }
            cmd_operation(Operation::Push(opts), &run)
        }
        Command::Restore {
            files,
            require_consent,
            packages_directory,
            solution_directory,
            source,
            no_cache,
            disable_parallel_processing,
            run,
        } => {
            let mut opts = RestoreOptions::new()
                .files(files)
                .require_consent(require_consent)
                .sources(source)
                .no_cache(no_cache)
                .disable_parallel_processing(disable_parallel_processing);
            if let Some(dir) = &packages_directory {
                opts = opts.packages_directory(dir);
            }
            if let Some(dir) = &solution_directory {
                opts = opts.solution_directory(dir);
            }
            cmd_operation(Operation::Restore(opts), &run)
        }
        Command::Doctor => cmd_doctor(),
    };

    if let Err(msg) = result {
        eprintln!("error: {msg}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

/// Load `nuwrap.toml` from `dir` (the current directory if `None`), or
/// defaults if absent.
fn load_config(dir: Option<&Path>) -> Result<Config, Box<dyn Error>> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    Ok(Config::discover(&dir)?.unwrap_or_default())
}

/// Resolve NuGet.exe: an explicit `nuget.path` wins, otherwise search the
/// configured roots, then `working_dir`, then the default start directories.
fn resolve_nuget(config: &Config, working_dir: Option<&Path>) -> Result<PathBuf, NuGetError> {
    if let Some(path) = &config.nuget.path {
        if !path.is_file() {
            return Err(NuGetError::MissingExecutable { path: path.clone() });
        }
        return Ok(path.clone());
    }

    let mut dirs = config.nuget.search_roots.clone();
    let defaults = nuwrap_nuget::locate::default_start_dirs();
    for dir in working_dir.map(Path::to_path_buf).into_iter().chain(defaults) {
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    let locator = NuGetLocator::with_start_dirs(dirs);
    let path = locator.require()?.to_path_buf();
    Ok(path)
}

fn common_options(run: &RunArgs, config: &Config) -> CommonOptions {
    let mut common = CommonOptions::new();
    if let Some(verbosity) = run.verbosity.as_ref().or(config.nuget.verbosity.as_ref()) {
        common = common.verbosity(verbosity);
    }
    let config_file = run
        .config_file
        .clone()
        .or_else(|| config.nuget.config_file.as_ref().map(|p| p.display().to_string()));
    if let Some(file) = &config_file {
        common = common.config_file(file);
    }
    common
}

fn cmd_locate(fingerprint: bool) -> CliResult {
    let config = load_config(None)?;
    let path = resolve_nuget(&config, None)?;
    if fingerprint {
        let info = NuGetInfo::from_path(&path)?;
        println!("{}  {}", info.fingerprint, info.path.display());
    } else {
        println!("{}", path.display());
    }
    Ok(())
}

fn cmd_operation(operation: Operation, run: &RunArgs) -> CliResult {
    let working_dir = run
        .working_dir
        .as_deref()
        .map(nuwrap_util::fs::absolute)
        .transpose()?;
    let config = load_config(working_dir.as_deref())?;
    let command = NuGetCommand::new(operation).with_common(common_options(run, &config));

    if run.json {
        println!("{}", serde_json::to_string(&command.args())?);
        return Ok(());
    }
    if run.dry_run {
        println!("{}", command.command_line());
        return Ok(());
    }

    let exe = resolve_nuget(&config, working_dir.as_deref())?;
    let mut invocation = Invocation::new(&exe);
    if let Some(launcher) = &config.nuget.launcher {
        invocation = invocation.launcher(launcher);
    }
    if let Some(dir) = &working_dir {
        invocation = invocation.working_dir(dir);
    }

    let verb = command.operation.name();
    eprintln!("     Running `{} {}`", exe.display(), command.command_line());
    let result = command.execute(&invocation)?;
    print!("{}", result.stdout);
    eprint!("{}", result.stderr);

    if result.success {
        eprintln!("    {}", result.summary(verb));
        Ok(())
    } else {
        Err(result.summary(verb).into())
    }
}

fn cmd_doctor() -> CliResult {
    eprintln!("Checking environment...");
    eprintln!();

    let mut issues = 0u32;

    let cwd = std::env::current_dir()?;
    let config = match Config::discover(&cwd) {
        Ok(Some(config)) => {
            eprintln!("  [ok] Config: {}", cwd.join(nuwrap_config::CONFIG_FILE_NAME).display());
            config
        }
        Ok(None) => {
            eprintln!("  [--] No nuwrap.toml in current directory");
            Config::default()
        }
        Err(e) => {
            eprintln!("  [!!] Config: {e}");
            issues = issues.saturating_add(1);
            Config::default()
        }
    };

    match nuwrap_nuget::locate_self_path() {
        Some(path) => eprintln!("  [ok] nuwrap: {}", path.display()),
        None => eprintln!("  [--] nuwrap: cannot determine own location, searching from the working directory only"),
    }

    match resolve_nuget(&config, None).and_then(|p| NuGetInfo::from_path(&p)) {
        Ok(info) => {
            eprintln!("  [ok] NuGet.exe: {}", info.path.display());
            eprintln!("  [ok] SHA-256: {}", info.fingerprint);
        }
        Err(e) => {
            eprintln!("  [!!] NuGet.exe: {e}");
            issues = issues.saturating_add(1);
        }
    }

    match &config.nuget.launcher {
        Some(launcher) => eprintln!("  [ok] Launcher: {}", launcher.display()),
        None if cfg!(windows) => eprintln!("  [ok] Launcher: none (running NuGet.exe directly)"),
        None => eprintln!("  [--] Launcher: none — set `nuget.launcher = \"mono\"` if NuGet.exe cannot run natively"),
    }

    eprintln!();
    if issues > 0 {
        eprintln!("{issues} issue(s) found");
        Err(format!("{issues} issue(s) found").into())
    } else {
        eprintln!("All checks passed");
        Ok(())
    }
}
