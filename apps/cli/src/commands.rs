//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use docsetgen_core::{DocsetAssembler, DocsetBuild, ProgressReporter, validate_docset};
use docsetgen_shared::{DocsetConfig, load_config_from, load_entries_from, write_starter_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// docsetgen: package HTML documentation as a docset.
#[derive(Parser)]
#[command(
    name = "docsetgen",
    version,
    about = "Package an HTML documentation tree into a Dash-compatible docset bundle.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build a docset bundle.
    Build(BuildArgs),

    /// Check that an existing bundle is well-formed.
    Validate {
        /// Path to the `.docset` folder.
        bundle: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags for `build`. Each flag overrides the config file value.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Docset config file (TOML, or JSON with a `.json` extension).
    #[arg(short, long, env = "DOCSETGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root of the HTML documentation tree.
    #[arg(short, long)]
    pub documentation: Option<PathBuf>,

    /// Folder in which the bundle is created (defaults to the documentation folder).
    #[arg(short = 'o', long)]
    pub destination: Option<PathBuf>,

    /// Display name of the docset.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Bundle identifier (defaults to the name).
    #[arg(long)]
    pub identifier: Option<String>,

    /// Default page, relative to the documentation root.
    #[arg(long)]
    pub index: Option<String>,

    /// Allow JavaScript inside the docset.
    #[arg(long, overrides_with = "no_enable_javascript")]
    pub enable_javascript: bool,

    /// Disable JavaScript even if the config file enables it.
    #[arg(long, overrides_with = "enable_javascript")]
    pub no_enable_javascript: bool,

    /// Platform family keyword (defaults to the name).
    #[arg(long)]
    pub platform_family: Option<String>,

    /// PNG icon copied into the bundle.
    #[arg(long)]
    pub icon: Option<PathBuf>,

    /// JSON file with an array of `{name, type, path}` search entries.
    /// Replaces entries from the config file.
    #[arg(short, long)]
    pub entries: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a starter docset.toml.
    Init {
        /// Where to write the file (defaults to ./docset.toml).
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docsetgen=info",
        1 => "docsetgen=debug",
        _ => "docsetgen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build(args) => cmd_build(args, cli.verbose > 0).await,
        Command::Validate { bundle } => cmd_validate(bundle).await,
        Command::Config { action } => match action {
            ConfigAction::Init { path } => cmd_config_init(path),
        },
    }
}

async fn cmd_build(args: BuildArgs, verbose: bool) -> Result<()> {
    let config = resolve_build_config(args, verbose)?;

    info!(
        documentation = %config.documentation.display(),
        name = %config.name,
        entries = config.entries.len(),
        "building docset"
    );

    let assembler = DocsetAssembler::new(config)?;
    let reporter = CliProgress::new();
    let build = assembler.create(&reporter).await?;

    println!();
    println!("  Docset created successfully!");
    println!("  Path:    {}", build.bundle_path.display());
    println!("  Files:   {}", build.files_copied);
    println!("  Entries: {}", build.entry_count);
    println!("  Icon:    {}", if build.icon_copied { "yes" } else { "no" });
    println!("  Time:    {:.1}s", build.elapsed.as_secs_f64());
    println!();

    Ok(())
}

/// Merge the config file (if any) with CLI flags.
fn resolve_build_config(args: BuildArgs, verbose: bool) -> Result<DocsetConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_from(path)?,
        None => {
            let documentation = args
                .documentation
                .clone()
                .ok_or_else(|| eyre!("--documentation is required when no --config is given"))?;
            let name = args
                .name
                .clone()
                .ok_or_else(|| eyre!("--name is required when no --config is given"))?;
            DocsetConfig::new(documentation, name)
        }
    };

    if let Some(documentation) = args.documentation {
        config.documentation = documentation;
    }
    if let Some(name) = args.name {
        config.name = name;
    }
    if args.destination.is_some() {
        config.destination = args.destination;
    }
    if args.identifier.is_some() {
        config.identifier = args.identifier;
    }
    if let Some(index) = args.index {
        config.index = index;
    }
    // The two flags override each other, so at most one is set.
    if args.enable_javascript {
        config.enable_javascript = true;
    } else if args.no_enable_javascript {
        config.enable_javascript = false;
    }
    if args.platform_family.is_some() {
        config.platform_family = args.platform_family;
    }
    if args.icon.is_some() {
        config.icon = args.icon;
    }
    if let Some(entries) = &args.entries {
        config.entries = load_entries_from(entries)?;
    }
    config.verbose |= verbose;

    Ok(config)
}

async fn cmd_validate(bundle: PathBuf) -> Result<()> {
    info!(bundle = %bundle.display(), "validating docset");
    let count = validate_docset(&bundle).await?;

    println!("  {} is a valid docset ({count} search entries)", bundle.display());
    Ok(())
}

fn cmd_config_init(path: Option<PathBuf>) -> Result<()> {
    let path = write_starter_config(path.as_deref())?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _build: &DocsetBuild) {
        self.spinner.finish_and_clear();
    }
}

// A failed build never reaches `done`; clear the spinner before the error prints.
impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("valid arguments")
    }

    fn build_args(cli: Cli) -> BuildArgs {
        match cli.command {
            Command::Build(args) => args,
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn build_from_flags() {
        let cli = parse(&[
            "docsetgen",
            "build",
            "--documentation",
            "/docs/html",
            "--name",
            "MyLib",
            "-o",
            "/out",
            "--enable-javascript",
        ]);
        let config = resolve_build_config(build_args(cli), false).unwrap();

        assert_eq!(config.documentation, PathBuf::from("/docs/html"));
        assert_eq!(config.destination(), PathBuf::from("/out"));
        assert_eq!(config.identifier(), "MyLib");
        assert_eq!(config.index, "index.html");
        assert!(config.enable_javascript);
        assert!(!config.verbose);
    }

    #[test]
    fn build_requires_name_without_config() {
        let cli = parse(&["docsetgen", "build", "--documentation", "/docs/html"]);
        let err = resolve_build_config(build_args(cli), false).unwrap_err();
        assert!(err.to_string().contains("--name"));
    }

    #[test]
    fn verbose_flag_is_global() {
        let cli = parse(&["docsetgen", "-vv", "validate", "/out/MyLib.docset"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Validate { .. }));
    }

    #[test]
    fn last_javascript_flag_wins() {
        let base = ["docsetgen", "build", "-d", "/docs/html", "-n", "MyLib"];

        let off = parse(&[&base[..], &["--enable-javascript", "--no-enable-javascript"][..]].concat());
        assert!(!resolve_build_config(build_args(off), false).unwrap().enable_javascript);

        let on = parse(&[&base[..], &["--no-enable-javascript", "--enable-javascript"][..]].concat());
        assert!(resolve_build_config(build_args(on), false).unwrap().enable_javascript);
    }

    #[test]
    fn flag_disables_javascript_from_config() {
        let dir = std::env::temp_dir().join(format!("docsetgen-cli-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("docset.toml");
        std::fs::write(
            &path,
            "documentation = \"html\"\nname = \"MyLib\"\nenable_javascript = true\n",
        )
        .unwrap();
        let config_arg = path.to_string_lossy().into_owned();

        let from_file = parse(&["docsetgen", "build", "-c", &config_arg]);
        assert!(resolve_build_config(build_args(from_file), false).unwrap().enable_javascript);

        let disabled = parse(&["docsetgen", "build", "-c", &config_arg, "--no-enable-javascript"]);
        assert!(!resolve_build_config(build_args(disabled), false).unwrap().enable_javascript);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn dropped_reporter_clears_spinner() {
        let reporter = CliProgress::new();
        let spinner = reporter.spinner.clone();
        reporter.phase("Copying documentation");
        assert!(!spinner.is_finished());

        drop(reporter);
        assert!(spinner.is_finished());
    }
}
