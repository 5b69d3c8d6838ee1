// ouimap CLI - builds the OUI prefix table and canonical-name map from the
// IEEE registry exports

mod exit_codes;
mod fetch;
mod pipeline;
mod report;
mod write;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use ouimap_config::{BuildConfig, ConfigError, TableValueSetting};
use ouimap_engine::{shorten, EngineError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "ouimap")]
#[command(about = "Build a MAC prefix to manufacturer table from the IEEE registries")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Only log warnings and errors (RUST_LOG overrides)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every registry, merge, and write both output files
    #[command(after_help = "\
Output files are replaced only when every registry was fetched and the \
entry floors held.

Examples:
  ouimap build
  ouimap build --rules oui-translate.csv --out-dir dist
  ouimap build --config ouimap.toml --table-value canonical
  ouimap build --base-url http://mirror.local/ieee -q")]
    Build {
        /// Config file (default: <config dir>/ouimap/config.toml if present)
        #[arg(long, short = 'c', env = "OUIMAP_CONFIG")]
        config: Option<PathBuf>,

        /// Override rule file (pattern,canonical_name,display_name)
        #[arg(long, short = 'r')]
        rules: Option<PathBuf>,

        /// Directory for the prefix table and canonical map
        #[arg(long, short = 'o')]
        out_dir: Option<PathBuf>,

        /// Registry server (paths from the config are appended)
        #[arg(long)]
        base_url: Option<String>,

        /// Which rule name the prefix table carries
        #[arg(long, value_enum)]
        table_value: Option<TableValueArg>,
    },

    /// Print the normalized form of manufacturer names
    #[command(after_help = "\
Examples:
  ouimap shorten 'ACME Corporation' '3COM EUROPE LTD'
  ouimap shorten 'Cisco Systems, Inc' --rules oui-translate.csv")]
    Shorten {
        /// Organization names as published in the registries
        #[arg(required = true)]
        names: Vec<String>,

        /// Also show the rule each normalized name matches
        #[arg(long, short = 'r')]
        rules: Option<PathBuf>,
    },

    /// Load a rule file and report problems
    #[command(after_help = "\
Examples:
  ouimap check-rules oui-translate.csv")]
    CheckRules {
        /// Rule file to validate
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TableValueArg {
    Display,
    Canonical,
}

impl From<TableValueArg> for TableValueSetting {
    fn from(arg: TableValueArg) -> Self {
        match arg {
            TableValueArg::Display => TableValueSetting::Display,
            TableValueArg::Canonical => TableValueSetting::Canonical,
        }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  ouimap-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  ouimap-engine ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let result = match cli.command {
        None => {
            eprintln!("Usage: ouimap <command> [options]");
            Err(CliError::args("no command given")
                .with_hint("run `ouimap build` to regenerate the tables, or `ouimap --help`"))
        }
        Some(Commands::Build {
            config,
            rules,
            out_dir,
            base_url,
            table_value,
        }) => cmd_build(config, rules, out_dir, base_url, table_value),
        Some(Commands::Shorten { names, rules }) => cmd_shorten(names, rules),
        Some(Commands::CheckRules { file }) => cmd_check_rules(file),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn fatal(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::Io { .. } => "check the --config path",
            ConfigError::Parse(_) | ConfigError::Validation(_) => {
                "see `ouimap build --help` for the config layout"
            }
        };
        Self::fatal(err.to_string()).with_hint(hint)
    }

    pub fn engine(err: EngineError) -> Self {
        let hint = match &err {
            EngineError::TooFewEntries { .. } | EngineError::TooFewTotal { .. } => {
                Some("the registry export looks truncated; previous outputs were left in place")
            }
            EngineError::ShortenedToNothing { .. } => {
                Some("the name consists only of punctuation; report it upstream")
            }
            EngineError::RuleParse { .. } | EngineError::InvalidPattern { .. } => {
                Some("run `ouimap check-rules <FILE>` to validate the rule file")
            }
            _ => None,
        };
        let mut cli_err = Self::fatal(err.to_string());
        cli_err.hint = hint.map(str::to_string);
        cli_err
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn cmd_build(
    config: Option<PathBuf>,
    rules: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    base_url: Option<String>,
    table_value: Option<TableValueArg>,
) -> Result<(), CliError> {
    let mut build = BuildConfig::resolve(config.as_deref()).map_err(CliError::config)?;

    if let Some(rules) = rules {
        build.rules = rules;
    }
    if let Some(dir) = out_dir {
        build.output.dir = dir;
    }
    if let Some(url) = base_url {
        build.base_url = url;
    }
    if let Some(value) = table_value {
        build.output.table_value = value.into();
    }
    build
        .validate()
        .map_err(|e| CliError::args(e.to_string()))?;

    let report = pipeline::run(&build)?;
    print!("{}", report);
    Ok(())
}

fn cmd_shorten(names: Vec<String>, rules: Option<PathBuf>) -> Result<(), CliError> {
    let rules = rules.as_deref().map(pipeline::load_rules).transpose()?;

    for name in &names {
        let short = shorten(name).map_err(CliError::engine)?;
        match &rules {
            None => println!("{}\t{}", name, short),
            Some(rules) => match rules.find_match(&short) {
                Some(rule) => println!(
                    "{}\t{}\t{}\t{}",
                    name, short, rule.canonical_name, rule.display_name
                ),
                None => println!("{}\t{}\t-\t-", name, short),
            },
        }
    }
    Ok(())
}

fn cmd_check_rules(file: PathBuf) -> Result<(), CliError> {
    let rules = pipeline::load_rules(&file)?;
    let canonical = rules.canonical_entries().len();
    println!(
        "{}: {} rules, {} canonical names",
        file.display(),
        rules.len(),
        canonical
    );
    Ok(())
}
