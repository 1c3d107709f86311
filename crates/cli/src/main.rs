use anyhow::{bail, Context, Result};
use batch_renamer_core::{
    app_paths, load_config, load_rules, rename_directory, save_config, AppConfig, FileFilter,
    InsertOp, RemoveRange, RenameConfig, RenameReport, RenameRules, ReplaceOp,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "batch-renamer-cli")]
#[command(about = "Batch rename files in a directory with replace, remove and insert rules")]
struct Cli {
    /// Print diagnostic logs to stderr
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Rename(RenameArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    /// Write a default config file if none exists
    Init,
}

#[derive(Debug, Args)]
struct RenameArgs {
    directory: PathBuf,
    /// Replace OLD with NEW in every name (repeatable, applied in order)
    #[arg(long, num_args = 2, value_names = ["OLD", "NEW"], allow_hyphen_values = true)]
    replace: Vec<String>,
    /// Remove the chars between START and END; negative values count from the end
    #[arg(long, num_args = 2, value_names = ["START", "END"], allow_negative_numbers = true)]
    remove: Vec<i64>,
    /// Insert TEXT at POS; negative positions count from the end
    #[arg(long, num_args = 2, value_names = ["POS", "TEXT"], allow_hyphen_values = true)]
    insert: Vec<String>,
    /// TOML file with replace/remove/insert rules, applied before the flag rules
    #[arg(long)]
    rules: Option<PathBuf>,
    #[arg(long, overrides_with = "no_replace_first")]
    replace_first: bool,
    #[arg(long, overrides_with = "replace_first", hide = true)]
    no_replace_first: bool,
    /// Only rename files whose name ends with this suffix
    #[arg(long)]
    extension: Option<String>,
    #[arg(long, overrides_with = "no_include_extension")]
    include_extension: bool,
    #[arg(long, overrides_with = "include_extension", hide = true)]
    no_include_extension: bool,
    #[arg(long, overrides_with = "no_overwrite")]
    overwrite: bool,
    #[arg(long, overrides_with = "overwrite", hide = true)]
    no_overwrite: bool,
    #[arg(long, overrides_with = "no_recursive")]
    recursive: bool,
    #[arg(long, overrides_with = "recursive", hide = true)]
    no_recursive: bool,
    #[arg(long, overrides_with = "no_show_output")]
    show_output: bool,
    #[arg(long, overrides_with = "show_output", hide = true)]
    no_show_output: bool,
    #[arg(long, overrides_with = "no_log")]
    log: bool,
    #[arg(long, overrides_with = "log", hide = true)]
    no_log: bool,
    #[arg(long)]
    log_path: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Only rename files whose name contains TEXT (repeatable)
    #[arg(long, value_name = "TEXT")]
    contains: Vec<String>,
    /// Skip files whose name contains TEXT (repeatable)
    #[arg(long, value_name = "TEXT")]
    exclude: Vec<String>,
    /// Only rename files whose name matches REGEX
    #[arg(long, value_name = "REGEX")]
    matches: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Rename(args) => cmd_rename(args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Init => cmd_config_init(),
        },
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_rename(args: RenameArgs) -> Result<()> {
    let defaults = load_config()?;
    let config = build_config(&args, &defaults)?;

    if config.rules.is_empty() {
        eprintln!("no replace/remove/insert rules given: names will stay unchanged");
    }

    let report = rename_directory(&args.directory, &config)?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            print_table(&report);
        }
    }

    if config.dry_run {
        eprintln!("dry run: no files were changed");
    }

    Ok(())
}

fn build_config(args: &RenameArgs, defaults: &AppConfig) -> Result<RenameConfig> {
    let mut rules = match &args.rules {
        Some(path) => load_rules(path)?,
        None => RenameRules::default(),
    };
    rules.replace.extend(parse_replace(&args.replace)?);
    rules.remove.extend(parse_remove(&args.remove)?);
    rules.insert.extend(parse_insert(&args.insert)?);
    rules.replace_first = switch(
        args.replace_first,
        args.no_replace_first,
        rules.replace_first || defaults.replace_first,
    );
    rules.include_extension = switch(
        args.include_extension,
        args.no_include_extension,
        rules.include_extension || defaults.include_extension,
    );

    Ok(RenameConfig {
        rules,
        extension: args
            .extension
            .clone()
            .unwrap_or_else(|| defaults.extension.clone()),
        overwrite: switch(args.overwrite, args.no_overwrite, defaults.overwrite),
        recurse_subdirs: switch(args.recursive, args.no_recursive, defaults.recursive),
        show_output: switch(args.show_output, args.no_show_output, defaults.show_output),
        log: switch(args.log, args.no_log, defaults.log),
        log_path: args
            .log_path
            .clone()
            .unwrap_or_else(|| defaults.log_path.clone()),
        dry_run: args.dry_run,
        filter: build_filter(&args.contains, &args.exclude, args.matches.as_deref())?,
    })
}

/// `--flag` / `--no-flag` pairs: whichever was given last wins, otherwise the default.
fn switch(on: bool, off: bool, default: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        default
    }
}

fn parse_replace(values: &[String]) -> Result<Vec<ReplaceOp>> {
    Ok(pairs(values, "--replace")?
        .map(|(old, new)| ReplaceOp::new(old.as_str(), new.as_str()))
        .collect())
}

fn parse_remove(values: &[i64]) -> Result<Vec<RemoveRange>> {
    Ok(pairs(values, "--remove")?
        .map(|(start, end)| RemoveRange::new(*start, *end))
        .collect())
}

fn parse_insert(values: &[String]) -> Result<Vec<InsertOp>> {
    pairs(values, "--insert")?
        .map(|(position, text)| {
            let position = position
                .parse::<i64>()
                .with_context(|| format!("--insert position is not an integer: {position}"))?;
            Ok(InsertOp::new(position, text.as_str()))
        })
        .collect()
}

fn pairs<'a, T>(
    values: &'a [T],
    flag: &str,
) -> Result<impl Iterator<Item = (&'a T, &'a T)> + 'a> {
    if values.len() % 2 != 0 {
        bail!("{flag} expects two values per use");
    }
    Ok(values.chunks_exact(2).map(|pair| (&pair[0], &pair[1])))
}

fn build_filter(
    contains: &[String],
    exclude: &[String],
    matches: Option<&str>,
) -> Result<FileFilter> {
    let mut filter = FileFilter::accept_all();
    for needle in contains {
        filter = filter.and(FileFilter::contains(needle.as_str()));
    }
    for needle in exclude {
        filter = filter.and(FileFilter::not_contains(needle.as_str()));
    }
    if let Some(pattern) = matches {
        filter = filter.and(FileFilter::regex(pattern)?);
    }
    Ok(filter)
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("config file: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let paths = app_paths()?;
    if paths.config_path.exists() {
        println!("config file already exists: {}", paths.config_path.display());
        return Ok(());
    }
    save_config(&AppConfig::default())?;
    println!("wrote default config: {}", paths.config_path.display());
    Ok(())
}

fn print_table(report: &RenameReport) {
    for message in report.messages() {
        println!("{message}");
    }

    eprintln!(
        "renamed={} processed={} applied={} unchanged={} conflicts={}",
        report.renamed, report.processed, report.applied, report.unchanged, report.conflicts
    );
}
