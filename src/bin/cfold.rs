//! Command-line interface for cfold
//!
//! Usage:
//!   cfold tokens `<path>`                          - Print the token list
//!   cfold parse `<path>` [--format `<format>`]       - Compile and print the tree
//!   cfold check `<paths...>`                       - Compile every file, print all errors sorted
//!
//! Global options: `--config <file>`, `--mode plain|extended|dialect`, `--dialect <file>`
//! (construct names for extended mode), `--verbose` (repeat for more).
//! The exit status is 1 when any error was reported.

use cfold::consumer::{hand_off, TagCensus};
use cfold::formats::FormatRegistry;
use cfold::{ConfigLoader, Diagnostics, DialectRegistry, FoldConfig, LexMode, SourceLoader, Tag};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{LevelFilter, Log, Metadata, Record};
use std::process;
use std::sync::Arc;

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() {
    let matches = Command::new("cfold")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compiler core for an extended C dialect")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("YAML configuration layered over the defaults"),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .short('m')
                .global(true)
                .value_parser(["plain", "extended", "dialect"])
                .help("Lexing mode (default: from configuration, then file extension)"),
        )
        .arg(
            Arg::new("dialect")
                .long("dialect")
                .short('d')
                .global(true)
                .help("Dialect file whose `construct` declarations are registered"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log pipeline progress to stderr"),
        )
        .subcommand(
            Command::new("tokens").about("Print the token list").arg(
                Arg::new("path")
                    .help("Source file")
                    .required(true)
                    .index(1),
            ),
        )
        .subcommand(
            Command::new("parse")
                .about("Compile a file and print its tree")
                .arg(
                    Arg::new("path")
                        .help("Source file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format: treeviz, json, yaml or source")
                        .default_value("treeviz"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Compile files and report every error, sorted by file then line")
                .arg(
                    Arg::new("paths")
                        .help("Source files")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                ),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    let settings = Settings::from_matches(&matches).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let failed = match matches.subcommand() {
        Some(("tokens", sub)) => handle_tokens_command(&settings, path_arg(sub)),
        Some(("parse", sub)) => {
            let format = sub
                .get_one::<String>("format")
                .map(String::as_str)
                .unwrap_or("treeviz");
            handle_parse_command(&settings, path_arg(sub), format)
        }
        Some(("check", sub)) => {
            let paths: Vec<&str> = sub
                .get_many::<String>("paths")
                .map(|values| values.map(String::as_str).collect())
                .unwrap_or_default();
            handle_check_command(&settings, &paths)
        }
        _ => unreachable!(),
    };
    if failed {
        process::exit(1);
    }
}

fn path_arg(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or_default()
}

/// Options shared by every subcommand.
struct Settings {
    config: Arc<FoldConfig>,
    mode: Option<LexMode>,
    registry: Arc<DialectRegistry>,
}

impl Settings {
    fn from_matches(matches: &ArgMatches) -> Result<Settings, Box<dyn std::error::Error>> {
        let loader = match matches.get_one::<String>("config") {
            Some(path) => ConfigLoader::new().with_file(path),
            None => ConfigLoader::new().with_optional_file("cfold.yaml"),
        };
        let config = Arc::new(loader.build()?);
        let mode = matches
            .get_one::<String>("mode")
            .and_then(|name| LexMode::parse(name));
        let registry = match matches.get_one::<String>("dialect") {
            Some(path) => load_dialect(path, &config)?,
            None => DialectRegistry::new(),
        };
        Ok(Settings {
            config,
            mode,
            registry: Arc::new(registry),
        })
    }

    fn loader(&self, path: &str) -> Result<SourceLoader, cfold::LoaderError> {
        let loader = SourceLoader::from_path(path)?
            .with_config(self.config.clone())
            .with_registry(self.registry.clone());
        Ok(match self.mode {
            Some(mode) => loader.with_mode(mode),
            None => loader,
        })
    }
}

fn load_dialect(
    path: &str,
    config: &Arc<FoldConfig>,
) -> Result<DialectRegistry, Box<dyn std::error::Error>> {
    let compilation = SourceLoader::from_path(path)?
        .with_config(config.clone())
        .with_mode(LexMode::Dialect)
        .compile()?;
    if compilation.has_errors() {
        return Err(format!(
            "dialect file has errors:\n{}",
            compilation.render_diagnostics().trim_end()
        )
        .into());
    }
    let registry = DialectRegistry::from_tree(&compilation.root);
    log::debug!("{} construct(s) registered from {}", registry.len(), path);
    Ok(registry)
}

/// Handle the tokens command. Returns true on failure.
fn handle_tokens_command(settings: &Settings, path: &str) -> bool {
    let tokens = match settings.loader(path).and_then(|loader| loader.tokenize()) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("Error: {}", e);
            return true;
        }
    };
    for token in tokens {
        println!("{:>4} {:?} {:?}", token.location.line, token.tag, token.text);
    }
    false
}

/// Handle the parse command. Returns true on failure.
fn handle_parse_command(settings: &Settings, path: &str, format: &str) -> bool {
    let compilation = match settings.loader(path).and_then(|loader| loader.compile()) {
        Ok(compilation) => compilation,
        Err(e) => {
            eprintln!("Error: {}", e);
            return true;
        }
    };
    match FormatRegistry::default().serialize(&compilation.root, format) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            return true;
        }
    }
    if compilation.has_errors() {
        eprint!("{}", compilation.render_diagnostics());
        return true;
    }
    false
}

/// Handle the check command. Returns true on failure.
fn handle_check_command(settings: &Settings, paths: &[&str]) -> bool {
    let mut all = Diagnostics::new();
    let mut unreadable = false;
    for path in paths {
        let compilation = match settings.loader(path).and_then(|loader| loader.compile()) {
            Ok(compilation) => compilation,
            Err(e) => {
                eprintln!("Error: {}", e);
                unreadable = true;
                continue;
            }
        };
        let mut census = TagCensus::new();
        if hand_off(&compilation, &mut census).is_ok() {
            log::debug!(
                "{}: clean, {} function(s), {} declaration(s)",
                path,
                census.count(Tag::Function),
                census.count(Tag::Declaration)
            );
        }
        all.extend(compilation.session.diagnostics);
    }
    if !all.is_empty() {
        eprint!("{}", all.render(settings.config.diagnostics.max_errors));
        log::debug!("{} error(s) in {} file(s)", all.len(), paths.len());
    }
    unreadable || !all.is_empty()
}
