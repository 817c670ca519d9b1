use std::fs;
use std::io;
use std::path::Path;

use tracing::warn;

use crate::config::AppConfig;
use crate::conversion::bands::validate_bands;
use crate::conversion::engine::convert_with_registry;
use crate::conversion::settings::ConversionSettings;
use crate::data::creature::SourceSystem;
use crate::data::loader::{load_registry, read_profile_file};
use crate::data::registry::ProfileRegistry;
use crate::data::role::CreatureRole;
use crate::data::validate::validate_profile;
use crate::export::{render_text_card, write_batch_csv};
use crate::parallel::{read_batch_file, run_batch, WorkerPool};
use crate::parser::parse_stat_block;
use crate::server;

const USAGE: &str = "usage: statcard <serve|parse|convert|bands|profiles|validate|batch> [args]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Parse,
    Convert,
    Bands,
    Profiles,
    Validate,
    Batch,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("parse") => Some(Command::Parse),
        Some("convert") => Some(Command::Convert),
        Some("bands") => Some(Command::Bands),
        Some("profiles") => Some(Command::Profiles),
        Some("validate") => Some(Command::Validate),
        Some("batch") => Some(Command::Batch),
        _ => None,
    }
}

/// Flags shared by the commands that read a stat block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub system: Option<SourceSystem>,
    pub settings: ConversionSettings,
    pub text: bool,
    pub csv: bool,
}

/// Parse `--flag value` pairs. Returns a message for unknown flags, missing values and bad numbers.
pub fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--text" => options.text = true,
            "--csv" => options.csv = true,
            "--system" | "--profile" | "--role" | "--level" | "--deadliness" | "--durability"
            | "--pack" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("missing value for {flag}"))?;
                apply_option(&mut options, flag, value)?;
            }
            other => return Err(format!("unknown option '{other}'")),
        }
    }
    Ok(options)
}

fn apply_option(options: &mut CliOptions, flag: &str, value: &str) -> Result<(), String> {
    let settings = &mut options.settings;
    match flag {
        "--system" => options.system = Some(SourceSystem::parse(value)),
        "--profile" => settings.conversion_profile_id = Some(value.to_string()),
        "--role" => {
            settings.role =
                Some(CreatureRole::parse(value).ok_or_else(|| format!("unknown role '{value}'"))?)
        }
        "--level" => {
            settings.target_level =
                Some(value.parse().map_err(|_| format!("invalid level '{value}'"))?)
        }
        "--deadliness" => {
            settings.deadliness = value
                .parse()
                .map_err(|_| format!("invalid deadliness '{value}'"))?
        }
        "--durability" => {
            settings.durability = value
                .parse()
                .map_err(|_| format!("invalid durability '{value}'"))?
        }
        "--pack" => settings.output_pack_id = Some(value.to_string()),
        _ => return Err(format!("unknown option '{flag}'")),
    }
    Ok(())
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = AppConfig::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(&config),
        Some(Command::Parse) => handle_parse(args),
        Some(Command::Convert) => handle_convert(args, &config, false),
        Some(Command::Bands) => handle_convert(args, &config, true),
        Some(Command::Profiles) => handle_profiles(&config),
        Some(Command::Validate) => handle_validate(args),
        Some(Command::Batch) => handle_batch(args, &config),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn registry_for(config: &AppConfig) -> ProfileRegistry {
    load_registry(&config.profiles_dir).unwrap_or_else(|err| {
        warn!(error = %err, "could not load extra profiles, using built-ins");
        ProfileRegistry::builtin()
    })
}

/// Source file (args[2]) and parsed trailing options, or the exit code to return.
fn input_and_options(args: &[String], command: &str) -> Result<(String, CliOptions), i32> {
    let Some(path) = args.get(2) else {
        eprintln!("usage: statcard {command} <file> [options]");
        return Err(2);
    };
    let options = parse_options(&args[3..]).map_err(|msg| {
        eprintln!("{msg}");
        2
    })?;
    let text = fs::read_to_string(path).map_err(|err| {
        eprintln!("failed to read {path}: {err}");
        1
    })?;
    Ok((text, options))
}

fn print_json<T: serde::Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn handle_serve(config: &AppConfig) -> i32 {
    let registry = registry_for(config);
    match server::run_server(&config.bind_addr, &registry) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_parse(args: &[String]) -> i32 {
    match input_and_options(args, "parse") {
        Ok((text, options)) => print_json(&parse_stat_block(&text, options.system), "parse result"),
        Err(code) => code,
    }
}

fn handle_convert(args: &[String], config: &AppConfig, bands_only: bool) -> i32 {
    let command = if bands_only { "bands" } else { "convert" };
    let (text, options) = match input_and_options(args, command) {
        Ok(input) => input,
        Err(code) => return code,
    };
    let registry = registry_for(config);
    let parsed = parse_stat_block(&text, options.system);
    for warning in &parsed.warnings {
        eprintln!("warning: {warning}");
    }
    let output = convert_with_registry(&parsed.data, &options.settings, &registry);

    if bands_only {
        let profile_id = output
            .tuning
            .as_ref()
            .map(|t| t.profile_id.as_str())
            .unwrap_or_default();
        let report = validate_bands(&output, registry.resolve(profile_id));
        return print_json(&report, "band report");
    }
    if options.text {
        println!("{}", render_text_card(&output));
        return 0;
    }
    print_json(&output, "converted creature")
}

fn handle_profiles(config: &AppConfig) -> i32 {
    let registry = registry_for(config);
    for profile in registry.profiles() {
        println!("{}\t{}\t{}", profile.id, profile.version, profile.display_name);
    }
    0
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: statcard validate <file.profile.yaml>");
        return 2;
    };
    let profile = match read_profile_file(path) {
        Ok(profile) => profile,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };
    let report = validate_profile(&profile);
    for diag in &report.diagnostics {
        eprintln!("- {diag}");
    }
    if report.has_errors() {
        eprintln!("validation failed: {} error(s)", report.errors().count());
        1
    } else {
        println!("validation passed: {path} ({})", profile.id);
        0
    }
}

fn handle_batch(args: &[String], config: &AppConfig) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: statcard batch <file> [--csv] [options]");
        return 2;
    };
    let options = match parse_options(&args[3..]) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{msg}");
            return 2;
        }
    };
    let blocks = match read_batch_file(Path::new(path)) {
        Ok(blocks) => blocks,
        Err(err) => {
            eprintln!("batch failed: {err}");
            return 1;
        }
    };
    let registry = registry_for(config);
    let pool = WorkerPool::with_workers(config.workers);
    let items = run_batch(&blocks, options.system, &options.settings, &registry, &pool);

    if options.csv {
        return match write_batch_csv(io::stdout().lock(), &items) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("failed to write csv: {err}");
                1
            }
        };
    }
    print_json(&items, "batch result")
}
