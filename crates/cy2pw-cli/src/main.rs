//! cy2pw CLI.
//!
//! Converts Cypress suites to Playwright Test and exposes the translator and the custom
//! command classifier for one-off use.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use miette::{Context, IntoDiagnostic};
use tracing_subscriber::EnvFilter;

use cy2pw_compiler::{classify, translate, Converter, ConverterConfig, ParsedCommand, REPORT_FILE};

mod ui;

/// Environment variable holding a tracing filter (`CY2PW_LOG=cy2pw_compiler=debug`).
const LOG_ENV: &str = "CY2PW_LOG";

#[derive(Parser)]
#[command(name = "cy2pw")]
#[command(version, about = "Convert Cypress test suites to Playwright Test")]
struct Cli {
    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Cypress project to Playwright tests
    Convert {
        /// Cypress directory (defaults to cy2pw.json, then "cypress")
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output directory for the Playwright tests
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration file (defaults to ./cy2pw.json when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Source dialect
        #[arg(short, long)]
        language: Option<String>,

        /// Do not write conversion-report.json
        #[arg(long)]
        no_report: bool,

        /// Skip project validation
        #[arg(long)]
        skip_validation: bool,
    },

    /// Parse, validate and convert in memory, then print the report
    Check {
        /// Cypress directory
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Configuration file (defaults to ./cy2pw.json when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert one spec file and print the result
    File {
        /// Cypress spec file
        path: PathBuf,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Translate one command given as ParsedCommand JSON
    Translate {
        /// e.g. {"name":"get","args":["#email"],"chainedCalls":[{"method":"type","args":["a@b.co"]}]}
        json: String,
    },

    /// Classify a custom command (registration or call) read from a file
    Classify {
        /// File holding the command source; "-" reads stdin
        path: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert {
            source,
            output,
            config,
            language,
            no_report,
            skip_validation,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(source) = source {
                config.source_dir = source;
            }
            if let Some(output) = output {
                config.out_dir = output;
            }
            if let Some(language) = language {
                config.language = language;
            }
            config.write_report &= !no_report;
            config.skip_validation |= skip_validation;
            convert_project(config)?;
        }

        Commands::Check { source, config, json } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(source) = source {
                config.source_dir = source;
            }
            check_project(config, json)?;
        }

        Commands::File { path, output } => {
            let source = std::fs::read_to_string(&path)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
            let converted = Converter::convert_source(&source, &path)?;
            for diagnostic in &converted.report.diagnostics {
                eprintln!("{}: {}", path.display(), diagnostic);
            }
            match output {
                Some(output) => {
                    std::fs::write(&output, &converted.code)
                        .into_diagnostic()
                        .wrap_err_with(|| format!("Failed to write {}", output.display()))?;
                    ui::success(&format!("Wrote {}", output.display()));
                }
                None => print!("{}", converted.code),
            }
        }

        Commands::Translate { json } => {
            let command: ParsedCommand = serde_json::from_str(&json)
                .into_diagnostic()
                .wrap_err("Expected ParsedCommand JSON: {\"name\", \"args\", \"chainedCalls\"}")?;
            let result = translate(&command);
            println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
        }

        Commands::Classify { path } => {
            let raw = if path == Path::new("-") {
                std::io::read_to_string(std::io::stdin()).into_diagnostic()?
            } else {
                std::fs::read_to_string(&path)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to read {}", path.display()))?
            };
            let result = classify(&raw);
            println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> miette::Result<ConverterConfig> {
    let config = match path {
        Some(path) => ConverterConfig::load(path)?,
        None => ConverterConfig::discover(Path::new("."))?,
    };
    Ok(config)
}

/// Convert a Cypress project and print a per-file summary.
fn convert_project(config: ConverterConfig) -> miette::Result<()> {
    let start = Instant::now();
    let out_dir = config.out_dir.clone();

    ui::box_header(&format!("{} cy2pw", ui::symbols::DIAMOND));
    ui::box_line(&format!("{} {} {}", config.source_dir.display(), ui::symbols::TRIANGLE, out_dir.display()));
    ui::box_footer();
    println!();

    let spinner = ui::spinner("Converting specs...");
    let result = Converter::new(config).convert();
    spinner.finish_and_clear();

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            ui::nope_header();
            return Err(e.into());
        }
    };

    for file in &result.report.files {
        ui::file_line(&file.output, file.converted, file.commands, file.todos);
    }
    print_custom_commands(&result.report);

    ui::divider();
    ui::success(&format!(
        "{} specs, {} files written to {}",
        result.spec_files,
        result.files_written,
        out_dir.display()
    ));
    print_totals(&result.report);
    if result.report.totals.todos > 0 {
        ui::info(&format!("Details in {}", out_dir.join(REPORT_FILE).display()));
    }
    ui::timing("Converted", start.elapsed().as_millis());
    Ok(())
}

/// Convert in memory and print the report.
fn check_project(config: ConverterConfig, json: bool) -> miette::Result<()> {
    let spinner = ui::spinner("Checking Cypress project...");
    let report = Converter::new(config).check();
    spinner.finish_and_clear();

    let report = match report {
        Ok(report) => report,
        Err(e) => {
            ui::nope_header();
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
        return Ok(());
    }

    ui::looking_good();
    println!();
    for file in &report.files {
        ui::file_line(&file.output, file.converted, file.commands, file.todos);
        for diagnostic in &file.diagnostics {
            ui::dim(&format!("      {diagnostic}"));
        }
    }
    print_custom_commands(&report);
    ui::divider();
    print_totals(&report);
    Ok(())
}

fn print_custom_commands(report: &cy2pw_compiler::ConversionReport) {
    if report.custom_commands.is_empty() {
        return;
    }
    println!();
    ui::info("Custom commands:");
    let last = report.custom_commands.len() - 1;
    for (i, command) in report.custom_commands.iter().enumerate() {
        let description = format!("{} {} {}", command.strategy, ui::symbols::DOT, command.complexity);
        ui::tree_item("  ", &command.name, Some(&description), i == last);
        for warning in &command.warnings {
            ui::dim(&format!("        {warning}"));
        }
    }
}

fn print_totals(report: &cy2pw_compiler::ConversionReport) {
    let totals = &report.totals;
    let line = format!(
        "{}/{} commands converted ({:.0}%) {} {} TODO {} {} diagnostics",
        totals.converted,
        totals.commands,
        report.conversion_rate(),
        ui::symbols::DOT,
        totals.todos,
        ui::symbols::DOT,
        totals.diagnostics
    );
    if totals.todos == 0 {
        ui::success(&line);
    } else {
        ui::warn(&line);
    }
}
