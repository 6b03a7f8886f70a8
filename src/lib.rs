pub mod cli;
pub mod config;
pub mod filter;
pub mod report;

pub use cli::{Cli, ColorMode, Commands, OutputFormat, cli_parse};
pub use filter::{
    CompileDiagnostic, FilterError, MatcherSet, Placeholders, build_matchers, extract_rules,
    read_filter_definition,
};

use anyhow::Context;
use filter::print_compile_warnings;
use std::path::Path;

fn write_output_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file '{}'", path.display()))
}

/// Read a filter definition, extract its fragments and compile them.
fn load_matcher_set(
    dir: &Path,
    name: &str,
    placeholders: &Placeholders,
) -> Result<MatcherSet, FilterError> {
    let text = read_filter_definition(dir, name)?;
    let fragments = extract_rules(&text);
    Ok(MatcherSet::build(&fragments, placeholders))
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    let analyzer_config =
        config::load_config(cli.config.as_deref()).context("Failed to load config")?;
    let format = cli.format;
    let output = &cli.output;
    let verbose = cli.verbose;
    let quiet = cli.quiet;

    // Set up color handling based on user preference
    match cli.color {
        ColorMode::Always => {
            unsafe {
                std::env::set_var("CLICOLOR_FORCE", "1");
            }
        }
        ColorMode::Never => {
            unsafe {
                std::env::set_var("NO_COLOR", "1");
            }
        }
        ColorMode::Auto => {
            // Default behavior - let the terminal decide
        }
    }

    let filter_dir = cli
        .filter_dir
        .clone()
        .unwrap_or_else(|| analyzer_config.filter_dir.clone());
    let placeholders = analyzer_config.placeholders();

    if verbose > 0 && !quiet {
        eprintln!("Verbosity level: {}", verbose);
        eprintln!("Filter directory: {}", filter_dir.display());
        eprintln!("Config profile: {}", analyzer_config.profile_name);
        if let Some(config_path) = &cli.config {
            eprintln!("Config file: {}", config_path.display());
        }
        if let Some(out_path) = output {
            eprintln!("Output will be written to: {}", out_path.display());
        }
    }

    match &cli.command {
        Commands::Check { filter } => {
            let set = load_matcher_set(&filter_dir, filter, &placeholders)
                .with_context(|| format!("Failed to load filter '{filter}'"))?;
            print_compile_warnings(&set);

            let rendered = match format {
                OutputFormat::Text => report::format_check_text(filter, &set),
                OutputFormat::Json => report::format_rules_json(filter, &set),
            };
            print!("{rendered}");
            if let Some(path) = output {
                write_output_file(path, &rendered)?;
            }
        }
        Commands::Info { filter } => {
            let set = load_matcher_set(&filter_dir, filter, &placeholders)
                .with_context(|| format!("Failed to load filter '{filter}'"))?;
            print_compile_warnings(&set);

            let rendered = match format {
                OutputFormat::Text => report::format_rules_text(filter, &set),
                OutputFormat::Json => report::format_rules_json(filter, &set),
            };
            print!("{rendered}");
            if let Some(path) = output {
                write_output_file(path, &rendered)?;
            }
        }
        Commands::Match { filter, lines } => {
            let set = load_matcher_set(&filter_dir, filter, &placeholders)
                .with_context(|| format!("Failed to load filter '{filter}'"))?;
            print_compile_warnings(&set);

            let match_report =
                report::evaluate_lines(&set, filter, lines.iter().map(String::as_str));
            let rendered = match format {
                OutputFormat::Text => report::format_match_text(&match_report, true),
                OutputFormat::Json => report::format_match_json(&match_report),
            };
            print!("{rendered}");
            if let Some(path) = output {
                write_output_file(path, &rendered)?;
            }
        }
        Commands::Test { filter, log_file } => {
            let set = load_matcher_set(&filter_dir, filter, &placeholders)
                .with_context(|| format!("Failed to load filter '{filter}'"))?;
            print_compile_warnings(&set);

            let raw = std::fs::read_to_string(log_file)
                .with_context(|| format!("Failed to read log file '{}'", log_file.display()))?;
            let match_report = report::evaluate_lines(&set, filter, raw.lines());

            let rendered = match format {
                OutputFormat::Text => report::format_match_text(&match_report, verbose > 0),
                OutputFormat::Json => report::format_match_json(&match_report),
            };
            print!("{rendered}");
            if let Some(path) = output {
                write_output_file(path, &rendered)?;
            }
        }
    }

    Ok(())
}
