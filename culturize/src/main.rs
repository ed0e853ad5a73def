//! culturize CLI - Turn persistent identifier CSV files into redirect rules
//!
//! # Commands
//!
//! ```bash
//! culturize convert pids.csv --target nginx --dest /etc/nginx/conf.d
//! culturize convert pids.csv --target apache        # writes ./.htaccess
//! culturize render pids.csv --target nginx          # print rules to stdout
//! culturize validate pids.csv --check-urls --output report.json
//! ```
//!
//! Defaults for `--dest`, `--subdir`, `--delimiter` and the URL timeout can
//! be set with `CULTURIZE_*` variables, also from a `.env` file.

use clap::{Parser, Subcommand, ValueEnum};
use culturize::config::parse_delimiter;
use culturize::logs::{
    log_error, log_info, log_info_indent, log_success, log_warning, log_warning_indent, LogFormat,
    LOGGER,
};
use culturize::{
    check_urls, convert_csv, load_records_with, render, validate_file, ConvertOptions,
    LoaderOptions, RenderOptions, Settings, Target,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "culturize")]
#[command(about = "Convert persistent identifier CSV files to webserver redirect rules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write nginx_redirect.conf or .htaccess from a CSV file
    Convert {
        /// Input CSV file
        input: PathBuf,

        /// Target webserver: apache or nginx
        #[arg(short, long)]
        target: Target,

        /// Destination directory (must exist, default: current directory)
        #[arg(short, long)]
        dest: Option<PathBuf>,

        /// Subdirectory prepended to nginx match paths
        #[arg(short, long)]
        subdir: Option<String>,

        /// CSV delimiter (default: ',')
        #[arg(long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Skip rows whose 'enabled' column is not 1
        #[arg(long)]
        respect_enabled: bool,
    },

    /// Print the rules to stdout instead of writing a file
    Render {
        /// Input CSV file
        input: PathBuf,

        /// Target webserver: apache or nginx
        #[arg(short, long)]
        target: Target,

        /// Subdirectory prepended to nginx match paths
        #[arg(short, long)]
        subdir: Option<String>,

        /// CSV delimiter (default: ',')
        #[arg(long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Skip rows whose 'enabled' column is not 1
        #[arg(long)]
        respect_enabled: bool,
    },

    /// Report problems in a CSV file, row by row
    Validate {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (default: ',')
        #[arg(long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,

        /// Send a HEAD request to every URL
        #[arg(long)]
        check_urls: bool,

        /// Timeout per URL check in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Save the report as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    LOGGER.set_quiet(cli.quiet);
    LOGGER.set_format(cli.log_format.into());

    let settings = Settings::from_env();

    let result = match cli.command {
        Commands::Convert {
            input,
            target,
            dest,
            subdir,
            delimiter,
            respect_enabled,
        } => cmd_convert(
            &input,
            target,
            settings.with_overrides(dest, subdir, delimiter),
            respect_enabled,
        ),

        Commands::Render {
            input,
            target,
            subdir,
            delimiter,
            respect_enabled,
        } => cmd_render(
            &input,
            target,
            settings.with_overrides(None, subdir, delimiter),
            respect_enabled,
        ),

        Commands::Validate {
            input,
            delimiter,
            check_urls: check,
            timeout_ms,
            output,
        } => {
            let mut settings = settings.with_overrides(None, None, delimiter);
            if let Some(ms) = timeout_ms {
                settings.url_timeout = Duration::from_millis(ms);
            }
            cmd_validate(&input, &settings, check, output.as_deref())
        }
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn loader_options(settings: &Settings, respect_enabled: bool) -> LoaderOptions {
    LoaderOptions {
        delimiter: settings.delimiter,
        respect_enabled,
    }
}

fn warn_ignored_subdir(target: Target, settings: &Settings) {
    if target == Target::Apache && settings.subdir.is_some() {
        log_warning("Subdirectory only applies to nginx rules, ignoring it");
    }
}

fn cmd_convert(
    input: &Path,
    target: Target,
    settings: Settings,
    respect_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("📄 Reading: {}", input.display()));
    warn_ignored_subdir(target, &settings);

    let options = ConvertOptions::new(target)
        .with_dest(settings.dest.clone())
        .with_subdir(settings.subdir.clone())
        .with_loader(loader_options(&settings, respect_enabled));

    let result = convert_csv(input, &options)?;

    log_success(format!("{} {} rules", result.rule_count, result.target));
    log_info(format!("💾 Output written to: {}", result.path.display()));
    Ok(())
}

fn cmd_render(
    input: &Path,
    target: Target,
    settings: Settings,
    respect_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    warn_ignored_subdir(target, &settings);

    let records = load_records_with(input, &loader_options(&settings, respect_enabled))?;
    let options = RenderOptions {
        subdir: settings.subdir,
    };
    print!("{}", render(&records, target, &options));
    Ok(())
}

fn cmd_validate(
    input: &Path,
    settings: &Settings,
    urls: bool,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    log_info(format!("🔍 Validating: {}", input.display()));

    let mut report = validate_file(input, &loader_options(settings, false))?;

    if urls {
        let unreachable = check_urls(&mut report, settings.url_timeout)?;
        if unreachable > 0 {
            log_warning(format!("{} URLs unreachable", unreachable));
        }
    }

    for row in report.problems() {
        let reasons: Vec<&str> = row.codes.iter().map(|c| c.description()).collect();
        log_warning_indent(
            format!("line {}: {} ({})", row.line, row.code_list(), reasons.join("; ")),
            1,
        );
    }

    log_info("📊 Results:");
    log_info_indent(format!("{} rows", report.total_rows), 1);
    log_info_indent(format!("{} convertible", report.convertible_rows), 1);
    log_info_indent(format!("{} with problems", report.rows_with_problems), 1);

    if let Some(path) = output {
        report.save_json(path)?;
        log_info(format!("💾 Report written to: {}", path.display()));
    }

    if !report.is_clean() {
        std::process::exit(1);
    }

    log_success("No problems found");
    Ok(())
}
