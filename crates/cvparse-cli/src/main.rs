use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use cvparse_core::config_file;
use cvparse_parsing::{CvExtractor, NormalizeMode, ParsingConfigBuilder, PlainTextBackend, TextBackend};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod output;

use output::ColorMode;

/// Résumé parser - Extract contact details, education, qualifications and experience from résumé text
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a structured record from a résumé
    Parse {
        /// Path to the extracted text, or `-` for stdin
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Collapse the document onto sentence lines before extraction
        #[arg(long)]
        flatten: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to a TOML config file (default: ./.cvparse.toml over the platform config)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the normalized text the extractor works on
    Normalize {
        /// Path to the extracted text, or `-` for stdin
        file: PathBuf,

        /// Collapse the document onto sentence lines
        #[arg(long)]
        flatten: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Parse {
            file,
            format,
            flatten,
            no_color,
            output,
            config,
        } => parse(file, format, flatten, no_color, output, config),
        Command::Normalize { file, flatten } => normalize(file, flatten),
    }
}

/// Log filter: `CVPARSE_LOG`, then `RUST_LOG`, then `warn`.
fn init_tracing() {
    let filter = std::env::var("CVPARSE_LOG")
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse(
    file: PathBuf,
    format: Format,
    flatten: bool,
    no_color: bool,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config_file = match config {
        Some(ref path) => config_file::read_config(path)?,
        None => config_file::load_config(),
    };

    let mut builder = ParsingConfigBuilder::from_config_file(&config_file);
    if flatten {
        builder = builder.normalize_mode(NormalizeMode::Flatten);
    }
    let parsing_config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid pattern in config: {}", e))?;
    let extractor = CvExtractor::with_config(parsing_config);

    let text = read_input(&file)?;
    tracing::debug!(bytes = text.len(), source = %file.display(), "input read");
    let record = extractor.extract(&text);

    // Determine color mode and output writer
    let use_color = !no_color && output.is_none();
    let color = ColorMode(use_color);

    let mut writer: Box<dyn Write> = if let Some(ref output_path) = output {
        Box::new(std::fs::File::create(output_path)?)
    } else {
        Box::new(std::io::stdout())
    };

    match format {
        Format::Json => output::write_json(&mut writer, &record)?,
        Format::Text => output::print_record(&mut writer, &record, color)?,
    }
    writer.flush()?;

    if let Some(ref output_path) = output {
        eprintln!("Wrote {}", output_path.display());
    }
    Ok(())
}

fn normalize(file: PathBuf, flatten: bool) -> anyhow::Result<()> {
    let mode = if flatten {
        NormalizeMode::Flatten
    } else {
        NormalizeMode::PreserveLines
    };
    let config = ParsingConfigBuilder::new()
        .normalize_mode(mode)
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid pattern in config: {}", e))?;

    let text = read_input(&file)?;
    let normalized = CvExtractor::with_config(config).normalize(&text);

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", normalized)?;
    Ok(())
}

/// Read document text from a file through the plain-text backend, or from
/// stdin when `file` is `-`.
fn read_input(file: &Path) -> anyhow::Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }

    PlainTextBackend::new()
        .extract_text(file)
        .map_err(|e| anyhow::anyhow!("Could not read {}: {}", file.display(), e))
}
