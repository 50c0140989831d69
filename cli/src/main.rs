//! docmd CLI - Markdown and DOCX conversion tool

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use docmd::{
    detect_format_from_bytes, CleanupPreset, ConversionInput, ConversionMode, ConversionOutput,
    ConvertOptions, Converter, DetectedFormat, JsonFormat, RenderOptions, SourceFormat,
    TargetFormat,
};

#[derive(Parser)]
#[command(name = "docmd")]
#[command(version)]
#[command(about = "Convert Markdown to DOCX and DOCX or HTML to Markdown", long_about = None)]
struct Cli {
    /// Input file (.md, .docx or .html)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Text cleanup preset for Markdown output
    #[arg(long, value_enum, env = "DOCMD_CLEANUP")]
    cleanup: Option<CleanupLevel>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a file, choosing the direction from its extension
    Convert {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (named after the input if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Target format (md for DOCX/HTML input, docx for Markdown input)
        #[arg(long, value_enum)]
        to: Option<Target>,

        /// Text cleanup preset for Markdown output
        #[arg(long, value_enum, env = "DOCMD_CLEANUP")]
        cleanup: Option<CleanupLevel>,
    },

    /// Show the detected format of a file or of stdin
    Detect {
        /// Input file, or - for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert Markdown to DOCX
    #[command(alias = "docx")]
    ToDocx {
        /// Markdown file, or - for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert DOCX or HTML to Markdown
    #[command(alias = "md")]
    ToMd {
        /// DOCX or HTML file, or - for HTML on stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Text cleanup preset
        #[arg(long, value_enum, env = "DOCMD_CLEANUP")]
        cleanup: Option<CleanupLevel>,

        /// Unordered list marker
        #[arg(long, default_value = "-")]
        list_marker: char,

        /// Maximum heading level (1-6)
        #[arg(long, default_value = "6")]
        max_heading: u8,
    },

    /// Print the compiled document nodes of a Markdown file as JSON
    Nodes {
        /// Markdown file, or - for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Non-breaking spaces and blank lines only
    Minimal,
    /// Minimal plus trailing whitespace and Unicode NFC (default)
    Standard,
    /// Standard plus zero-width and private-use character removal
    Aggressive,
}

impl From<CleanupLevel> for CleanupPreset {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::Minimal => CleanupPreset::Minimal,
            CleanupLevel::Standard => CleanupPreset::Standard,
            CleanupLevel::Aggressive => CleanupPreset::Aggressive,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Target {
    /// Markdown
    Md,
    /// DOCX document
    Docx,
    /// Standalone HTML document
    Html,
}

impl From<Target> for TargetFormat {
    fn from(target: Target) -> Self {
        match target {
            Target::Md => TargetFormat::Markdown,
            Target::Docx => TargetFormat::Docx,
            Target::Html => TargetFormat::Html,
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            to,
            cleanup,
        }) => cmd_convert(&input, output.as_deref(), to, cleanup),
        Some(Commands::Detect { input, json }) => cmd_detect(&input, json),
        Some(Commands::ToDocx { input, output }) => cmd_to_docx(&input, output.as_deref()),
        Some(Commands::ToMd {
            input,
            output,
            cleanup,
            list_marker,
            max_heading,
        }) => cmd_to_md(&input, output.as_deref(), cleanup, list_marker, max_heading),
        Some(Commands::Nodes {
            input,
            output,
            compact,
        }) => cmd_nodes(&input, output.as_deref(), compact),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), None, cli.cleanup)
            } else {
                println!("{}", "Usage: docmd <FILE> [-o OUTPUT]".yellow());
                println!("       docmd --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn converter(cleanup: Option<CleanupLevel>) -> Converter {
    let mut render = RenderOptions::new();
    if let Some(level) = cleanup {
        render = render.with_cleanup_preset(level.into());
    }
    Converter::new().with_options(ConvertOptions::new().with_render_options(render))
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_input(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if is_stdin(path) {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(fs::read(path)?)
    }
}

fn input_name(path: &Path, stdin_name: &str) -> String {
    if is_stdin(path) {
        stdin_name.to_string()
    } else {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Output path next to the input, with the target's extension.
fn default_output(input: &Path, output: &ConversionOutput) -> PathBuf {
    let extension = output.target_format().extension();
    let candidate = input.with_extension(extension);
    if is_stdin(input) || candidate == input {
        PathBuf::from(output.suggested_file_name())
    } else {
        candidate
    }
}

fn write_output(path: &Path, output: &ConversionOutput) -> CliResult {
    fs::write(path, output.payload())?;
    if let Some(message) = output.message() {
        eprintln!("{}: {}", "Warning".yellow().bold(), message);
    }
    println!(
        "{} {} ({})",
        "Saved to".green(),
        path.display(),
        output.target_format()
    );
    Ok(())
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    to: Option<Target>,
    cleanup: Option<CleanupLevel>,
) -> CliResult {
    let converter = converter(cleanup);
    let input_file = ConversionInput::from_path(input)?;

    let mode = match to {
        Some(target) => ConversionMode::Explicit {
            from: docmd::detect::format_from_extension(input)?,
            to: target.into(),
        },
        None => ConversionMode::Auto,
    };
    let result = converter.convert(input_file, mode)?;

    if let ConversionOutput::Echo(_) = result {
        println!(
            "{}",
            "Source and target formats match, writing the input unchanged".yellow()
        );
    }

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input, &result));
    write_output(&path, &result)
}

fn cmd_detect(input: &Path, json: bool) -> CliResult {
    let bytes = read_input(input)?;
    let converter = Converter::new();

    let (class, source) = match detect_format_from_bytes(&bytes) {
        Ok(SourceFormat::Docx) => (DetectedFormat::RichDoc, Some(SourceFormat::Docx)),
        Ok(format) => {
            let text = String::from_utf8_lossy(&bytes);
            (converter.detect(&text), Some(format))
        }
        Err(docmd::Error::UnknownFormat) => (DetectedFormat::Unknown, None),
        Err(e) => return Err(e.into()),
    };

    if json {
        let value = serde_json::json!({
            "input": input_name(input, "-"),
            "class": class.to_string(),
            "format": source.map(|s| s.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}: {}", "File".bold(), input_name(input, "stdin"));
    println!("{}: {}", "Class".bold(), class.to_string().cyan());
    if let Some(source) = source {
        println!("{}: {}", "Format".bold(), source);
    }
    Ok(())
}

fn cmd_to_docx(input: &Path, output: Option<&Path>) -> CliResult {
    let bytes = read_input(input)?;
    let markdown = String::from_utf8(bytes)?;

    let result = Converter::new().convert(
        ConversionInput::text(markdown),
        ConversionMode::Explicit {
            from: SourceFormat::Markdown,
            to: TargetFormat::Docx,
        },
    )?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(input, &result));
    write_output(&path, &result)
}

fn cmd_to_md(
    input: &Path,
    output: Option<&Path>,
    cleanup: Option<CleanupLevel>,
    list_marker: char,
    max_heading: u8,
) -> CliResult {
    let mut render = RenderOptions::new()
        .with_list_marker(list_marker)
        .with_max_heading(max_heading);
    if let Some(level) = cleanup {
        render = render.with_cleanup_preset(level.into());
    }
    let converter = Converter::new().with_render_options(render);

    let name = input_name(input, "stdin.html");
    let from = docmd::detect::format_from_extension(&name)?;
    let bytes = read_input(input)?;
    let result = converter.convert(
        ConversionInput::file(name, bytes),
        ConversionMode::Explicit {
            from,
            to: TargetFormat::Markdown,
        },
    )?;

    match output {
        Some(path) => write_output(path, &result),
        None => {
            println!("{}", String::from_utf8_lossy(result.payload()));
            Ok(())
        }
    }
}

fn cmd_nodes(input: &Path, output: Option<&Path>, compact: bool) -> CliResult {
    let bytes = read_input(input)?;
    let markdown = String::from_utf8(bytes)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = docmd::markdown_to_json(&markdown, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docmd".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Markdown and DOCX conversion tool");
    println!();
    println!("License: MIT");
}
