//! Tabtex CLI - export HTML tables as LaTeX tabular environments

#[cfg(feature = "cli")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, IsTerminal, Read, Write};
#[cfg(feature = "cli")]
use std::path::Path;
#[cfg(feature = "cli")]
use tabtex::{
    convert_html_tables,
    diagnostics::{check_html, format_diagnostics},
    ClassCommands, ClassMapping, ConversionError, ConversionOutput, ConversionResult,
    ConversionWarning, ConvertOptions, MarkupOptions, TableExport, TableFormat, TableSelection,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "h2l")]
#[command(version)]
#[command(about = "Tabtex - export HTML tables as LaTeX tabular environments", long_about = None)]
struct Cli {
    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path, or a directory to save table.tex into (stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Latex)]
    format: Format,

    /// Input format
    #[arg(short, long, value_enum, default_value_t = InputFormat::Html)]
    input_format: InputFormat,

    /// Table to convert: a 1-based number, '#id', 'first' or 'all'
    #[arg(short, long, default_value = "first")]
    table: String,

    /// Convert every table (same as --table all)
    #[arg(short, long)]
    all: bool,

    /// Map a class to a LaTeX command, NAME=COMMAND; an empty COMMAND drops the class
    #[arg(short = 'c', long = "class", value_name = "NAME=COMMAND")]
    classes: Vec<String>,

    /// Drop the report ranking classes (first, second, third, good, average, bad)
    #[arg(long)]
    strip_report_tags: bool,

    /// Check mode - report malformed attributes and class names without converting
    #[arg(long)]
    check: bool,

    /// Strict mode: exit with error if any conversion warnings occur
    #[arg(long)]
    strict: bool,

    /// Quiet mode: suppress warning output to stderr
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Verbose logging (same as RUST_LOG=debug)
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// LaTeX tabular environment
    Latex,
    /// Cell-joined plain text preview
    Text,
}

#[cfg(feature = "cli")]
impl From<Format> for TableFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Latex => TableFormat::Markup,
            Format::Text => TableFormat::Delimited,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    /// HTML page or fragment containing <table> elements
    Html,
    /// JSON grid: an array of rows of cell objects (requires the serde feature)
    Json,
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

#[cfg(feature = "cli")]
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "cli")]
fn run(cli: &Cli) -> ConversionResult<i32> {
    let use_color = !cli.no_color && io::stderr().is_terminal();
    let markup = markup_options(cli)?;

    // Read input
    let input = match cli.input_file {
        Some(ref path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    // If check mode, analyze and report issues
    if cli.check {
        if cli.input_format != InputFormat::Html {
            return Err(ConversionError::invalid("--check only reads HTML input"));
        }
        let result = check_html(&input, &markup);
        println!("{}", format_diagnostics(&result, use_color));
        let failed = result.has_errors() || (cli.strict && result.has_warnings());
        return Ok(i32::from(failed));
    }

    let format = TableFormat::from(cli.format);
    let (output, exports) = match cli.input_format {
        InputFormat::Html => {
            let table = if cli.all {
                TableSelection::All
            } else {
                cli.table.parse()?
            };
            let options = ConvertOptions { markup, table };
            let (tables, warnings) = convert_html_tables(&input, format, &options)?;

            let numbered = tables.len() > 1;
            let content = tables
                .iter()
                .map(|t| t.content.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            let exports = tables
                .into_iter()
                .map(|t| {
                    let export = TableExport::with_content(format, t.content);
                    if numbered {
                        export.numbered(t.number)
                    } else {
                        export
                    }
                })
                .collect::<Vec<_>>();
            (ConversionOutput::with_warnings(content, warnings), exports)
        }
        InputFormat::Json => {
            let output = convert_json_input(&input, format, &markup)?;
            let export = TableExport::with_content(format, output.content.clone());
            (output, vec![export])
        }
    };

    // Print warnings to stderr (unless quiet mode)
    if !cli.quiet && output.has_warnings() {
        print_warnings_to_stderr(&output.warnings, use_color);
    }

    // Check strict mode
    if cli.strict && output.has_warnings() {
        eprintln!(
            "Error: {} conversion warning(s) in strict mode",
            output.warnings.len()
        );
        return Ok(1);
    }

    write_output(cli, &output, &exports)?;
    Ok(0)
}

#[cfg(feature = "cli")]
fn markup_options(cli: &Cli) -> ConversionResult<MarkupOptions> {
    if cli.classes.is_empty() && !cli.strip_report_tags {
        return Ok(MarkupOptions::verbatim());
    }

    let mut commands = if cli.strip_report_tags {
        ClassCommands::strip_report_tags()
    } else {
        ClassCommands::new()
    };
    for raw in &cli.classes {
        commands.push(raw.parse::<ClassMapping>()?);
    }
    Ok(MarkupOptions::with_class_commands(commands))
}

#[cfg(all(feature = "cli", feature = "serde"))]
fn convert_json_input(
    input: &str,
    format: TableFormat,
    markup: &MarkupOptions,
) -> ConversionResult<ConversionOutput> {
    tabtex::convert_json(input, format, markup)
}

#[cfg(all(feature = "cli", not(feature = "serde")))]
fn convert_json_input(
    _input: &str,
    _format: TableFormat,
    _markup: &MarkupOptions,
) -> ConversionResult<ConversionOutput> {
    Err(ConversionError::invalid(
        "JSON input needs the 'serde' feature; rebuild with --features serde",
    ))
}

#[cfg(feature = "cli")]
fn write_output(
    cli: &Cli,
    output: &ConversionOutput,
    exports: &[TableExport],
) -> ConversionResult<()> {
    let Some(ref target) = cli.output else {
        print!("{}", output.content);
        io::stdout().flush()?;
        return Ok(());
    };

    let target = Path::new(target);
    if !target.is_dir() {
        fs::write(target, &output.content)?;
        eprintln!("✓ Output written to: {}", target.display());
        return Ok(());
    }

    // Directory target: one export file per table
    for export in exports {
        let path = export.write_into(target)?;
        eprintln!("✓ Output written to: {}", path.display());
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn print_warnings_to_stderr(warnings: &[ConversionWarning], use_color: bool) {
    let (yellow, reset) = if use_color {
        ("\x1b[33m", "\x1b[0m")
    } else {
        ("", "")
    };
    eprintln!();
    eprintln!("{}Conversion Warnings ({}):{}", yellow, warnings.len(), reset);
    eprintln!();
    for warning in warnings {
        eprintln!("  {}[warning]{} {}", yellow, reset, warning.message);
        if let Some(ref suggestion) = warning.suggestion {
            eprintln!("            = help: {}", suggestion);
        }
    }
    eprintln!();
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install tabtex --features cli");
    eprintln!("  h2l [OPTIONS] [INPUT_FILE]");
}
