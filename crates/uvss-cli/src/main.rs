//! UVSS CLI tool
//!
//! Examples:
//!   uvss cst style.uvss                 - show the syntax tree
//!   uvss fmt --in-place style.uvss      - normalize whitespace
//!   uvss check -                        - report diagnostics for stdin
//!   uvss dump style.uvss -o style.bin   - serialize the syntax tree
//!   uvss load style.bin                 - print a serialized tree's text

use std::io::{self, Read, Write};

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use uvss_cst::{Diagnostic, FormatVersion, SerializeError};
use uvss_format::{NormalizeOptions, try_normalize_source};

// ============================================================================
// Exit codes
// ============================================================================

const EXIT_SUCCESS: i32 = 0;
const EXIT_SYNTAX_ERROR: i32 = 1;
const EXIT_IO_ERROR: i32 = 3;

// ============================================================================
// CLI argument structures
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "uvss", version)]
#[command(about = "Inspect, normalize and serialize UVSS style sheets")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show CST structure
    Cst {
        /// Input file (or "-" for stdin)
        file: String,
    },

    /// Normalize whitespace and print the result
    Fmt {
        /// Input file (or "-" for stdin)
        file: String,

        /// Modify input file in place
        #[arg(long)]
        in_place: bool,

        /// Spaces per indentation level
        #[arg(long, default_value_t = 4)]
        indent: usize,
    },

    /// Report syntax diagnostics
    Check {
        /// Input file (or "-" for stdin)
        file: String,
    },

    /// Serialize the syntax tree to a binary file
    Dump {
        /// Input file (or "-" for stdin)
        file: String,

        /// Output file (or "-" for stdout)
        #[arg(short, long)]
        output: String,

        /// Binary format version (1 or 2)
        #[arg(long, default_value_t = 2)]
        format_version: u8,
    },

    /// Load a serialized syntax tree and print its text
    Load {
        /// Binary file (or "-" for stdin)
        file: String,

        /// Binary format version (1 or 2)
        #[arg(long, default_value_t = 2)]
        format_version: u8,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let result = match args.command {
        Command::Cst { file } => run_cst(&file),
        Command::Fmt {
            file,
            in_place,
            indent,
        } => run_fmt(&file, in_place, indent),
        Command::Check { file } => run_check(&file),
        Command::Dump {
            file,
            output,
            format_version,
        } => run_dump(&file, &output, format_version),
        Command::Load {
            file,
            format_version,
        } => run_load(&file, format_version),
    };

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(e) => {
            if !matches!(e, CliError::Diagnostics(_)) {
                eprintln!("error: {e}");
            }
            std::process::exit(e.exit_code());
        }
    }
}

// ============================================================================

#[derive(Debug)]
enum CliError {
    Io(io::Error),
    /// Number of diagnostics already reported
    Diagnostics(usize),
    Serialize(SerializeError),
    Usage(String),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Io(_) => EXIT_IO_ERROR,
            CliError::Diagnostics(_) => EXIT_SYNTAX_ERROR,
            CliError::Serialize(SerializeError::Io(_)) => EXIT_IO_ERROR,
            CliError::Serialize(_) => EXIT_SYNTAX_ERROR,
            CliError::Usage(_) => EXIT_SYNTAX_ERROR,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "{e}"),
            CliError::Diagnostics(count) => write!(f, "{count} syntax error(s)"),
            CliError::Serialize(e) => write!(f, "{e}"),
            CliError::Usage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            CliError::Serialize(e) => Some(e),
            CliError::Diagnostics(_) | CliError::Usage(_) => None,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<SerializeError> for CliError {
    fn from(e: SerializeError) -> Self {
        CliError::Serialize(e)
    }
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_cst(file: &str) -> Result<(), CliError> {
    let source = read_input(file)?;
    let parsed = uvss_cst::parse(&source);

    println!("{:#?}", parsed.root());

    let diagnostics = parsed.diagnostics();
    if !diagnostics.is_empty() {
        println!("\nDiagnostics:");
        for diagnostic in &diagnostics {
            println!("  {diagnostic}");
        }
    }

    Ok(())
}

fn run_fmt(file: &str, in_place: bool, indent: usize) -> Result<(), CliError> {
    if in_place && file == "-" {
        return Err(CliError::Usage(
            "--in-place cannot be used with stdin".into(),
        ));
    }
    let source = read_input(file)?;
    let options = NormalizeOptions::new().indent(indent_str(indent)?);
    let output = match try_normalize_source(&source, &options) {
        Ok(output) => output,
        Err(diagnostics) => {
            report(file, &source, &diagnostics);
            return Err(CliError::Diagnostics(diagnostics.len()));
        }
    };

    if in_place {
        if output != source {
            info!(file, "rewriting");
            std::fs::write(file, &output)?;
        }
    } else {
        print!("{output}");
    }
    Ok(())
}

fn run_check(file: &str) -> Result<(), CliError> {
    let source = read_input(file)?;
    let diagnostics = uvss_cst::parse(&source).diagnostics();
    report(file, &source, &diagnostics);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(CliError::Diagnostics(diagnostics.len()))
    }
}

fn run_dump(file: &str, output: &str, format_version: u8) -> Result<(), CliError> {
    let version = format_version_from(format_version)?;
    let source = read_input(file)?;
    let parsed = uvss_cst::parse(&source);
    let bytes = uvss_cst::serialize(parsed.tree(), Some(parsed.root_id()), version)?;
    debug!(bytes = bytes.len(), ?version, "serialized");
    write_output(output, &bytes)?;
    Ok(())
}

fn run_load(file: &str, format_version: u8) -> Result<(), CliError> {
    let version = format_version_from(format_version)?;
    let bytes = read_input_bytes(file)?;
    let (tree, root) = uvss_cst::deserialize(&bytes, version)?;
    if let Some(root) = root {
        print!("{}", tree.to_full_string(root));
    }
    Ok(())
}

// ============================================================================

const SPACES: &str = "                ";

/// Indentation string for `width` spaces.
fn indent_str(width: usize) -> Result<&'static str, CliError> {
    SPACES.get(..width).ok_or_else(|| {
        CliError::Usage(format!(
            "indent must be at most {} spaces",
            SPACES.len()
        ))
    })
}

/// Write ariadne reports for `diagnostics` to stderr.
fn report(file: &str, source: &str, diagnostics: &[Diagnostic]) {
    let filename = if file == "-" { "<stdin>" } else { file };
    for diagnostic in diagnostics {
        diagnostic.write_report(filename, source, io::stderr());
    }
}

fn format_version_from(number: u8) -> Result<FormatVersion, CliError> {
    FormatVersion::from_number(number)
        .ok_or_else(|| CliError::Usage(format!("unknown format version {number}")))
}

fn read_input(file: &str) -> Result<String, io::Error> {
    if file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(file)
    }
}

fn read_input_bytes(file: &str) -> Result<Vec<u8>, io::Error> {
    if file == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(file)
    }
}

fn write_output(path: &str, content: &[u8]) -> Result<(), io::Error> {
    if path == "-" {
        io::stdout().write_all(content)
    } else {
        std::fs::write(path, content)
    }
}
