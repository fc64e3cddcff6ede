use std::{
    fs, io,
    io::Read,
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use tracing::Level;

use asciimath_core::{AsciiMathToMathML, MathDisplay, ParseError, PrettyPrint};

mod config_file;
mod html_entities;
mod replace;

use config_file::Config;
use replace::{ReplaceError, Replacer};

/// Converts AsciiMath formulas to MathML
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// HTML file (or directory, with --recursive) whose formulas are replaced in place.
    /// `-` reads HTML from stdin and writes the result to stdout
    #[arg(conflicts_with = "formula", value_name = "PATH")]
    file: Option<PathBuf>,

    /// Delimiter that both opens and closes inline formulas in HTML
    #[arg(long, default_value = "`", conflicts_with = "formula", value_name = "STR")]
    inline_del: String,

    /// Delimiter that both opens and closes block formulas in HTML
    #[arg(long, default_value = "``", conflicts_with = "formula", value_name = "STR")]
    block_del: String,

    /// Opening delimiter of inline formulas, if it differs from the closing one
    #[arg(
        long,
        conflicts_with = "inline_del",
        requires = "inline_close",
        value_name = "STR"
    )]
    inline_open: Option<String>,

    /// Closing delimiter of inline formulas
    #[arg(
        long,
        conflicts_with = "inline_del",
        requires = "inline_open",
        value_name = "STR"
    )]
    inline_close: Option<String>,

    /// Opening delimiter of block formulas, if it differs from the closing one
    #[arg(
        long,
        conflicts_with = "block_del",
        requires = "block_close",
        value_name = "STR"
    )]
    block_open: Option<String>,

    /// Closing delimiter of block formulas
    #[arg(
        long,
        conflicts_with = "block_del",
        requires = "block_open",
        value_name = "STR"
    )]
    block_close: Option<String>,

    /// Walk the given directory and convert every `.html` file in it
    #[arg(short, long, conflicts_with = "formula")]
    recursive: bool,

    /// Convert, but leave the files untouched
    #[arg(long, conflicts_with = "formula")]
    dry_run: bool,

    /// Treat delimiters preceded by a backslash as plain text
    #[arg(long, conflicts_with = "formula")]
    ignore_escaped_delim: bool,

    /// Leave formulas that fail to convert as they are, instead of stopping
    #[arg(long, conflicts_with = "formula")]
    continue_on_error: bool,

    /// A single formula to convert. Without it and without a file, the formula is read
    /// from stdin
    #[arg(short, long, conflicts_with = "file")]
    formula: Option<String>,

    /// Render the formula inline
    #[arg(short, long, conflicts_with = "file", group = "mode")]
    inline: bool,

    /// Render the formula as a block (the default)
    #[arg(short, long, conflicts_with = "file", group = "mode")]
    block: bool,

    /// TOML file with the converter configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pretty-print the MathML, whatever the configuration says
    #[arg(long)]
    pretty: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn display(&self) -> MathDisplay {
        if self.inline {
            MathDisplay::Inline
        } else {
            MathDisplay::Block
        }
    }

    fn inline_delimiters(&self) -> (&str, &str) {
        match (&self.inline_open, &self.inline_close) {
            (Some(open), Some(close)) => (open.as_str(), close.as_str()),
            _ => (self.inline_del.as_str(), self.inline_del.as_str()),
        }
    }

    fn block_delimiters(&self) -> (&str, &str) {
        match (&self.block_open, &self.block_close) {
            (Some(open), Some(close)) => (open.as_str(), close.as_str()),
            _ => (self.block_del.as_str(), self.block_del.as_str()),
        }
    }
}

fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(log_level(args.verbose))
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load(path).unwrap_or_else(|err| {
            eprintln!("Config error: {err}");
            process::exit(1);
        }),
        None => Config::default(),
    };
    if args.pretty {
        config.asciimath.pretty_print = PrettyPrint::Always;
    }
    tracing::debug!(?config, "loaded configuration");
    let converter = AsciiMathToMathML::new(config.asciimath);

    let Some(path) = &args.file else {
        let formula = match &args.formula {
            Some(formula) => formula.clone(),
            None => read_stdin(),
        };
        match converter.convert(&formula, args.display()) {
            Ok(mathml) => println!("{mathml}"),
            Err(err) => exit_parse_error(&err, &formula),
        }
        return;
    };

    let mut replacer = Replacer::new(
        args.inline_delimiters(),
        args.block_delimiters(),
        args.ignore_escaped_delim,
        args.continue_on_error,
    );
    if path.as_os_str() == "-" {
        let html = read_stdin();
        match replace(&mut replacer, &html, &converter) {
            Ok(html) => print!("{html}"),
            Err(err) => exit_replace_error(&err, None),
        }
    } else if args.recursive {
        convert_tree(path, &mut replacer, &converter, args.dry_run);
    } else {
        convert_file(path, &mut replacer, &converter, args.dry_run);
    }
}

fn log_level(verbose: bool) -> Level {
    if verbose { Level::DEBUG } else { Level::WARN }
}

fn read_stdin() -> String {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .unwrap_or_else(|err| exit_io_error(&err));
    input
}

/// Replace every delimited formula in `html` with its MathML.
fn replace<'source>(
    replacer: &mut Replacer,
    html: &'source str,
    converter: &AsciiMathToMathML,
) -> Result<String, ReplaceError<'source>> {
    replacer.replace(html, |output, formula, display| {
        output.push_str(&converter.convert(formula, display)?);
        Ok(())
    })
}

/// Convert the `.html` files below `path`, descending into subdirectories.
fn convert_tree(
    path: &Path,
    replacer: &mut Replacer,
    converter: &AsciiMathToMathML,
    dry_run: bool,
) {
    if path.is_dir() {
        let entries = fs::read_dir(path).unwrap_or_else(|err| exit_io_error(&err));
        for entry in entries {
            match entry {
                Ok(entry) => convert_tree(&entry.path(), replacer, converter, dry_run),
                Err(err) => tracing::warn!(
                    dir = %path.display(),
                    error = %err,
                    "skipping unreadable directory entry"
                ),
            }
        }
    } else if path.extension().is_some_and(|ext| ext == "html") {
        convert_file(path, replacer, converter, dry_run);
    }
}

fn convert_file(
    path: &Path,
    replacer: &mut Replacer,
    converter: &AsciiMathToMathML,
    dry_run: bool,
) {
    tracing::debug!(path = %path.display(), "converting file");
    let html = fs::read_to_string(path).unwrap_or_else(|err| exit_io_error(&err));
    let converted = replace(replacer, &html, converter)
        .unwrap_or_else(|err| exit_replace_error(&err, Some(path)));
    if converted == html {
        tracing::debug!(path = %path.display(), "no formulas found");
    } else if !dry_run {
        fs::write(path, converted).unwrap_or_else(|err| exit_io_error(&err));
    }
}

fn exit_parse_error(err: &ParseError, formula: &str) -> ! {
    let source = ariadne::Source::from(formula);
    if err
        .to_report("<input>", true)
        .eprint(("<input>", source))
        .is_err()
    {
        eprintln!("Conversion error: {err}");
    }
    process::exit(2);
}

fn exit_replace_error(err: &ReplaceError<'_>, path: Option<&Path>) -> ! {
    match path {
        Some(path) => eprintln!("Conversion error in '{}': {err}", path.display()),
        None => eprintln!("Conversion error: {err}"),
    }
    process::exit(2);
}

fn exit_io_error(err: &io::Error) -> ! {
    eprintln!("IO error: {err}");
    process::exit(1);
}
