use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use serde_form_tree::{DecodeOptions, EncodeOptions};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "formtree",
    version,
    about = "Form body (application/x-www-form-urlencoded) to JSON and back"
)]
struct Args {
    /// Input file path (.json, .form or .txt). Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Force encode mode: JSON in, form body out.
    #[arg(short = 'e', long, conflicts_with = "decode")]
    encode: bool,

    /// Force decode mode: form body in, JSON out.
    #[arg(short = 'd', long)]
    decode: bool,

    /// Pretty-print decoded JSON instead of canonical text.
    #[arg(long)]
    pretty: bool,

    /// Indentation size for --pretty (default: 2).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,

    /// Maximum segments per key; 0 falls back to the hard ceiling of 512.
    #[arg(long = "max-depth", value_name = "number", default_value_t = serde_form_tree::constants::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum pairs per body; 0 disables the limit.
    #[arg(long = "max-pairs", value_name = "number", default_value_t = serde_form_tree::constants::DEFAULT_MAX_PAIRS)]
    max_pairs: usize,

    /// Write scalar array elements with explicit indices (`a[0]`) instead of `a[]`.
    #[arg(long)]
    indexed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Encode,
    Decode,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (input_text, input_source) = read_input(args.input.as_deref())?;
    let mode = resolve_mode(&args, &input_source)?;
    debug!(?mode, ?input_source, bytes = input_text.len(), "starting");

    match mode {
        Mode::Encode => run_encode(&args, &input_text, &input_source),
        Mode::Decode => run_decode(&args, &input_text, &input_source),
    }
}

fn run_encode(args: &Args, input: &str, input_source: &InputSource) -> Result<(), Box<dyn Error>> {
    let value: Value = serde_json::from_str(input)?;
    let options = EncodeOptions::new().with_append_scalars(!args.indexed);
    let body = serde_form_tree::to_form_with_options(&value, &options)?;

    let output_target = OutputTarget::from_arg(args.output.as_deref());
    write_output(output_target.path(), body.as_bytes())?;
    if let OutputTarget::File(path) = &output_target {
        report_status(Mode::Encode, input_source, path);
    }
    Ok(())
}

fn run_decode(args: &Args, input: &str, input_source: &InputSource) -> Result<(), Box<dyn Error>> {
    let options = DecodeOptions::new()
        .with_max_depth(limit(args.max_depth))
        .with_max_pairs(limit(args.max_pairs));
    let value = serde_form_tree::decode_with_options(strip_line_ending(input), &options)?;

    let output_target = OutputTarget::from_arg(args.output.as_deref());
    with_output_writer(output_target.path(), |writer| {
        if args.pretty {
            write_pretty_json(writer, &value, args.indent)
        } else {
            writer.write_all(serde_form_tree::encode(&value).as_bytes())?;
            Ok(())
        }
    })?;
    if let OutputTarget::File(path) = &output_target {
        report_status(Mode::Decode, input_source, path);
    }
    Ok(())
}

fn limit(value: usize) -> Option<usize> {
    (value > 0).then_some(value)
}

// Bodies saved by editors or piped through `echo` end with a newline that is
// not part of the last value.
fn strip_line_ending(input: &str) -> &str {
    input
        .strip_suffix("\r\n")
        .or_else(|| input.strip_suffix('\n'))
        .unwrap_or(input)
}

fn resolve_mode(args: &Args, input_source: &InputSource) -> Result<Mode, Box<dyn Error>> {
    if args.encode {
        return Ok(Mode::Encode);
    }

    if args.decode {
        return Ok(Mode::Decode);
    }

    match input_source {
        InputSource::Stdin => Ok(Mode::Decode),
        InputSource::File(path) => match Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Mode::Encode),
            Some("form") | Some("txt") => Ok(Mode::Decode),
            _ => Err("unable to auto-detect mode; use --encode or --decode".into()),
        },
    }
}

fn read_input(input: Option<&str>) -> Result<(String, InputSource), Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let buf = fs::read_to_string(path)?;
            Ok((buf, InputSource::File(path.to_string())))
        }
    }
}

#[derive(Clone, Debug)]
enum OutputTarget {
    Stdout,
    File(String),
}

impl OutputTarget {
    fn from_arg(output: Option<&str>) -> Self {
        match output {
            Some(path) if path != "-" => OutputTarget::File(path.to_string()),
            _ => OutputTarget::Stdout,
        }
    }

    fn path(&self) -> Option<&str> {
        match self {
            OutputTarget::Stdout => None,
            OutputTarget::File(path) => Some(path.as_str()),
        }
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn write_output(path: Option<&str>, data: &[u8]) -> Result<(), Box<dyn Error>> {
    with_output_writer(path, |writer| {
        writer.write_all(data)?;
        Ok(())
    })
}

fn write_pretty_json(
    writer: &mut dyn Write,
    value: &Value,
    indent: usize,
) -> Result<(), Box<dyn Error>> {
    if indent == 0 {
        serde_json::to_writer(writer, value)?;
        return Ok(());
    }

    let indent_bytes = vec![b' '; indent];
    let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)?;
    Ok(())
}

fn report_status(mode: Mode, input_source: &InputSource, output_path: &str) {
    let input_label = match input_source {
        InputSource::Stdin => "stdin".to_string(),
        InputSource::File(path) => path.clone(),
    };
    let verb = match mode {
        Mode::Encode => "Encoded",
        Mode::Decode => "Decoded",
    };
    println!("✔ {verb} {input_label} → {output_path}");
}
