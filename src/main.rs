use anyhow::{Context, Result};
use circuitikz::config::Config;
use circuitikz::parser::options::apply_option_line;
use circuitikz::{logging, split_cell, DiagramRenderer};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "circuitikz")]
#[command(
    about = "Render Circuitikz/TikZ diagrams to PNG or SVG with the LaTeX toolchain",
    long_about = None
)]
struct Args {
    /// Render options as key=value pairs: filename, dpi, options, format (png|svg)
    options: Vec<String>,

    /// Diagram source file (reads stdin when omitted). A leading `%circuitikz ...` line is
    /// read as options.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory receiving the rendered image
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// JSON config file with toolchain and default options
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, env = "CIRCUITIKZ_PDFLATEX")]
    pdflatex: Option<String>,

    #[arg(long, env = "CIRCUITIKZ_PDFCROP")]
    pdfcrop: Option<String>,

    #[arg(long, env = "CIRCUITIKZ_CONVERT")]
    convert: Option<String>,

    #[arg(long, env = "CIRCUITIKZ_PDF2SVG")]
    pdf2svg: Option<String>,

    /// Print a JSON description of the artifact instead of its path
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(p) = args.pdflatex {
        config.toolchain.pdflatex = p;
    }
    if let Some(p) = args.pdfcrop {
        config.toolchain.pdfcrop = p;
    }
    if let Some(p) = args.convert {
        config.toolchain.convert = p;
    }
    if let Some(p) = args.pdf2svg {
        config.toolchain.pdf2svg = p;
    }

    // Read diagram source
    let text = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read diagram source from stdin")?;
            buf
        }
    };

    let (magic_line, source) = split_cell(&text);

    // Magic-line options first so command-line tokens win
    let mut options = config.defaults.clone();
    if let Some(line) = magic_line {
        apply_option_line(&mut options, line);
    }
    apply_option_line(&mut options, &args.options.join(" "));

    let renderer = DiagramRenderer::new(config.toolchain, args.output_dir);
    let artifact = renderer
        .render(&options, source)
        .context("Failed to render diagram")?;

    if args.json {
        let json = serde_json::to_string_pretty(&artifact.summary())
            .context("Failed to serialize artifact summary")?;
        println!("{}", json);
    } else {
        println!("{}", artifact.path().display());
    }

    Ok(())
}
