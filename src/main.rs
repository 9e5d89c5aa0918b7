//! deptree CLI entry point.

use std::fs;
use std::io::{self, Read, Write};
use std::process;

use clap::Parser;
use log::LevelFilter;

use deptree::{RenderConfig, render_edge_list, structured_edge_list};

/// Render a dependency edge list as a text diagram.
#[derive(Parser, Debug)]
#[command(
    name = "deptree",
    version = env!("DEPTREE_VERSION"),
    about = "Render a dependency edge list as a box-drawing text diagram"
)]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<String>,

    /// Node to start from; defaults to the first declared node
    #[arg(short = 'e', long = "entrypoint")]
    entrypoints: Vec<String>,

    /// Print the {tree, circularDependencies, errors} JSON document instead
    #[arg(long)]
    json: bool,

    /// Use plain ASCII instead of Unicode box-drawing characters
    #[arg(short = 'a', long = "ascii")]
    use_ascii: bool,

    /// Horizontal indentation per level
    #[arg(long = "indent", default_value = "2")]
    indent: usize,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Read input from file or stdin
    let text = if let Some(ref path) = cli.input {
        match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", path, e);
                process::exit(1);
            }
        }
    } else {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            eprintln!("error: cannot read stdin: {}", e);
            process::exit(1);
        }
        buf
    };

    // Render
    let result = if cli.json {
        structured_edge_list(&text, &cli.entrypoints).map(|mut json| {
            json.push('\n');
            json
        })
    } else {
        let config = RenderConfig {
            unicode: !cli.use_ascii,
            indent: cli.indent,
        };
        render_edge_list(&text, &cli.entrypoints, &config)
    };
    let rendered = match result {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    // Write output to file or stdout
    if let Some(ref path) = cli.output {
        if let Err(e) = fs::write(path, rendered) {
            eprintln!("error: cannot write '{}': {}", path, e);
            process::exit(1);
        }
    } else {
        print!("{}", rendered);
        if let Err(e) = io::stdout().flush() {
            eprintln!("error: cannot flush stdout: {}", e);
            process::exit(1);
        }
    }
}
