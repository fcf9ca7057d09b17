use clap::{Arg, ArgAction, Command};
use std::io::IsTerminal;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use shaderlab::formatting::{self, Identity, Terminal};
use shaderlab::parsing;
use shaderlab::pipeline::{self, Registry, Request};

mod problem;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("shaderlab")
        .version(VERSION)
        .propagate_version(true)
        .about("Parse, splice, and reassemble ShaderLab shaders.")
        .disable_help_subcommand(true)
        .subcommand(
            Command::new("check")
                .about("Syntax check the given shader")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the shader you want to check, or '-' to read standard input."),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Code format the given shader")
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes for syntax highlighting even if output is redirected to a pipe or file."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the shader you want to format, or '-' to read standard input."),
                ),
        )
        .subcommand(
            Command::new("splice")
                .about("Rewrite the passes of the given shader to draw particles")
                .arg(
                    Arg::new("request")
                        .long("request")
                        .required(true)
                        .help("A JSON file describing the shader family, target, material, and particle inputs."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the generated shader you want to rewrite, or '-' to read standard input."),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("check", submatches)) => {
            let filename = submatches
                .get_one::<String>("filename")
                .unwrap(); // argument is required
            let filename = Path::new(filename);

            let content = load_or_exit(filename);
            match parsing::parse(&content) {
                Ok(document) => {
                    let count = document
                        .passes
                        .len();
                    println!(
                        "{}: {} pass{}",
                        filename.display(),
                        count,
                        if count == 1 { "" } else { "es" }
                    );
                }
                Err(error) => {
                    eprintln!(
                        "{}",
                        problem::full_parsing_error(&error, filename, &content, &Terminal)
                    );
                    std::process::exit(1);
                }
            }
        }
        Some(("format", submatches)) => {
            let raw_output = submatches.get_flag("raw-control-chars");
            let filename = submatches
                .get_one::<String>("filename")
                .unwrap(); // argument is required
            let filename = Path::new(filename);

            let content = load_or_exit(filename);
            let document = match parsing::parse(&content) {
                Ok(document) => document,
                Err(error) => {
                    eprintln!(
                        "{}",
                        problem::concise_parsing_error(&error, filename, &content, &Terminal)
                    );
                    std::process::exit(1);
                }
            };

            let result = if raw_output
                || std::io::stdout().is_terminal()
            {
                formatting::render(&Terminal, &document)
            } else {
                formatting::render(&Identity, &document)
            };

            print!("{}", result);
        }
        Some(("splice", submatches)) => {
            let request = submatches
                .get_one::<String>("request")
                .unwrap(); // argument is required
            let request = Path::new(request);
            let filename = submatches
                .get_one::<String>("filename")
                .unwrap(); // argument is required
            let filename = Path::new(filename);

            let json = load_or_exit(request);
            let request = match Request::from_json(&json) {
                Ok(request) => request,
                Err(error) => {
                    eprintln!(
                        "{}",
                        problem::concise_generation_error(&error, request, &json, &Terminal)
                    );
                    std::process::exit(1);
                }
            };
            debug!(?request);

            let content = load_or_exit(filename);
            let registry = Registry::builtin();

            match pipeline::generate(&content, &request, &registry) {
                Ok(result) => print!("{}", result),
                Err(error) => {
                    eprintln!(
                        "{}",
                        problem::full_generation_error(&error, filename, &content, &Terminal)
                    );
                    std::process::exit(1);
                }
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: shaderlab [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn load_or_exit(filename: &Path) -> String {
    match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            std::process::exit(1);
        }
    }
}
