//! Command-line interface for coqrst
//!
//! Usage:
//!   coqrst render `<notation>` [--format `<format>`]   - Render one notation
//!   coqrst formats                                   - List notation renderers
//!   coqrst page < notations.txt                      - Standalone notation reference page
//!   coqrst grep `<notation>` `<dir>`                   - Find uses of a notation in .v files
//!   coqrst highlight [`<file>`]                        - Highlight Coq source with coqdoc
//!   coqrst repl [--block `<options>`] `<sentence>`...  - Send sentences to coqtop
//!
//! Every command accepts `--config <file>` to layer a TOML file over the built-in
//! defaults, and `-v` (repeatable) for more logging on stderr.

use clap::{Arg, ArgAction, ArgMatches, Command};
use coqrst::coqtop::blocks::{make_rawsource, run_block, BlockOptions};
use coqrst::{Coqdoc, CoqtopSession, Highlighter, Repl, SessionSettings};
use coqrst_config::{CoqrstConfig, Loader};
use coqrst_notation::parse_notation;
use coqrst_render::formats::regexp::to_regex;
use coqrst_render::formats::{
    DoctreeJsonRenderer, DoctreeRenderer, EllipsisRenderer, HtmlRenderer, RegexpRenderer,
};
use coqrst_render::page::render_page;
use coqrst_render::RendererRegistry;
use std::fmt::Display;
use std::io::{self, BufRead, Read};
use tracing::Level;
use tracing_subscriber::prelude::*;

const CRATES: &[&str] = &[
    "coqrst",
    "coqrst_cli",
    "coqrst_config",
    "coqrst_notation",
    "coqrst_render",
];

fn main() {
    let matches = Command::new("coqrst")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Coq documentation tooling: notations, highlighting and coqtop transcripts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("More logging (-v debug, -vv trace)"),
        )
        .subcommand(
            Command::new("render")
                .about("Render a notation")
                .arg(Arg::new("notation").required(true).index(1))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Renderer name (see `coqrst formats`)")
                        .default_value("html"),
                ),
        )
        .subcommand(Command::new("formats").about("List available renderers"))
        .subcommand(
            Command::new("page")
                .about("Build the notation reference page; extra notations are read from stdin"),
        )
        .subcommand(
            Command::new("grep")
                .about("Search .v files for uses of a notation")
                .arg(Arg::new("notation").required(true).index(1))
                .arg(Arg::new("dir").required(true).index(2)),
        )
        .subcommand(
            Command::new("highlight")
                .about("Highlight Coq source with coqdoc")
                .arg(
                    Arg::new("file")
                        .index(1)
                        .help("Source file (default: stdin)"),
                ),
        )
        .subcommand(
            Command::new("repl")
                .about("Send sentences to coqtop and print the responses")
                .arg(
                    Arg::new("block")
                        .long("block")
                        .short('b')
                        .help("Run the sentences as one block with these comma-separated options"),
                )
                .arg(
                    Arg::new("sentences")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                ),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));
    let config = load_config(matches.get_one::<String>("config"));

    match matches.subcommand() {
        Some(("render", sub)) => handle_render_command(&config, sub),
        Some(("formats", _)) => handle_formats_command(&config),
        Some(("page", _)) => handle_page_command(&config),
        Some(("grep", sub)) => handle_grep_command(&config, sub),
        Some(("highlight", sub)) => handle_highlight_command(&config, sub),
        Some(("repl", sub)) => handle_repl_command(&config, sub),
        _ => fail("Unknown command"),
    }
}

fn fail(message: impl Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default()
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = CRATES
        .iter()
        .fold(tracing_subscriber::filter::Targets::new(), |targets, target| {
            targets.with_target(*target, level)
        });

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&String>) -> CoqrstConfig {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new(),
    };
    loader
        .build()
        .unwrap_or_else(|e| fail(format!("Configuration error: {}", e)))
}

/// Built-in renderers with the configured options
fn registry(config: &CoqrstConfig) -> RendererRegistry {
    let options = &config.notation;
    let mut registry = RendererRegistry::new();
    registry.register(HtmlRenderer::new(options.html.clone()));
    registry.register(DoctreeRenderer::new(options.doctree.clone()));
    registry.register(DoctreeJsonRenderer::new(options.doctree.clone()));
    registry.register(EllipsisRenderer::new(options.ellipsis.clone()));
    registry.register(RegexpRenderer::new(options.regexp.clone()));
    registry
}

/// Handle the render command
fn handle_render_command(config: &CoqrstConfig, matches: &ArgMatches) {
    let registry = registry(config);
    let format = arg(matches, "format");
    let output = registry
        .render_str(arg(matches, "notation"), format)
        .unwrap_or_else(|e| {
            eprintln!("Render error: {}", e);
            if !registry.has(format) {
                eprintln!("\nAvailable formats: {}", registry.list_renderers().join(", "));
            }
            std::process::exit(1);
        });
    println!("{}", output);
}

/// Handle the formats command
fn handle_formats_command(config: &CoqrstConfig) {
    let registry = registry(config);
    println!("Available formats:\n");
    for name in registry.list_renderers() {
        if let Ok(renderer) = registry.get(&name) {
            println!("  {}", name);
            println!("    {}", renderer.description());
            println!();
        }
    }
}

/// Handle the page command
fn handle_page_command(config: &CoqrstConfig) {
    let lines: Vec<String> = io::stdin()
        .lock()
        .lines()
        .collect::<Result<_, _>>()
        .unwrap_or_else(|e| fail(format!("Error reading stdin: {}", e)));
    let page = render_page(&lines, &config.notation.html)
        .unwrap_or_else(|e| fail(format!("Render error: {}", e)));
    print!("{}", page);
}

/// Handle the grep command
fn handle_grep_command(config: &CoqrstConfig, matches: &ArgMatches) {
    let notation = parse_notation(arg(matches, "notation"))
        .unwrap_or_else(|e| fail(format!("Invalid notation: {}", e)));
    let regex = to_regex(&notation, &config.notation.regexp)
        .unwrap_or_else(|e| fail(format!("Render error: {}", e)));
    tracing::debug!(regex = %regex, "searching");

    for entry in ignore::WalkBuilder::new(arg(matches, "dir")).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("{}", e);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("v") {
            continue;
        }
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!(path = %path.display(), "skipping unreadable file: {}", e);
                continue;
            }
        };
        for found in regex.find_iter(&source) {
            println!("{}:{}: {}", path.display(), found.start(), found.as_str());
        }
    }
}

/// Handle the highlight command
fn handle_highlight_command(config: &CoqrstConfig, matches: &ArgMatches) {
    let source = match matches.get_one::<String>("file") {
        Some(path) => std::fs::read_to_string(path)
            .unwrap_or_else(|e| fail(format!("Error reading {}: {}", path, e))),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .unwrap_or_else(|e| fail(format!("Error reading stdin: {}", e)));
            buffer
        }
    };

    let tokens = Coqdoc::from_config(&config.coqdoc)
        .highlight(&source)
        .unwrap_or_else(|e| fail(format!("Highlight error: {}", e)));
    for token in tokens {
        println!("{:?}\t{}", token.text, token.classes.join(" "));
    }
}

/// Handle the repl command
fn handle_repl_command(config: &CoqrstConfig, matches: &ArgMatches) {
    let sentences: Vec<&str> = matches
        .get_many::<String>("sentences")
        .map(|values| values.map(String::as_str).collect())
        .unwrap_or_default();

    let block = matches
        .get_one::<String>("block")
        .map(|options| {
            let options = options.split(',').map(str::trim).filter(|o| !o.is_empty());
            BlockOptions::parse_or_default(options).unwrap_or_else(|e| fail(e))
        });

    let mut session = CoqtopSession::new(SessionSettings::from(&config.coqtop))
        .unwrap_or_else(|e| fail(format!("Session error: {}", e)));
    session
        .open()
        .unwrap_or_else(|e| fail(format!("Session error: {}", e)));

    match block {
        Some(options) => {
            let exchanges = run_block(&mut session, &sentences.join(" "), &options)
                .unwrap_or_else(|e| fail(format!("Session error: {}", e)));
            println!("{}", make_rawsource(&exchanges, &options));
        }
        None => {
            for sentence in sentences {
                let response = session
                    .sendone(sentence)
                    .unwrap_or_else(|e| fail(format!("Session error: {}", e)));
                println!("{}", "=".repeat(40));
                println!("{}", sentence);
                println!("{}", "-".repeat(40));
                println!("{}", response);
            }
        }
    }
}
