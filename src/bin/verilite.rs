// Copyright (c) 2016-2021 Fabian Schuiki

//! A front-end for a subset of Verilog.

#[macro_use]
extern crate log;

use clap::{App, Arg, ArgMatches};
use serde::Serialize;
use verilite::common::errors::{CompileResult, CompilerError, Severity};
use verilite::common::source::SourceText;
use verilite::driver::{self, Compilation};
use verilite::svlog::ast::ModuleNode;
use verilite::svlog::lexer::Token;
use verilite::svlog::print::AstPrinter;
use verilite::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emit {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    file: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tokens: Option<Vec<&'a Token>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ast: Option<&'a ModuleNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a CompilerError>,
    warnings: &'a [CompilerError],
}

fn main() {
    let matches = App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("A front-end for a subset of Verilog.")
        .arg(
            Arg::with_name("verbosity")
                .short("v")
                .multiple(true)
                .help("Increase message verbosity"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .help("Silence all output"),
        )
        .arg(
            Arg::with_name("verbosity-opts")
                .short("V")
                .help("Sets verbosity settings")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .possible_values(&["tokens", "ast", "symbols", "warnings"]),
        )
        .arg(
            Arg::with_name("emit")
                .long("emit")
                .value_name("FORMAT")
                .help("Output format")
                .takes_value(true)
                .possible_values(&["text", "json"])
                .default_value("text"),
        )
        .arg(
            Arg::with_name("context")
                .long("context")
                .value_name("N")
                .help("Number of source lines shown around errors")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("werror")
                .long("Werror")
                .help("Treat warnings as errors"),
        )
        .arg(
            Arg::with_name("INPUT")
                .help("The input files to compile")
                .multiple(true)
                .required(true),
        )
        .get_matches();

    // Configure the logger.
    let verbose = matches.occurrences_of("verbosity");
    let quiet = matches.is_present("quiet");
    let mut logger = pretty_env_logger::formatted_builder();
    if quiet {
        logger.filter_level(log::LevelFilter::Off);
    } else if verbose > 0 {
        logger.filter_level(match verbose {
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        });
    } else if let Ok(filters) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    } else {
        logger.filter_level(log::LevelFilter::Warn);
    }
    logger.init();

    // Configure the session.
    let mut session = Session::new();
    session.opts.warnings_as_errors = matches.is_present("werror");
    if let Some(n) = matches.value_of("context") {
        session.opts.context_lines = n.parse().unwrap_or_else(|_| {
            clap::Error {
                message: format!("invalid value for 'context': {}", n),
                kind: clap::ErrorKind::InvalidValue,
                info: None,
            }
            .exit()
        });
    }
    for v in matches
        .values_of("verbosity-opts")
        .into_iter()
        .flat_map(|v| v)
    {
        session.opts.verbosity |= match v {
            "tokens" => Verbosity::TOKENS,
            "ast" => Verbosity::AST,
            "symbols" => Verbosity::SYMBOLS,
            "warnings" => Verbosity::WARNINGS,
            _ => unreachable!(),
        };
    }

    if !compile(&session, &matches) {
        std::process::exit(1);
    }
}

/// Compile each input file independently. Returns whether all succeeded.
fn compile(sess: &Session, matches: &ArgMatches) -> bool {
    let emit = match matches.value_of("emit") {
        Some("json") => Emit::Json,
        _ => Emit::Text,
    };
    let mut failed = false;
    for filename in matches.values_of("INPUT").into_iter().flatten() {
        let source = match SourceText::open(filename) {
            Ok(s) => s,
            Err(e) => {
                eprint!("{}", e.rendered(Severity::Error, None));
                failed = true;
                continue;
            }
        };
        let result = driver::compile(sess, &source);
        if result.is_err() {
            failed = true;
        }
        match emit {
            Emit::Text => emit_text(sess, &source, &result),
            Emit::Json => {
                if !emit_json(&source, &result) {
                    failed = true;
                }
            }
        }
    }
    !failed
}

fn emit_text(sess: &Session, source: &SourceText, result: &CompileResult<Compilation>) {
    match result {
        Ok(comp) => {
            for warning in &comp.warnings {
                eprint!("{}", warning.rendered(Severity::Warning, Some(source)));
            }
            if sess.has_verbosity(Verbosity::TOKENS) {
                for tkn in comp.tokens.iter().filter(|t| !t.is_eof()) {
                    println!(
                        "{:3}:{:3} {:15} '{}'",
                        tkn.line,
                        tkn.column,
                        tkn.kind.name(),
                        tkn.text
                    );
                }
            }
            if sess.has_verbosity(Verbosity::AST) {
                print!("{}", AstPrinter::print(&comp.module));
            }
            if sess.has_verbosity(Verbosity::SYMBOLS) {
                print!("{}", comp.symbols);
            }
            info!("{}: {}", source.name(), comp.summary());
        }
        Err(err) => {
            eprint!("{}", err.rendered(Severity::Error, Some(source)));
        }
    }
    if sess.has_verbosity(Verbosity::WARNINGS) {
        let reporter = driver::report(sess, source, result);
        eprintln!("{}", reporter.generate_report(true));
    }
}

fn emit_json(source: &SourceText, result: &CompileResult<Compilation>) -> bool {
    let output = match result {
        Ok(comp) => JsonOutput {
            file: source.name(),
            tokens: Some(comp.tokens.iter().filter(|t| !t.is_eof()).collect()),
            ast: Some(&comp.module),
            error: None,
            warnings: &comp.warnings,
        },
        Err(err) => JsonOutput {
            file: source.name(),
            tokens: None,
            ast: None,
            error: Some(err),
            warnings: &[],
        },
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            error!("Unable to serialize `{}`: {}", source.name(), e);
            false
        }
    }
}
