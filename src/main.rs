/*!
 * Command-line interface for tokemon
 */

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use tokemon::config::{Args, Command};
use tokemon::factory::{build_model_lister, build_tokenizer};
use tokemon::provider::{AsyncModelLister, ModelLister};
use tokemon::report::{ModelsReport, ReportFormat, Reporter};
use tokemon::tokenizer::{AsyncTokenizer, Tokenizer};
use tokemon::{AnyModelLister, AnyTokenizer, Mode, Provider, TokemonResult};

fn main() {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(args) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> TokemonResult<()> {
    match args.command {
        Command::Count {
            provider,
            model,
            mode,
            file,
            json,
            text,
        } => {
            let text = read_input(text, file)?;
            let tokenizer = build_tokenizer(&model, provider, mode)?;
            let response = match &tokenizer {
                AnyTokenizer::Sync(_, tokenizer) => tokenizer.count_tokens(&text)?,
                AnyTokenizer::Async(_, tokenizer) => {
                    runtime()?.block_on(tokenizer.count_tokens(&text))?
                }
            };

            let reporter = Reporter::new(ReportFormat::from_json_flag(json));
            println!("{}", reporter.count_report(&response)?);
            Ok(())
        }
        Command::Models {
            provider,
            mode,
            json,
        } => list_models(provider, mode, json),
        Command::Completions { shell } => {
            let mut command = Args::command();
            let name = command.get_name().to_string();
            generate(shell, &mut command, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn list_models(provider: Provider, mode: Mode, json: bool) -> TokemonResult<()> {
    let lister = build_model_lister(provider, mode)?;
    let models = match &lister {
        AnyModelLister::Sync(_, lister) => lister.models()?,
        AnyModelLister::Async(_, lister) => runtime()?.block_on(lister.models())?,
    };

    let report = ModelsReport {
        provider,
        models: &models,
        cache: lister.cache_stats(),
    };
    let reporter = Reporter::new(ReportFormat::from_json_flag(json));
    println!("{}", reporter.models_report(&report)?);
    Ok(())
}

fn read_input(text: Option<String>, file: Option<PathBuf>) -> TokemonResult<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => Ok(fs::read_to_string(path)?),
        (None, None) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn runtime() -> TokemonResult<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}
