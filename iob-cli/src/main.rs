//! `corpus2iob`: converte corpora anotados (XML ou texto puro) para IOB

mod batch;
mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use iob_core::gazetteer::GazetteerTagger;
use iob_core::{AlignmentPipeline, Config, IobError, SourceMode};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.dump_config {
        println!("{}", Config::dump_default());
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            let code = err
                .downcast_ref::<IobError>()
                .map(IobError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let options = args.run_options();

    let mut pipeline = AlignmentPipeline::new(config, options)?;
    if options.source == SourceMode::Automatic {
        let model = args
            .model
            .clone()
            .or_else(|| pipeline.config().automatic.model.clone().map(Into::into));
        let tagger = match model {
            Some(path) => {
                let tagger = GazetteerTagger::load(&path)
                    .with_context(|| format!("carregando modelo {}", path.display()))?;
                info!(entries = tagger.len(), "Modelo {} carregado", path.display());
                tagger
            }
            None => {
                warn!("Nenhum modelo informado; todos os tokens sairão como O");
                GazetteerTagger::empty()
            }
        };
        pipeline = pipeline.with_tagger(tagger);
    } else if args.model.is_some() {
        warn!("--model é ignorado com --source golden");
    }

    let report = batch::run_batch(&pipeline, &args.files)?;
    info!(
        converted = report.converted.len(),
        failed = report.failed.len(),
        "Lote concluído"
    );

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
