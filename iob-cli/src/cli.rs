//! Argumentos de linha de comando do `corpus2iob`

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use iob_core::{InputFormat, RunOptions, SourceMode};

/// Converte um corpus (XML ou texto puro) para IOB.
#[derive(Parser, Debug)]
#[command(name = "corpus2iob", version)]
#[command(about = "Converte um corpus (XML ou texto puro) para o formato IOB")]
#[command(after_help = "--source golden exige --format xml: texto puro não carrega anotações \
e a combinação golden + text é rejeitada como erro de configuração.")]
pub struct Args {
    /// Origem das tags de entidade ("golden" = XML com as anotações de referência;
    /// não combina com --format text)
    #[arg(short, long, value_enum, default_value_t = SourceArg::Automatic)]
    pub source: SourceArg,

    /// Formato dos arquivos de entrada
    #[arg(short, long, value_enum, default_value_t = FormatArg::Xml)]
    pub format: FormatArg,

    /// Modelo do tagger (arquivo JSON de gazetteer; apenas com --source automatic)
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Arquivo de configuração JSON
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Imprime a configuração padrão e sai
    #[arg(short, long)]
    pub dump_config: bool,

    /// Arquivos do corpus
    #[arg(required_unless_present = "dump_config")]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    #[value(alias = "spacy")]
    Automatic,
    Golden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    #[value(alias = "markup")]
    Xml,
}

impl Args {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            source: match self.source {
                SourceArg::Automatic => SourceMode::Automatic,
                SourceArg::Golden => SourceMode::Golden,
            },
            format: match self.format {
                FormatArg::Text => InputFormat::Text,
                FormatArg::Xml => InputFormat::Markup,
            },
        }
    }
}
