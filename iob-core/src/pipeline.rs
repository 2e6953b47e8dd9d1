//! # Pipeline de Alinhamento
//!
//! Coordena os módulos (tokenizador, extração de marcação, localização de spans,
//! montagem BIO) para converter um documento inteiro em linhas IOB.
//!
//! ## Fluxo por segmento
//!
//! 1. Tokeniza o texto do segmento (agrupado por sentença).
//! 2. **Golden**: converte as menções da marcação em [`EntityMention`], localiza
//!    cada uma em ordem ([`locate_mentions`]) e monta as tags a partir dos spans.
//! 3. **Automático**: pede ao [`Tagger`] as predições por token e só as reformata.
//!
//! Segmentos são independentes entre si: o documento é processado em paralelo
//! com `rayon` e o resultado é coletado na ordem original. Um erro em qualquer
//! segmento aborta o documento inteiro.

use std::sync::OnceLock;

use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, info};

use crate::assembler::{render, BioAssembler};
use crate::config::{Config, InputFormat, RunOptions, SourceMode};
use crate::error::Result;
use crate::gazetteer::GazetteerTagger;
use crate::mapping::TokenMapper;
use crate::markup::{MarkupExtractor, Record};
use crate::span::{locate_mentions, EntityMention};
use crate::tagger::{TaggedToken, Tagger};
use crate::tokenizer::{StandardTokenizer, Token, Tokenizer};

/// Unidade de processamento, já resolvida para o modo de origem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Registro da marcação com suas menções de referência.
    Golden(Record),
    /// Texto a ser etiquetado pelo tagger.
    Automatic(String),
}

/// O pipeline de conversão.
///
/// A configuração é imutável depois de construída; o mesmo pipeline pode ser
/// compartilhado entre threads.
pub struct AlignmentPipeline {
    config: Config,
    options: RunOptions,
    mapper: TokenMapper,
    assembler: BioAssembler,
    tokenizer: Box<dyn Tokenizer>,
    tagger: Box<dyn Tagger>,
}

impl AlignmentPipeline {
    /// Cria o pipeline com o tokenizador padrão e um gazetteer vazio.
    pub fn new(config: Config, options: RunOptions) -> Result<Self> {
        config.validate()?;
        options.validate()?;
        let mapper = TokenMapper::new(config.mapping_for(options.source).clone());
        let assembler = BioAssembler::new(config.automatic.split_sentences);
        Ok(Self {
            config,
            options,
            mapper,
            assembler,
            tokenizer: Box::new(StandardTokenizer),
            tagger: Box::new(GazetteerTagger::empty()),
        })
    }

    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    pub fn with_tagger(mut self, tagger: impl Tagger + 'static) -> Self {
        self.tagger = Box::new(tagger);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Divide o documento em segmentos conforme o formato de entrada.
    ///
    /// Texto: uma linha não vazia por segmento. Marcação: um registro por segmento.
    pub fn segments(&self, input: &str) -> Result<Vec<Segment>> {
        match self.options.format {
            InputFormat::Text => Ok(input
                .lines()
                .map(collapse_whitespace)
                .filter(|line| !line.is_empty())
                .map(Segment::Automatic)
                .collect()),
            InputFormat::Markup => {
                let records = MarkupExtractor::new(&self.config.golden).records(input)?;
                Ok(records
                    .into_iter()
                    .map(|record| match self.options.source {
                        SourceMode::Golden => Segment::Golden(record),
                        SourceMode::Automatic => Segment::Automatic(record.text),
                    })
                    .collect())
            }
        }
    }

    /// Processa um segmento: uma [`TaggedToken`] por token, em ordem.
    pub fn process_segment(&self, segment: &Segment) -> Result<Vec<TaggedToken>> {
        match segment {
            Segment::Golden(record) => {
                let sentences = self.tokenizer.sentences(&record.text);
                let tokens: Vec<Token> = sentences.iter().flatten().cloned().collect();
                let mentions = record.golden_mentions(&tokens, &self.config.golden)?;
                debug!(tokens = tokens.len(), mentions = mentions.len(), "segmento golden");
                self.align(&sentences, &mentions)
            }
            Segment::Automatic(text) => {
                let raw = self.tagger.tag(text);
                debug!(tokens = raw.len(), "segmento automático");
                Ok(self.assembler.assemble_automatic(&raw, &self.mapper))
            }
        }
    }

    /// Alinha menções já extraídas a uma tokenização agrupada por sentença.
    pub fn align(&self, sentences: &[Vec<Token>], mentions: &[EntityMention]) -> Result<Vec<TaggedToken>> {
        let tokens: Vec<Token> = sentences.iter().flatten().cloned().collect();
        let spans = locate_mentions(mentions, &tokens, self.tokenizer.as_ref(), &self.mapper)?;
        Ok(self.assembler.assemble_golden(sentences, &spans))
    }

    /// Processa todos os segmentos do documento, preservando a ordem.
    pub fn process_document(&self, input: &str) -> Result<Vec<TaggedToken>> {
        let segments = self.segments(input)?;
        let per_segment: Vec<Vec<TaggedToken>> = segments
            .par_iter()
            .map(|segment| self.process_segment(segment))
            .collect::<Result<_>>()?;

        let tagged: Vec<TaggedToken> = per_segment.into_iter().flatten().collect();
        info!(segments = segments.len(), tokens = tagged.len(), "documento convertido");
        Ok(tagged)
    }

    /// Converte o documento para o texto IOB final.
    pub fn convert(&self, input: &str) -> Result<String> {
        let tagged = self.process_document(input)?;
        Ok(render(&tagged, &self.config.general.iob_separator))
    }
}

fn collapse_whitespace(line: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("regex constante"));
    re.replace_all(line.trim(), " ").into_owned()
}
