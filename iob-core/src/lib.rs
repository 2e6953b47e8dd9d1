//! # iob-core: Conversão de Corpus Anotado para Sequências BIO/IOB
//!
//! Este crate transforma corpora anotados (texto puro ou marcação XML com menções
//! de entidade) em uma linha por token no formato IOB, a entrada padrão de
//! modelos de rotulagem de sequências.
//!
//! ## Arquitetura do Sistema
//!
//! O núcleo é o **alinhamento de menções a tokens**: dada uma tokenização
//! independente do texto e a lista de menções (texto + tipo), localizar o
//! intervalo exato de cada menção e produzir uma rotulagem BIO sem sobreposição.
//!
//! 1.  **Entrada**: Documento bruto (String), dividido em segmentos ([`pipeline`]).
//! 2.  **Extração** ([`markup`]): Registros da marcação com texto puro e menções em ordem.
//! 3.  **Tokenização** ([`tokenizer`]): Tokens e sentenças de cada segmento.
//! 4.  **Localização** ([`span`]): Cada menção vira um intervalo `[start, end)` de tokens.
//! 5.  **Montagem** ([`assembler`]): Uma tag BIO por token, com rótulos de [`mapping`].
//! 6.  **Saída**: Linhas `"{token}{separador}{tag}"`.
//!
//! No modo automático, os passos 2 e 4 são substituídos pelas predições de um
//! [`tagger::Tagger`] (por padrão o [`gazetteer::GazetteerTagger`]).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use iob_core::{AlignmentPipeline, Config, InputFormat, RunOptions, SourceMode};
//!
//! let options = RunOptions { source: SourceMode::Golden, format: InputFormat::Markup };
//! let pipeline = AlignmentPipeline::new(Config::default(), options).unwrap();
//!
//! let xml = r#"<q><entity type="person">John Smith</entity> works at <entity type="org">Acme</entity></q>"#;
//! let iob = pipeline.convert(xml).unwrap();
//!
//! assert_eq!(iob, "John\tB-PER\nSmith\tI-PER\nworks\tO\nat\tO\nAcme\tB-ORG");
//! ```

pub mod assembler;
pub mod config;
pub mod error;
pub mod gazetteer;
pub mod mapping;
pub mod markup;
pub mod pipeline;
pub mod span;
pub mod tagger;
pub mod tokenizer;

pub use assembler::{render, BioAssembler};
pub use config::{Config, InputFormat, RunOptions, SourceMode};
pub use error::{IobError, Result};
pub use mapping::{TokenMapper, TypeMapping};
pub use pipeline::{AlignmentPipeline, Segment};
pub use span::{EntityMention, EntitySpan};
pub use tagger::{Tag, TaggedToken};
pub use tokenizer::{Token, Tokenizer};
