//! # Esquema de Tags BIO
//!
//! Define o esquema de anotação **BIO** (Beginning-Inside-Outside) da saída.
//! Diferente de um tagset fechado, os rótulos aqui são strings: vêm da tabela
//! de mapeamento configurada e tipos não mapeados passam como estão.
//!
//! - `B-TAG`: Begin, primeiro token de uma entidade
//! - `I-TAG`: Inside, tokens subsequentes da mesma entidade
//! - `O`: Outside, não é parte de nenhuma entidade
//!
//! Também define o contrato do colaborador de modo automático ([`Tagger`]):
//! predições por token em IOB bruto, com o tipo ainda não mapeado.

use serde::{Deserialize, Serialize};

use crate::span::EntitySpan;

/// Tag BIO aplicada a um token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// **Begin**: Marca o INÍCIO de uma entidade. Ex: **John** (B-PER) Smith.
    Begin(String),
    /// **Inside**: Marca a CONTINUAÇÃO de uma entidade. Ex: John **Smith** (I-PER).
    Inside(String),
    /// **Outside**: O token não faz parte de nenhuma entidade.
    Outside,
}

impl Tag {
    /// Representação textual da tag (ex: "B-PER", "I-ORG", "O")
    pub fn label(&self) -> String {
        match self {
            Tag::Begin(label) => format!("B-{}", label),
            Tag::Inside(label) => format!("I-{}", label),
            Tag::Outside => "O".to_string(),
        }
    }
}

/// Utilitários de verificação usados pelos testes de montagem.
#[cfg(test)]
impl Tag {
    /// Verifica se a transição tag_prev → self é válida no esquema BIO
    ///
    /// Regras:
    /// - `I-X` só pode seguir `B-X` ou `I-X` (mesmo rótulo)
    /// - `B-X` pode seguir qualquer tag
    /// - `O` pode seguir qualquer tag
    pub fn is_valid_transition(prev: &Tag, next: &Tag) -> bool {
        match next {
            Tag::Inside(label) => match prev {
                Tag::Begin(prev_label) | Tag::Inside(prev_label) => prev_label == label,
                Tag::Outside => false,
            },
            _ => true,
        }
    }

    /// Parseia uma tag a partir de string (ex: "B-PER" → Begin("PER"))
    pub fn from_label(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(Tag::Outside);
        }
        let (prefix, label) = s.split_once('-')?;
        if label.is_empty() {
            return None;
        }
        match prefix {
            "B" => Some(Tag::Begin(label.to_string())),
            "I" => Some(Tag::Inside(label.to_string())),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Uma linha da saída: token, tag e marca de fim de segmento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub tag: Tag,
    /// Último token de uma sentença com `split_sentences` ativo.
    pub segment_break: bool,
}

impl TaggedToken {
    /// Linha `"{texto}{sep}{tag}"`; com quebra de segmento, termina em `'\n'`.
    pub fn line(&self, sep: &str) -> String {
        let mut line = format!("{}{}{}", self.text, sep, self.tag);
        if self.segment_break {
            line.push('\n');
        }
        line
    }
}

/// Prefixo IOB bruto produzido por um tagger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Iob {
    B,
    I,
    O,
}

/// Predição de um tagger para um token, antes do mapeamento de tipos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTaggedToken {
    pub text: String,
    pub iob: Iob,
    /// Tipo bruto da entidade (vazio quando `iob == O`).
    pub entity_type: String,
    /// Último token da sentença segundo o segmentador do tagger.
    pub sentence_end: bool,
}

/// Colaborador de modo automático: etiqueta um texto token a token.
pub trait Tagger: Send + Sync {
    fn tag(&self, text: &str) -> Vec<RawTaggedToken>;
}

/// Reconstrói os spans de entidade de uma sequência BIO.
///
/// Máquina de estados do esquema BIO:
/// - Inicia uma nova entidade ao encontrar `B-XXX`.
/// - Continua a entidade enquanto encontrar `I-XXX` do **mesmo** rótulo.
/// - Finaliza a entidade ao encontrar `O`, `B-YYY` ou `I-YYY` (de outro rótulo).
///
/// `I-XXX` órfão (sem `B-` anterior) não abre entidade.
///
/// # Exemplo
/// `[B-PER, I-PER, O, B-LOC]` -> `[[0,2) PER, [3,4) LOC]`
pub fn tags_to_spans(tagged: &[TaggedToken]) -> Vec<EntitySpan> {
    let mut spans = Vec::new();
    let mut i = 0;

    while i < tagged.len() {
        if let Tag::Begin(label) = &tagged[i].tag {
            let mut j = i + 1;
            while j < tagged.len() {
                match &tagged[j].tag {
                    Tag::Inside(next) if next == label => j += 1,
                    _ => break,
                }
            }
            spans.push(EntitySpan {
                start: i,
                end: j,
                label: label.clone(),
            });
            i = j;
        } else {
            i += 1;
        }
    }

    spans
}
