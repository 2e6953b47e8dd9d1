//! # Localização de Menções na Sequência de Tokens
//!
//! Uma menção de entidade chega como texto bruto (ex: `"John Smith"`) e precisa
//! virar um intervalo de tokens `[start, end)` dentro da tokenização do segmento.
//!
//! ## Algoritmo
//! 1. Tokeniza a menção com o mesmo tokenizador do segmento.
//! 2. Percorre as posições candidatas `i` a partir de `search_from`, em ordem crescente.
//! 3. Compara a janela `haystack[i..i+n]` token a token (igualdade exata).
//! 4. Retorna a primeira janela que coincide.
//!
//! As menções chegam em ordem de documento e cada busca começa onde a anterior
//! terminou, então textos repetidos (`"Sam met Sam"`) resolvem para ocorrências
//! sucessivas e os spans resultantes nunca se sobrepõem.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{IobError, Result};
use crate::mapping::TokenMapper;
use crate::tokenizer::{Token, Tokenizer};

/// Intervalo de tokens com um rótulo associado.
///
/// # Exemplo
/// Em `["John", "Smith", "works"]`, a menção "John Smith":
/// `EntitySpan { start: 0, end: 2, label: "PER" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Índice do token inicial (inclusivo)
    pub start: usize,
    /// Índice do token final (exclusivo)
    pub end: usize,
    /// Rótulo da entidade já mapeado (ex: "PER", "ORG")
    pub label: String,
}

impl EntitySpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }

    pub fn overlaps(&self, other: &EntitySpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Menção de entidade extraída da marcação, em ordem de documento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMention {
    pub text: String,
    /// Tipo como veio da marcação, antes do mapeamento.
    pub raw_type: String,
    /// Limite inferior (inclusivo) para o início da menção na sequência.
    pub search_from: usize,
}

impl EntityMention {
    pub fn new(text: impl Into<String>, raw_type: impl Into<String>, search_from: usize) -> Self {
        Self {
            text: text.into(),
            raw_type: raw_type.into(),
            search_from,
        }
    }
}

/// Localiza `needle` como sequência contígua em `haystack`, a partir de `search_from`.
///
/// Retorna `(start, end)` com `end` exclusivo. Falha com [`IobError::Alignment`]
/// se não houver janela coincidente, inclusive para `needle` vazio.
pub fn locate<S: AsRef<str>>(needle: &[S], haystack: &[S], search_from: usize) -> Result<(usize, usize)> {
    let n = needle.len();
    if n > 0 && search_from + n <= haystack.len() {
        for i in search_from..=haystack.len() - n {
            let window = &haystack[i..i + n];
            if window.iter().zip(needle).all(|(h, m)| h.as_ref() == m.as_ref()) {
                return Ok((i, i + n));
            }
        }
    }

    Err(IobError::Alignment {
        mention: needle.iter().map(|s| s.as_ref().to_string()).collect(),
        tokens: haystack.iter().map(|s| s.as_ref().to_string()).collect(),
    })
}

/// Resolve todas as menções de um segmento, em ordem.
///
/// O limite inferior efetivo de cada busca é o maior entre o `search_from`
/// declarado na menção e o fim da menção anterior. O tipo bruto é mapeado aqui,
/// uma única vez por menção.
pub fn locate_mentions(
    mentions: &[EntityMention],
    haystack: &[Token],
    tokenizer: &dyn Tokenizer,
    mapper: &TokenMapper,
) -> Result<Vec<EntitySpan>> {
    let words: Vec<&str> = haystack.iter().map(|t| t.text.as_str()).collect();
    let mut spans = Vec::with_capacity(mentions.len());
    let mut previous_end = 0;

    for mention in mentions {
        let needle: Vec<String> = tokenizer
            .tokenize(&mention.text)
            .into_iter()
            .map(|t| t.text)
            .collect();
        let needle: Vec<&str> = needle.iter().map(String::as_str).collect();

        let from = mention.search_from.max(previous_end);
        let (start, end) = locate(&needle, &words, from)?;
        trace!(mention = %mention.text, start, end, "menção localizada");

        spans.push(EntitySpan {
            start,
            end,
            label: mapper.map(&mention.raw_type).to_string(),
        });
        previous_end = end;
    }

    Ok(spans)
}
