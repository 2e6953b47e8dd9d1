//! # Tagger por Gazetteer
//!
//! Implementação padrão do [`Tagger`] para o modo automático: uma lista de
//! formas de superfície conhecidas por tipo, carregada de um arquivo JSON
//! (o "modelo" escolhido com `--model`):
//!
//! ```json
//! { "PERSON": ["John Smith", "Ana"], "GPE": ["Lisbon", "New York"] }
//! ```
//!
//! A busca é gulosa, da esquerda para a direita, preferindo a forma com mais
//! tokens em cada posição, e ignora maiúsculas/minúsculas. Os tipos saem brutos;
//! o mapeamento para rótulos canônicos é feito depois, na montagem BIO.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{IobError, Result};
use crate::tagger::{Iob, RawTaggedToken, Tagger};
use crate::tokenizer::{StandardTokenizer, Tokenizer};

/// Uma forma conhecida já tokenizada (lowercase) e seu tipo bruto.
#[derive(Debug, Clone)]
struct Entry {
    parts: Vec<String>,
    entity_type: String,
}

pub struct GazetteerTagger<T: Tokenizer = StandardTokenizer> {
    /// Ordenadas por número de tokens, decrescente
    entries: Vec<Entry>,
    tokenizer: T,
}

impl GazetteerTagger<StandardTokenizer> {
    /// Gazetteer vazio: todo token sai `O`.
    pub fn empty() -> Self {
        Self::with_tokenizer(BTreeMap::new(), StandardTokenizer)
    }

    /// Carrega um modelo JSON `{ tipo: [formas] }`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            IobError::configuration(format!("não foi possível ler o modelo {}: {}", path.display(), e))
        })?;
        let gazetteer: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw).map_err(|e| {
            IobError::configuration(format!("modelo {} inválido: {}", path.display(), e))
        })?;
        Ok(Self::with_tokenizer(gazetteer, StandardTokenizer))
    }
}

impl<T: Tokenizer> GazetteerTagger<T> {
    pub fn with_tokenizer(gazetteer: BTreeMap<String, Vec<String>>, tokenizer: T) -> Self {
        let mut entries: Vec<Entry> = gazetteer
            .into_iter()
            .flat_map(|(entity_type, names)| {
                names
                    .into_iter()
                    .map(move |name| (entity_type.clone(), name))
            })
            .filter_map(|(entity_type, name)| {
                let parts: Vec<String> = tokenizer
                    .tokenize(&name)
                    .into_iter()
                    .map(|t| t.text.to_lowercase())
                    .collect();
                (!parts.is_empty()).then_some(Entry { parts, entity_type })
            })
            .collect();
        // Estável: empates mantêm a ordem do arquivo (tipo, depois forma)
        entries.sort_by(|a, b| b.parts.len().cmp(&a.parts.len()));
        Self { entries, tokenizer }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Tokenizer> Tagger for GazetteerTagger<T> {
    fn tag(&self, text: &str) -> Vec<RawTaggedToken> {
        let mut out = Vec::new();

        for sentence in self.tokenizer.sentences(text) {
            let lower: Vec<String> = sentence.iter().map(|t| t.text.to_lowercase()).collect();
            let mut tags: Vec<(Iob, &str)> = vec![(Iob::O, ""); sentence.len()];

            let mut i = 0;
            while i < sentence.len() {
                let hit = self.entries.iter().find(|entry| {
                    i + entry.parts.len() <= lower.len()
                        && entry.parts.iter().zip(&lower[i..]).all(|(p, t)| p == t)
                });
                match hit {
                    Some(entry) => {
                        tags[i] = (Iob::B, entry.entity_type.as_str());
                        for tag in tags.iter_mut().skip(i + 1).take(entry.parts.len() - 1) {
                            *tag = (Iob::I, entry.entity_type.as_str());
                        }
                        i += entry.parts.len();
                    }
                    None => i += 1,
                }
            }

            let last = sentence.len().saturating_sub(1);
            for (i, (token, (iob, entity_type))) in sentence.iter().zip(tags).enumerate() {
                out.push(RawTaggedToken {
                    text: token.text.clone(),
                    iob,
                    entity_type: entity_type.to_string(),
                    sentence_end: i == last,
                });
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gazetteer(pairs: Vec<(&str, Vec<&str>)>) -> GazetteerTagger {
        let map = pairs
            .into_iter()
            .map(|(ty, names)| (ty.to_string(), names.iter().map(|n| n.to_string()).collect()))
            .collect();
        GazetteerTagger::with_tokenizer(map, StandardTokenizer)
    }

    fn compact(raw: &[RawTaggedToken]) -> Vec<String> {
        raw.iter()
            .map(|t| match t.iob {
                Iob::O => "O".to_string(),
                Iob::B => format!("B-{}", t.entity_type),
                Iob::I => format!("I-{}", t.entity_type),
            })
            .collect()
    }

    #[test]
    fn test_longest_match_wins() {
        let g = gazetteer(vec![("GPE", vec!["York", "New York"]), ("PERSON", vec!["John"])]);
        let raw = g.tag("John left New York");
        assert_eq!(compact(&raw), ["B-PERSON", "O", "B-GPE", "I-GPE"]);
    }

    #[test]
    fn test_case_insensitive() {
        let g = gazetteer(vec![("ORG", vec!["Acme Corp."])]);
        let raw = g.tag("ACME Corp. hired");
        assert_eq!(compact(&raw), ["B-ORG", "I-ORG", "O"]);
    }

    #[test]
    fn test_sentence_end_flags() {
        let raw = GazetteerTagger::empty().tag("Hi. Bye.");
        let ends: Vec<bool> = raw.iter().map(|t| t.sentence_end).collect();
        assert_eq!(ends, [false, true, false, true]);
        assert!(raw.iter().all(|t| t.iob == Iob::O));
    }

    #[test]
    fn test_match_does_not_cross_sentences() {
        let g = gazetteer(vec![("MISC", vec!["end . Start"])]);
        let raw = g.tag("The end. Start again.");
        assert!(raw.iter().all(|t| t.iob == Iob::O));
    }

    #[test]
    fn test_load_missing_model() {
        let err = GazetteerTagger::load("/nao/existe/modelo.json").err().unwrap();
        assert!(matches!(err, IobError::Configuration(_)));
    }
}
