//! # Montagem BIO
//!
//! Transforma uma sequência de tokens em exatamente uma [`TaggedToken`] por token,
//! na ordem original. Dois modos:
//!
//! - **Golden**: spans de entidade já localizados ([`crate::span`]) viram `B-`/`I-`;
//!   o resto é `O`.
//! - **Automático**: predições IOB de um [`crate::tagger::Tagger`] são reformatadas,
//!   preservando o prefixo e mapeando apenas o tipo.
//!
//! Com `split_sentences`, o último token de cada sentença recebe a marca de
//! quebra de segmento (uma linha em branco na saída).

use crate::mapping::TokenMapper;
use crate::span::EntitySpan;
use crate::tagger::{Iob, RawTaggedToken, Tag, TaggedToken};
use crate::tokenizer::Token;

/// Montador BIO; carrega apenas a opção de quebra de sentença.
#[derive(Debug, Clone, Copy, Default)]
pub struct BioAssembler {
    pub split_sentences: bool,
}

impl BioAssembler {
    pub fn new(split_sentences: bool) -> Self {
        Self { split_sentences }
    }

    /// Modo golden: `sentences` é a tokenização do segmento agrupada por sentença,
    /// `spans` os intervalos disjuntos sobre os índices globais.
    ///
    /// # Panics
    /// Se dois spans cobrem o mesmo token ou um span sai da sequência. O
    /// localizador garante ambos por construção; violá-los é erro de programação.
    pub fn assemble_golden(&self, sentences: &[Vec<Token>], spans: &[EntitySpan]) -> Vec<TaggedToken> {
        let total: usize = sentences.iter().map(Vec::len).sum();
        let mut tags = vec![Tag::Outside; total];
        let mut covered = vec![false; total];

        for span in spans {
            assert!(
                span.start < span.end && span.end <= total,
                "span [{}, {}) fora da sequência de {} tokens",
                span.start,
                span.end,
                total
            );
            for i in span.start..span.end {
                assert!(!covered[i], "spans sobrepostos no token {}", i);
                covered[i] = true;
                tags[i] = if i == span.start {
                    Tag::Begin(span.label.clone())
                } else {
                    Tag::Inside(span.label.clone())
                };
            }
        }

        let mut tags = tags.into_iter();
        let mut out = Vec::with_capacity(total);
        for sentence in sentences {
            let last = sentence.len().saturating_sub(1);
            for (i, token) in sentence.iter().enumerate() {
                out.push(TaggedToken {
                    text: token.text.clone(),
                    tag: tags.next().unwrap_or(Tag::Outside),
                    segment_break: self.split_sentences && i == last,
                });
            }
        }
        out
    }

    /// Modo automático: reformata predições IOB, mapeando o tipo pelo `mapper`.
    ///
    /// `B`/`I` sem tipo viram `O`; não há busca de spans neste modo.
    pub fn assemble_automatic(&self, raw: &[RawTaggedToken], mapper: &TokenMapper) -> Vec<TaggedToken> {
        raw.iter()
            .map(|token| {
                let tag = match token.iob {
                    Iob::O => Tag::Outside,
                    _ if token.entity_type.is_empty() => Tag::Outside,
                    Iob::B => Tag::Begin(mapper.map(&token.entity_type).to_string()),
                    Iob::I => Tag::Inside(mapper.map(&token.entity_type).to_string()),
                };
                TaggedToken {
                    text: token.text.clone(),
                    tag,
                    segment_break: self.split_sentences && token.sentence_end,
                }
            })
            .collect()
    }
}

/// Junta as linhas de saída de um documento.
///
/// O documento inteiro é aparado, de modo que a quebra do último segmento não
/// deixa uma linha em branco pendurada no fim do arquivo.
pub fn render(tagged: &[TaggedToken], sep: &str) -> String {
    let lines: Vec<String> = tagged.iter().map(|t| t.line(sep)).collect();
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::tags_to_spans;
    use crate::tokenizer::{StandardTokenizer, Tokenizer};

    fn raw(text: &str, iob: Iob, ty: &str, end: bool) -> RawTaggedToken {
        RawTaggedToken {
            text: text.into(),
            iob,
            entity_type: ty.into(),
            sentence_end: end,
        }
    }

    fn span(start: usize, end: usize, label: &str) -> EntitySpan {
        EntitySpan { start, end, label: label.into() }
    }

    #[test]
    fn test_golden_round_trip() {
        let tokens = StandardTokenizer.tokenize("John Smith works at Acme");
        let spans = [span(0, 2, "PER"), span(4, 5, "ORG")];
        let tagged = BioAssembler::default().assemble_golden(&[tokens], &spans);
        assert_eq!(
            render(&tagged, "\t"),
            "John\tB-PER\nSmith\tI-PER\nworks\tO\nat\tO\nAcme\tB-ORG"
        );
    }

    #[test]
    fn test_golden_coverage_and_contiguity() {
        let sentences = StandardTokenizer.sentences("A b c d. E f g h i.");
        let total: usize = sentences.iter().map(Vec::len).sum();
        let spans = [span(0, 1, "X"), span(1, 3, "X"), span(5, 8, "Y")];
        let tagged = BioAssembler::new(true).assemble_golden(&sentences, &spans);
        assert_eq!(tagged.len(), total);

        // Spans adjacentes de mesmo rótulo ainda começam com B-
        assert_eq!(tags_to_spans(&tagged), spans.to_vec());
        for pair in tagged.windows(2) {
            assert!(Tag::is_valid_transition(&pair[0].tag, &pair[1].tag));
        }
    }

    #[test]
    #[should_panic(expected = "sobrepostos")]
    fn test_golden_overlap_panics() {
        let tokens = StandardTokenizer.tokenize("a b c");
        BioAssembler::default().assemble_golden(&[tokens], &[span(0, 2, "X"), span(1, 3, "Y")]);
    }

    #[test]
    fn test_segment_breaks() {
        let sentences = vec![
            StandardTokenizer.tokenize("Hi"),
            StandardTokenizer.tokenize("Bye"),
        ];
        let with = BioAssembler::new(true).assemble_golden(&sentences, &[]);
        assert!(with.iter().all(|t| t.segment_break));
        assert_eq!(with[0].line("\t"), "Hi\tO\n");

        let without = BioAssembler::new(false).assemble_golden(&sentences, &[]);
        assert!(without.iter().all(|t| !t.segment_break));
        assert_eq!(render(&without, "\t"), "Hi\tO\nBye\tO");
        // A última quebra é aparada do documento
        assert_eq!(render(&with, "\t"), "Hi\tO\n\nBye\tO");
    }

    #[test]
    fn test_automatic_maps_type_and_keeps_prefix() {
        let mapper: TokenMapper = [("PERSON", "PER"), ("GPE", "LOC")].into_iter().collect();
        let input = [
            raw("Ana", Iob::B, "PERSON", false),
            raw("Lima", Iob::I, "PERSON", false),
            raw("in", Iob::O, "", false),
            raw("Lisbon", Iob::B, "GPE", false),
            raw("Q3", Iob::B, "DATE", false),
            raw(".", Iob::O, "", true),
        ];
        let tagged = BioAssembler::new(true).assemble_automatic(&input, &mapper);
        let tags: Vec<String> = tagged.iter().map(|t| t.tag.label()).collect();
        assert_eq!(tags, ["B-PER", "I-PER", "O", "B-LOC", "B-DATE", "O"]);
        assert!(tagged[5].segment_break);
        assert!(!tagged[3].segment_break);
    }

    #[test]
    fn test_automatic_untyped_prefix_is_outside() {
        let tagged = BioAssembler::default()
            .assemble_automatic(&[raw("x", Iob::B, "", false)], &TokenMapper::default());
        assert_eq!(tagged[0].tag, Tag::Outside);
    }

    #[test]
    fn test_automatic_segment_flag_off() {
        let tagged = BioAssembler::new(false)
            .assemble_automatic(&[raw("Hi", Iob::O, "", true)], &TokenMapper::default());
        assert!(!tagged[0].segment_break);
    }
}
