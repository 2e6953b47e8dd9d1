//! # Tokenizador
//!
//! Divide o texto de um segmento em tokens (palavras e pontuações) e, opcionalmente,
//! em sentenças. O núcleo de alinhamento só depende do trait [`Tokenizer`]; o
//! [`StandardTokenizer`] é a implementação padrão usada pelo binário.
//!
//! ## Regras do `StandardTokenizer`
//!
//! - Palavras são sequências alfanuméricas; hífens e apóstrofos internos ficam
//!   na palavra (`"Covid-19"`, `"O'Neill"`).
//! - Clíticos do inglês viram tokens próprios: `"Sam's"` → `["Sam", "'s"]`,
//!   `"don't"` → `["do", "n't"]`.
//! - Números preservam separadores entre dígitos (`"1.234"`, `"2,5"`).
//! - Abreviações conhecidas preservam o ponto (`"Dr."`).
//! - Qualquer outra pontuação é um token próprio; espaços apenas separam.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use iob_core::tokenizer::{StandardTokenizer, Tokenizer};
//!
//! let tokens = StandardTokenizer.tokenize("Dr. Silva chegou.");
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, ["Dr.", "Silva", "chegou", "."]);
//! ```

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Um token extraído do texto do segmento.
///
/// A identidade do token é posicional (`index`): textos repetidos são tokens
/// distintos. `start`/`end` são offsets de byte no texto tokenizado, usados
/// para relacionar menções extraídas da marcação com posições na sequência.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "Acme", ",", "works").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token no segmento (0, 1, 2...).
    pub index: usize,
}

/// Colaborador de tokenização.
///
/// A sequência achatada de [`Tokenizer::sentences`] deve ser idêntica a
/// [`Tokenizer::tokenize`] sobre o mesmo texto: o alinhamento procura as
/// menções na primeira e tokeniza as menções com a segunda.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    /// Segmenta em sentenças. Padrão: o texto inteiro é uma única sentença.
    fn sentences(&self, text: &str) -> Vec<Vec<Token>> {
        let tokens = self.tokenize(text);
        if tokens.is_empty() {
            Vec::new()
        } else {
            vec![tokens]
        }
    }
}

/// Abreviações cujo ponto não encerra o token nem a sentença
const ABBREVIATIONS: &[&str] = &[
    "Dr", "Dra", "Mr", "Mrs", "Ms", "Sr", "Sra", "Jr", "Prof", "Profa", "St",
    "Gen", "Gov", "Sen", "Rep", "Inc", "Ltd", "Co", "Corp", "vs", "etc", "approx",
    "Av", "Fig", "No", "Nos", "Vol", "pág", "cap", "tel",
];

/// Sufixos após apóstrofo separados da palavra (`'s`, `'re`, `'ll`...)
const CLITICS: &[&str] = &["s", "re", "ve", "ll", "d", "m"];

/// Negação contraída, separada com o `n` (`"don't"` → `"do"`, `"n't"`)
const NEGATIONS: &[&str] = &["n't", "n\u{2019}t"];

/// Tokenizador baseado em regras (ver documentação do módulo).
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardTokenizer;

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = tokenize_standard(text);
        for (i, token) in tokens.iter_mut().enumerate() {
            token.index = i;
        }
        tokens
    }

    /// Agrupa os tokens pelas fronteiras de sentença UAX #29, ignorando
    /// fronteiras que caem logo após uma abreviação.
    fn sentences(&self, text: &str) -> Vec<Vec<Token>> {
        let mut bounds = text
            .split_sentence_bound_indices()
            .map(|(i, _)| i)
            .filter(|&i| i > 0)
            .peekable();

        let mut sentences = Vec::new();
        let mut current: Vec<Token> = Vec::new();

        for token in self.tokenize(text) {
            while let Some(&bound) = bounds.peek() {
                if token.start < bound {
                    break;
                }
                let after_abbrev = current.last().map(is_abbreviation).unwrap_or(false);
                if !current.is_empty() && !after_abbrev {
                    sentences.push(std::mem::take(&mut current));
                }
                bounds.next();
            }
            current.push(token);
        }
        if !current.is_empty() {
            sentences.push(current);
        }
        sentences
    }
}

fn is_abbreviation(token: &Token) -> bool {
    token
        .text
        .strip_suffix('.')
        .map(|stem| ABBREVIATIONS.contains(&stem))
        .unwrap_or(false)
}

fn tokenize_standard(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current_start = 0;
    let mut current_text = String::new();
    let chars: Vec<(usize, char)> = text.char_indices().collect();

    for (i, &(byte_pos, ch)) in chars.iter().enumerate() {
        let next = chars.get(i + 1).map(|&(_, c)| c);
        let next_is_num = next.map(char::is_numeric).unwrap_or(false);
        let next_is_alnum = next.map(char::is_alphanumeric).unwrap_or(false);

        if ch.is_alphanumeric() {
            if current_text.is_empty() {
                current_start = byte_pos;
            }
            current_text.push(ch);
        } else if ch == '-' && !current_text.is_empty() && next_is_alnum {
            current_text.push(ch);
        } else if (ch == '\'' || ch == '\u{2019}') && !current_text.is_empty() && next_is_alnum {
            current_text.push(ch);
        } else if (ch == '.' || ch == ',') && !current_text.is_empty() {
            let current_is_num = current_text.starts_with(|c: char| c.is_numeric())
                && current_text
                    .chars()
                    .all(|c| c.is_numeric() || c == '.' || c == ',');
            let is_abbrev = ch == '.' && ABBREVIATIONS.contains(&current_text.as_str());

            if current_is_num && next_is_num {
                current_text.push(ch);
            } else if is_abbrev {
                current_text.push(ch);
                flush_token(&mut tokens, &mut current_text, current_start, byte_pos + 1);
            } else {
                flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
                push_token(&mut tokens, ch.to_string(), byte_pos, byte_pos + 1);
            }
        } else if ch.is_whitespace() {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
        } else {
            flush_token(&mut tokens, &mut current_text, current_start, byte_pos);
            push_token(&mut tokens, ch.to_string(), byte_pos, byte_pos + ch.len_utf8());
        }
    }

    flush_token(&mut tokens, &mut current_text, current_start, text.len());
    tokens
}

/// Fecha o token acumulado e adiciona à lista (se não vazio), separando clíticos
fn flush_token(tokens: &mut Vec<Token>, text: &mut String, start: usize, end: usize) {
    if text.is_empty() {
        return;
    }
    let word = std::mem::take(text);
    match clitic_split(&word) {
        Some(at) => {
            push_token(tokens, word[..at].to_string(), start, start + at);
            push_token(tokens, word[at..].to_string(), start + at, end);
        }
        None => push_token(tokens, word, start, end),
    }
}

/// Offset de byte onde começa o clítico final da palavra, se houver.
fn clitic_split(word: &str) -> Option<usize> {
    for negation in NEGATIONS {
        if word.len() > negation.len() && word.is_char_boundary(word.len() - negation.len()) {
            let at = word.len() - negation.len();
            if word[at..].eq_ignore_ascii_case(negation) {
                return Some(at);
            }
        }
    }

    let at = word.rfind(['\'', '\u{2019}'])?;
    let apostrophe = word[at..].chars().next()?.len_utf8();
    let suffix = &word[at + apostrophe..];
    if at > 0 && CLITICS.iter().any(|c| suffix.eq_ignore_ascii_case(c)) {
        Some(at)
    } else {
        None
    }
}

/// Adiciona um token de pontuação diretamente
fn push_token(tokens: &mut Vec<Token>, text: String, start: usize, end: usize) {
    tokens.push(Token {
        text,
        start,
        end,
        index: 0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_basic() {
        let tokens = StandardTokenizer.tokenize("John Smith works at Acme.");
        assert_eq!(texts(&tokens), ["John", "Smith", "works", "at", "Acme", "."]);
        assert_eq!(tokens[4].index, 4);
        assert_eq!(tokens[4].start, 20);
        assert_eq!(tokens[4].end, 24);
    }

    #[test]
    fn test_tokenize_keeps_inner_hyphen_and_numbers() {
        let tokens = StandardTokenizer.tokenize("Covid-19 cost 1.234,5 (approx).");
        assert_eq!(
            texts(&tokens),
            ["Covid-19", "cost", "1.234,5", "(", "approx", ")", "."]
        );
    }

    #[test]
    fn test_tokenize_trailing_hyphen_is_separate() {
        let tokens = StandardTokenizer.tokenize("pre- and post-war");
        assert_eq!(texts(&tokens), ["pre", "-", "and", "post-war"]);
    }

    #[test]
    fn test_tokenize_abbreviation() {
        let tokens = StandardTokenizer.tokenize("Dr. Who, Inc.");
        assert_eq!(texts(&tokens), ["Dr.", "Who", ",", "Inc."]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(StandardTokenizer.tokenize("").is_empty());
        assert!(StandardTokenizer.tokenize("   ").is_empty());
        assert!(StandardTokenizer.sentences("").is_empty());
    }

    #[test]
    fn test_sentences_split() {
        let sentences = StandardTokenizer.sentences("Hi. Bye.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(texts(&sentences[0]), ["Hi", "."]);
        assert_eq!(texts(&sentences[1]), ["Bye", "."]);
        // Índices continuam globais ao segmento
        assert_eq!(sentences[1][0].index, 2);
    }

    #[test]
    fn test_sentences_do_not_split_after_abbreviation() {
        let sentences = StandardTokenizer.sentences("Dr. Smith arrived. He sat.");
        assert_eq!(sentences.len(), 2);
        assert_eq!(texts(&sentences[0]), ["Dr.", "Smith", "arrived", "."]);
    }

    #[test]
    fn test_sentences_flatten_to_tokenize() {
        let text = "Sam met Sam again. Then Dr. Who left! Why?";
        let flat: Vec<Token> = StandardTokenizer.sentences(text).into_iter().flatten().collect();
        assert_eq!(flat, StandardTokenizer.tokenize(text));
    }

    #[test]
    fn test_tokenize_splits_english_clitics() {
        let tokens = StandardTokenizer.tokenize("Sam's car isn't red, we're sure O'Neill'll say.");
        assert_eq!(
            texts(&tokens),
            ["Sam", "'s", "car", "is", "n't", "red", ",", "we", "'re", "sure", "O'Neill", "'ll", "say", "."]
        );
        assert_eq!((tokens[1].start, tokens[1].end), (3, 5));
        assert_eq!(texts(&StandardTokenizer.tokenize("Sam\u{2019}s")), ["Sam", "\u{2019}s"]);
        // Apóstrofo final já é pontuação própria
        assert_eq!(texts(&StandardTokenizer.tokenize("James' car")), ["James", "'", "car"]);
    }

    #[test]
    fn test_clitic_offsets_match_source() {
        let text = "They don't know Sam's plan";
        for token in StandardTokenizer.tokenize(text) {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }
}
