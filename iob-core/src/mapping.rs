//! # Mapeamento de Tipos de Entidade
//!
//! Normaliza o tipo bruto de uma entidade (ex: `"person"` vindo do XML, ou
//! `"GPE"` vindo de um tagger) para o rótulo canônico usado nas tags BIO
//! (ex: `"PER"`, `"LOC"`).
//!
//! Um tipo ausente da tabela passa inalterado: tipos novos ou não previstos
//! aparecem na saída como vieram, sem interromper a conversão.

use std::collections::HashMap;

/// Tabela tipo bruto → rótulo canônico.
pub type TypeMapping = HashMap<String, String>;

/// Função pura de mapeamento sobre uma tabela fixa.
#[derive(Debug, Clone, Default)]
pub struct TokenMapper {
    table: TypeMapping,
}

impl TokenMapper {
    pub fn new(table: TypeMapping) -> Self {
        Self { table }
    }

    /// Rótulo canônico de `raw_type`, ou o próprio `raw_type` se não mapeado.
    pub fn map<'a>(&'a self, raw_type: &'a str) -> &'a str {
        self.table
            .get(raw_type)
            .map(String::as_str)
            .unwrap_or(raw_type)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl From<TypeMapping> for TokenMapper {
    fn from(table: TypeMapping) -> Self {
        Self::new(table)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TokenMapper {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
