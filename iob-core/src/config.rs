//! # Configuração
//!
//! Um arquivo JSON com três seções. Toda chave é opcional; o que faltar assume o
//! valor padrão de [`Config::default`]. A configuração é construída uma vez,
//! validada e passada por referência para o pipeline.
//!
//! ```json
//! {
//!   "general":   { "iob_separator": "\t" },
//!   "golden":    { "tags": ["a", "q"], "entity_tag": "entity", "entity_attr": "type" },
//!   "automatic": { "split_sentences": true, "mapping": { "GPE": "LOC" } }
//! }
//! ```
//!
//! A seção `automatic` também aceita o nome antigo `spacy`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IobError, Result};
use crate::mapping::TypeMapping;

/// Origem das tags de entidade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Anotações de referência presentes na marcação.
    Golden,
    /// Predições de um tagger sobre o texto.
    Automatic,
}

impl Default for SourceMode {
    fn default() -> Self {
        SourceMode::Automatic
    }
}

/// Formato do arquivo de entrada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFormat {
    /// Texto puro; cada linha é um segmento.
    Text,
    /// Marcação XML; cada registro é um segmento.
    Markup,
}

impl Default for InputFormat {
    fn default() -> Self {
        InputFormat::Markup
    }
}

/// Opções escolhidas por execução (linha de comando), fora do arquivo de configuração.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub source: SourceMode,
    pub format: InputFormat,
}

impl RunOptions {
    /// Texto puro não carrega anotações; o modo golden exige marcação.
    pub fn validate(&self) -> Result<()> {
        if self.source == SourceMode::Golden && self.format == InputFormat::Text {
            return Err(IobError::configuration(
                "o modo golden exige entrada em marcação (--format xml)",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Separador entre token e tag em cada linha.
    pub iob_separator: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            iob_separator: "\t".to_string(),
        }
    }
}

/// Como encontrar registros e entidades na marcação.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldenConfig {
    /// Nomes dos elementos que delimitam um registro (segmento).
    pub tags: Vec<String>,
    /// Atributos que um registro precisa ter (nome → valor exato).
    pub attributes: HashMap<String, String>,
    /// Elemento que delimita uma menção de entidade.
    pub entity_tag: String,
    /// Atributo da menção que carrega o tipo.
    pub entity_attr: String,
    pub mapping: TypeMapping,
}

impl Default for GoldenConfig {
    fn default() -> Self {
        Self {
            tags: vec!["a".to_string(), "q".to_string()],
            attributes: HashMap::new(),
            entity_tag: "entity".to_string(),
            entity_attr: "type".to_string(),
            mapping: mapping_of(&[
                ("org", "ORG"),
                ("location", "LOC"),
                ("misc", "MISC"),
                ("person", "PER"),
                ("webpage", "MISC"),
                ("title", "MISC"),
                ("email", "MISC"),
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomaticConfig {
    /// Arquivo de modelo do tagger; pode ser sobrescrito pela linha de comando.
    pub model: Option<String>,
    pub split_sentences: bool,
    pub mapping: TypeMapping,
}

impl Default for AutomaticConfig {
    fn default() -> Self {
        Self {
            model: None,
            split_sentences: false,
            mapping: mapping_of(&[
                ("PER", "PER"),
                ("LOC", "LOC"),
                ("GPE", "LOC"),
                ("ORG", "ORG"),
                ("MISC", "MISC"),
                ("PRODUCT", "MISC"),
                ("PERSON", "PER"),
            ]),
        }
    }
}

/// Configuração completa e imutável.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub golden: GoldenConfig,
    #[serde(alias = "spacy")]
    pub automatic: AutomaticConfig,
}

impl Config {
    /// Carrega e valida um arquivo JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IobError::configuration(format!(
                "arquivo de configuração {} não existe",
                path.display()
            )));
        }
        let raw = std::fs::read_to_string(path).map_err(|e| {
            IobError::configuration(format!("não foi possível ler {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)
            .map_err(|e| IobError::configuration(format!("JSON inválido: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.iob_separator.is_empty() {
            return Err(IobError::configuration("general.iob_separator não pode ser vazio"));
        }
        if self.golden.tags.iter().all(|t| t.trim().is_empty()) {
            return Err(IobError::configuration("golden.tags precisa de ao menos um elemento"));
        }
        if self.golden.entity_tag.trim().is_empty() {
            return Err(IobError::configuration("golden.entity_tag não pode ser vazio"));
        }
        if self.golden.entity_attr.trim().is_empty() {
            return Err(IobError::configuration("golden.entity_attr não pode ser vazio"));
        }
        Ok(())
    }

    /// Tabela de mapeamento do modo escolhido.
    pub fn mapping_for(&self, source: SourceMode) -> &TypeMapping {
        match source {
            SourceMode::Golden => &self.golden.mapping,
            SourceMode::Automatic => &self.automatic.mapping,
        }
    }

    /// JSON com a configuração padrão (para `--dump-config`).
    pub fn dump_default() -> String {
        serde_json::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}

fn mapping_of(pairs: &[(&str, &str)]) -> TypeMapping {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.general.iob_separator, "\t");
        assert_eq!(cfg.golden.tags, vec!["a", "q"]);
        assert_eq!(cfg.golden.mapping["person"], "PER");
        assert_eq!(cfg.automatic.mapping["GPE"], "LOC");
        assert!(!cfg.automatic.split_sentences);
    }

    #[test]
    fn test_partial_json_keeps_fallbacks() {
        let cfg = Config::from_json(r#"{"general": {"iob_separator": " "}, "spacy": {"split_sentences": true}}"#)
            .unwrap();
        assert_eq!(cfg.general.iob_separator, " ");
        assert!(cfg.automatic.split_sentences);
        assert_eq!(cfg.golden.entity_tag, "entity");
        assert_eq!(cfg.automatic.mapping["PERSON"], "PER");
    }

    #[test]
    fn test_mapping_section_replaces_table() {
        let cfg = Config::from_json(r#"{"golden": {"mapping": {"person": "PERSON"}}}"#).unwrap();
        assert_eq!(cfg.golden.mapping.len(), 1);
        assert_eq!(cfg.mapping_for(SourceMode::Golden)["person"], "PERSON");
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(Config::from_json("{not json"), Err(IobError::Configuration(_))));
        assert!(matches!(
            Config::from_json(r#"{"general": {"iob_separator": ""}}"#),
            Err(IobError::Configuration(_))
        ));
        assert!(Config::from_json(r#"{"golden": {"tags": []}}"#).is_err());
        assert!(Config::from_json(r#"{"golden": {"entity_attr": " "}}"#).is_err());
        assert!(matches!(
            Config::load("/caminho/que/nao/existe.json"),
            Err(IobError::Configuration(_))
        ));
    }

    #[test]
    fn test_dump_round_trips() {
        let dumped = Config::dump_default();
        assert_eq!(Config::from_json(&dumped).unwrap(), Config::default());
    }

    #[test]
    fn test_golden_text_is_rejected() {
        let opts = RunOptions { source: SourceMode::Golden, format: InputFormat::Text };
        assert!(opts.validate().is_err());
        assert!(RunOptions::default().validate().is_ok());
    }
}
