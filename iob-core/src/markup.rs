//! # Extração de Registros da Marcação
//!
//! Lê um documento XML e devolve, em ordem de documento, os **registros**
//! (elementos cujo nome está em `golden.tags` e que têm todos os atributos de
//! `golden.attributes`). De cada registro sai:
//!
//! - o texto puro, com sequências de espaços colapsadas e aparado;
//! - as menções (`golden.entity_tag`), cada uma com seu tipo bruto
//!   (`golden.entity_attr`) e o offset de byte no texto puro.
//!
//! ```xml
//! <q id="1">Hoje <entity type="person">John  Smith</entity> chegou.</q>
//! ```
//! vira `Record { text: "Hoje John Smith chegou.", mentions: [("John Smith", "person", 5)] }`.
//!
//! Elementos de registro aninhados dentro de um registro aberto são conteúdo comum.
//! Entidades nomeadas do HTML (`&nbsp;`) são resolvidas como as do XML.

use quick_xml::escape::{resolve_html5_entity, resolve_predefined_entity};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::config::GoldenConfig;
use crate::error::{IobError, Result};
use crate::span::EntityMention;
use crate::tokenizer::Token;

/// Menção como aparece na marcação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupMention {
    pub text: String,
    /// `None` quando a tag não tem o atributo de tipo.
    pub raw_type: Option<String>,
    /// Offset de byte do início da menção em [`Record::text`].
    pub offset: usize,
}

/// Um registro (segmento) extraído da marcação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub text: String,
    pub mentions: Vec<MarkupMention>,
}

impl Record {
    /// Converte as menções em [`EntityMention`] para o modo golden.
    ///
    /// `tokens` é a tokenização de [`Record::text`]; o `search_from` de cada menção
    /// é o primeiro token que termina depois do offset da menção.
    ///
    /// Menções aninhadas (uma aberta dentro de outra) não têm rotulagem BIO
    /// plana e são rejeitadas com [`IobError::Extraction`].
    pub fn golden_mentions(&self, tokens: &[Token], config: &GoldenConfig) -> Result<Vec<EntityMention>> {
        let mut mentions = Vec::with_capacity(self.mentions.len());
        let mut previous_end = 0;

        for m in &self.mentions {
            let raw_type = m.raw_type.clone().ok_or_else(|| IobError::MissingAttribute {
                tag: config.entity_tag.clone(),
                attribute: config.entity_attr.clone(),
                mention: m.text.clone(),
                record: self.text.clone(),
            })?;
            if m.text.is_empty() {
                return Err(IobError::extraction(format!(
                    "tag {:?} vazia no registro: {:?}",
                    config.entity_tag, self.text
                )));
            }
            if m.offset < previous_end {
                return Err(IobError::extraction(format!(
                    "menção {:?} aninhada em outra no registro: {:?}",
                    m.text, self.text
                )));
            }
            previous_end = m.offset + m.text.len();

            let search_from = tokens
                .iter()
                .position(|t| t.end > m.offset)
                .unwrap_or(tokens.len());
            mentions.push(EntityMention {
                text: m.text.clone(),
                raw_type,
                search_from,
            });
        }

        Ok(mentions)
    }
}

/// Extrator de registros configurado pela seção `golden`.
pub struct MarkupExtractor<'a> {
    config: &'a GoldenConfig,
}

/// Estado do registro sendo lido
struct OpenRecord {
    depth: usize,
    text: String,
    mentions: Vec<MarkupMention>,
    /// Menções abertas: (índice em `mentions`, offset do início em `text`)
    open: Vec<(usize, usize)>,
}

impl OpenRecord {
    fn new() -> Self {
        Self {
            depth: 1,
            text: String::new(),
            mentions: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Anexa texto colapsando espaços; nunca começa com espaço.
    fn push_text(&mut self, s: &str) {
        for ch in s.chars() {
            if ch.is_whitespace() {
                if !self.text.is_empty() && !self.text.ends_with(' ') {
                    self.text.push(' ');
                }
            } else {
                self.text.push(ch);
            }
        }
    }

    fn open_mention(&mut self, raw_type: Option<String>) {
        self.mentions.push(MarkupMention {
            text: String::new(),
            raw_type,
            offset: self.text.len(),
        });
        self.open.push((self.mentions.len() - 1, self.text.len()));
    }

    fn close_mention(&mut self) {
        if let Some((idx, start)) = self.open.pop() {
            let slice = &self.text[start..];
            let leading = slice.len() - slice.trim_start().len();
            let mention = &mut self.mentions[idx];
            mention.text = slice.trim().to_string();
            mention.offset = start + leading;
        }
    }

    fn finish(mut self) -> Record {
        while !self.open.is_empty() {
            self.close_mention();
        }
        let trimmed = self.text.trim_end().len();
        self.text.truncate(trimmed);
        Record {
            text: self.text,
            mentions: self.mentions,
        }
    }
}

impl<'a> MarkupExtractor<'a> {
    pub fn new(config: &'a GoldenConfig) -> Self {
        Self { config }
    }

    /// Todos os registros não vazios do documento, em ordem.
    pub fn records(&self, xml: &str) -> Result<Vec<Record>> {
        let mut reader = Reader::from_str(xml);
        let mut records = Vec::new();
        let mut current: Option<OpenRecord> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                IobError::extraction(format!(
                    "XML malformado na posição {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;

            match event {
                Event::Start(ref e) => match current.as_mut() {
                    Some(record) => {
                        record.depth += 1;
                        if self.is_entity(e) {
                            record.open_mention(self.entity_type(e)?);
                        }
                    }
                    None if self.is_record(e)? => current = Some(OpenRecord::new()),
                    None => {}
                },
                Event::Empty(ref e) => {
                    if let Some(record) = current.as_mut() {
                        if self.is_entity(e) {
                            record.open_mention(self.entity_type(e)?);
                            record.close_mention();
                        }
                    }
                }
                Event::Text(ref e) => {
                    if let Some(record) = current.as_mut() {
                        let text = e
                            .unescape_with(resolve_entity)
                            .map_err(|err| IobError::extraction(format!("texto inválido: {}", err)))?;
                        record.push_text(&text);
                    }
                }
                Event::CData(ref e) => {
                    if let Some(record) = current.as_mut() {
                        record.push_text(&String::from_utf8_lossy(e));
                    }
                }
                Event::End(ref e) => {
                    if let Some(record) = current.as_mut() {
                        record.depth -= 1;
                        if record.depth == 0 {
                            if let Some(done) = current.take() {
                                let record = done.finish();
                                if !record.text.is_empty() {
                                    records.push(record);
                                }
                            }
                        } else if e.name().as_ref() == self.config.entity_tag.as_bytes() {
                            record.close_mention();
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if current.is_some() {
            return Err(IobError::extraction("documento terminou dentro de um registro"));
        }
        Ok(records)
    }

    fn is_entity(&self, e: &BytesStart) -> bool {
        e.name().as_ref() == self.config.entity_tag.as_bytes()
    }

    fn is_record(&self, e: &BytesStart) -> Result<bool> {
        let name = e.name();
        if !self.config.tags.iter().any(|t| t.as_bytes() == name.as_ref()) {
            return Ok(false);
        }
        for (key, expected) in &self.config.attributes {
            match attribute(e, key)? {
                Some(value) if &value == expected => {}
                _ => return Ok(false),
            }
        }
        Ok(true)
    }

    fn entity_type(&self, e: &BytesStart) -> Result<Option<String>> {
        attribute(e, &self.config.entity_attr)
    }
}

/// Entidades XML predefinidas e, além delas, as entidades nomeadas do HTML5
/// (`&nbsp;`, `&eacute;`...).
fn resolve_entity(entity: &str) -> Option<&'static str> {
    resolve_predefined_entity(entity).or_else(|| resolve_html5_entity(entity))
}

fn attribute(e: &BytesStart, key: &str) -> Result<Option<String>> {
    let attr = e
        .try_get_attribute(key)
        .map_err(|err| IobError::extraction(format!("atributo inválido: {}", err)))?;
    match attr {
        Some(attr) => {
            let value = attr
                .unescape_value_with(resolve_entity)
                .map_err(|err| IobError::extraction(format!("atributo inválido: {}", err)))?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}
