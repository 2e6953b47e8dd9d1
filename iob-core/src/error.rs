//! # Erros do Conversor IOB
//!
//! Toda falha relevante chega ao chamador: o único caso tratado como
//! "não-erro" é a ausência de um tipo na tabela de mapeamento (ver [`crate::mapping`]).
//!
//! | Variante            | Quando ocorre                                      | Escopo      |
//! |---------------------|----------------------------------------------------|-------------|
//! | `Configuration`     | Arquivo de configuração ausente ou malformado      | Inicialização |
//! | `Alignment`         | Menção não localizada na sequência de tokens        | Arquivo     |
//! | `MissingAttribute`  | Tag de entidade sem o atributo de tipo             | Arquivo     |
//! | `Extraction`        | XML malformado ou menções aninhadas               | Arquivo     |
//! | `Io`                | Leitura/escrita de arquivo falhou                   | Arquivo     |

use std::path::PathBuf;

use thiserror::Error;

/// Tipo `Result` do crate.
pub type Result<T> = std::result::Result<T, IobError>;

/// Erros produzidos pelo pipeline de conversão.
#[derive(Error, Debug)]
pub enum IobError {
    /// Configuração inválida; fatal antes de qualquer documento ser processado.
    #[error("Configuração inválida: {0}")]
    Configuration(String),

    /// A tokenização da menção não aparece na sequência de tokens do segmento
    /// a partir do deslocamento exigido.
    #[error("Entidade {mention:?} não encontrada em: {tokens:?}")]
    Alignment {
        mention: Vec<String>,
        tokens: Vec<String>,
    },

    /// A tag de entidade não possui o atributo que carrega o tipo.
    #[error("Atributo {attribute:?} não encontrado na tag {tag:?}: {mention:?} (registro {record:?})")]
    MissingAttribute {
        tag: String,
        attribute: String,
        mention: String,
        /// Texto do registro que contém a menção.
        record: String,
    },

    /// Falha ao extrair registros da marcação.
    #[error("Erro de extração: {0}")]
    Extraction(String),

    /// Falha de E/S associada a um caminho.
    #[error("Erro de E/S em {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IobError {
    /// Cria um erro de configuração.
    pub fn configuration(msg: impl Into<String>) -> Self {
        IobError::Configuration(msg.into())
    }

    /// Cria um erro de extração.
    pub fn extraction(msg: impl Into<String>) -> Self {
        IobError::Extraction(msg.into())
    }

    /// Associa um `std::io::Error` ao caminho que o causou.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IobError::Io {
            path: path.into(),
            source,
        }
    }

    /// Código de saída do processo para este erro.
    ///
    /// Alinhamento e extração têm códigos próprios para que scripts de lote
    /// distingam divergência de tokenização de problemas de ambiente.
    pub fn exit_code(&self) -> i32 {
        match self {
            IobError::Configuration(_) | IobError::Io { .. } => 1,
            IobError::MissingAttribute { .. } | IobError::Extraction(_) => 2,
            IobError::Alignment { .. } => 3,
        }
    }

    /// Indica se o erro invalida apenas o arquivo atual, permitindo que o lote continue.
    pub fn is_file_local(&self) -> bool {
        matches!(self, IobError::Io { .. })
    }
}
