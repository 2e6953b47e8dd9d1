//! Processamento em lote dos arquivos de entrada
//!
//! Cada arquivo vira um irmão com extensão `.iob`. A saída é montada inteira em
//! memória e só é gravada quando o arquivo foi convertido sem erro; nenhum
//! arquivo parcial fica para trás.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use iob_core::tagger::tags_to_spans;
use iob_core::{render, AlignmentPipeline, IobError, Result};
use tracing::{error, info};

/// Resultado de um lote que não foi abortado.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<PathBuf>,
    /// Arquivos que falharam por E/S; o lote continuou.
    pub failed: Vec<(PathBuf, IobError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Caminho de saída: a extensão da entrada é trocada por `.iob`.
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension("iob")
}

/// Converte os arquivos em ordem.
///
/// Erros de E/S são registrados e o lote segue; erros de alinhamento ou de
/// extração abortam o lote e são devolvidos ao chamador.
pub fn run_batch(pipeline: &AlignmentPipeline, files: &[PathBuf]) -> Result<BatchReport> {
    let mut report = BatchReport::default();

    for input in files {
        info!("Processando {}", input.display());
        match convert_file(pipeline, input) {
            Ok(output) => report.converted.push(output),
            Err(e) if e.is_file_local() => {
                error!("{}", e);
                report.failed.push((input.clone(), e));
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

/// Converte um arquivo e grava a saída, devolvendo o caminho gravado.
pub fn convert_file(pipeline: &AlignmentPipeline, input: &Path) -> Result<PathBuf> {
    let output = output_path(input);
    if output == input {
        return Err(IobError::io(
            input,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "a entrada já tem extensão .iob e seria sobrescrita",
            ),
        ));
    }

    let text = std::fs::read_to_string(input).map_err(|e| IobError::io(input, e))?;
    let tagged = pipeline.process_document(&text)?;
    let entities = tags_to_spans(&tagged).len();
    let iob = render(&tagged, &pipeline.config().general.iob_separator);

    write_output(&output, &iob)?;
    info!(tokens = tagged.len(), entities, "Gravado {}", output.display());
    Ok(output)
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    let written = File::create(path).and_then(|mut file| {
        writeln!(file, "{}", content)?;
        file.flush()
    });
    if let Err(e) = written {
        // Remove o que tiver sido gravado pela metade
        let _ = std::fs::remove_file(path);
        return Err(IobError::io(path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iob_core::{Config, InputFormat, RunOptions, SourceMode};

    fn golden() -> AlignmentPipeline {
        let options = RunOptions { source: SourceMode::Golden, format: InputFormat::Markup };
        AlignmentPipeline::new(Config::default(), options).unwrap()
    }

    #[test]
    fn test_output_path() {
        assert_eq!(output_path(Path::new("corpus/dev.xml")), PathBuf::from("corpus/dev.iob"));
        assert_eq!(output_path(Path::new("notes")), PathBuf::from("notes.iob"));
    }

    #[test]
    fn test_convert_file_writes_iob() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("dev.xml");
        std::fs::write(
            &input,
            r#"<c><q><entity type="person">John Smith</entity> works at <entity type="org">Acme</entity></q></c>"#,
        )
        .unwrap();

        let output = convert_file(&golden(), &input).unwrap();
        assert_eq!(output, dir.path().join("dev.iob"));
        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(content, "John\tB-PER\nSmith\tI-PER\nworks\tO\nat\tO\nAcme\tB-ORG\n");
    }

    #[test]
    fn test_alignment_failure_leaves_no_output_and_aborts_batch() {
        let dir = tempfile::tempdir().unwrap();
        // "Covid-19" é um único token; a menção "19" não alinha
        let bad = dir.path().join("bad.xml");
        std::fs::write(&bad, r#"<q>Covid-<entity type="misc">19</entity> spread</q>"#).unwrap();
        let good = dir.path().join("good.xml");
        std::fs::write(&good, "<q>fine</q>").unwrap();

        let err = run_batch(&golden(), &[bad.clone(), good.clone()]).unwrap_err();
        assert!(matches!(err, IobError::Alignment { .. }));
        assert_eq!(err.exit_code(), 3);
        assert!(!output_path(&bad).exists());
        assert!(!output_path(&good).exists());
    }

    #[test]
    fn test_io_failure_continues_batch() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.xml");
        let good = dir.path().join("good.xml");
        std::fs::write(&good, "<q>fine</q>").unwrap();

        let report = run_batch(&golden(), &[missing.clone(), good.clone()]).unwrap();
        assert!(!report.is_success());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, missing);
        assert_eq!(report.converted, vec![output_path(&good)]);
        assert_eq!(std::fs::read_to_string(output_path(&good)).unwrap(), "fine\tO\n");
    }

    #[test]
    fn test_iob_input_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("already.iob");
        std::fs::write(&input, "<q>x</q>").unwrap();
        let err = convert_file(&golden(), &input).unwrap_err();
        assert!(err.is_file_local());
        assert_eq!(std::fs::read_to_string(&input).unwrap(), "<q>x</q>");
    }
}
