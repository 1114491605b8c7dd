//! Single-file and directory processing.
//!
//! Each input PDF produces one JSON artifact. A document that cannot be
//! decoded still gets an artifact (the empty result) and never stops the
//! rest of the batch.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::detect::has_pdf_extension;
use crate::error::{Error, Result};
use crate::model::{ListSequence, OutlineResult};
use crate::outline::AnalysisConfig;
use crate::parser::ParseOptions;
use crate::render::{to_json, JsonFormat};
use crate::OutlineExtractor;

/// Options for batch processing.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Process documents in parallel
    pub parallel: bool,
    /// Output JSON layout
    pub json_format: JsonFormat,
    /// Outline analysis thresholds
    pub analysis: AnalysisConfig,
    /// Decoder options
    pub parse: ParseOptions,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            json_format: JsonFormat::Pretty,
            analysis: AnalysisConfig::default(),
            parse: ParseOptions::default(),
        }
    }
}

impl BatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one document at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    pub fn with_analysis(mut self, config: AnalysisConfig) -> Self {
        self.analysis = config;
        self
    }

    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    fn extractor(&self) -> OutlineExtractor {
        OutlineExtractor::new()
            .with_parse_options(self.parse.clone())
            .with_config(self.analysis.clone())
    }
}

/// Outcome for one input document.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Result written to `output`
    pub result: OutlineResult,
    /// Numbered list items suppressed from the outline
    pub lists: Vec<ListSequence>,
    /// Decode or write failure, if any
    pub error: Option<String>,
}

impl BatchItem {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcomes of a batch run, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub items: Vec<BatchItem>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }
}

/// List the PDF inputs named by `input`.
///
/// A file is returned when it has a `.pdf` extension. A directory yields its
/// `*.pdf` entries (case-insensitive, non-recursive) in sorted order.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        if has_pdf_extension(input) {
            return Ok(vec![input.to_path_buf()]);
        }
        log::warn!("Not a PDF file: {}", input.display());
        return Ok(Vec::new());
    }
    if !input.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input not found: {}", input.display()),
        )));
    }

    let mut inputs = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Whether `output` names a JSON file rather than a directory.
fn is_json_target(output: &Path) -> bool {
    output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Where the artifact for `input` is written.
pub fn output_path_for(input: &Path, output: &Path) -> PathBuf {
    if is_json_target(output) {
        return output.to_path_buf();
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output.join(format!("{}.json", stem))
}

/// Process every input and write one JSON artifact per document.
pub fn process_batch(input: &Path, output: &Path, options: &BatchOptions) -> Result<BatchSummary> {
    process_batch_with(input, output, options, |_| {})
}

/// Like [`process_batch`], calling `on_done` after each document.
pub fn process_batch_with<F>(
    input: &Path,
    output: &Path,
    options: &BatchOptions,
    on_done: F,
) -> Result<BatchSummary>
where
    F: Fn(&BatchItem) + Sync,
{
    let inputs = collect_inputs(input)?;
    log::info!("Found {} PDF file(s) in {}", inputs.len(), input.display());

    if is_json_target(output) {
        if inputs.len() > 1 {
            log::warn!(
                "{} inputs share the single output file {}; the last one written wins",
                inputs.len(),
                output.display()
            );
        }
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
    } else {
        fs::create_dir_all(output)?;
    }

    let extractor = options.extractor();
    let run = |path: &PathBuf| {
        let item = process_one(&extractor, path, output, options.json_format);
        on_done(&item);
        item
    };

    let items = if options.parallel {
        inputs.par_iter().map(run).collect()
    } else {
        inputs.iter().map(run).collect()
    };

    Ok(BatchSummary { items })
}

fn process_one(
    extractor: &OutlineExtractor,
    input: &Path,
    output: &Path,
    format: JsonFormat,
) -> BatchItem {
    let output = output_path_for(input, output);

    let (report, mut error) = match extractor.extract_report(input) {
        Ok(report) => (report, None),
        Err(e) => {
            log::error!("Failed to process {}: {}", input.display(), e);
            (Default::default(), Some(e.to_string()))
        }
    };

    let written = to_json(&report.result, format)
        .and_then(|json| fs::write(&output, json).map_err(Error::from));
    if let Err(e) = written {
        log::error!("Failed to write {}: {}", output.display(), e);
        error.get_or_insert_with(|| e.to_string());
    } else {
        log::info!(
            "Wrote {} ({} headings)",
            output.display(),
            report.result.outline.len()
        );
    }

    BatchItem {
        input: input.to_path_buf(),
        output,
        result: report.result,
        lists: report.lists,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_path_for_directory() {
        let path = output_path_for(Path::new("/in/report.v2.PDF"), Path::new("/out"));
        assert_eq!(path, PathBuf::from("/out/report.v2.json"));
    }

    #[test]
    fn test_output_path_for_json_file() {
        let path = output_path_for(Path::new("/in/a.pdf"), Path::new("/out/result.json"));
        assert_eq!(path, PathBuf::from("/out/result.json"));
    }

    #[test]
    fn test_collect_inputs_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["b.pdf", "A.PDF", "notes.txt", "c.pdf.bak"] {
            fs::write(dir.path().join(name), b"%PDF-1.4\n").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let inputs = collect_inputs(dir.path()).unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A.PDF", "b.pdf"]);
    }

    #[test]
    fn test_collect_inputs_single_file() {
        let dir = tempdir().unwrap();
        let pdf = dir.path().join("Report.PDF");
        let notes = dir.path().join("notes.txt");
        fs::write(&pdf, b"%PDF-1.4\n").unwrap();
        fs::write(&notes, b"%PDF-1.4\n").unwrap();

        assert_eq!(collect_inputs(&pdf).unwrap(), vec![pdf]);
        assert!(collect_inputs(&notes).unwrap().is_empty());
    }

    #[test]
    fn test_collect_inputs_missing() {
        let dir = tempdir().unwrap();
        let result = collect_inputs(&dir.path().join("missing"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_broken_input_writes_empty_result() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::write(input.path().join("broken.pdf"), b"not really a pdf").unwrap();

        let summary = process_batch(input.path(), output.path(), &BatchOptions::new()).unwrap();
        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.failed(), 1);

        let json = fs::read_to_string(output.path().join("broken.json")).unwrap();
        let result: OutlineResult = serde_json::from_str(&json).unwrap();
        assert!(result.is_empty());
    }
}
