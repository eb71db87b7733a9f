use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use bilevel::draw::DrawComparison;
use bilevel::{binarize_with, BinaryImage, SourceImage, Threshold};
use log::{debug, info};
use crate::config::Config;

/// What one processed input produced.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Report {
    pub width: u32,
    pub height: u32,
    pub foreground: u64,
    pub output: Option<PathBuf>,
    pub preview: Option<PathBuf>,
}

impl Report {
    pub(crate) fn pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// A decoded and binarized input that has not been written anywhere yet.
pub(crate) struct Prepared {
    stem: String,
    original: SourceImage,
    binary: BinaryImage,
}

/// Name used for an input's batch outputs.
pub(crate) fn output_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

pub(crate) struct Processor {
    config: Config,
    threshold: Threshold,
}

impl Processor {
    pub(crate) fn new(config: Config) -> Result<Self> {
        let threshold = Threshold::try_from(config.processing.threshold)?;
        Ok(Processor { config, threshold })
    }

    /// Decode and binarize one file. In batch mode the result is named after
    /// the input, otherwise it goes to the fixed output name.
    pub(crate) fn process(&self, input: &Path, batch: bool) -> Result<Report> {
        let prepared = self.prepare(input)?;
        self.write(prepared, batch)
            .with_context(|| format!("Failed to write results for {}", input.display()))
    }

    pub(crate) fn process_bytes(&self, stem: &str, bytes: &[u8], batch: bool) -> Result<Report> {
        let prepared = self.prepare_bytes(stem, bytes)?;
        self.write(prepared, batch)
    }

    /// Read, decode and binarize without touching the output folder.
    pub(crate) fn prepare(&self, input: &Path) -> Result<Prepared> {
        let bytes = fs::read(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        self.prepare_bytes(&output_stem(input), &bytes)
            .with_context(|| format!("Failed to process {}", input.display()))
    }

    pub(crate) fn prepare_bytes(&self, stem: &str, bytes: &[u8]) -> Result<Prepared> {
        let original = SourceImage::decode(bytes)?;
        debug!("Processing {} ({}x{} pixels)", stem, original.width(), original.height());
        let binary = binarize_with(&original, self.threshold);
        Ok(Prepared {
            stem: stem.to_string(),
            original,
            binary,
        })
    }

    pub(crate) fn write(&self, prepared: Prepared, batch: bool) -> Result<Report> {
        let Prepared {
            stem,
            original,
            binary,
        } = prepared;

        let output = if self.config.output.save {
            let path = self.output_path(&stem, batch);
            binary.save(&path)?;
            info!("Saved thresholded image to {}", path.display());
            Some(path)
        } else {
            None
        };

        let preview = if self.config.output.preview {
            let path = self.preview_path(&stem);
            let canvas = original.draw_beside(&binary)?;
            canvas
                .save(&path)
                .with_context(|| format!("Failed to save preview {}", path.display()))?;
            debug!("Saved preview to {}", path.display());
            Some(path)
        } else {
            None
        };

        let (width, height) = original.dimensions();
        Ok(Report {
            width,
            height,
            foreground: binary.foreground_count(),
            output,
            preview,
        })
    }

    fn output_path(&self, stem: &str, batch: bool) -> PathBuf {
        let output = &self.config.output;
        if batch {
            let extension = Path::new(&output.output_name)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("jpg");
            output
                .output_folder
                .join(format!("{}_thresholded.{}", stem, extension))
        } else {
            output.output_folder.join(&output.output_name)
        }
    }

    fn preview_path(&self, stem: &str) -> PathBuf {
        self.config
            .output
            .output_folder
            .join(format!("{}_preview.png", stem))
    }
}
