//! Documentation staging.
//!
//! The legal notice and release notes are plain text. To get them into the
//! generated reference they are wrapped as generator pages in a staging
//! directory, then the generator runs against its fixed configuration.
//!
//! Unlike the harvest, nothing here is best-effort: a missing page source
//! or a failing generator fails the run.
//!
//! # Example
//!
//! ```rust,ignore
//! use sdk_packaging::DocStager;
//!
//! DocStager::new("/src/OpenNI2").run()?;
//! ```

use anyhow::{bail, Context, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::filesystem::recreate_dir;
use crate::preflight::resolve_tool;

const DEFAULT_GENERATOR: &str = "doxygen";
const DEFAULT_CONFIG_FILE: &str = "Doxyfile";
const STAGING_DIR: &str = "Temp";
const ERROR_LOG: &str = "doxygen_error";

/// A plain-text file to publish as a documentation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocPage {
    pub source: PathBuf,
    /// Page identifier, used for cross references.
    pub id: String,
    pub title: String,
}

impl DocPage {
    pub fn new(source: impl Into<PathBuf>, id: &str, title: &str) -> Self {
        Self {
            source: source.into(),
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    /// Name of the staged file: the source file name plus `.txt`.
    pub fn staged_name(&self) -> Result<String> {
        let name = self
            .source
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("page source '{}' has no file name", self.source.display()))?;
        Ok(format!("{}.txt", name.to_string_lossy()))
    }

    /// Page contents: opening marker, original text, closing marker.
    pub fn render(&self, body: &[u8]) -> Vec<u8> {
        let mut page = format!("/** @page {} {}\n", self.id, self.title).into_bytes();
        page.extend_from_slice(body);
        page.extend_from_slice(b"\n*/");
        page
    }
}

/// Stages text pages and runs the documentation generator.
#[derive(Debug, Clone)]
pub struct DocStager {
    doc_dir: PathBuf,
    pages: Vec<DocPage>,
    generator: String,
    config_file: String,
}

impl DocStager {
    /// Stager for the SDK at `root`, with the default pages and generator.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            doc_dir: root.join("Source").join("Documentation"),
            pages: vec![
                DocPage::new(root.join("NOTICE"), "legal", "Legal Stuff & Acknowledgments"),
                DocPage::new(root.join("ReleaseNotes.txt"), "release_notes", "Release Notes"),
            ],
            generator: DEFAULT_GENERATOR.to_string(),
            config_file: DEFAULT_CONFIG_FILE.to_string(),
        }
    }

    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    pub fn with_config_file(mut self, config_file: impl Into<String>) -> Self {
        self.config_file = config_file.into();
        self
    }

    pub fn with_pages(mut self, pages: Vec<DocPage>) -> Self {
        self.pages = pages;
        self
    }

    /// Directory the generator runs in.
    pub fn doc_dir(&self) -> &Path {
        &self.doc_dir
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.doc_dir.join(STAGING_DIR)
    }

    /// File receiving the generator's standard error.
    pub fn error_log(&self) -> PathBuf {
        self.staging_dir().join(ERROR_LOG)
    }

    /// Stage all pages, then run the generator.
    pub fn run(&self) -> Result<()> {
        let generator = resolve_tool(&self.generator)?;

        let staged = self.stage_pages()?;
        tracing::info!(pages = staged.len(), dir = %self.staging_dir().display(), "staged documentation pages");

        self.invoke_generator(&generator)
    }

    /// Recreate the staging directory and write every page into it.
    pub fn stage_pages(&self) -> Result<Vec<PathBuf>> {
        let staging = self.staging_dir();
        recreate_dir(&staging)?;

        let mut staged = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let body = fs::read(&page.source)
                .with_context(|| format!("reading page source '{}'", page.source.display()))?;
            let dest = staging.join(page.staged_name()?);
            fs::write(&dest, page.render(&body))
                .with_context(|| format!("writing page '{}'", dest.display()))?;
            tracing::debug!(page = %page.id, dest = %dest.display(), "staged page");
            staged.push(dest);
        }
        Ok(staged)
    }

    fn invoke_generator(&self, generator: &Path) -> Result<()> {
        let error_log = self.error_log();
        let log = File::create(&error_log)
            .with_context(|| format!("creating error log '{}'", error_log.display()))?;

        tracing::info!(generator = %generator.display(), config = %self.config_file, "running documentation generator");
        let status = Command::new(generator)
            .arg(&self.config_file)
            .current_dir(&self.doc_dir)
            .stdout(Stdio::null())
            .stderr(Stdio::from(log))
            .status()
            .with_context(|| format!("running '{}'", generator.display()))?;

        if !status.success() {
            bail!(
                "documentation generator '{}' failed with status {}; see '{}'",
                self.generator,
                status,
                error_log.display()
            );
        }
        Ok(())
    }
}
