//! Release assembly ("harvest").
//!
//! Rebuilds a release directory from a build tree. The run is a fixed
//! sequence of steps; each one only adds files under a freshly recreated
//! output root, so running twice yields the same tree.
//!
//! - [`redist`] - the redistributable set (runtime, bindings, drivers)
//! - [`samples`] - sample sources, build descriptors and binaries
//! - [`vcxproj`] - Windows project-file rewriting
//! - [`makefile`] - Unix Makefile rewriting
//!
//! Missing artifacts are skipped, not failed: the set of things that get
//! built differs per platform and architecture.
//!
//! # Output layout
//!
//! ```text
//! <out>/
//!     Redist/              runtime + OpenNI2/Drivers/
//!     Samples/Bin/         runtime + sample binaries
//!     Samples/<Name>/      sources + project file or Makefile
//!     Tools/               runtime + tool executables
//!     Documentation/
//!     Include/
//!     Driver/ Lib/         (Windows)
//!     install.sh *.rules   (Linux, Darwin)
//!     ReleaseNotes.txt CHANGES.txt NOTICE LICENSE
//! ```

pub mod makefile;
pub mod redist;
pub mod samples;
pub mod vcxproj;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::filesystem::{copy_if_exists, copy_tree_if_exists, recreate_dir};
use crate::manifest::{Manifest, ToolSpec};
use crate::platform::{Arch, OsName, PlatformProfile};

/// Top-level files copied from the build root into the release root.
const RELEASE_FILES: &[&str] = &["ReleaseNotes.txt", "CHANGES.txt", "NOTICE", "LICENSE"];

/// One release assembly: (root, output, architecture, OS) plus the manifest.
///
/// Immutable once constructed.
#[derive(Debug, Clone)]
pub struct Harvest {
    root: PathBuf,
    out_dir: PathBuf,
    profile: PlatformProfile,
    manifest: Manifest,
}

impl Harvest {
    pub fn new(
        root: impl Into<PathBuf>,
        out_dir: impl Into<PathBuf>,
        arch: Arch,
        os: OsName,
    ) -> Self {
        let root = root.into();
        let profile = PlatformProfile::new(&root, arch, os);
        Self {
            root,
            out_dir: out_dir.into(),
            profile,
            manifest: Manifest::default(),
        }
    }

    /// Replace the default package contents.
    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Assemble the release. Destroys whatever was at the output path first.
    pub fn run(&self) -> Result<()> {
        tracing::info!(
            root = %self.root.display(),
            out = %self.out_dir.display(),
            arch = %self.profile.arch(),
            os = %self.profile.os(),
            "harvesting release"
        );
        recreate_dir(&self.out_dir)?;

        tracing::info!("copying redistributables");
        self.copy_redist_files(&self.out_dir.join("Redist"))?;

        tracing::info!("copying samples");
        let samples_dir = self.out_dir.join("Samples");
        let samples_bin_dir = samples_dir.join("Bin");
        self.copy_redist_files(&samples_bin_dir)?;
        self.copy_glut(&samples_bin_dir)?;
        for sample in &self.manifest.samples {
            self.copy_sample(&samples_dir, &samples_bin_dir, sample)
                .with_context(|| format!("harvesting sample '{}'", sample.name))?;
        }

        tracing::info!("copying tools");
        let tools_dir = self.out_dir.join("Tools");
        self.copy_redist_files(&tools_dir)?;
        self.copy_glut(&tools_dir)?;
        for tool in &self.manifest.tools {
            self.copy_tool(&tools_dir, tool)?;
        }

        tracing::info!("copying documentation");
        self.copy_documentation(&self.out_dir.join("Documentation"))?;

        tracing::info!("copying headers");
        copy_tree_if_exists(&self.root.join("Include"), &self.out_dir.join("Include"))?;

        for name in RELEASE_FILES {
            copy_if_exists(&self.root.join(name), &self.out_dir)?;
        }

        self.copy_platform_extras()?;

        tracing::info!(out = %self.out_dir.display(), "harvest complete");
        Ok(())
    }

    /// Copy every file making up shared object `name` from `source_dir`.
    pub(crate) fn copy_shared_object(
        &self,
        source_dir: &Path,
        name: &str,
        target_dir: &Path,
    ) -> Result<()> {
        for file in self.profile.shared_object_files(name)? {
            copy_if_exists(&source_dir.join(file), target_dir)?;
        }
        Ok(())
    }

    /// Copy executable `name` (and its debug symbols on Windows) from the bin dir.
    pub(crate) fn copy_executable(&self, name: &str, target_dir: &Path) -> Result<()> {
        for file in self.profile.executable_files(name) {
            copy_if_exists(&self.profile.bin_dir().join(file), target_dir)?;
        }
        Ok(())
    }

    fn copy_tool(&self, tools_dir: &Path, tool: &ToolSpec) -> Result<()> {
        if tool.windowing && !self.profile.supports_windowing() {
            tracing::info!(tool = %tool.name, arch = %self.profile.arch(), "skipping windowing tool");
            return Ok(());
        }
        self.copy_executable(&tool.name, tools_dir)
    }

    /// Windowing runtime next to the binaries that need it (Windows only).
    fn copy_glut(&self, target_dir: &Path) -> Result<()> {
        if self.profile.os().is_windows() {
            let dll = format!("glut{}.dll", self.profile.glut_suffix());
            copy_if_exists(&self.third_party_gl_dir().join(dll), target_dir)?;
        }
        Ok(())
    }

    fn copy_documentation(&self, doc_dir: &Path) -> Result<()> {
        fs::create_dir_all(doc_dir)
            .with_context(|| format!("creating documentation dir '{}'", doc_dir.display()))?;

        let cpp_docs = self.root.join("Source").join("Documentation").join("cpp");
        if self.profile.os().is_windows() {
            copy_if_exists(&cpp_docs.join("OpenNI.chm"), doc_dir)?;
        } else {
            copy_tree_if_exists(&cpp_docs, &doc_dir.join("cpp"))?;
        }
        Ok(())
    }

    /// Windows: kernel driver tree and import library. Elsewhere: install
    /// script and device permission rules.
    fn copy_platform_extras(&self) -> Result<()> {
        if self.profile.os().is_windows() {
            tracing::info!("copying driver and import library");
            let driver_bin = self
                .root
                .join("ThirdParty")
                .join("PSCommon")
                .join("XnLib")
                .join("Driver")
                .join("Win32")
                .join("Bin");
            copy_tree_if_exists(&driver_bin, &self.out_dir.join("Driver"))?;

            let lib_dir = self.out_dir.join("Lib");
            fs::create_dir_all(&lib_dir)
                .with_context(|| format!("creating library dir '{}'", lib_dir.display()))?;
            let import_lib = format!("{}.lib", self.manifest.core_library);
            copy_if_exists(&self.profile.bin_dir().join(import_lib), &lib_dir)?;
        } else {
            tracing::info!("copying install script and udev rules");
            let packaging = self.root.join("Packaging").join("Linux");
            copy_if_exists(&packaging.join("install.sh"), &self.out_dir)?;
            copy_if_exists(&packaging.join("primesense-usb.rules"), &self.out_dir)?;
        }
        Ok(())
    }

    pub(crate) fn third_party_gl_dir(&self) -> PathBuf {
        self.root.join("ThirdParty").join("GL")
    }
}
