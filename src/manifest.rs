//! What goes into a release.
//!
//! The SDK ships a fixed set of libraries, driver plugins, samples and
//! tools. [`Manifest::default`] encodes that set; a TOML file can override
//! any part of it, e.g. to package a fork with an extra driver:
//!
//! ```toml
//! drivers = ["OniFile", "PS1080", "orbbec", "PSLink", "MyCam"]
//!
//! [[samples]]
//! name = "SimpleRead"
//!
//! [[samples]]
//! name = "SimpleViewer"
//! windowing = true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Package contents. Every field falls back to the SDK default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Core runtime shared library.
    pub core_library: String,
    /// Language-binding companion library.
    pub binding_library: String,
    /// Packaged binding archive, copied verbatim from the bin dir.
    pub binding_archive: String,
    /// Runtime configuration file under `Config/`.
    pub config_file: String,
    /// Driver directory, relative to both the bin dir and `Config/`.
    pub drivers_dir: String,
    /// Driver plugins shipped on every platform.
    pub drivers: Vec<String>,
    /// Vendor driver plugins shipped on Windows only.
    pub windows_drivers: Vec<String>,
    pub samples: Vec<SampleSpec>,
    pub tools: Vec<ToolSpec>,
    /// Prefix of the environment variables emitted into sample build files.
    pub env_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SampleSpec {
    pub name: String,
    /// Built as a shared library rather than an executable.
    #[serde(default)]
    pub library: bool,
    /// Depends on the windowing toolkit (GL/GLUT).
    #[serde(default)]
    pub windowing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolSpec {
    pub name: String,
    #[serde(default)]
    pub windowing: bool,
}

impl SampleSpec {
    pub fn executable(name: &str) -> Self {
        Self {
            name: name.to_string(),
            library: false,
            windowing: false,
        }
    }

    pub fn windowing(name: &str) -> Self {
        Self {
            windowing: true,
            ..Self::executable(name)
        }
    }

    pub fn library(name: &str) -> Self {
        Self {
            library: true,
            ..Self::executable(name)
        }
    }
}

impl ToolSpec {
    fn new(name: &str, windowing: bool) -> Self {
        Self {
            name: name.to_string(),
            windowing,
        }
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            core_library: "OpenNI2".into(),
            binding_library: "OpenNI2.jni".into(),
            binding_archive: "org.openni.jar".into(),
            config_file: "OpenNI.ini".into(),
            drivers_dir: "OpenNI2/Drivers".into(),
            drivers: ["OniFile", "PS1080", "orbbec", "PSLink"]
                .into_iter()
                .map(String::from)
                .collect(),
            windows_drivers: vec!["Kinect".into()],
            samples: vec![
                SampleSpec::executable("SimpleRead"),
                SampleSpec::windowing("SimpleViewer"),
                SampleSpec::executable("EventBasedRead"),
                SampleSpec::windowing("MultiDepthViewer"),
                SampleSpec::executable("MultipleStreamRead"),
                SampleSpec::library("MWClosestPoint"),
                SampleSpec::executable("MWClosestPointApp"),
                SampleSpec::windowing("ClosestPointViewer"),
            ],
            tools: vec![
                ToolSpec::new("NiViewer", true),
                ToolSpec::new("PS1080Console", false),
                ToolSpec::new("PSLinkConsole", false),
            ],
            env_prefix: "OPENNI2".into(),
        }
    }
}

impl Manifest {
    /// Load a manifest from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading manifest '{}'", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing manifest '{}'", path.display()))
    }

    /// `drivers_dir` resolved under `base`, one component at a time.
    pub fn drivers_path(&self, base: &Path) -> PathBuf {
        self.drivers_dir
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(base.to_path_buf(), |path, part| path.join(part))
    }

    /// Include-directory variable, e.g. `OPENNI2_INCLUDE64`.
    pub fn include_var(&self, suffix: &str) -> String {
        format!("{}_INCLUDE{}", self.env_prefix, suffix)
    }

    /// Library-directory variable, e.g. `OPENNI2_LIB64`.
    pub fn lib_var(&self, suffix: &str) -> String {
        format!("{}_LIB{}", self.env_prefix, suffix)
    }

    /// Redistributable-directory variable, e.g. `OPENNI2_REDIST64`.
    pub fn redist_var(&self, suffix: &str) -> String {
        format!("{}_REDIST{}", self.env_prefix, suffix)
    }
}
