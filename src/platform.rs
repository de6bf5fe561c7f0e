//! Target platform description.
//!
//! Every copy decision in a harvest run branches on the operating system
//! and CPU architecture. [`PlatformProfile`] folds both into the handful of
//! naming conventions the assembler needs, computed once per run.

use anyhow::{bail, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// CPU architecture of the build being packaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86,
    X64,
    /// Embedded target. No windowing toolkit exists here.
    Arm,
}

impl Arch {
    /// Tag used in build directory names (`Bin/<tag>-Release`).
    pub fn tag(self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X64 => "x64",
            Arch::Arm => "Arm",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Arch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "x86" => Ok(Arch::X86),
            "x64" => Ok(Arch::X64),
            "Arm" => Ok(Arch::Arm),
            other => bail!("unsupported architecture '{}'; expected x86, x64 or Arm", other),
        }
    }
}

/// Host operating system the release is assembled for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OsName {
    Windows,
    Linux,
    Darwin,
    /// Anything else. Kept so that naming shared objects for it can fail loudly.
    Other(String),
}

impl OsName {
    /// Detect the OS this binary was compiled for.
    pub fn detect() -> Self {
        Self::from_target_os(std::env::consts::OS)
    }

    /// Map a Rust target OS name (`std::env::consts::OS`) to an [`OsName`].
    pub fn from_target_os(os: &str) -> Self {
        match os {
            "windows" => OsName::Windows,
            "linux" => OsName::Linux,
            "macos" => OsName::Darwin,
            other => OsName::Other(other.to_string()),
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, OsName::Windows)
    }

    /// Linux and Darwin share the Makefile-based sample build.
    pub fn is_unix_like(&self) -> bool {
        matches!(self, OsName::Linux | OsName::Darwin)
    }
}

impl fmt::Display for OsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsName::Windows => write!(f, "Windows"),
            OsName::Linux => write!(f, "Linux"),
            OsName::Darwin => write!(f, "Darwin"),
            OsName::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Naming conventions derived from (OS, architecture).
///
/// Built once by [`PlatformProfile::new`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    arch: Arch,
    os: OsName,
    bin_dir: PathBuf,
    glut_suffix: &'static str,
}

impl PlatformProfile {
    pub fn new(root: &Path, arch: Arch, os: OsName) -> Self {
        let bin_dir = match (&os, arch) {
            (OsName::Windows, Arch::X86) => root.join("Bin").join("Win32-Release"),
            _ => root.join("Bin").join(format!("{}-Release", arch.tag())),
        };
        let glut_suffix = match (&os, arch) {
            (OsName::Windows, Arch::X64) => "64",
            _ => "32",
        };

        Self {
            arch,
            os,
            bin_dir,
            glut_suffix,
        }
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    pub fn os(&self) -> &OsName {
        &self.os
    }

    /// Directory holding the compiled binaries for this platform.
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// Suffix of the windowing runtime (`glut32` / `glut64`).
    pub fn glut_suffix(&self) -> &'static str {
        self.glut_suffix
    }

    /// Whether windowing-toolkit-dependent artifacts can exist at all.
    pub fn supports_windowing(&self) -> bool {
        self.arch != Arch::Arm
    }

    /// File names that make up shared object `name` on this platform.
    ///
    /// Fails for operating systems with no known shared-library convention.
    pub fn shared_object_files(&self, name: &str) -> Result<Vec<String>> {
        match &self.os {
            OsName::Windows => Ok(vec![format!("{name}.dll"), format!("{name}.pdb")]),
            OsName::Linux => Ok(vec![format!("lib{name}.so")]),
            OsName::Darwin => Ok(vec![format!("lib{name}.dylib")]),
            OsName::Other(os) => bail!("unsupported platform '{}'", os),
        }
    }

    /// File names that make up executable `name` on this platform.
    pub fn executable_files(&self, name: &str) -> Vec<String> {
        if self.os.is_windows() {
            vec![format!("{name}.exe"), format!("{name}.pdb")]
        } else {
            vec![name.to_string()]
        }
    }
}
