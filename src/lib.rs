//! Release packaging for the OpenNI SDK.
//!
//! This crate turns a finished build tree into a distributable SDK layout
//! and stages the plain-text legal pages for the documentation generator.
//! It is made of two independent parts:
//!
//! - **Harvest** - assembles `Redist/`, `Samples/`, `Tools/`, `Documentation/`,
//!   `Include/` and the OS-specific extras from a build root
//! - **Documentation staging** - wraps text files as generator pages and runs
//!   the external generator
//!
//! # Architecture
//!
//! ```text
//! sdk-packaging (this crate)
//!     │
//!     ├── platform   Arch / OsName / PlatformProfile
//!     ├── manifest   what gets packaged (TOML-overridable)
//!     ├── filesystem existence-guarded copy primitives
//!     │
//!     ├── harvest ───┬── redist    shared libraries, drivers, configs
//!     │              ├── samples   sources + build descriptors + binaries
//!     │              ├── vcxproj   Windows project-file rewriting
//!     │              └── makefile  Unix Makefile rewriting
//!     │
//!     └── docs ──────── preflight  generator lookup on PATH
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sdk_packaging::{Arch, Harvest, OsName};
//!
//! let harvest = Harvest::new("/src/OpenNI2", "/tmp/release", Arch::X64, OsName::detect());
//! harvest.run()?;
//! ```

pub mod docs;
pub mod filesystem;
pub mod harvest;
pub mod manifest;
pub mod platform;
pub mod preflight;

pub use docs::{DocPage, DocStager};
pub use harvest::Harvest;
pub use manifest::Manifest;
pub use platform::{Arch, OsName, PlatformProfile};
