//! Sample Makefile rewriting for Linux and Darwin.
//!
//! Sample Makefiles in the source tree assume they sit two levels below the
//! repository root. In a release they sit next to copies of the shared
//! build-system files and link against an installed SDK instead, found via
//! environment variables.
//!
//! Edits are applied line by line:
//! - the `../../ThirdParty/PSCommon/BuildSystem/` prefix is stripped
//! - `BIN_DIR = ../../Bin` becomes `BIN_DIR = Bin`
//! - `include Common…Makefile` is wrapped in an environment guard and a
//!   `copy-redist` target that the final output depends on

use anyhow::Result;
use regex::{Captures, Regex};

use crate::manifest::Manifest;

const BUILD_SYSTEM_PREFIX: &str = "../../ThirdParty/PSCommon/BuildSystem/";
const BIN_DIR_LINE: &str = "BIN_DIR = ../../Bin";
const LOCAL_BIN_DIR_LINE: &str = "BIN_DIR = Bin";
const COMMON_INCLUDE_PATTERN: &str = r"include (Common.*Makefile)";

/// Rewrite a sample Makefile to build against an installed SDK.
pub fn patch_makefile(text: &str, manifest: &Manifest) -> Result<String> {
    let include_anchor = Regex::new(COMMON_INCLUDE_PATTERN)?;
    let include_var = manifest.include_var("");
    let redist_var = manifest.redist_var("");

    let mut patched = String::with_capacity(text.len() + 512);
    for line in text.split_inclusive('\n') {
        let line = line
            .replace(BUILD_SYSTEM_PREFIX, "")
            .replace(BIN_DIR_LINE, LOCAL_BIN_DIR_LINE);
        let line = include_anchor.replace_all(&line, |caps: &Captures| {
            redist_block(&include_var, &redist_var, &caps[1])
        });
        patched.push_str(&line);
    }
    Ok(patched)
}

/// Guard, include path and `copy-redist` target injected around the common
/// makefile include.
fn redist_block(include_var: &str, redist_var: &str, common_makefile: &str) -> String {
    format!(
        "
ifndef {include_var}
    $(error {include_var} is not defined. Please define it or 'source' the OpenNIDevEnvironment file from the installation)
else ifndef {redist_var}
    $(error {redist_var} is not defined. Please define it or 'source' the OpenNIDevEnvironment file from the installation)
endif

INC_DIRS += $({include_var})

include {common_makefile}

.PHONY: copy-redist
copy-redist:
\tcp -R $({redist_var})/* $(OUT_DIR)

$(OUTPUT_FILE): copy-redist
"
    )
}
