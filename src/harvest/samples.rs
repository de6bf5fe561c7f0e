//! Sample programs: sources, a build descriptor that works outside the
//! source tree, and the prebuilt binary.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::{makefile, vcxproj, Harvest};
use crate::filesystem::{
    copy_filtered_tree, copy_if_exists, copy_tree_if_exists, rewrite_in_place,
};
use crate::manifest::SampleSpec;

/// Extensions of sample source files that ship with the release.
const SOURCE_EXTENSIONS: &[&str] = &["h", "cpp"];

/// Shared build-system files a sample Makefile includes.
pub(crate) const BUILD_SYSTEM_FILES: &[&str] = &[
    "CommonDefs.mak",
    "CommonTargets.mak",
    "Platform.x86",
    "Platform.x64",
    "Platform.Arm",
    "CommonCppMakefile",
];

/// GLUT import libraries and runtimes bundled with Windows windowing samples.
const GLUT_FILES: &[&str] = &["glut32.lib", "glut64.lib", "glut32.dll", "glut64.dll"];

const SAMPLE_UTILITIES_HEADER: &str = "OniSampleUtilities.h";

impl Harvest {
    /// Harvest one sample into `samples_dir/<name>` and its binary into
    /// `target_bin_dir`.
    pub(crate) fn copy_sample(
        &self,
        samples_dir: &Path,
        target_bin_dir: &Path,
        sample: &SampleSpec,
    ) -> Result<()> {
        if sample.windowing && !self.profile.supports_windowing() {
            tracing::info!(sample = %sample.name, arch = %self.profile.arch(), "skipping windowing sample");
            return Ok(());
        }

        let source_dir = self.root.join("Samples").join(&sample.name);
        let target_dir = samples_dir.join(&sample.name);
        fs::create_dir_all(&target_dir)
            .with_context(|| format!("creating sample dir '{}'", target_dir.display()))?;

        let sources = copy_filtered_tree(&source_dir, &target_dir, SOURCE_EXTENSIONS)?;
        tracing::debug!(sample = %sample.name, sources, "copied sample sources");

        if !sample.library {
            let common = self.root.join("Samples").join("Common");
            copy_if_exists(&common.join(SAMPLE_UTILITIES_HEADER), &target_dir)?;
        }

        if sample.windowing && self.profile.os().is_windows() {
            let gl_dir = self.third_party_gl_dir();
            copy_tree_if_exists(&gl_dir.join("GL"), &target_dir.join("GL"))?;
            for file in GLUT_FILES {
                copy_if_exists(&gl_dir.join(file), &target_dir)?;
            }
        }

        if self.profile.os().is_windows() {
            self.write_project_file(&source_dir, &target_dir, sample)?;
        } else if self.profile.os().is_unix_like() {
            self.write_makefile(&source_dir, &target_dir)?;
        }

        if sample.library {
            self.copy_shared_object(self.profile.bin_dir(), &sample.name, target_bin_dir)?;
            if self.profile.os().is_windows() {
                let import_lib = format!("{}.lib", sample.name);
                copy_if_exists(&self.profile.bin_dir().join(import_lib), target_bin_dir)?;
            }
        } else {
            self.copy_executable(&sample.name, target_bin_dir)?;
        }

        Ok(())
    }

    fn write_project_file(
        &self,
        source_dir: &Path,
        target_dir: &Path,
        sample: &SampleSpec,
    ) -> Result<()> {
        let file_name = format!("{}.vcxproj", sample.name);
        if !copy_if_exists(&source_dir.join(&file_name), target_dir)? {
            return Ok(());
        }

        rewrite_in_place(&target_dir.join(file_name), |xml| {
            vcxproj::patch_project(xml, &self.manifest, sample.windowing)
        })
    }

    fn write_makefile(&self, source_dir: &Path, target_dir: &Path) -> Result<()> {
        let copied = copy_if_exists(&source_dir.join("Makefile"), target_dir)?;

        let build_system = self
            .root
            .join("ThirdParty")
            .join("PSCommon")
            .join("BuildSystem");
        for file in BUILD_SYSTEM_FILES {
            copy_if_exists(&build_system.join(file), target_dir)?;
        }

        if copied {
            rewrite_in_place(&target_dir.join("Makefile"), |text| {
                makefile::patch_makefile(text, &self.manifest)
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::fake_build_tree;
    use super::*;
    use crate::platform::{Arch, OsName};
    use tempfile::TempDir;

    fn harvest(temp: &TempDir, arch: Arch, os: OsName) -> Harvest {
        let root = temp.path().join("root");
        fake_build_tree(&root, arch, &os);
        Harvest::new(root, temp.path().join("out"), arch, os)
    }

    fn sample_dirs(temp: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
        let samples = temp.path().join("Samples");
        let bin = samples.join("Bin");
        fs::create_dir_all(&bin).unwrap();
        (samples, bin)
    }

    #[test]
    fn test_unix_sample_gets_makefile_and_build_system() {
        let temp = TempDir::new().unwrap();
        let harvest = harvest(&temp, Arch::X64, OsName::Linux);
        let (samples, bin) = sample_dirs(&temp);

        harvest
            .copy_sample(&samples, &bin, &SampleSpec::executable("SimpleRead"))
            .unwrap();

        let dir = samples.join("SimpleRead");
        for file in BUILD_SYSTEM_FILES {
            assert!(dir.join(file).is_file(), "{file} should be copied");
        }
        let makefile = fs::read_to_string(dir.join("Makefile")).unwrap();
        assert!(makefile.contains("BIN_DIR = Bin\n"));
        assert!(makefile.contains("$(OUTPUT_FILE): copy-redist"));
        assert!(!dir.join("SimpleRead.vcxproj").exists());
        assert!(bin.join("SimpleRead").is_file());
    }

    #[test]
    fn test_sources_keep_subdirectories() {
        let temp = TempDir::new().unwrap();
        let harvest = harvest(&temp, Arch::X64, OsName::Linux);
        let source = harvest.root().join("Samples/SimpleViewer");
        fs::create_dir_all(source.join("Render")).unwrap();
        fs::write(source.join("Render/Draw.cpp"), "").unwrap();
        fs::write(source.join("Render/Draw.h"), "").unwrap();
        fs::write(source.join("Render/shader.glsl"), "").unwrap();
        let (samples, bin) = sample_dirs(&temp);

        harvest
            .copy_sample(&samples, &bin, &SampleSpec::windowing("SimpleViewer"))
            .unwrap();

        let dir = samples.join("SimpleViewer");
        assert!(dir.join("Render/Draw.cpp").is_file());
        assert!(dir.join("Render/Draw.h").is_file());
        assert!(!dir.join("Render/shader.glsl").exists());
    }

    #[test]
    fn test_library_sample_on_windows() {
        let temp = TempDir::new().unwrap();
        let harvest = harvest(&temp, Arch::X64, OsName::Windows);
        let (samples, bin) = sample_dirs(&temp);

        harvest
            .copy_sample(&samples, &bin, &SampleSpec::library("MWClosestPoint"))
            .unwrap();

        assert!(bin.join("MWClosestPoint.dll").is_file());
        assert!(bin.join("MWClosestPoint.pdb").is_file());
        assert!(bin.join("MWClosestPoint.lib").is_file());
        let dir = samples.join("MWClosestPoint");
        assert!(!dir.join(SAMPLE_UTILITIES_HEADER).exists());
        assert!(dir.join("MWClosestPoint.vcxproj").is_file());
        assert!(!dir.join("Makefile").exists());
    }

    #[test]
    fn test_windows_project_uses_group_suffixes() {
        let temp = TempDir::new().unwrap();
        let harvest = harvest(&temp, Arch::X64, OsName::Windows);
        let (samples, bin) = sample_dirs(&temp);

        harvest
            .copy_sample(&samples, &bin, &SampleSpec::windowing("SimpleViewer"))
            .unwrap();

        let dir = samples.join("SimpleViewer");
        let project = fs::read_to_string(dir.join("SimpleViewer.vcxproj")).unwrap();
        assert!(project.contains("$(OPENNI2_INCLUDE64)"));
        assert!(project.contains("$(OPENNI2_INCLUDE);"));
        assert!(project.contains("glut64.dll"));
        assert!(project.contains("glut32.dll"));
        assert!(!project.contains("<OutDir>"));
        for file in GLUT_FILES {
            assert!(dir.join(file).is_file(), "{file} should be bundled");
        }
        assert!(dir.join("GL/glut.h").is_file());
        assert!(bin.join("SimpleViewer.exe").is_file());
    }

    #[test]
    fn test_windowing_sample_skipped_on_arm() {
        let temp = TempDir::new().unwrap();
        let harvest = harvest(&temp, Arch::Arm, OsName::Linux);
        let (samples, bin) = sample_dirs(&temp);

        harvest
            .copy_sample(&samples, &bin, &SampleSpec::windowing("ClosestPointViewer"))
            .unwrap();

        assert!(!samples.join("ClosestPointViewer").exists());
        assert!(!bin.join("ClosestPointViewer").exists());
    }

    #[test]
    fn test_missing_sample_source_is_tolerated() {
        let temp = TempDir::new().unwrap();
        let harvest = harvest(&temp, Arch::X64, OsName::Darwin);
        let (samples, bin) = sample_dirs(&temp);

        harvest
            .copy_sample(&samples, &bin, &SampleSpec::executable("NoSuchSample"))
            .unwrap();

        let dir = samples.join("NoSuchSample");
        assert!(dir.join(SAMPLE_UTILITIES_HEADER).is_file());
        assert!(!dir.join("Makefile").exists());
    }
}
