use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use sdk_packaging::{Arch, DocStager, Harvest, Manifest, OsName};
use tracing_subscriber::EnvFilter;

fn usage() -> &'static str {
    "Usage:\n  sdk-packaging [harvest] <OutDir> <x86|x64|Arm> [--root <dir>] [--manifest <file>]\n  sdk-packaging docs [--root <dir>]\n\nOptions may appear anywhere on the command line."
}

#[derive(Default)]
struct Options {
    root: Option<PathBuf>,
    manifest: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let (positional, options) = parse_args(&args)?;

    match positional.as_slice() {
        ["harvest", out_dir, arch] => harvest(out_dir, arch, options),
        ["docs"] => docs(options),
        [out_dir, arch] if !matches!(*out_dir, "harvest" | "docs") => {
            harvest(out_dir, arch, options)
        }
        _ => bail!(usage()),
    }
}

/// Split `args` into positional arguments and `--flag value` options.
fn parse_args(args: &[String]) -> Result<(Vec<&str>, Options)> {
    let mut positional = Vec::new();
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let slot = match arg.as_str() {
            "--root" => &mut options.root,
            "--manifest" => &mut options.manifest,
            other if other.starts_with("--") => {
                bail!("unknown option '{}'\n{}", other, usage())
            }
            other => {
                positional.push(other);
                continue;
            }
        };
        let value = iter
            .next()
            .ok_or_else(|| anyhow::anyhow!("option '{}' needs a value\n{}", arg, usage()))?;
        *slot = Some(PathBuf::from(value));
    }

    Ok((positional, options))
}

fn resolve_root(options: &Options) -> Result<PathBuf> {
    match &options.root {
        Some(root) => Ok(root.clone()),
        None => std::env::current_dir().context("resolving current directory"),
    }
}

fn harvest(out_dir: &str, arch: &str, options: Options) -> Result<()> {
    let arch: Arch = arch.parse()?;
    let root = resolve_root(&options)?;
    let manifest = match &options.manifest {
        Some(path) => Manifest::load(path)?,
        None => Manifest::default(),
    };

    Harvest::new(&root, out_dir, arch, OsName::detect())
        .with_manifest(manifest)
        .run()
        .with_context(|| format!("harvesting '{}' into '{}'", root.display(), out_dir))
}

fn docs(options: Options) -> Result<()> {
    if options.manifest.is_some() {
        bail!("'docs' does not take a manifest\n{}", usage());
    }
    let root = resolve_root(&options)?;

    DocStager::new(&root)
        .run()
        .with_context(|| format!("building documentation for '{}'", root.display()))
}
