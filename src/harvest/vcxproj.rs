//! Sample project-file (`.vcxproj`) rewriting for Windows.
//!
//! The copied project is edited as an XML tree:
//! - `PropertyGroup`s that set `OutDir` are dropped so the default applies
//! - in every `ItemDefinitionGroup`, include and library directories are
//!   redirected to the installed SDK via environment variables
//! - a `PostBuildEvent` copies the redistributables (and the GLUT runtime
//!   for windowing samples) next to the built binary
//!
//! A single project holds groups for several platforms, so the `64`
//! suffix is chosen per group from its `Condition`, not from the
//! architecture being packaged.

use anyhow::{anyhow, Result};
use xmltree::{Element, EmitterConfig, XMLNode};

use crate::manifest::Manifest;

/// Token in a group condition marking a 64-bit configuration.
const X64_MARKER: &str = "x64";

const GL_INCLUDE_DIR: &str = r"..\..\ThirdParty\GL";
const COMMON_INCLUDE_DIR: &str = r"..\Common";
const SDK_INCLUDE_DIR: &str = r"..\..\Include";
const OUT_DIR_MACRO: &str = "$(OutDir)";

/// Rewrite the project file `xml` to build against an installed SDK.
pub fn patch_project(xml: &str, manifest: &Manifest, windowing: bool) -> Result<String> {
    let mut project =
        Element::parse(xml.as_bytes()).map_err(|e| anyhow!("parsing project file: {e}"))?;

    let removed = remove_output_dir_overrides(&mut project);
    tracing::debug!(removed, "dropped OutDir property groups");

    visit_named_mut(&mut project, "ItemDefinitionGroup", &mut |group: &mut Element| {
        patch_item_definition_group(group, manifest, windowing)
    });

    let mut out = Vec::new();
    project
        .write_with_config(&mut out, EmitterConfig::new().perform_indent(true))
        .map_err(|e| anyhow!("serializing project file: {e}"))?;
    Ok(String::from_utf8(out)?)
}

fn patch_item_definition_group(group: &mut Element, manifest: &Manifest, windowing: bool) {
    let is_64 = group
        .attributes
        .get("Condition")
        .is_some_and(|cond| cond.contains(X64_MARKER));
    let (suffix, glut_suffix) = if is_64 { ("64", "64") } else { ("", "32") };

    let include_var = manifest.include_var(suffix);
    match find_descendant_mut(group, "ClCompile")
        .and_then(|compile| find_descendant_mut(compile, "AdditionalIncludeDirectories"))
    {
        Some(include_dirs) => rewrite_text(include_dirs, |dirs| {
            dirs.replace(GL_INCLUDE_DIR, ".")
                .replace(COMMON_INCLUDE_DIR, ".")
                .replace(SDK_INCLUDE_DIR, &format!("$({include_var})"))
        }),
        None => tracing::warn!("ItemDefinitionGroup without ClCompile include directories"),
    }

    let lib_var = manifest.lib_var(suffix);
    match find_descendant_mut(group, "Link")
        .and_then(|link| find_descendant_mut(link, "AdditionalLibraryDirectories"))
    {
        Some(lib_dirs) => rewrite_text(lib_dirs, |dirs| {
            dirs.replace(OUT_DIR_MACRO, &format!("{OUT_DIR_MACRO};$({lib_var})"))
        }),
        None => tracing::warn!("ItemDefinitionGroup without Link library directories"),
    }

    let mut command = format!(
        "xcopy /D /S /F /Y \"$({})\\*\" \"$(OutDir)\"\n",
        manifest.redist_var(suffix)
    );
    if windowing {
        command.push_str(&format!(
            "xcopy /D /F /Y \"$(ProjectDir)\\glut{glut_suffix}.dll\" \"$(OutDir)\"\n"
        ));
    }

    let mut command_node = child_element(group, "Command");
    command_node.children.push(XMLNode::Text(command));
    let mut post_build = child_element(group, "PostBuildEvent");
    post_build.children.push(XMLNode::Element(command_node));
    group.children.push(XMLNode::Element(post_build));
}

/// New element in the same namespace as `parent`.
fn child_element(parent: &Element, name: &str) -> Element {
    let mut element = Element::new(name);
    element.namespace = parent.namespace.clone();
    element
}

/// Drop every `PropertyGroup` that contains an `OutDir`, at any depth.
fn remove_output_dir_overrides(element: &mut Element) -> usize {
    let before = element.children.len();
    element.children.retain(|node| {
        !matches!(node, XMLNode::Element(child)
            if child.name == "PropertyGroup" && has_descendant(child, "OutDir"))
    });
    let mut removed = before - element.children.len();

    for node in &mut element.children {
        if let XMLNode::Element(child) = node {
            removed += remove_output_dir_overrides(child);
        }
    }
    removed
}

fn has_descendant(element: &Element, name: &str) -> bool {
    element.children.iter().any(|node| match node {
        XMLNode::Element(child) => child.name == name || has_descendant(child, name),
        _ => false,
    })
}

/// First descendant named `name`, in document order.
fn find_descendant_mut<'a>(element: &'a mut Element, name: &str) -> Option<&'a mut Element> {
    for node in element.children.iter_mut() {
        if let XMLNode::Element(child) = node {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = find_descendant_mut(child, name) {
                return Some(found);
            }
        }
    }
    None
}

/// Call `visit` on every descendant named `name`, in document order.
fn visit_named_mut(element: &mut Element, name: &str, visit: &mut dyn FnMut(&mut Element)) {
    for node in element.children.iter_mut() {
        if let XMLNode::Element(child) = node {
            if child.name == name {
                visit(child);
            }
            visit_named_mut(child, name, visit);
        }
    }
}

/// Rewrite the leading text node of `element`, if it has one.
fn rewrite_text(element: &mut Element, rewrite: impl FnOnce(&str) -> String) {
    if let Some(XMLNode::Text(text)) = element.children.first_mut() {
        *text = rewrite(text);
    } else {
        tracing::warn!(element = %element.name, "expected text content");
    }
}
