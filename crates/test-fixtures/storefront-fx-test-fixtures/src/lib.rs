use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    markup: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// A serialized element tree standing in for a page section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MarkupNode {
    pub tag: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// First descendant (depth-first, document order) matching `.class` or `tag`.
    pub fn find(&self, selector: &str) -> Option<&MarkupNode> {
        self.children.iter().find_map(|child| {
            if child.matches(selector) {
                Some(child)
            } else {
                child.find(selector)
            }
        })
    }

    pub fn matches(&self, selector: &str) -> bool {
        match selector.strip_prefix('.') {
            Some(class) => self.has_class(class),
            None => self.tag.eq_ignore_ascii_case(selector),
        }
    }
}

pub mod markup {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.markup.keys().cloned().collect()
    }

    pub fn load(name: &str) -> Result<MarkupNode> {
        let rel = lookup(&MANIFEST.markup, "markup", name)?;
        super::load_json(rel)
    }
}
