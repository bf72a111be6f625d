use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagRecord {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub color: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Founder {
    pub name: String,
    #[serde(default)]
    pub linked_in_url: String,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website_url: Option<String>,
    /// Tag slugs, order-significant: the first slug is the primary tag.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub founders: Vec<Founder>,
}

#[derive(Clone, Debug)]
pub struct Directory {
    pub startups: Vec<StartupRecord>,
    pub tags: Vec<TagRecord>,
}

impl Directory {
    pub fn startup_by_id(&self, id: &str) -> Option<&StartupRecord> {
        self.startups.iter().find(|startup| startup.id == id)
    }
}

pub fn load_directory(data_dir: &Path) -> Result<Directory> {
    let mut startups: Vec<StartupRecord> = read_json_file(&data_dir.join("startups.json"))
        .context("failed to load startups.json")?;
    let tags: Vec<TagRecord> =
        read_json_file(&data_dir.join("fields.json")).context("failed to load fields.json")?;

    for startup in &mut startups {
        normalize_slugs(&mut startup.tags);
    }

    Ok(Directory { startups, tags })
}

fn read_json_file<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

// Empty and repeated slugs come from hand-edited data files; the layout
// only ever consults the first two slugs, so duplicates would waste a slot.
fn normalize_slugs(slugs: &mut Vec<String>) {
    let mut seen = HashSet::new();
    slugs.retain(|slug| !slug.is_empty() && seen.insert(slug.clone()));
}
