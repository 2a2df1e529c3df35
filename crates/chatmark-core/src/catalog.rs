//! Emoji catalog: shortcode alias resolution and glyph lookup.
//!
//! The catalog is an explicit process-wide service with an init-once
//! lifecycle. A compiled-in preload subset answers lookups synchronously
//! from the first render; the full dataset is parsed at most once per
//! process and strictly augments the preload (entries are only ever
//! added, never removed). Load failure degrades to the preload subset and
//! is reported through the `log` facade only.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};
use thiserror::Error;

const EMBEDDED_DATASET: &str = include_str!("../data/emojis.json");

/// Skin-tone variant of a diversity-capable emoji.
#[derive(Debug, Clone, Deserialize)]
pub struct ToneVariant {
    pub tone: u8,
    #[serde(rename = "char")]
    pub glyph: String,
    #[serde(default)]
    pub names: Vec<String>,
}

/// One emoji as stored in the dataset. `names` lists every accepted
/// shortcode alias; the first one is the primary name.
#[derive(Debug, Clone, Deserialize)]
pub struct EmojiEntry {
    pub name: String,
    #[serde(rename = "char")]
    pub glyph: String,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default, rename = "hasDiversity")]
    pub has_diversity: bool,
    #[serde(default)]
    pub diversity: Vec<ToneVariant>,
}

#[derive(Debug, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
    pub emojis: Vec<EmojiEntry>,
}

#[derive(Debug, Deserialize)]
pub struct Dataset {
    pub categories: Vec<Category>,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read emoji dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse emoji dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Built once from a dataset; immutable afterwards. Alias keys are
/// lowercase; `alias_to_primary` is many-to-one and covers tone-variant
/// aliases, `name_to_glyph` covers the primary plus every alias.
#[derive(Debug, Clone, Default)]
struct AliasIndex {
    alias_to_primary: HashMap<String, String>,
    name_to_glyph: HashMap<String, String>,
    diversity_capable: HashSet<String>,
}

impl AliasIndex {
    fn from_dataset(dataset: &Dataset) -> Self {
        let mut index = AliasIndex::default();
        for category in &dataset.categories {
            for entry in &category.emojis {
                index.insert_entry(entry);
            }
        }
        index
    }

    fn insert_entry(&mut self, entry: &EmojiEntry) {
        let primary = entry
            .names
            .first()
            .map(String::as_str)
            .unwrap_or(&entry.name)
            .to_lowercase();

        let base_names: Vec<&str> = if entry.names.is_empty() {
            vec![entry.name.as_str()]
        } else {
            entry.names.iter().map(String::as_str).collect()
        };
        for alias in base_names {
            let key = alias.to_lowercase();
            self.name_to_glyph.insert(key.clone(), entry.glyph.clone());
            self.alias_to_primary.insert(key, primary.clone());
        }

        for variant in &entry.diversity {
            for alias in &variant.names {
                let key = alias.to_lowercase();
                self.name_to_glyph.insert(key.clone(), variant.glyph.clone());
                self.alias_to_primary.insert(key, primary.clone());
            }
        }
        if entry.has_diversity && !entry.diversity.is_empty() {
            self.diversity_capable.insert(primary);
        }
    }

    // Fills in entries the dataset is missing so a partial replacement
    // dataset can never lose preload coverage.
    fn absorb_missing(&mut self, other: &AliasIndex) {
        for (alias, primary) in &other.alias_to_primary {
            self.alias_to_primary
                .entry(alias.clone())
                .or_insert_with(|| primary.clone());
        }
        for (name, glyph) in &other.name_to_glyph {
            self.name_to_glyph
                .entry(name.clone())
                .or_insert_with(|| glyph.clone());
        }
    }
}

/// The most common shortcodes, resolvable before the dataset loads. Each
/// alias is its own primary here; the full dataset confirms or extends.
const PRELOAD: &[(&str, &str)] = &[
    ("grinning", "\u{1F600}"),
    ("smiley", "\u{1F603}"),
    ("smile", "\u{1F604}"),
    ("joy", "\u{1F602}"),
    ("innocent", "\u{1F607}"),
    ("heart_eyes", "\u{1F60D}"),
    ("thinking", "\u{1F914}"),
    ("sob", "\u{1F62D}"),
    ("thumbsup", "\u{1F44D}"),
    ("wave", "\u{1F44B}"),
    ("eyes", "\u{1F440}"),
    ("heart", "\u{2764}\u{FE0F}"),
    ("fire", "\u{1F525}"),
    ("tada", "\u{1F389}"),
    ("rocket", "\u{1F680}"),
    ("white_check_mark", "\u{2705}"),
    ("warning", "\u{26A0}\u{FE0F}"),
    ("green_circle", "\u{1F7E2}"),
    ("red_circle", "\u{1F534}"),
];

static PRELOAD_INDEX: Lazy<AliasIndex> = Lazy::new(|| {
    let mut index = AliasIndex::default();
    for (alias, glyph) in PRELOAD {
        index
            .alias_to_primary
            .insert((*alias).to_string(), (*alias).to_string());
        index.name_to_glyph.insert((*alias).to_string(), (*glyph).to_string());
    }
    index
});

#[derive(Debug, Clone)]
enum DatasetSource {
    Embedded,
    File(PathBuf),
}

/// Process-wide emoji catalog. Obtain through [`catalog`].
pub struct EmojiCatalog {
    full: OnceLock<AliasIndex>,
    load_started: AtomicBool,
    source: Mutex<DatasetSource>,
}

static CATALOG: EmojiCatalog = EmojiCatalog {
    full: OnceLock::new(),
    load_started: AtomicBool::new(false),
    source: Mutex::new(DatasetSource::Embedded),
};

pub fn catalog() -> &'static EmojiCatalog {
    &CATALOG
}

impl EmojiCatalog {
    /// Installs a dataset file to load instead of the embedded default.
    /// Has no effect once the dataset has been loaded.
    pub fn set_dataset_path(&self, path: impl Into<PathBuf>) {
        if self.full.get().is_some() {
            log::debug!("emoji dataset already loaded, ignoring dataset path override");
            return;
        }
        if let Ok(mut source) = self.source.lock() {
            *source = DatasetSource::File(path.into());
        }
    }

    /// Resolves a shortcode alias to its primary name. Case-insensitive.
    pub fn resolve(&self, alias: &str) -> Option<String> {
        let key = alias.to_lowercase();
        self.full
            .get()
            .and_then(|index| index.alias_to_primary.get(&key))
            .or_else(|| PRELOAD_INDEX.alias_to_primary.get(&key))
            .cloned()
    }

    /// Looks up the display glyph for a primary name or alias.
    pub fn glyph_of(&self, name: &str) -> Option<String> {
        let key = name.to_lowercase();
        self.full
            .get()
            .and_then(|index| index.name_to_glyph.get(&key))
            .or_else(|| PRELOAD_INDEX.name_to_glyph.get(&key))
            .cloned()
    }

    /// Tone-variant glyph for a diversity-capable primary, following the
    /// `{primary}_tone{n}` alias convention. `None` when the tone is out
    /// of range or the dataset has no such variant.
    pub fn tone_glyph(&self, primary: &str, tone: u8) -> Option<String> {
        if !(1..=5).contains(&tone) {
            return None;
        }
        let capable = self
            .full
            .get()
            .map(|index| index.diversity_capable.contains(primary))
            .unwrap_or(false);
        if !capable {
            return None;
        }
        self.glyph_of(&format!("{primary}_tone{tone}"))
    }

    /// True once the full dataset (or its degraded preload fallback) has
    /// been installed.
    pub fn is_loaded(&self) -> bool {
        self.full.get().is_some()
    }

    /// Blocking, memoized one-time load. Concurrent callers share the
    /// single initialization. Never fails: a broken dataset logs a
    /// warning and leaves the preload subset serving lookups.
    pub fn ensure_loaded(&self) {
        self.load_started.store(true, Ordering::SeqCst);
        self.full.get_or_init(|| {
            let source = self
                .source
                .lock()
                .map(|guard| guard.clone())
                .unwrap_or(DatasetSource::Embedded);
            match load_dataset(&source) {
                Ok(dataset) => {
                    let mut index = AliasIndex::from_dataset(&dataset);
                    index.absorb_missing(&PRELOAD_INDEX);
                    write_marker();
                    index
                }
                Err(err) => {
                    log::warn!("emoji dataset load failed, keeping preload subset: {err}");
                    PRELOAD_INDEX.clone()
                }
            }
        });
    }

    /// Fire-and-forget load trigger used by the render path. Eager when a
    /// previous process recorded a completed load, background otherwise.
    /// At most one trigger takes effect per process.
    pub fn request_load(&'static self) {
        if self.full.get().is_some() || self.load_started.swap(true, Ordering::SeqCst) {
            return;
        }
        #[cfg(target_arch = "wasm32")]
        {
            self.ensure_loaded();
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            if marker_exists() {
                self.ensure_loaded();
            } else {
                std::thread::spawn(|| catalog().ensure_loaded());
            }
        }
    }
}

fn load_dataset(source: &DatasetSource) -> Result<Dataset, DatasetError> {
    let text: Cow<'_, str> = match source {
        DatasetSource::Embedded => Cow::Borrowed(EMBEDDED_DATASET),
        DatasetSource::File(path) => Cow::Owned(fs::read_to_string(path)?),
    };
    Ok(serde_json::from_str(&text)?)
}

fn marker_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("chatmark").join("emoji-dataset.loaded"))
}

#[cfg(not(target_arch = "wasm32"))]
fn marker_exists() -> bool {
    marker_path().is_some_and(|path| path.exists())
}

fn write_marker() {
    if let Some(path) = marker_path() {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let _ = fs::write(path, b"");
    }
}
