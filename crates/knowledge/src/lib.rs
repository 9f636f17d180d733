//! Local markdown knowledge base.
//!
//! Curated strategy notes live under a root directory as markdown
//! files, addressed by a fixed category/subcategory map. Lookups that
//! miss the map are answers, not errors: the model gets told what IS
//! available and can retry with a valid topic.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use strategos_core::{KnowledgeError, LruCache};

/// Top-level knowledge categories, mirroring the game's main panels
/// plus strategy guides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Mechanics,
    Strategy,
    Nations,
    Resources,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Mechanics,
        Category::Strategy,
        Category::Nations,
        Category::Resources,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mechanics" => Some(Category::Mechanics),
            "strategy" => Some(Category::Strategy),
            "nations" => Some(Category::Nations),
            "resources" => Some(Category::Resources),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Mechanics => "mechanics",
            Category::Strategy => "strategy",
            Category::Nations => "nations",
            Category::Resources => "resources",
        }
    }

    /// The (subcategory, relative file) pairs available in this
    /// category. Mechanics covers the game's eight main panels.
    pub fn entries(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Category::Mechanics => &[
                ("economy", "mechanics/economy_mechanics.md"),
                ("government", "mechanics/government_mechanics.md"),
                ("production", "mechanics/production_mechanics.md"),
                ("society", "mechanics/society_mechanics.md"),
                ("diplomacy", "mechanics/diplomacy_mechanics.md"),
                ("military", "mechanics/military_mechanics.md"),
                ("warfare", "mechanics/warfare_mechanics.md"),
                ("geopolitics", "mechanics/geopolitics_mechanics.md"),
                ("advances", "mechanics/advances_mechanics.md"),
            ],
            Category::Strategy => &[
                ("beginner_route", "strategy/beginner_route.md"),
                ("common_mistakes", "strategy/common_mistakes.md"),
            ],
            Category::Nations => &[("england", "nations/nation_england.md")],
            Category::Resources => &[("all", "resources/eu5_resources.md")],
        }
    }

    pub fn subcategories(&self) -> Vec<&'static str> {
        self.entries().iter().map(|(name, _)| *name).collect()
    }

    fn file_for(&self, subcategory: &str) -> Option<&'static str> {
        self.entries()
            .iter()
            .find(|(name, _)| *name == subcategory)
            .map(|(_, file)| *file)
    }
}

/// The outcome of a knowledge lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeAnswer {
    /// The topic exists and its file was read.
    Found { text: String, source: String },

    /// No subcategory was given; tells the caller what is available.
    Listing { category: String, available: Vec<String> },

    /// The category or subcategory does not exist. The message names
    /// the valid options so the model can correct itself.
    NotFound { message: String },
}

/// Read-through loader over the knowledge directory.
///
/// The root is canonicalized once at construction; a missing root is
/// the one hard error this type produces. File contents are cached in
/// a shared [`LruCache`], keyed by the canonical root so two bases in
/// one process never serve each other's files.
pub struct KnowledgeBase {
    root: PathBuf,
    canonical_root: String,
    cache: Arc<LruCache<String>>,
}

impl KnowledgeBase {
    pub fn new(root: impl AsRef<Path>, cache: Arc<LruCache<String>>) -> Result<Self, KnowledgeError> {
        let root = root.as_ref();
        let canonical = root.canonicalize().map_err(|_| KnowledgeError::RootNotFound {
            path: root.display().to_string(),
        })?;
        Ok(Self {
            canonical_root: canonical.display().to_string(),
            root: canonical,
            cache,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn categories(&self) -> Vec<&'static str> {
        Category::ALL.iter().map(|c| c.as_str()).collect()
    }

    /// Look up a topic. Unknown categories and subcategories come back
    /// as [`KnowledgeAnswer::NotFound`]; only a failed read of an
    /// existing mapping is an error.
    pub fn lookup(
        &self,
        category: &str,
        subcategory: Option<&str>,
    ) -> Result<KnowledgeAnswer, KnowledgeError> {
        let Some(cat) = Category::parse(category) else {
            return Ok(KnowledgeAnswer::NotFound {
                message: format!(
                    "Invalid category '{}'. Available: {}",
                    category,
                    self.categories().join(", ")
                ),
            });
        };

        // Resources has a single aggregate file; default to it.
        let subcategory = match subcategory.filter(|s| !s.is_empty()) {
            Some(s) => s,
            None if cat == Category::Resources => "all",
            None => {
                return Ok(KnowledgeAnswer::Listing {
                    category: cat.as_str().to_string(),
                    available: cat.subcategories().iter().map(|s| s.to_string()).collect(),
                });
            }
        };

        let Some(file) = cat.file_for(subcategory) else {
            return Ok(KnowledgeAnswer::NotFound {
                message: format!(
                    "Invalid subcategory '{}' for '{}'. Available: {}",
                    subcategory,
                    cat.as_str(),
                    cat.subcategories().join(", ")
                ),
            });
        };

        let path = self.root.join(file);
        if !path.exists() {
            tracing::warn!(file = %file, "Knowledge file missing from disk");
            return Ok(KnowledgeAnswer::NotFound {
                message: format!("Knowledge file not found: {file}"),
            });
        }

        let cache_key = format!(
            "knowledge:{}:{}:{}",
            self.canonical_root,
            cat.as_str(),
            subcategory
        );
        let text = self.cache.get_or_compute(&cache_key, || {
            tracing::debug!(file = %file, "Reading knowledge file");
            std::fs::read_to_string(&path).map_err(|e| KnowledgeError::ReadFailed {
                file: file.to_string(),
                reason: e.to_string(),
            })
        })?;

        Ok(KnowledgeAnswer::Found {
            text,
            source: format!("{}/{}", cat.as_str(), subcategory),
        })
    }
}
