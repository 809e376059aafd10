/*!
 * Word importance and category analysis.
 *
 * The category tables (keywords, colors, icons) are plain configuration
 * injected at startup, with a built-in default used whenever the external
 * file is missing or unreadable. Scoring goes through the
 * [`ImportanceScorer`] trait; the shipped implementation is the
 * deterministic [`KeywordScorer`], handed out by a process-wide memoized
 * factory keyed by language code.
 */

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::language_utils;
use crate::styling::{FontWeight, StyleDescriptor};
use crate::word_timing::TimedToken;

/// Words on each side of a token considered its context
const CONTEXT_RADIUS: usize = 5;

/// Maximum number of secondary icons kept per token
const MAX_SECONDARY_ICONS: usize = 2;

/// Word length at which the length factor saturates
const MAX_WORD_LEN: f32 = 20.0;

/// One semantic category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub style: StyleDescriptor,
    /// Keyword specific icons, overriding the category icon
    #[serde(default)]
    pub context_icons: BTreeMap<String, String>,
}

/// Keyword / category / icon tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Categories in priority order
    pub categories: Vec<CategoryDefinition>,
    #[serde(default)]
    pub default_style: StyleDescriptor,
    #[serde(default = "default_important_style")]
    pub important_style: StyleDescriptor,
}

impl CategoryConfig {
    /// Parse a JSON category document
    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Err(anyhow::anyhow!("Empty categories file"));
        }
        Ok(serde_json::from_str(content)?)
    }

    /// Load the tables from `path`, falling back to the built-in default.
    ///
    /// Never fails: a missing, empty or invalid file is logged and ignored.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            warn!("Categories file not found: {}; using built-in categories", path.display());
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_json_str(&content) {
                Ok(config) => {
                    debug!("Loaded {} categories from {}", config.categories.len(), path.display());
                    config
                }
                Err(e) => {
                    warn!("Invalid categories file {}: {}; using built-in categories", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read categories file {}: {}; using built-in categories", path.display(), e);
                Self::default()
            }
        }
    }

    /// Look up a category by name
    pub fn category(&self, name: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.name == name)
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        CategoryConfig {
            categories: builtin_categories(),
            default_style: StyleDescriptor::default(),
            important_style: default_important_style(),
        }
    }
}

fn default_important_style() -> StyleDescriptor {
    StyleDescriptor::new("#FF9900", FontWeight::Bold, "⭐", "glow")
}

fn category(
    name: &str,
    keywords: &[&str],
    style: StyleDescriptor,
    context_icons: &[(&str, &str)],
) -> CategoryDefinition {
    CategoryDefinition {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        style,
        context_icons: context_icons
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

fn builtin_categories() -> Vec<CategoryDefinition> {
    vec![
        category(
            "person",
            &[
                "person", "people", "friend", "family", "mom", "dad", "parent", "parents", "his", "her",
                "them", "they", "brother", "sister", "uncle", "aunt", "boy", "girl", "man", "woman",
                "child", "baby", "guy", "lady", "mother", "father", "son", "daughter", "grandma",
                "grandpa", "husband", "wife",
            ],
            StyleDescriptor::new("#FF5733", FontWeight::Bold, "👥", "scale"),
            &[
                ("person", "🧑"), ("people", "👥"), ("friend", "🤝"), ("family", "👨‍👩‍👧‍👦"),
                ("mom", "👩"), ("mother", "👩"), ("dad", "👨"), ("father", "👨"),
                ("parent", "👪"), ("parents", "👪"),
            ],
        ),
        category(
            "emotion",
            &[
                "happy", "sad", "angry", "excited", "love", "hate", "fear", "joy", "laugh", "cry",
                "smile", "worry", "nervous", "proud", "scared", "surprised", "confused", "tired",
                "bored", "interested",
            ],
            StyleDescriptor::new("#FF33A8", FontWeight::Normal, "😊", "pulse"),
            &[
                ("happy", "😊"), ("sad", "😢"), ("angry", "😠"), ("excited", "🤩"),
                ("love", "❤️"), ("hate", "😡"), ("fear", "😨"), ("joy", "😃"),
                ("laugh", "😂"), ("cry", "😭"), ("smile", "😊"), ("worry", "😟"),
            ],
        ),
        category(
            "action",
            &[
                "run", "walk", "jump", "dance", "sing", "eat", "drink", "sleep", "work", "play",
                "write", "read", "speak", "listen", "watch", "cook", "build", "draw", "swim", "drive",
                "fly", "teach",
            ],
            StyleDescriptor::new("#33FF57", FontWeight::Bold, "🏃", "shake"),
            &[
                ("run", "🏃"), ("walk", "🚶"), ("jump", "⬆️"), ("dance", "💃"), ("sing", "🎤"),
                ("eat", "🍽️"), ("drink", "🥤"), ("sleep", "😴"), ("work", "💼"),
            ],
        ),
        category(
            "time",
            &[
                "today", "tomorrow", "yesterday", "now", "later", "soon", "never", "always", "morning",
                "afternoon", "evening", "night", "year", "month", "week", "day", "hour", "minute",
                "second",
            ],
            StyleDescriptor::new("#3357FF", FontWeight::Normal, "⏰", "rotate"),
            &[
                ("today", "📅"), ("tomorrow", "📆"), ("yesterday", "📅"), ("now", "⌛"),
                ("later", "⏳"), ("soon", "🔜"), ("never", "❌"), ("always", "♾️"),
            ],
        ),
        category(
            "place",
            &[
                "home", "school", "office", "park", "city", "country", "street", "road", "building",
                "house", "apartment", "restaurant", "store", "shop", "market", "mall",
            ],
            StyleDescriptor::new("#FFDA33", FontWeight::Normal, "📍", "bounce"),
            &[
                ("home", "🏠"), ("school", "🏫"), ("office", "🏢"), ("park", "🏞️"),
                ("city", "🌆"), ("country", "🗺️"), ("street", "🛣️"), ("road", "🛣️"),
                ("building", "🏛️"),
            ],
        ),
        category(
            "object",
            &[
                "phone", "computer", "laptop", "tablet", "book", "pen", "pencil", "paper", "notebook",
                "desk", "chair", "table", "bed", "door", "window", "car", "bike", "bus", "train",
            ],
            StyleDescriptor::new("#A833FF", FontWeight::Normal, "📱", "fade"),
            &[
                ("phone", "📱"), ("computer", "💻"), ("laptop", "💻"), ("tablet", "📱"),
                ("book", "📚"), ("pen", "🖊️"), ("pencil", "✏️"), ("paper", "📄"),
                ("notebook", "📓"),
            ],
        ),
    ]
}

/// Tunables for a scoring pass
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    /// Threshold at which a token counts as important
    pub min_importance: f32,
    /// Whether icons are attached to tokens
    pub use_emojis: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            min_importance: 0.5,
            use_emojis: true,
        }
    }
}

/// Fills in importance, categories and icons for a token sequence
pub trait ImportanceScorer: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &str;

    /// Score every token in place. Timing fields are never touched.
    fn analyze(&self, tokens: &mut [TimedToken], categories: &CategoryConfig, options: &AnalysisOptions);
}

// @enum: Where an icon candidate came from, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum IconSource {
    DirectMatch,
    CategoryDefault,
    RelatedContext,
}

impl IconSource {
    fn priority(&self) -> u8 {
        match self {
            Self::DirectMatch => 100,
            Self::CategoryDefault => 70,
            Self::RelatedContext => 50,
        }
    }
}

#[derive(Debug)]
struct IconCandidate<'a> {
    icon: &'a str,
    category: &'a str,
    source: IconSource,
}

/// Deterministic scorer based on word length, frequency, stopwords and
/// capitalization, with keyword-table category matching
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    language: String,
    stopwords: HashSet<&'static str>,
}

const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "but", "or", "for", "nor", "on", "at", "to", "by", "of", "in", "is",
    "am", "are", "was", "were", "be", "been", "it", "its", "this", "that", "these", "those", "i",
    "you", "he", "she", "they", "we",
];

const VIETNAMESE_STOPWORDS: &[&str] = &[
    "là", "và", "của", "có", "không", "được", "cho", "với", "này", "một", "những", "các", "để",
    "trong", "thì", "đã", "sẽ", "rằng", "mà", "cũng", "tôi", "bạn", "anh", "em",
];

impl KeywordScorer {
    /// Create a scorer for a normalized language code
    pub fn for_language(language: &str) -> Self {
        let stopwords = match language {
            "vi" => VIETNAMESE_STOPWORDS.iter().chain(ENGLISH_STOPWORDS).copied().collect(),
            _ => ENGLISH_STOPWORDS.iter().copied().collect(),
        };
        KeywordScorer {
            language: language.to_string(),
            stopwords,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Importance of the token at `position` given word frequencies
    fn importance(&self, text: &str, lower: &str, position: usize, freq: &HashMap<String, usize>, total: usize) -> f32 {
        let length_factor = (lower.chars().count() as f32 / MAX_WORD_LEN).min(1.0) * 0.3;

        let count = freq.get(lower).copied().unwrap_or(0) as f32;
        let freq_factor = (1.0 - count / total as f32) * 0.3;

        let stopword_penalty = if self.stopwords.contains(lower) { 0.4 } else { 0.0 };

        // capitalized away from the start: probably a proper noun
        let proper_noun_bonus = match text.chars().next() {
            Some(c) if c.is_uppercase() && position != 0 => 0.3,
            _ => 0.0,
        };

        (length_factor + freq_factor + proper_noun_bonus - stopword_penalty).clamp(0.0, 1.0)
    }
}

impl ImportanceScorer for KeywordScorer {
    fn name(&self) -> &str {
        "keyword"
    }

    fn analyze(&self, tokens: &mut [TimedToken], categories: &CategoryConfig, options: &AnalysisOptions) {
        if tokens.is_empty() {
            return;
        }

        let lowered: Vec<String> = tokens.iter().map(|t| t.text.to_lowercase()).collect();
        let mut freq: HashMap<String, usize> = HashMap::new();
        for word in &lowered {
            *freq.entry(word.clone()).or_insert(0) += 1;
        }

        let keyword_sets: Vec<HashSet<&str>> = categories
            .categories
            .iter()
            .map(|c| c.keywords.iter().map(String::as_str).collect())
            .collect();

        let total = tokens.len();
        for (i, token) in tokens.iter_mut().enumerate() {
            let lower = &lowered[i];
            token.importance = self.importance(&token.text, lower, i, &freq, total);
            token.important = token.importance >= options.min_importance;

            let window = &lowered[i.saturating_sub(CONTEXT_RADIUS)..(i + CONTEXT_RADIUS + 1).min(total)];

            let mut matched: Vec<String> = Vec::new();
            let mut candidates: Vec<IconCandidate> = Vec::new();

            for (definition, keywords) in categories.categories.iter().zip(&keyword_sets) {
                if keywords.contains(lower.as_str()) {
                    if !matched.contains(&definition.name) {
                        matched.push(definition.name.clone());
                    }
                    match definition.context_icons.get(lower) {
                        Some(icon) => candidates.push(IconCandidate {
                            icon,
                            category: &definition.name,
                            source: IconSource::DirectMatch,
                        }),
                        None => candidates.push(IconCandidate {
                            icon: &definition.style.icon,
                            category: &definition.name,
                            source: IconSource::CategoryDefault,
                        }),
                    }
                }

                for ctx_word in window {
                    if ctx_word == lower || !keywords.contains(ctx_word.as_str()) {
                        continue;
                    }
                    if let Some(icon) = definition.context_icons.get(ctx_word) {
                        candidates.push(IconCandidate {
                            icon,
                            category: &definition.name,
                            source: IconSource::RelatedContext,
                        });
                    }
                }
            }

            candidates.sort_by(|a, b| {
                b.source
                    .priority()
                    .cmp(&a.source.priority())
                    .then_with(|| a.category.cmp(b.category))
            });

            let mut icons: Vec<String> = Vec::new();
            for candidate in &candidates {
                if !candidate.icon.is_empty() && !icons.iter().any(|i| i == candidate.icon) {
                    icons.push(candidate.icon.to_string());
                }
            }

            token.categories = matched;
            if options.use_emojis && !icons.is_empty() {
                token.primary_icon = icons.remove(0);
                icons.truncate(MAX_SECONDARY_ICONS);
                token.secondary_icons = icons;
            } else {
                token.primary_icon.clear();
                token.secondary_icons.clear();
            }
        }

        debug!(
            "{} scorer ({}): {} tokens, {} important",
            self.name(),
            self.language,
            total,
            tokens.iter().filter(|t| t.important).count()
        );
    }
}

/// Process-wide scorer cache, keyed by normalized language code
static SCORERS: Lazy<RwLock<HashMap<String, Arc<dyn ImportanceScorer>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn language_key(language: &str) -> String {
    language_utils::normalize_to_part1_or_part2t(language).unwrap_or_else(|e| {
        debug!("{}; caching scorer under the raw code", e);
        language.trim().to_lowercase()
    })
}

/// Get the scorer for a language, creating it on first use
pub fn scorer_for_language(language: &str) -> Arc<dyn ImportanceScorer> {
    let key = language_key(language);

    if let Some(scorer) = SCORERS.read().get(&key) {
        return Arc::clone(scorer);
    }

    let mut scorers = SCORERS.write();
    let scorer = scorers.entry(key.clone()).or_insert_with(|| {
        match language_utils::get_language_name(&key) {
            Ok(name) => debug!("Creating scorer for {} ({})", name, key),
            Err(_) => debug!("Creating scorer for unrecognized language '{}'", key),
        }
        Arc::new(KeywordScorer::for_language(&key))
    });
    Arc::clone(scorer)
}
