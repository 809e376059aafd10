/*!
 * Style resolution.
 *
 * Maps a token's importance flag and categories onto a visual style
 * descriptor, using the category configuration and optional user color
 * overrides.
 */

use std::collections::HashMap;
use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::CategoryConfig;
use crate::errors::StyleError;
use crate::word_timing::TimedToken;

/// Font weight of a styled token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// Capitalized name, used in WebVTT class names
    pub fn class_suffix(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Bold => "Bold",
        }
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Bold => write!(f, "bold"),
        }
    }
}

/// Visual style attached to a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDescriptor {
    /// `#RRGGBB`
    pub color: String,
    #[serde(rename = "font_weight", default)]
    pub weight: FontWeight,
    #[serde(default)]
    pub icon: String,
    #[serde(default = "default_hover_effect")]
    pub hover_effect: String,
}

impl StyleDescriptor {
    pub fn new(color: &str, weight: FontWeight, icon: &str, hover_effect: &str) -> Self {
        StyleDescriptor {
            color: color.to_string(),
            weight,
            icon: icon.to_string(),
            hover_effect: hover_effect.to_string(),
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }

    /// Color without the leading `#`
    pub fn bare_color(&self) -> &str {
        self.color.trim_start_matches('#')
    }
}

impl Default for StyleDescriptor {
    fn default() -> Self {
        StyleDescriptor::new("#000000", FontWeight::Normal, "", "none")
    }
}

fn default_hover_effect() -> String {
    "none".to_string()
}

/// Parse `#RRGGBB` (the `#` is optional) into its channels
pub fn parse_hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// User supplied color overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOverrides {
    /// Replaces the color of the "important" style
    pub primary_color: Option<String>,
    /// Replaces the color of every category style
    pub secondary_color: Option<String>,
}

impl StyleOverrides {
    pub fn is_empty(&self) -> bool {
        self.primary_color.is_none() && self.secondary_color.is_none()
    }
}

/// Resolves style descriptors for analyzed tokens
#[derive(Debug, Clone)]
pub struct StyleResolver {
    category_styles: HashMap<String, StyleDescriptor>,
    default_style: StyleDescriptor,
    important_style: StyleDescriptor,
    use_emojis: bool,
}

impl StyleResolver {
    /// Build a resolver from the category configuration
    pub fn new(config: &CategoryConfig, overrides: Option<&StyleOverrides>, use_emojis: bool) -> Self {
        let mut important_style = config.important_style.clone();
        let mut category_styles: HashMap<String, StyleDescriptor> = config
            .categories
            .iter()
            .map(|c| (c.name.clone(), c.style.clone()))
            .collect();

        if let Some(overrides) = overrides {
            if let Some(primary) = &overrides.primary_color {
                important_style.color = primary.clone();
            }
            if let Some(secondary) = &overrides.secondary_color {
                for style in category_styles.values_mut() {
                    style.color = secondary.clone();
                }
            }
        }

        StyleResolver {
            category_styles,
            default_style: config.default_style.clone(),
            important_style,
            use_emojis,
        }
    }

    /// Resolve the style for one token, reporting invalid configuration
    pub fn try_resolve(&self, important: bool, categories: &[String]) -> Result<StyleDescriptor, StyleError> {
        let (name, style) = match (important, categories.first()) {
            (true, Some(category)) => match self.category_styles.get(category) {
                Some(style) => (category.as_str(), style),
                None => {
                    debug!("Unknown category '{}', using important style", category);
                    ("important", &self.important_style)
                }
            },
            (true, None) => ("important", &self.important_style),
            (false, _) => ("default", &self.default_style),
        };

        if parse_hex_rgb(&style.color).is_none() {
            return Err(StyleError::InvalidColor {
                color: style.color.clone(),
                style: name.to_string(),
            });
        }

        Ok(self.finish(style.clone()))
    }

    /// Resolve the style for one token, falling back to the default style
    pub fn resolve(&self, important: bool, categories: &[String]) -> StyleDescriptor {
        match self.try_resolve(important, categories) {
            Ok(style) => style,
            Err(e) => {
                warn!("{}; using default style", e);
                self.finish(self.default_style.clone())
            }
        }
    }

    fn finish(&self, mut style: StyleDescriptor) -> StyleDescriptor {
        if !self.use_emojis {
            style.icon.clear();
        }
        if style.hover_effect.is_empty() {
            style.hover_effect = default_hover_effect();
        }
        style
    }
}

/// Populate the style of every token
pub fn apply_style(mut tokens: Vec<TimedToken>, resolver: &StyleResolver) -> Vec<TimedToken> {
    for token in tokens.iter_mut() {
        token.style = Some(resolver.resolve(token.important, &token.categories));
    }
    tokens
}
