use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A stored headline. Global and local records share this shape; local
/// records carry the resolved place name in `location`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub source: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub category: String,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// The seven categories swept on every global fetch. Stored records carry
/// the capitalized form; the news provider expects the lowercase form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Business,
    Sports,
    Entertainment,
    Health,
    Science,
    General,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Technology,
        Category::Business,
        Category::Sports,
        Category::Entertainment,
        Category::Health,
        Category::Science,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Business => "Business",
            Category::Sports => "Sports",
            Category::Entertainment => "Entertainment",
            Category::Health => "Health",
            Category::Science => "Science",
            Category::General => "General",
        }
    }

    pub fn api_value(&self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Business => "business",
            Category::Sports => "sports",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Science => "science",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "technology" => Ok(Category::Technology),
            "business" => Ok(Category::Business),
            "sports" => Ok(Category::Sports),
            "entertainment" => Ok(Category::Entertainment),
            "health" => Ok(Category::Health),
            "science" => Ok(Category::Science),
            "general" => Ok(Category::General),
            other => Err(Error::InvalidInput(format!("unknown category: {}", other))),
        }
    }
}

/// Three-way headline sentiment. Records start Neutral and are only
/// rewritten by the classifier pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(Error::InvalidInput(format!("unknown sentiment: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_roundtrips_through_canonical_name() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!("SPORTS".parse::<Category>().unwrap(), Category::Sports);
        assert_eq!("technology".parse::<Category>().unwrap(), Category::Technology);
        assert!("weather".parse::<Category>().is_err());
    }

    #[test]
    fn sentiment_defaults_to_neutral() {
        assert_eq!(Sentiment::default(), Sentiment::Neutral);
    }

    #[test]
    fn sentiment_parses_stored_form() {
        assert_eq!("Positive".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert_eq!("negative".parse::<Sentiment>().unwrap(), Sentiment::Negative);
    }
}
