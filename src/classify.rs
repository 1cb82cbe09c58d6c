//! Keyword scoring and verdict selection.
//!
//! Text is lower-cased once, every keyword of a category is counted as a
//! literal, non-overlapping substring, and the per-category sums decide the
//! verdict: all zero is `Safe`, otherwise the highest-scoring category wins.
//! Equal non-zero maxima resolve by `Category::ALL` order
//! (Gambling, then Sports betting, then Prohibited content).

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rules::{self, KEYWORD_TABLE};

/// Fixed risk category set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Gambling,
    SportsBetting,
    Prohibited,
}

impl Category {
    /// All categories in tie-break priority order.
    pub const ALL: [Category; 3] = [
        Category::Gambling,
        Category::SportsBetting,
        Category::Prohibited,
    ];

    fn index(self) -> usize {
        match self {
            Category::Gambling => 0,
            Category::SportsBetting => 1,
            Category::Prohibited => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Gambling => "Gambling",
            Category::SportsBetting => "Sports betting",
            Category::Prohibited => "Prohibited content",
        }
    }

    /// Vietnamese label.
    pub fn label_vi(self) -> &'static str {
        match self {
            Category::Gambling => "Cờ bạc / Cá cược",
            Category::SportsBetting => "Bóng đá cá độ",
            Category::Prohibited => "Nội dung cấm",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Keyword hit counts for exactly the fixed category set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryScores([u32; 3]);

impl CategoryScores {
    pub fn get(&self, category: Category) -> u32 {
        self.0[category.index()]
    }

    fn set(&mut self, category: Category, score: u32) {
        self.0[category.index()] = score;
    }

    /// `(category, score)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn max(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// First category in priority order holding a strictly positive maximum.
    pub fn top(&self) -> Option<Category> {
        let max = self.max();
        if max == 0 {
            return None;
        }
        Category::ALL.into_iter().find(|c| self.get(*c) == max)
    }
}

/// Final verdict of one scanned URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Suspicious(Category),
    /// The page could not be retrieved.
    Unreachable,
}

impl Verdict {
    pub fn from_scores(scores: &CategoryScores) -> Self {
        match scores.top() {
            Some(category) => Verdict::Suspicious(category),
            None => Verdict::Safe,
        }
    }

    pub fn is_safe(&self) -> bool {
        matches!(self, Verdict::Safe)
    }

    pub fn category(&self) -> Option<Category> {
        match self {
            Verdict::Suspicious(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Safe => f.write_str("Safe"),
            Verdict::Suspicious(c) => write!(f, "Suspicious: {c}"),
            Verdict::Unreachable => f.write_str("Could not retrieve"),
        }
    }
}

/// Scores plus the verdict derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub scores: CategoryScores,
    pub verdict: Verdict,
}

/// Count non-overlapping occurrences of each keyword in already
/// lower-cased text.
fn count_keywords(haystack: &str, keywords: &[&str]) -> u32 {
    keywords
        .iter()
        .map(|kw| haystack.matches(kw).count() as u32)
        .sum()
}

/// Score `text` against the static keyword table.
pub fn score(text: &str) -> CategoryScores {
    let lowered = text.to_lowercase();
    let mut scores = CategoryScores::default();
    for (category, keywords) in KEYWORD_TABLE {
        scores.set(*category, count_keywords(&lowered, keywords));
    }
    scores
}

/// Score `text` and derive the verdict.
pub fn classify(text: &str) -> Classification {
    let scores = score(text);
    Classification {
        scores,
        verdict: Verdict::from_scores(&scores),
    }
}

/// Keywords of `category` found in `text`, with their counts. Used for
/// verbose reporting.
pub fn matched_keywords(text: &str, category: Category) -> Vec<(&'static str, u32)> {
    let lowered = text.to_lowercase();
    rules::keywords_for(category)
        .iter()
        .filter_map(|kw| {
            let n = lowered.matches(kw).count() as u32;
            (n > 0).then_some((*kw, n))
        })
        .collect()
}
