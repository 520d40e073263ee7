//! Map free text onto one of the caller's own categories.
//!
//! Priority: keyword concept (synonym bridge) > raw-token fuzzy fallback > nothing.
//! The matcher only ever returns entries of the slice it was given.

use std::collections::BTreeMap;
use std::iter;

use murmur_core::{CategoryOption, Confidence};

use crate::config::ParserConfig;
use crate::fuzzy::{FuzzyHit, FuzzyMatcher};

/// An internal spending concept, used only as a bridge between what people
/// say ("pizza") and whatever they named their category ("Dining").
#[derive(Debug, Clone, Copy)]
pub struct Concept {
    pub name: &'static str,
    /// Other names users commonly give this category
    pub aliases: &'static [&'static str],
    /// Words or phrases in a transcript that signal this concept
    pub triggers: &'static [&'static str],
}

/// Concept table, in matching order.
pub const CONCEPTS: &[Concept] = &[
    Concept {
        name: "food",
        aliases: &["dining", "restaurants", "eating out", "meals"],
        triggers: &[
            "food", "pizza", "burger", "burgers", "lunch", "dinner", "breakfast", "brunch",
            "coffee", "cafe", "restaurant", "snack", "snacks", "meal", "shawarma", "falafel",
            "sushi", "tacos", "sandwich", "takeout", "dessert", "ice cream", "starbucks",
            "mcdonalds", "kfc", "dominos",
        ],
    },
    Concept {
        name: "transport",
        aliases: &["transportation", "commute", "transit", "car"],
        triggers: &[
            "transport", "taxi", "uber", "lyft", "careem", "bus", "train", "metro", "subway",
            "fuel", "gas", "petrol", "parking", "toll", "cab", "ride",
        ],
    },
    Concept {
        name: "entertainment",
        aliases: &["fun", "leisure", "movies"],
        triggers: &[
            "entertainment", "movie", "movies", "cinema", "netflix", "spotify", "concert",
            "game", "games", "gaming", "theater", "bowling",
        ],
    },
    Concept {
        name: "shopping",
        aliases: &["clothing", "retail", "shop"],
        triggers: &[
            "shopping", "clothes", "shirt", "shoes", "dress", "jeans", "mall", "amazon",
            "gift", "gifts", "electronics",
        ],
    },
    Concept {
        name: "health",
        aliases: &["medical", "healthcare", "fitness", "wellness"],
        triggers: &[
            "health", "doctor", "pharmacy", "medicine", "medication", "hospital", "dentist",
            "clinic", "gym", "vitamins", "therapy",
        ],
    },
    Concept {
        name: "bills",
        aliases: &["utilities", "subscriptions"],
        triggers: &[
            "bill", "bills", "electricity", "water", "internet", "phone", "utilities",
            "utility", "subscription", "insurance", "wifi",
        ],
    },
    Concept {
        name: "education",
        aliases: &["learning", "school", "courses"],
        triggers: &[
            "education", "tuition", "course", "courses", "book", "books", "school",
            "university", "class", "udemy", "textbook",
        ],
    },
    Concept {
        name: "travel",
        aliases: &["trips", "vacation", "holidays"],
        triggers: &[
            "travel", "flight", "flights", "hotel", "airbnb", "trip", "vacation", "airline",
            "visa", "luggage",
        ],
    },
    Concept {
        name: "groceries",
        aliases: &["grocery", "supermarket", "food"],
        triggers: &[
            "groceries", "grocery", "supermarket", "vegetables", "fruit", "milk", "eggs",
            "bread", "carrefour", "costco", "walmart",
        ],
    },
    Concept {
        name: "housing",
        aliases: &["home", "rent", "house"],
        triggers: &[
            "rent", "mortgage", "landlord", "apartment", "repairs", "furniture", "maintenance",
        ],
    },
    Concept {
        name: "income",
        aliases: &["salary", "earnings", "revenue"],
        triggers: &[
            "salary", "paycheck", "wages", "income", "bonus", "freelance", "refund", "deposit",
        ],
    },
];

/// Alias hits are indirect evidence and never reach `high` on their own.
const ALIAS_WEIGHT: f64 = 0.9;

/// Fallback tokens shorter than this are ignored.
const MIN_TOKEN_CHARS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchPhase {
    /// A trigger word bridged to this concept
    Keyword { concept: &'static str, trigger: String },
    /// A transcript token resembled the category name directly
    Fallback { token: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMatch {
    pub id: String,
    pub name: String,
    pub confidence: Confidence,
    pub score: f64,
    pub phase: MatchPhase,
}

#[derive(Debug, Clone)]
pub struct CategoryMatcher {
    keyword_threshold: f64,
    strong_threshold: f64,
    fallback_threshold: f64,
    /// concept name -> extra lowercase triggers
    extra: BTreeMap<&'static str, Vec<String>>,
}

impl Default for CategoryMatcher {
    fn default() -> Self {
        Self::from_config(&ParserConfig::default())
    }
}

/// Lowercase, punctuation to spaces, padded so `" word "` lookups are
/// whole-word (and whole-phrase) matches.
fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    format!(" {} ", cleaned.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .collect()
}

impl CategoryMatcher {
    pub fn from_config(config: &ParserConfig) -> Self {
        let mut extra: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for (concept, words) in &config.extra_keywords {
            let Some(c) = CONCEPTS.iter().find(|c| c.name.eq_ignore_ascii_case(concept)) else {
                continue;
            };
            extra
                .entry(c.name)
                .or_default()
                .extend(words.iter().map(|w| normalize(w).trim().to_string()).filter(|w| !w.is_empty()));
        }

        Self {
            keyword_threshold: config.keyword_threshold,
            strong_threshold: config.strong_threshold,
            fallback_threshold: config.fallback_threshold,
            extra,
        }
    }

    fn find_trigger(&self, concept: &Concept, haystack: &str) -> Option<String> {
        let builtin = concept.triggers.iter().map(|t| t.to_string());
        let extra = self.extra.get(concept.name).into_iter().flatten().cloned();
        builtin
            .chain(extra)
            .find(|t| haystack.contains(&format!(" {t} ")))
    }

    fn to_match(
        categories: &[CategoryOption],
        hit: FuzzyHit,
        confidence: Confidence,
        phase: MatchPhase,
    ) -> Option<CategoryMatch> {
        let cat = categories.get(hit.index)?;
        Some(CategoryMatch {
            id: cat.id.clone(),
            name: cat.name.clone(),
            confidence,
            score: hit.score,
            phase,
        })
    }

    /// Best category for `text`, or `None`. Never invents a category.
    pub fn match_category(
        &self,
        fuzzy: &dyn FuzzyMatcher,
        text: &str,
        categories: &[CategoryOption],
    ) -> Option<CategoryMatch> {
        if categories.is_empty() {
            return None;
        }
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();

        self.keyword_phase(fuzzy, text, categories, &names)
            .or_else(|| self.fallback_phase(fuzzy, text, categories, &names))
    }

    fn keyword_phase(
        &self,
        fuzzy: &dyn FuzzyMatcher,
        text: &str,
        categories: &[CategoryOption],
        names: &[&str],
    ) -> Option<CategoryMatch> {
        let haystack = normalize(text);

        for concept in CONCEPTS {
            let Some(trigger) = self.find_trigger(concept, &haystack) else {
                continue;
            };

            let queries = iter::once((concept.name, 1.0))
                .chain(concept.aliases.iter().map(|a| (*a, ALIAS_WEIGHT)));
            let mut best: Option<FuzzyHit> = None;
            for (query, weight) in queries {
                let Some(hit) = fuzzy.best(query, names) else { continue };
                let weighted = FuzzyHit {
                    index: hit.index,
                    score: hit.score * weight,
                };
                if best.is_none_or(|b| weighted.score > b.score) {
                    best = Some(weighted);
                }
            }

            let Some(hit) = best.filter(|h| h.score >= self.keyword_threshold) else {
                tracing::trace!(concept = concept.name, %trigger, "concept had no close category");
                continue;
            };
            let confidence = if hit.score >= self.strong_threshold {
                Confidence::High
            } else {
                Confidence::Medium
            };
            return Self::to_match(
                categories,
                hit,
                confidence,
                MatchPhase::Keyword {
                    concept: concept.name,
                    trigger,
                },
            );
        }
        None
    }

    fn fallback_phase(
        &self,
        fuzzy: &dyn FuzzyMatcher,
        text: &str,
        categories: &[CategoryOption],
        names: &[&str],
    ) -> Option<CategoryMatch> {
        for token in tokenize(text) {
            let Some(hit) = fuzzy.best(token, names) else { continue };
            if hit.score >= self.fallback_threshold {
                return Self::to_match(
                    categories,
                    hit,
                    Confidence::Low,
                    MatchPhase::Fallback {
                        token: token.to_string(),
                    },
                );
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::LevenshteinMatcher;

    fn cats(names: &[(&str, &str)]) -> Vec<CategoryOption> {
        names.iter().map(|(id, n)| CategoryOption::new(*id, *n)).collect()
    }

    fn run(text: &str, categories: &[CategoryOption]) -> Option<CategoryMatch> {
        CategoryMatcher::default().match_category(&LevenshteinMatcher::default(), text, categories)
    }

    #[test]
    fn test_keyword_bridges_to_concept_name() {
        let c = cats(&[("c1", "Food")]);
        let m = run("Spent 25 dollars on pizza", &c).unwrap();
        assert_eq!(m.id, "c1");
        assert_eq!(m.confidence, Confidence::High);
        assert_eq!(
            m.phase,
            MatchPhase::Keyword {
                concept: "food",
                trigger: "pizza".to_string()
            }
        );
    }

    #[test]
    fn test_keyword_bridges_through_alias() {
        let c = cats(&[("c9", "Bills"), ("c1", "Dining")]);
        let m = run("burgers with the team", &c).unwrap();
        assert_eq!(m.id, "c1");
        assert_eq!(m.confidence, Confidence::Medium);
    }

    #[test]
    fn test_taxi_maps_to_transport() {
        let c = cats(&[("c2", "Transport")]);
        let m = run("Paid 15 JD for taxi from Amman", &c).unwrap();
        assert_eq!(m.id, "c2");
        assert!(matches!(m.confidence, Confidence::High | Confidence::Medium));
    }

    #[test]
    fn test_multi_word_trigger() {
        let c = cats(&[("f", "Food & Dining")]);
        let m = run("ice cream downtown", &c).unwrap();
        assert_eq!(m.id, "f");
        assert_eq!(m.confidence, Confidence::Medium);
    }

    #[test]
    fn test_fallback_token_is_low() {
        let c = cats(&[("p", "Pets")]);
        let m = run("vet visit for the pets", &c).unwrap();
        assert_eq!(m.id, "p");
        assert_eq!(m.confidence, Confidence::Low);
        assert_eq!(m.phase, MatchPhase::Fallback { token: "pets".to_string() });
    }

    #[test]
    fn test_no_categories_no_match() {
        assert!(run("pizza at Dominos", &[]).is_none());
    }

    #[test]
    fn test_unrelated_text_no_match() {
        let c = cats(&[("c1", "Food"), ("c2", "Transport")]);
        assert!(run("misc stuff", &c).is_none());
    }

    #[test]
    fn test_concept_without_category_falls_through() {
        // "pizza" triggers food first, but the user has no such category;
        // "taxi" (transport) still resolves.
        let c = cats(&[("c2", "Transport")]);
        let m = run("pizza then a taxi home", &c).unwrap();
        assert_eq!(m.id, "c2");
        assert_eq!(m.confidence, Confidence::High);
    }

    #[test]
    fn test_extra_keywords_from_config() {
        let mut cfg = ParserConfig::default();
        cfg.extra_keywords.insert("food".to_string(), vec!["Mansaf".to_string()]);
        let matcher = CategoryMatcher::from_config(&cfg);
        let c = cats(&[("c1", "Food")]);
        let m = matcher
            .match_category(&LevenshteinMatcher::default(), "mansaf for the family", &c)
            .unwrap();
        assert_eq!(m.id, "c1");
        assert_eq!(m.confidence, Confidence::High);
    }

    #[test]
    fn test_does_not_mutate_or_invent() {
        let c = cats(&[("c1", "Food")]);
        let before = c.clone();
        let m = run("pizza", &c).unwrap();
        assert_eq!(c, before);
        assert!(c.iter().any(|o| o.id == m.id && o.name == m.name));
    }
}
