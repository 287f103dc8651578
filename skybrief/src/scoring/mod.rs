//! Advisory scoring and ranking
//!
//! The engine sums independent weighted rule contributions per record;
//! the prioritizer then produces a deterministic descending ranking. Rules
//! are plain function pointers composed in a list, so individual rules can
//! be tested, added, or removed without touching the engine or each other.

mod rules;

pub use rules::{category_rule, keyword_rule, proximity_rule, recency_rule};

use crate::notam::{NotamRecord, ScoredNotam};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// ICAO codes of the route's departure and destination, used by the
/// proximity rule's endpoint bonus. Both are optional: a single-airport
/// fetch has no route.
#[derive(Debug, Clone, Default)]
pub struct RouteEndpoints {
    pub departure: Option<String>,
    pub destination: Option<String>,
}

impl RouteEndpoints {
    pub fn new(departure: Option<String>, destination: Option<String>) -> Self {
        Self {
            departure: departure.map(|c| c.to_ascii_uppercase()),
            destination: destination.map(|c| c.to_ascii_uppercase()),
        }
    }

    /// Endpoints for a fetch with no route context.
    pub fn none() -> Self {
        Self::default()
    }

    /// True if `location` equals the departure or destination code.
    pub fn matches_endpoint(&self, location: &str) -> bool {
        let location = location.to_ascii_uppercase();
        self.departure.as_deref() == Some(location.as_str())
            || self.destination.as_deref() == Some(location.as_str())
    }
}

/// One scoring rule: a pure function plus the name used in the per-record
/// breakdown.
#[derive(Clone, Copy)]
pub struct ScoreRule {
    pub name: &'static str,
    pub apply: fn(&NotamRecord, DateTime<Utc>, &RouteEndpoints) -> f64,
}

/// Sums weighted rule contributions per record.
pub struct ScoringEngine {
    rules: Vec<ScoreRule>,
}

impl ScoringEngine {
    /// Creates an engine with an explicit rule list.
    pub fn new(rules: Vec<ScoreRule>) -> Self {
        Self { rules }
    }

    /// Creates an engine with the standard rule set: category, keyword,
    /// recency, proximity.
    pub fn with_default_rules() -> Self {
        Self::new(vec![
            ScoreRule {
                name: "category",
                apply: category_rule,
            },
            ScoreRule {
                name: "keyword",
                apply: keyword_rule,
            },
            ScoreRule {
                name: "recency",
                apply: recency_rule,
            },
            ScoreRule {
                name: "proximity",
                apply: proximity_rule,
            },
        ])
    }

    /// Scores one record, keeping the per-rule breakdown.
    pub fn score(
        &self,
        record: NotamRecord,
        now: DateTime<Utc>,
        route: &RouteEndpoints,
    ) -> ScoredNotam {
        let mut breakdown = Vec::with_capacity(self.rules.len());
        let mut total = 0.0;

        for rule in &self.rules {
            let contribution = (rule.apply)(&record, now, route);
            total += contribution;
            breakdown.push((rule.name, contribution));
        }

        ScoredNotam {
            record,
            score: total,
            breakdown,
        }
    }

    /// Scores every record in the set.
    pub fn score_all(
        &self,
        records: Vec<NotamRecord>,
        now: DateTime<Utc>,
        route: &RouteEndpoints,
    ) -> Vec<ScoredNotam> {
        records
            .into_iter()
            .map(|record| self.score(record, now, route))
            .collect()
    }
}

/// Ranks scored advisories: descending score, ties broken by later issue
/// time first (absent last), then ascending id (absent last).
///
/// The tie chain yields a total order, so no two records are ambiguously
/// ranked and re-ranking ranked output is a no-op.
pub fn rank(mut scored: Vec<ScoredNotam>) -> Vec<ScoredNotam> {
    scored.sort_by(compare);
    scored
}

fn compare(a: &ScoredNotam, b: &ScoredNotam) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| match (b.record.issued_at, a.record.issued_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            // An absent issue time always ranks after a known one
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| match (&a.record.id, &b.record.id) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}
