//! Advisory deduplication
//!
//! Adjacent waypoint query circles overlap, so the same advisory
//! legitimately arrives through several queries. Dedup
//! collapses the union to one canonical set using a derived key ladder,
//! keeping the most complete copy of each advisory and preserving
//! first-seen insertion order. The collapse depends only on record content,
//! never on which waypoint task finished first.

use crate::notam::{Category, NotamRecord};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Derived identity of an advisory for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DedupKey {
    /// Upstream id, the strongest identity
    Id(String),
    /// Number + location + category + normalized-text hash
    Composite {
        number: String,
        location: Option<String>,
        category: Category,
        text_hash: u64,
    },
    /// Number + location + issue time truncated to the minute
    IssuedMinute {
        number: String,
        location: Option<String>,
        minute: i64,
    },
}

/// Derives the dedup key for a record, strongest rung first.
///
/// Returns `None` when no rung applies; such a record is always kept and
/// never merged with anything.
fn derive_key(record: &NotamRecord) -> Option<DedupKey> {
    if let Some(id) = &record.id {
        if !id.trim().is_empty() {
            return Some(DedupKey::Id(id.trim().to_string()));
        }
    }

    let number = record.number.trim();
    if number.is_empty() {
        return None;
    }

    let normalized = normalize_text(&record.text);
    if !normalized.is_empty() {
        return Some(DedupKey::Composite {
            number: number.to_string(),
            location: record.location.clone(),
            category: record.category,
            text_hash: hash_str(&normalized),
        });
    }

    if let Some(issued) = record.issued_at {
        return Some(DedupKey::IssuedMinute {
            number: number.to_string(),
            location: record.location.clone(),
            minute: issued.timestamp() / 60,
        });
    }

    None
}

/// Uppercases and collapses all whitespace runs to single spaces.
fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn hash_str(s: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

/// Decides whether `candidate` should replace the `incumbent` copy of the
/// same advisory: later issue time wins, then presence of a radius, then
/// longer text; otherwise the incumbent stays.
fn candidate_wins(incumbent: &NotamRecord, candidate: &NotamRecord) -> bool {
    match (incumbent.issued_at, candidate.issued_at) {
        (Some(a), Some(b)) if a != b => return b > a,
        (None, Some(_)) => return true,
        (Some(_), None) => return false,
        _ => {}
    }

    match (incumbent.radius_nm, candidate.radius_nm) {
        (None, Some(_)) => return true,
        (Some(_), None) => return false,
        _ => {}
    }

    candidate.text.len() > incumbent.text.len()
}

/// Collapses duplicates in the unioned record set.
///
/// Output preserves the first-seen insertion order of surviving entries;
/// a later copy that wins a collision takes over the incumbent's slot.
pub fn deduplicate(records: Vec<NotamRecord>) -> Vec<NotamRecord> {
    let mut surviving: Vec<NotamRecord> = Vec::with_capacity(records.len());
    let mut slots: HashMap<DedupKey, usize> = HashMap::new();

    for record in records {
        match derive_key(&record) {
            None => surviving.push(record),
            Some(key) => match slots.get(&key) {
                None => {
                    slots.insert(key, surviving.len());
                    surviving.push(record);
                }
                Some(&slot) => {
                    if candidate_wins(&surviving[slot], &record) {
                        surviving[slot] = record;
                    }
                }
            },
        }
    }

    surviving
}
