use std::sync::Arc;

use tracing::{debug, warn};

use crate::advisory::catalog::AdvisoryCatalog;
use crate::advisory::language::Language;
use crate::advisory::record::AdvisoryRecord;

/// Which lookup step produced an advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Disease key matched exactly.
    Exact,
    /// Case-insensitive equality or substring containment, first key wins.
    Fuzzy,
    /// Nothing matched; the crop's first stored disease was used.
    FirstEntry,
    /// The crop has no entries in this language.
    Generic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAdvice {
    pub record: AdvisoryRecord,
    pub tier: MatchTier,
    pub language: Language,
    /// Catalog key the record came from. `None` for `Generic`.
    pub matched_key: Option<String>,
}

/// Always produces displayable advice for a (crop, disease, language)
/// triple, falling back through progressively looser matches.
#[derive(Debug, Clone)]
pub struct AdvisoryResolver {
    catalog: Arc<AdvisoryCatalog>,
}

impl AdvisoryResolver {
    pub fn new(catalog: Arc<AdvisoryCatalog>) -> Self {
        AdvisoryResolver { catalog }
    }

    /// Unsupported language codes use English.
    pub fn resolve(&self, crop_id: &str, disease: &str, language: &str) -> ResolvedAdvice {
        let lang = Language::from_code(language).unwrap_or_else(|| {
            debug!(requested = language, "unsupported language, using {}", Language::DEFAULT.code());
            Language::DEFAULT
        });
        self.resolve_in(crop_id, disease, lang)
    }

    pub fn resolve_in(&self, crop_id: &str, disease: &str, language: Language) -> ResolvedAdvice {
        let advice = |record: &AdvisoryRecord, tier, key: &str| ResolvedAdvice {
            record: record.clone(),
            tier,
            language,
            matched_key: Some(key.to_owned()),
        };
        let generic = || ResolvedAdvice {
            record: AdvisoryRecord::generic(),
            tier: MatchTier::Generic,
            language,
            matched_key: None,
        };

        let Some(table) = self.catalog.language(language).crop(crop_id) else {
            warn!(crop = crop_id, language = language.code(), "no advisory data for crop, using generic advice");
            return generic();
        };

        if let Some(record) = table.get(disease) {
            return advice(record, MatchTier::Exact, disease);
        }

        let wanted = disease.to_lowercase();
        let fuzzy = table.iter().find(|(key, _)| {
            let key = key.to_lowercase();
            key == wanted || wanted.contains(&key) || key.contains(&wanted)
        });
        if let Some((key, record)) = fuzzy {
            debug!(crop = crop_id, disease, matched = key, "approximate advisory match");
            return advice(record, MatchTier::Fuzzy, key);
        }

        if let Some((key, record)) = table.first() {
            warn!(crop = crop_id, disease, fallback = key, "no advisory match, using first entry");
            return advice(record, MatchTier::FirstEntry, key);
        }

        warn!(crop = crop_id, language = language.code(), "crop has no advisory entries, using generic advice");
        generic()
    }
}
