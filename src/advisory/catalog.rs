//! Per-language advisory documents.
//!
//! Each language is one JSON object `crop → disease → {cause, cure, suggestions}`.
//! Field values may be strings or arrays of strings (joined with newlines);
//! missing or `null` fields read as empty strings. Disease order follows the
//! document, which the resolver's first-entry fallback depends on.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{error, info};

use crate::advisory::language::Language;
use crate::advisory::record::AdvisoryRecord;
use crate::assets::provider::AssetProvider;
use crate::error::CatalogLoadError;

/// One crop's diseases, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiseaseTable {
    entries: Vec<(String, AdvisoryRecord)>,
}

impl DiseaseTable {
    pub fn get(&self, disease: &str) -> Option<&AdvisoryRecord> {
        self.entries.iter().find(|(k, _)| k == disease).map(|(_, r)| r)
    }

    pub fn first(&self) -> Option<(&str, &AdvisoryRecord)> {
        self.entries.first().map(|(k, r)| (k.as_str(), r))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AdvisoryRecord)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, disease: impl Into<String>, record: AdvisoryRecord) {
        self.entries.push((disease.into(), record));
    }
}

/// All crops for one language.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageCatalog {
    crops: HashMap<String, DiseaseTable>,
}

impl LanguageCatalog {
    pub fn empty() -> Self {
        LanguageCatalog::default()
    }

    pub fn parse(bytes: &[u8]) -> Result<LanguageCatalog, CatalogLoadError> {
        let root: Value = serde_json::from_slice(bytes)?;
        let crops = as_object(&root, "$")?;

        let mut catalog = LanguageCatalog::empty();
        for (crop, diseases) in crops {
            let crop_path = format!("$.{}", crop);
            let mut table = DiseaseTable::default();
            for (disease, entry) in as_object(diseases, &crop_path)? {
                let path = format!("{}.{}", crop_path, disease);
                let fields = as_object(entry, &path)?;
                let record = AdvisoryRecord {
                    cause: text_field(fields, "cause", &path)?,
                    cure: text_field(fields, "cure", &path)?,
                    suggestions: text_field(fields, "suggestions", &path)?,
                };
                table.push(disease.clone(), record);
            }
            catalog.crops.insert(crop.clone(), table);
        }
        Ok(catalog)
    }

    pub fn crop(&self, crop_id: &str) -> Option<&DiseaseTable> {
        self.crops.get(crop_id)
    }

    pub fn crop_count(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, CatalogLoadError> {
    value
        .as_object()
        .ok_or_else(|| CatalogLoadError::shape(path, format!("expected an object, found {}", kind(value))))
}

fn text_field(fields: &Map<String, Value>, name: &str, path: &str) -> Result<String, CatalogLoadError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Array(items)) => {
            let parts = items
                .iter()
                .map(|item| {
                    item.as_str().ok_or_else(|| {
                        CatalogLoadError::shape(
                            format!("{}.{}", path, name),
                            format!("list items must be strings, found {}", kind(item)),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(parts.join("\n"))
        }
        Some(other) => Err(CatalogLoadError::shape(
            format!("{}.{}", path, name),
            format!("expected text, found {}", kind(other)),
        )),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_)  => "an array",
        Value::Object(_) => "an object",
    }
}

/// Every supported language's mapping. Read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct AdvisoryCatalog {
    languages: [LanguageCatalog; 3],
}

impl AdvisoryCatalog {
    /// Loads each language's document. A language that fails to load is
    /// logged and left empty; the others are unaffected.
    pub fn load(assets: &dyn AssetProvider) -> Self {
        let mut catalog = AdvisoryCatalog::default();
        for language in Language::ALL {
            match AdvisoryCatalog::load_language(assets, language) {
                Ok(loaded) => {
                    info!(language = language.code(), crops = loaded.crop_count(), "advisory catalog loaded");
                    catalog.languages[language.index()] = loaded;
                }
                Err(e) => {
                    error!(
                        language = language.code(),
                        asset = language.asset_name(),
                        error = %e,
                        "advisory catalog unusable, language left empty"
                    );
                }
            }
        }
        catalog
    }

    pub fn load_language(assets: &dyn AssetProvider, language: Language) -> Result<LanguageCatalog, CatalogLoadError> {
        let bytes = assets.read_all(language.asset_name())?;
        LanguageCatalog::parse(&bytes)
    }

    pub fn with_language(mut self, language: Language, catalog: LanguageCatalog) -> Self {
        self.languages[language.index()] = catalog;
        self
    }

    pub fn language(&self, language: Language) -> &LanguageCatalog {
        &self.languages[language.index()]
    }
}
