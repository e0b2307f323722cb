pub mod catalog;
pub mod language;
pub mod record;
pub mod resolver;

pub use catalog::{AdvisoryCatalog, DiseaseTable, LanguageCatalog};
pub use language::Language;
pub use record::AdvisoryRecord;
pub use resolver::{AdvisoryResolver, MatchTier, ResolvedAdvice};
