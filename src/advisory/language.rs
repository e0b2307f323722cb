use serde::Serialize;

/// Languages an advisory catalog is shipped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hindi,
    Telugu,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Telugu];
    pub const DEFAULT: Language = Language::English;

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi   => "hi",
            Language::Telugu  => "te",
        }
    }

    /// Name in the language itself.
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi   => "हिन्दी",
            Language::Telugu  => "తెలుగు",
        }
    }

    /// Advisory document for this language.
    pub fn asset_name(&self) -> &'static str {
        match self {
            Language::English => "english.json",
            Language::Hindi   => "hindi.json",
            Language::Telugu  => "telugu.json",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        let code = code.trim();
        Language::ALL.into_iter().find(|l| l.code().eq_ignore_ascii_case(code))
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
