use serde::Serialize;
use tracing::{debug, warn};

/// Crops with a trained model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    Corn,
    Potato,
    Rice,
    Tomato,
}

/// Used for any identifier that is neither a known crop nor an alias.
pub const DEFAULT_CROP: Crop = Crop::Tomato;

/// Alternative spellings clients send. Keys are lower-case.
const ALIASES: &[(&str, Crop)] = &[("maize", Crop::Corn)];

impl Crop {
    pub const ALL: [Crop; 4] = [Crop::Corn, Crop::Potato, Crop::Rice, Crop::Tomato];

    pub fn id(&self) -> &'static str {
        match self {
            Crop::Corn   => "corn",
            Crop::Potato => "potato",
            Crop::Rice   => "rice",
            Crop::Tomato => "tomato",
        }
    }

    /// Name shown to farmers. Corn is labelled "Maize" but keeps `corn` as id.
    pub fn display_name(&self) -> &'static str {
        match self {
            Crop::Corn   => "Maize",
            Crop::Potato => "Potato",
            Crop::Rice   => "Rice",
            Crop::Tomato => "Tomato",
        }
    }

    /// Exact canonical id, case-insensitive. Aliases are not considered.
    pub fn from_id(id: &str) -> Option<Crop> {
        let id = id.trim();
        Crop::ALL.into_iter().find(|c| c.id().eq_ignore_ascii_case(id))
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Opaque reference to an asset, resolved by an `AssetProvider`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(name: impl Into<String>) -> Self {
        AssetRef(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Model and label assets for one crop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropProfile {
    pub crop: Crop,
    pub model: AssetRef,
    pub labels: AssetRef,
}

impl CropProfile {
    /// `<crop>_model.json` and `<crop>_labels.txt`.
    pub fn standard(crop: Crop) -> Self {
        CropProfile {
            crop,
            model: AssetRef::new(format!("{}_model.json", crop.id())),
            labels: AssetRef::new(format!("{}_labels.txt", crop.id())),
        }
    }

    pub fn crop_id(&self) -> &'static str {
        self.crop.id()
    }
}

/// How a requested identifier reached its profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedVia {
    Direct,
    Alias,
    Default,
}

/// Outcome of a registry lookup. Downstream stages must use
/// `profile.crop`, never `requested`.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    pub requested: String,
    pub profile: &'a CropProfile,
    pub via: ResolvedVia,
}

/// Crop identifier → model/label assets. Read-only once built.
///
/// Holds references only; models are loaded and released by each
/// classification call.
#[derive(Debug, Clone)]
pub struct CropModelRegistry {
    profiles: [CropProfile; 4],
}

impl Default for CropModelRegistry {
    fn default() -> Self {
        CropModelRegistry::new()
    }
}

impl CropModelRegistry {
    pub fn new() -> Self {
        CropModelRegistry { profiles: Crop::ALL.map(CropProfile::standard) }
    }

    /// Replaces the asset names for `profile.crop`.
    pub fn with_profile(mut self, profile: CropProfile) -> Self {
        let i = profile.crop.index();
        self.profiles[i] = profile;
        self
    }

    pub fn profile(&self, crop: Crop) -> &CropProfile {
        &self.profiles[crop.index()]
    }

    /// Never fails: aliases map to their crop, anything unknown maps to
    /// `DEFAULT_CROP`.
    pub fn resolve(&self, crop_id: &str) -> Resolution<'_> {
        let key = crop_id.trim().to_ascii_lowercase();

        let (crop, via) = if let Some(crop) = Crop::from_id(&key) {
            (crop, ResolvedVia::Direct)
        } else if let Some(&(_, crop)) = ALIASES.iter().find(|(alias, _)| *alias == key) {
            debug!(requested = crop_id, resolved = crop.id(), "crop alias");
            (crop, ResolvedVia::Alias)
        } else {
            warn!(requested = crop_id, resolved = DEFAULT_CROP.id(), "unknown crop, using default");
            (DEFAULT_CROP, ResolvedVia::Default)
        };

        Resolution { requested: crop_id.to_owned(), profile: self.profile(crop), via }
    }
}
