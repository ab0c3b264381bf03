//! Cat avatar profile and gallery of saved renders.

use crate::frame::Frame;
use crate::storage::{
    CAT_GALLERY_KEY, CAT_PROFILE_KEY, KeyValueStore, StorageResult, load_json, save_json,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Value meaning "no image for this part".
pub const NONE: &str = "none";

/// A layer of the cat picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatPart {
    Bg,
    Cushion,
    Fur,
    Eyes,
    Hat,
    Accessory,
}

impl CatPart {
    /// Back to front.
    pub const DRAW_ORDER: [CatPart; 6] = [
        CatPart::Bg,
        CatPart::Cushion,
        CatPart::Fur,
        CatPart::Eyes,
        CatPart::Hat,
        CatPart::Accessory,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CatPart::Bg => "bg",
            CatPart::Cushion => "cushion",
            CatPart::Fur => "fur",
            CatPart::Eyes => "eyes",
            CatPart::Hat => "hat",
            CatPart::Accessory => "accessory",
        }
    }

    /// Selectable values for this part.
    pub fn options(self) -> &'static [&'static str] {
        match self {
            CatPart::Bg => &[
                "bg_cozy_room",
                "bg_forest_path",
                "bg_library",
                "bg_magical_landscape",
                "bg_night_road",
                "bg_starry_night",
                "bg_sunny_lawn",
            ],
            CatPart::Cushion => &[
                NONE,
                "cushion_blue",
                "cushion_green",
                "cushion_orange",
                "cushion_rainbow",
                "cushion_red",
                "cushion_yellow",
            ],
            CatPart::Fur => &[
                "fur_tuxedo",
                "fur_calico",
                "fur_short_silver",
                "fur_siamese",
                "fur_white",
            ],
            CatPart::Eyes => &["eyes_blue", "eyes_amber", "eyes_oddeye"],
            CatPart::Hat => &[NONE, "hat_navy_knit", "hat_pink_knit", "hat_skyblue_knit"],
            CatPart::Accessory => &[
                NONE,
                "acc_baseball",
                "acc_bow_tie",
                "acc_churu",
                "acc_crown",
                "acc_green_knit",
                "acc_hairpin",
                "acc_mouse_toy",
                "acc_rabbit-doll",
                "acc_teddy_bear",
                "acc_yarnball",
            ],
        }
    }
}

impl fmt::Display for CatPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatPart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CatPart::DRAW_ORDER
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown cat part: {s}"))
    }
}

/// Which image is chosen for each part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatProfile {
    pub bg: String,
    pub cushion: String,
    pub fur: String,
    pub eyes: String,
    pub hat: String,
    pub accessory: String,
}

impl Default for CatProfile {
    fn default() -> Self {
        Self {
            bg: "bg_cozy_room".to_string(),
            cushion: "cushion_blue".to_string(),
            fur: "fur_white".to_string(),
            eyes: "eyes_blue".to_string(),
            hat: NONE.to_string(),
            accessory: NONE.to_string(),
        }
    }
}

impl CatProfile {
    pub fn get(&self, part: CatPart) -> &str {
        match part {
            CatPart::Bg => &self.bg,
            CatPart::Cushion => &self.cushion,
            CatPart::Fur => &self.fur,
            CatPart::Eyes => &self.eyes,
            CatPart::Hat => &self.hat,
            CatPart::Accessory => &self.accessory,
        }
    }

    /// Choose `value` for `part`. Returns `false` for a value not offered for it.
    pub fn set(&mut self, part: CatPart, value: &str) -> bool {
        if !part.options().iter().any(|option| *option == value) {
            return false;
        }
        let slot = match part {
            CatPart::Bg => &mut self.bg,
            CatPart::Cushion => &mut self.cushion,
            CatPart::Fur => &mut self.fur,
            CatPart::Eyes => &mut self.eyes,
            CatPart::Hat => &mut self.hat,
            CatPart::Accessory => &mut self.accessory,
        };
        *slot = value.to_string();
        true
    }

    /// Chosen images in draw order, skipping `none` and empty values.
    pub fn layers(&self) -> impl Iterator<Item = (CatPart, &str)> {
        CatPart::DRAW_ORDER
            .into_iter()
            .map(|part| (part, self.get(part)))
            .filter(|(_, value)| !value.is_empty() && *value != NONE)
    }

    /// Stored profile merged over the defaults. Corrupt data yields defaults.
    pub async fn load<S: KeyValueStore + ?Sized>(store: &S) -> StorageResult<Self> {
        let Some(json) = store.get(CAT_PROFILE_KEY).await? else {
            return Ok(Self::default());
        };
        match serde_json::from_str(&json) {
            Ok(profile) => Ok(profile),
            Err(e) => {
                log::warn!("Ignoring corrupt cat profile: {e}");
                Ok(Self::default())
            }
        }
    }

    pub async fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> StorageResult<()> {
        save_json(store, CAT_PROFILE_KEY, self).await
    }
}

fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// A saved cat render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(rename = "imageData")]
    pub frame: Frame,
}

/// Append-only list of saved cat renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatGallery {
    items: Vec<GalleryItem>,
}

impl CatGallery {
    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Most recently added first.
    pub fn newest_first(&self) -> impl Iterator<Item = &GalleryItem> {
        self.items.iter().rev()
    }

    /// Append a render and return its new id.
    pub fn add(&mut self, frame: Frame) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.items.push(GalleryItem {
            id: id.clone(),
            frame,
        });
        id
    }

    /// Remove the render with `id`. Returns `false` if there was none.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    pub async fn load<S: KeyValueStore + ?Sized>(store: &S) -> StorageResult<Self> {
        Ok(load_json(store, CAT_GALLERY_KEY).await?.unwrap_or_default())
    }

    pub async fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> StorageResult<()> {
        save_json(store, CAT_GALLERY_KEY, self).await
    }
}
