use anyhow::Result;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description;

use crate::error::MosaicError;

/// Face bounding box as reported by the detector.
///
/// All four values are fractions of the image dimensions in [0, 1],
/// measured from the top-left corner. Boxes may overlap and carry no
/// ordering guarantee between detector calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Which obfuscation effect to apply to detected faces.
///
/// Wire names (`GaussianBlur_L`, `Tile_S`, ...) are what the preference
/// store and inbound requests carry; unknown names are a configuration
/// error, never a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MosaicStyle {
    #[default]
    #[serde(rename = "GaussianBlur_L")]
    GaussianBlurLarge,
    #[serde(rename = "GaussianBlur_S")]
    GaussianBlurSmall,
    #[serde(rename = "Tile_L")]
    TileLarge,
    #[serde(rename = "Tile_S")]
    TileSmall,
}

impl MosaicStyle {
    pub const ALL: [MosaicStyle; 4] = [
        MosaicStyle::GaussianBlurLarge,
        MosaicStyle::GaussianBlurSmall,
        MosaicStyle::TileLarge,
        MosaicStyle::TileSmall,
    ];

    /// Wire name used by the preference store and inbound requests.
    pub fn wire_name(&self) -> &'static str {
        match self {
            MosaicStyle::GaussianBlurLarge => "GaussianBlur_L",
            MosaicStyle::GaussianBlurSmall => "GaussianBlur_S",
            MosaicStyle::TileLarge => "Tile_L",
            MosaicStyle::TileSmall => "Tile_S",
        }
    }

    /// Human-readable label for selection menus.
    pub fn label(&self) -> &'static str {
        match self {
            MosaicStyle::GaussianBlurLarge => "blur (strong)",
            MosaicStyle::GaussianBlurSmall => "blur (light)",
            MosaicStyle::TileLarge => "tiles (coarse)",
            MosaicStyle::TileSmall => "tiles (fine)",
        }
    }
}

impl std::fmt::Display for MosaicStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl std::str::FromStr for MosaicStyle {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MosaicStyle::ALL
            .into_iter()
            .find(|style| style.wire_name() == s)
            .ok_or_else(|| MosaicError::UnsupportedStyle(s.to_string()))
    }
}

/// Per-user record held by the preference store.
///
/// Created on first contact with no style set; `selected_style` only
/// changes through an explicit user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreference {
    pub user_id: String,
    pub display_name: String,
    pub picture_url: Option<String>,
    pub selected_style: Option<MosaicStyle>,
}

impl UserPreference {
    /// The style to apply for this user, falling back to the default
    /// when none has been selected yet.
    pub fn style(&self) -> MosaicStyle {
        self.selected_style.unwrap_or_default()
    }
}

/// Role of a persisted artifact within one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactRole {
    Original,
    Work,
    Preview,
}

impl ArtifactRole {
    fn key_tag(&self) -> &'static str {
        match self {
            ArtifactRole::Original => "org",
            ArtifactRole::Work => "work",
            ArtifactRole::Preview => "prev",
        }
    }
}

/// Storage key scheme for the artifacts of a single request:
/// `{namespace}/{user_id}/{timestamp}_{role}_{message_id}.jpg`.
///
/// The message id is unique per request, so concurrent requests never
/// collide on keys.
#[derive(Debug, Clone)]
pub struct ArtifactKeying {
    namespace: String,
    user_id: String,
    message_id: String,
    stamp: String,
}

impl ArtifactKeying {
    pub fn new(
        namespace: impl Into<String>,
        user_id: impl Into<String>,
        message_id: impl Into<String>,
        now: OffsetDateTime,
    ) -> Result<Self> {
        let fmt =
            format_description::parse("[year repr:last_two][month][day][hour][minute][second]")?;
        Ok(Self {
            namespace: namespace.into(),
            user_id: user_id.into(),
            message_id: message_id.into(),
            stamp: now.format(&fmt)?,
        })
    }

    pub fn key(&self, role: ArtifactRole) -> String {
        format!(
            "{}/{}/{}_{}_{}.jpg",
            self.namespace,
            self.user_id,
            self.stamp,
            role.key_tag(),
            self.message_id
        )
    }
}

/// Result of one pipeline invocation.
///
/// `found == false` means the detector reported no faces; that is an
/// expected business outcome, so both addresses are `None` and no error
/// is raised.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicOutcome {
    pub found: bool,
    pub work_address: Option<String>,
    pub preview_address: Option<String>,
}

impl MosaicOutcome {
    pub(crate) fn no_faces() -> Self {
        Self {
            found: false,
            work_address: None,
            preview_address: None,
        }
    }
}
