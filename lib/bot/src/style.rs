use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::VariantArray as _;
use strum_macros::{AsRefStr, Display, EnumString, VariantArray};

/// Stylization preset. Every tag maps to one instruction for the model.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StyleTag {
    #[default]
    Vibrant,
    Anime,
    Comic,
    Watercolor,
    Sketch,
    Pixar,
    Retro,
    Minimalist,
}

impl StyleTag {
    pub fn instruction(&self) -> &'static str {
        match self {
            StyleTag::Vibrant => {
                "Transform this photo into a vibrant cartoon illustration with bold outlines, \
                 saturated colors and smooth cel shading. Keep the subject's pose, \
                 composition and recognizable features."
            }
            StyleTag::Anime => {
                "Redraw this photo in Japanese anime style: clean line art, large expressive \
                 eyes, soft gradients and a bright color palette. Keep the original composition."
            }
            StyleTag::Comic => {
                "Turn this photo into a comic book panel with heavy black ink outlines, \
                 halftone dot shading and punchy primary colors."
            }
            StyleTag::Watercolor => {
                "Repaint this photo as a loose watercolor illustration with soft bleeding \
                 edges, visible paper texture and gentle pastel washes."
            }
            StyleTag::Sketch => {
                "Convert this photo into a hand-drawn pencil sketch with expressive \
                 cross-hatching and subtle graphite shading, black and white only."
            }
            StyleTag::Pixar => {
                "Re-imagine this photo as a 3D animated movie still: rounded friendly shapes, \
                 soft global lighting and rich cinematic colors."
            }
            StyleTag::Retro => {
                "Render this photo as a 1960s retro cartoon with flat muted colors, thick \
                 simple outlines and a slightly faded print look."
            }
            StyleTag::Minimalist => {
                "Reduce this photo to a minimalist flat illustration using a handful of solid \
                 colors, simple geometric shapes and no texture."
            }
        }
    }

    /// Total lookup: missing, empty or unknown tags give the default tag.
    pub fn resolve(tag: Option<&str>) -> StyleTag {
        match tag.map(str::trim) {
            Some(tag) if !tag.is_empty() => StyleTag::from_str(tag).unwrap_or_else(|_| {
                log::debug!("unknown style `{tag}`, using {}", StyleTag::default());
                StyleTag::default()
            }),
            _ => StyleTag::default(),
        }
    }

    pub fn all_styles() -> &'static [StyleTag] {
        StyleTag::VARIANTS
    }
}
