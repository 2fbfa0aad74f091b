use std::fmt;

use crate::client::model_endpoint_url;

/// Text-to-image models offered out of the box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KnownModel {
    MidjourneyV6,
    FluxSchnell,
}

impl KnownModel {
    /// All known models, in menu order.
    pub fn all() -> &'static [KnownModel] {
        &[Self::MidjourneyV6, Self::FluxSchnell]
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::MidjourneyV6 => "Midjourney v6",
            Self::FluxSchnell => "FLUX.1-schnell",
        }
    }

    /// Repository ID on the inference host.
    pub fn model_id(self) -> &'static str {
        match self {
            Self::MidjourneyV6 => "Kvikontent/midjourney-v6",
            Self::FluxSchnell => "black-forest-labs/FLUX.1-schnell",
        }
    }

    pub fn endpoint_url(self) -> String {
        model_endpoint_url(self.model_id())
    }

    /// Looks a model up by its label, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::all()
            .iter()
            .copied()
            .find(|model| model.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
