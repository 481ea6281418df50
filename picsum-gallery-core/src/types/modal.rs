//! Modal description state

use serde::Serialize;

use picsum_gallery_provider::HttpError;

/// Lifecycle of one modal instance.
///
/// `Idle → ImageLoading → (ImageReady | ImageFailed)`,
/// `ImageReady → DescribePending → (DescribeSuccess | DescribeFailed)`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "phase", content = "detail")]
pub enum DescriptionPhase {
    /// Modal closed, nothing selected
    #[default]
    Idle,
    /// Detail image requested, not loaded yet
    ImageLoading,
    /// Detail image failed to load; terminal for this selection
    ImageFailed,
    /// Detail image loaded, description not requested (yet)
    ImageReady,
    DescribePending,
    DescribeSuccess(String),
    DescribeFailed(HttpError),
}

impl DescriptionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ImageFailed | Self::DescribeSuccess(_) | Self::DescribeFailed(_)
        )
    }

    pub fn image_loaded(&self) -> bool {
        matches!(
            self,
            Self::ImageReady
                | Self::DescribePending
                | Self::DescribeSuccess(_)
                | Self::DescribeFailed(_)
        )
    }
}

/// Flat view of [`DescriptionPhase`] for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalDescriptionState {
    /// Image the state belongs to; `None` when the modal is closed.
    pub image_id: Option<String>,
    pub image_loaded: bool,
    pub image_load_error: bool,
    pub description: String,
    pub is_describing: bool,
    pub describe_error: Option<HttpError>,
}

impl ModalDescriptionState {
    pub fn from_phase(image_id: Option<&str>, phase: &DescriptionPhase) -> Self {
        let mut state = Self {
            image_id: image_id.map(str::to_string),
            image_loaded: phase.image_loaded(),
            ..Self::default()
        };
        match phase {
            DescriptionPhase::ImageFailed => state.image_load_error = true,
            DescriptionPhase::DescribePending => state.is_describing = true,
            DescriptionPhase::DescribeSuccess(text) => state.description.clone_from(text),
            DescriptionPhase::DescribeFailed(error) => state.describe_error = Some(error.clone()),
            DescriptionPhase::Idle | DescriptionPhase::ImageLoading | DescriptionPhase::ImageReady => {}
        }
        state
    }
}
