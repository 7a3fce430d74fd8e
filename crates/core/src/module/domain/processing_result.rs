use serde::{Deserialize, Serialize};

use crate::shared::image::Image;

/// A labeled area of the input image, in pixel coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledRegion {
    pub label: String,
    pub score: f32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Whatever the processing module hands back. The adapter relays it as-is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessingResult {
    /// Processed image, if the module produces one.
    pub image: Option<Image>,
    pub regions: Vec<LabeledRegion>,
}

impl ProcessingResult {
    pub fn from_regions(regions: Vec<LabeledRegion>) -> Self {
        Self {
            image: None,
            regions,
        }
    }

    pub fn from_image(image: Image) -> Self {
        Self {
            image: Some(image),
            regions: Vec::new(),
        }
    }
}
