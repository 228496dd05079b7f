pub mod composite;
pub mod mask;
pub mod preview;
pub mod transform;

pub use composite::composite;
pub use mask::build_mask;
pub use preview::{PREVIEW_MAX_DIM, shrink_to_fit};
pub use transform::mosaic_image;
