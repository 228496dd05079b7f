use image::RgbImage;
use image::imageops::{self, FilterType};

/// Largest edge a work image may have before a separate preview
/// rendition is published.
pub const PREVIEW_MAX_DIM: u32 = 256;

/// Proportionally downsize `image` so its largest edge fits `max_dim`.
///
/// Images already within the cap come back unchanged; the caller is
/// expected to reuse the work artifact instead of publishing a separate
/// preview in that case.
pub fn shrink_to_fit(image: &RgbImage, max_dim: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let largest = width.max(height);
    if largest <= max_dim {
        return image.clone();
    }
    let mag = max_dim as f32 / largest as f32;
    imageops::resize(
        image,
        ((width as f32 * mag) as u32).max(1),
        ((height as f32 * mag) as u32).max(1),
        FilterType::Triangle,
    )
}
