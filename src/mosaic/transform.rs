use image::RgbImage;
use image::imageops::{self, FilterType};
use imageproc::filter::gaussian_blur_f32;

use crate::models::MosaicStyle;

/// Blur kernel edge length for the strong variant.
const BLUR_KERNEL_LARGE: u32 = 101;
/// Blur kernel edge length for the light variant.
const BLUR_KERNEL_SMALL: u32 = 51;
/// Downscale ratio for the coarse tile variant. The smaller ratio
/// produces the larger visible block.
const TILE_RATIO_LARGE: f32 = 0.05;
/// Downscale ratio for the fine tile variant.
const TILE_RATIO_SMALL: f32 = 0.10;

/// Sigma matching OpenCV's derivation for an unspecified sigma at the
/// given kernel size. The kernel is forced odd first.
fn blur_sigma(kernel: u32) -> f32 {
    let k = (kernel | 1) as f32;
    0.3 * ((k - 1.0) * 0.5 - 1.0) + 0.8
}

/// Apply the whole-frame variant of `style` to `image`.
///
/// No masking happens here; the compositor selects the face regions out
/// of the result downstream. Output dimensions always equal the
/// input's.
pub fn mosaic_image(image: &RgbImage, style: MosaicStyle) -> RgbImage {
    match style {
        MosaicStyle::GaussianBlurLarge => gaussian_blur_f32(image, blur_sigma(BLUR_KERNEL_LARGE)),
        MosaicStyle::GaussianBlurSmall => gaussian_blur_f32(image, blur_sigma(BLUR_KERNEL_SMALL)),
        MosaicStyle::TileLarge => tile(image, TILE_RATIO_LARGE),
        MosaicStyle::TileSmall => tile(image, TILE_RATIO_SMALL),
    }
}

/// Pixelate by nearest-neighbor downscale and upscale back.
fn tile(image: &RgbImage, ratio: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    let small_w = ((width as f32 * ratio) as u32).max(1);
    let small_h = ((height as f32 * ratio) as u32).max(1);
    let small = imageops::resize(image, small_w, small_h, FilterType::Nearest);
    imageops::resize(&small, width, height, FilterType::Nearest)
}
