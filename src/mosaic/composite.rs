use image::{GrayImage, RgbImage};

/// Select `transformed` where the mask is set, `original` elsewhere.
///
/// All three buffers must share the same dimensions; a mismatch is a
/// programmer error and panics.
pub fn composite(original: &RgbImage, transformed: &RgbImage, mask: &GrayImage) -> RgbImage {
    assert_eq!(
        original.dimensions(),
        transformed.dimensions(),
        "transformed image dimensions must match the original"
    );
    assert_eq!(
        original.dimensions(),
        mask.dimensions(),
        "mask dimensions must match the original"
    );

    let mut out = original.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        if mask.get_pixel(x, y)[0] != 0 {
            *pixel = *transformed.get_pixel(x, y);
        }
    }
    out
}
