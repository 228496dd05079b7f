use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::models::BoundingBox;

/// Mask value marking pixels that take the transformed image.
pub const MASK_ON: u8 = 255;

/// Build the per-pixel selection mask for a set of detected faces.
///
/// Each fractional box is denormalized by flooring against the image
/// dimensions, clamped at the lower bound, and filled as the closed
/// rectangle `[x, x+w] x [y, y+h]` clipped to the frame. Boxes are
/// unioned, so ordering and duplicates cannot change the result.
///
/// Returns `None` when `boxes` is empty: the caller must treat that as
/// the no-faces outcome, not as "apply no transform".
pub fn build_mask(height: u32, width: u32, boxes: &[BoundingBox]) -> Option<GrayImage> {
    if boxes.is_empty() {
        return None;
    }

    let mut mask = GrayImage::new(width, height);
    for bbox in boxes {
        let x = ((width as f32 * bbox.left).floor() as i64).max(0);
        let y = ((height as f32 * bbox.top).floor() as i64).max(0);
        let w = (width as f32 * bbox.width).floor() as i64;
        let h = (height as f32 * bbox.height).floor() as i64;

        // A degenerate box marks no pixels at all.
        if w <= 0 || h <= 0 {
            continue;
        }

        // Closed interval: the boundary row and column belong to the
        // face region. draw_filled_rect_mut clips to the frame.
        draw_filled_rect_mut(
            &mut mask,
            Rect::at(x as i32, y as i32).of_size(w as u32 + 1, h as u32 + 1),
            Luma([MASK_ON]),
        );
    }
    Some(mask)
}
