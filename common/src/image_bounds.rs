//! 画像縮小サイズの計算
//!
//! 縦横比を保ったまま MAX_WIDTH × MAX_HEIGHT に収める。拡大はしない。

/// 最大幅（px）
pub const MAX_WIDTH: u32 = 800;
/// 最大高さ（px）
pub const MAX_HEIGHT: u32 = 600;
/// JPEG品質（0-100）
pub const JPEG_QUALITY: u8 = 70;

/// 縮小後のサイズ
///
/// # Examples
/// ```
/// use gift_wizard_common::image_bounds::target_dimensions;
///
/// assert_eq!(target_dimensions(1600, 1200, 800, 600), (800, 600));
/// assert_eq!(target_dimensions(400, 300, 800, 600), (400, 300));
/// ```
pub fn target_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );

    let w = ((width as f64 * scale).round() as u32).clamp(1, max_width.max(1));
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_height.max(1));
    (w, h)
}
