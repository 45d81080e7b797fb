//! Gaussian blur for captured screenshots.

use image::DynamicImage;

/// Fixed blur strength for the screenshot cover. Matches the intensity the
/// plugin has always shipped with; strong enough that text is unreadable in
/// an app-switcher thumbnail.
pub const BLUR_SIGMA: f32 = 4.5;

/// Apply a Gaussian blur. Degenerate inputs (empty image, non-positive
/// sigma) are returned unchanged rather than handed to the filter.
pub fn gaussian(image: &DynamicImage, sigma: f32) -> DynamicImage {
    if image.width() == 0 || image.height() == 0 || sigma <= 0.0 {
        return image.clone();
    }
    image.blur(sigma)
}
