//! Cover image composition.
//!
//! Decides what goes on the overlay: a caller-supplied custom image,
//! aspect-fitted onto a white full-screen canvas, or a freshly captured
//! screenshot run through the Gaussian blur. The custom image, when set,
//! always wins.

use crate::blur::{self, BLUR_SIGMA};
use crate::capture::{CaptureError, ScreenSource};
use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

/// Which content path produced the cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverKind {
    CustomImage,
    BlurredScreenshot,
}

impl std::fmt::Display for CoverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverKind::CustomImage => write!(f, "custom image"),
            CoverKind::BlurredScreenshot => write!(f, "blurred screenshot"),
        }
    }
}

/// A composed, ready-to-mount cover.
pub struct Cover {
    pub image: DynamicImage,
    pub kind: CoverKind,
}

/// Build the cover for the current screen.
pub fn compose(
    custom: Option<&DynamicImage>,
    screen: &dyn ScreenSource,
) -> Result<Cover, CaptureError> {
    match custom {
        Some(image) => {
            let (width, height) = screen.size()?;
            Ok(Cover {
                image: fit_on_white(image, width, height),
                kind: CoverKind::CustomImage,
            })
        }
        None => {
            let screenshot = screen.capture()?;
            Ok(Cover {
                image: blur::gaussian(&screenshot, BLUR_SIGMA),
                kind: CoverKind::BlurredScreenshot,
            })
        }
    }
}

/// Aspect-fit `image` onto a white canvas of the screen's dimensions,
/// centered. White is the backdrop the plugin has always used for custom
/// covers, so letterboxing bands look deliberate rather than broken.
fn fit_on_white(image: &DynamicImage, screen_w: u32, screen_h: u32) -> DynamicImage {
    if screen_w == 0 || screen_h == 0 || image.width() == 0 || image.height() == 0 {
        return image.clone();
    }

    let fitted = image.resize(screen_w, screen_h, FilterType::Lanczos3);
    let mut canvas = RgbaImage::from_pixel(screen_w, screen_h, Rgba([255, 255, 255, 255]));
    let x = (screen_w - fitted.width()) / 2;
    let y = (screen_h - fitted.height()) / 2;
    imageops::overlay(&mut canvas, &fitted.to_rgba8(), x as i64, y as i64);
    DynamicImage::ImageRgba8(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned screen that counts how often each path is taken.
    struct FakeScreen {
        pub size: (u32, u32),
        pub captures: AtomicUsize,
    }

    impl FakeScreen {
        fn new(width: u32, height: u32) -> Self {
            Self {
                size: (width, height),
                captures: AtomicUsize::new(0),
            }
        }
    }

    impl ScreenSource for FakeScreen {
        fn size(&self) -> Result<(u32, u32), CaptureError> {
            Ok(self.size)
        }

        fn capture(&self) -> Result<DynamicImage, CaptureError> {
            self.captures.fetch_add(1, Ordering::SeqCst);
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                self.size.0,
                self.size.1,
                Rgba([10, 10, 10, 255]),
            )))
        }
    }

    #[test]
    fn custom_image_skips_the_screenshot() {
        let screen = FakeScreen::new(100, 60);
        let custom = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            10,
            10,
            Rgba([0, 0, 0, 255]),
        ));
        let cover = compose(Some(&custom), &screen).unwrap();
        assert_eq!(cover.kind, CoverKind::CustomImage);
        assert_eq!(screen.captures.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn no_custom_image_captures_and_blurs() {
        let screen = FakeScreen::new(100, 60);
        let cover = compose(None, &screen).unwrap();
        assert_eq!(cover.kind, CoverKind::BlurredScreenshot);
        assert_eq!(screen.captures.load(Ordering::SeqCst), 1);
        assert_eq!((cover.image.width(), cover.image.height()), (100, 60));
    }

    #[test]
    fn custom_cover_fills_the_screen_with_white_letterboxing() {
        // A square image on a wide screen leaves white bands left and right.
        let screen = FakeScreen::new(200, 100);
        let custom = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            50,
            50,
            Rgba([0, 0, 0, 255]),
        ));
        let cover = compose(Some(&custom), &screen).unwrap();
        let rgba = cover.image.to_rgba8();
        assert_eq!((rgba.width(), rgba.height()), (200, 100));
        assert_eq!(rgba.get_pixel(2, 50).0, [255, 255, 255, 255]);
        assert_eq!(rgba.get_pixel(100, 50).0, [0, 0, 0, 255]);
    }

    #[test]
    fn degenerate_screen_keeps_the_custom_image_as_is() {
        let screen = FakeScreen::new(0, 0);
        let custom = DynamicImage::ImageRgba8(RgbaImage::new(10, 10));
        let cover = compose(Some(&custom), &screen).unwrap();
        assert_eq!((cover.image.width(), cover.image.height()), (10, 10));
    }
}
