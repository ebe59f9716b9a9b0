use image::{Rgb, RgbImage};

use crate::config::{EMPTY_AREA_RATIO, WHITISH_MAX_SPREAD, WHITISH_MIN_CHANNEL};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhitenessSignals {
    pub whitish_pixels: usize,
    pub total_pixels: usize,
}

impl WhitenessSignals {
    pub fn from_image(image: &RgbImage) -> Self {
        let whitish_pixels = image.pixels().filter(|pixel| is_whitish(pixel)).count();
        Self {
            whitish_pixels,
            total_pixels: (image.width() * image.height()) as usize,
        }
    }

    pub fn ratio(&self) -> f32 {
        if self.total_pixels == 0 {
            1.0
        } else {
            self.whitish_pixels as f32 / self.total_pixels as f32
        }
    }
}

/// Near-white with little colour cast; anti-aliased gridline edges stay whitish.
pub fn is_whitish(pixel: &Rgb<u8>) -> bool {
    let [r, g, b] = pixel.0;
    let min = r.min(g).min(b);
    let max = r.max(g).max(b);
    min >= WHITISH_MIN_CHANNEL && max - min <= WHITISH_MAX_SPREAD
}

/// A zero-sized raster counts as empty.
pub fn is_mostly_white(image: &RgbImage) -> bool {
    let signals = WhitenessSignals::from_image(image);
    log::debug!("whitish: {:.2}%", signals.ratio() * 100.0);
    signals.ratio() >= EMPTY_AREA_RATIO
}
