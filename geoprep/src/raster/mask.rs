/// Inclusive RGB threshold range.
#[derive(Debug, Clone, Copy)]
pub struct RgbRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl RgbRange {
    pub fn contains(&self, rgb: [u8; 3]) -> bool {
        (0..3).all(|i| self.lower[i] <= rgb[i] && rgb[i] <= self.upper[i])
    }
}

/// Inclusive HSV threshold range, OpenCV scale (hue 0-180, rest 0-255).
/// The scanned maps were originally thresholded with OpenCV, so keeping the
/// same scale keeps the hand-tuned numbers meaningful.
#[derive(Debug, Clone, Copy)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub fn contains(&self, rgb: [u8; 3]) -> bool {
        let hsv = rgb_to_hsv(rgb);
        (0..3).all(|i| self.lower[i] <= hsv[i] && hsv[i] <= self.upper[i])
    }
}

fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let r = rgb[0] as f32 / 255.0;
    let g = rgb[1] as f32 / 255.0;
    let b = rgb[2] as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    [
        (hue / 2.0).round().min(180.0) as u8,
        (saturation * 255.0).round() as u8,
        (max * 255.0).round() as u8,
    ]
}

/// A set of threshold ranges describing one map overlay color. A pixel
/// matches when any range matches.
#[derive(Debug, Clone)]
pub struct ColorSpec {
    pub rgb: Vec<RgbRange>,
    pub hsv: Vec<HsvRange>,
    /// Hex color written into the output feature properties.
    pub hex: String,
}

impl ColorSpec {
    /// The red transmission-line overlay on the regional claim maps.
    pub fn red() -> Self {
        Self {
            rgb: vec![
                RgbRange { lower: [150, 0, 0], upper: [255, 100, 100] },
                RgbRange { lower: [100, 0, 0], upper: [150, 50, 50] },
            ],
            hsv: Vec::new(),
            hex: "#FF0000".to_string(),
        }
    }

    /// Sensitive red detection that also catches faded and pinkish strokes.
    /// Two hue bands because red wraps around the hue circle.
    pub fn red_sensitive() -> Self {
        Self {
            rgb: vec![
                RgbRange { lower: [180, 0, 0], upper: [255, 80, 80] },
                RgbRange { lower: [120, 0, 0], upper: [180, 60, 60] },
                RgbRange { lower: [200, 50, 50], upper: [255, 150, 150] },
                RgbRange { lower: [80, 0, 0], upper: [120, 40, 40] },
            ],
            hsv: vec![
                HsvRange { lower: [0, 30, 30], upper: [15, 255, 255] },
                HsvRange { lower: [165, 30, 30], upper: [180, 255, 255] },
            ],
            hex: "#FF0000".to_string(),
        }
    }

    pub fn matches(&self, rgb: [u8; 3]) -> bool {
        self.rgb.iter().any(|r| r.contains(rgb)) || self.hsv.iter().any(|r| r.contains(rgb))
    }
}

/// Binary raster mask, 0 for background and 255 for foreground.
#[derive(Debug, Clone)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Thresholds a packed RGB buffer (3 bytes per pixel, row-major).
    pub fn from_rgb(rgb: &[u8], width: usize, height: usize, spec: &ColorSpec) -> Self {
        let mut mask = Mask::new(width, height);
        for (i, pixel) in rgb.chunks_exact(3).enumerate() {
            if spec.matches([pixel[0], pixel[1], pixel[2]]) {
                mask.data[i] = 255;
            }
        }
        mask
    }

    #[inline]
    pub fn get(&self, col: i64, row: i64) -> bool {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return false;
        }
        self.data[row as usize * self.width + col as usize] != 0
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, on: bool) {
        self.data[row * self.width + col] = if on { 255 } else { 0 };
    }

    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Morphological dilation with a square kernel of the given size.
    pub fn dilate(&self, kernel: usize) -> Mask {
        self.morph(kernel, true)
    }

    /// Morphological erosion with a square kernel of the given size.
    pub fn erode(&self, kernel: usize) -> Mask {
        self.morph(kernel, false)
    }

    /// Closing: dilate then erode. Bridges one-pixel breaks in line work.
    pub fn close(&self, kernel: usize) -> Mask {
        self.dilate(kernel).erode(kernel)
    }

    /// Opening: erode then dilate. Drops speckle noise.
    pub fn open(&self, kernel: usize) -> Mask {
        self.erode(kernel).dilate(kernel)
    }

    fn morph(&self, kernel: usize, dilate: bool) -> Mask {
        let kernel = kernel.max(1) as i64;
        // Kernel anchor sits at the top-left for even sizes, matching the
        // behavior the thresholds were tuned against.
        let lo = -((kernel - 1) / 2);
        let hi = kernel / 2;
        let mut out = Mask::new(self.width, self.height);
        for row in 0..self.height as i64 {
            for col in 0..self.width as i64 {
                let mut hit = !dilate;
                'window: for dy in lo..=hi {
                    for dx in lo..=hi {
                        let on = self.get(col + dx, row + dy);
                        if dilate && on {
                            hit = true;
                            break 'window;
                        }
                        if !dilate && !on {
                            hit = false;
                            break 'window;
                        }
                    }
                }
                if hit {
                    out.set(col as usize, row as usize, true);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_hsv_red() {
        let [h, s, v] = rgb_to_hsv([255, 0, 0]);
        assert_eq!(h, 0);
        assert_eq!(s, 255);
        assert_eq!(v, 255);
        // Dark red keeps hue near zero with lower value.
        let [h, _, v] = rgb_to_hsv([120, 10, 10]);
        assert!(h <= 2);
        assert!(v < 130);
    }

    #[test]
    fn test_red_spec_matches() {
        let spec = ColorSpec::red_sensitive();
        assert!(spec.matches([255, 0, 0]));
        assert!(spec.matches([100, 20, 20])); // very dark red
        assert!(spec.matches([230, 120, 120])); // pinkish
        assert!(!spec.matches([255, 255, 255]));
        assert!(!spec.matches([0, 0, 255]));
        assert!(!spec.matches([40, 90, 40])); // forest green basemap
    }

    #[test]
    fn test_mask_from_rgb() {
        let rgb = [255u8, 0, 0, 255, 255, 255, 160, 20, 20, 0, 0, 0];
        let mask = Mask::from_rgb(&rgb, 2, 2, &ColorSpec::red());
        assert_eq!(mask.foreground_count(), 2);
        assert!(mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(mask.get(0, 1));
    }

    #[test]
    fn test_close_bridges_gap() {
        let mut mask = Mask::new(7, 3);
        mask.set(1, 1, true);
        mask.set(3, 1, true); // one-pixel gap at (2, 1)
        let closed = mask.close(3);
        assert!(closed.get(2, 1));
    }

    #[test]
    fn test_open_removes_speckle() {
        let mut mask = Mask::new(9, 9);
        mask.set(4, 4, true); // lone pixel
        for col in 0..9 {
            for row in 6..9 {
                mask.set(col, row, true); // solid block survives
            }
        }
        let opened = mask.open(3);
        assert!(!opened.get(4, 4));
        assert!(opened.get(4, 7));
    }
}
