use std::path::Path;

use image::GrayImage;

use crate::error::TemplateError;

/// Grayscale reference pattern with its statistics precomputed
#[derive(Debug, Clone)]
pub struct Template {
    pattern: GrayImage,
    sum: f64,
    /// Sum of squared deviations from the mean
    energy: f64,
}

impl Template {
    pub fn new(pattern: GrayImage) -> Result<Self, TemplateError> {
        let n = pattern.width() as u64 * pattern.height() as u64;
        if n == 0 {
            return Err(TemplateError::Empty);
        }

        let (sum, sum_sq) = pattern.pixels().fold((0u64, 0u64), |(s, sq), p| {
            let v = p[0] as u64;
            (s + v, sq + v * v)
        });
        let sum = sum as f64;
        let energy = sum_sq as f64 - sum * sum / n as f64;
        if energy <= f64::EPSILON {
            return Err(TemplateError::Flat);
        }

        Ok(Self {
            pattern,
            sum,
            energy,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let pattern = image::open(path)?.to_luma8();
        Self::new(pattern)
    }

    pub fn width(&self) -> u32 {
        self.pattern.width()
    }

    pub fn height(&self) -> u32 {
        self.pattern.height()
    }

    fn len(&self) -> f64 {
        self.pattern.width() as f64 * self.pattern.height() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub x: u32,
    pub y: u32,
    pub score: f32,
}

/// Summed-area tables of values and squared values, padded with a zero row
/// and column so window lookups need no edge cases
struct Integral {
    stride: usize,
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl Integral {
    fn new(image: &GrayImage) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let stride = w + 1;
        let mut sum = vec![0u64; stride * (h + 1)];
        let mut sum_sq = vec![0u64; stride * (h + 1)];

        for (y, row) in image.as_raw().chunks_exact(w.max(1)).take(h).enumerate() {
            let (mut row_sum, mut row_sq) = (0u64, 0u64);
            for (x, &v) in row.iter().enumerate() {
                let v = v as u64;
                row_sum += v;
                row_sq += v * v;
                let at = (y + 1) * stride + x + 1;
                sum[at] = sum[at - stride] + row_sum;
                sum_sq[at] = sum_sq[at - stride] + row_sq;
            }
        }

        Self {
            stride,
            sum,
            sum_sq,
        }
    }

    /// `(sum, sum of squares)` over the `w x h` window at `(x, y)`
    fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (u64, u64) {
        let s = self.stride;
        let (tl, tr, bl, br) = (y * s + x, y * s + x + w, (y + h) * s + x, (y + h) * s + x + w);
        let area = |t: &[u64]| (t[br] + t[tl]) - (t[tr] + t[bl]);
        (area(&self.sum), area(&self.sum_sq))
    }
}

/// One template scanned over one haystack. Window statistics come from the
/// summed-area tables, only the cross term is accumulated per alignment.
struct Scan<'a> {
    haystack: &'a GrayImage,
    template: &'a Template,
    integral: Integral,
}

impl<'a> Scan<'a> {
    /// `None` when the template does not fit
    fn new(haystack: &'a GrayImage, template: &'a Template) -> Option<Self> {
        if haystack.width() < template.width() || haystack.height() < template.height() {
            return None;
        }
        Some(Self {
            haystack,
            template,
            integral: Integral::new(haystack),
        })
    }

    fn alignments(&self) -> impl Iterator<Item = (u32, u32)> + use<> {
        let max_x = self.haystack.width() - self.template.width();
        let max_y = self.haystack.height() - self.template.height();
        (0..=max_y).flat_map(move |y| (0..=max_x).map(move |x| (x, y)))
    }

    /// Zero-mean normalized cross-correlation of the template placed with its
    /// top-left corner at `(x, y)`. Range `[-1, 1]`; a flat window scores 0.
    fn score_at(&self, x: u32, y: u32) -> f32 {
        let (x, y) = (x as usize, y as usize);
        let stride = self.haystack.width() as usize;
        let tw = self.template.width() as usize;
        let th = self.template.height() as usize;
        let n = self.template.len();

        let (sum, sum_sq) = self.integral.window(x, y, tw, th);
        let sum = sum as f64;
        let energy = sum_sq as f64 - sum * sum / n;
        if energy <= f64::EPSILON {
            return 0.0;
        }

        let raw = self.haystack.as_raw();
        let mut cross = 0u64;
        for (ty, trow) in self.template.pattern.as_raw().chunks_exact(tw).enumerate() {
            let start = (y + ty) * stride + x;
            let row: u32 = raw[start..start + tw]
                .iter()
                .zip(trow)
                .map(|(&w, &t)| w as u32 * t as u32)
                .sum();
            cross += row as u64;
        }

        let numerator = cross as f64 - sum * self.template.sum / n;
        (numerator / (energy * self.template.energy).sqrt()) as f32
    }

    fn scores(&self) -> impl Iterator<Item = MatchScore> + '_ {
        self.alignments().map(|(x, y)| MatchScore {
            x,
            y,
            score: self.score_at(x, y),
        })
    }
}

/// First alignment whose score exceeds `threshold`, scanning row by row.
/// `None` when nothing does or the template does not fit.
pub fn find_above(haystack: &GrayImage, template: &Template, threshold: f32) -> Option<MatchScore> {
    Scan::new(haystack, template)?
        .scores()
        .find(|m| m.score > threshold)
}
