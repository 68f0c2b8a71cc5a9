#![forbid(unsafe_code)]

//! Text measurement.
//!
//! The layout engine needs rendered text widths in exactly two places: the
//! horizontal legend and the vertical message column. Renderers that know
//! their fonts implement [`TextMetrics`]; [`UnicodeMetrics`] is a font-less
//! estimate built on terminal display widths.
//!
//! # Example
//! ```
//! use gitline_layout::{Font, TextMetrics, UnicodeMetrics};
//!
//! let metrics = UnicodeMetrics::default();
//! let font = Font::new(16.0, "sans-serif");
//!
//! let width = metrics.measure_text_width("MASTER", &font);
//! assert!(width > 0.0);
//!
//! // Second measurement of the same text hits the cache.
//! metrics.measure_text_width("MASTER", &font);
//! assert_eq!(metrics.stats().hits, 1);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::FxHasher;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Default cache capacity.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Average advance of one display cell, as a fraction of the font size.
pub const REGULAR_ADVANCE: f64 = 0.55;
/// Bold glyphs run wider.
pub const BOLD_ADVANCE: f64 = 0.62;

/// A font as renderers understand it.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Pixel size.
    pub size: f64,
    pub family: String,
    pub bold: bool,
}

impl Font {
    #[must_use]
    pub fn new(size: f64, family: impl Into<String>) -> Self {
        Self {
            size,
            family: family.into(),
            bold: false,
        }
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// CSS shorthand, e.g. `bold 12px helvetica, sans-serif`.
impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bold {
            f.write_str("bold ")?;
        }
        write!(f, "{}px {}", self.size, self.family)
    }
}

/// Rendered text width provider.
pub trait TextMetrics {
    fn measure_text_width(&self, text: &str, font: &Font) -> f64;
}

impl<F> TextMetrics for F
where
    F: Fn(&str, &Font) -> f64,
{
    fn measure_text_width(&self, text: &str, font: &Font) -> f64 {
        self(text, font)
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Current number of entries.
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Hit rate (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of display widths (in cells), keyed by an FxHash of the text.
#[derive(Debug)]
pub struct WidthCache {
    cache: LruCache<u64, usize>,
    hits: u64,
    misses: u64,
}

impl WidthCache {
    /// Create a new cache. A zero capacity is raised to 1.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Cached width, computing it with [`display_width`] on a miss.
    pub fn get_or_compute(&mut self, text: &str) -> usize {
        let hash = hash_text(text);
        if let Some(&width) = self.cache.get(&hash) {
            self.hits += 1;
            return width;
        }
        self.misses += 1;
        let width = display_width(text);
        self.cache.put(hash, width);
        width
    }

    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.cache.contains(&hash_text(text))
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.cache.len(),
            capacity: self.cache.cap().get(),
        }
    }
}

impl Default for WidthCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[inline]
fn hash_text(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    text.hash(&mut hasher);
    hasher.finish()
}

/// Display width of `text` in terminal cells.
///
/// Every grapheme counts at most two cells, so emoji ZWJ sequences measure
/// like a single wide glyph.
#[must_use]
pub fn display_width(text: &str) -> usize {
    if text.is_ascii() {
        return text.bytes().filter(|b| (b' '..=b'~').contains(b)).count();
    }
    text.graphemes(true).map(|g| g.width().min(2)).sum()
}

/// Width estimate from display cells and a per-weight advance.
///
/// Not thread-safe: the cache lives in a `RefCell`. Use one instance per
/// render.
#[derive(Debug, Default)]
pub struct UnicodeMetrics {
    cache: RefCell<WidthCache>,
}

impl UnicodeMetrics {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: RefCell::new(WidthCache::new(capacity)),
        }
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.cache.borrow().stats()
    }
}

impl TextMetrics for UnicodeMetrics {
    fn measure_text_width(&self, text: &str, font: &Font) -> f64 {
        let cells = self.cache.borrow_mut().get_or_compute(text);
        let advance = if font.bold {
            BOLD_ADVANCE
        } else {
            REGULAR_ADVANCE
        };
        cells as f64 * font.size * advance
    }
}
