//! Masonry packing for the project gallery.
//!
//! Items are visited in a seeded shuffle, given a column span, and dropped
//! into the run of columns whose tallest column is the shortest. One item may
//! be expanded to the full container width; its height comes from the
//! rendering layer through [`MeasureHeight`] because it depends on text flow.
//!
//! Both the shuffle and every per-item span roll are re-derived from fixed
//! seeds on each pass, so packing the same items at the same width twice
//! yields the same placements.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::constants::*;
use crate::error::{LayoutError, RatioError};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AspectRatio {
    pub w: f64,
    pub h: f64,
}

impl AspectRatio {
    pub const SQUARE: AspectRatio = AspectRatio { w: 1.0, h: 1.0 };

    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Lenient parse used for DOM attributes: anything unreadable is square.
    pub fn parse_or_square(s: &str) -> Self {
        match s.parse() {
            Ok(r) => r,
            Err(e) => {
                log::debug!("[masonry] {}; using 1:1", e);
                Self::SQUARE
            }
        }
    }

    /// Rounded pixel height of a box of `width` at this ratio.
    #[inline]
    pub fn height_for(&self, width: f64) -> f64 {
        (width * (self.h / self.w)).round()
    }
}

impl FromStr for AspectRatio {
    type Err = RatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.split(|c: char| matches!(c, ':' | '/' | 'x'));
        let (Some(w), Some(h), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(RatioError::Malformed(s.to_string()));
        };
        let w: f64 = w
            .trim()
            .parse()
            .map_err(|_| RatioError::Malformed(s.to_string()))?;
        let h: f64 = h
            .trim()
            .parse()
            .map_err(|_| RatioError::Malformed(s.to_string()))?;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(RatioError::NonPositive(s.to_string()));
        }
        Ok(Self { w, h })
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.w, self.h)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tier {
    Main,
    #[default]
    Standard,
}

impl Tier {
    pub fn from_attr(attr: Option<&str>) -> Self {
        match attr.map(str::trim) {
            Some("main") => Tier::Main,
            _ => Tier::Standard,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GalleryItem {
    pub ratio: AspectRatio,
    pub tier: Tier,
    pub expanded: bool,
}

impl GalleryItem {
    pub fn new(ratio: AspectRatio, tier: Tier) -> Self {
        Self {
            ratio,
            tier,
            expanded: false,
        }
    }
}

/// Ratio for a card that does not declare one. When no card is marked as
/// featured, the first few become featured wide cards.
pub fn default_ratio(index: usize, any_featured_marked: bool) -> AspectRatio {
    let s = if !any_featured_marked && index < FEATURED_COUNT {
        FEATURED_RATIO
    } else {
        DEFAULT_RATIOS[index % DEFAULT_RATIOS.len()]
    };
    AspectRatio::parse_or_square(s)
}

#[derive(Clone, Debug, PartialEq)]
pub struct MasonryConfig {
    pub gap: f64,
    pub min_col_width: f64,
    pub max_col_width: f64,
    pub min_cols: usize,
    pub max_cols: usize,
    pub shuffle_seed: u64,
    pub span_seed_base: u64,
    pub chance_wide: f64,
    pub chance_medium: f64,
    pub main_extra_height: f64,
    pub z_index_base: i64,
}

impl Default for MasonryConfig {
    fn default() -> Self {
        Self {
            gap: GAP,
            min_col_width: MIN_COL_WIDTH,
            max_col_width: MAX_COL_WIDTH,
            min_cols: MIN_COLS,
            max_cols: MAX_COLS,
            shuffle_seed: SHUFFLE_SEED,
            span_seed_base: SPAN_SEED_BASE,
            chance_wide: CHANCE_WIDE,
            chance_medium: CHANCE_MEDIUM,
            main_extra_height: MAIN_EXTRA_HEIGHT,
            z_index_base: Z_INDEX_BASE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnCategory {
    Narrow,
    Medium,
    Wide,
}

impl ColumnCategory {
    pub fn for_cols(cols: usize) -> Self {
        match cols {
            0..=3 => ColumnCategory::Narrow,
            4..=5 => ColumnCategory::Medium,
            _ => ColumnCategory::Wide,
        }
    }
}

/// Column count for an available width, soft-capped by the max column width.
pub fn decide_cols(avail: f64, config: &MasonryConfig) -> usize {
    let gap = config.gap;
    // at least one column, and never an inverted range
    let min_cols = config.min_cols.max(1);
    let max_cols = config.max_cols.max(min_cols);
    let fit = |col: f64| ((avail + gap) / (col + gap)).floor().max(0.0) as usize;
    let cols = fit(config.min_col_width).clamp(min_cols, max_cols);
    let soft = match fit(config.max_col_width) {
        0 => cols,
        n => cols.min(n),
    };
    soft.clamp(min_cols, max_cols)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnGrid {
    pub cols: usize,
    pub col_width: f64,
    pub gap: f64,
}

impl ColumnGrid {
    pub fn new(cols: usize, col_width: f64, gap: f64) -> Self {
        Self {
            cols: cols.max(1),
            col_width,
            gap,
        }
    }

    /// Grid for a measured container width. Unusable widths fall back to the
    /// viewport width; unusable column widths fall back to the minimum.
    pub fn for_width(avail: f64, viewport_width: f64, config: &MasonryConfig) -> Self {
        let mut avail = if avail.is_finite() && avail > 0.0 {
            avail
        } else {
            viewport_width
        };
        if !avail.is_finite() {
            avail = config.min_col_width;
        }
        avail = avail.max(config.min_col_width);

        let cols = decide_cols(avail, config);
        let gaps = (cols - 1) as f64 * config.gap;
        let mut col_width = ((avail - gaps) / cols as f64).floor();
        if !col_width.is_finite() || col_width <= 0.0 {
            let min_required = cols as f64 * config.min_col_width + gaps;
            col_width = ((avail.max(min_required) - gaps) / cols as f64).floor();
        }
        Self::new(cols, col_width, config.gap)
    }

    #[inline]
    pub fn span_width(&self, span: usize) -> f64 {
        let span = span.clamp(1, self.cols);
        span as f64 * self.col_width + (span - 1) as f64 * self.gap
    }

    #[inline]
    pub fn container_width(&self) -> f64 {
        self.span_width(self.cols)
    }
}

/// Natural-height probe into the rendering layer.
pub trait MeasureHeight {
    /// Height of `item` when laid out at `width`, or `None` while it has no size.
    fn natural_height(&mut self, item: usize, width: f64) -> Option<f64>;
}

impl<F> MeasureHeight for F
where
    F: FnMut(usize, f64) -> Option<f64>,
{
    fn natural_height(&mut self, item: usize, width: f64) -> Option<f64> {
        self(item, width)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub item: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub span: usize,
    pub z_index: i64,
}

impl Placement {
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn overlaps(&self, other: &Placement) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MasonryLayout {
    /// In placement order.
    pub placements: Vec<Placement>,
    pub container_width: f64,
    pub container_height: f64,
    pub cols: usize,
}

impl MasonryLayout {
    pub fn placement_for(&self, item: usize) -> Option<&Placement> {
        self.placements.iter().find(|p| p.item == item)
    }
}

#[derive(Clone, Debug)]
pub struct MasonryEngine {
    config: MasonryConfig,
    order: Vec<usize>,
}

impl MasonryEngine {
    pub fn new(item_count: usize, config: MasonryConfig) -> Self {
        let mut order: Vec<usize> = (0..item_count).collect();
        let mut rng = StdRng::seed_from_u64(config.shuffle_seed);
        order.shuffle(&mut rng);
        Self { config, order }
    }

    pub fn config(&self) -> &MasonryConfig {
        &self.config
    }

    /// Visiting order of item indices.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn grid_for_width(&self, avail: f64, viewport_width: f64) -> ColumnGrid {
        ColumnGrid::for_width(avail, viewport_width, &self.config)
    }

    /// Span an item gets when nothing is expanded.
    pub fn base_span(&self, item: usize, tier: Tier, cols: usize) -> usize {
        let span = match tier {
            Tier::Main => 2.min(cols),
            Tier::Standard => {
                let mut rng = StdRng::seed_from_u64(self.config.span_seed_base + item as u64);
                let roll: f64 = rng.gen();
                match ColumnCategory::for_cols(cols) {
                    ColumnCategory::Wide if cols >= 4 && roll < self.config.chance_wide => 2,
                    ColumnCategory::Medium if cols >= 3 && roll < self.config.chance_medium => 2,
                    _ => 1,
                }
            }
        };
        span.clamp(1, cols.max(1))
    }

    pub fn pack<M: MeasureHeight + ?Sized>(
        &self,
        items: &[GalleryItem],
        grid: &ColumnGrid,
        measure: &mut M,
    ) -> Result<MasonryLayout, LayoutError> {
        if items.len() != self.order.len() {
            return Err(LayoutError::ItemCountMismatch {
                expected: self.order.len(),
                actual: items.len(),
            });
        }

        let cols = grid.cols.max(1);
        let container_width = grid.container_width();
        let any_expanded = items.iter().any(|it| it.expanded);
        let mut heights = vec![0.0_f64; cols];
        let mut placements = Vec::with_capacity(items.len());

        for &idx in &self.order {
            let item = &items[idx];
            let span = if item.expanded {
                cols
            } else if any_expanded {
                1
            } else {
                self.base_span(idx, item.tier, cols)
            };

            let (width, height) = if item.expanded {
                let measured = measure
                    .natural_height(idx, container_width)
                    .filter(|h| h.is_finite() && *h > 0.0)
                    .ok_or(LayoutError::PendingMeasurement { item: idx })?;
                let extra = match item.tier {
                    Tier::Main => self.config.main_extra_height,
                    Tier::Standard => 0.0,
                };
                (container_width, measured.ceil() + extra)
            } else {
                let width = grid.span_width(span);
                (width, item.ratio.height_for(width))
            };

            let mut best_col = 0;
            let mut best_y = f64::INFINITY;
            for c in 0..=(cols - span) {
                let y = heights[c..c + span]
                    .iter()
                    .copied()
                    .fold(f64::NEG_INFINITY, f64::max);
                if y < best_y {
                    best_y = y;
                    best_col = c;
                }
            }

            let x = best_col as f64 * (grid.col_width + grid.gap);
            placements.push(Placement {
                item: idx,
                x,
                y: best_y,
                width,
                height,
                span,
                z_index: self.config.z_index_base + best_y.floor() as i64,
            });

            let next = best_y + height + grid.gap;
            for h in &mut heights[best_col..best_col + span] {
                *h = next;
            }
        }

        let container_height = heights.iter().copied().fold(0.0, f64::max);
        Ok(MasonryLayout {
            placements,
            container_width,
            container_height,
            cols,
        })
    }
}

/// Tracks the single expanded card.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpansionSet {
    expanded: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpansionChange {
    pub expanded: Option<usize>,
    pub collapsed: Option<usize>,
}

impl ExpansionSet {
    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn is_any_expanded(&self) -> bool {
        self.expanded.is_some()
    }

    /// Expand `item`, or collapse it if it already is. Expanding collapses
    /// whichever card was open before.
    pub fn toggle(&mut self, item: usize) -> ExpansionChange {
        match self.expanded {
            Some(current) if current == item => {
                self.expanded = None;
                ExpansionChange {
                    expanded: None,
                    collapsed: Some(item),
                }
            }
            previous => {
                self.expanded = Some(item);
                ExpansionChange {
                    expanded: Some(item),
                    collapsed: previous,
                }
            }
        }
    }

    pub fn collapse_all(&mut self) -> Option<usize> {
        self.expanded.take()
    }

    pub fn apply_to(&self, items: &mut [GalleryItem]) {
        for (i, item) in items.iter_mut().enumerate() {
            item.expanded = self.expanded == Some(i);
        }
    }
}

/// Scroll offset that centres an anchor of `anchor_height` at `anchor_top`
/// inside the visible gallery area. `None` means the anchor has not settled
/// yet and the caller should try again shortly.
pub fn focus_scroll_target(
    anchor_top: f64,
    anchor_height: f64,
    viewport_height: f64,
    scroll_height: f64,
    client_height: f64,
) -> Option<f64> {
    if !(anchor_height >= FOCUS_MIN_HEIGHT) {
        return None;
    }
    let target = anchor_top - ((viewport_height - anchor_height) / 2.0).max(0.0);
    let max_scroll = (scroll_height - client_height).max(0.0);
    Some(target.clamp(0.0, max_scroll))
}
