use crate::types::{Item, Placement};

/// A horizontal strip of the bin. The height is fixed by the first item put
/// on it; later items only consume width, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub height: u64,
    pub y: u64,
    pub used_width: u64,
}

impl Level {
    pub fn new(height: u64, y: u64) -> Self {
        Self {
            height,
            y,
            used_width: 0,
        }
    }

    pub fn fits(&self, item: Item, bin_width: u64) -> bool {
        self.used_width + item.width <= bin_width
    }

    /// Offset of the first row below this level.
    pub fn end(&self) -> u64 {
        self.y + self.height
    }

    fn place(&mut self, item: Item, bin_width: u64) -> Placement {
        let mut placement = Placement::new(item, self.used_width, self.y);
        placement.overflows = item.width > bin_width;
        self.used_width += item.width;
        tracing::trace!(item = %item, x = placement.x, y = placement.y, "placed");
        placement
    }
}

/// Shared interface of the level-assignment policies. Items are fed one at a
/// time and a placement, once returned, is never revisited.
pub trait Allocator {
    fn place(&mut self, item: Item) -> Placement;

    /// Height consumed so far.
    fn total_height(&self) -> u64;
}

/// Stacks every item at `x = 0`, one on top of the other.
#[derive(Debug, Clone)]
pub struct Column {
    bin_width: u64,
    height: u64,
}

impl Column {
    pub fn new(bin_width: u64) -> Self {
        Self {
            bin_width,
            height: 0,
        }
    }
}

impl Allocator for Column {
    fn place(&mut self, item: Item) -> Placement {
        let mut placement = Placement::new(item, 0, self.height);
        placement.overflows = item.width > self.bin_width;
        self.height += item.height;
        placement
    }

    fn total_height(&self) -> u64 {
        self.height
    }
}

/// Only the most recently opened level is ever consulted.
#[derive(Debug, Clone)]
pub struct NextFit {
    bin_width: u64,
    current: Option<Level>,
}

impl NextFit {
    pub fn new(bin_width: u64) -> Self {
        Self {
            bin_width,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Level> {
        self.current.as_ref()
    }
}

impl Allocator for NextFit {
    fn place(&mut self, item: Item) -> Placement {
        let bin_width = self.bin_width;
        match self.current.as_mut() {
            Some(level) if level.fits(item, bin_width) => level.place(item, bin_width),
            _ => {
                let y = self.total_height();
                tracing::debug!(y, height = item.height, "opening level");
                self.current
                    .insert(Level::new(item.height, y))
                    .place(item, bin_width)
            }
        }
    }

    fn total_height(&self) -> u64 {
        self.current.map_or(0, |l| l.end())
    }
}

/// Every level stays open; an item goes to the first one in creation order
/// with enough remaining width.
#[derive(Debug, Clone)]
pub struct FirstFit {
    bin_width: u64,
    levels: Vec<Level>,
    next_y: u64,
}

impl FirstFit {
    pub fn new(bin_width: u64) -> Self {
        Self {
            bin_width,
            levels: Vec::new(),
            next_y: 0,
        }
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn find_first(&self, item: Item) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| level.fits(item, self.bin_width))
    }
}

impl Allocator for FirstFit {
    fn place(&mut self, item: Item) -> Placement {
        let idx = match self.find_first(item) {
            Some(idx) => idx,
            None => {
                tracing::debug!(
                    y = self.next_y,
                    height = item.height,
                    level = self.levels.len(),
                    "opening level"
                );
                self.levels.push(Level::new(item.height, self.next_y));
                self.next_y += item.height;
                self.levels.len() - 1
            }
        };
        self.levels[idx].place(item, self.bin_width)
    }

    fn total_height(&self) -> u64 {
        self.levels.iter().map(|l| l.height).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<A: Allocator>(alloc: &mut A, items: &[(u64, u64)]) -> Vec<Placement> {
        items
            .iter()
            .map(|&(w, h)| alloc.place(Item::new(w, h)))
            .collect()
    }

    fn origins(placements: &[Placement]) -> Vec<(u64, u64)> {
        placements.iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn test_level_fits_exact_width() {
        let mut level = Level::new(4, 0);
        assert!(level.fits(Item::new(10, 4), 10));
        level.place(Item::new(6, 4), 10);
        assert!(level.fits(Item::new(4, 2), 10));
        assert!(!level.fits(Item::new(5, 2), 10));
        assert_eq!(level.end(), 4);
    }

    #[test]
    fn test_column_stacks_items() {
        let mut col = Column::new(10);
        let placed = feed(&mut col, &[(6, 4), (5, 3), (4, 2)]);
        assert_eq!(origins(&placed), vec![(0, 0), (0, 4), (0, 7)]);
        assert_eq!(col.total_height(), 9);
    }

    #[test]
    fn test_next_fit_only_uses_current_level() {
        let mut nf = NextFit::new(10);
        let placed = feed(&mut nf, &[(6, 4), (5, 3), (4, 2)]);
        assert_eq!(origins(&placed), vec![(0, 0), (0, 4), (5, 4)]);
        assert_eq!(nf.total_height(), 7);
        assert_eq!(nf.current(), Some(&Level { height: 3, y: 4, used_width: 9 }));
    }

    #[test]
    fn test_first_fit_reuses_earlier_level() {
        let mut ff = FirstFit::new(10);
        let placed = feed(&mut ff, &[(6, 4), (5, 3), (4, 2)]);
        assert_eq!(origins(&placed), vec![(0, 0), (0, 4), (6, 0)]);
        assert_eq!(ff.total_height(), 7);
        assert_eq!(
            ff.levels(),
            &[
                Level { height: 4, y: 0, used_width: 10 },
                Level { height: 3, y: 4, used_width: 5 },
            ]
        );
    }

    #[test]
    fn test_first_fit_picks_first_not_tightest() {
        let mut ff = FirstFit::new(10);
        // Level 0 has 3 left, level 1 has 2 left: a width-2 item goes to level 0.
        feed(&mut ff, &[(7, 5), (8, 4)]);
        let p = ff.place(Item::new(2, 1));
        assert_eq!((p.x, p.y), (7, 0));
        assert_eq!(ff.find_first(Item::new(1, 1)), Some(0));
        assert_eq!(ff.find_first(Item::new(2, 1)), Some(1));
        assert_eq!(ff.find_first(Item::new(3, 1)), None);
        assert_eq!(ff.find_first(Item::new(9, 1)), None);
    }

    #[test]
    fn test_empty_allocators_have_no_height() {
        assert_eq!(Column::new(5).total_height(), 0);
        assert_eq!(NextFit::new(5).total_height(), 0);
        assert_eq!(FirstFit::new(5).total_height(), 0);
    }

    #[test]
    fn test_oversized_item_gets_own_level() {
        let mut nf = NextFit::new(10);
        let placed = feed(&mut nf, &[(4, 5), (12, 3), (3, 2)]);
        assert_eq!(origins(&placed), vec![(0, 0), (0, 5), (0, 8)]);
        assert!(placed[1].overflows);
        assert!(!placed[0].overflows && !placed[2].overflows);

        let mut ff = FirstFit::new(10);
        let placed = feed(&mut ff, &[(4, 5), (12, 3), (3, 2)]);
        assert_eq!(origins(&placed), vec![(0, 0), (0, 5), (4, 0)]);
        assert!(placed[1].overflows);
        assert_eq!(ff.levels()[1].used_width, 12);
    }
}
