use serde::{Deserialize, Serialize};

/// One line of the input list: `quantity` identical rectangles.
///
/// Fields are signed so that malformed input survives deserialization and is
/// reported by validation instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemSpec {
    pub width: i64,
    pub height: i64,
    pub quantity: i64,
}

impl ItemSpec {
    pub fn new(width: i64, height: i64, quantity: i64) -> Self {
        Self {
            width,
            height,
            quantity,
        }
    }
}

/// A single validated rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Item {
    pub width: u64,
    pub height: u64,
}

impl Item {
    pub fn new(width: u64, height: u64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u128 {
        u128::from(self.width) * u128::from(self.height)
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub x: u64,
    pub y: u64,
    pub width: u64,
    pub height: u64,
    /// Set when the rectangle is wider than the bin (only under
    /// [`OverflowPolicy::Allow`]).
    #[serde(default, skip_serializing_if = "is_false")]
    pub overflows: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Placement {
    pub fn new(item: Item, x: u64, y: u64) -> Self {
        Self {
            x,
            y,
            width: item.width,
            height: item.height,
            overflows: false,
        }
    }

    pub fn item(&self) -> Item {
        Item::new(self.width, self.height)
    }

    pub fn right(&self) -> u64 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u64 {
        self.y.saturating_add(self.height)
    }
}

/// Input record as read from `algorithm_input.json`-style files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingInput {
    #[serde(rename = "width_of_bin")]
    pub bin_width: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_rectangles: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_types_of_rectangles: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autofill_option: Option<bool>,
    #[serde(rename = "rectangle_list")]
    pub items: Vec<ItemSpec>,
}

impl PackingInput {
    pub fn new(bin_width: i64, items: Vec<ItemSpec>) -> Self {
        Self {
            bin_width,
            number_of_rectangles: None,
            number_of_types_of_rectangles: None,
            autofill_option: None,
            items,
        }
    }

    /// Number of rectangles after expansion, ignoring negative quantities.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|s| u64::try_from(s.quantity).unwrap_or(0))
            .fold(0, u64::saturating_add)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingResult {
    pub bin_width: u64,
    pub total_height: u64,
    pub placements: Vec<Placement>,
}

impl PackingResult {
    pub fn used_area(&self) -> u128 {
        self.placements
            .iter()
            .fold(0u128, |acc, p| acc.saturating_add(p.item().area()))
    }

    /// Unused share of the `bin_width x total_height` envelope, in percent.
    pub fn waste_percent(&self) -> f64 {
        let envelope = u128::from(self.bin_width) * u128::from(self.total_height);
        if envelope == 0 {
            return 0.0;
        }
        envelope.saturating_sub(self.used_area()) as f64 / envelope as f64 * 100.0
    }

    /// Number of distinct shelves. Every shelf has a non-zero height, so
    /// shelves are identified by their `y` offset.
    pub fn level_count(&self) -> usize {
        let mut ys: Vec<u64> = self.placements.iter().map(|p| p.y).collect();
        ys.sort_unstable();
        ys.dedup();
        ys.len()
    }

    pub fn has_overflow(&self) -> bool {
        self.placements.iter().any(|p| p.overflows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Single column in input order, ignores the bin width.
    Naive,
    /// Next-Fit Decreasing Height.
    NextFit,
    /// First-Fit Decreasing Height.
    #[default]
    FirstFit,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Naive, Strategy::NextFit, Strategy::FirstFit];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Naive => "naive",
            Strategy::NextFit => "next-fit",
            Strategy::FirstFit => "first-fit",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "naive" | "bad" => Ok(Strategy::Naive),
            "next-fit" | "nfdh" => Ok(Strategy::NextFit),
            "first-fit" | "ffdh" => Ok(Strategy::FirstFit),
            _ => Err(format!(
                "invalid strategy '{}', expected: naive, next-fit, or first-fit",
                s
            )),
        }
    }
}

/// What to do with a rectangle wider than the bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Fail validation before anything is placed.
    #[default]
    Reject,
    /// Give the rectangle a shelf of its own and flag the placement.
    Allow,
}
