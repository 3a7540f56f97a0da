use crate::error::{PackError, Result};
use crate::shelf::{Allocator, Column, FirstFit, NextFit};
use crate::types::{Item, ItemSpec, OverflowPolicy, PackingInput, PackingResult, Strategy};

/// Packs `input` with the given strategy, rejecting items wider than the bin.
pub fn pack(input: &PackingInput, strategy: Strategy) -> Result<PackingResult> {
    Packer::new(strategy).pack(input)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Packer {
    strategy: Strategy,
    overflow: OverflowPolicy,
}

impl Packer {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            overflow: OverflowPolicy::default(),
        }
    }

    pub fn with_overflow_policy(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn pack(&self, input: &PackingInput) -> Result<PackingResult> {
        let bin_width = validate(input, self.overflow)?;
        let mut items = expand(&input.items);

        let _span = tracing::debug_span!(
            "pack",
            strategy = %self.strategy,
            items = items.len()
        )
        .entered();

        let result = match self.strategy {
            // The baseline keeps input order.
            Strategy::Naive => run(Column::new(bin_width), &items, bin_width),
            Strategy::NextFit => {
                sort_by_height_desc(&mut items);
                run(NextFit::new(bin_width), &items, bin_width)
            }
            Strategy::FirstFit => {
                sort_by_height_desc(&mut items);
                run(FirstFit::new(bin_width), &items, bin_width)
            }
        };

        tracing::debug!(
            total_height = result.total_height,
            levels = result.level_count(),
            "packed"
        );
        Ok(result)
    }
}

fn run<A: Allocator>(mut alloc: A, items: &[Item], bin_width: u64) -> PackingResult {
    let placements = items.iter().map(|&item| alloc.place(item)).collect();
    PackingResult {
        bin_width,
        total_height: alloc.total_height(),
        placements,
    }
}

/// Checks the whole input up front and returns the bin width.
pub fn validate(input: &PackingInput, overflow: OverflowPolicy) -> Result<u64> {
    let bin_width = u64::try_from(input.bin_width)
        .ok()
        .filter(|&w| w > 0)
        .ok_or(PackError::InvalidBinWidth {
            width: input.bin_width,
        })?;

    // Every offset and total is bounded by the single-column stack, so
    // checking it here keeps all shelf arithmetic in range.
    let mut stacked: u64 = 0;
    for (index, spec) in input.items.iter().enumerate() {
        if spec.width <= 0 || spec.height <= 0 {
            return Err(PackError::InvalidDimensions {
                index,
                width: spec.width,
                height: spec.height,
            });
        }
        if spec.quantity < 0 {
            return Err(PackError::NegativeQuantity {
                index,
                quantity: spec.quantity,
            });
        }
        if overflow == OverflowPolicy::Reject && spec.width.unsigned_abs() > bin_width {
            return Err(PackError::Oversized {
                index,
                width: spec.width.unsigned_abs(),
                bin_width,
            });
        }
        stacked = spec
            .height
            .unsigned_abs()
            .checked_mul(spec.quantity.unsigned_abs())
            .and_then(|h| stacked.checked_add(h))
            .ok_or(PackError::TooLarge)?;
    }

    Ok(bin_width)
}

/// Flattens specs into individual items, in spec order.
///
/// Specs must already be validated; anything non-positive is skipped.
pub fn expand(specs: &[ItemSpec]) -> Vec<Item> {
    let mut items = Vec::new();
    for spec in specs {
        let (Ok(w), Ok(h), Ok(qty)) = (
            u64::try_from(spec.width),
            u64::try_from(spec.height),
            usize::try_from(spec.quantity),
        ) else {
            continue;
        };
        items.extend(std::iter::repeat_n(Item::new(w, h), qty));
    }
    items
}

/// Tallest first. `sort_by` is stable, so equal heights keep expansion order.
pub fn sort_by_height_desc(items: &mut [Item]) {
    items.sort_by(|a, b| b.height.cmp(&a.height));
}
