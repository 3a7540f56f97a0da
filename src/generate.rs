//! Random input generation.
//!
//! Tops up a (possibly empty) list of specs with new distinct rectangle
//! types, then spreads the remaining count over all types. Every run is
//! reproducible from its seed.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenerateError;
use crate::types::{ItemSpec, PackingInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
    pub bin_width: u64,
    /// Number of distinct `(width, height)` types wanted in the output.
    pub types: u64,
    /// Total number of rectangles wanted in the output.
    pub count: u64,
    pub min_height: u64,
    pub max_height: u64,
    /// `None` draws a fresh seed.
    #[serde(default)]
    pub seed: Option<u64>,
}

pub fn generate(config: &GenerateConfig, seeds: &[ItemSpec]) -> Result<PackingInput, GenerateError> {
    if config.bin_width == 0 {
        return Err(GenerateError::InvalidBinWidth);
    }
    if config.min_height == 0 || config.min_height > config.max_height {
        return Err(GenerateError::InvalidHeightRange {
            min: config.min_height,
            max: config.max_height,
        });
    }
    // Everything below is i64 to match the input record.
    let width_max = to_i64(config.bin_width)?;
    let (min_h, max_h) = (to_i64(config.min_height)?, to_i64(config.max_height)?);

    let seed = config.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "generating input");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    validate_seeds(seeds, width_max)?;
    let mut specs = seeds.to_vec();
    let mut known: HashSet<(i64, i64)> = specs.iter().map(|s| (s.width, s.height)).collect();

    let missing_types = config.types.saturating_sub(known.len() as u64);
    let in_range = known
        .iter()
        .filter(|&&(w, h)| (1..=width_max).contains(&w) && (min_h..=max_h).contains(&h))
        .count() as u64;
    let possible = config
        .bin_width
        .saturating_mul(config.max_height - config.min_height + 1);
    if missing_types > possible - in_range {
        return Err(GenerateError::TooManyTypes {
            requested: config.types,
            possible,
        });
    }

    // Seeds plus one of each new type is the smallest reachable total.
    let current = specs.iter().try_fold(0u64, |acc, s| {
        acc.checked_add(s.quantity.unsigned_abs())
            .ok_or(GenerateError::OutOfRange(s.quantity.unsigned_abs()))
    })?;
    let minimum = current
        .checked_add(missing_types)
        .ok_or(GenerateError::OutOfRange(missing_types))?;
    if minimum > config.count {
        return Err(GenerateError::CountTooSmall {
            requested: config.count,
            minimum,
        });
    }
    let total = to_i64(config.count)?;
    let mut remaining = to_i64(config.count - minimum)?;

    let mut added = 0;
    while added < missing_types {
        let w = rng.random_range(1..=width_max);
        let h = rng.random_range(min_h..=max_h);
        if !known.insert((w, h)) {
            continue;
        }
        specs.push(ItemSpec::new(w, h, 1));
        added += 1;
    }

    if remaining > 0 && specs.is_empty() {
        return Err(GenerateError::NothingToFill);
    }
    // Quantities never exceed `total`, which fits in i64.
    while remaining > 0 {
        let idx = rng.random_range(0..specs.len());
        let add = rng.random_range(1..=remaining);
        specs[idx].quantity += add;
        remaining -= add;
    }

    tracing::debug!(types = known.len(), total, "generated input");

    Ok(PackingInput {
        bin_width: width_max,
        number_of_rectangles: Some(total),
        number_of_types_of_rectangles: Some(known.len() as i64),
        autofill_option: Some(true),
        items: specs,
    })
}

/// Seeds end up in the output record, so they must pass packing validation.
fn validate_seeds(seeds: &[ItemSpec], bin_width: i64) -> Result<(), GenerateError> {
    for (index, spec) in seeds.iter().enumerate() {
        let reason = if spec.width <= 0 || spec.height <= 0 {
            format!("dimensions must be positive, got {}x{}", spec.width, spec.height)
        } else if spec.width > bin_width {
            format!("width {} exceeds bin width {}", spec.width, bin_width)
        } else if spec.quantity < 0 {
            format!("quantity must not be negative, got {}", spec.quantity)
        } else {
            continue;
        };
        return Err(GenerateError::InvalidSeed { index, reason });
    }
    Ok(())
}

fn to_i64(value: u64) -> Result<i64, GenerateError> {
    i64::try_from(value).map_err(|_| GenerateError::OutOfRange(value))
}
