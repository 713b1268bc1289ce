//! Génération de variantes de tableau de permanence.
//!
//! Chaque variante parcourt le mois jour par jour, classe le personnel par coût et
//! retient le moins cher (variante 0) ou, pour les suivantes, un proche concurrent
//! tiré au sort. Les variantes ne partagent aucun état mutable.

mod assignment;
mod cost;
mod score;
mod types;

pub use cost::{evaluate, Cost, CostLabel, RunningStaffState};
pub use types::{ConfigError, CostWeights, GenerateOptions};

use crate::calendar::{self, CalendarDay};
use crate::model::{GenerationResult, Snapshot, StaffMember};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::thread;

const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;
const JITTER_SALT: u64 = 0xA5A5_5A5A_C3C3_3C3C;

/// Graine propre à la variante `index`.
pub fn pattern_seed(base: u64, index: usize) -> u64 {
    base ^ (index as u64).wrapping_mul(SEED_MIX)
}

/// Génère `opts.pattern_count` variantes, dans l'ordre des variantes.
pub fn generate(
    snapshot: &Snapshot,
    opts: &GenerateOptions,
) -> Result<Vec<GenerationResult>, ConfigError> {
    if snapshot.staff.is_empty() {
        return Err(ConfigError::EmptyRoster);
    }

    let days = calendar::expand_month(snapshot.month, &snapshot.holidays);
    let base_seed = opts.seed.unwrap_or_else(|| rand::rng().random());
    tracing::info!(
        month = %snapshot.month,
        staff = snapshot.staff.len(),
        days = days.len(),
        patterns = opts.pattern_count,
        seed = base_seed,
        "generating roster patterns"
    );

    let staff = snapshot.staff.as_slice();
    let days = days.as_slice();

    let results: Vec<GenerationResult> = if opts.parallel && opts.pattern_count > 1 {
        thread::scope(|scope| {
            let handles: Vec<_> = (0..opts.pattern_count)
                .map(|index| scope.spawn(move || run(staff, days, opts, base_seed, index)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    } else {
        (0..opts.pattern_count)
            .map(|index| run(staff, days, opts, base_seed, index))
            .collect()
    };

    Ok(results)
}

fn run(
    staff: &[StaffMember],
    days: &[CalendarDay],
    opts: &GenerateOptions,
    base_seed: u64,
    index: usize,
) -> GenerationResult {
    let seed = pattern_seed(base_seed, index);
    let mut rng = (index > 0).then(|| ChaCha8Rng::seed_from_u64(seed));
    let outcome = assignment::run_pattern(staff, days, opts, rng.as_mut());

    // bruit d'affichage uniquement, hors note
    let jitter = if opts.score_jitter {
        ChaCha8Rng::seed_from_u64(seed ^ JITTER_SALT).random_range(0..=4)
    } else {
        0
    };

    tracing::debug!(
        pattern = index + 1,
        score = outcome.score,
        violations = outcome.violations.len(),
        "pattern done"
    );

    GenerationResult {
        pattern_id: format!("pattern-{}", index + 1),
        pattern_index: index,
        seed: Some(base_seed),
        score: outcome.score,
        jitter,
        shifts: outcome.shifts,
        violations: outcome.violations,
    }
}
