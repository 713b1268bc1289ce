use super::cost::{self, Cost, CostLabel, RunningStaffState};
use super::score::Scorer;
use super::GenerateOptions;
use crate::calendar::CalendarDay;
use crate::model::{DayShift, StaffMember, Violation};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy)]
pub(super) struct Candidate {
    pub(super) index: usize,
    pub(super) cost: Cost,
}

#[derive(Debug)]
pub(super) struct PatternRun {
    pub(super) shifts: Vec<DayShift>,
    pub(super) violations: Vec<Violation>,
    pub(super) score: u32,
}

/// Parcours glouton d'une variante. `rng` vaut `None` pour la variante canonique.
pub(super) fn run_pattern(
    staff: &[StaffMember],
    days: &[CalendarDay],
    opts: &GenerateOptions,
    mut rng: Option<&mut ChaCha8Rng>,
) -> PatternRun {
    let mut states = vec![RunningStaffState::default(); staff.len()];
    let mut scorer = Scorer::new(opts.initial_score, opts.violation_threshold, opts.violation_penalty);
    let mut shifts = Vec::with_capacity(days.len());

    for day in days {
        let ranked = rank(staff, &states, day, opts);
        let Some(first) = ranked.first() else {
            break;
        };

        let pos = match rng.as_deref_mut() {
            Some(rng) => pick(&ranked, rng.random::<f64>(), opts),
            None => 0,
        };
        let chosen = ranked.get(pos).unwrap_or(first);
        let member = &staff[chosen.index];

        states[chosen.index].record(day);
        scorer.record(day.date, &member.name, &chosen.cost);
        shifts.push(DayShift {
            date: day.date,
            staff_id: member.id.clone(),
            is_holiday: day.is_holiday,
        });
    }

    let (score, violations) = scorer.finish();
    PatternRun {
        shifts,
        violations,
        score,
    }
}

/// Classement croissant par coût ; tri stable, l'ordre de la liste départage.
pub(super) fn rank(
    staff: &[StaffMember],
    states: &[RunningStaffState],
    day: &CalendarDay,
    opts: &GenerateOptions,
) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = staff
        .iter()
        .zip(states)
        .enumerate()
        .map(|(index, (member, state))| Candidate {
            index,
            cost: cost::evaluate(&opts.weights, member, state, day),
        })
        .collect();
    ranked.sort_by_key(|c| c.cost.value);
    ranked
}

/// Règle de diversification : rang 2 avec `second_choice_probability`, rang 3 avec
/// `third_choice_probability` de la masse restante, jamais vers un candidat indisponible.
/// Un candidat marqué `unavailable-day` est écarté même si des bonus ramènent son coût
/// sous la pénalité d'indisponibilité (souhait, sous-objectif).
pub(super) fn pick(ranked: &[Candidate], draw: f64, opts: &GenerateOptions) -> usize {
    let p2 = opts.second_choice_probability.clamp(0.0, 1.0);
    let p3 = opts.third_choice_probability.clamp(0.0, 1.0);

    let wanted = if draw < p2 {
        1
    } else if draw < p2 + (1.0 - p2) * p3 {
        2
    } else {
        0
    };

    match ranked.get(wanted) {
        Some(c) if wanted > 0 && is_safe(&c.cost, opts) => wanted,
        _ => 0,
    }
}

fn is_safe(cost: &Cost, opts: &GenerateOptions) -> bool {
    cost.value < opts.weights.unavailable && cost.label != Some(CostLabel::UnavailableDay)
}
