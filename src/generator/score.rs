use super::cost::Cost;
use crate::model::{Severity, Violation};
use chrono::NaiveDate;

const FALLBACK_MESSAGE: &str = "hard-to-optimize";

/// Relevé des violations et note d'une variante.
#[derive(Debug)]
pub(super) struct Scorer {
    threshold: i64,
    penalty: i64,
    score: i64,
    violations: Vec<Violation>,
}

impl Scorer {
    pub(super) fn new(initial_score: u32, threshold: i64, penalty: u32) -> Self {
        Self {
            threshold,
            penalty: i64::from(penalty),
            score: i64::from(initial_score),
            violations: Vec::new(),
        }
    }

    /// Consigne une violation si le coût retenu atteint le seuil.
    pub(super) fn record(&mut self, date: NaiveDate, staff_name: &str, cost: &Cost) -> bool {
        if cost.value < self.threshold {
            return false;
        }
        let reason = cost
            .label
            .map(|l| l.to_string())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        tracing::trace!(%date, staff = staff_name, cost = cost.value, %reason, "violation");
        self.violations.push(Violation {
            date,
            severity: Severity::Soft,
            message: format!("{staff_name}: {reason}"),
        });
        self.score -= self.penalty;
        true
    }

    /// Note plancher à 0.
    pub(super) fn finish(self) -> (u32, Vec<Violation>) {
        let score = u32::try_from(self.score.max(0)).unwrap_or(u32::MAX);
        (score, self.violations)
    }
}
