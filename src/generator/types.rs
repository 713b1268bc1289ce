use thiserror::Error;

/// Poids du modèle de coût
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostWeights {
    pub unavailable: i64,
    pub consecutive: i64,
    pub preference: i64,
    /// Pénalité par pas au-delà de l'objectif.
    pub over_target_step: i64,
    pub under_target_bonus: i64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            unavailable: 10_000,
            consecutive: 5_000,
            preference: 1_000,
            over_target_step: 50,
            under_target_bonus: 10,
        }
    }
}

/// Options de génération
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    pub pattern_count: usize,
    pub weights: CostWeights,
    pub violation_threshold: i64,
    pub violation_penalty: u32,
    pub initial_score: u32,
    /// Probabilité de retenir le 2e candidat (variantes diversifiées).
    pub second_choice_probability: f64,
    /// Part du reste de la masse accordée au 3e candidat.
    pub third_choice_probability: f64,
    /// `None` : graine tirée au hasard puis consignée dans les résultats.
    pub seed: Option<u64>,
    pub score_jitter: bool,
    pub parallel: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            pattern_count: 3,
            weights: CostWeights::default(),
            violation_threshold: 1_000,
            violation_penalty: 10,
            initial_score: 100,
            second_choice_probability: 0.30,
            third_choice_probability: 0.10,
            seed: None,
            score_jitter: false,
            parallel: true,
        }
    }
}

impl GenerateOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_pattern_count(mut self, count: usize) -> Self {
        self.pattern_count = count;
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("configuration error: no staff registered")]
    EmptyRoster,
}
