#![forbid(unsafe_code)]
//! Permanence — génération de tableaux de permanence mensuels (sans BD).
//!
//! - Coût additif par personne et par jour (indisponibilité, enchaînement, souhaits, objectifs).
//! - Affectation gloutonne jour par jour, plusieurs variantes notées.
//! - Variantes indépendantes, graine par variante, calcul parallèle possible.
//! - Import/export CSV, stockage JSON en dehors du moteur.

pub mod calendar;
pub mod generator;
pub mod io;
pub mod model;
pub mod storage;

pub use calendar::{expand_month, CalendarDay};
pub use generator::{generate, ConfigError, CostLabel, CostWeights, GenerateOptions};
pub use model::{
    DayCategory, DayShift, GenerationResult, Severity, Snapshot, StaffId, StaffMember, Violation,
    YearMonth,
};
pub use storage::{JsonStorage, Storage};
