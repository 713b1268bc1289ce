use anyhow::bail;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifiant fort pour un membre du personnel
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Membre du personnel de permanence, avec ses objectifs du mois.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub target_weekday_count: u32,
    #[serde(default)]
    pub target_holiday_count: u32,
    /// Jours où la permanence est interdite.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub unavailability: BTreeSet<NaiveDate>,
    /// Jours souhaités.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub preferences: BTreeSet<NaiveDate>,
}

impl StaffMember {
    pub fn new<N: Into<String>>(name: N, target_weekday_count: u32, target_holiday_count: u32) -> Self {
        Self {
            id: StaffId::random(),
            name: name.into(),
            target_weekday_count,
            target_holiday_count,
            unavailability: BTreeSet::new(),
            preferences: BTreeSet::new(),
        }
    }

    pub fn with_unavailability<I: IntoIterator<Item = NaiveDate>>(mut self, dates: I) -> Self {
        dates.into_iter().for_each(|d| self.mark_unavailable(d));
        self
    }

    pub fn with_preferences<I: IntoIterator<Item = NaiveDate>>(mut self, dates: I) -> Self {
        dates.into_iter().for_each(|d| self.mark_preferred(d));
        self
    }

    /// Un jour est soit indisponible, soit souhaité, jamais les deux.
    pub fn mark_unavailable(&mut self, date: NaiveDate) {
        self.preferences.remove(&date);
        self.unavailability.insert(date);
    }

    pub fn mark_preferred(&mut self, date: NaiveDate) {
        self.unavailability.remove(&date);
        self.preferences.insert(date);
    }
}

/// Mois cible, au format `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> anyhow::Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            bail!("invalid month: {year}-{month:02}");
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // validé à la construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        let (y, m) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1)
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((y, m)) = s.trim().split_once('-') else {
            bail!("expected YYYY-MM, got {s:?}");
        };
        let year: i32 = y.parse().map_err(|_| anyhow::anyhow!("invalid year in {s:?}"))?;
        let month: u32 = m.parse().map_err(|_| anyhow::anyhow!("invalid month in {s:?}"))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = anyhow::Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<YearMonth> for String {
    fn from(m: YearMonth) -> Self {
        m.to_string()
    }
}

/// Photo immuable des entrées d'une génération : mois, personnel, jours fériés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub month: YearMonth,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub holidays: BTreeSet<NaiveDate>,
}

impl Snapshot {
    pub fn new(month: YearMonth) -> Self {
        Self {
            month,
            staff: Vec::new(),
            holidays: BTreeSet::new(),
        }
    }

    pub fn add_staff(&mut self, member: StaffMember) -> anyhow::Result<()> {
        if member.name.trim().is_empty() {
            bail!("staff name cannot be empty");
        }
        if self.find_staff_by_name(&member.name).is_some() {
            bail!("staff already registered: {}", member.name);
        }
        self.staff.push(member);
        Ok(())
    }

    pub fn remove_staff(&mut self, name: &str) -> Option<StaffMember> {
        let pos = self.staff.iter().position(|s| s.name == name)?;
        Some(self.staff.remove(pos))
    }

    pub fn find_staff_by_name<'a>(&'a self, name: &str) -> Option<&'a StaffMember> {
        self.staff.iter().find(|s| s.name == name)
    }
    pub fn find_staff_by_id<'a>(&'a self, id: &StaffId) -> Option<&'a StaffMember> {
        self.staff.iter().find(|s| &s.id == id)
    }
    pub fn find_staff_mut_by_name(&mut self, name: &str) -> Option<&mut StaffMember> {
        self.staff.iter_mut().find(|s| s.name == name)
    }

    /// Retourne `false` si la date était déjà fériée.
    pub fn add_holiday(&mut self, date: NaiveDate) -> bool {
        self.holidays.insert(date)
    }
    pub fn remove_holiday(&mut self, date: NaiveDate) -> bool {
        self.holidays.remove(&date)
    }

    pub fn set_month(&mut self, month: YearMonth) {
        self.month = month;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayCategory {
    Weekday,
    Holiday,
}

/// Résultat d'une journée pour une variante.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayShift {
    pub date: NaiveDate,
    pub staff_id: StaffId,
    pub is_holiday: bool,
}

impl DayShift {
    pub fn category(&self) -> DayCategory {
        if self.is_holiday {
            DayCategory::Holiday
        } else {
            DayCategory::Weekday
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Hard,
    Soft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub date: NaiveDate,
    pub severity: Severity,
    pub message: String,
}

/// Une variante complète du tableau de permanence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub pattern_id: String,
    pub pattern_index: usize,
    /// Graine de base de la génération (rejouable).
    pub seed: Option<u64>,
    /// Note dans [0, 100], sans bruit d'affichage.
    pub score: u32,
    /// Bruit cosmétique (0..=4) pour départager l'affichage ; 0 si désactivé.
    #[serde(default)]
    pub jitter: u32,
    pub shifts: Vec<DayShift>,
    pub violations: Vec<Violation>,
}

impl GenerationResult {
    pub fn display_score(&self) -> u32 {
        self.score + self.jitter
    }

    pub fn violation_for(&self, date: NaiveDate) -> Option<&Violation> {
        self.violations.iter().find(|v| v.date == date)
    }
}
