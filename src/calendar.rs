use crate::model::YearMonth;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Jour calendaire du mois, marqué férié ou ouvré.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_holiday: bool,
}

impl CalendarDay {
    pub fn is_weekend(&self) -> bool {
        is_weekend(self.date)
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Déroule le mois du 1er au dernier jour, dans l'ordre chronologique.
/// Un jour est férié s'il figure dans `holidays` ou tombe un samedi/dimanche.
pub fn expand_month(month: YearMonth, holidays: &BTreeSet<NaiveDate>) -> Vec<CalendarDay> {
    month
        .first_day()
        .iter_days()
        .take_while(|d| *d <= month.last_day())
        .map(|date| CalendarDay {
            date,
            is_holiday: holidays.contains(&date) || is_weekend(date),
        })
        .collect()
}
