use super::CostWeights;
use crate::calendar::CalendarDay;
use crate::model::StaffMember;
use chrono::NaiveDate;
use std::fmt;

/// Compteurs d'une personne pour une seule variante en cours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunningStaffState {
    pub current_weekday_count: u32,
    pub current_holiday_count: u32,
    pub last_assigned_date: Option<NaiveDate>,
}

impl RunningStaffState {
    pub fn record(&mut self, day: &CalendarDay) {
        if day.is_holiday {
            self.current_holiday_count += 1;
        } else {
            self.current_weekday_count += 1;
        }
        self.last_assigned_date = Some(day.date);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostLabel {
    UnavailableDay,
    ConsecutiveDuty,
}

impl fmt::Display for CostLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CostLabel::UnavailableDay => "unavailable-day",
            CostLabel::ConsecutiveDuty => "consecutive-duty",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cost {
    pub value: i64,
    pub label: Option<CostLabel>,
}

/// Coût additif d'affecter `staff` au jour `day`.
pub fn evaluate(
    weights: &CostWeights,
    staff: &StaffMember,
    state: &RunningStaffState,
    day: &CalendarDay,
) -> Cost {
    let mut value = 0i64;
    let mut label = None;

    if staff.unavailability.contains(&day.date) {
        value += weights.unavailable;
        label = Some(CostLabel::UnavailableDay);
    }

    if state.last_assigned_date.is_some() && state.last_assigned_date == day.date.pred_opt() {
        value += weights.consecutive;
        if label.is_none() {
            label = Some(CostLabel::ConsecutiveDuty);
        }
    }

    if staff.preferences.contains(&day.date) {
        value -= weights.preference;
    }

    let (current, target) = if day.is_holiday {
        (state.current_holiday_count, staff.target_holiday_count)
    } else {
        (state.current_weekday_count, staff.target_weekday_count)
    };
    if current >= target {
        value += weights.over_target_step * (i64::from(current) - i64::from(target) + 1);
    } else {
        value -= weights.under_target_bonus;
    }

    Cost { value, label }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32, is_holiday: bool) -> CalendarDay {
        CalendarDay {
            date: NaiveDate::from_ymd_opt(2025, 10, d).unwrap(),
            is_holiday,
        }
    }

    #[test]
    fn under_target_gets_small_bonus() {
        let staff = StaffMember::new("A", 3, 0);
        let c = evaluate(&CostWeights::default(), &staff, &RunningStaffState::default(), &day(1, false));
        assert_eq!(c, Cost { value: -10, label: None });
    }

    #[test]
    fn over_target_grows_per_step() {
        let staff = StaffMember::new("A", 1, 0);
        let state = RunningStaffState {
            current_weekday_count: 3,
            ..Default::default()
        };
        let c = evaluate(&CostWeights::default(), &staff, &state, &day(10, false));
        assert_eq!(c.value, 150);
        // zéro jour férié visé : le premier coûte déjà un pas
        let c = evaluate(&CostWeights::default(), &staff, &state, &day(11, true));
        assert_eq!(c.value, 50);
    }

    #[test]
    fn unavailable_label_wins_over_consecutive() {
        let staff = StaffMember::new("A", 5, 5).with_unavailability([day(2, false).date]);
        let mut state = RunningStaffState::default();
        state.record(&day(1, false));
        let c = evaluate(&CostWeights::default(), &staff, &state, &day(2, false));
        assert_eq!(c.value, 10_000 + 5_000 - 10);
        assert_eq!(c.label, Some(CostLabel::UnavailableDay));
    }

    #[test]
    fn consecutive_only_for_previous_day() {
        let staff = StaffMember::new("A", 5, 5);
        let mut state = RunningStaffState::default();
        state.record(&day(1, false));
        let next = evaluate(&CostWeights::default(), &staff, &state, &day(2, false));
        assert_eq!(next.label, Some(CostLabel::ConsecutiveDuty));
        assert_eq!(next.value, 4_990);
        let later = evaluate(&CostWeights::default(), &staff, &state, &day(3, false));
        assert_eq!(later.label, None);
    }

    #[test]
    fn preference_is_a_bonus_without_label() {
        let staff = StaffMember::new("A", 0, 0).with_preferences([day(6, false).date]);
        let c = evaluate(&CostWeights::default(), &staff, &RunningStaffState::default(), &day(6, false));
        assert_eq!(c, Cost { value: -950, label: None });
    }
}
