//! Donor eligibility window.

use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Days a donor must wait after donating before donating again.
pub const DONATION_COOLDOWN_DAYS: u32 = 56;

/// Outcome of an eligibility check.
///
/// # Examples
/// ```
/// use bloodbridge::domain::Eligibility;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let check = Eligibility::evaluate(Some(today), today);
/// assert!(!check.eligible);
/// assert_eq!(check.days_remaining, 56);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    pub eligible: bool,
    pub days_remaining: u32,
}

impl Eligibility {
    /// Eligible with no waiting time.
    pub const fn eligible() -> Self {
        Self {
            eligible: true,
            days_remaining: 0,
        }
    }

    /// Evaluate eligibility for a donor whose last donation was `last`.
    ///
    /// A donor with no recorded donation is eligible. Otherwise the next
    /// permitted date is `last + 56 days`, and donors become eligible on that
    /// day.
    pub fn evaluate(last: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(last) = last else {
            return Self::eligible();
        };
        let Some(next) = last.checked_add_days(Days::new(u64::from(DONATION_COOLDOWN_DAYS))) else {
            return Self {
                eligible: false,
                days_remaining: DONATION_COOLDOWN_DAYS,
            };
        };
        let remaining = (next - today).num_days().max(0);
        Self {
            eligible: today >= next,
            days_remaining: u32::try_from(remaining).unwrap_or(u32::MAX),
        }
    }
}
