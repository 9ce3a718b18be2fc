//! Payment / compounding frequencies and their calendar steps

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How often a payment or compounding period occurs within a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
    SemiMonthly,
    BiWeekly,
    Weekly,
    Daily,
}

/// Calendar distance between two consecutive period dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarStep {
    Months(u32),
    Days(u64),
}

impl PaymentFrequency {
    /// Number of periods in one year
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Annual => 1,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::SemiMonthly => 24,
            PaymentFrequency::BiWeekly => 26,
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::Daily => 365,
        }
    }

    /// Inverse of `periods_per_year` for the frequencies calculators offer
    pub fn from_periods_per_year(periods: u32) -> Option<Self> {
        match periods {
            1 => Some(PaymentFrequency::Annual),
            2 => Some(PaymentFrequency::SemiAnnual),
            4 => Some(PaymentFrequency::Quarterly),
            12 => Some(PaymentFrequency::Monthly),
            24 => Some(PaymentFrequency::SemiMonthly),
            26 => Some(PaymentFrequency::BiWeekly),
            52 => Some(PaymentFrequency::Weekly),
            365 => Some(PaymentFrequency::Daily),
            _ => None,
        }
    }

    /// Step used to date schedule rows.
    /// Semi-monthly has no exact calendar step and is treated as 15 days.
    pub fn calendar_step(&self) -> CalendarStep {
        match self {
            PaymentFrequency::Annual => CalendarStep::Months(12),
            PaymentFrequency::SemiAnnual => CalendarStep::Months(6),
            PaymentFrequency::Quarterly => CalendarStep::Months(3),
            PaymentFrequency::Monthly => CalendarStep::Months(1),
            PaymentFrequency::SemiMonthly => CalendarStep::Days(15),
            PaymentFrequency::BiWeekly => CalendarStep::Days(14),
            PaymentFrequency::Weekly => CalendarStep::Days(7),
            PaymentFrequency::Daily => CalendarStep::Days(1),
        }
    }

    /// Date of the given 1-based period when the first period starts at `start`.
    /// Period 1 falls one step after `start`. Returns None past chrono's date range.
    pub fn period_date(&self, start: NaiveDate, period_index: u32) -> Option<NaiveDate> {
        match self.calendar_step() {
            CalendarStep::Months(m) => {
                start.checked_add_months(Months::new(m.checked_mul(period_index)?))
            }
            CalendarStep::Days(d) => start.checked_add_days(Days::new(d * period_index as u64)),
        }
    }
}

impl FromStr for PaymentFrequency {
    type Err = String;

    /// Accepts snake_case, kebab-case or run-together names (`bi_weekly`, `bi-weekly`, `biweekly`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "annual" | "annually" | "yearly" => Ok(PaymentFrequency::Annual),
            "semiannual" | "semiannually" => Ok(PaymentFrequency::SemiAnnual),
            "quarterly" => Ok(PaymentFrequency::Quarterly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            "semimonthly" => Ok(PaymentFrequency::SemiMonthly),
            "biweekly" => Ok(PaymentFrequency::BiWeekly),
            "weekly" => Ok(PaymentFrequency::Weekly),
            "daily" => Ok(PaymentFrequency::Daily),
            _ => Err(format!("unknown payment frequency: {}", s)),
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentFrequency::Annual => "annual",
            PaymentFrequency::SemiAnnual => "semi_annual",
            PaymentFrequency::Quarterly => "quarterly",
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::SemiMonthly => "semi_monthly",
            PaymentFrequency::BiWeekly => "bi_weekly",
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::Daily => "daily",
        };
        f.write_str(name)
    }
}

impl Default for PaymentFrequency {
    fn default() -> Self {
        PaymentFrequency::Monthly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_periods_per_year() {
        for freq in [
            PaymentFrequency::Annual,
            PaymentFrequency::SemiAnnual,
            PaymentFrequency::Quarterly,
            PaymentFrequency::Monthly,
            PaymentFrequency::SemiMonthly,
            PaymentFrequency::BiWeekly,
            PaymentFrequency::Weekly,
            PaymentFrequency::Daily,
        ] {
            let periods = freq.periods_per_year();
            assert_eq!(PaymentFrequency::from_periods_per_year(periods), Some(freq));
        }
        assert_eq!(PaymentFrequency::from_periods_per_year(7), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("bi_weekly".parse::<PaymentFrequency>(), Ok(PaymentFrequency::BiWeekly));
        assert_eq!("Bi-Weekly".parse::<PaymentFrequency>(), Ok(PaymentFrequency::BiWeekly));
        assert_eq!("semimonthly".parse::<PaymentFrequency>(), Ok(PaymentFrequency::SemiMonthly));
        assert!("fortnightly".parse::<PaymentFrequency>().is_err());

        // Display output parses back and matches the serde name
        let freq = PaymentFrequency::SemiAnnual;
        assert_eq!(freq.to_string().parse::<PaymentFrequency>(), Ok(freq));
        assert_eq!(serde_json::to_string(&freq).unwrap(), format!("\"{}\"", freq));
    }

    #[test]
    fn test_monthly_dates_clamp_to_month_end() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let freq = PaymentFrequency::Monthly;

        // Feb 2024 has 29 days
        assert_eq!(freq.period_date(start, 1), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(freq.period_date(start, 12), NaiveDate::from_ymd_opt(2025, 1, 31));
    }

    #[test]
    fn test_biweekly_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            PaymentFrequency::BiWeekly.period_date(start, 2),
            NaiveDate::from_ymd_opt(2024, 3, 29)
        );
    }
}
