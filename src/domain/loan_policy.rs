//! Loan policy - due dates, overdue fines and renewal eligibility
//!
//! Everything here is a pure function of dates and the member category.
//! Check-in and renewal read two different category tables: at check-in a
//! teacher has no limit, while a renewal extends a teacher's loan by the
//! same 30 days as a class loan.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Flat fine charged for the first overdue day.
pub const FIRST_OVERDUE_DAY_FINE: u32 = 3;

/// Fine added for each overdue day after the first.
pub const EXTRA_OVERDUE_DAY_FINE: u32 = 1;

/// Renewal opens this many days before the due date.
pub const RENEWAL_WINDOW_DAYS: i64 = 5;

/// Patron category, which drives every loan period in this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberCategory {
    Student,
    Teacher,
    Class,
    Outside,
}

impl MemberCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberCategory::Student => "student",
            MemberCategory::Teacher => "teacher",
            MemberCategory::Class => "class",
            MemberCategory::Outside => "outside",
        }
    }
}

impl fmt::Display for MemberCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(MemberCategory::Student),
            "teacher" => Ok(MemberCategory::Teacher),
            "class" => Ok(MemberCategory::Class),
            "outside" => Ok(MemberCategory::Outside),
            other => Err(format!("Unknown member category '{}'", other)),
        }
    }
}

/// How long a loan may run before check-in charges a fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Allowance {
    Days(i64),
    Unbounded,
}

impl Allowance {
    /// Days past the allowance, or 0 when within it (or unbounded).
    pub fn days_over(&self, effective_days: i64) -> i64 {
        match self {
            Allowance::Days(allowed) if effective_days > *allowed => effective_days - allowed,
            _ => 0,
        }
    }
}

/// Check-in table: grace period before a returned loan is fined.
pub fn checkin_allowance(category: MemberCategory) -> Allowance {
    match category {
        MemberCategory::Teacher => Allowance::Unbounded,
        MemberCategory::Class => Allowance::Days(30),
        MemberCategory::Student | MemberCategory::Outside => Allowance::Days(15),
    }
}

/// Renewal table: days added to the current due date on renewal.
pub fn renewal_period_days(category: MemberCategory) -> i64 {
    match category {
        MemberCategory::Teacher | MemberCategory::Class => 30,
        MemberCategory::Student | MemberCategory::Outside => 15,
    }
}

/// Loan period used for the due date written at checkout.
///
/// A due date has to be a real date, so checkout follows the renewal table
/// rather than the unbounded check-in allowance for teachers.
pub fn loan_period_days(category: MemberCategory) -> i64 {
    renewal_period_days(category)
}

/// Fine for a loan held `effective_days` against `allowance`.
pub fn fine_for(effective_days: i64, allowance: Allowance) -> u32 {
    let over = allowance.days_over(effective_days);
    if over <= 0 {
        return 0;
    }
    let extra = u32::try_from(over - 1).unwrap_or(u32::MAX);
    FIRST_OVERDUE_DAY_FINE.saturating_add(extra.saturating_mul(EXTRA_OVERDUE_DAY_FINE))
}

/// Breakdown of the fine computed at check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FineAssessment {
    pub elapsed_days: i64,
    pub excluded_days: u32,
    /// May be negative when more leave days were excluded than elapsed.
    pub effective_days: i64,
    pub allowance: Allowance,
    pub fine: u32,
}

impl FineAssessment {
    pub fn is_overdue(&self) -> bool {
        self.fine > 0
    }
}

/// Assess the fine for a loan borrowed on `borrow_date` and returned on
/// `return_date`, with `excluded_days` leave days taken off the count.
pub fn assess_fine(
    borrow_date: NaiveDate,
    return_date: NaiveDate,
    category: MemberCategory,
    excluded_days: u32,
) -> FineAssessment {
    let elapsed_days = (return_date - borrow_date).num_days();
    let effective_days = elapsed_days - i64::from(excluded_days);
    let allowance = checkin_allowance(category);

    FineAssessment {
        elapsed_days,
        excluded_days,
        effective_days,
        allowance,
        fine: fine_for(effective_days, allowance),
    }
}

/// A leave day that falls outside the loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcludedDayOutOfRange {
    pub date: NaiveDate,
    pub borrow_date: NaiveDate,
    pub today: NaiveDate,
}

impl fmt::Display for ExcludedDayOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Excluded day {} is outside the loan period {} to {}",
            self.date, self.borrow_date, self.today
        )
    }
}

/// Count the distinct leave days picked for a loan.
///
/// Every date must lie in `[borrow_date, today]`; a date picked twice
/// counts once.
pub fn tally_excluded_days(
    borrow_date: NaiveDate,
    today: NaiveDate,
    dates: &[NaiveDate],
) -> Result<u32, ExcludedDayOutOfRange> {
    let mut distinct = BTreeSet::new();
    for &date in dates {
        if date < borrow_date || date > today {
            return Err(ExcludedDayOutOfRange {
                date,
                borrow_date,
                today,
            });
        }
        distinct.insert(date);
    }
    Ok(u32::try_from(distinct.len()).unwrap_or(u32::MAX))
}

/// Why a renewal was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RenewalRejection {
    /// Past the due date; the book has to be checked in.
    Overdue { days_overdue: i64 },
    /// The renewal window has not opened yet.
    TooEarly { window_opens: NaiveDate },
}

impl fmt::Display for RenewalRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenewalRejection::Overdue { days_overdue } => write!(
                f,
                "Loan is overdue by {} day(s); check the book in instead of renewing",
                days_overdue
            ),
            RenewalRejection::TooEarly { window_opens } => write!(
                f,
                "Renewal is too early; it opens on {}",
                window_opens
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RenewalDecision {
    Permitted { new_due_date: NaiveDate },
    Rejected(RenewalRejection),
}

/// Decide whether a loan due on `due_date` can be renewed on `today`.
///
/// The overdue check runs before the too-early check. The new due date is
/// counted from the current due date, not from today.
pub fn evaluate_renewal(
    due_date: NaiveDate,
    today: NaiveDate,
    category: MemberCategory,
) -> RenewalDecision {
    if today > due_date {
        return RenewalDecision::Rejected(RenewalRejection::Overdue {
            days_overdue: (today - due_date).num_days(),
        });
    }

    if (due_date - today).num_days() > RENEWAL_WINDOW_DAYS {
        return RenewalDecision::Rejected(RenewalRejection::TooEarly {
            window_opens: due_date - Duration::days(RENEWAL_WINDOW_DAYS),
        });
    }

    RenewalDecision::Permitted {
        new_due_date: due_date + Duration::days(renewal_period_days(category)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fine_after(days: i64, category: MemberCategory) -> u32 {
        let borrow = date(2024, 3, 1);
        assess_fine(borrow, borrow + Duration::days(days), category, 0).fine
    }

    #[test]
    fn test_boundary_day_is_free() {
        assert_eq!(fine_after(15, MemberCategory::Student), 0);
        assert_eq!(fine_after(30, MemberCategory::Class), 0);
        assert_eq!(fine_after(15, MemberCategory::Outside), 0);
    }

    #[test]
    fn test_first_overdue_day_costs_flat_fine() {
        assert_eq!(fine_after(16, MemberCategory::Student), 3);
        assert_eq!(fine_after(31, MemberCategory::Class), 3);
    }

    #[test]
    fn test_each_extra_day_adds_one() {
        assert_eq!(fine_after(19, MemberCategory::Student), 6);
        assert_eq!(fine_after(34, MemberCategory::Class), 6);
    }

    #[test]
    fn test_teacher_is_never_fined() {
        for days in [0, 15, 31, 365, 5000] {
            assert_eq!(fine_after(days, MemberCategory::Teacher), 0);
        }
    }

    #[test]
    fn test_excluding_every_day_keeps_fine_at_zero() {
        let borrow = date(2024, 1, 1);
        let returned = date(2024, 2, 15);
        let elapsed = (returned - borrow).num_days() as u32;

        let assessment = assess_fine(borrow, returned, MemberCategory::Student, elapsed);
        assert_eq!(assessment.effective_days, 0);
        assert_eq!(assessment.fine, 0);

        let over_excluded =
            assess_fine(borrow, returned, MemberCategory::Student, elapsed + 3);
        assert_eq!(over_excluded.effective_days, -3);
        assert_eq!(over_excluded.fine, 0);
    }

    #[test]
    fn test_january_example() {
        let borrow = date(2024, 1, 1);
        let returned = date(2024, 1, 20);

        let assessment = assess_fine(borrow, returned, MemberCategory::Student, 0);
        assert_eq!(assessment.elapsed_days, 19);
        assert_eq!(assessment.effective_days, 19);
        assert_eq!(assessment.allowance, Allowance::Days(15));
        assert_eq!(assessment.fine, 6);
        assert!(assessment.is_overdue());

        let with_leave = assess_fine(borrow, returned, MemberCategory::Student, 5);
        assert_eq!(with_leave.effective_days, 14);
        assert_eq!(with_leave.fine, 0);
        assert!(!with_leave.is_overdue());
    }

    #[test]
    fn test_tables_disagree_on_teachers() {
        assert_eq!(checkin_allowance(MemberCategory::Teacher), Allowance::Unbounded);
        assert_eq!(renewal_period_days(MemberCategory::Teacher), 30);
        assert_eq!(loan_period_days(MemberCategory::Teacher), 30);
        assert_eq!(loan_period_days(MemberCategory::Student), 15);
    }

    #[test]
    fn test_renewal_rejected_when_overdue() {
        let due = date(2024, 5, 10);
        for category in [
            MemberCategory::Student,
            MemberCategory::Teacher,
            MemberCategory::Class,
            MemberCategory::Outside,
        ] {
            let decision = evaluate_renewal(due, date(2024, 5, 11), category);
            assert_eq!(
                decision,
                RenewalDecision::Rejected(RenewalRejection::Overdue { days_overdue: 1 })
            );
        }
    }

    #[test]
    fn test_renewal_window_edges() {
        let due = date(2024, 5, 10);

        let six_days_before = evaluate_renewal(due, date(2024, 5, 4), MemberCategory::Student);
        assert_eq!(
            six_days_before,
            RenewalDecision::Rejected(RenewalRejection::TooEarly {
                window_opens: date(2024, 5, 5)
            })
        );

        let five_days_before = evaluate_renewal(due, date(2024, 5, 5), MemberCategory::Student);
        assert_eq!(
            five_days_before,
            RenewalDecision::Permitted {
                new_due_date: date(2024, 5, 25)
            }
        );

        let on_due_date = evaluate_renewal(due, due, MemberCategory::Student);
        assert!(matches!(on_due_date, RenewalDecision::Permitted { .. }));
    }

    #[test]
    fn test_class_renewal_counts_from_due_date() {
        let due = date(2024, 5, 10);
        let decision = evaluate_renewal(due, date(2024, 5, 8), MemberCategory::Class);
        assert_eq!(
            decision,
            RenewalDecision::Permitted {
                new_due_date: date(2024, 6, 9)
            }
        );
    }

    #[test]
    fn test_tally_deduplicates_and_checks_range() {
        let borrow = date(2024, 1, 1);
        let today = date(2024, 1, 20);

        let count = tally_excluded_days(
            borrow,
            today,
            &[date(2024, 1, 1), date(2024, 1, 5), date(2024, 1, 5), date(2024, 1, 20)],
        )
        .unwrap();
        assert_eq!(count, 3);

        let err = tally_excluded_days(borrow, today, &[date(2023, 12, 31)]).unwrap_err();
        assert_eq!(err.date, date(2023, 12, 31));

        assert!(tally_excluded_days(borrow, today, &[date(2024, 1, 21)]).is_err());
        assert_eq!(tally_excluded_days(borrow, today, &[]).unwrap(), 0);
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("Teacher".parse::<MemberCategory>().unwrap(), MemberCategory::Teacher);
        assert_eq!(" class ".parse::<MemberCategory>().unwrap(), MemberCategory::Class);
        assert!("staff".parse::<MemberCategory>().is_err());
        assert_eq!(MemberCategory::Outside.to_string(), "outside");
    }
}
