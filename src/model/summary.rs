use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{
    amount::Amount,
    date_range::DateRange,
    transaction::{Transaction, TransactionType},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl SummaryPeriod {
    /// Reads the `period` query parameter. Anything unrecognised, including
    /// no value at all, means monthly.
    pub fn from_query(period: Option<&str>) -> SummaryPeriod {
        match period.map(str::trim) {
            Some("weekly") => Self::Weekly,
            Some("yearly") => Self::Yearly,
            _ => Self::Monthly,
        }
    }

    /// The window `[start, now]` covered by this period. Calendar boundaries
    /// are UTC.
    pub fn window(&self, now: DateTime<Utc>) -> Option<DateRange> {
        let start = match self {
            Self::Weekly => now - Duration::days(7),
            Self::Monthly => start_of_day(NaiveDate::from_ymd_opt(now.year(), now.month(), 1)?)?,
            Self::Yearly => start_of_day(NaiveDate::from_ymd_opt(now.year(), 1, 1)?)?,
        };

        Some(DateRange::new(start, now))
    }
}

fn start_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: Amount,
    pub total_expense: Amount,
    pub balance: Amount,
}

impl Summary {
    pub fn of(transactions: &[Transaction]) -> Summary {
        let (total_income, total_expense) = transactions.iter().fold(
            (Amount::zero(), Amount::zero()),
            |(income, expense), transaction| match transaction.transaction_type {
                TransactionType::Income => (income + transaction.amount.clone(), expense),
                TransactionType::Expense => (income, expense + transaction.amount.clone()),
            },
        );

        Summary {
            balance: total_income.clone() - total_expense.clone(),
            total_income,
            total_expense,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::model::{
        amount::Amount,
        transaction::{Division, Transaction, TransactionType},
    };

    use super::{Summary, SummaryPeriod};

    fn transaction(id: i64, transaction_type: TransactionType, amount: &str) -> Transaction {
        let at = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        Transaction {
            id,
            transaction_type,
            amount: Amount::parse(amount).unwrap(),
            description: format!("transaction {id}"),
            category: String::from("General"),
            division: Division::Personal,
            datetime: at,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn period_from_query() {
        assert_eq!(SummaryPeriod::from_query(Some("weekly")), SummaryPeriod::Weekly);
        assert_eq!(SummaryPeriod::from_query(Some("monthly")), SummaryPeriod::Monthly);
        assert_eq!(SummaryPeriod::from_query(Some("yearly")), SummaryPeriod::Yearly);
        assert_eq!(SummaryPeriod::from_query(Some("daily")), SummaryPeriod::Monthly);
        assert_eq!(SummaryPeriod::from_query(Some("")), SummaryPeriod::Monthly);
        assert_eq!(SummaryPeriod::from_query(None), SummaryPeriod::Monthly);
    }

    #[test]
    fn period_windows_end_at_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 17, 45, 30).unwrap();

        let weekly = SummaryPeriod::Weekly.window(now).unwrap();
        assert_eq!(weekly.start, now - Duration::days(7));
        assert_eq!(weekly.end, now);

        let monthly = SummaryPeriod::Monthly.window(now).unwrap();
        assert_eq!(monthly.start, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(monthly.end, now);

        let yearly = SummaryPeriod::Yearly.window(now).unwrap();
        assert_eq!(yearly.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(yearly.end, now);
    }

    #[test]
    fn empty_summary_is_zero() {
        let summary = Summary::of(&[]);

        assert_eq!(summary.total_income, Amount::zero());
        assert_eq!(summary.total_expense, Amount::zero());
        assert_eq!(summary.balance, Amount::zero());
    }

    #[test]
    fn sums_income_and_expense_separately() {
        let summary = Summary::of(&[
            transaction(1, TransactionType::Income, "100"),
            transaction(2, TransactionType::Expense, "40"),
        ]);

        assert_eq!(summary.total_income, Amount::parse("100").unwrap());
        assert_eq!(summary.total_expense, Amount::parse("40").unwrap());
        assert_eq!(summary.balance, Amount::parse("60").unwrap());
    }

    #[test]
    fn balance_can_go_negative() {
        let summary = Summary::of(&[
            transaction(1, TransactionType::Income, "10.10"),
            transaction(2, TransactionType::Expense, "20.20"),
        ]);

        assert_eq!(summary.balance, Amount::parse("-10.10").unwrap());
    }

    #[test]
    fn many_small_amounts_do_not_drift() {
        let transactions: Vec<Transaction> = (0..1000)
            .map(|id| transaction(id, TransactionType::Expense, "0.01"))
            .collect();

        let summary = Summary::of(&transactions);

        assert_eq!(summary.total_expense, Amount::parse("10").unwrap());
        assert_eq!(summary.balance, Amount::parse("-10").unwrap());
    }
}
