//! 売上集計
//!
//! 取引は駐車場所在地の現地時間で月・曜日に振り分ける。
use super::models::{MonthlyRevenue, RevenueSummary, Transaction};
use crate::features::payments::UserType;
use crate::shared::utils::{round_currency, LOCAL_TIMEZONE};
use chrono::{Datelike, Weekday};
use std::collections::BTreeMap;

/// 月別・利用者区分別に売上を集計する（古い月から順）
pub fn revenue_by_month(transactions: &[Transaction]) -> Vec<MonthlyRevenue> {
    let mut months: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();

    for transaction in transactions {
        let local = transaction.datetime.with_timezone(&LOCAL_TIMEZONE);
        let entry = months.entry((local.year(), local.month())).or_default();
        match transaction.user_type {
            UserType::Casual => entry.0 += transaction.amount,
            UserType::Monthly => entry.1 += transaction.amount,
        }
    }

    months
        .into_iter()
        .map(|((year, month), (casual, monthly))| MonthlyRevenue {
            year,
            month,
            casual: round_currency(casual),
            monthly: round_currency(monthly),
        })
        .collect()
}

/// 期間全体の売上サマリーを作成する
pub fn summarize_revenue(transactions: &[Transaction]) -> RevenueSummary {
    let mut casual = 0.0;
    let mut monthly = 0.0;
    let mut paid_total = 0.0;
    let mut paid_count = 0usize;
    let mut weekday_counts: BTreeMap<u32, usize> = BTreeMap::new();

    for transaction in transactions {
        match transaction.user_type {
            UserType::Casual => casual += transaction.amount,
            UserType::Monthly => monthly += transaction.amount,
        }
        if transaction.amount > 0.0 {
            paid_total += transaction.amount;
            paid_count += 1;
        }
        let weekday = transaction
            .datetime
            .with_timezone(&LOCAL_TIMEZONE)
            .weekday()
            .num_days_from_monday();
        *weekday_counts.entry(weekday).or_default() += 1;
    }

    // 同数の場合は週の早い曜日を優先
    let busiest_weekday = weekday_counts
        .iter()
        .max_by(|(day_a, count_a), (day_b, count_b)| {
            count_a.cmp(count_b).then_with(|| day_b.cmp(day_a))
        })
        .and_then(|(day, _)| weekday_from_index(*day));

    RevenueSummary {
        total_revenue: round_currency(casual + monthly),
        casual_revenue: round_currency(casual),
        monthly_revenue: round_currency(monthly),
        transaction_count: transactions.len(),
        average_ticket: (paid_count > 0).then(|| round_currency(paid_total / paid_count as f64)),
        busiest_weekday,
    }
}

fn weekday_from_index(index: u32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn transaction(
        y: i32,
        m: u32,
        d: u32,
        h: u32,
        plate: &str,
        user_type: UserType,
        amount: f64,
    ) -> Transaction {
        Transaction {
            datetime: Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
            license_plate: plate.to_string(),
            user_type,
            amount,
            method: None,
        }
    }

    #[test]
    fn test_revenue_by_month() {
        let transactions = vec![
            transaction(2025, 8, 15, 17, "ABC-1234", UserType::Casual, 15.5),
            transaction(2025, 8, 15, 17, "DEF-5678", UserType::Casual, 22.0),
            transaction(2025, 8, 20, 12, "XYZ-9876", UserType::Monthly, 150.0),
            transaction(2025, 9, 2, 12, "GHI-2468", UserType::Casual, 8.75),
        ];

        let months = revenue_by_month(&transactions);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].label(), "2025-08");
        assert_eq!(months[0].casual, 37.5);
        assert_eq!(months[0].monthly, 150.0);
        assert_eq!(months[0].total(), 187.5);
        assert_eq!(months[1].label(), "2025-09");
        assert_eq!(months[1].casual, 8.75);
        assert_eq!(months[1].monthly, 0.0);
    }

    #[test]
    fn test_revenue_by_month_uses_local_time() {
        // UTC 2025-09-01 02:00 はサンパウロでは 2025-08-31 23:00
        let transactions = vec![transaction(2025, 9, 1, 2, "ABC-1234", UserType::Casual, 10.0)];
        let months = revenue_by_month(&transactions);
        assert_eq!(months[0].label(), "2025-08");
    }

    #[test]
    fn test_summarize_revenue() {
        let transactions = vec![
            // 2025-08-15 は金曜日
            transaction(2025, 8, 15, 17, "ABC-1234", UserType::Casual, 15.5),
            transaction(2025, 8, 15, 17, "XYZ-9876", UserType::Monthly, 0.0),
            transaction(2025, 8, 15, 18, "DEF-5678", UserType::Casual, 22.0),
            transaction(2025, 8, 18, 12, "GHI-2468", UserType::Casual, 8.75),
        ];

        let summary = summarize_revenue(&transactions);
        assert_eq!(summary.total_revenue, 46.25);
        assert_eq!(summary.casual_revenue, 46.25);
        assert_eq!(summary.monthly_revenue, 0.0);
        assert_eq!(summary.transaction_count, 4);
        // 有料3件の平均: 46.25 / 3 = 15.4166... → 15.42
        assert_eq!(summary.average_ticket, Some(15.42));
        assert_eq!(summary.busiest_weekday, Some(Weekday::Fri));
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize_revenue(&[]);
        assert_eq!(summary.total_revenue, 0.0);
        assert_eq!(summary.average_ticket, None);
        assert_eq!(summary.busiest_weekday, None);
    }
}
