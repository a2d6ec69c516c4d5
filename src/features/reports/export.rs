//! 取引一覧のCSV出力
use super::models::Transaction;
use crate::features::payments::UserType;
use crate::shared::errors::AppResult;
use crate::shared::utils::{format_brl, LOCAL_TIMEZONE};
use std::path::Path;

const CSV_HEADER: [&str; 4] = ["Date/Time", "License Plate", "User Type", "Amount Paid"];

/// 取引一覧をCSV文字列に変換する
///
/// 日時は現地時間の `YYYY-MM-DD HH:MM`、金額は `R$ 15,50` 形式。行区切りはCRLF。
pub fn transactions_to_csv(transactions: &[Transaction]) -> String {
    let mut csv = String::new();
    push_row(&mut csv, CSV_HEADER.iter().map(|s| s.to_string()));

    for transaction in transactions {
        let datetime = transaction
            .datetime
            .with_timezone(&LOCAL_TIMEZONE)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        let user_type = match transaction.user_type {
            UserType::Casual => "Casual",
            UserType::Monthly => "Monthly",
        };
        push_row(
            &mut csv,
            [
                datetime,
                transaction.license_plate.clone(),
                user_type.to_string(),
                format_brl(transaction.amount),
            ],
        );
    }

    csv
}

/// 取引一覧をCSVファイルに書き出す
pub fn write_transactions_csv<P: AsRef<Path>>(path: P, transactions: &[Transaction]) -> AppResult<()> {
    std::fs::write(path.as_ref(), transactions_to_csv(transactions))?;
    log::info!(
        "取引CSVを出力しました: path={}, rows={}",
        path.as_ref().display(),
        transactions.len()
    );
    Ok(())
}

fn push_row<I>(csv: &mut String, fields: I)
where
    I: IntoIterator<Item = String>,
{
    let row = fields
        .into_iter()
        .map(|field| escape_field(&field))
        .collect::<Vec<_>>()
        .join(",");
    csv.push_str(&row);
    csv.push_str("\r\n");
}

/// カンマ・引用符・改行を含むフィールドを引用符で囲む
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction {
                datetime: Utc.with_ymd_and_hms(2024, 8, 15, 17, 30, 0).unwrap(),
                license_plate: "ABC-1234".to_string(),
                user_type: UserType::Casual,
                amount: 15.5,
                method: None,
            },
            Transaction {
                datetime: Utc.with_ymd_and_hms(2024, 8, 15, 17, 25, 0).unwrap(),
                license_plate: "XYZ-9876".to_string(),
                user_type: UserType::Monthly,
                amount: 0.0,
                method: None,
            },
        ]
    }

    #[test]
    fn test_transactions_to_csv() {
        let csv = transactions_to_csv(&sample());
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines[0], "Date/Time,License Plate,User Type,Amount Paid");
        assert_eq!(lines[1], "2024-08-15 14:30,ABC-1234,Casual,\"R$ 15,50\"");
        assert_eq!(lines[2], "2024-08-15 14:25,XYZ-9876,Monthly,\"R$ 0,00\"");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_write_transactions_csv() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transacoes.csv");

        write_transactions_csv(&path, &sample()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, transactions_to_csv(&sample()));
    }

    #[test]
    fn test_write_transactions_csv_to_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("transacoes.csv");
        let result = write_transactions_csv(&path, &sample());
        assert!(matches!(result, Err(crate::shared::errors::AppError::Io(_))));
    }
}
