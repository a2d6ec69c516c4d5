use crate::shared::errors::{AppError, AppResult};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::America::Sao_Paulo;
use chrono_tz::Tz;

/// 金額の丸め・表示・解析
pub mod currency;

pub use currency::{format_brl, parse_brl, round_currency};

/// 駐車場の所在地タイムゾーン
pub const LOCAL_TIMEZONE: Tz = Sao_Paulo;

/// 日付文字列のバリデーション
///
/// # 引数
/// * `date_str` - 日付文字列（YYYY-MM-DD形式）
///
/// # 戻り値
/// 解析された日付、または無効な場合はエラー
///
/// # バリデーション規則
/// - YYYY-MM-DD形式であること
/// - 実在する日付であること
/// - 1900年以降、2100年以前であること
pub fn validate_date(date_str: &str) -> AppResult<NaiveDate> {
    if date_str.len() != 10
        || date_str.chars().nth(4) != Some('-')
        || date_str.chars().nth(7) != Some('-')
    {
        return Err(AppError::validation(
            "日付はYYYY-MM-DD形式で入力してください",
        ));
    }

    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| AppError::validation("無効な日付です"))?;

    if !(1900..=2100).contains(&date.year()) {
        return Err(AppError::validation(
            "日付は1900年から2100年の間で入力してください",
        ));
    }

    Ok(date)
}

/// 日付範囲のバリデーション
///
/// # 戻り値
/// 開始日が終了日以前であればOk(())
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if start > end {
        return Err(AppError::validation(format!(
            "開始日（{start}）は終了日（{end}）以前である必要があります"
        )));
    }
    Ok(())
}

/// 料金（0以上）のバリデーション
///
/// 時間料金は0円を許容する
pub fn validate_non_negative_amount(amount: f64, field_name: &str) -> AppResult<()> {
    if !amount.is_finite() {
        return Err(AppError::validation(format!("{field_name}が無効な数値です")));
    }
    if amount < 0.0 {
        return Err(AppError::validation(format!(
            "{field_name}は0以上で入力してください"
        )));
    }
    Ok(())
}

/// 金額（正の数値）のバリデーション
///
/// # バリデーション規則
/// - 正の数値であること
/// - 小数点以下は2桁まで
pub fn validate_amount(amount: f64) -> AppResult<()> {
    if !amount.is_finite() {
        return Err(AppError::validation("無効な金額です"));
    }

    if amount <= 0.0 {
        return Err(AppError::validation("金額は正の数値で入力してください"));
    }

    if (round_currency(amount) - amount).abs() > 1e-9 {
        return Err(AppError::validation(
            "金額は小数点以下2桁まで入力してください",
        ));
    }

    Ok(())
}

/// 文字列の長さバリデーション
pub fn validate_text_length(text: &str, max_length: usize, field_name: &str) -> AppResult<()> {
    let char_count = text.chars().count();
    if char_count > max_length {
        return Err(AppError::validation(format!(
            "{field_name}は{max_length}文字以内で入力してください（現在: {char_count}文字）"
        )));
    }
    Ok(())
}

/// 必須フィールドのバリデーション
pub fn validate_required_field(text: &str, field_name: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        return Err(AppError::validation(format!("{field_name}は必須項目です")));
    }
    Ok(())
}

/// メールアドレスの簡易バリデーション
pub fn validate_email(email: &str) -> AppResult<()> {
    validate_required_field(email, "メールアドレス")?;
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation("メールアドレスの形式が正しくありません"));
    }
    Ok(())
}

/// 文字列の正規化（前後の空白を削除）
pub fn normalize_string(text: &str) -> String {
    text.trim().to_string()
}

/// 今日の日付を取得（駐車場所在地の現地時間基準）
pub fn today_local() -> NaiveDate {
    Utc::now().with_timezone(&LOCAL_TIMEZONE).date_naive()
}

/// 日時を画面表示用の形式に変換（dd/mm/yyyy HH:MM、現地時間）
pub fn format_local_datetime(datetime: &DateTime<Utc>) -> String {
    datetime
        .with_timezone(&LOCAL_TIMEZONE)
        .format("%d/%m/%Y %H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_date() {
        // 有効な日付
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2000-02-29").is_ok()); // うるう年

        // 無効な日付
        assert!(validate_date("2024-13-01").is_err());
        assert!(validate_date("2023-02-29").is_err()); // 非うるう年
        assert!(validate_date("15/01/2024").is_err()); // 形式エラー
        assert!(validate_date("1899-01-01").is_err()); // 年の範囲外
    }

    #[test]
    fn test_validate_date_range() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert!(validate_date_range(start, end).is_ok());
        assert!(validate_date_range(start, start).is_ok());
        assert!(validate_date_range(end, start).is_err());
    }

    #[test]
    fn test_validate_non_negative_amount() {
        assert!(validate_non_negative_amount(0.0, "時間料金").is_ok());
        assert!(validate_non_negative_amount(12.0, "時間料金").is_ok());
        assert!(validate_non_negative_amount(-0.01, "時間料金").is_err());
        assert!(validate_non_negative_amount(f64::NAN, "時間料金").is_err());
        assert!(validate_non_negative_amount(f64::INFINITY, "時間料金").is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(150.0).is_ok());
        assert!(validate_amount(18.5).is_ok());
        assert!(validate_amount(0.01).is_ok());

        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-1.0).is_err());
        assert!(validate_amount(1.234).is_err()); // 小数点以下3桁
        assert!(validate_amount(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_required_field_and_length() {
        assert!(validate_required_field("Maria Silva", "氏名").is_ok());
        assert!(validate_required_field("   ", "氏名").is_err());
        assert!(validate_text_length("Plano Diurno", 100, "プラン名").is_ok());
        assert!(validate_text_length(&"a".repeat(101), 100, "プラン名").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("maria.santos@email.com").is_ok());
        assert!(validate_email("maria.santos").is_err());
        assert!(validate_email("@email.com").is_err());
        assert!(validate_email("maria@localhost").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_normalize_string() {
        assert_eq!(normalize_string("  ABC-1234  "), "ABC-1234");
        assert_eq!(normalize_string("   "), "");
    }

    #[test]
    fn test_format_local_datetime() {
        // サンパウロはUTC-3
        let datetime = Utc.with_ymd_and_hms(2025, 1, 9, 12, 30, 0).unwrap();
        assert_eq!(format_local_datetime(&datetime), "09/01/2025 09:30");
    }

    #[test]
    fn test_today_local_is_valid_date() {
        let today = today_local();
        assert!(validate_date(&today.format("%Y-%m-%d").to_string()).is_ok());
    }
}
