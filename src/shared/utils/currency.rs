use crate::shared::errors::{AppError, AppResult};

/// 金額を小数点以下2桁に丸める（四捨五入、0から遠い方向）
///
/// 2進浮動小数点の表現誤差で `2.675 * 100.0 = 267.49999...` となるケースを
/// 通貨として期待される値（2.68）に丸めるため、わずかな補正値を加える。
pub fn round_currency(amount: f64) -> f64 {
    let scaled = amount * 100.0;
    let corrected = scaled + scaled.signum() * 1e-7;
    corrected.round() / 100.0
}

/// 金額をブラジルレアル表記でフォーマット
///
/// # 例
/// `1234.5` → `"R$ 1.234,50"`
pub fn format_brl(amount: f64) -> String {
    let rounded = round_currency(amount);
    let cents_total = (rounded.abs() * 100.0).round() as u64;
    let integer_part = cents_total / 100;
    let cents = cents_total % 100;

    let digits = integer_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{cents:02}")
}

/// ブラジルレアル表記の文字列を金額に変換
///
/// `"R$ 1.234,56"`、`"18,50"`、`"18.50"` のいずれの形式も受け付ける
pub fn parse_brl(text: &str) -> AppResult<f64> {
    let cleaned: String = text
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(AppError::validation("金額が入力されていません"));
    }

    // カンマがあればブラジル表記（. は桁区切り、, は小数点）
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned
    };

    let value: f64 = normalized
        .parse()
        .map_err(|_| AppError::validation(format!("金額の形式が正しくありません: {text}")))?;

    if !value.is_finite() {
        return Err(AppError::validation(format!("金額の形式が正しくありません: {text}")));
    }

    Ok(round_currency(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(18.499), 18.5);
        assert_eq!(round_currency(2.675), 2.68);
        assert_eq!(round_currency(1.005), 1.01);
        assert_eq!(round_currency(0.0), 0.0);
        assert_eq!(round_currency(-2.675), -2.68);
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(18.5), "R$ 18,50");
        assert_eq!(format_brl(150.0), "R$ 150,00");
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1234567.0), "R$ 1.234.567,00");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(-5.0), "-R$ 5,00");
    }

    #[test]
    fn test_parse_brl() {
        assert_eq!(parse_brl("R$ 18,50").unwrap(), 18.5);
        assert_eq!(parse_brl("R$ 1.234,56").unwrap(), 1234.56);
        assert_eq!(parse_brl("12,00").unwrap(), 12.0);
        assert_eq!(parse_brl("8.50").unwrap(), 8.5);

        assert!(parse_brl("").is_err());
        assert!(parse_brl("R$ ").is_err());
        assert!(parse_brl("doze reais").is_err());
    }
}
