//! 入力フォーマッター
//!
//! 画面入力（CPF、カード番号、有効期限、CVC、ナンバープレート）を整形する。
//! いずれも状態を持たない純粋な文字列変換。
use crate::shared::errors::{AppError, AppResult};
use once_cell::sync::Lazy;
use regex::Regex;

static CPF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{3})(\d{3})(\d{3})(\d{2})").expect("CPFパターンが不正です"));

static CARD_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4,16}").expect("カード番号パターンが不正です"));

// 旧形式（ABC-1234）とメルコスール形式（ABC1D23）
static LICENSE_PLATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{3}-?[0-9][A-Z0-9][0-9]{2}$").expect("ナンバープレートパターンが不正です")
});

/// 数字以外の文字をすべて取り除く
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// CPFを `NNN.NNN.NNN-NN` 形式に整形
///
/// 11桁未満の場合は数字のみをそのまま返す（ゼロ埋めしない）。
/// 11桁を超える場合は先頭11桁を整形し、残りの数字を後ろに付ける。
pub fn format_cpf(raw: &str) -> String {
    let digits = digits_only(raw);
    CPF_PATTERN.replacen(&digits, 1, "$1.$2.$3-$4").into_owned()
}

/// カード番号を4桁ごとに空白で区切る
///
/// 16桁を超える数字は切り捨てる。4桁未満の場合は数字のみを返す。
pub fn format_card_number(raw: &str) -> String {
    let digits = digits_only(raw);
    let Some(matched) = CARD_NUMBER_PATTERN.find(&digits) else {
        return digits;
    };

    matched
        .as_str()
        .as_bytes()
        .chunks(4)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// カード有効期限を `MM/YY` 形式に整形
///
/// 2桁以上入力されたら区切りを挿入し、4桁を超える数字は切り捨てる。
pub fn format_expiry_date(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.len() < 2 {
        return digits;
    }
    let end = digits.len().min(4);
    format!("{}/{}", &digits[..2], &digits[2..end])
}

/// CVCを数字3桁までに制限
pub fn format_cvc(raw: &str) -> String {
    digits_only(raw).chars().take(3).collect()
}

/// ナンバープレートを正規化（前後の空白除去・大文字化）
pub fn normalize_license_plate(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// ナンバープレートを正規化して検証
///
/// # 戻り値
/// 正規化済みのナンバープレート、または形式不正の場合はエラー
pub fn validate_license_plate(raw: &str) -> AppResult<String> {
    let plate = normalize_license_plate(raw);
    if plate.is_empty() {
        return Err(AppError::validation("ナンバープレートは必須項目です"));
    }
    if !LICENSE_PLATE_PATTERN.is_match(&plate) {
        return Err(AppError::validation(format!(
            "ナンバープレートの形式が正しくありません: {plate}"
        )));
    }
    Ok(plate)
}

/// CPFを検証し、数字11桁を返す
pub fn validate_cpf(raw: &str) -> AppResult<String> {
    let digits = digits_only(raw);
    if digits.len() != 11 {
        return Err(AppError::validation(format!(
            "CPFは11桁で入力してください（現在: {}桁）",
            digits.len()
        )));
    }
    Ok(digits)
}
