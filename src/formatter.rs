//! Formatter Module
//!
//! セル値に数値書式（Number Format String）を適用し、表示値を生成する
//! モジュール。対応していない書式は`XlsxTableError::UnsupportedFormat`を返し、
//! 呼び出し側は生の値にフォールバックします。

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::error::XlsxTableError;
use crate::types::CellValue;

/// セルフォーマッター
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CellFormatter;

impl CellFormatter {
    pub fn new() -> Self {
        Self
    }

    /// セル値をフォーマット
    ///
    /// # 引数
    ///
    /// * `value` - 生の値
    /// * `format_code` - 数値書式（`None`はGeneral扱い）
    /// * `is_1904` - 1904年エポックを使用するかどうか
    pub fn format(
        &self,
        value: &CellValue,
        format_code: Option<&str>,
        is_1904: bool,
    ) -> Result<String, XlsxTableError> {
        match value {
            CellValue::Number(n) => format_number(*n, format_code.unwrap_or("General"), is_1904),
            CellValue::String(s) => Ok(s.clone()),
            CellValue::Bool(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
            CellValue::Error(e) => Ok(e.clone()),
            CellValue::Empty => Ok(String::new()),
        }
    }
}

/// 書式トークン
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    /// `0`, `#`, `?`
    Digit(char),
    Dot,
    Comma,
    Percent,
    /// 日付・時刻要素（`y`, `m`, `d`, `h`, `s`の連続）
    DateTime(char, usize),
    AmPm,
}

fn unsupported(code: &str) -> XlsxTableError {
    XlsxTableError::UnsupportedFormat(code.to_string())
}

fn format_number(value: f64, code: &str, is_1904: bool) -> Result<String, XlsxTableError> {
    if !value.is_finite() {
        return Err(unsupported(code));
    }

    let sections = split_sections(code);
    let (section, value, negate) = if value < 0.0 && sections.len() >= 2 {
        (sections[1].as_str(), -value, false)
    } else if value == 0.0 && sections.len() >= 3 {
        (sections[2].as_str(), value, false)
    } else {
        (sections[0].as_str(), value.abs(), value < 0.0)
    };

    if section.trim().eq_ignore_ascii_case("general") || section.is_empty() {
        // 16桁以上は指数表記になるため生の値に任せる
        if value.abs() >= 1e15 {
            return Err(unsupported(code));
        }
        let text = format_general(value);
        return Ok(if negate { format!("-{}", text) } else { text });
    }

    let tokens = tokenize(section)?;
    if tokens
        .iter()
        .any(|t| matches!(t, Token::DateTime(..) | Token::AmPm))
    {
        // 日付セクションでは符号を付けない
        return format_datetime(if negate { -value } else { value }, &tokens, is_1904);
    }

    let text = format_numeric(value, &tokens, section)?;
    Ok(if negate { format!("-{}", text) } else { text })
}

/// `;`でセクションに分割（引用符内とエスケープは無視）
fn split_sections(code: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = code.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            '\\' if !in_quotes => {
                current.push(ch);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ';' if !in_quotes => sections.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    sections.push(current);
    sections
}

fn tokenize(section: &str) -> Result<Vec<Token>, XlsxTableError> {
    let chars: Vec<char> = section.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '"' => {
                let end = chars[i + 1..]
                    .iter()
                    .position(|&c| c == '"')
                    .map(|p| i + 1 + p)
                    .unwrap_or(chars.len());
                tokens.push(Token::Literal(chars[i + 1..end].iter().collect()));
                i = end + 1;
            }
            '\\' => {
                if let Some(&next) = chars.get(i + 1) {
                    tokens.push(Token::Literal(next.to_string()));
                }
                i += 2;
            }
            '_' => {
                // 次の文字の幅だけ空白
                tokens.push(Token::Literal(" ".to_string()));
                i += 2;
            }
            '*' => {
                // 繰り返し文字は無視
                i += 2;
            }
            '[' => {
                let end = chars[i..]
                    .iter()
                    .position(|&c| c == ']')
                    .map(|p| i + p)
                    .ok_or_else(|| unsupported(section))?;
                let inner: String = chars[i + 1..end].iter().collect();
                let lower = inner.to_ascii_lowercase();
                if !lower.is_empty() && lower.chars().all(|c| matches!(c, 'h' | 'm' | 's')) {
                    // 経過時間 [h] [mm] [ss]
                    return Err(unsupported(section));
                }
                if let Some(currency) = inner.strip_prefix('$') {
                    let symbol = currency.split('-').next().unwrap_or_default();
                    if !symbol.is_empty() {
                        tokens.push(Token::Literal(symbol.to_string()));
                    }
                }
                // 色・条件・ロケール指定は無視
                i = end + 1;
            }
            '0' | '#' | '?' => {
                tokens.push(Token::Digit(ch));
                i += 1;
            }
            '.' => {
                tokens.push(Token::Dot);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '%' => {
                tokens.push(Token::Percent);
                i += 1;
            }
            '@' => return Err(unsupported(section)),
            'E' | 'e' if matches!(chars.get(i + 1), Some('+') | Some('-')) => {
                return Err(unsupported(section));
            }
            '/' if tokens.iter().any(|t| matches!(t, Token::Digit(_))) => {
                // 分数
                return Err(unsupported(section));
            }
            'A' | 'a' if starts_with_ignore_case(&chars[i..], "am/pm") => {
                tokens.push(Token::AmPm);
                i += 5;
            }
            'A' | 'a' if starts_with_ignore_case(&chars[i..], "a/p") => {
                return Err(unsupported(section));
            }
            'y' | 'Y' | 'm' | 'M' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => {
                let lower = ch.to_ascii_lowercase();
                let len = chars[i..]
                    .iter()
                    .take_while(|c| c.to_ascii_lowercase() == lower)
                    .count();
                tokens.push(Token::DateTime(lower, len));
                i += len;
            }
            _ => {
                tokens.push(Token::Literal(ch.to_string()));
                i += 1;
            }
        }
    }

    Ok(tokens)
}

fn starts_with_ignore_case(chars: &[char], pattern: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    chars.len() >= pattern.len()
        && chars
            .iter()
            .zip(&pattern)
            .all(|(a, b)| a.to_ascii_lowercase() == *b)
}

/// General書式（有効数字15桁、末尾の0を除去）
fn format_general(value: f64) -> String {
    let abs = value.abs();
    let int_digits = if abs < 1.0 {
        1
    } else {
        abs.log10().floor() as i32 + 1
    };
    let decimals = (15 - int_digits).clamp(0, 15) as usize;

    let mut text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

fn format_numeric(value: f64, tokens: &[Token], section: &str) -> Result<String, XlsxTableError> {
    let first_digit = tokens.iter().position(|t| matches!(t, Token::Digit(_)));
    let last_digit = tokens.iter().rposition(|t| matches!(t, Token::Digit(_)));

    let percent_count = tokens.iter().filter(|t| **t == Token::Percent).count();
    let mut value = value * 100f64.powi(percent_count as i32);

    let (first, last) = match (first_digit, last_digit) {
        (Some(first), Some(last)) => (first, last),
        // 数字プレースホルダーがない書式はリテラルのみ
        _ => return Ok(render_literals(tokens)),
    };

    let number_tokens = &tokens[first..=last];
    if number_tokens.iter().any(|t| matches!(t, Token::Literal(_))) {
        return Err(unsupported(section));
    }

    let dot = number_tokens.iter().position(|t| *t == Token::Dot);
    let (int_part, frac_part) = match dot {
        Some(pos) => (&number_tokens[..pos], &number_tokens[pos + 1..]),
        None => (number_tokens, &[][..]),
    };

    let grouping = int_part.iter().any(|t| *t == Token::Comma);
    let min_int = int_part.iter().filter(|t| **t == Token::Digit('0')).count();
    let total_frac = frac_part
        .iter()
        .filter(|t| matches!(t, Token::Digit(_)))
        .count();
    let min_frac = frac_part
        .iter()
        .filter(|t| **t == Token::Digit('0'))
        .count();

    // 最後の数字プレースホルダー直後のカンマは1000で割る
    let scaling = tokens[last + 1..]
        .iter()
        .take_while(|t| **t == Token::Comma)
        .count();
    value /= 1000f64.powi(scaling as i32);

    let rounded = format!("{:.*}", total_frac, value);
    let (int_digits, frac_digits) = match rounded.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (rounded.clone(), String::new()),
    };

    let mut int_digits = if int_digits == "0" && min_int == 0 {
        String::new()
    } else {
        int_digits
    };
    while int_digits.len() < min_int {
        int_digits.insert(0, '0');
    }
    if grouping {
        int_digits = group_thousands(&int_digits);
    }

    let mut frac_digits = frac_digits;
    while frac_digits.len() > min_frac && frac_digits.ends_with('0') {
        frac_digits.pop();
    }

    let mut number = int_digits;
    if dot.is_some() && (!frac_digits.is_empty() || min_frac == 0) {
        number.push('.');
        number.push_str(&frac_digits);
    }

    let mut result = render_literals(&tokens[..first]);
    result.push_str(&number);
    result.push_str(&render_literals(&tokens[last + 1..]));
    Ok(result)
}

fn render_literals(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Literal(s) => Some(s.as_str()),
            Token::Percent => Some("%"),
            _ => None,
        })
        .collect()
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// 1900年システムで9999-12-31の翌日にあたるシリアル値
const MAX_DATE_SERIAL: f64 = 2_958_466.0;

/// シリアル値を日時に変換
///
/// 9999-12-31より後（1900年システムのシリアル値2958465超）は`None`
fn serial_to_datetime(serial: f64, is_1904: bool) -> Option<NaiveDateTime> {
    if !(0.0..MAX_DATE_SERIAL).contains(&serial) {
        return None;
    }

    // 1900年システムは存在しない1900-02-29（シリアル値60）を含む
    let epoch = if is_1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)?
    } else if serial < 60.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };

    let mut days = serial.trunc() as i64;
    let mut seconds = (serial.fract() * 86_400.0).round() as i64;
    if seconds >= 86_400 {
        days += 1;
        seconds -= 86_400;
    }

    epoch
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::try_days(days)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)
}

fn format_datetime(serial: f64, tokens: &[Token], is_1904: bool) -> Result<String, XlsxTableError> {
    let datetime = serial_to_datetime(serial, is_1904)
        .ok_or_else(|| XlsxTableError::UnsupportedFormat(format!("date serial {}", serial)))?;
    let twelve_hour = tokens.contains(&Token::AmPm);

    let mut out = String::new();
    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::Literal(s) => out.push_str(s),
            Token::Comma => out.push(','),
            Token::Percent => out.push('%'),
            Token::Dot | Token::Digit(_) => {
                return Err(XlsxTableError::UnsupportedFormat(
                    "fractional seconds".to_string(),
                ))
            }
            Token::AmPm => out.push_str(if datetime.hour() < 12 { "AM" } else { "PM" }),
            Token::DateTime(kind, len) => {
                let (kind, len) = (*kind, *len);
                let pattern = match (kind, len) {
                    ('y', 1..=2) => "%y",
                    ('y', _) => "%Y",
                    ('m', 1 | 2) if is_minute(tokens, idx) => {
                        if len == 1 {
                            "%-M"
                        } else {
                            "%M"
                        }
                    }
                    ('m', 1) => "%-m",
                    ('m', 2) => "%m",
                    ('m', 3) => "%b",
                    ('m', 4) => "%B",
                    ('d', 1) => "%-d",
                    ('d', 2) => "%d",
                    ('d', 3) => "%a",
                    ('d', _) => "%A",
                    ('h', 1) if twelve_hour => "%-I",
                    ('h', _) if twelve_hour => "%I",
                    ('h', 1) => "%-H",
                    ('h', _) => "%H",
                    ('s', 1) => "%-S",
                    ('s', _) => "%S",
                    _ => {
                        return Err(XlsxTableError::UnsupportedFormat(format!(
                            "date token {}x{}",
                            kind, len
                        )))
                    }
                };
                out.push_str(&datetime.format(pattern).to_string());
            }
        }
    }
    Ok(out)
}

/// `m`/`mm`が分を表すか（直前が時、または直後が秒）
fn is_minute(tokens: &[Token], idx: usize) -> bool {
    let is_datetime = |t: &&Token| matches!(t, Token::DateTime(..));
    let previous = tokens[..idx].iter().rev().find(is_datetime);
    let next = tokens[idx + 1..].iter().find(is_datetime);

    matches!(previous, Some(Token::DateTime('h', _))) || matches!(next, Some(Token::DateTime('s', _)))
}
