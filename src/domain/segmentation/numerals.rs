//! 章节编号解析
//!
//! 标记文本中的编号可能是罗马数字（"Part II"）、英文基数词（"Chapter Fifteen"）、
//! 英文序数词（"The Third Chapter" 之类的 "Third"）或阿拉伯数字。
//! 解析均区分大小写，且要求整段文本都是编号。

use serde::{Deserialize, Serialize};

const UNITS: [&str; 19] = [
    "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 8] = [
    "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const ORDINAL_UNITS: [&str; 19] = [
    "First", "Second", "Third", "Fourth", "Fifth", "Sixth", "Seventh", "Eighth", "Ninth",
    "Tenth", "Eleventh", "Twelfth", "Thirteenth", "Fourteenth", "Fifteenth", "Sixteenth",
    "Seventeenth", "Eighteenth", "Nineteenth",
];

const ORDINAL_TENS: [&str; 8] = [
    "Twentieth", "Thirtieth", "Fortieth", "Fiftieth", "Sixtieth", "Seventieth", "Eightieth",
    "Ninetieth",
];

const ROMAN: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// 编号书写风格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumeralStyle {
    /// I, II, III …（仅大写）
    Roman,
    /// One, Two … Twenty-One … One Hundred and Five
    Words,
    /// First, Second … Twenty-First …
    Ordinal,
    /// 1, 2, 3 …
    Arabic,
}

impl NumeralStyle {
    /// 解析编号，失败返回 None；0 永远不是合法编号
    pub fn parse(&self, text: &str) -> Option<u32> {
        let n = match self {
            NumeralStyle::Roman => parse_roman(text),
            NumeralStyle::Words => parse_words(text),
            NumeralStyle::Ordinal => parse_ordinal(text),
            NumeralStyle::Arabic => parse_arabic(text),
        }?;
        (n > 0).then_some(n)
    }
}

/// 罗马数字（规范写法，1..=3999）
pub fn to_roman(mut n: u32) -> String {
    let mut out = String::new();
    for (value, symbol) in ROMAN {
        while n >= value {
            out.push_str(symbol);
            n -= value;
        }
    }
    out
}

/// 解析规范写法的大写罗马数字；"IIII"、"iv" 之类不被接受
pub fn parse_roman(text: &str) -> Option<u32> {
    if text.is_empty() {
        return None;
    }

    let mut rest = text;
    let mut total = 0u32;
    for (value, symbol) in ROMAN {
        while let Some(stripped) = rest.strip_prefix(symbol) {
            total += value;
            rest = stripped;
        }
    }

    if !rest.is_empty() || total == 0 || total > 3999 {
        return None;
    }
    // 只接受规范写法
    (to_roman(total) == text).then_some(total)
}

fn parse_arabic(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn position(table: &[&str], word: &str) -> Option<u32> {
    table.iter().position(|w| *w == word).map(|i| i as u32)
}

fn cardinal_below_hundred(text: &str) -> Option<u32> {
    if let Some(i) = position(&UNITS, text) {
        return Some(i + 1);
    }
    if let Some(i) = position(&TENS, text) {
        return Some((i + 2) * 10);
    }
    let (tens, unit) = text.split_once('-')?;
    let tens = position(&TENS, tens)?;
    let unit = position(&UNITS[..9], unit)?;
    Some((tens + 2) * 10 + unit + 1)
}

fn ordinal_below_hundred(text: &str) -> Option<u32> {
    if let Some(i) = position(&ORDINAL_UNITS, text) {
        return Some(i + 1);
    }
    if let Some(i) = position(&ORDINAL_TENS, text) {
        return Some((i + 2) * 10);
    }
    let (tens, unit) = text.split_once('-')?;
    let tens = position(&TENS, tens)?;
    let unit = position(&ORDINAL_UNITS[..9], unit)?;
    Some((tens + 2) * 10 + unit + 1)
}

/// "{Unit} Hundred[ [and ]{rest}]" 形式的三位数
fn with_hundreds(
    text: &str,
    hundred_word: &str,
    below_hundred: fn(&str) -> Option<u32>,
) -> Option<u32> {
    let (head, tail) = text.split_once(' ')?;
    let hundreds = position(&UNITS[..9], head)? + 1;

    if tail == hundred_word {
        return Some(hundreds * 100);
    }
    let rest = tail.strip_prefix("Hundred ")?;
    let rest = rest.strip_prefix("and ").unwrap_or(rest);
    Some(hundreds * 100 + below_hundred(rest)?)
}

/// 英文基数词：One … Ninety-Nine, One Hundred … Nine Hundred and Ninety-Nine
pub fn parse_words(text: &str) -> Option<u32> {
    cardinal_below_hundred(text).or_else(|| with_hundreds(text, "Hundred", cardinal_below_hundred))
}

/// 英文序数词：First … Ninety-Ninth, One Hundredth, One Hundred and First …
pub fn parse_ordinal(text: &str) -> Option<u32> {
    ordinal_below_hundred(text).or_else(|| with_hundreds(text, "Hundredth", ordinal_below_hundred))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roman_round_trip_values() {
        assert_eq!(parse_roman("I"), Some(1));
        assert_eq!(parse_roman("IV"), Some(4));
        assert_eq!(parse_roman("XIV"), Some(14));
        assert_eq!(parse_roman("XLII"), Some(42));
        assert_eq!(parse_roman("MCMXCIX"), Some(1999));
        assert_eq!(to_roman(2024), "MMXXIV");
    }

    #[test]
    fn test_roman_rejects_non_canonical_and_lowercase() {
        assert_eq!(parse_roman("IIII"), None);
        assert_eq!(parse_roman("iv"), None);
        assert_eq!(parse_roman("IC"), None);
        assert_eq!(parse_roman(""), None);
        assert_eq!(parse_roman("I "), None);
    }

    #[test]
    fn test_words() {
        assert_eq!(parse_words("One"), Some(1));
        assert_eq!(parse_words("Fifteen"), Some(15));
        assert_eq!(parse_words("Twenty"), Some(20));
        assert_eq!(parse_words("Twenty-One"), Some(21));
        assert_eq!(parse_words("Ninety-Nine"), Some(99));
        assert_eq!(parse_words("One Hundred"), Some(100));
        assert_eq!(parse_words("One Hundred and Five"), Some(105));
        assert_eq!(parse_words("Two Hundred Thirty-Four"), Some(234));
    }

    #[test]
    fn test_words_is_case_sensitive_and_strict() {
        assert_eq!(parse_words("one"), None);
        assert_eq!(parse_words("Twenty-one"), None);
        assert_eq!(parse_words("Twenty-Ten"), None);
        assert_eq!(parse_words("Chapter One"), None);
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(parse_ordinal("First"), Some(1));
        assert_eq!(parse_ordinal("Twelfth"), Some(12));
        assert_eq!(parse_ordinal("Thirtieth"), Some(30));
        assert_eq!(parse_ordinal("Forty-Second"), Some(42));
        assert_eq!(parse_ordinal("One Hundredth"), Some(100));
        assert_eq!(parse_ordinal("One Hundred and First"), Some(101));
        assert_eq!(parse_ordinal("One"), None);
    }

    #[test]
    fn test_style_dispatch_rejects_zero() {
        assert_eq!(NumeralStyle::Arabic.parse("12"), Some(12));
        assert_eq!(NumeralStyle::Arabic.parse("007"), Some(7));
        assert_eq!(NumeralStyle::Arabic.parse("0"), None);
        assert_eq!(NumeralStyle::Arabic.parse("-1"), None);
        assert_eq!(NumeralStyle::Roman.parse("VII"), Some(7));
    }
}
