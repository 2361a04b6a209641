//! Spoken cardinal numbers.
//!
//! Speech recognisers emit "two" as often as "2"; both are accepted as amounts.

pub(crate) const UNITS: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

pub(crate) const SMALL: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

pub(crate) const TENS: [&str; 8] = [
    "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Words that scale the number group before them.
pub(crate) const SCALES: [&str; 3] = ["hundred", "thousand", "million"];

/// Normalise a spoken number phrase to a decimal string.
///
/// Accepts cardinals up to the millions with optional "and" joins and a
/// "point" followed by single digits: "two thousand and five" -> "2005",
/// "two point five" -> "2.5". Returns `None` when the phrase is not a
/// well-formed number; the caller must not fall back to a prefix of it.
pub fn spoken_to_decimal(phrase: &str) -> Option<String> {
    let words: Vec<String> = phrase
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();

    let (whole, fraction) = match words.iter().position(|w| w == "point") {
        Some(pos) => (&words[..pos], Some(&words[pos + 1..])),
        None => (&words[..], None),
    };

    let integer = match (whole.is_empty(), fraction) {
        (true, None) => return None,
        (true, Some(_)) => 0,
        (false, _) => cardinal(whole)?,
    };

    match fraction {
        None => Some(integer.to_string()),
        Some(digits) if digits.is_empty() => None,
        Some(digits) => {
            let mut text = format!("{}.", integer);
            for word in digits {
                let digit = UNITS.iter().position(|u| u == word)?;
                text.push(char::from(b'0' + digit as u8));
            }
            Some(text)
        }
    }
}

/// Whole-number phrase: groups below a thousand joined by descending scales.
fn cardinal(words: &[String]) -> Option<u64> {
    let mut total = 0u64;
    let mut last_scale = u64::MAX;
    let mut rest = words;

    loop {
        let (group, used) = below_thousand(rest)?;
        rest = &rest[used..];
        let scale = match rest.first().map(String::as_str) {
            None => return Some(total + group),
            Some("thousand") => 1_000,
            Some("million") => 1_000_000,
            Some(_) => return None,
        };
        if group == 0 || scale >= last_scale {
            return None;
        }
        total += group * scale;
        last_scale = scale;
        rest = &rest[1..];
        match rest.first().map(String::as_str) {
            None => return Some(total),
            Some("and") => rest = &rest[1..],
            Some(_) => {}
        }
    }
}

/// "[n hundred [and]] [n]" where n is below a hundred.
fn below_thousand(words: &[String]) -> Option<(u64, usize)> {
    let (first, mut used) = below_hundred(words)?;
    if words.get(used).map(String::as_str) != Some("hundred") {
        return Some((first, used));
    }
    if first == 0 {
        return None;
    }
    used += 1;
    let mut value = first * 100;

    let joined = words.get(used).map(String::as_str) == Some("and");
    let tail_at = if joined { used + 1 } else { used };
    match below_hundred(&words[tail_at.min(words.len())..]) {
        Some((tail, n)) => {
            value += tail;
            used = tail_at + n;
        }
        None if joined => return None,
        None => {}
    }
    Some((value, used))
}

/// "tens [unit]" or a single word below twenty.
fn below_hundred(words: &[String]) -> Option<(u64, usize)> {
    let first = words.first()?;
    if let Some(pos) = TENS.iter().position(|w| w == first) {
        let tens = (pos as u64 + 2) * 10;
        return match words.get(1).and_then(|w| UNITS[1..].iter().position(|u| u == w)) {
            Some(unit) => Some((tens + unit as u64 + 1, 2)),
            None => Some((tens, 1)),
        };
    }
    SMALL
        .iter()
        .position(|w| w == first)
        .map(|pos| (pos as u64, 1))
}
