/// Normalizes a header name for membership tests: trimmed and lowercased.
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Parses an amount cell from its leading number, ignoring whatever trails it.
///
/// `"1,000"` is 1, `"100 USD"` is 100 and `"15%"` is 15. Cells that do not
/// start with a number, and non-finite values, become 0.
pub fn coerce_amount(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let end = leading_float_len(trimmed.as_bytes());

    match trimmed[..end].parse::<f64>() {
        Ok(value) if value.is_finite() && value != 0.0 => value,
        _ => 0.0,
    }
}

/// Length of the longest prefix of `bytes` that reads as a decimal float:
/// optional sign, digits with an optional fraction, optional exponent.
/// Returns 0 when there is no mantissa digit.
fn leading_float_len(bytes: &[u8]) -> usize {
    let count_digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_digits = count_digits(pos);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        frac_digits = count_digits(pos + 1);
        if int_digits > 0 || frac_digits > 0 {
            pos += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = count_digits(exp);
        if exp_digits > 0 {
            pos = exp + exp_digits;
        }
    }

    pos
}

/// Lenient integer parse used by manual edits.
///
/// Leading whitespace is skipped, an optional sign is honoured and digits are
/// read until the first non-digit, so `"12.7"` is 12 and `"40k"` is 40.
/// Input without leading digits is 0.
pub fn coerce_integer(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1.0, &trimmed[1..]),
        Some(b'+') => (1.0, &trimmed[1..]),
        _ => (1.0, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];

    match digits.parse::<f64>() {
        Ok(value) if value != 0.0 => sign * value,
        _ => 0.0,
    }
}
