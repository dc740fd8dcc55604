//! Compact display of rates with SI prefixes.

const LARGE_PREFIXES: [&str; 10] = ["k", "M", "G", "T", "P", "E", "Z", "Y", "R", "Q"];
const SMALL_PREFIXES: [&str; 10] = ["m", "μ", "n", "p", "f", "a", "z", "y", "r", "q"];

/// Formats a net rate for display: exact zero as `0`, anything within
/// `tolerance` of zero as `≈0`, everything else through [`format_si`].
pub fn format_rate(rate: f64, tolerance: f64) -> String {
    if rate == 0.0 {
        "0".to_string()
    } else if rate.abs() < tolerance {
        "≈0".to_string()
    } else {
        format_si(rate)
    }
}

/// Formats a number with at least four significant digits and an SI prefix,
/// e.g. `1234.5` as `1.235 k` and `0.5` as `500 m`.
pub fn format_si(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    let (mantissa, scale) = approximate(value.abs());
    let magnitude = format_decimal(mantissa, scale);
    if value < 0.0 {
        format!("-{}", magnitude)
    } else {
        magnitude
    }
}

/// Rounds a positive value to an integer mantissa of at least four digits and
/// a power-of-ten scale.
fn approximate(mut value: f64) -> (u64, i32) {
    if value <= 0.0 {
        return (0, 0);
    }
    let mut scale = 0;
    while value < 1e3 {
        value *= 10.0;
        scale -= 1;
    }
    // Keep the mantissa well inside u64.
    while value >= 1e16 {
        value /= 10.0;
        scale += 1;
    }
    ((value + 0.5) as u64, scale)
}

fn format_decimal(mut mantissa: u64, mut scale: i32) -> String {
    if mantissa == 0 {
        return "0".to_string();
    }
    while mantissa % 10 == 0 {
        mantissa /= 10;
        scale += 1;
    }
    while scale % 3 != 0 {
        mantissa *= 10;
        scale -= 1;
    }

    let mut int = mantissa;
    let mut divisor = 1;
    let mut groups: usize = 0;
    while int >= 1000 {
        scale += 3;
        int /= 1000;
        divisor *= 1000;
        groups += 1;
    }
    let mut frac = mantissa - int * divisor;

    let prefix = match scale / 3 {
        0 => "",
        x if x > 0 => match LARGE_PREFIXES.get((x - 1) as usize) {
            Some(p) => *p,
            None => return "≈∞".to_string(),
        },
        x => match SMALL_PREFIXES.get((-x - 1) as usize) {
            Some(p) => *p,
            None => return "≈0".to_string(),
        },
    };

    let number = if frac == 0 {
        int.to_string()
    } else {
        let mut places = 3 * groups;
        while frac % 10 == 0 {
            frac /= 10;
            places -= 1;
        }
        format!("{}.{:0places$}", int, frac, places = places)
    };

    if prefix.is_empty() {
        number
    } else {
        format!("{} {}", number, prefix)
    }
}
