/// Rounds a price to cents.
///
/// Goes through the same correctly rounded decimal rendering as [`format_price`], so the
/// rounded number and the formatted string always agree.
pub fn round_price(price: f64) -> f64 {
    format!("{price:.2}").parse().unwrap_or(price)
}

/// Renders a price as a `$`-prefixed, comma grouped string with two decimals, e.g.
/// `$452,600.00` or `$-1,234.50`.
pub fn format_price(price: f64) -> String {
    let fixed = format!("{price:.2}");
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };

    let Some((int, frac)) = unsigned.split_once('.') else {
        // inf / NaN
        return format!("${fixed}");
    };

    let digits = int.len();
    let mut grouped = String::with_capacity(digits + digits / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("${sign}{grouped}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_price(452600.0), "$452,600.00");
        assert_eq!(format_price(1234567.891), "$1,234,567.89");
        assert_eq!(format_price(999.999), "$1,000.00");
        assert_eq!(format_price(12.5), "$12.50");
        assert_eq!(format_price(0.0), "$0.00");
    }

    #[test]
    fn keeps_sign_in_front_of_digits() {
        assert_eq!(format_price(-1234.5), "$-1,234.50");
        assert_eq!(format_price(-100.0), "$-100.00");
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_price(416260.00000000006), 416260.0);
        assert_eq!(round_price(1.005), 1.0);
        assert_eq!(round_price(2.675), 2.67);
        assert_eq!(round_price(-3.14159), -3.14);
    }

    #[test]
    fn rounding_matches_formatting() {
        for price in [0.125, 98765.4321, 1e7 + 0.555, 206855.81690891474] {
            let expected = format_price(round_price(price));
            assert_eq!(format_price(price), expected);
        }
    }
}
