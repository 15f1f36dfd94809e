use lazy_static::lazy_static;
use regex::Regex;

/// Values below this are shown in scientific notation
pub const MIN_SCIENTIFIC_NOTATION_THRESHOLD: f64 = 0.000001;

/// Display precision cap for token amounts
pub const MAX_DISPLAY_DECIMALS: u8 = 8;

// Tokens bought with `usd_amount`, or None when either side is not positive
pub fn token_amount_for_usd(usd_amount: f64, unit_price: f64) -> Option<f64> {
    if usd_amount.is_finite() && unit_price.is_finite() && usd_amount > 0.0 && unit_price > 0.0 {
        Some(usd_amount / unit_price)
    } else {
        None
    }
}

// Target units per source unit; declines instead of producing inf/NaN
pub fn swap_ratio(source_unit_price: f64, target_unit_price: f64) -> Option<f64> {
    if source_unit_price.is_finite()
        && target_unit_price.is_finite()
        && source_unit_price > 0.0
        && target_unit_price > 0.0
    {
        Some(source_unit_price / target_unit_price)
    } else {
        None
    }
}

// Format token amount with at most 8 decimals
pub fn format_token_amount(value: f64, decimals: u8) -> String {
    if value == 0.0 {
        return "0.00".to_string();
    }
    if value < MIN_SCIENTIFIC_NOTATION_THRESHOLD {
        return format!("{:.4e}", value);
    }
    format!("{:.*}", decimals.min(MAX_DISPLAY_DECIMALS) as usize, value)
}

// Format USD value as $1,234.56
pub fn format_usd(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

// Parse "100", "100.5" or "$100.5"
pub fn parse_usd_amount(input: &str) -> Option<f64> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^\$?(\d+(?:\.\d+)?)$").unwrap();
    }

    RE.captures(input.trim())
        .and_then(|cap| cap.get(1)?.as_str().parse::<f64>().ok())
}

// Parse "<usd> <FROM> <TO>", also accepting "<usd> <FROM> to <TO>"
pub fn parse_swap_args(input: &str) -> Option<(f64, &str, &str)> {
    lazy_static! {
        static ref RE: Regex =
            Regex::new(r"(?i)^(\$?\d+(?:\.\d+)?)\s+([a-z0-9.]+)\s+(?:to\s+)?([a-z0-9.]+)$").unwrap();
    }

    RE.captures(input.trim()).and_then(|cap| {
        let amount = parse_usd_amount(cap.get(1)?.as_str())?;
        let source = cap.get(2)?.as_str();
        let target = cap.get(3)?.as_str();
        Some((amount, source, target))
    })
}
