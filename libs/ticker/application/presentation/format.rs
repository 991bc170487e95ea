//! Display formatting for market figures

const SCALES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Dollar amount with T/B/M/K suffix, e.g. `$950.00B`
pub fn format_usd(value: f64, digits: usize) -> String {
    for (scale, suffix) in SCALES {
        if value >= scale {
            return format!("${:.*}{}", digits, value / scale, suffix);
        }
    }
    format!("${:.*}", digits, value)
}

/// Token amount with B/M/K suffix and symbol, e.g. `19.00M BTC`
pub fn format_supply(value: f64, symbol: &str) -> String {
    for (scale, suffix) in &SCALES[1..] {
        if value >= *scale {
            return format!("{:.2}{} {}", value / scale, suffix, symbol);
        }
    }
    format!("{:.2} {}", value, symbol)
}

/// Uncapped supply renders as `∞`
pub fn format_max_supply(value: Option<f64>, symbol: &str) -> String {
    match value {
        Some(max) if max > 0.0 => format_supply(max, symbol),
        _ => "∞".to_string(),
    }
}

/// Signed percentage, e.g. `+2.30%` / `-0.20%`
pub fn format_percentage(value: f64) -> String {
    // -0.0 from rounding renders as 0.00%
    let value = if value == 0.0 { 0.0 } else { value };
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, value)
}
