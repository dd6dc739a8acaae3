// Display helpers shared by pages.

use chrono::NaiveDate;

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "$12,345.00"
pub fn currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}${}.{:02}",
        group_thousands(&(cents / 100).to_string()),
        cents % 100
    )
}

/// Grouped number with at most two decimals, trailing zeros dropped:
/// "24,500", "1,234.5".
pub fn amount(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    let whole = group_thousands(&(cents / 100).to_string());
    match cents % 100 {
        0 => format!("{sign}{whole}"),
        c if c % 10 == 0 => format!("{sign}{whole}.{}", c / 10),
        c => format!("{sign}{whole}.{c:02}"),
    }
}

/// "Jun 01, 2023"
pub fn short_date(d: NaiveDate) -> String {
    d.format("%b %d, %Y").to_string()
}

/// "June 01, 2023"
pub fn long_date(d: NaiveDate) -> String {
    d.format("%B %d, %Y").to_string()
}
