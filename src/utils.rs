use colored::Colorize;

use crate::units;

/// Format a base-unit amount as a decimal token string with color.
pub fn format_token_amount(base_units: &str, decimals: u8, symbol: &str) -> String {
    let decimal = units::from_base_units(base_units, decimals as u32)
        .unwrap_or_else(|_| base_units.to_string());
    format!("{} {}", decimal, symbol).yellow().to_string()
}

/// Format an address truncated for display.
pub fn format_address(address: &str) -> String {
    if address.len() <= 12 {
        address.to_string()
    } else {
        format!("{}...{}", &address[..6], &address[address.len() - 6..])
    }
}

/// Format unix seconds in human-readable format.
pub fn format_timestamp(seconds: i64) -> String {
    match chrono::DateTime::from_timestamp(seconds, 0) {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => seconds.to_string(),
    }
}

/// Prompt user for yes/no confirmation.
pub fn confirm_action(prompt: &str) -> bool {
    use std::io::{self, Write};

    print!("{} (y/N): ", prompt);
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Print a formatted table border.
pub fn print_table_border(width: usize) {
    println!("{}", "=".repeat(width));
}

/// Print a table row with columns.
pub fn print_table_row(columns: &[&str], widths: &[usize]) {
    let mut row = String::new();
    for (i, col) in columns.iter().enumerate() {
        if i < widths.len() {
            row.push_str(&format!("{:<width$}  ", col, width = widths[i]));
        }
    }
    println!("{}", row.trim_end());
}
