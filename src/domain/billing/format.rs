//! Human-readable amounts in Indonesian notation (`Rp 137.700`, `100,00 kWh`)

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use super::calculator::{BillBreakdown, Rupiah};

/// Whole Rupiah with `.` thousands separators
pub fn format_rupiah(amount: Rupiah) -> String {
    let grouped = group_thousands(&amount.unsigned_abs().to_string());
    if amount < 0 {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

/// Two decimals, `,` as decimal mark
pub fn format_kwh(kwh: Decimal) -> String {
    let rounded = kwh.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}{},{} kWh", sign, group_thousands(int_part), frac_part)
}

pub fn format_power(power_va: i32) -> String {
    let grouped = group_thousands(&power_va.unsigned_abs().to_string());
    let sign = if power_va < 0 { "-" } else { "" };
    format!("{}{} VA", sign, grouped)
}

/// Itemized bill text, one line per charge, labelled in Indonesian.
pub fn format_breakdown(breakdown: &BillBreakdown) -> String {
    let mut out = String::from("Rincian Tagihan Listrik:\n");
    out.push_str(&format!("Pemakaian: {}\n", format_kwh(breakdown.usage_kwh)));
    out.push_str(&format!("Biaya Listrik: {}\n", format_rupiah(breakdown.energy_cost)));
    out.push_str(&format!("Biaya Admin: {}\n", format_rupiah(breakdown.admin_fee)));
    if let Some(penalty) = breakdown.late_penalty {
        out.push_str(&format!("Denda: {}\n", format_rupiah(penalty)));
    }
    out.push_str(&format!("TOTAL: {}", format_rupiah(breakdown.total_due)));
    out
}

impl fmt::Display for BillBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_breakdown(self))
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rupiah_grouping() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(950), "Rp 950");
        assert_eq!(format_rupiah(2500), "Rp 2.500");
        assert_eq!(format_rupiah(137_700), "Rp 137.700");
        assert_eq!(format_rupiah(1_234_567), "Rp 1.234.567");
        assert_eq!(format_rupiah(-5000), "-Rp 5.000");
    }

    #[test]
    fn kwh_formatting() {
        assert_eq!(format_kwh(dec!(100)), "100,00 kWh");
        assert_eq!(format_kwh(dec!(1234.5)), "1.234,50 kWh");
        assert_eq!(format_kwh(dec!(0.125)), "0,13 kWh");
        assert_eq!(format_kwh(dec!(-3)), "-3,00 kWh");
    }

    #[test]
    fn power_formatting() {
        assert_eq!(format_power(900), "900 VA");
        assert_eq!(format_power(2200), "2.200 VA");
    }

    #[test]
    fn breakdown_without_penalty() {
        let bd = BillBreakdown::new(dec!(100), 135_200, 2500, 0);
        assert_eq!(
            format_breakdown(&bd),
            "Rincian Tagihan Listrik:\n\
             Pemakaian: 100,00 kWh\n\
             Biaya Listrik: Rp 135.200\n\
             Biaya Admin: Rp 2.500\n\
             TOTAL: Rp 137.700"
        );
    }

    #[test]
    fn breakdown_with_penalty() {
        let bd = BillBreakdown::new(dec!(100), 135_200, 2500, 5508);
        let text = bd.to_string();
        assert!(text.contains("Denda: Rp 5.508\n"));
        assert!(text.ends_with("TOTAL: Rp 143.208"));
    }
}
