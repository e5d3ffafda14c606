//! Monthly summary: totals and expense share per category.

use catat_core::{Entry, Locale};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub income: u64,
    pub expense: u64,
    /// Expense per category label, largest first
    pub by_category: Vec<(String, u64)>,
    pub entry_count: usize,
}

impl MonthlyReport {
    pub fn build(entries: &[Entry], year: i32, month: u32) -> Self {
        let mut income = 0u64;
        let mut expense = 0u64;
        let mut per_cat: HashMap<String, u64> = HashMap::new();
        let mut entry_count = 0;

        for e in entries
            .iter()
            .filter(|e| e.date.year() == year && e.date.month() == month)
        {
            entry_count += 1;
            if e.is_income() {
                income = income.saturating_add(e.amount);
            } else {
                expense = expense.saturating_add(e.amount);
                let slot = per_cat.entry(e.category.clone()).or_insert(0);
                *slot = slot.saturating_add(e.amount);
            }
        }

        let mut by_category: Vec<(String, u64)> = per_cat.into_iter().collect();
        by_category.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            year,
            month,
            income,
            expense,
            by_category,
            entry_count,
        }
    }

    /// Income minus expense
    pub fn balance(&self) -> i128 {
        self.income as i128 - self.expense as i128
    }

    pub fn render(&self, locale: &Locale) -> String {
        let (income, expense, balance) = match locale.language {
            catat_core::Language::Indonesian => ("Pemasukan", "Pengeluaran", "Saldo"),
            catat_core::Language::English => ("Income", "Expenses", "Balance"),
        };

        let mut s = String::new();
        s.push_str(&format!("# {:04}-{:02}\n\n", self.year, self.month));
        s.push_str(&format!("{income:<12} {}\n", format_rupiah(self.income as i128)));
        s.push_str(&format!("{expense:<12} {}\n", format_rupiah(self.expense as i128)));
        s.push_str(&format!("{balance:<12} {}\n", format_rupiah(self.balance())));

        if !self.by_category.is_empty() {
            s.push('\n');
            for (label, amount) in &self.by_category {
                let pct = if self.expense == 0 {
                    0.0
                } else {
                    *amount as f64 * 100.0 / self.expense as f64
                };
                s.push_str(&format!("- {label:<20} {:>16} {pct:>5.1}%\n", format_rupiah(*amount as i128)));
            }
        }
        s
    }
}

/// Parse "YYYY-MM"
pub fn parse_month(s: &str) -> Option<(i32, u32)> {
    let (y, m) = s.trim().split_once('-')?;
    let year: i32 = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(|_| (year, month))
}

/// "Rp 1.500.000", with a leading minus for negatives
pub fn format_rupiah(amount: i128) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catat_core::{EntryKind, Language};

    fn e(day: (i32, u32, u32), kind: EntryKind, amount: u64, category: &str) -> Entry {
        let date = NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap();
        Entry::new(format!("{amount}-{category}"), date, kind, "x", amount, category)
    }

    #[test]
    fn test_monthly_totals() {
        let entries = vec![
            e((2026, 10, 1), EntryKind::Expense, 50_000, "Makanan"),
            e((2026, 10, 2), EntryKind::Expense, 15_000, "Makanan"),
            e((2026, 10, 3), EntryKind::Expense, 20_000, "Transport"),
            e((2026, 10, 5), EntryKind::Income, 5_000_000, "Pemasukan"),
            e((2026, 9, 30), EntryKind::Expense, 999_000, "Belanja"),
        ];
        let r = MonthlyReport::build(&entries, 2026, 10);
        assert_eq!(r.entry_count, 4);
        assert_eq!(r.income, 5_000_000);
        assert_eq!(r.expense, 85_000);
        assert_eq!(r.balance(), 4_915_000);
        assert_eq!(
            r.by_category,
            vec![("Makanan".to_string(), 65_000), ("Transport".to_string(), 20_000)]
        );
    }

    #[test]
    fn test_render_mentions_categories() {
        let entries = vec![e((2026, 10, 1), EntryKind::Expense, 50_000, "Makanan")];
        let r = MonthlyReport::build(&entries, 2026, 10);
        let out = r.render(&Locale::for_language(Language::Indonesian));
        assert!(out.contains("# 2026-10"));
        assert!(out.contains("Pengeluaran"));
        assert!(out.contains("Makanan"));
        assert!(out.contains("-Rp 50.000"));
        assert!(out.contains("100.0%"));
    }

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(950), "Rp 950");
        assert_eq!(format_rupiah(50_000), "Rp 50.000");
        assert_eq!(format_rupiah(1_500_000), "Rp 1.500.000");
        assert_eq!(format_rupiah(-20_000), "-Rp 20.000");
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2026-10"), Some((2026, 10)));
        assert_eq!(parse_month("2026-13"), None);
        assert_eq!(parse_month("october"), None);
    }
}
