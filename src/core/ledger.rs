use chrono::{Datelike, NaiveDate};

use super::types::{
    BudgetEntry, BudgetLine, CardUsage, CategoryTotal, DebtEntry, ExpenseEntry, InsuranceCover,
    Profile, Snapshot,
};

fn in_month(entry: &ExpenseEntry, as_of: NaiveDate) -> bool {
    entry.date.year() == as_of.year() && entry.date.month() == as_of.month()
}

pub fn month_expense_total(expenses: &[ExpenseEntry], as_of: NaiveDate) -> f64 {
    expenses
        .iter()
        .filter(|e| in_month(e, as_of))
        .map(|e| e.amount)
        .sum()
}

pub fn total_emi(debts: &[DebtEntry]) -> f64 {
    debts.iter().map(|d| d.emi_amount).sum()
}

pub fn assemble_snapshot(
    profile: Profile,
    expenses: &[ExpenseEntry],
    debts: &[DebtEntry],
    emergency_fund: f64,
    insurance: InsuranceCover,
    cards: CardUsage,
    as_of: NaiveDate,
) -> Snapshot {
    Snapshot {
        monthly_income: profile.monthly_income,
        total_expenses: month_expense_total(expenses, as_of),
        total_emi: total_emi(debts),
        emergency_fund,
        has_health_insurance: insurance.health_insurance,
        has_term_insurance: insurance.term_insurance,
        card_count: cards.card_count,
        monthly_card_spend: cards.monthly_card_spend,
        investment_amount: profile.investment_amount,
        // No expense category feeds leakage yet; every caller supplies 0.
        misc_expense: 0.0,
    }
}

pub fn category_totals(expenses: &[ExpenseEntry], as_of: NaiveDate) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for entry in expenses.iter().filter(|e| in_month(e, as_of)) {
        match totals.iter_mut().find(|t| t.category == entry.category) {
            Some(total) => total.total += entry.amount,
            None => totals.push(CategoryTotal {
                category: entry.category.clone(),
                total: entry.amount,
            }),
        }
    }
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

pub fn budget_report(
    budgets: &[BudgetEntry],
    expenses: &[ExpenseEntry],
    as_of: NaiveDate,
) -> Vec<BudgetLine> {
    budgets
        .iter()
        .map(|budget| {
            let spent: f64 = expenses
                .iter()
                .filter(|e| in_month(e, as_of) && e.category == budget.category)
                .map(|e| e.amount)
                .sum();
            BudgetLine {
                category: budget.category.clone(),
                monthly_limit: budget.monthly_limit,
                spent,
                over_limit: spent > budget.monthly_limit,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn expense(amount: f64, category: &str, on: NaiveDate) -> ExpenseEntry {
        ExpenseEntry {
            amount,
            category: category.to_string(),
            date: on,
        }
    }

    fn sample_expenses() -> Vec<ExpenseEntry> {
        vec![
            expense(8_000.0, "Rent", date(2026, 8, 1)),
            expense(2_500.0, "Food & Dining", date(2026, 8, 4)),
            expense(1_500.0, "Food & Dining", date(2026, 8, 18)),
            expense(900.0, "Transport", date(2026, 8, 21)),
            // Previous month and previous year, both ignored.
            expense(7_000.0, "Rent", date(2026, 7, 30)),
            expense(3_000.0, "Shopping", date(2025, 8, 10)),
        ]
    }

    #[test]
    fn month_expense_total_filters_on_month_and_year() {
        let total = month_expense_total(&sample_expenses(), date(2026, 8, 6));
        assert_approx(total, 12_900.0);
    }

    #[test]
    fn month_expense_total_is_zero_for_an_empty_month() {
        let total = month_expense_total(&sample_expenses(), date(2026, 6, 15));
        assert_approx(total, 0.0);
    }

    #[test]
    fn total_emi_sums_all_debts_without_date_filtering() {
        let debts = vec![
            DebtEntry {
                emi_amount: 12_000.0,
                debt_type: "Home Loan".to_string(),
            },
            DebtEntry {
                emi_amount: 3_500.0,
                debt_type: "Car Loan".to_string(),
            },
        ];
        assert_approx(total_emi(&debts), 15_500.0);
    }

    #[test]
    fn assemble_snapshot_wires_records_into_score_input() {
        let profile = Profile {
            monthly_income: 50_000.0,
            investment_amount: 5_000.0,
        };
        let debts = vec![DebtEntry {
            emi_amount: 10_000.0,
            debt_type: "Home Loan".to_string(),
        }];
        let insurance = InsuranceCover {
            health_insurance: true,
            term_insurance: false,
        };
        let cards = CardUsage {
            card_count: 2,
            monthly_card_spend: 5_000.0,
        };

        let snapshot = assemble_snapshot(
            profile,
            &sample_expenses(),
            &debts,
            60_000.0,
            insurance,
            cards,
            date(2026, 8, 6),
        );

        assert_approx(snapshot.monthly_income, 50_000.0);
        assert_approx(snapshot.total_expenses, 12_900.0);
        assert_approx(snapshot.total_emi, 10_000.0);
        assert_approx(snapshot.emergency_fund, 60_000.0);
        assert!(snapshot.has_health_insurance);
        assert!(!snapshot.has_term_insurance);
        assert_eq!(snapshot.card_count, 2);
        assert_approx(snapshot.monthly_card_spend, 5_000.0);
        assert_approx(snapshot.investment_amount, 5_000.0);
        assert_approx(snapshot.misc_expense, 0.0);
    }

    #[test]
    fn category_totals_aggregate_and_sort_descending() {
        let totals = category_totals(&sample_expenses(), date(2026, 8, 6));

        let summary: Vec<(&str, f64)> = totals
            .iter()
            .map(|t| (t.category.as_str(), t.total))
            .collect();
        assert_eq!(
            summary,
            vec![("Rent", 8_000.0), ("Food & Dining", 4_000.0), ("Transport", 900.0)]
        );
    }

    #[test]
    fn budget_report_flags_only_categories_over_their_limit() {
        let budgets = vec![
            BudgetEntry {
                category: "Food & Dining".to_string(),
                monthly_limit: 3_000.0,
            },
            BudgetEntry {
                category: "Transport".to_string(),
                monthly_limit: 2_000.0,
            },
            BudgetEntry {
                category: "Entertainment".to_string(),
                monthly_limit: 1_000.0,
            },
        ];

        let report = budget_report(&budgets, &sample_expenses(), date(2026, 8, 6));
        assert_eq!(report.len(), 3);

        assert_approx(report[0].spent, 4_000.0);
        assert!(report[0].over_limit);
        assert_approx(report[1].spent, 900.0);
        assert!(!report[1].over_limit);
        assert_approx(report[2].spent, 0.0);
        assert!(!report[2].over_limit);
    }

    #[test]
    fn budget_at_exactly_the_limit_is_not_over() {
        let budgets = vec![BudgetEntry {
            category: "Rent".to_string(),
            monthly_limit: 8_000.0,
        }];

        let report = budget_report(&budgets, &sample_expenses(), date(2026, 8, 6));
        assert!(!report[0].over_limit);
    }
}
