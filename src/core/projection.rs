use super::types::{DepletionPoint, ProjectionPoint};

pub const SWP_YEAR_CAP: u32 = 50;
const MONTHS_PER_YEAR: u32 = 12;

pub fn project_sip(
    monthly_amount: f64,
    years: u32,
    annual_return_pct: f64,
) -> Vec<ProjectionPoint> {
    let monthly_rate = annual_return_pct / 100.0 / MONTHS_PER_YEAR as f64;

    let mut points = Vec::with_capacity(years as usize + 1);
    for year in 0..=years {
        let months = year * MONTHS_PER_YEAR;
        points.push(ProjectionPoint {
            year,
            invested: monthly_amount * months as f64,
            value: annuity_due_value(monthly_amount, months, monthly_rate).round(),
        });
    }
    points
}

// Future value of an annuity-due: contributions land at the start of each
// month, hence the trailing (1 + r) factor.
fn annuity_due_value(monthly_amount: f64, months: u32, monthly_rate: f64) -> f64 {
    if months == 0 {
        return 0.0;
    }
    if monthly_rate == 0.0 {
        return monthly_amount * months as f64;
    }
    let growth = (1.0 + monthly_rate).powi(months as i32);
    monthly_amount * ((growth - 1.0) / monthly_rate) * (1.0 + monthly_rate)
}

pub fn project_swp(
    corpus: f64,
    monthly_withdrawal: f64,
    annual_return_pct: f64,
) -> Vec<DepletionPoint> {
    let monthly_rate = annual_return_pct / 100.0 / MONTHS_PER_YEAR as f64;

    let mut points = vec![DepletionPoint {
        year: 0,
        balance: corpus,
    }];

    let mut balance = corpus;
    let mut year = 0;
    while balance > 0.0 && year < SWP_YEAR_CAP {
        for _ in 0..MONTHS_PER_YEAR {
            if balance <= 0.0 {
                break;
            }
            balance = balance * (1.0 + monthly_rate) - monthly_withdrawal;
        }
        year += 1;
        points.push(DepletionPoint {
            year,
            balance: balance.max(0.0).round(),
        });
        if balance <= 0.0 {
            break;
        }
    }
    points
}

pub fn depletion_year(points: &[DepletionPoint]) -> Option<u32> {
    points.iter().find(|p| p.balance <= 0.0).map(|p| p.year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn sip_zero_years_yields_single_origin_point() {
        let points = project_sip(5_000.0, 0, 12.0);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].year, 0);
        assert_approx(points[0].invested, 0.0);
        assert_approx(points[0].value, 0.0);
    }

    #[test]
    fn sip_zero_rate_grows_linearly_without_nan() {
        let points = project_sip(1_000.0, 1, 0.0);
        assert_eq!(points.len(), 2);
        let last = points[1];
        assert_approx(last.invested, 12_000.0);
        assert_approx(last.value, 12_000.0);
        for point in points {
            assert!(point.value.is_finite());
        }
    }

    #[test]
    fn sip_first_year_matches_annuity_due_hand_calculation() {
        // r = 0.01; ((1.01^12 - 1) / 0.01) * 1.01 * 1000 = 12809.33 -> 12809
        let points = project_sip(1_000.0, 1, 12.0);
        assert_approx(points[1].invested, 12_000.0);
        assert_approx(points[1].value, 12_809.0);
    }

    #[test]
    fn sip_series_has_one_point_per_year() {
        let points = project_sip(5_000.0, 10, 12.0);
        assert_eq!(points.len(), 11);
        for (index, point) in points.iter().enumerate() {
            assert_eq!(point.year, index as u32);
        }
        assert_approx(points[10].invested, 600_000.0);
    }

    #[test]
    fn swp_zero_corpus_is_already_depleted() {
        let points = project_swp(0.0, 30_000.0, 8.0);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].year, 0);
        assert_approx(points[0].balance, 0.0);
        assert_eq!(depletion_year(&points), Some(0));
    }

    #[test]
    fn swp_sustainable_withdrawal_runs_the_full_cap() {
        // Monthly growth of 1% on 1m dwarfs the 1k withdrawal.
        let points = project_swp(1_000_000.0, 1_000.0, 12.0);
        assert_eq!(points.len(), 51);
        assert_eq!(points.last().map(|p| p.year), Some(SWP_YEAR_CAP));
        assert!(points.last().is_some_and(|p| p.balance > 0.0));
        assert_eq!(depletion_year(&points), None);
    }

    #[test]
    fn swp_zero_rate_depletes_on_schedule() {
        // 120k at 10k per month lasts exactly one year.
        let points = project_swp(120_000.0, 10_000.0, 0.0);
        assert_eq!(points.len(), 2);
        assert_approx(points[1].balance, 0.0);
        assert_eq!(depletion_year(&points), Some(1));
    }

    #[test]
    fn swp_stops_recording_after_the_depleted_year() {
        let points = project_swp(100_000.0, 50_000.0, 0.0);
        assert_eq!(points.len(), 2);
        assert_approx(points[0].balance, 100_000.0);
        assert_approx(points[1].balance, 0.0);
    }

    #[test]
    fn repeated_projections_are_identical() {
        assert_eq!(project_sip(5_000.0, 20, 12.0), project_sip(5_000.0, 20, 12.0));
        assert_eq!(
            project_swp(5_000_000.0, 30_000.0, 8.0),
            project_swp(5_000_000.0, 30_000.0, 8.0)
        );
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_sip_series_is_well_formed(
            amount in 0u32..100_000,
            years in 0u32..41,
            pct in 0u32..31
        ) {
            let points = project_sip(amount as f64, years, pct as f64);
            prop_assert_eq!(points.len(), years as usize + 1);

            for (index, point) in points.iter().enumerate() {
                prop_assert_eq!(point.year, index as u32);
                prop_assert!(point.value.is_finite());
                prop_assert!(point.invested.is_finite());
                // Contributions at the start of each month can only grow
                // under a non-negative rate; 0.5 absorbs the final rounding.
                prop_assert!(point.value + 0.5 + EPS >= point.invested);
            }

            for pair in points.windows(2) {
                prop_assert!(pair[1].invested >= pair[0].invested);
                prop_assert!(pair[1].value + EPS >= pair[0].value);
            }
        }

        #[test]
        fn prop_sip_zero_rate_value_equals_invested(
            amount in 0u32..100_000,
            years in 0u32..41
        ) {
            let points = project_sip(amount as f64, years, 0.0);
            for point in points {
                prop_assert!((point.value - point.invested.round()).abs() <= EPS);
            }
        }

        #[test]
        fn prop_swp_series_is_bounded_and_contiguous(
            corpus in 0u32..10_000_000,
            withdrawal in 0u32..500_000,
            pct in 0u32..21
        ) {
            let points = project_swp(corpus as f64, withdrawal as f64, pct as f64);
            prop_assert!(!points.is_empty());
            prop_assert!(points.len() <= SWP_YEAR_CAP as usize + 1);

            for (index, point) in points.iter().enumerate() {
                prop_assert_eq!(point.year, index as u32);
                prop_assert!(point.balance >= 0.0);
                prop_assert!(point.balance.is_finite());
            }

            // A corpus that outlives the cap must fill all 51 rows.
            if points.last().is_some_and(|p| p.balance > 0.0) {
                prop_assert_eq!(points.len(), SWP_YEAR_CAP as usize + 1);
            }
        }
    }
}
