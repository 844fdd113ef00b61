use super::types::{HealthScoreResult, ScoreLabel, Snapshot, SubScore};

const WEIGHT_DISCIPLINE: f64 = 0.20;
const WEIGHT_INVESTMENT: f64 = 0.25;
const WEIGHT_DEBT: f64 = 0.20;
const WEIGHT_EMERGENCY: f64 = 0.15;
const WEIGHT_INSURANCE: f64 = 0.10;
const WEIGHT_CREDIT: f64 = 0.05;
const WEIGHT_MISC: f64 = 0.05;

const SAVINGS_RATE_SCALE: f64 = 333.0;
const DEBT_RATIO_CEILING: f64 = 0.5;
const FULL_EMERGENCY_MONTHS: f64 = 6.0;
const INSURANCE_FLAG_VALUE: f64 = 50.0;
const LOW_INCOME_LIMIT: f64 = 30_000.0;
const MID_INCOME_LIMIT: f64 = 80_000.0;

// Ordered bands, first match wins. Boundaries are inclusive, so a ratio
// sitting exactly on a threshold takes the better band.
const INVESTMENT_LADDER: [(f64, f64); 5] = [
    (0.25, 100.0),
    (0.20, 85.0),
    (0.15, 70.0),
    (0.10, 55.0),
    (0.05, 35.0),
];

const CARD_SPEND_LADDER: [(f64, f64); 4] =
    [(0.10, 100.0), (0.20, 80.0), (0.30, 60.0), (0.40, 40.0)];
const CARD_SPEND_FLOOR: f64 = 20.0;

const MISC_LADDER: [(f64, f64); 5] = [
    (0.05, 100.0),
    (0.10, 80.0),
    (0.15, 60.0),
    (0.20, 40.0),
    (0.30, 20.0),
];
const MISC_FLOOR: f64 = 5.0;

pub fn compute_health_score(snapshot: &Snapshot) -> HealthScoreResult {
    if snapshot.monthly_income <= 0.0 {
        return HealthScoreResult {
            final_score: 0,
            label: ScoreLabel::Poor,
            subscores: Vec::new(),
        };
    }

    let discipline = discipline_score(snapshot);
    let investment = investment_score(snapshot);
    let debt = debt_burden_score(snapshot);
    let emergency = emergency_fund_score(snapshot);
    let insurance = insurance_score(snapshot);
    let credit = credit_dependency_score(snapshot);
    let misc = misc_leakage_score(snapshot);

    let raw = WEIGHT_DISCIPLINE * discipline
        + WEIGHT_INVESTMENT * investment
        + WEIGHT_DEBT * debt
        + WEIGHT_EMERGENCY * emergency
        + WEIGHT_INSURANCE * insurance
        + WEIGHT_CREDIT * credit
        + WEIGHT_MISC * misc;

    let final_score = raw.clamp(0.0, 100.0).round() as u32;

    HealthScoreResult {
        final_score,
        label: label_for_score(final_score),
        subscores: vec![
            subscore("Discipline", discipline, WEIGHT_DISCIPLINE),
            subscore("Investment %", investment, WEIGHT_INVESTMENT),
            subscore("EMI Burden", debt, WEIGHT_DEBT),
            subscore("Emergency Fund", emergency, WEIGHT_EMERGENCY),
            subscore("Insurance", insurance, WEIGHT_INSURANCE),
            subscore("Credit Card Dependency", credit, WEIGHT_CREDIT),
            subscore("Misc. Leakage", misc, WEIGHT_MISC),
        ],
    }
}

pub fn label_for_score(score: u32) -> ScoreLabel {
    match score {
        0..=40 => ScoreLabel::Poor,
        41..=70 => ScoreLabel::Average,
        71..=85 => ScoreLabel::Good,
        _ => ScoreLabel::Excellent,
    }
}

fn subscore(name: &'static str, raw: f64, weight: f64) -> SubScore {
    SubScore {
        name,
        score: raw.round() as u32,
        weight,
    }
}

fn discipline_score(snapshot: &Snapshot) -> f64 {
    let savings_rate = snapshot.monthly_savings() / snapshot.monthly_income;
    (savings_rate * SAVINGS_RATE_SCALE).clamp(0.0, 100.0)
}

fn investment_score(snapshot: &Snapshot) -> f64 {
    let ratio = snapshot.investment_amount / snapshot.monthly_income;
    for (threshold, score) in INVESTMENT_LADDER {
        if ratio >= threshold {
            return score;
        }
    }
    if ratio > 0.0 { 20.0 } else { 0.0 }
}

fn debt_burden_score(snapshot: &Snapshot) -> f64 {
    let ratio = snapshot.total_emi / snapshot.monthly_income;
    if ratio == 0.0 {
        return 100.0;
    }
    ((1.0 - ratio / DEBT_RATIO_CEILING) * 100.0).clamp(0.0, 100.0)
}

fn emergency_fund_score(snapshot: &Snapshot) -> f64 {
    let monthly_expenses = snapshot.total_expenses.max(1.0);
    let months_covered = snapshot.emergency_fund / monthly_expenses;
    (months_covered / FULL_EMERGENCY_MONTHS * 100.0).clamp(0.0, 100.0)
}

fn insurance_score(snapshot: &Snapshot) -> f64 {
    let mut score = 0.0;
    if snapshot.has_health_insurance {
        score += INSURANCE_FLAG_VALUE;
    }
    if snapshot.has_term_insurance {
        score += INSURANCE_FLAG_VALUE;
    }
    score
}

fn credit_dependency_score(snapshot: &Snapshot) -> f64 {
    let ratio = snapshot.monthly_card_spend / snapshot.monthly_income;
    let mut spend_score = CARD_SPEND_FLOOR;
    for (threshold, score) in CARD_SPEND_LADDER {
        if ratio <= threshold {
            spend_score = score;
            break;
        }
    }
    let penalty = card_penalty(snapshot.monthly_income, snapshot.card_count);
    (spend_score - penalty).clamp(0.0, 100.0)
}

fn card_penalty(monthly_income: f64, card_count: u32) -> f64 {
    if monthly_income < LOW_INCOME_LIMIT {
        match card_count {
            c if c >= 4 => 40.0,
            3 => 25.0,
            2 => 10.0,
            _ => 0.0,
        }
    } else if monthly_income < MID_INCOME_LIMIT {
        match card_count {
            c if c >= 5 => 30.0,
            4 => 20.0,
            3 => 10.0,
            _ => 0.0,
        }
    } else {
        match card_count {
            c if c >= 7 => 15.0,
            c if c >= 5 => 8.0,
            _ => 0.0,
        }
    }
}

fn misc_leakage_score(snapshot: &Snapshot) -> f64 {
    let ratio = snapshot.misc_expense / snapshot.monthly_income;
    for (threshold, score) in MISC_LADDER {
        if ratio <= threshold {
            return score;
        }
    }
    MISC_FLOOR
}
