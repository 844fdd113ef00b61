use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum ScoreLabel {
    Poor,
    Average,
    Good,
    Excellent,
}

impl ScoreLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoreLabel::Poor => "Poor",
            ScoreLabel::Average => "Average",
            ScoreLabel::Good => "Good",
            ScoreLabel::Excellent => "Excellent",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub monthly_income: f64,
    pub total_expenses: f64,
    pub total_emi: f64,
    pub emergency_fund: f64,
    pub has_health_insurance: bool,
    pub has_term_insurance: bool,
    pub card_count: u32,
    pub monthly_card_spend: f64,
    pub investment_amount: f64,
    pub misc_expense: f64,
}

impl Snapshot {
    pub fn monthly_savings(&self) -> f64 {
        self.monthly_income - self.total_expenses - self.total_emi - self.investment_amount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubScore {
    pub name: &'static str,
    pub score: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreResult {
    pub final_score: u32,
    pub label: ScoreLabel,
    pub subscores: Vec<SubScore>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub year: u32,
    pub invested: f64,
    pub value: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepletionPoint {
    pub year: u32,
    pub balance: f64,
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub monthly_income: f64,
    pub investment_amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtEntry {
    pub emi_amount: f64,
    pub debt_type: String,
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceCover {
    pub health_insurance: bool,
    pub term_insurance: bool,
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUsage {
    pub card_count: u32,
    pub monthly_card_spend: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEntry {
    pub category: String,
    pub monthly_limit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetLine {
    pub category: String,
    pub monthly_limit: f64,
    pub spent: f64,
    pub over_limit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: String,
    pub detail: String,
    pub priority: Priority,
}
