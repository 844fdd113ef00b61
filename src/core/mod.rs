mod engine;
mod insights;
mod ledger;
mod projection;
mod types;

pub use engine::{compute_health_score, label_for_score};
pub use insights::build_recommendations;
pub use ledger::{assemble_snapshot, budget_report, category_totals, month_expense_total, total_emi};
pub use projection::{SWP_YEAR_CAP, depletion_year, project_sip, project_swp};
pub use types::{
    BudgetEntry, BudgetLine, CardUsage, CategoryTotal, DebtEntry, DepletionPoint, ExpenseEntry,
    HealthScoreResult, InsuranceCover, Priority, Profile, ProjectionPoint, Recommendation,
    ScoreLabel, Snapshot, SubScore,
};
