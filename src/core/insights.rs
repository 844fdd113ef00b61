use super::types::{CategoryTotal, HealthScoreResult, Priority, Recommendation, Snapshot};

const SIP_SAVINGS_RATE_FLOOR: f64 = 0.2;
const SCORE_ATTENTION_FLOOR: u32 = 70;

pub fn build_recommendations(
    snapshot: &Snapshot,
    score: &HealthScoreResult,
    top_categories: &[CategoryTotal],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let savings = snapshot.monthly_savings();

    if savings < 0.0 {
        recommendations.push(Recommendation {
            title: "You're overspending".to_string(),
            detail: format!(
                "Expenses and EMIs exceed income by {:.0} this month.",
                savings.abs()
            ),
            priority: Priority::High,
        });
    }

    if let Some(top) = top_categories.first() {
        recommendations.push(Recommendation {
            title: format!("Reduce {} spending", top.category),
            detail: format!(
                "Your top category is {:.0} this month. Consider cutting back.",
                top.total
            ),
            priority: Priority::Medium,
        });
    }

    if snapshot.monthly_income > 0.0 && savings / snapshot.monthly_income < SIP_SAVINGS_RATE_FLOOR {
        recommendations.push(Recommendation {
            title: "Start a monthly SIP".to_string(),
            detail: "Even a small SIP compounds into a significant sum over ten or more years."
                .to_string(),
            priority: Priority::Medium,
        });
    }

    if score.final_score < SCORE_ATTENTION_FLOOR {
        recommendations.push(Recommendation {
            title: "Improve your health score".to_string(),
            detail: format!(
                "Your score is {}. Focus on savings, debt and your emergency fund.",
                score.final_score
            ),
            priority: Priority::High,
        });
    }

    if recommendations.is_empty() {
        recommendations.push(Recommendation {
            title: "Great job".to_string(),
            detail: "Your finances are in good shape. Keep it up.".to_string(),
            priority: Priority::Low,
        });
    }

    recommendations
}
