use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    BudgetEntry, BudgetLine, CardUsage, CategoryTotal, DebtEntry, DepletionPoint, ExpenseEntry,
    InsuranceCover, Profile, ProjectionPoint, Recommendation, ScoreLabel, Snapshot, SubScore,
    assemble_snapshot, budget_report, build_recommendations, category_totals,
    compute_health_score, depletion_year, project_sip, project_swp,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const MAX_CARD_COUNT: u32 = 50;
const MAX_PROJECTION_YEARS: u32 = 60;
const MAX_ANNUAL_RETURN_PCT: f64 = 100.0;

const DEFAULT_SIP_AMOUNT: f64 = 5_000.0;
const DEFAULT_SIP_YEARS: u32 = 10;
const DEFAULT_SIP_RETURN_PCT: f64 = 12.0;
const DEFAULT_SWP_CORPUS: f64 = 5_000_000.0;
const DEFAULT_SWP_WITHDRAWAL: f64 = 30_000.0;
const DEFAULT_SWP_RETURN_PCT: f64 = 8.0;

#[derive(Parser, Debug)]
#[command(
    name = "finhealth",
    about = "Financial health scoring and SIP/SWP projection service"
)]
struct Cli {
    #[arg(long, default_value_t = 50_000.0, help = "Monthly take-home income")]
    monthly_income: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Total expenses recorded for the current month"
    )]
    total_expenses: f64,
    #[arg(long, default_value_t = 0.0, help = "Sum of all monthly EMI payments")]
    total_emi: f64,
    #[arg(long, default_value_t = 0.0, help = "Emergency fund balance")]
    emergency_fund: f64,
    #[arg(long, help = "Active health insurance cover")]
    has_health_insurance: bool,
    #[arg(long, help = "Active term insurance cover")]
    has_term_insurance: bool,
    #[arg(long, default_value_t = 0, help = "Number of active credit cards")]
    card_count: u32,
    #[arg(long, default_value_t = 0.0, help = "Monthly credit card spend")]
    monthly_card_spend: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Monthly contribution into investments"
    )]
    investment_amount: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Unclassified leakage spend; no caller wires this yet"
    )]
    misc_expense: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScorePayload {
    monthly_income: Option<f64>,
    total_expenses: Option<f64>,
    total_emi: Option<f64>,
    emergency_fund: Option<f64>,
    has_health_insurance: Option<bool>,
    has_term_insurance: Option<bool>,
    card_count: Option<u32>,
    monthly_card_spend: Option<f64>,
    investment_amount: Option<f64>,
    misc_expense: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SipPayload {
    monthly_amount: Option<f64>,
    years: Option<u32>,
    annual_return_pct: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SwpPayload {
    corpus: Option<f64>,
    monthly_withdrawal: Option<f64>,
    annual_return_pct: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InsightsPayload {
    monthly_income: Option<f64>,
    investment_amount: Option<f64>,
    emergency_fund: Option<f64>,
    has_health_insurance: Option<bool>,
    has_term_insurance: Option<bool>,
    card_count: Option<u32>,
    monthly_card_spend: Option<f64>,
    expenses: Vec<ExpenseEntry>,
    debts: Vec<DebtEntry>,
    budgets: Vec<BudgetEntry>,
    as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy)]
struct SipRequest {
    monthly_amount: f64,
    years: u32,
    annual_return_pct: f64,
}

#[derive(Debug, Clone, Copy)]
struct SwpRequest {
    corpus: f64,
    monthly_withdrawal: f64,
    annual_return_pct: f64,
}

#[derive(Debug)]
struct InsightsRequest {
    snapshot: Snapshot,
    expenses: Vec<ExpenseEntry>,
    budgets: Vec<BudgetEntry>,
    as_of: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreResponse {
    final_score: u32,
    label: ScoreLabel,
    monthly_savings: f64,
    subscores: Vec<SubScore>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SipResponse {
    total_invested: f64,
    final_value: f64,
    wealth_gained: f64,
    points: Vec<ProjectionPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SwpResponse {
    years_until_depletion: Option<u32>,
    points: Vec<DepletionPoint>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InsightsResponse {
    final_score: u32,
    label: ScoreLabel,
    monthly_savings: f64,
    subscores: Vec<SubScore>,
    category_breakdown: Vec<CategoryTotal>,
    budget_lines: Vec<BudgetLine>,
    recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn require_non_negative(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{name} must be a finite value >= 0"));
    }
    Ok(())
}

fn require_return_pct(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || !(0.0..=MAX_ANNUAL_RETURN_PCT).contains(&value) {
        return Err(format!(
            "{name} must be between 0 and {MAX_ANNUAL_RETURN_PCT}"
        ));
    }
    Ok(())
}

fn build_snapshot(cli: Cli) -> Result<Snapshot, String> {
    for (name, value) in [
        ("--monthly-income", cli.monthly_income),
        ("--total-expenses", cli.total_expenses),
        ("--total-emi", cli.total_emi),
        ("--emergency-fund", cli.emergency_fund),
        ("--monthly-card-spend", cli.monthly_card_spend),
        ("--investment-amount", cli.investment_amount),
        ("--misc-expense", cli.misc_expense),
    ] {
        require_non_negative(name, value)?;
    }

    if cli.card_count > MAX_CARD_COUNT {
        return Err(format!("--card-count must be <= {MAX_CARD_COUNT}"));
    }

    Ok(Snapshot {
        monthly_income: cli.monthly_income,
        total_expenses: cli.total_expenses,
        total_emi: cli.total_emi,
        emergency_fund: cli.emergency_fund,
        has_health_insurance: cli.has_health_insurance,
        has_term_insurance: cli.has_term_insurance,
        card_count: cli.card_count,
        monthly_card_spend: cli.monthly_card_spend,
        investment_amount: cli.investment_amount,
        misc_expense: cli.misc_expense,
    })
}

fn default_cli_for_api() -> Cli {
    Cli {
        monthly_income: 50_000.0,
        total_expenses: 0.0,
        total_emi: 0.0,
        emergency_fund: 0.0,
        has_health_insurance: false,
        has_term_insurance: false,
        card_count: 0,
        monthly_card_spend: 0.0,
        investment_amount: 0.0,
        misc_expense: 0.0,
    }
}

fn snapshot_from_payload(payload: ScorePayload) -> Result<Snapshot, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.monthly_income {
        cli.monthly_income = v;
    }
    if let Some(v) = payload.total_expenses {
        cli.total_expenses = v;
    }
    if let Some(v) = payload.total_emi {
        cli.total_emi = v;
    }
    if let Some(v) = payload.emergency_fund {
        cli.emergency_fund = v;
    }
    if let Some(v) = payload.has_health_insurance {
        cli.has_health_insurance = v;
    }
    if let Some(v) = payload.has_term_insurance {
        cli.has_term_insurance = v;
    }
    if let Some(v) = payload.card_count {
        cli.card_count = v;
    }
    if let Some(v) = payload.monthly_card_spend {
        cli.monthly_card_spend = v;
    }
    if let Some(v) = payload.investment_amount {
        cli.investment_amount = v;
    }
    if let Some(v) = payload.misc_expense {
        cli.misc_expense = v;
    }

    build_snapshot(cli)
}

fn sip_request_from_payload(payload: SipPayload) -> Result<SipRequest, String> {
    let request = SipRequest {
        monthly_amount: payload.monthly_amount.unwrap_or(DEFAULT_SIP_AMOUNT),
        years: payload.years.unwrap_or(DEFAULT_SIP_YEARS),
        annual_return_pct: payload.annual_return_pct.unwrap_or(DEFAULT_SIP_RETURN_PCT),
    };

    require_non_negative("monthlyAmount", request.monthly_amount)?;
    require_return_pct("annualReturnPct", request.annual_return_pct)?;
    if request.years > MAX_PROJECTION_YEARS {
        return Err(format!("years must be <= {MAX_PROJECTION_YEARS}"));
    }

    Ok(request)
}

fn swp_request_from_payload(payload: SwpPayload) -> Result<SwpRequest, String> {
    let request = SwpRequest {
        corpus: payload.corpus.unwrap_or(DEFAULT_SWP_CORPUS),
        monthly_withdrawal: payload.monthly_withdrawal.unwrap_or(DEFAULT_SWP_WITHDRAWAL),
        annual_return_pct: payload.annual_return_pct.unwrap_or(DEFAULT_SWP_RETURN_PCT),
    };

    require_non_negative("corpus", request.corpus)?;
    require_non_negative("monthlyWithdrawal", request.monthly_withdrawal)?;
    require_return_pct("annualReturnPct", request.annual_return_pct)?;

    Ok(request)
}

fn insights_request_from_payload(payload: InsightsPayload) -> Result<InsightsRequest, String> {
    let defaults = default_cli_for_api();
    let monthly_income = payload.monthly_income.unwrap_or(defaults.monthly_income);
    let investment_amount = payload
        .investment_amount
        .unwrap_or(defaults.investment_amount);
    let emergency_fund = payload.emergency_fund.unwrap_or(defaults.emergency_fund);
    let card_count = payload.card_count.unwrap_or(defaults.card_count);
    let monthly_card_spend = payload
        .monthly_card_spend
        .unwrap_or(defaults.monthly_card_spend);

    for (name, value) in [
        ("monthlyIncome", monthly_income),
        ("investmentAmount", investment_amount),
        ("emergencyFund", emergency_fund),
        ("monthlyCardSpend", monthly_card_spend),
    ] {
        require_non_negative(name, value)?;
    }
    if card_count > MAX_CARD_COUNT {
        return Err(format!("cardCount must be <= {MAX_CARD_COUNT}"));
    }
    for entry in &payload.expenses {
        require_non_negative("expenses.amount", entry.amount)?;
    }
    for debt in &payload.debts {
        require_non_negative("debts.emiAmount", debt.emi_amount)?;
    }
    for budget in &payload.budgets {
        require_non_negative("budgets.monthlyLimit", budget.monthly_limit)?;
    }

    let as_of = payload.as_of.unwrap_or_else(|| Local::now().date_naive());
    let snapshot = assemble_snapshot(
        Profile {
            monthly_income,
            investment_amount,
        },
        &payload.expenses,
        &payload.debts,
        emergency_fund,
        InsuranceCover {
            health_insurance: payload.has_health_insurance.unwrap_or(false),
            term_insurance: payload.has_term_insurance.unwrap_or(false),
        },
        CardUsage {
            card_count,
            monthly_card_spend,
        },
        as_of,
    );

    Ok(InsightsRequest {
        snapshot,
        expenses: payload.expenses,
        budgets: payload.budgets,
        as_of,
    })
}

fn build_score_response(snapshot: &Snapshot) -> ScoreResponse {
    let result = compute_health_score(snapshot);
    ScoreResponse {
        final_score: result.final_score,
        label: result.label,
        monthly_savings: snapshot.monthly_savings(),
        subscores: result.subscores,
    }
}

fn build_sip_response(request: SipRequest) -> SipResponse {
    let points = project_sip(
        request.monthly_amount,
        request.years,
        request.annual_return_pct,
    );
    let last = points.last().copied().unwrap_or(ProjectionPoint {
        year: 0,
        invested: 0.0,
        value: 0.0,
    });
    SipResponse {
        total_invested: last.invested,
        final_value: last.value,
        wealth_gained: last.value - last.invested,
        points,
    }
}

fn build_swp_response(request: SwpRequest) -> SwpResponse {
    let points = project_swp(
        request.corpus,
        request.monthly_withdrawal,
        request.annual_return_pct,
    );
    SwpResponse {
        years_until_depletion: depletion_year(&points),
        points,
    }
}

fn build_insights_response(request: &InsightsRequest) -> InsightsResponse {
    let result = compute_health_score(&request.snapshot);
    let breakdown = category_totals(&request.expenses, request.as_of);
    let recommendations = build_recommendations(&request.snapshot, &result, &breakdown);

    InsightsResponse {
        final_score: result.final_score,
        label: result.label,
        monthly_savings: request.snapshot.monthly_savings(),
        subscores: result.subscores,
        category_breakdown: breakdown,
        budget_lines: budget_report(&request.budgets, &request.expenses, request.as_of),
        recommendations,
    }
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/score", get(score_get_handler).post(score_post_handler))
        .route("/api/sip", get(sip_get_handler).post(sip_post_handler))
        .route("/api/swp", get(swp_get_handler).post(swp_post_handler))
        .route("/api/insights", post(insights_post_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("finhealth HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn score_get_handler(Query(payload): Query<ScorePayload>) -> Response {
    score_handler_impl(payload)
}

async fn score_post_handler(Json(payload): Json<ScorePayload>) -> Response {
    score_handler_impl(payload)
}

fn score_handler_impl(payload: ScorePayload) -> Response {
    match snapshot_from_payload(payload) {
        Ok(snapshot) => json_response(StatusCode::OK, build_score_response(&snapshot)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn sip_get_handler(Query(payload): Query<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

async fn sip_post_handler(Json(payload): Json<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

fn sip_handler_impl(payload: SipPayload) -> Response {
    match sip_request_from_payload(payload) {
        Ok(request) => json_response(StatusCode::OK, build_sip_response(request)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn swp_get_handler(Query(payload): Query<SwpPayload>) -> Response {
    swp_handler_impl(payload)
}

async fn swp_post_handler(Json(payload): Json<SwpPayload>) -> Response {
    swp_handler_impl(payload)
}

fn swp_handler_impl(payload: SwpPayload) -> Response {
    match swp_request_from_payload(payload) {
        Ok(request) => json_response(StatusCode::OK, build_swp_response(request)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

async fn insights_post_handler(Json(payload): Json<InsightsPayload>) -> Response {
    match insights_request_from_payload(payload) {
        Ok(request) => json_response(StatusCode::OK, build_insights_response(&request)),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn score_request_from_json(json: &str) -> Result<Snapshot, String> {
    let payload = serde_json::from_str::<ScorePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    snapshot_from_payload(payload)
}

#[cfg(test)]
fn insights_request_from_json(json: &str) -> Result<InsightsRequest, String> {
    let payload = serde_json::from_str::<InsightsPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    insights_request_from_payload(payload)
}
