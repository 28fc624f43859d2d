use axum::{
    Router,
    extract::{Json, Query},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::core::{
    Comparison, Narrative, Parameters, Policy, SimulationOptions, SimulationResult, SpendChanges,
    compare, narrate, run_simulation, to_csv,
};

const MAX_HORIZON_YEARS: u32 = 50;

#[derive(Parser, Debug)]
#[command(
    name = "budget-sim",
    about = "UK budget what-if simulator (tax, spending, structural levers, multi-year path)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API.
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        bind: IpAddr,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Run one simulation and print it.
    Run(RunArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
    Summary,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,
}

/// Policy levers in the units a user types: percentage points for tax rates,
/// percent for every change and lever.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct PolicyArgs {
    #[arg(long, default_value_t = 20.0, help = "Basic income tax rate in percent")]
    pub income_basic: f64,
    #[arg(long, default_value_t = 40.0, help = "Higher income tax rate in percent")]
    pub income_higher: f64,
    #[arg(long, default_value_t = 45.0, help = "Additional income tax rate in percent")]
    pub income_additional: f64,
    #[arg(long, default_value_t = 25.0, help = "Corporation tax rate in percent")]
    pub corp_rate: f64,
    #[arg(long, default_value_t = 20.0, help = "VAT rate in percent")]
    pub vat_rate: f64,

    #[arg(long, default_value_t = 0.0, help = "Change in NIC receipts in percent")]
    pub nic_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub cgt_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub iht_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub fuel_duty_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub alcohol_duty_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub stamp_duty_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub council_tax_change: f64,
    #[arg(long, default_value_t = 0.0, help = "Annual wealth tax rate in percent")]
    pub wealth_tax_rate: f64,

    #[arg(long, default_value_t = 0.0, help = "Health spending change in percent")]
    pub health_spend_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub education_spend_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub defence_spend_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub pensions_spend_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub welfare_spend_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub transport_spend_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub housing_spend_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub environment_spend_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub foreign_aid_spend_change: f64,
    #[arg(long, default_value_t = 0.0)]
    pub infrastructure_spend_change: f64,

    #[arg(
        long,
        default_value_t = 5.1,
        help = "Target deficit in percent of GDP"
    )]
    pub target_deficit: f64,
    #[arg(long, default_value_t = 0.0, help = "Minimum wage change in percent")]
    pub min_wage_change: f64,
    #[arg(long, default_value_t = 60.0)]
    pub immigration_level: f64,
    #[arg(long, default_value_t = 0.0)]
    pub business_incentives: f64,
    #[arg(long, default_value_t = 50.0)]
    pub trade_openness: f64,
    #[arg(long, default_value_t = 0.0)]
    pub carbon_tax_level: f64,
    #[arg(long, default_value_t = 50.0)]
    pub regulation_burden: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "External shock intensity in percent (0-100)"
    )]
    pub shock_intensity: f64,

    #[arg(long, default_value_t = 5, help = "Projection horizon in years (1-50)")]
    pub years: u32,
    #[arg(long, help = "Draw a random external shock for year 1")]
    pub shocks: bool,
    #[arg(long, help = "Seed for the shock draw")]
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    income_basic: Option<f64>,
    income_higher: Option<f64>,
    income_additional: Option<f64>,
    corp_rate: Option<f64>,
    vat_rate: Option<f64>,

    nic_change: Option<f64>,
    cgt_change: Option<f64>,
    iht_change: Option<f64>,
    fuel_duty_change: Option<f64>,
    alcohol_duty_change: Option<f64>,
    stamp_duty_change: Option<f64>,
    council_tax_change: Option<f64>,
    wealth_tax_rate: Option<f64>,

    health_spend_change: Option<f64>,
    education_spend_change: Option<f64>,
    defence_spend_change: Option<f64>,
    pensions_spend_change: Option<f64>,
    welfare_spend_change: Option<f64>,
    transport_spend_change: Option<f64>,
    housing_spend_change: Option<f64>,
    environment_spend_change: Option<f64>,
    foreign_aid_spend_change: Option<f64>,
    infrastructure_spend_change: Option<f64>,

    target_deficit: Option<f64>,
    min_wage_change: Option<f64>,
    immigration_level: Option<f64>,
    business_incentives: Option<f64>,
    trade_openness: Option<f64>,
    carbon_tax_level: Option<f64>,
    regulation_burden: Option<f64>,
    shock_intensity: Option<f64>,

    years: Option<u32>,
    shocks: Option<bool>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ComparePayload {
    current: SimulatePayload,
    comparison: SimulatePayload,
}

/// A validated run: the core's fractional policy plus horizon and shock options.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub policy: Policy,
    pub horizon_years: u32,
    pub options: SimulationOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    policy: Policy,
    result: SimulationResult,
    narrative: Narrative,
}

#[derive(Debug, Serialize)]
struct CompareResponse {
    current: SimulateResponse,
    comparison: SimulateResponse,
    delta: Comparison,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Converts user units to the core's fractions, rejecting values the core
/// cannot give a meaningful answer for.
pub fn build_policy(args: &PolicyArgs) -> Result<Policy, String> {
    let fields = [
        ("--income-basic", args.income_basic),
        ("--income-higher", args.income_higher),
        ("--income-additional", args.income_additional),
        ("--corp-rate", args.corp_rate),
        ("--vat-rate", args.vat_rate),
        ("--nic-change", args.nic_change),
        ("--cgt-change", args.cgt_change),
        ("--iht-change", args.iht_change),
        ("--fuel-duty-change", args.fuel_duty_change),
        ("--alcohol-duty-change", args.alcohol_duty_change),
        ("--stamp-duty-change", args.stamp_duty_change),
        ("--council-tax-change", args.council_tax_change),
        ("--wealth-tax-rate", args.wealth_tax_rate),
        ("--health-spend-change", args.health_spend_change),
        ("--education-spend-change", args.education_spend_change),
        ("--defence-spend-change", args.defence_spend_change),
        ("--pensions-spend-change", args.pensions_spend_change),
        ("--welfare-spend-change", args.welfare_spend_change),
        ("--transport-spend-change", args.transport_spend_change),
        ("--housing-spend-change", args.housing_spend_change),
        ("--environment-spend-change", args.environment_spend_change),
        ("--foreign-aid-spend-change", args.foreign_aid_spend_change),
        ("--infrastructure-spend-change", args.infrastructure_spend_change),
        ("--target-deficit", args.target_deficit),
        ("--min-wage-change", args.min_wage_change),
        ("--immigration-level", args.immigration_level),
        ("--business-incentives", args.business_incentives),
        ("--trade-openness", args.trade_openness),
        ("--carbon-tax-level", args.carbon_tax_level),
        ("--regulation-burden", args.regulation_burden),
        ("--shock-intensity", args.shock_intensity),
    ];
    if let Some((flag, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
        return Err(format!("{flag} must be a finite number"));
    }

    let rates = [
        ("--income-basic", args.income_basic),
        ("--income-higher", args.income_higher),
        ("--income-additional", args.income_additional),
        ("--corp-rate", args.corp_rate),
        ("--vat-rate", args.vat_rate),
        ("--wealth-tax-rate", args.wealth_tax_rate),
    ];
    if let Some((flag, _)) = rates.iter().find(|(_, value)| *value < 0.0) {
        return Err(format!("{flag} must be >= 0"));
    }

    if !(0.0..=100.0).contains(&args.shock_intensity) {
        return Err("--shock-intensity must be between 0 and 100".to_string());
    }

    Ok(Policy {
        income_basic: args.income_basic,
        income_higher: args.income_higher,
        income_additional: args.income_additional,
        corp_rate: args.corp_rate,
        vat_rate: args.vat_rate,
        nic_change: args.nic_change / 100.0,
        cgt_change: args.cgt_change / 100.0,
        iht_change: args.iht_change / 100.0,
        fuel_duty_change: args.fuel_duty_change / 100.0,
        alcohol_duty_change: args.alcohol_duty_change / 100.0,
        stamp_duty_change: args.stamp_duty_change / 100.0,
        council_tax_change: args.council_tax_change / 100.0,
        wealth_tax_rate: args.wealth_tax_rate / 100.0,
        spend_changes: SpendChanges {
            health: args.health_spend_change / 100.0,
            education: args.education_spend_change / 100.0,
            defence: args.defence_spend_change / 100.0,
            pensions: args.pensions_spend_change / 100.0,
            welfare: args.welfare_spend_change / 100.0,
            transport: args.transport_spend_change / 100.0,
            housing: args.housing_spend_change / 100.0,
            environment: args.environment_spend_change / 100.0,
            foreign_aid: args.foreign_aid_spend_change / 100.0,
            infrastructure: args.infrastructure_spend_change / 100.0,
        },
        target_deficit_pct: args.target_deficit / 100.0,
        min_wage_change: args.min_wage_change / 100.0,
        immigration_level: args.immigration_level / 100.0,
        business_incentives: args.business_incentives / 100.0,
        trade_openness: args.trade_openness / 100.0,
        carbon_tax_level: args.carbon_tax_level / 100.0,
        regulation_burden: args.regulation_burden / 100.0,
        shock_intensity: args.shock_intensity / 100.0,
    })
}

pub fn build_request(args: &PolicyArgs) -> Result<SimulationRequest, String> {
    if args.years == 0 || args.years > MAX_HORIZON_YEARS {
        return Err(format!("--years must be between 1 and {MAX_HORIZON_YEARS}"));
    }
    Ok(SimulationRequest {
        policy: build_policy(args)?,
        horizon_years: args.years,
        options: SimulationOptions {
            shocks_enabled: args.shocks,
            seed: args.seed,
        },
    })
}

fn simulate(request: SimulationRequest) -> Result<SimulateResponse, String> {
    let result = run_simulation(&request.policy, request.horizon_years, request.options)
        .map_err(|e| e.to_string())?;
    let narrative = narrate(&result, &Parameters::STANDARD);
    Ok(SimulateResponse {
        policy: request.policy,
        result,
        narrative,
    })
}

/// Output of the `run` subcommand, rendered in the requested format.
pub fn run_once(args: &RunArgs) -> Result<String, String> {
    let response = simulate(build_request(&args.policy)?)?;
    match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&response)
            .map_err(|e| format!("Failed to serialize result: {e}")),
        OutputFormat::Csv => Ok(to_csv(&response.result)),
        OutputFormat::Summary => Ok(response.narrative.text),
    }
}

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route("/api/compare", post(compare_handler))
        .route(
            "/api/export.csv",
            get(export_get_handler).post(export_post_handler),
        )
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(bind: IpAddr, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::new(bind, port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "budget simulator API listening");

    axum::serve(listener, router()).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload).await
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return rejected("simulate", &msg),
    };
    tracing::info!(
        years = request.horizon_years,
        shocks = request.options.shocks_enabled,
        "simulate request"
    );

    match simulate(request) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => rejected("simulate", &msg),
    }
}

async fn compare_handler(Json(payload): Json<ComparePayload>) -> Response {
    let current = match api_request_from_payload(payload.current) {
        Ok(request) => request,
        Err(msg) => return rejected("compare", &format!("current: {msg}")),
    };
    let comparison = match api_request_from_payload(payload.comparison) {
        Ok(request) => request,
        Err(msg) => return rejected("compare", &format!("comparison: {msg}")),
    };
    tracing::info!(
        current_years = current.horizon_years,
        comparison_years = comparison.horizon_years,
        "compare request"
    );

    let current = match simulate(current) {
        Ok(response) => response,
        Err(msg) => return rejected("compare", &msg),
    };
    let comparison = match simulate(comparison) {
        Ok(response) => response,
        Err(msg) => return rejected("compare", &msg),
    };
    let delta = compare(&current.result, &comparison.result);
    json_response(
        StatusCode::OK,
        CompareResponse {
            current,
            comparison,
            delta,
        },
    )
}

async fn export_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    export_handler_impl(payload).await
}

async fn export_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    export_handler_impl(payload).await
}

async fn export_handler_impl(payload: SimulatePayload) -> Response {
    let response = match api_request_from_payload(payload).and_then(simulate) {
        Ok(response) => response,
        Err(msg) => return rejected("export", &msg),
    };
    tracing::info!(years = response.result.years.len(), "export request");
    with_cache_control((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"uk_budget_simulation.csv\"",
            ),
        ],
        to_csv(&response.result),
    ))
}

fn rejected(route: &'static str, msg: &str) -> Response {
    tracing::warn!(route, error = msg, "rejected request");
    error_response(StatusCode::BAD_REQUEST, msg)
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
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
fn api_request_from_json(json: &str) -> Result<SimulationRequest, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<SimulationRequest, String> {
    let mut args = default_policy_args();

    if let Some(v) = payload.income_basic {
        args.income_basic = v;
    }
    if let Some(v) = payload.income_higher {
        args.income_higher = v;
    }
    if let Some(v) = payload.income_additional {
        args.income_additional = v;
    }
    if let Some(v) = payload.corp_rate {
        args.corp_rate = v;
    }
    if let Some(v) = payload.vat_rate {
        args.vat_rate = v;
    }
    if let Some(v) = payload.nic_change {
        args.nic_change = v;
    }
    if let Some(v) = payload.cgt_change {
        args.cgt_change = v;
    }
    if let Some(v) = payload.iht_change {
        args.iht_change = v;
    }
    if let Some(v) = payload.fuel_duty_change {
        args.fuel_duty_change = v;
    }
    if let Some(v) = payload.alcohol_duty_change {
        args.alcohol_duty_change = v;
    }
    if let Some(v) = payload.stamp_duty_change {
        args.stamp_duty_change = v;
    }
    if let Some(v) = payload.council_tax_change {
        args.council_tax_change = v;
    }
    if let Some(v) = payload.wealth_tax_rate {
        args.wealth_tax_rate = v;
    }

    if let Some(v) = payload.health_spend_change {
        args.health_spend_change = v;
    }
    if let Some(v) = payload.education_spend_change {
        args.education_spend_change = v;
    }
    if let Some(v) = payload.defence_spend_change {
        args.defence_spend_change = v;
    }
    if let Some(v) = payload.pensions_spend_change {
        args.pensions_spend_change = v;
    }
    if let Some(v) = payload.welfare_spend_change {
        args.welfare_spend_change = v;
    }
    if let Some(v) = payload.transport_spend_change {
        args.transport_spend_change = v;
    }
    if let Some(v) = payload.housing_spend_change {
        args.housing_spend_change = v;
    }
    if let Some(v) = payload.environment_spend_change {
        args.environment_spend_change = v;
    }
    if let Some(v) = payload.foreign_aid_spend_change {
        args.foreign_aid_spend_change = v;
    }
    if let Some(v) = payload.infrastructure_spend_change {
        args.infrastructure_spend_change = v;
    }

    if let Some(v) = payload.target_deficit {
        args.target_deficit = v;
    }
    if let Some(v) = payload.min_wage_change {
        args.min_wage_change = v;
    }
    if let Some(v) = payload.immigration_level {
        args.immigration_level = v;
    }
    if let Some(v) = payload.business_incentives {
        args.business_incentives = v;
    }
    if let Some(v) = payload.trade_openness {
        args.trade_openness = v;
    }
    if let Some(v) = payload.carbon_tax_level {
        args.carbon_tax_level = v;
    }
    if let Some(v) = payload.regulation_burden {
        args.regulation_burden = v;
    }
    if let Some(v) = payload.shock_intensity {
        args.shock_intensity = v;
    }

    if let Some(v) = payload.years {
        args.years = v;
    }
    if let Some(v) = payload.shocks {
        args.shocks = v;
    }
    if payload.seed.is_some() {
        args.seed = payload.seed;
    }

    build_request(&args).map_err(|msg| msg.replace("--", ""))
}

fn default_policy_args() -> PolicyArgs {
    PolicyArgs {
        income_basic: 20.0,
        income_higher: 40.0,
        income_additional: 45.0,
        corp_rate: 25.0,
        vat_rate: 20.0,
        nic_change: 0.0,
        cgt_change: 0.0,
        iht_change: 0.0,
        fuel_duty_change: 0.0,
        alcohol_duty_change: 0.0,
        stamp_duty_change: 0.0,
        council_tax_change: 0.0,
        wealth_tax_rate: 0.0,
        health_spend_change: 0.0,
        education_spend_change: 0.0,
        defence_spend_change: 0.0,
        pensions_spend_change: 0.0,
        welfare_spend_change: 0.0,
        transport_spend_change: 0.0,
        housing_spend_change: 0.0,
        environment_spend_change: 0.0,
        foreign_aid_spend_change: 0.0,
        infrastructure_spend_change: 0.0,
        target_deficit: 5.1,
        min_wage_change: 0.0,
        immigration_level: 60.0,
        business_incentives: 0.0,
        trade_openness: 50.0,
        carbon_tax_level: 0.0,
        regulation_burden: 50.0,
        shock_intensity: 0.0,
        years: 5,
        shocks: false,
        seed: None,
    }
}
