use super::params::{ModelParams, Parameters};
use super::types::{Policy, TaxBreakdown, TaxResult};

const BASIC_WEIGHT: f64 = 0.6;
const HIGHER_WEIGHT: f64 = 0.3;
const ADDITIONAL_WEIGHT: f64 = 0.1;

const BASE_INCOME_BASIC: f64 = 20.0;
const BASE_INCOME_HIGHER: f64 = 40.0;
const BASE_INCOME_ADDITIONAL: f64 = 45.0;
const BASE_CORP_RATE: f64 = 25.0;
const BASE_VAT_RATE: f64 = 20.0;

const CORP_FLIGHT_THRESHOLD: f64 = 28.0;
const CORP_FLIGHT_PENALTY_PER_10PP: f64 = 0.05;
const CORP_FACTOR_MIN: f64 = 0.5;
const CORP_FACTOR_MAX: f64 = 1.3;

const FUEL_PASS_THROUGH: f64 = 0.8;
const ALCOHOL_PASS_THROUGH: f64 = 0.7;
const STAMP_PASS_THROUGH: f64 = 0.6;
const COUNCIL_PASS_THROUGH: f64 = 0.95;

const WEALTH_TAX_YIELD: f64 = 0.3;
const INCENTIVE_DRAG_PER_UNIT: f64 = 0.05;

/// Per-line multipliers relative to the baseline tax pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevenueFactors {
    pub income: f64,
    pub corp: f64,
    pub vat: f64,
    pub nic: f64,
    pub cgt: f64,
    pub iht: f64,
    pub fuel: f64,
    pub alcohol: f64,
    pub stamp: f64,
    pub council: f64,
    pub incentive_drag: f64,
}

fn weighted_income_rate(basic: f64, higher: f64, additional: f64) -> f64 {
    BASIC_WEIGHT * basic + HIGHER_WEIGHT * higher + ADDITIONAL_WEIGHT * additional
}

// Rate indices are floored at zero so a negative rate yields a zero factor
// instead of a NaN from a fractional power.
fn elastic_factor(rate_index: f64, elasticity: f64) -> f64 {
    rate_index.max(0.0).powf(elasticity)
}

fn linear_factor(change: f64, pass_through: f64) -> f64 {
    1.0 + change * pass_through
}

pub fn income_revenue_factor(policy: &Policy, model: &ModelParams) -> f64 {
    let base = weighted_income_rate(
        BASE_INCOME_BASIC,
        BASE_INCOME_HIGHER,
        BASE_INCOME_ADDITIONAL,
    );
    let current = weighted_income_rate(
        policy.income_basic,
        policy.income_higher,
        policy.income_additional,
    );
    elastic_factor(current / base, model.income_elasticity)
}

pub fn corp_revenue_factor(corp_rate: f64, model: &ModelParams) -> f64 {
    let mut factor = elastic_factor(corp_rate / BASE_CORP_RATE, model.corp_elasticity);
    if corp_rate > CORP_FLIGHT_THRESHOLD {
        factor -= CORP_FLIGHT_PENALTY_PER_10PP * (corp_rate - CORP_FLIGHT_THRESHOLD) / 10.0;
    }
    factor.clamp(CORP_FACTOR_MIN, CORP_FACTOR_MAX)
}

pub fn revenue_factors(policy: &Policy, model: &ModelParams) -> RevenueFactors {
    RevenueFactors {
        income: income_revenue_factor(policy, model),
        corp: corp_revenue_factor(policy.corp_rate, model),
        vat: elastic_factor(policy.vat_rate / BASE_VAT_RATE, model.vat_elasticity),
        nic: linear_factor(policy.nic_change, model.nic_elasticity),
        cgt: linear_factor(policy.cgt_change, model.cgt_elasticity),
        iht: linear_factor(policy.iht_change, model.iht_elasticity),
        fuel: linear_factor(policy.fuel_duty_change, FUEL_PASS_THROUGH),
        alcohol: linear_factor(policy.alcohol_duty_change, ALCOHOL_PASS_THROUGH),
        stamp: linear_factor(policy.stamp_duty_change, STAMP_PASS_THROUGH),
        council: linear_factor(policy.council_tax_change, COUNCIL_PASS_THROUGH),
        incentive_drag: 1.0 - INCENTIVE_DRAG_PER_UNIT * policy.business_incentives,
    }
}

/// Total tax revenue and its twelve-line breakdown for `policy`.
pub fn compute_revenue(policy: &Policy, params: &Parameters) -> TaxResult {
    let base_tax = params.baseline.base_tax();
    let shares = &params.tax_shares;
    let f = revenue_factors(policy, &params.model);

    let breakdown = TaxBreakdown {
        income_tax: base_tax * shares.income * f.income * f.incentive_drag,
        nic_tax: base_tax * shares.nic * f.nic,
        vat_tax: base_tax * shares.vat * f.vat,
        corp_tax: base_tax * shares.company * f.corp * f.incentive_drag,
        other_indirect: base_tax * shares.other_indirect,
        cgt_tax: base_tax * shares.capital_gains * f.cgt,
        iht_tax: base_tax * shares.inheritance * f.iht,
        fuel_tax: base_tax * shares.fuel * f.fuel,
        alcohol_tax: base_tax * shares.alcohol_tobacco * f.alcohol,
        stamp_tax: base_tax * shares.stamp_duty * f.stamp,
        council_tax: base_tax * shares.council_tax * f.council,
        wealth_tax_revenue: params.baseline.year_gdp * (policy.wealth_tax_rate * WEALTH_TAX_YIELD),
    };

    TaxResult {
        total: breakdown.sum(),
        base_tax,
        breakdown,
    }
}
