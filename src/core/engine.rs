use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::{Result, SimulationError};
use super::indicators::{IndicatorInputs, compute_indicators};
use super::params::Parameters;
use super::revenue::compute_revenue;
use super::shock::draw_shock;
use super::spending::{apply_deficit_target, compute_spending};
use super::types::{Policy, Shock, SimulationOptions, SimulationResult, SpendResult, TaxResult};

const GROWTH_MIN: f64 = -0.05;
const GROWTH_MAX: f64 = 0.06;
const UNEMPLOYMENT_MIN: f64 = 0.025;
const UNEMPLOYMENT_MAX: f64 = 0.15;
const INFLATION_MIN: f64 = 0.0;
const INFLATION_MAX: f64 = 0.1;
const INTEREST_MIN: f64 = 0.01;
const INTEREST_MAX: f64 = 0.08;

const OKUN_COEFFICIENT: f64 = 0.4;
const DEMAND_INFLATION_PASS_THROUGH: f64 = 0.8;
const PHILLIPS_COEFFICIENT: f64 = 0.4;
const CARBON_INFLATION: f64 = 0.007;

const NEUTRAL_POLICY_RATE: f64 = 0.03;
const INFLATION_TARGET: f64 = 0.02;
const RATE_INFLATION_RESPONSE: f64 = 0.6;
const RATE_DEFICIT_RESPONSE: f64 = 0.05;

const MIN_WAGE_JOB_LOSS_THRESHOLD: f64 = 0.2;
const MIN_WAGE_JOB_LOSS_RATE: f64 = 0.01;

/// Growth adjustments fixed once from the year-1 fiscal position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthTerms {
    pub demand_shock: f64,
    pub structural_short: f64,
    pub structural_long_run: f64,
}

/// Growth-channel minimum wage effect. Rises up to 5% are absorbed with a
/// mild boost; above that each point costs growth; cuts of 2% or more do nothing.
pub fn min_wage_growth_effect(min_wage_change: f64) -> f64 {
    if min_wage_change > 0.05 {
        -0.004 * (min_wage_change - 0.05)
    } else if min_wage_change > -0.02 {
        0.002 * min_wage_change
    } else {
        0.0
    }
}

/// Supply-side growth adjustment from the non-fiscal levers.
pub fn structural_short_run(policy: &Policy) -> f64 {
    let corp_penalty = 0.002 * ((policy.corp_rate - 25.0) / 10.0);
    let regulation_penalty = 0.005 * (policy.regulation_burden - 0.5);
    let incentives_boost = 0.006 * (policy.business_incentives - 0.5);
    let trade_boost = 0.004 * (policy.trade_openness - 0.5);
    let immigration_boost = 0.005 * (policy.immigration_level - 0.6);
    let carbon_drag = -0.003 * policy.carbon_tax_level;

    -corp_penalty - regulation_penalty
        + incentives_boost
        + trade_boost
        + immigration_boost
        + min_wage_growth_effect(policy.min_wage_change)
        + carbon_drag
}

/// Productivity boost from education and infrastructure that arrives by the final year.
pub fn structural_long_run(policy: &Policy) -> f64 {
    0.5 * (policy.spend_changes.education + policy.spend_changes.infrastructure)
}

/// Fiscal impulse: spending and tax gaps to baseline as shares of GDP, times their multipliers.
pub fn demand_shock(tax: &TaxResult, spend: &SpendResult, params: &Parameters) -> f64 {
    let gdp = params.baseline.year_gdp;
    let delta_g = (spend.total - spend.base_spend) / gdp;
    let delta_t = (tax.total - tax.base_tax) / gdp;
    params.model.multiplier_g * delta_g - params.model.multiplier_t * delta_t
}

fn long_run_factor(year: u32, horizon_years: u32) -> f64 {
    if horizon_years > 1 {
        (year - 1) as f64 / (horizon_years - 1) as f64
    } else {
        0.0
    }
}

/// Macro state of one simulated year.
#[derive(Debug, Clone, Copy, PartialEq)]
struct YearOutcome {
    gdp_growth: f64,
    unemployment: f64,
    inflation: f64,
    interest_rate: f64,
}

fn year_outcome(
    params: &Parameters,
    policy: &Policy,
    terms: &GrowthTerms,
    shock: &Shock,
    long_run_factor: f64,
    first_year: bool,
    prior_deficit_to_gdp: f64,
) -> YearOutcome {
    let baseline = &params.baseline;
    let (shock_gdp, shock_unemp, shock_inflation) = if first_year {
        (shock.gdp_delta, shock.unemp_delta, shock.inflation_delta)
    } else {
        (0.0, 0.0, 0.0)
    };

    let gdp_growth = (baseline.real_gdp_growth
        + terms.demand_shock
        + terms.structural_short
        + terms.structural_long_run * long_run_factor
        + shock_gdp)
        .clamp(GROWTH_MIN, GROWTH_MAX);

    let mut unemployment = baseline.unemployment
        - OKUN_COEFFICIENT * (gdp_growth - baseline.real_gdp_growth)
        + shock_unemp;
    if policy.min_wage_change > MIN_WAGE_JOB_LOSS_THRESHOLD {
        unemployment += MIN_WAGE_JOB_LOSS_RATE * (policy.min_wage_change - MIN_WAGE_JOB_LOSS_THRESHOLD);
    }
    let unemployment = unemployment.clamp(UNEMPLOYMENT_MIN, UNEMPLOYMENT_MAX);

    let inflation = (baseline.inflation
        + DEMAND_INFLATION_PASS_THROUGH * terms.demand_shock
        + PHILLIPS_COEFFICIENT * (baseline.unemployment - unemployment)
        + CARBON_INFLATION * policy.carbon_tax_level
        + shock_inflation)
        .clamp(INFLATION_MIN, INFLATION_MAX);

    let interest_rate = (NEUTRAL_POLICY_RATE
        + RATE_INFLATION_RESPONSE * (inflation - INFLATION_TARGET)
        + RATE_DEFICIT_RESPONSE * (prior_deficit_to_gdp - baseline.real_gdp_growth))
        .clamp(INTEREST_MIN, INTEREST_MAX);

    YearOutcome {
        gdp_growth,
        unemployment,
        inflation,
        interest_rate,
    }
}

/// Runs a projection with the standard parameters.
///
/// With `options.seed` set the shock draw is reproducible; otherwise it uses
/// the thread-local generator.
pub fn run_simulation(
    policy: &Policy,
    horizon_years: u32,
    options: SimulationOptions,
) -> Result<SimulationResult> {
    let params = &Parameters::STANDARD;
    match options.seed {
        Some(seed) => run_simulation_with(
            params,
            policy,
            horizon_years,
            options.shocks_enabled,
            &mut StdRng::seed_from_u64(seed),
        ),
        None => run_simulation_with(
            params,
            policy,
            horizon_years,
            options.shocks_enabled,
            &mut rand::rng(),
        ),
    }
}

/// Draws the external shock from `rng`, then projects the path.
pub fn run_simulation_with<R: Rng + ?Sized>(
    params: &Parameters,
    policy: &Policy,
    horizon_years: u32,
    shocks_enabled: bool,
    rng: &mut R,
) -> Result<SimulationResult> {
    ensure_horizon(horizon_years)?;
    let shock = draw_shock(policy.shock_intensity, shocks_enabled, rng);
    project_path(params, policy, horizon_years, shock)
}

fn ensure_horizon(horizon_years: u32) -> Result<()> {
    if horizon_years < 1 {
        return Err(SimulationError::InvalidHorizon { horizon_years });
    }
    Ok(())
}

/// Year-by-year projection for a given external shock. Fully deterministic.
pub fn project_path(
    params: &Parameters,
    policy: &Policy,
    horizon_years: u32,
    shock: Shock,
) -> Result<SimulationResult> {
    ensure_horizon(horizon_years)?;
    let baseline = &params.baseline;
    let year_gdp = baseline.year_gdp;

    let tax = compute_revenue(policy, params);
    let unadjusted = compute_spending(policy, params);
    let adjustment = apply_deficit_target(
        &unadjusted,
        tax.total,
        policy.target_deficit_pct,
        year_gdp,
    );
    let spend = adjustment.spend;
    let mut deficit_to_gdp = (spend.total - tax.total) / year_gdp;
    tracing::debug!(
        gap = adjustment.gap,
        amount = adjustment.amount,
        deficit_to_gdp,
        "applied deficit target adjustment"
    );

    let terms = GrowthTerms {
        demand_shock: demand_shock(&tax, &spend, params),
        structural_short: structural_short_run(policy),
        structural_long_run: structural_long_run(policy),
    };
    tracing::debug!(
        demand_shock = terms.demand_shock,
        structural_short = terms.structural_short,
        structural_long_run = terms.structural_long_run,
        shock = shock.name,
        "growth terms fixed"
    );

    let capacity = horizon_years as usize;
    let mut years = Vec::with_capacity(capacity);
    let mut gdp_path = Vec::with_capacity(capacity);
    let mut unemp_path = Vec::with_capacity(capacity);
    let mut inflation_path = Vec::with_capacity(capacity);
    let mut deficit_path = Vec::with_capacity(capacity);
    let mut debt_path = Vec::with_capacity(capacity);

    let tax_factor = tax.total / tax.base_tax;
    let spend_factor = spend.total / spend.base_spend;

    let mut debt = baseline.debt_to_gdp * year_gdp;
    let mut gdp_level = year_gdp;
    let mut last_interest_rate = baseline.interest_rate;
    let mut last_interest_cost = 0.0;

    for year in 1..=horizon_years {
        let outcome = year_outcome(
            params,
            policy,
            &terms,
            &shock,
            long_run_factor(year, horizon_years),
            year == 1,
            deficit_to_gdp,
        );

        gdp_level *= 1.0 + outcome.gdp_growth;
        let scale = gdp_level / year_gdp;
        let tax_year = tax.base_tax * tax_factor * scale;
        let spend_year = spend.base_spend * spend_factor * scale;

        let deficit_year = spend_year - tax_year;
        let interest_cost = debt * outcome.interest_rate;
        debt += deficit_year + interest_cost;

        let debt_to_gdp_year = debt / gdp_level;
        let deficit_to_gdp_year = deficit_year / gdp_level;
        tracing::trace!(
            year,
            gdp_growth = outcome.gdp_growth,
            unemployment = outcome.unemployment,
            inflation = outcome.inflation,
            interest_rate = outcome.interest_rate,
            debt_to_gdp = debt_to_gdp_year,
            "projected year"
        );

        years.push(format!("Year {year}"));
        gdp_path.push(gdp_level);
        unemp_path.push(outcome.unemployment);
        inflation_path.push(outcome.inflation);
        deficit_path.push(deficit_to_gdp_year);
        debt_path.push(debt_to_gdp_year);

        deficit_to_gdp = deficit_to_gdp_year;
        last_interest_rate = outcome.interest_rate;
        last_interest_cost = interest_cost;
    }

    let last = capacity - 1;
    let final_gdp_growth = if last > 0 {
        gdp_path[last] / gdp_path[last - 1] - 1.0
    } else {
        baseline.real_gdp_growth
    };

    let indicators = compute_indicators(
        &IndicatorInputs {
            policy,
            spend: &spend,
            shock: &shock,
            gdp_growth: final_gdp_growth,
            unemployment: unemp_path[last],
            inflation: inflation_path[last],
            debt_to_gdp: debt_path[last],
            deficit_to_gdp: deficit_path[last],
        },
        params,
    );

    Ok(SimulationResult {
        final_gdp: gdp_path[last],
        final_unemp: unemp_path[last],
        final_inflation: inflation_path[last],
        final_deficit_to_gdp: deficit_path[last],
        final_debt_to_gdp: debt_path[last],
        final_gdp_growth,
        final_interest_rate: last_interest_rate,
        final_interest_cost: last_interest_cost,
        years,
        gdp_path,
        unemp_path,
        inflation_path,
        deficit_path,
        debt_path,
        tax,
        spend,
        indicators,
        shock,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ShockScenario;
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn baseline_policy() -> Policy {
        Policy::baseline(&Parameters::STANDARD)
    }

    fn deterministic(policy: &Policy, horizon_years: u32) -> SimulationResult {
        project_path(&Parameters::STANDARD, policy, horizon_years, Shock::calm())
            .expect("valid horizon")
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let err = run_simulation(&baseline_policy(), 0, SimulationOptions::default())
            .expect_err("horizon 0 must fail");
        assert_eq!(err, SimulationError::InvalidHorizon { horizon_years: 0 });
    }

    #[test]
    fn series_lengths_match_horizon() {
        for horizon in [1, 2, 5, 12] {
            let r = deterministic(&baseline_policy(), horizon);
            let n = horizon as usize;
            assert_eq!(r.years.len(), n);
            assert_eq!(r.gdp_path.len(), n);
            assert_eq!(r.unemp_path.len(), n);
            assert_eq!(r.inflation_path.len(), n);
            assert_eq!(r.deficit_path.len(), n);
            assert_eq!(r.debt_path.len(), n);
            assert_eq!(r.years[0], "Year 1");
            assert_eq!(r.years[n - 1], format!("Year {horizon}"));
        }
    }

    #[test]
    fn baseline_policy_keeps_pools_at_baseline() {
        let params = Parameters::STANDARD;
        let r = deterministic(&baseline_policy(), 3);
        assert_approx(r.tax.total, params.baseline.year_gdp * params.baseline.tax_to_gdp);
        assert_approx(r.spend.total, params.baseline.year_gdp * params.baseline.spend_to_gdp);
        assert_approx(r.spend.breakdown.other, params.baseline.base_spend() * 0.125);
    }

    #[test]
    fn oracle_one_year_baseline_debt_matches_hand_calculation() {
        // Growth terms for the baseline policy:
        //   structural short-run = 0.006 * (0 - 0.5) = -0.003, demand shock = 0
        //   growth = 0.010, unemployment = 0.045 + 0.4 * 0.003 = 0.0462
        //   inflation = 0.02 + 0.4 * (0.045 - 0.0462) = 0.01952
        //   interest = 0.03 + 0.6 * (0.01952 - 0.02) + 0.05 * (0.051 - 0.013) = 0.031612
        let params = Parameters::STANDARD;
        let r = deterministic(&baseline_policy(), 1);

        let gdp_level = 2884.0 * 1.01;
        let deficit_year = 0.051 * gdp_level;
        let start_debt = 0.945 * 2884.0;
        let interest_cost = start_debt * 0.031612;

        assert_approx(r.gdp_path[0], gdp_level);
        assert_approx(r.unemp_path[0], 0.0462);
        assert_approx(r.inflation_path[0], 0.01952);
        assert_approx(r.final_interest_rate, 0.031612);
        assert_approx(r.final_interest_cost, interest_cost);
        assert_approx(r.deficit_path[0], 0.051);
        assert_approx(
            r.debt_path[0],
            (start_debt + deficit_year + interest_cost) / gdp_level,
        );
        assert_approx(r.debt_path[0], 1.016_221_128_712_871_3);
        assert_approx(r.final_gdp_growth, params.baseline.real_gdp_growth);
    }

    #[test]
    fn deterministic_runs_are_bit_identical() {
        let mut policy = baseline_policy();
        policy.corp_rate = 31.0;
        policy.spend_changes.education = 0.1;
        policy.min_wage_change = 0.3;
        policy.shock_intensity = 0.8;
        let options = SimulationOptions {
            shocks_enabled: false,
            seed: None,
        };
        let a = run_simulation(&policy, 7, options).expect("valid");
        let b = run_simulation(&policy, 7, options).expect("valid");
        assert_eq!(a, b);
        assert_eq!(a.shock.scenario, ShockScenario::Calm);
    }

    #[test]
    fn seeded_shock_runs_are_reproducible() {
        let mut policy = baseline_policy();
        policy.shock_intensity = 1.0;
        let options = SimulationOptions {
            shocks_enabled: true,
            seed: Some(99),
        };
        let a = run_simulation(&policy, 4, options).expect("valid");
        let b = run_simulation(&policy, 4, options).expect("valid");
        assert_eq!(a, b);
        assert_ne!(a.shock.scenario, ShockScenario::Calm);
    }

    #[test]
    fn shock_only_moves_the_first_year() {
        let policy = baseline_policy();
        let params = Parameters::STANDARD;
        let calm = deterministic(&policy, 4);
        let boom = project_path(
            &params,
            &policy,
            4,
            Shock::scaled(ShockScenario::ProductivityBoom, 1.0),
        )
        .expect("valid");

        assert_approx(boom.gdp_path[0] / calm.gdp_path[0], 1.02 / 1.01);
        for year in 1..4 {
            assert_approx(boom.unemp_path[year], calm.unemp_path[year]);
            assert_approx(boom.inflation_path[year], calm.inflation_path[year]);
            assert_approx(
                boom.gdp_path[year] / boom.gdp_path[year - 1],
                calm.gdp_path[year] / calm.gdp_path[year - 1],
            );
        }
    }

    #[test]
    fn long_run_boost_ramps_from_zero_to_full() {
        assert_approx(long_run_factor(1, 1), 0.0);
        assert_approx(long_run_factor(1, 5), 0.0);
        assert_approx(long_run_factor(3, 5), 0.5);
        assert_approx(long_run_factor(5, 5), 1.0);

        let mut policy = baseline_policy();
        policy.spend_changes.education = 0.01;
        policy.spend_changes.infrastructure = 0.01;
        let base = deterministic(&baseline_policy(), 5);
        let invest = deterministic(&policy, 5);
        let growth = |r: &SimulationResult, y: usize| r.gdp_path[y] / r.gdp_path[y - 1] - 1.0;
        // The long-run term adds 0.01 by the final year on top of the demand effect.
        let early_gap = growth(&invest, 1) - growth(&base, 1);
        let late_gap = growth(&invest, 4) - growth(&base, 4);
        assert_approx(late_gap - early_gap, 0.01 * 0.75);
    }

    #[test]
    fn min_wage_growth_effect_has_threshold_bands() {
        assert_approx(min_wage_growth_effect(0.0), 0.0);
        assert_approx(min_wage_growth_effect(0.05), 0.0001);
        assert_approx(min_wage_growth_effect(0.15), -0.0004);
        assert_approx(min_wage_growth_effect(-0.01), -0.00002);
        assert_approx(min_wage_growth_effect(-0.02), 0.0);
        assert_approx(min_wage_growth_effect(-0.10), 0.0);
    }

    #[test]
    fn large_min_wage_rise_adds_direct_unemployment() {
        let mut below = baseline_policy();
        below.min_wage_change = 0.2;
        let mut above = baseline_policy();
        above.min_wage_change = 0.3;
        let r_below = deterministic(&below, 1);
        let r_above = deterministic(&above, 1);

        let growth_below = r_below.gdp_path[0] / 2884.0 - 1.0;
        let growth_above = r_above.gdp_path[0] / 2884.0 - 1.0;
        let okun = -0.4 * (growth_above - growth_below);
        assert_approx(r_above.unemp_path[0] - r_below.unemp_path[0], okun + 0.001);
    }

    #[test]
    fn structural_levers_at_neutral_are_neutral() {
        let mut policy = baseline_policy();
        policy.business_incentives = 0.5;
        assert_approx(structural_short_run(&policy), 0.0);

        policy.immigration_level = 0.5;
        assert_approx(structural_short_run(&policy), -0.0005);
    }

    #[test]
    fn demand_shock_weighs_spending_above_tax() {
        let params = Parameters::STANDARD;
        let mut policy = baseline_policy();
        policy.spend_changes.health = 0.1;
        let tax = compute_revenue(&policy, &params);
        let spend = compute_spending(&policy, &params);
        let delta_g = params.baseline.base_spend() * 0.19 * 0.1 / params.baseline.year_gdp;
        assert_approx(demand_shock(&tax, &spend, &params), 1.2 * delta_g);
    }

    #[test]
    fn deficit_feedback_saturates_two_points_short_of_target() {
        let params = Parameters::STANDARD;
        let mut policy = baseline_policy();
        policy.spend_changes.welfare = 0.5;
        policy.target_deficit_pct = 0.0;

        let tax = compute_revenue(&policy, &params);
        let unadjusted = compute_spending(&policy, &params);
        let raw_ratio = (unadjusted.total - tax.total) / params.baseline.year_gdp;
        assert!(raw_ratio > 0.02);

        let r = deterministic(&policy, 3);
        let adjusted_ratio = (r.spend.total - r.tax.total) / params.baseline.year_gdp;
        assert_approx(raw_ratio - adjusted_ratio, 0.02);
        assert!(r.spend.breakdown.other >= 0.0);
    }

    #[test]
    fn interest_uses_prior_year_deficit() {
        let r = deterministic(&baseline_policy(), 2);
        // Year 2 interest = 0.03 + 0.6 * (inflation - 0.02) + 0.05 * (year-1 deficit ratio - 0.013).
        let expected = 0.03 + 0.6 * (r.inflation_path[1] - 0.02) + 0.05 * (r.deficit_path[0] - 0.013);
        assert_approx(r.final_interest_rate, expected.clamp(0.01, 0.08));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_paths_respect_clamp_bands(
            seed in any::<u64>(),
            horizon in 1u32..15,
            rate in 0.0f64..80.0,
            change in -1.0f64..3.0,
            lever in -2.0f64..3.0,
            target in -0.2f64..0.3,
            intensity in 0.0f64..2.0
        ) {
            let mut policy = baseline_policy();
            policy.income_basic = rate;
            policy.income_higher = rate;
            policy.corp_rate = rate;
            policy.vat_rate = rate;
            policy.nic_change = change;
            policy.wealth_tax_rate = change / 10.0;
            policy.spend_changes.health = change;
            policy.spend_changes.education = -change;
            policy.spend_changes.infrastructure = change;
            policy.min_wage_change = lever;
            policy.immigration_level = lever;
            policy.business_incentives = lever;
            policy.trade_openness = -lever;
            policy.carbon_tax_level = lever;
            policy.regulation_burden = lever;
            policy.target_deficit_pct = target;
            policy.shock_intensity = intensity;

            let r = run_simulation(
                &policy,
                horizon,
                SimulationOptions { shocks_enabled: true, seed: Some(seed) },
            ).expect("valid horizon");

            prop_assert_eq!(r.gdp_path.len(), horizon as usize);
            let mut previous = Parameters::STANDARD.baseline.year_gdp;
            for y in 0..horizon as usize {
                let growth = r.gdp_path[y] / previous - 1.0;
                prop_assert!(growth >= -0.05 - 1e-12 && growth <= 0.06 + 1e-12, "growth {growth}");
                prop_assert!((0.025..=0.15).contains(&r.unemp_path[y]));
                prop_assert!((0.0..=0.1).contains(&r.inflation_path[y]));
                previous = r.gdp_path[y];
            }
            prop_assert!(r.spend.breakdown.other >= 0.0);
            for (label, value, lo, hi) in r.indicators.banded() {
                prop_assert!(value >= lo && value <= hi, "{label} = {value} outside [{lo}, {hi}]");
            }
        }
    }
}
