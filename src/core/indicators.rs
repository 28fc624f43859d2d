use super::params::Parameters;
use super::types::{Indicators, Policy, Shock, SpendCategory, SpendResult};

const BASE_POVERTY: f64 = 0.18;
const BASE_GINI: f64 = 0.35;
const BASE_HOMELESS: f64 = 1.0;
const BASE_FOODBANK: f64 = 1.0;
const BASE_LIFE_EXPECTANCY: f64 = 81.0;

/// Final-year state the indicator formulas read.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorInputs<'a> {
    pub policy: &'a Policy,
    pub spend: &'a SpendResult,
    pub shock: &'a Shock,
    pub gdp_growth: f64,
    pub unemployment: f64,
    pub inflation: f64,
    pub debt_to_gdp: f64,
    pub deficit_to_gdp: f64,
}

/// Fractional change of a category's final spend against its unmodified baseline line.
pub fn spend_change(spend: &SpendResult, params: &Parameters, category: SpendCategory) -> f64 {
    let shares = &params.spend_shares;
    let share = match category {
        SpendCategory::Health => shares.health,
        SpendCategory::Education => shares.education,
        SpendCategory::Defence => shares.defence,
        SpendCategory::Pensions => shares.pensions,
        SpendCategory::Welfare => shares.welfare,
        SpendCategory::Transport => shares.transport,
        SpendCategory::Housing => shares.housing,
        SpendCategory::Environment => shares.environment,
        SpendCategory::ForeignAid => shares.foreign_aid,
        SpendCategory::Infrastructure => shares.infrastructure,
    };
    spend.breakdown.category(category) / (params.baseline.base_spend() * share) - 1.0
}

pub fn compute_indicators(inputs: &IndicatorInputs<'_>, params: &Parameters) -> Indicators {
    let baseline = &params.baseline;
    let policy = inputs.policy;
    let change = |category| spend_change(inputs.spend, params, category);

    let health = change(SpendCategory::Health);
    let education = change(SpendCategory::Education);
    let welfare = change(SpendCategory::Welfare);
    let housing = change(SpendCategory::Housing);
    let infrastructure = change(SpendCategory::Infrastructure);
    let environment = change(SpendCategory::Environment);
    let pensions = change(SpendCategory::Pensions);

    let growth_gap = inputs.gdp_growth - baseline.real_gdp_growth;
    let unemp_gap = inputs.unemployment - baseline.unemployment;
    let corp_gap_10pp = (policy.corp_rate - 25.0) / 10.0;
    // Income rates arrive in percentage points.
    let basic_rate = policy.income_basic / 100.0;
    let additional_rate = policy.income_additional / 100.0;

    let business_formation_index = (100.0 + 40.0 * growth_gap * 100.0
        + 25.0 * (policy.business_incentives - 0.5)
        - 20.0 * corp_gap_10pp
        - 10.0 * (policy.regulation_burden - 0.5))
        .clamp(50.0, 160.0);

    let fdi_index = (100.0 + 30.0 * (policy.trade_openness - 0.5)
        + 20.0 * (policy.business_incentives - 0.5)
        - 25.0 * corp_gap_10pp
        - 10.0 * inputs.shock.risk)
        .clamp(50.0, 160.0);

    let startup_index = (100.0 + 25.0 * (policy.business_incentives - 0.5) + 15.0 * education
        - 10.0 * (policy.regulation_burden - 0.5))
        .clamp(60.0, 160.0);

    let non_dom_flow = (-5.0 * (additional_rate - 0.45) * 100.0
        - 3.0 * policy.wealth_tax_rate * 100.0)
        .clamp(-50.0, 50.0);

    let poverty_rate = (BASE_POVERTY + 0.4 * unemp_gap + 0.2 * inputs.inflation
        - 0.2 * welfare
        - 0.05 * pensions)
        .clamp(0.10, 0.30);
    let poverty_gap = poverty_rate - BASE_POVERTY;

    let gini = (BASE_GINI + 0.05 * (basic_rate - 0.2) - 0.1 * welfare
        + 0.02 * (policy.trade_openness - 0.5))
        .clamp(0.28, 0.42);

    let homeless_idx = (BASE_HOMELESS - 2.0 * housing + 3.0 * unemp_gap).clamp(0.6, 1.6);

    let foodbank_idx = (BASE_FOODBANK + 4.0 * poverty_gap).clamp(0.7, 1.8);

    let nhs_wait_index =
        (100.0 - 40.0 * health + 20.0 * (inputs.inflation - baseline.inflation)).clamp(60.0, 140.0);

    let life_expectancy =
        (BASE_LIFE_EXPECTANCY + 0.3 * health - 0.2 * poverty_gap).clamp(79.0, 83.0);

    let school_perf_index =
        (100.0 + 30.0 * education - 5.0 * poverty_gap * 100.0).clamp(80.0, 120.0);

    let apprenticeship_index =
        (100.0 + 20.0 * education + 10.0 * policy.business_incentives).clamp(80.0, 140.0);

    let emissions_change =
        (-0.5 * policy.carbon_tax_level - 0.3 * environment).clamp(-0.5, 0.2);

    let renewables_share =
        (0.4 + 0.3 * environment + 0.2 * policy.carbon_tax_level).clamp(0.2, 0.8);

    let energy_price_index = (100.0 + 50.0 * policy.carbon_tax_level).clamp(80.0, 170.0);

    let air_quality_index = (80.0 - 30.0 * emissions_change).clamp(60.0, 120.0);

    let house_price_growth =
        (0.02 + 0.5 * inputs.gdp_growth - 0.3 * housing).clamp(-0.05, 0.10);

    let rent_affordability = (0.30 + 0.1 * poverty_gap - 0.05 * housing).clamp(0.2, 0.4);

    let housing_supply_index = (100.0 + 40.0 * housing + 20.0 * infrastructure).clamp(70.0, 160.0);

    let fuel_poverty_rate =
        (0.12 + 0.3 * (energy_price_index - 100.0) / 100.0 - 0.1 * welfare).clamp(0.05, 0.25);

    let trade_balance =
        (-0.02 + 0.03 * (policy.trade_openness - 0.5) + 0.01 * growth_gap).clamp(-0.05, 0.03);

    let tourism_index = (100.0 + 20.0 * (policy.trade_openness - 0.5)
        + 10.0 * growth_gap * 100.0)
        .clamp(80.0, 130.0);

    let unrest_risk = (0.2 + 0.5 * poverty_gap + 0.4 * unemp_gap
        + 0.3 * (policy.regulation_burden - 0.5)
        - 0.3 * welfare)
        .clamp(0.0, 1.0);

    let brain_drain_risk = (0.2 + 0.5 * (additional_rate - 0.45) + 0.4 * policy.wealth_tax_rate
        - 0.2 * (policy.business_incentives - 0.5))
        .clamp(0.0, 1.0);

    Indicators {
        business_formation_index,
        fdi_index,
        startup_index,
        non_dom_flow,
        poverty_rate,
        gini,
        homeless_idx,
        foodbank_idx,
        nhs_wait_index,
        life_expectancy,
        school_perf_index,
        apprenticeship_index,
        emissions_change,
        renewables_share,
        energy_price_index,
        air_quality_index,
        house_price_growth,
        rent_affordability,
        housing_supply_index,
        fuel_poverty_rate,
        trade_balance,
        tourism_index,
        unrest_risk,
        brain_drain_risk,
    }
}

impl Indicators {
    /// Every indicator with its inclusive clamp band.
    pub fn banded(&self) -> [(&'static str, f64, f64, f64); 24] {
        [
            ("businessFormationIndex", self.business_formation_index, 50.0, 160.0),
            ("fdiIndex", self.fdi_index, 50.0, 160.0),
            ("startupIndex", self.startup_index, 60.0, 160.0),
            ("nonDomFlow", self.non_dom_flow, -50.0, 50.0),
            ("povertyRate", self.poverty_rate, 0.10, 0.30),
            ("gini", self.gini, 0.28, 0.42),
            ("homelessIdx", self.homeless_idx, 0.6, 1.6),
            ("foodbankIdx", self.foodbank_idx, 0.7, 1.8),
            ("nhsWaitIndex", self.nhs_wait_index, 60.0, 140.0),
            ("lifeExpectancy", self.life_expectancy, 79.0, 83.0),
            ("schoolPerfIndex", self.school_perf_index, 80.0, 120.0),
            ("apprenticeshipIndex", self.apprenticeship_index, 80.0, 140.0),
            ("emissionsChange", self.emissions_change, -0.5, 0.2),
            ("renewablesShare", self.renewables_share, 0.2, 0.8),
            ("energyPriceIndex", self.energy_price_index, 80.0, 170.0),
            ("airQualityIndex", self.air_quality_index, 60.0, 120.0),
            ("housePriceGrowth", self.house_price_growth, -0.05, 0.10),
            ("rentAffordability", self.rent_affordability, 0.2, 0.4),
            ("housingSupplyIndex", self.housing_supply_index, 70.0, 160.0),
            ("fuelPovertyRate", self.fuel_poverty_rate, 0.05, 0.25),
            ("tradeBalance", self.trade_balance, -0.05, 0.03),
            ("tourismIndex", self.tourism_index, 80.0, 130.0),
            ("unrestRisk", self.unrest_risk, 0.0, 1.0),
            ("brainDrainRisk", self.brain_drain_risk, 0.0, 1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spending::compute_spending;
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn indicators_for(policy: &Policy, growth: f64, unemployment: f64, inflation: f64) -> Indicators {
        let params = Parameters::STANDARD;
        let spend = compute_spending(policy, &params);
        let shock = Shock::calm();
        let inputs = IndicatorInputs {
            policy,
            spend: &spend,
            shock: &shock,
            gdp_growth: growth,
            unemployment,
            inflation,
            debt_to_gdp: params.baseline.debt_to_gdp,
            deficit_to_gdp: params.baseline.deficit_to_gdp(),
        };
        compute_indicators(&inputs, &params)
    }

    fn baseline_indicators() -> Indicators {
        let b = Parameters::STANDARD.baseline;
        indicators_for(
            &Policy::baseline(&Parameters::STANDARD),
            b.real_gdp_growth,
            b.unemployment,
            b.inflation,
        )
    }

    #[test]
    fn spend_change_is_zero_for_unchanged_lines() {
        let params = Parameters::STANDARD;
        let spend = compute_spending(&Policy::baseline(&params), &params);
        for category in SpendCategory::ALL {
            assert_approx(spend_change(&spend, &params, category), 0.0);
        }
    }

    #[test]
    fn spend_change_recovers_policy_change() {
        let params = Parameters::STANDARD;
        let mut policy = Policy::baseline(&params);
        policy.spend_changes.housing = 0.25;
        let spend = compute_spending(&policy, &params);
        assert_approx(spend_change(&spend, &params, SpendCategory::Housing), 0.25);
    }

    #[test]
    fn baseline_state_gives_reference_values() {
        let i = baseline_indicators();
        // 0.18 + 0.2 * 0.02 inflation term.
        assert_approx(i.poverty_rate, 0.184);
        assert_approx(i.gini, 0.35);
        assert_approx(i.nhs_wait_index, 100.0);
        assert_approx(i.energy_price_index, 100.0);
        assert_approx(i.emissions_change, 0.0);
        assert_approx(i.air_quality_index, 80.0);
        assert_approx(i.homeless_idx, 1.0);
        assert_approx(i.non_dom_flow, 0.0);
        assert_approx(i.housing_supply_index, 100.0);
        assert_approx(i.trade_balance, -0.02);
        assert_approx(i.foodbank_idx, 1.0 + 4.0 * 0.004);
    }

    #[test]
    fn health_spending_shortens_waits_and_extends_life() {
        let b = Parameters::STANDARD.baseline;
        let mut policy = Policy::baseline(&Parameters::STANDARD);
        policy.spend_changes.health = 0.5;
        let i = indicators_for(&policy, b.real_gdp_growth, b.unemployment, b.inflation);
        assert_approx(i.nhs_wait_index, 80.0);
        assert!(i.life_expectancy > baseline_indicators().life_expectancy);
    }

    #[test]
    fn carbon_tax_raises_energy_prices_and_cuts_emissions() {
        let b = Parameters::STANDARD.baseline;
        let mut policy = Policy::baseline(&Parameters::STANDARD);
        policy.carbon_tax_level = 1.0;
        let i = indicators_for(&policy, b.real_gdp_growth, b.unemployment, b.inflation);
        assert_approx(i.energy_price_index, 150.0);
        assert_approx(i.emissions_change, -0.5);
        assert_approx(i.air_quality_index, 95.0);
        assert_approx(i.renewables_share, 0.6);
    }

    #[test]
    fn shock_risk_lowers_fdi() {
        let params = Parameters::STANDARD;
        let policy = Policy::baseline(&params);
        let spend = compute_spending(&policy, &params);
        let calm = Shock::calm();
        let risky = Shock::scaled(crate::core::types::ShockScenario::FinancialWobble, 1.0);
        let build = |shock: &Shock| {
            compute_indicators(
                &IndicatorInputs {
                    policy: &policy,
                    spend: &spend,
                    shock,
                    gdp_growth: params.baseline.real_gdp_growth,
                    unemployment: params.baseline.unemployment,
                    inflation: params.baseline.inflation,
                    debt_to_gdp: params.baseline.debt_to_gdp,
                    deficit_to_gdp: 0.051,
                },
                &params,
            )
        };
        assert_approx(build(&calm).fdi_index - build(&risky).fdi_index, 3.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(96))]

        #[test]
        fn prop_every_indicator_stays_in_band(
            lever in -3.0f64..3.0,
            rate in -100.0f64..200.0,
            change in -2.0f64..5.0,
            growth in -0.05f64..0.06,
            unemployment in 0.025f64..0.15,
            inflation in 0.0f64..0.1
        ) {
            let mut policy = Policy::baseline(&Parameters::STANDARD);
            policy.income_basic = rate;
            policy.income_additional = rate;
            policy.corp_rate = rate;
            policy.wealth_tax_rate = lever;
            policy.business_incentives = lever;
            policy.trade_openness = -lever;
            policy.carbon_tax_level = lever;
            policy.regulation_burden = lever;
            for category in SpendCategory::ALL {
                policy.spend_changes.set(category, change);
            }

            let i = indicators_for(&policy, growth, unemployment, inflation);
            for (label, value, lo, hi) in i.banded() {
                prop_assert!(value >= lo && value <= hi, "{label} = {value} outside [{lo}, {hi}]");
            }
        }
    }
}
