use serde::Serialize;

use super::params::Parameters;
use super::types::SimulationResult;

/// Changes smaller than this against baseline read as "roughly the same".
const DIRECTION_DEAD_BAND: f64 = 0.002;
const DEBT_RISE_MARGIN: f64 = 0.03;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub text: String,
    pub upsides: Vec<&'static str>,
    pub risks: Vec<&'static str>,
}

/// Signed final-year differences, current minus comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub gdp_growth: f64,
    pub unemployment: f64,
    pub inflation: f64,
    pub deficit_to_gdp: f64,
    pub debt_to_gdp: f64,
    pub gdp: f64,
}

fn direction(change: f64) -> &'static str {
    if change > DIRECTION_DEAD_BAND {
        "increase"
    } else if change < -DIRECTION_DEAD_BAND {
        "fall"
    } else {
        "stay roughly the same"
    }
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

fn upsides(result: &SimulationResult) -> Vec<&'static str> {
    let ind = &result.indicators;
    let mut out = Vec::new();
    if ind.nhs_wait_index < 95.0 {
        out.push("shorter NHS waiting times");
    }
    if ind.poverty_rate < 0.17 {
        out.push("lower poverty");
    }
    if ind.trade_balance > -0.01 {
        out.push("a better trade balance");
    }
    if ind.housing_supply_index > 110.0 {
        out.push("more new homes being built");
    }
    out
}

fn risks(result: &SimulationResult, params: &Parameters) -> Vec<&'static str> {
    let ind = &result.indicators;
    let mut out = Vec::new();
    if result.final_debt_to_gdp > params.baseline.debt_to_gdp + DEBT_RISE_MARGIN {
        out.push("rising debt as a share of the economy");
    }
    if ind.unrest_risk > 0.5 {
        out.push("higher risk of protests or strikes");
    }
    if ind.brain_drain_risk > 0.45 {
        out.push("risk of high earners and skilled workers moving abroad");
    }
    if ind.emissions_change > 0.0 {
        out.push("higher carbon emissions");
    }
    if ind.fuel_poverty_rate > 0.18 {
        out.push("more households in fuel poverty");
    }
    out
}

/// Plain-English reading of a result against the baseline economy.
pub fn narrate(result: &SimulationResult, params: &Parameters) -> Narrative {
    let baseline = &params.baseline;
    let upsides = upsides(result);
    let risks = risks(result, params);

    let mut sentences = vec![
        format!(
            "Your budget leads to real GDP growth of {}, with unemployment around {} and \
             inflation at about {}. Compared with the baseline, output is expected to {}, \
             jobs will {}, and price pressures will {}.",
            percent(result.final_gdp_growth),
            percent(result.final_unemp),
            percent(result.final_inflation),
            direction(result.final_gdp_growth - baseline.real_gdp_growth),
            direction(result.final_unemp - baseline.unemployment),
            direction(result.final_inflation - baseline.inflation),
        ),
        format!(
            "On the public finances, the deficit is about {} of GDP and debt ends the year \
             at around {} of GDP.",
            percent(result.final_deficit_to_gdp),
            percent(result.final_debt_to_gdp),
        ),
    ];
    if !upsides.is_empty() {
        sentences.push(format!("Upsides include {}.", upsides.join(", ")));
    }
    if !risks.is_empty() {
        sentences.push(format!("Risks to watch: {}.", risks.join(", ")));
    }
    sentences.push(format!(
        "This year\u{2019}s external scenario is: {}.",
        result.shock.name
    ));

    Narrative {
        text: sentences.join(" "),
        upsides,
        risks,
    }
}

pub fn compare(current: &SimulationResult, comparison: &SimulationResult) -> Comparison {
    Comparison {
        gdp_growth: current.final_gdp_growth - comparison.final_gdp_growth,
        unemployment: current.final_unemp - comparison.final_unemp,
        inflation: current.final_inflation - comparison.final_inflation,
        deficit_to_gdp: current.final_deficit_to_gdp - comparison.final_deficit_to_gdp,
        debt_to_gdp: current.final_debt_to_gdp - comparison.final_debt_to_gdp,
        gdp: current.final_gdp - comparison.final_gdp,
    }
}
