use serde::{Deserialize, Serialize};

use super::params::Parameters;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpendCategory {
    Health,
    Education,
    Defence,
    Pensions,
    Welfare,
    Transport,
    Housing,
    Environment,
    ForeignAid,
    Infrastructure,
}

impl SpendCategory {
    pub const ALL: [SpendCategory; 10] = [
        SpendCategory::Health,
        SpendCategory::Education,
        SpendCategory::Defence,
        SpendCategory::Pensions,
        SpendCategory::Welfare,
        SpendCategory::Transport,
        SpendCategory::Housing,
        SpendCategory::Environment,
        SpendCategory::ForeignAid,
        SpendCategory::Infrastructure,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SpendCategory::Health => "health",
            SpendCategory::Education => "education",
            SpendCategory::Defence => "defence",
            SpendCategory::Pensions => "pensions",
            SpendCategory::Welfare => "welfare",
            SpendCategory::Transport => "transport",
            SpendCategory::Housing => "housing",
            SpendCategory::Environment => "environment",
            SpendCategory::ForeignAid => "foreignAid",
            SpendCategory::Infrastructure => "infrastructure",
        }
    }
}

/// Fractional change per adjustable spend category. Absent keys deserialize to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpendChanges {
    pub health: f64,
    pub education: f64,
    pub defence: f64,
    pub pensions: f64,
    pub welfare: f64,
    pub transport: f64,
    pub housing: f64,
    pub environment: f64,
    pub foreign_aid: f64,
    pub infrastructure: f64,
}

impl SpendChanges {
    pub fn get(&self, category: SpendCategory) -> f64 {
        match category {
            SpendCategory::Health => self.health,
            SpendCategory::Education => self.education,
            SpendCategory::Defence => self.defence,
            SpendCategory::Pensions => self.pensions,
            SpendCategory::Welfare => self.welfare,
            SpendCategory::Transport => self.transport,
            SpendCategory::Housing => self.housing,
            SpendCategory::Environment => self.environment,
            SpendCategory::ForeignAid => self.foreign_aid,
            SpendCategory::Infrastructure => self.infrastructure,
        }
    }

    pub fn set(&mut self, category: SpendCategory, value: f64) {
        let slot = match category {
            SpendCategory::Health => &mut self.health,
            SpendCategory::Education => &mut self.education,
            SpendCategory::Defence => &mut self.defence,
            SpendCategory::Pensions => &mut self.pensions,
            SpendCategory::Welfare => &mut self.welfare,
            SpendCategory::Transport => &mut self.transport,
            SpendCategory::Housing => &mut self.housing,
            SpendCategory::Environment => &mut self.environment,
            SpendCategory::ForeignAid => &mut self.foreign_aid,
            SpendCategory::Infrastructure => &mut self.infrastructure,
        };
        *slot = value;
    }
}

/// One run's tax, spend and structural levers.
///
/// Income, corporation and VAT rates are percentage points (20 = 20%).
/// Every other field is a fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub income_basic: f64,
    pub income_higher: f64,
    pub income_additional: f64,
    pub corp_rate: f64,
    pub vat_rate: f64,
    pub nic_change: f64,
    pub cgt_change: f64,
    pub iht_change: f64,
    pub fuel_duty_change: f64,
    pub alcohol_duty_change: f64,
    pub stamp_duty_change: f64,
    pub council_tax_change: f64,
    pub wealth_tax_rate: f64,
    #[serde(default)]
    pub spend_changes: SpendChanges,
    pub target_deficit_pct: f64,
    pub min_wage_change: f64,
    pub immigration_level: f64,
    pub business_incentives: f64,
    pub trade_openness: f64,
    pub carbon_tax_level: f64,
    pub regulation_burden: f64,
    pub shock_intensity: f64,
}

impl Policy {
    /// Policy that reproduces the baseline tax and spend pools exactly.
    ///
    /// Business incentives and carbon tax sit at zero so no incentive drag or
    /// carbon drag applies; regulation and trade sit at their 0.5 midpoint and
    /// immigration at its 0.6 neutral level.
    pub fn baseline(params: &Parameters) -> Self {
        Self {
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
            spend_changes: SpendChanges::default(),
            target_deficit_pct: params.baseline.deficit_to_gdp(),
            min_wage_change: 0.0,
            immigration_level: 0.6,
            business_incentives: 0.0,
            trade_openness: 0.5,
            carbon_tax_level: 0.0,
            regulation_burden: 0.5,
            shock_intensity: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub income_tax: f64,
    pub nic_tax: f64,
    pub vat_tax: f64,
    pub corp_tax: f64,
    pub other_indirect: f64,
    pub cgt_tax: f64,
    pub iht_tax: f64,
    pub fuel_tax: f64,
    pub alcohol_tax: f64,
    pub stamp_tax: f64,
    pub council_tax: f64,
    pub wealth_tax_revenue: f64,
}

impl TaxBreakdown {
    pub fn lines(&self) -> [(&'static str, f64); 12] {
        [
            ("incomeTax", self.income_tax),
            ("nicTax", self.nic_tax),
            ("vatTax", self.vat_tax),
            ("corpTax", self.corp_tax),
            ("otherIndirect", self.other_indirect),
            ("cgtTax", self.cgt_tax),
            ("ihtTax", self.iht_tax),
            ("fuelTax", self.fuel_tax),
            ("alcoholTax", self.alcohol_tax),
            ("stampTax", self.stamp_tax),
            ("councilTax", self.council_tax),
            ("wealthTaxRevenue", self.wealth_tax_revenue),
        ]
    }

    pub fn sum(&self) -> f64 {
        self.lines().iter().map(|(_, v)| v).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResult {
    pub total: f64,
    /// Unmodified baseline pool, `yearGDP * taxToGDP`.
    pub base_tax: f64,
    pub breakdown: TaxBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendBreakdown {
    pub health: f64,
    pub education: f64,
    pub defence: f64,
    pub pensions: f64,
    pub welfare: f64,
    pub transport: f64,
    pub housing: f64,
    pub environment: f64,
    pub foreign_aid: f64,
    pub infrastructure: f64,
    pub debt_interest: f64,
    pub other: f64,
}

impl SpendBreakdown {
    pub fn category(&self, category: SpendCategory) -> f64 {
        match category {
            SpendCategory::Health => self.health,
            SpendCategory::Education => self.education,
            SpendCategory::Defence => self.defence,
            SpendCategory::Pensions => self.pensions,
            SpendCategory::Welfare => self.welfare,
            SpendCategory::Transport => self.transport,
            SpendCategory::Housing => self.housing,
            SpendCategory::Environment => self.environment,
            SpendCategory::ForeignAid => self.foreign_aid,
            SpendCategory::Infrastructure => self.infrastructure,
        }
    }

    pub fn lines(&self) -> [(&'static str, f64); 12] {
        [
            ("health", self.health),
            ("education", self.education),
            ("defence", self.defence),
            ("pensions", self.pensions),
            ("welfare", self.welfare),
            ("transport", self.transport),
            ("housing", self.housing),
            ("environment", self.environment),
            ("foreignAid", self.foreign_aid),
            ("infrastructure", self.infrastructure),
            ("debtInterest", self.debt_interest),
            ("other", self.other),
        ]
    }

    pub fn sum(&self) -> f64 {
        self.lines().iter().map(|(_, v)| v).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendResult {
    pub total: f64,
    /// Unmodified baseline pool, `yearGDP * spendToGDP`.
    pub base_spend: f64,
    pub breakdown: SpendBreakdown,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShockScenario {
    Calm,
    MildSlowdown,
    EnergySpike,
    ProductivityBoom,
    FinancialWobble,
    StrongExternalDemand,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shock {
    pub scenario: ShockScenario,
    pub name: &'static str,
    pub gdp_delta: f64,
    pub inflation_delta: f64,
    pub unemp_delta: f64,
    pub risk: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub business_formation_index: f64,
    pub fdi_index: f64,
    pub startup_index: f64,
    pub non_dom_flow: f64,
    pub poverty_rate: f64,
    pub gini: f64,
    pub homeless_idx: f64,
    pub foodbank_idx: f64,
    pub nhs_wait_index: f64,
    pub life_expectancy: f64,
    pub school_perf_index: f64,
    pub apprenticeship_index: f64,
    pub emissions_change: f64,
    pub renewables_share: f64,
    pub energy_price_index: f64,
    pub air_quality_index: f64,
    pub house_price_growth: f64,
    pub rent_affordability: f64,
    pub housing_supply_index: f64,
    pub fuel_poverty_rate: f64,
    pub trade_balance: f64,
    pub tourism_index: f64,
    pub unrest_risk: f64,
    pub brain_drain_risk: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationOptions {
    pub shocks_enabled: bool,
    /// Seed for the shock draw; `None` uses the thread-local generator.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub years: Vec<String>,
    pub gdp_path: Vec<f64>,
    pub unemp_path: Vec<f64>,
    pub inflation_path: Vec<f64>,
    pub deficit_path: Vec<f64>,
    pub debt_path: Vec<f64>,
    pub final_gdp: f64,
    pub final_unemp: f64,
    pub final_inflation: f64,
    pub final_deficit_to_gdp: f64,
    pub final_debt_to_gdp: f64,
    pub final_gdp_growth: f64,
    pub final_interest_rate: f64,
    pub final_interest_cost: f64,
    pub tax: TaxResult,
    pub spend: SpendResult,
    pub indicators: Indicators,
    pub shock: Shock,
}
