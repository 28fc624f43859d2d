mod engine;
mod error;
mod export;
mod indicators;
mod params;
mod revenue;
mod shock;
mod spending;
mod summary;
mod types;

pub use engine::{
    GrowthTerms, demand_shock, min_wage_growth_effect, project_path, run_simulation,
    run_simulation_with, structural_long_run, structural_short_run,
};
pub use error::{Result, SimulationError};
pub use export::{CSV_HEADER, to_csv};
pub use indicators::{IndicatorInputs, compute_indicators, spend_change};
pub use params::{Baseline, ModelParams, Parameters, SpendShares, TaxShares};
pub use revenue::{
    RevenueFactors, compute_revenue, corp_revenue_factor, income_revenue_factor, revenue_factors,
};
pub use shock::{DRAWABLE_SCENARIOS, MIN_SHOCK_INTENSITY, draw_shock};
pub use spending::{DeficitAdjustment, MAX_DEFICIT_CORRECTION, apply_deficit_target, compute_spending};
pub use summary::{Comparison, Narrative, compare, narrate};
pub use types::{
    Indicators, Policy, Shock, ShockScenario, SimulationOptions, SimulationResult, SpendBreakdown,
    SpendCategory, SpendChanges, SpendResult, TaxBreakdown, TaxResult,
};
