use rand::Rng;

use super::types::{Shock, ShockScenario};

/// Intensities below this draw the calm scenario.
pub const MIN_SHOCK_INTENSITY: f64 = 0.05;

/// Scenarios eligible for a random draw, each equally likely.
pub const DRAWABLE_SCENARIOS: [ShockScenario; 5] = [
    ShockScenario::MildSlowdown,
    ShockScenario::EnergySpike,
    ShockScenario::ProductivityBoom,
    ShockScenario::FinancialWobble,
    ShockScenario::StrongExternalDemand,
];

impl ShockScenario {
    pub fn from_index(index: usize) -> Option<Self> {
        DRAWABLE_SCENARIOS.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            ShockScenario::Calm => "No external shock (deterministic scenario)",
            ShockScenario::MildSlowdown => "Mild global slowdown",
            ShockScenario::EnergySpike => "Energy price spike",
            ShockScenario::ProductivityBoom => "Tech-led productivity boom",
            ShockScenario::FinancialWobble => "Mini financial wobble",
            ShockScenario::StrongExternalDemand => "Strong global demand for UK services",
        }
    }

    /// Unscaled (gdp, inflation, unemployment, risk) deltas.
    fn base_deltas(self) -> (f64, f64, f64, f64) {
        match self {
            ShockScenario::Calm => (0.0, 0.0, 0.0, 0.0),
            ShockScenario::MildSlowdown => (-0.007, -0.002, 0.004, 0.2),
            ShockScenario::EnergySpike => (-0.005, 0.015, 0.002, 0.25),
            ShockScenario::ProductivityBoom => (0.01, -0.003, -0.004, -0.1),
            ShockScenario::FinancialWobble => (-0.004, -0.001, 0.003, 0.3),
            ShockScenario::StrongExternalDemand => (0.006, 0.002, -0.003, -0.05),
        }
    }
}

impl Shock {
    pub fn calm() -> Self {
        Self::scaled(ShockScenario::Calm, 1.0)
    }

    /// `scenario` with every delta multiplied by `intensity`.
    pub fn scaled(scenario: ShockScenario, intensity: f64) -> Self {
        let (gdp, inflation, unemp, risk) = scenario.base_deltas();
        Self {
            scenario,
            name: scenario.name(),
            gdp_delta: gdp * intensity,
            inflation_delta: inflation * intensity,
            unemp_delta: unemp * intensity,
            risk: risk * intensity,
        }
    }
}

/// Draws the one external shock a simulation applies to its first year.
///
/// The generator is only consulted when shocks are enabled and the intensity
/// reaches [`MIN_SHOCK_INTENSITY`].
pub fn draw_shock<R: Rng + ?Sized>(intensity: f64, shocks_enabled: bool, rng: &mut R) -> Shock {
    if !shocks_enabled || intensity.is_nan() || intensity < MIN_SHOCK_INTENSITY {
        return Shock::calm();
    }
    let index = rng.random_range(0..DRAWABLE_SCENARIOS.len());
    Shock::scaled(DRAWABLE_SCENARIOS[index], intensity)
}
