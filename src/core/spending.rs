use super::params::Parameters;
use super::types::{Policy, SpendBreakdown, SpendCategory, SpendResult};

/// Largest correction, as a fraction of GDP, the deficit-target step applies.
pub const MAX_DEFICIT_CORRECTION: f64 = 0.02;

/// Total spending and its twelve-line breakdown for `policy`.
pub fn compute_spending(policy: &Policy, params: &Parameters) -> SpendResult {
    let base_spend = params.baseline.base_spend();
    let shares = &params.spend_shares;
    let changes = &policy.spend_changes;
    let adjusted = |share: f64, category: SpendCategory| {
        base_spend * share * (1.0 + changes.get(category))
    };

    let breakdown = SpendBreakdown {
        health: adjusted(shares.health, SpendCategory::Health),
        education: adjusted(shares.education, SpendCategory::Education),
        defence: adjusted(shares.defence, SpendCategory::Defence),
        pensions: adjusted(shares.pensions, SpendCategory::Pensions),
        welfare: adjusted(shares.welfare, SpendCategory::Welfare),
        transport: adjusted(shares.transport, SpendCategory::Transport),
        housing: adjusted(shares.housing, SpendCategory::Housing),
        environment: adjusted(shares.environment, SpendCategory::Environment),
        foreign_aid: adjusted(shares.foreign_aid, SpendCategory::ForeignAid),
        infrastructure: adjusted(shares.infrastructure, SpendCategory::Infrastructure),
        debt_interest: base_spend * shares.debt_interest,
        other: base_spend * shares.other,
    };

    SpendResult {
        total: breakdown.sum(),
        base_spend,
        breakdown,
    }
}

/// Outcome of the single-step deficit-target correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeficitAdjustment {
    pub spend: SpendResult,
    /// Unclamped gap between the pre-adjustment deficit ratio and target.
    pub gap: f64,
    /// Currency amount removed from spending (negative adds spending).
    pub amount: f64,
}

/// Nudges spending toward the deficit target through the "other" line.
///
/// The gap is clamped to ±[`MAX_DEFICIT_CORRECTION`] of GDP and applied once.
/// "Other" never goes below zero while the total takes the full amount.
pub fn apply_deficit_target(
    spend: &SpendResult,
    tax_total: f64,
    target_deficit_pct: f64,
    year_gdp: f64,
) -> DeficitAdjustment {
    let deficit_to_gdp = (spend.total - tax_total) / year_gdp;
    let gap = deficit_to_gdp - target_deficit_pct;
    let amount = gap.clamp(-MAX_DEFICIT_CORRECTION, MAX_DEFICIT_CORRECTION) * year_gdp;

    let mut adjusted = *spend;
    adjusted.breakdown.other = (spend.breakdown.other - amount).max(0.0);
    adjusted.total = spend.total - amount;

    DeficitAdjustment {
        spend: adjusted,
        gap,
        amount,
    }
}
