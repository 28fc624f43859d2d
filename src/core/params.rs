use serde::Serialize;

/// Stylised starting macro/fiscal state. Money is in £bn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub year_gdp: f64,
    pub tax_to_gdp: f64,
    pub spend_to_gdp: f64,
    pub debt_to_gdp: f64,
    pub real_gdp_growth: f64,
    pub inflation: f64,
    pub unemployment: f64,
    pub interest_rate: f64,
}

impl Baseline {
    pub fn base_tax(&self) -> f64 {
        self.year_gdp * self.tax_to_gdp
    }

    pub fn base_spend(&self) -> f64 {
        self.year_gdp * self.spend_to_gdp
    }

    pub fn deficit_to_gdp(&self) -> f64 {
        self.spend_to_gdp - self.tax_to_gdp
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxShares {
    pub income: f64,
    pub nic: f64,
    pub vat: f64,
    pub company: f64,
    pub other_indirect: f64,
    pub capital_gains: f64,
    pub inheritance: f64,
    pub fuel: f64,
    pub alcohol_tobacco: f64,
    pub stamp_duty: f64,
    pub council_tax: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendShares {
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

/// Elasticities and fiscal multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelParams {
    pub multiplier_g: f64,
    pub multiplier_t: f64,
    pub income_elasticity: f64,
    pub corp_elasticity: f64,
    pub vat_elasticity: f64,
    pub nic_elasticity: f64,
    pub cgt_elasticity: f64,
    pub iht_elasticity: f64,
}

/// The read-only parameter store shared by every simulation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub baseline: Baseline,
    pub tax_shares: TaxShares,
    pub spend_shares: SpendShares,
    pub model: ModelParams,
}

impl Parameters {
    pub const STANDARD: Parameters = Parameters {
        baseline: Baseline {
            year_gdp: 2884.0,
            tax_to_gdp: 0.393,
            spend_to_gdp: 0.444,
            debt_to_gdp: 0.945,
            real_gdp_growth: 0.013,
            inflation: 0.02,
            unemployment: 0.045,
            interest_rate: 0.045,
        },
        tax_shares: TaxShares {
            income: 0.28,
            nic: 0.18,
            vat: 0.17,
            company: 0.11,
            other_indirect: 0.10,
            capital_gains: 0.02,
            inheritance: 0.01,
            fuel: 0.03,
            alcohol_tobacco: 0.03,
            stamp_duty: 0.03,
            council_tax: 0.04,
        },
        // Residual "other" is sized so the twelve shares sum to 1.
        spend_shares: SpendShares {
            health: 0.19,
            education: 0.09,
            defence: 0.07,
            pensions: 0.16,
            welfare: 0.14,
            transport: 0.04,
            housing: 0.03,
            environment: 0.02,
            foreign_aid: 0.005,
            infrastructure: 0.05,
            debt_interest: 0.08,
            other: 0.125,
        },
        model: ModelParams {
            multiplier_g: 1.2,
            multiplier_t: 0.9,
            income_elasticity: 0.8,
            corp_elasticity: 0.7,
            vat_elasticity: 0.9,
            nic_elasticity: 0.9,
            cgt_elasticity: 0.8,
            iht_elasticity: 0.7,
        },
    };
}

impl Default for Parameters {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_shares_sum_to_one() {
        let s = Parameters::STANDARD.tax_shares;
        let sum = s.income
            + s.nic
            + s.vat
            + s.company
            + s.other_indirect
            + s.capital_gains
            + s.inheritance
            + s.fuel
            + s.alcohol_tobacco
            + s.stamp_duty
            + s.council_tax;
        assert!((sum - 1.0).abs() <= 1e-12, "got {sum}");
    }

    #[test]
    fn spend_shares_sum_to_one() {
        let s = Parameters::STANDARD.spend_shares;
        let sum = s.health
            + s.education
            + s.defence
            + s.pensions
            + s.welfare
            + s.transport
            + s.housing
            + s.environment
            + s.foreign_aid
            + s.infrastructure
            + s.debt_interest
            + s.other;
        assert!((sum - 1.0).abs() <= 1e-12, "got {sum}");
    }

    #[test]
    fn baseline_deficit_is_spend_minus_tax_ratio() {
        let b = Parameters::STANDARD.baseline;
        assert!((b.deficit_to_gdp() - 0.051).abs() <= 1e-12);
    }
}
