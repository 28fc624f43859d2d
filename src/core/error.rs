use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimulationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("horizon must be at least one year, got {horizon_years}")]
    InvalidHorizon { horizon_years: u32 },
}
