use super::types::SimulationResult;

pub const CSV_HEADER: &str =
    "Year,GDP (£bn),Unemployment (%),Inflation (%),Deficit (% of GDP),Debt (% of GDP)";

/// Year-by-year dump of the five paths. Ratios are written as percentages.
pub fn to_csv(result: &SimulationResult) -> String {
    let mut rows = Vec::with_capacity(result.years.len() + 1);
    rows.push(CSV_HEADER.to_string());
    for (idx, year) in result.years.iter().enumerate() {
        rows.push(format!(
            "{year},{:.2},{:.2},{:.2},{:.2},{:.2}",
            result.gdp_path[idx],
            result.unemp_path[idx] * 100.0,
            result.inflation_path[idx] * 100.0,
            result.deficit_path[idx] * 100.0,
            result.debt_path[idx] * 100.0,
        ));
    }
    rows.join("\n")
}
