//! Inequality and productivity aggregates

/// Gini coefficient of a set of non-negative values
///
/// Values are sorted ascending and cumulated; the area between the line of
/// equality and the Lorenz curve is divided by the area under the line of
/// equality. Fewer than two values, or a zero total, give 0.
///
/// # Example
/// ```
/// use econ_sim_core::stats::gini;
///
/// assert_eq!(gini(&[50.0, 50.0, 50.0]), 0.0);
/// assert_eq!(gini(&[0.0, 0.0, 0.0, 100.0]), 0.75);
/// ```
pub fn gini(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut cumulative = Vec::with_capacity(n);
    let mut running = 0.0;
    for value in &sorted {
        running += value;
        cumulative.push(running);
    }

    let total = running;
    if total <= 0.0 {
        return 0.0;
    }

    let n_f = n as f64;
    let area_total = total * n_f / 2.0;
    let area: f64 = cumulative
        .iter()
        .enumerate()
        .map(|(i, cum)| (total * (i + 1) as f64 / n_f - cum).abs())
        .sum();

    area / area_total
}

/// Employment-weighted productivity per 100 population
///
/// `firms` yields `(headcount, productivity)` per firm.
///
/// # Example
/// ```
/// use econ_sim_core::stats::aggregate_productivity;
///
/// // 10 workers at 1.0 and 10 at 1.5 in a population of 40
/// let value = aggregate_productivity([(10, 1.0), (10, 1.5)], 40);
/// assert_eq!(value, 62.5);
/// ```
pub fn aggregate_productivity<I>(firms: I, population: usize) -> f64
where
    I: IntoIterator<Item = (usize, f64)>,
{
    if population == 0 {
        return 0.0;
    }
    let weighted: f64 = firms
        .into_iter()
        .map(|(headcount, productivity)| headcount as f64 * productivity)
        .sum();
    weighted * 100.0 / population as f64
}
