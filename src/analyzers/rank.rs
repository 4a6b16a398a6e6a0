use crate::analyzers::kde::gaussian_kde;
use crate::analyzers::types::{AqiReading, RankResult};

/// Number of samples in the plotted density curve.
pub const DENSITY_POINTS: usize = 200;

/// Size of the best/worst city lists.
pub const TOP_N: usize = 5;

/// Ranks `featured` against `comparison`.
///
/// The featured value is appended to the comparison set; the combined list
/// feeds both the density curve and the percentile.
pub fn rank(featured: i64, comparison: &[i64]) -> RankResult {
    let mut combined = Vec::with_capacity(comparison.len() + 1);
    combined.extend_from_slice(comparison);
    combined.push(featured);

    RankResult {
        featured,
        percentile: percentile_rank(featured, &combined),
        sample_size: combined.len(),
        density: gaussian_kde(&combined, DENSITY_POINTS),
    }
}

/// Position of the first occurrence of `value` in the sorted population,
/// as a percentage of the population size.
///
/// Ties share the rank of their first sorted index, so the result is always
/// below 100. An empty population yields 0.0.
pub fn percentile_rank(value: i64, population: &[i64]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }

    let mut sorted = population.to_vec();
    sorted.sort_unstable();

    let first_index = sorted.partition_point(|&v| v < value);
    (first_index as f64 / sorted.len() as f64) * 100.0
}

/// The `n` cleanest readings, lowest AQI first. Ties keep fetch order.
pub fn best(readings: &[AqiReading], n: usize) -> Vec<AqiReading> {
    let mut sorted = readings.to_vec();
    sorted.sort_by_key(|r| r.aqi);
    sorted.truncate(n);
    sorted
}

/// The `n` most polluted readings, highest AQI first. Ties keep fetch order.
pub fn worst(readings: &[AqiReading], n: usize) -> Vec<AqiReading> {
    let mut sorted = readings.to_vec();
    sorted.sort_by(|a, b| b.aqi.cmp(&a.aqi));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::DensityCurve;

    fn reading(city: &str, aqi: i64) -> AqiReading {
        AqiReading {
            city: city.to_string(),
            query: city.to_string(),
            aqi,
            observed_at: None,
            forecast: None,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }

    #[test]
    fn test_rank_simple_population() {
        let result = rank(20, &[10, 30, 40]);

        assert_close(result.percentile, 25.0);
        assert_eq!(result.sample_size, 4);
        assert!(matches!(
            result.density,
            DensityCurve::Smooth { ref points } if points.len() == DENSITY_POINTS
        ));
    }

    #[test]
    fn test_rank_matches_first_sorted_index() {
        let populations: [&[i64]; 4] = [
            &[5],
            &[3, 3, 3, 1],
            &[100, 7, 42, 42, 8, 150, 0, -2],
            &[60, 55, 58, 61, 61, 61, 90],
        ];

        for population in populations {
            for (i, &v) in population.iter().enumerate() {
                let mut rest = population.to_vec();
                rest.remove(i);

                let mut sorted = population.to_vec();
                sorted.sort();
                let first = sorted.iter().position(|&x| x == v).unwrap();
                let expected = first as f64 / population.len() as f64 * 100.0;

                assert_close(rank(v, &rest).percentile, expected);
            }
        }
    }

    #[test]
    fn test_tie_takes_first_occurrence() {
        // 50 values, featured ties the value at sorted index 10.
        let mut comparison: Vec<i64> = (0..49).map(|i| 10 + i * 3).collect();
        let featured = comparison[10];
        comparison.reverse();

        assert_close(rank(featured, &comparison).percentile, 20.0);
    }

    #[test]
    fn test_percentile_never_reaches_hundred() {
        assert_close(percentile_rank(500, &[1, 2, 500]), 200.0 / 3.0);
        assert_close(percentile_rank(9, &[9, 9, 9]), 0.0);
        assert_eq!(percentile_rank(1, &[]), 0.0);
    }

    #[test]
    fn test_rank_with_no_comparison_is_degenerate() {
        let result = rank(77, &[]);

        assert_close(result.percentile, 0.0);
        assert_eq!(result.density, DensityCurve::Degenerate { at: 77.0 });
    }

    #[test]
    fn test_rank_all_identical_is_degenerate() {
        let result = rank(40, &[40, 40, 40]);

        assert_close(result.percentile, 0.0);
        assert_eq!(result.density, DensityCurve::Degenerate { at: 40.0 });
        assert_eq!(result.density.peak(), None);
    }

    #[test]
    fn test_best_and_worst_are_stable() {
        let readings = vec![
            reading("a", 5),
            reading("b", 1),
            reading("c", 9),
            reading("d", 1),
            reading("e", 7),
        ];

        let summarize = |list: Vec<AqiReading>| -> Vec<(String, i64)> {
            list.into_iter().map(|r| (r.city, r.aqi)).collect()
        };
        let cleanest = summarize(best(&readings, TOP_N));
        let dirtiest = summarize(worst(&readings, TOP_N));

        assert_eq!(
            cleanest,
            vec![
                ("b".to_string(), 1),
                ("d".to_string(), 1),
                ("a".to_string(), 5),
                ("e".to_string(), 7),
                ("c".to_string(), 9),
            ]
        );
        assert_eq!(
            dirtiest,
            vec![
                ("c".to_string(), 9),
                ("e".to_string(), 7),
                ("a".to_string(), 5),
                ("b".to_string(), 1),
                ("d".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_top_n_truncates() {
        let readings: Vec<_> = (0..8).map(|i| reading(&format!("c{i}"), i * 10)).collect();

        let cleanest = best(&readings, TOP_N);
        let dirtiest = worst(&readings, TOP_N);

        assert_eq!(cleanest.len(), 5);
        assert_eq!(cleanest[0].aqi, 0);
        assert_eq!(dirtiest.len(), 5);
        assert_eq!(dirtiest[0].aqi, 70);
        assert!(best(&[], TOP_N).is_empty());
    }
}
