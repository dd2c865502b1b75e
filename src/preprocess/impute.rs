//! Gap filling by time-weighted linear interpolation.

/// Fills empty cells lying strictly between two non-empty neighbors, weighting
/// by actual elapsed time rather than cell count. Edge cells with no non-empty
/// neighbor on one side are left empty; the trim stage removes those rows.
pub(crate) fn interpolate_by_time(times_ms: &[i64], cells: &mut [Option<f64>]) {
    debug_assert_eq!(times_ms.len(), cells.len());

    let known: Vec<usize> = cells
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| cell.map(|_| i))
        .collect();

    for pair in known.windows(2) {
        let (left, right) = (pair[0], pair[1]);
        if right - left <= 1 {
            continue;
        }
        let (Some(v0), Some(v1)) = (cells[left], cells[right]) else {
            continue;
        };
        let (t0, t1) = (times_ms[left] as f64, times_ms[right] as f64);
        for i in left + 1..right {
            let weight = (times_ms[i] as f64 - t0) / (t1 - t0);
            cells[i] = Some(v0 + (v1 - v0) * weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: i64 = 60_000;

    #[test]
    fn single_gap_is_linear_in_elapsed_time() {
        let times: Vec<i64> = (0..3).map(|i| i * 5 * MIN).collect();
        let mut cells = vec![Some(10.0), None, Some(30.0)];
        interpolate_by_time(&times, &mut cells);

        // v0 + (v1 - v0) * (tg - t0) / (t1 - t0) with tg halfway.
        assert_eq!(cells, vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn run_of_gaps_is_filled_proportionally() {
        let times: Vec<i64> = (0..5).map(|i| i * MIN).collect();
        let mut cells = vec![Some(0.0), None, None, None, Some(40.0)];
        interpolate_by_time(&times, &mut cells);

        assert_eq!(
            cells,
            vec![Some(0.0), Some(10.0), Some(20.0), Some(30.0), Some(40.0)]
        );
    }

    #[test]
    fn edges_without_a_neighbor_stay_empty() {
        let times: Vec<i64> = (0..4).map(|i| i * MIN).collect();
        let mut cells = vec![None, Some(1.0), Some(2.0), None];
        interpolate_by_time(&times, &mut cells);

        assert_eq!(cells, vec![None, Some(1.0), Some(2.0), None]);
    }

    #[test]
    fn all_empty_channel_is_untouched() {
        let times: Vec<i64> = (0..3).map(|i| i * MIN).collect();
        let mut cells: Vec<Option<f64>> = vec![None, None, None];
        interpolate_by_time(&times, &mut cells);
        assert_eq!(cells, vec![None, None, None]);
    }
}
