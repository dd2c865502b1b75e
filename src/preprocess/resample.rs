//! Bucketing of an irregular series onto a fixed-width grid.

/// One numeric channel of the series, row-aligned with its timestamps.
#[derive(Debug, Clone)]
pub(crate) struct Channel {
    pub name: String,
    /// Required channels must be gap-free in the final matrix; auxiliary
    /// channels are carried as-is.
    pub required: bool,
    pub cells: Vec<Option<f64>>,
}

/// A series re-bucketed onto a contiguous fixed-interval grid. Bucket
/// timestamps are the left edges, strictly ascending, `step_ms` apart.
#[derive(Debug)]
pub(crate) struct SampledGrid {
    pub times_ms: Vec<i64>,
    pub channels: Vec<Channel>,
}

/// Buckets a time-sorted series into fixed-width, contiguous, non-overlapping
/// intervals spanning the observed range. Each bucket cell is the arithmetic
/// mean of the readings falling in it; buckets with no readings stay on the
/// grid as empty cells rather than being dropped or zeroed.
pub(crate) fn resample(times_ms: &[i64], channels: &[Channel], step_ms: i64) -> SampledGrid {
    debug_assert!(!times_ms.is_empty());
    debug_assert!(step_ms > 0);

    let start = times_ms[0].div_euclid(step_ms) * step_ms;
    let end = times_ms[times_ms.len() - 1].div_euclid(step_ms) * step_ms;
    let buckets = ((end - start) / step_ms) as usize + 1;
    let grid_times: Vec<i64> = (0..buckets as i64).map(|i| start + i * step_ms).collect();

    let gridded = channels
        .iter()
        .map(|channel| {
            let mut sums = vec![0.0; buckets];
            let mut counts = vec![0usize; buckets];
            for (time, value) in times_ms.iter().zip(&channel.cells) {
                if let Some(value) = value {
                    let bucket = (time - start).div_euclid(step_ms) as usize;
                    sums[bucket] += value;
                    counts[bucket] += 1;
                }
            }
            let cells = sums
                .iter()
                .zip(&counts)
                .map(|(sum, &count)| {
                    if count == 0 {
                        None
                    } else {
                        Some(sum / count as f64)
                    }
                })
                .collect();
            Channel {
                name: channel.name.clone(),
                required: channel.required,
                cells,
            }
        })
        .collect();

    SampledGrid {
        times_ms: grid_times,
        channels: gridded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: i64 = 60_000;

    fn channel(cells: Vec<Option<f64>>) -> Channel {
        Channel {
            name: "temperature".to_string(),
            required: true,
            cells,
        }
    }

    #[test]
    fn grid_spans_observed_range_with_empty_buckets_kept() {
        // Readings at 0 and 14 minutes, 5-minute buckets: grid 0, 5, 10.
        let times = vec![0, 14 * MIN];
        let grid = resample(&times, &[channel(vec![Some(10.0), Some(20.0)])], 5 * MIN);

        assert_eq!(grid.times_ms, vec![0, 5 * MIN, 10 * MIN]);
        assert_eq!(
            grid.channels[0].cells,
            vec![Some(10.0), None, Some(20.0)]
        );
    }

    #[test]
    fn colliding_readings_are_mean_aggregated() {
        let times = vec![MIN, 3 * MIN, 7 * MIN];
        let grid = resample(
            &times,
            &[channel(vec![Some(10.0), Some(20.0), Some(30.0)])],
            5 * MIN,
        );

        assert_eq!(grid.channels[0].cells, vec![Some(15.0), Some(30.0)]);
    }

    #[test]
    fn null_source_cells_do_not_count_toward_the_mean() {
        let times = vec![MIN, 2 * MIN];
        let grid = resample(&times, &[channel(vec![Some(10.0), None])], 5 * MIN);

        assert_eq!(grid.channels[0].cells, vec![Some(10.0)]);
    }
}
