/// Trailing mean over the most recent `window` series entries (entries, not
/// calendar years: gaps in the underlying year axis do not widen the window).
/// The first `window - 1` positions have no full window and stay `None`.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    assert!(window > 0, "window must be at least 1");
    values
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < window {
                None
            } else {
                let sum: f64 = values[i + 1 - window..=i].iter().sum();
                Some(sum / window as f64)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_positions_are_missing() {
        let avg = trailing_mean(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 5);
        assert_eq!(avg[..4], [None, None, None, None]);
        assert_eq!(avg[4], Some(3.0));
        assert_eq!(avg[5], Some(4.0));
    }

    #[test]
    fn window_equals_mean_of_last_entries() {
        let values = [10.0, 20.0, 60.0];
        let avg = trailing_mean(&values, 2);
        assert_eq!(avg, vec![None, Some(15.0), Some(40.0)]);
    }

    #[test]
    fn series_shorter_than_window_is_all_missing() {
        assert_eq!(trailing_mean(&[1.0, 2.0], 5), vec![None, None]);
        assert_eq!(trailing_mean(&[], 5), Vec::<Option<f64>>::new());
    }

    #[test]
    fn window_of_one_is_identity() {
        assert_eq!(
            trailing_mean(&[3.0, 7.0], 1),
            vec![Some(3.0), Some(7.0)]
        );
    }
}
