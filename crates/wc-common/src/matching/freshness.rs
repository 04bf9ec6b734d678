use chrono::Duration;

/// Posting-age decay. Non-increasing in age by construction; a posting
/// dated in the future lands in the newest band.
pub fn score_freshness(age: Duration) -> f64 {
    if age < Duration::hours(24) {
        1.0
    } else if age < Duration::days(3) {
        0.8
    } else if age < Duration::days(7) {
        0.6
    } else if age < Duration::days(14) {
        0.4
    } else {
        0.2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(score_freshness(Duration::hours(2)), 1.0);
        assert_eq!(score_freshness(Duration::hours(24)), 0.8);
        assert_eq!(score_freshness(Duration::days(2)), 0.8);
        assert_eq!(score_freshness(Duration::days(5)), 0.6);
        assert_eq!(score_freshness(Duration::days(10)), 0.4);
        assert_eq!(score_freshness(Duration::days(30)), 0.2);
    }

    #[test]
    fn never_increases_with_age() {
        let ages = [
            Duration::zero(),
            Duration::hours(23),
            Duration::hours(25),
            Duration::days(3),
            Duration::days(6),
            Duration::days(13),
            Duration::days(14),
            Duration::days(90),
        ];
        for pair in ages.windows(2) {
            assert!(score_freshness(pair[0]) >= score_freshness(pair[1]));
        }
    }

    #[test]
    fn future_postings_read_as_new() {
        assert_eq!(score_freshness(Duration::hours(-1)), 1.0);
    }
}
