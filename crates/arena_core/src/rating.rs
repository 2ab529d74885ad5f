//! Rating-change estimation for scored matches.

/// K-factor for rating updates (higher = more volatile)
pub const K_FACTOR: f64 = 32.0;

/// Expected score of a player against an opponent.
///
/// Logistic curve: 0.5 at equal ratings, approaching 1.0 as the player
/// outrates the opponent by several hundred points.
pub fn expected_score(player_rating: i32, opponent_rating: i32) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((opponent_rating - player_rating) as f64 / 400.0))
}

/// Estimated rating change for one game.
///
/// Monotonically increasing in `(opponent_rating - player_rating)` when
/// `won` is true and decreasing otherwise: higher-rated players gain less
/// for beating weaker opponents and lose more for losing to them.
pub fn estimated_rating_change(player_rating: i32, opponent_rating: i32, won: bool) -> i32 {
    let expected = expected_score(player_rating, opponent_rating);
    let actual = if won { 1.0 } else { 0.0 };
    (K_FACTOR * (actual - expected)).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_score_equal_ratings() {
        let expected = expected_score(2200, 2200);
        assert!((expected - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_win_gains_loss_costs() {
        assert!(estimated_rating_change(2200, 2200, true) > 0);
        assert!(estimated_rating_change(2200, 2200, false) < 0);
    }

    #[test]
    fn test_monotone_in_opponent_rating() {
        // Wins against stronger opponents pay more
        let weak = estimated_rating_change(2200, 2000, true);
        let even = estimated_rating_change(2200, 2200, true);
        let strong = estimated_rating_change(2200, 2400, true);
        assert!(weak <= even && even <= strong);

        // Losses against weaker opponents cost more
        let to_weak = estimated_rating_change(2200, 2000, false);
        let to_even = estimated_rating_change(2200, 2200, false);
        let to_strong = estimated_rating_change(2200, 2400, false);
        assert!(to_weak <= to_even && to_even <= to_strong);
    }

    #[test]
    fn test_change_bounded_by_k_factor() {
        for &opponent in &[1500, 2200, 2900] {
            for &won in &[true, false] {
                let change = estimated_rating_change(2200, opponent, won);
                assert!(change.abs() as f64 <= K_FACTOR);
            }
        }
    }
}
