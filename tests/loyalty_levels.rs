use donation_gateway::domain::loyalty::{derive_level, points_earned, LoyaltyLevel};

#[test]
fn level_thresholds() {
    assert_eq!(derive_level(0), LoyaltyLevel::Bronze);
    assert_eq!(derive_level(999), LoyaltyLevel::Bronze);
    assert_eq!(derive_level(1_000), LoyaltyLevel::Silver);
    assert_eq!(derive_level(4_999), LoyaltyLevel::Silver);
    assert_eq!(derive_level(5_000), LoyaltyLevel::Gold);
    assert_eq!(derive_level(9_999), LoyaltyLevel::Gold);
    assert_eq!(derive_level(10_000), LoyaltyLevel::Platinum);
    assert_eq!(derive_level(1_000_000), LoyaltyLevel::Platinum);
}

#[test]
fn one_point_per_hundred_units_floored() {
    assert_eq!(points_earned(2_500, 100), 25);
    assert_eq!(points_earned(2_599, 100), 25);
    assert_eq!(points_earned(99, 100), 0);
    assert_eq!(points_earned(50_000, 100), 500);
}

#[test]
fn degenerate_rate_awards_nothing() {
    assert_eq!(points_earned(2_500, 0), 0);
    assert_eq!(points_earned(2_500, -5), 0);
    assert_eq!(points_earned(-100, 100), 0);
}

#[test]
fn small_donation_keeps_bronze() {
    // donor at 800 points gives 2500: 25 earned, 825 total, still Bronze
    let after = 800 + points_earned(2_500, 100);
    assert_eq!(after, 825);
    assert_eq!(derive_level(after), LoyaltyLevel::Bronze);
}

#[test]
fn large_donation_crosses_into_silver() {
    // donor at 900 points gives 50000: 500 earned, 1400 total, Silver
    let after = 900 + points_earned(50_000, 100);
    assert_eq!(after, 1_400);
    assert_eq!(derive_level(after), LoyaltyLevel::Silver);
}
