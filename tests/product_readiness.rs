#[test]
fn config_defaults_are_populated() {
    let cfg = donation_gateway::config::AppConfig::from_env();
    assert!(!cfg.database_url.is_empty());
    assert!(!cfg.redis_url.is_empty());
    assert!(cfg.point_divisor > 0);
}

#[test]
fn callback_endpoints_are_documented() {
    let readme = std::fs::read_to_string("README.md").unwrap_or_default();
    assert!(readme.contains("/callbacks/bkash"));
    assert!(readme.contains("/callbacks/sslcommerz/ipn"));
    assert!(readme.contains("/callbacks/shurjopay"));
    assert!(readme.contains("/ops/readiness"));
}
