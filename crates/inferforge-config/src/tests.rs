//! Tests for sampler configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        random_seed = 42
        sweeps = 200
        block_limit = 64

        [policy]
        type = "metropolis_hastings"
        temperature = 0.5
    "#;

    let config = SamplerConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.sweeps(), 200);
    assert_eq!(config.block_limit(), 64);
    assert_eq!(
        config.policy,
        PolicyConfig::MetropolisHastings(MetropolisHastingsConfig {
            temperature: Some(0.5)
        })
    );
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        random_seed: 42
        policy:
          type: sample_rank
          acceptance: greedy_max
          update:
            type: arow
            r: 0.1
    "#;

    let config = SamplerConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.random_seed, Some(42));
    let PolicyConfig::SampleRank(sr) = config.policy else {
        panic!("expected sample_rank policy");
    };
    assert_eq!(sr.acceptance, AcceptanceType::GreedyMax);
    assert_eq!(sr.update, UpdateRuleConfig::Arow(ArowConfig { r: Some(0.1) }));
}

#[test]
fn test_greedy_unit_variant() {
    let config = SamplerConfig::from_toml_str(
        r#"
        [policy]
        type = "greedy_max"
    "#,
    )
    .unwrap();
    assert_eq!(config.policy, PolicyConfig::GreedyMax);
}

#[test]
fn test_defaults() {
    let config = SamplerConfig::from_toml_str("").unwrap();
    assert_eq!(config.sweeps(), DEFAULT_SWEEPS);
    assert_eq!(config.block_limit(), DEFAULT_BLOCK_LIMIT);
    assert_eq!(config.policy, PolicyConfig::default());
}

#[test]
fn test_sample_rank_defaults_to_perceptron() {
    let config = SamplerConfig::from_toml_str(
        r#"
        [policy]
        type = "sample_rank"
    "#,
    )
    .unwrap();
    let PolicyConfig::SampleRank(sr) = config.policy else {
        panic!("expected sample_rank policy");
    };
    assert_eq!(sr.acceptance, AcceptanceType::MetropolisHastings);
    assert_eq!(sr.update, UpdateRuleConfig::default());
}

#[test]
fn test_negative_temperature_rejected() {
    let result = SamplerConfig::from_toml_str(
        r#"
        [policy]
        type = "metropolis_hastings"
        temperature = -1.0
    "#,
    );
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_zero_learning_rate_rejected() {
    let result = SamplerConfig::from_toml_str(
        r#"
        [policy]
        type = "sample_rank"
        [policy.update]
        type = "perceptron"
        learning_rate = 0.0
    "#,
    );
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_zero_block_limit_rejected() {
    let result = SamplerConfig::from_toml_str("block_limit = 0");
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_unknown_policy_is_parse_error() {
    let result = SamplerConfig::from_toml_str(
        r#"
        [policy]
        type = "tabu"
    "#,
    );
    assert!(matches!(result, Err(ConfigError::Toml(_))));
}

#[test]
fn test_missing_file() {
    let result = SamplerConfig::load("/nonexistent/sampler.toml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn test_builder() {
    let config = SamplerConfig::new()
        .with_random_seed(123)
        .with_sweeps(5)
        .with_block_limit(16)
        .with_policy(PolicyConfig::GreedyMax);

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.sweeps(), 5);
    assert_eq!(config.block_limit(), 16);
    assert!(config.validate().is_ok());
}
