use super::*;
use crate::classifier::Mode;
use serial_test::serial;
use std::env;
use std::path::PathBuf;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_banter_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("BANTER_CLASSIFIER_TOP_N");
        env::remove_var("BANTER_CLASSIFIER_SAVE_PATH");
        env::remove_var("BANTER_CLASSIFIER_LOAD_PATH");
        env::remove_var("BANTER_CLASSIFIER_MODE");
        env::remove_var("BANTER_RERANKER_CONTEXT_TURNS");
        env::remove_var("BANTER_RERANKER_LAMBDA");
        env::remove_var("BANTER_RERANKER_SEED");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.classifier.top_n, 1);
    assert!(config.classifier.save_path.is_none());
    assert!(config.classifier.load_path.is_none());
    assert_eq!(config.classifier.mode, Mode::Infer);
    assert_eq!(config.reranker.num_context_turns, 10);
    assert_eq!(config.reranker.lambda_coeff, 10.0);
    assert!(config.reranker.seed.is_none());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_banter_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_banter_env();

    let config = with_env_vars(
        &[
            ("BANTER_CLASSIFIER_TOP_N", "3"),
            ("BANTER_CLASSIFIER_SAVE_PATH", "/tmp/faq.rkyv"),
            ("BANTER_CLASSIFIER_LOAD_PATH", "  /tmp/faq.rkyv  "),
            ("BANTER_CLASSIFIER_MODE", "TRAIN"),
            ("BANTER_RERANKER_CONTEXT_TURNS", "4"),
            ("BANTER_RERANKER_LAMBDA", "2.5"),
            ("BANTER_RERANKER_SEED", "42"),
        ],
        Config::from_env,
    )
    .expect("should parse overrides");

    assert_eq!(config.classifier.top_n, 3);
    assert_eq!(
        config.classifier.save_path,
        Some(PathBuf::from("/tmp/faq.rkyv"))
    );
    assert_eq!(
        config.classifier.load_path,
        Some(PathBuf::from("/tmp/faq.rkyv"))
    );
    assert_eq!(config.classifier.mode, Mode::Train);
    assert_eq!(config.reranker.num_context_turns, 4);
    assert_eq!(config.reranker.lambda_coeff, 2.5);
    assert_eq!(config.reranker.seed, Some(42));
}

#[test]
#[serial]
fn test_from_env_invalid_number() {
    clear_banter_env();

    let result = with_env_vars(&[("BANTER_CLASSIFIER_TOP_N", "many")], Config::from_env);

    match result {
        Err(ConfigError::InvalidEnvValue { name, value, .. }) => {
            assert_eq!(name, "BANTER_CLASSIFIER_TOP_N");
            assert_eq!(value, "many");
        }
        other => panic!("expected InvalidEnvValue, got {other:?}"),
    }
}

#[test]
#[serial]
fn test_from_env_invalid_mode() {
    clear_banter_env();

    let result = with_env_vars(&[("BANTER_CLASSIFIER_MODE", "serve")], Config::from_env);

    assert!(matches!(result, Err(ConfigError::InvalidEnvValue { .. })));
}

#[test]
#[serial]
fn test_from_env_blank_is_default() {
    clear_banter_env();

    let config = with_env_vars(&[("BANTER_RERANKER_LAMBDA", "   ")], Config::from_env)
        .expect("blank value falls back to default");

    assert_eq!(config.reranker.lambda_coeff, 10.0);
}

#[test]
fn test_from_json_partial() {
    let config = Config::from_json_str(
        r#"{
            "classifier": { "top_n": 2, "mode": "train" },
            "reranker": { "lambda_coeff": 5.0 }
        }"#,
    )
    .expect("valid JSON");

    assert_eq!(config.classifier.top_n, 2);
    assert_eq!(config.classifier.mode, Mode::Train);
    assert_eq!(config.reranker.lambda_coeff, 5.0);
    assert_eq!(config.reranker.num_context_turns, 10);
}

#[test]
fn test_from_json_empty_document() {
    let config = Config::from_json_str("{}").expect("empty object is all defaults");
    assert_eq!(config, Config::default());
}

#[test]
fn test_from_json_rejects_invalid_values() {
    let result = Config::from_json_str(r#"{ "classifier": { "top_n": 0 } }"#);
    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            section: "classifier",
            ..
        })
    ));

    let result = Config::from_json_str(r#"{ "reranker": { "lambda_coeff": -1.0 } }"#);
    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            section: "reranker",
            ..
        })
    ));
}

#[test]
fn test_from_json_malformed() {
    let result = Config::from_json_str("{ not json");
    assert!(matches!(result, Err(ConfigError::Json(_))));
}

#[test]
fn test_from_json_file() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let path = dir.path().join("banter.json");
    std::fs::write(&path, r#"{ "reranker": { "num_context_turns": 3, "seed": 7 } }"#)
        .expect("write config");

    let config = Config::from_json_file(&path).expect("readable config");

    assert_eq!(config.reranker.num_context_turns, 3);
    assert_eq!(config.reranker.seed, Some(7));
}

#[test]
fn test_from_json_file_missing() {
    let result = Config::from_json_file("/definitely/not/here/banter.json");
    assert!(matches!(result, Err(ConfigError::Read { .. })));
}

#[test]
fn test_validate_rejects_zero_context_turns() {
    let mut config = Config::default();
    config.reranker.num_context_turns = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_empty_path() {
    let mut config = Config::default();
    config.classifier.save_path = Some(PathBuf::new());
    assert!(config.validate().is_err());
}
