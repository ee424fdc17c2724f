use super::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

fn reranker(turns: usize) -> ResponseReRanker {
    ResponseReRanker::new(RerankerConfig::new(turns, 10.0).with_seed(7)).expect("valid config")
}

/// Single-element batch with one context turn.
fn one_turn_batch(
    last_intent: &str,
    last_sentiment: &str,
    reply_intents: &[&str],
    reply_sentiments: &[&str],
) -> RerankBatch {
    let n = reply_intents.len();
    let candidates: Vec<String> = (0..n).map(|i| format!("reply {i}")).collect();
    let scores: Vec<f32> = (0..n).map(|i| 1.0 - i as f32 * 0.1).collect();

    let intents: Vec<&str> = std::iter::once(last_intent)
        .chain(reply_intents.iter().copied())
        .collect();
    let sentiments: Vec<&str> = std::iter::once(last_sentiment)
        .chain(reply_sentiments.iter().copied())
        .collect();

    RerankBatch::new(vec![candidates], vec![scores], sentiments, intents)
}

#[test]
fn test_tag_parsing() {
    assert_eq!(Intent::from("interrogative"), Intent::Interrogative);
    assert_eq!(Intent::from("shrug"), Intent::Other("shrug".to_string()));
    assert_eq!(Sentiment::from("skip"), Sentiment::Skip);
    assert_eq!(Sentiment::from("Neutral"), Sentiment::Other("Neutral".to_string()));
    assert_eq!(Sentiment::Speech.to_string(), "speech");
    assert_eq!(String::from(Intent::Other("x".into())), "x");
}

#[test]
fn test_tag_serde_as_plain_strings() {
    let tags = vec![Intent::Declarative, Intent::Other("y".into())];
    let json = serde_json::to_string(&tags).unwrap();
    assert_eq!(json, r#"["declarative","y"]"#);

    let parsed: Vec<Sentiment> = serde_json::from_str(r#"["negative","odd"]"#).unwrap();
    assert_eq!(parsed, vec![Sentiment::Negative, Sentiment::Other("odd".into())]);
}

#[test]
fn test_intent_filter_rules() {
    use Intent::*;
    let replies = [Declarative, Interrogative, Imperative, Other("x".into())];

    assert_eq!(intent_filter(&Interrogative, &replies), vec![0, 2]);
    assert_eq!(intent_filter(&Imperative, &replies), vec![0]);
    assert_eq!(intent_filter(&Declarative, &replies), vec![0, 1, 2, 3]);
    assert_eq!(intent_filter(&Other("x".into()), &replies), vec![0, 1, 2, 3]);
}

#[test]
fn test_sentiment_filter_rules() {
    use Sentiment::*;
    let replies = [Neutral, Positive, Skip, Speech, Negative, Other("x".into())];

    assert_eq!(sentiment_filter(&Neutral, &replies), vec![0, 1]);
    assert_eq!(sentiment_filter(&Speech, &replies), vec![3]);
    assert_eq!(sentiment_filter(&Positive, &replies), vec![1]);
    assert_eq!(sentiment_filter(&Negative, &replies), vec![0, 1, 3, 5]);
    assert_eq!(sentiment_filter(&Skip, &replies), vec![0, 1, 3, 5]);
    assert_eq!(sentiment_filter(&Other("x".into()), &replies), vec![0, 1, 3, 5]);
}

#[test]
fn test_combine_fallback_chain() {
    let pool = combine(&[0, 2, 3], &[1, 2, 3], 4);
    assert_eq!(pool.indices, vec![2, 3]);
    assert_eq!(pool.source, PoolSource::Intersection);

    let pool = combine(&[0], &[1, 3], 4);
    assert_eq!(pool.indices, vec![1, 3]);
    assert_eq!(pool.source, PoolSource::SentimentOnly);

    let pool = combine(&[0, 2], &[], 4);
    assert_eq!(pool.indices, vec![0, 2]);
    assert_eq!(pool.source, PoolSource::IntentOnly);

    let pool = combine(&[], &[], 3);
    assert_eq!(pool.indices, vec![0, 1, 2]);
    assert_eq!(pool.source, PoolSource::Unfiltered);
}

#[test]
fn test_interrogative_scenario_never_picks_index_one() {
    let batch = one_turn_batch(
        "interrogative",
        "neutral",
        &["declarative", "interrogative", "imperative"],
        &["neutral", "neutral", "neutral"],
    );
    let r = reranker(1);

    let pool = r.select(&batch, 0).unwrap();
    assert_eq!(pool.indices, vec![0, 2]);
    assert_eq!(pool.source, PoolSource::Intersection);

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let out = r.rerank_with_rng(&batch, &mut rng).unwrap();
        assert_ne!(out.responses[0], "reply 1");
        assert!(out.responses[0] == "reply 0" || out.responses[0] == "reply 2");
    }
}

#[test]
fn test_disjoint_filters_fall_back_to_sentiment() {
    // Intent keeps {0}; sentiment keeps {1, 2}.
    let batch = one_turn_batch(
        "imperative",
        "neutral",
        &["declarative", "interrogative", "imperative"],
        &["negative", "positive", "neutral"],
    );
    let r = reranker(1);

    let pool = r.select(&batch, 0).unwrap();
    assert_eq!(pool.indices, vec![1, 2]);
    assert_eq!(pool.source, PoolSource::SentimentOnly);

    for _ in 0..50 {
        let out = r.rerank(&batch).unwrap();
        assert_ne!(out.responses[0], "reply 0");
    }
}

#[test]
fn test_unfiltered_when_nothing_passes() {
    let batch = one_turn_batch(
        "imperative",
        "speech",
        &["interrogative", "imperative"],
        &["neutral", "positive"],
    );
    let pool = reranker(1).select(&batch, 0).unwrap();
    assert_eq!(pool.indices, vec![0, 1]);
    assert_eq!(pool.source, PoolSource::Unfiltered);
}

#[test]
fn test_last_context_turn_is_used() {
    // Three context turns; only the third one decides the rules.
    let batch = RerankBatch::new(
        vec![vec!["a", "b"]],
        vec![vec![0.9, 0.8]],
        ["speech", "speech", "positive", "neutral", "positive"],
        ["imperative", "imperative", "declarative", "interrogative", "declarative"],
    );

    let pool = reranker(3).select(&batch, 0).unwrap();
    assert_eq!(pool.indices, vec![1]);
    assert_eq!(pool.source, PoolSource::Intersection);
}

#[test]
fn test_output_carries_original_scores() {
    let batch = one_turn_batch(
        "declarative",
        "positive",
        &["declarative", "declarative", "declarative"],
        &["neutral", "neutral", "positive"],
    );

    let out = reranker(1).rerank(&batch).unwrap();
    assert_eq!(out.responses, vec!["reply 2"]);
    assert_eq!(out.scores, vec![1.0 - 2.0 * 0.1]);
}

#[test]
fn test_multi_element_batch_is_position_aligned() {
    let batch = RerankBatch::new(
        vec![vec!["q0-a", "q0-b"], vec!["q1-a", "q1-b"]],
        vec![vec![0.5, 0.4], vec![0.3, 0.2]],
        ["neutral", "negative", "positive", "positive", "positive", "neutral"],
        ["declarative"; 6],
    );

    let r = reranker(1);
    let pools = r.candidate_pools(&batch).unwrap();
    assert_eq!(pools[0].indices, vec![1]);
    assert_eq!(pools[1].indices, vec![0]);

    let out = r.rerank(&batch).unwrap();
    assert_eq!(out.responses, vec!["q0-b", "q1-a"]);
    assert_eq!(out.scores, vec![0.4, 0.3]);
    assert_eq!(out.iter().count(), 2);
}

#[test]
fn test_rank_weights_decay_and_normalize() {
    let w = rank_weights(3, 10.0);

    assert_eq!(w.len(), 3);
    assert!(w[0] > w[1] && w[1] > w[2]);
    assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    assert!((w[1] / w[0] - (-0.1f64).exp()).abs() < 1e-12);

    assert_eq!(rank_weights(1, 10.0), vec![1.0]);
    assert!(rank_weights(0, 10.0).is_empty());
}

#[test]
fn test_sample_position_empty_pool_is_error() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(
        sample_position(0, 10.0, &mut rng).unwrap_err(),
        RerankerError::Sampling { .. }
    ));
}

#[test]
fn test_small_lambda_favors_first() {
    let mut rng = StdRng::seed_from_u64(3);
    let first = (0..1000)
        .filter(|_| sample_position(4, 0.05, &mut rng).unwrap() == 0)
        .count();
    assert!(first > 990, "first position drawn {first} times");
}

#[test]
fn test_seeded_reranker_is_deterministic() {
    let batch = one_turn_batch(
        "declarative",
        "negative",
        &["declarative"; 6],
        &["neutral"; 6],
    );

    let run = |seed| {
        let r = ResponseReRanker::new(RerankerConfig::new(1, 2.0).with_seed(seed)).unwrap();
        (0..20)
            .map(|_| r.rerank(&batch).unwrap().responses.remove(0))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(11), run(11));
}

#[test]
fn test_rerank_with_rng_matches_same_seed() {
    let batch = one_turn_batch("declarative", "neutral", &["declarative"; 5], &["neutral"; 5]);
    let r = reranker(1);

    let a = r.rerank_with_rng(&batch, &mut StdRng::seed_from_u64(99)).unwrap();
    let b = r.rerank_with_rng(&batch, &mut StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(a, b);

    // A dyn source works too.
    let mut boxed: Box<dyn RngCore> = Box::new(StdRng::seed_from_u64(99));
    let c = r.rerank_with_rng(&batch, &mut *boxed).unwrap();
    assert_eq!(a, c);
}

#[test]
fn test_invalid_config() {
    for config in [
        RerankerConfig::new(0, 10.0),
        RerankerConfig::new(1, 0.0),
        RerankerConfig::new(1, -1.0),
        RerankerConfig::new(1, f64::NAN),
    ] {
        assert!(matches!(
            ResponseReRanker::new(config).unwrap_err(),
            RerankerError::InvalidConfig { .. }
        ));
    }
}

#[test]
fn test_empty_batch() {
    let out = reranker(2).rerank(&RerankBatch::default()).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_candidate_score_list_count_mismatch() {
    let mut batch = one_turn_batch("declarative", "neutral", &["declarative"], &["neutral"]);
    batch.scores.push(vec![0.1]);
    assert!(matches!(
        reranker(1).rerank(&batch).unwrap_err(),
        RerankerError::InvalidInput { .. }
    ));
}

#[test]
fn test_candidate_score_length_mismatch() {
    let mut batch = one_turn_batch("declarative", "neutral", &["declarative"; 2], &["neutral"; 2]);
    batch.scores[0].pop();
    assert!(matches!(
        reranker(1).rerank(&batch).unwrap_err(),
        RerankerError::InvalidInput { .. }
    ));
}

#[test]
fn test_empty_candidate_list() {
    let batch = RerankBatch::new(
        vec![Vec::<String>::new()],
        vec![vec![]],
        ["neutral"],
        ["declarative"],
    );
    assert!(matches!(
        reranker(1).rerank(&batch).unwrap_err(),
        RerankerError::InvalidInput { .. }
    ));
}

#[test]
fn test_non_uniform_batch() {
    let batch = RerankBatch::new(
        vec![vec!["a", "b"], vec!["c"]],
        vec![vec![0.1, 0.2], vec![0.3]],
        ["neutral"; 5],
        ["declarative"; 5],
    );
    let err = reranker(1).rerank(&batch).unwrap_err();
    assert!(matches!(
        err,
        RerankerError::NonUniformBatch {
            position: 1,
            expected: 2,
            actual: 1
        }
    ));
}

#[test]
fn test_tag_window_mismatch() {
    let mut batch = one_turn_batch("declarative", "neutral", &["declarative"; 2], &["neutral"; 2]);
    batch.intent_tags.pop();

    let err = reranker(1).rerank(&batch).unwrap_err();
    assert!(matches!(
        err,
        RerankerError::TagWindowMismatch {
            stream: "intent",
            expected: 3,
            actual: 2,
            ..
        }
    ));
}

#[test]
fn test_select_out_of_range() {
    let batch = one_turn_batch("declarative", "neutral", &["declarative"], &["neutral"]);
    assert!(matches!(
        reranker(1).select(&batch, 1).unwrap_err(),
        RerankerError::InvalidInput { .. }
    ));
}

#[test]
fn test_rejects_bad_batch_while_rng_is_busy() {
    let r = reranker(1);
    let mut batch = one_turn_batch("declarative", "neutral", &["declarative"; 2], &["neutral"; 2]);
    batch.intent_tags.pop();

    let _held = r.rng.lock();

    assert!(matches!(
        r.rerank(&batch).unwrap_err(),
        RerankerError::TagWindowMismatch { .. }
    ));
    assert!(r.candidate_pools(&RerankBatch::default()).unwrap().is_empty());
}

#[test]
fn test_sample_position_rejects_bad_lambda() {
    let mut rng = StdRng::seed_from_u64(1);

    for lambda in [0.0, -2.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            sample_position(3, lambda, &mut rng).unwrap_err(),
            RerankerError::Sampling { .. }
        ));
    }
    assert!(rank_weights(3, 0.0).iter().any(|w| w.is_nan()));
}
