use rstest::rstest;

use text_evals::metrics::{self, MetricParams};
use text_evals::{EvalContext, Evaluation, Instance, Scored, score};

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

async fn pairwise_score(
    metric: text_evals::PairwiseMetric,
    reference: &str,
    prediction: &str,
) -> f64 {
    metric
        .compute(&EvalContext::new(), &texts(&[reference]), &texts(&[prediction]))
        .await
        .expect("built-in metric should not fail")[0]
}

async fn pointwise_score(metric: text_evals::PointwiseMetric, prediction: &str) -> f64 {
    metric
        .compute(&EvalContext::new(), &texts(&[prediction]))
        .await
        .expect("built-in metric should not fail")[0]
}

const ANSWER: &str = "Most people agree: [use cargo clippy](https://www.reddit.com/r/rust/comments/k1x2y3/lints/) \
and [read the book twice](https://www.reddit.com/r/learnrust/comments/q9w8e7/book/). \
See also [the docs](https://doc.rust-lang.org/).";

#[rstest]
#[case("a cat sat", "a cat sat", 1.0)]
#[case("a cat sat", "a cat", 0.5)]
#[case("cat", "a cat sat", 0.5)]
#[case("a cat sat", "a dog sat", 0.0)]
#[tokio::test]
async fn string_similarity_cases(
    #[case] reference: &str,
    #[case] prediction: &str,
    #[case] expected: f64,
) {
    assert_eq!(
        pairwise_score(metrics::string_similarity(), reference, prediction).await,
        expected
    );
}

#[rstest]
#[case("abcd", "ab", 0.5)]
#[case("ab", "abcd", 2.0)]
#[case("", "anything", 0.0)]
#[tokio::test]
async fn length_ratio_cases(
    #[case] reference: &str,
    #[case] prediction: &str,
    #[case] expected: f64,
) {
    assert_eq!(
        pairwise_score(metrics::length_ratio(), reference, prediction).await,
        expected
    );
}

#[tokio::test]
async fn word_overlap_end_to_end() {
    let evaluation = Evaluation::pairwise(
        "overlap",
        "",
        vec![metrics::string_similarity(), metrics::word_overlap()],
    );

    let results = evaluation
        .run_pairwise(
            &EvalContext::new(),
            &[
                Instance::new("a cat sat", "a cat sat"),
                Instance::new("a cat sat", "a dog sat"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(results[0].score("string_similarity"), Some(1.0));
    assert_eq!(results[0].score("word_overlap"), Some(1.0));
    assert_eq!(results[1].score("word_overlap"), Some(0.5));
}

#[rstest]
#[case("a+b", "a b", 0.0)]
#[case("c++ rocks", "C++ rocks!", 1.0)]
#[case("c++ rocks", "c rocks", 1.0 / 3.0)]
#[case("well-known (fact)", "well known fact", 1.0)]
#[tokio::test]
async fn word_overlap_keeps_symbols_inside_words(
    #[case] reference: &str,
    #[case] prediction: &str,
    #[case] expected: f64,
) {
    let score = pairwise_score(metrics::word_overlap(), reference, prediction).await;
    assert!((score - expected).abs() < 1e-12, "got {score}, want {expected}");
}

#[rstest]
#[case(&["alpha", "beta", "gamma"], "only ALPHA shows up", 1.0 / 3.0)]
#[case(&["alpha", "beta", "gamma"], "alpha beta gamma", 1.0)]
#[case(&["alpha", "beta", "gamma"], "none of them", 0.0)]
#[case(&[], "alpha", 0.0)]
#[tokio::test]
async fn keyword_presence_cases(
    #[case] keywords: &[&str],
    #[case] prediction: &str,
    #[case] expected: f64,
) {
    let score = pointwise_score(metrics::keyword_presence(keywords), prediction).await;
    assert!((score - expected).abs() < 1e-12, "got {score}, want {expected}");
}

#[tokio::test]
async fn quote_metrics_on_a_mixed_answer() {
    let cases = [
        (metrics::quotes_count(), 2.0),
        (metrics::quotes_presence(), 1.0),
        (metrics::external_links_count(), 1.0),
        (metrics::quote_diversity(), 2.0),
        (metrics::post_diversity(), 2.0),
        (metrics::subreddit_diversity(), 2.0),
        // "use cargo clippy" has 3 words, "read the book twice" has 4
        (metrics::short_quotes_count(4), 1.0),
        (metrics::short_quotes_count(5), 2.0),
        (
            metrics::quotes_size(),
            ("use cargo clippy".len() + "read the book twice".len()) as f64,
        ),
    ];

    for (metric, expected) in cases {
        let name = metric.name().to_string();
        assert_eq!(pointwise_score(metric, ANSWER).await, expected, "{name}");
    }
}

#[tokio::test]
async fn quotes_ratio_counts_whitespace_words() {
    let text = "[hi](https://www.reddit.com/r/rust/comments/a1/x/) there";
    assert_eq!(pointwise_score(metrics::quotes_ratio(), text).await, 0.5);
    assert_eq!(pointwise_score(metrics::quotes_ratio(), "   ").await, 0.0);
}

#[tokio::test]
async fn repeated_quote_counts_once_for_diversity() {
    let quote = "[same](https://www.reddit.com/r/rust/comments/a1/x/)";
    let text = format!("{quote} {quote}");
    assert_eq!(pointwise_score(metrics::quotes_count(), &text).await, 2.0);
    assert_eq!(pointwise_score(metrics::quote_diversity(), &text).await, 1.0);
    assert_eq!(pointwise_score(metrics::post_diversity(), &text).await, 1.0);
}

#[tokio::test]
async fn quote_growth_between_reference_and_prediction() {
    let growth = metrics::quotes_count().to_pairwise(score::difference);
    let scores = growth
        .compute(
            &EvalContext::new(),
            &texts(&["no quotes at all", ANSWER]),
            &texts(&[ANSWER, "no quotes at all"]),
        )
        .await
        .unwrap();
    assert_eq!(scores, [2.0, -2.0]);
}

#[tokio::test]
async fn registry_honours_params() {
    let params = MetricParams {
        keywords: Some(vec!["clippy".to_string()]),
        threshold: Some(10),
    };

    let keywords = metrics::builtin_pointwise("keyword_presence", &params).unwrap();
    assert_eq!(pointwise_score(keywords, ANSWER).await, 1.0);

    let short = metrics::builtin_pointwise("short_quotes_count", &params).unwrap();
    assert_eq!(pointwise_score(short, ANSWER).await, 2.0);

    let default_keywords =
        metrics::builtin_pointwise("keyword_presence", &MetricParams::default()).unwrap();
    assert_eq!(
        pointwise_score(default_keywords, "a significant result").await,
        1.0 / 3.0
    );
}
