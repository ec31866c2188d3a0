//! Metrics over Reddit quotes embedded as markdown links.
//!
//! A quote looks like `["some user excerpt"](https://www.reddit.com/r/sub/comments/id/...)`.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::PointwiseMetric;

use super::per_prediction;

pub const DEFAULT_SHORT_QUOTE_THRESHOLD: usize = 4;

static REDDIT_QUOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(.*?)\]\((https://www\.reddit\.com/.*?)\)").expect("reddit quote pattern")
});

static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(.*?)\]\((https://[^)]+)\)").expect("markdown link pattern")
});

static POST_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://www\.reddit\.com/r/.*?/comments/([a-zA-Z0-9]+)/")
        .expect("post id pattern")
});

static SUBREDDIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://www\.reddit\.com/r/([a-zA-Z0-9_]+)/").expect("subreddit pattern")
});

fn quotes(text: &str) -> impl Iterator<Item = &str> {
    REDDIT_QUOTE.find_iter(text).map(|m| m.as_str())
}

fn quoted_texts(text: &str) -> impl Iterator<Item = &str> {
    REDDIT_QUOTE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn unique_captures(text: &str, pattern: &Regex) -> usize {
    quotes(text)
        .flat_map(|quote| pattern.captures_iter(quote))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect::<HashSet<_>>()
        .len()
}

pub fn quotes_count() -> PointwiseMetric {
    PointwiseMetric::from_fn(
        "quotes_count",
        "Counts the number of Reddit user quotes in markdown format",
        |_ctx, predictions| {
            Ok(per_prediction(predictions, |text| quotes(text).count() as f64))
        },
    )
}

/// Quotes per whitespace-separated word; 0 for a text without words.
pub fn quotes_ratio() -> PointwiseMetric {
    PointwiseMetric::from_fn(
        "quotes_ratio",
        "Calculates the ratio of Reddit user quotes to the total number of words",
        |_ctx, predictions| {
            Ok(per_prediction(predictions, |text| {
                let words = text.split_whitespace().count();
                if words == 0 {
                    return 0.0;
                }
                quotes(text).count() as f64 / words as f64
            }))
        },
    )
}

pub fn quotes_presence() -> PointwiseMetric {
    PointwiseMetric::from_fn(
        "quotes_presence",
        "Checks if there is at least one Reddit user quote in the text",
        |_ctx, predictions| {
            Ok(per_prediction(predictions, |text| {
                if REDDIT_QUOTE.is_match(text) { 1.0 } else { 0.0 }
            }))
        },
    )
}

/// Total length of the quoted excerpts, in bytes.
pub fn quotes_size() -> PointwiseMetric {
    PointwiseMetric::from_fn(
        "quotes_size",
        "Calculates the total size of quoted text in characters",
        |_ctx, predictions| {
            Ok(per_prediction(predictions, |text| {
                quoted_texts(text).map(str::len).sum::<usize>() as f64
            }))
        },
    )
}

/// Quotes whose excerpt has fewer than `threshold` words.
pub fn short_quotes_count(threshold: usize) -> PointwiseMetric {
    PointwiseMetric::from_fn(
        "short_quotes_count",
        "Counts the number of quotes with fewer words than the specified threshold",
        move |_ctx, predictions| {
            Ok(per_prediction(predictions, |text| {
                quoted_texts(text)
                    .filter(|quote| quote.split_whitespace().count() < threshold)
                    .count() as f64
            }))
        },
    )
}

/// https markdown links that do not point at reddit.com.
pub fn external_links_count() -> PointwiseMetric {
    PointwiseMetric::from_fn(
        "external_links_count",
        "Counts the number of external site references in markdown format",
        |_ctx, predictions| {
            Ok(per_prediction(predictions, |text| {
                MARKDOWN_LINK
                    .find_iter(text)
                    .filter(|link| !link.as_str().contains("reddit.com"))
                    .count() as f64
            }))
        },
    )
}

pub fn quote_diversity() -> PointwiseMetric {
    PointwiseMetric::from_fn(
        "quote_diversity",
        "Counts the number of unique Reddit links referenced in the text",
        |_ctx, predictions| {
            Ok(per_prediction(predictions, |text| {
                quotes(text).collect::<HashSet<_>>().len() as f64
            }))
        },
    )
}

pub fn post_diversity() -> PointwiseMetric {
    PointwiseMetric::from_fn(
        "post_diversity",
        "Counts the number of unique Reddit post IDs referenced in the text",
        |_ctx, predictions| {
            Ok(per_prediction(predictions, |text| {
                unique_captures(text, &POST_ID) as f64
            }))
        },
    )
}

pub fn subreddit_diversity() -> PointwiseMetric {
    PointwiseMetric::from_fn(
        "subreddit_diversity",
        "Counts the number of unique subreddits referenced in the text",
        |_ctx, predictions| {
            Ok(per_prediction(predictions, |text| {
                unique_captures(text, &SUBREDDIT) as f64
            }))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUST_POST: &str =
        "[Borrowck is a friend](https://www.reddit.com/r/rust/comments/abc123/borrowck/)";
    const RUST_COMMENT: &str =
        "[Lifetimes finally clicked for me today](https://www.reddit.com/r/rust/comments/abc123/borrowck/c1)";
    const GO_POST: &str = "[gofmt](https://www.reddit.com/r/golang/comments/xyz789/fmt/)";
    const DOCS_LINK: &str = "[the book](https://doc.rust-lang.org/book/)";

    #[test]
    fn finds_reddit_quotes_only() {
        let text = format!("See {RUST_POST} and {DOCS_LINK}.");
        assert_eq!(quotes(&text).count(), 1);
        assert_eq!(quoted_texts(&text).collect::<Vec<_>>(), ["Borrowck is a friend"]);
    }

    #[test]
    fn unique_posts_and_subreddits() {
        let text = format!("{RUST_POST} {RUST_COMMENT} {GO_POST}");
        assert_eq!(unique_captures(&text, &POST_ID), 2);
        assert_eq!(unique_captures(&text, &SUBREDDIT), 2);
    }

    #[test]
    fn plain_text_has_no_quotes() {
        assert_eq!(quotes("no links here").count(), 0);
        assert_eq!(unique_captures("no links here", &SUBREDDIT), 0);
    }
}
