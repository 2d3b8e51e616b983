//! Derived post metrics: hashtag extraction and engagement rate.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

/// `#` followed by ASCII word characters or Latin-1/Latin Extended letters
/// (U+00C0..=U+024F). Non-Latin scripts do not match.
static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#[A-Za-z0-9_\x{00C0}-\x{024F}]+").expect("valid hashtag regex")
});

/// Returns every hashtag in `text`, in order of appearance, including the
/// leading `#`. Duplicates are kept.
#[must_use]
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_RE
        .find_iter(text)
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// Engagement rate as a percentage: `(likes + comments) / followers * 100`,
/// rounded half away from zero to exactly two decimal places.
///
/// Returns zero when `followers` is zero. No other validation is applied;
/// negative inputs flow through unchanged.
#[must_use]
pub fn calculate_engagement_rate(likes: i64, comments: i64, followers: i64) -> Decimal {
    if followers == 0 {
        return Decimal::new(0, 2);
    }

    let interactions = Decimal::from(likes) + Decimal::from(comments);
    let mut rate = (interactions / Decimal::from(followers) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rate.rescale(2);
    rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_hashtags_in_order() {
        assert_eq!(
            extract_hashtags("Great day! #sunny #fun2025"),
            vec!["#sunny".to_string(), "#fun2025".to_string()]
        );
    }

    #[test]
    fn no_hashtags_yields_empty() {
        assert!(extract_hashtags("nothing to see here").is_empty());
        assert!(extract_hashtags("").is_empty());
        assert!(extract_hashtags("a lone # sign").is_empty());
    }

    #[test]
    fn accented_latin_letters_are_part_of_the_tag() {
        assert_eq!(
            extract_hashtags("Bom dia #café #açaí!"),
            vec!["#café".to_string(), "#açaí".to_string()]
        );
    }

    #[test]
    fn tag_stops_at_punctuation() {
        assert_eq!(extract_hashtags("#one,#two.#three"), vec!["#one", "#two", "#three"]);
    }

    #[test]
    fn extraction_is_stable_when_rerun_on_its_output() {
        let first = extract_hashtags("Great day! #sunny #fun2025 #sunny");
        let second = extract_hashtags(&first.join(" "));
        assert_eq!(first, second);
    }

    #[test]
    fn zero_followers_yields_zero_rate() {
        assert_eq!(calculate_engagement_rate(100, 20, 0), Decimal::ZERO);
    }

    #[test]
    fn engagement_rate_is_percentage_with_two_places() {
        let rate = calculate_engagement_rate(100, 20, 1000);
        assert_eq!(rate, Decimal::new(12, 0));
        assert_eq!(rate.to_string(), "12.00");
    }

    #[test]
    fn engagement_rate_rounds_half_away_from_zero() {
        assert_eq!(calculate_engagement_rate(1, 0, 3).to_string(), "33.33");
        // 2 / 1600 * 100 = 0.125
        assert_eq!(calculate_engagement_rate(2, 0, 1600).to_string(), "0.13");
    }

    #[test]
    fn negative_inputs_propagate() {
        assert_eq!(calculate_engagement_rate(-10, 0, 100).to_string(), "-10.00");
    }
}
