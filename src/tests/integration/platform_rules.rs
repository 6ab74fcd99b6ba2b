//! Platform Rule Cases
//!
//! Parameterized checks over the platform table and content-type parsing.

use crate::core::knowledge::{find_platform, ContentType};
use rstest::rstest;

#[rstest]
#[case("twitter", 280, 2)]
#[case("linkedin", 3000, 3)]
#[case("facebook", 63_206, 2)]
#[case("instagram", 2200, 8)]
fn platform_limits(
    #[case] id: &str,
    #[case] max_length: usize,
    #[case] optimal_hashtags: usize,
) {
    let profile = find_platform(id).unwrap();
    assert_eq!(profile.max_length, max_length);
    assert_eq!(profile.optimal_hashtag_count, optimal_hashtags);
    assert!(!profile.best_times.is_empty());
}

#[rstest]
#[case("twitter")]
#[case("linkedin")]
#[case("facebook")]
#[case("instagram")]
fn formatted_content_at_cap_validates(#[case] id: &str) {
    let profile = find_platform(id).unwrap();
    let content = "a".repeat(profile.max_length);
    assert!(profile.validates(&content));
    assert!(!profile.validates(&format!("{content}b")));
}

#[rstest]
#[case("educational", ContentType::Educational)]
#[case("benefit-focused", ContentType::BenefitFocused)]
#[case("benefit_focused", ContentType::BenefitFocused)]
#[case("social-proof", ContentType::SocialProof)]
#[case("promotional", ContentType::Promotional)]
#[case("engagement", ContentType::Engagement)]
fn content_type_parsing(#[case] input: &str, #[case] expected: ContentType) {
    assert_eq!(ContentType::from_str(input), Some(expected));
}
