//! Seed Templates
//!
//! Built-in template pools loaded at knowledge-base bootstrap: a generic
//! cross-industry pool plus small pools for the known industry
//! specializations. Bodies use `{name}` variable slots resolved at render
//! time.

use super::types::{ContentType, NewTemplate};

/// Industry tags with a dedicated seed pool. Everything else uses the
/// generic pool.
pub const SPECIALIZED_INDUSTRIES: &[&str] = &["restaurant", "fitness", "retail"];

/// Whether an industry string matches a known specialization.
pub fn match_specialization(industry: &str) -> Option<&'static str> {
    let needle = industry.to_lowercase();
    SPECIALIZED_INDUSTRIES
        .iter()
        .find(|key| needle.contains(*key))
        .copied()
}

/// The full built-in seed set: generic pool plus all specialization pools.
pub fn seed_templates() -> Vec<NewTemplate> {
    let mut seeds = generic_pool();
    for industry in SPECIALIZED_INDUSTRIES {
        seeds.extend(industry_pool(industry));
    }
    seeds
}

/// Generic cross-industry pool, tagged with feature "general".
pub fn generic_pool() -> Vec<NewTemplate> {
    vec![
        NewTemplate::new(
            "general",
            "twitter",
            ContentType::Educational,
            "💡 Did you know? Teams using {company_name} cut busywork dramatically. {benefit}",
        )
        .with_hashtags(tags(&["productivity", "worksmarter"]))
        .with_call_to_action("Learn more at {link}"),
        NewTemplate::new(
            "general",
            "twitter",
            ContentType::Educational,
            "🚀 Quick tip: {how_it_works} That's how {company_name} keeps {feature} simple.",
        )
        .with_hashtags(tags(&["tips", "growth"]))
        .with_call_to_action("Try it free at {link}"),
        NewTemplate::new(
            "general",
            "twitter",
            ContentType::BenefitFocused,
            "Stop losing hours to {feature}. {company_name} handles it so you can focus on what matters.",
        )
        .with_hashtags(tags(&["efficiency", "smallbusiness"]))
        .with_call_to_action("Get started at {link}"),
        NewTemplate::new(
            "general",
            "twitter",
            ContentType::SocialProof,
            "\"{company_name} changed how we handle {feature}.\" — another happy customer. Join them!",
        )
        .with_hashtags(tags(&["customerlove"]))
        .with_call_to_action("See why at {link}"),
        NewTemplate::new(
            "general",
            "twitter",
            ContentType::Promotional,
            "🔥 {company_name} makes {feature} effortless. {benefit}",
        )
        .with_hashtags(tags(&["deal", "launch"]))
        .with_call_to_action("Start today at {link}"),
        NewTemplate::new(
            "general",
            "linkedin",
            ContentType::Educational,
            "Most teams underestimate how much time {feature} consumes.\n\nHere's the approach we see working: {how_it_works}\n\n{company_name} was built around exactly this workflow. {benefit}",
        )
        .with_hashtags(tags(&["leadership", "operations", "productivity"]))
        .with_call_to_action("Read more at {link}"),
        NewTemplate::new(
            "general",
            "linkedin",
            ContentType::BenefitFocused,
            "What would your team do with an extra day every week?\n\n{company_name} automates {feature} end to end. {benefit}",
        )
        .with_hashtags(tags(&["automation", "business"]))
        .with_call_to_action("Book a demo at {link}"),
        NewTemplate::new(
            "general",
            "linkedin",
            ContentType::SocialProof,
            "Case study: how one customer used {company_name} to transform {feature}.\n\nThe results speak for themselves — {benefit}",
        )
        .with_hashtags(tags(&["casestudy", "results"]))
        .with_call_to_action("Full story at {link}"),
        NewTemplate::new(
            "general",
            "instagram",
            ContentType::Engagement,
            "✨ Real talk: how much time does {feature} eat out of your week? 👀\n\nWe built {company_name} to give it back. {benefit} 💪",
        )
        .with_hashtags(tags(&[
            "entrepreneur",
            "hustle",
            "worklife",
            "founder",
            "growth",
        ]))
        .with_call_to_action("Link in bio"),
        NewTemplate::new(
            "general",
            "instagram",
            ContentType::Promotional,
            "🎯 New here? {company_name} takes care of {feature} so you don't have to.\n\n{how_it_works} ⚡",
        )
        .with_hashtags(tags(&["startup", "tools", "smallbiz", "automation"]))
        .with_call_to_action("Tap the link in bio"),
        NewTemplate::new(
            "general",
            "facebook",
            ContentType::Educational,
            "Running a business means wearing too many hats. {feature} shouldn't be one of them.\n\n{how_it_works}\n\nThat's what {company_name} does, every day. {benefit}",
        )
        .with_hashtags(tags(&["smallbusiness", "community"]))
        .with_call_to_action("Visit {link} to learn more"),
        NewTemplate::new(
            "general",
            "facebook",
            ContentType::Engagement,
            "Question for the community: what's your biggest headache with {feature}? 👇\n\nWe're always listening — it's how {company_name} got built.",
        )
        .with_hashtags(tags(&["community"]))
        .with_call_to_action("Tell us below"),
    ]
}

/// Seed pool for one specialized industry, tagged with that industry as the
/// feature.
pub fn industry_pool(industry: &str) -> Vec<NewTemplate> {
    match industry {
        "restaurant" => vec![
            NewTemplate::new(
                "restaurant",
                "instagram",
                ContentType::Promotional,
                "🍽️ Tonight's the night. {company_name} is serving up something special — {benefit}",
            )
            .with_hashtags(tags(&["foodie", "eatlocal", "dinner", "yum"]))
            .with_call_to_action("Reserve your table — link in bio"),
            NewTemplate::new(
                "restaurant",
                "facebook",
                ContentType::Engagement,
                "What dish should we bring back this month? 👀 {company_name} regulars, this one's for you.",
            )
            .with_hashtags(tags(&["local", "foodlovers"]))
            .with_call_to_action("Vote in the comments"),
        ],
        "fitness" => vec![
            NewTemplate::new(
                "fitness",
                "instagram",
                ContentType::Engagement,
                "💥 Progress isn't linear — showing up is what counts. {company_name} members proved it again this week. {benefit}",
            )
            .with_hashtags(tags(&["fitfam", "noexcuses", "training", "results"]))
            .with_call_to_action("Start your trial — link in bio"),
            NewTemplate::new(
                "fitness",
                "twitter",
                ContentType::BenefitFocused,
                "Your first session at {company_name} is on us. {benefit}",
            )
            .with_hashtags(tags(&["fitness", "goals"]))
            .with_call_to_action("Claim it at {link}"),
        ],
        "retail" => vec![
            NewTemplate::new(
                "retail",
                "instagram",
                ContentType::Promotional,
                "🛍️ Fresh arrivals just dropped at {company_name}. {benefit}",
            )
            .with_hashtags(tags(&["newarrivals", "shoplocal", "style"]))
            .with_call_to_action("Shop now — link in bio"),
            NewTemplate::new(
                "retail",
                "facebook",
                ContentType::SocialProof,
                "Five stars from another happy shopper ⭐⭐⭐⭐⭐ — thank you for making {company_name} your go-to. {benefit}",
            )
            .with_hashtags(tags(&["customerlove", "shoplocal"]))
            .with_call_to_action("See what's new at {link}"),
        ],
        _ => Vec::new(),
    }
}

fn tags(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
