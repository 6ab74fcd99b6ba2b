//! Template Store Property Tests

use crate::core::knowledge::store::render_body;
use crate::core::knowledge::{rank_templates, ContentType, NewTemplate, Template};
use proptest::prelude::*;
use std::collections::HashMap;

/// Brace-free text fragments, so substituted values cannot fabricate new
/// placeholder-shaped output.
fn fragment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .,!?#@'-]{0,40}"
}

fn variable_name() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,15}"
}

proptest! {
    /// Rendering never leaves a `{variable}` placeholder, no matter which
    /// variables the body declares or which the caller provides.
    #[test]
    fn render_never_leaves_placeholders(
        prefix in fragment(),
        middle in fragment(),
        suffix in fragment(),
        declared in prop::collection::vec(variable_name(), 0..4),
        provided in prop::collection::hash_map(variable_name(), fragment(), 0..4),
    ) {
        let mut body = prefix;
        for name in &declared {
            body.push_str(&format!("{{{name}}}"));
            body.push_str(&middle);
        }
        body.push_str(&suffix);

        let vars: HashMap<String, String> = provided.into_iter().collect();
        let rendered = render_body(&body, &vars);

        prop_assert!(
            !crate::core::knowledge::types::VARIABLE_RE.is_match(&rendered),
            "placeholder survived: {rendered}"
        );
    }

    /// Provided variables are substituted verbatim; unresolved ones vanish.
    #[test]
    fn render_substitutes_provided_values(
        name in variable_name(),
        value in fragment(),
    ) {
        let body = format!("start {{{name}}} end");
        let mut vars = HashMap::new();
        vars.insert(name, value.clone());
        let rendered = render_body(&body, &vars);
        prop_assert_eq!(rendered, format!("start {value} end"));
    }

    /// Ranking always orders by score descending, breaking ties on usage
    /// count descending.
    #[test]
    fn ranking_invariant_holds(
        metrics in prop::collection::vec((0u32..=100, 0u64..50), 1..20),
    ) {
        let mut templates: Vec<Template> = metrics
            .iter()
            .map(|(score, usage)| {
                let mut t = Template::from_new(NewTemplate::new(
                    "f",
                    "twitter",
                    ContentType::Educational,
                    "body",
                ));
                t.performance_score = *score as f64 / 100.0;
                t.usage_count = *usage;
                t
            })
            .collect();

        rank_templates(&mut templates);

        for pair in templates.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(
                a.performance_score > b.performance_score
                    || (a.performance_score == b.performance_score
                        && a.usage_count >= b.usage_count),
                "order violated: ({}, {}) before ({}, {})",
                a.performance_score,
                a.usage_count,
                b.performance_score,
                b.usage_count
            );
        }
    }
}
