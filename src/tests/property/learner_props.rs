//! Performance Learner Property Tests

use crate::core::knowledge::{
    ContentType, EngagementSample, NewTemplate, PerformanceLearner, TemplateStore,
};
use proptest::prelude::*;
use std::sync::Arc;

fn sample(engagement: f64) -> EngagementSample {
    EngagementSample {
        engagement_rate: engagement,
        ..Default::default()
    }
}

proptest! {
    /// Each learning step moves the score toward the sample value and never
    /// past it, regardless of starting score or accumulated usage.
    #[test]
    fn learning_never_overshoots(
        start_score in 0.0f64..=1.0,
        usage in 0u64..200,
        engagement in 0.0f64..=1.0,
        steps in 1usize..30,
    ) {
        let store = Arc::new(TemplateStore::new());
        let id = store.add_template(NewTemplate::new(
            "f",
            "twitter",
            ContentType::Educational,
            "plain body",
        ));
        store.with_template_mut(&id, |t| {
            t.performance_score = start_score;
            t.usage_count = usage;
        });
        let learner = PerformanceLearner::new(Arc::clone(&store));

        let mut previous = start_score;
        for _ in 0..steps {
            let score = learner.learn(&id, &sample(engagement)).unwrap().new_score;

            let (low, high) = if previous <= engagement {
                (previous, engagement)
            } else {
                (engagement, previous)
            };
            prop_assert!(
                score >= low - 1e-12 && score <= high + 1e-12,
                "score {score} left [{low}, {high}]"
            );
            previous = score;
        }
    }

    /// With zero prior usage the first sample is adopted exactly.
    #[test]
    fn fresh_template_adopts_first_sample(engagement in 0.0f64..=1.0) {
        let store = Arc::new(TemplateStore::new());
        let id = store.add_template(NewTemplate::new(
            "f",
            "twitter",
            ContentType::Educational,
            "plain body",
        ));
        let learner = PerformanceLearner::new(Arc::clone(&store));

        let score = learner.learn(&id, &sample(engagement)).unwrap().new_score;
        prop_assert!((score - engagement).abs() < 1e-12);
    }
}
