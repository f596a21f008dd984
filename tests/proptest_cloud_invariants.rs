//! Property-based invariant tests for weighting, scaling and placement.
//!
//! 1. Excluded words never survive unless an inclusion re-adds them.
//! 2. Explicit inclusion weights are taken verbatim.
//! 3. Unweighted inclusions get 1.2x the organic maximum (or 60), which
//!    lifts them above every organic weight.
//! 4. Capping keeps exactly the stable top-k.
//! 5. Linear and sqrt font sizes are monotonic in weight.
//! 6. Placed boxes never overlap and stay on the canvas.
//! 7. Placement is reproducible for a fixed seed.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use yuntu::layout::{
    font_size, CanvasSize, LayoutConfig, LayoutEngine, ScaleKind, SizedWord, SpiralKind,
};
use yuntu::weighting::{merge, ExclusionSet, InclusionSpec, WeightedWord};

// ── Helpers ─────────────────────────────────────────────────────────────

fn word_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,3}"
}

fn extracted_strategy() -> impl Strategy<Value = Vec<WeightedWord>> {
    prop::collection::vec((word_strategy(), 0.0f64..1000.0), 0..30).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(text, value)| WeightedWord::new(text, value))
            .collect()
    })
}

fn inclusions_strategy() -> impl Strategy<Value = Vec<InclusionSpec>> {
    prop::collection::vec(
        (word_strategy(), prop::option::of(-100.0f64..1000.0)),
        0..8,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(text, weight)| InclusionSpec {
                text,
                explicit_weight: weight,
            })
            .collect()
    })
}

fn exclusions_strategy() -> impl Strategy<Value = ExclusionSet> {
    prop::collection::vec(word_strategy(), 0..10)
        .prop_map(|words| words.iter().map(String::as_str).collect())
}

fn sized_words_strategy() -> impl Strategy<Value = Vec<SizedWord>> {
    prop::collection::vec(("[a-z\u{4e00}-\u{4e20}]{1,6}", 10.0f64..60.0), 1..40).prop_map(
        |pairs| {
            let mut words: Vec<SizedWord> = pairs
                .into_iter()
                .map(|(text, size)| SizedWord::new(text, size))
                .collect();
            words.sort_by(|a, b| b.font_size.total_cmp(&a.font_size));
            words
        },
    )
}

fn layout_config_strategy() -> impl Strategy<Value = LayoutConfig> {
    (
        prop_oneof![Just(SpiralKind::Archimedean), Just(SpiralKind::Rectangular)],
        0u32..5,
        0.0f64..6.0,
    )
        .prop_map(|(spiral, rotation_steps, padding)| LayoutConfig {
            spiral,
            rotation_steps,
            rotation_range: (-90.0, 90.0),
            padding,
            ..LayoutConfig::default()
        })
}

fn weight_of(words: &[WeightedWord], text: &str) -> Option<f64> {
    words.iter().find(|w| w.text == text).map(|w| w.value)
}

/// Maximum over surviving words whose text no weighted inclusion overrides
fn organic_max(
    extracted: &[WeightedWord],
    exclusions: &ExclusionSet,
    inclusions: &[InclusionSpec],
) -> Option<f64> {
    extracted
        .iter()
        .filter(|w| !exclusions.contains(&w.text))
        .filter(|w| {
            inclusions
                .iter()
                .all(|i| i.explicit_weight.is_none() || i.text != w.text)
        })
        .map(|w| w.value)
        .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Merge rules
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn excluded_words_only_return_through_inclusions(
        extracted in extracted_strategy(),
        exclusions in exclusions_strategy(),
        inclusions in inclusions_strategy(),
    ) {
        let merged = merge(&extracted, &exclusions, &inclusions, 1000);
        for word in &merged {
            if exclusions.contains(&word.text) {
                prop_assert!(
                    inclusions.iter().any(|i| i.text == word.text),
                    "excluded '{}' leaked into the output", word.text
                );
            }
        }
    }

    #[test]
    fn inclusion_weights_follow_the_rules(
        extracted in extracted_strategy(),
        exclusions in exclusions_strategy(),
        inclusions in inclusions_strategy(),
    ) {
        let merged = merge(&extracted, &exclusions, &inclusions, 1000);
        let organic = organic_max(&extracted, &exclusions, &inclusions);
        let derived = organic.unwrap_or(50.0) * 1.2;

        for inclusion in &inclusions {
            // Last spec for a text wins
            let last = inclusions
                .iter()
                .rev()
                .find(|i| i.text == inclusion.text)
                .unwrap();
            let expected = last.explicit_weight.unwrap_or(derived);
            prop_assert_eq!(weight_of(&merged, &inclusion.text), Some(expected));

            // Highlighted words land above every organic weight
            if let (None, Some(max)) = (last.explicit_weight, organic) {
                if max > 0.0 {
                    prop_assert!(expected > max);
                }
            }
        }
    }

    #[test]
    fn unweighted_inclusion_on_empty_input_is_sixty(text in word_strategy()) {
        let merged = merge(&[], &ExclusionSet::new(), &[InclusionSpec::unset(text.clone())], 10);
        prop_assert_eq!(merged, vec![WeightedWord::new(text, 60.0)]);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Cap keeps the stable top-k
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn cap_is_stable_top_k(
        extracted in extracted_strategy(),
        inclusions in inclusions_strategy(),
        cap in 0usize..40,
    ) {
        let exclusions = ExclusionSet::new();
        let full = merge(&extracted, &exclusions, &inclusions, usize::MAX);
        let capped = merge(&extracted, &exclusions, &inclusions, cap);

        prop_assert!(capped.len() <= cap);
        prop_assert_eq!(&capped[..], &full[..capped.len()]);
        for pair in full.windows(2) {
            prop_assert!(pair[0].value >= pair[1].value);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Monotonic scales
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn linear_and_sqrt_are_monotonic(
        lo in 0.0f64..1000.0,
        span in 0.001f64..1000.0,
        t1 in 0.0f64..=1.0,
        t2 in 0.0f64..=1.0,
    ) {
        let domain = (lo, lo + span);
        let (a, b) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        let va = lo + a * span;
        let vb = lo + b * span;

        for kind in [ScaleKind::Linear, ScaleKind::Sqrt] {
            let sa = font_size(va, domain, (14.0, 80.0), kind);
            let sb = font_size(vb, domain, (14.0, 80.0), kind);
            prop_assert!(sa <= sb, "{:?}: f({}) = {} > f({}) = {}", kind, va, sa, vb, sb);
            prop_assert!((14.0..=80.0).contains(&sa));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6-7. Placement
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn placed_boxes_never_overlap(
        words in sized_words_strategy(),
        config in layout_config_strategy(),
        width in 150.0f64..800.0,
        height in 150.0f64..600.0,
        seed in any::<u64>(),
    ) {
        let padding = config.padding;
        let engine = LayoutEngine::new(config);
        let canvas = CanvasSize::new(width, height);
        let result = engine
            .place(&words, canvas, &mut StdRng::seed_from_u64(seed))
            .unwrap();

        prop_assert_eq!(result.placed_count() + result.dropped_count(), words.len());

        let bounds = canvas.bounds();
        for (i, a) in result.words.iter().enumerate() {
            prop_assert!(bounds.contains(&a.bounding_box));
            for b in &result.words[i + 1..] {
                prop_assert!(
                    !a.bounding_box.inflate(padding).intersects(&b.bounding_box.inflate(padding)),
                    "'{}' {:?} overlaps '{}' {:?}",
                    a.text, a.bounding_box, b.text, b.bounding_box
                );
            }
        }
    }

    #[test]
    fn placement_is_reproducible(
        words in sized_words_strategy(),
        config in layout_config_strategy(),
        seed in any::<u64>(),
    ) {
        let engine = LayoutEngine::new(config);
        let canvas = CanvasSize::new(500.0, 350.0);
        let a = engine.place(&words, canvas, &mut StdRng::seed_from_u64(seed)).unwrap();
        let b = engine.place(&words, canvas, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(a, b);
    }
}
