//! Destructive and Edge Case Tests
//!
//! Feeds the draft appliers and catalogs documents that are malformed,
//! truncated or hostile and checks that nothing panics and nothing is lost.

use serde_json::{json, Value};

use crate::core::catalog::{extract_entries, Catalog, EffectEntry, TransitionEntry};
use crate::core::draft::{
    apply, AnimationApplier, AnimationDescriptor, AnimationType, DraftMerger, EffectDescriptor,
    TransitionApplier, TransitionDescriptor,
};
use crate::core::TimeRange;

fn glow() -> Vec<EffectDescriptor> {
    vec![EffectDescriptor::named("Glow").with_effect_id("42")]
}

#[test]
fn test_destructive_non_object_roots() {
    for doc in [json!(null), json!([]), json!("draft"), json!(3.5), json!(true)] {
        assert_eq!(apply(&doc, &glow()), doc);
    }
}

#[test]
fn test_destructive_wrongly_shaped_collections() {
    let cases = [
        json!({"materials": []}),
        json!({"materials": {"video_effects": {}}}),
        json!({"materials": {"material_animations": "x"}}),
        json!({"loudnesses": 7}),
        json!({"tracks": "video"}),
        json!({"extra_material_refs": {"a": 1}}),
        json!({"extra_material_refs": [1, 2, 3]}),
    ];
    for doc in cases {
        assert_eq!(apply(&doc, &glow()), doc, "document was modified: {doc}");
    }
}

#[test]
fn test_destructive_null_collections_are_recreated() {
    let doc = json!({"materials": null, "tracks": null, "loudnesses": null});
    let out = apply(&doc, &glow());
    assert_eq!(out["materials"]["video_effects"].as_array().unwrap().len(), 1);
    assert_eq!(out["tracks"].as_array().unwrap().len(), 1);
}

#[test]
fn test_destructive_effect_track_not_an_object() {
    // a string whose "type" lookup fails is not an effect track, so a new one is added
    let doc = json!({"tracks": ["effect", {"type": "video", "segments": []}]});
    let out = apply(&doc, &glow());
    assert_eq!(out["tracks"].as_array().unwrap().len(), 3);
    assert_eq!(out["tracks"][0], "effect");
}

#[test]
fn test_destructive_garbage_video_segments() {
    let doc = json!({"tracks": [{"type": "video", "segments": [
        "bogus",
        {"target_timerange": {"start": "soon", "duration": -5}},
        {"target_timerange": null}
    ]}]});
    let descriptors = vec![
        EffectDescriptor::named("A").with_effect_id("1"),
        EffectDescriptor::named("B").with_effect_id("2"),
        EffectDescriptor::named("C").with_effect_id("3"),
    ];
    let out = apply(&doc, &descriptors);
    let effect_track = out["tracks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["type"] == "effect")
        .unwrap();
    for segment in effect_track["segments"].as_array().unwrap() {
        assert_eq!(segment["target_timerange"], json!({"start": 0, "duration": 3_000_000}));
    }
}

#[test]
fn test_destructive_negative_explicit_duration() {
    let descriptors = vec![EffectDescriptor::named("A").with_timerange(10, -100)];
    let out = apply(&json!({}), &descriptors);
    let track = &out["tracks"][0];
    assert_eq!(track["segments"][0]["target_timerange"], json!({"start": 10, "duration": 0}));
    assert_eq!(TimeRange::new(10, -100).duration, 0);
}

#[test]
fn test_destructive_negative_duration_from_json() {
    let effects = json!([{"name": "A", "segment": {"target_timerange": {"start": 10, "duration": -100}}}]);
    let out = DraftMerger::default().apply_json(&json!({}), &effects);
    let track = &out["tracks"][0];
    assert_eq!(track["segments"][0]["target_timerange"], json!({"start": 10, "duration": 0}));
}

#[test]
fn test_destructive_render_index_at_limit() {
    let descriptors = vec![
        EffectDescriptor::named("A")
            .with_timerange(0, 1)
            .with_render_index(i64::MAX),
        EffectDescriptor::named("B"),
    ];
    let out = apply(&json!({}), &descriptors);
    let segments = out["tracks"][0]["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0]["render_index"], json!(i64::MAX));
    assert!(segments[1]["render_index"].as_i64().is_some());
}

#[test]
fn test_destructive_effect_list_not_an_array() {
    let doc = json!({"materials": {}});
    let merger = DraftMerger::default();
    for effects in [json!({"name": "Glow"}), json!("Glow"), json!([{"name": 5}])] {
        assert_eq!(merger.apply_json(&doc, &effects), doc);
    }
}

#[test]
fn test_destructive_transitions_on_broken_segments() {
    let doc = json!({
        "tracks": [{"type": "video", "segments": ["a", "b"]}]
    });
    let out = TransitionApplier::default().apply(&doc, &[TransitionDescriptor::named("Dissolve")]);
    assert_eq!(out, doc);
}

#[test]
fn test_destructive_animations_on_broken_refs() {
    let doc = json!({
        "tracks": [{"type": "video", "segments": [
            {"id": "S", "target_timerange": {"start": 0, "duration": 1_000_000}, "extra_material_refs": "oops"}
        ]}]
    });
    let out = AnimationApplier::default().apply(
        &doc,
        &[AnimationDescriptor::new("Fade In", AnimationType::In)],
    );
    assert_eq!(out, doc);
}

#[test]
fn test_destructive_extraction_from_deep_nesting() {
    let mut doc = json!({"id": "T", "name": "Deep", "type": "transition"});
    for _ in 0..64 {
        doc = json!({"wrapper": [doc]});
    }
    let entries: Vec<TransitionEntry> = extract_entries(&doc);
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_destructive_catalog_merge_with_junk() {
    let junk: Vec<Value> = vec![
        json!({"id": "", "name": "", "type": ""}),
        json!({"id": "   ", "name": "Spaces"}),
        json!({"name": "   ", "id": "blank-name"}),
    ];
    let candidates: Vec<EffectEntry> = junk
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect();

    let mut catalog: Catalog<EffectEntry> = Catalog::new();
    let report = catalog.merge(candidates);
    assert_eq!(report.skipped, 3);
    assert_eq!(catalog.len(), 1);
}
