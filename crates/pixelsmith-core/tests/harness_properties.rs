//! Integration tests for the tool harness validation pipeline.

use pixelsmith_core::tools::{HarnessConfig, ToolHarness, ToolName};
use serde_json::json;

fn harness_with(allowed: &[&str], width: u32, height: u32, budget: u32) -> ToolHarness {
    ToolHarness::new(HarnessConfig {
        canvas_width: width,
        canvas_height: height,
        allowed_tools: allowed.iter().map(|s| s.to_string()).collect(),
        tool_budget_hard: budget,
    })
}

fn all_tool_names() -> Vec<&'static str> {
    ToolName::ALL.iter().map(|t| t.as_str()).collect()
}

#[test]
fn sealed_harness_rejects_every_tool_and_freezes_counter() {
    let allowed = all_tool_names();
    let mut h = harness_with(&allowed, 16, 16, 100);

    assert!(h.execute("seal_canvas", &json!({})).success);
    let executed_at_seal = h.tool_calls_executed();

    for name in all_tool_names() {
        let outcome = h.execute(name, &json!({}));
        assert!(!outcome.success, "tool {name} ran after seal");
        assert!(
            outcome.message.contains("sealed"),
            "tool {name} failed for the wrong reason: {}",
            outcome.message
        );
    }
    assert_eq!(h.tool_calls_executed(), executed_at_seal);
}

#[test]
fn budget_boundary_is_exact_for_various_budgets() {
    for budget in [1u32, 5, 50] {
        let mut h = harness_with(&["set_pixel"], 16, 16, budget);
        for i in 0..budget {
            let outcome = h.execute(
                "set_pixel",
                &json!({"x": i % 16, "y": (i / 16) % 16, "r": 0, "g": 0, "b": 0}),
            );
            assert!(outcome.success, "call {i} under budget {budget} failed");
        }
        assert_eq!(h.tool_calls_executed(), budget);

        let outcome = h.execute("set_pixel", &json!({"x": 0, "y": 0, "r": 0, "g": 0, "b": 0}));
        assert!(!outcome.success);
        assert_eq!(
            outcome.message,
            format!("Tool budget exhausted ({budget}/{budget})")
        );
        assert_eq!(h.tool_calls_executed(), budget);
    }
}

#[test]
fn failed_attempts_never_consume_budget() {
    let mut h = harness_with(&["set_pixel"], 8, 8, 2);

    // Burn many invalid attempts.
    for _ in 0..10 {
        h.execute("set_pixel", &json!({"x": 99, "y": 0, "r": 0, "g": 0, "b": 0}));
        h.execute("set_pixel", &json!({"bogus": true}));
        h.execute("not_a_tool", &json!({}));
    }
    assert_eq!(h.tool_calls_executed(), 0);

    // Budget is still fully available.
    assert!(h.execute("set_pixel", &json!({"x": 0, "y": 0, "r": 1, "g": 1, "b": 1})).success);
    assert!(h.execute("set_pixel", &json!({"x": 1, "y": 0, "r": 1, "g": 1, "b": 1})).success);
}

#[test]
fn coordinate_edges_accepted_and_dimension_rejected() {
    for (w, h) in [(1u32, 1u32), (16, 16), (32, 64)] {
        let mut harness = harness_with(&["set_pixel"], w, h, 100);

        let edge = json!({"x": w - 1, "y": h - 1, "r": 0, "g": 0, "b": 0});
        assert!(
            harness.execute("set_pixel", &edge).success,
            "edge pixel rejected on {w}x{h}"
        );

        let over_x = json!({"x": w, "y": 0, "r": 0, "g": 0, "b": 0});
        let outcome = harness.execute("set_pixel", &over_x);
        assert!(!outcome.success);
        assert_eq!(
            outcome.message,
            format!("Coordinate x={w} is out of bounds (canvas width={w})")
        );

        let over_y = json!({"x": 0, "y": h, "r": 0, "g": 0, "b": 0});
        let outcome = harness.execute("set_pixel", &over_y);
        assert!(!outcome.success);
        assert_eq!(
            outcome.message,
            format!("Coordinate y={h} is out of bounds (canvas height={h})")
        );
    }
}

#[test]
fn empty_allow_list_rejects_known_tools() {
    let mut h = harness_with(&[], 16, 16, 100);
    for name in all_tool_names() {
        let outcome = h.execute(name, &json!({}));
        assert!(!outcome.success);
        assert!(outcome.message.contains("not allowed in the current tier"));
    }
}

#[test]
fn cross_field_constraint_checked_before_bounds() {
    let mut h = harness_with(&["fill_rect"], 16, 16, 100);

    // Both corner order and bounds are wrong; the schema constraint wins.
    let outcome = h.execute(
        "fill_rect",
        &json!({"x1": 20, "y1": 0, "x2": 2, "y2": 0, "r": 0, "g": 0, "b": 0}),
    );
    assert!(!outcome.success);
    assert!(outcome.message.contains("x2 must be >= x1"));

    // Well-ordered but out of bounds.
    let outcome = h.execute(
        "fill_rect",
        &json!({"x1": 0, "y1": 0, "x2": 16, "y2": 3, "r": 0, "g": 0, "b": 0}),
    );
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        "Coordinate x2=16 is out of bounds (canvas width=16)"
    );
}

#[test]
fn full_allowed_set_draws_and_seals() {
    let allowed = all_tool_names();
    let mut h = harness_with(&allowed, 32, 32, 100);

    let calls: Vec<(&str, serde_json::Value)> = vec![
        ("set_palette", json!({"colors": [[0, 0, 0], [255, 0, 0]]})),
        ("fill_rect", json!({"x1": 0, "y1": 0, "x2": 31, "y2": 31, "r": 10, "g": 10, "b": 10})),
        ("draw_line", json!({"x1": 0, "y1": 0, "x2": 31, "y2": 31, "r": 255, "g": 0, "b": 0})),
        ("draw_circle", json!({"cx": 16, "cy": 16, "radius": 8, "r": 0, "g": 255, "b": 0})),
        ("flood_fill", json!({"x": 16, "y": 16, "r": 0, "g": 0, "b": 255})),
        (
            "gradient_fill",
            json!({"x1": 0, "y1": 0, "x2": 7, "y2": 7,
                   "r1": 0, "g1": 0, "b1": 0, "r2": 255, "g2": 255, "b2": 255,
                   "direction": "vertical"}),
        ),
        (
            "dither",
            json!({"x1": 8, "y1": 8, "x2": 15, "y2": 15,
                   "r1": 255, "g1": 255, "b1": 255, "r2": 0, "g2": 0, "b2": 0}),
        ),
        ("mirror", json!({"axis": "horizontal"})),
        ("rotate", json!({"degrees": 90})),
        ("set_pixel", json!({"x": 0, "y": 0, "r": 1, "g": 2, "b": 3})),
        ("seal_canvas", json!({})),
    ];

    for (name, args) in calls {
        let outcome = h.execute(name, &args);
        assert!(outcome.success, "{name} failed: {}", outcome.message);
    }

    assert!(h.is_sealed());
    assert_eq!(h.tool_calls_executed(), 11);
}
