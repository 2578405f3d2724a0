//! Tool definitions: canonical names and strict per-tool argument schemas.
//!
//! Every argument struct deserializes with `deny_unknown_fields`, so any
//! unexpected field from the LLM is rejected rather than ignored. Numeric
//! ranges ride on the field types (`u8` channels, `u32` coordinates);
//! cross-field constraints live in [`ToolArgs::validate`]. Schemas are
//! data only — no code runs here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical names for every drawing tool the LLM may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    SetPixel,
    FillRect,
    SetPalette,
    SealCanvas,
    DrawLine,
    DrawCircle,
    FloodFill,
    GradientFill,
    Dither,
    Mirror,
    Rotate,
}

impl ToolName {
    pub const ALL: [ToolName; 11] = [
        ToolName::SetPixel,
        ToolName::FillRect,
        ToolName::SetPalette,
        ToolName::SealCanvas,
        ToolName::DrawLine,
        ToolName::DrawCircle,
        ToolName::FloodFill,
        ToolName::GradientFill,
        ToolName::Dither,
        ToolName::Mirror,
        ToolName::Rotate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::SetPixel => "set_pixel",
            ToolName::FillRect => "fill_rect",
            ToolName::SetPalette => "set_palette",
            ToolName::SealCanvas => "seal_canvas",
            ToolName::DrawLine => "draw_line",
            ToolName::DrawCircle => "draw_circle",
            ToolName::FloodFill => "flood_fill",
            ToolName::GradientFill => "gradient_fill",
            ToolName::Dither => "dither",
            ToolName::Mirror => "mirror",
            ToolName::Rotate => "rotate",
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown tool name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTool(pub String);

impl FromStr for ToolName {
    type Err = UnknownTool;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ToolName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Generic coordinate declaration
// ---------------------------------------------------------------------------

/// Canvas axis a coordinate field is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// One coordinate field of an argument struct, for generic bounds checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordField {
    pub name: &'static str,
    pub axis: Axis,
    pub value: u32,
}

/// Behavior shared by all argument schemas.
pub trait ToolArgs {
    /// Cross-field domain constraints beyond what the field types enforce.
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }

    /// Coordinate fields that must fall inside the canvas.
    fn coords(&self) -> Vec<CoordField> {
        Vec::new()
    }
}

fn coord(name: &'static str, axis: Axis, value: u32) -> CoordField {
    CoordField { name, axis, value }
}

// ---------------------------------------------------------------------------
// Per-tool argument schemas
// ---------------------------------------------------------------------------

/// Arguments for the set_pixel tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetPixelArgs {
    pub x: u32,
    pub y: u32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ToolArgs for SetPixelArgs {
    fn coords(&self) -> Vec<CoordField> {
        vec![coord("x", Axis::X, self.x), coord("y", Axis::Y, self.y)]
    }
}

/// Arguments for the fill_rect tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FillRectArgs {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ToolArgs for FillRectArgs {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.x2 < self.x1 || self.y2 < self.y1 {
            return Err("x2 must be >= x1 and y2 must be >= y1 for fill_rect".to_string());
        }
        Ok(())
    }

    fn coords(&self) -> Vec<CoordField> {
        vec![
            coord("x1", Axis::X, self.x1),
            coord("y1", Axis::Y, self.y1),
            coord("x2", Axis::X, self.x2),
            coord("y2", Axis::Y, self.y2),
        ]
    }
}

/// Arguments for the set_palette tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetPaletteArgs {
    /// List of [r, g, b] colors, at most 16.
    pub colors: Vec<[u8; 3]>,
}

impl ToolArgs for SetPaletteArgs {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.colors.len() > 16 {
            return Err(format!(
                "palette supports at most 16 colors, got {}",
                self.colors.len()
            ));
        }
        Ok(())
    }
}

/// Arguments for the seal_canvas tool (no args needed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SealCanvasArgs {}

impl ToolArgs for SealCanvasArgs {}

/// Arguments for the draw_line tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrawLineArgs {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ToolArgs for DrawLineArgs {
    fn coords(&self) -> Vec<CoordField> {
        vec![
            coord("x1", Axis::X, self.x1),
            coord("y1", Axis::Y, self.y1),
            coord("x2", Axis::X, self.x2),
            coord("y2", Axis::Y, self.y2),
        ]
    }
}

/// Arguments for the draw_circle tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DrawCircleArgs {
    /// Center X.
    pub cx: u32,
    /// Center Y.
    pub cy: u32,
    pub radius: u32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Fill the circle instead of drawing the outline.
    #[serde(default)]
    pub fill: bool,
}

impl ToolArgs for DrawCircleArgs {
    fn validate(&self) -> std::result::Result<(), String> {
        if !(1..=32).contains(&self.radius) {
            return Err(format!(
                "radius must be between 1 and 32, got {}",
                self.radius
            ));
        }
        Ok(())
    }

    fn coords(&self) -> Vec<CoordField> {
        vec![coord("cx", Axis::X, self.cx), coord("cy", Axis::Y, self.cy)]
    }
}

/// Arguments for the flood_fill tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FloodFillArgs {
    pub x: u32,
    pub y: u32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ToolArgs for FloodFillArgs {
    fn coords(&self) -> Vec<CoordField> {
        vec![coord("x", Axis::X, self.x), coord("y", Axis::Y, self.y)]
    }
}

/// Gradient sweep direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    Horizontal,
    Vertical,
}

impl GradientDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradientDirection::Horizontal => "horizontal",
            GradientDirection::Vertical => "vertical",
        }
    }
}

fn default_direction() -> GradientDirection {
    GradientDirection::Horizontal
}

/// Arguments for the gradient_fill tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradientFillArgs {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub r1: u8,
    pub g1: u8,
    pub b1: u8,
    pub r2: u8,
    pub g2: u8,
    pub b2: u8,
    #[serde(default = "default_direction")]
    pub direction: GradientDirection,
}

impl ToolArgs for GradientFillArgs {
    fn coords(&self) -> Vec<CoordField> {
        vec![
            coord("x1", Axis::X, self.x1),
            coord("y1", Axis::Y, self.y1),
            coord("x2", Axis::X, self.x2),
            coord("y2", Axis::Y, self.y2),
        ]
    }
}

/// Arguments for the dither tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DitherArgs {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
    pub r1: u8,
    pub g1: u8,
    pub b1: u8,
    pub r2: u8,
    pub g2: u8,
    pub b2: u8,
}

impl ToolArgs for DitherArgs {
    fn coords(&self) -> Vec<CoordField> {
        vec![
            coord("x1", Axis::X, self.x1),
            coord("y1", Axis::Y, self.y1),
            coord("x2", Axis::X, self.x2),
            coord("y2", Axis::Y, self.y2),
        ]
    }
}

/// Mirror axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorAxis {
    Horizontal,
    Vertical,
}

impl MirrorAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            MirrorAxis::Horizontal => "horizontal",
            MirrorAxis::Vertical => "vertical",
        }
    }
}

/// Arguments for the mirror tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MirrorArgs {
    pub axis: MirrorAxis,
}

impl ToolArgs for MirrorArgs {}

/// Arguments for the rotate tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RotateArgs {
    /// Rotation in degrees, counter-clockwise.
    pub degrees: u32,
}

impl ToolArgs for RotateArgs {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.degrees >= 360 {
            return Err(format!(
                "degrees must be in the range 0-359, got {}",
                self.degrees
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Parsed invocation
// ---------------------------------------------------------------------------

/// A tool call whose arguments passed strict schema validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocation {
    SetPixel(SetPixelArgs),
    FillRect(FillRectArgs),
    SetPalette(SetPaletteArgs),
    SealCanvas(SealCanvasArgs),
    DrawLine(DrawLineArgs),
    DrawCircle(DrawCircleArgs),
    FloodFill(FloodFillArgs),
    GradientFill(GradientFillArgs),
    Dither(DitherArgs),
    Mirror(MirrorArgs),
    Rotate(RotateArgs),
}

impl ToolInvocation {
    /// Strict-parse raw arguments for `tool`.
    ///
    /// Unknown fields, wrong types, out-of-range values, and cross-field
    /// constraint violations are all rejected with a descriptive message.
    pub fn parse(
        tool: ToolName,
        raw_args: &serde_json::Value,
    ) -> std::result::Result<Self, String> {
        fn strict<T: serde::de::DeserializeOwned>(
            raw: &serde_json::Value,
        ) -> std::result::Result<T, String> {
            serde_json::from_value(raw.clone())
                .map_err(|err| format!("Argument validation failed: {err}"))
        }

        let invocation = match tool {
            ToolName::SetPixel => ToolInvocation::SetPixel(strict(raw_args)?),
            ToolName::FillRect => ToolInvocation::FillRect(strict(raw_args)?),
            ToolName::SetPalette => ToolInvocation::SetPalette(strict(raw_args)?),
            ToolName::SealCanvas => ToolInvocation::SealCanvas(strict(raw_args)?),
            ToolName::DrawLine => ToolInvocation::DrawLine(strict(raw_args)?),
            ToolName::DrawCircle => ToolInvocation::DrawCircle(strict(raw_args)?),
            ToolName::FloodFill => ToolInvocation::FloodFill(strict(raw_args)?),
            ToolName::GradientFill => ToolInvocation::GradientFill(strict(raw_args)?),
            ToolName::Dither => ToolInvocation::Dither(strict(raw_args)?),
            ToolName::Mirror => ToolInvocation::Mirror(strict(raw_args)?),
            ToolName::Rotate => ToolInvocation::Rotate(strict(raw_args)?),
        };

        invocation
            .args()
            .validate()
            .map_err(|err| format!("Argument validation failed: {err}"))?;
        Ok(invocation)
    }

    pub fn name(&self) -> ToolName {
        match self {
            ToolInvocation::SetPixel(_) => ToolName::SetPixel,
            ToolInvocation::FillRect(_) => ToolName::FillRect,
            ToolInvocation::SetPalette(_) => ToolName::SetPalette,
            ToolInvocation::SealCanvas(_) => ToolName::SealCanvas,
            ToolInvocation::DrawLine(_) => ToolName::DrawLine,
            ToolInvocation::DrawCircle(_) => ToolName::DrawCircle,
            ToolInvocation::FloodFill(_) => ToolName::FloodFill,
            ToolInvocation::GradientFill(_) => ToolName::GradientFill,
            ToolInvocation::Dither(_) => ToolName::Dither,
            ToolInvocation::Mirror(_) => ToolName::Mirror,
            ToolInvocation::Rotate(_) => ToolName::Rotate,
        }
    }

    /// The schema-level view of the parsed arguments.
    pub fn args(&self) -> &dyn ToolArgs {
        match self {
            ToolInvocation::SetPixel(args) => args,
            ToolInvocation::FillRect(args) => args,
            ToolInvocation::SetPalette(args) => args,
            ToolInvocation::SealCanvas(args) => args,
            ToolInvocation::DrawLine(args) => args,
            ToolInvocation::DrawCircle(args) => args,
            ToolInvocation::FloodFill(args) => args,
            ToolInvocation::GradientFill(args) => args,
            ToolInvocation::Dither(args) => args,
            ToolInvocation::Mirror(args) => args,
            ToolInvocation::Rotate(args) => args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_name_parse_roundtrip() {
        for name in ToolName::ALL {
            assert_eq!(name.as_str().parse::<ToolName>().unwrap(), name);
        }
        assert!("erase_pixel".parse::<ToolName>().is_err());
    }

    #[test]
    fn set_pixel_parses() {
        let invocation = ToolInvocation::parse(
            ToolName::SetPixel,
            &json!({"x": 3, "y": 4, "r": 255, "g": 0, "b": 0}),
        )
        .unwrap();
        assert!(matches!(
            invocation,
            ToolInvocation::SetPixel(SetPixelArgs { x: 3, y: 4, r: 255, g: 0, b: 0 })
        ));
    }

    #[test]
    fn extra_field_is_rejected() {
        let err = ToolInvocation::parse(
            ToolName::SetPixel,
            &json!({"x": 0, "y": 0, "r": 0, "g": 0, "b": 0, "alpha": 255}),
        )
        .unwrap_err();
        assert!(err.contains("Argument validation failed"));
        assert!(err.contains("alpha"));
    }

    #[test]
    fn channel_out_of_range_is_rejected() {
        let err = ToolInvocation::parse(
            ToolName::SetPixel,
            &json!({"x": 0, "y": 0, "r": 256, "g": 0, "b": 0}),
        )
        .unwrap_err();
        assert!(err.contains("Argument validation failed"));
    }

    #[test]
    fn negative_coordinate_is_rejected() {
        let err = ToolInvocation::parse(
            ToolName::SetPixel,
            &json!({"x": -1, "y": 0, "r": 0, "g": 0, "b": 0}),
        )
        .unwrap_err();
        assert!(err.contains("Argument validation failed"));
    }

    #[test]
    fn fill_rect_corner_order_enforced() {
        let err = ToolInvocation::parse(
            ToolName::FillRect,
            &json!({"x1": 5, "y1": 0, "x2": 2, "y2": 3, "r": 0, "g": 0, "b": 0}),
        )
        .unwrap_err();
        assert!(err.contains("x2 must be >= x1"));
    }

    #[test]
    fn gradient_direction_defaults_horizontal() {
        let invocation = ToolInvocation::parse(
            ToolName::GradientFill,
            &json!({
                "x1": 0, "y1": 0, "x2": 3, "y2": 3,
                "r1": 0, "g1": 0, "b1": 0, "r2": 255, "g2": 255, "b2": 255
            }),
        )
        .unwrap();
        match invocation {
            ToolInvocation::GradientFill(args) => {
                assert_eq!(args.direction, GradientDirection::Horizontal);
            }
            other => panic!("expected GradientFill, got {other:?}"),
        }
    }

    #[test]
    fn mirror_axis_rejects_unknown_variant() {
        let err =
            ToolInvocation::parse(ToolName::Mirror, &json!({"axis": "diagonal"})).unwrap_err();
        assert!(err.contains("Argument validation failed"));
    }

    #[test]
    fn rotate_rejects_360() {
        let err = ToolInvocation::parse(ToolName::Rotate, &json!({"degrees": 360})).unwrap_err();
        assert!(err.contains("0-359"));
        assert!(ToolInvocation::parse(ToolName::Rotate, &json!({"degrees": 359})).is_ok());
    }

    #[test]
    fn circle_radius_range_enforced() {
        let base = json!({"cx": 8, "cy": 8, "radius": 0, "r": 1, "g": 2, "b": 3});
        assert!(ToolInvocation::parse(ToolName::DrawCircle, &base).is_err());

        let ok = json!({"cx": 8, "cy": 8, "radius": 32, "r": 1, "g": 2, "b": 3});
        assert!(ToolInvocation::parse(ToolName::DrawCircle, &ok).is_ok());

        let over = json!({"cx": 8, "cy": 8, "radius": 33, "r": 1, "g": 2, "b": 3});
        assert!(ToolInvocation::parse(ToolName::DrawCircle, &over).is_err());
    }

    #[test]
    fn palette_limited_to_16_colors() {
        let colors: Vec<[u8; 3]> = (0..17).map(|i| [i as u8, 0, 0]).collect();
        let err = ToolInvocation::parse(ToolName::SetPalette, &json!({ "colors": colors }))
            .unwrap_err();
        assert!(err.contains("at most 16"));
    }

    #[test]
    fn palette_color_must_be_triple() {
        let err = ToolInvocation::parse(
            ToolName::SetPalette,
            &json!({"colors": [[0, 0, 0, 0]]}),
        )
        .unwrap_err();
        assert!(err.contains("Argument validation failed"));
    }

    #[test]
    fn seal_canvas_accepts_empty_args_only() {
        assert!(ToolInvocation::parse(ToolName::SealCanvas, &json!({})).is_ok());
        assert!(ToolInvocation::parse(ToolName::SealCanvas, &json!({"force": true})).is_err());
    }

    #[test]
    fn coords_declared_for_rect() {
        let invocation = ToolInvocation::parse(
            ToolName::FillRect,
            &json!({"x1": 1, "y1": 2, "x2": 3, "y2": 4, "r": 0, "g": 0, "b": 0}),
        )
        .unwrap();
        let coords = invocation.args().coords();
        assert_eq!(coords.len(), 4);
        assert_eq!(coords[2].name, "x2");
        assert_eq!(coords[2].axis, Axis::X);
        assert_eq!(coords[2].value, 3);
    }
}
