//! Presentation derivations shared by the viewer and the terminal output
//!
//! Tile colours and the stage palette are used by the terminal tables. The
//! viewer gets its sizing from [`layout`]; tile labels are drawn by the page
//! when a laid-out tile is wider than `label_min_width`.

use crate::category::{CategoryInfo, CATEGORIES};
use crate::config::ChartConfig;
use serde::Serialize;

/// Ordinal range for bar chart series, light to dark
pub const STAGE_PALETTE: [&str; 10] = [
    "#fee3d6", "#fdc9b4", "#fcaa8e", "#fc8a6b", "#f9694c", "#ef4533", "#d92723", "#bb151a",
    "#970b13", "#67000d",
];

/// Parse `#rrggbb`
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// Linear RGB interpolation, `t` clamped to `[0, 1]`
pub fn interpolate(low: (u8, u8, u8), high: (u8, u8, u8), t: f64) -> String {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    format!(
        "#{:02x}{:02x}{:02x}",
        mix(low.0, high.0),
        mix(low.1, high.1),
        mix(low.2, high.2)
    )
}

/// Tile fill for a leaf: scale position `total / 1.5 / max_total`
pub fn tile_fill(config: &ChartConfig, total: f64, max_total: f64) -> String {
    let low = parse_hex(&config.color_low).unwrap_or((0xfe, 0xe3, 0xd6));
    let high = parse_hex(&config.color_high).unwrap_or((0x67, 0x00, 0x0d));
    let t = if max_total > 0.0 {
        total / 1.5 / max_total
    } else {
        0.0
    };
    interpolate(low, high, t)
}

/// Series colour for the i-th stage
pub fn stage_color(index: usize) -> &'static str {
    STAGE_PALETTE[index % STAGE_PALETTE.len()]
}

/// Inner drawing area for a viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawingArea {
    pub outer_width: f64,
    pub outer_height: f64,
    pub width: f64,
    pub height: f64,
}

/// Outer size is capped by the config; height follows the viewport width
pub fn drawing_area(config: &ChartConfig, viewport_width: f64) -> DrawingArea {
    let outer_width = viewport_width.min(config.max_width);
    let outer_height = config.max_height.min(viewport_width);
    DrawingArea {
        outer_width,
        outer_height,
        width: (outer_width - config.margin.left - config.margin.right).max(0.0),
        height: (outer_height - config.margin.top - config.margin.bottom).max(0.0),
    }
}

/// Chart settings, drawing area and category legend for one viewport
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub chart: ChartConfig,
    pub area: DrawingArea,
    pub legend: &'static [CategoryInfo],
}

pub fn layout(config: &ChartConfig, viewport_width: f64) -> Layout {
    Layout {
        chart: config.clone(),
        area: drawing_area(config, viewport_width),
        legend: &CATEGORIES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#fee3d6"), Some((0xfe, 0xe3, 0xd6)));
        assert_eq!(parse_hex("fee3d6"), None);
        assert_eq!(parse_hex("#fee"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_tile_fill_endpoints() {
        let config = ChartConfig::default();
        assert_eq!(tile_fill(&config, 0.0, 10.0), "#fee3d6");
        // the largest leaf sits at 2/3 of the range
        assert_eq!(tile_fill(&config, 15.0, 10.0), "#67000d");
        assert_eq!(tile_fill(&config, 5.0, 0.0), "#fee3d6");
    }

    #[test]
    fn test_tile_fill_largest_leaf_is_not_darkest() {
        let config = ChartConfig::default();
        let fill = tile_fill(&config, 10.0, 10.0);
        assert_ne!(fill, "#67000d");
        assert_ne!(fill, "#fee3d6");
    }

    #[test]
    fn test_drawing_area() {
        let config = ChartConfig::default();
        let wide = drawing_area(&config, 1920.0);
        assert_eq!(wide.outer_width, 520.0);
        assert_eq!(wide.outer_height, 500.0);
        assert_eq!(wide.width, 480.0);
        assert_eq!(wide.height, 480.0);

        let narrow = drawing_area(&config, 400.0);
        assert_eq!(narrow.outer_height, 400.0);
        assert_eq!(narrow.width, 360.0);
    }

    #[test]
    fn test_layout_carries_legend() {
        let layout = layout(&ChartConfig::default(), 800.0);
        assert_eq!(layout.area.outer_width, 520.0);
        assert_eq!(layout.legend.len(), 4);

        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["legend"][1]["name"], "vegetable");
        assert_eq!(json["legend"][1]["label"], "Vegetables");
        assert_eq!(json["area"]["width"], 480.0);
        assert_eq!(json["chart"]["label_min_width"], 60.0);
    }

    #[test]
    fn test_stage_color_wraps() {
        assert_eq!(stage_color(0), "#fee3d6");
        assert_eq!(stage_color(10), "#fee3d6");
    }
}
