use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

/// Maps category labels to distinct colours so a category keeps its colour
/// between the legend and the slices.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given labels, in the order given.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Continuous scale (viridis-like), for choropleth tiles and count bars
// ---------------------------------------------------------------------------

const SEQUENTIAL_STOPS: [(u8, u8, u8); 5] = [
    (0x44, 0x01, 0x54),
    (0x3b, 0x52, 0x8b),
    (0x21, 0x91, 0x8c),
    (0x5e, 0xc9, 0x62),
    (0xfd, 0xe7, 0x25),
];

/// Colour for `value` on a scale from 0 to `max`.
pub fn sequential_color(value: f64, max: f64) -> Color32 {
    let t = if max > 0.0 {
        (value / max).clamp(0.0, 1.0) as f32
    } else {
        0.0
    };
    let segments = (SEQUENTIAL_STOPS.len() - 1) as f32;
    let pos = t * segments;
    let idx = (pos.floor() as usize).min(SEQUENTIAL_STOPS.len() - 2);
    let local = pos - idx as f32;

    let stop = |(r, g, b): (u8, u8, u8)| -> LinSrgb {
        Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0).into_linear()
    };
    let mixed = stop(SEQUENTIAL_STOPS[idx]).mix(stop(SEQUENTIAL_STOPS[idx + 1]), local);
    to_color32(Srgb::from_linear(mixed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(7).len(), 7);
    }

    #[test]
    fn unknown_label_gets_default() {
        let cm = ColorMap::new(["Python", "SQL"]);
        assert_ne!(cm.color_for("Python"), cm.color_for("SQL"));
        assert_eq!(cm.color_for("Rust"), Color32::GRAY);
    }

    #[test]
    fn sequential_scale_hits_endpoints() {
        assert_eq!(sequential_color(0.0, 10.0), Color32::from_rgb(0x44, 0x01, 0x54));
        assert_eq!(sequential_color(10.0, 10.0), Color32::from_rgb(0xfd, 0xe7, 0x25));
        assert_eq!(sequential_color(3.0, 0.0), sequential_color(0.0, 1.0));
    }
}
