use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color scales
// ---------------------------------------------------------------------------

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Colour for a CES percentile on the fixed [0, 100] scale: green for the
/// least burdened tracts through yellow to red for the most burdened. The
/// domain never rescales to the filtered view, so the same percentile is
/// always drawn in the same colour.
pub fn percentile_color(percentile: f64) -> Color32 {
    let t = (percentile / 100.0).clamp(0.0, 1.0) as f32;
    let hue = 120.0 * (1.0 - t);
    hsl_to_color32(Hsl::new(hue, 0.85, 0.45))
}

/// Warm fill for ranked bars: `t` in [0, 1] runs from the lightest to the
/// darkest shade, so higher means read visually heavier.
pub fn heat_color(t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    hsl_to_color32(Hsl::new(8.0, 0.78, 0.82 - 0.5 * t))
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n.max(1) as f32) * 360.0;
            hsl_to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_scale_runs_green_to_red() {
        let low = percentile_color(0.0);
        let high = percentile_color(100.0);
        assert!(low.g() > low.r());
        assert!(high.r() > high.g());
    }

    #[test]
    fn percentile_scale_clamps_to_its_fixed_domain() {
        assert_eq!(percentile_color(-10.0), percentile_color(0.0));
        assert_eq!(percentile_color(130.0), percentile_color(100.0));
    }

    #[test]
    fn heat_darkens_as_t_rises() {
        let light = heat_color(0.0);
        let dark = heat_color(1.0);
        let sum = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(sum(light) > sum(dark));
    }

    #[test]
    fn palette_has_requested_length_and_distinct_entries() {
        let palette = generate_palette(5);
        assert_eq!(palette.len(), 5);
        for i in 1..palette.len() {
            assert_ne!(palette[i - 1], palette[i]);
        }
        assert!(generate_palette(0).is_empty());
    }
}
