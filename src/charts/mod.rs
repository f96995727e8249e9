//! SVG geometry for the dashboard and report charts.

use crate::view_model::CategoryCount;
use std::f64::consts::PI;

pub(crate) const PALETTE: [&str; 6] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884d8", "#a28fd0",
];

/// Above this many bars the category axis labels are dropped.
pub(crate) const MAX_LABELED_BARS: usize = 10;

pub(crate) fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PieSlice {
    pub name: String,
    pub value: usize,
    pub fraction: f64,
    /// SVG path `d` attribute.
    pub path: String,
    pub color: &'static str,
    pub label: String,
    /// Anchor for the label, just outside the arc midpoint.
    pub label_x: f64,
    pub label_y: f64,
}

/// Hover text for a slice.
pub(crate) fn slice_tooltip(name: &str, value: usize) -> String {
    format!("{name}: {value} items")
}

fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    // Angle 0 points up; slices run clockwise.
    (cx + r * angle.sin(), cy - r * angle.cos())
}

pub(crate) fn pie_slices(data: &[CategoryCount], radius: f64, cx: f64, cy: f64) -> Vec<PieSlice> {
    let total: usize = data.iter().map(|c| c.value).sum();
    if total == 0 {
        return vec![];
    }

    let mut out = Vec::with_capacity(data.len());
    let mut start = 0.0_f64;

    for (i, c) in data.iter().enumerate() {
        let fraction = c.value as f64 / total as f64;
        let sweep = fraction * 2.0 * PI;
        let end = start + sweep;

        let path = if fraction >= 1.0 {
            // A full circle cannot be drawn as a single arc; use two halves.
            format!(
                "M {cx:.2} {:.2} A {radius:.2} {radius:.2} 0 1 1 {cx:.2} {:.2} A {radius:.2} {radius:.2} 0 1 1 {cx:.2} {:.2} Z",
                cy - radius,
                cy + radius,
                cy - radius
            )
        } else {
            let (x0, y0) = polar(cx, cy, radius, start);
            let (x1, y1) = polar(cx, cy, radius, end);
            let large_arc = if sweep > PI { 1 } else { 0 };
            format!(
                "M {cx:.2} {cy:.2} L {x0:.2} {y0:.2} A {radius:.2} {radius:.2} 0 {large_arc} 1 {x1:.2} {y1:.2} Z"
            )
        };

        let (label_x, label_y) = polar(cx, cy, radius * 1.15, start + sweep / 2.0);

        out.push(PieSlice {
            name: c.name.clone(),
            value: c.value,
            fraction,
            path,
            color: palette_color(i),
            label: format!("{} {:.1}%", c.name, fraction * 100.0),
            label_x,
            label_y,
        });

        start = end;
    }

    out
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Bar {
    pub label: String,
    pub value: i64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Lays bars out left to right inside `width` x `height`, scaled to the largest value.
pub(crate) fn bar_layout(values: &[(String, i64)], width: f64, height: f64) -> Vec<Bar> {
    if values.is_empty() {
        return vec![];
    }

    let max = values.iter().map(|(_, v)| *v).max().unwrap_or(0).max(0);
    let slot = width / values.len() as f64;
    let bar_width = slot * 0.7;

    values
        .iter()
        .enumerate()
        .map(|(i, (label, v))| {
            let v = (*v).max(0);
            let h = if max == 0 {
                0.0
            } else {
                height * v as f64 / max as f64
            };
            Bar {
                label: label.clone(),
                value: v,
                x: i as f64 * slot + (slot - bar_width) / 2.0,
                y: height - h,
                width: bar_width,
                height: h,
            }
        })
        .collect()
}

pub(crate) fn show_bar_labels(bar_count: usize) -> bool {
    bar_count <= MAX_LABELED_BARS
}

/// Round tick values for the value axis: 0 and up to four steps to the max.
pub(crate) fn axis_ticks(max: i64) -> Vec<i64> {
    if max <= 0 {
        return vec![0];
    }
    let raw_step = (max as f64 / 4.0).ceil() as i64;
    let magnitude = 10_i64.pow((raw_step as f64).log10().floor().max(0.0) as u32);
    let step = [1, 2, 5, 10]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(raw_step);

    (0..)
        .map(|i| i * step)
        .take_while(|t| *t < max + step)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(values: &[usize]) -> Vec<CategoryCount> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| CategoryCount {
                name: format!("c{i}"),
                value: *v,
            })
            .collect()
    }

    #[test]
    fn test_slice_tooltip_names_category_and_count() {
        assert_eq!(slice_tooltip("Dairy", 12), "Dairy: 12 items");
        let slices = pie_slices(&counts(&[3, 1]), 80.0, 100.0, 100.0);
        assert_eq!(slice_tooltip(&slices[0].name, slices[0].value), "c0: 3 items");
    }

    #[test]
    fn test_pie_fractions_sum_to_one_and_labels() {
        let slices = pie_slices(&counts(&[1, 1, 2]), 80.0, 100.0, 100.0);
        assert_eq!(slices.len(), 3);
        let sum: f64 = slices.iter().map(|s| s.fraction).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(slices[2].label, "c2 50.0%");
        assert_eq!(slices[0].color, "#0088FE");
    }

    #[test]
    fn test_pie_single_category_is_full_circle() {
        let slices = pie_slices(&counts(&[4]), 50.0, 60.0, 60.0);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].path.matches(" A ").count(), 2);
        assert_eq!(slices[0].label, "c0 100.0%");
    }

    #[test]
    fn test_pie_large_arc_flag() {
        let slices = pie_slices(&counts(&[3, 1]), 10.0, 0.0, 0.0);
        assert!(slices[0].path.contains(" 0 1 1 "));
        assert!(slices[1].path.contains(" 0 0 1 "));
    }

    #[test]
    fn test_pie_empty_input() {
        assert!(pie_slices(&[], 10.0, 0.0, 0.0).is_empty());
        assert!(pie_slices(&counts(&[0, 0]), 10.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette_color(6), palette_color(0));
    }

    #[test]
    fn test_bar_layout_scales_to_max() {
        let bars = bar_layout(
            &[("a".to_string(), 5), ("b".to_string(), 10), ("c".to_string(), -2)],
            300.0,
            100.0,
        );
        assert_eq!(bars.len(), 3);
        assert!((bars[1].height - 100.0).abs() < 1e-9);
        assert!((bars[0].height - 50.0).abs() < 1e-9);
        assert_eq!(bars[2].height, 0.0);
        assert!((bars[0].y - 50.0).abs() < 1e-9);
        assert!(bars[1].x > bars[0].x);
    }

    #[test]
    fn test_bar_layout_all_zero() {
        let bars = bar_layout(&[("a".to_string(), 0)], 100.0, 50.0);
        assert_eq!(bars[0].height, 0.0);
        assert_eq!(bars[0].y, 50.0);
    }

    #[test]
    fn test_bar_labels_hidden_above_ten() {
        assert!(show_bar_labels(10));
        assert!(!show_bar_labels(11));
    }

    #[test]
    fn test_axis_ticks() {
        assert_eq!(axis_ticks(0), vec![0]);
        assert_eq!(axis_ticks(4), vec![0, 1, 2, 3, 4]);
        assert_eq!(axis_ticks(10), vec![0, 5, 10]);
        assert_eq!(axis_ticks(37), vec![0, 10, 20, 30, 40]);
    }
}
