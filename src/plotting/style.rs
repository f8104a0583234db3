//! Static, matplotlib-like restyling of figures.

use plotly::common::Font;
use plotly::layout::{Axis, Margin, TicksDirection};
use serde_json::Value;
use tracing::debug;

use super::core::Figure;

/// Fixed presentation settings applied by [`style_to_matplotlib`].
#[derive(Debug, Clone, PartialEq)]
pub struct MatplotlibStyle {
    /// Font family for titles, labels and tick labels.
    pub font_family: String,
    /// Font size in points.
    pub font_size: usize,
    /// Font color.
    pub font_color: String,
    /// Plot area background.
    pub background_color: String,
    /// Figure width in pixels.
    pub width: usize,
    /// Figure height in pixels.
    pub height: usize,
    /// Right margin in pixels.
    pub margin_right: usize,
    /// Top margin in pixels.
    pub margin_top: usize,
    /// Bottom margin in pixels.
    pub margin_bottom: usize,
    /// Color of axis lines and ticks.
    pub axis_color: String,
    /// Width of axis lines and ticks, in whole pixels.
    pub line_width: usize,
}

impl Default for MatplotlibStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: 26,
            font_color: "black".to_string(),
            background_color: "white".to_string(),
            width: 850,
            height: 700,
            margin_right: 20,
            margin_top: 20,
            margin_bottom: 10,
            axis_color: "black".to_string(),
            line_width: 2,
        }
    }
}

impl MatplotlibStyle {
    fn font(&self) -> Font {
        Font::new()
            .family(&self.font_family)
            .size(self.font_size)
            .color(self.font_color.clone())
    }

    fn style_axis(&self, axis: Axis) -> Axis {
        axis.show_line(true)
            .show_tick_labels(true)
            .line_color(self.axis_color.clone())
            .line_width(self.line_width)
            .ticks(TicksDirection::Outside)
            .tick_font(self.font())
            .tick_width(self.line_width)
            .tick_color(self.axis_color.clone())
    }
}

/// Returns a copy of `fig` styled like a static matplotlib chart.
///
/// Sans-serif font, white plot background, fixed 850 x 700 size, trimmed
/// margins, and black bordered axes with outside ticks, mirrored onto the
/// opposite edges, on every facet panel.
/// Trace data is untouched and `fig` itself is left as it was. Applying the
/// style twice gives the same figure as applying it once.
pub fn style_to_matplotlib(fig: &Figure) -> Figure {
    style_with(fig, &MatplotlibStyle::default())
}

/// Returns a copy of `fig` with `style` applied.
pub fn style_with(fig: &Figure, style: &MatplotlibStyle) -> Figure {
    let mut styled = fig.clone();

    styled.update_layout(|layout| {
        layout
            .font(style.font())
            .plot_background_color(style.background_color.clone())
            .width(style.width)
            .height(style.height)
            .margin(
                Margin::new()
                    .right(style.margin_right)
                    .top(style.margin_top)
                    .bottom(style.margin_bottom),
            )
    });
    styled.update_axes(|axis| style.style_axis(axis));
    // plotly.rs types `mirror` as a bool; "allticks" also mirrors the ticks
    styled.set_axis_override("mirror", Value::from("allticks"));

    debug!(
        x_axes = styled.x_axes().len(),
        y_axes = styled.y_axes().len(),
        "applied matplotlib style"
    );
    styled
}
