//! Core types for figures built from dataframe columns.
//!
//! A [`Figure`] owns its traces, its layout and the explicit x/y axes of its
//! facet grid. The axes are kept outside the plotly [`Layout`] and written into
//! the layout JSON as `xaxis`, `xaxis2`, ... when the figure is rendered, so a
//! grid can have any number of panels and styling passes can restyle every
//! panel after the figure has been built.

use plotly::common::{ColorScale, ColorScalePalette, MarkerSymbol};
use plotly::layout::themes::BuiltinTheme;
use plotly::layout::{Axis, Layout, Template};
use plotly::{Plot, Scatter, Scatter3D, Surface};
use serde_json::{Map, Value};

use crate::PlotResult;

/// Enum for the plotly trace types a figure can hold
#[derive(Debug, Clone)]
pub enum PlotTrace {
    /// 2D line or marker trace.
    Scatter(Box<Scatter<f64, f64>>),
    /// 3D marker trace.
    Scatter3D(Box<Scatter3D<f64, f64, f64>>),
    /// 3D surface trace.
    Surface(Box<Surface<f64, f64, f64>>),
}

impl PlotTrace {
    /// Add this trace to a plotly Plot
    pub fn add_to_plot(self, plot: &mut Plot) {
        match self {
            PlotTrace::Scatter(trace) => plot.add_trace(trace),
            PlotTrace::Scatter3D(trace) => plot.add_trace(trace),
            PlotTrace::Surface(trace) => plot.add_trace(trace),
        }
    }
}

/// A renderable figure: traces plus layout.
///
/// Cloning a figure is a deep copy; builders return a fresh figure that the
/// caller owns outright.
#[derive(Debug, Clone)]
pub struct Figure {
    traces: Vec<PlotTrace>,
    layout: Layout,
    x_axes: Vec<Axis>,
    y_axes: Vec<Axis>,
    axis_overrides: Map<String, Value>,
}

impl Figure {
    /// Creates an empty figure with the given layout and no 2D axes.
    pub fn new(layout: Layout) -> Self {
        Self::with_axes(layout, Vec::new(), Vec::new())
    }

    /// Creates an empty figure with one x axis per facet column and one y
    /// axis per facet row.
    pub(crate) fn with_axes(layout: Layout, x_axes: Vec<Axis>, y_axes: Vec<Axis>) -> Self {
        Self {
            traces: Vec::new(),
            layout,
            x_axes,
            y_axes,
            axis_overrides: Map::new(),
        }
    }

    /// Appends a trace.
    pub fn push_trace(&mut self, trace: PlotTrace) {
        self.traces.push(trace);
    }

    /// The traces in drawing order.
    pub fn traces(&self) -> &[PlotTrace] {
        &self.traces
    }

    /// Number of traces.
    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    /// The layout, without the facet axes.
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// x axes, one per facet column.
    pub fn x_axes(&self) -> &[Axis] {
        &self.x_axes
    }

    /// y axes, one per facet row.
    pub fn y_axes(&self) -> &[Axis] {
        &self.y_axes
    }

    /// Replaces the layout with `f(layout)`.
    pub fn update_layout(&mut self, f: impl FnOnce(Layout) -> Layout) {
        self.layout = f(self.layout.clone());
    }

    /// Replaces every 2D x and y axis with `f(axis)`.
    pub fn update_axes(&mut self, f: impl Fn(Axis) -> Axis) {
        for axis in self.x_axes.iter_mut().chain(self.y_axes.iter_mut()) {
            *axis = f(axis.clone());
        }
    }

    /// Sets a raw plotly.js attribute on every 2D axis at render time.
    ///
    /// For attribute values plotly.rs cannot express, such as
    /// `mirror: "allticks"`. Overrides win over the typed [`Axis`] fields.
    pub fn set_axis_override(&mut self, key: &str, value: Value) {
        self.axis_overrides.insert(key.to_string(), value);
    }

    /// The plotly JSON for this figure (`data`, `layout`, `config`).
    pub fn to_json(&self) -> PlotResult<Value> {
        let mut plot = Plot::new();
        for trace in &self.traces {
            trace.clone().add_to_plot(&mut plot);
        }
        plot.set_layout(self.layout.clone());
        let mut json = serde_json::to_value(&plot)?;

        let mut axes = Map::new();
        for (letter, list) in [('x', &self.x_axes), ('y', &self.y_axes)] {
            for (idx, axis) in list.iter().enumerate() {
                let mut value = serde_json::to_value(axis)?;
                if let Value::Object(fields) = &mut value {
                    fields.extend(self.axis_overrides.clone());
                }
                axes.insert(axis_key(letter, idx), value);
            }
        }

        if !json["layout"].is_object() {
            json["layout"] = Value::Object(Map::new());
        }
        if let Some(layout) = json["layout"].as_object_mut() {
            layout.extend(axes);
        }
        Ok(json)
    }
}

/// Plotly axis reference for a zero-based axis index: "x", "x2", "x3"...
pub fn axis_ref(letter: char, idx: usize) -> String {
    if idx == 0 {
        letter.to_string()
    } else {
        format!("{letter}{}", idx + 1)
    }
}

/// Layout key of a zero-based axis index: "xaxis", "xaxis2", "xaxis3"...
pub fn axis_key(letter: char, idx: usize) -> String {
    if idx == 0 {
        format!("{letter}axis")
    } else {
        format!("{letter}axis{}", idx + 1)
    }
}

/// Rows x columns arrangement of facet panels.
///
/// Columns share an x axis, rows share a y axis. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacetGrid {
    rows: usize,
    cols: usize,
    gap: f64,
}

impl FacetGrid {
    /// Gap between panels as a fraction of the plotting area.
    pub const DEFAULT_GAP: f64 = 0.03;

    /// Creates a grid; zero rows or columns count as one.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
            gap: Self::DEFAULT_GAP,
        }
    }

    /// Number of rows.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Horizontal paper domain of column `col`.
    pub fn column_domain(&self, col: usize) -> [f64; 2] {
        let available = 1.0 - self.gap * (self.cols - 1) as f64;
        let width = available / self.cols as f64;
        let start = col as f64 * (width + self.gap);
        [start, start + width]
    }

    /// Vertical paper domain of row `row`, counted from the top.
    pub fn row_domain(&self, row: usize) -> [f64; 2] {
        let available = 1.0 - self.gap * (self.rows - 1) as f64;
        let height = available / self.rows as f64;
        // Plotly measures y from the bottom
        let start = (self.rows - 1 - row) as f64 * (height + self.gap);
        [start, start + height]
    }

    /// Reference of the x axis shared by column `col`.
    pub fn x_ref(&self, col: usize) -> String {
        axis_ref('x', col)
    }

    /// Reference of the y axis shared by row `row`.
    pub fn y_ref(&self, row: usize) -> String {
        axis_ref('y', row)
    }

    /// Reference of the bottom row's y axis, which every x axis hangs from.
    pub fn bottom_y_ref(&self) -> String {
        axis_ref('y', self.rows - 1)
    }
}

/// Plotly's default qualitative color sequence, used for discrete groups.
pub const QUALITATIVE_COLORS: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Color for the `index`-th group; the sequence wraps around.
pub fn qualitative_color(index: usize) -> String {
    QUALITATIVE_COLORS[index % QUALITATIVE_COLORS.len()].to_string()
}

/// Colorscale used for continuous color columns.
pub const fn continuous_scale() -> ColorScale {
    ColorScale::Palette(ColorScalePalette::Viridis)
}

/// Marker symbols assigned to symbol groups, in order.
pub const SYMBOL_SEQUENCE: [MarkerSymbol; 9] = [
    MarkerSymbol::Circle,
    MarkerSymbol::Diamond,
    MarkerSymbol::Square,
    MarkerSymbol::X,
    MarkerSymbol::Cross,
    MarkerSymbol::TriangleUp,
    MarkerSymbol::Pentagon,
    MarkerSymbol::Hexagram,
    MarkerSymbol::Star,
];

/// Symbol for the `index`-th symbol group; the sequence wraps around.
pub fn symbol_for(index: usize) -> MarkerSymbol {
    SYMBOL_SEQUENCE[index % SYMBOL_SEQUENCE.len()].clone()
}

/// Base visual theme of a freshly built figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FigureTheme {
    /// Plotly's default light template.
    #[default]
    Plotly,
    /// Plotly's dark template.
    PlotlyDark,
}

impl FigureTheme {
    /// Picks the dark theme when `dark` is set.
    pub const fn from_dark(dark: bool) -> Self {
        if dark { Self::PlotlyDark } else { Self::Plotly }
    }

    /// The plotly template for this theme.
    pub fn template(&self) -> Template {
        match self {
            FigureTheme::Plotly => BuiltinTheme::Default.build().clone(),
            FigureTheme::PlotlyDark => BuiltinTheme::PlotlyDark.build().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx_eq::assert_approx_eq;
    use plotly::common::{Mode, Title};

    #[test]
    fn test_axis_refs_and_keys() {
        assert_eq!(axis_ref('x', 0), "x");
        assert_eq!(axis_ref('x', 1), "x2");
        assert_eq!(axis_ref('y', 7), "y8");
        assert_eq!(axis_key('x', 0), "xaxis");
        assert_eq!(axis_key('y', 11), "yaxis12");
    }

    #[test]
    fn test_single_grid_covers_paper() {
        let grid = FacetGrid::new(1, 1);
        assert_eq!(grid.column_domain(0), [0.0, 1.0]);
        assert_eq!(grid.row_domain(0), [0.0, 1.0]);
        assert_eq!(grid.bottom_y_ref(), "y");
        assert_eq!(FacetGrid::new(0, 0), grid);
    }

    #[test]
    fn test_grid_domains_ordered_and_gapped() {
        let grid = FacetGrid::new(3, 2);
        let left = grid.column_domain(0);
        let right = grid.column_domain(1);
        assert_approx_eq!(left[0], 0.0, 1e-12);
        assert_approx_eq!(right[1], 1.0, 1e-12);
        assert_approx_eq!(right[0] - left[1], FacetGrid::DEFAULT_GAP, 1e-12);

        // Row 0 sits on top
        let top = grid.row_domain(0);
        let bottom = grid.row_domain(2);
        assert_approx_eq!(top[1], 1.0, 1e-12);
        assert_approx_eq!(bottom[0], 0.0, 1e-12);
        assert!(top[0] > bottom[1]);
        assert_eq!(grid.bottom_y_ref(), "y3");
    }

    #[test]
    fn test_wide_grid_stays_inside_paper() {
        let grid = FacetGrid::new(1, 12);
        assert_eq!(grid.cols(), 12);
        assert_approx_eq!(grid.column_domain(11)[1], 1.0, 1e-12);
        assert!(grid.column_domain(10)[1] < grid.column_domain(11)[0]);
    }

    #[test]
    fn test_qualitative_colors_wrap() {
        assert_eq!(qualitative_color(0), "#636efa");
        assert_eq!(qualitative_color(10), qualitative_color(0));
        assert_ne!(qualitative_color(1), qualitative_color(0));
    }

    #[test]
    fn test_symbols_wrap() {
        assert_eq!(
            format!("{:?}", symbol_for(0)),
            format!("{:?}", symbol_for(SYMBOL_SEQUENCE.len()))
        );
    }

    #[test]
    fn test_figure_writes_axes_into_layout() {
        let layout = Layout::new().title(Title::with_text("t"));
        let x_axes = vec![
            Axis::new().title(Title::with_text("a")),
            Axis::new().title(Title::with_text("b")),
        ];
        let y_axes = vec![Axis::new().title(Title::with_text("c"))];
        let mut figure = Figure::with_axes(layout, x_axes, y_axes);
        figure.push_trace(PlotTrace::Scatter(
            Scatter::new(vec![1.0, 2.0], vec![3.0, 4.0]).mode(Mode::Lines),
        ));

        let json = figure.to_json().expect("figure serializes");
        assert_eq!(json["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(json["layout"]["title"]["text"], "t");
        assert_eq!(json["layout"]["xaxis"]["title"]["text"], "a");
        assert_eq!(json["layout"]["xaxis2"]["title"]["text"], "b");
        assert_eq!(json["layout"]["yaxis"]["title"]["text"], "c");
        assert!(json["layout"]["yaxis2"].is_null());
    }

    #[test]
    fn test_figure_has_no_axis_limit() {
        let x_axes = (0..10).map(|i| Axis::new().title(Title::with_text(format!("x{i}"))));
        let figure = Figure::with_axes(Layout::new(), x_axes.collect(), vec![Axis::new()]);

        let json = figure.to_json().expect("figure serializes");
        assert_eq!(json["layout"]["xaxis9"]["title"]["text"], "x8");
        assert_eq!(json["layout"]["xaxis10"]["title"]["text"], "x9");
    }

    #[test]
    fn test_update_axes_touches_every_axis() {
        let mut figure = Figure::with_axes(
            Layout::new(),
            vec![Axis::new(), Axis::new()],
            vec![Axis::new()],
        );
        figure.update_axes(|axis| axis.show_line(true));

        let json = figure.to_json().expect("figure serializes");
        for key in ["xaxis", "xaxis2", "yaxis"] {
            assert_eq!(json["layout"][key]["showline"], true, "{key}");
        }
    }

    #[test]
    fn test_axis_overrides_win_over_typed_fields() {
        let mut figure = Figure::with_axes(
            Layout::new(),
            vec![Axis::new().mirror(true), Axis::new()],
            vec![Axis::new()],
        );
        figure.set_axis_override("mirror", Value::from("allticks"));

        let json = figure.to_json().expect("figure serializes");
        for key in ["xaxis", "xaxis2", "yaxis"] {
            assert_eq!(json["layout"][key]["mirror"], "allticks", "{key}");
        }
    }

    #[test]
    fn test_dark_theme_template() {
        assert_eq!(FigureTheme::from_dark(true), FigureTheme::PlotlyDark);
        assert_eq!(FigureTheme::from_dark(false), FigureTheme::Plotly);

        let layout = Layout::new().template(FigureTheme::PlotlyDark.template());
        let figure = Figure::new(layout);
        let json = figure.to_json().expect("figure serializes");
        assert!(json["layout"]["template"].is_object());
    }
}
