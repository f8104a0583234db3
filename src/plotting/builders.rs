//! Figure builders for dataframe columns.
//!
//! Every builder maps named columns onto plotly traces and returns a fresh
//! [`Figure`]. Grouping columns (color, symbol, facet row and facet column)
//! split the rows into one trace per distinct combination, in order of first
//! appearance. Column names are used verbatim as axis and legend labels, so a
//! name such as `"$y_1$"` is typeset by MathJax when the figure is rendered.
//! Facet captions are plain `name=value` text and are not typeset.

use ndarray::Array2;
use plotly::common::{ColorBar, ErrorData, ErrorType, Line, Marker, Mode, Title};
use plotly::layout::{Annotation, Axis, Layout, LayoutScene, Legend};
use plotly::surface::{PlaneContours, PlaneProject, SurfaceContours};
use plotly::{Scatter, Scatter3D, Surface};
use polars::prelude::DataFrame;
use std::collections::HashSet;
use tracing::debug;

use super::core::{
    FacetGrid, Figure, FigureTheme, PlotTrace, continuous_scale, qualitative_color, symbol_for,
};
use super::data::{
    ColumnSelector, Groups, float_column, is_float_column, marker_sizes, partition, take,
};
use crate::PlotResult;

/// Options for [`line`].
#[derive(Debug, Clone, Default)]
pub struct LineOptions {
    /// Column whose values split the figure into facet columns.
    pub fc: Option<String>,
    /// Column whose values split the figure into facet rows.
    pub fr: Option<String>,
    /// Column of symmetric horizontal error values, shared by every trace.
    pub x_error: Option<String>,
    /// Column of symmetric vertical error values, shared by every trace.
    pub y_error: Option<String>,
    /// Draw markers on the data points.
    pub markers: bool,
    /// Figure title.
    pub title: Option<String>,
    /// Open the figure in a browser once built.
    pub show: bool,
    /// Use the dark template.
    pub dark: bool,
}

impl LineOptions {
    /// Set the facet column
    pub fn with_facet_col(mut self, column: &str) -> Self {
        self.fc = Some(column.to_string());
        self
    }

    /// Set the facet row
    pub fn with_facet_row(mut self, column: &str) -> Self {
        self.fr = Some(column.to_string());
        self
    }

    /// Set the horizontal error column
    pub fn with_x_error(mut self, column: &str) -> Self {
        self.x_error = Some(column.to_string());
        self
    }

    /// Set the vertical error column
    pub fn with_y_error(mut self, column: &str) -> Self {
        self.y_error = Some(column.to_string());
        self
    }

    /// Toggle markers
    pub const fn with_markers(mut self, markers: bool) -> Self {
        self.markers = markers;
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Toggle showing the figure after building it
    pub const fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    /// Toggle the dark template
    pub const fn with_dark(mut self, dark: bool) -> Self {
        self.dark = dark;
        self
    }
}

/// Options for [`scatter`].
#[derive(Debug, Clone, Default)]
pub struct ScatterOptions {
    /// Color column. Float columns use a continuous colorscale; any other
    /// dtype gives one trace per distinct value.
    pub c: Option<String>,
    /// Marker size column. Non-positive values are drawn with zero size.
    pub s: Option<String>,
    /// Marker symbol column, one trace per distinct value.
    pub m: Option<String>,
    /// Column whose values split the figure into facet columns.
    pub fc: Option<String>,
    /// Column whose values split the figure into facet rows.
    pub fr: Option<String>,
    /// Column of symmetric horizontal error values, shared by every trace.
    pub x_error: Option<String>,
    /// Column of symmetric vertical error values, shared by every trace.
    pub y_error: Option<String>,
    /// Figure title.
    pub title: Option<String>,
    /// Open the figure in a browser once built.
    pub show: bool,
}

impl ScatterOptions {
    /// Set the color column
    pub fn with_color(mut self, column: &str) -> Self {
        self.c = Some(column.to_string());
        self
    }

    /// Set the size column
    pub fn with_size(mut self, column: &str) -> Self {
        self.s = Some(column.to_string());
        self
    }

    /// Set the symbol column
    pub fn with_symbol(mut self, column: &str) -> Self {
        self.m = Some(column.to_string());
        self
    }

    /// Set the facet column
    pub fn with_facet_col(mut self, column: &str) -> Self {
        self.fc = Some(column.to_string());
        self
    }

    /// Set the facet row
    pub fn with_facet_row(mut self, column: &str) -> Self {
        self.fr = Some(column.to_string());
        self
    }

    /// Set the horizontal error column
    pub fn with_x_error(mut self, column: &str) -> Self {
        self.x_error = Some(column.to_string());
        self
    }

    /// Set the vertical error column
    pub fn with_y_error(mut self, column: &str) -> Self {
        self.y_error = Some(column.to_string());
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Toggle showing the figure after building it
    pub const fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }
}

/// Options for [`scatter3`].
#[derive(Debug, Clone, Default)]
pub struct Scatter3Options {
    /// Color column, continuous for float columns and discrete otherwise.
    pub c: Option<String>,
    /// Marker size column. Non-positive values are drawn with zero size.
    pub s: Option<String>,
    /// Marker symbol column.
    pub m: Option<String>,
    /// Column of x error values.
    pub x_error: Option<String>,
    /// Column of y error values.
    pub y_error: Option<String>,
    /// Column of z error values.
    pub z_error: Option<String>,
    /// Figure title.
    pub title: Option<String>,
    /// Open the figure in a browser once built.
    pub show: bool,
}

impl Scatter3Options {
    /// Set the color column
    pub fn with_color(mut self, column: &str) -> Self {
        self.c = Some(column.to_string());
        self
    }

    /// Set the size column
    pub fn with_size(mut self, column: &str) -> Self {
        self.s = Some(column.to_string());
        self
    }

    /// Set the symbol column
    pub fn with_symbol(mut self, column: &str) -> Self {
        self.m = Some(column.to_string());
        self
    }

    /// Set the x error column
    pub fn with_x_error(mut self, column: &str) -> Self {
        self.x_error = Some(column.to_string());
        self
    }

    /// Set the y error column
    pub fn with_y_error(mut self, column: &str) -> Self {
        self.y_error = Some(column.to_string());
        self
    }

    /// Set the z error column
    pub fn with_z_error(mut self, column: &str) -> Self {
        self.z_error = Some(column.to_string());
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Toggle showing the figure after building it
    pub const fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }
}

/// Options for [`surface`].
#[derive(Debug, Clone, Default)]
pub struct SurfaceOptions {
    /// Figure title.
    pub title: Option<String>,
    /// x axis title.
    pub title_x: Option<String>,
    /// y axis title.
    pub title_y: Option<String>,
    /// z axis title.
    pub title_z: Option<String>,
    /// Open the figure in a browser once built.
    pub show: bool,
}

impl SurfaceOptions {
    /// Set the title
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the three axis titles
    pub fn with_axis_titles(mut self, x: &str, y: &str, z: &str) -> Self {
        self.title_x = Some(x.to_string());
        self.title_y = Some(y.to_string());
        self.title_z = Some(z.to_string());
        self
    }

    /// Toggle showing the figure after building it
    pub const fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }
}

/// Plots one line per y column and facet panel.
///
/// Supports up to 4D data: x, y and a facet row and column. With several y
/// columns the y axis is titled "value" and the legend lists the columns.
/// Error columns apply to every trace.
///
/// # Errors
/// [`PlotError::Data`](crate::PlotError::Data) if a referenced column is
/// missing or not numeric, [`PlotError::Io`](crate::PlotError::Io) if `show`
/// is set and the page cannot be opened.
///
/// # Examples
/// ```
/// use frameplot::{LineOptions, line};
/// use polars::df;
///
/// let df = df!("x" => [1.0, 2.0, 3.0], "y" => [1.0, 4.0, 9.0]).unwrap();
/// let fig = line(&df, "x", "y", &LineOptions::default().with_title("squares")).unwrap();
/// assert_eq!(fig.trace_count(), 1);
/// ```
pub fn line(
    df: &DataFrame,
    x: &str,
    y: impl Into<ColumnSelector>,
    options: &LineOptions,
) -> PlotResult<Figure> {
    let mode = if options.markers {
        Mode::LinesMarkers
    } else {
        Mode::Lines
    };
    let mapping = Plot2d {
        mode,
        color: None,
        size: None,
        symbol: None,
        facet_col: options.fc.as_deref(),
        facet_row: options.fr.as_deref(),
        x_error: options.x_error.as_deref(),
        y_error: options.y_error.as_deref(),
        title: options.title.as_deref(),
        theme: FigureTheme::from_dark(options.dark),
    };
    let fig = build_2d(df, x, &y.into(), &mapping)?;
    debug!(traces = fig.trace_count(), "built line figure");

    if options.show {
        fig.show()?;
    }
    Ok(fig)
}

/// Plots markers, supporting up to 7D data.
///
/// x and y positions, color, size, symbol, facet row and facet column. Color
/// and symbol groups, facet panels and y columns each split the data into
/// separate traces; size only scales markers.
///
/// # Errors
/// [`PlotError::Data`](crate::PlotError::Data) if a referenced column is
/// missing or not numeric, [`PlotError::Io`](crate::PlotError::Io) if `show`
/// is set and the page cannot be opened.
pub fn scatter(
    df: &DataFrame,
    x: &str,
    y: impl Into<ColumnSelector>,
    options: &ScatterOptions,
) -> PlotResult<Figure> {
    let mapping = Plot2d {
        mode: Mode::Markers,
        color: options.c.as_deref(),
        size: options.s.as_deref(),
        symbol: options.m.as_deref(),
        facet_col: options.fc.as_deref(),
        facet_row: options.fr.as_deref(),
        x_error: options.x_error.as_deref(),
        y_error: options.y_error.as_deref(),
        title: options.title.as_deref(),
        theme: FigureTheme::Plotly,
    };
    let fig = build_2d(df, x, &y.into(), &mapping)?;
    debug!(traces = fig.trace_count(), "built scatter figure");

    if options.show {
        fig.show()?;
    }
    Ok(fig)
}

/// Plots 3D markers, supporting up to 6D data.
///
/// x, y and z positions plus color, size and symbol. One trace per z column,
/// color group and symbol group.
///
/// # Errors
/// [`PlotError::Data`](crate::PlotError::Data) if a referenced column is
/// missing or not numeric.
pub fn scatter3(
    df: &DataFrame,
    x: &str,
    y: &str,
    z: impl Into<ColumnSelector>,
    options: &Scatter3Options,
) -> PlotResult<Figure> {
    let z = z.into();
    let encodings = Encodings::read(
        df,
        options.c.as_deref(),
        options.s.as_deref(),
        options.m.as_deref(),
    )?;

    let xs = float_column(df, x)?;
    let ys = float_column(df, y)?;
    let x_error = optional_float_column(df, options.x_error.as_deref())?;
    let y_error = optional_float_column(df, options.y_error.as_deref())?;
    let z_error = optional_float_column(df, options.z_error.as_deref())?;

    let single = Groups::single(df.height());
    let parts = partition(
        [&encodings.color_groups, &encodings.symbol_groups, &single, &single],
        df.height(),
    );
    let series = z.names();
    let plans = plan_traces(&series, z.is_many(), &encodings, &parts);

    let scene = LayoutScene::new()
        .x_axis(Axis::new().title(Title::with_text(x)))
        .y_axis(Axis::new().title(Title::with_text(y)))
        .z_axis(Axis::new().title(Title::with_text(z.axis_title("value"))));
    let layout = base_layout(
        options.title.as_deref(),
        FigureTheme::Plotly,
        &encodings.legend_title(z.is_many()),
    )
    .scene(scene);
    let mut fig = Figure::new(layout);

    let z_values = series
        .iter()
        .map(|name| float_column(df, name))
        .collect::<PlotResult<Vec<_>>>()?;

    for plan in &plans {
        let mut trace = Scatter3D::new(
            take(&xs, plan.rows),
            take(&ys, plan.rows),
            take(&z_values[plan.series], plan.rows),
        )
        .mode(Mode::Markers)
        .marker(encodings.marker(plan))
        .show_legend(plan.show_legend);
        if !plan.name.is_empty() {
            trace = trace.name(&plan.name).legend_group(&plan.name);
        }
        if let Some(err) = &x_error {
            trace = trace.error_x(error_data(err, plan.rows));
        }
        if let Some(err) = &y_error {
            trace = trace.error_y(error_data(err, plan.rows));
        }
        if let Some(err) = &z_error {
            trace = trace.error_z(error_data(err, plan.rows));
        }
        fig.push_trace(PlotTrace::Scatter3D(trace));
    }
    debug!(traces = fig.trace_count(), "built scatter3 figure");

    if options.show {
        fig.show()?;
    }
    Ok(fig)
}

/// Plots a surface over a rectangular grid.
///
/// `z` is handed to plotly as given, one row per `z` row. Plotly reads
/// `z[[i, j]]` as the height at `(x[j], y[i])`, so `z` has one row per y
/// value and one column per x value. Contour lines along z are drawn with the
/// colormap, highlighted, and projected onto the z plane.
///
/// # Errors
/// [`PlotError::Io`](crate::PlotError::Io) if `show` is set and the page
/// cannot be opened.
pub fn surface(
    x: &[f64],
    y: &[f64],
    z: &Array2<f64>,
    options: &SurfaceOptions,
) -> PlotResult<Figure> {
    let rows: Vec<Vec<f64>> = z.outer_iter().map(|row| row.to_vec()).collect();

    let contours = SurfaceContours::new().z(PlaneContours::new()
        .show(true)
        .use_colormap(true)
        .highlight_color("limegreen")
        .project(PlaneProject::new().z(true)));
    let trace = Surface::new(rows)
        .x(x.to_vec())
        .y(y.to_vec())
        .contours(contours);

    let mut scene = LayoutScene::new();
    if let Some(title) = &options.title_x {
        scene = scene.x_axis(Axis::new().title(Title::with_text(title)));
    }
    if let Some(title) = &options.title_y {
        scene = scene.y_axis(Axis::new().title(Title::with_text(title)));
    }
    if let Some(title) = &options.title_z {
        scene = scene.z_axis(Axis::new().title(Title::with_text(title)));
    }

    let layout = base_layout(options.title.as_deref(), FigureTheme::Plotly, "").scene(scene);
    let mut fig = Figure::new(layout);
    fig.push_trace(PlotTrace::Surface(trace));
    debug!(rows = y.len(), cols = x.len(), "built surface figure");

    if options.show {
        fig.show()?;
    }
    Ok(fig)
}

/// Column mapping for a 2D figure.
struct Plot2d<'a> {
    mode: Mode,
    color: Option<&'a str>,
    size: Option<&'a str>,
    symbol: Option<&'a str>,
    facet_col: Option<&'a str>,
    facet_row: Option<&'a str>,
    x_error: Option<&'a str>,
    y_error: Option<&'a str>,
    title: Option<&'a str>,
    theme: FigureTheme,
}

fn build_2d(
    df: &DataFrame,
    x: &str,
    y: &ColumnSelector,
    mapping: &Plot2d<'_>,
) -> PlotResult<Figure> {
    let encodings = Encodings::read(df, mapping.color, mapping.size, mapping.symbol)?;
    let facet_rows = Groups::optional(df, mapping.facet_row)?;
    let facet_cols = Groups::optional(df, mapping.facet_col)?;
    let grid = FacetGrid::new(facet_rows.len(), facet_cols.len());

    let xs = float_column(df, x)?;
    let x_error = optional_float_column(df, mapping.x_error)?;
    let y_error = optional_float_column(df, mapping.y_error)?;

    let parts = partition(
        [
            &encodings.color_groups,
            &encodings.symbol_groups,
            &facet_rows,
            &facet_cols,
        ],
        df.height(),
    );
    let series = y.names();
    let plans = plan_traces(&series, y.is_many(), &encodings, &parts);

    let y_title = y.axis_title("value");
    let x_axes = (0..grid.cols())
        .map(|col| {
            Axis::new()
                .title(Title::with_text(x))
                .domain(&grid.column_domain(col))
                .anchor(&grid.bottom_y_ref())
        })
        .collect();
    let y_axes = (0..grid.rows())
        .map(|row| {
            Axis::new()
                .title(Title::with_text(y_title))
                .domain(&grid.row_domain(row))
                .anchor("x")
        })
        .collect();

    let mut layout = base_layout(mapping.title, mapping.theme, &encodings.legend_title(y.is_many()));
    let annotations = facet_annotations(&grid, &facet_rows, &facet_cols);
    if !annotations.is_empty() {
        layout = layout.annotations(annotations);
    }
    let mut fig = Figure::with_axes(layout, x_axes, y_axes);

    let y_values = series
        .iter()
        .map(|name| float_column(df, name))
        .collect::<PlotResult<Vec<_>>>()?;

    for plan in &plans {
        let mut trace = Scatter::new(take(&xs, plan.rows), take(&y_values[plan.series], plan.rows))
            .mode(mapping.mode.clone())
            .marker(encodings.marker(plan))
            .x_axis(&grid.x_ref(plan.facet_col))
            .y_axis(&grid.y_ref(plan.facet_row))
            .show_legend(plan.show_legend);
        if !matches!(mapping.mode, Mode::Markers) {
            trace = trace.line(Line::new().color(plan.color.clone()));
        }
        if !plan.name.is_empty() {
            trace = trace.name(&plan.name).legend_group(&plan.name);
        }
        if let Some(err) = &x_error {
            trace = trace.error_x(error_data(err, plan.rows));
        }
        if let Some(err) = &y_error {
            trace = trace.error_y(error_data(err, plan.rows));
        }
        fig.push_trace(PlotTrace::Scatter(trace));
    }

    Ok(fig)
}

fn optional_float_column(
    df: &DataFrame,
    name: Option<&str>,
) -> PlotResult<Option<Vec<f64>>> {
    name.map(|name| float_column(df, name)).transpose()
}

fn error_data(errors: &[f64], rows: &[usize]) -> ErrorData {
    ErrorData::new(ErrorType::Data).array(take(errors, rows))
}

fn base_layout(title: Option<&str>, theme: FigureTheme, legend_title: &str) -> Layout {
    let mut layout = Layout::new().template(theme.template());
    if let Some(title) = title {
        layout = layout.title(Title::with_text(title));
    }
    if !legend_title.is_empty() {
        layout = layout.legend(Legend::new().title(Title::with_text(legend_title)));
    }
    layout
}

fn facet_annotations(grid: &FacetGrid, rows: &Groups, cols: &Groups) -> Vec<Annotation> {
    let mut annotations = Vec::new();
    if cols.column().is_some() {
        for col in 0..cols.len() {
            let [start, end] = grid.column_domain(col);
            annotations.push(
                Annotation::new()
                    .text(&cols.caption(col))
                    .x_ref("paper")
                    .y_ref("paper")
                    .x((start + end) / 2.0)
                    .y(1.0)
                    .x_anchor(plotly::common::Anchor::Center)
                    .y_anchor(plotly::common::Anchor::Bottom)
                    .show_arrow(false),
            );
        }
    }
    if rows.column().is_some() {
        for row in 0..rows.len() {
            let [start, end] = grid.row_domain(row);
            annotations.push(
                Annotation::new()
                    .text(&rows.caption(row))
                    .x_ref("paper")
                    .y_ref("paper")
                    .x(1.0)
                    .y((start + end) / 2.0)
                    .x_anchor(plotly::common::Anchor::Left)
                    .y_anchor(plotly::common::Anchor::Middle)
                    .text_angle(90.0)
                    .show_arrow(false),
            );
        }
    }
    annotations
}

/// Continuous color mapping for a float color column.
struct ContinuousColor {
    column: String,
    values: Vec<f64>,
    min: f64,
    max: f64,
}

/// Color, size and symbol mappings shared by the marker builders.
struct Encodings {
    color_groups: Groups,
    continuous: Option<ContinuousColor>,
    symbol_groups: Groups,
    sizes: Option<Vec<usize>>,
}

impl Encodings {
    fn read(
        df: &DataFrame,
        color: Option<&str>,
        size: Option<&str>,
        symbol: Option<&str>,
    ) -> PlotResult<Self> {
        let rows = df.height();
        let (color_groups, continuous) = match color {
            Some(name) if is_float_column(df, name)? => {
                let values = float_column(df, name)?;
                let finite = values.iter().copied().filter(|v| v.is_finite());
                let min = finite.clone().fold(f64::INFINITY, f64::min);
                let max = finite.fold(f64::NEG_INFINITY, f64::max);
                let continuous = ContinuousColor {
                    column: name.to_string(),
                    values,
                    min,
                    max,
                };
                (Groups::single(rows), Some(continuous))
            }
            Some(name) => (Groups::from_column(df, name)?, None),
            None => (Groups::single(rows), None),
        };
        let symbol_groups = Groups::optional(df, symbol)?;
        let sizes = match size {
            Some(name) => Some(marker_sizes(&float_column(df, name)?)),
            None => None,
        };

        Ok(Self {
            color_groups,
            continuous,
            symbol_groups,
            sizes,
        })
    }

    fn has_discrete_color(&self) -> bool {
        self.color_groups.column().is_some()
    }

    /// Whether symbols add their own legend label, i.e. they are not just
    /// repeating the color grouping.
    fn has_distinct_symbol(&self) -> bool {
        match self.symbol_groups.column() {
            Some(symbol) => self.color_groups.column() != Some(symbol),
            None => false,
        }
    }

    fn legend_title(&self, many_series: bool) -> String {
        let mut parts = Vec::new();
        if many_series {
            parts.push("variable");
        }
        if let Some(column) = self.color_groups.column() {
            parts.push(column);
        }
        if self.has_distinct_symbol() {
            parts.extend(self.symbol_groups.column());
        }
        parts.join(", ")
    }

    fn marker(&self, plan: &TracePlan<'_>) -> Marker {
        let mut marker = match &self.continuous {
            Some(cont) => Marker::new()
                .color_array(take(&cont.values, plan.rows))
                .color_scale(continuous_scale())
                .cmin(cont.min)
                .cmax(cont.max)
                .show_scale(plan.first)
                .color_bar(ColorBar::new().title(Title::with_text(&cont.column))),
            None => Marker::new().color(plan.color.clone()),
        };
        if self.symbol_groups.column().is_some() {
            marker = marker.symbol(symbol_for(plan.symbol_code));
        }
        if let Some(sizes) = &self.sizes {
            marker = marker.size_array(take(sizes, plan.rows));
        }
        marker
    }
}

/// One trace to draw: which series, which rows, and how to label it.
struct TracePlan<'a> {
    series: usize,
    rows: &'a [usize],
    symbol_code: usize,
    facet_row: usize,
    facet_col: usize,
    name: String,
    color: String,
    show_legend: bool,
    first: bool,
}

fn plan_traces<'a>(
    series: &[&str],
    many_series: bool,
    encodings: &Encodings,
    parts: &'a indexmap::IndexMap<[usize; 4], Vec<usize>>,
) -> Vec<TracePlan<'a>> {
    let mut seen = HashSet::new();
    let mut plans = Vec::with_capacity(series.len() * parts.len());

    for (series_idx, series_name) in series.iter().enumerate() {
        for (&[color_code, symbol_code, facet_row, facet_col], rows) in parts {
            let mut labels = Vec::new();
            if many_series {
                labels.push(series_name.to_string());
            }
            if encodings.has_discrete_color() {
                labels.push(encodings.color_groups.label(color_code).to_string());
            }
            if encodings.has_distinct_symbol() {
                labels.push(encodings.symbol_groups.label(symbol_code).to_string());
            }
            let name = labels.join(", ");

            let color = if encodings.has_discrete_color() {
                qualitative_color(color_code)
            } else {
                qualitative_color(series_idx)
            };

            // Facet panels repeat legend entries; list each name once
            let show_legend = !name.is_empty() && seen.insert(name.clone());

            plans.push(TracePlan {
                series: series_idx,
                rows: rows.as_slice(),
                symbol_code,
                facet_row,
                facet_col,
                name,
                color,
                show_legend,
                first: plans.is_empty(),
            });
        }
    }
    plans
}
