// Correctness and logic
#![warn(clippy::unit_cmp)] // Detects comparing unit types
#![warn(clippy::match_same_arms)] // Duplicate match arms

// Performance-focused
#![warn(clippy::inefficient_to_string)] // `format!("{}", x)` vs `x.to_string()`
#![warn(clippy::map_clone)] // Cloning inside `map()` unnecessarily
#![warn(clippy::unnecessary_to_owned)] // Detects redundant `.to_owned()` or `.clone()`
#![warn(clippy::needless_collect)] // Avoids `.collect().iter()` chains

// Style and idiomatic Rust
#![warn(clippy::redundant_clone)] // Detects unnecessary `.clone()`
#![warn(clippy::needless_return)] // Avoids `return` at the end of functions
#![warn(clippy::manual_map)] // Use `.map()` instead of manual `match`
#![warn(clippy::unwrap_used)] // Avoids using `unwrap()`

// Maintainability
#![warn(clippy::missing_panics_doc)] // Docs for functions that might panic
#![deny(missing_docs)] // Documentation is a must for release

//! # frameplot
//!
//! Quick, consistently styled plotly figures from polars dataframes.
//!
//! ## Overview
//!
//! Builders take a dataframe and column names and return a [`Figure`]:
//!
//! - [`line`]: 2D lines, optionally faceted and with error bars
//! - [`scatter`]: 2D markers with color, size and symbol encodings and facets
//! - [`scatter3`]: 3D markers with color, size and symbol encodings
//! - [`surface`]: a 3D surface over a rectilinear grid, with contour lines
//!
//! [`style_to_matplotlib`] restyles any figure like a static matplotlib chart
//! and [`save`] writes it as a standalone HTML page with a timestamped name.
//! [`orient_and_broadcast`] builds dense parameter grids for feeding a frame.
//!
//! ## Example
//!
//! ```rust,no_run
//! use frameplot::{LineOptions, line, save, style_to_matplotlib};
//! use polars::df;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let x: Vec<f64> = (0..63).map(|i| i as f64 * 0.1).collect();
//! let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
//! let df = df!("x" => x, "y" => y)?;
//!
//! let fig = line(&df, "x", "y", &LineOptions::default().with_title("sine"))?;
//! let path = save(&style_to_matplotlib(&fig), "sine", "output/img")?;
//! println!("{}", path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`PlotResult`]. Missing columns surface as
//! [`PlotError::Data`] straight from polars, shape problems as
//! [`PlotError::DimensionMismatch`], and file system failures as
//! [`PlotError::Io`].
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`debug!` while building, `info!` on
//! save) and installs no subscriber of its own.

pub mod error;
pub mod plotting;
pub mod utils;

pub use error::{PlotError, PlotResult};
pub use plotting::{
    ColumnSelector, Figure, FigureTheme, LineOptions, MatplotlibStyle, PlotTrace, Scatter3Options,
    ScatterOptions, SurfaceOptions, line, save, scatter, scatter3, style_to_matplotlib, style_with,
    surface,
};
pub use utils::orient_and_broadcast;
