//! Figure builders over polars dataframes.
//!
//! Each builder reads the named columns of a [`DataFrame`](polars::prelude::DataFrame)
//! and returns a [`Figure`]: traces, layout and one axis per facet row and
//! column. Figures can then be restyled, shown or saved.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use frameplot::plotting::*;
//! use polars::df;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let df = df!(
//!     "x" => [1.0, 2.0, 3.0, 4.0],
//!     "y" => [1.0, 4.0, 9.0, 16.0],
//!     "group" => ["a", "a", "b", "b"]
//! )?;
//!
//! let fig = scatter(&df, "x", "y", &ScatterOptions::default().with_color("group"))?;
//! let fig = style_to_matplotlib(&fig);
//! save(&fig, "squares", "output/img")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **core**: [`Figure`], traces, facet grid geometry, colors and themes
//! - **data**: column access, grouping and marker sizing
//! - **builders**: `line`, `scatter`, `scatter3` and `surface`
//! - **style**: matplotlib-like restyling
//! - **export**: standalone HTML pages with timestamped names

pub mod builders;
pub mod core;
pub mod data;
pub mod export;
pub mod style;

pub use self::builders::*;
pub use self::core::*;
pub use self::data::ColumnSelector;
pub use self::export::*;
pub use self::style::*;
