//! Standalone HTML export.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::core::Figure;
use crate::PlotResult;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const MATHJAX_JS: &str = "https://cdn.jsdelivr.net/npm/mathjax@3.2.2/es5/tex-svg.js";
const DIV_ID: &str = "frameplot-figure";

/// Local wall-clock timestamp used in saved file names,
/// e.g. `2024-05-01_14-03-59-123456`.
pub fn timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%d_%H-%M-%S-%6f")
        .to_string()
}

impl Figure {
    /// Renders a self-contained HTML page for this figure.
    ///
    /// plotly.js and MathJax are loaded from their CDNs, so `$...$` labels
    /// render as LaTeX when the page is opened with network access.
    ///
    /// # Errors
    /// [`PlotError::Serialization`](crate::PlotError::Serialization) if the
    /// figure cannot be encoded as JSON.
    pub fn to_html(&self) -> PlotResult<String> {
        // Keep string contents from closing the script element
        let figure = self.to_json()?.to_string().replace("</", "<\\/");
        Ok(format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head>\n\
             <meta charset=\"utf-8\" />\n\
             <script src=\"{MATHJAX_JS}\"></script>\n\
             <script src=\"{PLOTLY_JS}\"></script>\n\
             </head>\n\
             <body>\n\
             <div id=\"{DIV_ID}\" class=\"plotly-graph-div\"></div>\n\
             <script type=\"text/javascript\">\n\
             var figure = {figure};\n\
             Plotly.newPlot(\"{DIV_ID}\", figure.data, figure.layout, figure.config);\n\
             </script>\n\
             </body>\n\
             </html>\n"
        ))
    }

    /// Writes the page to the system temp directory and opens it in the
    /// default browser.
    ///
    /// # Errors
    /// [`PlotError::Io`](crate::PlotError::Io) if the page cannot be written
    /// or the browser cannot be launched.
    pub fn show(&self) -> PlotResult<()> {
        let path = save(self, "frameplot", std::env::temp_dir())?;
        debug!(traces = self.trace_count(), "showing figure");
        browser_command(&path).spawn()?;
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn browser_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(target_os = "windows")]
fn browser_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn browser_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

/// Writes `fig` to `<dir>/<name>_<timestamp>.html` and returns the path.
///
/// `dir` and any missing parents are created first. Saving the same figure
/// twice yields two files, since the timestamp has microsecond resolution.
///
/// # Errors
/// Returns [`PlotError::Io`](crate::PlotError::Io) if the directory cannot be
/// created or the file cannot be written.
pub fn save(fig: &Figure, name: &str, dir: impl AsRef<Path>) -> PlotResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let path = dir.join(format!("{name}_{}.html", timestamp()));
    fs::write(&path, fig.to_html()?)?;

    info!("Saved figure to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plotting::builders::{LineOptions, line};
    use crate::plotting::style::style_to_matplotlib;
    use polars::df;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample() -> Figure {
        let df = df!("x" => [1.0, 2.0, 3.0], "y" => [1.0, 4.0, 9.0]).expect("valid frame");
        line(&df, "x", "y", &LineOptions::default()).expect("line figure")
    }

    #[test]
    fn test_timestamp_format() {
        let stamp = timestamp();
        // YYYY-mm-dd_HH-MM-SS-ffffff
        assert_eq!(stamp.len(), 26);
        assert_eq!(&stamp[10..11], "_");
        assert!(stamp[20..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_save_writes_html_file() {
        let tmp = TempDir::new().expect("temp dir");
        let path = save(&sample(), "test", tmp.path()).expect("save failed");

        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("html"));
        assert_eq!(path.parent(), Some(tmp.path()));

        let file_name = path.file_name().and_then(|n| n.to_str()).expect("utf-8 name");
        assert!(file_name.starts_with("test_"));
        assert_eq!(file_name.len(), "test_".len() + 26 + ".html".len());
    }

    #[test]
    fn test_save_creates_nested_dirs() {
        let tmp = TempDir::new().expect("temp dir");
        let dir = tmp.path().join("output").join("test").join("img");
        let fig = style_to_matplotlib(&sample());

        let path = save(&fig, "styled", &dir).expect("save failed");
        assert!(dir.is_dir());
        assert!(path.starts_with(&dir));
    }

    #[test]
    fn test_sequential_saves_are_distinct() {
        let tmp = TempDir::new().expect("temp dir");
        let fig = sample();

        let first = save(&fig, "fig", tmp.path()).expect("save failed");
        thread::sleep(Duration::from_millis(2));
        let second = save(&fig, "fig", tmp.path()).expect("save failed");

        assert_ne!(first, second);
        assert!(first.exists() && second.exists());
    }

    #[test]
    fn test_html_embeds_figure_and_mathjax() {
        let tmp = TempDir::new().expect("temp dir");
        let path = save(&sample(), "page", tmp.path()).expect("save failed");
        let html = fs::read_to_string(path).expect("readable");

        assert!(html.contains("mathjax"));
        assert!(html.contains("plotly"));
        assert!(html.contains(DIV_ID));
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("\"xaxis\""));
    }

    #[test]
    fn test_html_escapes_closing_tags() {
        let df = df!("x" => [1.0, 2.0], "</script>" => [1.0, 2.0]).expect("valid frame");
        let fig = line(&df, "x", "</script>", &LineOptions::default()).expect("line figure");
        let html = fig.to_html().expect("renders");
        assert_eq!(html.matches("</script>").count(), 3);
    }

    #[test]
    fn test_save_into_file_path_fails() {
        let tmp = TempDir::new().expect("temp dir");
        let blocker = tmp.path().join("taken");
        fs::write(&blocker, "x").expect("write blocker");

        let result = save(&sample(), "fig", blocker.join("sub"));
        assert!(matches!(result, Err(crate::PlotError::Io(_))));
    }
}
