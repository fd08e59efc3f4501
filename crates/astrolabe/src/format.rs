//! Output formats.

use std::{fmt, path::Path, str::FromStr};

/// File format written by a render.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Svg,
    #[default]
    Png,
    /// Graphviz DOT source text.
    Dot,
}

impl OutputFormat {
    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Dot => "dot",
        }
    }

    /// Infers the format from the extension of `path`, ignoring case.
    ///
    /// ```
    /// use astrolabe::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("out/diagram.SVG"), Some(OutputFormat::Svg));
    /// assert_eq!(OutputFormat::from_path("diagram"), None);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "dot" | "gv" => Ok(Self::Dot),
            _ => Err(format!(
                "unsupported output format `{s}`, valid values: svg, png, dot"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
