use swc_common::{SourceMap, Span};

/// Pure position information in source code files (TSX/JSX/TS/JS).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub file_path: String,
    pub line: usize,
    pub col: usize,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

/// Position with the source line it points into.
///
/// The reporter prints `source_line` under the `-->` location with a caret at `col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    pub location: SourceLocation,
    /// The source code line content for display.
    pub source_line: String,
}

impl SourceContext {
    pub fn new(location: SourceLocation, source_line: impl Into<String>) -> Self {
        Self {
            location,
            source_line: source_line.into(),
        }
    }

    // Convenience accessors
    pub fn file_path(&self) -> &str {
        &self.location.file_path
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn col(&self) -> usize {
        self.location.col
    }
}

/// Turns swc spans into [`SourceContext`]s for one file.
///
/// Every component of the analysis receives the same locator so that all
/// findings of a file point into the same source map.
#[derive(Clone, Copy)]
pub struct Locator<'a> {
    file_path: &'a str,
    source_map: &'a SourceMap,
}

impl<'a> Locator<'a> {
    pub fn new(file_path: &'a str, source_map: &'a SourceMap) -> Self {
        Self {
            file_path,
            source_map,
        }
    }

    pub fn file_path(&self) -> &'a str {
        self.file_path
    }

    /// Locate the start of `span` (1-based line and display column).
    ///
    /// Dummy spans and positions outside the source map have no location:
    /// they map to line 0, column 0 with an empty source line.
    pub fn locate(&self, span: Span) -> SourceContext {
        if span.is_dummy() {
            return self.unknown();
        }
        // Positions past the last file resolve to that file; reject them.
        match self.source_map.try_lookup_source_file(span.lo) {
            Ok(Some(file)) if span.lo <= file.end_pos => {}
            _ => return self.unknown(),
        }
        let Ok(loc) = self.source_map.try_lookup_char_pos(span.lo) else {
            return self.unknown();
        };
        let source_line = loc
            .file
            .get_line(loc.line.saturating_sub(1))
            .map(|cow| cow.to_string())
            .unwrap_or_default();

        SourceContext::new(
            SourceLocation::new(self.file_path, loc.line, loc.col_display + 1),
            source_line,
        )
    }

    fn unknown(&self) -> SourceContext {
        SourceContext::new(SourceLocation::new(self.file_path, 0, 0), "")
    }
}
