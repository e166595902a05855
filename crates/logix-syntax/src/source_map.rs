//! Normalized, line-indexed source text.
//!
//! A [`SourceMap`] is built once per file and never changes afterwards. All
//! offsets are character offsets (not bytes), so CJK identifiers count as one
//! column each.
//!
//! [`SourceMapManager`] owns every map loaded during a session and assigns
//! source indices.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashbrown::HashMap;
use logix_log::{debug, warn};
use walkdir::WalkDir;

use crate::error::SourceError;
use crate::span::{LineCol, Span};

/// Label used for sources that were not loaded from a file.
pub const ANONYMOUS_LABEL: &str = "<input>";

/// One file's text with `\n` line endings and a line-start table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMap {
    index: usize,
    chars: Vec<char>,
    line_starts: Vec<usize>,
    path: Option<PathBuf>,
    label: String,
}

impl SourceMap {
    /// Builds an anonymous source map.
    ///
    /// ```
    /// use logix_syntax::source_map::SourceMap;
    ///
    /// let map = SourceMap::new(0, "a = 1\r\nb = 2");
    /// assert_eq!(map.line(8), 2);
    /// assert_eq!(map.col(8), 2);
    /// assert_eq!(map.line_text(1), "a = 1");
    /// ```
    pub fn new(index: usize, text: &str) -> Self {
        Self::build(index, text, None, ANONYMOUS_LABEL.to_string())
    }

    /// Builds a source map for a file. `label` is what diagnostics print as
    /// the file name, usually the path relative to the project root.
    pub fn with_path(index: usize, text: &str, path: PathBuf, label: impl Into<String>) -> Self {
        Self::build(index, text, Some(path), label.into())
    }

    fn build(index: usize, text: &str, path: Option<PathBuf>, label: String) -> Self {
        let chars = normalize(text);

        let mut line_starts = vec![0];
        line_starts.extend(
            chars
                .iter()
                .enumerate()
                .filter(|(_, c)| **c == '\n')
                .map(|(i, _)| i + 1),
        );

        Self {
            index,
            chars,
            line_starts,
            path,
            label,
        }
    }

    /// Index of this source inside its manager.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Path the text was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Name printed in diagnostic locators.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of characters after normalization.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the text is empty.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Whether the text contains nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.chars.iter().all(|c| c.is_whitespace())
    }

    /// The character at `offset`, or `None` past the end.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    /// The normalized characters.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Text in `[start, end)`; both bounds are clamped to the text.
    pub fn substring(&self, start: usize, end: usize) -> String {
        let end = end.min(self.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Text covered by `span`.
    pub fn slice(&self, span: Span) -> String {
        self.substring(span.start, span.end)
    }

    /// The whole normalized text.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Number of lines. A trailing newline opens one more (empty) line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Offset of the first character of `line` (1-based).
    pub fn line_start(&self, line: usize) -> Option<usize> {
        line.checked_sub(1)
            .and_then(|i| self.line_starts.get(i).copied())
    }

    /// 1-based line containing `offset`. Offsets past the end resolve to the
    /// last line.
    pub fn line(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    /// 1-based column of `offset` within its line.
    pub fn col(&self, offset: usize) -> usize {
        let line = self.line(offset);
        offset - self.line_starts[line - 1] + 1
    }

    /// Line and column of `offset`.
    pub fn line_col(&self, offset: usize) -> LineCol {
        let line = self.line(offset);
        LineCol::new(line, offset - self.line_starts[line - 1] + 1)
    }

    /// Text of `line` (1-based) without its newline. Unknown lines are
    /// empty.
    pub fn line_text(&self, line: usize) -> String {
        let Some(start) = self.line_start(line) else {
            return String::new();
        };
        let end = match self.line_starts.get(line) {
            Some(next) => next - 1,
            None => self.len(),
        };
        self.substring(start, end)
    }
}

/// Folds `\r\n` and lone `\r` into `\n`.
fn normalize(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            chars.next_if_eq(&'\n');
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

/// Owner of every [`SourceMap`] in a compile session.
#[derive(Debug, Default)]
pub struct SourceMapManager {
    root: PathBuf,
    maps: Vec<Arc<SourceMap>>,
    by_path: HashMap<PathBuf, usize>,
}

impl SourceMapManager {
    /// Creates a manager whose file labels are relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            maps: Vec::new(),
            by_path: HashMap::new(),
        }
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads and registers a file. Loading the same path twice returns the
    /// map registered the first time.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<Arc<SourceMap>, SourceError> {
        let path = path.as_ref();
        if let Some(&index) = self.by_path.get(path) {
            return Ok(Arc::clone(&self.maps[index]));
        }

        let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let label = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string();

        let index = self.maps.len();
        let map = Arc::new(SourceMap::with_path(index, &text, path.to_path_buf(), label));
        debug!("loaded {} as source {index} ({} lines)", map.label(), map.line_count());

        self.maps.push(Arc::clone(&map));
        self.by_path.insert(path.to_path_buf(), index);
        Ok(map)
    }

    /// Registers in-memory text.
    pub fn load_str(&mut self, text: &str) -> Arc<SourceMap> {
        let map = Arc::new(SourceMap::new(self.maps.len(), text));
        self.maps.push(Arc::clone(&map));
        map
    }

    /// The map registered under `index`.
    pub fn get(&self, index: usize) -> Option<&Arc<SourceMap>> {
        self.maps.get(index)
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Whether nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Registered maps in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<SourceMap>> {
        self.maps.iter()
    }

    /// Recursively lists regular files under the root whose file name is
    /// exactly `file_name`, sorted by path.
    pub fn walk(&self, file_name: &str) -> Result<Vec<PathBuf>, SourceError> {
        if !self.root.is_dir() {
            return Err(SourceError::NotADirectory(self.root.clone()));
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("skipping unreadable entry: {err}");
                    continue;
                }
            };
            if entry.file_type().is_file() && entry.file_name() == file_name {
                found.push(entry.into_path());
            }
        }
        found.sort();
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_line_endings() {
        let map = SourceMap::new(0, "a\r\nb\rc\n");
        assert_eq!(map.text(), "a\nb\nc\n");
        assert_eq!(map.line_count(), 4);
    }

    #[test]
    fn test_line_and_col() {
        let map = SourceMap::new(0, "ab\ncd\n\nxyz");
        assert_eq!(map.line_col(0), LineCol::new(1, 1));
        assert_eq!(map.line_col(2), LineCol::new(1, 3));
        assert_eq!(map.line_col(3), LineCol::new(2, 1));
        assert_eq!(map.line_col(6), LineCol::new(3, 1));
        assert_eq!(map.line_col(9), LineCol::new(4, 3));
    }

    #[test]
    fn test_col_matches_line_start_for_every_offset() {
        let map = SourceMap::new(0, "fn f() {\n  x = 1\n\n}\nlast");
        let mut previous = 1;
        for offset in 0..map.len() {
            let line = map.line(offset);
            assert!(line >= previous);
            previous = line;
            let start = map.line_start(line).unwrap();
            assert_eq!(map.col(offset), offset - start + 1);
        }
    }

    #[test]
    fn test_line_text() {
        let map = SourceMap::new(0, "first\nsecond\nthird");
        assert_eq!(map.line_text(1), "first");
        assert_eq!(map.line_text(2), "second");
        assert_eq!(map.line_text(3), "third");
        assert_eq!(map.line_text(4), "");
        assert_eq!(map.line_text(0), "");
    }

    #[test]
    fn test_line_text_with_trailing_newline() {
        let map = SourceMap::new(0, "x\n");
        assert_eq!(map.line_text(1), "x");
        assert_eq!(map.line_text(2), "");
    }

    #[test]
    fn test_offsets_are_characters() {
        let map = SourceMap::new(0, "变量 = 1");
        assert_eq!(map.len(), 6);
        assert_eq!(map.char_at(1), Some('量'));
        assert_eq!(map.col(3), 4);
        assert_eq!(map.substring(0, 2), "变量");
    }

    #[test]
    fn test_blank_detection() {
        assert!(SourceMap::new(0, " \n\t\r\n").is_blank());
        assert!(!SourceMap::new(0, "  x").is_blank());
    }

    #[test]
    fn test_manager_assigns_indices() {
        let mut manager = SourceMapManager::new(".");
        let a = manager.load_str("a");
        let b = manager.load_str("b");
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.get(1).map(|m| m.text()), Some("b".to_string()));
    }

    #[test]
    fn test_manager_loads_and_walks_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("test.lx"), "a = 1\n").unwrap();
        std::fs::write(dir.path().join("nested/test.lx"), "b = 2\n").unwrap();
        std::fs::write(dir.path().join("nested/other.lx"), "c = 3\n").unwrap();

        let mut manager = SourceMapManager::new(dir.path());
        let files = manager.walk("test.lx").unwrap();
        assert_eq!(files.len(), 2);

        let map = manager.load_file(&files[1]).unwrap();
        assert_eq!(map.label(), Path::new("test.lx").display().to_string());
        let again = manager.load_file(&files[1]).unwrap();
        assert!(Arc::ptr_eq(&map, &again));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_manager_reports_missing_files() {
        let mut manager = SourceMapManager::new(".");
        let err = manager.load_file("definitely/not/here.lx").unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn test_walk_requires_directory() {
        let manager = SourceMapManager::new("definitely/not/here");
        assert!(matches!(
            manager.walk("test.lx"),
            Err(SourceError::NotADirectory(_))
        ));
    }
}
