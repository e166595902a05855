//! The compile driver.
//!
//! A [`Compiler`] owns everything a compile session shares: the source
//! registry, one lexer that is reset for every file, and the diagnostics
//! sink both phases report into.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use logix_log::{debug, error, info, warn, Level};
use logix_syntax::{
    Diagnostics, Lexer, Parser, SourceError, SourceMap, SourceMapManager, Stmt, TreePrinter,
};

use crate::timer::PhaseTimer;

/// File name the driver looks for when none is given.
pub const DEFAULT_SUFFIX: &str = "test.lx";

/// One compile session over a project root.
#[derive(Debug)]
pub struct Compiler {
    sources: SourceMapManager,
    lexer: Lexer,
    diagnostics: Diagnostics,
    suffix: String,
    use_colors: bool,
    timer: PhaseTimer,
}

impl Compiler {
    pub fn new(root: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            sources: SourceMapManager::new(root),
            lexer: Lexer::default(),
            diagnostics: Diagnostics::new(),
            suffix: suffix.into(),
            use_colors: true,
            timer: PhaseTimer::new(),
        }
    }

    /// Enables or disables ANSI colors in rendered issues.
    #[must_use]
    pub fn with_colors(mut self, on: bool) -> Self {
        self.use_colors = on;
        self
    }

    /// Compiles every matching file under the root.
    ///
    /// Returns `Ok(true)` when no file produced an error. A file that cannot
    /// be read is logged and skipped; only an unusable root is an `Err`.
    pub fn compile(&mut self) -> Result<bool, SourceError> {
        self.timer.start("discover");
        let files = self.sources.walk(&self.suffix)?;
        info!(
            "found {} `{}` files under {}",
            files.len(),
            self.suffix,
            self.sources.root().display()
        );

        for path in &files {
            match self.parse_file(path) {
                Ok(Some(program)) if logix_log::get_logger().enabled(Level::Debug) => {
                    debug!("AST of {}:\n{}", path.display(), TreePrinter::new().print_stmt(&program));
                }
                Ok(_) => {}
                Err(err) => error!("{err}"),
            }
        }

        self.timer.start("report");
        self.report();
        self.timer.end();
        self.timer.report();

        let errors = self.diagnostics.error_count();
        info!("{errors} errors");
        if errors == 0 {
            info!("compile succeeded");
        } else {
            error!("compile failed");
        }
        Ok(errors == 0)
    }

    /// Loads and parses one file.
    ///
    /// Returns `Ok(None)` for a file with no effective content.
    pub fn parse_file(&mut self, path: &Path) -> Result<Option<Stmt>, SourceError> {
        self.timer.start("load");
        let source = self.sources.load_file(path)?;
        if source.is_blank() {
            debug!("skipping blank file {}", source.label());
            self.timer.end();
            return Ok(None);
        }

        self.timer.start("parse");
        let program = self.parse_source(source);
        self.timer.end();
        Ok(Some(program))
    }

    fn parse_source(&mut self, source: Arc<SourceMap>) -> Stmt {
        let before = self.diagnostics.error_count();
        self.lexer.reset(Arc::clone(&source));
        let program = Parser::new(&mut self.lexer, &mut self.diagnostics).parse();

        let added = self.diagnostics.error_count() - before;
        if added > 0 {
            warn!("{}: {added} errors", source.label());
        }
        program
    }

    /// Prints every warning, then every error, to stderr.
    pub fn report(&self) {
        eprint!("{}", self.diagnostics.render_all(self.use_colors));
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn sources(&self) -> &SourceMapManager {
        &self.sources
    }
}
