use std::sync::Arc;

use tracing::debug;

use crate::cancel::CancellationFlag;
use crate::incremental;
use crate::parser::Parser;
use crate::tree::{ReuseStats, Tree};
use crate::{Error, InputEdit, Result};

pub const DEFAULT_RECURSION_FUEL: u32 = 4096;

/// Limits and switches shared by full and incremental parses.
#[derive(Debug, Clone)]
pub struct ParseSession {
    exec_fuel: Option<u32>,
    recursion_fuel: Option<u32>,
    cancellation: Option<CancellationFlag>,
    incremental: bool,
}

impl Default for ParseSession {
    fn default() -> Self {
        Self {
            exec_fuel: None,
            recursion_fuel: Some(DEFAULT_RECURSION_FUEL),
            cancellation: None,
            incremental: true,
        }
    }
}

impl ParseSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upper bound on consumed tokens. `None`, the default, disables the
    /// limit so a valid source of any size parses.
    pub fn exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.exec_fuel = limit;
        self
    }

    /// Upper bound on nesting depth. `None` disables the limit.
    pub fn recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.recursion_fuel = limit;
        self
    }

    pub fn cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// With `false`, [`apply_edit`](Self::apply_edit) always parses from
    /// scratch.
    pub fn incremental(mut self, enabled: bool) -> Self {
        self.incremental = enabled;
        self
    }

    pub fn is_incremental(&self) -> bool {
        self.incremental
    }

    pub fn parse(&self, source: &str) -> Result<Tree> {
        self.parse_full(Arc::from(source))
    }

    pub fn apply_edit(&self, tree: &Tree, edit: &InputEdit, new_source: &str) -> Result<Tree> {
        incremental::apply_edit(self, tree, edit, new_source)
    }

    pub(crate) fn parse_full(&self, source: Arc<str>) -> Result<Tree> {
        self.check_cancelled()?;
        debug!(bytes = source.len(), "full parse");
        let output = self.configure(Parser::new(&source)).parse()?;
        debug!(
            checkpoints = output.checkpoints.len(),
            diagnostics = output.diagnostics.len(),
            fuel = output.exec_fuel_consumed,
            "full parse finished"
        );
        Ok(Tree::new(
            output.green,
            source,
            output.checkpoints,
            output.diagnostics,
            ReuseStats::default(),
        ))
    }

    pub(crate) fn configure<'src>(&self, parser: Parser<'src>) -> Parser<'src> {
        parser
            .with_exec_fuel(self.exec_fuel)
            .with_recursion_fuel(self.recursion_fuel)
            .with_cancellation(self.cancellation.clone())
    }

    /// Fails early when the flag is already raised. An empty input never
    /// consumes a token, so the parser alone would not notice.
    pub(crate) fn check_cancelled(&self) -> Result<()> {
        match &self.cancellation {
            Some(flag) if flag.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}
