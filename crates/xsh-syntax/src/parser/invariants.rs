//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::core::Parser;
use crate::cst::SyntaxKind;

impl Parser<'_> {
    #[inline]
    pub(crate) fn ensure_progress(&self) {
        assert!(
            self.debug_fuel.get() != 0,
            "parser is stuck: too many lookaheads"
        );
        self.debug_fuel.set(self.debug_fuel.get() - 1);
    }

    #[inline]
    pub(crate) fn assert_current(&mut self, expected_kind: SyntaxKind) {
        let current_kind = self.current();
        assert_eq!(
            current_kind, expected_kind,
            "broken parser invariant: expected {:?} but found {:?} (upstream caller's responsibility)",
            expected_kind, current_kind,
        );
    }

    /// A subprocess production may only start on one of the region openers.
    #[inline]
    pub(crate) fn assert_region_opener(&mut self) {
        let current_kind = self.current();
        assert!(
            crate::cst::token_sets::MODE_OPENERS.contains(current_kind),
            "broken parser invariant: {current_kind:?} does not open a subprocess region",
        );
    }
}
