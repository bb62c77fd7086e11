use hashbrown::{HashMap, HashSet};

use crate::translate::param::Param;

/// Caller-injected constant substitutions, live for a single instruction.
///
/// A claim maps a literal offset to a parameter that was lifted eagerly at
/// claim time; the next materialization of that literal reads the parameter
/// instead. Each entry may be consumed at most once: a second materialization
/// of the same offset is ambiguous and fatal.
pub(crate) struct ClaimContext {
    replacements: HashMap<u64, Param>,
    used: HashSet<u64>,
}

impl ClaimContext {
    pub(crate) fn new() -> Self {
        Self { replacements: HashMap::new(), used: HashSet::new() }
    }

    pub(crate) fn apply_eq(&mut self, offset: u64, replacement: Param) {
        self.replacements.insert(offset, replacement);
    }

    /// Drops every pending claim.
    pub(crate) fn apply_non_eq(&mut self) {
        self.replacements.clear();
        self.used.clear();
    }

    /// Takes the replacement for `offset`, marking it consumed.
    pub(crate) fn consume(&mut self, offset: u64) -> Option<Param> {
        let replacement = self.replacements.get(&offset).copied()?;
        if !self.used.insert(offset) {
            panic!("ambiguous claim_eq substitution for offset {offset:#x}");
        }
        Some(replacement)
    }
}

#[cfg(test)]
mod tests {
    use super::ClaimContext;
    use crate::translate::param::{Param, RegCell};

    fn dummy_param() -> Param {
        Param::Register(RegCell { offset: 0 })
    }

    #[test]
    fn consume_without_claim_is_none() {
        let mut claims = ClaimContext::new();
        assert!(claims.consume(42).is_none());
    }

    #[test]
    fn claim_is_consumed_once() {
        let mut claims = ClaimContext::new();
        claims.apply_eq(42, dummy_param());
        assert!(claims.consume(7).is_none());
        assert!(claims.consume(42).is_some());
    }

    #[test]
    #[should_panic(expected = "ambiguous claim_eq")]
    fn double_consumption_is_fatal() {
        let mut claims = ClaimContext::new();
        claims.apply_eq(42, dummy_param());
        let _ = claims.consume(42);
        let _ = claims.consume(42);
    }

    #[test]
    fn non_eq_drops_everything() {
        let mut claims = ClaimContext::new();
        claims.apply_eq(42, dummy_param());
        claims.apply_non_eq();
        assert!(claims.consume(42).is_none());
    }
}
