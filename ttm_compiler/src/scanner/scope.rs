//! Scope tracking for the scanner
//!
//! Opening brackets push the current scope and enter the most recently
//! declared function; closing brackets pop. The stack is bounded so runaway
//! nesting is reported instead of growing without limit.

use crate::symbols::GLOBAL_SCOPE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFault {
    /// Closing bracket with nothing to close
    Underflow,
    /// Push beyond the depth limit
    TooDeep { max: usize },
}

#[derive(Debug, Clone)]
pub struct ScopeStack {
    current: String,
    saved: Vec<String>,
    max_depth: usize,
    deepest: usize,
}

impl ScopeStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            current: GLOBAL_SCOPE.to_string(),
            saved: Vec::new(),
            max_depth,
            deepest: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Deepest nesting seen so far
    pub fn deepest(&self) -> usize {
        self.deepest
    }

    pub fn is_global(&self) -> bool {
        self.current == GLOBAL_SCOPE
    }

    /// Save the current scope and enter `scope`
    pub fn enter(&mut self, scope: &str) -> Result<(), ScopeFault> {
        if self.saved.len() >= self.max_depth {
            return Err(ScopeFault::TooDeep {
                max: self.max_depth,
            });
        }
        let previous = std::mem::replace(&mut self.current, scope.to_string());
        self.saved.push(previous);
        self.deepest = self.deepest.max(self.saved.len());
        Ok(())
    }

    /// Restore the most recently saved scope
    pub fn exit(&mut self) -> Result<(), ScopeFault> {
        match self.saved.pop() {
            Some(previous) => {
                self.current = previous;
                Ok(())
            }
            None => Err(ScopeFault::Underflow),
        }
    }

    /// A function declaration resets the current scope without touching
    /// the saved levels
    pub fn reset_to_global(&mut self) {
        self.current = GLOBAL_SCOPE.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_and_exit() {
        let mut scopes = ScopeStack::new(4);
        assert!(scopes.is_global());

        scopes.enter("main").unwrap();
        scopes.enter("main").unwrap();
        assert_eq!(scopes.current(), "main");
        assert_eq!(scopes.depth(), 2);

        scopes.exit().unwrap();
        assert_eq!(scopes.current(), "main");
        scopes.exit().unwrap();
        assert!(scopes.is_global());
        assert_eq!(scopes.deepest(), 2);
    }

    #[test]
    fn test_underflow() {
        let mut scopes = ScopeStack::new(4);
        assert_eq!(scopes.exit(), Err(ScopeFault::Underflow));
    }

    #[test]
    fn test_depth_limit() {
        let mut scopes = ScopeStack::new(1);
        scopes.enter("f").unwrap();
        assert_eq!(scopes.enter("f"), Err(ScopeFault::TooDeep { max: 1 }));
        assert_eq!(scopes.current(), "f");
    }
}
