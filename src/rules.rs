//! Ordered threshold rules
//!
//! Each sub-scorer expresses its ladder as a table of `(condition, value)`
//! pairs. Tables are evaluated top to bottom and the first matching row wins,
//! so overlapping bands resolve by position, not by width.

/// A single row: when `condition` holds, the table yields `value`
#[derive(Debug, Clone, Copy)]
pub struct Rule<I, O> {
    pub condition: fn(I) -> bool,
    pub value: O,
}

/// An ordered rule list with a value for inputs no row matches
#[derive(Debug, Clone, Copy)]
pub struct RuleTable<I: 'static, O: 'static> {
    pub rules: &'static [Rule<I, O>],
    pub otherwise: O,
}

impl<I: Copy, O: Copy> RuleTable<I, O> {
    /// Value of the first rule whose condition holds for `input`
    pub fn evaluate(&self, input: I) -> O {
        first_match(self.rules, input).unwrap_or(self.otherwise)
    }
}

/// Value of the first rule matching `input`, if any
pub fn first_match<I: Copy, O: Copy>(rules: &[Rule<I, O>], input: I) -> Option<O> {
    rules
        .iter()
        .find(|rule| (rule.condition)(input))
        .map(|rule| rule.value)
}
