use std::{fmt, ops};

/// Comparison operator for sort key and filter clauses.
///
/// ```rust
/// use ddb::common::operator::Operator;
///
/// assert_eq!(Operator::strip_prefix(">=100"), (Operator::GreaterThanOrEqual, "100"));
/// assert_eq!(Operator::strip_prefix("abc"), (Operator::Equal, "abc"));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Operator {
    /// `=`
    #[default]
    Equal,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
}

impl ops::Deref for Operator {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Equal => "=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl Operator {
    /// Matching order: two-character symbols before their one-character prefixes.
    pub const PRIORITY: [Self; 5] = [
        Self::LessThanOrEqual,
        Self::GreaterThanOrEqual,
        Self::LessThan,
        Self::GreaterThan,
        Self::Equal,
    ];

    pub(crate) fn placeholder_suffix(self) -> &'static str {
        match self {
            Self::Equal => "eq",
            Self::LessThan => "lt",
            Self::LessThanOrEqual => "lte",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEqual => "gte",
        }
    }

    /// Split a leading operator off `token`.
    ///
    /// Falls back to [`Operator::Equal`] with the whole token as value when no
    /// operator prefix is present.
    pub fn strip_prefix(token: &str) -> (Self, &str) {
        Self::PRIORITY
            .into_iter()
            .find_map(|operator| {
                token
                    .strip_prefix(&*operator)
                    .map(|value| (operator, value))
            })
            .unwrap_or((Self::Equal, token))
    }

    /// Split `token` around the first occurrence of an operator.
    ///
    /// Operators are tried in [`Operator::PRIORITY`] order and the first one
    /// found anywhere in the token wins, so `a<=5` splits on `<=`.
    pub fn split_once(token: &str) -> Option<(&str, Self, &str)> {
        Self::PRIORITY.into_iter().find_map(|operator| {
            token
                .split_once(&*operator)
                .map(|(before, after)| (before, operator, after))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::default("abc", Operator::Equal, "abc")]
    #[case::equal("=abc", Operator::Equal, "abc")]
    #[case::greater_than(">abc", Operator::GreaterThan, "abc")]
    #[case::greater_than_equal(">=abc", Operator::GreaterThanOrEqual, "abc")]
    #[case::less_than("<abc", Operator::LessThan, "abc")]
    #[case::less_than_equal("<=abc", Operator::LessThanOrEqual, "abc")]
    #[case::longest_first("<=5", Operator::LessThanOrEqual, "5")]
    #[case::operator_only(">", Operator::GreaterThan, "")]
    #[case::empty("", Operator::Equal, "")]
    #[case::not_leading("a<b", Operator::Equal, "a<b")]
    fn test_strip_prefix(
        #[case] token: &str,
        #[case] operator: Operator,
        #[case] value: &str,
    ) {
        assert_eq!(Operator::strip_prefix(token), (operator, value));
    }

    #[rstest]
    #[case::equal("status=active", Some(("status", Operator::Equal, "active")))]
    #[case::less_than_equal("field<=5", Some(("field", Operator::LessThanOrEqual, "5")))]
    #[case::greater_than_equal("age>=21", Some(("age", Operator::GreaterThanOrEqual, "21")))]
    #[case::less_than("age<21", Some(("age", Operator::LessThan, "21")))]
    #[case::greater_than("age>21", Some(("age", Operator::GreaterThan, "21")))]
    #[case::priority_over_position("a=b<c", Some(("a=b", Operator::LessThan, "c")))]
    #[case::empty_value("name=", Some(("name", Operator::Equal, "")))]
    #[case::no_operator("status", None)]
    fn test_split_once(
        #[case] token: &str,
        #[case] expected: Option<(&str, Operator, &str)>,
    ) {
        assert_eq!(Operator::split_once(token), expected);
    }

    #[rstest]
    #[case::equal(Operator::Equal, "=", "eq")]
    #[case::less_than(Operator::LessThan, "<", "lt")]
    #[case::less_than_equal(Operator::LessThanOrEqual, "<=", "lte")]
    #[case::greater_than(Operator::GreaterThan, ">", "gt")]
    #[case::greater_than_equal(Operator::GreaterThanOrEqual, ">=", "gte")]
    fn test_symbols(#[case] operator: Operator, #[case] symbol: &str, #[case] suffix: &str) {
        assert_eq!(&*operator, symbol);
        assert_eq!(operator.placeholder_suffix(), suffix);
    }
}
