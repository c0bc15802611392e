use std::cmp::Ordering;
use std::str::FromStr;

use crate::Version;

#[cfg(test)]
use proptest_derive::Arbitrary;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown comparison operator: {symbol}")]
pub struct UnknownOperatorError {
    pub symbol: String,
}

/// A single relational operator over two versions.
///
/// `Equal` and `NotEqual` compare the canonical strings, so `1.0` and
/// `1.0.0` are *not* `=` even though they order as equivalent; callers that
/// want segment-wise equivalence use `==` on [`Version`] instead. The
/// ordering operators go through [`Version::cmp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

impl ComparisonOperator {
    pub fn matches(&self, lhs: &Version, rhs: &Version) -> bool {
        match self {
            Self::Equal => lhs.canonical() == rhs.canonical(),
            Self::NotEqual => lhs.canonical() != rhs.canonical(),
            Self::Greater => lhs.cmp(rhs) == Ordering::Greater,
            Self::GreaterEqual => lhs.cmp(rhs) != Ordering::Less,
            Self::Less => Self::Greater.matches(rhs, lhs),
            Self::LessEqual => Self::GreaterEqual.matches(rhs, lhs),
        }
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "!="),
            Self::Greater => write!(f, ">"),
            Self::GreaterEqual => write!(f, ">="),
            Self::Less => write!(f, "<"),
            Self::LessEqual => write!(f, "<="),
        }
    }
}

impl FromStr for ComparisonOperator {
    type Err = UnknownOperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            ">" => Ok(Self::Greater),
            ">=" => Ok(Self::GreaterEqual),
            "<" => Ok(Self::Less),
            "<=" => Ok(Self::LessEqual),
            _ => Err(UnknownOperatorError {
                symbol: s.to_string(),
            }),
        }
    }
}

/// Dispatches on a symbolic operator token. An unrecognized symbol yields
/// `false`; callers that want a typed error parse a [`ComparisonOperator`]
/// themselves.
pub fn compare_by_symbol(lhs: &Version, rhs: &Version, symbol: &str) -> bool {
    symbol
        .parse::<ComparisonOperator>()
        .is_ok_and(|op| op.matches(lhs, rhs))
}

/// True iff `lower <= value <= upper`, inclusive on both ends.
pub fn between(value: &Version, lower: &Version, upper: &Version) -> bool {
    ComparisonOperator::GreaterEqual.matches(value, lower)
        && ComparisonOperator::GreaterEqual.matches(upper, value)
}
