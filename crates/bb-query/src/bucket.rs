//! Clause families, combination modes and the per-family clause buckets.

use std::{fmt, str};

use serde::{Deserialize, Serialize};

use crate::clause::Clause;

/// Which evaluation context a clause participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Non-scoring context.
    Filter,
    /// Scoring context.
    #[default]
    Query,
}

impl Family {
    /// Both families, in the order the assembler processes them.
    pub const ALL: [Self; 2] = [Self::Filter, Self::Query];
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter => write!(f, "filter"),
            Self::Query => write!(f, "query"),
        }
    }
}

/// How a clause relates to its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every clause must match.
    #[default]
    And,
    /// At least one clause should match.
    Or,
    /// No clause may match.
    Not,
}

impl Mode {
    /// All modes, in bucket order.
    pub const ALL: [Self; 3] = [Self::And, Self::Or, Self::Not];

    /// Returns the bool-clause key this mode is written under.
    ///
    /// In simple-filter mode an AND filter lands on the bare `filter` key. OR and NOT keep
    /// their usual keys in either mapping.
    pub fn bool_key(self, simple_filter: bool) -> &'static str {
        match self {
            Self::And if simple_filter => "filter",
            Self::And => "must",
            Self::Or => "should",
            Self::Not => "must_not",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
            Self::Not => write!(f, "not"),
        }
    }
}

impl str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "and" | "must" => Ok(Self::And),
            "or" | "should" => Ok(Self::Or),
            "not" | "must_not" => Ok(Self::Not),
            _ => Err(format!("unknown mode '{s}', expected one of: and, or, not")),
        }
    }
}

/// The three ordered clause sequences of one family.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    /// AND-mode clauses.
    and: Vec<Clause>,
    /// OR-mode clauses.
    or: Vec<Clause>,
    /// NOT-mode clauses.
    not: Vec<Clause>,
}

impl Buckets {
    /// Returns the clauses of one mode, in insertion order.
    pub fn get(&self, mode: Mode) -> &[Clause] {
        match mode {
            Mode::And => &self.and,
            Mode::Or => &self.or,
            Mode::Not => &self.not,
        }
    }

    /// Appends a clause to the given mode.
    pub fn push(&mut self, mode: Mode, clause: Clause) {
        match mode {
            Mode::And => self.and.push(clause),
            Mode::Or => self.or.push(clause),
            Mode::Not => self.not.push(clause),
        }
    }

    /// Iterates over every mode with its clauses, in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (Mode, &[Clause])> {
        Mode::ALL.into_iter().map(|mode| (mode, self.get(mode)))
    }

    /// Returns true if any clause is present, optionally restricted to one mode.
    pub fn any(&self, mode: Option<Mode>) -> bool {
        match mode {
            Some(mode) => !self.get(mode).is_empty(),
            None => self.iter().any(|(_, clauses)| !clauses.is_empty()),
        }
    }

    /// True when exactly one AND clause exists and the other modes are empty.
    pub fn only_one_and(&self) -> bool {
        self.and.len() == 1 && self.or.is_empty() && self.not.is_empty()
    }

    /// True when any clause in any mode carries a nested composer.
    pub fn any_nested(&self) -> bool {
        self.iter()
            .flat_map(|(_, clauses)| clauses)
            .any(Clause::is_nested)
    }

    /// Removes every clause.
    pub fn clear(&mut self) {
        self.and.clear();
        self.or.clear();
        self.not.clear();
    }
}
