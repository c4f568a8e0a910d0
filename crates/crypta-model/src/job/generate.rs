use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Shape of the generated cryptarithms.
///
/// Parsed leniently: unknown symbols fall back to [`GenerateOp::Add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GenerateOp {
    /// `a + b + ... = c`
    #[default]
    Add,
    /// `a * b * ... = c`
    Mul,
    /// Long multiplication.
    Lmul,
    /// Crossword-style grid of additions.
    Cross,
}

impl GenerateOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerateOp::Add => "ADD",
            GenerateOp::Mul => "MUL",
            GenerateOp::Lmul => "LMUL",
            GenerateOp::Cross => "CROSS",
        }
    }

    pub fn parse_lenient(symbol: &str) -> Self {
        match symbol.trim().to_ascii_uppercase().as_str() {
            "*" | "MUL" => GenerateOp::Mul,
            "LMUL" => GenerateOp::Lmul,
            "CROSS" => GenerateOp::Cross,
            _ => GenerateOp::Add,
        }
    }
}

impl From<String> for GenerateOp {
    fn from(value: String) -> Self {
        GenerateOp::parse_lenient(&value)
    }
}

impl From<GenerateOp> for String {
    fn from(value: GenerateOp) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for GenerateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraint on the right-hand member of generated equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RightMemberType {
    /// No constraint.
    Free,
    /// Right member differs from every left member.
    #[default]
    Unique,
    /// Right member is fixed.
    Fixed,
}

impl RightMemberType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RightMemberType::Free => "FREE",
            RightMemberType::Unique => "UNIQUE",
            RightMemberType::Fixed => "FIXED",
        }
    }
}

impl From<String> for RightMemberType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "FREE" => RightMemberType::Free,
            "FIXED" => RightMemberType::Fixed,
            _ => RightMemberType::Unique,
        }
    }
}

impl From<RightMemberType> for String {
    fn from(value: RightMemberType) -> Self {
        value.as_str().to_string()
    }
}

/// Parameters of a generate job.
///
/// Words come either from an explicit list or, in "doubly-true" mode,
/// from number names in a language between two bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateSpec {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<String>,
    #[serde(alias = "operatorSymbol")]
    pub operator: GenerateOp,
    /// Maximum number of generated cryptarithms; `0` means unlimited.
    pub solution_limit: u32,
    /// Generation time limit in seconds, enforced by the engine.
    #[serde(alias = "timeLimit")]
    pub time_limit_secs: u32,
    pub shuffle: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<u32>,
    /// Enumerate candidates without solving them.
    pub dry_run: bool,
    #[serde(alias = "rightMemberType")]
    pub right_member: RightMemberType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_words: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_words: Option<u32>,
    pub light_propagation: bool,
    pub threads: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_grid_size: Option<u32>,
    pub allow_leading_zeros: bool,
}

impl GenerateSpec {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// `true` when all four doubly-true fields are present.
    pub fn is_doubly_true(&self) -> bool {
        self.country_code.is_some()
            && self.lang_code.is_some()
            && self.lower_bound.is_some()
            && self.upper_bound.is_some()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.is_doubly_true() && self.words.iter().all(|w| w.trim().is_empty()) {
            return Err(ModelError::MissingWordSource);
        }
        if let (Some(lower), Some(upper)) = (self.lower_bound, self.upper_bound)
            && lower > upper
        {
            return Err(ModelError::InvalidRange {
                field: "bound",
                lower,
                upper,
            });
        }
        if let (Some(lower), Some(upper)) = (self.min_words, self.max_words)
            && lower > upper
        {
            return Err(ModelError::InvalidRange {
                field: "words",
                lower,
                upper,
            });
        }
        Ok(())
    }
}

impl Default for GenerateSpec {
    fn default() -> Self {
        Self {
            words: Vec::new(),
            operator: GenerateOp::Add,
            solution_limit: 1,
            time_limit_secs: 60,
            shuffle: false,
            country_code: None,
            lang_code: None,
            lower_bound: None,
            upper_bound: None,
            dry_run: false,
            right_member: RightMemberType::Unique,
            min_words: None,
            max_words: None,
            light_propagation: false,
            threads: 1,
            cross_grid_size: None,
            allow_leading_zeros: false,
        }
    }
}
