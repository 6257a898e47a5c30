//! Core data types: operations, failure policy, response envelope, and errors.

use serde::Serialize;
use serde_json::Value;

/// Largest accepted fibonacci index.
pub const MAX_FIBONACCI_INDEX: i128 = 1000;
/// Largest accepted array length for prime, lcm, and hcf.
pub const MAX_ARRAY_LEN: usize = 1000;
/// Largest accepted array element.
pub const MAX_ELEMENT: i128 = 10_000_000;
/// Largest accepted AI question length, in UTF-16 code units.
pub const MAX_QUESTION_LEN: usize = 500;
/// Largest integer a JSON consumer can represent exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;
/// Answer returned when the AI provider cannot be reached.
pub const AI_FALLBACK: &str = "Unavailable";

/// The five operation names accepted as the single request key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Fibonacci,
    Prime,
    Lcm,
    Hcf,
    Ai,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::Fibonacci,
        OperationKind::Prime,
        OperationKind::Lcm,
        OperationKind::Hcf,
        OperationKind::Ai,
    ];

    /// Resolve a request key. Matching is case-sensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "fibonacci" => Some(OperationKind::Fibonacci),
            "prime" => Some(OperationKind::Prime),
            "lcm" => Some(OperationKind::Lcm),
            "hcf" => Some(OperationKind::Hcf),
            "AI" => Some(OperationKind::Ai),
            _ => None,
        }
    }

    /// The wire name of this operation.
    pub fn key(self) -> &'static str {
        match self {
            OperationKind::Fibonacci => "fibonacci",
            OperationKind::Prime => "prime",
            OperationKind::Lcm => "lcm",
            OperationKind::Hcf => "hcf",
            OperationKind::Ai => "AI",
        }
    }

    /// Short description of the accepted argument, for `info` output.
    pub fn argument_shape(self) -> &'static str {
        match self {
            OperationKind::Fibonacci => "integer in [0, 1000]",
            OperationKind::Prime => "array (length <= 1000) of integers in [0, 10000000]",
            OperationKind::Lcm | OperationKind::Hcf => {
                "array (length 1..=1000) of integers in [1, 10000000]"
            }
            OperationKind::Ai => "string of 1..=500 characters",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A request that passed validation, carrying its typed argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Fibonacci(u32),
    Prime(Vec<u64>),
    Lcm(Vec<u64>),
    Hcf(Vec<u64>),
    Ai(String),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Fibonacci(_) => OperationKind::Fibonacci,
            Operation::Prime(_) => OperationKind::Prime,
            Operation::Lcm(_) => OperationKind::Lcm,
            Operation::Hcf(_) => OperationKind::Hcf,
            Operation::Ai(_) => OperationKind::Ai,
        }
    }

    /// What happens when executing this operation fails.
    pub fn failure_policy(&self) -> FailurePolicy {
        match self {
            Operation::Ai(_) => FailurePolicy::Fallback(AI_FALLBACK),
            Operation::Fibonacci(_)
            | Operation::Prime(_)
            | Operation::Lcm(_)
            | Operation::Hcf(_) => FailurePolicy::Propagate,
        }
    }
}

/// How an operation's execution failure is surfaced to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Substitute this value and still answer 200.
    Fallback(&'static str),
    /// Fail the request with a 500.
    Propagate,
}

impl FailurePolicy {
    /// Resolve an execution result under this policy.
    ///
    /// Returns the value to report as `data`, or the original error when the
    /// policy is [`FailurePolicy::Propagate`].
    pub fn resolve<E: std::fmt::Display>(self, result: Result<Value, E>) -> Result<Value, E> {
        match (self, result) {
            (_, Ok(value)) => Ok(value),
            (FailurePolicy::Fallback(fallback), Err(e)) => {
                tracing::warn!("Operation failed, using fallback {fallback:?}: {e}");
                Ok(Value::String(fallback.to_string()))
            }
            (FailurePolicy::Propagate, Err(e)) => Err(e),
        }
    }
}

/// The fixed-shape JSON response body.
///
/// Exactly one of `data` and `error` is present, chosen by `is_success`.
/// `official_email` is omitted when the operator has not configured one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    pub fn success(official_email: Option<String>, data: Value) -> Self {
        Self {
            is_success: true,
            official_email,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(official_email: Option<String>, error: impl Into<String>) -> Self {
        Self {
            is_success: false,
            official_email,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Body of `GET /health`: success with neither data nor error.
    pub fn health(official_email: Option<String>) -> Self {
        Self {
            is_success: true,
            official_email,
            data: None,
            error: None,
        }
    }
}

/// A request rejected before any operation ran.
///
/// The `Display` text of each variant is part of the public contract.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Invalid JSON format")]
    MalformedJson,

    #[error("Exactly one key required")]
    KeyCount,

    #[error("Invalid key: must be one of fibonacci, prime, lcm, hcf, or AI")]
    UnknownKey,

    #[error("Invalid input: fibonacci requires an integer")]
    FibonacciNotInteger,

    #[error("Invalid input: fibonacci value must be between 0 and 1000")]
    FibonacciOutOfRange,

    #[error("Invalid input: {0} requires an array")]
    NotAnArray(OperationKind),

    #[error("Invalid input: array size must not exceed 1000")]
    ArrayTooLong,

    #[error("Invalid input: array size must be between 1 and 1000")]
    ArrayLength,

    #[error("Invalid input: prime array must contain only non-negative integers")]
    NotNonNegative,

    #[error("Invalid input: {0} array must contain only positive integers")]
    NotPositive(OperationKind),

    #[error("Invalid input: array elements must not exceed 10,000,000")]
    ElementTooLarge,

    #[error("Invalid input: AI requires a string")]
    NotAString,

    #[error("Invalid input: question length must be between 1 and 500 characters")]
    QuestionLength,

    #[error("Invalid input: potentially malicious content detected")]
    BlockedContent,
}

impl Rejection {
    /// HTTP status code for this rejection.
    pub fn status(&self) -> u16 {
        match self {
            Rejection::BlockedContent => 403,
            _ => 400,
        }
    }
}

/// Arithmetic failures. These are never the caller's fault.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("LCM result exceeds safe integer limit")]
    LcmOverflow,
}

/// Errors that can occur in the core library.
#[derive(thiserror::Error, Debug)]
pub enum BfhlError {
    #[error("Invalid guard pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Convenience result type.
pub type BfhlResult<T> = Result<T, BfhlError>;
