//! BFHL core: operation model, request validation, content guard, and arithmetic.

pub mod guard;
pub mod math;
pub mod types;
pub mod validate;

pub use guard::{ContentGuard, BLOCKED_PATTERNS};
pub use math::{fibonacci, gcd, hcf, is_prime, lcm, primes, Term};
pub use types::*;
pub use validate::{parse_request, validate_argument};
