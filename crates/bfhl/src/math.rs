//! Arithmetic operations: fibonacci, prime filtering, hcf, and lcm.

use serde::Serialize;

use crate::types::{MathError, MAX_SAFE_INTEGER};

/// One fibonacci term.
///
/// Terms are exact while they fit in a `u64`. Past that the sequence is
/// carried in double precision, which is what JSON consumers read anyway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Term {
    Exact(u64),
    Approx(f64),
}

impl Term {
    pub fn as_f64(self) -> f64 {
        match self {
            Term::Exact(v) => v as f64,
            Term::Approx(v) => v,
        }
    }

    fn add(self, other: Term) -> Term {
        match (self, other) {
            (Term::Exact(a), Term::Exact(b)) => match a.checked_add(b) {
                Some(sum) => Term::Exact(sum),
                None => Term::Approx(a as f64 + b as f64),
            },
            (a, b) => Term::Approx(a.as_f64() + b.as_f64()),
        }
    }
}

/// The first `n` fibonacci terms, starting 0, 1, 1, 2, ...
pub fn fibonacci(n: u32) -> Vec<Term> {
    let n = n as usize;
    let mut seq: Vec<Term> = Vec::with_capacity(n);
    for i in 0..n {
        let term = match i {
            0 => Term::Exact(0),
            1 => Term::Exact(1),
            _ => seq[i - 1].add(seq[i - 2]),
        };
        seq.push(term);
    }
    seq
}

/// Trial division up to the square root. 0 and 1 are not prime.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2u64;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// The primes in `values`, in their original order.
pub fn primes(values: &[u64]) -> Vec<u64> {
    values.iter().copied().filter(|&n| is_prime(n)).collect()
}

/// Euclidean greatest common divisor.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Highest common factor of all values. Empty input yields 0.
pub fn hcf(values: &[u64]) -> u64 {
    values.iter().copied().reduce(gcd).unwrap_or(0)
}

/// Least common multiple of all values, folded left to right.
///
/// Fails once an intermediate result exceeds [`MAX_SAFE_INTEGER`].
/// Empty input yields 0.
pub fn lcm(values: &[u64]) -> Result<u64, MathError> {
    let mut iter = values.iter().copied();
    let Some(first) = iter.next() else {
        return Ok(0);
    };
    iter.try_fold(first, lcm_pair)
}

fn lcm_pair(a: u64, b: u64) -> Result<u64, MathError> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    let product = (a / gcd(a, b)) as u128 * b as u128;
    if product > MAX_SAFE_INTEGER as u128 {
        return Err(MathError::LcmOverflow);
    }
    Ok(product as u64)
}
