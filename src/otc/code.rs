//! Login-code generation policy and injectable time/randomness seams

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::constants::CODE_LENGTH;

/// Wall-clock source for expiry comparison
///
/// Injected so tests can pin and advance time; production uses [`SystemClock`].
pub trait Clock: Send + Sync {
    /// Current time in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of fresh login codes
///
/// Injected so tests can supply deterministic sequences and assert
/// exact-length, digits-only output.
pub trait CodeGenerator: Send + Sync {
    /// Produce one new code
    fn generate(&self) -> String;
}

/// Uniformly random decimal digits, left-zero-padded to [`CODE_LENGTH`]
///
/// No uniqueness check across records: two users may briefly hold the same
/// code. With a 10^4 space and a 2-minute window that is an accepted risk,
/// and a collision never routes one user's code to another because codes are
/// only ever read back through the owning record.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..CODE_LENGTH)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect()
    }
}
