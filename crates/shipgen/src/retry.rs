//! Bounded resampling.

/// Outcome of a bounded retry loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt<T, E> {
    /// First draw was accepted.
    Succeeded(T),
    /// Accepted after `retries` rejected draws.
    Resampled { value: T, retries: u32 },
    /// Every draw was rejected; `last` is the final rejection.
    Abandoned { retries: u32, last: E },
}

impl<T, E> Attempt<T, E> {
    pub fn retries(&self) -> u32 {
        match self {
            Attempt::Succeeded(_) => 0,
            Attempt::Resampled { retries, .. } | Attempt::Abandoned { retries, .. } => *retries,
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Attempt::Succeeded(value) | Attempt::Resampled { value, .. } => Some(value),
            Attempt::Abandoned { .. } => None,
        }
    }
}

/// Call `draw` until it succeeds, at most `1 + budget` times. The closure
/// receives the attempt number and must redraw its random parameters each
/// call.
pub fn with_retries<T, E>(budget: u32, mut draw: impl FnMut(u32) -> Result<T, E>) -> Attempt<T, E> {
    let mut attempt = 0;
    loop {
        match draw(attempt) {
            Ok(value) if attempt == 0 => return Attempt::Succeeded(value),
            Ok(value) => {
                return Attempt::Resampled {
                    value,
                    retries: attempt,
                }
            }
            Err(last) if attempt >= budget => {
                return Attempt::Abandoned {
                    retries: attempt,
                    last,
                }
            }
            Err(_) => attempt += 1,
        }
    }
}
