// Defines a trait for time-like objects and provides several implementations
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use core::any::Any;
use core::fmt::Debug;
use core::ops::Add;
use core::time::Duration;

/// A trait for time-like objects that can be used to measure elapsed time.
///
/// The simulator measures everything against instants of this type: the
/// physics and control cadences, button hold durations, and the autotune
/// session timeout. Injecting the instant type keeps the whole simulation
/// deterministic under test; hosts running off a real clock plug in
/// [`StdInstant`] instead.
pub trait InstantLike:
    Sized
    + Add<Duration, Output = Self>
    + Clone
    + Copy
    + Debug
    + PartialEq<Self>
    + Send
    + Sync
    + Unpin
    + Any
{
    /// Returns the amount of time elapsed from another instant to this one,
    /// saturating to zero if `earlier` is actually later.
    #[must_use]
    fn duration_since(&self, earlier: Self) -> Duration;
}

/// A wrapper around an unsigned 64-bit integer representing milliseconds
/// since an arbitrary epoch. The natural choice for host-driven tick loops
/// and deterministic tests.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Millis(pub u64);

impl InstantLike for Millis {
    fn duration_since(&self, earlier: Self) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Millis {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Millis(self.0 + rhs.as_millis() as u64)
    }
}

/// A convenient wrapper around `std::time::Instant` satisfying the
/// [`InstantLike`] trait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StdInstant(pub std::time::Instant);

impl StdInstant {
    /// Captures the current wall-clock instant.
    pub fn now() -> Self {
        StdInstant(std::time::Instant::now())
    }
}

impl InstantLike for StdInstant {
    fn duration_since(&self, earlier: Self) -> Duration {
        self.0.saturating_duration_since(earlier.0)
    }
}

impl Add<Duration> for StdInstant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        StdInstant(self.0 + rhs)
    }
}

/// Reversed operands must saturate rather than panic; hold-duration checks
/// may race a button release by one poll tick.
#[cfg(test)]
#[test]
fn test_millis_duration_since_saturates() {
    assert_eq!(Millis(5).duration_since(Millis(10)), Duration::ZERO);
    assert_eq!(
        Millis(1500).duration_since(Millis(500)),
        Duration::from_secs(1)
    );
}
