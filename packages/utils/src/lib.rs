//! A collection of utilities shared across the ibc-trust workspace.

#![deny(clippy::nursery, clippy::pedantic, warnings, missing_docs)]

/// Ensure that a condition is true, otherwise return an error.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}
