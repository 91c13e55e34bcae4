// SPDX-License-Identifier: MIT

//! Error type returned by the generator.
use crate::{cipher, entropy};

/// Status code reported for an invalid argument.
pub const INVALID_ARGUMENT: i32 = -2;

/// Status code reported for every other failure.
pub const FAILURE: i32 = -1;

/// Generator failures.
///
/// Invalid arguments are rejected before the generator touches its
/// state or collaborators. Entropy and cipher failures are reported
/// as they happen and are never retried by the generator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was rejected before any work was done.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// The entropy source failed while seeding.
    #[error(transparent)]
    Entropy(#[from] entropy::Error),
    /// The block cipher failed.
    #[error(transparent)]
    Cipher(#[from] cipher::Error),
}

impl Error {
    /// Status code of the error: [`INVALID_ARGUMENT`] for invalid
    /// arguments and [`FAILURE`] for anything else.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => INVALID_ARGUMENT,
            Error::Entropy(_) | Error::Cipher(_) => FAILURE,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}
