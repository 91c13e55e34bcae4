// SPDX-License-Identifier: MIT

//! An implementation of the crypographic random number generator
//! CTR_DRBG as defined by NIST [SP 800-90A
//! Rev. 1](https://csrc.nist.gov/publications/detail/sp/800-90a/rev-1/final).
//!
//! The generator keeps a 256-bit key and a 128-bit counter block. It
//! draws seed material from an [`Entropy`](entropy::Entropy) source
//! and drives a [`BlockCipher`](cipher::BlockCipher) in single block
//! ECB mode. Both are supplied by the caller, so hardware engines and
//! test doubles plug in the same way as the bundled
//! [`OsEntropy`](entropy::OsEntropy) and [`SoftAes`](cipher::SoftAes).
//!
//! # Quick Example
//!
//! A simple way to obtain crypographic random random data is to use
//! the
//! [`LocalCtrDrbg::default()`](crate::thread::LocalCtrDrbg::default())
//! function. This returns a handle to a thread-local instance of
//! [`CtrDrbg`](ctr::CtrDrbg) pre-allocated to use entropy supplied by
//! the OS. The `std` feature is required for this approach.
//!
//! ```
//! # #[cfg(feature = "std")]
//! use ctr_drbg_core::thread::LocalCtrDrbg;
//!
//! # use ctr_drbg_core::Error;
//! #
//! # fn main() -> Result<(),Error> {
//! #
//! # #[cfg(feature = "std")]
//! let drbg = LocalCtrDrbg::default();
//! let mut random_data = [0u8; 32];
//! # #[cfg(feature = "std")]
//! drbg.fill_bytes(&mut random_data)?;
//! #
//! # Ok(())
//! # }
//! ```
//!
//! Otherwise an instance may be constructed by hand using the
//! [`CtrBuilder`](ctr::CtrBuilder) class. This approach doesn't
//! require the `std` feature. It also allows the caller to choose the
//! entropy source, the cipher and the reseed interval.
//!
//! An instance is not thread safe and not reentrant. Each instance
//! owns its state and collaborators exclusively.
//!
#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod cipher;
pub mod ctr;
pub mod entropy;
pub mod error;

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod thread;

pub use error::Error;
