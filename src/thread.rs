// SPDX-License-Identifier: MIT

//! A thread-local interface for the CTR_DRBG algorithm.
use crate::{
    cipher::SoftAes,
    ctr::{CtrBuilder, CtrDrbg},
    entropy::OsEntropy,
    error::Error,
};

use std::{cell::RefCell, rc::Rc, thread_local};

#[cfg(feature = "rand_core")]
use rand_core::{TryCryptoRng, TryRngCore};

type LocalDrbg = CtrDrbg<OsEntropy, SoftAes>;

/// A thread-local instance of CTR_DRBG.
///
/// A call to [`LocalCtrDrbg::default()`] returns a handle to a
/// pre-allocated thread-local instance. Each instance is
/// automatically configured with the following configuration:
///
/// - [`OsEntropy`] as entropy source.
///
/// - [`SoftAes`] as block cipher.
///
/// - Reseed interval of 2^14.
///
/// The instance is seeded by its first request.
///
/// # Example
///
/// ```
/// # use ctr_drbg_core::Error;
/// use ctr_drbg_core::thread::LocalCtrDrbg;
///
/// # fn main() -> Result<(),Error> {
/// let drbg = LocalCtrDrbg::default();
/// let mut random_data = [0u8; 32];
/// drbg.fill_bytes(&mut random_data)?;
/// # Ok(())
/// # }
/// ```
pub struct LocalCtrDrbg {
    rng: Rc<RefCell<LocalDrbg>>,
}

const RESEED_INTERVAL: u64 = 1 << 14;

thread_local!(
    static LOCAL_RNG: Rc<RefCell<LocalDrbg>> = {
        let drbg = CtrBuilder::new(OsEntropy::default(), SoftAes::default())
            .reseed_interval(RESEED_INTERVAL)
            .build();

        Rc::new(RefCell::new(drbg))
    }
);

impl Default for LocalCtrDrbg {
    fn default() -> Self {
        Self {
            rng: LOCAL_RNG.with(|v| v.clone()),
        }
    }
}

impl LocalCtrDrbg {
    /// See [`init`](crate::ctr::CtrDrbg::init) for details.
    pub fn init(&self) -> Result<(), Error> {
        self.rng.borrow_mut().init()
    }

    /// See [`get_random`](crate::ctr::CtrDrbg::get_random) for details.
    pub fn get_random(&self, bytes: Option<&mut [u8]>, size: usize) -> Result<(), Error> {
        self.rng.borrow_mut().get_random(bytes, size)
    }

    /// See [`fill_bytes`](crate::ctr::CtrDrbg::fill_bytes) for details.
    pub fn fill_bytes(&self, bytes: &mut [u8]) -> Result<(), Error> {
        self.rng.borrow_mut().fill_bytes(bytes)
    }

    /// See [`reseed`](crate::ctr::CtrDrbg::reseed) for details.
    pub fn reseed(&self) -> Result<(), Error> {
        self.rng.borrow_mut().reseed()
    }
}

#[cfg(feature = "rand_core")]
#[cfg_attr(docsrs, doc(cfg(feature = "rand_core")))]
impl TryCryptoRng for LocalCtrDrbg where LocalCtrDrbg: TryRngCore {}

#[cfg(feature = "rand_core")]
#[cfg_attr(docsrs, doc(cfg(feature = "rand_core")))]
impl TryRngCore for LocalCtrDrbg {
    type Error = Error;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        self.rng.borrow_mut().try_next_u32()
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        self.rng.borrow_mut().try_next_u64()
    }

    fn try_fill_bytes(&mut self, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.rng.borrow_mut().try_fill_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::Error, thread::LocalCtrDrbg};
    use std::{thread, vec::Vec};

    #[test]
    fn single_thread() -> Result<(), Error> {
        let rng = LocalCtrDrbg::default();
        let mut buf = [0u8; 8];
        rng.fill_bytes(&mut buf)?;
        assert_ne!([0u8; 8], buf);
        Ok(())
    }

    #[test]
    fn handles_share_instance() -> Result<(), Error> {
        let a = LocalCtrDrbg::default();
        let b = LocalCtrDrbg::default();
        a.init()?;
        let before = b.rng.borrow().reseed_counter();
        let mut buf = [0u8; 16];
        a.get_random(Some(&mut buf[..]), 16)?;
        assert_eq!(before + 1, b.rng.borrow().reseed_counter());
        b.reseed()?;
        assert_eq!(1, a.rng.borrow().reseed_counter());
        Ok(())
    }

    #[test]
    fn invalid_request_is_reported() {
        let rng = LocalCtrDrbg::default();
        let err = rng.get_random(None, 4).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn multi_thread() {
        let num_threads = 32;
        let mut handles = Vec::with_capacity(num_threads);
        for _ in 0..num_threads {
            let h = thread::spawn(move || {
                let rng = LocalCtrDrbg::default();
                let mut buf = [0u8; 8];
                rng.fill_bytes(&mut buf).unwrap();
                assert_ne!([0u8; 8], buf);
            });
            handles.push(h)
        }
        for h in handles {
            h.join().unwrap();
        }
    }
}
