//
// Copyright (c) 2023 Daniel Ottavio
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE
//
//! A module to facilitate the CTR_DRBG algorithm.
//!
//! The CTR_DRBG algorithm is implemented via the [`CtrDrbg`]
//! type. This type may be instantiated using the builder class
//! [`CtrBuilder`].
//!
//! The generator runs without a derivation function: seed material
//! is exactly `key length + block length` (48) bytes drawn from the
//! entropy source and fed straight into the update step.
//!
use crate::{
    cipher::{Block, BlockCipher, BLOCK_SIZE},
    entropy::Entropy,
    error::Error,
};

use core::{fmt, iter::zip};
use log::{debug, trace, warn};
use zeroize::Zeroize;

#[cfg(feature = "rand_core")]
use rand_core::{TryCryptoRng, TryRngCore};

/// Length of the cipher key held by the generator.
pub const KEY_SIZE: usize = 32;

/// Length of the seed material drawn on every reseed.
pub const SEED_SIZE: usize = KEY_SIZE + BLOCK_SIZE;

/// Largest request served by [`CtrDrbg::get_random`].
pub const MAX_BYTES_PER_REQUEST: usize = 1 << 16;

/// Largest number of requests served between two reseeds.
pub const MAX_RESEED_INTERVAL: u64 = 1 << 48;

type Key = [u8; KEY_SIZE];
type SeedData = [u8; SEED_SIZE];

/// Implementation of CTR_DRBG with a 256-bit key and no derivation
/// function as outlined by [SP 800-90A
/// Rev. 1](https://csrc.nist.gov/publications/detail/sp/800-90a/rev-1/final).
/// Instantiation of this type is performed using the builder class
/// [`CtrBuilder`].
///
/// The generator seeds itself on first use. It reseeds automatically
/// once the reseed interval has been met and refreshes its key and
/// counter block after every request.
///
/// # Example
///
/// ```
/// use ctr_drbg_core::{cipher::SoftAes, ctr::CtrBuilder, entropy::OsEntropy};
///
/// # use ctr_drbg_core::Error;
/// #
/// # fn main() -> Result<(), Error> {
/// #
/// // Build a new instance
/// let mut drbg = CtrBuilder::new(OsEntropy::default(), SoftAes::default()).build();
///
/// // Optionally seed it up front
/// drbg.init()?;
///
/// // Generate random data
/// let mut random_data = [0u8; 32];
/// drbg.get_random(Some(&mut random_data[..]), 32)?;
/// #
/// # Ok(())
/// # }
/// ```
pub struct CtrDrbg<E, C> {
    key: Key,
    v_blk: Block,
    reseed_ctr: u64,
    reseed_itr: u64,
    initialized: bool,
    entropy: E,
    cipher: C,
}

/// Builder class for allocating `CtrDrbg` instances.
///
/// Building never touches the entropy source or the cipher. The
/// instance is seeded by [`CtrDrbg::init`] or by its first request.
///
/// # Example
/// ```
/// use ctr_drbg_core::{cipher::SoftAes, ctr::CtrBuilder, entropy::OsEntropy};
///
/// let drbg = CtrBuilder::new(OsEntropy::default(), SoftAes::default())
///     .reseed_interval(1 << 14)
///     .build();
/// assert!(!drbg.is_initialized());
/// ```
#[derive(Debug)]
pub struct CtrBuilder<E, C> {
    reseed_itr: u64,
    entropy: E,
    cipher: C,
}

/// Increment a slice of bytes by 1 in big-endian order.
fn inc_bytes(block: &mut [u8]) {
    for bit in block.iter_mut().rev() {
        if *bit == 0xff {
            *bit = 0;
        } else {
            *bit += 1;
            break;
        }
    }
}

fn xor_bytes(dst: &mut [u8], src: &[u8]) {
    for (i, j) in zip(dst, src) {
        *i ^= *j
    }
}

/// Fill `buf` with the encryption of successive values of `v_blk`.
///
/// `v_blk` is incremented before every block. A trailing partial
/// chunk takes the head of a fresh block and the rest is dropped.
fn ctr_blocks<C>(cipher: &mut C, key: &Key, v_blk: &mut Block, buf: &mut [u8]) -> Result<(), Error>
where
    C: BlockCipher,
{
    let mut tmp_blk = Block::default();
    let res = buf
        .chunks_mut(BLOCK_SIZE)
        .try_for_each(|blk| -> Result<(), Error> {
            inc_bytes(&mut v_blk[..]);
            cipher.encrypt_block(key, &*v_blk, &mut tmp_blk)?;
            blk.copy_from_slice(&tmp_blk[..blk.len()]);
            Ok(())
        });
    tmp_blk.zeroize();
    res
}

impl<E, C> CtrBuilder<E, C>
where
    E: Entropy,
    C: BlockCipher,
{
    pub fn new(entropy: E, cipher: C) -> Self {
        Self {
            reseed_itr: MAX_RESEED_INTERVAL,
            entropy,
            cipher,
        }
    }

    /// Specify the reseed interval for the CTR_DRBG instance.
    ///
    /// This interval bounds the reseed counter. The counter is 1 right
    /// after a reseed and grows by one per request, so an instance
    /// serves `reseed_itr - 1` requests from each seed before new
    /// entropy is drawn. This happens automatically. Lowering this
    /// value increases security at the cost of more frequent calls to
    /// the entropy source.
    ///
    /// By default, this value is 2^48.
    ///
    /// # Panics
    ///
    /// The reseed interval cannot exceed 2^48. This function panics
    /// if the max threshold is exceeded.
    pub fn reseed_interval(mut self, reseed_itr: u64) -> CtrBuilder<E, C> {
        if reseed_itr > MAX_RESEED_INTERVAL {
            panic!("CtrDrbg: reseed interval exceeds max interval")
        }
        self.reseed_itr = reseed_itr;
        self
    }

    /// Build and return a new, unseeded [`CtrDrbg`] instance.
    pub fn build(self) -> CtrDrbg<E, C> {
        CtrDrbg {
            key: Key::default(),
            v_blk: Block::default(),
            reseed_ctr: 0,
            reseed_itr: self.reseed_itr,
            initialized: false,
            entropy: self.entropy,
            cipher: self.cipher,
        }
    }
}

impl<E, C> Drop for CtrDrbg<E, C> {
    fn drop(&mut self) {
        self.key.zeroize();
        self.v_blk.zeroize();
    }
}

impl<E, C> fmt::Debug for CtrDrbg<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CtrDrbg")
            .field("reseed_ctr", &self.reseed_ctr)
            .field("reseed_itr", &self.reseed_itr)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl<E, C> CtrDrbg<E, C>
where
    E: Entropy,
    C: BlockCipher,
{
    /// Seed the instance with 48 bytes of new entropy.
    ///
    /// Calling this is optional, the first request seeds an unseeded
    /// instance. It lets the caller pay the cost of seeding at a
    /// convenient time. Calling it again discards the current state
    /// and seeds from scratch.
    ///
    /// # Error
    ///
    /// Returns an error when the entropy source or the cipher
    /// fails. The instance is left unseeded in that case.
    pub fn init(&mut self) -> Result<(), Error> {
        self.key.zeroize();
        self.v_blk.zeroize();
        self.reseed_ctr = 0;
        self.initialized = false;

        self.reseed_state()?;
        self.initialized = true;
        debug!("ctr_drbg instantiated");
        Ok(())
    }

    /// Write `size` bytes of random data to the head of `bytes`.
    ///
    /// `size` may not exceed [`MAX_BYTES_PER_REQUEST`]. `bytes` may
    /// only be `None` when `size` is 0. A zero sized request still
    /// seeds, reseeds and refreshes the state like any other.
    ///
    /// This function automatically seeds `self` on first use and
    /// reseeds it once the reseed interval has been met.
    ///
    /// # Error
    ///
    /// Returns [`Error::InvalidArgument`] without touching the state
    /// when the arguments are rejected. Any other error means the
    /// entropy source or the cipher failed; the content of `bytes` is
    /// then unspecified and must not be used.
    pub fn get_random(&mut self, bytes: Option<&mut [u8]>, size: usize) -> Result<(), Error> {
        if size > MAX_BYTES_PER_REQUEST {
            return Err(Error::InvalidArgument("size exceeds max bytes per request"));
        }
        let bytes: &mut [u8] = match bytes {
            Some(buf) if buf.len() < size => {
                return Err(Error::InvalidArgument("output buffer is shorter than size"))
            }
            Some(buf) => &mut buf[..size],
            None if size > 0 => return Err(Error::InvalidArgument("missing output buffer")),
            None => &mut [],
        };

        self.generate(bytes)
            .inspect_err(|e| warn!("ctr_drbg request of {} bytes failed: {}", size, e))
    }

    /// Fill the slice `bytes` with random data.
    ///
    /// There is no limit to the length of `bytes`. The slice is
    /// passed to [`get_random`](Self::get_random) in chunks no larger
    /// than [`MAX_BYTES_PER_REQUEST`]. An empty slice is a no-op.
    ///
    /// # Error
    ///
    /// See [`get_random`](Self::get_random).
    pub fn fill_bytes(&mut self, bytes: &mut [u8]) -> Result<(), Error> {
        for blk in bytes.chunks_mut(MAX_BYTES_PER_REQUEST) {
            let size = blk.len();
            self.get_random(Some(blk), size)?;
        }
        Ok(())
    }

    /// Reseed with 48 bytes of new entropy. An unseeded instance is
    /// seeded as by [`init`](Self::init).
    ///
    /// # Error
    ///
    /// Returns an error when the entropy source or the cipher
    /// fails. The previous state is kept in that case.
    pub fn reseed(&mut self) -> Result<(), Error> {
        if !self.initialized {
            return self.init();
        }
        self.reseed_state()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of requests served since the last reseed, plus one.
    pub fn reseed_counter(&self) -> u64 {
        self.reseed_ctr
    }

    fn reseed_state(&mut self) -> Result<(), Error> {
        let mut seed: SeedData = [0u8; SEED_SIZE];
        let res = self
            .entropy
            .fill_bytes(&mut seed)
            .map_err(Error::from)
            .and_then(|()| self.update(Some(&seed)));
        seed.zeroize();
        res?;

        self.reseed_ctr = 1;
        Ok(())
    }

    fn generate(&mut self, bytes: &mut [u8]) -> Result<(), Error> {
        if !self.initialized {
            self.init()?;
        }
        if self.reseed_ctr >= self.reseed_itr {
            debug!("ctr_drbg reseed interval reached, reseeding");
            self.reseed_state()?;
        }
        trace!("ctr_drbg generating {} bytes", bytes.len());

        ctr_blocks(&mut self.cipher, &self.key, &mut self.v_blk, bytes)?;
        self.update(None)?;
        self.reseed_ctr += 1;
        Ok(())
    }

    /// Replace key and counter block with the next 48 bytes of cipher
    /// output, folded with `data` when present. Nothing is committed
    /// unless every cipher call succeeds.
    fn update(&mut self, data: Option<&SeedData>) -> Result<(), Error> {
        let mut v_blk = self.v_blk;
        let mut tmp_buf: SeedData = [0u8; SEED_SIZE];
        let res = ctr_blocks(&mut self.cipher, &self.key, &mut v_blk, &mut tmp_buf);
        if res.is_ok() {
            if let Some(data) = data {
                xor_bytes(&mut tmp_buf, data);
            }
            self.key.copy_from_slice(&tmp_buf[..KEY_SIZE]);
            self.v_blk.copy_from_slice(&tmp_buf[KEY_SIZE..]);
        }
        tmp_buf.zeroize();
        v_blk.zeroize();
        res
    }
}

#[cfg(feature = "rand_core")]
#[cfg_attr(docsrs, doc(cfg(feature = "rand_core")))]
impl<E, C> TryCryptoRng for CtrDrbg<E, C>
where
    E: Entropy,
    C: BlockCipher,
{
}

#[cfg(feature = "rand_core")]
#[cfg_attr(docsrs, doc(cfg(feature = "rand_core")))]
impl<E, C> TryRngCore for CtrDrbg<E, C>
where
    E: Entropy,
    C: BlockCipher,
{
    type Error = Error;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    fn try_fill_bytes(&mut self, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.fill_bytes(bytes)
    }
}
