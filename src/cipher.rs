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
//! Traits and types for single block encryption.
//!
//! The generator drives its block cipher through
//! [`BlockCipher::encrypt_block`], one 128-bit block at a time, in
//! ECB mode. [`SoftAes`] is a software implementation backed by the
//! [`aes`] crate. Hardware engines implement the trait themselves.
use aes::{
    cipher::{
        generic_array::GenericArray, typenum::consts::U16, BlockEncrypt, BlockSizeUser,
        InvalidLength, KeyInit,
    },
    Aes128Enc, Aes192Enc, Aes256Enc,
};
use alloc::string::{String, ToString};
use core::{
    fmt,
    fmt::{Debug, Display, Formatter},
};

/// Length of a cipher block in bytes.
pub const BLOCK_SIZE: usize = 16;

/// A single cipher block.
pub type Block = [u8; BLOCK_SIZE];

/// Error type for block cipher failures.
#[derive(Debug)]
pub struct Error {
    inner: String,
}

/// Represents a 128-bit block cipher used in single block ECB mode.
///
/// The key is passed on every call so implementations stay stateless
/// from the generator's point of view. Taking `&mut self` gives the
/// implementation exclusive use of any underlying engine for the
/// duration of the call.
pub trait BlockCipher {
    /// Encrypt `input` under `key` and write the result to `output`.
    ///
    /// `key` is 16, 24 or 32 bytes long. The bytes of key, input and
    /// output are in big-endian order.
    ///
    /// # Error
    ///
    /// Returns an error if the key size is not supported or the
    /// underlying engine faults.
    fn encrypt_block(&mut self, key: &[u8], input: &Block, output: &mut Block)
        -> Result<(), Error>;
}

impl<C> BlockCipher for &mut C
where
    C: BlockCipher + ?Sized,
{
    fn encrypt_block(
        &mut self,
        key: &[u8],
        input: &Block,
        output: &mut Block,
    ) -> Result<(), Error> {
        (**self).encrypt_block(key, input, output)
    }
}

impl Error {
    /// Create a new error by wrapping an underlying cipher error.
    ///
    /// # Example
    /// ```
    /// use ctr_drbg_core::cipher::Error;
    ///
    /// let err = Error::new("bus fault");
    /// assert_eq!("cipher error: bus fault", err.to_string());
    /// ```
    pub fn new<E>(error: E) -> Self
    where
        E: Display + Debug,
    {
        Self {
            inner: error.to_string(),
        }
    }
}

impl core::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "cipher error: {}", self.inner)
    }
}

/// Software AES in single block ECB mode.
///
/// The AES variant is picked from the key length: 16 bytes for
/// AES-128, 24 for AES-192 and 32 for AES-256.
///
/// ```
/// use ctr_drbg_core::cipher::{BlockCipher, SoftAes};
///
/// # use ctr_drbg_core::cipher::Error;
/// #
/// # fn main() -> Result<(), Error> {
/// let mut aes = SoftAes::new();
/// let key = [0u8; 32];
/// let mut output = [0u8; 16];
/// aes.encrypt_block(&key, &[0u8; 16], &mut output)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SoftAes {}

impl SoftAes {
    pub fn new() -> Self {
        Self::default()
    }
}

fn encrypt_with<C>(key: &[u8], input: &Block, output: &mut Block) -> Result<(), Error>
where
    C: KeyInit + BlockEncrypt + BlockSizeUser<BlockSize = U16>,
{
    let cipher = C::new_from_slice(key).map_err(Error::new)?;
    cipher.encrypt_block_b2b(
        GenericArray::from_slice(input),
        GenericArray::from_mut_slice(output),
    );
    Ok(())
}

impl BlockCipher for SoftAes {
    fn encrypt_block(
        &mut self,
        key: &[u8],
        input: &Block,
        output: &mut Block,
    ) -> Result<(), Error> {
        match key.len() {
            16 => encrypt_with::<Aes128Enc>(key, input, output),
            24 => encrypt_with::<Aes192Enc>(key, input, output),
            32 => encrypt_with::<Aes256Enc>(key, input, output),
            _ => Err(Error::new(InvalidLength)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, BlockCipher, Error, SoftAes};
    use hex;

    fn run_aes_kat(key: &str, plaintext: &str, ciphertext: &str) -> Result<(), Error> {
        let key = hex::decode(key).unwrap();
        let input: Block = hex::decode(plaintext).unwrap().try_into().unwrap();
        let expected = hex::decode(ciphertext).unwrap();

        let mut output = Block::default();
        SoftAes::new().encrypt_block(&key, &input, &mut output)?;
        assert_eq!(expected, output);
        Ok(())
    }

    //
    // FIPS-197 Appendix C example vectors
    //

    #[test]
    fn aes_128_kat() -> Result<(), Error> {
        run_aes_kat(
            "000102030405060708090a0b0c0d0e0f",
            "00112233445566778899aabbccddeeff",
            "69c4e0d86a7b0430d8cdb78070b4c55a",
        )
    }

    #[test]
    fn aes_192_kat() -> Result<(), Error> {
        run_aes_kat(
            "000102030405060708090a0b0c0d0e0f1011121314151617",
            "00112233445566778899aabbccddeeff",
            "dda97ca4864cdfe06eaf70a0ec0d7191",
        )
    }

    #[test]
    fn aes_256_kat() -> Result<(), Error> {
        run_aes_kat(
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
            "00112233445566778899aabbccddeeff",
            "8ea2b7ca516745bfeafc49904b496089",
        )
    }

    #[test]
    fn unsupported_key_size() {
        let mut output = Block::default();
        for len in [0usize, 8, 20, 33, 64] {
            let key = [0u8; 64];
            let res = SoftAes::new().encrypt_block(&key[..len], &Block::default(), &mut output);
            assert!(res.is_err(), "key length {} accepted", len);
        }
        assert_eq!(Block::default(), output);
    }
}
