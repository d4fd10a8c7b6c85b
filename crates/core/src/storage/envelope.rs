use crate::errors::CoreError;

/// Magic bytes opening every sealed journal store.
pub const MAGIC: &[u8; 4] = b"TJRN";

/// Current envelope version.
pub const VERSION: u16 = 1;

/// magic(4) + version(2) + kdf(12) + salt(16) + nonce(12) + len(4)
pub const HEADER_LEN: usize = 50;

/// Argon2id cost settings, written into the envelope so a store stays
/// readable if the defaults change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// KiB
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 19_456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl KdfParams {
    /// Reject values a crafted file could use to stall the key derivation.
    fn check(&self) -> Result<(), CoreError> {
        if !(8..=1_048_576).contains(&self.memory_cost)
            || !(1..=20).contains(&self.time_cost)
            || !(1..=16).contains(&self.parallelism)
        {
            return Err(CoreError::InvalidFileFormat(format!(
                "KDF parameters out of range: m={} t={} p={}",
                self.memory_cost, self.time_cost, self.parallelism
            )));
        }
        Ok(())
    }
}

/// A parsed envelope borrowing its ciphertext from the input.
///
/// ```text
/// TJRN | version u16 | m u32 | t u32 | p u32 | salt[16] | nonce[12]
///      | ciphertext_len u32 | ciphertext (AES-GCM, tag included)
/// ```
/// All integers little-endian.
#[derive(Debug)]
pub struct Envelope<'a> {
    pub version: u16,
    pub kdf: KdfParams,
    pub salt: [u8; 16],
    pub nonce: [u8; 12],
    pub ciphertext: &'a [u8],
}

impl<'a> Envelope<'a> {
    pub fn encode(&self) -> Result<Vec<u8>, CoreError> {
        let len = u32::try_from(self.ciphertext.len())
            .map_err(|_| CoreError::Serialization("Store payload too large".into()))?;

        let mut out = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        out.extend_from_slice(MAGIC);
        out.extend_from_slice(&self.version.to_le_bytes());
        for word in [self.kdf.memory_cost, self.kdf.time_cost, self.kdf.parallelism] {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(self.ciphertext);
        Ok(out)
    }

    pub fn decode(data: &'a [u8]) -> Result<Self, CoreError> {
        let mut r = Reader { data, pos: 0 };

        if r.take::<4>()? != *MAGIC {
            return Err(CoreError::InvalidFileFormat("not a journal store".into()));
        }
        let version = u16::from_le_bytes(r.take()?);
        if version == 0 || version > VERSION {
            return Err(CoreError::UnsupportedVersion(version));
        }
        let kdf = KdfParams {
            memory_cost: u32::from_le_bytes(r.take()?),
            time_cost: u32::from_le_bytes(r.take()?),
            parallelism: u32::from_le_bytes(r.take()?),
        };
        kdf.check()?;
        let salt = r.take()?;
        let nonce = r.take()?;
        let len = u32::from_le_bytes(r.take()?) as usize;
        let ciphertext = r.slice(len)?;

        Ok(Self {
            version,
            kdf,
            salt,
            nonce,
            ciphertext,
        })
    }
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn slice(&mut self, n: usize) -> Result<&'a [u8], CoreError> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.data.len());
        let end = end.ok_or_else(|| {
            CoreError::InvalidFileFormat(format!(
                "truncated at byte {}: wanted {n} more, {} left",
                self.pos,
                self.data.len() - self.pos
            ))
        })?;
        let out = &self.data[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.slice(N)?);
        Ok(buf)
    }
}
