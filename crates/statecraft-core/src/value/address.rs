use crate::error::AddressError;
use derive_more::Deref;
use std::{fmt, str::FromStr};

///
/// Address
///
/// A 32-byte account or object address.
///

#[derive(Clone, Copy, Default, Deref, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Address(pub [u8; Self::LEN]);

impl Address {
    pub const LEN: usize = 32;

    pub const ZERO: Self = Self([0; Self::LEN]);

    #[must_use]
    pub const fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; Self::LEN] {
        self.0
    }

    /// Address whose last byte is `n`, like the framework's `0x1` and `0x2`.
    #[must_use]
    pub const fn from_low_byte(n: u8) -> Self {
        let mut bytes = [0; Self::LEN];
        bytes[Self::LEN - 1] = n;

        Self(bytes)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Accepts `0x`-prefixed or bare hex; short forms are left-padded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.is_empty() {
            return Err(AddressError::Empty);
        }
        if digits.len() > Self::LEN * 2 {
            return Err(AddressError::TooLong { len: digits.len() });
        }

        let padded = format!("{digits:0>width$}", width = Self::LEN * 2);
        let mut bytes = [0; Self::LEN];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|err| AddressError::InvalidHex(err.to_string()))?;

        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl From<[u8; Self::LEN]> for Address {
    fn from(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }
}

///
/// TESTS
///
