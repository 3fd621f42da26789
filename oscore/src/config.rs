//! Algorithm selection and replay-window sizing (§4.15).

/// A supported AEAD algorithm. Only one variant today; the enum exists so
/// adding a second algorithm is a match arm, not a signature change (§1
/// "the design permits extension but does not mandate it").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AeadAlg {
  /// AES-CCM-16-64-128: 16-byte key, 13-byte nonce, 8-byte tag.
  Aes128Ccm16_64_128,
}

impl AeadAlg {
  /// The COSE algorithm identifier used in HKDF info and the external AAD.
  pub fn cose_id(&self) -> i64 {
    match self {
      | Self::Aes128Ccm16_64_128 => 10,
    }
  }

  /// Key length in bytes.
  pub fn key_len(&self) -> usize {
    match self {
      | Self::Aes128Ccm16_64_128 => 16,
    }
  }

  /// Nonce length in bytes.
  pub fn nonce_len(&self) -> usize {
    match self {
      | Self::Aes128Ccm16_64_128 => 13,
    }
  }

  /// Tag length in bytes.
  pub fn tag_len(&self) -> usize {
    match self {
      | Self::Aes128Ccm16_64_128 => 8,
    }
  }
}

impl Default for AeadAlg {
  fn default() -> Self {
    Self::Aes128Ccm16_64_128
  }
}

/// A supported KDF. Only HKDF-SHA-256 today, for the same reason as
/// [`AeadAlg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kdf {
  /// HMAC-based Extract-and-Expand over SHA-256.
  HkdfSha256,
}

impl Default for Kdf {
  fn default() -> Self {
    Self::HkdfSha256
  }
}

/// Algorithm selection and replay-window sizing, grouped the way
/// `toad::config::Config` groups its runtime tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
  /// Which AEAD algorithm derived keys and the protect/unprotect pipeline
  /// use.
  pub aead_alg: AeadAlg,
  /// Which KDF derives contexts from pre-established material.
  pub kdf: Kdf,
  /// How many Partial IVs wide the default replay window is.
  pub replay_window_bits: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self { aead_alg: AeadAlg::default(), kdf: Kdf::default(), replay_window_bits: 32 }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_config_matches_documented_defaults() {
    let config = Config::default();
    assert_eq!(config.aead_alg.cose_id(), 10);
    assert_eq!(config.aead_alg.key_len(), 16);
    assert_eq!(config.aead_alg.nonce_len(), 13);
    assert_eq!(config.aead_alg.tag_len(), 8);
    assert_eq!(config.replay_window_bits, 32);
  }
}
