use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GfcError, GfcResult};
use crate::types::{AlgoMode, Encoding};

/// Reference PBKDF2 round count (2^20). Envelopes written with another value
/// can only be opened with that same value.
pub const DEFAULT_PBKDF2_ROUNDS: u32 = 1 << 20;

/// Top-level configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GfcConfig {
    pub log: LogConfig,
    pub crypto: CryptoConfig,
    pub compression: CompressionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// PBKDF2-HMAC-SHA256 rounds for passphrase-derived keys
    pub pbkdf2_rounds: u32,
    /// Mode used by `gfc aes` when `--mode` is not given
    pub default_aes_mode: AlgoMode,
    /// Encoding used when `--encoding` is not given
    pub default_encoding: Encoding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// zstd level (default: 3)
    pub level: i32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            pbkdf2_rounds: DEFAULT_PBKDF2_ROUNDS,
            default_aes_mode: AlgoMode::AesGcm,
            default_encoding: Encoding::None,
        }
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self { level: 3 }
    }
}

impl GfcConfig {
    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> GfcResult<Self> {
        if !path.exists() {
            tracing::debug!("config file not found: {} (using defaults)", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)
            .map_err(|e| GfcError::Config(format!("{}: {e}", path.display())))?;
        Ok(config)
    }

    pub fn parse(content: &str) -> GfcResult<Self> {
        let config: GfcConfig =
            toml::from_str(content).map_err(|e| GfcError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> GfcResult<()> {
        if self.crypto.pbkdf2_rounds == 0 {
            return Err(GfcError::Config("crypto.pbkdf2_rounds must be > 0".into()));
        }
        if !(1..=22).contains(&self.compression.level) {
            return Err(GfcError::Config(format!(
                "compression.level must be within 1..=22, got {}",
                self.compression.level
            )));
        }
        if !matches!(self.crypto.default_aes_mode, AlgoMode::AesGcm | AlgoMode::AesCtr) {
            return Err(GfcError::Config(format!(
                "crypto.default_aes_mode must be an AES mode, got {}",
                self.crypto.default_aes_mode
            )));
        }
        Ok(())
    }
}
