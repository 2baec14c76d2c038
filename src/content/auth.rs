//! API key lookup: environment first, then the system keyring

use keyring::Entry;

use super::error::GenerationError;

/// Service name for keyring storage
const SERVICE_NAME: &str = "falafluente";
/// Entry name for the API key
const API_KEY_ENTRY: &str = "anthropic-api-key";
/// Environment override, checked before the keyring
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Manages the Anthropic API key
pub struct ApiKeyManager;

impl ApiKeyManager {
    /// Resolve the API key, preferring `ANTHROPIC_API_KEY`
    pub fn get_api_key() -> Result<String, GenerationError> {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            let key = key.trim().to_string();
            if !key.is_empty() {
                return Ok(key);
            }
        }

        let entry = Self::entry()?;
        entry.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => GenerationError::ApiKeyNotFound,
            _ => GenerationError::KeyringError(e.to_string()),
        })
    }

    /// Store the API key in system keyring
    pub fn set_api_key(key: &str) -> Result<(), GenerationError> {
        let key = key.trim();
        if !Self::validate_key_format(key) {
            return Err(GenerationError::InvalidApiKey);
        }

        Self::entry()?.set_password(key).map_err(|e| GenerationError::KeyringError(e.to_string()))
    }

    /// Delete the stored API key
    pub fn delete_api_key() -> Result<(), GenerationError> {
        Self::entry()?.delete_credential().map_err(|e| match e {
            keyring::Error::NoEntry => GenerationError::ApiKeyNotFound,
            _ => GenerationError::KeyringError(e.to_string()),
        })
    }

    fn entry() -> Result<Entry, GenerationError> {
        Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| GenerationError::KeyringError(e.to_string()))
    }

    /// Anthropic API keys start with "sk-ant-"
    fn validate_key_format(key: &str) -> bool {
        key.starts_with("sk-ant-") && key.len() > 20
    }

    /// Mask an API key for display
    pub fn mask_key(key: &str) -> String {
        if key.len() <= 12 || !key.is_ascii() {
            return "*".repeat(key.chars().count());
        }
        format!("{}...{}", &key[..8], &key[key.len() - 4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_key_format() {
        assert!(ApiKeyManager::validate_key_format("sk-ant-REDACTED"));
        assert!(!ApiKeyManager::validate_key_format("invalid-key"));
        assert!(!ApiKeyManager::validate_key_format("sk-ant-short"));
    }

    #[test]
    fn set_rejects_malformed_key_before_touching_keyring() {
        assert!(matches!(
            ApiKeyManager::set_api_key("not-a-key"),
            Err(GenerationError::InvalidApiKey)
        ));
    }

    #[test]
    fn mask_key() {
        let masked = ApiKeyManager::mask_key("sk-ant-REDACTED");
        assert_eq!(masked, "sk-ant-a...wxyz");
        assert_eq!(ApiKeyManager::mask_key("short"), "*****");
    }
}
