//! PIN lock
//!
//! A 4-6 digit PIN stored as an Argon2id hash. It gates the command line
//! the way the lock screen gated the app; it is not authentication.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{BankError, BankResult};
use crate::storage::{PinState, Storage};

pub const PIN_MIN_DIGITS: usize = 4;
pub const PIN_MAX_DIGITS: usize = 6;

/// Check PIN shape without touching storage
pub fn validate_pin(pin: &str) -> BankResult<()> {
    let len = pin.chars().count();
    if !(PIN_MIN_DIGITS..=PIN_MAX_DIGITS).contains(&len) || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(BankError::Validation(format!(
            "PIN must be {}-{} digits",
            PIN_MIN_DIGITS, PIN_MAX_DIGITS
        )));
    }
    Ok(())
}

pub struct SecurityService<'a> {
    storage: &'a Storage,
}

impl<'a> SecurityService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn is_enabled(&self) -> BankResult<bool> {
        Ok(self.storage.pin.get()?.hash.is_some())
    }

    /// Set or replace the PIN
    pub fn set_pin(&self, pin: Zeroizing<String>) -> BankResult<()> {
        validate_pin(&pin)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(pin.as_bytes(), &salt)
            .map_err(|e| BankError::Security(format!("Failed to hash PIN: {}", e)))?
            .to_string();

        let replaced = self.is_enabled()?;
        self.storage.pin.update(|state| {
            state.hash = Some(hash);
            state.updated_at = Some(Utc::now());
        })?;
        self.audit(replaced)?;

        info!(replaced, "PIN set");
        Ok(())
    }

    /// Whether `pin` matches the stored hash
    ///
    /// Always true when no PIN is set.
    pub fn verify(&self, pin: &str) -> BankResult<bool> {
        let Some(stored) = self.storage.pin.get()?.hash else {
            return Ok(true);
        };
        let parsed = PasswordHash::new(&stored)
            .map_err(|e| BankError::Security(format!("Stored PIN hash is corrupt: {}", e)))?;
        let ok = Argon2::default()
            .verify_password(pin.as_bytes(), &parsed)
            .is_ok();
        if !ok {
            warn!("PIN verification failed");
        }
        Ok(ok)
    }

    /// Remove the PIN after checking the current one
    pub fn clear(&self, current: Zeroizing<String>) -> BankResult<()> {
        if !self.is_enabled()? {
            return Ok(());
        }
        if !self.verify(&current)? {
            return Err(BankError::Security("Incorrect PIN".into()));
        }
        self.storage.pin.update(|state| *state = PinState::default())?;
        self.storage.audit().log(&AuditEntry::delete(
            EntityType::Pin,
            "pin",
            None,
            &serde_json::json!({ "enabled": true }),
        ))?;
        info!("PIN removed");
        Ok(())
    }

    /// Fail unless `pin` unlocks the store
    pub fn unlock(&self, pin: &str) -> BankResult<()> {
        if self.verify(pin)? {
            Ok(())
        } else {
            Err(BankError::Security("Incorrect PIN".into()))
        }
    }

    fn audit(&self, replaced: bool) -> BankResult<()> {
        // The hash itself never goes to the audit log
        let marker = serde_json::json!({ "enabled": true });
        let entry = if replaced {
            AuditEntry::update(EntityType::Pin, "pin", None, &marker, &marker)
        } else {
            AuditEntry::create(EntityType::Pin, "pin", None, &marker)
        };
        self.storage.audit().log(&entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::create_test_storage;

    fn pin(s: &str) -> Zeroizing<String> {
        Zeroizing::new(s.to_string())
    }

    #[test]
    fn test_validate_pin() {
        assert!(validate_pin("1234").is_ok());
        assert!(validate_pin("123456").is_ok());
        assert!(validate_pin("123").is_err());
        assert!(validate_pin("1234567").is_err());
        assert!(validate_pin("12a4").is_err());
    }

    #[test]
    fn test_set_and_verify() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SecurityService::new(&storage);

        assert!(!service.is_enabled().unwrap());
        assert!(service.verify("0000").unwrap());

        service.set_pin(pin("2580")).unwrap();
        assert!(service.is_enabled().unwrap());
        assert!(service.verify("2580").unwrap());
        assert!(!service.verify("0852").unwrap());
        assert!(service.unlock("1111").is_err());

        let stored = storage.pin.get().unwrap().hash.unwrap();
        assert!(stored.starts_with("$argon2"));
        assert!(!stored.contains("2580"));
    }

    #[test]
    fn test_clear_requires_current_pin() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SecurityService::new(&storage);
        service.set_pin(pin("1357")).unwrap();

        assert!(service.clear(pin("0000")).is_err());
        assert!(service.is_enabled().unwrap());

        service.clear(pin("1357")).unwrap();
        assert!(!service.is_enabled().unwrap());
    }

    #[test]
    fn test_invalid_pin_not_stored() {
        let (_temp_dir, storage) = create_test_storage();
        let service = SecurityService::new(&storage);
        assert!(service.set_pin(pin("12")).unwrap_err().is_validation());
        assert!(!service.is_enabled().unwrap());
    }
}
