//! Process-global environment mutation helpers.

use std::sync::{Mutex, OnceLock};

/// Return the global lock used to serialize environment mutations in tests.
///
/// # Returns
/// A process-wide mutex for synchronizing environment mutation.
pub fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[allow(unused_unsafe)]
fn write_env_var(key: &str, value: Option<&str>) {
    // SAFETY: Callers must serialize mutation when test threads may run in parallel.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// Applies a set of environment overrides and restores every previous value
/// on drop.
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    /// Apply overrides, where `None` removes the variable.
    ///
    /// # Arguments
    /// - `overrides`: `(key, value)` pairs applied in order.
    ///
    /// # Returns
    /// Guard that restores the previous values when dropped.
    pub fn apply(overrides: &[(&str, Option<&str>)]) -> Self {
        let previous = overrides
            .iter()
            .map(|(key, value)| {
                let before = std::env::var(key).ok();
                write_env_var(key, *value);
                (key.to_string(), before)
            })
            .collect();
        Self { previous }
    }

    /// Set `key=value` for the lifetime of the guard.
    pub fn set(key: &str, value: &str) -> Self {
        Self::apply(&[(key, Some(value))])
    }

    /// Remove `key` for the lifetime of the guard.
    pub fn remove(key: &str) -> Self {
        Self::apply(&[(key, None)])
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.iter().rev() {
            write_env_var(key, value.as_deref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{env_lock, EnvGuard};

    #[test]
    fn env_guard_restores_every_overridden_key() {
        let _lock = env_lock().lock().expect("env lock");
        let set_key = "LESSONPRESS_TEST_ENV_GUARD_SET";
        let removed_key = "LESSONPRESS_TEST_ENV_GUARD_REMOVED";
        let _baseline = EnvGuard::apply(&[(set_key, Some("before")), (removed_key, Some("kept"))]);
        {
            let _override = EnvGuard::apply(&[(set_key, Some("after")), (removed_key, None)]);
            assert_eq!(std::env::var(set_key).ok().as_deref(), Some("after"));
            assert!(std::env::var(removed_key).is_err());
        }
        assert_eq!(std::env::var(set_key).ok().as_deref(), Some("before"));
        assert_eq!(std::env::var(removed_key).ok().as_deref(), Some("kept"));
    }

    #[test]
    fn env_guard_remove_restores_missing_value() {
        let _lock = env_lock().lock().expect("env lock");
        let key = "LESSONPRESS_TEST_ENV_GUARD_MISSING";
        {
            let _removed = EnvGuard::remove(key);
            assert!(std::env::var(key).is_err());
        }
        assert!(std::env::var(key).is_err());
    }
}
