//! Global parameters, read once from environment variables.
//!
//! Parameters are meant for settings that are too internal to be exposed in the API of each
//! algorithm but that one may want to toggle when investigating a misbehaving oracle.
//!
//! ```
//! use diagnosis::params::Param;
//! static MAX_DEPTH: Param<u32> = Param::new("MY_MAX_DEPTH", "3");
//!
//! // environment variable not set, the default is used
//! assert_eq!(MAX_DEPTH.get(), 3);
//! ```
//!
//! The value is fixed at the first read: later changes of the environment variable are ignored.
//! [`Param::set`] forces a value and must happen before any read.

use std::str::FromStr;

use once_cell::sync::OnceCell;

/// When enabled, each diagnosis is re-checked against the oracle before being returned.
pub static VERIFY_RESULTS: Param<bool> = Param::new("DIAGNOSIS_VERIFY", "false");

pub struct Param<T> {
    value: OnceCell<T>,
    env: &'static str,
    default: &'static str,
}

impl<T> Param<T> {
    pub const fn new(env: &'static str, default: &'static str) -> Param<T> {
        Param {
            value: OnceCell::new(),
            env,
            default,
        }
    }

    /// Name of the environment variable backing the parameter.
    pub fn env(&self) -> &'static str {
        self.env
    }
}

impl<T: FromStr> Param<T> {
    fn parse_default(&self) -> T {
        T::from_str(self.default)
            .unwrap_or_else(|_| panic!("{}: invalid default value \"{}\"", self.env, self.default))
    }

    fn read(&self) -> T {
        match std::env::var(self.env) {
            Ok(raw) => T::from_str(&raw).unwrap_or_else(|_| {
                tracing::warn!(
                    "{}: could not parse \"{}\", using default \"{}\"",
                    self.env,
                    raw,
                    self.default
                );
                self.parse_default()
            }),
            Err(std::env::VarError::NotPresent) => self.parse_default(),
            Err(err) => {
                tracing::warn!("{}: {}, using default \"{}\"", self.env, err, self.default);
                self.parse_default()
            }
        }
    }

    /// Value of the parameter, read from the environment on first access.
    ///
    /// # Panics
    /// If the default value cannot be parsed.
    pub fn get(&self) -> T
    where
        T: Copy,
    {
        *self.get_ref()
    }

    pub fn get_ref(&self) -> &T {
        self.value.get_or_init(|| self.read())
    }

    /// Forces the value of the parameter.
    ///
    /// # Panics
    /// If the parameter was already read or set.
    pub fn set(&self, value: T) {
        if self.value.set(value).is_err() {
            panic!("Parameter {} is already initialized.", self.env);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value() {
        static P: Param<u64> = Param::new("DIAGNOSIS_TEST_UNSET_PARAM", "42");
        assert_eq!(P.get(), 42);
        assert_eq!(P.env(), "DIAGNOSIS_TEST_UNSET_PARAM");
    }

    #[test]
    fn test_set_before_read() {
        static P: Param<bool> = Param::new("DIAGNOSIS_TEST_SET_PARAM", "false");
        P.set(true);
        assert!(P.get());
    }

    #[test]
    #[should_panic]
    fn test_set_after_read() {
        static P: Param<bool> = Param::new("DIAGNOSIS_TEST_READ_PARAM", "false");
        let _ = P.get();
        P.set(true);
    }
}
