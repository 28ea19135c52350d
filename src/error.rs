//! Spawn-path and configuration error types.
//!
//! Setup code (prototype registration, emitter construction, config loading)
//! propagates these synchronously to its caller.  Per-frame code never panics
//! on them: a failed spawn is logged with `warn!` and skipped, leaving the world
//! unchanged.
//!
//! ## Usage
//!
//! ```rust
//! use meteorfall::error::{SpawnError, SpawnResult};
//! use meteorfall::particles::ParticleType;
//!
//! fn build() -> SpawnResult<ParticleType> {
//!     ParticleType::new("asteroid", 0.08, 0.00085)
//! }
//! assert!(build().is_ok());
//! assert!(matches!(
//!     ParticleType::new("asteroid", 1.5, 0.0),
//!     Err(SpawnError::InvalidFrequency { .. })
//! ));
//! ```

use std::fmt;

/// Top-level error enum for the spawning core.
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnError {
    /// A spawn was requested for a name that was never registered.
    UnknownPrototype {
        /// The requested prototype name.
        name: String,
    },

    /// A prototype was registered under a name that is already taken.
    DuplicateName {
        /// The conflicting prototype name.
        name: String,
    },

    /// A particle type was configured with a spawn probability outside `[0, 1]`
    /// (or a non-finite drift).  Only runtime drift is clamped; the initial
    /// value is rejected.
    InvalidFrequency {
        /// The rejected value.
        value: f32,
    },

    /// A configuration value is outside its valid range.
    InvalidConfig {
        /// Name of the config key (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the valid range.
        expected: &'static str,
    },
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::UnknownPrototype { name } => {
                write!(f, "no prototype registered under '{}'", name)
            }
            SpawnError::DuplicateName { name } => {
                write!(f, "a prototype named '{}' is already registered", name)
            }
            SpawnError::InvalidFrequency { value } => write!(
                f,
                "particle frequency {} is outside [0, 1] or not finite",
                value
            ),
            SpawnError::InvalidConfig {
                name,
                value,
                expected,
            } => write!(f, "config '{}' = {} is outside {}", name, value, expected),
        }
    }
}

impl std::error::Error for SpawnError {}

/// Convenience alias: a `Result` using `SpawnError` as the error type.
pub type SpawnResult<T> = Result<T, SpawnError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is a finite probability in `[0, 1]`.
pub fn validate_frequency(value: f32) -> SpawnResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SpawnError::InvalidFrequency { value })
    }
}

/// Returns an error unless `value` is finite and `>= 0`.
pub fn validate_non_negative(name: &'static str, value: f32) -> SpawnResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SpawnError::InvalidConfig {
            name,
            value,
            expected: "[0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> SpawnResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SpawnError::InvalidConfig {
            name,
            value,
            expected: "(0.0, ∞)",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_bounds_are_inclusive() {
        assert!(validate_frequency(0.0).is_ok());
        assert!(validate_frequency(1.0).is_ok());
        assert!(validate_frequency(-0.01).is_err());
        assert!(validate_frequency(1.01).is_err());
        assert!(validate_frequency(f32::NAN).is_err());
    }

    #[test]
    fn positive_rejects_zero_but_non_negative_accepts_it() {
        assert!(validate_positive("heartbeat_interval", 0.0).is_err());
        assert!(validate_non_negative("emitter_interval", 0.0).is_ok());
    }

    #[test]
    fn display_names_the_prototype() {
        let err = SpawnError::UnknownPrototype {
            name: "comet".into(),
        };
        assert!(err.to_string().contains("comet"));
    }
}
