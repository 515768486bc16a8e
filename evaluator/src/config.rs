use std::{env, num::NonZeroUsize};

use crate::{EvalErr, Result};

const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(32).unwrap();

/// Runtime knobs of an evaluation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    pub batch_size: NonZeroUsize,
    pub parallel: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            parallel: false,
        }
    }
}

impl EvalConfig {
    /// Reads `BATCH_SIZE` and `PARALLEL` from the environment, falling back to the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::var("BATCH_SIZE").ok(), env::var("PARALLEL").ok())
    }

    /// Parses the raw variable values.
    ///
    /// # Errors
    /// `EvalErr::InvalidConfig` when the batch size is not a positive integer or the parallel
    /// flag is not one of `1`, `0`, `true` or `false`.
    pub fn from_vars(batch_size: Option<String>, parallel: Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = batch_size {
            config.batch_size = raw
                .trim()
                .parse::<NonZeroUsize>()
                .map_err(|_| EvalErr::InvalidConfig {
                    var: "BATCH_SIZE",
                    value: raw.clone(),
                })?;
        }

        if let Some(raw) = parallel {
            config.parallel = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => true,
                "0" | "false" => false,
                _ => {
                    return Err(EvalErr::InvalidConfig {
                        var: "PARALLEL",
                        value: raw,
                    });
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = EvalConfig::from_vars(None, None).unwrap();

        assert_eq!(config.batch_size.get(), 32);
        assert!(!config.parallel);
    }

    #[test]
    fn parses_values() {
        let config = EvalConfig::from_vars(Some("8".into()), Some("TRUE".into())).unwrap();

        assert_eq!(config.batch_size.get(), 8);
        assert!(config.parallel);
    }

    #[test]
    fn rejects_zero_batch_size() {
        let err = EvalConfig::from_vars(Some("0".into()), None).unwrap_err();
        assert!(matches!(err, EvalErr::InvalidConfig { var: "BATCH_SIZE", .. }));
    }

    #[test]
    fn rejects_unknown_flag() {
        let err = EvalConfig::from_vars(None, Some("maybe".into())).unwrap_err();
        assert!(matches!(err, EvalErr::InvalidConfig { var: "PARALLEL", .. }));
    }
}
