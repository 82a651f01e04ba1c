//! Logger initialization.
//!
//! Library code logs through the `log` facade; binaries call [`init`] once at
//! startup. The level defaults to `info` and can be changed with `RUST_LOG`.

use env_logger::Env;
use log::SetLoggerError;

/// Install the process-wide logger
pub fn init() -> Result<(), SetLoggerError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let _ = init();
        assert!(init().is_err());
    }
}
