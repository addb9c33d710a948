//! Test helpers.

use crate::prelude_errors::*;

/// Initialize logging.
pub fn init_logger() -> Fallible<()> {
    env_logger::Builder::from_env(env_logger::Env::default())
        .is_test(true)
        .try_init()?;
    Ok(())
}
