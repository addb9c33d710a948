//! Error handling plumbing.

pub mod prelude {
    pub use anyhow::{anyhow, bail, ensure, format_err, Context, Error};

    /// Result type for operations which may fail with an opaque error.
    pub type Fallible<T> = anyhow::Result<T>;
}
