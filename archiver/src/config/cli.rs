//! Command-line options for archiver.

use super::AppSettings;
use commons::prelude_errors::*;
use commons::MergeOptions;
use propmap::Store;
use std::path::PathBuf;

/// CLI configuration flags, top-level.
#[derive(Debug, StructOpt)]
pub struct CliOptions {
    /// Verbosity level
    #[structopt(short = "v", parse(from_occurrences))]
    pub verbosity: u64,

    /// Path to properties file
    #[structopt(short = "c", parse(from_os_str))]
    pub config_path: Option<PathBuf>,

    /// Property overrides, as `key=value` or bare `key` for flags
    #[structopt(name = "KEY=VALUE")]
    pub properties: Vec<String>,
}

impl CliOptions {
    /// Layer all property sources into a store.
    ///
    /// The process environment is only layered when `with_environment` is set.
    pub fn build_store(&self, with_environment: bool) -> Fallible<Store> {
        let mut builder = Store::builder();
        if let Some(path) = &self.config_path {
            builder = builder
                .properties_file(path)
                .with_context(|| format!("failed to load config file {}", path.display()))?;
        }
        if with_environment {
            builder = builder.environment();
        }

        let overrides = propmap::args::parse_args(&self.properties)
            .context("invalid command-line properties")?;
        Ok(builder.entries(overrides).build())
    }
}

impl MergeOptions<&CliOptions> for AppSettings {
    fn try_merge(&mut self, opts: &CliOptions) -> Fallible<()> {
        if opts.verbosity > 0 {
            self.verbosity = commons::de::verbosity_to_level(opts.verbosity);
        }
        assign_if_some!(self.config_path, opts.config_path.clone());
        Ok(())
    }
}
