//! Application settings for archiver.

use super::{cli, consumer};
use commons::prelude_errors::*;
use commons::MergeOptions;
use custom_debug_derive::Debug as CustomDebug;
use propmap::{
    FieldMapper, FieldTypeTag, HandlerOverrides, Mappable, MappingError, PropertyDescriptor,
    Schema, Store, Value,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

lazy_static! {
    /// Property declarations, in field order.
    static ref SCHEMA: Schema = Schema::new()
        .property("consumers", FieldTypeTag::Integer, PropertyDescriptor::named("consumers").min(1))
        .property("consumer_config", FieldTypeTag::String, PropertyDescriptor::named("kafka.consumer.config"))
        .property("topics", FieldTypeTag::RegexPattern, PropertyDescriptor::named("topics"))
        .property("writer_work_queue", FieldTypeTag::Integer, PropertyDescriptor::named("writer.workqueue"))
        .property("writers", FieldTypeTag::Integer, PropertyDescriptor::named("writers").default_value("4"))
        .property(
            "writer_poll_timeout_ms",
            FieldTypeTag::Integer,
            PropertyDescriptor::named("writer.queue.poll.timeout.ms").default_value("120000"),
        )
        .property(
            "outdir",
            FieldTypeTag::Path,
            PropertyDescriptor::named("writer.outdir").is_directory().is_writable(),
        )
        .property(
            "hardlink_dirs",
            FieldTypeTag::ListOfPath,
            PropertyDescriptor::named("writer.hardlinks").is_directory().is_writable().optional(),
        )
        .property(
            "file_name_prefix",
            FieldTypeTag::String,
            PropertyDescriptor::named("file.name.prefix").pattern("[A-Za-z0-9._-]+"),
        )
        .property("csv_bufsize", FieldTypeTag::Integer, PropertyDescriptor::named("csv.bufsize").default_value("65536"))
        .property("gzip_bufsize", FieldTypeTag::Integer, PropertyDescriptor::named("gzip.bufsize").default_value("65536"))
        .property(
            "consumer_offset",
            FieldTypeTag::String,
            PropertyDescriptor::named("consumer.offset").default_value("seektoend"),
        )
        .property(
            "metrics_period_secs",
            FieldTypeTag::Integer,
            PropertyDescriptor::named("metrics.period.seconds").default_value("60"),
        )
        .property(
            "writer_queue_metrics",
            FieldTypeTag::Boolean,
            PropertyDescriptor::named("enable.writer.queue.metrics").default_value("false"),
        )
        .property(
            "metadata_queue_size",
            FieldTypeTag::Integer,
            PropertyDescriptor::named("metadata.queue.size").default_value("65536"),
        )
        .property(
            "metadata_poll_timeout_ms",
            FieldTypeTag::Integer,
            PropertyDescriptor::named("metadata.queue.poll.timeout.ms").default_value("120000"),
        )
        .unmapped("verbosity")
        .unmapped("config_path")
        .unmapped("consumer_properties")
        .unmapped("events");
}

/// Runtime application settings (validated config).
#[derive(CustomDebug, SmartDefault)]
pub struct AppSettings {
    /// Number of topic consumers.
    pub consumers: i32,

    /// Consumer properties file, relative to the config file.
    pub consumer_config: String,

    /// Topics to subscribe to. Always set once assembled.
    pub topics: Option<Regex>,

    /// Capacity of each writer work queue.
    pub writer_work_queue: i32,

    /// Number of CSV writers.
    pub writers: i32,

    pub writer_poll_timeout_ms: i32,

    /// Output directory for archives.
    pub outdir: PathBuf,

    /// Extra directories receiving hardlinks to finished archives.
    pub hardlink_dirs: Vec<PathBuf>,

    /// Prefix of archive file names.
    pub file_name_prefix: String,

    pub csv_bufsize: i32,
    pub gzip_bufsize: i32,

    /// Starting offset policy, one of `consumer::OFFSET_POLICIES`.
    pub consumer_offset: String,

    pub metrics_period_secs: i32,
    pub writer_queue_metrics: bool,
    pub metadata_queue_size: i32,
    pub metadata_poll_timeout_ms: i32,

    /// Global log level.
    #[default(log::LevelFilter::Warn)]
    pub verbosity: log::LevelFilter,

    /// Properties file the settings were loaded from, if any.
    pub config_path: Option<PathBuf>,

    /// Secondary consumer properties. May hold credentials.
    #[debug(skip)]
    pub consumer_properties: BTreeMap<String, String>,

    /// Event names, indexed by event id.
    pub events: Vec<Option<String>>,
}

impl Mappable for AppSettings {
    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn assign(&mut self, field: &str, value: Value) -> Result<(), MappingError> {
        match field {
            "consumers" => self.consumers = value.into_typed(field)?,
            "consumer_config" => self.consumer_config = value.into_typed(field)?,
            "topics" => self.topics = value.into_typed(field)?,
            "writer_work_queue" => self.writer_work_queue = value.into_typed(field)?,
            "writers" => self.writers = value.into_typed(field)?,
            "writer_poll_timeout_ms" => self.writer_poll_timeout_ms = value.into_typed(field)?,
            "outdir" => self.outdir = value.into_typed(field)?,
            "hardlink_dirs" => self.hardlink_dirs = value.into_typed(field)?,
            "file_name_prefix" => self.file_name_prefix = value.into_typed(field)?,
            "csv_bufsize" => self.csv_bufsize = value.into_typed(field)?,
            "gzip_bufsize" => self.gzip_bufsize = value.into_typed(field)?,
            "consumer_offset" => self.consumer_offset = value.into_typed(field)?,
            "metrics_period_secs" => self.metrics_period_secs = value.into_typed(field)?,
            "writer_queue_metrics" => self.writer_queue_metrics = value.into_typed(field)?,
            "metadata_queue_size" => self.metadata_queue_size = value.into_typed(field)?,
            "metadata_poll_timeout_ms" => {
                self.metadata_poll_timeout_ms = value.into_typed(field)?
            }
            _ => {
                return Err(MappingError::UnresolvedHandler {
                    field: field.to_string(),
                    tag: value.tag(),
                })
            }
        }
        Ok(())
    }
}

impl AppSettings {
    /// Lookup all property sources, map them onto settings and validate.
    pub fn assemble(cli_opts: cli::CliOptions) -> Fallible<Self> {
        let store = cli_opts.build_store(true)?;
        let mut cfg = Self::from_store(&store, cli_opts.config_path.as_deref())?;
        cfg.try_merge(&cli_opts)?;
        Ok(cfg)
    }

    /// Populate settings from an assembled store.
    ///
    /// `config_path` anchors the relative consumer properties file.
    pub fn from_store(store: &Store, config_path: Option<&std::path::Path>) -> Fallible<Self> {
        let mut overrides = HandlerOverrides::new();
        overrides.insert("consumer_offset", consumer::offset_policy);

        let mut cfg: Self = FieldMapper::new()
            .populate(store, &overrides)
            .context("invalid archiver configuration")?;

        cfg.consumer_properties = consumer::load_properties(config_path, &cfg.consumer_config)?;
        cfg.events = propmap::events::event_table(store)?;

        Self::try_validate(cfg)
    }

    /// Validate and build runtime settings.
    fn try_validate(self) -> Fallible<Self> {
        ensure!(
            !self.hardlink_dirs.contains(&self.outdir),
            "hardlink directory {} is also the output directory",
            self.outdir.display()
        );
        Ok(self)
    }
}

/// Single-line `field=value` dump.
impl fmt::Display for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let topics = self.topics.as_ref().map(Regex::as_str).unwrap_or("");
        let hardlinks: Vec<_> = self.hardlink_dirs.iter().map(|p| p.display()).collect();
        let events: Vec<&str> = self
            .events
            .iter()
            .map(|e| e.as_deref().unwrap_or("-"))
            .collect();

        write!(
            f,
            "consumers={} consumer_config={} topics={} writer_work_queue={} writers={} \
             writer_poll_timeout_ms={} outdir={} hardlink_dirs=[{}] file_name_prefix={} \
             csv_bufsize={} gzip_bufsize={} consumer_offset={} metrics_period_secs={} \
             writer_queue_metrics={} metadata_queue_size={} metadata_poll_timeout_ms={} \
             events=[{}]",
            self.consumers,
            self.consumer_config,
            topics,
            self.writer_work_queue,
            self.writers,
            self.writer_poll_timeout_ms,
            self.outdir.display(),
            hardlinks
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            self.file_name_prefix,
            self.csv_bufsize,
            self.gzip_bufsize,
            self.consumer_offset,
            self.metrics_period_secs,
            self.writer_queue_metrics,
            self.metadata_queue_size,
            self.metadata_poll_timeout_ms,
            events.join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use structopt::StructOpt;

    static SAMPLE_CONFIG: &str = "tests/fixtures/archiver.properties";

    /// Temporary base directory holding `out/` and `links/`.
    fn base_dir() -> tempfile::TempDir {
        let base = tempfile::tempdir().unwrap();
        std::fs::create_dir(base.path().join("out")).unwrap();
        std::fs::create_dir(base.path().join("links")).unwrap();
        base
    }

    fn sample_store(base: &Path, extra: &[&str]) -> Store {
        let mut args = vec![
            "argv0".to_string(),
            "-c".to_string(),
            SAMPLE_CONFIG.to_string(),
            format!("base.dir={}", base.display()),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        cli::CliOptions::from_iter_safe(args)
            .unwrap()
            .build_store(false)
            .unwrap()
    }

    #[test]
    fn sample_config() {
        let _ = commons::testing::init_logger();
        let base = base_dir();
        let store = sample_store(base.path(), &[]);

        let settings = AppSettings::from_store(&store, Some(Path::new(SAMPLE_CONFIG))).unwrap();

        assert_eq!(settings.consumers, 2);
        assert_eq!(settings.consumer_config, "consumer.properties");
        let topics = settings.topics.as_ref().unwrap();
        assert!(topics.is_match("clicks.eu"));
        assert!(!topics.is_match("clicks.asia"));
        assert_eq!(settings.writer_work_queue, 1024);
        assert_eq!(settings.writers, 4);
        assert_eq!(settings.writer_poll_timeout_ms, 120_000);
        assert_eq!(settings.outdir, base.path().join("out"));
        assert_eq!(settings.hardlink_dirs, vec![base.path().join("links")]);
        assert_eq!(settings.file_name_prefix, "clicks");
        assert_eq!(settings.csv_bufsize, 65536);
        assert_eq!(settings.gzip_bufsize, 65536);
        assert_eq!(settings.consumer_offset, "committed");
        assert_eq!(settings.metrics_period_secs, 30);
        assert!(settings.writer_queue_metrics);
        assert_eq!(settings.metadata_queue_size, 65536);
        assert_eq!(settings.metadata_poll_timeout_ms, 120_000);
        assert_eq!(
            settings.consumer_properties.get("group.id").map(String::as_str),
            Some("archiver")
        );
        assert_eq!(
            settings.events,
            vec![
                None,
                Some("click".to_string()),
                Some("view".to_string()),
                None,
                Some("purchase".to_string()),
            ]
        );
    }

    #[test]
    fn command_line_overrides() {
        let base = base_dir();
        let store = sample_store(
            base.path(),
            &["writers=8", "consumer.offset=seektobeginning", "enable.writer.queue.metrics=no"],
        );

        let settings = AppSettings::from_store(&store, Some(Path::new(SAMPLE_CONFIG))).unwrap();
        assert_eq!(settings.writers, 8);
        assert_eq!(settings.consumer_offset, "seektobeginning");
        assert!(!settings.writer_queue_metrics);
    }

    #[test]
    fn invalid_values_are_fatal() {
        let base = base_dir();
        for bad in &[
            "consumers=0",
            "writers=four",
            "topics=(",
            "file.name.prefix=has space",
            "consumer.offset=latest",
            "writer.outdir=${base.dir}/missing",
        ] {
            let store = sample_store(base.path(), &[bad]);
            let err = AppSettings::from_store(&store, Some(Path::new(SAMPLE_CONFIG))).unwrap_err();
            assert!(
                err.downcast_ref::<MappingError>().is_some(),
                "{}: {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn without_config_file() {
        let base = base_dir();
        let out = base.path().join("out");
        let args = vec![
            "argv0".to_string(),
            "consumers=1".to_string(),
            "kafka.consumer.config=consumer.properties".to_string(),
            "topics=.*".to_string(),
            "writer.workqueue=16".to_string(),
            format!("writer.outdir={}", out.display()),
            "file.name.prefix=all".to_string(),
        ];
        let store = cli::CliOptions::from_iter_safe(args)
            .unwrap()
            .build_store(false)
            .unwrap();

        let settings = AppSettings::from_store(&store, None).unwrap();
        assert_eq!(settings.outdir, out);
        assert!(settings.hardlink_dirs.is_empty());
        assert_eq!(settings.consumer_offset, "seektoend");
        assert!(settings.consumer_properties.is_empty());
        assert!(settings.events.is_empty());
    }

    #[test]
    fn missing_required_property() {
        let store: Store = vec![("consumers", "1")].into_iter().collect();
        let err = AppSettings::from_store(&store, None).unwrap_err();
        match err.downcast_ref::<MappingError>() {
            Some(MappingError::MissingRequiredProperty { key }) => {
                assert_eq!(key, "kafka.consumer.config")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn hardlink_dir_conflicts_with_outdir() {
        let base = base_dir();
        let store = sample_store(base.path(), &["writer.hardlinks=${base.dir}/out"]);
        AppSettings::from_store(&store, Some(Path::new(SAMPLE_CONFIG))).unwrap_err();
    }

    #[test]
    fn dump_hides_consumer_properties() {
        let base = base_dir();
        let store = sample_store(base.path(), &[]);
        let settings = AppSettings::from_store(&store, Some(Path::new(SAMPLE_CONFIG))).unwrap();

        let debug = format!("{:?}", settings);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("consumers: 2"));

        let display = settings.to_string();
        assert!(display.starts_with("consumers=2 consumer_config=consumer.properties "));
        assert!(display.contains("consumer_offset=committed"));
        assert!(display.ends_with("events=[-, click, view, -, purchase]"));
    }
}
