//! Configuration merging helpers.
//!
//! Settings are usually assembled from multiple fragments (defaults,
//! command-line flags, files). These helpers overlay the populated parts
//! of a fragment onto existing settings.

#[macro_export]
/// Assign to destination if source value is `Some`.
macro_rules! assign_if_some {
    ( $dst:expr, $src:expr ) => {{
        if let Some(x) = $src {
            $dst = x.into();
        };
    }};
}

/// Try to merge configuration options into runtime settings.
///
/// This consumes a generic configuration object, trying to merge its options
/// into runtime settings. It only overlays populated values from config,
/// leaving unset ones preserved as-is from existing settings.
pub trait MergeOptions<T> {
    /// MergeOptions values from `options` into current settings.
    fn try_merge(&mut self, options: T) -> crate::prelude_errors::Fallible<()>;
}

#[cfg(test)]
mod tests {
    use super::MergeOptions;
    use crate::prelude_errors::*;

    #[derive(Debug, Default)]
    struct Settings {
        name: String,
        size: u32,
    }

    struct Fragment {
        name: Option<&'static str>,
        size: Option<u32>,
    }

    impl MergeOptions<Option<Fragment>> for Settings {
        fn try_merge(&mut self, opts: Option<Fragment>) -> Fallible<()> {
            if let Some(frag) = opts {
                ensure!(frag.size != Some(0), "zero size");
                assign_if_some!(self.name, frag.name);
                assign_if_some!(self.size, frag.size);
            }
            Ok(())
        }
    }

    #[test]
    fn merge_overlays_populated_values() {
        let mut settings = Settings::default();
        settings
            .try_merge(Some(Fragment {
                name: Some("first"),
                size: Some(3),
            }))
            .unwrap();
        settings
            .try_merge(Some(Fragment {
                name: None,
                size: Some(7),
            }))
            .unwrap();
        settings.try_merge(None).unwrap();

        assert_eq!(settings.name, "first");
        assert_eq!(settings.size, 7);

        settings
            .try_merge(Some(Fragment {
                name: None,
                size: Some(0),
            }))
            .unwrap_err();
    }
}
