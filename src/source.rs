use async_trait::async_trait;

use crate::error::{ErrorKind, ScrollyError, ScrollyResult};
use crate::formats::RawTables;

/// Outcome of asking one location for the story tables.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(RawTables),
    /// Nothing at this location; the next one may be tried.
    NotFound,
    /// Something is there but it cannot be read as tables.
    Malformed(String),
}

#[async_trait]
pub trait TableSource: Send + Sync {
    /// Human-readable location, used in logs and error context.
    fn describe(&self) -> String;

    /// Errors are reserved for failures that are neither absence nor
    /// malformation, such as a missing sheet at a reachable source.
    async fn lookup(&self) -> ScrollyResult<Lookup>;
}

/// Tries the primary location, then the secondary one only when the primary
/// reports absence. Each location gets exactly one attempt.
pub struct FallbackSource {
    primary: Box<dyn TableSource>,
    secondary: Option<Box<dyn TableSource>>,
}

impl FallbackSource {
    pub fn new(primary: Box<dyn TableSource>, secondary: Option<Box<dyn TableSource>>) -> Self {
        Self { primary, secondary }
    }

    pub async fn resolve(&self) -> ScrollyResult<RawTables> {
        let primary = self.primary.describe();
        let primary_context = format!("loading {primary}");

        match self.primary.lookup().await.map_err(|err| err.in_stage(&primary_context))? {
            Lookup::Found(tables) => {
                tracing::info!(source = %primary, "fetched story data from primary source");
                return Ok(tables);
            }
            Lookup::Malformed(detail) => {
                return Err(ScrollyError::new(
                    primary_context,
                    ErrorKind::MalformedSource(detail),
                ));
            }
            Lookup::NotFound => {
                tracing::info!(source = %primary, "primary source not found; trying secondary");
            }
        }

        let Some(secondary) = self.secondary.as_deref() else {
            return Err(ScrollyError::new(
                "resolving story data",
                ErrorKind::SourceUnavailable { tried: primary },
            ));
        };

        let secondary_name = secondary.describe();
        let secondary_context = format!("fetching from secondary source {secondary_name}");
        match secondary
            .lookup()
            .await
            .map_err(|err| err.in_stage(&secondary_context))?
        {
            Lookup::Found(tables) => {
                tracing::info!(source = %secondary_name, "fetched story data from secondary source");
                Ok(tables)
            }
            Lookup::Malformed(detail) => Err(ScrollyError::new(
                secondary_context,
                ErrorKind::MalformedSource(detail),
            )),
            Lookup::NotFound => Err(ScrollyError::new(
                "resolving story data",
                ErrorKind::SourceUnavailable {
                    tried: format!("{primary}, {secondary_name}"),
                },
            )),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Source that always answers with the same lookup and counts calls.
    pub(crate) struct FixedSource {
        pub name: &'static str,
        pub answer: Lookup,
        pub calls: Arc<AtomicUsize>,
    }

    impl FixedSource {
        pub(crate) fn boxed(
            name: &'static str,
            answer: Lookup,
        ) -> (Box<dyn TableSource>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source: Box<dyn TableSource> = Box::new(Self {
                name,
                answer,
                calls: Arc::clone(&calls),
            });
            (source, calls)
        }
    }

    #[async_trait]
    impl TableSource for FixedSource {
        fn describe(&self) -> String {
            self.name.to_owned()
        }

        async fn lookup(&self) -> ScrollyResult<Lookup> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer.clone())
        }
    }

    struct MissingSheetSource;

    #[async_trait]
    impl TableSource for MissingSheetSource {
        fn describe(&self) -> String {
            "sheet".to_owned()
        }

        async fn lookup(&self) -> ScrollyResult<Lookup> {
            Err(ScrollyError::new(
                "batch request",
                ErrorKind::MissingSheet("Steps".to_owned()),
            ))
        }
    }

    fn tables(title: &str) -> RawTables {
        RawTables {
            story: vec![vec!["Title".to_owned()], vec![title.to_owned()]],
            steps: vec![vec!["ContentType".to_owned()]],
        }
    }

    #[tokio::test]
    async fn found_primary_skips_secondary() -> anyhow::Result<()> {
        let (primary, _) = FixedSource::boxed("file", Lookup::Found(tables("primary")));
        let (secondary, secondary_calls) =
            FixedSource::boxed("sheet", Lookup::Found(tables("secondary")));

        let resolved = FallbackSource::new(primary, Some(secondary)).resolve().await?;
        assert_eq!(resolved, tables("primary"));
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn not_found_primary_falls_back_once() -> anyhow::Result<()> {
        let (primary, primary_calls) = FixedSource::boxed("file", Lookup::NotFound);
        let (secondary, secondary_calls) =
            FixedSource::boxed("sheet", Lookup::Found(tables("secondary")));

        let resolved = FallbackSource::new(primary, Some(secondary)).resolve().await?;
        assert_eq!(resolved, tables("secondary"));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_primary_never_tries_secondary() {
        let (primary, _) = FixedSource::boxed("file", Lookup::Malformed("bad zip".to_owned()));
        let (secondary, secondary_calls) =
            FixedSource::boxed("sheet", Lookup::Found(tables("secondary")));

        let err = FallbackSource::new(primary, Some(secondary))
            .resolve()
            .await
            .expect_err("malformed primary is fatal");
        assert!(matches!(err.kind, ErrorKind::MalformedSource(ref d) if d == "bad zip"));
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn exhausted_fallback_is_source_unavailable() {
        let (primary, _) = FixedSource::boxed("file", Lookup::NotFound);
        let (secondary, _) = FixedSource::boxed("sheet", Lookup::NotFound);

        let err = FallbackSource::new(primary, Some(secondary))
            .resolve()
            .await
            .expect_err("nothing found");
        assert!(matches!(err.kind, ErrorKind::SourceUnavailable { .. }));
        assert!(err.to_string().contains("file, sheet"));

        let (primary, _) = FixedSource::boxed("file", Lookup::NotFound);
        let err = FallbackSource::new(primary, None)
            .resolve()
            .await
            .expect_err("no secondary configured");
        assert!(matches!(err.kind, ErrorKind::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn secondary_errors_carry_stage_context() {
        let (primary, _) = FixedSource::boxed("file", Lookup::NotFound);
        let secondary: Box<dyn TableSource> = Box::new(MissingSheetSource);
        let err = FallbackSource::new(primary, Some(secondary))
            .resolve()
            .await
            .expect_err("missing sheet");
        assert_eq!(err.missing_sheet(), Some("Steps"));
        assert!(err.context.starts_with("fetching from secondary source sheet"));
    }
}
