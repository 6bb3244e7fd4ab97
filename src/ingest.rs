use crate::assemble::{apply_width, assemble};
use crate::error::ScrollyResult;
use crate::formats::{RawTables, Story};
use crate::mapper::{map_steps, map_story};
use crate::source::FallbackSource;
use crate::validate::{validate_steps, validate_story};

pub const STORY_CONTEXT: &str = "reading story table (1st sheet)";
pub const STEPS_CONTEXT: &str = "reading steps table (2nd sheet)";

/// Runs one ingestion pass: resolve, map, validate, assemble, then apply the
/// width split. Nothing is returned unless every stage succeeds.
pub async fn ingest(source: &FallbackSource) -> ScrollyResult<Story> {
    let tables = source.resolve().await?;
    build_story(&tables)
}

pub fn build_story(tables: &RawTables) -> ScrollyResult<Story> {
    let record = map_story(&tables.story);
    let steps = map_steps(&tables.steps);

    validate_story(&record, STORY_CONTEXT)?;
    validate_steps(&steps, STEPS_CONTEXT)?;

    let blocks = apply_width(assemble(&steps), record.horizontal_percentage());
    tracing::info!(steps = steps.len(), blocks = blocks.len(), "story assembled");

    Ok(Story { record, blocks })
}
