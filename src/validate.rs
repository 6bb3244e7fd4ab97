use crate::error::{ErrorKind, ScrollyError, ScrollyResult, Violation};
use crate::formats::{ContentType, StepRecord, StoryRecord};

/// Checks required story fields. All violations are collected before failing.
pub fn validate_story(record: &StoryRecord, context: &str) -> ScrollyResult<()> {
    let mut violations = Vec::new();

    require(&mut violations, None, "scrollType", &record.scroll_type);
    require(&mut violations, None, "title", &record.title);

    if let Some(raw) = record.text_horizontal_percentage.as_deref() {
        match record.horizontal_percentage() {
            Some(value) if (0.0..=100.0).contains(&value) => {}
            Some(value) => violations.push(Violation {
                step: None,
                field: "textHorizontalPercentage",
                message: format!("must be between 0 and 100, got {value}"),
            }),
            None => violations.push(Violation {
                step: None,
                field: "textHorizontalPercentage",
                message: format!("must be a number, got {raw:?}"),
            }),
        }
    }

    finish(context, violations)
}

/// Checks every step row. All violations across the sequence are collected
/// before failing.
pub fn validate_steps(records: &[StepRecord], context: &str) -> ScrollyResult<()> {
    let mut violations = Vec::new();

    for (record, step) in records.iter().zip(1..) {
        let Some(raw) = record.content_type.as_deref() else {
            violations.push(Violation {
                step: Some(step),
                field: "contentType",
                message: "required".to_owned(),
            });
            continue;
        };

        let Ok(kind) = raw.parse::<ContentType>() else {
            let allowed = ContentType::ALL.map(ContentType::as_str).join(", ");
            violations.push(Violation {
                step: Some(step),
                field: "contentType",
                message: format!("{raw:?} is not one of: {allowed}"),
            });
            continue;
        };

        let s = Some(step);
        match kind {
            ContentType::Text => require(&mut violations, s, "text", &record.text),
            ContentType::Image | ContentType::Video => {
                require(&mut violations, s, "filePath", &record.file_path)
            }
            ContentType::Map => {
                require(&mut violations, s, "latitude", &record.latitude);
                require(&mut violations, s, "longitude", &record.longitude);
                require(&mut violations, s, "zoomLevel", &record.zoom_level);
            }
        }
    }

    finish(context, violations)
}

fn require(
    violations: &mut Vec<Violation>,
    step: Option<usize>,
    field: &'static str,
    value: &Option<String>,
) {
    if value.is_some() {
        return;
    }
    let message = match step {
        Some(_) => "required for this content type".to_owned(),
        None => "required".to_owned(),
    };
    violations.push(Violation {
        step,
        field,
        message,
    });
}

fn finish(context: &str, violations: Vec<Violation>) -> ScrollyResult<()> {
    if violations.is_empty() {
        return Ok(());
    }
    Err(ScrollyError::new(context, ErrorKind::Validation(violations)))
}
