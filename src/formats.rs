use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type Row = Vec<String>;

/// A header row followed by data rows.
pub type Table = Vec<Row>;

pub const STORY_SHEET: &str = "Story";
pub const STEPS_SHEET: &str = "Steps";

/// Sheet names every source must resolve, in request order.
pub const REQUIRED_SHEETS: [&str; 2] = [STORY_SHEET, STEPS_SHEET];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTables {
    pub story: Table,
    pub steps: Table,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_horizontal_percentage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_box_background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_box_text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl StoryRecord {
    /// Share of the horizontal space given to narrative text, when the cell
    /// holds a number.
    pub fn horizontal_percentage(&self) -> Option<f64> {
        self.text_horizontal_percentage
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Image,
    Video,
    Map,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [Self::Text, Self::Image, Self::Video, Self::Map];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "map" => Ok(Self::Map),
            other => Err(format!("unrecognized content type: {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl StepRecord {
    pub fn kind(&self) -> Option<ContentType> {
        self.content_type.as_deref()?.parse().ok()
    }

    pub fn is_text(&self) -> bool {
        self.kind() == Some(ContentType::Text)
    }
}

/// A step record tagged with its 1-based position in the Steps table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberedStep {
    pub step_number: usize,
    #[serde(flatten)]
    pub record: StepRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidthSplit {
    pub text_percent: f64,
    pub sticky_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub step_number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollyBlock {
    pub sticky_id: usize,
    pub steps: Vec<NumberedStep>,
    /// `None` keeps the page's default text/sticky widths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<WidthSplit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Text(TextBlock),
    Scrolly(ScrollyBlock),
}

impl Block {
    /// Step numbers covered by this block, in order.
    pub fn step_numbers(&self) -> Vec<usize> {
        match self {
            Block::Text(block) => vec![block.step_number],
            Block::Scrolly(block) => block.steps.iter().map(|step| step.step_number).collect(),
        }
    }
}

/// A fully validated story ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub record: StoryRecord,
    pub blocks: Vec<Block>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parses_case_insensitively() {
        for raw in ["map", " Map ", "MAP"] {
            assert_eq!(raw.parse::<ContentType>(), Ok(ContentType::Map), "raw={raw:?}");
        }
        assert!("chart".parse::<ContentType>().is_err());
    }

    #[test]
    fn horizontal_percentage_ignores_non_numbers() {
        let mut record = StoryRecord {
            text_horizontal_percentage: Some(" 40 ".to_owned()),
            ..StoryRecord::default()
        };
        assert_eq!(record.horizontal_percentage(), Some(40.0));

        record.text_horizontal_percentage = Some("wide".to_owned());
        assert_eq!(record.horizontal_percentage(), None);
    }

    #[test]
    fn block_serializes_with_type_tag_and_omits_absent_fields() -> anyhow::Result<()> {
        let block = Block::Scrolly(ScrollyBlock {
            sticky_id: 2,
            steps: vec![NumberedStep {
                step_number: 2,
                record: StepRecord {
                    content_type: Some("image".to_owned()),
                    file_path: Some("media/a.jpg".to_owned()),
                    ..StepRecord::default()
                },
            }],
            width: None,
        });

        let value = serde_json::to_value(&block)?;
        assert_eq!(value["type"], "scrolly");
        assert_eq!(value["sticky_id"], 2);
        assert_eq!(value["steps"][0]["step_number"], 2);
        assert_eq!(value["steps"][0]["file_path"], "media/a.jpg");
        assert!(value["steps"][0].get("alt_text").is_none());
        assert!(value.get("width").is_none());
        Ok(())
    }
}
