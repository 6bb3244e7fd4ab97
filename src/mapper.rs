//! Converts header-row tables into story and step records.
//!
//! Headers are matched case-insensitively after trimming, so `"ContentType"`,
//! `" contenttype "` and `"CONTENTTYPE"` all name the same column. A column
//! missing from the table, or an empty cell, maps to `None`; deciding whether
//! that is acceptable is left to validation.

use std::collections::HashMap;

use crate::formats::{Row, StepRecord, StoryRecord};

#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    columns: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(headers: &[String]) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(idx, header)| (normalize_header(header), idx))
            .collect();
        Self { columns }
    }

    pub fn column(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }

    /// Cell for `field` in `row`, or `None` when the header or the cell is
    /// missing or blank.
    pub fn get(&self, row: &[String], field: &str) -> Option<String> {
        let value = row.get(self.column(field)?)?.trim();
        if value.is_empty() {
            return None;
        }
        Some(value.to_owned())
    }
}

fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Reads the story from the single data row under the header; later rows are ignored.
pub fn map_story(rows: &[Row]) -> StoryRecord {
    let Some((headers, data)) = rows.split_first() else {
        return StoryRecord::default();
    };
    let Some(row) = data.first() else {
        return StoryRecord::default();
    };
    let index = HeaderIndex::new(headers);

    StoryRecord {
        scroll_type: index.get(row, "scrolltype"),
        title: index.get(row, "title"),
        subtitle: index.get(row, "subtitle"),
        end_text: index.get(row, "endtext"),
        text_horizontal_percentage: index.get(row, "texthorizontalpercentage"),
        authors: index.get(row, "authors"),
        background_color: index.get(row, "backgroundcolor"),
        scroll_box_background_color: index.get(row, "scrollboxbackgroundcolor"),
        scroll_box_text_color: index.get(row, "scrollboxtextcolor"),
        footer: index.get(row, "footer"),
    }
}

/// One record per data row, in table order.
pub fn map_steps(rows: &[Row]) -> Vec<StepRecord> {
    let Some((headers, data)) = rows.split_first() else {
        return Vec::new();
    };
    let index = HeaderIndex::new(headers);

    data.iter()
        .map(|row| StepRecord {
            content_type: index.get(row, "contenttype"),
            file_path: index.get(row, "filepath"),
            alt_text: index.get(row, "alttext"),
            latitude: index.get(row, "latitude"),
            longitude: index.get(row, "longitude"),
            zoom_level: index.get(row, "zoomlevel"),
            image_orientation: index.get(row, "imageorientation"),
            text: index.get(row, "text"),
        })
        .collect()
}
