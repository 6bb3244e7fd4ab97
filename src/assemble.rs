//! Groups an ordered run of step records into text and scrolly blocks.
//!
//! A text step becomes its own [`TextBlock`]. Consecutive non-text steps are
//! merged into one [`ScrollyBlock`] whose `sticky_id` is the step number of its
//! first member, so two scrolly blocks are never adjacent. Step numbers start
//! at 1 and advance once per record.

use crate::formats::{Block, NumberedStep, ScrollyBlock, StepRecord, TextBlock, WidthSplit};

#[derive(Debug, Default)]
enum State {
    #[default]
    InText,
    InScrolly(Vec<NumberedStep>),
}

#[derive(Debug, Default)]
struct Assembly {
    blocks: Vec<Block>,
    state: State,
}

impl Assembly {
    fn push(mut self, step_number: usize, record: &StepRecord) -> Self {
        if record.is_text() {
            self.close_run();
            self.blocks.push(Block::Text(TextBlock {
                step_number,
                text: record.text.clone().unwrap_or_default(),
            }));
            return self;
        }

        let step = NumberedStep {
            step_number,
            record: record.clone(),
        };
        self.state = match self.state {
            State::InText => State::InScrolly(vec![step]),
            State::InScrolly(mut run) => {
                run.push(step);
                State::InScrolly(run)
            }
        };
        self
    }

    fn close_run(&mut self) {
        let State::InScrolly(run) = std::mem::take(&mut self.state) else {
            return;
        };
        let Some(first) = run.first() else {
            return;
        };
        self.blocks.push(Block::Scrolly(ScrollyBlock {
            sticky_id: first.step_number,
            steps: run,
            width: None,
        }));
    }

    fn finish(mut self) -> Vec<Block> {
        self.close_run();
        self.blocks
    }
}

pub fn assemble(records: &[StepRecord]) -> Vec<Block> {
    let blocks = records
        .iter()
        .zip(1..)
        .fold(Assembly::default(), |assembly, (record, step_number)| {
            assembly.push(step_number, record)
        })
        .finish();

    tracing::debug!(steps = records.len(), blocks = blocks.len(), "assembled content blocks");
    blocks
}

/// Applies the text/sticky width split to every scrolly block.
///
/// Only percentages strictly between 1 and 99 take effect; anything else leaves
/// the blocks on the page's default widths.
pub fn apply_width(mut blocks: Vec<Block>, text_percent: Option<f64>) -> Vec<Block> {
    let Some(text_percent) = text_percent else {
        return blocks;
    };
    if !(text_percent > 1.0 && text_percent < 99.0) {
        tracing::debug!(text_percent, "width outside (1, 99); keeping default layout");
        return blocks;
    }

    let split = WidthSplit {
        text_percent,
        sticky_percent: 100.0 - text_percent,
    };
    for block in &mut blocks {
        if let Block::Scrolly(scrolly) = block {
            scrolly.width = Some(split);
        }
    }
    blocks
}
