//! Stateless mapping from a validated [`Story`] to an HTML page.
//!
//! Cell text is inserted as HTML so story authors can use inline markup.
//! Attribute values are escaped, and so is the `<title>` element, whose
//! content browsers show as plain text.

use crate::formats::{Block, NumberedStep, ScrollyBlock, Story, StoryRecord, TextBlock};

pub fn render_page(story: &Story) -> String {
    let record = &story.record;
    let title = record.title.as_deref().unwrap_or_default();

    let mut html = String::new();
    html.push_str("<!doctype html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title id=\"browser-title\">{}</title>\n", escape(title)));
    html.push_str("</head>\n");
    let body_style = style_attr(&[("background-color", &record.background_color)]);
    html.push_str(&format!("<body{body_style}>\n"));

    html.push_str("<header>\n");
    html.push_str(&format!("<h1 id=\"story-title\">{title}</h1>\n"));
    push_optional(&mut html, "h2", "subtitle", &record.subtitle);
    push_optional(&mut html, "p", "authors", &record.authors);
    html.push_str("</header>\n");

    html.push_str(&render_content(&story.blocks, record));

    push_optional(&mut html, "div", "end-text", &record.end_text);
    push_optional(&mut html, "footer", "footer", &record.footer);
    html.push_str("</body>\n</html>\n");
    html
}

/// The `#content-section` element holding every block in order.
pub fn render_content(blocks: &[Block], record: &StoryRecord) -> String {
    let mut html = String::new();
    html.push_str("<section id=\"content-section\">\n");
    for block in blocks {
        match block {
            Block::Text(text) => push_text_block(&mut html, text),
            Block::Scrolly(scrolly) => push_scrolly_block(&mut html, scrolly, record),
        }
    }
    html.push_str("</section>\n");
    html
}

fn push_text_block(html: &mut String, block: &TextBlock) {
    html.push_str(&format!(
        "<div class=\"text-content\" data-step=\"{}\">{}</div>\n",
        block.step_number, block.text
    ));
}

fn push_scrolly_block(html: &mut String, block: &ScrollyBlock, record: &StoryRecord) {
    let (steps_width, sticky_width) = match block.width {
        Some(split) => (
            Some(format!("{}%", split.text_percent)),
            Some(format!("{}%", split.sticky_percent)),
        ),
        None => (None, None),
    };

    html.push_str("<div class=\"scrolly-container\">\n");
    html.push_str(&format!(
        "<div class=\"steps-container\"{}>\n",
        style_attr(&[("width", &steps_width)])
    ));
    let content_style = style_attr(&[
        ("background-color", &record.scroll_box_background_color),
        ("color", &record.scroll_box_text_color),
    ]);
    for step in &block.steps {
        push_step(html, step, &content_style);
    }
    html.push_str("</div>\n");

    html.push_str(&format!(
        "<div class=\"sticky-container\"{}>\n",
        style_attr(&[("width", &sticky_width)])
    ));
    html.push_str("<div class=\"sticky-image-container\"><img></div>\n");
    html.push_str(&format!(
        "<div class=\"sticky-map-container\" id=\"sticky-map-container-{}\"></div>\n",
        block.sticky_id
    ));
    html.push_str("<div class=\"sticky-video-container\"></div>\n");
    html.push_str("</div>\n</div>\n");
}

fn push_step(html: &mut String, step: &NumberedStep, content_style: &str) {
    let record = &step.record;
    html.push_str(&format!("<div class=\"step\" data-step=\"{}\"", step.step_number));

    let attributes = [
        ("data-content-type", &record.content_type),
        ("data-file-path", &record.file_path),
        ("data-alt-text", &record.alt_text),
        ("data-latitude", &record.latitude),
        ("data-longitude", &record.longitude),
        ("data-zoom-level", &record.zoom_level),
        ("data-image-orientation", &record.image_orientation),
    ];
    for (name, value) in attributes {
        if let Some(value) = value {
            html.push_str(&format!(" {name}=\"{}\"", escape(value)));
        }
    }

    html.push_str(&format!(
        "><div class=\"step-content\"{content_style}>{}</div></div>\n",
        record.text.as_deref().unwrap_or_default()
    ));
}

fn push_optional(html: &mut String, tag: &str, id: &str, value: &Option<String>) {
    if let Some(value) = value {
        html.push_str(&format!("<{tag} id=\"{id}\">{value}</{tag}>\n"));
    }
}

/// ` style="..."` for the present declarations, or an empty string.
fn style_attr(declarations: &[(&str, &Option<String>)]) -> String {
    let style = declarations
        .iter()
        .filter_map(|(property, value)| {
            let value = value.as_deref()?;
            Some(format!("{property}: {}", escape(value)))
        })
        .collect::<Vec<_>>()
        .join("; ");
    if style.is_empty() {
        return String::new();
    }
    format!(" style=\"{style}\"")
}

fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
