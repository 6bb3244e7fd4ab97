use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::{BlocksArgs, BuildArgs, SourceArgs};
use crate::config::SourceConfig;
use crate::formats::Story;

pub async fn run(args: BuildArgs) -> anyhow::Result<()> {
    let out_path = PathBuf::from(&args.out);
    if out_path.exists() && !args.force {
        anyhow::bail!("page output already exists: {}", out_path.display());
    }

    let story = load_story(&args.source).await?;
    let html = crate::render::render_page(&story);

    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create page output dir: {}", parent.display()))?;
    }

    let mut options = OpenOptions::new();
    options.write(true);
    if args.force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    let mut out = options
        .open(&out_path)
        .with_context(|| format!("open page output: {}", out_path.display()))?;
    out.write_all(html.as_bytes())
        .with_context(|| format!("write page: {}", out_path.display()))?;
    out.flush()
        .with_context(|| format!("flush page: {}", out_path.display()))?;

    tracing::info!(out = %out_path.display(), blocks = story.blocks.len(), "page written");
    Ok(())
}

pub async fn blocks(args: BlocksArgs) -> anyhow::Result<()> {
    let story = load_story(&args.source).await?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &story).context("serialize story json")?;
    stdout.write_all(b"\n").context("write story json newline")?;
    stdout.flush().context("flush stdout")?;
    Ok(())
}

async fn load_story(args: &SourceArgs) -> anyhow::Result<Story> {
    let config = SourceConfig::from_args(args);
    let source = config.build_source().context("configure story sources")?;
    let story = crate::ingest::ingest(&source).await?;
    Ok(story)
}
