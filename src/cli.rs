use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the story page as HTML.
    Build(BuildArgs),
    /// Print the validated story record and content blocks as JSON.
    Blocks(BlocksArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Local spreadsheet workbook tried first.
    #[arg(long, default_value = crate::workbook::DEFAULT_DATA_PATH)]
    pub data: String,

    /// Spreadsheet URL used when the workbook does not exist
    /// (default: $SCROLLYSTORY_SHEET_URL).
    #[arg(long)]
    pub sheet_url: Option<String>,

    /// Batch values endpoint of the spreadsheet API
    /// (default: $SCROLLYSTORY_SHEETS_ENDPOINT, then the public endpoint).
    #[arg(long)]
    pub endpoint: Option<String>,
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output path for the rendered HTML page.
    #[arg(long)]
    pub out: String,

    /// Overwrite the output file if it exists.
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct BlocksArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}
