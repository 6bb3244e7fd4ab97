use std::path::PathBuf;

use crate::cli::SourceArgs;
use crate::fetch::HttpFetch;
use crate::sheets::{DEFAULT_ENDPOINT, SheetsSource};
use crate::source::{FallbackSource, TableSource};
use crate::workbook::WorkbookSource;

pub const SHEET_URL_ENV: &str = "SCROLLYSTORY_SHEET_URL";
pub const API_KEY_ENV: &str = "SCROLLYSTORY_SHEETS_API_KEY";
pub const ENDPOINT_ENV: &str = "SCROLLYSTORY_SHEETS_ENDPOINT";

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub data_path: PathBuf,
    pub sheet_url: Option<String>,
    pub api_key: Option<String>,
    pub endpoint: String,
}

impl SourceConfig {
    /// Flags win over environment variables. The API key is only read from
    /// the environment.
    pub fn from_args(args: &SourceArgs) -> Self {
        let sheet_url = args.sheet_url.clone().or_else(|| env_non_empty(SHEET_URL_ENV));
        let endpoint = args
            .endpoint
            .clone()
            .or_else(|| env_non_empty(ENDPOINT_ENV))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned());
        Self {
            data_path: PathBuf::from(&args.data),
            sheet_url,
            api_key: env_non_empty(API_KEY_ENV),
            endpoint,
        }
    }

    pub fn build_source(&self) -> anyhow::Result<FallbackSource> {
        let primary: Box<dyn TableSource> = Box::new(WorkbookSource::new(&self.data_path));

        let secondary: Option<Box<dyn TableSource>> = match self.sheet_url.as_deref() {
            Some(sheet_url) => {
                let Some(api_key) = self.api_key.as_deref() else {
                    anyhow::bail!("{API_KEY_ENV} is not set (required with a sheet url)");
                };
                let sheets: Box<dyn TableSource> = Box::new(SheetsSource::new(
                    sheet_url,
                    self.endpoint.as_str(),
                    api_key,
                    Box::new(HttpFetch::new()?),
                ));
                Some(sheets)
            }
            None => {
                tracing::debug!("no sheet url configured; workbook is the only source");
                None
            }
        };

        Ok(FallbackSource::new(primary, secondary))
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
