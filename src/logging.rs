use std::io::IsTerminal as _;

use anyhow::Context as _;

pub const DEFAULT_DIRECTIVE: &str = "scrollystory=info";

/// Installs the stderr subscriber. `RUST_LOG` replaces `default_directive`
/// when set.
pub fn init(default_directive: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_directive))
        .with_context(|| format!("build log filter: {default_directive}"))?;

    let stderr = std::io::stderr();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(stderr.is_terminal())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
