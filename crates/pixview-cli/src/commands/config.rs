//! Config command - print or initialize the viewport configuration.

use anyhow::Result;

use crate::ConfigArgs;

/// Run the config command.
#[cfg(feature = "viewer")]
pub fn run(args: ConfigArgs) -> Result<()> {
    use anyhow::{Context, bail};
    use pixview_view::ViewportConfig;
    use tracing::info;

    let config = match &args.config {
        Some(path) => ViewportConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ViewportConfig::default(),
    };

    if !args.init {
        println!("{}", config.to_ron_string()?);
        return Ok(());
    }

    let path = ViewportConfig::default_path().context("No user config directory")?;
    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config.save(&path)?;
    info!(path = %path.display(), "wrote viewport config");
    Ok(())
}

/// Run the config command.
#[cfg(not(feature = "viewer"))]
pub fn run(_args: ConfigArgs) -> Result<()> {
    anyhow::bail!("pixview was built without the `viewer` feature")
}
