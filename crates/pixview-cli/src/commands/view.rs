//! View command - interactive viewer.

use anyhow::Result;

use crate::ViewArgs;

/// Run the view command.
#[cfg(feature = "viewer")]
pub fn run(args: ViewArgs, verbose: u8) -> Result<()> {
    use anyhow::Context;
    use pixview_view::{ViewerConfig, ViewportConfig};

    let viewport = match &args.config {
        Some(path) => ViewportConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ViewportConfig::load_or_default(),
    };

    let exit_code = pixview_view::run(args.input, ViewerConfig { viewport, verbose });
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

/// Run the view command.
#[cfg(not(feature = "viewer"))]
pub fn run(_args: ViewArgs, _verbose: u8) -> Result<()> {
    anyhow::bail!("pixview was built without the `viewer` feature")
}
