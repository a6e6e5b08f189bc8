//! Image info command.
//!
//! Decodes each file and reports its native layout next to the 16-bit RGBA
//! form the viewport displays.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pixview_core::{SourceBuffer, normalize_to_rgba16};

use crate::InfoArgs;

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    for (i, path) in args.input.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", describe(path, args.pixel, verbose > 0)?);
    }
    Ok(())
}

/// Text report for one file.
pub fn describe(path: &Path, pixel: Option<(u32, u32)>, verbose: bool) -> Result<String> {
    let file_size = fs::metadata(path)
        .with_context(|| format!("Failed to stat: {}", path.display()))?
        .len();
    let source = pixview_io::decode_source(path)
        .with_context(|| format!("Failed to load: {}", path.display()))?;

    let mut out = String::new();
    let _ = writeln!(out, "{}", path.display());
    let _ = writeln!(out, "  Resolution: {}x{}", source.width(), source.height());
    let _ = writeln!(out, "  Channels:   {}", source.channels());
    let _ = writeln!(out, "  Samples:    {}", source.format());
    let _ = writeln!(out, "  File size:  {}", super::format_size(file_size));
    if verbose {
        let pixels = source.width() as u64 * source.height() as u64;
        let _ = writeln!(out, "  Pixels:     {pixels}");
    }
    if let Some((x, y)) = pixel {
        let _ = writeln!(out, "  Pixel {x},{y}: {}", display_pixel(&source, x, y));
    }
    Ok(out)
}

fn display_pixel(source: &SourceBuffer, x: u32, y: u32) -> String {
    match normalize_to_rgba16(source).pixel(x, y) {
        Some([r, g, b, a]) => format!("rgba16({r}, {g}, {b}, {a})"),
        None => "outside image".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayImage::from_pixel(4, 3, image::Luma([255])).save(&path).unwrap();

        let text = describe(&path, Some((1, 1)), true).unwrap();
        assert!(text.contains("Resolution: 4x3"));
        assert!(text.contains("Channels:   1"));
        assert!(text.contains("Samples:    u8"));
        assert!(text.contains("Pixels:     12"));
        assert!(text.contains("rgba16(65535, 65535, 65535, 65535)"));

        let outside = describe(&path, Some((9, 9)), false).unwrap();
        assert!(outside.contains("outside image"));
    }

    #[test]
    fn test_describe_missing_file() {
        let err = describe(Path::new("/nonexistent/x.png"), None, false).unwrap_err();
        assert!(err.to_string().contains("Failed to stat"));
    }
}
