//! Output directory removal.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::Result;
use crate::ui::Reporter;

/// Remove the output directory and everything under it.
///
/// A missing directory counts as success. Returns only after removal has
/// finished, so a following build never writes into a half-deleted tree.
pub fn clean_outdir(reporter: &mut dyn Reporter, outdir: &Path) -> Result<()> {
    reporter.info("Cleaning output directory...");
    tracing::debug!("Removing {}", outdir.display());

    let removed = if outdir.is_file() {
        fs::remove_file(outdir)
    } else {
        fs::remove_dir_all(outdir)
    };

    match removed {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockReporter;
    use tempfile::TempDir;

    #[test]
    fn removes_nested_tree() {
        let temp = TempDir::new().unwrap();
        let outdir = temp.path().join("dist");
        fs::create_dir_all(outdir.join("assets")).unwrap();
        fs::write(outdir.join("assets/app.js"), "x").unwrap();
        let mut reporter = MockReporter::new();

        clean_outdir(&mut reporter, &outdir).unwrap();

        assert!(!outdir.exists());
        assert_eq!(reporter.infos(), vec!["Cleaning output directory...".to_string()]);
    }

    #[test]
    fn missing_directory_is_ok() {
        let temp = TempDir::new().unwrap();
        let mut reporter = MockReporter::new();

        let result = clean_outdir(&mut reporter, &temp.path().join("dist"));

        assert!(result.is_ok());
    }
}
