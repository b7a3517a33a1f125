//! Operand expansion for `-R`.
//!
//! Directories are walked with `jwalk`, sorted by name so output is stable.
//! Symbolic links found below an operand are skipped; operands themselves are
//! always used as given.

use std::fs;
use std::path::PathBuf;

use jwalk::WalkDir;

/// One path to process, or a failure met while walking towards it.
pub(crate) type Target = Result<PathBuf, String>;

/// Expands `operands` into the list of paths to process, in output order.
pub(crate) fn expand(operands: &[PathBuf], recursive: bool) -> Vec<Target> {
    let mut targets = Vec::with_capacity(operands.len());
    for operand in operands {
        let is_dir = fs::metadata(operand).is_ok_and(|metadata| metadata.is_dir());
        if !recursive || !is_dir {
            targets.push(Ok(operand.clone()));
            continue;
        }

        for entry in WalkDir::new(operand)
            .sort(true)
            .skip_hidden(false)
            .follow_links(false)
        {
            match entry {
                Ok(entry) if entry.depth > 0 && entry.file_type().is_symlink() => {
                    tracing::debug!(
                        target: "nfs4acl::cli",
                        path = %entry.path().display(),
                        "skipping symbolic link"
                    );
                }
                Ok(entry) => targets.push(Ok(entry.path())),
                Err(error) => targets.push(Err(error.to_string())),
            }
        }
    }
    targets
}
