//! Shared test utilities for the nfs4acl workspace.
//!
//! [`AclBytes`] assembles `system.nfs4_acl` payloads by hand, independently
//! of the crate's encoder, so decoder tests do not rely on the code they are
//! checking. [`nfs4_acl_supported`] lets file-system tests skip themselves on
//! hosts whose file systems do not expose the attribute.

use std::path::Path;

use tempfile::TempDir;

/// Attribute probed by [`nfs4_acl_supported`].
const NFS4_ACL_XATTR: &str = "system.nfs4_acl";

/// Builder for raw ACL payloads.
///
/// The entry count defaults to the number of entries added; [`AclBytes::count`]
/// overrides it to produce inconsistent buffers.
#[derive(Clone, Debug, Default)]
pub struct AclBytes {
    count: Option<u32>,
    entries: u32,
    body: Vec<u8>,
}

impl AclBytes {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the entry count atom to `count`.
    #[must_use]
    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Appends a well-formed entry, zero padding the who string.
    #[must_use]
    pub fn entry(self, ace_type: u32, flags: u32, mask: u32, who: &str) -> Self {
        let mut who_bytes = who.as_bytes().to_vec();
        while who_bytes.len() % 4 != 0 {
            who_bytes.push(0);
        }
        self.raw_entry(ace_type, flags, mask, who.len() as u32, &who_bytes)
    }

    /// Appends an entry with an arbitrary declared who length and who bytes.
    ///
    /// `who_bytes` is written verbatim, including any padding the caller wants.
    #[must_use]
    pub fn raw_entry(
        mut self,
        ace_type: u32,
        flags: u32,
        mask: u32,
        who_length: u32,
        who_bytes: &[u8],
    ) -> Self {
        for atom in [ace_type, flags, mask, who_length] {
            self.body.extend_from_slice(&atom.to_be_bytes());
        }
        self.body.extend_from_slice(who_bytes);
        self.entries += 1;
        self
    }

    /// Returns the assembled payload.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let count = self.count.unwrap_or(self.entries);
        let mut out = Vec::with_capacity(4 + self.body.len());
        out.extend_from_slice(&count.to_be_bytes());
        out.extend(self.body);
        out
    }
}

/// Returns true if `path` exposes a readable `system.nfs4_acl` attribute.
#[cfg(unix)]
#[must_use]
pub fn nfs4_acl_supported(path: &Path) -> bool {
    matches!(xattr::get_deref(path, NFS4_ACL_XATTR), Ok(Some(_)))
}

/// NFSv4 ACL attributes are never available off Unix.
#[cfg(not(unix))]
#[must_use]
pub fn nfs4_acl_supported(_path: &Path) -> bool {
    let _ = NFS4_ACL_XATTR;
    false
}

/// Creates a temporary directory containing one regular file and one subdirectory.
///
/// Returns the guard together with the file and subdirectory paths.
///
/// # Panics
///
/// Panics if the fixture cannot be created.
#[must_use]
pub fn scratch_tree() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("create tempdir");
    let file = dir.path().join("file.txt");
    let subdir = dir.path().join("nested");
    std::fs::write(&file, b"data").expect("write fixture file");
    std::fs::create_dir(&subdir).expect("create fixture directory");
    (dir, file, subdir)
}
