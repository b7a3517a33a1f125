//! Attribute access and per-path fan-out.

use std::path::Path;

use nfs4acl::{AclError, Nfs4Acl};

#[cfg(not(all(unix, feature = "xattr")))]
use nfs4acl::XattrError;

/// Reads and decodes the ACL of `path`.
#[cfg(all(unix, feature = "xattr"))]
pub(crate) fn load(path: &Path) -> Result<Nfs4Acl, AclError> {
    nfs4acl::xattr::load_acl(path)
}

/// Encodes `acl` and replaces the ACL of `path`.
#[cfg(all(unix, feature = "xattr"))]
pub(crate) fn store(path: &Path, acl: &Nfs4Acl) -> Result<(), AclError> {
    nfs4acl::xattr::store_acl(path, acl)
}

#[cfg(not(all(unix, feature = "xattr")))]
fn unsupported(context: &'static str, path: &Path) -> AclError {
    XattrError::new(
        context,
        path,
        std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "NFSv4 ACL support is not available in this build",
        ),
    )
    .into()
}

/// Always fails: this build has no attribute bridge.
#[cfg(not(all(unix, feature = "xattr")))]
pub(crate) fn load(path: &Path) -> Result<Nfs4Acl, AclError> {
    Err(unsupported("read NFSv4 ACL", path))
}

/// Always fails: this build has no attribute bridge.
#[cfg(not(all(unix, feature = "xattr")))]
pub(crate) fn store(path: &Path, _acl: &Nfs4Acl) -> Result<(), AclError> {
    Err(unsupported("write NFSv4 ACL", path))
}

/// Formats a per-path failure for standard error.
///
/// Bridge errors already name the path; codec errors get it prefixed.
pub(crate) fn describe(path: &Path, error: &AclError) -> String {
    match error {
        AclError::Xattr(_) => error.to_string(),
        other => format!("'{}': {other}", path.display()),
    }
}

/// Applies `work` to every item, on the rayon pool when `parallel` is enabled.
///
/// Results keep the order of `items`.
pub(crate) fn map_ordered<I, T, F>(items: &[I], work: F) -> Vec<T>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items.par_iter().map(work).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(work).collect()
    }
}
