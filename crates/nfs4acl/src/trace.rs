//! Structured tracing for codec, mutation, and attribute I/O.
//!
//! All events are compiled only with the `tracing` feature; without it every
//! helper is an empty inline function.

#[cfg(feature = "tracing")]
const WIRE_TARGET: &str = "nfs4acl::wire";
#[cfg(feature = "tracing")]
const ACL_TARGET: &str = "nfs4acl::acl";
#[cfg(all(feature = "tracing", feature = "xattr"))]
const XATTR_TARGET: &str = "nfs4acl::xattr";

/// Traces one decoded entry.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_decode_entry(index: usize, offset: usize, ace_type: u32, who_length: usize) {
    tracing::trace!(
        target: WIRE_TARGET,
        index = index,
        offset = offset,
        ace_type = ace_type,
        who_length = who_length,
        "decode: entry"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_decode_entry(_index: usize, _offset: usize, _ace_type: u32, _who_length: usize) {}

/// Traces the outcome of a full decode.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_decode_complete(entries: usize, consumed: usize, len: usize) {
    tracing::debug!(
        target: WIRE_TARGET,
        entries = entries,
        consumed = consumed,
        len = len,
        "decode: complete"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_decode_complete(_entries: usize, _consumed: usize, _len: usize) {}

/// Traces a decode failure.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_decode_error(error: &crate::DecodeError) {
    tracing::debug!(target: WIRE_TARGET, error = %error, "decode: rejected");
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_decode_error(_error: &crate::DecodeError) {}

/// Traces an encode.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_encode(entries: usize, len: usize) {
    tracing::debug!(target: WIRE_TARGET, entries = entries, len = len, "encode: complete");
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_encode(_entries: usize, _len: usize) {}

/// Traces a bulk mask or flag mutation.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn trace_mutation(field: &str, op: &str, operand: u32, touched: usize) {
    tracing::debug!(
        target: ACL_TARGET,
        field = field,
        op = op,
        operand = format!("{operand:#010x}"),
        touched = touched,
        "mutation applied"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn trace_mutation(_field: &str, _op: &str, _operand: u32, _touched: usize) {}

/// Traces a raw attribute read or write.
#[cfg(all(feature = "tracing", feature = "xattr"))]
#[inline]
pub(crate) fn trace_xattr(action: &str, path: &std::path::Path, len: usize) {
    tracing::debug!(
        target: XATTR_TARGET,
        action = action,
        path = %path.display(),
        len = len,
        "system.nfs4_acl"
    );
}

/// No-op when tracing is disabled.
#[cfg(all(not(feature = "tracing"), feature = "xattr"))]
#[inline]
pub(crate) fn trace_xattr(_action: &str, _path: &std::path::Path, _len: usize) {}
