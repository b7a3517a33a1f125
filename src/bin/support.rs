//! Glue shared by the `nfs4_getfacl` and `nfs4_setfacl` binaries.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

/// Collects `args`, runs `entry`, flushes both handles, and maps the status.
pub(crate) fn dispatch<I, Out, Err, Run, Map>(
    args: I,
    stdout: &mut Out,
    stderr: &mut Err,
    entry: Run,
    map_status: Map,
) -> ExitCode
where
    I: IntoIterator,
    I::Item: Into<OsString>,
    Out: Write,
    Err: Write,
    Run: FnOnce(Vec<OsString>, &mut Out, &mut Err) -> i32,
    Map: FnOnce(i32) -> ExitCode,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let status = entry(args, stdout, stderr);
    let _ = stdout.flush();
    let _ = stderr.flush();
    map_status(status)
}
