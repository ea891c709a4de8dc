//! The binary takes no flags. `-h`/`--help` anywhere prints the usage line; anything else is
//! ignored.
use std::ffi::OsStr;

pub const USAGE: &str = "Usage: <JSON TARGETS GENERATOR> | load-ramp";

pub fn wants_help<I, T>(args: I) -> bool
where
    I: IntoIterator<Item = T>,
    T: AsRef<OsStr>,
{
    args.into_iter()
        .any(|arg| matches!(arg.as_ref().to_str(), Some("-h" | "--help")))
}
