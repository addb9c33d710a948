//! Handlers for filesystem path fields.

use crate::descriptor::{PathConstraint, PropertyDescriptor};
use crate::errors::MappingError;
use crate::value::Value;
use std::path::{Path, PathBuf};

/// Single path, checked against the declared constraints.
pub fn path(value: &str, desc: &PropertyDescriptor, key: &str) -> Result<Value, MappingError> {
    check_path(value, desc, key).map(Value::Path)
}

/// Delimiter-separated paths; every non-empty token is checked like [`path`].
pub fn list_of_path(
    value: &str,
    desc: &PropertyDescriptor,
    key: &str,
) -> Result<Value, MappingError> {
    let paths = commons::split_list(value, desc.get_delimiter())
        .iter()
        .map(|token| check_path(token, desc, key))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::ListOfPath(paths))
}

/// Validate the literal path against all declared constraints, in order.
pub fn check_path(
    value: &str,
    desc: &PropertyDescriptor,
    key: &str,
) -> Result<PathBuf, MappingError> {
    let path = PathBuf::from(value);
    for constraint in desc.path_constraints() {
        let satisfied = match constraint {
            PathConstraint::Directory => path.is_dir(),
            PathConstraint::File => path.is_file(),
            PathConstraint::Readable => has_access(&path, Access::Read),
            PathConstraint::Writable => has_access(&path, Access::Write),
        };
        if !satisfied {
            return Err(MappingError::InvalidPath {
                key: key.to_string(),
                path,
                constraint,
            });
        }
    }
    Ok(path)
}

#[derive(Clone, Copy, Debug)]
enum Access {
    Read,
    Write,
}

#[cfg(unix)]
fn has_access(path: &Path, access: Access) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = match CString::new(path.as_os_str().as_bytes()) {
        Ok(p) => p,
        Err(_) => return false,
    };
    let mode = match access {
        Access::Read => libc::R_OK,
        Access::Write => libc::W_OK,
    };
    access_ok(&c_path, mode)
}

/// Ask the kernel whether the real user may access `path` with `mode`.
///
/// Unlike permission bits, this honours ownership, ACLs and read-only mounts.
#[cfg(unix)]
fn access_ok(path: &std::ffi::CStr, mode: libc::c_int) -> bool {
    // SAFETY: `path` is borrowed as a NUL-terminated string for the whole
    // call and `access(2)` neither retains nor writes through the pointer.
    unsafe { libc::access(path.as_ptr(), mode) == 0 }
}

#[cfg(not(unix))]
fn has_access(path: &Path, access: Access) -> bool {
    match (std::fs::metadata(path), access) {
        (Ok(_), Access::Read) => true,
        (Ok(meta), Access::Write) => !meta.permissions().readonly(),
        (Err(_), _) => false,
    }
}
