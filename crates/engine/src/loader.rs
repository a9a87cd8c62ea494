//! Host function table validation
//!
//! The native bridge passes a [`HostFunctions`] table and the plugin data
//! directory on load. Required entries must be present; optional ones are
//! logged and degrade gracefully at the call site.

use std::ffi::{c_char, CStr};
use std::path::PathBuf;

use retakes_sdk::HostFunctions;

use crate::error::InterfaceError;
use crate::globals::EngineGlobals;

/// Validate the bridge's function table and build the engine globals
///
/// # Arguments
/// * `host` - Function table owned by the bridge
/// * `data_dir` - Null-terminated UTF-8 path of the plugin data directory
///
/// # Safety
/// `host` must point to a valid `HostFunctions` and `data_dir` must be a valid
/// null-terminated string. Both are read once; the pointers are not retained.
#[tracing::instrument(skip_all)]
pub unsafe fn load_host(
    host: *const HostFunctions,
    data_dir: *const c_char,
) -> Result<EngineGlobals, InterfaceError> {
    if host.is_null() {
        return Err(InterfaceError::MissingFunction("HostFunctions table"));
    }
    let host = *host;

    // Required functions - fail if any are missing
    if host.server_command.is_none() {
        return Err(InterfaceError::MissingFunction("server_command"));
    }
    if host.is_warmup_period.is_none() {
        return Err(InterfaceError::MissingFunction("is_warmup_period"));
    }
    if host.get_player.is_none() {
        return Err(InterfaceError::MissingFunction("get_player"));
    }

    // Optional functions - log but don't fail
    if host.client_print.is_none() {
        tracing::debug!("client_print: not available, replies go to the server log");
    }
    if host.get_module.is_none() {
        tracing::warn!("get_module: not available, signature scans will fail");
    }

    let data_dir = parse_data_dir(data_dir)?;
    tracing::info!("Plugin data directory: {}", data_dir.display());

    Ok(EngineGlobals::new(host, data_dir))
}

/// Convert the bridge's data directory string
///
/// # Safety
/// `data_dir` must be null or a valid null-terminated string
unsafe fn parse_data_dir(data_dir: *const c_char) -> Result<PathBuf, InterfaceError> {
    if data_dir.is_null() {
        return Err(InterfaceError::InvalidDataDir("null".into()));
    }

    let dir = CStr::from_ptr(data_dir)
        .to_str()
        .map_err(|_| InterfaceError::InvalidDataDir("not UTF-8".into()))?;

    if dir.is_empty() {
        return Err(InterfaceError::InvalidDataDir("empty".into()));
    }

    Ok(PathBuf::from(dir))
}

#[cfg(test)]
mod tests {
    use std::ffi::{c_int, CString};

    use retakes_sdk::RawPlayer;

    use super::*;

    unsafe extern "C" fn server_command(_command: *const c_char) {}
    unsafe extern "C" fn is_warmup_period() -> bool {
        true
    }
    unsafe extern "C" fn get_player(_slot: c_int, _out: *mut RawPlayer) -> bool {
        false
    }

    fn full_table() -> HostFunctions {
        HostFunctions {
            server_command: Some(server_command),
            client_print: None,
            is_warmup_period: Some(is_warmup_period),
            get_player: Some(get_player),
            get_module: None,
        }
    }

    #[test]
    fn test_load_host_ok() {
        let host = full_table();
        let dir = CString::new("/srv/cs2/addons/retakes").unwrap();

        let globals = unsafe { load_host(&host, dir.as_ptr()) }.unwrap();
        assert_eq!(globals.data_dir(), PathBuf::from("/srv/cs2/addons/retakes"));
        assert!(globals.is_warmup_period());
    }

    #[test]
    fn test_load_host_missing_required() {
        let mut host = full_table();
        host.get_player = None;
        let dir = CString::new("/tmp").unwrap();

        let err = unsafe { load_host(&host, dir.as_ptr()) }.err().unwrap();
        assert!(matches!(err, InterfaceError::MissingFunction("get_player")));
    }

    #[test]
    fn test_load_host_bad_data_dir() {
        let host = full_table();
        let empty = CString::new("").unwrap();

        assert!(unsafe { load_host(&host, empty.as_ptr()) }.is_err());
        assert!(unsafe { load_host(&host, std::ptr::null()) }.is_err());
        assert!(unsafe { load_host(std::ptr::null(), empty.as_ptr()) }.is_err());
    }
}
