//! Detection of environments without a display server.

/// Why the current process cannot reach a display, if it cannot.
///
/// On X11/Wayland platforms a display is only reachable through `DISPLAY` or
/// `WAYLAND_DISPLAY`. Other platforms always report a display and leave the
/// final word to the capture backend.
pub fn headless_reason() -> Option<String> {
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        reason_from_env(
            std::env::var_os("DISPLAY").as_deref(),
            std::env::var_os("WAYLAND_DISPLAY").as_deref(),
        )
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    {
        None
    }
}

#[cfg_attr(not(all(unix, not(target_os = "macos"))), allow(dead_code))]
fn reason_from_env(
    display: Option<&std::ffi::OsStr>,
    wayland_display: Option<&std::ffi::OsStr>,
) -> Option<String> {
    let set = |value: Option<&std::ffi::OsStr>| value.is_some_and(|v| !v.is_empty());
    if set(display) || set(wayland_display) {
        None
    } else {
        Some("neither DISPLAY nor WAYLAND_DISPLAY is set".to_string())
    }
}
