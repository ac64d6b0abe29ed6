//! Turning positional arguments into a [`CaptureRequest`].

use std::fmt;

use super::formats::FormatRegistry;
use super::types::{CaptureRequest, MAX_DELAY_MS};

/// Base name used when none is provided.
pub const DEFAULT_FILE_NAME_BASE: &str = "screenshot";

/// Delay used when none (or an invalid one) is provided.
pub const DEFAULT_DELAY_MS: u64 = 2500;

/// Fallback values applied while resolving a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDefaults {
    pub file_name_base: String,
    /// Resolved against the registry; not necessarily supported itself.
    pub preferred_format: String,
    pub delay_ms: u64,
}

impl Default for CaptureDefaults {
    fn default() -> Self {
        Self {
            file_name_base: DEFAULT_FILE_NAME_BASE.to_string(),
            preferred_format: super::formats::PREFERRED_FORMAT.to_string(),
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

/// Something was missing or invalid and a default took its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Fewer than two positional arguments; both name and format defaulted.
    UsageDefaults,
    /// Requested format has no encoder.
    FormatSubstituted { requested: String, used: String },
    /// Delay argument was not an integer.
    InvalidDelay { value: String, used: u64 },
    /// Delay argument was outside `0..=MAX_DELAY_MS`.
    DelayOutOfRange { value: i64, used: u64 },
}

impl Notice {
    /// Whether this notice should be reported on standard error.
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::InvalidDelay { .. } | Self::DelayOutOfRange { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsageDefaults => write!(f, "file name and format not both given; using defaults"),
            Self::FormatSubstituted { requested, used } => {
                write!(f, "format '{requested}' is not supported; using '{used}'")
            }
            Self::InvalidDelay { value, used } => write!(
                f,
                "{value} is not a valid number of milliseconds for a delay; using {used}"
            ),
            Self::DelayOutOfRange { value, used } => write!(
                f,
                "Specified delay of {value} is NOT between 0 and {MAX_DELAY_MS} ms; setting to {used}"
            ),
        }
    }
}

/// A resolved request plus every defaulting decision taken along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub request: CaptureRequest,
    pub notices: Vec<Notice>,
}

impl ResolvedRequest {
    pub fn shows_usage(&self) -> bool {
        self.notices.contains(&Notice::UsageDefaults)
    }
}

/// Resolve `<file_name_base> <file_format> [delay_ms]`.
///
/// Name and format are only honoured together; with fewer than two arguments
/// both fall back to `defaults`. An unsupported format silently becomes the
/// default format. A delay that does not parse, or lies outside
/// `0..=MAX_DELAY_MS`, falls back to `defaults.delay_ms`.
pub fn resolve_request<S: AsRef<str>>(
    args: &[S],
    registry: &FormatRegistry,
    defaults: &CaptureDefaults,
) -> ResolvedRequest {
    let mut notices = Vec::new();
    let default_format = registry
        .preferred_or_default(&defaults.preferred_format)
        .to_string();

    let (file_name_base, format) = match args {
        [base, format, ..] => {
            let requested = format.as_ref();
            let format = if registry.is_supported(requested) {
                requested.to_string()
            } else {
                notices.push(Notice::FormatSubstituted {
                    requested: requested.to_string(),
                    used: default_format.clone(),
                });
                default_format
            };
            (base.as_ref().to_string(), format)
        }
        _ => {
            notices.push(Notice::UsageDefaults);
            (defaults.file_name_base.clone(), default_format)
        }
    };

    let delay_ms = match args.get(2) {
        Some(raw) => match parse_delay(raw.as_ref(), defaults.delay_ms) {
            Ok(delay) => delay,
            Err(notice) => {
                notices.push(notice);
                defaults.delay_ms
            }
        },
        None => defaults.delay_ms,
    };

    ResolvedRequest {
        request: CaptureRequest {
            file_name_base,
            format,
            delay_ms,
        },
        notices,
    }
}

fn parse_delay(raw: &str, fallback: u64) -> Result<u64, Notice> {
    let value: i64 = raw.trim().parse().map_err(|_| Notice::InvalidDelay {
        value: raw.to_string(),
        used: fallback,
    })?;

    u64::try_from(value)
        .ok()
        .filter(|delay| *delay <= MAX_DELAY_MS)
        .ok_or(Notice::DelayOutOfRange {
            value,
            used: fallback,
        })
}

/// Help text printed when name and format were not both supplied.
pub fn usage_message(program: &str, registry: &FormatRegistry, defaults: &CaptureDefaults) -> String {
    let default_format = registry.preferred_or_default(&defaults.preferred_format);
    format!(
        "If specified arguments are to be used, both must be specified.\n\
         \n\
         Because either file name or file format was not specified, defaults are used for both \
         ('{base}' for the generated base filename of file format {default_format} with delay of {delay}).\n\
         \n\
         To explicitly specify them, provide them as command-line arguments:\n\
         \x20    {program} <file_name_base> <file_format> <delay_ms>\n\
         \n\
         where file_name_base is name of generated image file without its suffix \
         and file_format is the image format ({formats}).",
        base = defaults.file_name_base,
        delay = defaults.delay_ms,
        formats = registry.formats().join(", "),
    )
}
