//! Report upload policy: extension whitelist, count cap, version labels.

use crate::error::CoreError;

/// Default per-attachment upload cap. The live value comes from
/// configuration (`REPORT_MAX_UPLOADS`); this is only the fallback.
pub const DEFAULT_MAX_UPLOADS: u32 = 5;

/// Allowed report file extensions (lowercase, without the dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Validate a report file name against the extension whitelist.
pub fn validate_file_name(file_name: &str) -> Result<(), CoreError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "Unsupported report format; allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        ))),
    }
}

/// Guard the per-attachment upload cap.
pub fn check_upload_cap(existing_count: u32, max_uploads: u32) -> Result<(), CoreError> {
    if existing_count >= max_uploads {
        return Err(CoreError::Conflict(format!(
            "Maximum number of report uploads reached ({max_uploads})"
        )));
    }
    Ok(())
}

/// Compute the next auto-version label from the previous one.
///
/// Labels look like `Final v1.0`; a malformed or absent previous label
/// restarts the sequence at `Final v1.0`.
pub fn next_version(previous: Option<&str>) -> String {
    let next = previous
        .and_then(|label| label.rsplit_once('v'))
        .and_then(|(_, number)| number.trim().parse::<f64>().ok())
        .map(|version| version + 0.1);
    match next {
        Some(version) => format!("Final v{version:.1}"),
        None => "Final v1.0".to_string(),
    }
}
