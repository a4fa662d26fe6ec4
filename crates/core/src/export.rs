//! Pure CSV formatting for logbook exports.
//!
//! The HTTP layer streams the returned string with a `text/csv` content
//! type; JSON exports go through serde directly and need no help here.

/// Column headers for a logbook CSV export, in display order.
pub const LOGBOOK_CSV_HEADERS: [&str; 8] = [
    "Date",
    "Department/Section",
    "Tasks",
    "Skills Learned",
    "Achievements",
    "Challenges",
    "Hours Worked",
    "Supervisor Comments",
];

/// One logbook entry flattened for CSV output.
#[derive(Debug, Clone)]
pub struct LogbookCsvRow {
    pub entry_date: String,
    pub department_section: String,
    pub tasks: String,
    pub skills_learned: String,
    pub achievements: String,
    pub challenges: String,
    pub hours_worked: String,
    pub supervisor_comments: String,
}

/// Render a full CSV document (header + rows, CRLF line endings).
pub fn logbook_csv(rows: &[LogbookCsvRow]) -> String {
    let mut out = String::new();
    write_record(&mut out, LOGBOOK_CSV_HEADERS.iter().copied());
    for row in rows {
        write_record(
            &mut out,
            [
                row.entry_date.as_str(),
                row.department_section.as_str(),
                row.tasks.as_str(),
                row.skills_learned.as_str(),
                row.achievements.as_str(),
                row.challenges.as_str(),
                row.hours_worked.as_str(),
                row.supervisor_comments.as_str(),
            ]
            .into_iter(),
        );
    }
    out
}

fn write_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape(field));
    }
    out.push_str("\r\n");
}

/// Quote a field when it contains a delimiter, quote, or newline; embedded
/// quotes are doubled per RFC 4180.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
