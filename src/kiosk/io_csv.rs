// Writing the CSV exports and checking them against a reference.

use chrono::NaiveDate;
use text_diff::print_diff;

use crate::kiosk::*;

/// `election_tally_<YYYY-MM-DD>.csv`, with the date of the export.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("election_tally_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the export in the output directory and returns its path.
pub fn write_export(out_dir: &Path, date: NaiveDate, content: &str) -> KResult<PathBuf> {
    let path = out_dir.join(export_file_name(date));
    let path_s = path.display().to_string();
    fs::create_dir_all(out_dir).context(WritingFileSnafu { path: path_s.clone() })?;
    fs::write(&path, content).context(WritingFileSnafu { path: path_s })?;
    info!("Exported {} ({})", path.display(), CSV_MIME_TYPE);
    Ok(path)
}

/// Compares an export with a reference file, ignoring trailing newlines.
/// The differences are printed when they do not match.
pub fn check_reference(reference_path: &str, content: &str) -> KResult<bool> {
    let reference = fs::read_to_string(reference_path).context(OpeningReferenceSnafu {
        path: reference_path,
    })?;
    let reference = reference.replace("\r\n", "\n");
    let expected = reference.trim_end_matches('\n');
    if expected == content {
        debug!("export matches reference {}", reference_path);
        return Ok(true);
    }
    warn!("Found differences with the reference file {}", reference_path);
    print_diff(expected, content, "\n");
    Ok(false)
}
