use chrono::DateTime;

use crate::types::VideoRecord;

/// `<username>_<YYYY-MM-DD>_<id>.mp4`, with the date taken in UTC so the
/// same video maps to the same name on every machine.
pub fn generate_filename(username: &str, create_time: i64, id: &str) -> String {
    let date = DateTime::from_timestamp(create_time, 0).map_or_else(
        || "0000-00-00".to_string(),
        |dt| dt.format("%Y-%m-%d").to_string()
    );
    format!("{username}_{date}_{id}.mp4")
}

pub fn filename_for(record: &VideoRecord) -> String {
    generate_filename(record.username(), record.create_time, &record.id)
}
