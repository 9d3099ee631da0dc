use crate::domain::model::Group;
use crate::utils::error::{Result, ToolboxError};
use chrono::NaiveDate;

pub const CSV_HEADER: [&str; 2] = ["Group Name", "Participant Name"];

/// One row per member, every field quoted.
pub fn groups_to_csv(groups: &[Group]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for group in groups {
        for member in &group.members {
            writer.write_record([group.name.as_str(), member.name.as_str()])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ToolboxError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ToolboxError::IoError(std::io::Error::other(e)))
}

/// Plain-text layout for pasting into chat or email.
pub fn groups_to_clipboard_text(groups: &[Group]) -> String {
    groups
        .iter()
        .map(|g| {
            let mut block = format!("--- {} ---", g.name);
            for member in &g.members {
                block.push_str("\n• ");
                block.push_str(&member.name);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("grouping_results_{}.csv", date.format("%Y-%m-%d"))
}
