use crate::core::index::ResourceIndex;
use crate::core::storage::{resolve_kind, translate_storage, Storage};
use crate::domain::model::{EntryOutput, ResourceId, SortOrder};
use crate::utils::error::{ArkError, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

const NO_TAGS: &str = "NO_TAGS";
const NO_SCORE: &str = "NO_SCORE";
const DATETIME_FORMAT: &str = "%b %e %H:%M %Y";

pub struct ListOptions {
    pub entry: EntryOutput,
    pub modified: bool,
    pub tags: bool,
    pub scores: bool,
    pub sort: Option<SortOrder>,
    pub filter: Option<String>,
}

/// `--entry` 與舊式 `--entry-id`/`--entry-path` 旗標只能擇一
pub fn resolve_entry_output(
    entry: Option<EntryOutput>,
    entry_id: bool,
    entry_path: bool,
) -> Result<EntryOutput> {
    match (entry, entry_id, entry_path) {
        (Some(e), false, false) => Ok(e),
        (None, true, false) => Ok(EntryOutput::Id),
        (None, false, true) => Ok(EntryOutput::Path),
        (None, true, true) => Ok(EntryOutput::Both),
        (None, false, false) => Ok(EntryOutput::Link),
        _ => Err(ArkError::ConflictingEntryFlags),
    }
}

struct EntryRow {
    path: Option<String>,
    id: Option<ResourceId>,
    content: Option<String>,
    tags: Option<Vec<String>>,
    score: Option<u32>,
    datetime: Option<String>,
}

/// Render the root's resources as aligned columns. Which columns show up
/// depends on the requested entry output and the tag/score/modified flags.
pub fn run_list(root: &Path, options: &ListOptions) -> Result<String> {
    let index = ResourceIndex::provide(root)?;
    let tag_storage = open_optional_storage(root, "tags", options.tags)?;
    let score_storage = open_optional_storage(root, "scores", options.scores)?;

    let mut rows: Vec<EntryRow> = Vec::new();
    for (path, entry) in index.entries() {
        let tags = tag_storage.as_ref().map(|storage| {
            storage.read(entry.id).map_or(vec![], |value| {
                value.split(',').map(|t| t.trim().to_string()).collect()
            })
        });
        let score = score_storage.as_ref().map(|storage| {
            storage
                .read(entry.id)
                .map_or(0, |value| value.parse::<u32>().unwrap_or(0))
        });
        let datetime = options.modified.then(|| {
            DateTime::<Utc>::from(entry.modified).format(DATETIME_FORMAT).to_string()
        });

        let (path_out, id_out, content) = match options.entry {
            EntryOutput::Both => (Some(path.display().to_string()), Some(entry.id), None),
            EntryOutput::Path => (Some(path.display().to_string()), None, None),
            EntryOutput::Id => (None, Some(entry.id), None),
            EntryOutput::Link => match fs::read_to_string(root.join(path)) {
                Ok(contents) => (None, None, Some(contents)),
                // 讀不到的項目直接略過
                Err(_) => continue,
            },
        };

        rows.push(EntryRow {
            path: path_out,
            id: id_out,
            content,
            tags,
            score,
            datetime,
        });
    }

    match options.sort {
        Some(SortOrder::Asc) => rows.sort_by(|a, b| a.datetime.cmp(&b.datetime)),
        Some(SortOrder::Desc) => rows.sort_by(|a, b| b.datetime.cmp(&a.datetime)),
        None => {}
    }

    if let Some(filter) = &options.filter {
        rows.retain(|row| {
            row.tags
                .as_ref()
                .map(|tags| tags.contains(filter))
                .unwrap_or(false)
        });
    }

    Ok(format_rows(&rows))
}

fn open_optional_storage(root: &Path, name: &str, wanted: bool) -> Result<Option<Storage>> {
    if !wanted {
        return Ok(None);
    }
    let (path, known) = translate_storage(Some(root), name)?;
    let kind = resolve_kind(&path, None, known);
    Ok(Some(Storage::open(path, kind)?))
}

fn format_rows(rows: &[EntryRow]) -> String {
    let longest_content = rows
        .iter()
        .map(|row| row.content.as_deref().map_or(0, str::len))
        .max()
        .unwrap_or(0);
    let longest_path = rows
        .iter()
        .map(|row| row.path.as_deref().map_or(0, str::len))
        .max()
        .unwrap_or(0);
    let longest_id = rows
        .iter()
        .map(|row| row.id.map_or(0, |id| id.to_string().len()))
        .max()
        .unwrap_or(0);
    let longest_tags = rows
        .iter()
        .map(|row| row.tags.as_ref().map_or(0, |tags| tags_text(tags).len()))
        .max()
        .unwrap_or(0);
    let longest_score = rows
        .iter()
        .map(|row| row.score.map_or(0, |score| score_text(score).len()))
        .max()
        .unwrap_or(0);
    let longest_datetime = rows
        .iter()
        .map(|row| row.datetime.as_deref().map_or(0, str::len))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for row in rows {
        if let Some(content) = &row.content {
            out.push_str(&format!("{:width$} ", content, width = longest_content));
        }
        if let Some(path) = &row.path {
            out.push_str(&format!("{:width$} ", path, width = longest_path));
        }
        if let Some(id) = row.id {
            out.push_str(&format!("{:width$} ", id.to_string(), width = longest_id));
        }
        if let Some(tags) = &row.tags {
            out.push_str(&format!("{:width$} ", tags_text(tags), width = longest_tags));
        }
        if let Some(score) = row.score {
            out.push_str(&format!("{:width$} ", score_text(score), width = longest_score));
        }
        if let Some(datetime) = &row.datetime {
            out.push_str(&format!("{:width$} ", datetime, width = longest_datetime));
        }
        out.push('\n');
    }
    out
}

fn tags_text(tags: &[String]) -> String {
    if tags.is_empty() {
        NO_TAGS.to_string()
    } else {
        tags.join(", ")
    }
}

fn score_text(score: u32) -> String {
    if score == 0 {
        NO_SCORE.to_string()
    } else {
        score.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_entry_output_flag_combinations() {
        assert_eq!(
            resolve_entry_output(Some(EntryOutput::Path), false, false).unwrap(),
            EntryOutput::Path
        );
        assert_eq!(
            resolve_entry_output(None, true, false).unwrap(),
            EntryOutput::Id
        );
        assert_eq!(
            resolve_entry_output(None, false, true).unwrap(),
            EntryOutput::Path
        );
        assert_eq!(
            resolve_entry_output(None, true, true).unwrap(),
            EntryOutput::Both
        );
        assert_eq!(
            resolve_entry_output(None, false, false).unwrap(),
            EntryOutput::Link
        );
    }

    #[test]
    fn test_resolve_entry_output_rejects_mixed_flags() {
        let result = resolve_entry_output(Some(EntryOutput::Id), true, false);
        assert!(matches!(result, Err(ArkError::ConflictingEntryFlags)));

        let result = resolve_entry_output(Some(EntryOutput::Id), false, true);
        assert!(matches!(result, Err(ArkError::ConflictingEntryFlags)));
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(tags_text(&[]), "NO_TAGS");
        assert_eq!(
            tags_text(&["red".to_string(), "blue".to_string()]),
            "red, blue"
        );
        assert_eq!(score_text(0), "NO_SCORE");
        assert_eq!(score_text(7), "7");
    }

    #[test]
    fn test_format_rows_aligns_columns() {
        let id = ResourceId {
            data_size: 10,
            hash: 42,
        };
        let rows = vec![
            EntryRow {
                path: Some("a.txt".to_string()),
                id: Some(id),
                content: None,
                tags: Some(vec!["red".to_string()]),
                score: None,
                datetime: None,
            },
            EntryRow {
                path: Some("much/longer/path.txt".to_string()),
                id: Some(id),
                content: None,
                tags: Some(vec![]),
                score: None,
                datetime: None,
            },
        ];

        let out = format_rows(&rows);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        // both paths padded to the longest one
        assert!(lines[0].starts_with("a.txt                "));
        assert!(lines[0].contains("10-42"));
        assert!(lines[0].contains("red"));
        assert!(lines[1].contains("NO_TAGS"));
    }
}
