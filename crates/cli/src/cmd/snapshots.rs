//! List snapshot containers

use crate::session::Session;
use crate::util;
use anyhow::Result;
use jule_core::store::relative_path;
use jule_core::{Record, Value};
use jule_timeline::{discover, label_filter};

pub async fn run(session: &Session, label: Option<String>) -> Result<()> {
    let data_dir = session.data_dir()?;
    let filter = label.map(label_filter);
    let found = discover(&data_dir, filter.as_deref())?;

    let rows = found
        .iter()
        .map(|snapshot| {
            let mut row = Record::new();
            row.insert(
                "file".to_string(),
                Value::from(relative_path(&snapshot.path, &data_dir).display().to_string()),
            );
            row.insert(
                "date".to_string(),
                Value::from(util::format_timestamp(snapshot.metadata.datetime())),
            );
            row.insert("label".to_string(), Value::from(snapshot.metadata.label.clone()));
            row.insert(
                "entries".to_string(),
                snapshot
                    .metadata
                    .entries_count
                    .map_or(Value::Null, |count| Value::Int(count as i64)),
            );
            row.insert("size".to_string(), Value::from(util::format_size(snapshot.size)));
            row
        })
        .collect();

    session.emit(rows)
}
