//! List registered plugins

use crate::session::Session;
use anyhow::Result;
use jule_core::{Record, Value};

pub async fn run(session: &Session) -> Result<()> {
    let rows = session
        .registry
        .iter()
        .map(|plugin| {
            let query_sets: Vec<String> = plugin.query_sets().into_iter().map(|q| q.label).collect();
            let mut row = Record::new();
            row.insert("name".to_string(), Value::from(plugin.name()));
            row.insert("version".to_string(), Value::from(plugin.version()));
            row.insert("query_sets".to_string(), Value::from(query_sets.join(", ")));
            row.insert(
                "properties".to_string(),
                Value::from(plugin.extractor().property_names().join(", ")),
            );
            row.insert(
                "active".to_string(),
                Value::from(if plugin.name() == session.plugin.name() { "yes" } else { "" }),
            );
            row
        })
        .collect();

    session.emit(rows)
}
