//! Schema reader: drives an adapter over every table

use crate::adapter::{CatalogAdapter, FetchError};
use schemaviz_core::{SchemaSnapshot, Table};

/// Read every table and its columns through `adapter`
///
/// Tables are described one at a time in the order the adapter listed them.
/// The first failure aborts the read; nothing is retried.
pub async fn read_schema(adapter: &dyn CatalogAdapter) -> Result<SchemaSnapshot, FetchError> {
    let table_names = adapter.list_tables().await?;

    tracing::info!(
        adapter = adapter.name(),
        count = table_names.len(),
        "Found tables: {:?}",
        table_names
    );

    let mut snapshot = SchemaSnapshot::new();

    for name in table_names {
        let columns = adapter.describe_table(&name).await?;
        tracing::debug!(table = %name, columns = columns.len(), "described table");
        for column in &columns {
            tracing::trace!(
                table = %name,
                column = %column.name,
                column_type = %column.column_type,
                key = %column.key,
                "column"
            );
        }
        snapshot.push(Table::new(name, columns));
    }

    tracing::info!(
        tables = snapshot.len(),
        columns = snapshot.column_count(),
        "Schema read"
    );

    Ok(snapshot)
}
