//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Snippet rows (`Snippet`, bincode-encoded), keyed by hyphenated UUID.
pub const SNIPPETS: TableDefinition<&str, &[u8]> = TableDefinition::new("snippets");
