// ABOUTME: Export orchestrator: full schema pass, then full copy pass, one transaction
// ABOUTME: The sole public entry point for converting a source database to SQLite

pub mod copy;
pub mod schema;

use rusqlite::Connection;

use crate::error::Result;
use crate::source::SourceDatabase;

/// Exports an opened source database into an SQLite connection.
///
/// The whole export runs inside a single transaction: on success the
/// destination holds one fully populated table per source table, on failure
/// the transaction is rolled back and the destination is left untouched.
pub struct Exporter<S> {
    source: S,
}

impl<S: SourceDatabase> Exporter<S> {
    /// Create an exporter over an already-opened source database. The source
    /// is not opened or closed here; that stays with the caller.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Run the export: create every table, copy every row, commit.
    ///
    /// The destination is expected to be empty; a pre-existing table with a
    /// conflicting name surfaces as a destination error. Any error rolls the
    /// transaction back explicitly and propagates unchanged.
    pub fn export(&self, dest: &mut Connection) -> Result<()> {
        let tx = dest.transaction()?;

        match self.run(&tx) {
            Ok(()) => {
                tx.commit()?;
                tracing::info!("Export committed");
                Ok(())
            }
            Err(err) => {
                tx.rollback()?;
                Err(err)
            }
        }
    }

    fn run(&self, tx: &Connection) -> Result<()> {
        let names = self.source.table_names()?;
        tracing::info!("Exporting {} tables", names.len());

        // Schema for every table first, so an unsupported column anywhere in
        // the database fails the export before a single row is written.
        for name in &names {
            let table = self.source.table(name)?;
            schema::create_table(tx, &*table)?;
        }

        for name in &names {
            let mut table = self.source.table(name)?;
            copy::populate_table(tx, &mut *table)?;
        }

        Ok(())
    }
}
