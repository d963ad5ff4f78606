//! Migration registry and runner.
//!
//! Registered migrations form a single linear chain: every step names
//! the step it depends on, and the runner refuses a registry with
//! branches, gaps, or duplicate versions. Each step runs in its own
//! transaction together with its tracking-table insert, so a failing
//! step leaves no partial effect.

use tokio_postgres::{Client, Transaction};

use crate::{Error, MigrationFn, Result};

/// A registered migration.
pub struct Migration {
    /// Version string, e.g. "0004-create-attendance"
    pub version: &'static str,
    /// Short human name for logs and status output
    pub name: &'static str,
    /// Version of the step this one depends on; `None` only for the root
    pub depends_on: Option<&'static str>,
    /// The migration function
    pub run: MigrationFn,
}

/// Context passed to migration functions.
///
/// Wraps a database transaction, ensuring all migration operations are
/// atomic.
pub struct MigrationContext<'a> {
    tx: &'a Transaction<'a>,
}

impl<'a> MigrationContext<'a> {
    pub fn new(tx: &'a Transaction<'a>) -> Self {
        Self { tx }
    }

    /// Execute a SQL statement.
    pub async fn execute(&self, sql: &str) -> Result<u64> {
        Ok(self.tx.execute(sql, &[]).await?)
    }
}

/// Runs migrations against a database.
pub struct MigrationRunner<'a> {
    client: &'a mut Client,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(client: &'a mut Client) -> Self {
        Self { client }
    }

    /// Ensure the migrations tracking table exists.
    pub async fn init(&self) -> Result<()> {
        self.client
            .execute(
                "CREATE TABLE IF NOT EXISTS _festa_migrations (
                    version TEXT PRIMARY KEY,
                    applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
                )",
                &[],
            )
            .await?;
        Ok(())
    }

    /// Get all applied migration versions.
    pub async fn applied(&self) -> Result<Vec<String>> {
        let rows = self
            .client
            .query("SELECT version FROM _festa_migrations ORDER BY version", &[])
            .await?;
        Ok(rows.iter().map(|r| r.get(0)).collect())
    }

    /// All registered migrations, sorted by version, with the dependency
    /// linkage validated: exactly one root, and every other step must
    /// depend on its predecessor.
    pub fn chain() -> Result<Vec<&'static Migration>> {
        let mut migrations: Vec<_> = inventory::iter::<Migration>.into_iter().collect();
        migrations.sort_by_key(|m| m.version);

        let mut prev: Option<&'static Migration> = None;
        for migration in &migrations {
            if let Some(p) = prev
                && p.version == migration.version
            {
                return Err(Error::BrokenChain(format!(
                    "duplicate migration version {}",
                    migration.version
                )));
            }
            match (prev, migration.depends_on) {
                (None, None) => {}
                (None, Some(dep)) => {
                    return Err(Error::BrokenChain(format!(
                        "first migration {} depends on {}, which is not registered",
                        migration.version, dep
                    )));
                }
                (Some(p), Some(dep)) if dep == p.version => {}
                (Some(p), Some(dep)) => {
                    return Err(Error::BrokenChain(format!(
                        "{} depends on {}, expected {}",
                        migration.version, dep, p.version
                    )));
                }
                (Some(p), None) => {
                    return Err(Error::BrokenChain(format!(
                        "{} declares no dependency but follows {}",
                        migration.version, p.version
                    )));
                }
            }
            prev = Some(migration);
        }
        Ok(migrations)
    }

    /// Run all pending migrations in chain order.
    ///
    /// Each migration runs in its own transaction. If a migration fails,
    /// all its changes are rolled back and subsequent migrations are
    /// skipped.
    pub async fn migrate(&mut self) -> Result<Vec<&'static str>> {
        self.init().await?;
        let mut applied = self.applied().await?;
        let chain = Self::chain()?;

        let mut ran = Vec::new();
        for migration in chain {
            if applied.iter().any(|v| v == migration.version) {
                continue;
            }
            if let Some(dep) = migration.depends_on
                && !applied.iter().any(|v| v == dep)
            {
                return Err(Error::MissingDependency {
                    version: migration.version.to_string(),
                    depends_on: dep.to_string(),
                });
            }

            self.run_one(migration).await?;
            tracing::info!(version = migration.version, "applied migration");
            applied.push(migration.version.to_string());
            ran.push(migration.version);
        }

        Ok(ran)
    }

    /// Apply exactly one migration step.
    ///
    /// Rejects a step that has already been applied, and a step whose
    /// declared dependency has not been applied yet.
    pub async fn apply(&mut self, version: &str) -> Result<()> {
        self.init().await?;
        let applied = self.applied().await?;
        let chain = Self::chain()?;

        let migration = chain
            .into_iter()
            .find(|m| m.version == version)
            .ok_or_else(|| Error::UnknownMigration(version.to_string()))?;

        if applied.iter().any(|v| v == migration.version) {
            return Err(Error::AlreadyApplied {
                version: version.to_string(),
            });
        }
        if let Some(dep) = migration.depends_on
            && !applied.iter().any(|v| v == dep)
        {
            return Err(Error::MissingDependency {
                version: version.to_string(),
                depends_on: dep.to_string(),
            });
        }

        self.run_one(migration).await?;
        tracing::info!(version = migration.version, "applied migration");
        Ok(())
    }

    /// Run a single migration and record it, all in one transaction.
    async fn run_one(&mut self, migration: &'static Migration) -> Result<()> {
        let tx = self.client.transaction().await?;

        let mut ctx = MigrationContext::new(&tx);
        (migration.run)(&mut ctx).await?;

        // Record the migration as applied (inside the same transaction)
        tx.execute(
            "INSERT INTO _festa_migrations (version) VALUES ($1)",
            &[&migration.version],
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Get status of all migrations.
    pub async fn status(&self) -> Result<Vec<MigrationStatus>> {
        self.init().await?;
        let applied = self.applied().await?;

        Ok(Self::chain()?
            .into_iter()
            .map(|m| MigrationStatus {
                version: m.version,
                name: m.name,
                depends_on: m.depends_on,
                applied: applied.iter().any(|v| v == m.version),
            })
            .collect())
    }
}

/// Status of a single migration.
pub struct MigrationStatus {
    pub version: &'static str,
    pub name: &'static str,
    pub depends_on: Option<&'static str>,
    pub applied: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_a_single_linear_chain() {
        let chain = MigrationRunner::chain().expect("chain is valid");
        assert!(!chain.is_empty());
        assert_eq!(chain[0].depends_on, None);
        for pair in chain.windows(2) {
            assert_eq!(
                pair[1].depends_on,
                Some(pair[0].version),
                "{} must depend on {}",
                pair[1].version,
                pair[0].version
            );
        }
    }

    #[test]
    fn chain_starts_with_the_user_table() {
        let chain = MigrationRunner::chain().unwrap();
        assert_eq!(chain[0].version, "0001-create-user");
        assert_eq!(chain.len(), 12);
        assert_eq!(chain.last().unwrap().version, "0012-event-location-set-null");
    }
}
