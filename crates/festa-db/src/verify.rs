//! Live-schema verification.
//!
//! Queries `information_schema` on a live database and compares what it
//! finds against the declared model. After the full migration chain has
//! run, the live schema must match [`festa_schema::app_schema`] exactly;
//! any drift comes back as a list of human-readable findings.

use std::collections::{BTreeMap, BTreeSet};

use festa_schema::{PgType, Schema, Table};
use tokio_postgres::Client;

use crate::{Error, Result};

/// Verify that the live schema matches the declared one.
///
/// Returns `Err(Error::SchemaMismatch)` listing every finding.
pub async fn verify_schema(client: &Client, schema: &Schema) -> Result<()> {
    let findings = diff_live(client, schema).await?;
    if findings.is_empty() {
        Ok(())
    } else {
        Err(Error::SchemaMismatch(findings.join("\n")))
    }
}

/// Compare the live schema against the declared one, returning findings.
pub async fn diff_live(client: &Client, schema: &Schema) -> Result<Vec<String>> {
    let mut findings = Vec::new();

    let live_tables = live_table_names(client).await?;
    for table in &schema.tables {
        if !live_tables.contains(&table.name) {
            findings.push(format!("missing table {}", table.name));
            continue;
        }
        check_columns(client, table, &mut findings).await?;
        check_foreign_keys(client, table, &mut findings).await?;
        check_uniques(client, table, &mut findings).await?;
    }

    let declared: BTreeSet<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
    for name in &live_tables {
        if !declared.contains(name.as_str()) {
            findings.push(format!("unexpected table {}", name));
        }
    }

    Ok(findings)
}

/// Base tables in the public schema, excluding the migrations tracker.
async fn live_table_names(client: &Client) -> Result<BTreeSet<String>> {
    let rows = client
        .query(
            r#"
            SELECT table_name
            FROM information_schema.tables
            WHERE table_schema = 'public'
              AND table_type = 'BASE TABLE'
              AND table_name NOT LIKE '\_festa\_%'
            ORDER BY table_name
            "#,
            &[],
        )
        .await?;
    Ok(rows.iter().map(|r| r.get(0)).collect())
}

/// The `udt_name` information_schema reports for a declared type.
fn expected_udt(pg_type: PgType) -> &'static str {
    match pg_type {
        PgType::SmallInt => "int2",
        PgType::Integer => "int4",
        // BIGSERIAL introspects as a bigint with a sequence default
        PgType::BigInt | PgType::BigSerial => "int8",
        PgType::Real => "float4",
        PgType::DoublePrecision => "float8",
        PgType::Boolean => "bool",
        PgType::Text => "text",
        PgType::Bytea => "bytea",
        PgType::Timestamptz => "timestamptz",
        PgType::Date => "date",
        PgType::Numeric { .. } => "numeric",
        PgType::Jsonb => "jsonb",
    }
}

async fn check_columns(client: &Client, table: &Table, findings: &mut Vec<String>) -> Result<()> {
    let rows = client
        .query(
            r#"
            SELECT column_name, udt_name, is_nullable
            FROM information_schema.columns
            WHERE table_schema = 'public' AND table_name = $1
            ORDER BY ordinal_position
            "#,
            &[&table.name],
        )
        .await?;

    let mut live: BTreeMap<String, (String, bool)> = BTreeMap::new();
    for row in rows {
        let name: String = row.get(0);
        let udt: String = row.get(1);
        let is_nullable: String = row.get(2);
        live.insert(name, (udt, is_nullable == "YES"));
    }

    for col in &table.columns {
        let Some((udt, nullable)) = live.get(&col.name) else {
            findings.push(format!("missing column {}.{}", table.name, col.name));
            continue;
        };
        let expected = expected_udt(col.pg_type);
        if udt != expected {
            findings.push(format!(
                "column {}.{} has type {}, expected {}",
                table.name, col.name, udt, expected
            ));
        }
        if *nullable != col.nullable {
            findings.push(format!(
                "column {}.{} nullability is {}, expected {}",
                table.name, col.name, nullable, col.nullable
            ));
        }
    }

    let declared: BTreeSet<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    for name in live.keys() {
        if !declared.contains(name.as_str()) {
            findings.push(format!("unexpected column {}.{}", table.name, name));
        }
    }

    Ok(())
}

async fn check_foreign_keys(
    client: &Client,
    table: &Table,
    findings: &mut Vec<String>,
) -> Result<()> {
    let rows = client
        .query(
            r#"
            SELECT kcu.column_name, ccu.table_name, rc.delete_rule
            FROM information_schema.table_constraints tc
            JOIN information_schema.key_column_usage kcu
              ON tc.constraint_name = kcu.constraint_name
             AND tc.table_schema = kcu.table_schema
            JOIN information_schema.constraint_column_usage ccu
              ON tc.constraint_name = ccu.constraint_name
             AND tc.table_schema = ccu.table_schema
            JOIN information_schema.referential_constraints rc
              ON tc.constraint_name = rc.constraint_name
             AND tc.table_schema = rc.constraint_schema
            WHERE tc.table_schema = 'public'
              AND tc.table_name = $1
              AND tc.constraint_type = 'FOREIGN KEY'
            "#,
            &[&table.name],
        )
        .await?;

    // column -> (referenced table, delete rule)
    let mut live: BTreeMap<String, (String, String)> = BTreeMap::new();
    for row in rows {
        let column: String = row.get(0);
        let references: String = row.get(1);
        let delete_rule: String = row.get(2);
        live.insert(column, (references, delete_rule));
    }

    for fk in &table.foreign_keys {
        let Some((references, delete_rule)) = live.get(&fk.column) else {
            findings.push(format!(
                "missing foreign key on {}.{}",
                table.name, fk.column
            ));
            continue;
        };
        if references != &fk.references_table {
            findings.push(format!(
                "foreign key {}.{} references {}, expected {}",
                table.name, fk.column, references, fk.references_table
            ));
        }
        let expected_rule = fk.on_delete.to_string();
        if delete_rule != &expected_rule {
            findings.push(format!(
                "foreign key {}.{} deletes with {}, expected {}",
                table.name, fk.column, delete_rule, expected_rule
            ));
        }
    }

    let declared: BTreeSet<&str> = table.foreign_keys.iter().map(|fk| fk.column.as_str()).collect();
    for column in live.keys() {
        if !declared.contains(column.as_str()) {
            findings.push(format!("unexpected foreign key on {}.{}", table.name, column));
        }
    }

    Ok(())
}

async fn check_uniques(client: &Client, table: &Table, findings: &mut Vec<String>) -> Result<()> {
    let rows = client
        .query(
            r#"
            SELECT tc.constraint_name, kcu.column_name, kcu.ordinal_position
            FROM information_schema.table_constraints tc
            JOIN information_schema.key_column_usage kcu
              ON tc.constraint_name = kcu.constraint_name
             AND tc.table_schema = kcu.table_schema
            WHERE tc.table_schema = 'public'
              AND tc.table_name = $1
              AND tc.constraint_type = 'UNIQUE'
            ORDER BY tc.constraint_name, kcu.ordinal_position
            "#,
            &[&table.name],
        )
        .await?;

    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for row in rows {
        let constraint: String = row.get(0);
        let column: String = row.get(1);
        grouped.entry(constraint).or_default().push(column);
    }
    let live: BTreeSet<Vec<String>> = grouped.into_values().collect();

    // Declared uniqueness: multi-column constraints plus single-column
    // UNIQUE markers. Names are not compared, only column sets.
    let mut declared: BTreeSet<Vec<String>> = table
        .uniques
        .iter()
        .map(|u| u.columns.clone())
        .collect();
    for col in &table.columns {
        if col.unique && !col.primary_key {
            declared.insert(vec![col.name.clone()]);
        }
    }

    for columns in &declared {
        if !live.contains(columns) {
            findings.push(format!(
                "missing unique constraint on {}({})",
                table.name,
                columns.join(", ")
            ));
        }
    }
    for columns in &live {
        if !declared.contains(columns) {
            findings.push(format!(
                "unexpected unique constraint on {}({})",
                table.name,
                columns.join(", ")
            ));
        }
    }

    Ok(())
}
