//! Schema definition types and SQL rendering.
//!
//! Tables are declared as plain values, usually composed from the
//! capability mixins in [`crate::mixins`]:
//!
//! ```
//! use festa_schema::{Column, PgType, Table};
//!
//! let table = Table::new("tag").column(
//!     Column::new("id", PgType::BigSerial).primary_key(),
//! )
//! .column(Column::new("name", PgType::Text));
//!
//! assert!(table.to_create_table_sql().starts_with("CREATE TABLE \"tag\""));
//! ```

use crate::quote_ident;

/// Postgres column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgType {
    /// SMALLINT (2 bytes)
    SmallInt,
    /// INTEGER (4 bytes)
    Integer,
    /// BIGINT (8 bytes)
    BigInt,
    /// BIGSERIAL (auto-incrementing BIGINT)
    BigSerial,
    /// REAL (4 bytes floating point)
    Real,
    /// DOUBLE PRECISION (8 bytes floating point)
    DoublePrecision,
    /// BOOLEAN
    Boolean,
    /// TEXT
    Text,
    /// BYTEA (binary)
    Bytea,
    /// TIMESTAMPTZ
    Timestamptz,
    /// DATE
    Date,
    /// NUMERIC(precision, scale)
    Numeric { precision: u8, scale: u8 },
    /// JSONB
    Jsonb,
}

impl std::fmt::Display for PgType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PgType::SmallInt => write!(f, "SMALLINT"),
            PgType::Integer => write!(f, "INTEGER"),
            PgType::BigInt => write!(f, "BIGINT"),
            PgType::BigSerial => write!(f, "BIGSERIAL"),
            PgType::Real => write!(f, "REAL"),
            PgType::DoublePrecision => write!(f, "DOUBLE PRECISION"),
            PgType::Boolean => write!(f, "BOOLEAN"),
            PgType::Text => write!(f, "TEXT"),
            PgType::Bytea => write!(f, "BYTEA"),
            PgType::Timestamptz => write!(f, "TIMESTAMPTZ"),
            PgType::Date => write!(f, "DATE"),
            PgType::Numeric { precision, scale } => {
                write!(f, "NUMERIC({}, {})", precision, scale)
            }
            PgType::Jsonb => write!(f, "JSONB"),
        }
    }
}

/// Referential action taken when the referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Delete the dependent rows along with the referenced row.
    Cascade,
    /// Clear the referencing column instead of deleting the row.
    SetNull,
    /// Refuse to delete the referenced row while dependents exist.
    Restrict,
}

impl std::fmt::Display for OnDelete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnDelete::Cascade => write!(f, "CASCADE"),
            OnDelete::SetNull => write!(f, "SET NULL"),
            OnDelete::Restrict => write!(f, "RESTRICT"),
        }
    }
}

/// A database column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Postgres type
    pub pg_type: PgType,
    /// Whether the column allows NULL
    pub nullable: bool,
    /// Default value expression (if any)
    pub default: Option<String>,
    /// Whether this is a primary key
    pub primary_key: bool,
    /// Whether this has a single-column unique constraint
    pub unique: bool,
}

impl Column {
    /// A NOT NULL column with no default.
    pub fn new(name: &str, pg_type: PgType) -> Self {
        Self {
            name: name.to_string(),
            pg_type,
            nullable: false,
            default: None,
            primary_key: false,
            unique: false,
        }
    }

    /// Allow NULL.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Set a default value expression, e.g. `now()` or `0`.
    pub fn default_expr(mut self, expr: &str) -> Self {
        self.default = Some(expr.to_string());
        self
    }

    /// Mark as primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Add a single-column unique constraint.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// A single-column foreign key constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    /// Column in this table
    pub column: String,
    /// Referenced table
    pub references_table: String,
    /// Referenced column
    pub references_column: String,
    /// Action on deletion of the referenced row
    pub on_delete: OnDelete,
}

impl ForeignKey {
    /// Foreign key to `references_table.id`.
    pub fn new(column: &str, references_table: &str, on_delete: OnDelete) -> Self {
        Self {
            column: column.to_string(),
            references_table: references_table.to_string(),
            references_column: "id".to_string(),
            on_delete,
        }
    }

    /// Constraint name as rendered into SQL: `fk_<table>_<column>`.
    pub fn constraint_name(&self, table: &str) -> String {
        format!("fk_{}_{}", table, self.column)
    }
}

/// A named multi-column unique constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Unique {
    /// Constraint name
    pub name: String,
    /// Columns covered, in order
    pub columns: Vec<String>,
}

impl Unique {
    /// A unique constraint named `uq_<table>_<joined columns>`.
    pub fn over(table: &str, columns: &[&str]) -> Self {
        Self {
            name: format!("uq_{}_{}", table, columns.join("_")),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// A database table definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name (singular form)
    pub name: String,
    /// Columns
    pub columns: Vec<Column>,
    /// Foreign keys
    pub foreign_keys: Vec<ForeignKey>,
    /// Multi-column unique constraints
    pub uniques: Vec<Unique>,
}

impl Table {
    /// An empty table definition.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            uniques: Vec::new(),
        }
    }

    /// Append a column.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Append several columns.
    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Append a foreign key.
    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Append a multi-column unique constraint named after the table.
    pub fn unique_together(mut self, columns: &[&str]) -> Self {
        let unique = Unique::over(&self.name, columns);
        self.uniques.push(unique);
        self
    }

    /// Look up a column by name.
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up the foreign key on a column.
    pub fn find_foreign_key(&self, column: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| fk.column == column)
    }

    /// Generate the CREATE TABLE SQL statement.
    ///
    /// Foreign keys and multi-column uniques render as named table
    /// constraints so that introspection sees stable names.
    pub fn to_create_table_sql(&self) -> String {
        let mut sql = format!("CREATE TABLE {} (\n", quote_ident(&self.name));

        let mut defs: Vec<String> = self
            .columns
            .iter()
            .map(|col| {
                let mut def = format!("    {} {}", quote_ident(&col.name), col.pg_type);

                if col.primary_key {
                    def.push_str(" PRIMARY KEY");
                }

                // PK columns are implicitly NOT NULL
                if !col.nullable && !col.primary_key {
                    def.push_str(" NOT NULL");
                }

                if col.unique && !col.primary_key {
                    def.push_str(" UNIQUE");
                }

                if let Some(default) = &col.default {
                    def.push_str(&format!(" DEFAULT {}", default));
                }

                def
            })
            .collect();

        for unique in &self.uniques {
            let cols: Vec<String> = unique.columns.iter().map(|c| quote_ident(c)).collect();
            defs.push(format!(
                "    CONSTRAINT {} UNIQUE ({})",
                unique.name,
                cols.join(", ")
            ));
        }

        for fk in &self.foreign_keys {
            defs.push(format!(
                "    CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE {}",
                fk.constraint_name(&self.name),
                quote_ident(&fk.column),
                quote_ident(&fk.references_table),
                quote_ident(&fk.references_column),
                fk.on_delete
            ));
        }

        sql.push_str(&defs.join(",\n"));
        sql.push_str("\n);");
        sql
    }
}

/// A complete database schema.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Tables in the schema, ordered so that referenced tables come first.
    pub tables: Vec<Table>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Generate SQL to create all tables.
    ///
    /// Tables must already be ordered so that every foreign key target
    /// precedes its referrers; [`crate::app_schema`] guarantees this.
    pub fn to_sql(&self) -> String {
        let statements: Vec<String> = self.tables.iter().map(|t| t.to_create_table_sql()).collect();
        statements.join("\n\n")
    }
}
