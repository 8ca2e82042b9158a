//! Statement construction for authorized mutations.
//!
//! Updates and deletes of categories and items are built here as a
//! [`Statement`]: SQL text plus its ordered parameter list. Each builder has
//! two named branches:
//!
//! - `admin_*`: the administrator key was presented, so the `WHERE` clause
//!   matches on the identifier only
//! - `owner_*`: the `WHERE` clause also requires `secret_key = <confirm key>`
//!
//! An update always assigns `secret_key`, either to a replacement key or to
//! itself, so the column list never depends on what the caller submitted.

use whereisit_core::{Authorization, KeyUpdate, UpdateDecision};

/// A bound statement parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Int(i32),
    Text(String),
    NullableText(Option<String>),
    IntArray(Vec<i32>),
}

impl From<i32> for Param {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Option<String>> for Param {
    fn from(value: Option<String>) -> Self {
        Self::NullableText(value)
    }
}

impl From<Vec<i32>> for Param {
    fn from(value: Vec<i32>) -> Self {
        Self::IntArray(value)
    }
}

/// SQL text with its positional parameters (`$1`, `$2`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    sql: String,
    params: Vec<Param>,
}

impl Statement {
    /// Start a statement with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter. The SQL must already reference it by position.
    pub fn bind(mut self, param: impl Into<Param>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Record a parameter and return its placeholder.
    fn placeholder(&mut self, param: impl Into<Param>) -> String {
        self.params.push(param.into());
        format!("${}", self.params.len())
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

/// Tables that carry a secret key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyedTable {
    Categories,
    Items,
}

impl KeyedTable {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Items => "items",
        }
    }

    pub const fn id_column(self) -> &'static str {
        match self {
            Self::Categories => "category_id",
            Self::Items => "item_id",
        }
    }
}

/// Builder for `UPDATE <table> SET ... WHERE <id> = ... [AND secret_key = ...]`.
#[derive(Debug, Clone)]
pub struct AuthorizedUpdate {
    table: KeyedTable,
    id: i32,
    assignments: Vec<(&'static str, Param)>,
}

impl AuthorizedUpdate {
    pub fn new(table: KeyedTable, id: i32) -> Self {
        Self {
            table,
            id,
            assignments: Vec::new(),
        }
    }

    /// Assign a column. `secret_key` is handled by the key update and must
    /// not be passed here.
    pub fn set(mut self, column: &'static str, value: impl Into<Param>) -> Self {
        debug_assert_ne!(column, "secret_key");
        self.assignments.push((column, value.into()));
        self
    }

    /// Pick the branch the decision calls for.
    pub fn build(self, decision: &UpdateDecision) -> Statement {
        match &decision.authorization {
            Authorization::Admin => self.admin_update(&decision.key_update),
            Authorization::Owner { confirm_key } => {
                self.owner_update(&decision.key_update, confirm_key)
            }
        }
    }

    /// Update matching on the identifier only.
    pub fn admin_update(self, key_update: &KeyUpdate) -> Statement {
        let (id_column, id) = (self.table.id_column(), self.id);
        let mut statement = self.set_clause(key_update);
        let id_placeholder = statement.placeholder(id);
        statement
            .sql
            .push_str(&format!(" WHERE {} = {}", id_column, id_placeholder));
        statement
    }

    /// Update matching on the identifier and the stored secret key.
    pub fn owner_update(self, key_update: &KeyUpdate, confirm_key: &str) -> Statement {
        let (id_column, id) = (self.table.id_column(), self.id);
        let mut statement = self.set_clause(key_update);
        let id_placeholder = statement.placeholder(id);
        let key_placeholder = statement.placeholder(confirm_key);
        statement.sql.push_str(&format!(
            " WHERE {} = {} AND secret_key = {}",
            id_column, id_placeholder, key_placeholder
        ));
        statement
    }

    /// `UPDATE <table> SET ...` shared by both branches.
    fn set_clause(self, key_update: &KeyUpdate) -> Statement {
        let mut statement = Statement::new(format!("UPDATE {} SET ", self.table.name()));
        let mut columns = Vec::with_capacity(self.assignments.len() + 1);

        for (column, value) in self.assignments {
            let placeholder = statement.placeholder(value);
            columns.push(format!("{} = {}", column, placeholder));
        }

        match key_update {
            KeyUpdate::Keep => columns.push("secret_key = secret_key".to_string()),
            KeyUpdate::Replace(key) => {
                let placeholder = statement.placeholder(key.as_str());
                columns.push(format!("secret_key = {}", placeholder));
            }
        }

        statement.sql.push_str(&columns.join(", "));
        statement
    }
}

/// Builder for `DELETE FROM <table> WHERE <id> = ... [AND secret_key = ...]`.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizedDelete {
    table: KeyedTable,
    id: i32,
}

impl AuthorizedDelete {
    pub fn new(table: KeyedTable, id: i32) -> Self {
        Self { table, id }
    }

    pub fn build(self, authorization: &Authorization) -> Statement {
        match authorization {
            Authorization::Admin => self.admin_delete(),
            Authorization::Owner { confirm_key } => self.owner_delete(confirm_key),
        }
    }

    /// Delete matching on the identifier only.
    pub fn admin_delete(self) -> Statement {
        Statement::new(format!(
            "DELETE FROM {} WHERE {} = $1",
            self.table.name(),
            self.table.id_column()
        ))
        .bind(self.id)
    }

    /// Delete matching on the identifier and the stored secret key.
    pub fn owner_delete(self, confirm_key: &str) -> Statement {
        Statement::new(format!(
            "DELETE FROM {} WHERE {} = $1 AND secret_key = $2",
            self.table.name(),
            self.table.id_column()
        ))
        .bind(self.id)
        .bind(confirm_key)
    }
}
