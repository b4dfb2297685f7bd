use sqlx::{postgres::PgArguments, query::Query, Postgres};

/// A single column value carried by a partial update
#[derive(Debug, Clone, PartialEq)]
pub enum PatchValue {
    Text(String),
    Bool(bool),
}

impl From<String> for PatchValue {
    fn from(value: String) -> Self {
        PatchValue::Text(value)
    }
}

impl From<bool> for PatchValue {
    fn from(value: bool) -> Self {
        PatchValue::Bool(value)
    }
}

/// Ordered `(column, value)` assignments for an `UPDATE ... SET` clause.
///
/// Columns are only ever the `&'static str` names supplied by the update
/// inputs, never caller-provided text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    assignments: Vec<(&'static str, PatchValue)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `column = value` when `value` is present; absent fields are skipped.
    pub fn set<V: Into<PatchValue>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.assignments.push((column, value.into()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.assignments.iter().map(|(column, _)| *column).collect()
    }

    /// Render `col = $n, ...` starting at placeholder `$first_param`.
    pub fn set_clause(&self, first_param: usize) -> String {
        self.assignments
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ${}", column, first_param + i))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Bind every value in assignment order
    pub fn bind<'q>(
        self,
        mut query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        for (_, value) in self.assignments {
            query = match value {
                PatchValue::Text(s) => query.bind(s),
                PatchValue::Bool(b) => query.bind(b),
            };
        }
        query
    }
}
