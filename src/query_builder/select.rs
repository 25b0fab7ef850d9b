/// Fluent builder for `SELECT` statements.
///
/// ```rust
/// use simplesql::query_builder::SelectQuery;
///
/// let sql = SelectQuery::new("OrderModel")
///     .condition("name = 'a'")
///     .first(true)
///     .build();
/// assert_eq!(sql, "SELECT * FROM OrderModel WHERE name = 'a' LIMIT 1;");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectQuery {
    table: String,
    columns: Vec<String>,
    distinct: bool,
    order_by: Option<(String, bool)>,
    condition: Option<String>,
    first: bool,
}

impl SelectQuery {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Explicit column list; empty means `*`.
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// `ORDER BY column`, descending when `reverse`.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, reverse: bool) -> Self {
        self.order_by = Some((column.into(), reverse));
        self
    }

    /// Raw boolean expression for the `WHERE` clause.
    #[must_use]
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        let condition = condition.into();
        self.condition = (!condition.is_empty()).then_some(condition);
        self
    }

    /// Limit to one row.
    #[must_use]
    pub fn first(mut self, first: bool) -> Self {
        self.first = first;
        self
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.first
    }

    #[must_use]
    pub fn build(&self) -> String {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        if self.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.columns.join(", "));
        }
        sql.push_str(" FROM ");
        sql.push_str(&self.table);
        if let Some(condition) = &self.condition {
            sql.push_str(" WHERE ");
            sql.push_str(condition);
        }
        if let Some((column, reverse)) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(column);
            if *reverse {
                sql.push_str(" DESC");
            }
        }
        if self.first {
            sql.push_str(" LIMIT 1");
        }
        sql.push(';');
        sql
    }
}
