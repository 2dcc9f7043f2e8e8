//! SELECT and COUNT statement builder for keyset pages.

use seekpage::{CountQuery, FindQuery, Order, Predicate, Value};

use crate::dialect::{Dialect, Postgres, Sqlite};
use crate::error::SqlError;
use crate::render::{Scope, render_order, render_predicate};
use crate::validate::check_identifier;

/// A rendered statement with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    /// Statement text with dialect placeholders.
    pub sql: String,
    /// Parameter values, first placeholder first.
    pub params: Vec<Value>,
}

/// A `LEFT JOIN` of an associated table under an alias.
///
/// Selected join columns come back labelled `alias.column`, which is how
/// adapters rebuild the nested association for [`seekpage::Record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    table: String,
    alias: String,
    on_column: String,
    base_column: String,
    columns: Vec<String>,
}

impl Join {
    /// Join `table` as `alias` on `alias.on_column = base.base_column`.
    pub fn new(
        table: impl Into<String>,
        alias: impl Into<String>,
        on_column: impl Into<String>,
        base_column: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            alias: alias.into(),
            on_column: on_column.into(),
            base_column: base_column.into(),
            columns: Vec::new(),
        }
    }

    /// Columns of the joined table to select.
    #[must_use]
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| (*c).to_string()).collect();
        self
    }

    /// Join alias.
    pub fn alias(&self) -> &str {
        &self.alias
    }
}

/// Builder for the statements a keyset page needs.
///
/// ```
/// use seekpage::{Order, OrderTerm, Value};
/// use seekpage_sql::SelectBuilder;
///
/// let query = SelectBuilder::postgres("tests")
///     .columns(&["id", "counter"])
///     .order(Order::new(vec![OrderTerm::desc("counter"), OrderTerm::asc("id")]))
///     .limit(3)
///     .build()
///     .unwrap();
/// assert_eq!(
///     query.sql,
///     r#"SELECT "tests"."id", "tests"."counter" FROM "tests" ORDER BY "tests"."counter" DESC, "tests"."id" ASC LIMIT 3"#
/// );
/// assert!(query.params.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SelectBuilder<D: Dialect> {
    dialect: D,
    table: String,
    columns: Vec<String>,
    joins: Vec<Join>,
    filter: Option<Predicate>,
    order: Order,
    limit: Option<usize>,
}

impl SelectBuilder<Postgres> {
    /// Builder for a Postgres table.
    pub fn postgres(table: impl Into<String>) -> Self {
        Self::new(Postgres, table)
    }
}

impl SelectBuilder<Sqlite> {
    /// Builder for a `SQLite` table.
    pub fn sqlite(table: impl Into<String>) -> Self {
        Self::new(Sqlite, table)
    }
}

impl<D: Dialect> SelectBuilder<D> {
    /// Create a builder for `table`. Identifiers are checked by [`build`](Self::build).
    pub fn new(dialect: D, table: impl Into<String>) -> Self {
        Self {
            dialect,
            table: table.into(),
            columns: Vec::new(),
            joins: Vec::new(),
            filter: None,
            order: Order::default(),
            limit: None,
        }
    }

    /// Base-table columns to select. Empty selects `table.*`.
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| (*c).to_string()).collect();
        self
    }

    /// Add a `LEFT JOIN`.
    pub fn left_join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Set the WHERE predicate.
    pub fn filter(mut self, filter: Predicate) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the ORDER BY terms.
    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Set the LIMIT.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Take filter, order and limit from a data-source fetch.
    pub fn find<O>(self, query: &FindQuery<O>) -> Self {
        Self {
            filter: query.filter.clone(),
            order: query.order.clone(),
            limit: Some(query.limit),
            ..self
        }
    }

    /// Take the filter from a data-source count.
    pub fn count<O>(self, query: &CountQuery<O>) -> Self {
        Self {
            filter: query.filter.clone(),
            ..self
        }
    }

    /// Names visible to predicates and orders of this statement.
    pub fn scope(&self) -> Scope {
        self.joins
            .iter()
            .fold(Scope::new(&self.table), |scope, join| scope.with_alias(&join.alias))
    }

    /// Render `SELECT ... FROM ... [WHERE] [ORDER BY] [LIMIT]`.
    pub fn build(&self) -> Result<SqlQuery, SqlError> {
        let scope = self.scope();
        let d = &self.dialect;
        let mut selected = Vec::new();

        if self.columns.is_empty() {
            check_identifier(&self.table, "table")?;
            selected.push(format!("{}.*", d.quote(&self.table)));
        }
        for column in &self.columns {
            check_identifier(column, "column")?;
            selected.push(format!("{}.{}", d.quote(&self.table), d.quote(column)));
        }
        for join in &self.joins {
            for column in &join.columns {
                check_identifier(column, "join column")?;
                let label = format!("{}.{column}", join.alias);
                selected.push(format!(
                    "{}.{} AS {}",
                    d.quote(&join.alias),
                    d.quote(column),
                    d.quote(&label)
                ));
            }
        }

        let mut sql = format!("SELECT {} {}", selected.join(", "), self.from_clause()?);
        let params = self.where_clause(&scope, &mut sql)?;

        if !self.order.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&render_order(d, &scope, &self.order)?);
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        tracing::trace!(sql = %sql, params = params.len(), "rendered select");
        Ok(SqlQuery { sql, params })
    }

    /// Render `SELECT COUNT(*) FROM ... [WHERE]`. Order and limit are ignored.
    pub fn build_count(&self) -> Result<SqlQuery, SqlError> {
        let scope = self.scope();
        let mut sql = format!("SELECT COUNT(*) {}", self.from_clause()?);
        let params = self.where_clause(&scope, &mut sql)?;

        tracing::trace!(sql = %sql, params = params.len(), "rendered count");
        Ok(SqlQuery { sql, params })
    }

    fn from_clause(&self) -> Result<String, SqlError> {
        let d = &self.dialect;
        check_identifier(&self.table, "table")?;
        let mut sql = format!("FROM {}", d.quote(&self.table));

        for join in &self.joins {
            check_identifier(&join.table, "join table")?;
            check_identifier(&join.alias, "join alias")?;
            check_identifier(&join.on_column, "join column")?;
            check_identifier(&join.base_column, "column")?;
            sql.push_str(&format!(
                " LEFT JOIN {} AS {} ON {}.{} = {}.{}",
                d.quote(&join.table),
                d.quote(&join.alias),
                d.quote(&join.alias),
                d.quote(&join.on_column),
                d.quote(&self.table),
                d.quote(&join.base_column),
            ));
        }
        Ok(sql)
    }

    fn where_clause(&self, scope: &Scope, sql: &mut String) -> Result<Vec<Value>, SqlError> {
        let Some(filter) = &self.filter else {
            return Ok(Vec::new());
        };
        let (condition, params, _) = render_predicate(&self.dialect, scope, filter, 1)?;
        sql.push_str(" WHERE ");
        sql.push_str(&condition);
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seekpage::{ColumnRef, Cursor, Direction, KeysetCondition, Operator, OrderTerm, simple};

    fn tests_query() -> SelectBuilder<Sqlite> {
        SelectBuilder::sqlite("tests").left_join(
            Join::new("persons", "persons", "id", "personId").columns(&["id", "name"]),
        )
    }

    #[test]
    fn test_select_all_columns() {
        let query = SelectBuilder::postgres("tests").build().unwrap();
        insta::assert_snapshot!(query.sql, @r#"SELECT "tests".* FROM "tests""#);
    }

    #[test]
    fn test_select_with_join() {
        let query = tests_query().limit(3).build().unwrap();
        insta::assert_snapshot!(query.sql, @r#"SELECT "tests".*, "persons"."id" AS "persons.id", "persons"."name" AS "persons.name" FROM "tests" LEFT JOIN "persons" AS "persons" ON "persons"."id" = "tests"."personId" LIMIT 3"#);
    }

    #[test]
    fn test_select_backward_page_on_joined_column() {
        let order = Order::new(vec![
            OrderTerm::new(ColumnRef::joined("persons", "name"), Direction::Asc),
            OrderTerm::asc("id"),
        ]);
        let cursor = Cursor::new(vec![Value::from("jony"), Value::Int(4)]);
        let condition = KeysetCondition::before(&order, &cursor).unwrap();

        let query = tests_query()
            .filter(condition.to_predicate())
            .order(condition.order.clone())
            .limit(4)
            .build()
            .unwrap();
        insta::assert_snapshot!(query.sql, @r#"SELECT "tests".*, "persons"."id" AS "persons.id", "persons"."name" AS "persons.name" FROM "tests" LEFT JOIN "persons" AS "persons" ON "persons"."id" = "tests"."personId" WHERE ("persons"."name" < ?1 OR ("persons"."name" = ?2 AND "tests"."id" < ?3)) ORDER BY "persons"."name" DESC NULLS FIRST, "tests"."id" DESC NULLS FIRST LIMIT 4"#);
        assert_eq!(
            query.params,
            vec![Value::from("jony"), Value::from("jony"), Value::Int(4)]
        );
    }

    #[test]
    fn test_count_ignores_order_and_limit() {
        let query = tests_query()
            .filter(simple("extra", Operator::Eq, 3))
            .order(Order::new(vec![OrderTerm::asc("id")]))
            .limit(10)
            .build_count()
            .unwrap();
        insta::assert_snapshot!(query.sql, @r#"SELECT COUNT(*) FROM "tests" LEFT JOIN "persons" AS "persons" ON "persons"."id" = "tests"."personId" WHERE "tests"."extra" = ?1"#);
        assert_eq!(query.params, vec![Value::Int(3)]);
    }

    #[test]
    fn test_find_and_count_queries() {
        let find = FindQuery {
            filter: Some(simple("extra", Operator::Eq, 3)),
            order: Order::new(vec![OrderTerm::desc("id")]),
            limit: 3,
            options: (),
        };
        let query = SelectBuilder::postgres("tests").find(&find).build().unwrap();
        insta::assert_snapshot!(query.sql, @r#"SELECT "tests".* FROM "tests" WHERE "tests"."extra" = $1 ORDER BY "tests"."id" DESC LIMIT 3"#);

        let count = CountQuery {
            filter: None,
            options: (),
        };
        let query = SelectBuilder::postgres("tests")
            .filter(simple("extra", Operator::Eq, 3))
            .count(&count)
            .build_count()
            .unwrap();
        insta::assert_snapshot!(query.sql, @r#"SELECT COUNT(*) FROM "tests""#);
    }

    #[test]
    fn test_invalid_identifiers_are_rejected() {
        let err = SelectBuilder::postgres("tests; DROP").build().unwrap_err();
        assert!(matches!(err, SqlError::InvalidIdentifier { context: "table", .. }));

        let err = SelectBuilder::postgres("tests")
            .columns(&["id", "name--"])
            .build()
            .unwrap_err();
        assert!(matches!(err, SqlError::InvalidIdentifier { context: "column", .. }));

        let err = SelectBuilder::postgres("tests")
            .left_join(Join::new("persons", "p s", "id", "personId"))
            .build_count()
            .unwrap_err();
        assert!(matches!(err, SqlError::InvalidIdentifier { context: "join alias", .. }));
    }

    #[test]
    fn test_undeclared_alias_in_order() {
        let order = Order::new(vec![OrderTerm::new(
            ColumnRef::joined("owners", "name"),
            Direction::Asc,
        )]);
        let err = SelectBuilder::postgres("tests").order(order).build().unwrap_err();
        assert_eq!(err, SqlError::UnknownAlias("owners".to_string()));
    }
}
