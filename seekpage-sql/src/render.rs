//! Predicate and order rendering.
//!
//! Every function threads a 1-based parameter index through the recursion
//! and returns the next free index, so fragments can be concatenated into a
//! single statement.

use seekpage::{
    ColumnRef, CompoundPredicate, Condition, LogicalOp, Operator, Order, Predicate, Value,
};

use crate::dialect::Dialect;
use crate::error::SqlError;
use crate::validate::check_identifier;

/// Names visible to a rendered fragment: the base table and the declared
/// join aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    table: String,
    aliases: Vec<String>,
}

impl Scope {
    /// Scope over `table` with no joins.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            aliases: Vec::new(),
        }
    }

    /// Declare a join alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Base table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Render a column reference as a qualified, quoted identifier.
    pub fn column<D: Dialect>(&self, dialect: &D, column: &ColumnRef) -> Result<String, SqlError> {
        let (qualifier, name) = match column {
            ColumnRef::Column(name) => (self.table.as_str(), name.as_str()),
            ColumnRef::Joined { alias, column } => {
                if !self.aliases.iter().any(|a| a == alias) {
                    return Err(SqlError::UnknownAlias(alias.clone()));
                }
                (alias.as_str(), column.as_str())
            },
        };
        check_identifier(qualifier, "table")?;
        check_identifier(name, "column")?;
        Ok(format!("{}.{}", dialect.quote(qualifier), dialect.quote(name)))
    }
}

/// Render a predicate as a parameterized boolean expression.
///
/// ```
/// use seekpage::{Operator, simple};
/// use seekpage_sql::{Postgres, Scope, render_predicate};
///
/// let (sql, params, next) =
///     render_predicate(&Postgres, &Scope::new("tests"), &simple("counter", Operator::Gt, 3), 1)
///         .unwrap();
/// assert_eq!(sql, r#""tests"."counter" > $1"#);
/// assert_eq!(params.len(), 1);
/// assert_eq!(next, 2);
/// ```
pub fn render_predicate<D: Dialect>(
    dialect: &D,
    scope: &Scope,
    predicate: &Predicate,
    start_idx: usize,
) -> Result<(String, Vec<Value>, usize), SqlError> {
    match predicate {
        Predicate::Simple(condition) => render_condition(dialect, scope, condition, start_idx),
        Predicate::Compound(compound) => render_compound(dialect, scope, compound, start_idx),
    }
}

fn render_compound<D: Dialect>(
    dialect: &D,
    scope: &Scope,
    compound: &CompoundPredicate,
    start_idx: usize,
) -> Result<(String, Vec<Value>, usize), SqlError> {
    let mut idx = start_idx;
    let mut all_params = Vec::new();
    let mut conditions = Vec::with_capacity(compound.predicates.len());

    for predicate in &compound.predicates {
        let (condition, params, new_idx) = render_predicate(dialect, scope, predicate, idx)?;
        conditions.push(condition);
        all_params.extend(params);
        idx = new_idx;
    }

    let (joiner, identity) = match compound.op {
        LogicalOp::And => (" AND ", "1=1"),
        LogicalOp::Or => (" OR ", "1=0"),
    };
    let sql = match conditions.len() {
        0 => identity.to_string(),
        1 => conditions.concat(),
        _ => format!("({})", conditions.join(joiner)),
    };

    Ok((sql, all_params, idx))
}

fn render_condition<D: Dialect>(
    dialect: &D,
    scope: &Scope,
    condition: &Condition,
    start_idx: usize,
) -> Result<(String, Vec<Value>, usize), SqlError> {
    let field = scope.column(dialect, &condition.column)?;
    let idx = start_idx;

    Ok(match (condition.op, &condition.value) {
        (Operator::Eq, Value::Null) => (format!("{field} IS NULL"), vec![], idx),
        (Operator::Ne, Value::Null) => (format!("{field} IS NOT NULL"), vec![], idx),
        (op, value) => {
            let sql = format!("{} {} {}", field, op.as_str(), dialect.param(idx));
            (sql, vec![value.clone()], idx + 1)
        },
    })
}

/// Render an order as the body of an ORDER BY clause.
///
/// ```
/// use seekpage::{Order, OrderTerm};
/// use seekpage_sql::{Scope, Sqlite, render_order};
///
/// let order = Order::new(vec![OrderTerm::desc("counter"), OrderTerm::asc("id")]);
/// let sql = render_order(&Sqlite, &Scope::new("tests"), &order).unwrap();
/// assert_eq!(sql, r#""tests"."counter" DESC NULLS FIRST, "tests"."id" ASC NULLS LAST"#);
/// ```
pub fn render_order<D: Dialect>(
    dialect: &D,
    scope: &Scope,
    order: &Order,
) -> Result<String, SqlError> {
    let terms = order
        .iter()
        .map(|term| {
            let column = scope.column(dialect, &term.column)?;
            Ok(format!("{column} {}", dialect.direction(term.direction)))
        })
        .collect::<Result<Vec<_>, SqlError>>()?;
    Ok(terms.join(", "))
}
