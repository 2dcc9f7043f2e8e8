//! Structured filter language handed to the data-store collaborator.
//!
//! A deliberately small algebra: comparisons, `IS [NOT] NULL` (spelled as
//! `Eq`/`Ne` against [`Value::Null`]), and `AND`/`OR` grouping. Adapters
//! translate it into their native query form; `seekpage-sql` renders it as
//! parameterized SQL and [`MemoryStore`](crate::MemoryStore) evaluates it
//! directly through [`Predicate::matches`].

use std::cmp::Ordering;
use std::fmt;

use crate::source::Record;
use crate::value::Value;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal: `=` (or `IS NULL` against `Null`)
    Eq,
    /// Not equal: `!=` (or `IS NOT NULL` against `Null`)
    Ne,
    /// Greater than: `>`
    Gt,
    /// Greater than or equal: `>=`
    Gte,
    /// Less than: `<`
    Lt,
    /// Less than or equal: `<=`
    Lte,
}

impl Operator {
    /// SQL spelling of the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }

    /// Parse from a Mongo/Sequelize-style operator name (`$gt`, `gte`, ...).
    ///
    /// ```
    /// use seekpage::Operator;
    ///
    /// assert_eq!(Operator::from_mongo("$eq"), Some(Operator::Eq));
    /// assert_eq!(Operator::from_mongo("gte"), Some(Operator::Gte));
    /// assert_eq!(Operator::from_mongo("$like"), None);
    /// ```
    #[must_use]
    pub fn from_mongo(s: &str) -> Option<Self> {
        match s.strip_prefix('$').unwrap_or(s) {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            _ => None,
        }
    }

    fn accepts(self, ord: Ordering) -> bool {
        match self {
            Self::Eq => ord == Ordering::Equal,
            Self::Ne => ord != Ordering::Equal,
            Self::Gt => ord == Ordering::Greater,
            Self::Gte => ord != Ordering::Less,
            Self::Lt => ord == Ordering::Less,
            Self::Lte => ord != Ordering::Greater,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a sortable/filterable column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnRef {
    /// A column of the paginated entity itself.
    Column(String),
    /// A column of a joined (associated) entity, addressed by its join alias.
    Joined {
        /// Join alias of the associated entity.
        alias: String,
        /// Column name on the associated entity.
        column: String,
    },
}

impl ColumnRef {
    /// Reference a column of the paginated entity.
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }

    /// Reference a column of a joined entity.
    pub fn joined(alias: impl Into<String>, column: impl Into<String>) -> Self {
        Self::Joined {
            alias: alias.into(),
            column: column.into(),
        }
    }

    /// The bare column name, without any alias.
    #[must_use]
    pub fn column_name(&self) -> &str {
        match self {
            Self::Column(name) | Self::Joined { column: name, .. } => name,
        }
    }

    /// Read this column's value from a record. Missing values read as `Null`.
    pub fn read<R: Record + ?Sized>(&self, record: &R) -> Value {
        let value = match self {
            Self::Column(name) => record.value(name),
            Self::Joined { alias, column } => record.association_value(alias, column),
        };
        value.unwrap_or(Value::Null)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(name) => f.write_str(name),
            Self::Joined { alias, column } => write!(f, "{alias}.{column}"),
        }
    }
}

/// Logical operators for compound predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    /// All predicates must match: `AND`
    And,
    /// At least one predicate must match: `OR`
    Or,
}

/// A single column comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Column being compared.
    pub column: ColumnRef,
    /// Comparison operator.
    pub op: Operator,
    /// Right-hand side value.
    pub value: Value,
}

/// Predicates combined with a logical operator.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundPredicate {
    /// How the children combine.
    pub op: LogicalOp,
    /// Child predicates.
    pub predicates: Vec<Predicate>,
}

impl CompoundPredicate {
    /// Create an AND compound predicate.
    #[must_use]
    pub const fn and(predicates: Vec<Predicate>) -> Self {
        Self {
            op: LogicalOp::And,
            predicates,
        }
    }

    /// Create an OR compound predicate.
    #[must_use]
    pub const fn or(predicates: Vec<Predicate>) -> Self {
        Self {
            op: LogicalOp::Or,
            predicates,
        }
    }
}

/// A boolean predicate over a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// A single column comparison.
    Simple(Condition),
    /// A compound predicate with logical operator.
    Compound(CompoundPredicate),
}

impl Predicate {
    /// `column IS NULL`.
    pub fn is_null(column: ColumnRef) -> Self {
        Self::Simple(Condition {
            column,
            op: Operator::Eq,
            value: Value::Null,
        })
    }

    /// `column IS NOT NULL`.
    pub fn not_null(column: ColumnRef) -> Self {
        Self::Simple(Condition {
            column,
            op: Operator::Ne,
            value: Value::Null,
        })
    }

    /// AND this predicate with an optional second one.
    ///
    /// Used to merge a caller's filter with the cursor predicate.
    #[must_use]
    pub fn and_also(self, other: Option<Self>) -> Self {
        match other {
            Some(other) => and(vec![self, other]),
            None => self,
        }
    }

    /// Combine two optional predicates with AND.
    #[must_use]
    pub fn merge(left: Option<Self>, right: Option<Self>) -> Option<Self> {
        match (left, right) {
            (Some(l), r) => Some(l.and_also(r)),
            (None, r) => r,
        }
    }

    /// Evaluate the predicate against a record.
    ///
    /// Comparisons follow SQL semantics collapsed to a boolean: anything
    /// compared against `NULL` is false, except `IS NULL` / `IS NOT NULL`.
    /// An empty AND is true and an empty OR is false.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Self::Simple(cond) => cond.matches(record),
            Self::Compound(compound) => match compound.op {
                LogicalOp::And => compound.predicates.iter().all(|p| p.matches(record)),
                LogicalOp::Or => compound.predicates.iter().any(|p| p.matches(record)),
            },
        }
    }
}

impl Condition {
    fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        let actual = self.column.read(record);
        match (self.op, &self.value) {
            (Operator::Eq, Value::Null) => actual.is_null(),
            (Operator::Ne, Value::Null) => !actual.is_null(),
            (_, expected) if actual.is_null() || expected.is_null() => false,
            (op, expected) => op.accepts(actual.sort_cmp(expected)),
        }
    }
}

/// Create a simple comparison predicate on a column of the paginated entity.
pub fn simple(column: impl Into<String>, op: Operator, value: impl Into<Value>) -> Predicate {
    Predicate::Simple(Condition {
        column: ColumnRef::Column(column.into()),
        op,
        value: value.into(),
    })
}

/// Create an AND compound predicate.
#[must_use]
pub const fn and(predicates: Vec<Predicate>) -> Predicate {
    Predicate::Compound(CompoundPredicate::and(predicates))
}

/// Create an OR compound predicate.
#[must_use]
pub const fn or(predicates: Vec<Predicate>) -> Predicate {
    Predicate::Compound(CompoundPredicate::or(predicates))
}
