//! Loosely-typed construction and batch arguments
//!
//! The generic API makes a non-iterable source impossible to express. Callers
//! that assemble arguments at runtime (a scripting bridge, a benchmark driver
//! reading its workload from a file) use [`Value`] instead, and get the
//! argument checks reported as [`ErrorKind::Type`](crate::ErrorKind::Type)
//! errors. Arguments are validated completely before any element is enqueued.

use crate::common::IndexedQueue;
use crate::error::{QueueError, Result};
use crate::sync_queue::SyncQueue;

/// A dynamically typed element or argument
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent value; not iterable
    None,
    /// Not iterable
    Bool(bool),
    /// Not iterable
    Int(i64),
    /// Not iterable
    Float(f64),
    /// Iterates as one single-character string per `char`
    Str(String),
    /// Iterates over its elements in order
    List(Vec<Value>),
    /// Half-open integer range `start..end`
    Range { start: i64, end: i64 },
}

impl Value {
    /// Shorthand for [`Value::Range`]
    pub fn range(start: i64, end: i64) -> Self {
        Value::Range { start, end }
    }

    /// Name of the value's type, as used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Range { .. } => "range",
        }
    }

    /// Checks whether the value can be expanded with [`into_items`](Self::into_items)
    pub fn is_iterable(&self) -> bool {
        matches!(self, Value::Str(_) | Value::List(_) | Value::Range { .. })
    }

    /// Expands an iterable value into its elements
    ///
    /// A string yields one single-character string per `char`.
    pub fn into_items(self) -> Result<Vec<Value>> {
        match self {
            Value::List(items) => Ok(items),
            Value::Range { start, end } => Ok((start..end).map(Value::Int).collect()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
            other => Err(QueueError::NotIterable {
                type_name: other.type_name(),
            }),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::None
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

/// Checks a constructor argument list: nothing, or exactly one iterable
fn optional_source(args: Vec<Value>) -> Result<Vec<Value>> {
    if args.len() > 1 {
        return Err(QueueError::TooManyArguments {
            max: 1,
            given: args.len(),
        });
    }
    match args.into_iter().next() {
        Some(source) => source.into_items(),
        None => Ok(Vec::new()),
    }
}

/// Checks a batch argument list: exactly one iterable
fn required_items(args: Vec<Value>) -> Result<Vec<Value>> {
    if args.len() > 1 {
        return Err(QueueError::TooManyArguments {
            max: 1,
            given: args.len(),
        });
    }
    args.into_iter()
        .next()
        .ok_or(QueueError::MissingArgument { expected: "items" })?
        .into_items()
}

/// Runtime-checked construction and extension for queues of [`Value`]
pub trait DynamicArgs: Sized {
    /// Builds a queue from zero or one iterable argument
    fn from_args(args: Vec<Value>) -> Result<Self>;

    /// Enqueues the elements of exactly one iterable argument
    ///
    /// On error the queue is left untouched.
    fn extend_args(&mut self, args: Vec<Value>) -> Result<()>;
}

impl<Q> DynamicArgs for Q
where
    Q: IndexedQueue<Value> + Default,
{
    fn from_args(args: Vec<Value>) -> Result<Self> {
        let items = optional_source(args)?;
        let mut queue = Q::default();
        queue.extend_from(items);
        Ok(queue)
    }

    fn extend_args(&mut self, args: Vec<Value>) -> Result<()> {
        let items = required_items(args)?;
        self.extend_from(items);
        Ok(())
    }
}

impl<Q> SyncQueue<Value, Q>
where
    Q: IndexedQueue<Value> + Default,
{
    /// Builds a queue from zero or one iterable argument
    pub fn from_args(args: Vec<Value>) -> Result<Self> {
        Q::from_args(args).map(Self::from_queue)
    }

    /// Enqueues the elements of exactly one iterable argument
    pub fn extend_args(&self, args: Vec<Value>) -> Result<()> {
        let items = required_items(args)?;
        self.extend(items);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunked_queue::ChunkedQueue;
    use crate::circular_queue::CircularQueue;
    use crate::error::ErrorKind;

    #[test]
    fn test_from_args() {
        let q = CircularQueue::<Value>::from_args(vec![]).unwrap();
        assert!(q.is_empty());

        let q = CircularQueue::<Value>::from_args(vec![Value::range(0, 10)]).unwrap();
        assert_eq!(q.len(), 10);
        assert_eq!(q.get(-1), Ok(&Value::Int(9)));

        let q = ChunkedQueue::<Value>::from_args(vec![Value::from("abc")]).unwrap();
        assert_eq!(q.get(1), Ok(&Value::from("b")));
    }

    #[test]
    fn test_from_args_rejects_bad_arguments() {
        let err = CircularQueue::<Value>::from_args(vec![Value::Int(0)]).unwrap_err();
        assert_eq!(err, QueueError::NotIterable { type_name: "int" });
        assert_eq!(err.kind(), ErrorKind::Type);

        let err = CircularQueue::<Value>::from_args(vec![
            Value::List(vec![Value::Int(1), Value::Int(2)]),
            Value::List(vec![]),
        ])
        .unwrap_err();
        assert_eq!(err, QueueError::TooManyArguments { max: 1, given: 2 });
        assert!(err.is_type_error());
    }

    #[test]
    fn test_extend_args_leaves_queue_untouched_on_error() {
        let mut q = CircularQueue::<Value>::from_args(vec![Value::range(0, 3)]).unwrap();

        assert!(q.extend_args(vec![Value::Int(0)]).unwrap_err().is_type_error());
        assert!(q
            .extend_args(vec![Value::range(0, 2), Value::List(vec![])])
            .unwrap_err()
            .is_type_error());
        assert_eq!(
            q.extend_args(vec![]),
            Err(QueueError::MissingArgument { expected: "items" })
        );
        assert_eq!(q.len(), 3);

        q.extend_args(vec![Value::List(vec![])]).unwrap();
        assert_eq!(q.len(), 3);
        q.extend_args(vec![Value::from(vec![Value::None, Value::from(1.5)])])
            .unwrap();
        assert_eq!(q.get(-2), Ok(&Value::None));
    }

    #[test]
    fn test_sync_queue_args() {
        let q: SyncQueue<Value> = SyncQueue::from_args(vec![Value::range(0, 5)]).unwrap();
        assert_eq!(q.len(), 5);
        assert!(q.extend_args(vec![Value::Bool(true)]).is_err());
        q.extend_args(vec![Value::range(5, 7)]).unwrap();
        assert_eq!(q.get(-1), Ok(Value::Int(6)));

        assert!(SyncQueue::<Value>::from_args(vec![Value::None]).is_err());
    }

    #[test]
    fn test_mixed_element_types() {
        let mut q = CircularQueue::new();
        q.enqueue(Value::from(1));
        q.enqueue(Value::from("x"));
        assert_eq!(q.dequeue(), Ok(Value::Int(1)));
        assert_eq!(q.dequeue(), Ok(Value::from("x")));
        assert!(q.dequeue().unwrap_err().is_index_error());
    }
}
