//! Query wrapper that translates itself before handing off to an executor.

use crate::error::{Error, TranslateError};
use crate::query::binding::Binding;
use crate::query::translate::translate;
use crate::query::types::BindingValue;
use tracing::debug;

/// Execution client for translated queries.
///
/// Receives SQL that only contains native `@name` and `?` placeholders
/// together with the matching bindings (names without markers).
pub trait QueryExecutor {
    /// Result of a successful execution (a job handle, a row iterator, ...).
    type Output;

    /// Error reported by the client.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Execute a translated query.
    fn execute(&self, sql: &str, parameters: &[Binding]) -> Result<Self::Output, Self::Error>;
}

/// A SQL template with its bindings.
///
/// [`Query::translate`] rewrites the SQL and bindings in place; the template
/// as written stays available through [`Query::original_sql`].
#[derive(Debug, Clone, Default)]
pub struct Query {
    sql: String,
    parameters: Vec<Binding>,
    original_sql: Option<String>,
}

impl Query {
    /// Create a query from a SQL template.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            parameters: Vec::new(),
            original_sql: None,
        }
    }

    /// Replace all bindings.
    pub fn with_parameters(mut self, parameters: Vec<Binding>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Add a named (`$name` / `@name`) binding.
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<BindingValue>) -> Self {
        self.parameters.push(Binding::new(name, value));
        self
    }

    /// Add a positional binding.
    pub fn bind_positional(mut self, value: impl Into<BindingValue>) -> Self {
        self.parameters.push(Binding::positional(value));
        self
    }

    /// Current SQL text (translated once [`Query::translate`] succeeded).
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Current bindings.
    pub fn parameters(&self) -> &[Binding] {
        &self.parameters
    }

    /// The template as written, once translated.
    pub fn original_sql(&self) -> Option<&str> {
        self.original_sql.as_deref()
    }

    /// Whether the query has been translated.
    pub fn is_translated(&self) -> bool {
        self.original_sql.is_some()
    }

    /// Translate the query in place.
    ///
    /// On failure the query is left unchanged. A translated query is not
    /// translated again.
    pub fn translate(&mut self) -> Result<(), TranslateError> {
        if self.is_translated() {
            return Ok(());
        }
        if self.sql.is_empty() {
            return Err(TranslateError::EmptySql);
        }

        let (sql, parameters) = translate(&self.sql, &self.parameters)
            .inspect_err(|e| match e.placeholder() {
                Some(placeholder) => debug!(placeholder, "Query translation failed: {e}"),
                None => debug!("Query translation failed: {e}"),
            })?
            .into_parts();
        self.original_sql = Some(std::mem::replace(&mut self.sql, sql));
        self.parameters = parameters;
        Ok(())
    }

    /// Translate the query and execute it with the given client.
    pub fn run<E: QueryExecutor>(&mut self, executor: &E) -> Result<E::Output, Error> {
        self.translate()?;

        debug!(parameters = self.parameters.len(), "Submitting translated query");

        executor
            .execute(&self.sql, &self.parameters)
            .map_err(|e| Error::execution_with_source(e.to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Debug, thiserror::Error)]
    #[error("backend refused")]
    struct Refused;

    /// Records what it was asked to execute.
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(String, Vec<Binding>)>>,
        fail: bool,
    }

    impl QueryExecutor for Recorder {
        type Output = usize;
        type Error = Refused;

        fn execute(&self, sql: &str, parameters: &[Binding]) -> Result<usize, Refused> {
            if self.fail {
                return Err(Refused);
            }
            let mut calls = self.calls.borrow_mut();
            calls.push((sql.to_string(), parameters.to_vec()));
            Ok(calls.len())
        }
    }

    #[test]
    fn test_translate_in_place() {
        let mut q = Query::new("SELECT * FROM $table WHERE id = 1").bind("$table", "mytable");
        q.translate().unwrap();

        assert_eq!(q.sql(), "SELECT * FROM `mytable` WHERE id = 1");
        assert!(q.parameters().is_empty());
        assert_eq!(q.original_sql(), Some("SELECT * FROM $table WHERE id = 1"));
    }

    #[test]
    fn test_translate_twice_is_noop() {
        let mut q = Query::new("SELECT @a").bind("@a", 1i64);
        q.translate().unwrap();
        q.translate().unwrap();
        assert_eq!(q.sql(), "SELECT @a");
        assert_eq!(q.parameters(), &[Binding::new("a", 1i64)]);
    }

    #[test]
    fn test_empty_sql() {
        let mut q = Query::new("");
        assert_eq!(q.translate(), Err(TranslateError::EmptySql));
        assert!(!q.is_translated());
    }

    #[test]
    fn test_failed_translation_leaves_query_untouched() {
        let mut q = Query::new("SELECT * FROM $t").bind("$t", "bad;name");
        assert!(q.translate().is_err());
        assert_eq!(q.sql(), "SELECT * FROM $t");
        assert_eq!(q.parameters().len(), 1);
        assert!(q.original_sql().is_none());
    }

    #[test]
    fn test_run_delegates_translated_pair() {
        let recorder = Recorder::default();
        let mut q = Query::new("SELECT * FROM $t WHERE a = ? AND b = @b")
            .bind("$t", "events")
            .bind_positional(7i64)
            .bind("@b", "x");

        assert_eq!(q.run(&recorder).unwrap(), 1);

        let calls = recorder.calls.borrow();
        assert_eq!(calls[0].0, "SELECT * FROM `events` WHERE a = ? AND b = @b");
        assert_eq!(
            calls[0].1,
            vec![Binding::positional(7i64), Binding::new("b", "x")]
        );
    }

    #[test]
    fn test_run_does_not_execute_invalid_query() {
        let recorder = Recorder::default();
        let mut q = Query::new("SELECT * FROM $t");

        let err = q.run(&recorder).unwrap_err();
        assert!(matches!(
            err.as_translate(),
            Some(TranslateError::IdentifierNotProvided { .. })
        ));
        assert!(recorder.calls.borrow().is_empty());
    }

    #[test]
    fn test_run_wraps_executor_error() {
        let recorder = Recorder {
            fail: true,
            ..Default::default()
        };
        let mut q = Query::new("SELECT 1");

        let err = q.run(&recorder).unwrap_err();
        assert!(matches!(err, Error::Execution { .. }));
        assert_eq!(err.to_string(), "Query execution error: backend refused");
    }
}
