//! Symbol table: source-level names bound to values.

use crate::{CodegenError, Context, Result, Value};

impl Context {
    /// Bind `name` to `value`, replacing any earlier binding.
    ///
    /// The value also takes `name` as its display name in the printed
    /// module. Constants have no display name, so for them only the binding
    /// changes.
    pub fn bind_variable(&mut self, name: &str, value: Value) -> Result<()> {
        let id = self.value_id(value)?;
        self.module.set_value_name(id, name)?;
        if self.variables.insert(name.to_owned(), value).is_some() {
            tracing::trace!(name, "rebound variable");
        }
        Ok(())
    }

    /// The value bound to `name`.
    pub fn lookup_variable(&self, name: &str) -> Result<Value> {
        self.variables
            .get(name)
            .copied()
            .ok_or_else(|| CodegenError::UnboundName {
                name: name.to_owned(),
            })
    }

    /// The "no value" sentinel, see [`Value::NULL`].
    pub fn null_value(&self) -> Value {
        Value::NULL
    }

    /// All bindings, in unspecified order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, Value)> {
        self.variables
            .iter()
            .map(|(name, &value)| (name.as_str(), value))
    }
}
