//! Local `$ref` resolution against the owning document.

use serde_json::{Map, Value};

use crate::SchemaError;

/// Maximum number of nested references followed along one path.
pub const MAX_REF_DEPTH: usize = 32;

/// Maximum number of JSON nodes one `inline` call may produce.
pub const MAX_INLINE_NODES: usize = 50_000;

pub(crate) struct RefResolver<'a> {
    root: &'a Value,
}

impl<'a> RefResolver<'a> {
    pub(crate) fn new(root: &'a Value) -> Self {
        Self { root }
    }

    fn lookup(&self, reference: &str) -> Result<&'a Value, SchemaError> {
        let pointer = reference
            .strip_prefix('#')
            .ok_or_else(|| SchemaError::unresolved_reference(reference))?;

        self.root
            .pointer(pointer)
            .ok_or_else(|| SchemaError::unresolved_reference(reference))
    }

    /// Follows `$ref` chains at the top of `value` only.
    pub(crate) fn follow(&self, mut value: &'a Value) -> Result<&'a Value, SchemaError> {
        for _ in 0..MAX_REF_DEPTH {
            match reference_of(value) {
                Some(reference) => value = self.lookup(reference)?,
                None => return Ok(value),
            }
        }

        Err(SchemaError::invalid_document(
            "reference chain exceeds the maximum depth",
        ))
    }

    /// Returns a copy of `value` with every local reference inlined.
    ///
    /// Self-referential schemas are cut at the cycle and replaced by `{}`.
    /// Shared references are expanded at every use, so the output is capped at
    /// [`MAX_INLINE_NODES`] nodes.
    pub(crate) fn inline(&self, value: &Value) -> Result<Value, SchemaError> {
        let mut stack = Vec::new();
        let mut budget = MAX_INLINE_NODES;
        self.inline_inner(value, &mut stack, &mut budget)
    }

    fn inline_inner<'v>(
        &self,
        value: &'v Value,
        stack: &mut Vec<&'v str>,
        budget: &mut usize,
    ) -> Result<Value, SchemaError>
    where
        'a: 'v,
    {
        *budget = budget.checked_sub(1).ok_or_else(|| {
            SchemaError::invalid_document(format!(
                "inlined schema exceeds {MAX_INLINE_NODES} nodes"
            ))
        })?;

        match value {
            Value::Object(map) => {
                if let Some(reference) = reference_of(value) {
                    if stack.contains(&reference) || stack.len() >= MAX_REF_DEPTH {
                        return Ok(Value::Object(Map::new()));
                    }

                    let target = self.lookup(reference)?;
                    stack.push(reference);
                    let inlined = self.inline_inner(target, stack, budget);
                    stack.pop();
                    return inlined;
                }

                let mut out = Map::with_capacity(map.len());
                for (key, item) in map {
                    out.insert(key.clone(), self.inline_inner(item, stack, budget)?);
                }
                Ok(Value::Object(out))
            }
            Value::Array(items) => items
                .iter()
                .map(|item| self.inline_inner(item, stack, budget))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other.clone()),
        }
    }
}

fn reference_of(value: &Value) -> Option<&str> {
    value.as_object()?.get("$ref")?.as_str()
}
