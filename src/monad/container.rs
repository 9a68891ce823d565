use super::error::MonadError;
use super::fp::{Bind, Unit};
use crate::common::Fields;
use std::ops::Shr;

/// Base monad over a set of named values.
///
/// `unit` wraps a mapping into the monad, `unwrap` recovers it, and
/// `bind` threads it through an effectful step, producing the next
/// container in the chain. The `>>` operator is an alias for `bind`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Monad {
    fields: Fields,
}

impl Monad {
    pub fn unit(fields: Fields) -> Self {
        Self { fields }
    }

    /// Reproduces exactly the names recorded at construction, each mapped
    /// to its current value, in insertion order. A recorded name without
    /// a stored value means the bookkeeping was corrupted from outside
    /// the construct/bind contract.
    pub fn unwrap(&self) -> Result<Fields, MonadError> {
        let mut result = Fields::new();
        for name in self.fields.names() {
            let value = self
                .fields
                .get(name)
                .ok_or_else(|| MonadError::MissingAttribute(name.to_string()))?;
            result.insert(name, value.clone());
        }
        Ok(result)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, MonadError> {
        Fields::from_json(value).map(Self::unit)
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.fields.to_json()
    }
}

impl Unit for Monad {
    fn unit(fields: Fields) -> Self {
        Monad::unit(fields)
    }
}

impl Bind for Monad {
    fn unwrap(&self) -> Result<Fields, MonadError> {
        Monad::unwrap(self)
    }
}

// >> is a Haskell-like bind operator. It makes chained code easier to
// read. Each link yields a Result, so longer chains thread it with `?`
// or and_then, short-circuiting on the first failing step.
impl<'a, F> Shr<F> for &'a Monad
where
    F: FnOnce(&mut Fields) -> Result<(), MonadError>,
{
    type Output = Result<Monad, MonadError>;

    fn shr(self, f: F) -> Self::Output {
        self.bind(f)
    }
}

impl<F> Shr<F> for Monad
where
    F: FnOnce(&mut Fields) -> Result<(), MonadError>,
{
    type Output = Result<Monad, MonadError>;

    fn shr(self, f: F) -> Self::Output {
        self.bind(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Value;
    use crate::fields;

    #[test]
    fn test_unit_unwrap_round_trip() {
        let monad = Monad::unit(fields! { "key" => "value", "count" => 233 });
        let fields = monad.unwrap().expect("test_unit_unwrap_round_trip");
        assert_eq!(fields, fields! { "key" => "value", "count" => 233 });
    }

    #[test]
    fn test_unwrap_returns_a_copy() {
        let monad = Monad::unit(fields! { "key" => "value" });
        let mut fields = monad.unwrap().expect("test_unwrap_returns_a_copy");
        fields.insert("key", "changed");
        let again = monad.unwrap().expect("test_unwrap_returns_a_copy");
        assert_eq!(again.get("key"), Some(&Value::from("value")));
    }

    #[test]
    fn test_json_round_trip() {
        let monad = Monad::from_json(serde_json::json!({"key": "value"}))
            .expect("test_json_round_trip");
        assert_eq!(monad.to_json(), serde_json::json!({"key": "value"}));
    }

    #[test]
    fn test_bind_through_trait() {
        let monad = Monad::unit(fields! { "count" => 1 });
        let next = monad
            .bind(|fields| {
                fields.insert("count", 2);
                Ok(())
            })
            .expect("test_bind_through_trait");
        assert_eq!(next.unwrap().expect("test_bind_through_trait").get("count"), Some(&Value::Integer(2)));
        // The receiver keeps its original state.
        assert_eq!(monad.unwrap().expect("test_bind_through_trait").get("count"), Some(&Value::Integer(1)));
    }
}
