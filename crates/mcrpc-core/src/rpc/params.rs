use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::RpcError;

/// A function value handed over where data was expected, typically by a
/// scripting bridge that forwards host-language objects untouched.
///
/// The client never invokes it; a call carrying one is rejected before any
/// network I/O.
#[derive(Clone)]
pub struct Callable(Arc<dyn Fn(&[Value]) -> Value + Send + Sync>);

impl Callable {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the function. Only the binding layer that created it does this.
    pub fn invoke(&self, args: &[Value]) -> Value {
        (self.0)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callable(..)")
    }
}

/// One positional argument of a remote call.
#[derive(Debug)]
pub enum Param {
    Value(Value),
    Callable(Callable),
    /// The argument could not be turned into JSON when it was added. The
    /// error surfaces when the call is made.
    Unserializable(serde_json::Error),
}

/// Ordered positional arguments for a remote call.
///
/// Built with [`Params::push`], collected from `serde_json::Value`s, or via
/// the [`rpc_params!`](crate::rpc_params) macro.
#[derive(Debug, Default)]
pub struct Params {
    items: Vec<Param>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any serializable value. Serialization happens now; a failure
    /// is kept and reported by the call instead of panicking here.
    pub fn push<T: Serialize>(&mut self, value: T) -> &mut Self {
        let param = match serde_json::to_value(value) {
            Ok(value) => Param::Value(value),
            Err(err) => Param::Unserializable(err),
        };
        self.items.push(param);
        self
    }

    pub fn push_callable(&mut self, callable: Callable) -> &mut Self {
        self.items.push(Param::Callable(callable));
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_callable(&self) -> bool {
        self.items
            .iter()
            .any(|param| matches!(param, Param::Callable(_)))
    }

    /// Resolve into plain JSON values, order preserved.
    ///
    /// A callable anywhere in the list wins over a serialization failure.
    pub fn into_values(self) -> Result<Vec<Value>, RpcError> {
        if self.has_callable() {
            return Err(RpcError::CallableArgument);
        }
        self.items
            .into_iter()
            .map(|param| match param {
                Param::Value(value) => Ok(value),
                Param::Unserializable(err) => Err(RpcError::Serialize(err)),
                Param::Callable(_) => Err(RpcError::CallableArgument),
            })
            .collect()
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        values.into_iter().collect()
    }
}

impl FromIterator<Value> for Params {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Param::Value).collect(),
        }
    }
}

impl Extend<Param> for Params {
    fn extend<I: IntoIterator<Item = Param>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

/// Build [`Params`] from heterogeneous serializable values.
///
/// ```
/// use mcrpc_core::rpc_params;
///
/// let params = rpc_params!["stream1", 10, true];
/// assert_eq!(params.len(), 3);
/// ```
#[macro_export]
macro_rules! rpc_params {
    () => {
        $crate::rpc::Params::new()
    };
    ($($param:expr),+ $(,)?) => {{
        let mut params = $crate::rpc::Params::new();
        $(
            params.push($param);
        )+
        params
    }};
}
