//! The wrapped entity and the invocations routed to it.

use async_trait::async_trait;
use serde_json::Value;

/// The four dynamic-property accessor methods.
///
/// Their lower-case method names are reserved: they may never be listed in
/// `cache_methods` or `non_cache_methods`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accessor {
    Read,
    Write,
    Exists,
    Delete,
}

impl Accessor {
    pub const ALL: [Accessor; 4] = [
        Accessor::Read,
        Accessor::Write,
        Accessor::Exists,
        Accessor::Delete,
    ];

    /// Method name the entity answers to for this accessor.
    pub fn method_name(&self) -> &'static str {
        match self {
            Accessor::Read => "read_property",
            Accessor::Write => "write_property",
            Accessor::Exists => "property_exists",
            Accessor::Delete => "delete_property",
        }
    }

    /// Case-insensitive check against the reserved names.
    pub fn is_reserved(name: &str) -> bool {
        Self::ALL
            .iter()
            .any(|accessor| accessor.method_name().eq_ignore_ascii_case(name))
    }
}

/// An object whose calls and dynamic properties are cache-mediated.
///
/// Method names passed to [`Entity::invoke`] and [`Entity::has_method`] are
/// always lower-case. Property names are passed through untouched.
///
/// The property operations default to invoking the matching accessor
/// method, which is what an entity without declared properties needs.
/// Entities with declared members override them to reach those members
/// directly.
#[async_trait]
pub trait Entity: Send + Sync {
    /// Identity used for keys when no entity key is configured.
    ///
    /// Defaults to the type name plus the instance address, which is only
    /// stable for the lifetime of the instance.
    fn identity(&self) -> String {
        format!("{}@{:p}", std::any::type_name::<Self>(), self)
    }

    /// Whether `name` is a real, statically declared property.
    fn has_declared_member(&self, name: &str) -> bool;

    /// Whether method `name` is defined, accessor methods included.
    fn has_method(&self, name: &str) -> bool;

    /// Invoke method `name` with `args`.
    async fn invoke(&self, method: &str, args: &[Value]) -> anyhow::Result<Value>;

    async fn read_property(&self, name: &str) -> anyhow::Result<Value> {
        self.invoke(Accessor::Read.method_name(), &[Value::from(name)])
            .await
    }

    async fn write_property(&self, name: &str, value: Value) -> anyhow::Result<()> {
        self.invoke(Accessor::Write.method_name(), &[Value::from(name), value])
            .await
            .map(|_| ())
    }

    async fn property_exists(&self, name: &str) -> anyhow::Result<bool> {
        let exists = self
            .invoke(Accessor::Exists.method_name(), &[Value::from(name)])
            .await?;
        Ok(exists.as_bool().unwrap_or(false))
    }

    async fn delete_property(&self, name: &str) -> anyhow::Result<()> {
        self.invoke(Accessor::Delete.method_name(), &[Value::from(name)])
            .await
            .map(|_| ())
    }
}

/// Kind of intercepted operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Call,
    ReadProp,
    WriteProp,
    ExistsProp,
    DeleteProp,
}

/// One intercepted call or property access.
///
/// For [`OpKind::WriteProp`] the value to write is `args[0]`; the other
/// property operations take no arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub op: OpKind,
    pub name: String,
    pub args: Vec<Value>,
}

impl Invocation {
    pub fn call(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            op: OpKind::Call,
            name: method.into(),
            args,
        }
    }

    pub fn read(property: impl Into<String>) -> Self {
        Self::property(OpKind::ReadProp, property, Vec::new())
    }

    pub fn write(property: impl Into<String>, value: Value) -> Self {
        Self::property(OpKind::WriteProp, property, vec![value])
    }

    pub fn exists(property: impl Into<String>) -> Self {
        Self::property(OpKind::ExistsProp, property, Vec::new())
    }

    pub fn delete(property: impl Into<String>) -> Self {
        Self::property(OpKind::DeleteProp, property, Vec::new())
    }

    fn property(op: OpKind, property: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            op,
            name: property.into(),
            args,
        }
    }
}
