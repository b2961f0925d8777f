//! Callable entries: functions, methods, constructors and callbacks.

use bitflags::bitflags;

use super::{Parameter, ReturnValue};

/// What kind of callable an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallableKind {
    /// Free function or static function of a record.
    Function,
    /// Bound method taking an implicit instance parameter.
    Method,
    /// Constructor returning a new instance of its owner.
    Constructor,
    /// Signature of a callback type.
    Callback,
}

impl CallableKind {
    pub const fn name(self) -> &'static str {
        match self {
            CallableKind::Function => "function",
            CallableKind::Method => "method",
            CallableKind::Constructor => "constructor",
            CallableKind::Callback => "callback",
        }
    }
}

bitflags! {
    /// Callable attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CallableFlags: u8 {
        /// Reports failures through a trailing `GError**` argument.
        const THROWS = 1 << 0;
        const DEPRECATED = 1 << 1;
    }
}

/// A callable with its full declared signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableEntry {
    /// Declared name (e.g., "get_home_dir").
    pub name: String,
    /// Native symbol used for dynamic lookup (`c:identifier`).
    ///
    /// Empty for callbacks, which have no symbol of their own.
    pub linkage: String,
    /// Function, method, constructor or callback.
    pub kind: CallableKind,
    /// Implicit leading instance parameter of methods.
    pub instance: Option<Parameter>,
    /// Declared parameters in order.
    pub params: Vec<Parameter>,
    /// Return value.
    pub ret: ReturnValue,
    /// Attribute flags.
    pub flags: CallableFlags,
    /// `false` when the repository marks the callable `introspectable="0"`.
    pub introspectable: bool,
    /// Owning record, for methods, constructors and static functions.
    pub owner: Option<String>,
}

impl CallableEntry {
    fn new(name: impl Into<String>, linkage: impl Into<String>, kind: CallableKind) -> Self {
        Self {
            name: name.into(),
            linkage: linkage.into(),
            kind,
            instance: None,
            params: Vec::new(),
            ret: ReturnValue::none(),
            flags: CallableFlags::empty(),
            introspectable: true,
            owner: None,
        }
    }

    pub fn function(name: impl Into<String>, linkage: impl Into<String>) -> Self {
        Self::new(name, linkage, CallableKind::Function)
    }

    pub fn method(name: impl Into<String>, linkage: impl Into<String>, instance: Parameter) -> Self {
        let mut entry = Self::new(name, linkage, CallableKind::Method);
        entry.instance = Some(instance);
        entry
    }

    pub fn constructor(name: impl Into<String>, linkage: impl Into<String>) -> Self {
        Self::new(name, linkage, CallableKind::Constructor)
    }

    pub fn callback(name: impl Into<String>) -> Self {
        Self::new(name, "", CallableKind::Callback)
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = Parameter>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn returning(mut self, ret: ReturnValue) -> Self {
        self.ret = ret;
        self
    }

    pub fn throws(mut self) -> Self {
        self.flags |= CallableFlags::THROWS;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.flags |= CallableFlags::DEPRECATED;
        self
    }

    pub fn non_introspectable(mut self) -> Self {
        self.introspectable = false;
        self
    }

    pub fn owned_by(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn is_throwing(&self) -> bool {
        self.flags.contains(CallableFlags::THROWS)
    }

    /// Display name including the owner (`Variant.get_type`).
    pub fn display_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{}.{}", owner, self.name),
            None => self.name.clone(),
        }
    }
}
