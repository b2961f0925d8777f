use super::{CallableEntry, Parameter, ReturnValue};

/// Function pointer type declared by a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEntry {
    /// Unqualified name.
    pub name: String,
    /// Declared C type.
    pub c_type: Option<String>,
    /// Signature the native side calls with.
    pub signature: CallableEntry,
}

impl CallbackEntry {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            signature: CallableEntry::callback(name.clone()),
            name,
            c_type: None,
        }
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.signature.params.push(param);
        self
    }

    pub fn returning(mut self, ret: ReturnValue) -> Self {
        self.signature.ret = ret;
        self
    }

    pub fn with_c_type(mut self, c_type: impl Into<String>) -> Self {
        self.c_type = Some(c_type.into());
        self
    }
}
