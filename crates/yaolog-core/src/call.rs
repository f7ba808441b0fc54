//! Description of one intercepted call

use crate::target::Target;
use crate::types::TypeIdentity;
use crate::value::ToLogValue;

/// What the interceptor knows about a call before running it
///
/// Built by the caller (or by `call_site!`) and handed to
/// `Interceptor::around`. Parameter names are optional; when every argument
/// is added through `param` they are logged alongside the values.
/// Arguments are borrowed and only converted when the entry line is written.
pub struct CallDescriptor<'a> {
    target: &'a dyn Target,
    method: &'a str,
    parameter_names: Vec<&'a str>,
    arguments: Vec<&'a dyn ToLogValue>,
    declaring_type: Option<TypeIdentity>,
}

impl<'a> CallDescriptor<'a> {
    pub fn new(target: &'a dyn Target, method: &'a str) -> Self {
        Self {
            target,
            method,
            parameter_names: Vec::new(),
            arguments: Vec::new(),
            declaring_type: None,
        }
    }

    /// Add a named argument
    pub fn param(mut self, name: &'a str, value: &'a dyn ToLogValue) -> Self {
        self.parameter_names.push(name);
        self.arguments.push(value);
        self
    }

    /// Add an unnamed argument
    pub fn arg(mut self, value: &'a dyn ToLogValue) -> Self {
        self.arguments.push(value);
        self
    }

    /// Type (or trait) that declares the method, when it differs from the
    /// receiver's own type
    pub fn declared_by(mut self, declaring_type: impl Into<TypeIdentity>) -> Self {
        self.declaring_type = Some(declaring_type.into());
        self
    }

    pub fn declared_by_type<T: ?Sized>(self) -> Self {
        self.declared_by(TypeIdentity::of::<T>())
    }

    pub fn target(&self) -> &'a dyn Target {
        self.target
    }

    pub fn method(&self) -> &str {
        self.method
    }

    pub fn parameter_names(&self) -> &[&'a str] {
        &self.parameter_names
    }

    pub fn arguments(&self) -> &[&'a dyn ToLogValue] {
        &self.arguments
    }

    pub fn declaring_type(&self) -> Option<&TypeIdentity> {
        self.declaring_type.as_ref()
    }
}

impl std::fmt::Debug for CallDescriptor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallDescriptor")
            .field("target", &self.target.type_identity())
            .field("method", &self.method)
            .field("parameter_names", &self.parameter_names)
            .field("arguments", &self.arguments.len())
            .field("declaring_type", &self.declaring_type)
            .finish()
    }
}

/// Build a `CallDescriptor` whose parameter names are the argument
/// expressions
///
/// ```
/// use yaolog_core::{call_site, Target};
///
/// struct OrderController;
/// impl Target for OrderController {}
///
/// let controller = OrderController;
/// let (customer, quantity) = (7u64, 2u32);
/// let call = call_site!(&controller, place_order(customer, quantity));
/// assert_eq!(call.method(), "place_order");
/// assert_eq!(call.parameter_names(), &["customer", "quantity"]);
/// ```
#[macro_export]
macro_rules! call_site {
    ($target:expr, $method:ident ( $($arg:ident),* $(,)? )) => {
        $crate::CallDescriptor::new($target, stringify!($method))
            $(.param(stringify!($arg), &$arg))*
    };
}
