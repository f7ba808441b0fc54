//! Call receivers and proxy unwrapping

use crate::error::YaologResult;
use crate::logging::Logger;
use crate::types::TypeIdentity;

/// Maximum number of proxy layers peeled off a receiver
pub const MAX_PROXY_DEPTH: usize = 5;

/// A value that receives intercepted calls
///
/// Plain receivers only need an empty impl:
///
/// ```
/// use yaolog_core::Target;
///
/// struct UserController;
/// impl Target for UserController {}
/// ```
///
/// Wrappers (decorators, lazy handles, remote stubs) report `is_proxy` and
/// expose what they wrap through `advised_target`, so logs name the real
/// type instead of the wrapper.
pub trait Target: Send + Sync {
    /// Runtime type of the receiver
    fn type_identity(&self) -> TypeIdentity {
        TypeIdentity::of::<Self>()
    }

    fn is_proxy(&self) -> bool {
        false
    }

    /// The wrapped value, if this layer currently has one
    fn advised_target(&self) -> YaologResult<Option<&dyn Target>> {
        Ok(None)
    }
}

/// Peel proxy layers off `head`, at most `MAX_PROXY_DEPTH` of them
///
/// Stops at the first layer that is not a proxy or has nothing behind it. A
/// failing layer is reported to `diagnostics` and the last good target is
/// kept.
pub fn resolve_real_target<'a>(head: &'a dyn Target, diagnostics: &dyn Logger) -> &'a dyn Target {
    let mut target = head;
    for _ in 0..MAX_PROXY_DEPTH {
        if !target.is_proxy() {
            break;
        }
        match target.advised_target() {
            Ok(Some(inner)) => target = inner,
            Ok(None) => break,
            Err(e) => {
                crate::log_error!(
                    diagnostics,
                    "Could not resolve proxy target of {}: {}",
                    target.type_identity(),
                    e
                );
            }
        }
    }
    target
}
