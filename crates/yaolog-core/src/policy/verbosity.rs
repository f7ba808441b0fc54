//! Auto-verbosity: INFO narration and suppressed call elements

use std::sync::Arc;

use crate::call::CallDescriptor;
use crate::sites::{HideLogElements, SiteRegistry};
use crate::types::{TypeIdentity, TypeRegistry};

pub const CONTROLLER_SUFFIX: &str = "Controller";
pub const CLIENT_SUFFIX: &str = "Client";

/// Decides how loudly a call is narrated and what is left out of it
#[derive(Debug)]
pub struct VerbosityPolicy {
    info_controller: bool,
    info_client: bool,
    sites: Arc<SiteRegistry>,
    types: Arc<TypeRegistry>,
}

impl VerbosityPolicy {
    pub fn new(
        info_controller: bool,
        info_client: bool,
        sites: Arc<SiteRegistry>,
        types: Arc<TypeRegistry>,
    ) -> Self {
        Self {
            info_controller,
            info_client,
            sites,
            types,
        }
    }

    pub fn info_controller(&self) -> bool {
        self.info_controller
    }

    pub fn info_client(&self) -> bool {
        self.info_client
    }

    pub fn sites(&self) -> &Arc<SiteRegistry> {
        &self.sites
    }

    /// Whether the call is narrated at INFO rather than DEBUG
    ///
    /// `real_type` is the receiver after proxy unwrapping.
    pub fn should_narrate_at_info(&self, call: &CallDescriptor<'_>, real_type: &TypeIdentity) -> bool {
        let simple = real_type.simple_name();
        (self.info_controller && simple.ends_with(CONTROLLER_SUFFIX))
            || (self.info_client && simple.ends_with(CLIENT_SUFFIX))
            || self.has_info_marker(call, real_type)
    }

    fn has_info_marker(&self, call: &CallDescriptor<'_>, real_type: &TypeIdentity) -> bool {
        if self.sites.has_type_info(real_type, &self.types) {
            return true;
        }
        if self.sites.has_method_info(real_type, call.method()) {
            return true;
        }
        match call.declaring_type() {
            Some(declaring) if declaring != real_type => {
                self.sites.has_method_info(declaring, call.method())
            }
            _ => false,
        }
    }

    fn hide_elements(&self, call: &CallDescriptor<'_>, real_type: &TypeIdentity) -> Option<HideLogElements> {
        self.sites
            .type_hide(real_type, &self.types)
            .or_else(|| self.sites.method_hide(real_type, call.method()))
            .or_else(|| match call.declaring_type() {
                Some(declaring) if declaring != real_type => self.sites.method_hide(declaring, call.method()),
                _ => None,
            })
    }

    /// Whether the return value is replaced with a placeholder
    ///
    /// Without a registered override nothing is hidden; a bare override hides
    /// the return value.
    pub fn suppress_return_value(&self, call: &CallDescriptor<'_>, real_type: &TypeIdentity) -> bool {
        self.hide_elements(call, real_type)
            .map_or(false, |hide| hide.hide_return_value)
    }

    pub fn suppress_parameters(&self, call: &CallDescriptor<'_>, real_type: &TypeIdentity) -> bool {
        self.hide_elements(call, real_type)
            .map_or(false, |hide| hide.hide_parameters)
    }
}
