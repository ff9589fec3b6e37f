use regex::Regex;

use crate::error::{MsgflowError, Result};
use crate::core::type_graph::TypeDescription;

/// Derives a service identity from a type's full name.
///
/// The service is the first dot-separated segment that no skip pattern matches,
/// so `Pitstop.WorkshopManagementAPI.Commands.PlanJob` belongs to
/// `WorkshopManagementAPI` with the default patterns.
#[derive(Debug, Clone)]
pub struct ServiceNaming {
    skip_segments: Vec<Regex>,
}

impl ServiceNaming {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let skip_segments = patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| MsgflowError::Config(format!("Invalid service skip pattern '{}': {}", p, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { skip_segments })
    }

    pub fn service_for<'t>(&self, full_name: &'t str) -> Option<&'t str> {
        full_name
            .split('.')
            .find(|segment| !self.skip_segments.iter().any(|re| re.is_match(segment)))
    }

    pub fn service_of<'t>(&self, description: &'t TypeDescription) -> Option<&'t str> {
        self.service_for(&description.full_name)
    }
}
