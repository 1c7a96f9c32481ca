//! Builder for constructing flow catalogs.

use super::error::CatalogError;
use super::validation::{into_violations, validate_catalog};
use super::{Flow, FlowCatalog, TransitionStep};
use crate::core::FlowId;
use std::collections::HashMap;
use std::sync::Arc;
use stillwater::validation::Validation;

/// Builder for constructing flow catalogs with a fluent API.
///
/// `build` validates the whole catalog and reports every violation at once.
///
/// # Example
///
/// ```rust
/// use gatekeep::catalog::{CatalogBuilder, CatalogViolation};
/// use gatekeep::core::FlowId;
/// use gatekeep::flow;
///
/// let result = CatalogBuilder::new()
///     .flow(flow!(FlowId::VipFlow => [
///         Detected => PlateRecognized,
///         Closed => VehiclePasses,
///         Idle => FlowComplete,
///     ]))
///     .build();
///
/// let err = result.unwrap_err();
/// assert!(err
///     .violations()
///     .contains(&CatalogViolation::MissingFlow { flow: FlowId::SubscriberFlow }));
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    flows: Vec<Flow>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self { flows: Vec::new() }
    }

    /// Add a flow.
    pub fn flow(mut self, flow: Flow) -> Self {
        self.flows.push(flow);
        self
    }

    /// Add a flow from its identifier and steps.
    pub fn steps(self, id: FlowId, steps: Vec<TransitionStep>) -> Self {
        self.flow(Flow::new(id, steps))
    }

    /// Replace the flow registered under the same identifier, or add it.
    pub fn replace(mut self, flow: Flow) -> Self {
        self.flows.retain(|f| f.id() != flow.id());
        self.flows.push(flow);
        self
    }

    /// Start from an existing catalog, e.g. to override one flow.
    pub fn from_catalog(catalog: &FlowCatalog) -> Self {
        Self {
            flows: catalog.iter().cloned().collect(),
        }
    }

    /// Validate and build the catalog.
    pub fn build(self) -> Result<FlowCatalog, CatalogError> {
        match validate_catalog(&self.flows) {
            Validation::Success(_) => {
                let flows: HashMap<FlowId, Arc<Flow>> = self
                    .flows
                    .into_iter()
                    .map(|flow| (flow.id(), Arc::new(flow)))
                    .collect();
                Ok(FlowCatalog::from_validated(flows))
            }
            Validation::Failure(errors) => Err(CatalogError::Malformed {
                violations: into_violations(errors),
            }),
        }
    }
}
