use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use sparklight_plugin_api::{
    BuildOutcome,
    BuildResult,
    DeviceId,
    Notifier,
};
use sparklight_plugin_spark::parse_device_id;

use super::descriptor::TrafficLightDescriptor;
use crate::domain::DomainResult;

/// Post-build step of one job: shows the build result on that job's traffic
/// light.
pub struct TrafficLightPublisher {
    device_id: DeviceId,
    descriptor: Arc<TrafficLightDescriptor>,
}

impl TrafficLightPublisher {
    pub fn new(device_id: DeviceId, descriptor: Arc<TrafficLightDescriptor>) -> Self {
        Self {
            device_id,
            descriptor,
        }
    }

    /// Builds the step from the job's form values (`device_id`)
    pub fn from_form(
        form: &HashMap<String, String>, descriptor: Arc<TrafficLightDescriptor>,
    ) -> DomainResult<Self> {
        Ok(Self::new(parse_device_id(form)?, descriptor))
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    /// Sends the color of `result`, writes the return code to the build log
    /// and reports whether the device answered 200.
    pub async fn perform<W: Write>(&self, result: BuildResult, log: &mut W) -> bool {
        tracing::debug!(device_id = %self.device_id, result = %result, "Publishing build result");
        self.perform_outcome(&BuildOutcome::from(result), log).await
    }

    pub async fn perform_outcome<W: Write>(&self, outcome: &BuildOutcome, log: &mut W) -> bool {
        let token = self.descriptor.access_token();
        let code = self
            .descriptor
            .notifier()
            .notify(outcome, &self.device_id, &token)
            .await;

        if let Err(e) = writeln!(log, "Spark traffic light return code: {}", code) {
            tracing::warn!(error = %e, "Failed to write to build log");
        }

        code.is_success()
    }
}
