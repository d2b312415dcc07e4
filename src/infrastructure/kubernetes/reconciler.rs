// Copyright 2026 The inference-kube Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reconciliation driver
//!
//! Converges live cluster state toward a computed [`WorkloadSet`]: create when
//! absent, merge-patch the owned fields when present. Stateless and
//! synchronous per call; retries belong to the caller's control loop.

use crate::infrastructure::constants::{
    LABEL_APP, LABEL_AUTOSCALER_CLASS, LABEL_DEPLOYMENT_MODE,
};
use crate::infrastructure::kubernetes::client::WorkloadClient;
use crate::infrastructure::kubernetes::resources::WorkloadSet;
use crate::shared::error::{ReconcileError, Result};
use k8s_openapi::api::apps::v1::Deployment;
use serde_json::json;
use tracing::{debug, info};

/// Labels this engine owns on live objects. Everything else on the object,
/// including caller labels already applied at create time, is left alone.
const OWNED_LABELS: &[&str] = &[LABEL_APP, LABEL_AUTOSCALER_CLASS, LABEL_DEPLOYMENT_MODE];

pub struct WorkloadReconciler<C> {
    client: C,
}

impl<C: WorkloadClient> WorkloadReconciler<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Converge every object in the set, head first.
    ///
    /// Head and worker writes are independent; a failure between the two
    /// leaves the pass half-applied and is completed on the next pass, since
    /// the desired-state computation is idempotent. The returned error names
    /// the sub-object that failed.
    pub async fn reconcile(&self, desired: &WorkloadSet) -> Result<()> {
        for (object, deployment) in desired.iter_named() {
            self.reconcile_deployment(deployment)
                .await
                .map_err(|e| e.for_workload(object))?;
        }
        Ok(())
    }

    async fn reconcile_deployment(&self, desired: &Deployment) -> Result<()> {
        let name = desired
            .metadata
            .name
            .as_deref()
            .ok_or_else(|| ReconcileError::config_error("Deployment name is required"))?;
        let namespace = desired
            .metadata
            .namespace
            .as_deref()
            .ok_or_else(|| ReconcileError::config_error("Deployment namespace is required"))?;

        match self.client.get_deployment(namespace, name).await? {
            None => {
                info!(namespace, name, "creating deployment");
                self.client.create_deployment(namespace, desired).await
            }
            Some(_) => {
                debug!(namespace, name, "patching deployment");
                let patch = owned_fields_patch(desired)?;
                self.client.patch_deployment(namespace, name, &patch).await
            }
        }
    }
}

/// Merge patch carrying only the fields this engine owns: the forced labels,
/// the selector, the pod template, and the replica count when a directive
/// pinned it. Status, resourceVersion, and fields set by other controllers
/// are never part of the patch.
fn owned_fields_patch(desired: &Deployment) -> Result<serde_json::Value> {
    let spec = desired
        .spec
        .as_ref()
        .ok_or_else(|| ReconcileError::config_error("Deployment spec is required"))?;

    let mut patch_spec = json!({
        "selector": serde_json::to_value(&spec.selector)?,
        "template": serde_json::to_value(&spec.template)?,
    });
    if let Some(replicas) = spec.replicas {
        patch_spec["replicas"] = json!(replicas);
    }

    let mut labels = serde_json::Map::new();
    if let Some(desired_labels) = desired.metadata.labels.as_ref() {
        for key in OWNED_LABELS {
            if let Some(value) = desired_labels.get(*key) {
                labels.insert((*key).to_string(), json!(value));
            }
        }
    }

    Ok(json!({
        "metadata": { "labels": labels },
        "spec": patch_spec,
    }))
}
