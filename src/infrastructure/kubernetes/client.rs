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

use crate::shared::error::{ReconcileError, Result};
use k8s_openapi::api::apps::v1::Deployment;
use kube::{Api, Client};

/// Cluster access needed by the reconciliation driver.
///
/// The namespace travels per call because a multi-node component may place its
/// worker workload in a different namespace than the head.
#[async_trait::async_trait]
pub trait WorkloadClient: Send + Sync {
    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Option<Deployment>>;

    async fn create_deployment(&self, namespace: &str, deployment: &Deployment) -> Result<()>;

    async fn patch_deployment(
        &self,
        namespace: &str,
        name: &str,
        patch: &serde_json::Value,
    ) -> Result<()>;
}

pub struct KubeWorkloadClient {
    client: Client,
    field_manager: String,
}

impl KubeWorkloadClient {
    pub fn new(client: Client, field_manager: impl Into<String>) -> Self {
        Self {
            client,
            field_manager: field_manager.into(),
        }
    }

    pub async fn try_default(field_manager: impl Into<String>) -> Result<Self> {
        let client = Client::try_default().await.map_err(|e| {
            ReconcileError::Transport(format!("Failed to create Kubernetes client: {}", e))
        })?;
        Ok(Self::new(client, field_manager))
    }

    fn api(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait::async_trait]
impl WorkloadClient for KubeWorkloadClient {
    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Option<Deployment>> {
        match self.api(namespace).get(name).await {
            Ok(deployment) => Ok(Some(deployment)),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_deployment(&self, namespace: &str, deployment: &Deployment) -> Result<()> {
        let pp = kube::api::PostParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        };
        self.api(namespace).create(&pp, deployment).await?;
        Ok(())
    }

    async fn patch_deployment(
        &self,
        namespace: &str,
        name: &str,
        patch: &serde_json::Value,
    ) -> Result<()> {
        let pp = kube::api::PatchParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        };
        match self
            .api(namespace)
            .patch(name, &pp, &kube::api::Patch::Merge(patch))
            .await
        {
            Ok(_) => Ok(()),
            // Optimistic-lock conflicts surface distinctly so the control loop
            // can re-fetch and re-run the pass with fresh base state.
            Err(kube::Error::Api(ae)) if ae.code == 409 => Err(ReconcileError::Conflict {
                resource_type: "Deployment".to_string(),
                name: name.to_string(),
                namespace: namespace.to_string(),
                message: ae.message,
            }),
            Err(e) => Err(e.into()),
        }
    }
}
