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

use inference_kube::{
    build_raw_workloads, AutoscalerClass, ComponentExtensionSpec, ComponentSpec, DeploymentMode,
    RawWorkloadConfig, ReconcileError, WorkloadClient, WorkloadReconciler, WorkloadSet,
};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Container, PodSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory stand-in for the cluster API, keyed by namespace and name.
#[derive(Default)]
struct FakeClient {
    store: Mutex<HashMap<(String, String), Deployment>>,
    creates: Mutex<Vec<(String, String)>>,
    patches: Mutex<Vec<(String, String, serde_json::Value)>>,
    conflict_on: Option<String>,
}

impl FakeClient {
    fn with_existing(deployments: Vec<Deployment>) -> Self {
        let client = Self::default();
        {
            let mut store = client.store.lock().unwrap();
            for deployment in deployments {
                let key = (
                    deployment.metadata.namespace.clone().unwrap(),
                    deployment.metadata.name.clone().unwrap(),
                );
                store.insert(key, deployment);
            }
        }
        client
    }
}

#[async_trait::async_trait]
impl WorkloadClient for &FakeClient {
    async fn get_deployment(
        &self,
        namespace: &str,
        name: &str,
    ) -> inference_kube::Result<Option<Deployment>> {
        let store = self.store.lock().unwrap();
        Ok(store.get(&(namespace.to_string(), name.to_string())).cloned())
    }

    async fn create_deployment(
        &self,
        namespace: &str,
        deployment: &Deployment,
    ) -> inference_kube::Result<()> {
        let name = deployment.metadata.name.clone().unwrap();
        self.creates
            .lock()
            .unwrap()
            .push((namespace.to_string(), name.clone()));
        self.store
            .lock()
            .unwrap()
            .insert((namespace.to_string(), name), deployment.clone());
        Ok(())
    }

    async fn patch_deployment(
        &self,
        namespace: &str,
        name: &str,
        patch: &serde_json::Value,
    ) -> inference_kube::Result<()> {
        if self.conflict_on.as_deref() == Some(name) {
            return Err(ReconcileError::Conflict {
                resource_type: "Deployment".to_string(),
                name: name.to_string(),
                namespace: namespace.to_string(),
                message: "the object has been modified".to_string(),
            });
        }
        self.patches
            .lock()
            .unwrap()
            .push((namespace.to_string(), name.to_string(), patch.clone()));
        Ok(())
    }
}

fn multi_node_workloads() -> WorkloadSet {
    let mut annotations = std::collections::BTreeMap::new();
    annotations.insert("annotation".to_string(), "annotation-value".to_string());
    let meta = ObjectMeta {
        name: Some("default-predictor".to_string()),
        namespace: Some("default-predictor-namespace".to_string()),
        annotations: Some(annotations),
        ..Default::default()
    };
    let worker_meta = ObjectMeta {
        name: Some("worker-predictor".to_string()),
        namespace: Some("worker-predictor-namespace".to_string()),
        ..Default::default()
    };
    let pod_spec = PodSpec {
        containers: vec![Container {
            name: "serving-container".to_string(),
            image: Some("example-image".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    };
    let worker_pod_spec = PodSpec {
        containers: vec![Container {
            name: "worker-container".to_string(),
            image: Some("worker-example-image".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    };
    let extension = ComponentExtensionSpec::default();
    let component = ComponentSpec {
        meta: &meta,
        worker_meta: &worker_meta,
        extension: &extension,
        mode: DeploymentMode::RawDeployment,
        autoscaler_class: AutoscalerClass::External,
        pod_spec: &pod_spec,
        worker_pod_spec: Some(&worker_pod_spec),
    };
    build_raw_workloads(&component, &RawWorkloadConfig::default()).unwrap()
}

#[tokio::test]
async fn creates_both_objects_when_absent() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let set = multi_node_workloads();
    let client = FakeClient::default();

    let reconciler = WorkloadReconciler::new(&client);
    reconciler.reconcile(&set).await.unwrap();

    let creates = client.creates.lock().unwrap().clone();
    assert_eq!(
        creates,
        vec![
            (
                "default-predictor-namespace".to_string(),
                "default-predictor".to_string()
            ),
            (
                "worker-predictor-namespace".to_string(),
                "worker-predictor".to_string()
            ),
        ]
    );
    assert!(client.patches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn patches_only_owned_fields_when_present() {
    let set = multi_node_workloads();

    // Live head carries state this engine does not own
    let mut live_head = set.head.clone();
    live_head.metadata.resource_version = Some("41".to_string());
    live_head
        .metadata
        .labels
        .get_or_insert_with(Default::default)
        .insert("team".to_string(), "ml-infra".to_string());

    let client = FakeClient::with_existing(vec![live_head, set.worker.clone().unwrap()]);
    let reconciler = WorkloadReconciler::new(&client);
    reconciler.reconcile(&set).await.unwrap();

    let patches = client.patches.lock().unwrap().clone();
    assert_eq!(patches.len(), 2);
    assert!(client.creates.lock().unwrap().is_empty());

    let (namespace, name, head_patch) = &patches[0];
    assert_eq!(namespace, "default-predictor-namespace");
    assert_eq!(name, "default-predictor");
    // Only forced labels ride in the patch; foreign labels and
    // resourceVersion stay untouched on the live object
    let labels = head_patch["metadata"]["labels"].as_object().unwrap();
    assert!(!labels.contains_key("team"));
    assert_eq!(labels["app"], serde_json::json!("isvc.default-predictor"));
    assert!(head_patch["metadata"].get("resourceVersion").is_none());
    assert!(head_patch.get("status").is_none());
    // Head replicas stay autoscaler-owned
    assert!(head_patch["spec"].get("replicas").is_none());
    assert!(head_patch["spec"].get("template").is_some());

    let (_, worker_name, worker_patch) = &patches[1];
    assert_eq!(worker_name, "worker-predictor");
    assert_eq!(worker_patch["spec"]["replicas"], serde_json::json!(1));
}

#[tokio::test]
async fn second_pass_patches_what_the_first_created() {
    let set = multi_node_workloads();
    let client = FakeClient::default();

    let reconciler = WorkloadReconciler::new(&client);
    reconciler.reconcile(&set).await.unwrap();
    reconciler.reconcile(&set).await.unwrap();

    assert_eq!(client.creates.lock().unwrap().len(), 2);
    assert_eq!(client.patches.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn worker_conflict_is_named_and_retryable() {
    let set = multi_node_workloads();
    let mut client = FakeClient::with_existing(vec![set.head.clone(), set.worker.clone().unwrap()]);
    client.conflict_on = Some("worker-predictor".to_string());

    let reconciler = WorkloadReconciler::new(&client);
    let err = reconciler.reconcile(&set).await.unwrap_err();

    assert!(err.is_retryable(), "conflicts must be retryable: {err}");
    match err {
        ReconcileError::Workload { object, source } => {
            assert_eq!(object, "worker");
            assert!(matches!(*source, ReconcileError::Conflict { .. }));
        }
        other => panic!("expected workload-tagged error, got {other}"),
    }

    // The head write landed before the worker failed; the next idempotent
    // pass completes the half-applied reconciliation
    let patches = client.patches.lock().unwrap().clone();
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].1, "default-predictor");
}
