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

//! Desired-state builder
//!
//! Composes metadata merging, pod-spec normalization, topology resolution,
//! and multi-node injection into the concrete Deployment objects a component
//! needs. Built fresh on every reconciliation pass; never cached.

use crate::domain::component::{AutoscalerClass, ComponentExtensionSpec, DeploymentMode};
use crate::domain::config::RawWorkloadConfig;
use crate::domain::topology::{replica_directives, ReplicaDirective, Topology};
use crate::infrastructure::constants::*;
use crate::infrastructure::kubernetes::resources::metadata::{
    app_label_value, inference_service_name, merge_component_meta, selector_labels,
};
use crate::infrastructure::kubernetes::resources::multinode::{
    ensure_head_accelerator, env_value, inject_head_env, inject_worker_env,
    propagate_accelerators, tensor_parallel_size,
};
use crate::infrastructure::kubernetes::resources::pod::{
    normalize_pod_spec, normalize_serving_pod_spec, primary_container,
};
use crate::shared::error::{ReconcileError, Result};
use k8s_openapi::api::apps::v1::{
    Deployment, DeploymentSpec, DeploymentStrategy, RollingUpdateDeployment,
};
use k8s_openapi::api::core::v1::{PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

/// Normalized inputs for one component, as handed over by the mode-selection
/// reconciler after webhook validation.
#[derive(Debug, Clone)]
pub struct ComponentSpec<'a> {
    pub meta: &'a ObjectMeta,
    /// Metadata for the worker workload; may target a different namespace.
    pub worker_meta: &'a ObjectMeta,
    pub extension: &'a ComponentExtensionSpec,
    pub mode: DeploymentMode,
    pub autoscaler_class: AutoscalerClass,
    pub pod_spec: &'a PodSpec,
    /// Present only for multi-node components.
    pub worker_pod_spec: Option<&'a PodSpec>,
}

/// The workload objects one reconciliation pass converges toward.
///
/// `worker` is `None` for single-node components; callers treat that as "no
/// worker object to reconcile", not as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadSet {
    pub head: Deployment,
    pub worker: Option<Deployment>,
}

impl WorkloadSet {
    /// The contained objects, tagged with the name used in error reports.
    pub fn iter_named(&self) -> impl Iterator<Item = (&'static str, &Deployment)> {
        std::iter::once(("head", &self.head))
            .chain(self.worker.iter().map(|worker| ("worker", worker)))
    }
}

/// Compute the full set of workload objects for a component.
///
/// Pure with respect to the cluster: same inputs, same objects, every pass.
pub fn build_raw_workloads(
    component: &ComponentSpec<'_>,
    config: &RawWorkloadConfig,
) -> Result<WorkloadSet> {
    let name = component
        .meta
        .name
        .as_deref()
        .ok_or_else(|| ReconcileError::config_error("component metadata must carry a name"))?;

    if component.pod_spec.containers.is_empty() {
        return Err(ReconcileError::missing_container("head"));
    }

    let topology = Topology::resolve(component.worker_pod_spec);
    let directives = replica_directives(&topology, component.autoscaler_class);

    let head = build_head_deployment(component, name, &topology, directives.head, config)?;

    let worker = match &topology {
        Topology::SingleNode => None,
        Topology::MultiNode { worker_spec } => {
            let directive = directives
                .worker
                .unwrap_or(ReplicaDirective::AutoscalerManaged);
            Some(build_worker_deployment(
                component,
                name,
                worker_spec,
                &head,
                directive,
                config,
            )?)
        }
    };

    Ok(WorkloadSet { head, worker })
}

fn build_head_deployment(
    component: &ComponentSpec<'_>,
    name: &str,
    topology: &Topology<'_>,
    directive: ReplicaDirective,
    config: &RawWorkloadConfig,
) -> Result<Deployment> {
    let app_label = app_label_value(name);
    let meta = merge_component_meta(
        component.meta,
        &app_label,
        component.mode,
        component.autoscaler_class,
    );

    let mut pod_spec = normalize_serving_pod_spec(component.pod_spec, config);

    if topology.is_multi_node() {
        // Worker GPU shape mirrors the head, so the head must declare one.
        let gpu_count = tensor_parallel_size(&pod_spec.containers[0])?;
        ensure_head_accelerator(&mut pod_spec.containers[0], config, &gpu_count);
        inject_head_env(
            &mut pod_spec.containers[0],
            inference_service_name(component.meta),
        );
    }

    Ok(deployment(meta, &app_label, directive, pod_spec))
}

fn build_worker_deployment(
    component: &ComponentSpec<'_>,
    head_name: &str,
    worker_spec: &PodSpec,
    head: &Deployment,
    directive: ReplicaDirective,
    config: &RawWorkloadConfig,
) -> Result<Deployment> {
    if worker_spec.containers.is_empty() {
        return Err(ReconcileError::missing_container("worker"));
    }

    let app_label = format!("{}{}", app_label_value(head_name), WORKER_SUFFIX);
    let mut meta = merge_component_meta(
        component.worker_meta,
        &app_label,
        component.mode,
        component.autoscaler_class,
    );
    if meta.name.is_none() {
        meta.name = Some(format!("{}{}", head_name, WORKER_SUFFIX));
    }
    if meta.namespace.is_none() {
        meta.namespace = component.meta.namespace.clone();
    }

    let mut pod_spec = normalize_pod_spec(worker_spec, config);

    // Parallel sizing declared on the head flows to every worker.
    let pipeline_size = primary_container(component.pod_spec)
        .and_then(|c| env_value(c, ENV_PIPELINE_PARALLEL_SIZE))
        .map(str::to_string);
    inject_worker_env(
        &mut pod_spec.containers[0],
        inference_service_name(component.worker_meta),
        pipeline_size,
    );

    if let Some(head_primary) = head
        .spec
        .as_ref()
        .and_then(|s| s.template.spec.as_ref())
        .and_then(|s| s.containers.first())
    {
        propagate_accelerators(head_primary, &mut pod_spec.containers[0]);
    }

    Ok(deployment(meta, &app_label, directive, pod_spec))
}

fn deployment(
    meta: ObjectMeta,
    app_label: &str,
    directive: ReplicaDirective,
    pod_spec: PodSpec,
) -> Deployment {
    let mut spec = DeploymentSpec {
        replicas: directive.as_replicas(),
        selector: LabelSelector {
            match_labels: Some(selector_labels(app_label)),
            ..Default::default()
        },
        template: PodTemplateSpec {
            metadata: Some(meta.clone()),
            spec: Some(pod_spec),
        },
        ..Default::default()
    };
    set_default_deployment_spec(&mut spec);

    Deployment {
        metadata: meta,
        spec: Some(spec),
        ..Default::default()
    }
}

fn set_default_deployment_spec(spec: &mut DeploymentSpec) {
    if spec.strategy.is_none() {
        spec.strategy = Some(DeploymentStrategy {
            type_: Some(STRATEGY_TYPE_ROLLING_UPDATE.to_string()),
            rolling_update: Some(RollingUpdateDeployment {
                max_unavailable: Some(IntOrString::String(MAX_UNAVAILABLE.to_string())),
                max_surge: Some(IntOrString::String(MAX_SURGE.to_string())),
            }),
        });
    }
    if spec.revision_history_limit.is_none() {
        spec.revision_history_limit = Some(REVISION_HISTORY_LIMIT);
    }
    if spec.progress_deadline_seconds.is_none() {
        spec.progress_deadline_seconds = Some(PROGRESS_DEADLINE_SECONDS);
    }
}
