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

//! Multi-node coordination: environment injection and accelerator propagation
//!
//! Head and worker containers of a distributed inference job discover each
//! other and size their parallelism through a fixed set of environment
//! variables. The keys are always declared, even without a value, because
//! downstream runtimes read them positionally.

use crate::domain::config::RawWorkloadConfig;
use crate::infrastructure::constants::*;
use crate::shared::error::{ReconcileError, Result};
use k8s_openapi::api::core::v1::{Container, EnvVar};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use std::collections::BTreeMap;

/// Value of an environment variable already declared on a container.
pub fn env_value<'a>(container: &'a Container, name: &str) -> Option<&'a str> {
    container
        .env
        .as_ref()
        .and_then(|env| env.iter().find(|e| e.name == name))
        .and_then(|e| e.value.as_deref())
}

fn has_env(container: &Container, name: &str) -> bool {
    container
        .env
        .as_ref()
        .is_some_and(|env| env.iter().any(|e| e.name == name))
}

/// Append an env entry unless the key is already declared. Existing entries
/// are never removed, replaced, or reordered.
fn append_env_if_absent(container: &mut Container, name: &str, value: Option<String>) {
    if has_env(container, name) {
        return;
    }
    container.env.get_or_insert_with(Vec::new).push(EnvVar {
        name: name.to_string(),
        value,
        ..Default::default()
    });
}

/// Inject head-side coordination variables: the model identity workers use to
/// discover their head, and the pipeline-parallel size.
pub fn inject_head_env(container: &mut Container, model_name: Option<String>) {
    let pipeline_size = env_value(container, ENV_PIPELINE_PARALLEL_SIZE).map(str::to_string);
    append_env_if_absent(container, ENV_MODEL_NAME, model_name);
    append_env_if_absent(container, ENV_PIPELINE_PARALLEL_SIZE, pipeline_size);
}

/// Inject worker-side coordination variables: the owning inference-service
/// identity and the same pipeline-parallel size as the head.
pub fn inject_worker_env(
    container: &mut Container,
    isvc_name: Option<String>,
    pipeline_parallel_size: Option<String>,
) {
    append_env_if_absent(container, ENV_ISVC_NAME, isvc_name);
    append_env_if_absent(container, ENV_PIPELINE_PARALLEL_SIZE, pipeline_parallel_size);
}

/// Tensor-parallel size declared on the head container, used as the default
/// accelerator count. Must be a positive integer when present.
pub fn tensor_parallel_size(container: &Container) -> Result<String> {
    match env_value(container, ENV_TENSOR_PARALLEL_SIZE) {
        Some(value) => match value.parse::<u32>() {
            Ok(n) if n > 0 => Ok(value.to_string()),
            _ => Err(ReconcileError::invalid_quantity(
                ENV_TENSOR_PARALLEL_SIZE,
                value,
                "expected a positive integer",
            )),
        },
        None => Ok(DEFAULT_TENSOR_PARALLEL_SIZE.to_string()),
    }
}

fn is_accelerator(resource_name: &str) -> bool {
    !NON_ACCELERATOR_RESOURCES.contains(&resource_name)
}

fn declared_gpu_type(container: &Container) -> Option<String> {
    let resources = container.resources.as_ref()?;
    for gpu_type in GPU_RESOURCE_TYPES {
        let in_requests = resources
            .requests
            .as_ref()
            .is_some_and(|r| r.contains_key(*gpu_type));
        let in_limits = resources
            .limits
            .as_ref()
            .is_some_and(|l| l.contains_key(*gpu_type));
        if in_requests || in_limits {
            return Some((*gpu_type).to_string());
        }
    }
    None
}

/// Make sure the head container carries an accelerator request and limit.
///
/// An already-declared GPU entry keeps its quantity and is mirrored into
/// whichever of the two maps lacks it; otherwise the configured default GPU
/// resource is set to `count` in both.
pub fn ensure_head_accelerator(
    container: &mut Container,
    config: &RawWorkloadConfig,
    count: &str,
) {
    let gpu_type = declared_gpu_type(container).unwrap_or_else(|| config.default_gpu_resource.clone());

    let resources = container.resources.get_or_insert_with(Default::default);
    let requests = resources.requests.get_or_insert_with(BTreeMap::new);
    let limits = resources.limits.get_or_insert_with(BTreeMap::new);

    let declared = requests
        .get(&gpu_type)
        .or_else(|| limits.get(&gpu_type))
        .cloned()
        .unwrap_or_else(|| Quantity(count.to_string()));

    requests.entry(gpu_type.clone()).or_insert_with(|| declared.clone());
    limits.entry(gpu_type).or_insert(declared);
}

/// Copy every accelerator entry (anything outside cpu/memory/storage) from the
/// head container's requests and limits verbatim onto the worker container.
///
/// A head with no accelerator entries leaves the worker's resource maps as the
/// caller declared them.
pub fn propagate_accelerators(head: &Container, worker: &mut Container) {
    let Some(head_resources) = head.resources.as_ref() else {
        return;
    };

    let head_requests = accelerator_entries(head_resources.requests.as_ref());
    let head_limits = accelerator_entries(head_resources.limits.as_ref());
    if head_requests.is_empty() && head_limits.is_empty() {
        return;
    }

    let resources = worker.resources.get_or_insert_with(Default::default);
    if !head_requests.is_empty() {
        let requests = resources.requests.get_or_insert_with(BTreeMap::new);
        for (name, quantity) in head_requests {
            requests.insert(name, quantity);
        }
    }
    if !head_limits.is_empty() {
        let limits = resources.limits.get_or_insert_with(BTreeMap::new);
        for (name, quantity) in head_limits {
            limits.insert(name, quantity);
        }
    }
}

fn accelerator_entries(map: Option<&BTreeMap<String, Quantity>>) -> Vec<(String, Quantity)> {
    map.map(|m| {
        m.iter()
            .filter(|(name, _)| is_accelerator(name))
            .map(|(name, quantity)| (name.clone(), quantity.clone()))
            .collect()
    })
    .unwrap_or_default()
}
