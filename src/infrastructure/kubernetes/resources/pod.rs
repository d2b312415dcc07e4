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

//! Pod-spec normalization
//!
//! Fills the defaults a serving pod needs without ever overriding what the
//! caller set. The input template is treated as a value: normalization
//! produces a derived copy, so reconciling the same template for several
//! components cannot alias.

use crate::domain::config::RawWorkloadConfig;
use k8s_openapi::api::core::v1::{Container, PodSpec, Probe, TCPSocketAction};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

/// The primary container of a pod template. The webhook layer guarantees at
/// least one container; the first one carries the component's main process.
pub fn primary_container(spec: &PodSpec) -> Option<&Container> {
    spec.containers.first()
}

/// Derive a normalized copy of a pod spec.
///
/// Additive and idempotent: every rule only fires when the field is unset, so
/// normalizing an already-normalized spec is a no-op.
pub fn normalize_pod_spec(spec: &PodSpec, config: &RawWorkloadConfig) -> PodSpec {
    let mut normalized = spec.clone();

    // Serving pods get no API credentials unless explicitly requested.
    if normalized.automount_service_account_token.is_none() {
        normalized.automount_service_account_token = Some(false);
    }

    for container in normalized.containers.iter_mut() {
        set_container_defaults(container, config);
    }

    normalized
}

/// Normalize a pod spec that fronts serving traffic: container defaults plus a
/// synthesized TCP readiness probe on the primary container when the caller
/// supplied none. Caller-specified probes are never overwritten.
pub fn normalize_serving_pod_spec(spec: &PodSpec, config: &RawWorkloadConfig) -> PodSpec {
    let mut normalized = normalize_pod_spec(spec, config);

    let port = probe_port(&normalized, config);
    if let Some(container) = normalized.containers.first_mut() {
        if container.readiness_probe.is_none() {
            container.readiness_probe = Some(default_readiness_probe(port, config));
        }
    }

    normalized
}

fn set_container_defaults(container: &mut Container, config: &RawWorkloadConfig) {
    if container.image_pull_policy.is_none() {
        container.image_pull_policy = Some(config.image_pull_policy.clone());
    }
    if container.termination_message_policy.is_none() {
        container.termination_message_policy = Some(config.termination_message_policy.clone());
    }
    if container.termination_message_path.is_none() {
        container.termination_message_path = Some(config.termination_message_path.clone());
    }
}

/// Port probed for readiness: the primary container's first declared port,
/// falling back to the platform serving port.
fn probe_port(spec: &PodSpec, config: &RawWorkloadConfig) -> i32 {
    primary_container(spec)
        .and_then(|c| c.ports.as_ref())
        .and_then(|ports| ports.first())
        .map(|port| port.container_port)
        .unwrap_or(config.default_serving_port)
}

fn default_readiness_probe(port: i32, config: &RawWorkloadConfig) -> Probe {
    Probe {
        tcp_socket: Some(TCPSocketAction {
            port: IntOrString::Int(port),
            ..Default::default()
        }),
        timeout_seconds: Some(config.probe.timeout_seconds),
        period_seconds: Some(config.probe.period_seconds),
        success_threshold: Some(config.probe.success_threshold),
        failure_threshold: Some(config.probe.failure_threshold),
        ..Default::default()
    }
}
