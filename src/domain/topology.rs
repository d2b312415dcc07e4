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

use crate::domain::component::AutoscalerClass;
use k8s_openapi::api::core::v1::PodSpec;

/// Deployment topology of a component, resolved once from the presence of a
/// worker pod template instead of nil-checking downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum Topology<'a> {
    SingleNode,
    MultiNode { worker_spec: &'a PodSpec },
}

impl<'a> Topology<'a> {
    pub fn resolve(worker_spec: Option<&'a PodSpec>) -> Self {
        match worker_spec {
            Some(worker_spec) => Topology::MultiNode { worker_spec },
            None => Topology::SingleNode,
        }
    }

    pub fn is_multi_node(&self) -> bool {
        matches!(self, Topology::MultiNode { .. })
    }
}

/// Who owns the replica count of a workload object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicaDirective {
    /// Replicas are intentionally left unset so an autoscaler (or a separate
    /// default-replica mechanism) owns the field.
    AutoscalerManaged,
    /// Replicas are pinned by this engine.
    Fixed(i32),
}

impl ReplicaDirective {
    /// The value to place in `spec.replicas`, `None` meaning "omit".
    pub fn as_replicas(&self) -> Option<i32> {
        match self {
            ReplicaDirective::AutoscalerManaged => None,
            ReplicaDirective::Fixed(n) => Some(*n),
        }
    }
}

/// Replica directives for the head and (if present) worker workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplicaDirectives {
    pub head: ReplicaDirective,
    pub worker: Option<ReplicaDirective>,
}

/// Resolve replica ownership from the topology and autoscaler class.
///
/// The head replica count is never pinned here: HPA-class autoscalers own it
/// in-cluster and external autoscalers manage it elsewhere. Workers scale 1:1
/// with the head by convention, so under the external class the worker starts
/// at a fixed, safe count of 1.
pub fn replica_directives(topology: &Topology<'_>, class: AutoscalerClass) -> ReplicaDirectives {
    let worker = if topology.is_multi_node() {
        Some(match class {
            AutoscalerClass::External => ReplicaDirective::Fixed(1),
            _ => ReplicaDirective::AutoscalerManaged,
        })
    } else {
        None
    };

    ReplicaDirectives {
        head: ReplicaDirective::AutoscalerManaged,
        worker,
    }
}
