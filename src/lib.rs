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

// Core modules
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export commonly used types
pub use domain::component::{AutoscalerClass, ComponentExtensionSpec, DeploymentMode, ScaleMetric};
pub use domain::config::{ProbeConfig, RawWorkloadConfig};
pub use domain::topology::{replica_directives, ReplicaDirective, Topology};
pub use infrastructure::kubernetes::resources::{build_raw_workloads, ComponentSpec, WorkloadSet};
pub use infrastructure::kubernetes::{KubeWorkloadClient, WorkloadClient, WorkloadReconciler};
pub use shared::{ReconcileError, Result};

// Re-export normalization helpers for internal use
#[doc(hidden)]
pub use infrastructure::kubernetes::resources::{
    merge_component_meta, normalize_pod_spec, normalize_serving_pod_spec,
};
