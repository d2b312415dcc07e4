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

//! Desired-state construction for inference-service workloads

pub mod deployment;
pub mod metadata;
pub mod multinode;
pub mod pod;

pub use self::deployment::{build_raw_workloads, ComponentSpec, WorkloadSet};
pub use self::metadata::{app_label_value, merge_component_meta};
pub use self::multinode::{
    ensure_head_accelerator, inject_head_env, inject_worker_env, propagate_accelerators,
};
pub use self::pod::{normalize_pod_spec, normalize_serving_pod_spec, primary_container};
