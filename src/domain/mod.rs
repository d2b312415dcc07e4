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

//! Component domain: value types and pure scaling/topology decisions

pub mod component;
pub mod config;
pub mod topology;

pub use self::component::{AutoscalerClass, ComponentExtensionSpec, DeploymentMode, ScaleMetric};
pub use self::config::{ProbeConfig, RawWorkloadConfig};
pub use self::topology::{replica_directives, ReplicaDirective, Topology};
