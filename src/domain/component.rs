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

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy governing how the replica count of a workload is determined.
///
/// Resolved upstream by the mode-selection reconciler; this core only consumes
/// the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoscalerClass {
    /// Platform-managed horizontal pod autoscaling (the default class).
    #[default]
    Hpa,
    /// Event-driven autoscaling managed by KEDA.
    Keda,
    /// Replica count is managed entirely outside the platform.
    External,
}

impl AutoscalerClass {
    /// Whether an in-cluster autoscaler owns the replica count.
    pub fn is_autoscaler_managed(&self) -> bool {
        matches!(self, AutoscalerClass::Hpa | AutoscalerClass::Keda)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AutoscalerClass::Hpa => "hpa",
            AutoscalerClass::Keda => "keda",
            AutoscalerClass::External => "external",
        }
    }
}

impl fmt::Display for AutoscalerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Orchestration style of the component, decided upstream of this core and
/// consumed here only for the deployment-mode label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeploymentMode {
    #[default]
    RawDeployment,
    Serverless,
}

impl DeploymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::RawDeployment => "RawDeployment",
            DeploymentMode::Serverless => "Serverless",
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric driving horizontal scaling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMetric {
    Cpu,
    Memory,
    Concurrency,
    Rps,
}

/// Scaling configuration shared by every component of an inference service.
///
/// All fields optional; a fully empty spec means "defer to autoscaler
/// defaults".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentExtensionSpec {
    pub min_replicas: Option<i32>,
    pub max_replicas: Option<i32>,
    pub scale_metric: Option<ScaleMetric>,
    pub scale_target: Option<i32>,
}

impl ComponentExtensionSpec {
    /// True when no scaling field was supplied by the caller.
    pub fn is_empty(&self) -> bool {
        self.min_replicas.is_none()
            && self.max_replicas.is_none()
            && self.scale_metric.is_none()
            && self.scale_target.is_none()
    }
}
