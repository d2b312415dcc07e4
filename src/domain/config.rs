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

//! Defaulting configuration for workload construction
//!
//! Every implicit default the normalizer and builder apply lives here as a
//! named field, so operators can override it and test suites can pin it.

use crate::infrastructure::constants::*;
use crate::shared::error::{ReconcileError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Timings for the synthesized TCP readiness probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProbeConfig {
    pub timeout_seconds: i32,
    pub period_seconds: i32,
    pub success_threshold: i32,
    pub failure_threshold: i32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: PROBE_TIMEOUT_SECONDS,
            period_seconds: PROBE_PERIOD_SECONDS,
            success_threshold: PROBE_SUCCESS_THRESHOLD,
            failure_threshold: PROBE_FAILURE_THRESHOLD,
        }
    }
}

/// Global defaults applied while computing the desired workload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawWorkloadConfig {
    pub image_pull_policy: String,
    pub termination_message_policy: String,
    pub termination_message_path: String,
    /// Serving port for the synthesized readiness probe when the primary
    /// container declares no port of its own.
    pub default_serving_port: i32,
    pub probe: ProbeConfig,
    /// Accelerator resource defaulted onto the head container in multi-node
    /// topology when it declares none.
    pub default_gpu_resource: String,
    pub field_manager: String,
}

impl Default for RawWorkloadConfig {
    fn default() -> Self {
        Self {
            image_pull_policy: DEFAULT_IMAGE_PULL_POLICY.to_string(),
            termination_message_policy: DEFAULT_TERMINATION_MESSAGE_POLICY.to_string(),
            termination_message_path: DEFAULT_TERMINATION_MESSAGE_PATH.to_string(),
            default_serving_port: DEFAULT_SERVING_PORT,
            probe: ProbeConfig::default(),
            default_gpu_resource: DEFAULT_GPU_RESOURCE_TYPE.to_string(),
            field_manager: FIELD_MANAGER.to_string(),
        }
    }
}

impl RawWorkloadConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: RawWorkloadConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ReconcileError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=65535).contains(&self.default_serving_port) {
            return Err(ReconcileError::ConfigError(format!(
                "defaultServingPort must be in 1..=65535, got {}",
                self.default_serving_port
            )));
        }

        for (name, value) in [
            ("timeoutSeconds", self.probe.timeout_seconds),
            ("periodSeconds", self.probe.period_seconds),
            ("successThreshold", self.probe.success_threshold),
            ("failureThreshold", self.probe.failure_threshold),
        ] {
            if value <= 0 {
                return Err(ReconcileError::ConfigError(format!(
                    "probe.{} must be positive, got {}",
                    name, value
                )));
            }
        }

        if self.default_gpu_resource.is_empty() {
            return Err(ReconcileError::ConfigError(
                "defaultGpuResource must not be empty".to_string(),
            ));
        }

        if self.field_manager.is_empty() {
            return Err(ReconcileError::ConfigError(
                "fieldManager must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_platform_constants() {
        let config = RawWorkloadConfig::default();
        assert_eq!(config.image_pull_policy, "IfNotPresent");
        assert_eq!(config.termination_message_path, "/dev/termination-log");
        assert_eq!(config.default_serving_port, 8080);
        assert_eq!(config.probe.timeout_seconds, 1);
        assert_eq!(config.probe.period_seconds, 10);
        assert_eq!(config.probe.success_threshold, 1);
        assert_eq!(config.probe.failure_threshold, 3);
        assert_eq!(config.default_gpu_resource, "nvidia.com/gpu");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = RawWorkloadConfig::from_yaml_str("defaultServingPort: 9000\n").unwrap();
        assert_eq!(config.default_serving_port, 9000);
        assert_eq!(config.image_pull_policy, "IfNotPresent");
        assert_eq!(config.probe, ProbeConfig::default());
    }

    #[test]
    fn rejects_invalid_port() {
        let err = RawWorkloadConfig::from_yaml_str("defaultServingPort: 0\n").unwrap_err();
        assert!(matches!(err, ReconcileError::ConfigError(_)));
    }

    #[test]
    fn rejects_non_positive_probe_timing() {
        let err =
            RawWorkloadConfig::from_yaml_str("probe:\n  periodSeconds: -1\n").unwrap_err();
        assert!(err.to_string().contains("periodSeconds"));
    }
}
