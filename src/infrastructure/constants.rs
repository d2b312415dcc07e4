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

/// Resource labels
pub const LABEL_APP: &str = "app";
pub const LABEL_AUTOSCALER_CLASS: &str = "serving.inference-kube.io/autoscalerClass";
pub const LABEL_DEPLOYMENT_MODE: &str = "serving.inference-kube.io/deploymentMode";
pub const LABEL_INFERENCE_SERVICE: &str = "serving.inference-kube.io/inferenceservice";

/// Prefix for the `app` label value and selector of every managed workload
pub const APP_LABEL_PREFIX: &str = "isvc.";

/// Naming convention for the worker workload
pub const WORKER_SUFFIX: &str = "-worker";

/// Container defaults
pub const DEFAULT_IMAGE_PULL_POLICY: &str = "IfNotPresent";
pub const DEFAULT_TERMINATION_MESSAGE_POLICY: &str = "File";
pub const DEFAULT_TERMINATION_MESSAGE_PATH: &str = "/dev/termination-log";

/// Serving port assumed when the primary container declares none
pub const DEFAULT_SERVING_PORT: i32 = 8080;

/// Readiness probe defaults
pub const PROBE_TIMEOUT_SECONDS: i32 = 1;
pub const PROBE_PERIOD_SECONDS: i32 = 10;
pub const PROBE_SUCCESS_THRESHOLD: i32 = 1;
pub const PROBE_FAILURE_THRESHOLD: i32 = 3;

/// Distributed coordination environment variables
pub const ENV_MODEL_NAME: &str = "MODEL_NAME";
pub const ENV_ISVC_NAME: &str = "ISVC_NAME";
pub const ENV_PIPELINE_PARALLEL_SIZE: &str = "PIPELINE_PARALLEL_SIZE";
pub const ENV_TENSOR_PARALLEL_SIZE: &str = "TENSOR_PARALLEL_SIZE";

/// Accelerator resource names recognized on the head container, checked in order
pub const GPU_RESOURCE_TYPES: &[&str] = &[
    "nvidia.com/gpu",
    "amd.com/gpu",
    "intel.com/gpu",
    "habana.ai/gaudi",
];

/// Accelerator key defaulted onto the head container in multi-node topology
pub const DEFAULT_GPU_RESOURCE_TYPE: &str = "nvidia.com/gpu";

/// Worker GPU count used when no tensor-parallel size is declared
pub const DEFAULT_TENSOR_PARALLEL_SIZE: &str = "1";

/// Resource names never treated as accelerators
pub const NON_ACCELERATOR_RESOURCES: &[&str] = &["cpu", "memory", "ephemeral-storage", "storage"];

/// Rolling update settings
pub const MAX_UNAVAILABLE: &str = "25%";
pub const MAX_SURGE: &str = "25%";

/// Deployment strategy
pub const STRATEGY_TYPE_ROLLING_UPDATE: &str = "RollingUpdate";

/// Deployment spec defaults
pub const REVISION_HISTORY_LIMIT: i32 = 10;
pub const PROGRESS_DEADLINE_SECONDS: i32 = 600;

/// Server-side field manager for create and patch calls
pub const FIELD_MANAGER: &str = "inference-kube";
