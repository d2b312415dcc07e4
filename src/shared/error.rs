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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, ReconcileError>;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Pod spec for '{object}' declares no containers")]
    MissingContainer { object: String },

    #[error("Invalid quantity for {name}: '{value}' ({reason})")]
    InvalidQuantity {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Kubernetes API error (status {code}): {message}")]
    Api { code: u16, message: String },

    #[error("Conflict updating {resource_type} '{name}' in namespace '{namespace}': {message}")]
    Conflict {
        resource_type: String,
        name: String,
        namespace: String,
        message: String,
    },

    #[error("Kubernetes transport error: {0}")]
    Transport(String),

    #[error("Failed reconciling {object}: {source}")]
    Workload {
        object: String,
        #[source]
        source: Box<ReconcileError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<kube::Error> for ReconcileError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(ae) => ReconcileError::Api {
                code: ae.code,
                message: ae.message,
            },
            other => ReconcileError::Transport(other.to_string()),
        }
    }
}

impl ReconcileError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn missing_container(object: impl Into<String>) -> Self {
        Self::MissingContainer {
            object: object.into(),
        }
    }

    pub fn invalid_quantity(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidQuantity {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an error with the sub-object it belongs to (head or worker), so a
    /// partially applied reconciliation pass reports which write failed.
    pub fn for_workload(self, object: impl Into<String>) -> Self {
        Self::Workload {
            object: object.into(),
            source: Box::new(self),
        }
    }

    /// Whether the caller's control loop should re-queue and retry.
    ///
    /// Conflicts and transient API failures are retryable; input-shape and
    /// authorization failures are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ReconcileError::Conflict { .. } | ReconcileError::Transport(_) => true,
            ReconcileError::Api { code, .. } => {
                matches!(code, 408 | 409 | 423 | 429) || *code >= 500
            }
            ReconcileError::Workload { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}
