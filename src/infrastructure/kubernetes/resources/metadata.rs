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

use crate::domain::component::{AutoscalerClass, DeploymentMode};
use crate::infrastructure::constants::*;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Value of the `app` label owning a component's workload: `isvc.<name>`.
pub fn app_label_value(component_name: &str) -> String {
    format!("{}{}", APP_LABEL_PREFIX, component_name)
}

/// Selector labels for a workload identified by `app_label`.
pub fn selector_labels(app_label: &str) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(LABEL_APP.to_string(), app_label.to_string());
    labels
}

/// Merge caller-supplied metadata with the labels this engine owns.
///
/// The `app`, autoscaler-class, and deployment-mode labels always win over
/// caller-supplied values of the same key; every other label and annotation
/// passes through verbatim. The caller's metadata is never mutated.
pub fn merge_component_meta(
    meta: &ObjectMeta,
    app_label: &str,
    mode: DeploymentMode,
    class: AutoscalerClass,
) -> ObjectMeta {
    let mut merged = meta.clone();

    let labels = merged.labels.get_or_insert_with(BTreeMap::new);
    labels.insert(LABEL_APP.to_string(), app_label.to_string());
    labels.insert(LABEL_AUTOSCALER_CLASS.to_string(), class.to_string());
    labels.insert(LABEL_DEPLOYMENT_MODE.to_string(), mode.to_string());

    merged
}

/// Identity of the owning inference service, read from the component metadata.
pub fn inference_service_name(meta: &ObjectMeta) -> Option<String> {
    meta.labels
        .as_ref()
        .and_then(|labels| labels.get(LABEL_INFERENCE_SERVICE))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller_meta() -> ObjectMeta {
        let mut labels = BTreeMap::new();
        labels.insert("team".to_string(), "ml-infra".to_string());
        labels.insert(LABEL_APP.to_string(), "caller-override".to_string());
        let mut annotations = BTreeMap::new();
        annotations.insert("annotation".to_string(), "annotation-value".to_string());
        ObjectMeta {
            name: Some("default-predictor".to_string()),
            namespace: Some("default-predictor-namespace".to_string()),
            labels: Some(labels),
            annotations: Some(annotations),
            ..Default::default()
        }
    }

    #[test]
    fn forced_labels_win_over_caller_values() {
        let meta = caller_meta();
        let merged = merge_component_meta(
            &meta,
            &app_label_value("default-predictor"),
            DeploymentMode::RawDeployment,
            AutoscalerClass::Hpa,
        );

        let labels = merged.labels.unwrap();
        assert_eq!(labels[LABEL_APP], "isvc.default-predictor");
        assert_eq!(labels[LABEL_AUTOSCALER_CLASS], "hpa");
        assert_eq!(labels[LABEL_DEPLOYMENT_MODE], "RawDeployment");
        // Untouched caller entries survive
        assert_eq!(labels["team"], "ml-infra");
        assert_eq!(
            merged.annotations.unwrap()["annotation"],
            "annotation-value"
        );
    }

    #[test]
    fn caller_input_is_not_mutated() {
        let meta = caller_meta();
        let _ = merge_component_meta(
            &meta,
            "isvc.default-predictor",
            DeploymentMode::RawDeployment,
            AutoscalerClass::External,
        );
        assert_eq!(
            meta.labels.as_ref().unwrap()[LABEL_APP],
            "caller-override"
        );
    }

    #[test]
    fn merging_without_caller_labels() {
        let meta = ObjectMeta {
            name: Some("default-predictor".to_string()),
            ..Default::default()
        };
        let merged = merge_component_meta(
            &meta,
            "isvc.default-predictor",
            DeploymentMode::Serverless,
            AutoscalerClass::Keda,
        );
        let labels = merged.labels.unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[LABEL_AUTOSCALER_CLASS], "keda");
        assert_eq!(labels[LABEL_DEPLOYMENT_MODE], "Serverless");
    }

    #[test]
    fn reads_service_identity_label() {
        let mut meta = caller_meta();
        assert_eq!(inference_service_name(&meta), None);
        meta.labels
            .as_mut()
            .unwrap()
            .insert(LABEL_INFERENCE_SERVICE.to_string(), "sklearn-iris".to_string());
        assert_eq!(
            inference_service_name(&meta).as_deref(),
            Some("sklearn-iris")
        );
    }
}
