use serde::{Deserialize, Serialize};

/// How often the re-enable popup may be shown after a denial
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopupFrequency {
    #[default]
    Always,
    Once,
    Never,
}

/// 单个能力的弹窗策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionConfiguration {
    #[serde(default)]
    pub frequency: PopupFrequency,
    #[serde(default = "default_true")]
    pub present_initial_popup: bool,
    #[serde(default = "default_true")]
    pub present_re_enable_popup: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PermissionConfiguration {
    fn default() -> Self {
        Self {
            frequency: PopupFrequency::default(),
            present_initial_popup: true,
            present_re_enable_popup: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config: PermissionConfiguration =
            serde_json::from_str(r#"{"frequency": "Once"}"#).unwrap();
        assert_eq!(config.frequency, PopupFrequency::Once);
        assert!(config.present_initial_popup);
        assert!(config.present_re_enable_popup);
    }

    #[test]
    fn serializes_with_snake_case_keys() {
        let config = PermissionConfiguration {
            frequency: PopupFrequency::Never,
            present_initial_popup: false,
            present_re_enable_popup: true,
        };
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json["frequency"], "Never");
        assert_eq!(json["present_initial_popup"], false);
        assert_eq!(json["present_re_enable_popup"], true);
    }
}
