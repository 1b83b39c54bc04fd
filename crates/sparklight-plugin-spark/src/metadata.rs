use sparklight_plugin_api::*;

pub const DISPLAY_NAME: &str = "Send build status to a spark.io powered traffic light";

pub fn create_metadata() -> PluginMetadata {
    PluginMetadata {
        name: "Spark Traffic Light".to_string(),
        provider_type: "spark".to_string(),
        display_name: DISPLAY_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Show the result of each build on a spark.io connected traffic light"
            .to_string(),
        author: Some("Sparklight Team".to_string()),
        config_schema: create_config_schema(),
    }
}

fn create_config_schema() -> ConfigSchema {
    ConfigSchema::new()
        .add_field(ConfigField {
            key: "device_id".to_string(),
            label: "Device ID".to_string(),
            description: Some("ID of the spark.io core driving the traffic light".to_string()),
            field_type: ConfigFieldType::Text,
            scope: ConfigScope::PerJob,
            required: true,
            default_value: None,
        })
        .add_field(ConfigField {
            key: "access_token".to_string(),
            label: "Access Token".to_string(),
            description: Some("spark.io cloud API access token".to_string()),
            field_type: ConfigFieldType::Password,
            scope: ConfigScope::Global,
            required: true,
            default_value: None,
        })
}
