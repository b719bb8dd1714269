use super::file::FileConfig;
use crate::cli::DiagramArgs;
use crate::error::{CliError, Result};
use chempot::engine::config::{DiagramConfig, DiagramConfigBuilder};
use std::str::FromStr;
use tracing::debug;

pub fn build_config(args: &DiagramArgs) -> Result<DiagramConfig> {
    let defaults = DiagramConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let file_config = apply_set_values(file_config, &args.set_values)?;

    let formal_chempots = if args.absolute {
        false
    } else {
        file_config
            .formal_chempots
            .unwrap_or(defaults.formal_chempots)
    };
    let default_min_limit = args
        .min_limit
        .or(file_config.default_min_limit)
        .unwrap_or(defaults.default_min_limit);
    let element_padding = args
        .padding
        .or(file_config.element_padding)
        .unwrap_or(defaults.element_padding);
    let subsystem_only = args.subsystem_only
        || file_config
            .subsystem_only
            .unwrap_or(defaults.subsystem_only);

    let mut builder = DiagramConfigBuilder::new()
        .formal_chempots(formal_chempots)
        .default_min_limit(default_min_limit)
        .element_padding(element_padding)
        .subsystem_only(subsystem_only);

    if let Some(elements) = args.elements.clone().or(file_config.elements) {
        builder = builder.elements(elements);
    }
    for (element, [min, max]) in file_config.limits {
        builder = builder.limit(element, min, max);
    }

    let config = builder.build()?;
    debug!("Final diagram configuration: {:?}", config);
    Ok(config)
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "formal-chempots" => {
                config.formal_chempots = Some(parse_value(key, value_str, "boolean")?);
            }
            "default-min-limit" => {
                config.default_min_limit = Some(parse_value(key, value_str, "float")?);
            }
            "element-padding" => {
                config.element_padding = Some(parse_value(key, value_str, "float")?);
            }
            "subsystem-only" => {
                config.subsystem_only = Some(parse_value(key, value_str, "boolean")?);
            }
            "elements" => {
                config.elements = Some(
                    value_str
                        .split(',')
                        .map(str::trim)
                        .filter(|el| !el.is_empty())
                        .map(str::to_string)
                        .collect(),
                );
            }
            _ => {
                let Some(element) = key.strip_prefix("limits.") else {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                };
                let Some((min, max)) = value_str.split_once(',') else {
                    return Err(CliError::Config(format!(
                        "Invalid limits value for {}: '{}'. Expected MIN,MAX.",
                        key, value_str
                    )));
                };
                config.limits.insert(
                    element.to_string(),
                    [
                        parse_value(key, min, "float")?,
                        parse_value(key, max, "float")?,
                    ],
                );
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chempot::engine::error::DiagramError;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_args() -> DiagramArgs {
        DiagramArgs {
            entries: PathBuf::from("entries.json"),
            config: None,
            elements: None,
            absolute: false,
            subsystem_only: false,
            min_limit: None,
            padding: None,
            set_values: vec![],
        }
    }

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diagram.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let config = build_config(&base_args()).unwrap();
        assert_eq!(config, DiagramConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let (_dir, path) = write_config(
            r#"
formal-chempots = false
default-min-limit = -30.0
elements = ["O", "Li"]
"#,
        );
        let mut args = base_args();
        args.config = Some(path);

        let config = build_config(&args).unwrap();
        assert!(!config.formal_chempots);
        assert_eq!(config.default_min_limit, -30.0);
        assert_eq!(config.element_padding, 1.0);
        assert_eq!(config.elements, Some(vec!["O".to_string(), "Li".to_string()]));
    }

    #[test]
    fn set_values_override_file_and_flags_override_set_values() {
        let (_dir, path) = write_config("default-min-limit = -30.0\nelement-padding = 3.0\n");
        let mut args = base_args();
        args.config = Some(path);
        args.set_values = vec![
            "default-min-limit=-40".to_string(),
            "element-padding=0.5".to_string(),
            "limits.O=-10,0".to_string(),
            "elements=Li, O".to_string(),
        ];
        args.padding = Some(2.0);

        let config = build_config(&args).unwrap();
        assert_eq!(config.default_min_limit, -40.0);
        assert_eq!(config.element_padding, 2.0);
        assert_eq!(config.limits["O"], [-10.0, 0.0]);
        assert_eq!(config.elements, Some(vec!["Li".to_string(), "O".to_string()]));
    }

    #[test]
    fn boolean_flags_override_file() {
        let (_dir, path) = write_config("formal-chempots = true\nsubsystem-only = false\n");
        let mut args = base_args();
        args.config = Some(path);
        args.absolute = true;
        args.subsystem_only = true;

        let config = build_config(&args).unwrap();
        assert!(!config.formal_chempots);
        assert!(config.subsystem_only);
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in [
            "element-padding",
            "element-padding=wide",
            "limits.O=-10",
            "padding=1.0",
        ] {
            let mut args = base_args();
            args.set_values = vec![bad.to_string()];
            let result = build_config(&args);
            assert!(matches!(result, Err(CliError::Config(_))), "{}", bad);
        }
    }

    #[test]
    fn invalid_final_values_fail_validation() {
        let mut args = base_args();
        args.min_limit = Some(5.0);
        assert!(matches!(
            build_config(&args),
            Err(CliError::Diagram(DiagramError::InvalidConfig { .. }))
        ));

        let mut args = base_args();
        args.set_values = vec!["limits.O=0,-10".to_string()];
        assert!(matches!(
            build_config(&args),
            Err(CliError::Diagram(DiagramError::InvalidLimits { .. }))
        ));
    }
}
