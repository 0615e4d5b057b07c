use anyhow::Result;
use serde::de::DeserializeOwned;

/// Layered settings: `service_name`, the caller's defaults, the optional file
/// named by `CLOUDLAB_CONFIG_FILE`, then environment variables.
///
/// With `env_prefix = None` variables are read unprefixed (`DB_HOST` becomes
/// `db_host`); with a prefix, `MSK_TOPIC` becomes `topic` and `__` nests.
/// Values stay strings until deserialization, so `007` reaches a `String`
/// field as `007` and still parses into a numeric one.
pub fn load_config<T: DeserializeOwned>(service: &str, env_prefix: Option<&str>, defaults: &[(&str, &str)]) -> Result<T> {
    let mut builder = config::Config::builder().set_default("service_name", service)?;
    for (key, value) in defaults {
        builder = builder.set_default(*key, *value)?;
    }
    if let Ok(file) = std::env::var("CLOUDLAB_CONFIG_FILE") {
        tracing::debug!(path=%file, "loading config file");
        builder = builder.add_source(config::File::with_name(&file).required(false));
    }
    let env = match env_prefix {
        Some(prefix) => config::Environment::with_prefix(prefix).prefix_separator("_").separator("__"),
        None => config::Environment::default(),
    };
    builder = builder.add_source(env);
    let cfg = builder.build()?;
    Ok(cfg.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        service_name: String,
        greeting: String,
        cloudlab_probe_port: u16,
    }

    #[derive(Debug, Deserialize)]
    struct Prefixed {
        topic: String,
        count: u32,
    }

    #[test]
    fn defaults_then_env_override() {
        std::env::set_var("CLOUDLAB_PROBE_PORT", "7001");
        let p: Probe = load_config("probe", None, &[("greeting", "hi"), ("cloudlab_probe_port", "1")]).unwrap();
        assert_eq!(p.service_name, "probe");
        assert_eq!(p.greeting, "hi");
        assert_eq!(p.cloudlab_probe_port, 7001);
    }

    #[test]
    fn prefixed_env_is_stripped() {
        std::env::set_var("CLPROBE_COUNT", "9");
        let p: Prefixed = load_config("probe", Some("CLPROBE"), &[("topic", "demo"), ("count", "5")]).unwrap();
        assert_eq!(p.topic, "demo");
        assert_eq!(p.count, 9);
    }

    #[derive(Debug, Deserialize)]
    struct Verbatim {
        secret: String,
        label: String,
        flag: String,
    }

    #[test]
    fn string_values_are_not_coerced() {
        std::env::set_var("CLVERB_SECRET", "007");
        std::env::set_var("CLVERB_LABEL", "1e3");
        std::env::set_var("CLVERB_FLAG", "TRUE");
        let v: Verbatim = load_config("probe", Some("CLVERB"), &[]).unwrap();
        assert_eq!(v.secret, "007");
        assert_eq!(v.label, "1e3");
        assert_eq!(v.flag, "TRUE");
    }
}
