use anyhow::Result;
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Connection and bind settings, read from unprefixed `DB_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_host: String,
    pub db_user: String,
    pub db_pass: String,
    pub db_name: String,
    pub db_port: u16,
    pub bind_addr: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        cloudlab_core::load_config(crate::SERVICE, None, &[
            ("db_host", "localhost"),
            ("db_user", "appuser"),
            ("db_pass", "apppassword"),
            ("db_name", "appdb"),
            ("db_port", "5432"),
            ("bind_addr", "0.0.0.0:8000"),
        ])
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_pass)
            .database(&self.db_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_then_verbatim_env_values() {
        for var in ["DB_HOST", "DB_USER", "DB_PASS", "DB_NAME", "DB_PORT", "BIND_ADDR"] { std::env::remove_var(var); }
        let s = Settings::load().unwrap();
        assert_eq!(s.db_host, "localhost");
        assert_eq!(s.db_user, "appuser");
        assert_eq!(s.db_name, "appdb");
        assert_eq!(s.db_port, 5432);
        assert_eq!(s.bind_addr, "0.0.0.0:8000");
        let opts = s.connect_options();
        assert_eq!(opts.get_host(), "localhost");
        assert_eq!(opts.get_port(), 5432);
        assert_eq!(opts.get_database(), Some("appdb"));

        std::env::set_var("DB_PASS", "007");
        std::env::set_var("DB_NAME", "1e3");
        std::env::set_var("DB_USER", "TRUE");
        std::env::set_var("DB_PORT", "6543");
        let s = Settings::load().unwrap();
        assert_eq!(s.db_pass, "007");
        assert_eq!(s.db_name, "1e3");
        assert_eq!(s.db_user, "TRUE");
        assert_eq!(s.db_port, 6543);
        for var in ["DB_PASS", "DB_NAME", "DB_USER", "DB_PORT"] { std::env::remove_var(var); }
    }
}
