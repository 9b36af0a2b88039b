// src/config.rs

use std::{env, str::FromStr};

use chrono::NaiveDate;
use tiberius::{AuthMethod, Config};

use crate::error::{DashboardError, DashboardResult};

const DEFAULT_SQL_SERVER: &str = "CL-JHB-SQL-01";
const DEFAULT_DATABASE: &str = "Quill";
const DEFAULT_DRIVER: &str = "ODBC Driver 17 for SQL Server";
const DEFAULT_SECRET_KEY: &str = "dev-secret-key-change-in-production";

/// Runtime settings, built once at startup and handed to the data source
/// and the router state.
#[derive(Clone)]
pub struct Settings {
    pub sql_server: String,
    pub sql_port: u16,
    pub database_name: String,
    pub driver: String,
    pub sql_user: Option<String>,
    pub sql_password: Option<String>,
    pub trust_server_certificate: bool,
    pub secret_key: String,
    pub host: String,
    pub port: u16,
    pub default_start_date: NaiveDate,
    pub static_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sql_server: DEFAULT_SQL_SERVER.into(),
            sql_port: 1433,
            database_name: DEFAULT_DATABASE.into(),
            driver: DEFAULT_DRIVER.into(),
            sql_user: None,
            sql_password: None,
            trust_server_certificate: true,
            secret_key: DEFAULT_SECRET_KEY.into(),
            host: "0.0.0.0".into(),
            port: 5000,
            default_start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            static_dir: "static".into(),
        }
    }
}

// secret_key and sql_password stay out of Debug output
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("connection", &self.redacted_connection_string())
            .field("sql_port", &self.sql_port)
            .field("trust_server_certificate", &self.trust_server_certificate)
            .field("bind_addr", &self.bind_addr())
            .field("default_start_date", &self.default_start_date)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> DashboardResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> DashboardResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Settings::default();

        Ok(Settings {
            sql_server: get("SQL_SERVER").unwrap_or(defaults.sql_server),
            sql_port: parse_var("SQL_PORT", get("SQL_PORT"), defaults.sql_port)?,
            database_name: get("DATABASE_NAME").unwrap_or(defaults.database_name),
            driver: get("SQL_DRIVER").unwrap_or(defaults.driver),
            sql_user: get("SQL_USER"),
            sql_password: get("SQL_PASSWORD"),
            trust_server_certificate: parse_bool(
                "SQL_TRUST_CERT",
                get("SQL_TRUST_CERT"),
                defaults.trust_server_certificate,
            )?,
            secret_key: get("SECRET_KEY").unwrap_or(defaults.secret_key),
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", get("PORT"), defaults.port)?,
            default_start_date: parse_var(
                "COMMISSION_START_DATE",
                get("COMMISSION_START_DATE"),
                defaults.default_start_date,
            )?,
            static_dir: get("STATIC_DIR").unwrap_or(defaults.static_dir),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn uses_sql_auth(&self) -> bool {
        self.sql_user.is_some()
    }

    /// ODBC-style connection descriptor for logs, password masked. The live
    /// connection is configured by `tiberius_config`.
    pub fn redacted_connection_string(&self) -> String {
        self.render_connection_string("***")
    }

    fn render_connection_string(&self, password: &str) -> String {
        let mut s = format!(
            "DRIVER={{{}}};SERVER={};DATABASE={};",
            self.driver, self.sql_server, self.database_name
        );
        match &self.sql_user {
            Some(user) => s.push_str(&format!("UID={user};PWD={password};")),
            None => s.push_str("Trusted_Connection=yes;"),
        }
        s
    }

    /// Driver configuration for the SQL Server client.
    pub fn tiberius_config(&self) -> DashboardResult<Config> {
        let (host, port) = match self.sql_server.split_once(',') {
            Some((host, port)) => {
                let port = port
                    .trim()
                    .parse::<u16>()
                    .map_err(|e| DashboardError::config("SQL_SERVER", format!("bad port '{port}': {e}")))?;
                (host.trim().to_string(), port)
            }
            None => (self.sql_server.clone(), self.sql_port),
        };

        let mut config = Config::new();
        config.host(host);
        config.port(port);
        config.database(&self.database_name);
        config.application_name("commission-dashboard");
        config.authentication(self.authentication()?);
        if self.trust_server_certificate {
            config.trust_cert();
        }
        Ok(config)
    }

    fn authentication(&self) -> DashboardResult<AuthMethod> {
        match (&self.sql_user, &self.sql_password) {
            (Some(user), Some(password)) => Ok(AuthMethod::sql_server(user, password)),
            (Some(_), None) => Err(DashboardError::config("SQL_PASSWORD", "required when SQL_USER is set")),
            (None, Some(_)) => Err(DashboardError::config("SQL_USER", "required when SQL_PASSWORD is set")),
            (None, None) => integrated_auth(),
        }
    }

    pub fn describe_auth(&self) -> &'static str {
        if self.uses_sql_auth() { "sql" } else { "integrated" }
    }
}

#[cfg(windows)]
fn integrated_auth() -> DashboardResult<AuthMethod> {
    Ok(AuthMethod::Integrated)
}

#[cfg(not(windows))]
fn integrated_auth() -> DashboardResult<AuthMethod> {
    Err(DashboardError::config(
        "SQL_USER",
        "trusted connections need a Windows host; set SQL_USER and SQL_PASSWORD",
    ))
}

fn parse_var<T>(key: &str, raw: Option<String>, default: T) -> DashboardResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => v
            .parse::<T>()
            .map_err(|e| DashboardError::config(key, format!("'{v}': {e}"))),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: Option<String>, default: bool) -> DashboardResult<bool> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(DashboardError::config(key, format!("'{other}' is not a boolean"))),
    }
}
