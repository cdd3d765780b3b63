use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app::{
    DEFAULT_FULL_TIME_HOURS, DEFAULT_LEADER_COEFFICIENT, MAX_FULL_TIME_HOURS,
    MAX_LEADER_COEFFICIENT,
};
use crate::domain::entities::SalaryPolicy;
use crate::error::ConfigError;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Constants for the salary projection
    pub salary: SalaryPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        Ok(Self {
            database_url,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            salary: SalaryPolicy {
                full_time_hours: within(
                    "FULL_TIME_HOURS",
                    parse_or(&lookup, "FULL_TIME_HOURS", DEFAULT_FULL_TIME_HOURS)?,
                    MAX_FULL_TIME_HOURS,
                )?,
                leader_coefficient: within(
                    "LEADER_COEFFICIENT",
                    parse_or(&lookup, "LEADER_COEFFICIENT", DEFAULT_LEADER_COEFFICIENT)?,
                    MAX_LEADER_COEFFICIENT,
                )?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

/// Accept `value` in `0..=max`
fn within(name: &'static str, value: Decimal, max: Decimal) -> Result<Decimal, ConfigError> {
    if value < Decimal::ZERO || value > max {
        Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        })
    } else {
        Ok(value)
    }
}
