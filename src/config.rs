//! Lowering configuration and the JVM target table

use crate::consts::{ENV_DEBUG, ENV_JOBS, ENV_TARGET, ENV_VERIFY};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Class file major versions
pub mod major_versions {
    pub const JAVA_6: u16 = 50;
    pub const JAVA_8: u16 = 52;
    pub const JAVA_9: u16 = 53;
    pub const JAVA_11: u16 = 55;
    pub const JAVA_17: u16 = 61;
    pub const JAVA_21: u16 = 65;
}

/// JVM platforms the lowering engine can target.
///
/// The table is fixed; one entry is selected at start-up into [`Config`]
/// and handed to the lowering context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum JvmTarget {
    #[serde(rename = "1.6")]
    Jvm1_6,
    #[serde(rename = "1.8")]
    Jvm1_8,
    #[serde(rename = "9")]
    Jvm9,
    #[serde(rename = "11")]
    Jvm11,
    #[serde(rename = "17")]
    Jvm17,
    #[serde(rename = "21")]
    Jvm21,
}

impl JvmTarget {
    pub const ALL: [JvmTarget; 6] = [
        JvmTarget::Jvm1_6,
        JvmTarget::Jvm1_8,
        JvmTarget::Jvm9,
        JvmTarget::Jvm11,
        JvmTarget::Jvm17,
        JvmTarget::Jvm21,
    ];

    pub const DEFAULT: JvmTarget = JvmTarget::Jvm1_8;

    /// User-facing version string, as accepted by `FromStr`
    pub fn description(self) -> &'static str {
        match self {
            JvmTarget::Jvm1_6 => "1.6",
            JvmTarget::Jvm1_8 => "1.8",
            JvmTarget::Jvm9 => "9",
            JvmTarget::Jvm11 => "11",
            JvmTarget::Jvm17 => "17",
            JvmTarget::Jvm21 => "21",
        }
    }

    pub fn major_version(self) -> u16 {
        match self {
            JvmTarget::Jvm1_6 => major_versions::JAVA_6,
            JvmTarget::Jvm1_8 => major_versions::JAVA_8,
            JvmTarget::Jvm9 => major_versions::JAVA_9,
            JvmTarget::Jvm11 => major_versions::JAVA_11,
            JvmTarget::Jvm17 => major_versions::JAVA_17,
            JvmTarget::Jvm21 => major_versions::JAVA_21,
        }
    }
}

impl Default for JvmTarget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for JvmTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for JvmTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        // "8" and "6" are common shorthands for the 1.x targets
        let wanted = match wanted {
            "6" => "1.6",
            "8" => "1.8",
            other => other,
        };
        JvmTarget::ALL
            .iter()
            .copied()
            .find(|t| t.description() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = JvmTarget::ALL.iter().map(|t| t.description()).collect();
                Error::config(format!("unknown JVM target '{}' (expected one of {})", s, known.join(", ")))
            })
    }
}

/// Configuration for one lowering run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bytecode target; decides the class file version
    pub target: JvmTarget,
    /// Emit SourceFile attributes from the position side table
    pub debug: bool,
    /// Run structural verification before class files are written
    pub verify: bool,
    /// Worker count for parallel lowering; 0 means one per CPU
    pub jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: JvmTarget::DEFAULT,
            debug: true,
            verify: true,
            jobs: 0,
        }
    }
}

impl Config {
    /// Default configuration with environment overrides applied
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup; split out so tests need not touch
    /// the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(target) = lookup(ENV_TARGET) {
            self.target = target.parse()?;
        }
        if let Some(jobs) = lookup(ENV_JOBS) {
            self.jobs = jobs
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("{} must be a number, got '{}'", ENV_JOBS, jobs)))?;
        }
        if let Some(debug) = lookup(ENV_DEBUG) {
            self.debug = parse_bool(ENV_DEBUG, &debug)?;
        }
        if let Some(verify) = lookup(ENV_VERIFY) {
            self.verify = parse_bool(ENV_VERIFY, &verify)?;
        }
        Ok(())
    }

    /// Class file major version for the configured target
    pub fn class_file_version(&self) -> u16 {
        self.target.major_version()
    }

    /// Effective worker count
    pub fn worker_count(&self) -> usize {
        if self.jobs == 0 {
            num_cpus::get()
        } else {
            self.jobs
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::config(format!("{} must be a boolean, got '{}'", key, value))),
    }
}
