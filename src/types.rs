use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Trigger severity, mirroring the Zabbix `priority` codes 0-5.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    NotClassified,
    Info,
    Warning,
    Average,
    High,
    Disaster,
}

impl Severity {
    #[must_use]
    pub fn from_zabbix(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::NotClassified),
            1 => Some(Self::Info),
            2 => Some(Self::Warning),
            3 => Some(Self::Average),
            4 => Some(Self::High),
            5 => Some(Self::Disaster),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_zabbix_code(self) -> i64 {
        match self {
            Self::NotClassified => 0,
            Self::Info => 1,
            Self::Warning => 2,
            Self::Average => 3,
            Self::High => 4,
            Self::Disaster => 5,
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::NotClassified => "Not classified",
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Average => "Average",
            Severity::High => "High",
            Severity::Disaster => "Disaster",
        })
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "not classified" | "notclassified" => Ok(Self::NotClassified),
            "info" | "information" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "average" => Ok(Self::Average),
            "high" => Ok(Self::High),
            "disaster" => Ok(Self::Disaster),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// Trigger value: 0 is OK, 1 is problem.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerState {
    Ok,
    Problem,
}

impl TriggerState {
    #[must_use]
    pub fn from_zabbix(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::Problem),
            _ => None,
        }
    }
}

impl Display for TriggerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "OK",
            Self::Problem => "Problem",
        })
    }
}

/// Host interface type codes.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    Agent,
    Snmp,
    Ipmi,
    Jmx,
}

impl InterfaceKind {
    #[must_use]
    pub fn from_zabbix(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Agent),
            2 => Some(Self::Snmp),
            3 => Some(Self::Ipmi),
            4 => Some(Self::Jmx),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_zabbix_code(self) -> i64 {
        match self {
            Self::Agent => 1,
            Self::Snmp => 2,
            Self::Ipmi => 3,
            Self::Jmx => 4,
        }
    }
}

impl Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Agent => "agent",
            Self::Snmp => "SNMP",
            Self::Ipmi => "IPMI",
            Self::Jmx => "JMX",
        })
    }
}
