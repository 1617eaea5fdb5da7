use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

/// Why a single field could not be refreshed. None of these abort a refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum DecodeError {
    #[error("key not present in the raw feed")]
    MissingKey,

    #[error("`{raw}` does not match the {pattern} pattern")]
    ParseFailure { pattern: &'static str, raw: String },

    #[error("code {code} is not a known {table} value")]
    UnmappedCode { table: &'static str, code: i64 },

    #[error("expected {expected}, got {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl DecodeError {
    pub fn kind(&self) -> DecodeErrorKind {
        match self {
            DecodeError::MissingKey => DecodeErrorKind::MissingKey,
            DecodeError::ParseFailure { .. } => DecodeErrorKind::ParseFailure,
            DecodeError::UnmappedCode { .. } => DecodeErrorKind::UnmappedCode,
            DecodeError::TypeMismatch { .. } => DecodeErrorKind::TypeMismatch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecodeErrorKind {
    MissingKey,
    ParseFailure,
    UnmappedCode,
    TypeMismatch,
}

/// Raw integer code → enum, checked against a closed table.
pub trait CodeTable: Sized + Copy {
    const TABLE: &'static str;

    fn from_code(code: i64) -> Option<Self>;

    fn decode(code: i64) -> Result<Self, DecodeError> {
        Self::from_code(code).ok_or(DecodeError::UnmappedCode {
            table: Self::TABLE,
            code,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatState {
    Low,
    High,
}

impl CodeTable for HeatState {
    const TABLE: &'static str = "heat";

    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(HeatState::Low),
            1 => Some(HeatState::High),
            _ => None,
        }
    }
}

/// Targeting system state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MtdsState {
    Off,
    On,
    Locked,
}

impl CodeTable for MtdsState {
    const TABLE: &'static str = "MTDS";

    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(MtdsState::Off),
            1 => Some(MtdsState::On),
            2 => Some(MtdsState::Locked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissileState {
    NoLock,
    Locked,
}

impl CodeTable for MissileState {
    const TABLE: &'static str = "missile lock";

    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(MissileState::NoLock),
            1 => Some(MissileState::Locked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutopilotState {
    Off,
    FormOnTarget,
    FlyToNavPoint,
}

impl CodeTable for AutopilotState {
    const TABLE: &'static str = "autopilot";

    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(AutopilotState::Off),
            1 => Some(AutopilotState::FormOnTarget),
            2 => Some(AutopilotState::FlyToNavPoint),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OnOffState {
    Off,
    On,
}

impl CodeTable for OnOffState {
    const TABLE: &'static str = "on/off";

    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(OnOffState::Off),
            1 => Some(OnOffState::On),
            _ => None,
        }
    }
}

/// Parsed `"<remaining>/<total>"` fuel gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuelGauge {
    pub remaining: i64,
    pub total: i64,
}

impl FuelGauge {
    pub fn percentage(&self) -> f64 {
        self.remaining as f64 / self.total as f64
    }
}

/// Splits on the first `/`. Both halves must be integers and the total must
/// be non-zero; anything else is a parse failure for the whole gauge.
pub fn parse_fuel(raw: &str) -> Result<FuelGauge, DecodeError> {
    let fail = || DecodeError::ParseFailure {
        pattern: "<remaining>/<total>",
        raw: raw.to_string(),
    };

    let (remaining, total) = raw.split_once('/').ok_or_else(fail)?;
    let remaining: i64 = remaining.trim().parse().map_err(|_| fail())?;
    let total: i64 = total.trim().parse().map_err(|_| fail())?;
    if total == 0 {
        return Err(fail());
    }

    Ok(FuelGauge { remaining, total })
}

static SHIELD_BIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([-+]?\d+)S/").expect("shield bias pattern is valid")
});

static WEAPON_BIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/([-+]?\d+)W\s*$").expect("weapon bias pattern is valid")
});

/// Each half of an energy bias setting, parsed on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiasParse {
    pub shields: Result<i32, DecodeError>,
    pub weapons: Result<i32, DecodeError>,
}

/// Parses `"<signed>S/<signed>W"`. The shield and weapon halves succeed or
/// fail independently.
pub fn parse_bias(raw: &str) -> BiasParse {
    BiasParse {
        shields: capture_signed(&SHIELD_BIAS, raw, "<signed>S/"),
        weapons: capture_signed(&WEAPON_BIAS, raw, "/<signed>W"),
    }
}

fn capture_signed(pattern: &Regex, raw: &str, name: &'static str) -> Result<i32, DecodeError> {
    pattern
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
        .ok_or_else(|| DecodeError::ParseFailure {
            pattern: name,
            raw: raw.to_string(),
        })
}
