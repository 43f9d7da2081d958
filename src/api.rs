use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One inverter as reported by the gateway's discovery endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct InverterInfo {
    pub serialno: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct InvertersResponse {
    pub inverters: Vec<InverterInfo>,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SettingsRequest {
    pub serialno: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SettingsResponse {
    pub serialno: String,
    pub settings: CurrentSettings,
}

/// Settings the gateway last read off an inverter. The priority fields hold
/// the gateway's wire values ("utility", "solarfirst", ...); values we don't
/// recognise are kept verbatim so they can still be displayed raw.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CurrentSettings {
    #[serde(rename = "outputSourcePriority")]
    pub output_source_priority: String,
    #[serde(rename = "chargerSourcePriority")]
    pub charger_source_priority: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandRequest {
    pub value: String,
    pub serialno: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CommandResponse {
    pub command: String,
    pub value: String,
    pub status: String,
    pub message: String,
}

impl CommandResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Output source priority of an Axpert inverter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputSourcePriority {
    Utility,
    Solar,
    Sbu,
}

impl OutputSourcePriority {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Utility => "Utility First",
            Self::Solar => "Solar First",
            Self::Sbu => "SBU First",
        }
    }

    /// Wire value the gateway expects in command and settings payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utility => "utility",
            Self::Solar => "solar",
            Self::Sbu => "sbu",
        }
    }

    pub fn all() -> &'static [OutputSourcePriority] {
        &[Self::Utility, Self::Solar, Self::Sbu]
    }
}

impl fmt::Display for OutputSourcePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for OutputSourcePriority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "utility" => Ok(Self::Utility),
            "solar" => Ok(Self::Solar),
            "sbu" => Ok(Self::Sbu),
            _ => Err(anyhow::anyhow!("unknown output source priority: '{}'", s)),
        }
    }
}

/// Charger source priority of an Axpert inverter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargerSourcePriority {
    UtilityFirst,
    SolarFirst,
    SolarAndUtility,
    SolarOnly,
}

impl ChargerSourcePriority {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::UtilityFirst => "Utility First",
            Self::SolarFirst => "Solar First",
            Self::SolarAndUtility => "Solar & Utility",
            Self::SolarOnly => "Solar Only",
        }
    }

    /// Wire value the gateway expects in command and settings payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UtilityFirst => "utilityfirst",
            Self::SolarFirst => "solarfirst",
            Self::SolarAndUtility => "solarandutility",
            Self::SolarOnly => "solaronly",
        }
    }

    pub fn all() -> &'static [ChargerSourcePriority] {
        &[
            Self::UtilityFirst,
            Self::SolarFirst,
            Self::SolarAndUtility,
            Self::SolarOnly,
        ]
    }
}

impl fmt::Display for ChargerSourcePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ChargerSourcePriority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "utilityfirst" => Ok(Self::UtilityFirst),
            "solarfirst" => Ok(Self::SolarFirst),
            "solarandutility" => Ok(Self::SolarAndUtility),
            "solaronly" => Ok(Self::SolarOnly),
            _ => Err(anyhow::anyhow!("unknown charger source priority: '{}'", s)),
        }
    }
}

/// Human-readable form of a settings wire value. Unrecognised values are
/// shown as-is rather than hidden; the gateway remains the authority on what
/// an inverter accepts.
pub fn priority_display(wire_value: &str) -> String {
    if let Ok(p) = OutputSourcePriority::from_str(wire_value) {
        return p.display_name().to_string();
    }
    match ChargerSourcePriority::from_str(wire_value) {
        Ok(p) => p.display_name().to_string(),
        Err(_) => wire_value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_deserialize_uses_wire_field_names() {
        let json = r#"{"serialno":"92931234567890","settings":{"outputSourcePriority":"sbu","chargerSourcePriority":"solarfirst"}}"#;
        let parsed: SettingsResponse = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.serialno, "92931234567890");
        assert_eq!(parsed.settings.output_source_priority, "sbu");
        assert_eq!(parsed.settings.charger_source_priority, "solarfirst");
    }

    #[test]
    fn inverter_list_tolerates_missing_optional_fields() {
        let json = r#"{"inverters":[{"serialno":"111"},{"serialno":"222","model":"VM III"}],"count":2}"#;
        let parsed: InvertersResponse = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.count, 2);
        assert_eq!(parsed.inverters[0].model, None);
        assert_eq!(parsed.inverters[1].model.as_deref(), Some("VM III"));
    }

    #[test]
    fn output_priority_round_trips_wire_values() {
        for p in OutputSourcePriority::all() {
            assert_eq!(OutputSourcePriority::from_str(p.as_str()).unwrap(), *p);
        }
        assert!(OutputSourcePriority::from_str("grid").is_err());
    }

    #[test]
    fn charger_priority_display_names() {
        assert_eq!(
            ChargerSourcePriority::SolarAndUtility.display_name(),
            "Solar & Utility"
        );
        assert_eq!(ChargerSourcePriority::SolarOnly.to_string(), "Solar Only");
    }

    #[test]
    fn unknown_wire_value_displays_raw() {
        assert_eq!(priority_display("sbu"), "SBU First");
        assert_eq!(priority_display("solarandutility"), "Solar & Utility");
        assert_eq!(priority_display("mystery"), "mystery");
    }
}
