use crate::api::{ChargerSourcePriority, CommandRequest, OutputSourcePriority};

/// A control operation the panel can ask the gateway to perform. Every
/// variant carries the target inverter serial; max charge current keeps the
/// operator's raw input because the gateway does its own validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    SetOutputPriority(String, OutputSourcePriority),
    SetChargerPriority(String, ChargerSourcePriority),
    SetMaxChargeCurrent(String, String),
}

impl PanelCommand {
    pub fn serialno(&self) -> &str {
        use PanelCommand::*;

        match self {
            SetOutputPriority(serialno, _) => serialno,
            SetChargerPriority(serialno, _) => serialno,
            SetMaxChargeCurrent(serialno, _) => serialno,
        }
    }

    /// Command name as it appears in the gateway URL path.
    pub fn endpoint(&self) -> &'static str {
        use PanelCommand::*;

        match self {
            SetOutputPriority(_, _) => "setOutputPriority",
            SetChargerPriority(_, _) => "setChargerPriority",
            SetMaxChargeCurrent(_, _) => "setMaxChargeCurrent",
        }
    }

    pub fn wire_value(&self) -> String {
        use PanelCommand::*;

        match self {
            SetOutputPriority(_, value) => value.as_str().to_string(),
            SetChargerPriority(_, value) => value.as_str().to_string(),
            SetMaxChargeCurrent(_, amps) => amps.clone(),
        }
    }

    pub fn to_request(&self) -> CommandRequest {
        CommandRequest {
            value: self.wire_value(),
            serialno: self.serialno().to_string(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        use PanelCommand::*;

        match self {
            SetOutputPriority(_, _) => "Output Priority Set",
            SetChargerPriority(_, _) => "Charger Priority Set",
            SetMaxChargeCurrent(_, _) => "Max Charge Current Set",
        }
    }

    pub fn value_display(&self) -> String {
        use PanelCommand::*;

        match self {
            SetOutputPriority(_, value) => value.display_name().to_string(),
            SetChargerPriority(_, value) => value.display_name().to_string(),
            SetMaxChargeCurrent(_, amps) => format!("{}A", amps),
        }
    }
}

/// What came back from the gateway for a command, reduced to what the panel
/// needs to show the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Success,
    Failed(String),
}
