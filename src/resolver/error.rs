use thiserror::Error;

/// Failures while resolving a production keyword into control state.
///
/// All of them are fatal for the record being processed; no partially
/// resolved state is ever returned alongside one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("control mode can not be defaulted for keyword {keyword}")]
    MissingControlMode { keyword: &'static str },

    #[error("unsupported control mode {mode} for {keyword}")]
    UnsupportedControlMode { mode: String, keyword: &'static str },

    #[error("setting CMODE to unspecified control {mode}")]
    UnavailableControlSelection { mode: String },

    #[error("invalid VFP table number {value} for {keyword}")]
    InvalidVfpTable { value: String, keyword: &'static str },
}
