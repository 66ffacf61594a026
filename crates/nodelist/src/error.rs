use anim::AnimError;
use html::DomError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeListError {
    /// The property has no numeric animation rule.
    #[error("property `{0}` can't be animated")]
    UnsupportedProperty(String),
    #[error("`{0}` is not implemented")]
    NotImplemented(&'static str),
    #[error("invalid value `{value}` for `{property}`: {reason}")]
    InvalidValue {
        property: String,
        value: String,
        reason: String,
    },
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("unknown tween `{0}`")]
    UnknownTween(String),
    #[error("selection is empty")]
    EmptySelection,
    /// A unit conversion was requested while another one held the probe.
    #[error("unit conversion probe is already in use")]
    ProbeBusy,
    #[error(transparent)]
    Dom(#[from] DomError),
    #[error(transparent)]
    Anim(#[from] AnimError),
}
