use thiserror::Error;

use crate::types::{Axis, PanelId};

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SimError {
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid time {0:?}, expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    #[error("{axis} {value} is out of range")]
    InvalidCoordinate { axis: Axis, value: f64 },

    #[error("{axis} input {input:?} is not a number")]
    NonNumeric { axis: Axis, input: String },

    #[error("panel position must be finite")]
    InvalidPlacement,

    #[error("no panel with id {0}")]
    UnknownPanel(PanelId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("scene query failed: {0}")]
    SceneQuery(String),
}
