use thiserror::Error;

pub type RvResult<T> = Result<T, RvError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RvError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: String },
}
