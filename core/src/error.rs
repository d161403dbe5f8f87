use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid parameter '{name}' = {value}: {constraint}")]
    InvalidParameter {
        name:       &'static str,
        value:      String,
        constraint: &'static str,
    },

    #[error("Invalid config field '{field}': {constraint}")]
    InvalidConfig {
        field:      String,
        constraint: String,
    },

    #[error("Band invariant violated: no feasible bounds at step {step}")]
    BandInvariant { step: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub(crate) fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        constraint: &'static str,
    ) -> Self {
        SimError::InvalidParameter { name, value: value.to_string(), constraint }
    }

    pub(crate) fn invalid_config(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        SimError::InvalidConfig { field: field.into(), constraint: constraint.into() }
    }
}

pub type SimResult<T> = Result<T, SimError>;
