use nalgebra::Vector3;
use rigidock::core::forcefield::pose::{DockingState, STATE_SIZE};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid pose '{value}': expected 6 comma-separated values 'phi,ssi,rot,x,y,z', found {found}.")]
    WrongPoseLength { value: String, found: usize },

    #[error("Invalid number '{token}' in '{value}'.")]
    InvalidNumber { token: String, value: String },

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),
}

/// Parses `phi,ssi,rot,x,y,z` (radians and Angstroms) into a docking state.
pub fn parse_pose(value: &str) -> Result<DockingState, ParseError> {
    let tokens: Vec<&str> = value.split(',').map(str::trim).collect();
    if tokens.len() != STATE_SIZE {
        return Err(ParseError::WrongPoseLength {
            value: value.to_string(),
            found: tokens.len(),
        });
    }
    let mut numbers = [0.0; STATE_SIZE];
    for (slot, token) in numbers.iter_mut().zip(&tokens) {
        *slot = token.parse().map_err(|_| ParseError::InvalidNumber {
            token: token.to_string(),
            value: value.to_string(),
        })?;
    }
    Ok(DockingState::new(
        numbers[0],
        numbers[1],
        numbers[2],
        Vector3::new(numbers[3], numbers[4], numbers[5]),
    ))
}

/// Splits `key=value` at the first `=`; both sides are trimmed.
pub fn parse_key_value(pair: &str) -> Result<(&str, &str), ParseError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidKeyValue(pair.to_string())),
    }
}
