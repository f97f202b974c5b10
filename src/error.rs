//! Error types for the simulation core.
//!
//! None of these are fatal: attach/remove failures are refused by the build
//! phase, data errors surface when a catalog, level or tuning file is loaded.

use std::fmt;

use crate::sim::catalog::ComponentKind;
use crate::sim::slots::SlotId;

/// Errors raised by the simulation core.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// The slot is occupied or its category mask excludes the component.
    IncompatibleAttachment { slot: SlotId, kind: ComponentKind },
    /// No registered slot accepts the component.
    NoCompatibleSlot { kind: ComponentKind },
    /// No component of this kind is attached.
    NotAttached { kind: ComponentKind },
    /// Slot index is out of range.
    UnknownSlot { slot: SlotId, count: usize },
    /// Not enough money to buy the component.
    InsufficientFunds { price: i64, money: i64 },
    /// Catalog, level or tuning data could not be parsed.
    Data { context: String, message: String },
    /// A file could not be read or written.
    Io { path: String, message: String },
}

impl SimError {
    pub(crate) fn data(context: impl Into<String>, err: impl fmt::Display) -> Self {
        SimError::Data {
            context: context.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<String>, err: impl fmt::Display) -> Self {
        SimError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::IncompatibleAttachment { slot, kind } => {
                write!(f, "{} cannot be attached to slot {}", kind.name(), slot.0)
            }
            SimError::NoCompatibleSlot { kind } => {
                write!(f, "no free slot accepts {}", kind.name())
            }
            SimError::NotAttached { kind } => write!(f, "{} is not attached", kind.name()),
            SimError::UnknownSlot { slot, count } => {
                write!(f, "slot {} out of range (count: {})", slot.0, count)
            }
            SimError::InsufficientFunds { price, money } => {
                write!(f, "costs ${} but only ${} available", price, money)
            }
            SimError::Data { context, message } => write!(f, "bad {}: {}", context, message),
            SimError::Io { path, message } => write!(f, "{}: {}", path, message),
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_component() {
        let err = SimError::NotAttached {
            kind: ComponentKind::JetEngine,
        };
        assert_eq!(err.to_string(), "Jet Engine is not attached");

        let err = SimError::IncompatibleAttachment {
            slot: SlotId(3),
            kind: ComponentKind::Balloon,
        };
        assert_eq!(err.to_string(), "Balloon cannot be attached to slot 3");
    }
}
