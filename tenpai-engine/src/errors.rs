use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandError {
    /// A raw tile id outside 0..136.
    InvalidTile { id: u32 },
    /// Hand construction with the wrong tile count or a repeated instance.
    InvalidHand { message: String },
    /// A call or draw/discard whose precondition does not hold.
    /// The hand is left unchanged.
    CallRejected { call: CallKind, message: String },
    /// Tile notation parse error.
    Parse { input: String, message: String },
}

/// The mutators that can reject their input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Chi,
    Pon,
    Daiminkan,
    Ankan,
    Kakan,
    Discard,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallKind::Chi => "chi",
            CallKind::Pon => "pon",
            CallKind::Daiminkan => "daiminkan",
            CallKind::Ankan => "ankan",
            CallKind::Kakan => "kakan",
            CallKind::Discard => "discard",
        };
        f.write_str(name)
    }
}

impl fmt::Display for HandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandError::InvalidTile { id } => {
                write!(f, "Invalid tile id {} (expected 0..136)", id)
            }
            HandError::InvalidHand { message } => {
                write!(f, "Invalid hand: {}", message)
            }
            HandError::CallRejected { call, message } => {
                write!(f, "Rejected {}: {}", call, message)
            }
            HandError::Parse { input, message } => {
                write!(f, "Parse error on '{}': {}", input, message)
            }
        }
    }
}

impl std::error::Error for HandError {}

pub type HandResult<T> = Result<T, HandError>;

pub(crate) fn rejected<T>(call: CallKind, message: impl Into<String>) -> HandResult<T> {
    let message = message.into();
    log::debug!("{} rejected: {}", call, message);
    Err(HandError::CallRejected { call, message })
}
