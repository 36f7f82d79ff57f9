use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("unknown component set {0:?}")]
    UnknownComponentSet(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
