use sq_core::ActionId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action {0} does not exist")]
    UnknownAction(ActionId),

    #[error("action {0} is not linked into a chain")]
    NotInChain(ActionId),

    #[error("weapon use is blocked")]
    WeaponBlocked,
}

pub type ActionResult<T> = Result<T, ActionError>;
