use crate::PrivilegeScope;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unknown {scope} privilege: {name}")]
    UnknownPrivilege { scope: PrivilegeScope, name: String },
    #[error("invalid role definition: {0}")]
    InvalidRoleDefinition(String),
    #[error("invalid privilege definition: {0}")]
    InvalidPrivilegeDefinition(String),
}

pub type AuthzResult<T> = Result<T, AuthzError>;
