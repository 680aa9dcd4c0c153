use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::views::ClientUser;

#[derive(Debug, Error)]
pub enum CallerError {
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("User missing permission: {permission}")]
    Forbidden { permission: Permission },
}

impl CallerError {
    pub fn unauthorized(reason: Option<String>) -> Self {
        Self::Unauthorized {
            reason: reason.unwrap_or_else(|| "No reason provided".to_string()),
        }
    }

    pub fn forbidden(permission: Permission) -> Self {
        Self::Forbidden { permission }
    }
}

/// Actions a caller may be allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    PostsCreate,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::PostsCreate => f.write_str("posts:create"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerKind {
    User,

    #[cfg(test)]
    MockCaller,
}

pub trait ApiCaller: Send + Sync {
    fn kind(&self) -> CallerKind;
    fn id(&self) -> String;
    fn permissions(&self) -> Vec<Permission>;

    /// The client-safe view of this caller.
    fn profile(&self) -> ClientUser;
}

#[derive(Clone)]
pub enum Caller {
    Authenticated(Arc<dyn ApiCaller>),
    Unauthenticated,
}

impl fmt::Debug for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Caller::Authenticated(c) => write!(f, "Authenticated({:?}, {})", c.kind(), c.id()),
            Caller::Unauthenticated => f.write_str("Unauthenticated"),
        }
    }
}

impl Caller {
    #[tracing::instrument(skip(self))]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Caller::Authenticated(_))
    }

    #[tracing::instrument(skip(self))]
    pub fn api_caller(&self) -> Result<Arc<dyn ApiCaller>, CallerError> {
        match self {
            Caller::Authenticated(api_caller) => Ok(api_caller.clone()),
            Caller::Unauthenticated => Err(CallerError::unauthorized(Some(
                "Caller is not authenticated".into(),
            ))),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Caller::Unauthenticated)
    }

    #[tracing::instrument(skip(self))]
    pub fn can(&self, permission: Permission) -> bool {
        match self {
            Caller::Authenticated(api_caller) => api_caller.permissions().contains(&permission),
            Caller::Unauthenticated => false,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn require(&self, permission: Permission) -> Result<(), CallerError> {
        if self.is_anonymous() {
            return Err(CallerError::unauthorized(Some(
                "Caller is not authenticated".into(),
            )));
        }

        if !self.can(permission) {
            return Err(CallerError::forbidden(permission));
        }
        Ok(())
    }
}
