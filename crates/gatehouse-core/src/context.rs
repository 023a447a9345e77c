//! Acting-user context passed into every command and query handler.
//!
//! Produced by the web layer's authentication middleware from a bearer
//! token; this crate only consumes it.

use crate::error::DomainError;
use crate::uid::Uid;

/// The authenticated principal behind a request.
#[derive(Debug, Clone)]
pub struct Actor {
    /// The acting user's identifier.
    pub user_id: Uid,
    /// Role names granted to the acting user.
    pub roles: Vec<String>,
}

impl Actor {
    /// True when the actor holds the given role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Per-request context: either an authenticated actor or anonymous.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    /// The authenticated actor, when the request carried valid credentials.
    pub actor: Option<Actor>,
}

impl AppContext {
    /// A context with no authenticated actor.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { actor: None }
    }

    /// A context for an authenticated actor.
    #[must_use]
    pub fn authenticated(user_id: Uid, roles: Vec<String>) -> Self {
        Self {
            actor: Some(Actor { user_id, roles }),
        }
    }

    /// Requires an authenticated actor.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` for anonymous contexts.
    pub fn require_actor(&self) -> Result<&Actor, DomainError> {
        self.actor.as_ref().ok_or(DomainError::Unauthorized)
    }

    /// Requires an authenticated actor holding `role`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Unauthorized` for anonymous contexts and
    /// `DomainError::Forbidden` when the actor lacks the role.
    pub fn require_role(&self, role: &str) -> Result<&Actor, DomainError> {
        let actor = self.require_actor()?;
        if actor.has_role(role) {
            Ok(actor)
        } else {
            Err(DomainError::Forbidden)
        }
    }
}
