//! Owner session gate.
//!
//! Owner operations never read an ambient "current user". They take an
//! [`OwnerSession`], and the only ways to obtain one are
//! [`SessionGate::require_session`] or [`OwnerSession::require`], both of
//! which refuse when nobody is signed in.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use log::debug;
use tokio::sync::watch;
use uuid::Uuid;

use crate::errors::AppError;

/// Opaque identity handed out by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerIdentity(Uuid);

impl OwnerIdentity {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn id(&self) -> Uuid {
        self.0
    }
}

/// Proof that an owner is authenticated, passed explicitly to every owner
/// write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerSession {
    identity: OwnerIdentity,
}

impl OwnerSession {
    pub fn require(identity: Option<OwnerIdentity>) -> Result<Self, AppError> {
        match identity {
            Some(identity) => {
                debug!("owner session for {}", identity.id());
                Ok(Self { identity })
            }
            None => Err(AppError::AuthorizationRequired),
        }
    }

    pub fn owner_id(&self) -> Uuid {
        self.identity.id()
    }
}

/// Extracts the session from the identity the auth middleware stored on
/// the request, answering 401 when there is none.
impl FromRequest for OwnerSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let identity = req.extensions().get::<OwnerIdentity>().copied();
        ready(OwnerSession::require(identity))
    }
}

/// Holds the current identity of a long-lived owner client and notifies
/// subscribers when it signs in, signs out or is replaced.
pub struct SessionGate {
    current: watch::Sender<Option<OwnerIdentity>>,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGate {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    pub fn current(&self) -> Option<OwnerIdentity> {
        *self.current.borrow()
    }

    pub fn sign_in(&self, identity: OwnerIdentity) {
        self.current.send_replace(Some(identity));
    }

    pub fn sign_out(&self) {
        self.current.send_replace(None);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<OwnerIdentity>> {
        self.current.subscribe()
    }

    pub fn require_session(&self) -> Result<OwnerSession, AppError> {
        OwnerSession::require(self.current())
    }
}
