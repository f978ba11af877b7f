use super::UpdateWrapper;

pub type SessionId = u64;

/// Update builder executed straight through a live session.
///
/// The session owns the parameter binding, so interceptors leave it alone.
#[derive(Debug)]
pub struct ChainUpdateWrapper {
    session: SessionId,
    wrapper: UpdateWrapper,
}

impl ChainUpdateWrapper {
    pub fn new(session: SessionId, wrapper: UpdateWrapper) -> Self {
        Self { session, wrapper }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn wrapper(&self) -> &UpdateWrapper {
        &self.wrapper
    }
}
