//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain ports, so
//! they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{BloodBankCommand, BloodBankQuery, IdentityCommand};

/// Port implementations used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityCommand>,
    pub blood_bank: Arc<dyn BloodBankCommand>,
    pub blood_bank_query: Arc<dyn BloodBankQuery>,
}

impl HttpState {
    /// Bundle the ports.
    ///
    /// A single engine value usually backs both blood bank ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use bloodbridge::domain::ports::{BloodBankCommand, BloodBankQuery, IdentityCommand};
    /// use bloodbridge::inbound::http::state::HttpState;
    ///
    /// fn wire<E>(identity: Arc<dyn IdentityCommand>, engine: Arc<E>) -> HttpState
    /// where
    ///     E: BloodBankCommand + BloodBankQuery + 'static,
    /// {
    ///     HttpState::new(identity, engine.clone(), engine)
    /// }
    /// ```
    pub fn new(
        identity: Arc<dyn IdentityCommand>,
        blood_bank: Arc<dyn BloodBankCommand>,
        blood_bank_query: Arc<dyn BloodBankQuery>,
    ) -> Self {
        Self {
            identity,
            blood_bank,
            blood_bank_query,
        }
    }
}
