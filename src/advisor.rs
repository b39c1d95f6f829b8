//! Application state for one advisor session.
//!
//! DESIGN
//! ======
//! `Advisor` owns the loaded catalog, the persisted selection, the
//! conversation and the chat proxy. Front ends mutate state only through its
//! operations; there are no globals. Proxy failures are absorbed here: they
//! become a [`TurnOutcome::Failed`] plus a transcript notice and a trace, and
//! never propagate as errors.

use std::sync::Arc;

use crate::catalog::{Catalog, CatalogError, CatalogLoader, CatalogSource, Product, ProductId};
use crate::chat::conversation::TurnTicket;
use crate::chat::{ChatProxy, Conversation, Message, ProxyClient, ProxyError, RoutineRequest, TurnOutcome};
use crate::config::{AdvisorConfig, ConfigError};
use crate::error::ErrorCode;
use crate::filter::{FilterCriteria, FilterOutcome, filter_products};
use crate::selection::SelectionStore;
use crate::storage::{FileStore, KeyValueStore, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Only raised while building the proxy client; turn failures are absorbed.
    #[error(transparent)]
    Proxy(#[from] ProxyError),

    /// The id is not in the loaded catalog.
    #[error("unknown product id {0}")]
    UnknownProduct(ProductId),
}

impl ErrorCode for AdvisorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Catalog(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Proxy(e) => e.error_code(),
            Self::UnknownProduct(_) => "E_UNKNOWN_PRODUCT",
        }
    }
}

pub struct Advisor {
    catalog: Arc<Catalog>,
    selection: SelectionStore,
    conversation: Conversation,
    proxy: Arc<dyn ChatProxy>,
}

impl Advisor {
    /// Assemble an advisor from its parts. Loads the selection from `store`
    /// and prunes ids the catalog no longer has.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::Storage`] if the selection cannot be read or
    /// the reconciled set cannot be written.
    pub fn new(
        catalog: Arc<Catalog>,
        store: Box<dyn KeyValueStore>,
        proxy: Arc<dyn ChatProxy>,
    ) -> Result<Self, AdvisorError> {
        let mut selection = SelectionStore::load(store)?;
        selection.reconcile(&catalog)?;
        Ok(Self { catalog, selection, conversation: Conversation::new(), proxy })
    }

    /// Build an advisor from config: fetch the catalog, open the file store,
    /// and connect the proxy client.
    ///
    /// # Errors
    ///
    /// Returns an [`AdvisorError`] if any of those steps fail.
    pub async fn from_config(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        config.validate()?;
        let mut loader = CatalogLoader::new(CatalogSource::parse(&config.catalog_source))?;
        let catalog = loader.load().await?;
        let store = Box::new(FileStore::new(&config.store_path));
        let proxy = Arc::new(ProxyClient::new(config.endpoint.clone(), config.model.clone())?);
        tracing::info!(
            catalog = %loader.source(),
            endpoint = proxy.endpoint(),
            model = proxy.model(),
            "advisor ready"
        );
        Self::new(catalog, store, proxy)
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    // =========================================================================
    // CATALOG + SELECTION
    // =========================================================================

    #[must_use]
    pub fn filter(&self, criteria: &FilterCriteria) -> FilterOutcome<'_> {
        filter_products(&self.catalog, criteria)
    }

    /// Add a catalog product to the selection. Returns `false` if it was
    /// already selected.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::UnknownProduct`] for ids outside the catalog
    /// and [`AdvisorError::Storage`] if persisting fails.
    pub fn select(&mut self, id: ProductId) -> Result<bool, AdvisorError> {
        if !self.catalog.contains(id) {
            return Err(AdvisorError::UnknownProduct(id));
        }
        Ok(self.selection.add(id)?)
    }

    /// Remove a product from the selection. Returns `false` if it was not selected.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::Storage`] if persisting fails.
    pub fn deselect(&mut self, id: ProductId) -> Result<bool, AdvisorError> {
        Ok(self.selection.remove(id)?)
    }

    /// # Errors
    ///
    /// Returns [`AdvisorError::Storage`] if persisting fails.
    pub fn clear_selection(&mut self) -> Result<(), AdvisorError> {
        Ok(self.selection.clear()?)
    }

    /// Selected products in selection order.
    #[must_use]
    pub fn selected_products(&self) -> Vec<&Product> {
        self.selection.selected_products(&self.catalog)
    }

    // =========================================================================
    // CHAT
    // =========================================================================

    /// Run one chat turn. Returns `None` (and sends nothing) for blank input.
    pub async fn send_chat(&mut self, text: &str) -> Option<TurnOutcome> {
        let turn = self.begin_chat(text)?;
        Some(self.finish(turn.send().await))
    }

    /// Ask for a routine built from the current selection, or for clarifying
    /// questions when nothing is selected.
    pub async fn generate_routine(&mut self) -> TurnOutcome {
        let turn = self.begin_routine();
        self.finish(turn.send().await)
    }

    /// Record the user message and hand back the proxy call without holding
    /// the advisor. `None` for blank input.
    pub fn begin_chat(&mut self, text: &str) -> Option<PendingTurn> {
        let ticket = self.conversation.submit(text)?;
        Some(self.pending(ticket))
    }

    /// Routine counterpart of [`Advisor::begin_chat`]. Products are listed in
    /// catalog order.
    pub fn begin_routine(&mut self) -> PendingTurn {
        let products: Vec<&Product> = self
            .catalog
            .products()
            .iter()
            .filter(|p| self.selection.contains(p.id))
            .collect();
        let request = RoutineRequest::for_products(&products);
        let ticket = self.conversation.submit_routine(request);
        self.pending(ticket)
    }

    /// Apply a finished proxy call to the conversation.
    pub fn finish(&mut self, turn: FinishedTurn) -> TurnOutcome {
        let FinishedTurn { ticket, result } = turn;
        if let Err(e) = &result {
            tracing::warn!(error = %e, code = e.error_code(), kind = ?ticket.kind(), "chat turn failed");
        }
        self.conversation.complete(ticket, result)
    }

    /// Drop the results of any turns still in flight and settle their
    /// transcript entries as failed.
    pub fn cancel_pending(&mut self) {
        self.conversation.cancel_pending();
    }

    fn pending(&self, ticket: TurnTicket) -> PendingTurn {
        PendingTurn { ticket, log: self.conversation.log().to_vec(), proxy: Arc::clone(&self.proxy) }
    }
}

// =============================================================================
// DETACHED TURNS
// =============================================================================

/// A proxy call that owns its request, so the advisor stays usable (filtering,
/// selection, cancelling) while it is in flight.
#[must_use]
pub struct PendingTurn {
    ticket: TurnTicket,
    log: Vec<Message>,
    proxy: Arc<dyn ChatProxy>,
}

impl PendingTurn {
    #[must_use]
    pub fn ticket(&self) -> &TurnTicket {
        &self.ticket
    }

    /// Messages that will be sent, system prompt first.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    /// Perform the round trip. Pass the result to [`Advisor::finish`].
    pub async fn send(self) -> FinishedTurn {
        let result = self.proxy.complete(&self.log).await;
        FinishedTurn { ticket: self.ticket, result }
    }
}

/// Result of [`PendingTurn::send`], waiting to be applied.
#[must_use]
pub struct FinishedTurn {
    ticket: TurnTicket,
    result: Result<String, ProxyError>,
}

impl FinishedTurn {
    #[must_use]
    pub fn result(&self) -> &Result<String, ProxyError> {
        &self.result
    }
}

#[cfg(test)]
#[path = "advisor_test.rs"]
mod tests;
