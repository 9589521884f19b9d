//! Command implementations and the wiring they share.

use std::process::ExitCode;
use std::sync::Arc;

use rocketshoes_cart::{
    CartConfig, CartOutcome, CartStore, CatalogClient, CatalogError, FileStore, NoticeKind,
    Notifier,
};
use thiserror::Error;

pub mod cart;

/// Errors that stop a command before it reaches the cart.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The catalog client could not be built from configuration.
    #[error("Catalog client error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Prints notices to stderr, one per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("{}", format_notice(kind, message));
        }
    }
}

fn format_notice(kind: NoticeKind, message: &str) -> String {
    let tag = match kind {
        NoticeKind::StockExceeded => "stock",
        NoticeKind::NotFound => "not found",
        NoticeKind::Failed => "error",
    };
    format!("[{tag}] {message}")
}

/// Build a store over the configured file and catalog.
///
/// # Errors
///
/// Returns an error if the catalog client cannot be constructed.
pub fn open_store(config: &CartConfig) -> Result<CartStore, CommandError> {
    let catalog = CatalogClient::new(&config.catalog)?;
    let storage = FileStore::new(&config.storage.path);

    tracing::debug!(
        path = %storage.path().display(),
        catalog = %config.catalog.base_url,
        "Opening cart"
    );

    Ok(CartStore::load_with_key(
        Arc::new(catalog),
        Arc::new(storage),
        Arc::new(TerminalNotifier),
        config.storage.key.clone(),
    ))
}

/// Whether a mutation finished without a notice.
const fn succeeded(outcome: CartOutcome) -> bool {
    matches!(outcome, CartOutcome::Updated | CartOutcome::Ignored)
}

/// Process exit code for a mutation outcome.
pub fn exit_code(outcome: CartOutcome) -> ExitCode {
    if succeeded(outcome) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
