//! DialogStore trait definition.
//!
//! Follows the same RPITIT pattern as the other ports.

use telephonist_types::dialog::Dialog;
use telephonist_types::error::StoreError;

/// Repository trait for finished dialogs.
///
/// Implementations live in telephonist-infra (e.g., `SqliteDialogStore`).
/// A store with no backing database runs in dry-run mode: `create` returns
/// the dialog without an id and without error.
pub trait DialogStore: Send + Sync {
    /// Persist a new dialog and return it with its generated id.
    ///
    /// Fails with [`StoreError::EmptyDialog`] if the dialog has no messages.
    fn create(
        &self,
        dialog: &Dialog,
    ) -> impl std::future::Future<Output = Result<Dialog, StoreError>> + Send;

    /// Overwrite the messages of an already persisted dialog.
    ///
    /// Fails with [`StoreError::MissingId`] if the dialog has no id.
    fn update(
        &self,
        dialog: &Dialog,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
