use hrsync_gateway::GatewayError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Execute was requested with no employees selected; nothing was sent
    #[error("no employees selected")]
    EmptySelection,

    /// Another check or execute is still in flight
    #[error("a sync operation is already in progress")]
    Busy,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
