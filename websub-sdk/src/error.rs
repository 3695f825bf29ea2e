use thiserror::Error;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Invalid callback URL: {0}")]
    InvalidCallbackUrl(String),

    #[error("Hub request failed: {0}")]
    Hub(#[from] hub_client::HubError),

    #[error("Transport setup failed: {0}")]
    Transport(#[from] hub_client::TransportError),

    #[error("Callback server error: {0}")]
    Server(#[from] callback_server::ServerError),
}

impl SdkError {
    /// Subscription id of a failed hub request.
    pub fn subscription_id(&self) -> Option<&str> {
        match self {
            SdkError::Hub(e) => e.id(),
            _ => None,
        }
    }
}
