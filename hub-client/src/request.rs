//! Validation and encoding of subscribe/unsubscribe requests.

use url::form_urlencoded;
use url::Url;

use crate::error::HubError;
use crate::item::{Mode, SubscriptionItem};
use crate::transport::{OutboundRequest, Scheme, FORM_CONTENT_TYPE};

/// A validated request, encoded and ready for its transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubRequest {
    pub mode: Mode,
    pub scheme: Scheme,
    /// Callback URL carrying the subscription id as its `id` query parameter
    pub callback: Url,
    /// The caller's item with the default lease applied
    pub item: SubscriptionItem,
    pub outbound: OutboundRequest,
}

impl HubRequest {
    /// Validate `item` and encode the form body.
    ///
    /// Checks run in a fixed order and stop at the first failure: the item
    /// itself, then the required fields, then the hub scheme.
    pub fn build(
        item: Option<&SubscriptionItem>,
        mode: Mode,
        callback_url: &Url,
        default_lease_seconds: u32,
    ) -> Result<Self, HubError> {
        let item = item.ok_or_else(HubError::item_not_supplied)?;

        let (Some(id), Some(hub), Some(topic)) = (item.id(), item.hub(), item.topic()) else {
            return Err(HubError::required_params(
                item.id().map(str::to_string),
                item.missing_fields(),
            ));
        };

        let unsupported = || HubError::UnsupportedTransport {
            id: id.to_string(),
            hub: hub.to_string(),
        };
        let hub_url = Url::parse(hub).map_err(|_| unsupported())?;
        let scheme = Scheme::from_url(&hub_url).ok_or_else(unsupported)?;

        let mut item = item.clone();
        let lease_seconds = *item.lease_seconds.get_or_insert(default_lease_seconds);

        let callback = callback_with_id(callback_url, id);
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("hub.callback", callback.as_str())
            .append_pair("hub.mode", mode.as_str())
            .append_pair("hub.topic", topic)
            .append_pair("hub.lease_seconds", &lease_seconds.to_string())
            .finish();

        Ok(Self {
            mode,
            scheme,
            callback,
            outbound: OutboundRequest {
                url: hub_url,
                content_type: FORM_CONTENT_TYPE,
                body,
            },
            item,
        })
    }

    pub fn id(&self) -> &str {
        self.item.id().unwrap_or_default()
    }
}

/// The registered callback URL with `id=<id>` appended to its query.
///
/// Existing query pairs are kept, except an `id` pair, which `id` replaces.
pub fn callback_with_id(callback_url: &Url, id: &str) -> Url {
    let kept: Vec<(String, String)> = callback_url
        .query_pairs()
        .filter(|(name, _)| name != "id")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut callback = callback_url.clone();
    callback.set_query(None);
    {
        let mut pairs = callback.query_pairs_mut();
        pairs.extend_pairs(&kept);
        pairs.append_pair("id", id);
    }
    callback
}
