use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub data: FeedData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedData {
    #[serde(default)]
    pub markers: Vec<Marker>,
}

/// One raw entry from the feed. Every field is optional on the wire; a
/// marker without a token can never be deduplicated and is dropped during
/// detection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub additional_details: Option<AdditionalDetails>,
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalDetails {
    #[serde(default)]
    pub rooms_count: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: Option<Street>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Street {
    #[serde(default)]
    pub text: Option<String>,
}

/// An advertised apartment with a stable identifier and display attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: String,
    pub price: Option<i64>,
    pub rooms: Option<f64>,
    pub street: Option<String>,
}

impl Listing {
    /// Returns `None` when the marker carries no token.
    pub fn from_marker(marker: &Marker) -> Option<Listing> {
        let id = marker.token.clone()?;
        Some(Listing {
            id,
            price: marker.price,
            rooms: marker
                .additional_details
                .as_ref()
                .and_then(|details| details.rooms_count),
            street: marker
                .address
                .as_ref()
                .and_then(|address| address.street.as_ref())
                .and_then(|street| street.text.clone()),
        })
    }

    pub fn url(&self) -> String {
        format!("https://www.yad2.co.il/item/{}", self.id)
    }
}
