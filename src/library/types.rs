use serde::Deserialize;

/// Body of `GET /Users/{user}/Items`. Items are kept as raw values so a
/// single malformed entry does not discard the entries before it.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsResponse {
    pub items: Vec<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    pub name: Option<String>,
    /// Left untyped: anything but a list of strings only costs the artist.
    pub artists: Option<serde_json::Value>,
    pub id: Option<String>,
}

impl Item {
    pub fn first_artist(&self) -> Option<&str> {
        self.artists.as_ref()?.as_array()?.first()?.as_str()
    }
}
