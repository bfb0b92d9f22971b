use serde::Deserialize;

/// List envelope returned by the document endpoints. An absent `documents`
/// field reads as an empty list.
#[derive(Debug, Deserialize)]
pub struct DocumentList<T> {
    #[serde(default = "Vec::new")]
    pub documents: Vec<T>,
}
