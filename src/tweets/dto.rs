use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TweetForm {
    #[serde(default)]
    pub post: String,
    #[serde(default)]
    pub tags: Vec<String>,
}
