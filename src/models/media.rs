use serde::{Deserialize, Serialize};

/// A movie in the Ferelix catalog.
///
/// Media URLs are optional: entries appear in the catalog as soon as they
/// are indexed, before artwork or an HLS rendition exists. The aliases
/// accept the camelCase names emitted by pre-1.0 servers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    #[serde(alias = "posterUrl")]
    pub poster_url: Option<String>,
    #[serde(alias = "backdropUrl")]
    pub backdrop_url: Option<String>,
    #[serde(alias = "hlsUrl")]
    pub hls_url: Option<String>,
    /// Runtime in seconds.
    pub duration: Option<u32>,
    pub year: Option<i32>,
    pub genre: Option<String>,
}

impl Movie {
    /// Runtime formatted as `H:MM:SS`, or `M:SS` under an hour.
    pub fn display_duration(&self) -> String {
        match self.duration {
            Some(secs) => {
                let hours = secs / 3600;
                let minutes = (secs % 3600) / 60;
                let seconds = secs % 60;
                if hours > 0 {
                    format!("{}:{:02}:{:02}", hours, minutes, seconds)
                } else {
                    format!("{}:{:02}", minutes, seconds)
                }
            }
            None => "Unknown".to_string(),
        }
    }
}
