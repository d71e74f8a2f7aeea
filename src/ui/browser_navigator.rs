use crate::traits::navigator::Navigator;

/// Sends the user to the results page of the web frontend.
/// With `open_browser` off the link is only logged.
pub struct BrowserNavigator {
    base_url: String,
    open_browser: bool,
}

impl BrowserNavigator {
    pub fn new(base_url: &str, open_browser: bool) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            open_browser,
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        let url = self.url_for(path);
        log::info!("🔗 Results available at {}", url);

        if self.open_browser {
            if let Err(e) = webbrowser::open(&url) {
                log::warn!("⚠️ Could not open browser: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_path_with_single_slash() {
        let navigator = BrowserNavigator::new("http://localhost:3000/", false);
        assert_eq!(
            navigator.url_for("/analyze/profile/alice/results"),
            "http://localhost:3000/analyze/profile/alice/results"
        );
    }
}
