/// Client classification: which fetch strategy a client can use

/// User-agent markers of in-app webviews that only load static assets.
pub const RESTRICTED_MARKERS: &[&str] = &["QQ/", "MicroMessenger"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Fetch the roster and render tables locally.
    #[default]
    Live,
    /// Look up images pre-rendered by the server.
    Prerendered,
}

impl FetchMode {
    pub fn from_restricted(restricted: bool) -> Self {
        if restricted {
            FetchMode::Prerendered
        } else {
            FetchMode::Live
        }
    }

    /// Classify a client by its user agent.
    pub fn detect(user_agent: &str) -> Self {
        Self::from_restricted(is_restricted(user_agent))
    }
}

pub fn is_restricted(user_agent: &str) -> bool {
    RESTRICTED_MARKERS.iter().any(|m| user_agent.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_webviews_are_restricted() {
        let wechat = "Mozilla/5.0 (Linux; Android 10) AppleWebKit/537.36 MicroMessenger/8.0.2";
        let qq = "Mozilla/5.0 (iPhone) Mobile/15E148 QQ/8.8.5.637 V1_IPH_SQ_8.8.5_1_APP_A";
        assert_eq!(FetchMode::detect(wechat), FetchMode::Prerendered);
        assert_eq!(FetchMode::detect(qq), FetchMode::Prerendered);
    }

    #[test]
    fn regular_browsers_are_live() {
        let firefox = "Mozilla/5.0 (X11; Linux x86_64; rv:115.0) Gecko/20100101 Firefox/115.0";
        assert_eq!(FetchMode::detect(firefox), FetchMode::Live);
        // "QQBrowser" is a full browser, not the in-app webview
        assert_eq!(FetchMode::detect("Mozilla/5.0 QQBrowser/10.1"), FetchMode::Live);
    }
}
