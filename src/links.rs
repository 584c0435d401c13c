//! SocialBlade profile links.
//!
//! Opening a link is fire-and-forget: nothing is read back, and an empty
//! username simply does nothing.

use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, LinkError};

const SOCIALBLADE_BASE: &str = "https://socialblade.com";

/// Network whose statistics page is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Instagram,
    TikTok,
    Twitter,
    Twitch,
}

impl Platform {
    /// Path segment used by SocialBlade.
    pub fn slug(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::TikTok => "tiktok",
            Platform::Twitter => "twitter",
            Platform::Twitch => "twitch",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "instagram" | "ig" => Ok(Platform::Instagram),
            "tiktok" => Ok(Platform::TikTok),
            "twitter" | "x" => Ok(Platform::Twitter),
            "twitch" => Ok(Platform::Twitch),
            other => Err(ConfigError::InvalidValue {
                key: "platform",
                value: other.to_string(),
                expected: "instagram, tiktok, twitter, twitch",
            }),
        }
    }
}

/// Something that can show a URL to the user in a new browsing context.
pub trait Browser: Send + Sync {
    fn open(&self, url: &str) -> Result<(), LinkError>;
}

/// Opens URLs with the operating system's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), LinkError> {
        open::that(url).map_err(|source| LinkError::Open {
            url: url.to_string(),
            source,
        })
    }
}

/// Normalize a typed username: surrounding whitespace and a leading `@` go.
pub fn normalize_username(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let name = trimmed.strip_prefix('@').unwrap_or(trimmed).trim();
    (!name.is_empty()).then_some(name)
}

/// Build the statistics URL for a username, or `None` if it is blank.
pub fn profile_url(raw_username: &str, platform: Platform) -> Option<String> {
    let username = normalize_username(raw_username)?;
    Some(format!(
        "{SOCIALBLADE_BASE}/{}/user/{}",
        platform.slug(),
        urlencoding::encode(username)
    ))
}

/// Open the statistics page for a username.
///
/// Returns the URL that was opened, or `None` when the name was blank and
/// nothing happened.
pub fn open_profile(
    browser: &dyn Browser,
    raw_username: &str,
    platform: Platform,
) -> Result<Option<String>, LinkError> {
    let Some(url) = profile_url(raw_username, platform) else {
        tracing::debug!("Skipping profile link for empty username");
        return Ok(None);
    };

    tracing::info!(%url, "Opening profile statistics");
    browser.open(&url)?;
    Ok(Some(url))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingBrowser {
        opened: Mutex<Vec<String>>,
    }

    impl Browser for RecordingBrowser {
        fn open(&self, url: &str) -> Result<(), LinkError> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    struct BrokenBrowser;

    impl Browser for BrokenBrowser {
        fn open(&self, url: &str) -> Result<(), LinkError> {
            Err(LinkError::Open {
                url: url.to_string(),
                source: std::io::Error::other("no display"),
            })
        }
    }

    #[test]
    fn test_strips_at_and_whitespace() {
        assert_eq!(
            profile_url("@Jacob.Delvasto ", Platform::Instagram).as_deref(),
            Some("https://socialblade.com/instagram/user/Jacob.Delvasto")
        );
        assert_eq!(
            profile_url("  @ raul_trainer", Platform::TikTok).as_deref(),
            Some("https://socialblade.com/tiktok/user/raul_trainer")
        );
    }

    #[test]
    fn test_blank_usernames_build_nothing() {
        for raw in ["", "  ", "@", " @ "] {
            assert_eq!(profile_url(raw, Platform::Instagram), None, "{raw:?}");
        }
    }

    #[test]
    fn test_username_is_percent_encoded() {
        assert_eq!(
            profile_url("Raúl_Trainer", Platform::Instagram).as_deref(),
            Some("https://socialblade.com/instagram/user/Ra%C3%BAl_Trainer")
        );
    }

    #[test]
    fn test_open_profile_navigates_once() {
        let browser = RecordingBrowser::default();
        let url = open_profile(&browser, "@Jacob.Delvasto ", Platform::Instagram).unwrap();

        assert_eq!(
            url.as_deref(),
            Some("https://socialblade.com/instagram/user/Jacob.Delvasto")
        );
        assert_eq!(*browser.opened.lock().unwrap(), vec![url.unwrap()]);
    }

    #[test]
    fn test_open_profile_skips_empty() {
        let browser = RecordingBrowser::default();
        assert_eq!(open_profile(&browser, "", Platform::Instagram).unwrap(), None);
        assert_eq!(open_profile(&browser, "  ", Platform::Instagram).unwrap(), None);
        assert!(browser.opened.lock().unwrap().is_empty());
    }

    #[test]
    fn test_open_profile_reports_browser_failure() {
        let err = open_profile(&BrokenBrowser, "someone", Platform::Instagram).unwrap_err();
        assert!(err.to_string().contains("socialblade.com/instagram/user/someone"));
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!("Instagram".parse::<Platform>().unwrap(), Platform::Instagram);
        assert_eq!("x".parse::<Platform>().unwrap(), Platform::Twitter);
        assert!("myspace".parse::<Platform>().is_err());
        assert_eq!(Platform::default().to_string(), "instagram");
    }
}
