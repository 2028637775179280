use url::Url;

use crate::{Error, Result};

const MARKET_URL: &str = "market://details";
const WEB_URL: &str = "http://play.google.com/store/apps/details";

/// Opens URLs on the device.
///
/// Return [`Error::NoHandler`] when nothing can handle the URL; the client then retries with the
/// web listing.
pub trait LaunchTarget {
    /// Open `url` with whatever the device registers for it.
    fn open(&mut self, url: &Url) -> Result<()>;
}

/// Default [`LaunchTarget`] for hosts that did not configure one.
pub(crate) struct UnhandledLaunchTarget;
impl LaunchTarget for UnhandledLaunchTarget {
    fn open(&mut self, url: &Url) -> Result<()> {
        Err(Error::NoHandler(url.to_string()))
    }
}

impl<T: FnMut(&Url) -> Result<()>> LaunchTarget for T {
    fn open(&mut self, url: &Url) -> Result<()> {
        self(url)
    }
}

/// Store listing of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreListing {
    package_id: String,
    url_override: Option<String>,
}

impl StoreListing {
    /// An empty override is the same as none.
    pub fn new(package_id: impl Into<String>, url_override: Option<String>) -> Self {
        StoreListing {
            package_id: package_id.into(),
            url_override: url_override.filter(|url| !url.is_empty()),
        }
    }

    /// URL opened first: the override, or the market listing of the package.
    pub fn primary_url(&self) -> Result<Url> {
        match &self.url_override {
            Some(url) => Url::parse(url),
            None => Url::parse_with_params(MARKET_URL, &[("id", &*self.package_id)]),
        }
        .map_err(Error::InvalidUrl)
    }

    /// Web listing used when the primary URL cannot be opened.
    pub fn web_url(&self) -> Result<Url> {
        Url::parse_with_params(WEB_URL, &[("id", &*self.package_id)]).map_err(Error::InvalidUrl)
    }

    /// Open the listing, falling back to the web listing once. Failures are logged, never
    /// returned.
    pub(crate) fn open(&self, target: &mut dyn LaunchTarget) {
        let primary = self.primary_url().and_then(|url| {
            log::debug!(target: "rate_prompt", url:display = url; "opening store listing");
            target.open(&url)
        });
        let Err(err) = primary else {
            return;
        };
        log::warn!(target: "rate_prompt",
                   "failed to open store listing, trying web listing: {:?}", err);

        if let Err(err) = self.web_url().and_then(|url| target.open(&url)) {
            log::warn!(target: "rate_prompt", "failed to open web store listing: {:?}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::StoreListing;
    use crate::{Error, Result};

    #[test]
    fn default_listing_is_market_url() {
        let listing = StoreListing::new("com.example.app", None);

        assert_eq!(
            listing.primary_url().unwrap().as_str(),
            "market://details?id=com.example.app"
        );
        assert_eq!(
            listing.web_url().unwrap().as_str(),
            "http://play.google.com/store/apps/details?id=com.example.app"
        );
    }

    #[test]
    fn override_replaces_market_url() {
        let listing = StoreListing::new(
            "com.example.app",
            Some("https://example.com/rate".to_owned()),
        );
        assert_eq!(
            listing.primary_url().unwrap().as_str(),
            "https://example.com/rate"
        );
    }

    #[test]
    fn empty_override_is_ignored() {
        let listing = StoreListing::new("com.example.app", Some(String::new()));
        assert_eq!(listing, StoreListing::new("com.example.app", None));
    }

    #[test]
    fn unhandled_market_url_falls_back_to_web() {
        let listing = StoreListing::new("com.example.app", None);
        let mut opened = Vec::new();
        let mut target = |url: &Url| -> Result<()> {
            opened.push(url.to_string());
            if url.scheme() == "market" {
                Err(Error::NoHandler(url.to_string()))
            } else {
                Ok(())
            }
        };

        listing.open(&mut target);

        assert_eq!(
            opened,
            vec![
                "market://details?id=com.example.app".to_owned(),
                "http://play.google.com/store/apps/details?id=com.example.app".to_owned(),
            ]
        );
    }

    #[test]
    fn invalid_override_falls_back_to_web() {
        let listing = StoreListing::new("com.example.app", Some("not a url".to_owned()));
        assert!(matches!(listing.primary_url(), Err(Error::InvalidUrl(_))));

        let mut opened = Vec::new();
        listing.open(&mut |url: &Url| -> Result<()> {
            opened.push(url.to_string());
            Ok(())
        });

        assert_eq!(
            opened,
            vec!["http://play.google.com/store/apps/details?id=com.example.app".to_owned()]
        );
    }

    #[test]
    fn opened_primary_skips_fallback() {
        let listing = StoreListing::new("com.example.app", None);
        let mut count = 0;
        listing.open(&mut |_: &Url| -> Result<()> {
            count += 1;
            Ok(())
        });
        assert_eq!(count, 1);
    }
}
