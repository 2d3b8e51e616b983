use socwatch_db::DbError;
use socwatch_scraper::ScraperError;
use thiserror::Error;

/// Invocation-level failures. Anything that goes wrong for a single profile
/// is captured as a [`crate::ProfileResult`] instead.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("API key not configured. Add your API key in the settings.")]
    MissingApiKey,

    #[error("no active profiles to collect")]
    NoActiveProfiles,

    #[error("{0}")]
    Internal(String),
}

impl CollectError {
    /// HTTP status the invocation surfaces with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingApiKey | Self::NoActiveProfiles => 400,
            Self::Internal(_) => 500,
        }
    }
}

impl From<DbError> for CollectError {
    fn from(e: DbError) -> Self {
        Self::Internal(e.to_string())
    }
}

/// Failure inside one profile's scrape-normalize-store cycle.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error(transparent)]
    Scraper(#[from] ScraperError),

    #[error(transparent)]
    Db(#[from] DbError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(CollectError::MissingApiKey.status_code(), 400);
        assert_eq!(CollectError::NoActiveProfiles.status_code(), 400);
        assert_eq!(CollectError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn profile_error_message_is_the_inner_message() {
        let err = ProfileError::from(ScraperError::EmptyResult {
            username: "natgeo".into(),
        });
        assert_eq!(err.to_string(), "no data returned by the scraper for @natgeo");
    }
}
