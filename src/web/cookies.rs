use std::time::Duration;

use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::types::SessionId;

/// Create the encrypted session cookie.
pub(super) fn session_cookie(
    name: &str,
    session_id: &SessionId,
    ttl: Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name.to_string(), session_id.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/".to_string())
        .max_age(time::Duration::try_from(ttl).unwrap_or(time::Duration::MAX))
        .build()
}

/// Get the session id from cookies.
pub(super) fn get_session_id(jar: &PrivateCookieJar, name: &str) -> Option<SessionId> {
    jar.get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .map(SessionId::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let id = SessionId::from("abc".to_string());
        let cookie = session_cookie("__li_session", &id, Duration::from_secs(3600), true);

        assert_eq!(cookie.name(), "__li_session");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(1)));
    }

    #[test]
    fn session_cookie_can_be_insecure_for_local_http() {
        let id = SessionId::from("abc".to_string());
        let cookie = session_cookie("s", &id, Duration::from_secs(60), false);
        assert_eq!(cookie.secure(), Some(false));
    }
}
