//! Form protection: every POST form must echo back the token held in a signed cookie.

use axum_extra::extract::{
    SignedCookieJar,
    cookie::{Cookie, Key, SameSite},
};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;
use uuid::Uuid;

pub const FIELD: &str = "csrf_token";
const COOKIE: &str = "topten_csrf";

/// Cookie keys need 64 bytes; any secret is stretched to that with SHA-512.
pub fn key_from_secret(secret: &str) -> Key {
    Key::from(Sha512::digest(secret.as_bytes()).as_slice())
}

/// Returns the browser's current token, minting and setting one if it has none.
pub fn issue(jar: SignedCookieJar) -> (SignedCookieJar, String) {
    if let Some(existing) = jar.get(COOKIE) {
        let token = existing.value().to_string();
        return (jar, token);
    }

    let token = Uuid::new_v4().simple().to_string();
    let cookie = Cookie::build((COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(12));
    (jar.add(cookie), token)
}

pub fn verify(jar: &SignedCookieJar, submitted: &str) -> bool {
    !submitted.is_empty()
        && jar
            .get(COOKIE)
            .is_some_and(|c| bool::from(c.value().as_bytes().ct_eq(submitted.as_bytes())))
}
