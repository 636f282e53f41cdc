use axum::response::Redirect;
use crate::api::extractors::maybe_auth::MaybeAuthUser;
use crate::domain::services::dispatch::post_login_destination;
use tracing::debug;

pub async fn default_after_login(MaybeAuthUser(principal): MaybeAuthUser) -> Redirect {
    let authorities = principal.map(|p| p.authorities).unwrap_or_default();
    let destination = post_login_destination(&authorities);
    debug!("Post-login dispatch {:?} -> {}", authorities, destination.path());
    Redirect::to(destination.path())
}
