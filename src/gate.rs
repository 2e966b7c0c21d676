//! Authenticate-then-authorize composition
//!
//! Runs immediately after token acquisition: resolve the external profile,
//! then check group membership with the same authenticated client. The
//! composition is provider-agnostic.

use reqwest::Client;

use crate::error::GateResult;
use crate::identity::{AllowedGroups, AuthOutcome, Decision};
use crate::providers::IdentityProvider;

/// Resolves the external identity and applies the group allowlist.
///
/// The profile is always resolved first; authorization is never attempted
/// for an unresolved identity. On [`AuthOutcome::Forbidden`] the resolved
/// profile is dropped and not returned.
///
/// # Arguments
///
/// * `provider` - Identity provider to query
/// * `client` - HTTP client that already attaches the user's bearer token
/// * `allowed` - Group allowlist; empty means every authenticated user passes
///
/// # Errors
///
/// Propagates [`GateError::IdentityFetchFailed`](crate::error::GateError::IdentityFetchFailed),
/// [`GateError::ProfileDecodeFailed`](crate::error::GateError::ProfileDecodeFailed) and
/// [`GateError::GroupFetchFailed`](crate::error::GateError::GroupFetchFailed)
/// unmodified.
///
/// # Examples
///
/// ```no_run
/// use authgate::gate::authenticate;
/// use authgate::identity::{AllowedGroups, AuthOutcome};
/// use authgate::providers::GitlabProvider;
///
/// # async fn example(client: reqwest::Client) -> authgate::error::GateResult<()> {
/// let provider = GitlabProvider::new("https://gitlab.com/api/v4", 100)?;
/// match authenticate(&provider, &client, &AllowedGroups::new(["core-team"])).await? {
///     AuthOutcome::Authenticated(identity) => println!("welcome {}", identity.display_name),
///     AuthOutcome::Forbidden => println!("access denied"),
/// }
/// # Ok(())
/// # }
/// ```
pub async fn authenticate(
    provider: &dyn IdentityProvider,
    client: &Client,
    allowed: &AllowedGroups,
) -> GateResult<AuthOutcome> {
    let identity = provider.resolve_profile(client).await?;

    match provider.authorize(client, allowed).await? {
        Decision::Authorized => {
            tracing::info!(provider = provider.name(), "External user authorized");
            Ok(AuthOutcome::Authenticated(identity))
        }
        Decision::Forbidden => {
            tracing::warn!(
                provider = provider.name(),
                allowed_groups = allowed.len(),
                "External user is not a member of any allowed group"
            );
            Ok(AuthOutcome::Forbidden)
        }
    }
}
