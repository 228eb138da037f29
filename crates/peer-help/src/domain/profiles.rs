//! Profile store operations.
//!
//! One profile per identity, created once, mutated afterwards only by the
//! reward engine.

use crate::domain::entities::StudentProfile;
use crate::domain::errors::PeerHelpError;
use crate::domain::registry::Registry;
use crate::domain::value_objects::{AccountId, Timestamp};
use crate::events::PeerHelpEvent;

/// Creates the caller's profile.
///
/// `display_name` and `external_login` come from the identity provider at
/// the service boundary; they are not revalidated on later calls.
///
/// # Errors
/// - `ProfileAlreadyExists` on a second call by the same identity
/// - `ValidationError` if either handle is empty
pub fn create_profile(
    registry: &mut Registry,
    caller: AccountId,
    display_name: String,
    external_login: String,
    now: Timestamp,
) -> Result<PeerHelpEvent, PeerHelpError> {
    if registry.has_profile(&caller) {
        return Err(PeerHelpError::ProfileAlreadyExists(caller));
    }
    PeerHelpError::check_text("display_name", &display_name, 64, false)?;
    PeerHelpError::check_text("external_login", &external_login, 64, false)?;

    let profile = StudentProfile::new(caller, display_name.clone(), external_login.clone(), now);
    registry.insert_profile(profile);

    Ok(PeerHelpEvent::ProfileCreated {
        owner: caller,
        display_name,
        external_login,
    })
}
