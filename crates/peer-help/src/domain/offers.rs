//! # Offer Manager
//!
//! Creates help offers against open requests and enforces the
//! one-offer-per-mentor-per-request rule.
//!
//! The duplicate check runs against `request.mentor_addresses`, not a scan
//! of offer objects, and the check and the append happen inside one
//! `&mut Registry` mutation, so two offers from the same mentor can never
//! both pass it.

use crate::config::PeerHelpConfig;
use crate::domain::entities::HelpOffer;
use crate::domain::errors::PeerHelpError;
use crate::domain::registry::Registry;
use crate::domain::value_objects::{AccountId, OfferId, RequestId, Timestamp};
use crate::events::PeerHelpEvent;

/// Creates a pending offer on an open request.
///
/// `past_helps_on_topic` is snapshotted from the mentor's profile at this
/// moment; it does not track later reward claims.
///
/// # Errors
/// - `ProfileRequired` if the mentor has no profile
/// - `RequestNotOpen` once the request is matched or completed
/// - `SelfOfferForbidden` if the mentor is the requester
/// - `DuplicateOffer` if the mentor already offered on this request
/// - `ValidationError` for an oversized message or competency outside 1-5
pub fn create_offer(
    registry: &mut Registry,
    config: &PeerHelpConfig,
    request_id: RequestId,
    mentor: AccountId,
    message: String,
    competency_level: u8,
    now: Timestamp,
) -> Result<(OfferId, PeerHelpEvent), PeerHelpError> {
    if !registry.has_profile(&mentor) {
        return Err(PeerHelpError::ProfileRequired(mentor));
    }
    PeerHelpError::check_text("message", &message, config.max_message_len, true)?;
    PeerHelpError::check_scale("competency_level", competency_level)?;

    let request = registry.request_or_err(request_id)?;
    if !request.is_open() {
        return Err(PeerHelpError::RequestNotOpen(request_id));
    }
    if request.requester == mentor {
        return Err(PeerHelpError::SelfOfferForbidden(request_id));
    }
    if request.has_offer_from(&mentor) {
        return Err(PeerHelpError::DuplicateOffer { mentor, request_id });
    }

    let past_helps_on_topic = registry.profile_or_err(&mentor)?.helps_given;

    // All preconditions hold; record the offer and its dedup entry together.
    let offer_id = registry.allocate_offer_id();
    registry.insert_offer(HelpOffer::new(
        offer_id,
        request_id,
        mentor,
        message,
        competency_level,
        past_helps_on_topic,
        now,
    ));
    let request = registry.request_mut_or_err(request_id)?;
    request.offers.push(offer_id);
    request.mentor_addresses.push(mentor);

    Ok((
        offer_id,
        PeerHelpEvent::HelpOfferCreated {
            offer_id,
            request_id,
            mentor,
            competency_level,
            past_helps_on_topic,
        },
    ))
}

// =============================================================================
// TESTS
// =============================================================================
