//! # Match & Completion Engine
//!
//! Single writer for the Open -> Matched transition and for completion.
//! `accept_offer` settles the whole offer set in one unit: the accepted
//! offer, the batch rejection of every other pending offer, the match
//! record, the request status, and the aggregate counter move together or
//! not at all.

use crate::domain::entities::{MatchRecord, MatchStatus, RequestStatus};
use crate::domain::errors::PeerHelpError;
use crate::domain::registry::Registry;
use crate::domain::value_objects::{AccountId, MatchId, OfferId, RequestId, Timestamp};
use crate::events::PeerHelpEvent;

/// Accepts one pending offer on the caller's open request.
///
/// Every other pending offer on the request is rejected in the same unit,
/// so a second mentor can never be accepted later against stale offer
/// state.
///
/// # Errors
/// - `NotRequestOwner` if the caller is not the requester
/// - `RequestNotOpen` if the request already left Open
/// - `OfferNotPending` if the offer was already decided
/// - `ValidationError` if the offer targets a different request
pub fn accept_offer(
    registry: &mut Registry,
    request_id: RequestId,
    offer_id: OfferId,
    caller: AccountId,
    now: Timestamp,
) -> Result<(MatchId, Vec<PeerHelpEvent>), PeerHelpError> {
    let request = registry.request_or_err(request_id)?;
    let offer = registry.offer_or_err(offer_id)?;

    if offer.request_id != request_id {
        return Err(PeerHelpError::ValidationError {
            field: "offer",
            reason: format!("offer {offer_id} does not target request {request_id}"),
        });
    }
    if request.requester != caller {
        return Err(PeerHelpError::NotRequestOwner { caller, request_id });
    }
    if !request.is_open() {
        return Err(PeerHelpError::RequestNotOpen(request_id));
    }
    if !offer.is_pending() {
        return Err(PeerHelpError::OfferNotPending(offer_id));
    }

    let mentor = offer.mentor;
    let mentee = request.requester;
    let other_offers: Vec<OfferId> = request
        .offers
        .iter()
        .copied()
        .filter(|id| *id != offer_id)
        .collect();

    // All preconditions hold; apply the full transition.
    let match_id = registry.allocate_match_id();
    let mut events = Vec::with_capacity(other_offers.len() + 1);

    registry.offer_mut_or_err(offer_id)?.status =
        crate::domain::entities::OfferStatus::Accepted;
    events.push(PeerHelpEvent::MatchCreated {
        match_id,
        request_id,
        helper: mentor,
        mentee,
    });

    for other_id in other_offers {
        let other = registry.offer_mut_or_err(other_id)?;
        if other.is_pending() {
            other.reject();
            events.push(PeerHelpEvent::OfferRejected {
                offer_id: other_id,
                request_id,
                mentor: other.mentor,
            });
        }
    }

    registry.insert_match(MatchRecord::new(match_id, request_id, mentor, mentee, now));

    let request = registry.request_mut_or_err(request_id)?;
    request.status = RequestStatus::Matched;
    request.match_id = Some(match_id);

    registry.count_match();

    Ok((match_id, events))
}

/// Mentee confirms a successful completion.
///
/// Completion commits even if the reward is never claimed; the emitted
/// `MentorRewardPending` event is the decoupled signal the reward engine
/// (or a retrying client) consumes later.
///
/// # Errors
/// - `NotMentee` if the caller is not the match's mentee
/// - `RequestNotMatched` if the request is not in Matched
/// - `AlreadyCompleted` if the match already terminated
pub fn mentee_confirm_completion(
    registry: &mut Registry,
    match_id: MatchId,
    request_id: RequestId,
    caller: AccountId,
) -> Result<Vec<PeerHelpEvent>, PeerHelpError> {
    let (mentor, mentee) = check_completion_preconditions(registry, match_id, request_id, caller)?;
    // The mentee profile receives the helps_received bump below; resolve it
    // before the first write so a missing profile cannot leave a half
    // transition.
    registry.profile_or_err(&mentee)?;

    // All preconditions hold; commit the confirmation.
    let record = registry.match_mut_or_err(match_id)?;
    record.mentee_confirmed = true;
    record.status = MatchStatus::Completed;

    registry.request_mut_or_err(request_id)?.status = RequestStatus::Completed;
    registry.count_completion();
    registry.profile_mut_or_err(&mentee)?.helps_received += 1;

    Ok(vec![
        PeerHelpEvent::HelpCompleted {
            match_id,
            request_id,
            mentor,
            mentee,
            confirmed: true,
        },
        PeerHelpEvent::MentorRewardPending {
            match_id,
            request_id,
            mentor,
        },
    ])
}

/// Mentee closes the request as failed.
///
/// Terminal: the request completes without reward. `reward_claimed` is
/// consumed here so no later claim can ever pay out, and the mentor's
/// reputation is untouched.
///
/// # Errors
/// Same preconditions as [`mentee_confirm_completion`].
pub fn mentee_reject_completion(
    registry: &mut Registry,
    match_id: MatchId,
    request_id: RequestId,
    caller: AccountId,
) -> Result<Vec<PeerHelpEvent>, PeerHelpError> {
    let (mentor, mentee) = check_completion_preconditions(registry, match_id, request_id, caller)?;

    // All preconditions hold; commit the failed outcome.
    let record = registry.match_mut_or_err(match_id)?;
    record.status = MatchStatus::Completed;

    let request = registry.request_mut_or_err(request_id)?;
    request.status = RequestStatus::Completed;
    request.reward_claimed = true;

    registry.count_completion();

    Ok(vec![PeerHelpEvent::HelpCompleted {
        match_id,
        request_id,
        mentor,
        mentee,
        confirmed: false,
    }])
}

/// Shared precondition block for both completion paths. Read-only.
fn check_completion_preconditions(
    registry: &Registry,
    match_id: MatchId,
    request_id: RequestId,
    caller: AccountId,
) -> Result<(AccountId, AccountId), PeerHelpError> {
    let record = registry.match_or_err(match_id)?;
    let request = registry.request_or_err(request_id)?;

    if record.request_id != request_id {
        return Err(PeerHelpError::ValidationError {
            field: "match",
            reason: format!("match {match_id} does not settle request {request_id}"),
        });
    }
    if record.mentee != caller {
        return Err(PeerHelpError::NotMentee { caller, match_id });
    }
    if request.status != RequestStatus::Matched {
        return Err(PeerHelpError::RequestNotMatched(request_id));
    }
    if record.is_completed() {
        return Err(PeerHelpError::AlreadyCompleted(match_id));
    }

    Ok((record.mentor, record.mentee))
}

// =============================================================================
// TESTS
// =============================================================================
