//! # Request Lifecycle Manager
//!
//! Creates help requests and runs crowd-sourced difficulty voting. The
//! Open -> Matched transition belongs to the match engine (single writer),
//! not to this module.

use crate::config::PeerHelpConfig;
use crate::domain::entities::HelpRequest;
use crate::domain::errors::PeerHelpError;
use crate::domain::registry::Registry;
use crate::domain::value_objects::{AccountId, RequestId, Timestamp, Topic};
use crate::events::PeerHelpEvent;

/// Opens a new help request.
///
/// # Errors
/// - `ProfileRequired` if the requester has no profile
/// - `ValidationError` for empty/oversized title or description, or an
///   initial difficulty outside 1-5
pub fn create_request(
    registry: &mut Registry,
    config: &PeerHelpConfig,
    requester: AccountId,
    topic: Topic,
    title: String,
    description: String,
    initial_difficulty: u8,
    now: Timestamp,
) -> Result<(RequestId, PeerHelpEvent), PeerHelpError> {
    if !registry.has_profile(&requester) {
        return Err(PeerHelpError::ProfileRequired(requester));
    }
    PeerHelpError::check_text("title", &title, config.max_title_len, false)?;
    PeerHelpError::check_text("description", &description, config.max_description_len, false)?;
    PeerHelpError::check_scale("initial_difficulty", initial_difficulty)?;

    let id = registry.allocate_request_id();
    let request = HelpRequest::new(
        id,
        requester,
        topic,
        title.clone(),
        description,
        initial_difficulty,
        now,
    );
    registry.insert_request(request);
    registry.count_request();

    Ok((
        id,
        PeerHelpEvent::HelpRequestCreated {
            request_id: id,
            requester,
            topic,
            title,
            initial_difficulty,
        },
    ))
}

/// Records a community difficulty vote and recomputes the running average.
///
/// The initial difficulty counts as one implicit vote, so the average after
/// a community vote is `(avg * (count + 1) + vote) / (count + 2)` with floor
/// rounding, and `difficulty_vote_count` tracks community votes only.
///
/// # Errors
/// - `InvalidVote` for votes outside 1-5
/// - `RequestNotOpen` once the request is matched or completed
/// - `SelfVoteForbidden` if the requester votes on their own request
/// - `AlreadyVoted` on a second vote by the same identity
pub fn vote_difficulty(
    registry: &mut Registry,
    config: &PeerHelpConfig,
    request_id: RequestId,
    voter: AccountId,
    vote: u8,
) -> Result<PeerHelpEvent, PeerHelpError> {
    if !(1..=5).contains(&vote) {
        return Err(PeerHelpError::InvalidVote { vote });
    }

    let request = registry.request_or_err(request_id)?;
    if !request.is_open() {
        return Err(PeerHelpError::RequestNotOpen(request_id));
    }
    if request.requester == voter {
        return Err(PeerHelpError::SelfVoteForbidden(request_id));
    }
    if registry.has_voted(request_id, &voter) {
        return Err(PeerHelpError::AlreadyVoted { voter, request_id });
    }

    // All preconditions hold; commit the vote.
    registry.record_voter(request_id, voter);
    let quorum = config.vote_quorum;
    let request = registry.request_mut_or_err(request_id)?;

    let effective_votes = request.difficulty_vote_count + 1;
    let weighted = u64::from(request.community_difficulty) * effective_votes + u64::from(vote);
    request.community_difficulty = (weighted / (effective_votes + 1)) as u8;
    request.difficulty_vote_count += 1;

    Ok(PeerHelpEvent::DifficultyVoted {
        request_id,
        voter,
        vote,
        community_difficulty: request.community_difficulty,
        difficulty_vote_count: request.difficulty_vote_count,
        difficulty_trusted: request.difficulty_vote_count >= quorum,
    })
}

// =============================================================================
// TESTS
// =============================================================================
