// SPDX-FileCopyrightText: 2026 Tripcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed keyword classification and tally arithmetic for mediation and
//! confirmation votes. Pure functions, no orchestration state -- mirrors the
//! router crate's parser style.

use std::collections::HashMap;

use tripcast_core::{ParticipantId, VoteKind, VoteReading, VoteState};

const DISAGREE_KEYWORDS: &[&str] = &["disagree", "no", "cancel"];
const AGREE_KEYWORDS: &[&str] = &["agree", "yes", "ok", "confirm", "proceed"];
const CONFIRMATION_ONLY_AGREE_KEYWORDS: &[&str] = &["finalize"];

/// Classifies an utterance as agree / disagree / neither via fixed,
/// case-insensitive substring keyword lists.
///
/// Disagree is checked first: "disagree" itself contains "agree" as a
/// substring, so checking agree first would misclassify every disagreement.
pub fn classify_vote_reading(text: &str, kind: VoteKind) -> VoteReading {
    let lower = text.to_lowercase();

    if DISAGREE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return VoteReading::Disagree;
    }

    let agree_hit = AGREE_KEYWORDS.iter().any(|kw| lower.contains(kw))
        || (kind == VoteKind::Confirmation
            && CONFIRMATION_ONLY_AGREE_KEYWORDS.iter().any(|kw| lower.contains(kw)));
    if agree_hit {
        return VoteReading::Agree;
    }

    VoteReading::Neither
}

/// Whether a vote tally passes: every relevant active participant has voted
/// `Agree`, and at least one relevant participant exists. `excluded` is the
/// requester for mediation votes (implicitly agreed); confirmation votes
/// exclude no one.
pub fn tally_passes(
    votes: &HashMap<ParticipantId, VoteState>,
    active_participants: &[ParticipantId],
    excluded: Option<&ParticipantId>,
) -> bool {
    let mut relevant = active_participants.iter().filter(|p| Some(*p) != excluded).peekable();
    if relevant.peek().is_none() {
        return false;
    }
    relevant.all(|p| matches!(votes.get(p), Some(VoteState::Agree)))
}

/// Participants from `active_participants` still pending a vote (excluding
/// `excluded`), for status messages.
pub fn pending_voters(
    votes: &HashMap<ParticipantId, VoteState>,
    active_participants: &[ParticipantId],
    excluded: Option<&ParticipantId>,
) -> Vec<ParticipantId> {
    active_participants
        .iter()
        .filter(|p| Some(*p) != excluded)
        .filter(|p| !matches!(votes.get(*p), Some(VoteState::Agree)))
        .cloned()
        .collect()
}
